use metrics_exporter_prometheus::PrometheusHandle;
use siren::dispatch::{
    Accident, AccidentId, AccidentRepository, Coordinate, DirectoryError, GeocodeError, Geocoder,
    RepositoryError, Responder, ResponderDirectory, ResponderId, Role, Severity,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccidentRepository {
    records: Arc<Mutex<HashMap<AccidentId, Accident>>>,
}

impl AccidentRepository for InMemoryAccidentRepository {
    fn insert(&self, accident: Accident) -> Result<Accident, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&accident.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(accident.id.clone(), accident.clone());
        Ok(accident)
    }

    fn update(&self, accident: Accident) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&accident.id) {
            guard.insert(accident.id.clone(), accident);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AccidentId) -> Result<Option<Accident>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn assigned_to(
        &self,
        responder: &ResponderId,
        role: Role,
    ) -> Result<Vec<Accident>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|accident| {
                accident
                    .assignment(role)
                    .is_some_and(|slot| &slot.responder_id == responder)
            })
            .cloned()
            .collect())
    }
}

/// Directory seeded with a fixed metro roster; a registration flow would
/// replace this with a database-backed adapter.
#[derive(Default, Clone)]
pub(crate) struct InMemoryResponderDirectory {
    responders: Arc<Mutex<Vec<Responder>>>,
}

impl InMemoryResponderDirectory {
    pub(crate) fn seeded() -> Self {
        Self {
            responders: Arc::new(Mutex::new(seed_responders())),
        }
    }
}

impl ResponderDirectory for InMemoryResponderDirectory {
    fn active(&self, role: Role) -> Result<Vec<Responder>, DirectoryError> {
        let guard = self.responders.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|responder| responder.active && responder.role == role)
            .cloned()
            .collect())
    }
}

fn seed_responders() -> Vec<Responder> {
    fn entry(id: &str, name: &str, role: Role, lat: f64, lng: f64) -> Responder {
        Responder {
            id: ResponderId(id.to_string()),
            organization_name: name.to_string(),
            role,
            location: Coordinate::new(lat, lng),
            active: true,
        }
    }

    vec![
        entry(
            "hospital-1",
            "Apollo Greams Road",
            Role::Hospital,
            13.0604,
            80.2496,
        ),
        entry(
            "hospital-2",
            "Stanley Medical College",
            Role::Hospital,
            13.1067,
            80.2847,
        ),
        entry(
            "hospital-3",
            "Kauvery Hospital Alwarpet",
            Role::Hospital,
            13.0337,
            80.2518,
        ),
        entry(
            "police-1",
            "T. Nagar Police Station",
            Role::Police,
            13.0418,
            80.2341,
        ),
        entry(
            "police-2",
            "Anna Nagar Police Station",
            Role::Police,
            13.0850,
            80.2101,
        ),
        entry(
            "police-3",
            "Mylapore Police Station",
            Role::Police,
            13.0368,
            80.2676,
        ),
    ]
}

/// Table-backed geocoder standing in for the external provider during
/// development and demos.
#[derive(Default, Clone)]
pub(crate) struct StaticGeocoder {
    table: HashMap<String, Coordinate>,
}

impl StaticGeocoder {
    pub(crate) fn metro() -> Self {
        let mut table = HashMap::new();
        table.insert(
            "anna nagar, chennai".to_string(),
            Coordinate::new(13.0878, 80.2097),
        );
        table.insert(
            "t. nagar, chennai".to_string(),
            Coordinate::new(13.0418, 80.2341),
        );
        table.insert(
            "marina beach, chennai".to_string(),
            Coordinate::new(13.0500, 80.2824),
        );
        table.insert(
            "mylapore, chennai".to_string(),
            Coordinate::new(13.0368, 80.2676),
        );
        table.insert(
            "guindy, chennai".to_string(),
            Coordinate::new(13.0067, 80.2206),
        );
        Self { table }
    }
}

impl Geocoder for StaticGeocoder {
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Ok(self
            .table
            .get(&address.trim().to_ascii_lowercase())
            .copied())
    }
}

pub(crate) fn parse_severity(raw: &str) -> Result<Severity, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "minor" => Ok(Severity::Minor),
        "moderate" => Ok(Severity::Moderate),
        "severe" => Ok(Severity::Severe),
        "critical" => Ok(Severity::Critical),
        other => Err(format!(
            "unknown severity '{other}', expected minor|moderate|severe|critical"
        )),
    }
}
