use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::dispatch::domain::{
    Accident, AccidentId, AccidentReport, Coordinate, Responder, ResponderId, ResponderIdentity,
    Role, Severity,
};
use crate::dispatch::repository::{
    AccidentRepository, DirectoryError, GeocodeError, Geocoder, RepositoryError,
    ResponderDirectory,
};
use crate::dispatch::router::dispatch_router;
use crate::dispatch::service::{AccidentDispatchService, DispatchConfig};

pub(super) fn responder(id: &str, name: &str, role: Role, lat: f64, lng: f64) -> Responder {
    Responder {
        id: ResponderId(id.to_string()),
        organization_name: name.to_string(),
        role,
        location: Coordinate::new(lat, lng),
        active: true,
    }
}

/// Fixture set covering one metro region. `hospital-9` is close to every
/// query address but inactive, so it must never win.
pub(super) fn metro_responders() -> Vec<Responder> {
    let mut inactive = responder(
        "hospital-9",
        "Shuttered Clinic",
        Role::Hospital,
        13.0878,
        80.2097,
    );
    inactive.active = false;

    vec![
        responder(
            "hospital-1",
            "Apollo Greams Road",
            Role::Hospital,
            13.0604,
            80.2496,
        ),
        responder(
            "hospital-2",
            "Stanley Medical College",
            Role::Hospital,
            13.1067,
            80.2847,
        ),
        responder(
            "police-1",
            "T. Nagar Police Station",
            Role::Police,
            13.0418,
            80.2341,
        ),
        responder(
            "police-2",
            "Anna Nagar Police Station",
            Role::Police,
            13.0850,
            80.2101,
        ),
        inactive,
    ]
}

pub(super) fn hospital_identity() -> ResponderIdentity {
    ResponderIdentity {
        id: ResponderId("hospital-1".to_string()),
        role: Role::Hospital,
    }
}

pub(super) fn police_identity() -> ResponderIdentity {
    ResponderIdentity {
        id: ResponderId("police-2".to_string()),
        role: Role::Police,
    }
}

pub(super) fn report() -> AccidentReport {
    AccidentReport {
        address: "Anna Nagar, Chennai".to_string(),
        description: Some("Two-wheeler collision at the roundabout".to_string()),
        severity: Severity::Severe,
        severity_score: 7.5,
        image_ref: Some("accidents/acc-1/photo.jpg".to_string()),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    pub(super) responders: Arc<Mutex<Vec<Responder>>>,
}

impl MemoryDirectory {
    pub(super) fn with(responders: Vec<Responder>) -> Self {
        Self {
            responders: Arc::new(Mutex::new(responders)),
        }
    }
}

impl ResponderDirectory for MemoryDirectory {
    fn active(&self, role: Role) -> Result<Vec<Responder>, DirectoryError> {
        let guard = self.responders.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|responder| responder.active && responder.role == role)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct TableGeocoder {
    table: HashMap<String, Coordinate>,
}

impl TableGeocoder {
    pub(super) fn metro() -> Self {
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
        Self { table }
    }
}

impl Geocoder for TableGeocoder {
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Ok(self
            .table
            .get(&address.trim().to_ascii_lowercase())
            .copied())
    }
}

pub(super) struct UnavailableGeocoder;

impl Geocoder for UnavailableGeocoder {
    fn resolve(&self, _address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Err(GeocodeError::Unavailable("provider offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AccidentId, Accident>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<Accident> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .is_empty()
    }
}

impl AccidentRepository for MemoryRepository {
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

pub(super) struct UnavailableRepository;

impl AccidentRepository for UnavailableRepository {
    fn insert(&self, _accident: Accident) -> Result<Accident, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _accident: Accident) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AccidentId) -> Result<Option<Accident>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn assigned_to(
        &self,
        _responder: &ResponderId,
        _role: Role,
    ) -> Result<Vec<Accident>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService =
    AccidentDispatchService<TableGeocoder, MemoryDirectory, MemoryRepository>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>) {
    build_service_with(metro_responders(), DispatchConfig::default())
}

pub(super) fn build_service_with(
    responders: Vec<Responder>,
    config: DispatchConfig,
) -> (MemoryService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AccidentDispatchService::with_config(
        Arc::new(TableGeocoder::metro()),
        Arc::new(MemoryDirectory::with(responders)),
        repository.clone(),
        config,
    );
    (service, repository)
}

pub(super) fn dispatch_router_with_service(service: MemoryService) -> axum::Router {
    dispatch_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
