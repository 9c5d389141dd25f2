use serde::Serialize;

use super::domain::{Accident, AccidentId, Coordinate, Responder, ResponderId, Role};

/// Address resolution boundary; the provider integration lives outside the core.
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text address. `Ok(None)` means the address could not
    /// be located, which is distinct from the provider being unreachable.
    fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

/// Geocoding transport failure.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder unavailable: {0}")]
    Unavailable(String),
}

/// Read side of the responder registry queried during assignment.
pub trait ResponderDirectory: Send + Sync {
    /// Snapshot of active responders for one role. Staleness relative to
    /// concurrent registrations is tolerated.
    fn active(&self, role: Role) -> Result<Vec<Responder>, DirectoryError>;
}

/// Responder directory failure.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("responder directory unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `update` must replace the record atomically; concurrent confirmations on
/// the same accident serialize here, last write wins.
pub trait AccidentRepository: Send + Sync {
    fn insert(&self, accident: Accident) -> Result<Accident, RepositoryError>;
    fn update(&self, accident: Accident) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AccidentId) -> Result<Option<Accident>, RepositoryError>;
    fn assigned_to(
        &self,
        responder: &ResponderId,
        role: Role,
    ) -> Result<Vec<Accident>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Creation receipt returned to the reporting caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedAccident {
    pub accident_id: AccidentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_police: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Accident> for CreatedAccident {
    fn from(accident: &Accident) -> Self {
        Self {
            accident_id: accident.id.clone(),
            assigned_hospital: accident
                .assigned_hospital
                .as_ref()
                .map(|slot| slot.organization_name.clone()),
            assigned_police: accident
                .assigned_police
                .as_ref()
                .map(|slot| slot.organization_name.clone()),
            image_url: accident.image_ref.as_deref().map(media_url),
        }
    }
}

/// Projection of a dispatched accident for responder-facing listings.
#[derive(Debug, Clone, Serialize)]
pub struct AccidentView {
    pub accident_id: AccidentId,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: &'static str,
    pub severity_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_police: Option<String>,
    pub hospital_status: &'static str,
    pub police_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub reported_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Accident> for AccidentView {
    fn from(accident: &Accident) -> Self {
        Self {
            accident_id: accident.id.clone(),
            address: accident.address.clone(),
            lat: accident.location.lat,
            lng: accident.location.lng,
            description: accident.description.clone(),
            severity: accident.severity.label(),
            severity_score: accident.severity_score,
            assigned_hospital: accident
                .assigned_hospital
                .as_ref()
                .map(|slot| slot.organization_name.clone()),
            assigned_police: accident
                .assigned_police
                .as_ref()
                .map(|slot| slot.organization_name.clone()),
            hospital_status: accident.hospital_status.label(),
            police_status: accident.police_status.label(),
            image_url: accident.image_ref.as_deref().map(media_url),
            reported_at: accident.reported_at,
        }
    }
}

fn media_url(storage_key: &str) -> String {
    format!("/media/{storage_key}")
}
