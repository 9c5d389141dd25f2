use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Responder category a dispatch slot is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hospital,
    Police,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Hospital => "hospital",
            Role::Police => "police",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hospital" => Ok(Role::Hospital),
            "police" => Ok(Role::Police),
            other => Err(UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Raised when a role label does not name a known responder category.
#[derive(Debug, thiserror::Error)]
#[error("unknown responder role '{value}'")]
pub struct UnknownRole {
    pub value: String,
}

/// Geographic position in floating-point degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance to another point in meters.
    pub fn distance_meters(self, other: Coordinate) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_M * c
    }
}

/// Identifier wrapper for responder organizations.
///
/// Ordered so equidistant locator candidates resolve deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResponderId(pub String);

/// Directory record for one hospital or police organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responder {
    pub id: ResponderId,
    pub organization_name: String,
    pub role: Role,
    pub location: Coordinate,
    pub active: bool,
}

/// Authenticated caller claim supplied by the outer layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponderIdentity {
    pub id: ResponderId,
    pub role: Role,
}

/// Identifier wrapper for dispatched accidents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccidentId(pub String);

/// Caller-supplied severity label; the score alongside it is not range-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Critical => "critical",
        }
    }
}

/// Incoming accident submission before geocoding and assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentReport {
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub severity_score: f32,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// Snapshot of the responder chosen for one slot, fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentAssignment {
    pub responder_id: ResponderId,
    pub organization_name: String,
}

/// Per-role confirmation track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ConfirmationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ConfirmationStatus::Pending => "pending",
            ConfirmationStatus::Accepted => "accepted",
            ConfirmationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_final(self) -> bool {
        !matches!(self, ConfirmationStatus::Pending)
    }
}

/// Accept/reject verdict from an assigned responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub const fn status(self) -> ConfirmationStatus {
        match self {
            Decision::Accepted => ConfirmationStatus::Accepted,
            Decision::Rejected => ConfirmationStatus::Rejected,
        }
    }
}

/// Dispatched accident with both assignment slots fixed at creation time.
///
/// `location` is resolved from the address exactly once; later operations
/// never recompute it or reassign either slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accident {
    pub id: AccidentId,
    pub address: String,
    pub location: Coordinate,
    pub description: Option<String>,
    pub severity: Severity,
    pub severity_score: f32,
    pub image_ref: Option<String>,
    pub assigned_hospital: Option<AccidentAssignment>,
    pub assigned_police: Option<AccidentAssignment>,
    pub hospital_status: ConfirmationStatus,
    pub police_status: ConfirmationStatus,
    pub reported_at: DateTime<Utc>,
}

impl Accident {
    pub fn assignment(&self, role: Role) -> Option<&AccidentAssignment> {
        match role {
            Role::Hospital => self.assigned_hospital.as_ref(),
            Role::Police => self.assigned_police.as_ref(),
        }
    }

    /// Which slot, if any, names this responder as its assignee.
    pub fn assigned_role(&self, responder: &ResponderId) -> Option<Role> {
        if self
            .assigned_hospital
            .as_ref()
            .is_some_and(|slot| &slot.responder_id == responder)
        {
            return Some(Role::Hospital);
        }
        if self
            .assigned_police
            .as_ref()
            .is_some_and(|slot| &slot.responder_id == responder)
        {
            return Some(Role::Police);
        }
        None
    }

    pub fn status(&self, role: Role) -> ConfirmationStatus {
        match role {
            Role::Hospital => self.hospital_status,
            Role::Police => self.police_status,
        }
    }

    pub fn set_status(&mut self, role: Role, status: ConfirmationStatus) {
        match role {
            Role::Hospital => self.hospital_status = status,
            Role::Police => self.police_status = status,
        }
    }
}
