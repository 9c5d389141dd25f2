use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    Accident, AccidentAssignment, AccidentId, AccidentReport, ConfirmationStatus, Coordinate,
    Decision, Responder, ResponderId, ResponderIdentity, Role,
};
use super::locator;
use super::repository::{
    AccidentRepository, AccidentView, CreatedAccident, DirectoryError, GeocodeError, Geocoder,
    RepositoryError, ResponderDirectory,
};

/// Policy knobs for confirmation handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchConfig {
    /// When set, a status track that already reached accepted or rejected
    /// refuses further decisions. Off by default, which lets responders
    /// correct an earlier answer by overwriting it.
    pub lock_final_decision: bool,
}

/// Service composing the geocoder, responder directory, and accident store.
pub struct AccidentDispatchService<G, D, R> {
    geocoder: Arc<G>,
    directory: Arc<D>,
    repository: Arc<R>,
    config: DispatchConfig,
}

static ACCIDENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_accident_id() -> AccidentId {
    let id = ACCIDENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccidentId(format!("acc-{id:06}"))
}

impl<G, D, R> AccidentDispatchService<G, D, R>
where
    G: Geocoder + 'static,
    D: ResponderDirectory + 'static,
    R: AccidentRepository + 'static,
{
    pub fn new(geocoder: Arc<G>, directory: Arc<D>, repository: Arc<R>) -> Self {
        Self::with_config(geocoder, directory, repository, DispatchConfig::default())
    }

    pub fn with_config(
        geocoder: Arc<G>,
        directory: Arc<D>,
        repository: Arc<R>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            geocoder,
            directory,
            repository,
            config,
        }
    }

    /// Create an accident: geocode, pick the nearest responder per role,
    /// persist with both confirmation tracks pending.
    ///
    /// Geocoding failure aborts before any write. A role with no eligible
    /// responder leaves its slot unset; that is not an error.
    pub fn report(&self, report: AccidentReport) -> Result<CreatedAccident, DispatchServiceError> {
        let location = self
            .geocoder
            .resolve(&report.address)?
            .ok_or(DispatchServiceError::InvalidAddress)?;

        let assigned_hospital = self.nearest_assignment(location, Role::Hospital)?;
        let assigned_police = self.nearest_assignment(location, Role::Police)?;

        let accident = Accident {
            id: next_accident_id(),
            address: report.address,
            location,
            description: report.description,
            severity: report.severity,
            severity_score: report.severity_score,
            image_ref: report.image_ref,
            assigned_hospital,
            assigned_police,
            hospital_status: ConfirmationStatus::Pending,
            police_status: ConfirmationStatus::Pending,
            reported_at: Utc::now(),
        };

        let stored = self.repository.insert(accident)?;
        Ok(CreatedAccident::from(&stored))
    }

    fn nearest_assignment(
        &self,
        location: Coordinate,
        role: Role,
    ) -> Result<Option<AccidentAssignment>, DispatchServiceError> {
        let snapshot = self.directory.active(role)?;
        Ok(locator::nearest(location, role, &snapshot).map(assignment_snapshot))
    }

    /// List accidents assigned to the caller under the requested role.
    pub fn assigned(
        &self,
        identity: &ResponderIdentity,
        role: Role,
    ) -> Result<Vec<AccidentView>, DispatchServiceError> {
        if identity.role != role {
            return Err(DispatchServiceError::RoleMismatch {
                requested: role,
                actual: identity.role,
            });
        }

        let accidents = self.repository.assigned_to(&identity.id, role)?;
        Ok(accidents.iter().map(AccidentView::from).collect())
    }

    /// Record an assigned responder's decision on exactly one status track.
    ///
    /// The caller can only ever touch the track whose slot names them; the
    /// other role's track is never read or written here.
    pub fn respond(
        &self,
        accident_id: &AccidentId,
        responder: &ResponderId,
        decision: Decision,
    ) -> Result<AccidentView, DispatchServiceError> {
        let mut accident = self
            .repository
            .fetch(accident_id)?
            .ok_or(RepositoryError::NotFound)?;

        let role = accident
            .assigned_role(responder)
            .ok_or(DispatchServiceError::Unauthorized)?;

        if self.config.lock_final_decision && accident.status(role).is_final() {
            return Err(DispatchServiceError::AlreadyDecided {
                status: accident.status(role),
            });
        }

        accident.set_status(role, decision.status());
        self.repository.update(accident.clone())?;

        Ok(AccidentView::from(&accident))
    }
}

fn assignment_snapshot(responder: &Responder) -> AccidentAssignment {
    AccidentAssignment {
        responder_id: responder.id.clone(),
        organization_name: responder.organization_name.clone(),
    }
}

/// Error raised by the dispatch service.
#[derive(Debug, thiserror::Error)]
pub enum DispatchServiceError {
    #[error("invalid accident address")]
    InvalidAddress,
    #[error("caller is not assigned to this accident")]
    Unauthorized,
    #[error("caller role '{}' does not match requested filter '{}'", actual.label(), requested.label())]
    RoleMismatch { requested: Role, actual: Role },
    #[error("decision already recorded as '{}'", status.label())]
    AlreadyDecided { status: ConfirmationStatus },
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
