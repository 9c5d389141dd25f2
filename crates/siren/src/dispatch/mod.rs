//! Accident dispatch: assignment and dual-party confirmation.
//!
//! An incoming report is geocoded once, the nearest active hospital and
//! police responders are fixed into the record at creation, and each
//! assigned responder then accepts or rejects independently through its
//! own confirmation track.

pub mod domain;
pub mod locator;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Accident, AccidentAssignment, AccidentId, AccidentReport, ConfirmationStatus, Coordinate,
    Decision, Responder, ResponderId, ResponderIdentity, Role, Severity, UnknownRole,
};
pub use repository::{
    AccidentRepository, AccidentView, CreatedAccident, DirectoryError, GeocodeError, Geocoder,
    RepositoryError, ResponderDirectory,
};
pub use router::dispatch_router;
pub use service::{AccidentDispatchService, DispatchConfig, DispatchServiceError};
