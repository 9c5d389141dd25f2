//! Accident dispatch core.
//!
//! Routes a reported accident to the geographically nearest hospital and
//! police responders, fixes both assignments at creation time, and tracks
//! each responder's acceptance or rejection independently.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod telemetry;
