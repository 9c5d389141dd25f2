use crate::infra::{InMemoryAccidentRepository, InMemoryResponderDirectory, StaticGeocoder};
use clap::Args;
use siren::dispatch::{
    AccidentDispatchService, AccidentReport, AccidentRepository, Decision, DispatchConfig,
    DispatchServiceError, RepositoryError, ResponderId, ResponderIdentity, Role, Severity,
};
use siren::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Accident address; must be one the demo geocoder table knows.
    #[arg(long, default_value = "Anna Nagar, Chennai")]
    pub(crate) address: String,
    /// Severity label (minor|moderate|severe|critical).
    #[arg(long, default_value = "severe", value_parser = crate::infra::parse_severity)]
    pub(crate) severity: Severity,
    /// Caller-supplied severity score; carried through unvalidated.
    #[arg(long, default_value_t = 7.5)]
    pub(crate) severity_score: f32,
    /// Refuse further decisions once a track is accepted or rejected.
    #[arg(long)]
    pub(crate) lock_final_decision: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryAccidentRepository::default());
    let service = AccidentDispatchService::with_config(
        Arc::new(StaticGeocoder::metro()),
        Arc::new(InMemoryResponderDirectory::seeded()),
        repository.clone(),
        DispatchConfig {
            lock_final_decision: args.lock_final_decision,
        },
    );

    println!("Accident dispatch demo");
    println!("  address: {}", args.address);

    let created = service.report(AccidentReport {
        address: args.address.clone(),
        description: Some("Reported via demo CLI".to_string()),
        severity: args.severity,
        severity_score: args.severity_score,
        image_ref: None,
    })?;

    println!("  accident: {}", created.accident_id.0);
    match created.assigned_hospital.as_deref() {
        Some(name) => println!("  nearest hospital: {name}"),
        None => println!("  nearest hospital: none eligible"),
    }
    match created.assigned_police.as_deref() {
        Some(name) => println!("  nearest police: {name}"),
        None => println!("  nearest police: none eligible"),
    }

    let stored = repository
        .fetch(&created.accident_id)
        .map_err(DispatchServiceError::from)?
        .ok_or_else(|| DispatchServiceError::from(RepositoryError::NotFound))?;

    if let Some(slot) = &stored.assigned_hospital {
        let view = service.respond(&stored.id, &slot.responder_id, Decision::Accepted)?;
        println!(
            "  {} accepted (hospital_status={}, police_status={})",
            slot.organization_name, view.hospital_status, view.police_status
        );
    }

    if let Some(slot) = &stored.assigned_police {
        let view = service.respond(&stored.id, &slot.responder_id, Decision::Rejected)?;
        println!(
            "  {} rejected (hospital_status={}, police_status={})",
            slot.organization_name, view.hospital_status, view.police_status
        );
    }

    let outsider = ResponderId("hospital-999".to_string());
    match service.respond(&stored.id, &outsider, Decision::Accepted) {
        Err(DispatchServiceError::Unauthorized) => {
            println!("  unassigned responder blocked from confirming");
        }
        Ok(_) => println!("  unexpected: unassigned responder mutated the record"),
        Err(other) => return Err(other.into()),
    }

    if args.lock_final_decision {
        if let Some(slot) = &stored.assigned_hospital {
            match service.respond(&stored.id, &slot.responder_id, Decision::Rejected) {
                Err(DispatchServiceError::AlreadyDecided { .. }) => {
                    println!("  lock holds: hospital decision is final");
                }
                Ok(_) => println!("  unexpected: locked track accepted a new decision"),
                Err(other) => return Err(other.into()),
            }
        }
    }

    if let Some(slot) = &stored.assigned_hospital {
        let identity = ResponderIdentity {
            id: slot.responder_id.clone(),
            role: Role::Hospital,
        };
        let assigned = service.assigned(&identity, Role::Hospital)?;
        println!(
            "  {} now has {} assigned accident(s)",
            slot.organization_name,
            assigned.len()
        );
    }

    Ok(())
}
