//! Nearest-responder selection over a directory snapshot.
//!
//! Distance metric: haversine great-circle distance. At single-metro scale
//! it orders candidates identically to true surface distance, and unlike a
//! planar approximation it stays honest near the region's edges. Ties are
//! broken by the smaller responder id so repeated calls over the same
//! snapshot always return the same responder.

use super::domain::{Coordinate, Responder, Role};

/// Select the closest active responder of `role`, or `None` when the
/// snapshot holds no eligible candidate.
pub fn nearest(origin: Coordinate, role: Role, candidates: &[Responder]) -> Option<&Responder> {
    let mut best: Option<(f64, &Responder)> = None;

    for responder in candidates
        .iter()
        .filter(|candidate| candidate.active && candidate.role == role)
    {
        let distance = origin.distance_meters(responder.location);
        let closer = match best {
            None => true,
            Some((best_distance, best_responder)) => {
                distance < best_distance
                    || (distance == best_distance && responder.id < best_responder.id)
            }
        };
        if closer {
            best = Some((distance, responder));
        }
    }

    best.map(|(_, responder)| responder)
}
