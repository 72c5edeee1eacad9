use thiserror::Error;

use super::orbit::OrbitType;
use crate::math::root_finding::RootFindingError;

/// Everything that can go wrong when building orbits or solving transfers.
///
/// All of these are recoverable: a caller sweeping many cases can drop the
/// failed one and carry on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    #[error("state is not on a closed orbit (vis-viva gives a semi-major axis of {semi_major_axis})")]
    UnboundTrajectory { semi_major_axis: f64 },

    #[error(
        "semi-major axis {semi_major_axis} is below the minimum-energy transfer ({minimum}); \
         parabolic and hyperbolic transfers are not supported"
    )]
    UnsupportedTransferType { semi_major_axis: f64, minimum: f64 },

    #[error("operation is only defined for closed orbits, not {0:?} ones")]
    UnsupportedOrbitType(OrbitType),

    #[error("eccentricity {0} does not describe a conic section")]
    InvalidEccentricity(f64),

    #[error("endpoints orbit different central bodies (mu = {start_mu} vs. {end_mu})")]
    InconsistentCentralBody { start_mu: f64, end_mu: f64 },

    #[error("cannot take the direction of the zero-length {0} vector")]
    NumericalDegeneracy(&'static str),

    #[error(transparent)]
    RootFinding(#[from] RootFindingError),
}
