// ⚠️ Redistribution errors
// Every variant is recoverable: the UI shows it as a transient message and stops

use crate::facility::FacilityId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RedistributionError {
    #[error("Facility {0} not found")]
    SourceNotFound(FacilityId),

    #[error("Facility record {0} no longer exists")]
    RecordNotFound(FacilityId),

    #[error("No Safe facility is available to receive load from facility {0}")]
    NoTargetAvailable(FacilityId),

    /// Capacity too low for the transfer formula to move anything
    #[error("Facility {id} at {capacity_percent}% has nothing to redistribute")]
    NothingToRedistribute { id: FacilityId, capacity_percent: u8 },

    #[error("No facility is currently in Overload")]
    NoOverloadedFacility,

    #[error("Facility {0} cannot redistribute to itself")]
    SelfTransfer(FacilityId),

    /// The confirmed plan differs from what the current data yields
    #[error("Plan for facility {0} is out of date; request a new plan")]
    StalePlan(FacilityId),
}

impl RedistributionError {
    /// Missing records are errors; the rest are warnings
    pub fn is_missing_record(&self) -> bool {
        matches!(
            self,
            RedistributionError::SourceNotFound(_) | RedistributionError::RecordNotFound(_)
        )
    }
}

pub type RedistributionResult<T> = std::result::Result<T, RedistributionError>;
