use chrono::NaiveDateTime;

use crate::quantity::energy::KilowattHours;

/// One hourly meter observation.
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Constructor)]
pub struct Reading {
    /// Naive local time of the hour the energy was consumed in.
    pub timestamp: NaiveDateTime,

    pub energy: KilowattHours,
}
