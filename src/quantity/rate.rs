use std::fmt::{Debug, Display, Formatter};

/// Dollars per kilowatt-hour.
quantity!(KilowattHourRate);

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} $/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}$/kWh", self.0)
    }
}
