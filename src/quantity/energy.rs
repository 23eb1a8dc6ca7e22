use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{cost::Cost, rate::KilowattHourRate};

quantity!(KilowattHours);

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)?;
        write!(f, "kWh")
    }
}

impl Mul<KilowattHourRate> for KilowattHours {
    type Output = Cost;

    fn mul(self, rhs: KilowattHourRate) -> Self::Output {
        Cost(self.0 * rhs.0)
    }
}
