use chrono::Weekday;

/// Time-of-use pricing periods.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, derive_more::Display)]
pub enum TouPeriod {
    #[display("off-peak")]
    OffPeak,

    #[display("mid-peak")]
    MidPeak,

    #[display("on-peak")]
    OnPeak,
}

impl TouPeriod {
    pub const ALL: [Self; 3] = [Self::OffPeak, Self::MidPeak, Self::OnPeak];

    /// Classify an hour of day into its time-of-use period.
    ///
    /// Total over `0..24` × any weekday; weekends are off-peak around the
    /// clock. All windows are half-open, so hour 7 opens the morning peak
    /// and hour 19 already belongs to the evening off-peak.
    #[must_use]
    pub fn classify(hour: u32, weekday: Weekday) -> Self {
        if is_weekend(weekday) {
            return Self::OffPeak;
        }
        match hour {
            7..=10 | 17..=18 => Self::OnPeak,
            11..=16 => Self::MidPeak,
            _ => Self::OffPeak,
        }
    }
}

/// Ultra-low-overnight pricing periods.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, derive_more::Display)]
pub enum UloPeriod {
    #[display("ultra-low")]
    UltraLow,

    #[display("off-peak")]
    OffPeak,

    #[display("mid-peak")]
    MidPeak,

    #[display("on-peak")]
    OnPeak,
}

impl UloPeriod {
    pub const ALL: [Self; 4] = [Self::UltraLow, Self::OffPeak, Self::MidPeak, Self::OnPeak];

    /// Classify an hour of day into its ultra-low-overnight period.
    ///
    /// The overnight band (11PM–7AM) applies on every day of the week, so it
    /// is checked before the weekend rule.
    #[must_use]
    pub fn classify(hour: u32, weekday: Weekday) -> Self {
        if hour >= 23 || hour < 7 {
            return Self::UltraLow;
        }
        if is_weekend(weekday) {
            return Self::OffPeak;
        }
        match hour {
            16..=20 => Self::OnPeak,
            11..=16 => Self::MidPeak,
            _ => Self::OffPeak,
        }
    }
}

#[must_use]
pub fn is_weekend(weekday: Weekday) -> bool {
    weekday.num_days_from_monday() >= 5
}
