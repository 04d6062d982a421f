use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::date::days_before;
use crate::{Diagnostic, ValidationError};

/// Trailing window over which prices are requested and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Self; 6] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
    ];

    /// Used whenever a label cannot be resolved.
    pub const DEFAULT: Self = Self::ThreeMonths;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::TwoYears => "2Y",
            Self::FiveYears => "5Y",
        }
    }

    pub const fn days(self) -> i64 {
        match self {
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
        }
    }

    /// Range parameter understood by the remote chart API.
    pub const fn vendor_range(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// Inclusive `[as_of - days, as_of]` window.
    pub fn window(self, as_of: Date) -> (Date, Date) {
        (days_before(as_of, self.days()), as_of)
    }

    /// Lenient resolution: unknown labels fall back to [`Period::DEFAULT`]
    /// and yield an `InvalidPeriod` diagnostic instead of failing.
    pub fn resolve(label: &str) -> (Self, Option<Diagnostic>) {
        match Self::from_str(label) {
            Ok(period) => (period, None),
            Err(_) => (
                Self::DEFAULT,
                Some(Diagnostic::InvalidPeriod {
                    label: label.to_owned(),
                    fallback: Self::DEFAULT,
                }),
            ),
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" | "1mo" => Ok(Self::OneMonth),
            "3m" | "3mo" => Ok(Self::ThreeMonths),
            "6m" | "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            _ => Err(ValidationError::InvalidPeriod {
                value: value.to_owned(),
            }),
        }
    }
}
