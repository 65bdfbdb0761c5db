// 🚦 Capacity Classifier - Status bands
// Turns a capacity percentage into Safe / Warning / Overload

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Highest capacity still classified as Safe
pub const SAFE_MAX: u8 = 70;

/// Highest capacity still classified as Warning
pub const WARNING_MAX: u8 = 85;

// ============================================================================
// STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// 0..=70
    Safe,

    /// 71..=85
    Warning,

    /// 86..
    Overload,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Safe, Status::Warning, Status::Overload];

    /// Machine key used in seed files and HTTP queries
    pub fn key(&self) -> &'static str {
        match self {
            Status::Safe => "safe",
            Status::Warning => "warning",
            Status::Overload => "overload",
        }
    }

    /// Display label shown on the monitoring table
    pub fn label(&self) -> &'static str {
        self.presentation().label
    }

    pub fn color_token(&self) -> &'static str {
        self.presentation().color
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            Status::Safe => Presentation { label: "Aman", color: "green" },
            Status::Warning => Presentation { label: "Peringatan", color: "yellow" },
            Status::Overload => Presentation { label: "Overload", color: "red" },
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safe" => Ok(Status::Safe),
            "warning" => Ok(Status::Warning),
            "overload" => Ok(Status::Overload),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Classify a capacity percentage.
///
/// Input is expected in 0..=100; values above 100 still land in Overload.
pub fn classify(capacity_percent: u8) -> Status {
    if capacity_percent <= SAFE_MAX {
        Status::Safe
    } else if capacity_percent <= WARNING_MAX {
        Status::Warning
    } else {
        Status::Overload
    }
}

// ============================================================================
// PRESENTATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub label: &'static str,
    pub color: &'static str,
}

impl Presentation {
    pub const UNKNOWN: Presentation = Presentation { label: "Unknown", color: "gray" };

    /// Lookup by an unvalidated external key (HTTP path, seed column); never fails
    ///
    /// Unrecognized keys get `UNKNOWN` instead of an error.
    pub fn for_key(key: &str) -> Presentation {
        key.parse::<Status>()
            .map(|status| status.presentation())
            .unwrap_or(Presentation::UNKNOWN)
    }
}

// ============================================================================
// TESTS
// ============================================================================
