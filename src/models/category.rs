//! Construction trade categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade category of a BOQ item or a scheduled activity.
///
/// Closed set. A BOQ item is classified to exactly one category, but its
/// sub-activities may span several (concrete work yields formwork and
/// reinforcement activities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityCategory {
    Excavation,
    Concrete,
    Reinforcement,
    Formwork,
    Masonry,
    Plastering,
    Tiling,
    Painting,
    Carpentry,
    Plumbing,
    Electrical,
    #[serde(rename = "HVAC")]
    Hvac,
    Insulation,
    Generic,
}

impl ActivityCategory {
    /// Every category, in declaration order.
    pub const ALL: [ActivityCategory; 14] = [
        Self::Excavation,
        Self::Concrete,
        Self::Reinforcement,
        Self::Formwork,
        Self::Masonry,
        Self::Plastering,
        Self::Tiling,
        Self::Painting,
        Self::Carpentry,
        Self::Plumbing,
        Self::Electrical,
        Self::Hvac,
        Self::Insulation,
        Self::Generic,
    ];

    /// Three-letter code used as the first WBS segment.
    pub fn code(self) -> &'static str {
        match self {
            Self::Excavation => "EXC",
            Self::Concrete => "CON",
            Self::Reinforcement => "RFT",
            Self::Formwork => "FRM",
            Self::Masonry => "MAS",
            Self::Plastering => "PLS",
            Self::Tiling => "TIL",
            Self::Painting => "PNT",
            Self::Carpentry => "CRP",
            Self::Plumbing => "PLB",
            Self::Electrical => "ELE",
            Self::Hvac => "HVC",
            Self::Insulation => "INS",
            Self::Generic => "GEN",
        }
    }

    /// Whether outdoor weather affects this trade.
    ///
    /// Only these categories receive weather advisories.
    pub fn is_weather_sensitive(self) -> bool {
        matches!(
            self,
            Self::Excavation | Self::Concrete | Self::Plastering | Self::Painting | Self::Insulation
        )
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Hvac => "HVAC",
            other => return write!(f, "{other:?}"),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_unique() {
        let codes: HashSet<&str> = ActivityCategory::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), ActivityCategory::ALL.len());
    }

    #[test]
    fn test_display() {
        assert_eq!(ActivityCategory::Hvac.to_string(), "HVAC");
        assert_eq!(ActivityCategory::Concrete.to_string(), "Concrete");
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&ActivityCategory::Hvac).unwrap();
        assert_eq!(json, "\"HVAC\"");
        let back: ActivityCategory = serde_json::from_str("\"Tiling\"").unwrap();
        assert_eq!(back, ActivityCategory::Tiling);
    }

    #[test]
    fn test_weather_sensitive() {
        assert!(ActivityCategory::Concrete.is_weather_sensitive());
        assert!(!ActivityCategory::Electrical.is_weather_sensitive());
    }
}
