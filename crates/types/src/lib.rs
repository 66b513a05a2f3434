//! Validated identifier types shared across the SOMA crates.
//!
//! The body-map wire contract pivots on a fixed enumeration of anatomical
//! zones. [`BodyZone`] is the strict, parsed form of that enumeration: wire
//! payloads serialise zones as snake_case strings, and anything outside the
//! canonical set fails to parse. Lenient call sites (the payload resolver,
//! which must ignore unknown zones rather than reject a response) discard the
//! error; strict call sites (CLI arguments) surface it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    /// The input did not name a canonical body zone
    #[error("unrecognised body zone: '{0}'")]
    Unrecognised(String),
}

/// The canonical set of interactive anatomical zones.
///
/// This set is part of the contract between the front end and the analysis
/// backend. Zones the backend invents beyond this set are never rendered;
/// legacy responses may omit `neck`. The declaration order is the head-to-toe
/// render order of the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BodyZone {
    Head,
    Neck,
    Chest,
    SolarPlexus,
    Abdomen,
    Pelvis,
    Extremities,
}

impl BodyZone {
    /// All canonical zones, in head-to-toe render order.
    pub const ALL: [BodyZone; 7] = [
        BodyZone::Head,
        BodyZone::Neck,
        BodyZone::Chest,
        BodyZone::SolarPlexus,
        BodyZone::Abdomen,
        BodyZone::Pelvis,
        BodyZone::Extremities,
    ];

    /// Parses a wire zone name into a canonical zone.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::Unrecognised`] for any input outside the canonical
    /// set. Matching is exact: no case folding, no whitespace trimming, since
    /// the wire contract specifies the snake_case keys verbatim.
    pub fn parse(input: &str) -> Result<Self, ZoneError> {
        match input {
            "head" => Ok(BodyZone::Head),
            "neck" => Ok(BodyZone::Neck),
            "chest" => Ok(BodyZone::Chest),
            "solar_plexus" => Ok(BodyZone::SolarPlexus),
            "abdomen" => Ok(BodyZone::Abdomen),
            "pelvis" => Ok(BodyZone::Pelvis),
            "extremities" => Ok(BodyZone::Extremities),
            other => Err(ZoneError::Unrecognised(other.to_string())),
        }
    }

    /// Returns the wire name of the zone.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyZone::Head => "head",
            BodyZone::Neck => "neck",
            BodyZone::Chest => "chest",
            BodyZone::SolarPlexus => "solar_plexus",
            BodyZone::Abdomen => "abdomen",
            BodyZone::Pelvis => "pelvis",
            BodyZone::Extremities => "extremities",
        }
    }

    /// Returns the human-readable label (wire name with spaces).
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for BodyZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BodyZone {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BodyZone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BodyZone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_every_canonical_zone() {
        for zone in BodyZone::ALL {
            assert_eq!(BodyZone::parse(zone.as_str()).unwrap(), zone);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_zone() {
        let err = BodyZone::parse("left_knee").expect_err("should reject unknown zone");
        assert!(matches!(err, ZoneError::Unrecognised(name) if name == "left_knee"));
    }

    #[test]
    fn test_parse_is_exact_match_only() {
        assert!(BodyZone::parse("Head").is_err());
        assert!(BodyZone::parse(" head").is_err());
        assert!(BodyZone::parse("solar plexus").is_err());
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let json = serde_json::to_string(&BodyZone::SolarPlexus).unwrap();
        assert_eq!(json, "\"solar_plexus\"");
        let back: BodyZone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BodyZone::SolarPlexus);
    }

    #[test]
    fn test_deserialize_rejects_unknown_zone() {
        let result = serde_json::from_str::<BodyZone>("\"tail\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_label_replaces_underscores() {
        assert_eq!(BodyZone::SolarPlexus.label(), "solar plexus");
        assert_eq!(BodyZone::Head.label(), "head");
    }
}
