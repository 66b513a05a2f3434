//! Backend payload resolution.
//!
//! The analysis backend has produced body-map data in several shapes over its
//! lifetime. This module resolves whichever shape arrives into one canonical
//! form, exactly once, at data-entry time, so the rest of the crate never
//! performs a defensive lookup against raw JSON.
//!
//! Shape detection order (first match wins):
//! 1. an object with a non-empty `structures` array: one body map per
//!    experiential structure ([`AnalysisPayload::Structural`]);
//! 2. a flat zone-name to record mapping, either at the top level or nested
//!    one level under `body_map_data` ([`AnalysisPayload::Legacy`]);
//! 3. anything else: no body-map data at all ([`AnalysisPayload::Empty`]).
//!
//! Resolution never fails. Unknown zone keys are skipped (the backend may add
//! zones before the renderer learns to draw them), malformed records are
//! skipped with a warning, and lookups for absent zones yield a shared empty
//! record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use soma_types::BodyZone;
use std::collections::BTreeMap;

use crate::MapMode;

/// A single coded observation attributed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeReference {
    /// The analysis code string, e.g. `chest-pressure-intense-negative`.
    #[serde(default)]
    pub code: String,
    /// The participant the observation belongs to, e.g. `P21`.
    #[serde(default)]
    pub participant_id: String,
    /// How often the participant expressed the code; at least 1.
    #[serde(default = "default_frequency")]
    pub frequency: u32,
}

fn default_frequency() -> u32 {
    1
}

/// Everything the backend reports for one anatomical zone.
///
/// `count` is authoritative for coloring even when it disagrees with
/// `codes.len()`: the backend may count occurrences differently from the
/// references it lists, and reconciling the two here would silently mask a
/// backend data-quality problem. `codes` and `quotes` are authoritative for
/// detail content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub codes: Vec<CodeReference>,
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// Backing storage for the defaulted lookups; a `static` so borrows of the
/// empty record and map outlive any payload.
static EMPTY_RECORD: ZoneRecord = ZoneRecord::EMPTY;
static EMPTY_DATA: BodyMapData = BodyMapData::EMPTY;

impl ZoneRecord {
    /// The record every absent zone resolves to.
    pub const EMPTY: ZoneRecord = ZoneRecord {
        count: 0,
        codes: Vec::new(),
        quotes: Vec::new(),
    };

    /// Whether the zone has anything to show (drives click and tooltip
    /// eligibility).
    pub fn has_observations(&self) -> bool {
        self.count > 0
    }
}

/// Canonical per-view mapping from zone to record.
///
/// Lookups are total: a zone the payload never mentioned resolves to
/// [`ZoneRecord::EMPTY`] rather than an error or an `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BodyMapData(BTreeMap<BodyZone, ZoneRecord>);

impl BodyMapData {
    /// A map with no zones at all.
    pub const EMPTY: BodyMapData = BodyMapData(BTreeMap::new());

    pub fn new(zones: BTreeMap<BodyZone, ZoneRecord>) -> Self {
        Self(zones)
    }

    /// Returns the record for `zone`, or the shared empty record if the
    /// payload never mentioned it.
    pub fn zone(&self, zone: BodyZone) -> &ZoneRecord {
        self.0.get(&zone).unwrap_or(&EMPTY_RECORD)
    }

    /// Whether the payload mentioned no zone at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyZone, &ZoneRecord)> {
        self.0.iter().map(|(zone, record)| (*zone, record))
    }
}

impl<'de> Deserialize<'de> for BodyMapData {
    /// Lenient zone-map deserialisation.
    ///
    /// Keys outside the canonical zone set are dropped silently (forward
    /// compatibility with backend-only zones); values that do not parse as a
    /// zone record are dropped with a warning. This never rejects the
    /// surrounding document.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self(collect_zones(raw.iter())))
    }
}

/// Filters a raw key/value view down to well-formed canonical zone records.
fn collect_zones<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> BTreeMap<BodyZone, ZoneRecord> {
    let mut zones = BTreeMap::new();
    for (key, raw) in entries {
        let Ok(zone) = BodyZone::parse(key) else {
            continue;
        };
        match serde_json::from_value::<ZoneRecord>(raw.clone()) {
            Ok(record) => {
                zones.insert(zone, record);
            }
            Err(err) => {
                tracing::warn!(zone = key.as_str(), %err, "skipping malformed zone record");
            }
        }
    }
    zones
}

/// One clustering result: the body map of a single experiential structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureBodyMap {
    #[serde(default)]
    pub structure_id: i64,
    #[serde(default)]
    pub structure_name: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub zones: BodyMapData,
}

/// The resolved form of a backend analysis payload.
///
/// Resolved once from untyped JSON via [`AnalysisPayload::from_value`]; the
/// rest of the crate operates on this tagged union only.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    /// One body map per experiential structure, switchable in the UI.
    Structural(Vec<StructureBodyMap>),
    /// A single flat zone mapping with counts and quotes only.
    Legacy(BodyMapData),
    /// Nothing recognisable; the UI shows an explicit empty state.
    Empty,
}

impl AnalysisPayload {
    /// Resolves a raw backend payload. Never fails; see the module docs for
    /// the detection order.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return AnalysisPayload::Empty;
        };

        if let Some(structures) = object.get("structures").and_then(Value::as_array) {
            if !structures.is_empty() {
                let parsed = structures
                    .iter()
                    .map(|raw| {
                        serde_json::from_value::<StructureBodyMap>(raw.clone()).unwrap_or_else(
                            |err| {
                                tracing::warn!(%err, "skipping malformed structure body map");
                                StructureBodyMap::default()
                            },
                        )
                    })
                    .collect();
                return AnalysisPayload::Structural(parsed);
            }
        }

        // Legacy shape: flat zone mapping, possibly one level down.
        let flat = object
            .get("body_map_data")
            .and_then(Value::as_object)
            .unwrap_or(object);
        let zones = collect_zones(flat.iter());
        if zones.is_empty() {
            AnalysisPayload::Empty
        } else {
            AnalysisPayload::Legacy(BodyMapData::new(zones))
        }
    }

    /// The rendering mode, or `None` for an empty payload.
    pub fn mode(&self) -> Option<MapMode> {
        match self {
            AnalysisPayload::Structural(_) => Some(MapMode::Structural),
            AnalysisPayload::Legacy(_) => Some(MapMode::Legacy),
            AnalysisPayload::Empty => None,
        }
    }

    /// The experiential structures, empty unless the payload is structural.
    pub fn structures(&self) -> &[StructureBodyMap] {
        match self {
            AnalysisPayload::Structural(structures) => structures,
            _ => &[],
        }
    }

    /// How many structures the user can switch among.
    pub fn structure_count(&self) -> usize {
        self.structures().len()
    }

    /// The zone map to render for the given structure index.
    ///
    /// Legacy payloads have a single map regardless of index; an out-of-range
    /// index on a structural payload resolves to the empty map rather than
    /// panicking.
    pub fn zones(&self, structure_index: usize) -> &BodyMapData {
        match self {
            AnalysisPayload::Structural(structures) => structures
                .get(structure_index)
                .map(|structure| &structure.zones)
                .unwrap_or(&EMPTY_DATA),
            AnalysisPayload::Legacy(zones) => zones,
            AnalysisPayload::Empty => &EMPTY_DATA,
        }
    }

    /// The display name of the given structure, if the payload is structural
    /// and the structure has a non-empty name.
    pub fn structure_name(&self, structure_index: usize) -> Option<&str> {
        self.structures()
            .get(structure_index)
            .map(|structure| structure.structure_name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AnalysisPayload::Empty)
    }
}
