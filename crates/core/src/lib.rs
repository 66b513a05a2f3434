//! # SOMA Core
//!
//! Body-map visualization core for the SOMA research assistant front end.
//!
//! This crate contains pure presentation logic with no I/O:
//! - Resolution of heterogeneous backend payload shapes into one canonical
//!   per-zone form (`payload`)
//! - Count-to-color/opacity mapping for the diagram (`intensity`)
//! - The hover/select/structure interaction state machine (`interaction`)
//! - Per-zone code grouping for the detail panel (`aggregate`)
//! - Derived view models and SVG rendering (`view`, `svg`)
//!
//! **No transport concerns**: HTTP access to the analysis backend belongs in
//! `soma-client`; serving rendered views belongs in the `soma-run` binary.
//!
//! Every operation here is total: malformed or missing wire data degrades to
//! empty defaults rather than an error, so a render can never fail.

pub mod aggregate;
pub mod intensity;
pub mod interaction;
pub mod payload;
pub mod svg;
pub mod view;

pub use aggregate::{group_codes, CodeGroup};
pub use interaction::InteractionState;
pub use payload::{AnalysisPayload, BodyMapData, CodeReference, StructureBodyMap, ZoneRecord};
pub use view::BodyMapView;

/// Rendering mode of a resolved body map.
///
/// Structural payloads carry per-code frequency detail and use the tiered
/// color bands; legacy payloads carry only counts and quotes and collapse to
/// a single accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Structural,
    Legacy,
}
