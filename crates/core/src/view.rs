//! Derived view models.
//!
//! Everything the host UI needs to paint one frame, computed as a pure
//! function of the resolved payload and the interaction state. The tooltip
//! and detail panel are small, separately testable derivations;
//! [`BodyMapView::build`] assembles the whole frame.

use serde::Serialize;
use soma_types::BodyZone;

use crate::aggregate::{group_codes, CodeGroup};
use crate::intensity::{fill_color, fill_opacity, stroke_color, LegendEntry, LEGEND};
use crate::interaction::InteractionState;
use crate::payload::{AnalysisPayload, BodyMapData};
use crate::MapMode;

/// Title shown when the payload carries no structure name of its own.
pub const DEFAULT_TITLE: &str = "Corporeal Resonance Map";
/// Empty-state message shown instead of an empty diagram.
pub const NO_DATA_MESSAGE: &str = "No body map data available";
/// How many code references the tooltip previews before "+N more".
pub const TOOLTIP_SAMPLE_LIMIT: usize = 2;
/// How many verbatim quotes the structural detail panel appends.
pub const DETAIL_QUOTE_LIMIT: usize = 3;

/// One sample reference previewed in the tooltip, with the code shortened
/// for the constrained tooltip width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipSample {
    pub code: String,
    pub participant_id: String,
    pub frequency: u32,
}

/// Hover tooltip content for one zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneTooltip {
    pub zone: BodyZone,
    pub count: u32,
    /// Up to [`TOOLTIP_SAMPLE_LIMIT`] sample references.
    pub samples: Vec<TooltipSample>,
    /// How many further references exist beyond the samples.
    pub hidden: usize,
}

/// Derives the tooltip: shown iff a zone is hovered and it has observations.
pub fn tooltip(state: &InteractionState, zones: &BodyMapData) -> Option<ZoneTooltip> {
    let zone = state.hovered()?;
    let record = zones.zone(zone);
    if !record.has_observations() {
        return None;
    }
    Some(ZoneTooltip {
        zone,
        count: record.count,
        samples: record
            .codes
            .iter()
            .take(TOOLTIP_SAMPLE_LIMIT)
            .map(|reference| TooltipSample {
                code: short_code(&reference.code),
                participant_id: reference.participant_id.clone(),
                frequency: reference.frequency,
            })
            .collect(),
        hidden: record.codes.len().saturating_sub(TOOLTIP_SAMPLE_LIMIT),
    })
}

/// Shortens a code string to its first two dash-separated segments for
/// constrained displays (tooltips, CLI listings).
pub fn short_code(code: &str) -> String {
    let mut segments = code.splitn(3, '-');
    match (segments.next(), segments.next(), segments.next()) {
        (Some(first), Some(second), Some(_)) => format!("{first}-{second}..."),
        _ => code.to_string(),
    }
}

/// Detail panel content for the selected zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailPanel {
    /// Nothing selected yet: invite the user to click a zone.
    Prompt,
    /// Structural mode: one card per distinct code, plus a few quotes.
    Codes {
        zone: BodyZone,
        count: u32,
        groups: Vec<CodeGroup>,
        quotes: Vec<String>,
    },
    /// Legacy mode: the flat verbatim quote list.
    Quotes {
        zone: BodyZone,
        count: u32,
        quotes: Vec<String>,
    },
    /// The selected zone has nothing to show.
    NoData { zone: BodyZone },
}

/// Derives the detail panel for the current selection.
pub fn detail(state: &InteractionState, mode: MapMode, zones: &BodyMapData) -> DetailPanel {
    let Some(zone) = state.selected() else {
        return DetailPanel::Prompt;
    };
    let record = zones.zone(zone);
    match mode {
        MapMode::Structural => {
            if record.codes.is_empty() && record.quotes.is_empty() {
                DetailPanel::NoData { zone }
            } else {
                DetailPanel::Codes {
                    zone,
                    count: record.count,
                    groups: group_codes(&record.codes),
                    quotes: record.quotes.iter().take(DETAIL_QUOTE_LIMIT).cloned().collect(),
                }
            }
        }
        MapMode::Legacy => {
            if record.quotes.is_empty() {
                DetailPanel::NoData { zone }
            } else {
                DetailPanel::Quotes {
                    zone,
                    count: record.count,
                    quotes: record.quotes.clone(),
                }
            }
        }
    }
}

/// One button of the structure selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureTab {
    pub structure_id: i64,
    pub structure_name: String,
    pub participants: Vec<String>,
    pub active: bool,
}

/// Paint instructions for one zone of the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZonePaint {
    pub zone: BodyZone,
    pub count: u32,
    pub fill: &'static str,
    pub opacity: f64,
    pub stroke: &'static str,
}

/// Which of the three payload shapes the view was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Structural,
    Legacy,
    Empty,
}

/// The complete render model for one frame of the body-map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMapView {
    pub mode: ViewMode,
    pub title: String,
    /// Set in empty mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structure selector; the host shows it when more than one tab exists.
    pub tabs: Vec<StructureTab>,
    /// All canonical zones in render order.
    pub zones: Vec<ZonePaint>,
    /// Structural mode only; empty otherwise.
    pub legend: Vec<LegendEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<ZoneTooltip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailPanel>,
}

impl BodyMapView {
    /// Builds the render model for the current payload and interaction state.
    ///
    /// An empty payload produces the explicit empty state rather than a blank
    /// diagram; everything else is a per-zone paint plus the derived tooltip
    /// and detail panel.
    pub fn build(payload: &AnalysisPayload, state: &InteractionState) -> Self {
        let Some(mode) = payload.mode() else {
            return Self {
                mode: ViewMode::Empty,
                title: DEFAULT_TITLE.to_string(),
                message: Some(NO_DATA_MESSAGE.to_string()),
                tabs: Vec::new(),
                zones: Vec::new(),
                legend: Vec::new(),
                tooltip: None,
                detail: None,
            };
        };

        let zones = payload.zones(state.structure_index());
        let paints = BodyZone::ALL
            .iter()
            .map(|&zone| {
                let count = zones.zone(zone).count;
                ZonePaint {
                    zone,
                    count,
                    fill: fill_color(count, mode),
                    opacity: fill_opacity(count, mode),
                    stroke: stroke_color(count, mode),
                }
            })
            .collect();

        let tabs = payload
            .structures()
            .iter()
            .enumerate()
            .map(|(index, structure)| StructureTab {
                structure_id: structure.structure_id,
                structure_name: structure.structure_name.clone(),
                participants: structure.participants.clone(),
                active: index == state.structure_index(),
            })
            .collect();

        Self {
            mode: match mode {
                MapMode::Structural => ViewMode::Structural,
                MapMode::Legacy => ViewMode::Legacy,
            },
            title: payload
                .structure_name(state.structure_index())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            message: None,
            tabs,
            zones: paints,
            legend: match mode {
                MapMode::Structural => LEGEND.to_vec(),
                MapMode::Legacy => Vec::new(),
            },
            tooltip: tooltip(state, zones),
            detail: Some(detail(state, mode, zones)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{CodeReference, ZoneRecord};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn zones_with_chest(codes: Vec<CodeReference>, quotes: Vec<String>, count: u32) -> BodyMapData {
        let mut zones = BTreeMap::new();
        zones.insert(
            BodyZone::Chest,
            ZoneRecord {
                count,
                codes,
                quotes,
            },
        );
        BodyMapData::new(zones)
    }

    fn reference(code: &str, participant: &str, frequency: u32) -> CodeReference {
        CodeReference {
            code: code.to_string(),
            participant_id: participant.to_string(),
            frequency,
        }
    }

    #[test]
    fn test_tooltip_requires_hover_and_observations() {
        let zones = zones_with_chest(vec![], vec![], 2);
        let mut state = InteractionState::new();
        assert_eq!(tooltip(&state, &zones), None);

        state.pointer_enter(BodyZone::Abdomen);
        assert_eq!(tooltip(&state, &zones), None, "empty zone must not tooltip");

        state.pointer_enter(BodyZone::Chest);
        let tip = tooltip(&state, &zones).expect("populated zone should tooltip");
        assert_eq!(tip.zone, BodyZone::Chest);
        assert_eq!(tip.count, 2);
    }

    #[test]
    fn test_tooltip_samples_two_codes_and_counts_the_rest() {
        let zones = zones_with_chest(
            vec![
                reference("a", "P1", 1),
                reference("b", "P2", 1),
                reference("c", "P3", 1),
                reference("d", "P4", 1),
            ],
            vec![],
            4,
        );
        let mut state = InteractionState::new();
        state.pointer_enter(BodyZone::Chest);
        let tip = tooltip(&state, &zones).unwrap();
        assert_eq!(tip.samples.len(), 2);
        assert_eq!(tip.samples[0].code, "a");
        assert_eq!(tip.samples[1].participant_id, "P2");
        assert_eq!(tip.hidden, 2);
    }

    #[test]
    fn test_tooltip_samples_shorten_long_codes() {
        let zones = zones_with_chest(
            vec![reference("chest-pressure-intense-negative", "P21", 5)],
            vec![],
            1,
        );
        let mut state = InteractionState::new();
        state.pointer_enter(BodyZone::Chest);
        let tip = tooltip(&state, &zones).unwrap();
        assert_eq!(tip.samples[0].code, "chest-pressure...");
        assert_eq!(tip.samples[0].frequency, 5);
    }

    #[test]
    fn test_tooltip_hidden_is_zero_when_all_fit() {
        let zones = zones_with_chest(vec![reference("a", "P1", 1)], vec![], 1);
        let mut state = InteractionState::new();
        state.pointer_enter(BodyZone::Chest);
        assert_eq!(tooltip(&state, &zones).unwrap().hidden, 0);
    }

    #[test]
    fn test_short_code_truncation() {
        assert_eq!(short_code("chest-pressure-intense-negative"), "chest-pressure...");
        assert_eq!(short_code("chest-pressure"), "chest-pressure");
        assert_eq!(short_code("numbness"), "numbness");
    }

    #[test]
    fn test_detail_prompt_when_nothing_selected() {
        let zones = zones_with_chest(vec![], vec![], 1);
        let state = InteractionState::new();
        assert_eq!(detail(&state, MapMode::Structural, &zones), DetailPanel::Prompt);
        assert_eq!(detail(&state, MapMode::Legacy, &zones), DetailPanel::Prompt);
    }

    #[test]
    fn test_structural_detail_groups_codes_and_caps_quotes() {
        let quotes: Vec<String> = (1..=5).map(|i| format!("quote {i}")).collect();
        let zones = zones_with_chest(
            vec![
                reference("a", "P1", 2),
                reference("a", "P2", 3),
                reference("b", "P1", 1),
            ],
            quotes,
            3,
        );
        let mut state = InteractionState::new();
        state.click(BodyZone::Chest, &zones);

        let DetailPanel::Codes { zone, count, groups, quotes } =
            detail(&state, MapMode::Structural, &zones)
        else {
            panic!("expected codes panel");
        };
        assert_eq!(zone, BodyZone::Chest);
        assert_eq!(count, 3);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].total_frequency, 5);
        assert_eq!(quotes.len(), DETAIL_QUOTE_LIMIT);
    }

    #[test]
    fn test_legacy_detail_lists_quotes() {
        let zones = zones_with_chest(vec![], vec!["it burned".to_string()], 1);
        let mut state = InteractionState::new();
        state.click(BodyZone::Chest, &zones);

        let panel = detail(&state, MapMode::Legacy, &zones);
        assert!(matches!(
            panel,
            DetailPanel::Quotes { zone: BodyZone::Chest, count: 1, ref quotes }
                if quotes == &vec!["it burned".to_string()]
        ));
    }

    #[test]
    fn test_structural_detail_without_content_is_no_data() {
        // count can be positive while the backend lists nothing to show.
        let zones = zones_with_chest(vec![], vec![], 2);
        let mut state = InteractionState::new();
        state.click(BodyZone::Chest, &zones);
        assert_eq!(
            detail(&state, MapMode::Structural, &zones),
            DetailPanel::NoData { zone: BodyZone::Chest }
        );
    }

    #[test]
    fn test_legacy_detail_without_quotes_is_no_data() {
        let zones = zones_with_chest(vec![], vec![], 1);
        let mut state = InteractionState::new();
        state.click(BodyZone::Chest, &zones);
        assert_eq!(
            detail(&state, MapMode::Legacy, &zones),
            DetailPanel::NoData { zone: BodyZone::Chest }
        );
    }

    #[test]
    fn test_build_empty_view() {
        let payload = AnalysisPayload::from_value(&json!({}));
        let view = BodyMapView::build(&payload, &InteractionState::new());
        assert_eq!(view.mode, ViewMode::Empty);
        assert_eq!(view.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert!(view.zones.is_empty());
        assert!(view.detail.is_none());
    }

    #[test]
    fn test_build_paints_all_seven_zones() {
        let payload = AnalysisPayload::from_value(&json!({
            "chest": {"count": 4, "quotes": ["q"]}
        }));
        let view = BodyMapView::build(&payload, &InteractionState::new());
        assert_eq!(view.mode, ViewMode::Legacy);
        assert_eq!(view.zones.len(), 7);
        assert!(view.legend.is_empty());
        assert_eq!(view.title, DEFAULT_TITLE);

        let chest = view
            .zones
            .iter()
            .find(|paint| paint.zone == BodyZone::Chest)
            .unwrap();
        assert_eq!(chest.fill, crate::intensity::ACCENT);
        assert_eq!(chest.opacity, 0.8);

        let head = view
            .zones
            .iter()
            .find(|paint| paint.zone == BodyZone::Head)
            .unwrap();
        assert_eq!(head.fill, crate::intensity::ZONE_EMPTY);
        assert_eq!(head.opacity, 0.1);
        assert_eq!(head.stroke, crate::intensity::STROKE_NONE);
    }

    #[test]
    fn test_build_structural_view_carries_tabs_and_legend() {
        let payload = AnalysisPayload::from_value(&json!({
            "structures": [
                {"structure_id": 1, "structure_name": "Cascade", "participants": ["P1"], "zones": {}},
                {"structure_id": 2, "structure_name": "Retreat", "participants": ["P2"], "zones": {}}
            ]
        }));
        let mut state = InteractionState::new();
        state.select_structure(1, payload.structure_count());

        let view = BodyMapView::build(&payload, &state);
        assert_eq!(view.mode, ViewMode::Structural);
        assert_eq!(view.title, "Retreat");
        assert_eq!(view.legend.len(), 4);
        assert_eq!(view.tabs.len(), 2);
        assert!(!view.tabs[0].active);
        assert!(view.tabs[1].active);
        assert_eq!(view.detail, Some(DetailPanel::Prompt));
    }

    #[test]
    fn test_build_derives_tooltip_from_hover() {
        let payload = AnalysisPayload::from_value(&json!({
            "abdomen": {"count": 2, "quotes": ["q"]}
        }));
        let mut state = InteractionState::new();
        state.pointer_enter(BodyZone::Abdomen);
        let view = BodyMapView::build(&payload, &state);
        assert_eq!(view.tooltip.unwrap().count, 2);
    }
}
