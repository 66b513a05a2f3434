//! Count-to-color mapping for the body diagram.
//!
//! Fill color, fill opacity, and stroke visibility are pure functions of a
//! zone's code count and the rendering mode, so the same data always paints
//! the same diagram. Structural maps use four tiered bands; legacy maps
//! collapse to a single accent color.

use serde::Serialize;

use crate::MapMode;

/// Fill for a zone with no observations.
pub const ZONE_EMPTY: &str = "#ffffff";
/// Structural band for 1-2 codes.
pub const BAND_LOW: &str = "#fbbf24";
/// Structural band for 3-5 codes.
pub const BAND_MID: &str = "#f59e0b";
/// Structural band for 6-8 codes.
pub const BAND_HIGH: &str = "#ea580c";
/// Structural band for 9 codes and above.
pub const BAND_PEAK: &str = "#dc2626";
/// Accent used for legacy fills and for zone outlines in both modes.
pub const ACCENT: &str = "#e19136";
/// Stroke value for zones too faint to outline.
pub const STROKE_NONE: &str = "transparent";

/// Zones are outlined only once their fill is clearly visible; below this
/// opacity they read as outline-only silhouette.
const STROKE_VISIBILITY_FLOOR: f64 = 0.3;

/// Returns the fill color for a zone with `count` codes.
pub fn fill_color(count: u32, mode: MapMode) -> &'static str {
    match mode {
        MapMode::Structural => match count {
            0 => ZONE_EMPTY,
            1..=2 => BAND_LOW,
            3..=5 => BAND_MID,
            6..=8 => BAND_HIGH,
            _ => BAND_PEAK,
        },
        MapMode::Legacy => {
            if count == 0 {
                ZONE_EMPTY
            } else {
                ACCENT
            }
        }
    }
}

/// Returns the fill opacity for a zone with `count` codes.
///
/// Empty zones sit at a faint 0.1; populated zones start at 0.4 and grow with
/// the count until saturating at 1.0. Values are display opacities and are
/// rounded to two decimals.
pub fn fill_opacity(count: u32, mode: MapMode) -> f64 {
    if count == 0 {
        return 0.1;
    }
    let step = match mode {
        MapMode::Structural => 0.08,
        MapMode::Legacy => 0.1,
    };
    let raw = 0.4 + (f64::from(count) * step).min(0.6);
    (raw * 100.0).round() / 100.0
}

/// Returns the stroke color for a zone with `count` codes: the accent outline
/// once the fill is visible, transparent otherwise.
pub fn stroke_color(count: u32, mode: MapMode) -> &'static str {
    if fill_opacity(count, mode) > STROKE_VISIBILITY_FLOOR {
        ACCENT
    } else {
        STROKE_NONE
    }
}

/// One row of the structural color legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    pub label: &'static str,
}

/// The structural-mode legend; legacy maps carry no legend.
pub const LEGEND: [LegendEntry; 4] = [
    LegendEntry { color: BAND_LOW, label: "1-2 codes" },
    LegendEntry { color: BAND_MID, label: "3-5 codes" },
    LegendEntry { color: BAND_HIGH, label: "6-8 codes" },
    LegendEntry { color: BAND_PEAK, label: "9+ codes" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_fill_color_matches_thresholds_at_boundaries() {
        assert_eq!(fill_color(0, MapMode::Structural), ZONE_EMPTY);
        assert_eq!(fill_color(1, MapMode::Structural), BAND_LOW);
        assert_eq!(fill_color(2, MapMode::Structural), BAND_LOW);
        assert_eq!(fill_color(3, MapMode::Structural), BAND_MID);
        assert_eq!(fill_color(5, MapMode::Structural), BAND_MID);
        assert_eq!(fill_color(6, MapMode::Structural), BAND_HIGH);
        assert_eq!(fill_color(8, MapMode::Structural), BAND_HIGH);
        assert_eq!(fill_color(9, MapMode::Structural), BAND_PEAK);
        assert_eq!(fill_color(40, MapMode::Structural), BAND_PEAK);
    }

    #[test]
    fn test_legacy_fill_color_collapses_to_two_states() {
        assert_eq!(fill_color(0, MapMode::Legacy), ZONE_EMPTY);
        for count in 1..50 {
            assert_eq!(fill_color(count, MapMode::Legacy), ACCENT);
        }
    }

    #[test]
    fn test_fill_opacity_known_values() {
        assert_eq!(fill_opacity(0, MapMode::Structural), 0.1);
        assert_eq!(fill_opacity(0, MapMode::Legacy), 0.1);
        assert_eq!(fill_opacity(1, MapMode::Structural), 0.48);
        assert_eq!(fill_opacity(5, MapMode::Structural), 0.8);
        assert_eq!(fill_opacity(1, MapMode::Legacy), 0.5);
        assert_eq!(fill_opacity(6, MapMode::Legacy), 1.0);
    }

    #[test]
    fn test_fill_opacity_is_monotone_and_bounded() {
        for mode in [MapMode::Structural, MapMode::Legacy] {
            let mut previous = 0.0_f64;
            for count in 0..=200 {
                let opacity = fill_opacity(count, mode);
                assert!(opacity >= 0.1, "opacity below floor at count {count}");
                assert!(opacity <= 1.0, "opacity above ceiling at count {count}");
                assert!(
                    opacity >= previous,
                    "opacity decreased between {} and {count}",
                    count - 1
                );
                previous = opacity;
            }
        }
    }

    #[test]
    fn test_fill_opacity_saturates_at_one() {
        assert_eq!(fill_opacity(100, MapMode::Structural), 1.0);
        assert_eq!(fill_opacity(100, MapMode::Legacy), 1.0);
    }

    #[test]
    fn test_fill_is_deterministic() {
        for count in 0..=50 {
            assert_eq!(
                fill_color(count, MapMode::Structural),
                fill_color(count, MapMode::Structural)
            );
            assert_eq!(
                fill_opacity(count, MapMode::Structural),
                fill_opacity(count, MapMode::Structural)
            );
        }
    }

    #[test]
    fn test_stroke_only_for_visible_fills() {
        assert_eq!(stroke_color(0, MapMode::Structural), STROKE_NONE);
        assert_eq!(stroke_color(0, MapMode::Legacy), STROKE_NONE);
        // Any populated zone starts at 0.4 opacity, above the floor.
        for count in 1..=20 {
            assert_eq!(stroke_color(count, MapMode::Structural), ACCENT);
            assert_eq!(stroke_color(count, MapMode::Legacy), ACCENT);
        }
    }
}
