//! SVG rendering of the body diagram.
//!
//! Produces the full 200x400 diagram as a string: a low-opacity silhouette
//! outline plus the seven interactive zones, each wrapped in a group carrying
//! a `data-zone` attribute so a host can wire pointer events to the
//! interaction state machine. Paint attributes come from the intensity
//! mapper, so the output is a pure function of the zone data and mode.

use soma_types::BodyZone;
use std::fmt::Write;

use crate::intensity::{fill_color, fill_opacity, stroke_color};
use crate::payload::BodyMapData;
use crate::view::NO_DATA_MESSAGE;
use crate::MapMode;

/// Diagram coordinate space, portrait.
pub const VIEW_BOX: &str = "0 0 200 400";

/// Renders the diagram for one zone map.
///
/// `title` is the map heading (structure name or the default title) and is
/// XML-escaped before embedding.
pub fn render(zones: &BodyMapData, mode: MapMode, title: &str) -> String {
    let mut out = String::with_capacity(2048);
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{VIEW_BOX}\" role=\"img\" aria-label=\"{}\">\n",
        escape(title)
    );
    let _ = write!(out, "  <title>{}</title>\n", escape(title));

    // Base silhouette, outline only.
    out.push_str("  <g opacity=\"0.3\" stroke=\"#ffffff\" stroke-width=\"1.5\" fill=\"none\">\n");
    out.push_str("    <circle cx=\"100\" cy=\"40\" r=\"25\"/>\n");
    out.push_str("    <path d=\"M90,63 L90,73 L110,73 L110,63\"/>\n");
    out.push_str(
        "    <path d=\"M70,70 C50,80 40,100 30,150 L20,250 L40,260 L50,160 C50,160 60,200 60,250 \
         L60,380 L90,380 L90,280 L110,280 L110,380 L140,380 L140,250 C140,200 150,160 150,160 \
         L160,260 L180,250 L170,150 C160,100 150,80 130,70 Z\"/>\n",
    );
    out.push_str("    <path d=\"M70,80 L30,180 L40,185 L75,100\"/>\n");
    out.push_str("    <path d=\"M130,80 L170,180 L160,185 L125,100\"/>\n");
    out.push_str("  </g>\n");

    for zone in BodyZone::ALL {
        let count = zones.zone(zone).count;
        let _ = write!(
            out,
            "  <g data-zone=\"{}\" fill=\"{}\" fill-opacity=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\">\n",
            zone.as_str(),
            fill_color(count, mode),
            fill_opacity(count, mode),
            stroke_color(count, mode),
        );
        out.push_str(zone_shape(zone));
        out.push_str("  </g>\n");
    }

    out.push_str("</svg>\n");
    out
}

/// Renders the explicit empty state shown when no body-map data resolved.
pub fn render_empty() -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{VIEW_BOX}\" role=\"img\" \
         aria-label=\"{NO_DATA_MESSAGE}\">\n  <text x=\"100\" y=\"200\" text-anchor=\"middle\" \
         fill=\"#9ca3af\" font-size=\"10\">{NO_DATA_MESSAGE}</text>\n</svg>\n"
    )
}

/// The static geometry of each interactive zone.
fn zone_shape(zone: BodyZone) -> &'static str {
    match zone {
        BodyZone::Head => "    <circle cx=\"100\" cy=\"40\" r=\"25\"/>\n",
        BodyZone::Neck => "    <rect x=\"88\" y=\"63\" width=\"24\" height=\"12\" rx=\"4\"/>\n",
        BodyZone::Chest => "    <ellipse cx=\"100\" cy=\"100\" rx=\"35\" ry=\"25\"/>\n",
        BodyZone::SolarPlexus => "    <circle cx=\"100\" cy=\"140\" r=\"15\"/>\n",
        BodyZone::Abdomen => "    <ellipse cx=\"100\" cy=\"180\" rx=\"30\" ry=\"20\"/>\n",
        BodyZone::Pelvis => {
            "    <path d=\"M70,210 Q100,240 130,210 L120,250 Q100,260 80,250 Z\"/>\n"
        }
        BodyZone::Extremities => {
            "    <circle cx=\"30\" cy=\"180\" r=\"10\"/>\n    <circle cx=\"170\" cy=\"180\" \
             r=\"10\"/>\n    <circle cx=\"75\" cy=\"380\" r=\"10\"/>\n    <circle cx=\"125\" \
             cy=\"380\" r=\"10\"/>\n"
        }
    }
}

/// Minimal XML text/attribute escaping.
fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
