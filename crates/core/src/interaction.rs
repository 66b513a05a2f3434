//! The body-map interaction state machine.
//!
//! Hover, selection, and the active experiential structure are the only
//! transient state the visualization owns. They live here as an explicit
//! value with named transitions so the rules can be exercised without a
//! rendering environment:
//!
//! - hover follows the pointer unconditionally, data or not;
//! - clicking toggles selection, but only on zones that have observations,
//!   so an empty detail panel can never open;
//! - switching structures always drops the selection, so a detail panel can
//!   never outlive the data it was derived from.
//!
//! Hover and selection are independent axes: one zone can be hovered while a
//! different zone is selected.

use soma_types::BodyZone;

use crate::payload::BodyMapData;

/// Transient UI state of one body-map view. Created at mount with defaults,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    structure_index: usize,
    hovered: Option<BodyZone>,
    selected: Option<BodyZone>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The index of the structure currently on display.
    pub fn structure_index(&self) -> usize {
        self.structure_index
    }

    pub fn hovered(&self) -> Option<BodyZone> {
        self.hovered
    }

    pub fn selected(&self) -> Option<BodyZone> {
        self.selected
    }

    /// Pointer entered a zone's interactive region.
    pub fn pointer_enter(&mut self, zone: BodyZone) {
        self.hovered = Some(zone);
    }

    /// Pointer left the diagram or the current zone.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    /// Click on a zone: toggles selection for zones with observations,
    /// ignored entirely for empty zones.
    pub fn click(&mut self, zone: BodyZone, zones: &BodyMapData) {
        if !zones.zone(zone).has_observations() {
            return;
        }
        self.selected = if self.selected == Some(zone) {
            None
        } else {
            Some(zone)
        };
    }

    /// Switch to the structure at `index`, out of `available` structures.
    ///
    /// A valid switch always resets the selection, even when re-selecting the
    /// current structure; the hover is left alone since the next pointer move
    /// refreshes it. Out-of-range indices are ignored.
    pub fn select_structure(&mut self, index: usize, available: usize) {
        if index >= available {
            return;
        }
        self.structure_index = index;
        self.selected = None;
    }

    /// Explicit close control on the detail panel.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }
}
