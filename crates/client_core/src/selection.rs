//! The single open popup.

use shared::domain::{Coordinates, PinId};
use tracing::debug;

use crate::{
    draft::{Draft, DraftId},
    session::Session,
};

/// Which popup is open. A single value, so a pin popup and the draft form
/// can never be open together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    ViewingPin(PinId),
    Drafting,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Popup {
    #[default]
    Closed,
    Pin(PinId),
    Draft(Draft),
}

#[derive(Debug, Default)]
pub struct SelectionController {
    popup: Popup,
    next_draft_id: u64,
}

impl SelectionController {
    pub fn selection(&self) -> Selection {
        match &self.popup {
            Popup::Closed => Selection::None,
            Popup::Pin(id) => Selection::ViewingPin(id.clone()),
            Popup::Draft(_) => Selection::Drafting,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.popup {
            Popup::Draft(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.popup {
            Popup::Draft(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn viewing(&self) -> Option<&PinId> {
        match &self.popup {
            Popup::Pin(id) => Some(id),
            _ => None,
        }
    }

    /// Opens the pin popup, dropping any draft in progress.
    pub fn select_pin(&mut self, id: PinId) {
        if let Popup::Draft(draft) = &self.popup {
            debug!(draft_id = draft.id().0, "selection: draft discarded by pin selection");
        }
        self.popup = Popup::Pin(id);
    }

    /// Opens a fresh draft at `coordinates`. Anonymous sessions are ignored
    /// and `None` is returned.
    pub fn open_draft(&mut self, coordinates: Coordinates, session: &Session) -> Option<DraftId> {
        if !session.is_authenticated() {
            return None;
        }
        self.next_draft_id += 1;
        let id = DraftId(self.next_draft_id);
        self.popup = Popup::Draft(Draft::new(id, coordinates));
        Some(id)
    }

    pub fn close(&mut self) {
        self.popup = Popup::Closed;
    }

    pub fn is_drafting(&self, id: DraftId) -> bool {
        self.draft().is_some_and(|draft| draft.id() == id)
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
