//! Top-level interaction controller: translates map and UI events into
//! state transitions and hands any I/O back to the caller as [`Effect`]s.

use shared::domain::{Coordinates, Pin, PinId};
use tracing::{debug, info, warn};

use crate::{
    draft::{Draft, DraftField, DraftId, PendingSubmission, SubmitError, SubmitOutcome},
    pin_store::{LoadError, PinStore},
    pins_api::PinsApiError,
    selection::{Selection, SelectionController},
    session::{Session, SessionState},
    viewport::{Viewport, ViewportState, ViewportUpdate},
};

/// Which auth form is shown. Login and register are never open together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthDialog {
    #[default]
    Closed,
    Login,
    Register,
}

#[derive(Debug)]
pub enum InteractionEvent {
    Mounted,
    MapDoubleClicked(Coordinates),
    MarkerClicked(PinId),
    PopupClosed,
    ViewportChanged(ViewportUpdate),
    DraftEdited(DraftField),
    SubmitRequested,
    LoginRequested,
    RegisterRequested,
    AuthDialogDismissed,
    LoginSucceeded { username: String },
    LogoutClicked,
    NoticeDismissed,
    PinsLoaded(Result<Vec<Pin>, PinsApiError>),
    SubmitCompleted {
        draft_id: DraftId,
        result: Result<Pin, PinsApiError>,
    },
}

/// I/O the caller must perform on behalf of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadPins,
    SubmitPin(PendingSubmission),
    PersistIdentity(String),
    ClearIdentity,
}

/// Non-blocking feedback for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PinsUnavailable(String),
    SubmitFailed(String),
    PinAdded(PinId),
}

#[derive(Debug, Default)]
pub struct InteractionController {
    session: SessionState,
    pins: PinStore,
    viewport: ViewportState,
    selection: SelectionController,
    auth_dialog: AuthDialog,
    notice: Option<Notice>,
}

impl InteractionController {
    pub fn new(persisted_identity: Option<String>, viewport: Viewport) -> Self {
        Self {
            session: SessionState::restore(persisted_identity),
            viewport: ViewportState::new(viewport),
            ..Self::default()
        }
    }

    pub fn session(&self) -> Session {
        self.session.current()
    }

    pub fn pins(&self) -> &PinStore {
        &self.pins
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.current()
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.selection.draft()
    }

    pub fn auth_dialog(&self) -> AuthDialog {
        self.auth_dialog
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn handle(&mut self, event: InteractionEvent) -> Option<Effect> {
        match event {
            InteractionEvent::Mounted => self.mount(),
            InteractionEvent::MapDoubleClicked(coordinates) => {
                self.map_double_click(coordinates);
                None
            }
            InteractionEvent::MarkerClicked(id) => {
                self.marker_click(&id);
                None
            }
            InteractionEvent::PopupClosed => {
                self.close_popup();
                None
            }
            InteractionEvent::ViewportChanged(update) => {
                self.update_viewport(update);
                None
            }
            InteractionEvent::DraftEdited(field) => {
                self.edit_draft(field);
                None
            }
            InteractionEvent::SubmitRequested => self.submit_draft().ok(),
            InteractionEvent::LoginRequested => {
                self.show_auth_dialog(AuthDialog::Login);
                None
            }
            InteractionEvent::RegisterRequested => {
                self.show_auth_dialog(AuthDialog::Register);
                None
            }
            InteractionEvent::AuthDialogDismissed => {
                self.auth_dialog = AuthDialog::Closed;
                None
            }
            InteractionEvent::LoginSucceeded { username } => self.login_succeeded(&username),
            InteractionEvent::LogoutClicked => Some(self.logout()),
            InteractionEvent::NoticeDismissed => {
                self.notice = None;
                None
            }
            InteractionEvent::PinsLoaded(result) => {
                let _ = self.pins_loaded(result);
                None
            }
            InteractionEvent::SubmitCompleted { draft_id, result } => {
                let _ = self.submit_completed(draft_id, result);
                None
            }
        }
    }

    /// Requests the one-time pin load. Later calls return `None`.
    pub fn mount(&mut self) -> Option<Effect> {
        self.pins.begin_load().then_some(Effect::LoadPins)
    }

    /// Opens a draft at the clicked point. Ignored while anonymous.
    pub fn map_double_click(&mut self, coordinates: Coordinates) -> Option<DraftId> {
        let session = self.session.current();
        let draft_id = self.selection.open_draft(coordinates, &session);
        match draft_id {
            Some(id) => debug!(draft_id = id.0, "controller: draft opened"),
            None => debug!("controller: double click ignored for anonymous session"),
        }
        draft_id
    }

    /// Opens the popup of a stored pin and recenters on it. Returns false
    /// for ids that are not in the store.
    pub fn marker_click(&mut self, id: &PinId) -> bool {
        let Some(coordinates) = self.pins.get(id).map(Pin::coordinates) else {
            warn!(pin_id = %id, "controller: marker click for unknown pin");
            return false;
        };
        self.selection.select_pin(id.clone());
        self.viewport.set(ViewportUpdate::center(coordinates));
        true
    }

    pub fn close_popup(&mut self) {
        self.selection.close();
    }

    pub fn update_viewport(&mut self, update: ViewportUpdate) {
        self.viewport.set(update);
    }

    /// Applies a form write to the open draft. Returns false when no draft is
    /// open.
    pub fn edit_draft(&mut self, field: DraftField) -> bool {
        match self.selection.draft_mut() {
            Some(draft) => {
                draft.apply(field);
                true
            }
            None => false,
        }
    }

    /// Validates the open draft and returns the request to send. Local
    /// failures leave the draft and selection untouched.
    pub fn submit_draft(&mut self) -> Result<Effect, SubmitError> {
        let session = self.session.current();
        let result = match self.selection.draft_mut() {
            None => Err(SubmitError::NotDrafting),
            Some(draft) if draft.is_in_flight() => Err(SubmitError::AlreadyInFlight),
            Some(draft) => draft.to_request(&session).map(|request| {
                draft.mark_in_flight(true);
                PendingSubmission {
                    draft_id: draft.id(),
                    request,
                }
            }),
        };

        match result {
            Ok(pending) => {
                info!(draft_id = pending.draft_id.0, "controller: submitting draft");
                Ok(Effect::SubmitPin(pending))
            }
            Err(err) => {
                warn!("controller: draft not submitted: {err}");
                self.notice = Some(Notice::SubmitFailed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Applies the backend response for a submission.
    ///
    /// A created pin is always appended, even if its draft was abandoned
    /// while the request was in flight. The popup is closed only if it still
    /// shows that same draft.
    pub fn submit_completed(
        &mut self,
        draft_id: DraftId,
        result: Result<Pin, PinsApiError>,
    ) -> Result<SubmitOutcome, SubmitError> {
        match result {
            Ok(pin) => {
                let pin_id = pin.id.clone();
                self.pins.append(pin);
                self.notice = Some(Notice::PinAdded(pin_id.clone()));
                if self.selection.is_drafting(draft_id) {
                    self.selection.close();
                    Ok(SubmitOutcome::Committed(pin_id))
                } else {
                    info!(
                        draft_id = draft_id.0,
                        pin_id = %pin_id,
                        "controller: pin committed after its draft was abandoned"
                    );
                    Ok(SubmitOutcome::CommittedAfterAbandon(pin_id))
                }
            }
            Err(err) => {
                warn!(draft_id = draft_id.0, "controller: pin submission failed: {err}");
                if let Some(draft) = self
                    .selection
                    .draft_mut()
                    .filter(|draft| draft.id() == draft_id)
                {
                    draft.mark_in_flight(false);
                }
                self.notice = Some(Notice::SubmitFailed(err.to_string()));
                Err(SubmitError::Api(err))
            }
        }
    }

    pub fn pins_loaded(&mut self, result: Result<Vec<Pin>, PinsApiError>) -> Result<usize, LoadError> {
        self.pins.finish_load(result).inspect_err(|err| {
            self.notice = Some(Notice::PinsUnavailable(err.to_string()));
        })
    }

    /// Callback from the external login form.
    pub fn login_succeeded(&mut self, username: &str) -> Option<Effect> {
        if !self.session.login(username) {
            return None;
        }
        self.auth_dialog = AuthDialog::Closed;
        self.session
            .username()
            .map(|username| Effect::PersistIdentity(username.to_string()))
    }

    /// Clears the identity and closes every popup; a draft cannot outlive
    /// its author's session.
    pub fn logout(&mut self) -> Effect {
        self.session.logout();
        self.selection.close();
        self.auth_dialog = AuthDialog::Closed;
        Effect::ClearIdentity
    }

    fn show_auth_dialog(&mut self, dialog: AuthDialog) {
        if self.session.is_authenticated() {
            debug!(?dialog, "controller: auth dialog ignored for authenticated session");
            return;
        }
        self.auth_dialog = dialog;
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
