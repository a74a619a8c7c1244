//! Unpersisted candidate pin and its submission rules.

use shared::{
    domain::{is_valid_rating, Coordinates, PinId},
    protocol::NewPinRequest,
};
use thiserror::Error;

use crate::{pins_api::PinsApiError, session::Session};

/// Monotonic identity of an opened draft. Used to tell whether a submission
/// result still belongs to the draft on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Title(String),
    Desc(String),
    Rating(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Desc,
    Rating,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no draft is open")]
    NotDrafting,
    #[error("sign in to add a pin")]
    Unauthenticated,
    #[error("missing {0:?}")]
    MissingField(RequiredField),
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),
    #[error("this draft is already being submitted")]
    AlreadyInFlight,
    #[error("pin submission failed: {0}")]
    Api(#[from] PinsApiError),
}

impl SubmitError {
    /// Local failures never reached the network.
    pub fn is_local(&self) -> bool {
        !matches!(self, SubmitError::Api(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    id: DraftId,
    coordinates: Coordinates,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub rating: Option<u8>,
    in_flight: bool,
}

impl Draft {
    pub(crate) fn new(id: DraftId, coordinates: Coordinates) -> Self {
        Self {
            id,
            coordinates,
            title: None,
            desc: None,
            rating: None,
            in_flight: false,
        }
    }

    pub fn id(&self) -> DraftId {
        self.id
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn apply(&mut self, field: DraftField) {
        match field {
            DraftField::Title(title) => self.title = Some(title),
            DraftField::Desc(desc) => self.desc = Some(desc),
            DraftField::Rating(rating) => self.rating = Some(rating),
        }
    }

    /// Validates the draft against the session snapshot and builds the
    /// `POST /pins` body. Blank text counts as missing.
    pub fn to_request(&self, session: &Session) -> Result<NewPinRequest, SubmitError> {
        let username = session.username().ok_or(SubmitError::Unauthenticated)?;
        let title = non_blank(self.title.as_deref())
            .ok_or(SubmitError::MissingField(RequiredField::Title))?;
        let desc = non_blank(self.desc.as_deref())
            .ok_or(SubmitError::MissingField(RequiredField::Desc))?;
        let rating = self
            .rating
            .ok_or(SubmitError::MissingField(RequiredField::Rating))?;
        if !is_valid_rating(rating) {
            return Err(SubmitError::RatingOutOfRange(rating));
        }

        Ok(NewPinRequest {
            username: username.to_string(),
            title: title.to_string(),
            desc: desc.to_string(),
            rating,
            lat: self.coordinates.lat,
            long: self.coordinates.long,
        })
    }

    pub(crate) fn mark_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A validated request captured at the moment of submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub draft_id: DraftId,
    pub request: NewPinRequest,
}

/// What happened to the draft once a submission resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The pin was stored and its draft popup closed.
    Committed(PinId),
    /// The pin was stored but its draft had already been abandoned.
    CommittedAfterAbandon(PinId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rating: u8) -> Draft {
        let mut draft = Draft::new(DraftId(1), Coordinates::new(5.0, 6.0));
        draft.apply(DraftField::Title("X".to_string()));
        draft.apply(DraftField::Desc("Y".to_string()));
        draft.apply(DraftField::Rating(rating));
        draft
    }

    fn alice() -> Session {
        Session::Authenticated("alice".to_string())
    }

    #[test]
    fn builds_request_from_draft_and_session() {
        let request = filled(4).to_request(&alice()).expect("valid draft");
        assert_eq!(
            request,
            NewPinRequest {
                username: "alice".to_string(),
                title: "X".to_string(),
                desc: "Y".to_string(),
                rating: 4,
                lat: 5.0,
                long: 6.0,
            }
        );
    }

    #[test]
    fn rejects_ratings_outside_range() {
        for rating in [0, 6, 255] {
            let err = filled(rating).to_request(&alice()).unwrap_err();
            assert!(matches!(err, SubmitError::RatingOutOfRange(r) if r == rating));
            assert!(err.is_local());
        }
    }

    #[test]
    fn rejects_missing_and_blank_fields() {
        let mut draft = Draft::new(DraftId(1), Coordinates::new(0.0, 0.0));
        assert!(matches!(
            draft.to_request(&alice()),
            Err(SubmitError::MissingField(RequiredField::Title))
        ));

        draft.apply(DraftField::Title("   ".to_string()));
        assert!(matches!(
            draft.to_request(&alice()),
            Err(SubmitError::MissingField(RequiredField::Title))
        ));

        draft.apply(DraftField::Title("T".to_string()));
        draft.apply(DraftField::Desc("D".to_string()));
        assert!(matches!(
            draft.to_request(&alice()),
            Err(SubmitError::MissingField(RequiredField::Rating))
        ));
    }

    #[test]
    fn anonymous_session_cannot_submit() {
        assert!(matches!(
            filled(3).to_request(&Session::Anonymous),
            Err(SubmitError::Unauthenticated)
        ));
    }

    #[test]
    fn later_field_writes_replace_earlier_ones() {
        let mut draft = filled(2);
        draft.apply(DraftField::Rating(5));
        draft.apply(DraftField::Title("Z".to_string()));
        assert_eq!(draft.rating, Some(5));
        assert_eq!(draft.title.as_deref(), Some("Z"));
    }
}
