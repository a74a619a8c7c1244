//! Declarative descriptors for the rendering surface.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::domain::{Coordinates, PinId};

use crate::{
    controller::{AuthDialog, InteractionController, Notice},
    draft::DraftId,
    selection::Selection,
    viewport::Viewport,
};

/// Marker glyph size per zoom level, in pixels.
const MARKER_SCALE: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    /// Pins owned by the current user and the draft marker.
    Tomato,
    SlateBlue,
}

impl MarkerColor {
    pub fn css_name(self) -> &'static str {
        match self {
            MarkerColor::Tomato => "tomato",
            MarkerColor::SlateBlue => "slateblue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    Pin(PinId),
    Draft(DraftId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    pub kind: MarkerKind,
    pub position: Coordinates,
    pub size: f64,
    pub offset_left: f64,
    pub offset_top: f64,
    pub color: MarkerColor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupDescriptor {
    Pin {
        id: PinId,
        position: Coordinates,
        title: String,
        desc: String,
        stars: u8,
        author: String,
        created: String,
    },
    DraftForm {
        draft_id: DraftId,
        position: Coordinates,
        title: Option<String>,
        desc: Option<String>,
        rating: Option<u8>,
        submitting: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControls {
    LogoutButton,
    LoginAndRegisterButtons,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    pub markers: Vec<MarkerDescriptor>,
    pub popup: Option<PopupDescriptor>,
    pub controls: SessionControls,
    pub auth_dialog: AuthDialog,
    pub notice: Option<Notice>,
}

impl InteractionController {
    /// Describes what the map should show. `now` anchors the relative
    /// creation labels of pin popups.
    pub fn scene(&self, now: DateTime<Utc>) -> Scene {
        let viewport = self.viewport();
        let session = self.session();
        let username = session.username();
        let pins = self.pins().snapshot();

        let mut markers: Vec<MarkerDescriptor> = pins
            .iter()
            .map(|pin| {
                let owned = username.is_some_and(|name| pin.is_owned_by(name));
                marker(
                    MarkerKind::Pin(pin.id.clone()),
                    pin.coordinates(),
                    viewport.zoom,
                    if owned {
                        MarkerColor::Tomato
                    } else {
                        MarkerColor::SlateBlue
                    },
                )
            })
            .collect();

        let popup = match self.selection() {
            Selection::None => None,
            Selection::ViewingPin(id) => pins.iter().find(|pin| pin.id == id).map(|pin| {
                PopupDescriptor::Pin {
                    id: pin.id.clone(),
                    position: pin.coordinates(),
                    title: pin.title.clone(),
                    desc: pin.desc.clone(),
                    stars: pin.rating,
                    author: pin.username.clone(),
                    created: relative_time(&pin.created_at, now),
                }
            }),
            Selection::Drafting => self.draft().map(|draft| {
                markers.push(marker(
                    MarkerKind::Draft(draft.id()),
                    draft.coordinates(),
                    viewport.zoom,
                    MarkerColor::Tomato,
                ));
                PopupDescriptor::DraftForm {
                    draft_id: draft.id(),
                    position: draft.coordinates(),
                    title: draft.title.clone(),
                    desc: draft.desc.clone(),
                    rating: draft.rating,
                    submitting: draft.is_in_flight(),
                }
            }),
        };

        Scene {
            viewport,
            markers,
            popup,
            controls: if session.is_authenticated() {
                SessionControls::LogoutButton
            } else {
                SessionControls::LoginAndRegisterButtons
            },
            auth_dialog: self.auth_dialog(),
            notice: self.notice().cloned(),
        }
    }
}

fn marker(kind: MarkerKind, position: Coordinates, zoom: f64, color: MarkerColor) -> MarkerDescriptor {
    MarkerDescriptor {
        kind,
        position,
        size: MARKER_SCALE * zoom,
        offset_left: -MARKER_SCALE / 2.0 * zoom,
        offset_top: -MARKER_SCALE * zoom,
        color,
    }
}

/// Seconds per minute, minutes per hour, hours per day, days per week,
/// weeks per month, months per year.
const UNIT_STEPS: [f64; 6] = [60.0, 60.0, 24.0, 7.0, 365.0 / 7.0 / 12.0, 12.0];
const UNIT_NAMES: [&str; 7] = ["second", "minute", "hour", "day", "week", "month", "year"];

/// Formats `created_at` relative to `now` ("3 days ago", "in 2 hours").
/// Unparseable timestamps are returned verbatim.
pub fn relative_time(created_at: &str, now: DateTime<Utc>) -> String {
    let Some(created) = parse_timestamp(created_at) else {
        return created_at.to_string();
    };

    let delta = now.signed_duration_since(created).num_milliseconds() as f64 / 1000.0;
    let future = delta < 0.0;
    let mut amount = delta.abs();

    let mut unit = 0;
    while unit < UNIT_STEPS.len() && amount >= UNIT_STEPS[unit] {
        amount /= UNIT_STEPS[unit];
        unit += 1;
    }
    let amount = amount.floor() as u64;

    if unit == 0 && amount < 10 {
        return if future { "right now" } else { "just now" }.to_string();
    }

    let name = UNIT_NAMES[unit];
    let phrase = if amount == 1 {
        format!("1 {name}")
    } else {
        format!("{amount} {name}s")
    };
    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "tests/scene_tests.rs"]
mod tests;
