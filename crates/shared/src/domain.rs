use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by the persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PinId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

impl Coordinates {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn is_valid_rating(rating: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

/// A persisted review attached to a map location.
///
/// Document-store backends name the identifier `_id`; both spellings are
/// accepted. `created_at` is kept exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(alias = "_id")]
    pub id: PinId,
    pub username: String,
    pub title: String,
    pub desc: String,
    pub rating: u8,
    pub lat: f64,
    pub long: f64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Pin {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.long)
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }
}
