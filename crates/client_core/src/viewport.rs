//! Map camera state.

use shared::domain::Coordinates;

pub const DEFAULT_LAT: f64 = 46.0;
pub const DEFAULT_LONG: f64 = 17.0;
pub const DEFAULT_ZOOM: f64 = 4.0;
pub const DEFAULT_WIDTH: f64 = 1280.0;
pub const DEFAULT_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub lat: f64,
    pub long: f64,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            lat: DEFAULT_LAT,
            long: DEFAULT_LONG,
            zoom: DEFAULT_ZOOM,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.lat, self.long)
    }
}

/// Partial viewport update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportUpdate {
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub zoom: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ViewportUpdate {
    pub fn center(coordinates: Coordinates) -> Self {
        Self {
            lat: Some(coordinates.lat),
            long: Some(coordinates.long),
            ..Self::default()
        }
    }

    pub fn zoom(zoom: f64) -> Self {
        Self {
            zoom: Some(zoom),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct ViewportState {
    current: Viewport,
}

impl ViewportState {
    pub fn new(initial: Viewport) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Viewport {
        self.current
    }

    pub fn set(&mut self, update: ViewportUpdate) {
        let current = &mut self.current;
        if let Some(lat) = update.lat {
            current.lat = lat;
        }
        if let Some(long) = update.long {
            current.long = long;
        }
        if let Some(zoom) = update.zoom {
            current.zoom = zoom;
        }
        if let Some(width) = update.width {
            current.width = width;
        }
        if let Some(height) = update.height {
            current.height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_merges_only_provided_fields() {
        let mut state = ViewportState::default();
        state.set(ViewportUpdate::zoom(7.5));
        state.set(ViewportUpdate::center(Coordinates::new(10.0, 20.0)));

        let viewport = state.current();
        assert_eq!(viewport.zoom, 7.5);
        assert_eq!(viewport.center(), Coordinates::new(10.0, 20.0));
        assert_eq!(viewport.width, DEFAULT_WIDTH);
        assert_eq!(viewport.height, DEFAULT_HEIGHT);
    }
}
