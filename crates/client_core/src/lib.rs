//! Client-side map interaction and pin-state controller.

pub mod controller;
pub mod draft;
pub mod identity;
pub mod pin_store;
pub mod pins_api;
pub mod runtime;
pub mod scene;
pub mod selection;
pub mod session;
pub mod viewport;

pub use controller::{AuthDialog, Effect, InteractionController, InteractionEvent, Notice};
pub use draft::{Draft, DraftField, DraftId, PendingSubmission, SubmitError, SubmitOutcome};
pub use identity::{IdentityStore, InMemoryIdentityStore, IDENTITY_KEY};
pub use pin_store::{LoadError, LoadState, PinStore};
pub use pins_api::{HttpPinsApi, PinsApi, PinsApiError};
pub use runtime::Runtime;
pub use scene::{MarkerColor, MarkerDescriptor, MarkerKind, PopupDescriptor, Scene, SessionControls};
pub use selection::Selection;
pub use session::Session;
pub use viewport::{Viewport, ViewportUpdate};
