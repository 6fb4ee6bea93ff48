//! Delivery of snippets into the focused field of a web page.
//!
//! The browser is reached only through the [`coordinator::Browser`] and
//! [`agent::PageHost`] traits; the `sim` feature provides in-memory
//! implementations of both.

/// Resident page agent owning the overlay editor.
pub mod agent;
/// Paste / open-editor / copy decision chains.
pub mod coordinator;
/// The snippet editor form shown in the overlay or a standalone tab.
pub mod editor;
/// Insertion of a payload into the focused element.
pub mod insert;
/// Content handed to the insertion step.
pub mod payload;
/// Messages exchanged between surfaces.
pub mod protocol;
/// Restricted-page detection.
pub mod restricted;
/// Simulated browser, page and popup.
#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use coordinator::{
    Browser, DeliveryConfig, DeliveryCoordinator, DeliveryError, DeliveryOutcome, DeliveryReport,
    DeliveryRoute, Notification, Surface, TabInfo, TransportError,
};
pub use insert::{attempt_insert, EditableKind};
pub use payload::{DeliveryRequest, Payload};
pub use protocol::{AgentMessage, FrameMessage, InsertReport, TabId};
