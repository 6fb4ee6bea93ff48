//! Root crate facade for QuickPaste: snippet storage plus the delivery
//! chains that put snippets into pages.

pub use quickpaste_core::{
    config, db, error, locale, models, search, store, transfer, AppError, Config, Database,
    MemoryStore, Settings, Snippet, SnippetStore,
};
pub use quickpaste_delivery::{
    agent, coordinator, editor, insert, payload, protocol, restricted, DeliveryConfig,
    DeliveryCoordinator, DeliveryOutcome, DeliveryReport, DeliveryRoute,
};

#[cfg(feature = "sim")]
pub use quickpaste_delivery::sim;
