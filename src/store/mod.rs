//! Collaborator boundaries of the synchronizer
//!
//! The synchronizer never touches files. It talks to a [`SettingsSource`]
//! and a [`ProfileSource`] through fire-and-forget requests, and hears back
//! through two notification streams created by [`channels`].

pub mod file;
pub mod prompt;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::config::SettingsDocument;

pub use file::{factory_defaults, FileStore};
pub use prompt::{AssumeYes, ConfirmPrompt, StdinPrompt};

/// Owner of the persisted settings document
pub trait SettingsSource {
    /// Ask for the current document; answered on the document stream
    fn request_document(&self);

    /// Persist a document; expected to re-emit it on the document stream
    fn write(&self, doc: SettingsDocument);

    /// Ask the user to confirm, then restore defaults and re-emit
    fn prompt_restore_defaults(&self, message: &str);
}

/// Enumerates profile files
pub trait ProfileSource {
    /// Ask for the filename listing; answered on the profile stream
    fn request_listing(&self);
}

/// Producer halves of the notification streams (held by the store)
#[derive(Debug, Clone)]
pub struct StoreSenders {
    pub documents: UnboundedSender<Option<SettingsDocument>>,
    pub profiles: UnboundedSender<Vec<String>>,
}

/// Consumer halves, owned by one synchronizer session and dropped together
#[derive(Debug)]
pub struct Subscriptions {
    pub documents: UnboundedReceiver<Option<SettingsDocument>>,
    pub profiles: UnboundedReceiver<Vec<String>>,
}

/// Create both notification streams
pub fn channels() -> (StoreSenders, Subscriptions) {
    let (doc_tx, doc_rx) = unbounded_channel();
    let (profile_tx, profile_rx) = unbounded_channel();
    (
        StoreSenders {
            documents: doc_tx,
            profiles: profile_tx,
        },
        Subscriptions {
            documents: doc_rx,
            profiles: profile_rx,
        },
    )
}
