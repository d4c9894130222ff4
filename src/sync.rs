//! Settings synchronizer
//!
//! Keeps the live [`FormModel`] consistent with the persisted document and
//! the profile directory. State is either uninitialized (nothing loaded) or
//! loaded with a `last_saved` snapshot. Unsaved edits are never tracked with
//! a flag: cancel and [`SettingsSynchronizer::is_dirty`] always recompute
//! from `last_saved`.
//!
//! Handlers run to completion one event at a time on the caller's thread.
//! Both notification streams are owned as one [`Subscriptions`] value, so
//! ending the session drops them together and no handler can run after.

use tracing::{debug, info};

use crate::config::{to_document, to_form, FormModel, SettingsDocument};
use crate::constants::prompts::RESET_CONFIRM_MESSAGE;
use crate::profiles::{descriptors_from_listing, ProfileDescriptor};
use crate::store::{ProfileSource, SettingsSource, Subscriptions};

/// One notification taken off a stream
enum SyncEvent {
    Document(Option<SettingsDocument>),
    ProfileListing(Vec<String>),
}

pub struct SettingsSynchronizer<'a> {
    settings: &'a dyn SettingsSource,
    profile_source: &'a dyn ProfileSource,
    subscriptions: Option<Subscriptions>,
    initialized: bool,
    last_saved: Option<SettingsDocument>,
    form: FormModel,
    profiles: Vec<ProfileDescriptor>,
    listing_received: bool,
}

impl<'a> SettingsSynchronizer<'a> {
    pub fn new(
        settings: &'a dyn SettingsSource,
        profile_source: &'a dyn ProfileSource,
        subscriptions: Subscriptions,
    ) -> Self {
        Self {
            settings,
            profile_source,
            subscriptions: Some(subscriptions),
            initialized: false,
            last_saved: None,
            form: FormModel::default(),
            profiles: Vec::new(),
            listing_received: false,
        }
    }

    /// Issue both load requests; only the first call per session does anything
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!("Synchronizer already initialized, ignoring");
            return;
        }
        self.initialized = true;
        self.profile_source.request_listing();
        self.settings.request_document();
        info!("Requested settings and profile listing");
    }

    /// Replace snapshot and form with a freshly loaded document.
    ///
    /// Unsaved edits are overwritten unconditionally.
    pub fn on_document_received(&mut self, doc: Option<SettingsDocument>) {
        let Some(doc) = doc else {
            debug!("Empty document notification, still loading");
            return;
        };
        if self.is_dirty() {
            info!("Discarding unsaved edits for newly received settings");
        }
        self.form = to_form(&doc);
        self.last_saved = Some(doc);
        debug!(profiles = self.form.general.profiles.len(), "Form reset from settings");
    }

    /// Replace the whole descriptor list
    pub fn on_profile_directory_received(&mut self, filenames: Vec<String>) {
        self.profiles = descriptors_from_listing(&filenames);
        self.listing_received = true;
        debug!(count = self.profiles.len(), "Profile descriptors updated");
    }

    /// Forward the current form to the store.
    ///
    /// `last_saved` only moves when the store echoes the write back.
    pub fn save(&self) {
        let doc = to_document(&self.form);
        info!(profiles = %doc.general.profiles, "Saving settings");
        self.settings.write(doc);
    }

    /// Drop unsaved edits; no-op before the first load
    pub fn cancel(&mut self) {
        if let Some(saved) = &self.last_saved {
            self.form = to_form(saved);
            info!("Unsaved edits discarded");
        }
    }

    /// Ask the store to confirm and restore defaults
    pub fn reset_to_default(&self) {
        self.settings.prompt_restore_defaults(RESET_CONFIRM_MESSAGE);
    }

    /// Apply every queued notification, each stream in emission order.
    ///
    /// Returns how many events were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(doc) = self
            .subscriptions
            .as_mut()
            .and_then(|s| s.documents.try_recv().ok())
        {
            self.on_document_received(doc);
            handled += 1;
        }
        while let Some(names) = self
            .subscriptions
            .as_mut()
            .and_then(|s| s.profiles.try_recv().ok())
        {
            self.on_profile_directory_received(names);
            handled += 1;
        }
        handled
    }

    /// Wait for one notification on either stream and apply it.
    ///
    /// Returns false once the session has ended or both streams closed.
    pub async fn next_event(&mut self) -> bool {
        let Some(subs) = self.subscriptions.as_mut() else {
            return false;
        };
        let event = tokio::select! {
            Some(doc) = subs.documents.recv() => SyncEvent::Document(doc),
            Some(names) = subs.profiles.recv() => SyncEvent::ProfileListing(names),
            else => return false,
        };
        match event {
            SyncEvent::Document(doc) => self.on_document_received(doc),
            SyncEvent::ProfileListing(names) => self.on_profile_directory_received(names),
        }
        true
    }

    /// Unsubscribe from both streams at once
    pub fn end_session(&mut self) {
        if self.subscriptions.take().is_some() {
            info!("Settings session ended");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.last_saved.is_some()
    }

    /// Whether the form differs from the last saved document
    pub fn is_dirty(&self) -> bool {
        self.last_saved
            .as_ref()
            .is_some_and(|saved| to_form(saved) != self.form)
    }

    pub fn form(&self) -> &FormModel {
        &self.form
    }

    /// User input path
    pub fn form_mut(&mut self) -> &mut FormModel {
        &mut self.form
    }

    /// Whether any profile listing has arrived (it may be empty)
    pub fn has_profile_listing(&self) -> bool {
        self.listing_received
    }

    pub fn last_saved(&self) -> Option<&SettingsDocument> {
        self.last_saved.as_ref()
    }

    pub fn profiles(&self) -> &[ProfileDescriptor] {
        &self.profiles
    }
}

impl Drop for SettingsSynchronizer<'_> {
    fn drop(&mut self) {
        self.end_session();
    }
}
