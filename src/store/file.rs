//! File-backed settings and profile sources
//!
//! A single worker thread owns all file I/O. Callers enqueue requests and
//! return immediately; results come back on the notification streams.
//! Every successful write is echoed on the document stream, so the
//! synchronizer's last-saved snapshot follows what is actually on disk.

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::{ConfirmPrompt, ProfileSource, SettingsSource, StoreSenders};
use crate::config::document::{AdvancedOptions, CharSettings, GeneralSettings};
use crate::config::{AppPaths, SettingsDocument};

/// Work items processed in order by the store thread
#[derive(Debug)]
enum StoreRequest {
    LoadDocument,
    ListProfiles,
    Write(SettingsDocument),
    RestoreDefaults(String),
    /// Acknowledged once every earlier request is done
    Barrier(oneshot::Sender<()>),
}

/// Settings written on first run and on reset
pub fn factory_defaults() -> SettingsDocument {
    SettingsDocument {
        general: GeneralSettings {
            profiles: String::new(),
            run_vision_mode_on_startup: "false".to_string(),
            check_chest_tabs: "false".to_string(),
            hidden_transparency: "50".to_string(),
            local_prefs_path: String::new(),
        },
        character: CharSettings {
            inventory: "i".to_string(),
            skill4: "t".to_string(),
            skill3: "r".to_string(),
            health_pot: "1".to_string(),
        },
        advanced_options: AdvancedOptions {
            run_scripts: "false".to_string(),
            run_filter: "false".to_string(),
            exit_key: "f12".to_string(),
            log_lvl: "info".to_string(),
            scripts: String::new(),
        },
    }
}

/// Handle to the store thread
pub struct FileStore {
    requests: Sender<StoreRequest>,
    worker: JoinHandle<()>,
}

impl FileStore {
    /// Start the store thread
    pub fn spawn(paths: AppPaths, prompt: Box<dyn ConfirmPrompt>, senders: StoreSenders) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let worker = StoreWorker { paths, prompt, senders };
        let handle = thread::Builder::new()
            .name("settings-store".to_string())
            .spawn(move || worker.run(rx))
            .context("Failed to spawn settings store thread")?;
        Ok(Self {
            requests: tx,
            worker: handle,
        })
    }

    /// Finish queued requests and stop the thread
    pub fn shutdown(self) -> Result<()> {
        let Self { requests, worker } = self;
        drop(requests);
        worker
            .join()
            .map_err(|_| anyhow!("Settings store thread panicked"))
    }

    /// Wait until every request issued so far has been processed
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(StoreRequest::Barrier(tx))
            .map_err(|_| anyhow!("Settings store thread is gone"))?;
        rx.await.context("Settings store stopped before flushing")
    }

    fn enqueue(&self, request: StoreRequest) {
        if let Err(e) = self.requests.send(request) {
            error!(request = ?e.0, "Settings store thread is gone, request dropped");
        }
    }
}

impl SettingsSource for FileStore {
    fn request_document(&self) {
        self.enqueue(StoreRequest::LoadDocument);
    }

    fn write(&self, doc: SettingsDocument) {
        self.enqueue(StoreRequest::Write(doc));
    }

    fn prompt_restore_defaults(&self, message: &str) {
        self.enqueue(StoreRequest::RestoreDefaults(message.to_string()));
    }
}

impl ProfileSource for FileStore {
    fn request_listing(&self) {
        self.enqueue(StoreRequest::ListProfiles);
    }
}

struct StoreWorker {
    paths: AppPaths,
    prompt: Box<dyn ConfirmPrompt>,
    senders: StoreSenders,
}

impl StoreWorker {
    fn run(mut self, requests: Receiver<StoreRequest>) {
        info!(path = %self.paths.settings_file.display(), "Settings store started");
        for request in requests {
            debug!(request = ?request, "Processing store request");
            match request {
                StoreRequest::LoadDocument => match load_or_create(&self.paths.settings_file) {
                    Ok(doc) => self.emit_document(doc),
                    Err(e) => error!(error = ?e, "Failed to load settings"),
                },
                StoreRequest::ListProfiles => match list_profiles(&self.paths.profile_dir) {
                    Ok(names) => self.emit_listing(names),
                    Err(e) => error!(error = ?e, "Failed to list profiles"),
                },
                StoreRequest::Write(doc) => match save(&self.paths.settings_file, &doc) {
                    Ok(()) => self.emit_document(doc),
                    Err(e) => error!(error = ?e, "Failed to save settings"),
                },
                StoreRequest::RestoreDefaults(message) => {
                    if !self.prompt.confirm(&message) {
                        info!("Default settings declined");
                        continue;
                    }
                    let defaults = factory_defaults();
                    match save(&self.paths.settings_file, &defaults) {
                        Ok(()) => {
                            info!("Restored default settings");
                            self.emit_document(defaults);
                        }
                        Err(e) => error!(error = ?e, "Failed to restore default settings"),
                    }
                }
                StoreRequest::Barrier(ack) => {
                    let _ = ack.send(());
                }
            }
        }
        info!("Settings store stopped");
    }

    fn emit_document(&self, doc: SettingsDocument) {
        if self.senders.documents.send(Some(doc)).is_err() {
            debug!("Document stream closed, notification dropped");
        }
    }

    fn emit_listing(&self, names: Vec<String>) {
        if self.senders.profiles.send(names).is_err() {
            debug!("Profile stream closed, notification dropped");
        }
    }
}

/// Load the settings file, writing defaults first if it does not exist
fn load_or_create(path: &Path) -> Result<SettingsDocument> {
    if !path.exists() {
        info!(path = %path.display(), "Settings file not found, creating defaults");
        let defaults = factory_defaults();
        save(path, &defaults)?;
        return Ok(defaults);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let doc: SettingsDocument = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse TOML from {}", path.display()))?;

    info!(path = %path.display(), "Loaded settings");
    Ok(doc)
}

fn save(path: &Path, doc: &SettingsDocument) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(doc).context("Failed to serialize settings to TOML")?;
    fs::write(path, toml_string)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    info!(path = %path.display(), "Saved settings");
    Ok(())
}

/// Regular file names in the profile directory, sorted
fn list_profiles(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        info!(path = %dir.display(), "Profile directory not found, no profiles");
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read profile directory {}", dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "Skipping non UTF-8 profile filename"),
        }
    }
    names.sort();

    debug!(count = names.len(), "Listed profile files");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{channels, AssumeYes, Subscriptions};

    struct Decline;

    impl ConfirmPrompt for Decline {
        fn confirm(&mut self, _message: &str) -> bool {
            false
        }
    }

    fn test_paths(dir: &tempfile::TempDir) -> AppPaths {
        AppPaths {
            settings_file: dir.path().join("conf").join("settings.toml"),
            profile_dir: dir.path().join("profiles"),
        }
    }

    fn drain_documents(subs: &mut Subscriptions) -> Vec<Option<SettingsDocument>> {
        let mut docs = Vec::new();
        while let Ok(doc) = subs.documents.try_recv() {
            docs.push(doc);
        }
        docs
    }

    #[test]
    fn test_load_creates_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        let (senders, mut subs) = channels();

        let store = FileStore::spawn(paths.clone(), Box::new(AssumeYes), senders).unwrap();
        store.request_document();
        store.shutdown().unwrap();

        assert!(paths.settings_file.exists());
        assert_eq!(drain_documents(&mut subs), vec![Some(factory_defaults())]);
    }

    #[test]
    fn test_write_persists_and_echoes() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        let (senders, mut subs) = channels();

        let mut doc = factory_defaults();
        doc.general.profiles = "alpha,beta".to_string();
        doc.character.health_pot = "2".to_string();

        let store = FileStore::spawn(paths.clone(), Box::new(AssumeYes), senders).unwrap();
        store.write(doc.clone());
        store.request_document();
        store.shutdown().unwrap();

        // echo of the write, then the reload
        assert_eq!(drain_documents(&mut subs), vec![Some(doc.clone()), Some(doc)]);
    }

    #[test]
    fn test_parse_failure_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        fs::create_dir_all(paths.settings_file.parent().unwrap()).unwrap();
        fs::write(&paths.settings_file, "[general\nbroken").unwrap();
        let (senders, mut subs) = channels();

        let store = FileStore::spawn(paths, Box::new(AssumeYes), senders).unwrap();
        store.request_document();
        store.shutdown().unwrap();

        assert!(drain_documents(&mut subs).is_empty());
    }

    #[test]
    fn test_restore_defaults_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        let mut edited = factory_defaults();
        edited.advanced_options.exit_key = "f10".to_string();
        save(&paths.settings_file, &edited).unwrap();

        let (senders, mut subs) = channels();
        let store = FileStore::spawn(paths.clone(), Box::new(Decline), senders).unwrap();
        store.prompt_restore_defaults("reset?");
        store.shutdown().unwrap();
        assert!(drain_documents(&mut subs).is_empty());
        assert_eq!(load_or_create(&paths.settings_file).unwrap(), edited);

        let (senders, mut subs) = channels();
        let store = FileStore::spawn(paths.clone(), Box::new(AssumeYes), senders).unwrap();
        store.prompt_restore_defaults("reset?");
        store.shutdown().unwrap();
        assert_eq!(drain_documents(&mut subs), vec![Some(factory_defaults())]);
        assert_eq!(load_or_create(&paths.settings_file).unwrap(), factory_defaults());
    }

    #[test]
    fn test_listing_sorted_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        fs::create_dir_all(paths.profile_dir.join("nested")).unwrap();
        for name in ["zeta.yml", "alpha.yaml", "plain"] {
            fs::write(paths.profile_dir.join(name), "").unwrap();
        }

        let (senders, mut subs) = channels();
        let store = FileStore::spawn(paths, Box::new(AssumeYes), senders).unwrap();
        store.request_listing();
        store.shutdown().unwrap();

        assert_eq!(
            subs.profiles.try_recv().unwrap(),
            vec!["alpha.yaml".to_string(), "plain".to_string(), "zeta.yml".to_string()]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_flush_waits_for_queued_requests() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        let (senders, mut subs) = channels();

        let store = FileStore::spawn(paths, Box::new(AssumeYes), senders).unwrap();
        store.request_document();
        store.request_listing();
        store.flush().await.unwrap();

        assert!(subs.documents.try_recv().is_ok());
        assert!(subs.profiles.try_recv().unwrap().is_empty());
        store.shutdown().unwrap();
    }

    #[test]
    fn test_missing_profile_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_profiles(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn test_closed_streams_do_not_stop_worker() {
        let dir = tempfile::tempdir().unwrap();
        let paths = test_paths(&dir);
        let (senders, subs) = channels();
        drop(subs);

        let store = FileStore::spawn(paths.clone(), Box::new(AssumeYes), senders).unwrap();
        store.request_document();
        store.write(factory_defaults());
        store.shutdown().unwrap();
        assert!(paths.settings_file.exists());
    }
}
