#![forbid(unsafe_code)]

mod cli;
mod config;
mod constants;
mod profiles;
mod store;
mod sync;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::{parse_assignment, Cli, Command};
use config::form::FIELD_PATHS;
use config::{to_document, AppPaths, FormModel};
use constants::logging::LEVEL_ENV;
use profiles::ProfileDescriptor;
use store::{factory_defaults, AssumeYes, ConfirmPrompt, FileStore, StdinPrompt};
use sync::SettingsSynchronizer;

#[derive(Serialize)]
struct Report<'a> {
    settings: &'a FormModel,
    available_profiles: &'a [ProfileDescriptor],
}

fn parse_level(raw: &str) -> TraceLevel {
    match raw.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn init_logging(level_override: Option<&str>) -> Result<()> {
    let raw = match level_override {
        Some(level) => level.to_string(),
        None => std::env::var(LEVEL_ENV).unwrap_or_else(|_| "info".to_string()),
    };

    // stdout carries command output, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&raw))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

/// Apply notifications as they arrive until the store has finished its queued work
async fn settle(store: &FileStore, sync: &mut SettingsSynchronizer<'_>) -> Result<usize> {
    let flushed = store.flush();
    tokio::pin!(flushed);

    let mut handled = 0;
    loop {
        tokio::select! {
            biased;
            applied = sync.next_event() => {
                if !applied {
                    break;
                }
                handled += 1;
            }
            result = &mut flushed => {
                result?;
                break;
            }
        }
    }
    // anything emitted right before the flush ack
    Ok(handled + sync.pump())
}

async fn load(store: &FileStore, sync: &mut SettingsSynchronizer<'_>) -> Result<()> {
    sync.initialize();
    settle(store, sync).await?;
    if !sync.is_loaded() {
        bail!("Settings could not be loaded (see log for details)");
    }
    if !sync.has_profile_listing() {
        warn!("Profile directory could not be read, no profiles available");
    }
    Ok(())
}

fn print_form(form: &FormModel) {
    for path in FIELD_PATHS {
        println!("{path} = {}", form.field(path).unwrap_or_default());
    }
    println!("general.profiles = [{}]", form.general.profiles.join(", "));
}

fn print_profiles(sync: &SettingsSynchronizer<'_>) {
    let form = sync.form();
    for descriptor in sync.profiles() {
        let marker = if form.active_profile() == Some(descriptor.id.as_str()) {
            '*'
        } else if form.general.profiles.contains(&descriptor.id) {
            '+'
        } else {
            ' '
        };
        println!("{marker} {}", descriptor.name);
    }

    for id in &form.general.profiles {
        if !sync.profiles().iter().any(|d| &d.id == id) {
            warn!(profile = %id, "Selected profile has no file in the profile directory");
        }
    }
}

async fn apply_edits(
    store: &FileStore,
    sync: &mut SettingsSynchronizer<'_>,
    assignments: Vec<String>,
    add_profiles: Vec<String>,
    remove_profiles: Vec<String>,
    activate: Option<String>,
    dry_run: bool,
) -> Result<()> {
    for raw in &assignments {
        let (path, value) = parse_assignment(raw)?;
        sync.form_mut().set_field(path, value)?;
    }

    for id in &remove_profiles {
        if !sync.form_mut().remove_profile(id) {
            warn!(profile = %id, "Profile was not selected, nothing removed");
        }
    }

    for id in add_profiles {
        if !sync.profiles().iter().any(|d| d.id == id) {
            warn!(profile = %id, "Profile not found in profile directory, adding anyway");
        }
        sync.form_mut().add_profile(id)?;
    }

    if let Some(id) = activate {
        sync.form_mut().activate_profile(&id)?;
    }

    if dry_run {
        let doc = to_document(sync.form());
        if sync.last_saved() == Some(&doc) {
            info!("Dry run: settings unchanged");
        }
        print!("{}", toml::to_string_pretty(&doc).context("Failed to serialize settings to TOML")?);
        sync.cancel();
        return Ok(());
    }

    if !sync.is_dirty() {
        println!("No changes to save");
        return Ok(());
    }

    sync.save();
    settle(store, sync).await?;
    if sync.is_dirty() {
        bail!("Settings were not saved (see log for details)");
    }
    println!("Saved settings");
    Ok(())
}

async fn reset_defaults(store: &FileStore, sync: &mut SettingsSynchronizer<'_>, confirmed: bool) -> Result<()> {
    sync.reset_to_default();
    let handled = settle(store, sync).await?;

    if handled > 0 && sync.last_saved() == Some(&factory_defaults()) {
        println!("Default settings restored");
        return Ok(());
    }
    if confirmed {
        bail!("Default settings were not restored (see log for details)");
    }
    println!("Reset cancelled");
    Ok(())
}

async fn run(store: &FileStore, sync: &mut SettingsSynchronizer<'_>, command: Command) -> Result<()> {
    load(store, sync).await?;

    match command {
        Command::Show { json } => {
            if json {
                let report = Report {
                    settings: sync.form(),
                    available_profiles: sync.profiles(),
                };
                println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize settings to JSON")?);
            } else {
                print_form(sync.form());
            }
        }
        Command::Profiles => print_profiles(sync),
        Command::Set {
            assignments,
            add_profiles,
            remove_profiles,
            activate,
            dry_run,
        } => {
            apply_edits(store, sync, assignments, add_profiles, remove_profiles, activate, dry_run).await?;
        }
        Command::Reset { yes } => reset_defaults(store, sync, yes).await?,
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let paths = AppPaths::resolve(cli.settings_file.clone(), cli.profile_dir.clone());
    info!(
        settings = %paths.settings_file.display(),
        profiles = %paths.profile_dir.display(),
        "Using settings paths"
    );

    let prompt: Box<dyn ConfirmPrompt> = match &cli.command {
        Command::Reset { yes: true } => Box::new(AssumeYes),
        _ => Box::new(StdinPrompt),
    };

    let (senders, subscriptions) = store::channels();
    let store = FileStore::spawn(paths, prompt, senders)?;

    let result = {
        let mut sync = SettingsSynchronizer::new(&store, &store, subscriptions);
        let result = run(&store, &mut sync, cli.command).await;
        sync.end_session();
        result
    };

    store.shutdown()?;
    result
}
