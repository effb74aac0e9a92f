//! Migration orchestrator
//!
//! Sequences the phases of a migration:
//!
//! ```text
//! Idle -> Extracting -> Normalizing -> Persisting -> (gap) -> Loading -> Replaying -> PostFixing -> Done
//! Done -> CopyingFiles -> Done                                     (full run only)
//! ```
//!
//! The first unrecovered error is terminal. Nothing applied to the target is
//! rolled back; a failed replay needs manual remediation on the target.
//! Theme copy runs outside this sequence and never aborts it.

mod assets;
mod extract;
mod replay;

use crate::config::MigrationConfig;
use crate::error::{ItemError, MigrationError, Result};
use crate::identity::UserIdentityCache;
use crate::normalize::{EventListHook, ListHook};
use crate::platform::{MessageKind, ProgressCallback, ProvisioningEvent, SitePlatform};
use crate::template::TemplateStore;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

pub use assets::library_file_entry;
pub use extract::ARCHIVE_TIMESTAMP_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPhase {
    Idle,
    Extracting,
    Normalizing,
    Persisting,
    Loading,
    Replaying,
    PostFixing,
    CopyingFiles,
    Done,
    Failed(FailedPhase),
}

/// Phase in which a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedPhase {
    Extracting,
    Normalizing,
    Persisting,
    Loading,
    Replaying,
    PostFixing,
    CopyingFiles,
}

impl fmt::Display for FailedPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailedPhase::Extracting => "extracting",
            FailedPhase::Normalizing => "normalizing",
            FailedPhase::Persisting => "persisting",
            FailedPhase::Loading => "loading",
            FailedPhase::Replaying => "replaying",
            FailedPhase::PostFixing => "post-fixing",
            FailedPhase::CopyingFiles => "copying files",
        };
        f.write_str(name)
    }
}

impl fmt::Display for MigrationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationPhase::Idle => f.write_str("idle"),
            MigrationPhase::Extracting => f.write_str("extracting"),
            MigrationPhase::Normalizing => f.write_str("normalizing"),
            MigrationPhase::Persisting => f.write_str("persisting"),
            MigrationPhase::Loading => f.write_str("loading"),
            MigrationPhase::Replaying => f.write_str("replaying"),
            MigrationPhase::PostFixing => f.write_str("post-fixing"),
            MigrationPhase::CopyingFiles => f.write_str("copying files"),
            MigrationPhase::Done => f.write_str("done"),
            MigrationPhase::Failed(phase) => write!(f, "failed while {}", phase),
        }
    }
}

impl MigrationPhase {
    fn as_failed(self) -> Option<FailedPhase> {
        Some(match self {
            MigrationPhase::Extracting => FailedPhase::Extracting,
            MigrationPhase::Normalizing => FailedPhase::Normalizing,
            MigrationPhase::Persisting => FailedPhase::Persisting,
            MigrationPhase::Loading => FailedPhase::Loading,
            MigrationPhase::Replaying => FailedPhase::Replaying,
            MigrationPhase::PostFixing => FailedPhase::PostFixing,
            MigrationPhase::CopyingFiles => FailedPhase::CopyingFiles,
            _ => return None,
        })
    }
}

/// Outcome of an extraction run
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub lists: Vec<String>,
    pub rows: usize,
    pub rewritten_fields: usize,
    pub encoded_pages: usize,
    /// Item value failures below the per-list threshold
    pub item_errors: Vec<ItemError>,
    /// Lists whose data rows were dropped, one `TooManyItemErrors` each
    pub aborted_lists: Vec<MigrationError>,
    /// Name the previous template was kept under, if one existed
    pub archived_template: Option<String>,
}

/// Outcome of a replay run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub lists: usize,
    pub relocated_pages: Vec<String>,
}

/// Drives extraction from a source workspace and replay onto a target
pub struct Migrator<'a> {
    source: &'a dyn SitePlatform,
    target: &'a dyn SitePlatform,
    store: &'a dyn TemplateStore,
    identities: &'a UserIdentityCache,
    config: MigrationConfig,
    hooks: Vec<Box<dyn ListHook>>,
    phase: MigrationPhase,
}

impl<'a> Migrator<'a> {
    pub fn new(
        source: &'a dyn SitePlatform,
        target: &'a dyn SitePlatform,
        store: &'a dyn TemplateStore,
        identities: &'a UserIdentityCache,
        config: MigrationConfig,
    ) -> Self {
        let hooks: Vec<Box<dyn ListHook>> = vec![Box::new(EventListHook::new(
            config.extraction.events_list_pattern.clone(),
        ))];
        Self {
            source,
            target,
            store,
            identities,
            config,
            hooks,
            phase: MigrationPhase::Idle,
        }
    }

    /// Register an additional per-list hook, run after the built-in ones
    pub fn with_hook(mut self, hook: Box<dyn ListHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn phase(&self) -> MigrationPhase {
        self.phase
    }

    fn enter(&mut self, phase: MigrationPhase) {
        info!(phase = %phase, "migration phase");
        self.phase = phase;
    }

    /// Record a terminal failure in the current phase
    fn fail(&mut self, err: MigrationError) -> MigrationError {
        if let Some(failed) = self.phase.as_failed() {
            error!(
                phase = %failed,
                error = %err,
                "migration aborted; changes already applied to the target need manual remediation"
            );
            self.phase = MigrationPhase::Failed(failed);
        }
        err
    }

    /// Extract, replay, copy library files and copy the theme
    pub fn run(&mut self, source_url: &str, target_url: &str) -> Result<ReplayReport> {
        let report = self.extract(source_url)?;
        info!(
            lists = report.lists.len(),
            rows = report.rows,
            item_errors = report.item_errors.len(),
            aborted_lists = report.aborted_lists.len(),
            "extraction finished"
        );

        let replayed = self.replay(target_url)?;

        self.enter(MigrationPhase::CopyingFiles);
        let library = self.config.replay.asset_library.clone();
        self.copy_library_files(source_url, target_url, &library)
            .map_err(|e| self.fail(e))?;
        self.enter(MigrationPhase::Done);

        if let Err(e) = self.copy_theme(source_url, target_url) {
            warn!(error = %e, "theme copy failed; content migration is unaffected");
        }
        Ok(replayed)
    }
}

/// Forward platform progress into the log
pub(crate) fn progress_logger() -> ProgressCallback {
    Arc::new(|event: &ProvisioningEvent| match event {
        ProvisioningEvent::Message {
            kind: MessageKind::Warning,
            ..
        } => warn!("{}", event),
        ProvisioningEvent::Message {
            kind: MessageKind::Error,
            ..
        } => error!("{}", event),
        _ => info!("{}", event),
    })
}
