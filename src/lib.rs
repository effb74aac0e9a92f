//! Site Migration Library
//!
//! This library moves the content structure of a hosted collaboration
//! workspace to another workspace. It extracts a provisioning template from
//! the source, normalizes it so it replays cleanly elsewhere, persists it, and
//! applies it to the target with data rows, pages and theme.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Orchestration Layer**: [`Migrator`] - Sequences extraction and replay phases
//! - **Domain Layer**: `codec`, `normalize`, `palette` - Value encoding and template rewriting
//! - **Persistence Layer**: `template` module - TOML template store
//!
//! Remote workspaces are reached only through the [`SitePlatform`] trait.
//!
//! # Example
//!
//! ```no_run
//! use site_migrate::{FileTemplateStore, MigrationConfig, Migrator, SitePlatform, UserIdentityCache};
//! use anyhow::Result;
//!
//! fn migrate(source: &dyn SitePlatform, target: &dyn SitePlatform) -> Result<()> {
//!     let config = MigrationConfig::default();
//!     let store = FileTemplateStore::new(&config.store.directory);
//!     let identities = UserIdentityCache::new();
//!     let mut migrator = Migrator::new(source, target, &store, &identities, config);
//!     migrator.run("https://t.example.com/sites/source", "https://t.example.com/sites/target")?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod formatting;
pub mod identity;
pub mod markup;
pub mod migrator;
pub mod normalize;
pub mod palette;
pub mod platform;
pub mod template;

// Re-export commonly used types
pub use config::MigrationConfig;
pub use error::{ItemError, MigrationError, PlatformError, Result};
pub use identity::UserIdentityCache;
pub use migrator::{ExtractionReport, MigrationPhase, Migrator, ReplayReport};
pub use platform::{SitePlatform, Workspace};
pub use template::{FileTemplateStore, Template, TemplateStore};
