//! User identity cache
//!
//! Memoizes `(workspace, user id) -> login name` lookups for one migration run.
//! Entries are never evicted. Each key has its own slot lock, so concurrent
//! callers asking for the same key wait for a single fetch instead of issuing
//! their own; callers for different keys do not block each other.

use crate::codec::LoginResolver;
use crate::error::PlatformError;
use crate::platform::{PlatformResult, SitePlatform, Workspace};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

type Slot = Arc<Mutex<Option<String>>>;

#[derive(Default)]
pub struct UserIdentityCache {
    slots: Mutex<HashMap<(String, u32), Slot>>,
}

impl UserIdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &self,
        platform: &dyn SitePlatform,
        workspace: &Workspace,
        user_id: u32,
    ) -> PlatformResult<String> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                slots
                    .entry((workspace.id.clone(), user_id))
                    .or_default(),
            )
        };

        let mut entry = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(login) = entry.as_ref() {
            return Ok(login.clone());
        }

        debug!(workspace = %workspace.id, user_id, "fetching login name");
        let login = platform.resolve_login_name(workspace, user_id)?;
        *entry = Some(login.clone());
        Ok(login)
    }

    /// Number of resolved entries
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind the cache to one workspace for use by the field value codec
    pub fn for_workspace<'a>(
        &'a self,
        platform: &'a dyn SitePlatform,
        workspace: &'a Workspace,
    ) -> WorkspaceLogins<'a> {
        WorkspaceLogins {
            cache: self,
            platform,
            workspace,
        }
    }
}

pub struct WorkspaceLogins<'a> {
    cache: &'a UserIdentityCache,
    platform: &'a dyn SitePlatform,
    workspace: &'a Workspace,
}

impl LoginResolver for WorkspaceLogins<'_> {
    fn login_name(&self, user_id: u32) -> Result<String, PlatformError> {
        self.cache.resolve(self.platform, self.workspace, user_id)
    }
}
