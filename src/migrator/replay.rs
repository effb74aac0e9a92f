//! Loading, replaying and page path restoration

use super::{MigrationPhase, Migrator, ReplayReport, progress_logger};
use crate::codec::page_path::{PageRelocation, plan_relocation};
use crate::error::{MigrationError, Result};
use crate::platform::{ApplyOptions, Workspace};
use std::collections::BTreeSet;
use tracing::{debug, info};

impl Migrator<'_> {
    /// Load the persisted template and apply it to the target workspace
    pub fn replay(&mut self, target_url: &str) -> Result<ReplayReport> {
        self.try_replay(target_url).map_err(|e| self.fail(e))
    }

    fn try_replay(&mut self, target_url: &str) -> Result<ReplayReport> {
        self.enter(MigrationPhase::Loading);
        let mut template = self.store.load(&self.config.store.file_name)?;

        self.enter(MigrationPhase::Replaying);
        if let Some(list) = self.config.replay.auxiliary_list.to_list_definition()
            && template.find_list(&list.title).is_none()
        {
            debug!(list = %list.title, "injecting auxiliary list");
            template.lists.push(list);
        }

        let workspace = self.target.workspace(target_url)?;
        let options = ApplyOptions {
            clear_navigation: self.config.replay.clear_navigation,
            provision_content_types_to_sub_webs: self
                .config
                .replay
                .provision_content_types_to_sub_webs,
            progress: Some(progress_logger()),
        };
        self.target.apply_template(&workspace, &template, &options)?;
        info!(workspace = %workspace.url, lists = template.lists.len(), "template applied");

        self.enter(MigrationPhase::PostFixing);
        let relocated_pages = self.restore_page_paths(&workspace)?;

        self.enter(MigrationPhase::Done);
        Ok(ReplayReport {
            lists: template.lists.len(),
            relocated_pages,
        })
    }

    /// Move flattened pages back into their folders.
    ///
    /// Pages whose restored path is already taken are left in place and
    /// reported together once every other page has been handled.
    fn restore_page_paths(&self, workspace: &Workspace) -> Result<Vec<String>> {
        let web_url = workspace.server_relative_url.trim_end_matches('/');
        let library_url = format!("{}/{}", web_url, self.config.replay.pages_library);

        let plans: Vec<PageRelocation> = self
            .target
            .list_files(workspace, &self.config.replay.pages_library)?
            .iter()
            .filter_map(|file| plan_relocation(file, &library_url, web_url))
            .collect();

        let mut ensured: BTreeSet<String> = BTreeSet::new();
        let mut relocated = Vec::new();
        let mut conflicts = Vec::new();
        for plan in plans {
            if self.target.file_exists(workspace, &plan.to)? {
                conflicts.push(plan.to);
                continue;
            }
            for folder in &plan.folders {
                if ensured.insert(folder.clone()) {
                    self.target.ensure_folder(workspace, folder)?;
                }
            }
            self.target.move_file(workspace, &plan.from, &plan.to)?;
            debug!(from = %plan.from, to = %plan.to, "page restored");
            relocated.push(plan.to);
        }

        if !conflicts.is_empty() {
            return Err(MigrationError::PathRestoreConflict { paths: conflicts });
        }
        Ok(relocated)
    }
}
