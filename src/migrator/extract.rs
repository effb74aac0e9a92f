//! Extracting, normalizing and persisting

use super::{ExtractionReport, MigrationPhase, Migrator, progress_logger};
use crate::codec::FieldValueCodec;
use crate::codec::page_path::encode_template_pages;
use crate::error::{ItemError, MigrationError, Result};
use crate::normalize::{qualifying_lists, rewrite_list_formulas};
use crate::platform::{ExtractionOptions, FieldMetadata, Workspace};
use crate::template::{DataRow, Template, UpdateBehavior};
use chrono::Local;
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info, warn};

/// Timestamp prefix given to a superseded template file
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

impl Migrator<'_> {
    /// Pull a template from the source workspace, normalize it and persist it
    pub fn extract(&mut self, source_url: &str) -> Result<ExtractionReport> {
        self.try_extract(source_url).map_err(|e| self.fail(e))
    }

    fn try_extract(&mut self, source_url: &str) -> Result<ExtractionReport> {
        self.enter(MigrationPhase::Extracting);
        let workspace = self.source.workspace(source_url)?;
        let all_lists = self.source.list_titles(&workspace)?;
        let qualifying =
            qualifying_lists(&all_lists, &self.config.extraction.excluded_path_fragments);
        if qualifying.is_empty() {
            return Err(MigrationError::NoQualifyingLists {
                workspace: workspace.url.clone(),
            });
        }
        info!(
            workspace = %workspace.url,
            qualifying = qualifying.len(),
            total = all_lists.len(),
            "lists selected for extraction"
        );

        let options = ExtractionOptions {
            include_hidden_lists: true,
            include_all_client_side_pages: true,
            include_site_groups: true,
            lists_to_extract: qualifying.iter().map(|l| l.title.clone()).collect(),
            progress: Some(progress_logger()),
        };
        let mut template = self.source.get_template(&workspace, &options)?;

        self.enter(MigrationPhase::Normalizing);
        let mut report = ExtractionReport::default();
        template.custom_actions.clear();

        let mut live_fields: HashMap<String, Vec<FieldMetadata>> = HashMap::new();
        for list in &mut template.lists {
            let fields = self.source.get_fields(&workspace, &list.title)?;
            report.rewritten_fields += rewrite_list_formulas(list, &fields)?;

            if let Some(summary) = all_lists.iter().find(|s| s.title == list.title) {
                for hook in self.hooks.iter().filter(|h| h.applies_to(summary)) {
                    info!(list = %list.title, hook = hook.name(), "applying list hook");
                    hook.apply(list, &fields)?;
                }
            }
            live_fields.insert(list.title.clone(), fields);
        }

        report.encoded_pages = encode_template_pages(&mut template);
        self.attach_data_rows(&workspace, &mut template, &live_fields, &mut report)?;

        self.enter(MigrationPhase::Persisting);
        report.archived_template = self.archive_existing_template()?;
        self.store.save_as(&template, &self.config.store.file_name)?;
        info!(
            name = %self.config.store.file_name,
            location = %self.store.location(),
            "template saved"
        );

        report.lists = template.lists.iter().map(|l| l.title.clone()).collect();
        Ok(report)
    }

    fn attach_data_rows(
        &self,
        workspace: &Workspace,
        template: &mut Template,
        live_fields: &HashMap<String, Vec<FieldMetadata>>,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        let codec = FieldValueCodec::new(&self.config.extraction.reserved_receiver_field);
        let threshold = self.config.extraction.max_item_errors;

        for list in &mut template.lists {
            list.data_rows.update_behavior = UpdateBehavior::overwrite;
            let fields = live_fields
                .get(&list.title)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let (rows, errors) = self.export_rows(workspace, &list.title, fields, &codec)?;

            // Past the threshold only this list's rows are dropped
            let affected: BTreeSet<u32> = errors.iter().map(|e| e.item_id).collect();
            if affected.len() > threshold {
                let aborted = MigrationError::TooManyItemErrors {
                    list: list.title.clone(),
                    threshold,
                    errors,
                };
                error!(list = %list.title, error = %aborted, "data rows of list dropped");
                report.aborted_lists.push(aborted);
                continue;
            }
            for e in &errors {
                warn!(list = %e.list, item = e.item_id, field = %e.field, "{}", e.message);
            }

            info!(list = %list.title, rows = rows.len(), "data rows exported");
            report.rows += rows.len();
            report.item_errors.extend(errors);
            list.data_rows.rows.extend(rows);
        }
        Ok(())
    }

    /// Encode every item of a list. Items with a failing field are left out
    /// and reported instead.
    fn export_rows(
        &self,
        workspace: &Workspace,
        list_title: &str,
        fields: &[FieldMetadata],
        codec: &FieldValueCodec,
    ) -> Result<(Vec<DataRow>, Vec<ItemError>)> {
        let items = self.source.get_items(workspace, list_title)?;
        let exported: Vec<&FieldMetadata> = fields
            .iter()
            .filter(|f| FieldValueCodec::is_exported(f))
            .collect();
        let logins = self.identities.for_workspace(self.source, workspace);

        let mut rows = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for item in &items {
            let mut row = DataRow::new();
            let mut failed = false;
            for field in &exported {
                let Some(raw) = item.values.get(&field.internal_name) else {
                    continue;
                };
                match codec.encode_text(field, raw, &logins) {
                    Ok(value) => row.insert(field.internal_name.clone(), value),
                    Err(e) => {
                        failed = true;
                        errors.push(ItemError {
                            list: list_title.to_string(),
                            item_id: item.id,
                            field: field.internal_name.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            if !failed {
                rows.push(row);
            }
        }
        Ok((rows, errors))
    }

    /// Move an existing template aside under a timestamped name
    fn archive_existing_template(&self) -> Result<Option<String>> {
        let name = &self.config.store.file_name;
        if !self.store.exists(name)? {
            return Ok(None);
        }
        let archived = format!("{}_{}", Local::now().format(ARCHIVE_TIMESTAMP_FORMAT), name);
        self.store.rename(name, &archived)?;
        info!(from = %name, to = %archived, "previous template archived");
        Ok(Some(archived))
    }
}
