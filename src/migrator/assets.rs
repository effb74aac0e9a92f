//! Library file copy and theme copy

use super::{Migrator, progress_logger};
use crate::error::Result;
use crate::palette::{palette_location, transform_palette};
use crate::platform::ApplyOptions;
use crate::template::{ContentSource, FileEntry, FileLevel, Template};
use tracing::info;

/// Build the file entry provisioning `file_url` from its library.
///
/// `src` is the path inside the library and `folder` the site-relative folder
/// holding the file, library name included.
pub fn library_file_entry(file_url: &str, web_server_relative_url: &str) -> FileEntry {
    let web = web_server_relative_url.trim_end_matches('/');
    let site_relative = match file_url.get(..web.len()) {
        Some(head) if head.eq_ignore_ascii_case(web) => &file_url[web.len()..],
        _ => file_url,
    };
    let site_relative = site_relative.trim_start_matches('/');

    let src = site_relative
        .split_once('/')
        .map_or(site_relative, |(_, rest)| rest);
    let folder = site_relative
        .rsplit_once('/')
        .map_or("", |(folder, _)| folder);

    FileEntry {
        src: src.to_string(),
        folder: folder.to_string(),
        overwrite: true,
        level: FileLevel::published,
    }
}

impl Migrator<'_> {
    /// Copy every file of a source library onto the target
    pub fn copy_library_files(&self, source_url: &str, target_url: &str, library: &str) -> Result<()> {
        let source = self.source.workspace(source_url)?;
        let files = self.source.list_files(&source, library)?;

        let mut template = Template::new();
        template.files = files
            .iter()
            .map(|f| library_file_entry(f, &source.server_relative_url))
            .collect();
        template.content_source = Some(ContentSource {
            workspace_url: source.url.clone(),
            library: library.to_string(),
        });

        let target = self.target.workspace(target_url)?;
        let options = ApplyOptions {
            progress: Some(progress_logger()),
            ..ApplyOptions::default()
        };
        self.target.apply_template(&target, &template, &options)?;
        info!(library, files = template.files.len(), "library files copied");
        Ok(())
    }

    /// Copy the source workspace's color palette onto the target as a named theme
    pub fn copy_theme(&self, source_url: &str, target_url: &str) -> Result<()> {
        let source = self.source.workspace(source_url)?;
        let themed_folder = self.source.themed_css_folder_url(&source)?;
        let location = palette_location(&source.url, &source.server_relative_url, &themed_folder);
        info!(url = %location.url, "reading color palette");

        let xml = self.source.read_file_as_string(&source, &location.path)?;
        let palette = transform_palette(&xml)?.to_json()?;

        let target = self.target.workspace(target_url)?;
        self.target.apply_theme(&target, &self.config.theme.name, &palette)?;
        info!(theme = %self.config.theme.name, target = %target.url, "theme applied");
        Ok(())
    }
}
