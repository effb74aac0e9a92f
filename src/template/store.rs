use crate::error::{MigrationError, Result};
use crate::template::Template;
use std::fs;
use std::path::{Path, PathBuf};

/// Where persisted templates live between extraction and replay
pub trait TemplateStore: Send + Sync {
    /// Persist `template` under `name`, replacing any file of that name
    fn save_as(&self, template: &Template, name: &str) -> Result<()>;

    /// Load the template stored under `name`
    ///
    /// Returns [`MigrationError::TemplateNotFound`] when nothing is stored there.
    fn load(&self, name: &str) -> Result<Template>;

    fn exists(&self, name: &str) -> Result<bool>;

    fn rename(&self, existing_name: &str, new_name: &str) -> Result<()>;

    /// Human readable location used in messages
    fn location(&self) -> String;
}

/// Template store backed by a directory of TOML files
pub struct FileTemplateStore {
    directory: PathBuf,
}

impl FileTemplateStore {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl TemplateStore for FileTemplateStore {
    fn save_as(&self, template: &Template, name: &str) -> Result<()> {
        let content =
            toml::to_string_pretty(template).map_err(|e| MigrationError::TemplateFormat {
                name: name.to_string(),
                detail: e.to_string(),
            })?;
        fs::create_dir_all(&self.directory)?;
        fs::write(self.path_of(name), content)?;
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Template> {
        let path = self.path_of(name);
        if !path.exists() {
            return Err(MigrationError::TemplateNotFound {
                name: name.to_string(),
                location: self.location(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let template: Template =
            toml::from_str(&content).map_err(|e| MigrationError::TemplateFormat {
                name: name.to_string(),
                detail: e.to_string(),
            })?;
        Ok(template)
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.path_of(name).is_file())
    }

    fn rename(&self, existing_name: &str, new_name: &str) -> Result<()> {
        fs::rename(self.path_of(existing_name), self.path_of(new_name))?;
        Ok(())
    }

    fn location(&self) -> String {
        self.directory.display().to_string()
    }
}
