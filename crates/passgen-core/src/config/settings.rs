//! Configuration settings

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PassError, Result};
use crate::request::PassType;

/// File names searched for in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["passgen.toml", ".passgen.toml"];

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Where pass templates live
    pub templates: TemplateSettings,
    /// Where results and intermediates go
    pub output: OutputSettings,
    /// PDF export
    pub export: ExportSettings,
    /// Access gate for the form entry point
    pub access: AccessSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PassError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
            .map_err(|e| PassError::Config(format!("invalid {}: {}", path.display(), e)))
    }

    /// Resolve settings the way the CLI does.
    ///
    /// An explicit path wins and must exist. Otherwise the first of
    /// [`CONFIG_FILE_NAMES`] found in `dir` is used, else the defaults.
    pub fn discover(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Loading configuration");
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }
}

/// Template locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory holding the templates
    pub dir: PathBuf,
    /// FOH pass template file name
    pub foh: String,
    /// BOH pass template file name
    pub boh: String,
    /// Load/unload pass template file name
    pub load_unload: String,
}

impl TemplateSettings {
    /// Full path of the template for a pass type
    pub fn path_for(&self, pass_type: PassType) -> PathBuf {
        let file = match pass_type {
            PassType::Foh => &self.foh,
            PassType::Boh => &self.boh,
            PassType::LoadUnload => &self.load_unload,
        };
        self.dir.join(file)
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("templates"),
            foh: "foh_pass_template.docx".to_string(),
            boh: "boh_pass_template.docx".to_string(),
            load_unload: "load_unload_template.docx".to_string(),
        }
    }
}

/// Output locations and filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for final documents
    pub dir: PathBuf,
    /// Parent of per-request working directories; empty for the system temp dir
    pub work_dir: PathBuf,
    /// Drop rendered passes whose paragraphs are all empty
    pub skip_blank_passes: bool,
}

impl OutputSettings {
    /// Directory under which per-request working directories are created
    pub fn work_root(&self) -> PathBuf {
        if self.work_dir.as_os_str().is_empty() {
            std::env::temp_dir()
        } else {
            self.work_dir.clone()
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            work_dir: PathBuf::new(),
            skip_blank_passes: true,
        }
    }
}

/// PDF export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Converters to try, in order (`soffice`, `libreoffice`, `pandoc`)
    pub converters: Vec<String>,
    /// Deadline per converter call, in seconds
    pub timeout_secs: u64,
}

impl ExportSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            converters: vec!["soffice".to_string(), "pandoc".to_string()],
            timeout_secs: 120,
        }
    }
}

/// Access gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
    /// Environment variable holding the shared access key
    pub key_env: String,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            key_env: "PASSGEN_ACCESS_KEY".to_string(),
        }
    }
}
