//! Configuration resolution.
//!
//! Precedence: config file > environment variables > platform defaults.
//! The result is an immutable `Config` value handed to every component —
//! no global mutable state.

use crate::error::{Result, VaultError};
use crate::io;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = "vault-agent";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const VAULT_PATH_ENV: &str = "OBSIDIAN_VAULT_PATH";
pub const CLAUDE_PROJECTS_ENV: &str = "CLAUDE_PROJECTS_PATH";

const DEFAULT_PROJECTS_FOLDER: &str = "Projects";
const DEFAULT_EXTRACTION_MODEL: &str = "haiku";
const DEFAULT_MAX_CONVERSATION_CHARS: usize = 50_000;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the vault directory tree.
    pub vault_path: PathBuf,
    /// Where the assistant keeps its per-project session logs.
    pub claude_projects_path: PathBuf,
    /// Subfolder name inside the vault holding project directories.
    pub projects_folder: String,
    /// Model passed to the extraction backend.
    pub extraction_model: String,
    /// Transcript truncation limit before extraction.
    pub max_conversation_chars: usize,
}

impl Config {
    /// Full path to the projects folder inside the vault.
    pub fn projects_path(&self) -> PathBuf {
        self.vault_path.join(&self.projects_folder)
    }

    /// `~/.config/vault-agent/config.yaml`
    pub fn config_file_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or(VaultError::HomeNotFound)?;
        Ok(home.join(".config").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Resolve configuration from file, environment, and platform defaults.
    pub fn load() -> Result<Self> {
        let file = match Self::config_file_path() {
            Ok(path) if path.exists() => {
                let data = std::fs::read_to_string(&path)?;
                serde_yaml::from_str::<ConfigFile>(&data)?
            }
            _ => ConfigFile::default(),
        };
        Self::resolve(file)
    }

    fn resolve(file: ConfigFile) -> Result<Self> {
        let home = home::home_dir().ok_or(VaultError::HomeNotFound)?;

        let vault_path = file
            .vault
            .path
            .or_else(|| std::env::var(VAULT_PATH_ENV).ok())
            .map(|p| expand_tilde(&p, &home))
            .unwrap_or_else(|| platform_default_vault(&home));

        let claude_projects_path = file
            .claude
            .projects_path
            .or_else(|| std::env::var(CLAUDE_PROJECTS_ENV).ok())
            .map(|p| expand_tilde(&p, &home))
            .unwrap_or_else(|| home.join(".claude").join("projects"));

        Ok(Self {
            vault_path,
            claude_projects_path,
            projects_folder: file
                .vault
                .projects_folder
                .unwrap_or_else(|| DEFAULT_PROJECTS_FOLDER.to_string()),
            extraction_model: file
                .extraction
                .model
                .unwrap_or_else(|| DEFAULT_EXTRACTION_MODEL.to_string()),
            max_conversation_chars: file
                .extraction
                .max_conversation_chars
                .unwrap_or(DEFAULT_MAX_CONVERSATION_CHARS),
        })
    }

    /// Write a commented starter config file. Refuses to overwrite unless
    /// `force` is set. Returns the path written.
    pub fn init_file(force: bool) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        if path.exists() && !force {
            return Err(VaultError::ConfigExists(path));
        }
        let home = home::home_dir().ok_or(VaultError::HomeNotFound)?;
        let starter = starter_config(&home);
        io::atomic_write(&path, starter.as_bytes())?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Config file schema
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    vault: VaultSection,
    #[serde(default)]
    claude: ClaudeSection,
    #[serde(default)]
    extraction: ExtractionSection,
}

#[derive(Debug, Default, Deserialize)]
struct VaultSection {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    projects_folder: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ClaudeSection {
    #[serde(default)]
    projects_path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ExtractionSection {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    max_conversation_chars: Option<usize>,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn platform_default_vault(home: &Path) -> PathBuf {
    if cfg!(target_os = "macos") {
        home.join("Library")
            .join("Mobile Documents")
            .join("iCloud~md~obsidian")
            .join("Documents")
            .join("MyVault")
    } else if cfg!(target_os = "windows") {
        home.join("Documents").join("ObsidianVault")
    } else {
        home.join("obsidian").join("MyVault")
    }
}

fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else if path == "~" {
        home.to_path_buf()
    } else {
        PathBuf::from(path)
    }
}

fn starter_config(home: &Path) -> String {
    let vault = platform_default_vault(home);
    let claude = home.join(".claude").join("projects");
    format!(
        "vault:\n  path: \"{}\"\n  projects_folder: Projects\n\nclaude:\n  projects_path: \"{}\"\n\nextraction:\n  model: haiku\n  max_conversation_chars: 50000\n",
        vault.display(),
        claude.display()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
