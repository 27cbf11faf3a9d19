//! Application configuration.
//!
//! Configuration is loaded once at startup from a TOML file at:
//! 1. the `--config` command-line path
//! 2. `$MAILNOTE_CONFIG` (environment variable)
//! 3. `~/.config/mailnote/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailnote\config.toml` (Windows)
//!
//! Unlike display preferences, the mailbox and note-store settings have no
//! sensible defaults, so a missing file or a missing required key is fatal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MailNoteError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mailbox connection settings.
    pub imap: ImapConfig,
    /// Note-store API settings.
    pub joplin: JoplinConfig,
    /// Logging and scratch-space settings.
    pub general: GeneralConfig,
}

/// Mailbox connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImapConfig {
    /// Server host name (required).
    pub server: String,
    /// IMAPS port.
    pub port: u16,
    /// Login user (required).
    pub user: String,
    /// Login password (required).
    pub password: String,
    /// Folder scanned for unseen messages.
    pub folder: String,
    /// Folder that processed messages are moved to. Empty means "don't move".
    pub processed_folder: Option<String>,
}

/// Note-store API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JoplinConfig {
    /// Base URL of the data API.
    pub api_url: String,
    /// Access token sent as a query parameter (required).
    pub token: String,
    /// Notebook that receives new notes, matched case-insensitively (required).
    pub notebook_name: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging and scratch-space settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override directory for the log file.
    pub log_dir: Option<PathBuf>,
    /// Directory for attachment scratch files. Defaults to the OS temp dir.
    pub temp_dir: Option<PathBuf>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: 993,
            user: String::new(),
            password: String::new(),
            folder: "INBOX".to_string(),
            processed_folder: None,
        }
    }
}

impl Default for JoplinConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:41184".to_string(),
            token: String::new(),
            notebook_name: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
            temp_dir: None,
        }
    }
}

impl Config {
    /// Check that every key needed for a pipeline run carries a value.
    pub fn validate(&self) -> Result<()> {
        require(&[
            ("imap.server", &self.imap.server),
            ("imap.user", &self.imap.user),
            ("imap.password", &self.imap.password),
            ("imap.folder", &self.imap.folder),
        ])?;
        self.validate_joplin()?;
        require(&[("joplin.notebook_name", &self.joplin.notebook_name)])
    }

    /// Check only the keys needed to talk to the note store.
    pub fn validate_joplin(&self) -> Result<()> {
        require(&[
            ("joplin.api_url", &self.joplin.api_url),
            ("joplin.token", &self.joplin.token),
        ])
    }

    /// The processed folder, with an empty value treated as absent.
    pub fn processed_folder(&self) -> Option<&str> {
        self.imap
            .processed_folder
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Directory for attachment scratch files.
    pub fn temp_dir(&self) -> PathBuf {
        self.general
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Report the first key whose value is blank.
fn require(keys: &[(&str, &String)]) -> Result<()> {
    match keys.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((key, _)) => Err(MailNoteError::Config(format!("{key} is required"))),
        None => Ok(()),
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration from `path`.
///
/// Required keys are checked separately by [`Config::validate`], since not
/// every command needs all of them.
pub fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| MailNoteError::io(path, e))?;
    toml::from_str(&contents).map_err(|source| MailNoteError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// The file to load: the explicit path if given, else [`config_file_path`].
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => config_file_path()
            .ok_or_else(|| MailNoteError::Config("could not determine config file path".into())),
    }
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILNOTE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("mailnote").join("config.toml"))
}

/// Return the directory that holds the log file.
pub fn log_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.log_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailnote")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[imap]
server = "imap.example.com"
user = "me@example.com"
password = "secret"
folder = "Notes"
processed_folder = "Processed"

[joplin]
token = "tok"
notebook_name = "Inbox"
"#;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.imap.port, 993);
        assert_eq!(cfg.imap.folder, "INBOX");
        assert_eq!(cfg.joplin.api_url, "http://localhost:41184");
        assert_eq!(cfg.joplin.timeout_secs, 30);
        assert_eq!(cfg.general.log_level, "info");
    }

    fn parse(contents: &str) -> Config {
        toml::from_str(contents).unwrap()
    }

    #[test]
    fn test_full_config_parses() {
        let cfg = parse(FULL);
        cfg.validate().unwrap();
        assert_eq!(cfg.imap.server, "imap.example.com");
        assert_eq!(cfg.imap.folder, "Notes");
        assert_eq!(cfg.processed_folder(), Some("Processed"));
        assert_eq!(cfg.joplin.notebook_name, "Inbox");
        // Defaults fill the rest
        assert_eq!(cfg.imap.port, 993);
        assert_eq!(cfg.joplin.api_url, "http://localhost:41184");
    }

    #[test]
    fn test_missing_required_key_is_reported() {
        let cfg = parse(&FULL.replace("token = \"tok\"\n", ""));
        match cfg.validate() {
            Err(MailNoteError::Config(msg)) => assert_eq!(msg, "joplin.token is required"),
            other => panic!("expected a missing-key error, got {other:?}"),
        }
    }

    #[test]
    fn test_joplin_only_validation_ignores_imap() {
        let cfg = parse("[joplin]\ntoken = \"tok\"\n");
        assert!(cfg.validate().is_err());
        cfg.validate_joplin().unwrap();
    }

    #[test]
    fn test_empty_processed_folder_is_absent() {
        let cfg = parse(&FULL.replace("\"Processed\"", "\"  \""));
        assert_eq!(cfg.processed_folder(), None);
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[imap\nserver =").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, MailNoteError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, FULL).unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.imap.user, "me@example.com");
    }

    #[test]
    fn test_load_config_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, MailNoteError::Io { .. }));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = Path::new("/etc/mailnote/custom.toml");
        assert_eq!(resolve_config_path(Some(path)).unwrap(), path);
    }
}
