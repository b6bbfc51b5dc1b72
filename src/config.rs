//! Configuration for a content load.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flags (applied by the binary on top of the loaded value)
//! 2. Environment variables (TREELOAD_LOCAL_PATH, TREELOAD_ZIP_URL,
//!    TREELOAD_ASSET_BASE_URL, TREELOAD_STAGING_DIR)
//! 3. Config file (explicit path, else treeload.yaml in the current
//!    directory or a parent, else <config_dir>/treeload/config.yaml)
//! 4. Defaults
//!
//! Option names from older JavaScript-era configs (`localPath`, `zipUrl`,
//! `cdnUrl`, `imageSourceUrl`, `tempDir`, `verbose`) are accepted as aliases.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// File name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = "treeload.yaml";

fn default_staging_dir() -> PathBuf {
    PathBuf::from(".treeload/staging")
}

fn default_verbose_ms() -> Option<u64> {
    Some(1000)
}

/// A value, or `false` meaning "not set"
#[derive(Deserialize)]
#[serde(untagged)]
enum OrFalse<T> {
    Flag(bool),
    Value(T),
}

/// Map `false` and `null` to `None`; `true` is rejected
fn false_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<OrFalse<T>>::deserialize(deserializer)? {
        None | Some(OrFalse::Flag(false)) => Ok(None),
        Some(OrFalse::Flag(true)) => Err(D::Error::custom(
            "expected a value or `false`, found `true`",
        )),
        Some(OrFalse::Value(value)) => Ok(Some(value)),
    }
}

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Local content directory; preferred over any remote source
    #[serde(default, alias = "localPath", deserialize_with = "false_as_none")]
    pub local_path: Option<PathBuf>,

    /// Zip archive to download verbatim
    #[serde(
        default,
        alias = "zipUrl",
        alias = "remoteArchiveUrl",
        deserialize_with = "false_as_none"
    )]
    pub zip_url: Option<String>,

    /// GitHub branch URL (`https://github.com/<org>/<repo>/archive/<branch>`);
    /// `.zip` is appended to download it
    #[serde(default, alias = "githubBranchUrl", deserialize_with = "false_as_none")]
    pub github_branch_url: Option<String>,

    /// Prefix for synthesized image URLs
    #[serde(
        default,
        alias = "assetBaseUrl",
        alias = "cdnUrl",
        alias = "imageSourceUrl",
        deserialize_with = "false_as_none"
    )]
    pub asset_base_url: Option<String>,

    /// Staging directory, always below the working directory (a leading `/`
    /// is ignored, as with `tempDir: /tmp`). Emptied at the start of every load.
    #[serde(
        default = "default_staging_dir",
        alias = "stagingDir",
        alias = "tempDir"
    )]
    pub staging_dir: PathBuf,

    /// Delay before the "still working" notice; `None` disables it
    #[serde(
        default = "default_verbose_ms",
        alias = "verbose",
        alias = "verbosity",
        deserialize_with = "false_as_none"
    )]
    pub verbose_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_path: None,
            zip_url: None,
            github_branch_url: None,
            asset_base_url: None,
            staging_dir: default_staging_dir(),
            verbose_ms: default_verbose_ms(),
        }
    }
}

impl Config {
    /// Config for a local content directory
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Config for a remote zip archive
    pub fn remote(zip_url: impl Into<String>) -> Self {
        Self {
            zip_url: Some(zip_url.into()),
            ..Default::default()
        }
    }

    /// Set the asset base URL
    pub fn with_asset_base_url(mut self, url: impl Into<String>) -> Self {
        self.asset_base_url = Some(url.into());
        self
    }

    /// Set the staging directory
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Set or disable the progress notice delay
    pub fn with_verbose_ms(mut self, delay: Option<u64>) -> Self {
        self.verbose_ms = delay;
        self
    }

    /// Progress notice delay, if enabled
    pub fn notice_delay(&self) -> Option<Duration> {
        self.verbose_ms.map(Duration::from_millis)
    }

    /// Parse a YAML config document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }

    /// Load a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply TREELOAD_* environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("TREELOAD_LOCAL_PATH") {
            self.local_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("TREELOAD_ZIP_URL") {
            self.zip_url = Some(url);
        }
        if let Some(url) = lookup("TREELOAD_ASSET_BASE_URL") {
            self.asset_base_url = Some(url);
        }
        if let Some(dir) = lookup("TREELOAD_STAGING_DIR") {
            self.staging_dir = PathBuf::from(dir);
        }
    }
}

/// Find treeload.yaml by searching the current directory and parents,
/// then the user config directory
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("treeload").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load configuration from file (explicit or discovered), then environment
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => Config::from_file(path)?,
        None => match find_config_file() {
            Some(path) => Config::from_file(&path)?,
            None => Config::default(),
        },
    };

    config.apply_env();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::resolve_staging_dir;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.staging_dir, PathBuf::from(".treeload/staging"));
        assert_eq!(config.notice_delay(), Some(Duration::from_millis(1000)));
        assert!(config.local_path.is_none());
        assert!(config.zip_url.is_none());
    }

    #[test]
    fn test_yaml_parsing() {
        let config = Config::from_yaml(
            r#"
local_path: ./content
zip_url: https://github.com/org/site/archive/master.zip
asset_base_url: https://raw.githubusercontent.com/org/site/master
staging_dir: tmp/staging
verbose_ms: 250
"#,
        )
        .unwrap();

        assert_eq!(config.local_path, Some(PathBuf::from("./content")));
        assert_eq!(
            config.zip_url.as_deref(),
            Some("https://github.com/org/site/archive/master.zip")
        );
        assert_eq!(config.staging_dir, PathBuf::from("tmp/staging"));
        assert_eq!(config.verbose_ms, Some(250));
    }

    #[test]
    fn test_legacy_option_names() {
        let config = Config::from_yaml(
            r#"
zipUrl: https://github.com/RevolutionVA/website2017/archive/master.zip
cdnUrl: https://raw.githubusercontent.com/revolutionva/website2017/master
tempDir: /tmp/content
verbose: null
"#,
        )
        .unwrap();

        assert!(config.zip_url.is_some());
        assert_eq!(
            config.asset_base_url.as_deref(),
            Some("https://raw.githubusercontent.com/revolutionva/website2017/master")
        );
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/content"));
        assert_eq!(
            resolve_staging_dir(&config.staging_dir, Path::new("/work/site")).unwrap(),
            PathBuf::from("/work/site/tmp/content")
        );
        assert_eq!(config.notice_delay(), None);
    }

    #[test]
    fn test_false_disables_string_and_path_options() {
        let config = Config::from_yaml(
            r#"
localPath: false
zipUrl: false
githubBranchUrl: false
cdnUrl: false
"#,
        )
        .unwrap();

        assert_eq!(config.local_path, None);
        assert_eq!(config.zip_url, None);
        assert_eq!(config.github_branch_url, None);
        assert_eq!(config.asset_base_url, None);
    }

    #[test]
    fn test_false_disables_notice() {
        let config = Config::from_yaml("verbose: false").unwrap();
        assert_eq!(config.notice_delay(), None);

        let config = Config::from_yaml("verbose: 1500").unwrap();
        assert_eq!(config.notice_delay(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_quoted_false_is_a_value() {
        let config = Config::from_yaml("localPath: \"false\"").unwrap();
        assert_eq!(config.local_path, Some(PathBuf::from("false")));
    }

    #[test]
    fn test_true_rejected() {
        assert!(Config::from_yaml("zipUrl: true").is_err());
        assert!(Config::from_yaml("verbose: true").is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_yaml("zip_ulr: https://example.com/a.zip").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TREELOAD_LOCAL_PATH", "/srv/content"),
            ("TREELOAD_STAGING_DIR", "/var/tmp/staging"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::remote("https://example.com/site.zip");
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.local_path, Some(PathBuf::from("/srv/content")));
        assert_eq!(config.staging_dir, PathBuf::from("/var/tmp/staging"));
        assert_eq!(config.zip_url.as_deref(), Some("https://example.com/site.zip"));
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "githubBranchUrl: https://github.com/org/site/archive/main\n")
            .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.github_branch_url.as_deref(),
            Some("https://github.com/org/site/archive/main")
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::from_file(Path::new("/nonexistent/treeload.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/treeload.yaml"));
    }
}
