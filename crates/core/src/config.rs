//! Configuration management
//!
//! Settings live in a TOML file, `config.toml`, under the directory named by
//! `S3H_CONFIG_DIR` or the platform config dir (`~/.config/s3helper` on
//! Linux). A missing file means defaults. Credentials are never stored here;
//! the SDK resolves them through its default provider chain.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::policy::{
    DEFAULT_PARTITION, Effect, GET_OBJECT_ACTION, PUBLIC_READ_SID, PolicyTemplate,
};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "S3H_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "s3helper";

/// Highest config schema version this build understands
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: u32,
    pub client: ClientConfig,
    pub policy: PolicyConfig,
    pub demo: DemoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            client: ClientConfig::default(),
            policy: PolicyConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Unsupported schema_version {} (this build supports up to {SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        self.client.endpoint_url()?;
        if self.client.max_attempts == Some(0) {
            return Err(Error::Config("client.max_attempts must be at least 1".to_string()));
        }
        self.policy.template()?;
        Ok(())
    }
}

/// SDK client overrides; anything unset falls through to the SDK defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Region used for requests, e.g. "sa-east-1"
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services, e.g. "http://localhost:9000"
    pub endpoint: Option<String>,

    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub force_path_style: bool,

    /// Total attempts per request, handed to the SDK retry layer as-is
    pub max_attempts: Option<u32>,
}

impl ClientConfig {
    /// Parsed endpoint URL, if one is configured
    pub fn endpoint_url(&self) -> Result<Option<Url>> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Ok(None);
        };

        let url = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("Invalid endpoint '{endpoint}': {e}")))?;

        match url.scheme() {
            "http" | "https" => Ok(Some(url)),
            other => Err(Error::Config(format!(
                "Invalid endpoint '{endpoint}': unsupported scheme '{other}'"
            ))),
        }
    }
}

/// Optional strings whose default is `Some`: `None` is written as `""` so
/// that it survives a save and load instead of reverting to the default.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Some(value).filter(|v| !v.is_empty()))
    }
}

/// Defaults for `policy set`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Statement id; `""` omits it
    #[serde(with = "empty_as_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    /// `*` or a comma-separated list of principal ARNs
    pub principal: String,
    pub actions: Vec<String>,
    pub partition: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            sid: Some(PUBLIC_READ_SID.to_string()),
            effect: Effect::Allow,
            principal: "*".to_string(),
            actions: vec![GET_OBJECT_ACTION.to_string()],
            partition: DEFAULT_PARTITION.to_string(),
        }
    }
}

impl PolicyConfig {
    /// Build a validated policy template from these settings
    pub fn template(&self) -> Result<PolicyTemplate> {
        let principal = self
            .principal
            .parse()
            .map_err(|e| Error::Config(format!("policy.principal: {e}")))?;

        let template = PolicyTemplate::public_read()
            .with_sid(self.sid.clone())
            .with_effect(self.effect)
            .with_principal(principal)
            .with_actions(self.actions.clone())
            .with_partition(self.partition.clone());
        template.validate()?;
        Ok(template)
    }
}

/// Parameters for the `demo` walkthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub bucket: String,
    /// Location constraint for the demo bucket; `""` sends none
    #[serde(with = "empty_as_none")]
    pub region: Option<String>,
    pub file: PathBuf,
    pub download_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bucket: "testing-bucket-unisinos".to_string(),
            region: Some("sa-east-1".to_string()),
            file: PathBuf::from("test_file.txt"),
            download_path: PathBuf::from("downloaded_test_file.txt"),
        }
    }
}

/// Loads and saves the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Locate the configuration directory from the environment
    pub fn new() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()
                .ok_or_else(|| {
                    Error::Config("Could not determine the configuration directory".to_string())
                })?
                .join(APP_DIR),
        };
        Ok(Self::with_dir(dir))
    }

    /// Use `dir/config.toml` as the configuration file
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: dir.into().join(CONFIG_FILE),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the configuration, falling back to defaults when no file exists
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {e}", self.config_path.display()))
        })?;
        config.validate()?;

        tracing::debug!(path = %self.config_path.display(), "Loaded config");
        Ok(config)
    }

    /// Write the configuration, creating the directory if needed
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path());

        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.demo.bucket, "testing-bucket-unisinos");
        assert_eq!(config.demo.region.as_deref(), Some("sa-east-1"));
        assert!(config.client.region.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path().join("nested"));

        let mut config = Config::default();
        config.client.region = Some("eu-west-1".to_string());
        config.client.endpoint = Some("http://localhost:9000".to_string());
        config.client.force_path_style = true;
        config.policy.actions = vec!["s3:GetObject".to_string(), "s3:ListBucket".to_string()];

        manager.save(&config).unwrap();
        assert!(manager.config_path().exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_unset_optionals_survive_reload() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path());

        let mut config = Config::default();
        config.policy.sid = None;
        config.demo.region = None;

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.policy.template().unwrap().sid.is_none());
    }

    #[test]
    fn test_empty_string_clears_optional_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path());
        std::fs::write(
            manager.config_path(),
            "[policy]\nsid = \"\"\n\n[demo]\nregion = \"\"\n",
        )
        .unwrap();

        let config = manager.load().unwrap();
        assert!(config.policy.sid.is_none());
        assert!(config.demo.region.is_none());

        // left out entirely, the defaults apply
        std::fs::write(manager.config_path(), "[demo]\nbucket = \"scratch\"\n").unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.policy.sid.as_deref(), Some("AddPerm"));
        assert_eq!(config.demo.region.as_deref(), Some("sa-east-1"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path());
        std::fs::write(
            manager.config_path(),
            "[client]\nregion = \"us-west-2\"\n\n[demo]\nbucket = \"scratch\"\n",
        )
        .unwrap();

        let config = manager.load().unwrap();
        assert_eq!(config.client.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.demo.bucket, "scratch");
        assert_eq!(config.demo.file, PathBuf::from("test_file.txt"));
        assert_eq!(config.policy, PolicyConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path());
        std::fs::write(manager.config_path(), "[client\nregion = ").unwrap();

        assert!(matches!(manager.load(), Err(Error::Config(_))));
    }

    #[test]
    fn test_newer_schema_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(temp_dir.path());
        std::fs::write(manager.config_path(), "schema_version = 99\n").unwrap();

        assert!(matches!(manager.load(), Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_url() {
        let mut client = ClientConfig::default();
        assert!(client.endpoint_url().unwrap().is_none());

        client.endpoint = Some("http://localhost:9000".to_string());
        let url = client.endpoint_url().unwrap().unwrap();
        assert_eq!(url.port(), Some(9000));

        client.endpoint = Some("ftp://example.com".to_string());
        assert!(client.endpoint_url().is_err());

        client.endpoint = Some("not a url".to_string());
        assert!(client.endpoint_url().is_err());
    }

    #[test]
    fn test_policy_config_template() {
        let template = PolicyConfig::default().template().unwrap();
        assert_eq!(template, PolicyTemplate::public_read());

        let config = PolicyConfig {
            principal: " ".to_string(),
            ..Default::default()
        };
        assert!(config.template().is_err());

        let config = PolicyConfig {
            actions: vec![],
            ..Default::default()
        };
        assert!(config.template().is_err());
    }
}
