use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use galaxy_common::{
    FeatureDescriptor, GalaxyResult, Registry, Role, DEFAULT_BIND_ADDRESS, DEFAULT_CONFIG_PATH,
};
use galaxy_errors::GalaxyError;

/// Identity and role of the running instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub role: Role,
    pub id: String,
    pub name: String,
    /// The instance's own API endpoint, reported in its identity document
    pub api_endpoint: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Outbound auth settings. The token is attached only to calls made with
/// `include_auth = true`; issuing and validating tokens stays with the
/// external identity collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token: Option<String>,
}

/// One declared feature app, as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub id: String,
    pub name: String,
    pub url: String,
    pub api_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub instance: InstanceConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub features: Vec<FeatureEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instance: InstanceConfig {
                role: Role::Core,
                id: "core".to_string(),
                name: "Galaxy Core".to_string(),
                api_endpoint: None,
            },
            server: ServerConfig {
                bind_address: DEFAULT_BIND_ADDRESS.to_string(),
                cors_enabled: true,
                cors_origins: vec!["*".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            auth: AuthConfig::default(),
            features: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with `GALAXY_*` environment
    /// overrides. When no file is given, well-known paths are probed and
    /// built-in defaults apply if none exists.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder()
            .set_default("instance.role", "core")?
            .set_default("instance.id", "core")?
            .set_default("instance.name", "Galaxy Core")?
            .set_default("server.bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("server.cors_enabled", true)?
            .set_default("server.cors_origins", vec!["*"])?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        if let Some(path) = config_path {
            if !Path::new(path).exists() {
                return Err(anyhow::anyhow!("Configuration file not found: {path}"));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        } else {
            let default_paths = [DEFAULT_CONFIG_PATH, "galaxy.toml", "/etc/galaxy/config.toml"];
            for path in &default_paths {
                if Path::new(path).exists() {
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                    break;
                }
            }
        }

        builder = builder.add_source(Environment::with_prefix("GALAXY").separator("__"));

        let config: Self = builder
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.instance.id.trim().is_empty() {
            return Err(anyhow::anyhow!("instance.id must not be empty"));
        }
        if self.instance.name.trim().is_empty() {
            return Err(anyhow::anyhow!("instance.name must not be empty"));
        }
        Ok(())
    }

    /// Builds the immutable feature registry from the declared entries.
    ///
    /// URL parse failures and duplicate ids are configuration errors; they
    /// abort startup instead of surfacing at call time.
    pub fn build_registry(&self) -> GalaxyResult<Registry> {
        let mut descriptors = Vec::with_capacity(self.features.len());

        for entry in &self.features {
            let base_url = Url::parse(&entry.url).map_err(|e| {
                GalaxyError::Configuration(format!(
                    "invalid url for feature {}: {e}",
                    entry.id
                ))
            })?;
            let api_endpoint = entry
                .api_endpoint
                .as_deref()
                .map(Url::parse)
                .transpose()
                .map_err(|e| {
                    GalaxyError::Configuration(format!(
                        "invalid api_endpoint for feature {}: {e}",
                        entry.id
                    ))
                })?;

            descriptors.push(FeatureDescriptor {
                id: entry.id.clone(),
                name: entry.name.clone(),
                base_url,
                api_endpoint,
            });
        }

        Registry::new(descriptors)
    }

    /// The instance's own API endpoint, parsed.
    pub fn instance_endpoint(&self) -> GalaxyResult<Option<Url>> {
        self.instance
            .api_endpoint
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| {
                GalaxyError::Configuration(format!("invalid instance.api_endpoint: {e}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp config");
        file.write_all(contents.as_bytes())
            .expect("Failed to write temp config");
        file
    }

    #[test]
    fn test_load_defaults_without_file() {
        let config = AppConfig::load(None).expect("Defaults should load");
        assert_eq!(config.instance.role, Role::Core);
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.logging.level, "info");
        assert!(config.features.is_empty());
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AppConfig::load(Some("/nonexistent/galaxy.toml")).is_err());
    }

    #[test]
    fn test_load_feature_instance() {
        let file = write_config(
            r#"
            [instance]
            role = "feature"
            id = "billing"
            name = "Billing"
            api_endpoint = "http://localhost:4001/api/feature"

            [server]
            bind_address = "127.0.0.1:4001"

            [auth]
            token = "secret-token"

            [[features]]
            id = "billing"
            name = "Billing"
            url = "http://localhost:4001"
            api_endpoint = "http://localhost:4001/api/feature"

            [[features]]
            id = "reports"
            name = "Reports"
            url = "http://localhost:4002"
            "#,
        );

        let config = AppConfig::load(file.path().to_str()).expect("Config should load");
        assert_eq!(config.instance.role, Role::Feature);
        assert_eq!(config.instance.id, "billing");
        assert_eq!(config.server.bind_address, "127.0.0.1:4001");
        assert_eq!(config.auth.token.as_deref(), Some("secret-token"));
        assert_eq!(config.features.len(), 2);
        assert!(config.features[1].api_endpoint.is_none());

        let endpoint = config.instance_endpoint().unwrap().unwrap();
        assert_eq!(endpoint.path(), "/api/feature");
    }

    #[test]
    fn test_build_registry() {
        let config = AppConfig {
            features: vec![
                FeatureEntry {
                    id: "billing".to_string(),
                    name: "Billing".to_string(),
                    url: "http://localhost:4001".to_string(),
                    api_endpoint: Some("http://localhost:4001/api/feature".to_string()),
                },
                FeatureEntry {
                    id: "reports".to_string(),
                    name: "Reports".to_string(),
                    url: "http://localhost:4002".to_string(),
                    api_endpoint: None,
                },
            ],
            ..AppConfig::default()
        };

        let registry = config.build_registry().expect("Registry should build");
        assert_eq!(registry.len(), 2);
        assert!(registry.get("billing").unwrap().api_endpoint.is_some());
        assert!(registry.get("reports").unwrap().api_endpoint.is_none());
    }

    #[test]
    fn test_build_registry_rejects_duplicates() {
        let entry = FeatureEntry {
            id: "billing".to_string(),
            name: "Billing".to_string(),
            url: "http://localhost:4001".to_string(),
            api_endpoint: None,
        };
        let config = AppConfig {
            features: vec![entry.clone(), entry],
            ..AppConfig::default()
        };

        assert!(config.build_registry().is_err());
    }

    #[test]
    fn test_build_registry_rejects_bad_url() {
        let config = AppConfig {
            features: vec![FeatureEntry {
                id: "billing".to_string(),
                name: "Billing".to_string(),
                url: "not a url".to_string(),
                api_endpoint: None,
            }],
            ..AppConfig::default()
        };

        let err = config.build_registry().unwrap_err();
        assert!(err.to_string().contains("invalid url for feature billing"));
    }
}
