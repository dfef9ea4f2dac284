use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::ProcedureError;

/// Key of the configuration section inside a larger JSON document.
pub const CONFIG_SECTION: &str = "stored_procedure";
/// Prefix of the environment variables read by [`FactoryConfig::from_env`].
pub const ENV_PREFIX: &str = "STORED_PROCEDURE_";
/// Database used when neither the request nor the configuration names one.
pub const DEFAULT_DATABASE: &str = "Storeroom";
pub const DEFAULT_PORT: u16 = 1433;

/// Connection settings for the procedure factory.
///
/// `hostname`, `username` and `password` are required and may not be empty.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct FactoryConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default = "default_database")]
    pub default_database: String,
    #[serde(default = "default_trust")]
    pub trust_server_certificate: bool,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_trust() -> bool {
    true
}

impl fmt::Debug for FactoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("port", &self.port)
            .field("instance_name", &self.instance_name)
            .field("default_database", &self.default_database)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .finish_non_exhaustive()
    }
}

impl FactoryConfig {
    #[must_use]
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            port: None,
            instance_name: None,
            default_database: default_database(),
            trust_server_certificate: default_trust(),
        }
    }

    #[must_use]
    pub fn builder(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> FactoryConfigBuilder {
        FactoryConfigBuilder {
            config: Self::new(hostname, username, password),
        }
    }

    /// Check the required settings.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` naming the first missing or empty setting.
    pub fn validate(&self) -> Result<(), ProcedureError> {
        for (name, value) in [
            ("hostname", &self.hostname),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(ProcedureError::ConfigError(format!(
                    "{CONFIG_SECTION}.{name} cannot be empty"
                )));
            }
        }
        if self.default_database.trim().is_empty() {
            return Err(ProcedureError::ConfigError(format!(
                "{CONFIG_SECTION}.default_database cannot be empty"
            )));
        }
        Ok(())
    }

    /// Parse and validate the `stored_procedure` section of a JSON document.
    /// A document without that key is read as the section itself.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` on malformed JSON, missing keys or
    /// failed validation.
    pub fn from_json_str(document: &str) -> Result<Self, ProcedureError> {
        let value: JsonValue = serde_json::from_str(document)
            .map_err(|e| ProcedureError::ConfigError(format!("invalid JSON: {e}")))?;
        let section = match value {
            JsonValue::Object(mut map) if map.contains_key(CONFIG_SECTION) => {
                map.remove(CONFIG_SECTION).unwrap_or(JsonValue::Null)
            }
            other => other,
        };
        let config: FactoryConfig = serde_json::from_value(section)
            .map_err(|e| ProcedureError::ConfigError(format!("{CONFIG_SECTION}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file, see [`FactoryConfig::from_json_str`].
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProcedureError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| {
            ProcedureError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&document)
    }

    /// Build from `STORED_PROCEDURE_*` environment variables.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` for missing required variables,
    /// an unparsable port or trust flag, or failed validation.
    pub fn from_env() -> Result<Self, ProcedureError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ProcedureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let required = |name: &str| {
            var(name).ok_or_else(|| {
                ProcedureError::ConfigError(format!("{ENV_PREFIX}{name} is not set"))
            })
        };

        let mut config = Self::new(
            required("HOSTNAME")?,
            required("USERNAME")?,
            required("PASSWORD")?,
        );
        if let Some(port) = var("PORT") {
            config.port = Some(port.parse().map_err(|e| {
                ProcedureError::ConfigError(format!("{ENV_PREFIX}PORT {port:?}: {e}"))
            })?);
        }
        config.instance_name = var("INSTANCE_NAME");
        if let Some(database) = var("DATABASE") {
            config.default_database = database;
        }
        if let Some(trust) = var("TRUST_SERVER_CERTIFICATE") {
            config.trust_server_certificate = parse_flag(&trust).ok_or_else(|| {
                ProcedureError::ConfigError(format!(
                    "{ENV_PREFIX}TRUST_SERVER_CERTIFICATE {trust:?} is not a boolean"
                ))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Fluent builder for [`FactoryConfig`].
#[derive(Debug, Clone)]
pub struct FactoryConfigBuilder {
    config: FactoryConfig,
}

impl FactoryConfigBuilder {
    #[must_use]
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn instance_name(mut self, instance_name: Option<String>) -> Self {
        self.config.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn default_database(mut self, database: impl Into<String>) -> Self {
        self.config.default_database = database.into();
        self
    }

    #[must_use]
    pub fn trust_server_certificate(mut self, trust: bool) -> Self {
        self.config.trust_server_certificate = trust;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if validation fails.
    pub fn build(self) -> Result<FactoryConfig, ProcedureError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn json_section_with_defaults() {
        let config = FactoryConfig::from_json_str(
            r#"{ "stored_procedure": { "hostname": "db", "username": "u", "password": "p" } }"#,
        )
        .unwrap();
        assert_eq!(config.hostname, "db");
        assert_eq!(config.default_database, DEFAULT_DATABASE);
        assert!(config.trust_server_certificate);
        assert_eq!(config.port_or_default(), 1433);
    }

    #[test]
    fn bare_section_is_accepted() {
        let config = FactoryConfig::from_json_str(
            r#"{ "hostname": "db", "username": "u", "password": "p", "port": 14330 }"#,
        )
        .unwrap();
        assert_eq!(config.port, Some(14330));
    }

    #[test]
    fn missing_and_empty_keys_are_rejected() {
        let missing =
            FactoryConfig::from_json_str(r#"{ "hostname": "db", "username": "u" }"#).unwrap_err();
        assert!(matches!(missing, ProcedureError::ConfigError(_)));

        let empty = FactoryConfig::from_json_str(
            r#"{ "hostname": " ", "username": "u", "password": "p" }"#,
        )
        .unwrap_err();
        assert_eq!(
            empty.to_string(),
            "Configuration error: stored_procedure.hostname cannot be empty"
        );
    }

    #[test]
    fn env_lookup() {
        let vars: HashMap<&str, &str> = [
            ("STORED_PROCEDURE_HOSTNAME", "sql01"),
            ("STORED_PROCEDURE_USERNAME", "svc"),
            ("STORED_PROCEDURE_PASSWORD", "secret"),
            ("STORED_PROCEDURE_PORT", "1500"),
            ("STORED_PROCEDURE_TRUST_SERVER_CERTIFICATE", "no"),
        ]
        .into_iter()
        .collect();
        let config =
            FactoryConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
        assert_eq!(config.hostname, "sql01");
        assert_eq!(config.port, Some(1500));
        assert!(!config.trust_server_certificate);
        assert_eq!(config.default_database, DEFAULT_DATABASE);
    }

    #[test]
    fn env_missing_password() {
        let err = FactoryConfig::from_lookup(|k| {
            (k != "STORED_PROCEDURE_PASSWORD").then(|| "x".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("STORED_PROCEDURE_PASSWORD"));
    }

    #[test]
    fn debug_hides_password() {
        let config = FactoryConfig::new("db", "u", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
