//! Bridge configuration.
//!
//! [`BridgeConfig`] can be built in code with [`BridgeConfigBuilder`] or
//! loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! first_virtual_view_id = 1
//! api_level = 34
//! package_name = "com.example.app"
//! non_root_actions = "route_to_handler"
//! expose_generic_containers = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use horizon_access_core::logging::targets;

use crate::bridge::{ApiShape, HOST_VIEW_ID, PlatformCapabilities};
use crate::error::{ConfigError, ConfigResult};

/// How actions aimed at non-root virtual views are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonRootActions {
    /// Report every non-root action as unhandled.
    #[default]
    Unhandled,
    /// Translate the platform action and forward it to the application's
    /// action handler.
    RouteToHandler,
}

/// Configuration for a [`VirtualViewBridge`](crate::VirtualViewBridge) and
/// the virtual view ids of its adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// The first virtual view id handed out to a node.
    pub first_virtual_view_id: i32,
    /// Platform API level, used to pick the marshalling shape.
    /// `None` selects the modern shape.
    pub api_level: Option<u32>,
    /// Package name stamped on node records instead of the host's.
    pub package_name: Option<String>,
    /// Policy for non-root actions.
    pub non_root_actions: NonRootActions,
    /// Expose generic containers instead of hoisting their children.
    pub expose_generic_containers: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            first_virtual_view_id: 0,
            api_level: None,
            package_name: None,
            non_root_actions: NonRootActions::Unhandled,
            expose_generic_containers: false,
        }
    }
}

impl BridgeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), ?config, "loaded bridge configuration");
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).map_err(|err| ConfigError::invalid(err.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.first_virtual_view_id == HOST_VIEW_ID {
            return Err(ConfigError::invalid(format!(
                "first_virtual_view_id must not be the host view id ({HOST_VIEW_ID})"
            )));
        }
        if let Some(name) = &self.package_name
            && name.trim().is_empty()
        {
            return Err(ConfigError::invalid("package_name must not be empty"));
        }
        Ok(())
    }

    /// The platform capabilities described by this configuration.
    pub fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities {
            api_level: self.api_level,
        }
    }

    /// The marshalling shape selected for these capabilities.
    pub fn api_shape(&self) -> ApiShape {
        ApiShape::detect(self.capabilities())
    }
}

/// Builder for [`BridgeConfig`].
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first virtual view id.
    pub fn first_virtual_view_id(mut self, id: i32) -> Self {
        self.config.first_virtual_view_id = id;
        self
    }

    /// Set the platform API level.
    pub fn api_level(mut self, level: u32) -> Self {
        self.config.api_level = Some(level);
        self
    }

    /// Override the package name.
    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.config.package_name = Some(name.into());
        self
    }

    /// Set the non-root action policy.
    pub fn non_root_actions(mut self, policy: NonRootActions) -> Self {
        self.config.non_root_actions = policy;
        self
    }

    /// Expose generic containers.
    pub fn expose_generic_containers(mut self, expose: bool) -> Self {
        self.config.expose_generic_containers = expose;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> ConfigResult<BridgeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.api_shape(), ApiShape::CompatShim);
    }

    #[test]
    fn test_parse_all_fields() {
        let config = BridgeConfig::from_toml_str(
            r#"
            first_virtual_view_id = 100
            api_level = 19
            package_name = "com.example.app"
            non_root_actions = "route_to_handler"
            expose_generic_containers = true
            "#,
        )
        .unwrap();
        assert_eq!(config.first_virtual_view_id, 100);
        assert_eq!(config.api_level, Some(19));
        assert_eq!(config.package_name.as_deref(), Some("com.example.app"));
        assert_eq!(config.non_root_actions, NonRootActions::RouteToHandler);
        assert!(config.expose_generic_containers);
        assert_eq!(config.api_shape(), ApiShape::DirectRecord);
    }

    #[test]
    fn test_host_view_id_rejected() {
        let err = BridgeConfig::from_toml_str("first_virtual_view_id = -1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = BridgeConfigBuilder::new()
            .first_virtual_view_id(HOST_VIEW_ID)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = BridgeConfig::from_toml_str(r#"non_root_actions = "sometimes""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_level = 30").unwrap();
        writeln!(file, r#"package_name = "org.example""#).unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.api_level, Some(30));
        assert_eq!(config.package_name.as_deref(), Some("org.example"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = BridgeConfigBuilder::new()
            .first_virtual_view_id(5)
            .api_level(33)
            .package_name("com.example")
            .build()
            .unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(BridgeConfig::from_toml_str(&text).unwrap(), config);
    }
}
