use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::ConfigError;
use crate::gate::{is_local_path, PublicRoutes, RouteRule, RouteTable};

/// On-disk route file:
///
/// ```yaml
/// publicRoutes: ["/", "/login"]
/// routes:
///   /medico:
///     roleIds: [3]
///     roleNames: [Medico]
///     roleEnums: [doctor]
///     redirectTo: /dashboard
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFile {
    #[serde(default)]
    pub public_routes: Option<Vec<String>>,
    #[serde(default)]
    pub routes: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RouteAccess {
    #[serde(default)]
    role_ids: BTreeSet<i64>,
    #[serde(default)]
    role_names: BTreeSet<String>,
    #[serde(default)]
    role_enums: BTreeSet<String>,
    #[serde(default)]
    redirect_to: Option<String>,
}

impl RouteFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Public list from the file, or `defaults` when the file has none
    pub fn public_routes(&self, defaults: PublicRoutes) -> Result<PublicRoutes, ConfigError> {
        let Some(paths) = &self.public_routes else {
            return Ok(defaults);
        };
        if let Some(bad) = paths.iter().find(|p| !is_local_path(p)) {
            return Err(ConfigError::InvalidPublicRoute(bad.clone()));
        }
        Ok(PublicRoutes::new(paths.iter().cloned()))
    }

    /// Build the table in file order. Rules without `redirectTo` use `default_fallback`.
    pub fn route_table(&self, default_fallback: &str) -> Result<RouteTable, ConfigError> {
        let mut rules = Vec::with_capacity(self.routes.len());

        for (key, value) in &self.routes {
            let prefix = key
                .as_str()
                .ok_or_else(|| ConfigError::invalid_rule(format!("{key:?}"), "prefix must be a string"))?;
            if !is_local_path(prefix) {
                return Err(ConfigError::invalid_rule(prefix, "prefix must be a local path"));
            }

            let access: RouteAccess = serde_yaml::from_value(value.clone())?;
            let fallback = access
                .redirect_to
                .unwrap_or_else(|| default_fallback.to_string());
            if !is_local_path(&fallback) {
                return Err(ConfigError::invalid_rule(prefix, "redirectTo must be a local path"));
            }
            if access.role_ids.is_empty() && access.role_names.is_empty() && access.role_enums.is_empty() {
                tracing::warn!("Route rule '{}' allows no roles; every session will be redirected", prefix);
            }

            rules.push(RouteRule {
                path_prefix: prefix.to_string(),
                allowed_role_ids: access.role_ids,
                allowed_role_names: access.role_names,
                allowed_role_enums: access.role_enums,
                fallback_path: fallback,
            });
        }

        Ok(RouteTable::new(rules))
    }
}
