//! Static, read-only directory of known service descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use galaxy_errors::{GalaxyError, GalaxyResult};

/// Descriptor of one feature app as declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
    /// Unique, non-empty identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Base URL of the deployed app
    pub base_url: Url,
    /// API endpoint, absent for UI-only features
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<Url>,
}

/// Immutable, process-lifetime mapping from feature id to its descriptor.
///
/// Built once at startup from external configuration and shared by
/// reference afterwards; iteration order follows the configuration order.
#[derive(Debug, Clone)]
pub struct Registry {
    features: Vec<FeatureDescriptor>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Builds the registry, rejecting empty or duplicate ids.
    pub fn new(features: Vec<FeatureDescriptor>) -> GalaxyResult<Self> {
        let mut index = HashMap::with_capacity(features.len());

        for (position, descriptor) in features.iter().enumerate() {
            if descriptor.id.trim().is_empty() {
                return Err(GalaxyError::config_error(
                    "feature descriptor with empty id",
                ));
            }
            if index.insert(descriptor.id.clone(), position).is_some() {
                return Err(GalaxyError::Configuration(format!(
                    "duplicate feature id: {}",
                    descriptor.id
                )));
            }
        }

        Ok(Self { features, index })
    }

    pub fn get(&self, id: &str) -> Option<&FeatureDescriptor> {
        self.index.get(id).map(|&position| &self.features[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All descriptors in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features.iter()
    }

    /// Descriptors that expose an API endpoint, in configuration order.
    pub fn with_endpoints(&self) -> impl Iterator<Item = &FeatureDescriptor> {
        self.features
            .iter()
            .filter(|descriptor| descriptor.api_endpoint.is_some())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
