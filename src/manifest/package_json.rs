//! Reader for npm `package.json` manifests.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The dependency maps of a `package.json`; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    /// Runtime dependencies, name to version range
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
    /// Development dependencies, name to version range
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

impl PackageJson {
    /// Parse manifest content.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the content is not an object with
    /// string-valued dependency maps.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Declared dependency names, runtime first, in key order.
    pub fn dependency_names(&self, include_dev: bool) -> Vec<String> {
        let runtime = self.dependencies.iter().flat_map(BTreeMap::keys);
        let dev = self.dev_dependencies.iter().filter(|_| include_dev).flat_map(BTreeMap::keys);
        runtime.chain(dev).cloned().collect()
    }
}
