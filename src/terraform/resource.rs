use crate::constants::{mode, LATEST_VERSION, REGISTRY_HOST};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

/// A managed or data resource created by a module.
///
/// Serialized with its derived views (`spec`, `mode_label`, `url`) next to
/// the raw fields, so fragments can use them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider_name: String,
    /// Provider source address, e.g. `hashicorp/aws`
    pub provider_source: String,
    /// `managed` or `data`
    pub mode: String,
    pub version: String,
}

impl Resource {
    /// Full resource type, e.g. `aws_instance`.
    pub fn spec(&self) -> String {
        format!("{}_{}", self.provider_name, self.kind)
    }

    /// Human readable mode.
    pub fn mode_label(&self) -> &'static str {
        match self.mode.as_str() {
            mode::MANAGED => "resource",
            mode::DATA => "data source",
            _ => "invalid",
        }
    }

    /// Link to the resource documentation on the public registry.
    ///
    /// Empty when the provider source is not a `namespace/name` address of
    /// the public registry or the mode is unknown.
    pub fn url(&self) -> String {
        let kind = match self.mode.as_str() {
            mode::MANAGED => "resources",
            mode::DATA => "data-sources",
            _ => return String::new(),
        };

        let mut parts: Vec<&str> = self.provider_source.split('/').collect();
        if parts.len() == 3 && parts[0].eq_ignore_ascii_case(REGISTRY_HOST) {
            parts.remove(0);
        }
        let &[namespace, name] = parts.as_slice() else {
            return String::new();
        };
        if namespace.is_empty() || name.is_empty() {
            return String::new();
        }

        let version = if self.version.is_empty() {
            LATEST_VERSION
        } else {
            self.version.as_str()
        };
        format!(
            "https://{REGISTRY_HOST}/providers/{namespace}/{name}/{version}/docs/{kind}/{}",
            self.kind
        )
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Resource", 8)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("provider_name", &self.provider_name)?;
        state.serialize_field("provider_source", &self.provider_source)?;
        state.serialize_field("mode", &self.mode)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("spec", &self.spec())?;
        state.serialize_field("mode_label", self.mode_label())?;
        state.serialize_field("url", &self.url())?;
        state.end()
    }
}
