//! Host framework integration
//!
//! A component framework drives this layer from its own lifecycle: the
//! composition root builds one `StoragePlugin` at startup, then hands each
//! component's property declarations to `component_created` as the
//! component initializes. When `bind` is enabled the hook also returns
//! two-way `PropertyBinding` handles for the host to expose as computed
//! fields.

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::{StorageError, StorageResult};
use crate::kind::Kind;
use crate::store::{SharedStorage, TypedStorage};
use crate::value::StoreValue;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which backend the plugin probes and uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Adapter {
    /// Persistent file-backed storage.
    #[serde(rename = "localStorage")]
    Local,
    /// In-process storage discarded when the process exits.
    #[default]
    #[serde(rename = "sessionStorage")]
    Session,
}

impl Adapter {
    /// Parse a configured adapter name.
    ///
    /// An unrecognized name is a programming error, not an environment
    /// limitation, and aborts setup.
    pub fn parse(name: &str) -> StorageResult<Self> {
        match name {
            "localStorage" => Ok(Adapter::Local),
            "sessionStorage" => Ok(Adapter::Session),
            other => Err(StorageError::Config(format!(
                "unknown storage adapter `{other}`"
            ))),
        }
    }
}

/// Construction options consumed by `StoragePlugin::install`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    /// Name the host should expose the storage under.
    /// Default: `localStorage`.
    pub name: Option<String>,

    /// Also expose declared properties as two-way bindings.
    /// Default: false.
    pub bind: bool,

    /// Initial key namespace.
    pub namespace: Option<String>,

    /// Backend selection.
    /// Default: `sessionStorage` (in-process).
    pub adapter: Adapter,

    /// Database path, required by the `localStorage` adapter.
    pub path: Option<PathBuf>,
}

/// One property as declared by an initializing component.
#[derive(Debug, Clone)]
pub struct PropertyDeclaration {
    key: String,
    kind: Option<Kind>,
    default: StoreValue,
}

impl PropertyDeclaration {
    /// Declaration with no explicit kind (`String`) and no explicit
    /// default (`Undefined`, which seeds the literal text `undefined`
    /// while the key is absent).
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: None,
            default: StoreValue::Undefined,
        }
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Explicit default. Passing `StoreValue::Null` suppresses seeding.
    pub fn default_value(mut self, value: impl Into<StoreValue>) -> Self {
        self.default = value.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Two-way handle over one declared property.
#[derive(Clone)]
pub struct PropertyBinding {
    storage: SharedStorage,
    key: String,
}

impl PropertyBinding {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> StoreValue {
        self.storage.read().get(&self.key)
    }

    pub fn set(&self, value: impl Into<StoreValue>) -> StoreValue {
        self.storage.write().set(&self.key, value)
    }
}

/// Installed integration state owned by the host's composition root.
pub struct StoragePlugin {
    storage: SharedStorage,
    name: String,
    bind: bool,
}

impl StoragePlugin {
    /// Build the configured backend, probe it, and return the installed
    /// plugin.
    ///
    /// Configuration mistakes (unknown adapter name, missing `path` for
    /// the `localStorage` adapter) abort setup. An unusable backend does
    /// not: the accessor degrades and every operation returns null.
    pub fn install(options: PluginOptions) -> StorageResult<Self> {
        let mut storage = match Self::open_backend(&options) {
            Ok(backend) => TypedStorage::new(backend),
            Err(StorageError::Config(message)) => return Err(StorageError::Config(message)),
            Err(err) => {
                warn!(error = %err, "storage backend failed to open; operations will return null");
                TypedStorage::degraded()
            }
        };

        if let Some(namespace) = options.namespace.as_deref() {
            storage.set_namespace(namespace);
        }

        let name = options.name.unwrap_or_else(|| "localStorage".to_string());
        debug!(name = %name, bind = options.bind, "storage plugin installed");

        Ok(Self {
            storage: storage.into_shared(),
            name,
            bind: options.bind,
        })
    }

    fn open_backend(options: &PluginOptions) -> StorageResult<Box<dyn StorageBackend>> {
        match options.adapter {
            Adapter::Session => Ok(Box::new(MemoryBackend::new())),
            Adapter::Local => {
                let path = options.path.as_ref().ok_or_else(|| {
                    StorageError::Config(
                        "the localStorage adapter requires a database path".to_string(),
                    )
                })?;
                Ok(Box::new(FileBackend::open(path)?))
            }
        }
    }

    /// Name the host should bind the storage surface under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether declared properties also surface as two-way fields.
    pub fn bind(&self) -> bool {
        self.bind
    }

    /// Shared handle to the accessor for direct host use.
    pub fn storage(&self) -> SharedStorage {
        Arc::clone(&self.storage)
    }

    /// Lifecycle hook: a component is about to initialize with these
    /// declarations.
    ///
    /// Registers every property, seeding defaults as `add_property`
    /// specifies, and returns two-way bindings when `bind` is enabled.
    pub fn component_created(
        &self,
        declarations: &[PropertyDeclaration],
    ) -> Vec<PropertyBinding> {
        {
            let mut storage = self.storage.write();
            for declaration in declarations {
                storage.add_property(
                    &declaration.key,
                    declaration.kind.unwrap_or_default(),
                    declaration.default.clone(),
                );
            }
        }

        if !self.bind {
            return Vec::new();
        }

        declarations
            .iter()
            .map(|declaration| PropertyBinding {
                storage: Arc::clone(&self.storage),
                key: declaration.key.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_plugin(bind: bool) -> StoragePlugin {
        StoragePlugin::install(PluginOptions {
            bind,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_adapter_parse() {
        assert_eq!(Adapter::parse("localStorage").unwrap(), Adapter::Local);
        assert_eq!(Adapter::parse("sessionStorage").unwrap(), Adapter::Session);
        assert!(matches!(
            Adapter::parse("cookieStorage"),
            Err(StorageError::Config(_))
        ));
    }

    #[test]
    fn test_local_adapter_requires_path() {
        let result = StoragePlugin::install(PluginOptions {
            adapter: Adapter::Local,
            ..Default::default()
        });
        assert!(matches!(result, Err(StorageError::Config(_))));
    }

    #[test]
    fn test_install_defaults() {
        let plugin = session_plugin(false);
        assert_eq!(plugin.name(), "localStorage");
        assert!(!plugin.bind());
        assert!(plugin.storage().read().is_supported());
    }

    #[test]
    fn test_namespace_option_applies() {
        let plugin = StoragePlugin::install(PluginOptions {
            namespace: Some("app".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(plugin.storage().read().namespace(), "app.");
    }

    #[test]
    fn test_component_created_registers_and_seeds() {
        let plugin = session_plugin(false);
        plugin.component_created(&[
            PropertyDeclaration::new("visits")
                .kind(Kind::Number)
                .default_value(2.0),
            PropertyDeclaration::new("ghost"),
            PropertyDeclaration::new("unseeded").default_value(StoreValue::Null),
        ]);

        let storage = plugin.storage();
        assert_eq!(storage.read().get("visits"), StoreValue::Number(2.0));
        // No explicit default seeds the literal text `undefined`.
        assert_eq!(
            storage.read().get("ghost"),
            StoreValue::Text("undefined".to_string())
        );
        assert_eq!(storage.read().get("unseeded"), StoreValue::Null);
    }

    #[test]
    fn test_bindings_are_returned_only_when_bound() {
        let plugin = session_plugin(false);
        assert!(plugin
            .component_created(&[PropertyDeclaration::new("theme")])
            .is_empty());

        let plugin = session_plugin(true);
        let bindings = plugin.component_created(&[PropertyDeclaration::new("theme")
            .default_value("dark")]);
        assert_eq!(bindings.len(), 1);

        let theme = &bindings[0];
        assert_eq!(theme.key(), "theme");
        assert_eq!(theme.get(), StoreValue::Text("dark".to_string()));
        theme.set("light");
        assert_eq!(theme.get(), StoreValue::Text("light".to_string()));
        assert_eq!(
            plugin.storage().read().get("theme"),
            StoreValue::Text("light".to_string())
        );
    }

    #[test]
    fn test_options_deserialize_from_config() {
        let options: PluginOptions = serde_json::from_str(
            r#"{
                "name": "storage",
                "bind": true,
                "namespace": "app",
                "adapter": "localStorage",
                "path": "data/storage.redb"
            }"#,
        )
        .unwrap();

        assert_eq!(options.name.as_deref(), Some("storage"));
        assert!(options.bind);
        assert_eq!(options.namespace.as_deref(), Some("app"));
        assert_eq!(options.adapter, Adapter::Local);
        assert_eq!(options.path, Some(PathBuf::from("data/storage.redb")));

        let defaults: PluginOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults.adapter, Adapter::Session);
        assert!(!defaults.bind);
    }
}
