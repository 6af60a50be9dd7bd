//! Typed storage accessor
//!
//! `TypedStorage` owns the registry of declared property kinds and the key
//! namespace, and performs every read and write against an injected
//! `StorageBackend`. Missing keys, undeclared keys and malformed stored
//! text are all normal outcomes here; nothing on this surface errors.

use crate::backend::StorageBackend;
use crate::kind::Kind;
use crate::value::StoreValue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sentinel key written and removed once at construction to probe support.
const PROBE_KEY: &str = "__localstore-test__";

/// Per-key record of the declared kind used to choose coercion behavior.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    pub kind: Kind,
}

/// Shared handle to a long-lived accessor.
pub type SharedStorage = Arc<RwLock<TypedStorage>>;

pub struct TypedStorage {
    backend: Box<dyn StorageBackend>,
    properties: HashMap<String, PropertyDescriptor>,
    namespace: String,
    supported: bool,
}

impl TypedStorage {
    /// Build an accessor over `backend`, probing it once for support.
    ///
    /// A backend that cannot complete a write/remove round trip leaves the
    /// accessor permanently degraded: every operation returns
    /// `StoreValue::Null` and nothing is ever written, including declared
    /// defaults.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        let mut storage = Self {
            backend,
            properties: HashMap::new(),
            namespace: String::new(),
            supported: true,
        };
        storage.supported = storage.probe();
        storage
    }

    /// Accessor that is permanently unsupported, for when a backend cannot
    /// even be opened. The placeholder backend is never reached; every
    /// operation short-circuits on the support flag.
    pub(crate) fn degraded() -> Self {
        Self {
            backend: Box::new(crate::backend::MemoryBackend::new()),
            properties: HashMap::new(),
            namespace: String::new(),
            supported: false,
        }
    }

    /// Wrap the accessor for shared use from a plugin and its bindings.
    pub fn into_shared(self) -> SharedStorage {
        Arc::new(RwLock::new(self))
    }

    fn probe(&mut self) -> bool {
        let outcome = self
            .backend
            .set_item(PROBE_KEY, PROBE_KEY)
            .and_then(|()| self.backend.remove_item(PROBE_KEY));
        match outcome {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    backend = self.backend.name(),
                    error = %err,
                    "storage backend is not supported; operations will return null"
                );
                false
            }
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Set the key prefix. A non-empty value gets a single `.` separator
    /// appended; an empty value clears the prefix. Only subsequent
    /// operations are affected; keys already stored under another prefix
    /// are never migrated.
    pub fn set_namespace(&mut self, value: &str) {
        self.namespace = if value.is_empty() {
            String::new()
        } else {
            format!("{value}.")
        };
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// `get` with no default and the `String` fallback kind.
    pub fn get(&self, key: &str) -> StoreValue {
        self.get_with(key, StoreValue::Null, Kind::String)
    }

    /// `get` returning `default` when the key is absent.
    pub fn get_or(&self, key: &str, default: impl Into<StoreValue>) -> StoreValue {
        self.get_with(key, default.into(), Kind::String)
    }

    /// Read `key`, coercing stored text through the declared kind, or
    /// through `fallback` when the key was never declared. An absent key
    /// resolves to `default` (or null when the default is null).
    pub fn get_with(&self, key: &str, default: StoreValue, fallback: Kind) -> StoreValue {
        if !self.supported {
            return StoreValue::Null;
        }

        let storage_key = self.storage_key(key);
        match self.read_item(&storage_key) {
            Some(raw) => {
                let kind = self
                    .properties
                    .get(key)
                    .map(|descriptor| descriptor.kind)
                    .unwrap_or(fallback);
                kind.decode(&raw)
            }
            None => match default {
                StoreValue::Null => StoreValue::Null,
                other => other,
            },
        }
    }

    /// Write `value` under the namespaced key, serializing through the
    /// declared kind. Undeclared keys are written in their plain text form.
    /// Returns the original value unchanged so callers can chain it.
    pub fn set(&mut self, key: &str, value: impl Into<StoreValue>) -> StoreValue {
        if !self.supported {
            return StoreValue::Null;
        }

        let value = value.into();
        let encoded = match self.properties.get(key) {
            Some(descriptor) => descriptor.kind.encode(&value),
            None => value.to_string(),
        };

        let storage_key = self.storage_key(key);
        if let Err(err) = self.backend.set_item(&storage_key, &encoded) {
            warn!(key = %storage_key, error = %err, "storage write failed");
        }

        value
    }

    /// Remove the namespaced key. The registry keeps the declaration.
    pub fn remove(&mut self, key: &str) {
        if !self.supported {
            return;
        }

        let storage_key = self.storage_key(key);
        if let Err(err) = self.backend.remove_item(&storage_key) {
            warn!(key = %storage_key, error = %err, "storage remove failed");
        }
    }

    /// Declare `key` with `kind`, overwriting any earlier declaration but
    /// leaving already-stored text untouched.
    ///
    /// When the namespaced key is currently absent and `default` is not
    /// `Null`, the default is written through the same serialization rule
    /// as `set`. `Undefined` is a legitimate seed and stores the literal
    /// text `undefined`; only `Null` means "do not seed".
    pub fn add_property(&mut self, key: &str, kind: Kind, default: StoreValue) {
        self.properties
            .insert(key.to_string(), PropertyDescriptor { kind });

        if !self.supported {
            return;
        }

        let storage_key = self.storage_key(key);
        let present = match self.backend.has_item(&storage_key) {
            Ok(present) => present,
            Err(err) => {
                warn!(key = %storage_key, error = %err, "storage existence check failed");
                return;
            }
        };

        if !present && !default.is_null() {
            debug!(key = %storage_key, kind = kind.as_str(), "seeding declared default");
            let encoded = kind.encode(&default);
            if let Err(err) = self.backend.set_item(&storage_key, &encoded) {
                warn!(key = %storage_key, error = %err, "storage write failed");
            }
        }
    }

    fn read_item(&self, storage_key: &str) -> Option<String> {
        match self.backend.get_item(storage_key) {
            Ok(item) => item,
            Err(err) => {
                warn!(key = %storage_key, error = %err, "storage read failed");
                None
            }
        }
    }
}
