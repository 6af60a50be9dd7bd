//! localstore - Typed, namespaced key-value storage for component frameworks
//!
//! Layers property typing, key namespacing, and two-way binding
//! conveniences over a synchronous string-keyed storage backend, and
//! degrades gracefully (every operation returns null) when no backend is
//! usable.
//!
//! # Usage
//!
//! ```
//! use localstore::{Kind, PluginOptions, PropertyDeclaration, StoragePlugin, StoreValue};
//!
//! let plugin = StoragePlugin::install(PluginOptions::default()).unwrap();
//!
//! // A component declares its persisted properties as it initializes.
//! plugin.component_created(&[
//!     PropertyDeclaration::new("visits").kind(Kind::Number).default_value(0.0),
//!     PropertyDeclaration::new("theme").default_value("dark"),
//! ]);
//!
//! let storage = plugin.storage();
//! storage.write().set("visits", 3.0);
//! assert_eq!(storage.read().get("visits"), StoreValue::Number(3.0));
//! assert_eq!(storage.read().get("theme"), StoreValue::Text("dark".into()));
//! ```

mod backend;
mod error;
mod kind;
mod plugin;
mod store;
mod value;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use kind::Kind;
pub use plugin::{Adapter, PluginOptions, PropertyBinding, PropertyDeclaration, StoragePlugin};
pub use store::{PropertyDescriptor, SharedStorage, TypedStorage};
pub use value::StoreValue;
