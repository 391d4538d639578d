//! Type registry
//!
//! Maps a type name to a constructor producing a variant of `T`. Modules
//! register their concrete variants at startup; services instantiate models
//! by the type name stored alongside persisted data.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

type Constructor<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Registry of named constructors for `T`
pub struct TypeRegistry<T> {
    constructors: RwLock<BTreeMap<String, Constructor<T>>>,
}

impl<T> Default for TypeRegistry<T> {
    fn default() -> Self {
        Self {
            constructors: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T> TypeRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`
    ///
    /// Returns false and keeps the existing constructor when `name` is
    /// already registered.
    pub fn register<F>(&self, name: impl Into<String>, constructor: F) -> bool
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let name = name.into();
        let mut constructors = self
            .constructors
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if constructors.contains_key(&name) {
            tracing::debug!("Type {} already registered", name);
            return false;
        }

        tracing::debug!("Registering type {}", name);
        constructors.insert(name, Arc::new(constructor));
        true
    }

    /// Create a new instance of the type registered under `name`
    pub fn try_create_instance(&self, name: &str) -> Option<T> {
        let constructor = self
            .constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()?;

        Some(constructor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names in sorted order
    pub fn type_names(&self) -> Vec<String> {
        self.constructors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
