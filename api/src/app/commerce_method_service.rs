//! Shipping, payment and tax method registrars
//!
//! Each kind keeps its own registry, so the same code may name a shipping
//! method and a tax provider.

use crate::domain::entities::{CommerceMethod, MethodKind};
use crate::domain::type_registry::TypeRegistry;

/// Registered checkout methods by kind
#[derive(Default)]
pub struct CommerceMethodService {
    shipping: TypeRegistry<CommerceMethod>,
    payment: TypeRegistry<CommerceMethod>,
    tax: TypeRegistry<CommerceMethod>,
}

impl CommerceMethodService {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self, kind: MethodKind) -> &TypeRegistry<CommerceMethod> {
        match kind {
            MethodKind::Shipping => &self.shipping,
            MethodKind::Payment => &self.payment,
            MethodKind::Tax => &self.tax,
        }
    }

    /// Register a method under `code`. Returns false if the code is taken for this kind.
    ///
    /// Instances always carry the kind and code they were registered under.
    pub fn register<F>(&self, kind: MethodKind, code: &str, constructor: F) -> bool
    where
        F: Fn() -> CommerceMethod + Send + Sync + 'static,
    {
        let registered_code = code.to_string();
        let added = self.registry(kind).register(code, move || CommerceMethod {
            code: registered_code.clone(),
            kind,
            ..constructor()
        });
        if added {
            tracing::info!("Registered {} method {}", kind, code);
        }
        added
    }

    /// New instance of one registered method
    pub fn create(&self, kind: MethodKind, code: &str) -> Option<CommerceMethod> {
        self.registry(kind).try_create_instance(code)
    }

    /// Every registered method of a kind, by priority then code
    pub fn methods(&self, kind: MethodKind) -> Vec<CommerceMethod> {
        let registry = self.registry(kind);
        let mut methods: Vec<CommerceMethod> = registry
            .type_names()
            .iter()
            .filter_map(|code| registry.try_create_instance(code))
            .collect();
        methods.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.code.cmp(&b.code)));
        methods
    }
}
