//! Statically declared module metadata
//!
//! Each module type declares its providers, exports, imports, controllers and
//! global flag through [`ModuleDefinition::metadata`]. Anything a module does
//! not declare falls back to an empty collection or `false`.

use std::sync::Arc;

use crate::dynamic::DynamicModule;
use crate::provider::Provider;
use crate::token::{ProviderToken, TypeRef};

/// Module imported by another module
#[derive(Debug, Clone)]
pub enum ModuleImport {
    /// A module type with fixed metadata
    Static(TypeRef),
    /// A module produced by a configurable module's register methods
    Dynamic(Box<DynamicModule>),
}

impl ModuleImport {
    pub fn of<M: 'static>() -> Self {
        Self::Static(TypeRef::of::<M>())
    }

    /// The imported module type
    pub fn module(&self) -> TypeRef {
        match self {
            ModuleImport::Static(module) => *module,
            ModuleImport::Dynamic(dynamic) => dynamic.module,
        }
    }
}

impl From<TypeRef> for ModuleImport {
    fn from(module: TypeRef) -> Self {
        Self::Static(module)
    }
}

impl From<DynamicModule> for ModuleImport {
    fn from(module: DynamicModule) -> Self {
        Self::Dynamic(Box::new(module))
    }
}

/// Metadata attached to a module type at declaration time
#[derive(Debug, Clone, Default)]
pub struct ModuleMetadata {
    pub providers: Vec<Arc<dyn Provider>>,
    pub exports: Vec<ProviderToken>,
    pub imports: Vec<ModuleImport>,
    pub controllers: Vec<TypeRef>,
    pub is_global: bool,
}

impl ModuleMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider
    pub fn with_provider<P: Provider>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Add an already shared provider
    pub fn with_shared_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Add an exported token
    pub fn with_export(mut self, token: impl Into<ProviderToken>) -> Self {
        self.exports.push(token.into());
        self
    }

    /// Set module exports
    pub fn with_exports(mut self, exports: Vec<ProviderToken>) -> Self {
        self.exports = exports;
        self
    }

    /// Add an imported module
    pub fn with_import(mut self, import: impl Into<ModuleImport>) -> Self {
        self.imports.push(import.into());
        self
    }

    /// Add a controller type
    pub fn with_controller<C: 'static>(mut self) -> Self {
        self.controllers.push(TypeRef::of::<C>());
        self
    }

    /// Mark the module as global
    pub fn with_global(mut self, is_global: bool) -> Self {
        self.is_global = is_global;
        self
    }
}

/// Module type with declared metadata
pub trait ModuleDefinition: 'static {
    /// Declared metadata; undeclared modules get empty defaults
    fn metadata() -> ModuleMetadata {
        ModuleMetadata::default()
    }

    fn module_ref() -> TypeRef
    where
        Self: Sized,
    {
        TypeRef::of::<Self>()
    }
}
