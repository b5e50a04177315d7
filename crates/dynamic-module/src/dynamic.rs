//! Dynamic module descriptors produced at registration time

use std::fmt;
use std::sync::Arc;

use crate::metadata::{ModuleDefinition, ModuleImport};
use crate::provider::{Provider, ProviderDefinition};
use crate::token::{OptionsToken, ProviderToken, TypeRef};

/// Module descriptor whose providers are computed at registration time
#[derive(Clone)]
pub struct DynamicModule {
    /// Module type that produced this descriptor
    pub module: TypeRef,
    pub providers: Vec<Arc<dyn Provider>>,
    pub exports: Vec<ProviderToken>,
    pub imports: Vec<ModuleImport>,
    pub controllers: Vec<TypeRef>,
    pub is_global: bool,
}

impl DynamicModule {
    /// Merge `provider` with the metadata declared on `M`
    ///
    /// The new provider always comes first, followed by the declared providers
    /// in their declared order. Exports, imports, controllers and the global
    /// flag are copied from the declaration unchanged.
    pub fn from_definition<M: ModuleDefinition>(provider: Arc<dyn Provider>) -> Self {
        let metadata = M::metadata();

        let mut providers = Vec::with_capacity(metadata.providers.len() + 1);
        providers.push(provider);
        providers.extend(metadata.providers);

        Self {
            module: TypeRef::of::<M>(),
            providers,
            exports: metadata.exports,
            imports: metadata.imports,
            controllers: metadata.controllers,
            is_global: metadata.is_global,
        }
    }

    /// Find the options provider registered under `token`
    pub fn options_provider<T>(&self, token: &OptionsToken) -> Option<&ProviderDefinition<T>>
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        self.providers
            .iter()
            .filter(|p| p.token().matches_options(token))
            .find_map(|p| p.downcast_ref::<ProviderDefinition<T>>())
    }

    /// Get total provider count
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub fn has_exports(&self) -> bool {
        !self.exports.is_empty()
    }

    pub fn has_imports(&self) -> bool {
        !self.imports.is_empty()
    }
}

impl fmt::Debug for DynamicModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicModule")
            .field("module", &self.module.type_name)
            .field("providers", &self.providers)
            .field("exports", &self.exports)
            .field("imports", &self.imports)
            .field("controllers", &self.controllers)
            .field("is_global", &self.is_global)
            .finish()
    }
}
