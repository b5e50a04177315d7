//! Configurable dynamic modules for the elif.rs container
//!
//! A module declares its options type once through [`ConfigurableModuleBuilder`]
//! and receives a direct and a deferred register method. Both produce a
//! [`DynamicModule`] whose first provider binds the options to a freshly
//! generated [`OptionsToken`], followed by the module's declared metadata.
//!
//! Resolving providers is the container's job. In particular, when a deferred
//! registration carries several sources (`factory`, `existing`, `use_class`,
//! `value`) the container picks which one applies.

pub mod builder;
pub mod config;
pub mod dynamic;
pub mod errors;
pub mod metadata;
pub mod provider;
pub mod token;

pub use builder::{
    AsyncModuleOptions, ConfigurableMethod, ConfigurableModule, ConfigurableModuleBuilder,
    ConfigurableModuleClass, MethodArgs,
};
pub use config::BuilderConfig;
pub use dynamic::DynamicModule;
pub use errors::ModuleBuilderError;
pub use metadata::{ModuleDefinition, ModuleImport, ModuleMetadata};
pub use provider::{
    ClassProvider, DeferredProvider, Factory, InjectedArgs, OptionsFactory, Provider,
    ProviderDefinition, ProviderKind, UseClass,
};
pub use token::{OptionsToken, ProviderToken, TypeRef};

#[doc(hidden)]
pub mod __private {
    pub use lazy_static::lazy_static;
    pub use paste::paste;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
