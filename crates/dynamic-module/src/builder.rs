//! Configurable module builder
//!
//! A module declares the shape of its options once and gets back a pair of
//! register methods plus the token its options are bound to:
//!
//! ```rust
//! use elif_dynamic_module::{ConfigurableModuleBuilder, MethodArgs, ModuleDefinition};
//!
//! #[derive(Debug)]
//! struct MailerOptions {
//!     host: String,
//! }
//!
//! struct MailerModule;
//! impl ModuleDefinition for MailerModule {}
//!
//! let (class, token) = ConfigurableModuleBuilder::<MailerOptions>::new()
//!     .set_method("for_root")
//!     .build();
//!
//! let options = MailerOptions { host: "smtp.local".into() };
//! let module = class
//!     .invoke::<MailerModule>("for_root", MethodArgs::options(options))
//!     .unwrap();
//! assert!(module.options_provider::<MailerOptions>(&token).is_some());
//! assert!(class.has_method("for_root_async"));
//! assert!(!class.has_method("register"));
//! ```
//!
//! Method names are picked at runtime, so the generated class exposes two fixed
//! slots ([`ConfigurableModuleClass::primary`] and
//! [`ConfigurableModuleClass::deferred`]) and maps the configured names onto
//! them for dispatch through [`ConfigurableModuleClass::invoke`]. Module types
//! declared with [`configurable_module!`](crate::configurable_module) also get
//! associated functions carrying the configured names.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::{BuilderConfig, ASYNC_METHOD_SUFFIX, DEFAULT_METHOD_NAME};
use crate::dynamic::DynamicModule;
use crate::errors::ModuleBuilderError;
use crate::metadata::ModuleDefinition;
use crate::provider::{DeferredProvider, Factory, ProviderDefinition, UseClass};
use crate::token::{OptionsToken, ProviderToken, DEFAULT_TOKEN_SUFFIX};

/// Factory for configurable module classes
pub struct ConfigurableModuleBuilder<T> {
    method_name: String,
    token_suffix: String,
    _options: PhantomData<fn() -> T>,
}

impl<T> ConfigurableModuleBuilder<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    /// Create a builder exposing `register` / `register_async`
    pub fn new() -> Self {
        Self {
            method_name: DEFAULT_METHOD_NAME.to_string(),
            token_suffix: DEFAULT_TOKEN_SUFFIX.to_string(),
            _options: PhantomData,
        }
    }

    /// Create a builder from loaded configuration
    pub fn from_config(config: BuilderConfig) -> Self {
        Self {
            method_name: config.method_name,
            token_suffix: config.token_suffix,
            _options: PhantomData,
        }
    }

    /// Apply method name and token suffix from configuration
    pub fn with_config(mut self, config: &BuilderConfig) -> Self {
        self.method_name = config.method_name.clone();
        self.token_suffix = config.token_suffix.clone();
        self
    }

    /// Rename the generated method pair
    ///
    /// The deferred method is always `name` followed by `_async`. The name is
    /// not validated.
    pub fn set_method(mut self, name: impl Into<String>) -> Self {
        self.method_name = name.into();
        self
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn async_method_name(&self) -> String {
        format!("{}{}", self.method_name, ASYNC_METHOD_SUFFIX)
    }

    /// Generate a fresh options token and the class exposing both methods
    ///
    /// Every call mints a new token, so classes built here never share their
    /// options key with any other class.
    pub fn build(&self) -> (ConfigurableModuleClass<T>, OptionsToken) {
        let token = OptionsToken::generate_with_suffix(&self.token_suffix);
        let class = ConfigurableModuleClass {
            token: token.clone(),
            method_name: self.method_name.clone(),
            async_method_name: self.async_method_name(),
            _options: PhantomData,
        };

        tracing::debug!(
            "Built configurable module class for '{}' with methods '{}' / '{}' (token: {})",
            std::any::type_name::<T>(),
            class.method_name,
            class.async_method_name,
            token
        );

        (class, token)
    }
}

impl<T> Default for ConfigurableModuleBuilder<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ConfigurableModuleBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurableModuleBuilder")
            .field("options", &std::any::type_name::<T>())
            .field("method_name", &self.method_name)
            .field("token_suffix", &self.token_suffix)
            .finish()
    }
}

/// Which slot a configured method name maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurableMethod {
    /// Takes the options value directly
    Primary,
    /// Takes a deferred options source
    Deferred,
}

/// Arguments for a call dispatched by method name
#[derive(Debug)]
pub enum MethodArgs<T> {
    Options(Option<T>),
    Async(AsyncModuleOptions<T>),
}

impl<T> MethodArgs<T> {
    pub fn options(options: impl Into<Option<T>>) -> Self {
        Self::Options(options.into())
    }
}

impl<T> From<AsyncModuleOptions<T>> for MethodArgs<T> {
    fn from(options: AsyncModuleOptions<T>) -> Self {
        Self::Async(options)
    }
}

/// Deferred options source accepted by the async register method
///
/// The alternatives are not exclusive. Whatever is set is packaged as-is and
/// the container decides which one takes effect.
#[derive(Debug, Clone)]
pub struct AsyncModuleOptions<T> {
    pub value: Option<T>,
    pub factory: Option<Factory<T>>,
    pub existing: Option<ProviderToken>,
    pub use_class: Option<UseClass<T>>,
    pub inject: Option<Vec<ProviderToken>>,
}

impl<T> Default for AsyncModuleOptions<T> {
    fn default() -> Self {
        Self {
            value: None,
            factory: None,
            existing: None,
            use_class: None,
            inject: None,
        }
    }
}

impl<T> AsyncModuleOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback direct value
    pub fn use_value(mut self, value: T) -> Self {
        self.value = Some(value);
        self
    }

    pub fn use_factory(mut self, factory: Factory<T>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Alias the options to an already registered token
    pub fn use_existing(mut self, token: impl Into<ProviderToken>) -> Self {
        self.existing = Some(token.into());
        self
    }

    pub fn use_class(mut self, class: UseClass<T>) -> Self {
        self.use_class = Some(class);
        self
    }

    /// Tokens resolved and passed to the factory, in order
    pub fn inject(mut self, tokens: Vec<ProviderToken>) -> Self {
        self.inject = Some(tokens);
        self
    }

    fn into_deferred(self) -> DeferredProvider<T> {
        DeferredProvider {
            value: self.value,
            factory: self.factory,
            existing: self.existing,
            use_class: self.use_class,
            inject: self.inject.unwrap_or_default(),
        }
    }
}

/// Class produced by [`ConfigurableModuleBuilder::build`]
///
/// Holds the options token and the configured method names. Immutable once
/// built.
pub struct ConfigurableModuleClass<T> {
    token: OptionsToken,
    method_name: String,
    async_method_name: String,
    _options: PhantomData<fn() -> T>,
}

impl<T> ConfigurableModuleClass<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    /// Token under which the options provider is registered
    pub fn token(&self) -> &OptionsToken {
        &self.token
    }

    /// Exposed method names, primary first
    pub fn method_names(&self) -> [&str; 2] {
        [&self.method_name, &self.async_method_name]
    }

    /// Resolve a configured method name to its slot
    pub fn method(&self, name: &str) -> Option<ConfigurableMethod> {
        if name == self.method_name {
            Some(ConfigurableMethod::Primary)
        } else if name == self.async_method_name {
            Some(ConfigurableMethod::Deferred)
        } else {
            None
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Slot behind the configured method name: direct options value
    pub fn primary<M: ModuleDefinition>(&self, options: impl Into<Option<T>>) -> DynamicModule {
        tracing::trace!(
            "{}::{} registering direct options",
            std::any::type_name::<M>(),
            self.method_name
        );

        let provider = ProviderDefinition::direct(&self.token, options.into());
        DynamicModule::from_definition::<M>(Arc::new(provider))
    }

    /// Slot behind the `_async` method name: deferred options source
    pub fn deferred<M: ModuleDefinition>(&self, options: AsyncModuleOptions<T>) -> DynamicModule {
        tracing::trace!(
            "{}::{} registering deferred options",
            std::any::type_name::<M>(),
            self.async_method_name
        );

        let provider = ProviderDefinition::deferred(&self.token, options.into_deferred());
        DynamicModule::from_definition::<M>(Arc::new(provider))
    }

    /// Call a method by its configured name
    pub fn invoke<M: ModuleDefinition>(
        &self,
        name: &str,
        args: MethodArgs<T>,
    ) -> Result<DynamicModule, ModuleBuilderError> {
        let Some(method) = self.method(name) else {
            tracing::warn!(
                "Method '{}' is not exposed by {} (available: {}, {})",
                name,
                std::any::type_name::<M>(),
                self.method_name,
                self.async_method_name
            );
            return Err(ModuleBuilderError::unknown_method(
                name,
                &self.method_names(),
            ));
        };

        match (method, args) {
            (ConfigurableMethod::Primary, MethodArgs::Options(options)) => {
                Ok(self.primary::<M>(options))
            }
            (ConfigurableMethod::Deferred, MethodArgs::Async(options)) => {
                Ok(self.deferred::<M>(options))
            }
            (ConfigurableMethod::Primary, MethodArgs::Async(_)) => {
                Err(ModuleBuilderError::argument_mismatch(name, "direct options"))
            }
            (ConfigurableMethod::Deferred, MethodArgs::Options(_)) => {
                Err(ModuleBuilderError::argument_mismatch(name, "deferred"))
            }
        }
    }
}

impl<T> Clone for ConfigurableModuleClass<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            method_name: self.method_name.clone(),
            async_method_name: self.async_method_name.clone(),
            _options: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ConfigurableModuleClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurableModuleClass")
            .field("options", &std::any::type_name::<T>())
            .field("token", &self.token)
            .field("methods", &[&self.method_name, &self.async_method_name])
            .finish()
    }
}

/// Module type backed by a configurable module class
///
/// Usually implemented through [`configurable_module!`](crate::configurable_module),
/// which also builds the class once per module type and adds associated
/// functions named after the configured methods.
pub trait ConfigurableModule: ModuleDefinition + Sized {
    type Options: fmt::Debug + Send + Sync + 'static;

    fn configurable() -> &'static ConfigurableModuleClass<Self::Options>;

    fn options_token() -> &'static OptionsToken {
        Self::configurable().token()
    }

    /// Register with a direct options value
    fn primary(options: impl Into<Option<Self::Options>>) -> DynamicModule {
        Self::configurable().primary::<Self>(options)
    }

    /// Register with a deferred options source
    fn deferred(options: AsyncModuleOptions<Self::Options>) -> DynamicModule {
        Self::configurable().deferred::<Self>(options)
    }

    /// Call a method by the name it was configured with
    fn invoke(
        name: &str,
        args: MethodArgs<Self::Options>,
    ) -> Result<DynamicModule, ModuleBuilderError> {
        Self::configurable().invoke::<Self>(name, args)
    }
}

/// Declare a configurable module type
///
/// `methods` names the method pair (default `register`). It overrides any
/// method name set on `builder`, and the macro generates `<name>` and
/// `<name>_async` associated functions on the module type.
///
/// ```rust
/// use elif_dynamic_module::{configurable_module, ConfigurableModule, ConfigurableModuleBuilder};
///
/// #[derive(Debug)]
/// pub struct CacheOptions {
///     pub ttl: u64,
/// }
///
/// configurable_module! {
///     pub struct CacheModule;
///     options: CacheOptions,
///     methods: for_root,
///     builder: ConfigurableModuleBuilder::new(),
/// }
///
/// let module = CacheModule::for_root(CacheOptions { ttl: 30 });
/// assert!(module.options_provider::<CacheOptions>(CacheModule::options_token()).is_some());
/// assert!(!CacheModule::configurable().has_method("register"));
/// ```
#[macro_export]
macro_rules! configurable_module {
    (
        @define
        $(#[$attr:meta])*
        $vis:vis struct $name:ident;
        options: $options:ty,
        methods: $method:ident,
        builder: $builder:expr
        $(, metadata: $metadata:expr)?
    ) => {
        $(#[$attr])*
        $vis struct $name;

        impl $crate::ModuleDefinition for $name {
            $(
                fn metadata() -> $crate::ModuleMetadata {
                    $metadata
                }
            )?
        }

        impl $crate::ConfigurableModule for $name {
            type Options = $options;

            fn configurable() -> &'static $crate::ConfigurableModuleClass<$options> {
                $crate::__private::lazy_static! {
                    static ref CLASS: $crate::ConfigurableModuleClass<$options> = {
                        let builder: $crate::ConfigurableModuleBuilder<$options> = $builder;
                        builder.set_method(stringify!($method)).build().0
                    };
                }
                &CLASS
            }
        }

        $crate::__private::paste! {
            #[allow(dead_code)]
            impl $name {
                /// Register with a direct options value
                $vis fn $method(
                    options: impl Into<Option<$options>>,
                ) -> $crate::DynamicModule {
                    <Self as $crate::ConfigurableModule>::primary(options)
                }

                /// Register with a deferred options source
                $vis fn [<$method _async>](
                    options: $crate::AsyncModuleOptions<$options>,
                ) -> $crate::DynamicModule {
                    <Self as $crate::ConfigurableModule>::deferred(options)
                }
            }
        }
    };
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident;
        options: $options:ty,
        methods: $method:ident,
        builder: $builder:expr
        $(, metadata: $metadata:expr)?
        $(,)?
    ) => {
        $crate::configurable_module! {
            @define
            $(#[$attr])*
            $vis struct $name;
            options: $options,
            methods: $method,
            builder: $builder
            $(, metadata: $metadata)?
        }
    };
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident;
        options: $options:ty,
        builder: $builder:expr
        $(, metadata: $metadata:expr)?
        $(,)?
    ) => {
        $crate::configurable_module! {
            @define
            $(#[$attr])*
            $vis struct $name;
            options: $options,
            methods: register,
            builder: $builder
            $(, metadata: $metadata)?
        }
    };
}
