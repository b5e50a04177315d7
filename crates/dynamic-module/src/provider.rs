//! Provider definitions handed to the container
//!
//! A provider tells the container how to produce the value for a token. The
//! options provider of a configurable module is either a direct value or a
//! deferred source (factory, alias to an existing token, or a class that
//! creates the options). Which deferred field wins when several are set is
//! decided by the container at resolution time, never here.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::token::{ProviderToken, TypeRef};

/// Future returned by an options factory
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Resolved values of a factory's `inject` tokens, in declaration order
pub type InjectedArgs = Vec<Arc<dyn Any + Send + Sync>>;

type FactoryFn<T> = dyn Fn(InjectedArgs) -> BoxFuture<T> + Send + Sync;

/// Entry that can be registered in the container
pub trait Provider: Any + fmt::Debug + Send + Sync {
    /// Registration key
    fn token(&self) -> &ProviderToken;

    fn as_any(&self) -> &dyn Any;
}

impl dyn Provider {
    /// Downcast to a concrete provider type
    pub fn downcast_ref<P: Provider>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }

    pub fn is<P: Provider>(&self) -> bool {
        self.as_any().is::<P>()
    }
}

/// Shared factory producing an options value from injected dependencies
pub struct Factory<T> {
    inner: Arc<FactoryFn<T>>,
}

impl<T: Send + 'static> Factory<T> {
    /// Wrap a synchronous factory
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(InjectedArgs) -> T + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |args| {
                let value = factory(args);
                Box::pin(async move { value }) as BoxFuture<T>
            }),
        }
    }

    /// Wrap a factory returning a future
    pub fn from_async<F, Fut>(factory: F) -> Self
    where
        F: Fn(InjectedArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |args| Box::pin(factory(args)) as BoxFuture<T>),
        }
    }

    /// Run the factory with already-resolved dependencies
    pub fn call(&self, args: InjectedArgs) -> BoxFuture<T> {
        (self.inner)(args)
    }
}

impl<T> Factory<T> {
    /// Whether both handles share the same underlying closure
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("output", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// Type that can create module options when instantiated by the container
pub trait OptionsFactory<T>: Send + Sync + 'static {
    fn create_options(&self) -> T;
}

/// Class-based options source: a type implementing [`OptionsFactory`]
pub struct UseClass<T> {
    class: TypeRef,
    construct: Arc<dyn Fn() -> Box<dyn OptionsFactory<T>> + Send + Sync>,
}

impl<T: 'static> UseClass<T> {
    /// Reference `C`, constructed through its `Default` impl
    pub fn of<C>() -> Self
    where
        C: OptionsFactory<T> + Default,
    {
        Self {
            class: TypeRef::of::<C>(),
            construct: Arc::new(|| Box::new(C::default()) as Box<dyn OptionsFactory<T>>),
        }
    }

    pub fn class(&self) -> TypeRef {
        self.class
    }

    /// Build a fresh instance of the class
    pub fn instantiate(&self) -> Box<dyn OptionsFactory<T>> {
        (self.construct)()
    }
}

impl<T> Clone for UseClass<T> {
    fn clone(&self) -> Self {
        Self {
            class: self.class,
            construct: Arc::clone(&self.construct),
        }
    }
}

impl<T> fmt::Debug for UseClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseClass")
            .field("class", &self.class.type_name)
            .finish()
    }
}

/// Deferred options source
///
/// Every field is optional and several may be set at once; no precedence is
/// applied when packaging them.
#[derive(Debug, Clone)]
pub struct DeferredProvider<T> {
    pub value: Option<T>,
    pub factory: Option<Factory<T>>,
    pub existing: Option<ProviderToken>,
    pub use_class: Option<UseClass<T>>,
    /// Tokens whose values are passed to `factory`, in order
    pub inject: Vec<ProviderToken>,
}

impl<T> DeferredProvider<T> {
    /// True when no deferred source was supplied at all
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
            && self.factory.is_none()
            && self.existing.is_none()
            && self.use_class.is_none()
            && self.inject.is_empty()
    }
}

impl<T> Default for DeferredProvider<T> {
    fn default() -> Self {
        Self {
            value: None,
            factory: None,
            existing: None,
            use_class: None,
            inject: Vec::new(),
        }
    }
}

/// How the options value is produced
#[derive(Debug, Clone)]
pub enum ProviderKind<T> {
    /// Literal value, used as-is; `None` registers an absent value
    Direct(Option<T>),
    Deferred(DeferredProvider<T>),
}

/// Provider definition for a value of type `T`
#[derive(Debug, Clone)]
pub struct ProviderDefinition<T> {
    pub token: ProviderToken,
    pub kind: ProviderKind<T>,
}

impl<T> ProviderDefinition<T> {
    pub fn direct(token: impl Into<ProviderToken>, value: Option<T>) -> Self {
        Self {
            token: token.into(),
            kind: ProviderKind::Direct(value),
        }
    }

    pub fn deferred(token: impl Into<ProviderToken>, deferred: DeferredProvider<T>) -> Self {
        Self {
            token: token.into(),
            kind: ProviderKind::Deferred(deferred),
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self.kind, ProviderKind::Direct(_))
    }

    /// The literal value of a direct provider
    pub fn direct_value(&self) -> Option<&T> {
        match &self.kind {
            ProviderKind::Direct(value) => value.as_ref(),
            ProviderKind::Deferred(_) => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&DeferredProvider<T>> {
        match &self.kind {
            ProviderKind::Deferred(deferred) => Some(deferred),
            ProviderKind::Direct(_) => None,
        }
    }
}

impl<T> Provider for ProviderDefinition<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn token(&self) -> &ProviderToken {
        &self.token
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A type registered under its own type token
#[derive(Debug, Clone)]
pub struct ClassProvider {
    token: ProviderToken,
    class: TypeRef,
}

impl ClassProvider {
    pub fn of<C: 'static>() -> Self {
        Self {
            token: ProviderToken::of::<C>(),
            class: TypeRef::of::<C>(),
        }
    }

    /// Register `C` under a custom token
    pub fn with_token<C: 'static>(token: impl Into<ProviderToken>) -> Self {
        Self {
            token: token.into(),
            class: TypeRef::of::<C>(),
        }
    }

    pub fn class(&self) -> TypeRef {
        self.class
    }
}

impl Provider for ClassProvider {
    fn token(&self) -> &ProviderToken {
        &self.token
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
