//! Tokens used as registration keys in the container
//!
//! An [`OptionsToken`] is minted once per built configurable module and keys the
//! provider carrying that module's options. [`ProviderToken`] is the general key
//! type: either a string name or a Rust type.

use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;

/// Suffix appended to every generated options token
pub const DEFAULT_TOKEN_SUFFIX: &str = "_TOKEN";

/// Process-unique key for a configurable module's options provider
///
/// The contents are opaque. Two tokens compare equal only when one was cloned
/// from the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsToken(String);

impl OptionsToken {
    /// Generate a fresh token with the default suffix
    pub fn generate() -> Self {
        Self::generate_with_suffix(DEFAULT_TOKEN_SUFFIX)
    }

    /// Generate a fresh token ending in `suffix`
    ///
    /// Uniqueness comes from a random v4 UUID (122 random bits), so the suffix
    /// never needs to be unique itself.
    pub fn generate_with_suffix(suffix: &str) -> Self {
        Self(format!("{}{}", uuid::Uuid::new_v4().simple(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OptionsToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OptionsToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity of a Rust type, used for modules, controllers and class providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub type_id: TypeId,
    pub type_name: &'static str,
}

impl TypeRef {
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Check whether this reference points at `T`
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// Key of a provider in the container registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderToken {
    /// String key, including generated options tokens
    Named(String),
    /// A type used as its own key
    Type(TypeRef),
}

impl ProviderToken {
    /// Token keyed on the type `T`
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self::Type(TypeRef::of::<T>())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Whether this token is the given options token
    pub fn matches_options(&self, token: &OptionsToken) -> bool {
        matches!(self, Self::Named(name) if name == token.as_str())
    }
}

impl fmt::Display for ProviderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderToken::Named(name) => f.write_str(name),
            ProviderToken::Type(type_ref) => write!(f, "{}", type_ref),
        }
    }
}

impl From<OptionsToken> for ProviderToken {
    fn from(token: OptionsToken) -> Self {
        Self::Named(token.0)
    }
}

impl From<&OptionsToken> for ProviderToken {
    fn from(token: &OptionsToken) -> Self {
        Self::Named(token.0.clone())
    }
}

impl From<&str> for ProviderToken {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ProviderToken {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<TypeRef> for ProviderToken {
    fn from(type_ref: TypeRef) -> Self {
        Self::Type(type_ref)
    }
}
