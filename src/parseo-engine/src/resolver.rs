//! Variable resolvers
//!
//! A resolver recognises an identifier (or the base of an attribute access)
//! and turns it into a [`Binding`] on a named context value. Simple resolvers
//! match bare identifiers such as `M3`; attributed resolvers match
//! `base.attr` forms such as `config.x`.
//!
//! Resolvers are tried in registration order and the first match wins.
//! Overlapping registrations are accepted as-is.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use log::warn;
use parseo_parser::{Binding, Expr};
use regex::{Captures, Regex};

use crate::error::{EngineError, Result};

/// Resolver for bare identifiers
pub trait SimpleResolver: Send + Sync {
    /// Name shown in whitelist messages
    fn display_name(&self) -> &str;

    /// Context key the produced bindings read from
    fn context_key(&self) -> &str;

    /// Whether this resolver accepts `ident`
    fn correspond(&self, ident: &str) -> bool;

    /// Build the binding for an accepted identifier
    fn bind(&self, ident: &str) -> Result<Expr>;
}

/// Resolver for `base.attr` forms
pub trait AttributedResolver: Send + Sync {
    /// Name shown in whitelist messages
    fn display_name(&self) -> &str;

    /// Context key the produced bindings read from
    fn context_key(&self) -> &str;

    /// Whether this resolver accepts the attribute base `base`
    fn correspond(&self, base: &str) -> bool {
        base == self.display_name()
    }

    /// Build the binding for `base.attr`
    fn bind(&self, base: &str, attr: &str) -> Expr;
}

/// How a [`PatternVariable`] turns its match into a subscript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Capture group 1 parsed as an integer position
    #[default]
    Index,
    /// Capture group 1 (or the whole identifier) used as a string key
    Key,
}

type Binder = Arc<dyn Fn(&Captures<'_>) -> Result<Expr> + Send + Sync>;

/// Simple resolver driven by a regular expression
///
/// The pattern must match the whole identifier.
#[derive(Clone)]
pub struct PatternVariable {
    display_name: String,
    pattern: Regex,
    context_key: String,
    binder: Binder,
}

impl PatternVariable {
    /// Resolver binding to `context[group 1]` (index or key per `mode`)
    pub fn new(
        display_name: impl Into<String>,
        pattern: &str,
        context_key: impl Into<String>,
        mode: BindMode,
    ) -> Result<Self> {
        let context_key = context_key.into();
        let regex = anchored(pattern)?;

        if mode == BindMode::Index && regex.captures_len() < 2 {
            return Err(EngineError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "index binding needs a capture group".to_string(),
            });
        }

        let context = context_key.clone();
        let binder: Binder = match mode {
            BindMode::Index => Arc::new(move |caps: &Captures<'_>| {
                let ident = &caps[0];
                let digits = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let index = digits
                    .parse::<i64>()
                    .map_err(|e| EngineError::InvalidBinding {
                        name: ident.to_string(),
                        message: format!("'{digits}' is not an index: {e}"),
                    })?;
                Ok(Expr::Binding(Binding::index(context.as_str(), index)))
            }),
            BindMode::Key => Arc::new(move |caps: &Captures<'_>| {
                let key = caps.get(1).unwrap_or_else(|| caps.get_match()).as_str();
                Ok(Expr::Binding(Binding::key(context.as_str(), key)))
            }),
        };

        Ok(Self {
            display_name: display_name.into(),
            pattern: regex,
            context_key,
            binder,
        })
    }

    /// Resolver with a custom binder over the pattern's captures
    pub fn with_binder<F>(
        display_name: impl Into<String>,
        pattern: &str,
        context_key: impl Into<String>,
        binder: F,
    ) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> Result<Expr> + Send + Sync + 'static,
    {
        Ok(Self {
            display_name: display_name.into(),
            pattern: anchored(pattern)?,
            context_key: context_key.into(),
            binder: Arc::new(binder),
        })
    }

    /// The anchored pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|e| EngineError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

impl SimpleResolver for PatternVariable {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn context_key(&self) -> &str {
        &self.context_key
    }

    fn correspond(&self, ident: &str) -> bool {
        self.pattern.is_match(ident)
    }

    fn bind(&self, ident: &str) -> Result<Expr> {
        let caps = self
            .pattern
            .captures(ident)
            .ok_or_else(|| EngineError::InvalidBinding {
                name: ident.to_string(),
                message: format!("does not match {}", self.pattern),
            })?;
        (self.binder)(&caps)
    }
}

impl fmt::Debug for PatternVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternVariable")
            .field("display_name", &self.display_name)
            .field("pattern", &self.pattern.as_str())
            .field("context_key", &self.context_key)
            .finish()
    }
}

/// Attributed resolver reading `context["attr"]` for `name.attr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeVariable {
    name: String,
    context_key: String,
}

impl AttributeVariable {
    /// Create a new attribute resolver
    pub fn new(name: impl Into<String>, context_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context_key: context_key.into(),
        }
    }
}

impl AttributedResolver for AttributeVariable {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn context_key(&self) -> &str {
        &self.context_key
    }

    fn bind(&self, _base: &str, attr: &str) -> Expr {
        Expr::Binding(Binding::key(self.context_key.as_str(), attr))
    }
}

/// A registered resolver of either kind
#[derive(Clone)]
pub enum Resolver {
    /// Matches bare identifiers
    Simple(Arc<dyn SimpleResolver>),
    /// Matches `base.attr`
    Attributed(Arc<dyn AttributedResolver>),
}

impl Resolver {
    /// Name shown in whitelist messages
    pub fn display_name(&self) -> &str {
        match self {
            Resolver::Simple(r) => r.display_name(),
            Resolver::Attributed(r) => r.display_name(),
        }
    }

    /// Context key the resolver reads from
    pub fn context_key(&self) -> &str {
        match self {
            Resolver::Simple(r) => r.context_key(),
            Resolver::Attributed(r) => r.context_key(),
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Resolver::Simple(_) => "Simple",
            Resolver::Attributed(_) => "Attributed",
        };
        write!(
            f,
            "{}({} -> {})",
            kind,
            self.display_name(),
            self.context_key()
        )
    }
}

impl From<PatternVariable> for Resolver {
    fn from(resolver: PatternVariable) -> Self {
        Resolver::Simple(Arc::new(resolver))
    }
}

impl From<AttributeVariable> for Resolver {
    fn from(resolver: AttributeVariable) -> Self {
        Resolver::Attributed(Arc::new(resolver))
    }
}

/// Frozen, ordered collection of resolvers
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    simple: Vec<Arc<dyn SimpleResolver>>,
    attributed: Vec<Arc<dyn AttributedResolver>>,
    context_keys: IndexSet<String>,
}

impl ResolverRegistry {
    /// Build a registry from resolvers in registration order
    pub fn new(resolvers: impl IntoIterator<Item = Resolver>) -> Self {
        let mut registry = Self::default();
        for resolver in resolvers {
            registry.context_keys.insert(resolver.context_key().to_string());
            match resolver {
                Resolver::Simple(r) => registry.simple.push(r),
                Resolver::Attributed(r) => {
                    if registry
                        .attributed
                        .iter()
                        .any(|existing| existing.display_name() == r.display_name())
                    {
                        warn!(
                            "Attribute variable '{}' registered twice, the first registration wins",
                            r.display_name()
                        );
                    }
                    registry.attributed.push(r);
                }
            }
        }
        registry
    }

    /// First simple resolver accepting `ident`
    pub fn find_simple(&self, ident: &str) -> Option<&dyn SimpleResolver> {
        self.simple
            .iter()
            .find(|r| r.correspond(ident))
            .map(|r| r.as_ref())
    }

    /// First attributed resolver accepting `base`
    pub fn find_attributed(&self, base: &str) -> Option<&dyn AttributedResolver> {
        self.attributed
            .iter()
            .find(|r| r.correspond(base))
            .map(|r| r.as_ref())
    }

    /// Display names of the simple resolvers
    pub fn simple_names(&self) -> Vec<String> {
        self.simple
            .iter()
            .map(|r| r.display_name().to_string())
            .collect()
    }

    /// Display names of the attributed resolvers
    pub fn attributed_names(&self) -> Vec<String> {
        self.attributed
            .iter()
            .map(|r| r.display_name().to_string())
            .collect()
    }

    /// Context keys of every registered resolver, first registration first
    pub fn context_keys(&self) -> &IndexSet<String> {
        &self.context_keys
    }

    /// Total number of resolvers
    pub fn len(&self) -> usize {
        self.simple.len() + self.attributed.len()
    }

    /// Whether no resolver is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("simple", &self.simple_names())
            .field("attributed", &self.attributed_names())
            .finish()
    }
}
