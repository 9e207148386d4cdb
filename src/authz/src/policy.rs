//! Raw access policies and their polymorphic field shapes
//!
//! A [`Policy`] is what a caller declares on a protected state: which
//! privileges may proceed (`only`), which are explicitly denied (`except`),
//! and where to send a rejected actor (`redirect_to`). The fields accept
//! several shapes; [`RuleSet::build`](crate::rules::RuleSet::build)
//! normalizes them all.

use crate::types::{PrivilegeName, RedirectTarget, RedirectValue, TransitionContext};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Callable form of `only`/`except`, evaluated exactly once against the
/// transition context at rule-set construction
pub type PrivilegeFn = Arc<dyn Fn(&TransitionContext) -> PrivilegeSpec + Send + Sync>;

/// Callable redirect resolver: receives the rejected privilege name and the
/// transition context, produces a target — or nothing usable
pub type RedirectFn =
    Arc<dyn Fn(PrivilegeName, TransitionContext) -> BoxFuture<'static, Option<RedirectValue>> + Send + Sync>;

/// Privileges named by a policy's `only` or `except` field.
///
/// A flat list is ONE group evaluated as one OR-set; grouping is chosen by
/// nesting, never inferred.
#[derive(Clone, Default)]
pub enum PrivilegeSpec {
    /// No constraint
    #[default]
    None,
    /// A single privilege name: one one-element group
    Single(PrivilegeName),
    /// A flat list: one group, any member validating satisfies it
    Flat(Vec<PrivilegeName>),
    /// Explicitly nested groups, evaluated strictly in order
    Groups(Vec<Vec<PrivilegeName>>),
    /// Computed against the transition context at construction time.
    /// Must not return another `Dynamic` spec.
    Dynamic(PrivilegeFn),
}

impl PrivilegeSpec {
    /// Wrap a callable evaluated once against the transition context when
    /// the rule set is built
    pub fn dynamic<F>(compute: F) -> Self
    where
        F: Fn(&TransitionContext) -> PrivilegeSpec + Send + Sync + 'static,
    {
        PrivilegeSpec::Dynamic(Arc::new(compute))
    }
}

impl fmt::Debug for PrivilegeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivilegeSpec::None => f.write_str("None"),
            PrivilegeSpec::Single(name) => f.debug_tuple("Single").field(name).finish(),
            PrivilegeSpec::Flat(names) => f.debug_tuple("Flat").field(names).finish(),
            PrivilegeSpec::Groups(groups) => f.debug_tuple("Groups").field(groups).finish(),
            PrivilegeSpec::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for PrivilegeSpec {
    fn from(name: &str) -> Self {
        PrivilegeSpec::Single(name.to_owned())
    }
}

impl From<String> for PrivilegeSpec {
    fn from(name: String) -> Self {
        PrivilegeSpec::Single(name)
    }
}

impl From<Vec<String>> for PrivilegeSpec {
    fn from(names: Vec<String>) -> Self {
        PrivilegeSpec::Flat(names)
    }
}

impl From<Vec<&str>> for PrivilegeSpec {
    fn from(names: Vec<&str>) -> Self {
        PrivilegeSpec::Flat(names.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<Vec<String>>> for PrivilegeSpec {
    fn from(groups: Vec<Vec<String>>) -> Self {
        PrivilegeSpec::Groups(groups)
    }
}

impl From<Vec<Vec<&str>>> for PrivilegeSpec {
    fn from(groups: Vec<Vec<&str>>) -> Self {
        PrivilegeSpec::Groups(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(str::to_owned).collect())
                .collect(),
        )
    }
}

/// Redirect specification, one of four accepted shapes.
///
/// All four normalize into a dictionary keyed by privilege name plus the
/// reserved `"default"` key, each value invocable.
#[derive(Clone)]
pub enum RedirectSpec {
    /// Literal destination state name
    State(String),
    /// Single target object
    Target(RedirectTarget),
    /// Callable resolver
    Resolver(RedirectFn),
    /// Per-privilege dictionary. Must contain the `"default"` key, and its
    /// values must themselves be one of the three shapes above.
    PerPrivilege(HashMap<String, RedirectSpec>),
}

impl RedirectSpec {
    /// Wrap an async callable resolver
    pub fn resolver<F, Fut>(resolve: F) -> Self
    where
        F: Fn(PrivilegeName, TransitionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<RedirectValue>> + Send + 'static,
    {
        RedirectSpec::Resolver(Arc::new(move |name, ctx| Box::pin(resolve(name, ctx))))
    }

    /// Build a per-privilege dictionary from `(key, shape)` pairs
    pub fn per_privilege<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RedirectSpec>,
    {
        RedirectSpec::PerPrivilege(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for RedirectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectSpec::State(state) => f.debug_tuple("State").field(state).finish(),
            RedirectSpec::Target(target) => f.debug_tuple("Target").field(target).finish(),
            RedirectSpec::Resolver(_) => f.write_str("Resolver(..)"),
            RedirectSpec::PerPrivilege(entries) => {
                f.debug_tuple("PerPrivilege").field(entries).finish()
            }
        }
    }
}

impl From<&str> for RedirectSpec {
    fn from(state: &str) -> Self {
        RedirectSpec::State(state.to_owned())
    }
}

impl From<String> for RedirectSpec {
    fn from(state: String) -> Self {
        RedirectSpec::State(state)
    }
}

impl From<RedirectTarget> for RedirectSpec {
    fn from(target: RedirectTarget) -> Self {
        RedirectSpec::Target(target)
    }
}

/// Raw access policy declared on a protected state
#[derive(Debug, Clone, Default)]
pub struct Policy {
    /// Privileges that may proceed (allow constraint)
    pub only: PrivilegeSpec,

    /// Privileges that are explicitly denied
    pub except: PrivilegeSpec,

    /// Where to send a rejected actor, if anywhere
    pub redirect_to: Option<RedirectSpec>,
}

impl Policy {
    /// Create an unconstrained policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the allow constraint
    pub fn with_only(mut self, spec: impl Into<PrivilegeSpec>) -> Self {
        self.only = spec.into();
        self
    }

    /// Set the deny constraint
    pub fn with_except(mut self, spec: impl Into<PrivilegeSpec>) -> Self {
        self.except = spec.into();
        self
    }

    /// Set the redirect specification
    pub fn with_redirect(mut self, spec: impl Into<RedirectSpec>) -> Self {
        self.redirect_to = Some(spec.into());
        self
    }
}
