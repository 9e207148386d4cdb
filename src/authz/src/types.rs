//! Core transition-authorization types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Name of a role or permission checked against a validation source
pub type PrivilegeName = String;

/// Outcome of a store's validation check: the validated privilege name, or a
/// rejection value
pub type ValidationOutcome = std::result::Result<PrivilegeName, ValidationRejection>;

/// Context of the transition being authorized.
///
/// Threaded explicitly through every call — dynamic policy callables,
/// validation checks, and redirect resolvers all receive it as a parameter,
/// never through ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionContext {
    /// Target state of the transition
    pub to: String,

    /// State the transition leaves from
    pub from: String,

    /// Transition parameters
    #[serde(default)]
    pub params: HashMap<String, Value>,

    /// Transition options
    #[serde(default)]
    pub options: HashMap<String, Value>,
}

impl TransitionContext {
    /// Create a context for a transition from `from` to `to`
    pub fn new(to: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            params: HashMap::new(),
            options: HashMap::new(),
        }
    }

    /// Add a transition parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a transition option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Concrete navigation target produced for a rejected privilege
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectTarget {
    /// Destination state name
    pub state: String,

    /// Parameters to apply to the destination
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, Value>,

    /// Navigation options for the destination
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, Value>,
}

impl RedirectTarget {
    /// Create a target pointing at `state` with no params or options
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            params: HashMap::new(),
            options: HashMap::new(),
        }
    }

    /// Add a destination parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a navigation option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Value a redirect resolver may produce: a bare state name or a full target
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectValue {
    /// Destination state name, wrapped into a parameterless target
    State(String),
    /// Complete target, used as-is
    Target(RedirectTarget),
}

impl RedirectValue {
    pub(crate) fn into_target(self) -> RedirectTarget {
        match self {
            RedirectValue::State(state) => RedirectTarget::new(state),
            RedirectValue::Target(target) => target,
        }
    }
}

impl From<&str> for RedirectValue {
    fn from(state: &str) -> Self {
        RedirectValue::State(state.to_owned())
    }
}

impl From<String> for RedirectValue {
    fn from(state: String) -> Self {
        RedirectValue::State(state)
    }
}

impl From<RedirectTarget> for RedirectValue {
    fn from(target: RedirectTarget) -> Self {
        RedirectValue::Target(target)
    }
}

/// Rejection payload produced by a failed validation check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRejection {
    /// Optional explanation, used for logging only
    pub message: Option<String>,
}

impl ValidationRejection {
    /// Rejection with an explanation attached
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Why a privilege caused a denial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    /// A deny-phase privilege validated: access is explicitly forbidden
    Forbidden,
    /// An allow-phase privilege was rejected by its validation source
    Rejected,
    /// The privilege name is registered in neither store
    Unregistered,
}

/// Rejection value produced by [`AuthzEngine::authorize`](crate::engine::AuthzEngine::authorize).
///
/// The privilege name is the contractual payload — it is the key fed back
/// into [`RuleSet::resolve_redirect`](crate::rules::RuleSet::resolve_redirect).
/// The reason exists for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    /// The privilege name that caused the denial
    pub privilege: PrivilegeName,

    /// Why that privilege failed
    pub reason: DenialReason,
}

impl Denial {
    pub(crate) fn new(privilege: PrivilegeName, reason: DenialReason) -> Self {
        Self { privilege, reason }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            DenialReason::Forbidden => "explicitly forbidden",
            DenialReason::Rejected => "validation rejected",
            DenialReason::Unregistered => "not registered",
        };
        write!(f, "transition denied by privilege `{}` ({})", self.privilege, reason)
    }
}
