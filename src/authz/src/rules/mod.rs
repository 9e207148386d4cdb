//! Normalized rule sets
//!
//! A [`RuleSet`] is the immutable-once-built form of a [`Policy`]: ordered
//! allow/deny group sequences plus a redirect dictionary. It is constructed
//! once per authorization attempt (or composed from several constructions
//! for a state hierarchy) and discarded after the decision is made.

mod compose;
mod redirect;

pub use compose::ComposeOrder;
pub use redirect::DEFAULT_REDIRECT_KEY;

pub(crate) use redirect::RedirectResolver;

use crate::error::{AuthzError, Result};
use crate::policy::{Policy, PrivilegeSpec};
use crate::types::{PrivilegeName, TransitionContext};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// One OR-set of privilege names; the group succeeds if any one validates
pub type PrivilegeGroup = Vec<PrivilegeName>;

/// Normalized access rule set.
///
/// Read-only after construction: it may be shared (`Arc`) and evaluated by
/// any number of concurrent `authorize` calls.
///
/// Invariant: `allow` and `deny` never contain empty groups — a group is
/// present only if its source had at least one name. An empty `allow`
/// sequence means no allow constraint (the except-only case).
#[derive(Clone)]
pub struct RuleSet {
    pub(crate) allow: Vec<PrivilegeGroup>,
    pub(crate) deny: Vec<PrivilegeGroup>,
    pub(crate) redirect: HashMap<String, RedirectResolver>,
}

impl RuleSet {
    /// Normalize a raw policy into a rule set.
    ///
    /// Dynamic `only`/`except` callables are invoked here, exactly once,
    /// against `ctx`. Malformed redirect shapes and a dynamic spec
    /// returning another callable surface as
    /// [`AuthzError::InvalidPolicy`].
    pub fn build(policy: &Policy, ctx: &TransitionContext) -> Result<Self> {
        let allow = normalize_privileges(&policy.only, ctx)?;
        let deny = normalize_privileges(&policy.except, ctx)?;
        let redirect = match &policy.redirect_to {
            Some(spec) => redirect::normalize(spec)?,
            None => HashMap::new(),
        };

        debug!(
            allow_groups = allow.len(),
            deny_groups = deny.len(),
            redirect_entries = redirect.len(),
            "rule set built"
        );

        Ok(Self { allow, deny, redirect })
    }

    /// Rule set with no constraints and no redirects: always accepts
    pub fn empty() -> Self {
        Self {
            allow: Vec::new(),
            deny: Vec::new(),
            redirect: HashMap::new(),
        }
    }

    /// Allow groups, in evaluation order
    pub fn allow_groups(&self) -> &[PrivilegeGroup] {
        &self.allow
    }

    /// Deny groups, in evaluation order
    pub fn deny_groups(&self) -> &[PrivilegeGroup] {
        &self.deny
    }

    /// Whether the redirect dictionary has an entry for `key`
    pub fn has_redirect(&self, key: &str) -> bool {
        self.redirect.contains_key(key)
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut redirect_keys: Vec<&str> = self.redirect.keys().map(String::as_str).collect();
        redirect_keys.sort_unstable();
        f.debug_struct("RuleSet")
            .field("allow", &self.allow)
            .field("deny", &self.deny)
            .field("redirect", &redirect_keys)
            .finish()
    }
}

/// Normalize an `only`/`except` spec into its group sequence.
///
/// Empty inner groups are dropped, keeping the no-empty-groups invariant.
fn normalize_privileges(
    spec: &PrivilegeSpec,
    ctx: &TransitionContext,
) -> Result<Vec<PrivilegeGroup>> {
    let groups = match spec {
        PrivilegeSpec::None => Vec::new(),
        PrivilegeSpec::Single(name) => vec![vec![name.clone()]],
        PrivilegeSpec::Flat(names) => {
            if names.is_empty() {
                Vec::new()
            } else {
                vec![names.clone()]
            }
        }
        PrivilegeSpec::Groups(groups) => groups
            .iter()
            .filter(|group| !group.is_empty())
            .cloned()
            .collect(),
        PrivilegeSpec::Dynamic(compute) => match compute(ctx) {
            PrivilegeSpec::Dynamic(_) => {
                return Err(AuthzError::InvalidPolicy(
                    "dynamic privilege spec must not return another callable".to_string(),
                ))
            }
            produced => normalize_privileges(&produced, ctx)?,
        },
    };

    Ok(groups)
}
