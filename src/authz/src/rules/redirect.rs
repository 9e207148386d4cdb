//! Redirect-target normalization and resolution
//!
//! Turns the four accepted `redirect_to` shapes into one uniform dictionary
//! mapping privilege-name-or-`"default"` to an invocable resolver, and
//! resolves a rejected privilege against that dictionary.

use super::RuleSet;
use crate::error::{AuthzError, Result};
use crate::policy::{RedirectFn, RedirectSpec};
use crate::types::{RedirectTarget, RedirectValue, TransitionContext};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Reserved dictionary key used when no per-privilege entry matches
pub const DEFAULT_REDIRECT_KEY: &str = "default";

/// Invocable entry of the normalized redirect dictionary
#[derive(Clone)]
pub(crate) enum RedirectResolver {
    /// Pre-built target (literal state and single-target shapes)
    Fixed(RedirectTarget),
    /// User-supplied callable
    Dynamic(RedirectFn),
}

impl RedirectResolver {
    async fn resolve(&self, rejected: &str, ctx: &TransitionContext) -> Option<RedirectValue> {
        match self {
            RedirectResolver::Fixed(target) => Some(RedirectValue::Target(target.clone())),
            RedirectResolver::Dynamic(resolve) => resolve(rejected.to_owned(), ctx.clone()).await,
        }
    }
}

impl fmt::Debug for RedirectResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectResolver::Fixed(target) => f.debug_tuple("Fixed").field(target).finish(),
            RedirectResolver::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Normalize a redirect spec into the resolver dictionary.
///
/// A single-shape spec becomes the `"default"` entry. A per-privilege map
/// must carry a `"default"` key and its values must each be a single shape.
pub(crate) fn normalize(spec: &RedirectSpec) -> Result<HashMap<String, RedirectResolver>> {
    let mut resolvers = HashMap::new();

    match spec {
        RedirectSpec::PerPrivilege(entries) => {
            if !entries.contains_key(DEFAULT_REDIRECT_KEY) {
                return Err(AuthzError::InvalidPolicy(
                    "per-privilege redirect map must define a default target".to_string(),
                ));
            }
            for (key, value) in entries {
                resolvers.insert(key.clone(), normalize_entry(key, value)?);
            }
        }
        single => {
            resolvers.insert(
                DEFAULT_REDIRECT_KEY.to_owned(),
                normalize_entry(DEFAULT_REDIRECT_KEY, single)?,
            );
        }
    }

    Ok(resolvers)
}

fn normalize_entry(key: &str, spec: &RedirectSpec) -> Result<RedirectResolver> {
    match spec {
        RedirectSpec::State(state) => Ok(RedirectResolver::Fixed(RedirectTarget::new(state.clone()))),
        RedirectSpec::Target(target) => Ok(RedirectResolver::Fixed(target.clone())),
        RedirectSpec::Resolver(resolve) => Ok(RedirectResolver::Dynamic(resolve.clone())),
        RedirectSpec::PerPrivilege(_) => Err(AuthzError::InvalidPolicy(format!(
            "redirect entry `{key}` must be a state, a target, or a resolver"
        ))),
    }
}

impl RuleSet {
    /// Resolve the redirect target for a rejected privilege.
    ///
    /// Looks up the privilege's own entry, falling back to `"default"`.
    /// Errors with [`AuthzError::NoRedirect`] when neither entry exists or
    /// the resolver produced no usable target — the caller should leave the
    /// actor at the current state.
    pub async fn resolve_redirect(
        &self,
        rejected: &str,
        ctx: &TransitionContext,
    ) -> Result<RedirectTarget> {
        let resolver = self
            .redirect
            .get(rejected)
            .or_else(|| self.redirect.get(DEFAULT_REDIRECT_KEY))
            .ok_or_else(|| {
                AuthzError::NoRedirect(format!("no redirect configured for `{rejected}`"))
            })?;

        match resolver.resolve(rejected, ctx).await {
            Some(value) => Ok(value.into_target()),
            None => {
                warn!(privilege = %rejected, "redirect resolver produced no usable target");
                Err(AuthzError::NoRedirect(format!(
                    "resolver for `{rejected}` produced no usable target"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;

    fn ctx() -> TransitionContext {
        TransitionContext::new("dashboard", "home")
    }

    #[tokio::test]
    async fn test_literal_state_becomes_default_entry() {
        let policy = Policy::new().with_redirect("login");
        let rules = RuleSet::build(&policy, &ctx()).unwrap();

        let target = rules.resolve_redirect("anything", &ctx()).await.unwrap();
        assert_eq!(target, RedirectTarget::new("login"));
    }

    #[tokio::test]
    async fn test_target_object_is_used_as_is() {
        let target = RedirectTarget::new("login").with_param("returnTo", "dashboard");
        let policy = Policy::new().with_redirect(target.clone());
        let rules = RuleSet::build(&policy, &ctx()).unwrap();

        assert_eq!(rules.resolve_redirect("x", &ctx()).await.unwrap(), target);
    }

    #[test]
    fn test_map_without_default_is_invalid() {
        let policy =
            Policy::new().with_redirect(RedirectSpec::per_privilege([("admin", "dashboard")]));
        let err = RuleSet::build(&policy, &ctx()).unwrap_err();
        assert!(matches!(err, AuthzError::InvalidPolicy(_)));
    }

    #[test]
    fn test_nested_map_entry_is_invalid() {
        let nested = RedirectSpec::per_privilege([("default", "login")]);
        let policy = Policy::new().with_redirect(RedirectSpec::per_privilege([
            ("default", RedirectSpec::State("login".to_string())),
            ("admin", nested),
        ]));
        let err = RuleSet::build(&policy, &ctx()).unwrap_err();
        assert!(matches!(err, AuthzError::InvalidPolicy(_)));
    }

    #[tokio::test]
    async fn test_resolver_string_result_is_wrapped() {
        let policy = Policy::new().with_redirect(RedirectSpec::resolver(|rejected, _ctx| async move {
            Some(RedirectValue::State(format!("login/{rejected}")))
        }));
        let rules = RuleSet::build(&policy, &ctx()).unwrap();

        let target = rules.resolve_redirect("admin", &ctx()).await.unwrap();
        assert_eq!(target.state, "login/admin");
    }

    #[tokio::test]
    async fn test_missing_entry_and_missing_default_rejects() {
        let policy = Policy::new();
        let rules = RuleSet::build(&policy, &ctx()).unwrap();

        let err = rules.resolve_redirect("admin", &ctx()).await.unwrap_err();
        assert!(matches!(err, AuthzError::NoRedirect(_)));
    }
}
