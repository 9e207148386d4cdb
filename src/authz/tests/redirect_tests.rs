//! Redirect normalization and resolution integration tests
//!
//! Covers the four accepted `redirect_to` shapes, per-privilege fallback,
//! and the failure modes a caller must treat as "cannot redirect".

use serde_json::json;
use waygate_authz::{
    AuthzError, Policy, RedirectSpec, RedirectTarget, RedirectValue, RuleSet, TransitionContext,
};

fn ctx() -> TransitionContext {
    TransitionContext::new("dashboard", "home")
}

// ============================================================================
// SHAPE NORMALIZATION TESTS
// ============================================================================

#[tokio::test]
async fn test_literal_state_redirects_any_rejected_privilege() {
    let policy = Policy::new().with_redirect("login");
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    for rejected in ["admin", "editor", "anything-at-all"] {
        let target = rules.resolve_redirect(rejected, &ctx()).await.unwrap();
        assert_eq!(target, RedirectTarget::new("login"));
    }
}

#[tokio::test]
async fn test_target_object_keeps_params_and_options() {
    let target = RedirectTarget::new("login")
        .with_param("returnTo", "dashboard")
        .with_option("location", "replace");
    let policy = Policy::new().with_redirect(target.clone());
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    assert_eq!(rules.resolve_redirect("admin", &ctx()).await.unwrap(), target);
}

#[tokio::test]
async fn test_resolver_receives_the_rejected_privilege_and_context() {
    let policy = Policy::new().with_redirect(RedirectSpec::resolver(|rejected, ctx| async move {
        Some(RedirectValue::Target(
            RedirectTarget::new("login")
                .with_param("denied", rejected)
                .with_param("wanted", ctx.to),
        ))
    }));
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    let target = rules.resolve_redirect("admin", &ctx()).await.unwrap();
    assert_eq!(target.state, "login");
    assert_eq!(target.params.get("denied"), Some(&json!("admin")));
    assert_eq!(target.params.get("wanted"), Some(&json!("dashboard")));
}

#[tokio::test]
async fn test_resolver_bare_state_result_is_wrapped() {
    let policy = Policy::new()
        .with_redirect(RedirectSpec::resolver(|_rejected, _ctx| async move {
            Some(RedirectValue::State("login".to_string()))
        }));
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    let target = rules.resolve_redirect("admin", &ctx()).await.unwrap();
    assert_eq!(target, RedirectTarget::new("login"));
}

#[tokio::test]
async fn test_per_privilege_map_with_fallback() {
    let policy = Policy::new().with_redirect(RedirectSpec::per_privilege([
        ("default", "login"),
        ("admin", "dashboard"),
    ]));
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    let admin = rules.resolve_redirect("admin", &ctx()).await.unwrap();
    assert_eq!(admin.state, "dashboard");

    let other = rules.resolve_redirect("other", &ctx()).await.unwrap();
    assert_eq!(other.state, "login");
}

#[tokio::test]
async fn test_per_privilege_values_may_be_resolvers() {
    let policy = Policy::new().with_redirect(RedirectSpec::per_privilege([
        ("default", RedirectSpec::State("login".to_string())),
        (
            "admin",
            RedirectSpec::resolver(|rejected, _ctx| async move {
                Some(RedirectValue::State(format!("escalate/{rejected}")))
            }),
        ),
    ]));
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    let target = rules.resolve_redirect("admin", &ctx()).await.unwrap();
    assert_eq!(target.state, "escalate/admin");
}

// ============================================================================
// CONFIGURATION ERROR TESTS
// ============================================================================

#[test]
fn test_map_without_default_fails_at_construction() {
    let policy = Policy::new().with_redirect(RedirectSpec::per_privilege([("admin", "dashboard")]));
    let err = RuleSet::build(&policy, &ctx()).unwrap_err();
    assert!(matches!(err, AuthzError::InvalidPolicy(_)));
}

#[test]
fn test_nested_per_privilege_map_fails_at_construction() {
    let policy = Policy::new().with_redirect(RedirectSpec::per_privilege([
        ("default", RedirectSpec::State("login".to_string())),
        ("admin", RedirectSpec::per_privilege([("default", "x")])),
    ]));
    let err = RuleSet::build(&policy, &ctx()).unwrap_err();
    assert!(matches!(err, AuthzError::InvalidPolicy(_)));
}

// ============================================================================
// RESOLUTION FAILURE TESTS
// ============================================================================

#[tokio::test]
async fn test_no_redirect_configured_rejects() {
    let rules = RuleSet::build(&Policy::new(), &ctx()).unwrap();

    let err = rules.resolve_redirect("admin", &ctx()).await.unwrap_err();
    assert!(matches!(err, AuthzError::NoRedirect(_)));
}

#[tokio::test]
async fn test_resolver_without_usable_result_rejects() {
    let policy = Policy::new()
        .with_redirect(RedirectSpec::resolver(|_rejected, _ctx| async move { None }));
    let rules = RuleSet::build(&policy, &ctx()).unwrap();

    let err = rules.resolve_redirect("admin", &ctx()).await.unwrap_err();
    assert!(matches!(err, AuthzError::NoRedirect(_)));
}
