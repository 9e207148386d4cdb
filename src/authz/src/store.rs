//! Role and permission definition stores
//!
//! The engine consumes these as externally-owned, read-mostly lookup
//! tables: a `contains` lookup plus a pending `validate` check per name.
//! [`InMemoryDefinitions`] is the reference implementation backing both
//! traits.

use crate::types::{PrivilegeName, TransitionContext, ValidationOutcome, ValidationRejection};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of role definitions
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Whether a role definition with this name exists
    async fn contains(&self, name: &str) -> bool;

    /// Run the role's validation check for this transition
    async fn validate(&self, name: &str, ctx: &TransitionContext) -> ValidationOutcome;
}

/// Source of permission definitions
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Whether a permission definition with this name exists
    async fn contains(&self, name: &str) -> bool;

    /// Run the permission's validation check for this transition
    async fn validate(&self, name: &str, ctx: &TransitionContext) -> ValidationOutcome;
}

/// Stored validation check: owned inputs, type-erased future
type Validator =
    Arc<dyn Fn(PrivilegeName, TransitionContext) -> BoxFuture<'static, ValidationOutcome> + Send + Sync>;

fn erase<F, Fut>(validator: F) -> Validator
where
    F: Fn(PrivilegeName, TransitionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ValidationOutcome> + Send + 'static,
{
    Arc::new(move |name, ctx| Box::pin(validator(name, ctx)))
}

/// In-memory definition store implementing both [`RoleStore`] and
/// [`PermissionStore`].
///
/// Each definition is a named async validation check receiving the
/// privilege name and the transition context. Thread-safe; share it with
/// `Arc` and pass the same instance as both stores if roles and
/// permissions live together.
#[derive(Default)]
pub struct InMemoryDefinitions {
    roles: RwLock<HashMap<PrivilegeName, Validator>>,
    permissions: RwLock<HashMap<PrivilegeName, Validator>>,
}

impl InMemoryDefinitions {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a role under `name` with its validation check
    pub async fn define_role<F, Fut>(&self, name: impl Into<String>, validator: F)
    where
        F: Fn(PrivilegeName, TransitionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidationOutcome> + Send + 'static,
    {
        self.roles.write().await.insert(name.into(), erase(validator));
    }

    /// Register a permission under `name` with its validation check
    pub async fn define_permission<F, Fut>(&self, name: impl Into<String>, validator: F)
    where
        F: Fn(PrivilegeName, TransitionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ValidationOutcome> + Send + 'static,
    {
        self.permissions.write().await.insert(name.into(), erase(validator));
    }

    /// Remove a role definition
    pub async fn undefine_role(&self, name: &str) {
        self.roles.write().await.remove(name);
    }

    /// Remove a permission definition
    pub async fn undefine_permission(&self, name: &str) {
        self.permissions.write().await.remove(name);
    }
}

#[async_trait]
impl RoleStore for InMemoryDefinitions {
    async fn contains(&self, name: &str) -> bool {
        self.roles.read().await.contains_key(name)
    }

    async fn validate(&self, name: &str, ctx: &TransitionContext) -> ValidationOutcome {
        let validator = self.roles.read().await.get(name).cloned();
        match validator {
            Some(validate) => validate(name.to_owned(), ctx.clone()).await,
            None => Err(ValidationRejection::with_message("role is not defined")),
        }
    }
}

#[async_trait]
impl PermissionStore for InMemoryDefinitions {
    async fn contains(&self, name: &str) -> bool {
        self.permissions.read().await.contains_key(name)
    }

    async fn validate(&self, name: &str, ctx: &TransitionContext) -> ValidationOutcome {
        let validator = self.permissions.read().await.get(name).cloned();
        match validator {
            Some(validate) => validate(name.to_owned(), ctx.clone()).await,
            None => Err(ValidationRejection::with_message("permission is not defined")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_validate_role() {
        tokio_test::block_on(async {
            let store = InMemoryDefinitions::new();
            store
                .define_role("admin", |name, _ctx| async move { Ok(name) })
                .await;

            assert!(RoleStore::contains(&store, "admin").await);
            let validated = RoleStore::validate(&store, "admin", &TransitionContext::default())
                .await
                .unwrap();
            assert_eq!(validated, "admin");
        });
    }

    #[test]
    fn test_validator_sees_the_transition_context() {
        tokio_test::block_on(async {
            let store = InMemoryDefinitions::new();
            store
                .define_permission("view", |name, ctx| async move {
                    if ctx.to == "dashboard" {
                        Ok(name)
                    } else {
                        Err(ValidationRejection::with_message("wrong target state"))
                    }
                })
                .await;

            let allowed = TransitionContext::new("dashboard", "home");
            assert!(PermissionStore::validate(&store, "view", &allowed).await.is_ok());

            let blocked = TransitionContext::new("settings", "home");
            assert!(PermissionStore::validate(&store, "view", &blocked).await.is_err());
        });
    }

    #[test]
    fn test_undefine_removes_the_definition() {
        tokio_test::block_on(async {
            let store = InMemoryDefinitions::new();
            store
                .define_role("temp", |name, _ctx| async move { Ok(name) })
                .await;
            store.undefine_role("temp").await;

            assert!(!RoleStore::contains(&store, "temp").await);
        });
    }
}
