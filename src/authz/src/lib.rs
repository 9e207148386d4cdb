//! # Waygate Authorization
//!
//! Authorization-decision engine that gates navigation between application
//! states. A state declares an access [`Policy`] (`only`, `except`,
//! `redirect_to`); the engine decides, asynchronously, whether the current
//! actor may proceed — and if not, where to send them.
//!
//! ## Features
//!
//! - **Deny-first protocol**: an explicit `except` match always overrides
//!   an `only` match
//! - **Ordered groups**: groups evaluate strictly in sequence; names within
//!   a group race concurrently, first success winning
//! - **Polymorphic redirects**: a literal state, a target object, an async
//!   resolver, or a per-privilege dictionary — all normalized to one shape
//! - **Composable hierarchies**: merge a nested scope chain into one
//!   effective rule set before a single `authorize` call
//! - **Async-first design** on the Tokio runtime; validation sources are
//!   plain async traits
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waygate_authz::{AuthzEngine, InMemoryDefinitions, Policy, RuleSet, TransitionContext};
//!
//! #[tokio::main]
//! async fn main() -> waygate_authz::Result<()> {
//!     let store = Arc::new(InMemoryDefinitions::new());
//!     store
//!         .define_role("admin", |name, _ctx| async move { Ok(name) })
//!         .await;
//!
//!     let engine = AuthzEngine::new(store.clone(), store.clone());
//!
//!     let policy = Policy::new().with_only("admin").with_redirect("login");
//!     let ctx = TransitionContext::new("dashboard", "home");
//!     let rules = RuleSet::build(&policy, &ctx)?;
//!
//!     match engine.authorize(&rules, &ctx).await {
//!         Ok(()) => println!("transition allowed"),
//!         Err(denial) => {
//!             let target = rules.resolve_redirect(&denial.privilege, &ctx).await?;
//!             println!("redirecting to {}", target.state);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod policy;
pub mod rules;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use engine::AuthzEngine;
pub use error::{AuthzError, Result};
pub use policy::{Policy, PrivilegeFn, PrivilegeSpec, RedirectFn, RedirectSpec};
pub use rules::{ComposeOrder, PrivilegeGroup, RuleSet, DEFAULT_REDIRECT_KEY};
pub use store::{InMemoryDefinitions, PermissionStore, RoleStore};
pub use types::{
    Denial, DenialReason, PrivilegeName, RedirectTarget, RedirectValue, TransitionContext,
    ValidationOutcome, ValidationRejection,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
