//! Authorization engine: deny-first evaluation of normalized rule sets

mod race;

use crate::rules::{PrivilegeGroup, RuleSet};
use crate::store::{PermissionStore, RoleStore};
use crate::types::{Denial, DenialReason, PrivilegeName, TransitionContext};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-name failure; feeds the group's last-failure accounting
#[derive(Debug, Clone)]
struct NameFailure {
    name: PrivilegeName,
    reason: DenialReason,
}

/// Outcome of evaluating an ordered sequence of privilege groups
enum GroupsOutcome {
    /// Some group succeeded with this validated privilege
    Matched(PrivilegeName),
    /// Every group failed; the last group's last settled failure
    Failed(NameFailure),
    /// No groups were present
    Empty,
}

/// Transition-authorization engine.
///
/// Consumes a [`RuleSet`] and the two definition stores, runs the
/// deny-then-allow evaluation protocol, and produces an accept signal or
/// the rejected privilege name. The engine holds no per-call state: one
/// instance serves any number of concurrent `authorize` calls.
pub struct AuthzEngine {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl AuthzEngine {
    /// Create an engine over the given definition stores
    pub fn new(roles: Arc<dyn RoleStore>, permissions: Arc<dyn PermissionStore>) -> Self {
        Self { roles, permissions }
    }

    /// Authorize a transition against a rule set.
    ///
    /// Deny phase first: a deny group matching rejects immediately with the
    /// matched privilege, whatever `allow` holds. Then the allow phase: an
    /// empty allow sequence accepts; otherwise some privilege must
    /// validate, and a total failure rejects with the name of the final
    /// settled failure.
    pub async fn authorize(
        &self,
        rules: &RuleSet,
        ctx: &TransitionContext,
    ) -> Result<(), Denial> {
        debug!(to = %ctx.to, from = %ctx.from, "authorizing transition");

        match self.evaluate(&rules.deny, ctx).await {
            GroupsOutcome::Matched(privilege) => {
                debug!(privilege = %privilege, "transition denied by except rule");
                return Err(Denial::new(privilege, DenialReason::Forbidden));
            }
            GroupsOutcome::Failed(_) | GroupsOutcome::Empty => {}
        }

        match self.evaluate(&rules.allow, ctx).await {
            GroupsOutcome::Empty => {
                debug!("no allow constraint, transition allowed");
                Ok(())
            }
            GroupsOutcome::Matched(privilege) => {
                debug!(privilege = %privilege, "transition allowed");
                Ok(())
            }
            GroupsOutcome::Failed(failure) => {
                debug!(privilege = %failure.name, reason = ?failure.reason, "transition denied");
                Err(Denial::new(failure.name, failure.reason))
            }
        }
    }

    /// Evaluate groups strictly in order: each group starts only after the
    /// previous one has fully settled. Within a group all names race
    /// concurrently, first success winning the group.
    async fn evaluate(&self, groups: &[PrivilegeGroup], ctx: &TransitionContext) -> GroupsOutcome {
        let mut outcome = GroupsOutcome::Empty;

        for group in groups {
            let checks = group.iter().map(|name| self.check_name(name, ctx));
            match race::first_success(checks).await {
                Some(Ok(validated)) => return GroupsOutcome::Matched(validated),
                Some(Err(failure)) => outcome = GroupsOutcome::Failed(failure),
                // normalized rule sets never contain empty groups
                None => {}
            }
        }

        outcome
    }

    /// Check one privilege name. Role definitions take precedence on a
    /// name collision; a name registered in neither store fails as
    /// unregistered rather than erroring.
    async fn check_name(
        &self,
        name: &str,
        ctx: &TransitionContext,
    ) -> Result<PrivilegeName, NameFailure> {
        if self.roles.contains(name).await {
            return self.roles.validate(name, ctx).await.map_err(|rejection| {
                debug!(privilege = %name, rejection = ?rejection, "role validation rejected");
                NameFailure {
                    name: name.to_owned(),
                    reason: DenialReason::Rejected,
                }
            });
        }

        if self.permissions.contains(name).await {
            return self.permissions.validate(name, ctx).await.map_err(|rejection| {
                debug!(privilege = %name, rejection = ?rejection, "permission validation rejected");
                NameFailure {
                    name: name.to_owned(),
                    reason: DenialReason::Rejected,
                }
            });
        }

        warn!(privilege = %name, "privilege is registered in neither the role nor the permission store");
        Err(NameFailure {
            name: name.to_owned(),
            reason: DenialReason::Unregistered,
        })
    }
}
