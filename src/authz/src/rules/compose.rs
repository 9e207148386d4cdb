//! Composite rule sets for nested scope chains
//!
//! A state hierarchy contributes one rule set per level; these merge into a
//! single effective rule set before one `authorize` call. Merging is plain
//! composition over two values, not a subtype relationship.

use super::RuleSet;
use std::collections::HashMap;

/// Relative order of ancestor and descendant groups in a composed rule set.
///
/// The order decides which privilege's failure is ultimately reported when
/// every group fails: the last group evaluated names the denial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposeOrder {
    /// Ancestor groups evaluate before the descendant's
    #[default]
    ParentFirst,
    /// Descendant groups evaluate before the ancestor's
    ChildFirst,
}

impl RuleSet {
    /// Merge a parent scope's rules with a child's into one effective rule
    /// set: allow and deny group sequences are concatenated preserving
    /// relative order, redirect dictionaries are shallow-merged.
    ///
    /// The child's redirect entries win on key collision in both orders —
    /// the more specific scope decides where a rejected actor goes.
    pub fn extend(parent: &RuleSet, child: &RuleSet, order: ComposeOrder) -> RuleSet {
        let (first, second) = match order {
            ComposeOrder::ParentFirst => (parent, child),
            ComposeOrder::ChildFirst => (child, parent),
        };

        let mut allow = first.allow.clone();
        allow.extend(second.allow.iter().cloned());

        let mut deny = first.deny.clone();
        deny.extend(second.deny.iter().cloned());

        let mut redirect: HashMap<_, _> = parent.redirect.clone();
        redirect.extend(
            child
                .redirect
                .iter()
                .map(|(key, resolver)| (key.clone(), resolver.clone())),
        );

        RuleSet { allow, deny, redirect }
    }

    /// Fold a root-to-leaf chain of rule sets into one
    pub fn compose<'a, I>(chain: I, order: ComposeOrder) -> RuleSet
    where
        I: IntoIterator<Item = &'a RuleSet>,
    {
        let mut levels = chain.into_iter();
        let Some(root) = levels.next() else {
            return RuleSet::empty();
        };
        levels.fold(root.clone(), |effective, level| {
            RuleSet::extend(&effective, level, order)
        })
    }
}
