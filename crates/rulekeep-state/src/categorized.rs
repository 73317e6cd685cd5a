//! # Categorized Ruleset
//!
//! Pairs a [`RulesetState`] with a [`RuleCategoryMapping`]. The constructor
//! checks that every rule number the mapping mentions exists in the ruleset,
//! mirroring the mapping's own check against its categories.
//!
//! ## Derived Views
//!
//! - [`categorized_rules`](CategorizedRulesetState::categorized_rules): the
//!   ruleset restricted to categorized rules. Computed on first access and
//!   kept for the life of the value; the inputs never change, so the cached
//!   view never goes stale.
//! - [`rules_in`](CategorizedRulesetState::rules_in): the ruleset restricted
//!   to one category. Computed on each call.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use rulekeep_core::{CategoryId, CollectionError, Keyed, RuleNumber};

use crate::category::{CategorySpecification, CategorySpecificationSet};
use crate::mapping::RuleCategoryMapping;
use crate::rule::{RuleState, RulesetState};

/// A ruleset together with a category mapping over its rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "CategorizedRepr", try_from = "CategorizedRepr")]
pub struct CategorizedRulesetState {
    ruleset: RulesetState,
    mapping: RuleCategoryMapping,
    categorized_rules: OnceLock<RulesetState>,
}

impl CategorizedRulesetState {
    /// Pair `ruleset` with `mapping`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DanglingReference`] if the mapping assigns a
    /// category to a rule number that is not in `ruleset`.
    pub fn new(
        ruleset: RulesetState,
        mapping: RuleCategoryMapping,
    ) -> Result<Self, CollectionError> {
        if let Some((missing, _)) = mapping.iter().find(|(rule, _)| !ruleset.contains(rule)) {
            return Err(CollectionError::DanglingReference {
                collection: RuleState::COLLECTION,
                key: missing.to_string(),
                referenced_by: "categorized ruleset",
            });
        }
        Ok(Self {
            ruleset,
            mapping,
            categorized_rules: OnceLock::new(),
        })
    }

    /// The full ruleset, categorized or not.
    pub fn ruleset(&self) -> &RulesetState {
        &self.ruleset
    }

    /// The category mapping.
    pub fn mapping(&self) -> &RuleCategoryMapping {
        &self.mapping
    }

    /// The category catalogue.
    pub fn categories(&self) -> &CategorySpecificationSet {
        self.mapping.categories()
    }

    /// The rule numbers that have a category.
    pub fn categorized_rule_numbers(&self) -> BTreeSet<RuleNumber> {
        self.mapping.categorized_rule_numbers()
    }

    /// The rule numbers in the ruleset that have no category.
    pub fn uncategorized_rule_numbers(&self) -> BTreeSet<RuleNumber> {
        self.ruleset
            .iter()
            .map(|rule| &rule.id)
            .filter(|id| !self.mapping.is_categorized(id))
            .cloned()
            .collect()
    }

    /// The ruleset restricted to categorized rules.
    pub fn categorized_rules(&self) -> &RulesetState {
        self.categorized_rules.get_or_init(|| {
            self.ruleset
                .restrict(|rule| self.mapping.is_categorized(&rule.id))
        })
    }

    /// The category id of `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if `rule` is uncategorized.
    pub fn category_id_of(&self, rule: &RuleNumber) -> Result<&CategoryId, CollectionError> {
        self.mapping.category_id_of(rule)
    }

    /// The category of `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if `rule` is uncategorized.
    pub fn category_of(
        &self,
        rule: &RuleNumber,
    ) -> Result<&CategorySpecification, CollectionError> {
        self.mapping.category_of(rule)
    }

    /// The rule numbers in `category`; empty if there are none.
    pub fn rule_numbers_in(&self, category: &CategoryId) -> BTreeSet<RuleNumber> {
        self.mapping.rule_numbers_in(category)
    }

    /// The ruleset restricted to the rules in `category`.
    pub fn rules_in(&self, category: &CategoryId) -> RulesetState {
        self.ruleset.restrict(|rule| {
            self.mapping
                .category_id_of(&rule.id)
                .is_ok_and(|id| id == category)
        })
    }
}

impl PartialEq for CategorizedRulesetState {
    fn eq(&self, other: &Self) -> bool {
        self.ruleset == other.ruleset && self.mapping == other.mapping
    }
}

impl Eq for CategorizedRulesetState {}

/// Serialized form; the derived views are not written.
#[derive(Serialize, Deserialize)]
struct CategorizedRepr {
    ruleset: RulesetState,
    mapping: RuleCategoryMapping,
}

impl From<CategorizedRulesetState> for CategorizedRepr {
    fn from(state: CategorizedRulesetState) -> Self {
        Self {
            ruleset: state.ruleset,
            mapping: state.mapping,
        }
    }
}

impl TryFrom<CategorizedRepr> for CategorizedRulesetState {
    type Error = CollectionError;

    fn try_from(repr: CategorizedRepr) -> Result<Self, Self::Error> {
        Self::new(repr.ruleset, repr.mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Power, RuleHistory};
    use rulekeep_core::ErrorKind;
    use std::collections::BTreeMap;

    fn n(id: u64) -> RuleNumber {
        RuleNumber::from(id)
    }

    fn cat(id: &str) -> CategoryId {
        CategoryId::from(id)
    }

    fn rule(id: u64, title: &str) -> RuleState {
        RuleState {
            id: n(id),
            title: title.to_string(),
            power: Power::from(1u32),
            text: String::new(),
            history: RuleHistory::default(),
            annotations: None,
        }
    }

    fn ruleset() -> RulesetState {
        RulesetState::from_rules(vec![rule(101, "Rule A"), rule(102, "Rule B")]).unwrap()
    }

    fn power_only() -> CategorySpecificationSet {
        CategorySpecificationSet::from_categories(vec![CategorySpecification::new(
            "power",
            "Power Rules",
            "",
        )])
        .unwrap()
    }

    fn mapping(pairs: &[(u64, &str)]) -> RuleCategoryMapping {
        let assignments: BTreeMap<RuleNumber, CategoryId> =
            pairs.iter().map(|(rule, id)| (n(*rule), cat(id))).collect();
        RuleCategoryMapping::new(power_only(), assignments).unwrap()
    }

    #[test]
    fn power_rules_scenario() {
        let state = CategorizedRulesetState::new(ruleset(), mapping(&[(101, "power")])).unwrap();

        assert_eq!(state.categorized_rule_numbers(), BTreeSet::from([n(101)]));
        assert_eq!(state.rules_in(&cat("power")).rule_numbers(), BTreeSet::from([n(101)]));
        assert_eq!(state.rule_numbers_in(&cat("power")), BTreeSet::from([n(101)]));
        assert_eq!(state.uncategorized_rule_numbers(), BTreeSet::from([n(102)]));
        assert_eq!(state.category_of(&n(101)).unwrap().readable_name, "Power Rules");
    }

    #[test]
    fn mapping_to_absent_rule_fails() {
        let err = CategorizedRulesetState::new(ruleset(), mapping(&[(103, "power")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
        assert_eq!(
            err,
            CollectionError::DanglingReference {
                collection: "ruleset",
                key: "103".to_string(),
                referenced_by: "categorized ruleset",
            }
        );
    }

    #[test]
    fn categorized_rules_is_cached() {
        let state = CategorizedRulesetState::new(ruleset(), mapping(&[(101, "power")])).unwrap();
        let first: *const RulesetState = state.categorized_rules();
        let second: *const RulesetState = state.categorized_rules();
        assert_eq!(first, second);
        assert_eq!(
            state.categorized_rules().rule_numbers(),
            state.categorized_rule_numbers()
        );
    }

    #[test]
    fn uncategorized_lookup_fails() {
        let state = CategorizedRulesetState::new(ruleset(), mapping(&[(101, "power")])).unwrap();
        assert_eq!(
            state.category_id_of(&n(102)).unwrap_err().kind(),
            ErrorKind::MissingKey
        );
    }

    #[test]
    fn rules_in_unused_category_is_empty() {
        let state = CategorizedRulesetState::new(ruleset(), mapping(&[])).unwrap();
        assert!(state.rules_in(&cat("power")).is_empty());
        assert!(state.categorized_rules().is_empty());
        assert_eq!(state.categories().len(), 1);
    }

    #[test]
    fn serde_skips_cache_and_revalidates() {
        let state = CategorizedRulesetState::new(ruleset(), mapping(&[(101, "power")])).unwrap();
        let _ = state.categorized_rules();
        let json = serde_json::to_string(&state).unwrap();
        let back: CategorizedRulesetState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);

        let narrowed = CategorizedRulesetState::new(
            RulesetState::from_rules(vec![rule(102, "Rule B")]).unwrap(),
            mapping(&[]),
        )
        .unwrap();
        let mut value: serde_json::Value = serde_json::to_value(&narrowed).unwrap();
        value["mapping"]["assignments"] = serde_json::json!({"101": "power"});
        assert!(serde_json::from_value::<CategorizedRulesetState>(value).is_err());
    }

    #[test]
    fn shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CategorizedRulesetState>();
        assert_send_sync::<RulesetState>();
    }
}
