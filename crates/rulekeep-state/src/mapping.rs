//! # Rule-to-Category Mapping
//!
//! Assigns rule numbers to categories. A rule number is either absent
//! (uncategorized) or mapped to exactly one category, and every category it
//! maps to must exist in the mapping's [`CategorySpecificationSet`]. The
//! check runs in the constructor, so an invalid mapping cannot exist.
//!
//! The mapping does not know which rules exist; pairing it with a ruleset is
//! the job of [`CategorizedRulesetState`](crate::CategorizedRulesetState).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rulekeep_core::{CategoryId, CollectionError, Keyed, RuleNumber};

use crate::category::{CategorySpecification, CategorySpecificationSet};

const COLLECTION: &str = "rule category mapping";

/// Validated association from rule number to category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MappingRepr", try_from = "MappingRepr")]
pub struct RuleCategoryMapping {
    categories: CategorySpecificationSet,
    assignments: Arc<BTreeMap<RuleNumber, CategoryId>>,
}

impl RuleCategoryMapping {
    /// Build a mapping over `categories`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DanglingReference`] if any mapped category
    /// id is not in `categories`. Unknown ids are never dropped silently.
    pub fn new(
        categories: CategorySpecificationSet,
        assignments: BTreeMap<RuleNumber, CategoryId>,
    ) -> Result<Self, CollectionError> {
        if let Some(unknown) = assignments.values().find(|id| !categories.contains(id)) {
            return Err(CollectionError::DanglingReference {
                collection: CategorySpecification::COLLECTION,
                key: unknown.to_string(),
                referenced_by: COLLECTION,
            });
        }
        Ok(Self {
            categories,
            assignments: Arc::new(assignments),
        })
    }

    /// Build a mapping from `(rule, category)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateKey`] if a rule number is assigned
    /// more than once, even to the same category, and otherwise fails as
    /// [`RuleCategoryMapping::new`] does.
    pub fn from_assignments<I>(
        categories: CategorySpecificationSet,
        assignments: I,
    ) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = (RuleNumber, CategoryId)>,
    {
        let mut map = BTreeMap::new();
        for (rule, category) in assignments {
            if map.contains_key(&rule) {
                return Err(CollectionError::DuplicateKey {
                    collection: COLLECTION,
                    key: rule.to_string(),
                });
            }
            map.insert(rule, category);
        }
        Self::new(categories, map)
    }

    /// The category catalogue this mapping is checked against.
    pub fn categories(&self) -> &CategorySpecificationSet {
        &self.categories
    }

    /// The set of rule numbers that have a category.
    pub fn categorized_rule_numbers(&self) -> BTreeSet<RuleNumber> {
        self.assignments.keys().cloned().collect()
    }

    /// Whether `rule` has a category.
    pub fn is_categorized(&self, rule: &RuleNumber) -> bool {
        self.assignments.contains_key(rule)
    }

    /// The category id of `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if `rule` is uncategorized.
    pub fn category_id_of(&self, rule: &RuleNumber) -> Result<&CategoryId, CollectionError> {
        self.assignments
            .get(rule)
            .ok_or_else(|| CollectionError::MissingKey {
                collection: COLLECTION,
                key: rule.to_string(),
            })
    }

    /// The category of `rule`.
    ///
    /// # Errors
    ///
    /// Fails as [`category_id_of`](Self::category_id_of) does. The category
    /// lookup itself cannot fail for a mapping built by this type.
    pub fn category_of(
        &self,
        rule: &RuleNumber,
    ) -> Result<&CategorySpecification, CollectionError> {
        let id = self.category_id_of(rule)?;
        self.categories.category_by_id(id)
    }

    /// The rule numbers mapped to `category`. Empty if there are none,
    /// including when `category` is not in the catalogue.
    pub fn rule_numbers_in(&self, category: &CategoryId) -> BTreeSet<RuleNumber> {
        self.assignments
            .iter()
            .filter(|(_, id)| *id == category)
            .map(|(rule, _)| rule.clone())
            .collect()
    }

    /// Iterate over `(rule, category)` pairs in rule-number order.
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, RuleNumber, CategoryId> {
        self.assignments.iter()
    }

    /// Number of categorized rules.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no rule is categorized.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Serialized form; deserialization re-runs the constructor checks.
#[derive(Serialize, Deserialize)]
struct MappingRepr {
    categories: CategorySpecificationSet,
    assignments: BTreeMap<RuleNumber, CategoryId>,
}

impl From<RuleCategoryMapping> for MappingRepr {
    fn from(mapping: RuleCategoryMapping) -> Self {
        Self {
            categories: mapping.categories,
            assignments: Arc::try_unwrap(mapping.assignments)
                .unwrap_or_else(|shared| (*shared).clone()),
        }
    }
}

impl TryFrom<MappingRepr> for RuleCategoryMapping {
    type Error = CollectionError;

    fn try_from(repr: MappingRepr) -> Result<Self, Self::Error> {
        Self::new(repr.categories, repr.assignments)
    }
}
