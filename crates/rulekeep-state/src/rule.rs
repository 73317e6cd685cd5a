//! # Rules and the Ruleset
//!
//! A [`RuleState`] is one version of one rule. A [`RulesetState`] is the set
//! of rules in force, keyed by rule number, built on the shared
//! [`KeyedCollection`] so its key invariants are the same as every other
//! keyed collection in the model.
//!
//! Changing a rule means building a new `RuleState` and, from it, a new
//! `RulesetState`. Neither type has a mutating method.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use rulekeep_core::{
    CollectionError, HistoricalEntry, Keyed, KeyedCollection, RuleNumber, ValidationError,
};

use crate::annotation::RuleAnnotations;

// ─── Power ───────────────────────────────────────────────────────────

/// The power of a rule: an arbitrary-precision decimal.
///
/// Equality, ordering and hashing are by numeric value, so `1` and `1.0`
/// are the same power. Display keeps the scale the value was written with.
///
/// Deserializes from an integer or a decimal string. Non-integer numeric
/// scalars are rejected, since a float cannot carry the written value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Power(BigDecimal);

impl Power {
    /// Wrap an existing decimal.
    pub fn new(value: BigDecimal) -> Self {
        Self(value)
    }

    /// Access the underlying decimal.
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }
}

impl From<u32> for Power {
    fn from(value: u32) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl FromStr for Power {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| ValidationError::InvalidPower(s.to_string()))
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Power {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Power {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PowerVisitor;

        impl<'de> serde::de::Visitor<'de> for PowerVisitor {
            type Value = Power;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a quoted decimal power")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Power, E> {
                Ok(Power(BigDecimal::from(v)))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Power, E> {
                Ok(Power(BigDecimal::from(v)))
            }

            // A float scalar has already lost the written digits and scale.
            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Power, E> {
                Err(E::custom(format_args!(
                    "power {v} must be quoted (e.g. \"{v}\") to keep its exact decimal value"
                )))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Power, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PowerVisitor)
    }
}

// ─── Rule ────────────────────────────────────────────────────────────

/// The ordered change history of a rule. Entries are carried as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleHistory(Vec<HistoricalEntry>);

impl RuleHistory {
    /// Wrap an ordered list of history entries.
    pub fn new(entries: Vec<HistoricalEntry>) -> Self {
        Self(entries)
    }

    /// The entries, in order.
    pub fn entries(&self) -> &[HistoricalEntry] {
        &self.0
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoricalEntry> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<HistoricalEntry>> for RuleHistory {
    fn from(entries: Vec<HistoricalEntry>) -> Self {
        Self(entries)
    }
}

/// One version of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleState {
    /// The rule number. Must equal the key the rule is stored under.
    pub id: RuleNumber,
    /// The rule title.
    pub title: String,
    /// The rule's power.
    pub power: Power,
    /// The rule text.
    pub text: String,
    /// The rule's change history.
    #[serde(default)]
    pub history: RuleHistory,
    /// Judgement annotations, if the rule has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<RuleAnnotations>,
}

impl Keyed for RuleState {
    type Key = RuleNumber;
    const COLLECTION: &'static str = "ruleset";

    fn key(&self) -> &RuleNumber {
        &self.id
    }
}

// ─── Ruleset ─────────────────────────────────────────────────────────

/// The rules in force, indexed by rule number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RulesetState {
    rules: KeyedCollection<RuleState>,
}

impl RulesetState {
    /// Build a ruleset from rule records.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateKey`] if two rules share a number.
    pub fn from_rules<I>(rules: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = RuleState>,
    {
        KeyedCollection::from_entities(rules).map(|rules| Self { rules })
    }

    /// Build a ruleset from a number-to-rule map.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::KeyMismatch`] if a rule is filed under a
    /// number other than its own.
    pub fn from_map(rules: BTreeMap<RuleNumber, RuleState>) -> Result<Self, CollectionError> {
        KeyedCollection::from_map(rules).map(|rules| Self { rules })
    }

    /// The rule with number `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingKey`] if there is no such rule.
    pub fn rule_by_number(&self, id: &RuleNumber) -> Result<&RuleState, CollectionError> {
        self.rules.get(id)
    }

    /// A new ruleset holding exactly the rules numbered in `ids`.
    ///
    /// # Errors
    ///
    /// Fails if any number is absent, or if `ids` repeats a number.
    pub fn rules_by_numbers<'a, I>(&self, ids: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = &'a RuleNumber>,
    {
        self.rules.select(ids).map(|rules| Self { rules })
    }

    /// Restrict to the rules satisfying `predicate`.
    pub(crate) fn restrict<F>(&self, predicate: F) -> Self
    where
        F: FnMut(&RuleState) -> bool,
    {
        Self {
            rules: self.rules.filter(predicate),
        }
    }

    /// The set of rule numbers.
    pub fn rule_numbers(&self) -> BTreeSet<RuleNumber> {
        self.rules.keys()
    }

    /// Whether rule `id` is in the ruleset.
    pub fn contains(&self, id: &RuleNumber) -> bool {
        self.rules.contains_key(id)
    }

    /// Iterate over the rules in rule-number order.
    pub fn iter(&self) -> std::collections::btree_map::Values<'_, RuleNumber, RuleState> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the ruleset is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The highest rule number, or `None` for an empty ruleset.
    pub fn highest_rule_number(&self) -> Option<&RuleNumber> {
        self.rules.last_key()
    }

    /// How many rules have each power, ascending by power.
    pub fn power_distribution(&self) -> BTreeMap<Power, usize> {
        let mut counts = BTreeMap::new();
        for rule in self.iter() {
            *counts.entry(rule.power.clone()).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a RulesetState {
    type Item = &'a RuleState;
    type IntoIter = std::collections::btree_map::Values<'a, RuleNumber, RuleState>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulekeep_core::{ErrorKind, HistoricalDate};

    fn rule(id: u64, title: &str, power: &str) -> RuleState {
        RuleState {
            id: RuleNumber::from(id),
            title: title.to_string(),
            power: power.parse().unwrap(),
            text: format!("Text of {title}."),
            history: RuleHistory::default(),
            annotations: None,
        }
    }

    fn n(id: u64) -> RuleNumber {
        RuleNumber::from(id)
    }

    #[test]
    fn power_compares_by_value_and_keeps_scale() {
        let one: Power = "1".parse().unwrap();
        let one_point_zero: Power = "1.0".parse().unwrap();
        assert_eq!(one, one_point_zero);
        assert_eq!(one_point_zero.to_string(), "1.0");
        assert!("0.5".parse::<Power>().unwrap() < one);
        assert!("three".parse::<Power>().is_err());
    }

    #[test]
    fn power_deserializes_from_integers_and_strings() {
        let from_int: Power = serde_json::from_str("3").unwrap();
        let from_str: Power = serde_json::from_str("\"2.50\"").unwrap();
        assert_eq!(from_int, Power::from(3u32));
        assert_eq!(from_str.to_string(), "2.50");
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"2.50\"");

        let precise: Power = serde_json::from_str("\"1.00000000000000000001\"").unwrap();
        assert_eq!(precise.to_string(), "1.00000000000000000001");
        assert!(precise > Power::from(1u32));
    }

    #[test]
    fn unquoted_decimal_power_is_rejected() {
        for text in ["3.0", "2.50", "1.00000000000000000001"] {
            let err = serde_json::from_str::<Power>(text).unwrap_err();
            assert!(err.to_string().contains("must be quoted"), "{text}: {err}");
        }
    }

    #[test]
    fn ruleset_lookup_by_number() {
        let ruleset =
            RulesetState::from_rules(vec![rule(101, "Rule A", "3"), rule(102, "Rule B", "1")])
                .unwrap();
        assert_eq!(ruleset.rule_by_number(&n(101)).unwrap().title, "Rule A");
        assert_eq!(ruleset.rule_numbers(), BTreeSet::from([n(101), n(102)]));

        let err = ruleset.rule_by_number(&n(103)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKey);
    }

    #[test]
    fn ruleset_rejects_duplicate_numbers() {
        let err =
            RulesetState::from_rules(vec![rule(101, "Rule A", "3"), rule(101, "Other", "2")])
                .unwrap_err();
        assert_eq!(
            err,
            CollectionError::DuplicateKey {
                collection: "ruleset",
                key: "101".to_string(),
            }
        );
    }

    #[test]
    fn ruleset_from_map_checks_identity() {
        let good = BTreeMap::from([(n(101), rule(101, "Rule A", "3"))]);
        assert!(RulesetState::from_map(good).is_ok());

        let bad = BTreeMap::from([(n(105), rule(101, "Rule A", "3"))]);
        assert!(matches!(
            RulesetState::from_map(bad),
            Err(CollectionError::KeyMismatch { .. })
        ));
    }

    #[test]
    fn rules_by_numbers_builds_new_ruleset() {
        let ruleset = RulesetState::from_rules(vec![
            rule(101, "Rule A", "3"),
            rule(102, "Rule B", "1"),
            rule(103, "Rule C", "2"),
        ])
        .unwrap();
        let subset = ruleset.rules_by_numbers(&[n(103), n(101)]).unwrap();
        assert_eq!(subset.rule_numbers(), BTreeSet::from([n(101), n(103)]));
        assert_eq!(ruleset.len(), 3);

        assert!(ruleset.rules_by_numbers(&[n(999)]).is_err());
    }

    #[test]
    fn highest_number_is_numeric_not_lexical() {
        let ruleset =
            RulesetState::from_rules(vec![rule(99, "Low", "1"), rule(1000, "High", "1")]).unwrap();
        assert_eq!(ruleset.highest_rule_number(), Some(&n(1000)));
        assert_eq!(RulesetState::default().highest_rule_number(), None);
    }

    #[test]
    fn power_distribution_counts_equal_values_together() {
        let ruleset = RulesetState::from_rules(vec![
            rule(101, "A", "3"),
            rule(102, "B", "1"),
            rule(103, "C", "1.0"),
            rule(104, "D", "2"),
        ])
        .unwrap();
        let distribution: Vec<(String, usize)> = ruleset
            .power_distribution()
            .into_iter()
            .map(|(power, count)| (power.to_string(), count))
            .collect();
        assert_eq!(distribution.len(), 3);
        assert_eq!(distribution[0].1, 2);
        assert_eq!(distribution[1], ("2".to_string(), 1));
        assert_eq!(distribution[2], ("3".to_string(), 1));
    }

    #[test]
    fn rule_state_serde_defaults_history_and_annotations() {
        let json = r#"{"id":101,"title":"Rule A","power":"3","text":"Be nice."}"#;
        let parsed: RuleState = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, n(101));
        assert!(parsed.history.is_empty());
        assert_eq!(parsed.annotations, None);
    }

    #[test]
    fn ruleset_deserialize_rejects_duplicates() {
        let mut history_rule = rule(101, "Rule A", "3");
        history_rule.history = RuleHistory::new(vec![HistoricalEntry::new(
            HistoricalDate::from_ymd(1993, 6, 30).unwrap(),
            "Initial Mutable Rule",
        )]);
        let ruleset = RulesetState::from_rules(vec![history_rule.clone()]).unwrap();
        let json = serde_json::to_string(&ruleset).unwrap();
        let back: RulesetState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ruleset);

        let doubled = serde_json::to_string(&vec![history_rule.clone(), history_rule]).unwrap();
        assert!(serde_json::from_str::<RulesetState>(&doubled).is_err());
    }
}
