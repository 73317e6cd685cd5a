//! # Rule Annotations
//!
//! Annotations record judgements that bear on a rule. The only variant
//! today is a historical CFJ annotation: one or more case citations and the
//! finding they support.
//!
//! Annotations are structurally typed only. In particular a CFJ range is
//! not required to have `first <= last`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rulekeep_core::{CfjNumber, HistoricalDate, ValidationError};

/// A cited CFJ: either one case or an inclusive run of consecutive cases.
///
/// Written as `1234` or `1234-1240`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CfjAnnotationNumber {
    /// A single case.
    Single(CfjNumber),
    /// An inclusive range of cases.
    Range {
        /// First case in the range.
        first: CfjNumber,
        /// Last case in the range.
        last: CfjNumber,
    },
}

impl CfjAnnotationNumber {
    /// The first (or only) case cited.
    pub fn first(&self) -> &CfjNumber {
        match self {
            Self::Single(number) => number,
            Self::Range { first, .. } => first,
        }
    }

    /// The last (or only) case cited.
    pub fn last(&self) -> &CfjNumber {
        match self {
            Self::Single(number) => number,
            Self::Range { last, .. } => last,
        }
    }

    /// Whether `number` is cited. An inverted range cites nothing.
    pub fn contains(&self, number: &CfjNumber) -> bool {
        self.first() <= number && number <= self.last()
    }
}

impl fmt::Display for CfjAnnotationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(number) => write!(f, "{number}"),
            Self::Range { first, last } => write!(f, "{first}-{last}"),
        }
    }
}

impl FromStr for CfjAnnotationNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Skip a leading sign so "-3" stays a single number.
        let separator = trimmed
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i);
        match separator {
            Some(i) => Ok(Self::Range {
                first: trimmed[..i].parse()?,
                last: trimmed[i + 1..].parse()?,
            }),
            None => Ok(Self::Single(trimmed.parse()?)),
        }
    }
}

impl Serialize for CfjAnnotationNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CfjAnnotationNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct NumberVisitor;

        impl<'de> serde::de::Visitor<'de> for NumberVisitor {
            type Value = CfjAnnotationNumber;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a CFJ number or a range written N-M")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CfjAnnotationNumber::Single(CfjNumber::new(v.into())))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CfjAnnotationNumber::Single(CfjNumber::from(v)))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// One citation block: the case(s) and, if known, when they were called.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CfjAnnotationCaseBlock {
    /// The case or range of cases.
    pub number: CfjAnnotationNumber,
    /// The date the case was called.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub called_date: Option<HistoricalDate>,
}

/// A finding from one or more past CFJs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoricalCfjAnnotation {
    /// The cited cases, in citation order.
    pub blocks: Vec<CfjAnnotationCaseBlock>,
    /// The finding text.
    pub finding: String,
}

/// An annotation on a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleAnnotation {
    /// A finding from past CFJs.
    HistoricalCfj(HistoricalCfjAnnotation),
}

/// The ordered annotations of one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleAnnotations(Vec<RuleAnnotation>);

impl RuleAnnotations {
    /// Wrap an ordered list of annotations.
    pub fn new(annotations: Vec<RuleAnnotation>) -> Self {
        Self(annotations)
    }

    /// The annotations, in order.
    pub fn as_slice(&self) -> &[RuleAnnotation] {
        &self.0
    }

    /// Iterate over the annotations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleAnnotation> {
        self.0.iter()
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<RuleAnnotation>> for RuleAnnotations {
    fn from(annotations: Vec<RuleAnnotation>) -> Self {
        Self(annotations)
    }
}

impl<'a> IntoIterator for &'a RuleAnnotations {
    type Item = &'a RuleAnnotation;
    type IntoIter = std::slice::Iter<'a, RuleAnnotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
