//! # Identity Newtypes
//!
//! Identifier types for the ruleset model. Each identifier is a distinct
//! type: a [`CfjNumber`] cannot be passed where a [`RuleNumber`] is expected.
//!
//! ## Numbers
//!
//! Rule and CFJ numbers are arbitrary-precision integers. They order by
//! numeric value (so rule 99 sorts before rule 101) and print as their
//! decimal digits. On the wire they are written as decimal strings and read
//! back from either a string or an integer scalar, which lets hand-written
//! YAML use bare numbers. Most parsers turn an integer past 64 bits into a
//! float, so numbers that large must be quoted; a float is always rejected.
//!
//! ## Categories
//!
//! [`CategoryId`] is an opaque string. It is compared, hashed and printed
//! verbatim; no format is imposed.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Parse a signed decimal integer, rejecting anything `BigInt` would accept
/// beyond plain digits (radix prefixes, digit separators).
fn parse_decimal(kind: &'static str, s: &str) -> Result<BigInt, ValidationError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidNumber {
            kind,
            value: s.to_string(),
        });
    }
    BigInt::from_str(trimmed).map_err(|_| ValidationError::InvalidNumber {
        kind,
        value: s.to_string(),
    })
}

/// Implements the shared surface of the big-integer identifiers: parsing,
/// display, conversions, and string-or-integer serde.
macro_rules! big_integer_id {
    ($ty:ident, $kind:literal) => {
        impl $ty {
            /// Wrap an existing big integer.
            pub fn new(raw: BigInt) -> Self {
                Self(raw)
            }

            /// Access the underlying integer.
            pub fn as_bigint(&self) -> &BigInt {
                &self.0
            }
        }

        impl From<BigInt> for $ty {
            fn from(raw: BigInt) -> Self {
                Self(raw)
            }
        }

        impl From<u64> for $ty {
            fn from(raw: u64) -> Self {
                Self(BigInt::from(raw))
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_decimal($kind, s).map(Self)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl<'de> serde::de::Visitor<'de> for IdVisitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "a {} as an integer or decimal string", $kind)
                    }

                    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<$ty, E> {
                        Ok($ty(BigInt::from(v)))
                    }

                    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<$ty, E> {
                        Ok($ty(BigInt::from(v)))
                    }

                    fn visit_i128<E: serde::de::Error>(self, v: i128) -> Result<$ty, E> {
                        Ok($ty(BigInt::from(v)))
                    }

                    fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<$ty, E> {
                        Ok($ty(BigInt::from(v)))
                    }

                    // Integers past the parser's native range arrive as floats.
                    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<$ty, E> {
                        Err(E::custom(format_args!(
                            "{} {v} is not an exact integer; quote large numbers",
                            $kind
                        )))
                    }

                    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<$ty, E> {
                        v.parse().map_err(E::custom)
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

/// The number of a rule. Rule numbers are never reused, so the number is
/// the rule's identity across every historical version of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleNumber(BigInt);

big_integer_id!(RuleNumber, "rule number");

/// The number of a Call for Judgement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CfjNumber(BigInt);

big_integer_id!(CfjNumber, "CFJ number");

/// Identifier of a rule category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Create a category identifier. Any string is accepted.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
