//! # Property List
//!
//! One row per rule: number, file digest, power and title. Rendered as
//! tab-separated lines ordered by rule number:
//!
//! ```text
//! 101	2cf24dba…	3	Obligations of Players
//! ```
//!
//! Titles are written with `\\`, `\n` and `\r` escaped so that every row
//! stays on one line; [`PropertyList::parse`] reverses the escaping.
//!
//! A property list written by an earlier run can be parsed back and compared
//! with a fresh one to find the rules whose files changed in between.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rulekeep_core::RuleNumber;
use rulekeep_state::{Power, RulesetState};

use crate::error::{PackError, PackResult};

/// The recorded properties of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    pub digest: String,
    pub power: Power,
    pub title: String,
}

/// Per-rule properties, keyed by rule number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyList {
    rows: BTreeMap<RuleNumber, PropertyRow>,
}

impl PropertyList {
    /// Build from a ruleset and the digests of its rule files. Rules with no
    /// digest get an empty one.
    pub fn from_ruleset(ruleset: &RulesetState, digests: &BTreeMap<RuleNumber, String>) -> Self {
        let rows = ruleset
            .iter()
            .map(|rule| {
                let row = PropertyRow {
                    digest: digests.get(&rule.id).cloned().unwrap_or_default(),
                    power: rule.power.clone(),
                    title: rule.title.clone(),
                };
                (rule.id.clone(), row)
            })
            .collect();
        Self { rows }
    }

    /// Parse the tab-separated form. Blank lines are ignored.
    pub fn parse(text: &str) -> PackResult<Self> {
        let mut rows = BTreeMap::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let fields: Vec<&str> = line.splitn(4, '\t').collect();
            let [number, digest, power, title] = fields[..] else {
                return Err(PackError::InvalidPropertyList {
                    line: line_no,
                    detail: format!("expected 4 tab-separated fields, got {}", fields.len()),
                });
            };
            let number: RuleNumber = number.parse()?;
            let title = unescape_title(title).map_err(|detail| PackError::InvalidPropertyList {
                line: line_no,
                detail,
            })?;
            let row = PropertyRow {
                digest: digest.to_string(),
                power: power.parse()?,
                title,
            };
            if rows.insert(number.clone(), row).is_some() {
                return Err(PackError::InvalidPropertyList {
                    line: line_no,
                    detail: format!("rule {number} listed twice"),
                });
            }
        }
        Ok(Self { rows })
    }

    /// The row for `rule`, if present.
    pub fn get(&self, rule: &RuleNumber) -> Option<&PropertyRow> {
        self.rows.get(rule)
    }

    /// Iterate over rows in rule-number order.
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, RuleNumber, PropertyRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rules in `self` whose digest differs from `previous`, or that
    /// `previous` does not list.
    pub fn changed_since(&self, previous: &PropertyList) -> BTreeSet<RuleNumber> {
        self.rows
            .iter()
            .filter(|(number, row)| {
                !previous
                    .get(number)
                    .is_some_and(|old| old.digest == row.digest)
            })
            .map(|(number, _)| number.clone())
            .collect()
    }
}

impl fmt::Display for PropertyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (number, row) in &self.rows {
            writeln!(
                f,
                "{number}\t{}\t{}\t{}",
                row.digest,
                row.power,
                escape_title(&row.title)
            )?;
        }
        Ok(())
    }
}

fn escape_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_title(escaped: &str) -> Result<String, String> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => return Err(format!("unknown escape \\{other} in title")),
            None => return Err("title ends with a lone backslash".to_string()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulekeep_state::{RuleHistory, RuleState};

    fn rule(id: u64, power: u32, title: &str) -> RuleState {
        RuleState {
            id: RuleNumber::from(id),
            title: title.to_string(),
            power: Power::from(power),
            text: String::new(),
            history: RuleHistory::default(),
            annotations: None,
        }
    }

    fn sample() -> PropertyList {
        let ruleset =
            RulesetState::from_rules(vec![rule(102, 1, "Rule B"), rule(101, 3, "Rule A")]).unwrap();
        let digests = BTreeMap::from([
            (RuleNumber::from(101u64), "aaaa".to_string()),
            (RuleNumber::from(102u64), "bbbb".to_string()),
        ]);
        PropertyList::from_ruleset(&ruleset, &digests)
    }

    #[test]
    fn renders_tab_separated_in_number_order() {
        assert_eq!(
            sample().to_string(),
            "101\taaaa\t3\tRule A\n102\tbbbb\t1\tRule B\n"
        );
    }

    #[test]
    fn parses_rendered_form() {
        let list = sample();
        assert_eq!(PropertyList::parse(&list.to_string()).unwrap(), list);
    }

    #[test]
    fn title_may_contain_tabs() {
        let list = PropertyList::parse("7\tcccc\t2\tA\ttabbed title\n").unwrap();
        assert_eq!(
            list.get(&RuleNumber::from(7u64)).unwrap().title,
            "A\ttabbed title"
        );
    }

    #[test]
    fn titles_with_line_breaks_round_trip() {
        let ruleset = RulesetState::from_rules(vec![
            rule(101, 3, "Rule\nA"),
            rule(102, 1, "C:\\rules\r\nend"),
        ])
        .unwrap();
        let list = PropertyList::from_ruleset(&ruleset, &BTreeMap::new());
        let rendered = list.to_string();
        assert_eq!(
            rendered,
            "101\t\t3\tRule\\nA\n102\t\t1\tC:\\\\rules\\r\\nend\n"
        );
        assert_eq!(rendered.lines().count(), 2);
        assert_eq!(PropertyList::parse(&rendered).unwrap(), list);
    }

    #[test]
    fn rejects_bad_title_escapes() {
        let err = PropertyList::parse("101\ta\t1\tRule \\x\n").unwrap_err();
        assert!(matches!(err, PackError::InvalidPropertyList { line: 1, .. }));
        let err = PropertyList::parse("101\ta\t1\tRule \\\n").unwrap_err();
        assert!(matches!(err, PackError::InvalidPropertyList { line: 1, .. }));
    }

    #[test]
    fn rejects_short_lines_and_repeats() {
        let err = PropertyList::parse("101\taaaa\n").unwrap_err();
        assert!(matches!(err, PackError::InvalidPropertyList { line: 1, .. }));

        let err = PropertyList::parse("101\ta\t1\tA\n\n101\tb\t1\tA\n").unwrap_err();
        assert!(matches!(err, PackError::InvalidPropertyList { line: 3, .. }));

        let err = PropertyList::parse("x\ta\t1\tA\n").unwrap_err();
        assert!(matches!(err, PackError::Validation(_)));
    }

    #[test]
    fn changed_since_compares_digests() {
        let current = sample();
        let previous = PropertyList::parse("101\taaaa\t3\tRule A\n102\told!\t1\tRule B\n").unwrap();
        assert_eq!(
            current.changed_since(&previous),
            BTreeSet::from([RuleNumber::from(102u64)])
        );
        assert_eq!(current.changed_since(&PropertyList::default()).len(), 2);
        assert!(current.changed_since(&current).is_empty());
    }
}
