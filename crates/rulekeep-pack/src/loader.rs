//! # Data Directory Loader
//!
//! Turns a data directory into a validated [`CategorizedRulesetState`].
//!
//! ## Steps
//!
//! 1. Read `config/general` and `config/index`.
//! 2. Build one category per index section.
//! 3. Map every listed rule to its section's category. A rule listed in two
//!    sections is rejected here, before any rule file is read.
//! 4. Load and digest each listed rule file.
//! 5. Pair the ruleset with the mapping.
//!
//! Rule files present in `rules/` but not listed in the index are not
//! loaded; their numbers are reported in [`LoadedRuleset::unindexed`]. Files
//! in `rules/` that are not named by a rule number are reported in
//! [`LoadedRuleset::stray_files`]. Neither fails the load.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rulekeep_core::RuleNumber;
use rulekeep_state::{
    CategorizedRulesetState, CategorySpecificationSet, RuleCategoryMapping, RulesetState,
};

use crate::config::GeneralConfig;
use crate::error::PackResult;
use crate::index::{load_index, IndexSection};
use crate::proplist::PropertyList;
use crate::rule_file::{load_rule, scan_rule_files};

/// Everything read from a data directory.
#[derive(Debug, Clone)]
pub struct LoadedRuleset {
    pub config: GeneralConfig,
    /// Index sections, in index order.
    pub sections: Vec<IndexSection>,
    pub state: CategorizedRulesetState,
    /// Digest of each loaded rule file, by rule number.
    pub digests: BTreeMap<RuleNumber, String>,
    /// Rule files that the index does not list.
    pub unindexed: BTreeSet<RuleNumber>,
    /// Files in `rules/` that are not named by a rule number.
    pub stray_files: BTreeSet<PathBuf>,
}

impl LoadedRuleset {
    /// The property list of the loaded rules.
    pub fn property_list(&self) -> PropertyList {
        PropertyList::from_ruleset(self.state.ruleset(), &self.digests)
    }
}

/// Load the data directory at `data_dir`.
pub fn load_ruleset(data_dir: &Path) -> PackResult<LoadedRuleset> {
    let config = GeneralConfig::load(data_dir)?;
    let sections = load_index(data_dir)?;

    let categories =
        CategorySpecificationSet::from_categories(sections.iter().map(IndexSection::to_category))?;
    let assignments = sections.iter().flat_map(|section| {
        let category = section.category_id();
        section
            .rules
            .iter()
            .map(move |rule| (rule.clone(), category.clone()))
    });
    let mapping = RuleCategoryMapping::from_assignments(categories, assignments)?;

    let mut rules = Vec::with_capacity(mapping.len());
    let mut digests = BTreeMap::new();
    for (number, _) in mapping.iter() {
        let source = load_rule(data_dir, number)?;
        digests.insert(number.clone(), source.digest);
        rules.push(source.state);
    }
    let ruleset = RulesetState::from_rules(rules)?;
    let state = CategorizedRulesetState::new(ruleset, mapping)?;

    let rule_files = scan_rule_files(data_dir)?;
    let unindexed: BTreeSet<RuleNumber> = rule_files
        .numbers
        .into_iter()
        .filter(|number| !digests.contains_key(number))
        .collect();
    if !unindexed.is_empty() {
        tracing::warn!(count = unindexed.len(), "rule files not listed in the index");
    }

    tracing::info!(
        data_dir = %data_dir.display(),
        rules = state.ruleset().len(),
        categories = state.categories().len(),
        "loaded ruleset"
    );

    Ok(LoadedRuleset {
        config,
        sections,
        state,
        digests,
        unindexed,
        stray_files: rule_files.strays,
    })
}
