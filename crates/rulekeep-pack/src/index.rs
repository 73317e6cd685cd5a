//! The section index (`config/index`).
//!
//! The index is an ordered list of sections. Each section names the rules
//! that belong to it, and each section becomes one category of the loaded
//! ruleset.

use std::path::Path;

use serde::{Deserialize, Serialize};

use rulekeep_core::{CategoryId, RuleNumber};
use rulekeep_state::CategorySpecification;

use crate::error::PackResult;
use crate::parser::load_yaml_typed;

/// One section of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSection {
    /// Section heading.
    pub name: String,
    /// Explicit category id. Defaults to the section name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    /// Longer description of the section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The rules in this section, in display order.
    #[serde(default)]
    pub rules: Vec<RuleNumber>,
}

impl IndexSection {
    /// The category id of this section: `id` if given, otherwise `name`.
    pub fn category_id(&self) -> CategoryId {
        self.id
            .clone()
            .unwrap_or_else(|| CategoryId::new(self.name.clone()))
    }

    /// The category this section defines.
    pub fn to_category(&self) -> CategorySpecification {
        CategorySpecification::new(
            self.category_id(),
            self.name.clone(),
            self.description.clone().unwrap_or_default(),
        )
    }
}

/// Load `config/index` under `data_dir`, preserving section order.
pub fn load_index(data_dir: &Path) -> PackResult<Vec<IndexSection>> {
    let path = data_dir.join("config").join("index");
    let sections: Vec<IndexSection> = load_yaml_typed(&path)?;
    tracing::debug!(
        path = %path.display(),
        sections = sections.len(),
        "loaded index"
    );
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_falls_back_to_name() {
        let section: IndexSection =
            serde_yaml::from_str("name: Power Rules\nrules: [101, 102]\n").unwrap();
        assert_eq!(section.category_id(), CategoryId::from("Power Rules"));
        assert_eq!(
            section.rules,
            vec![RuleNumber::from(101u64), RuleNumber::from(102u64)]
        );

        let category = section.to_category();
        assert_eq!(category.readable_name, "Power Rules");
        assert_eq!(category.readable_description, "");
    }

    #[test]
    fn explicit_id_and_description() {
        let section: IndexSection = serde_yaml::from_str(
            "name: Power Rules\nid: power\ndescription: Rules about power\nrules: []\n",
        )
        .unwrap();
        assert_eq!(section.category_id(), CategoryId::from("power"));
        assert_eq!(section.to_category().readable_description, "Rules about power");
    }

    #[test]
    fn section_without_rules_is_empty() {
        let section: IndexSection = serde_yaml::from_str("name: Empty\n").unwrap();
        assert!(section.rules.is_empty());
    }

    #[test]
    fn load_index_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(
            dir.path().join("config").join("index"),
            "- name: Zeta\n  rules: [2]\n- name: Alpha\n  rules: [1]\n",
        )
        .unwrap();
        let names: Vec<String> = load_index(dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }
}
