use std::collections::BTreeMap;

use serde_json::Value;

use crate::contract::{ResumeRecord, ValidationError};

pub const SKILLS_ATTRIBUTE: &str = "skills";
const SKILLS_NAME_PLACEHOLDER: &str = "#skills";

/// Logical OR of `contains(skills, tag)` conditions, one per requested tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillFilter {
    skills: Vec<String>,
}

impl SkillFilter {
    /// An OR over zero conditions has no defined result, so an empty tag
    /// list is rejected.
    pub fn any_of(skills: &[String]) -> Result<Self, ValidationError> {
        if skills.is_empty() {
            return Err(ValidationError::new("at least one skill is required"));
        }
        Ok(Self {
            skills: skills.to_vec(),
        })
    }

    /// Filter expression in store syntax, e.g.
    /// `contains(#skills, :skill0) OR contains(#skills, :skill1)`.
    pub fn expression(&self) -> String {
        (0..self.skills.len())
            .map(|index| {
                format!(
                    "contains({SKILLS_NAME_PLACEHOLDER}, {})",
                    value_placeholder(index)
                )
            })
            .collect::<Vec<_>>()
            .join(" OR ")
    }

    pub fn attribute_names(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            SKILLS_NAME_PLACEHOLDER.to_string(),
            SKILLS_ATTRIBUTE.to_string(),
        )])
    }

    pub fn attribute_values(&self) -> BTreeMap<String, String> {
        self.skills
            .iter()
            .enumerate()
            .map(|(index, skill)| (value_placeholder(index), skill.clone()))
            .collect()
    }

    /// Evaluates the filter against a decoded record with the store's
    /// `contains` semantics: element membership for lists, substring match
    /// for strings. Records without a `skills` attribute never match.
    pub fn matches(&self, record: &ResumeRecord) -> bool {
        let Some(attribute) = record.get(SKILLS_ATTRIBUTE) else {
            return false;
        };
        self.skills
            .iter()
            .any(|skill| attribute_contains(attribute, skill))
    }
}

fn value_placeholder(index: usize) -> String {
    format!(":skill{index}")
}

fn attribute_contains(attribute: &Value, needle: &str) -> bool {
    match attribute {
        Value::Array(elements) => elements
            .iter()
            .any(|element| element.as_str() == Some(needle)),
        Value::String(text) => text.contains(needle),
        _ => false,
    }
}
