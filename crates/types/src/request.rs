use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::{Validate, ValidationError};

/// How the entries of [`QueryRequest::tag_filters`] combine.
///
/// `Or` passes a recipe carrying any listed tag in any listed category.
/// `And` requires at least one listed tag in every listed category.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum TagFilterMode {
    #[serde(alias = "and", alias = "And")]
    And,
    #[default]
    #[serde(alias = "or", alias = "Or")]
    Or,
}

/// Tag titles grouped by category.
pub type TagSelection = BTreeMap<String, BTreeSet<String>>;

/// Structured search request produced by the upstream interpreter or UI.
///
/// List-valued ingredient fields have set semantics: duplicates (after
/// normalization) are collapsed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QueryRequest {
    pub user_ingredients: Vec<String>,
    pub must_use: Vec<String>,
    pub forbidden_ingredients: Vec<String>,
    pub tag_filters: TagSelection,
    pub excluded_tags: TagSelection,
    pub tag_filter_mode: TagFilterMode,
    pub keywords_to_include: Vec<String>,
    pub keywords_to_exclude: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub min_ing_matches: usize,
    /// 0 means unlimited.
    #[serde(deserialize_with = "null_as_default")]
    pub max_steps: usize,
    #[validate(
        range(min = 0.0, max = 1.0),
        custom(function = "validate_finite")
    )]
    pub user_coverage_req: f64,
    #[validate(
        range(min = 0.0, max = 1.0),
        custom(function = "validate_finite")
    )]
    pub recipe_coverage_req: f64,
    /// Empty means no source restriction.
    pub sources: BTreeSet<String>,
}

impl QueryRequest {
    /// Categories of `tag_filters` that actually list at least one title.
    pub fn active_tag_filters(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.tag_filters.iter().filter(|(_, titles)| !titles.is_empty())
    }
}

fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
