use std::collections::BTreeSet;

use pantry_types::{QueryRequest, Recipe, TagSelection};

/// Cheap exact predicates a [`crate::RecipeSource`] may push down to storage.
///
/// Every predicate here is one the matching engine checks again, so a source
/// applying all, some or none of them yields the same final ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateQuery {
    /// Empty means any source.
    pub sources: BTreeSet<String>,
    /// Lower-cased; each must appear in title or description.
    pub keywords_to_include: Vec<String>,
    /// Lower-cased; none may appear in title or description.
    pub keywords_to_exclude: Vec<String>,
    pub excluded_tags: TagSelection,
    /// 0 means unlimited.
    pub max_steps: usize,
    pub limit: Option<usize>,
}

impl CandidateQuery {
    pub fn from_request(request: &QueryRequest, limit: Option<usize>) -> Self {
        Self {
            sources: request.sources.clone(),
            keywords_to_include: request
                .keywords_to_include
                .iter()
                .filter_map(|k| keyword(k))
                .filter(|k| pushable_include(k))
                .collect(),
            keywords_to_exclude: request
                .keywords_to_exclude
                .iter()
                .filter_map(|k| keyword(k))
                .collect(),
            excluded_tags: request
                .excluded_tags
                .iter()
                .filter(|(_, titles)| !titles.is_empty())
                .map(|(category, titles)| (category.clone(), titles.clone()))
                .collect(),
            max_steps: request.max_steps,
            limit,
        }
    }

    /// In-process evaluation of the same predicates, for sources without a
    /// query layer.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !self.sources.is_empty() && !self.sources.contains(&recipe.source_domain) {
            return false;
        }
        if self.max_steps > 0 && recipe.step_count() > self.max_steps {
            return false;
        }

        let excluded = self.excluded_tags.iter().any(|(category, titles)| {
            titles.iter().any(|title| recipe.has_tag(category, title))
        });
        if excluded {
            return false;
        }

        let title = recipe.title.to_lowercase();
        let description = recipe.description.to_lowercase();
        let contains = |k: &String| title.contains(k.as_str()) || description.contains(k.as_str());

        self.keywords_to_include.iter().all(contains)
            && !self.keywords_to_exclude.iter().any(contains)
    }
}

fn keyword(raw: &str) -> Option<String> {
    let keyword = raw.trim().to_lowercase();
    (!keyword.is_empty()).then_some(keyword)
}

// SQLite LIKE folds ASCII case only, so a non-ASCII keyword could wrongly
// drop a candidate the engine would keep. Stores fold the non-ASCII
// characters that lower-case to ASCII on the recipe side.
fn pushable_include(keyword: &str) -> bool {
    keyword.chars().all(|c| c.is_ascii() && !c.is_ascii_control())
}

#[cfg(test)]
mod tests {
    use pantry_types::{Ingredient, Tag};

    use super::*;

    #[test]
    fn non_ascii_include_keywords_are_not_pushed_down() {
        let request = QueryRequest {
            keywords_to_include: vec![" Crème ".to_owned(), "Stew".to_owned(), "".to_owned()],
            keywords_to_exclude: vec!["Brûlée".to_owned()],
            ..Default::default()
        };

        let query = CandidateQuery::from_request(&request, Some(10));

        assert_eq!(query.keywords_to_include, vec!["stew"]);
        assert_eq!(query.keywords_to_exclude, vec!["brûlée"]);
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn matches_applies_every_predicate() {
        let recipe = Recipe {
            id: "1".to_owned(),
            title: "Beef Stew".to_owned(),
            description: "Slow cooked".to_owned(),
            ingredients: vec![Ingredient::new("beef")],
            instructions: vec!["a".to_owned(), "b".to_owned()],
            tags: vec![Tag::new("diet", "Keto")],
            source_domain: "stews.example".to_owned(),
            url: String::new(),
        };

        let mut query = CandidateQuery {
            keywords_to_include: vec!["slow".to_owned()],
            ..Default::default()
        };
        assert!(query.matches(&recipe));

        query.max_steps = 1;
        assert!(!query.matches(&recipe));
        query.max_steps = 0;

        query.excluded_tags = [("Diet".to_owned(), ["keto".to_owned()].into())].into();
        assert!(!query.matches(&recipe));
        query.excluded_tags.clear();

        query.sources = ["other.example".to_owned()].into();
        assert!(!query.matches(&recipe));
    }
}
