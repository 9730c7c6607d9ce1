use serde::{Deserialize, Serialize};

/// A single recipe ingredient line.
///
/// Only `name` takes part in matching. The remaining fields are carried
/// through untouched for presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IngredientRepr")]
pub struct Ingredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// Stored ingredient lists mix bare strings ("2 onions") and full objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientRepr {
    Name(String),
    Full {
        #[serde(alias = "ingredient")]
        name: String,
        #[serde(default)]
        quantity: Option<String>,
        #[serde(default)]
        measurement: Option<String>,
        #[serde(default)]
        detail: Option<String>,
    },
}

impl From<IngredientRepr> for Ingredient {
    fn from(value: IngredientRepr) -> Self {
        match value {
            IngredientRepr::Name(name) => Ingredient::new(name),
            IngredientRepr::Full {
                name,
                quantity,
                measurement,
                detail,
            } => Ingredient {
                name,
                quantity,
                measurement,
                detail,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub category: String,
    pub title: String,
}

impl Tag {
    pub fn new(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
        }
    }

    /// Category and title compare case-insensitively.
    pub fn is(&self, category: &str, title: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
            && self.title.to_lowercase() == title.to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub url: String,
}

impl Recipe {
    pub fn step_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn has_tag(&self, category: &str, title: &str) -> bool {
        self.tags.iter().any(|t| t.is(category, title))
    }

    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.name.as_str())
    }
}
