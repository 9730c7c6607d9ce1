use pantry_db::table;
use pantry_types::{Ingredient, Recipe, Tag};
use sea_query::{
    Expr, ExprTrait, Func, Order, Query, SelectStatement, SqliteQueryBuilder, Value,
};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

use crate::{CandidateQuery, RecipeSource, StoreError};

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source_domain: String,
    pub url: String,
    pub ingredients: String,
    pub instructions: String,
    pub tags: String,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = serde_json::Error;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let ingredients: Vec<Ingredient> = serde_json::from_str(&row.ingredients)?;
        let instructions: Vec<String> = serde_json::from_str(&row.instructions)?;
        let tags: Vec<Tag> = serde_json::from_str(&row.tags)?;

        Ok(Recipe {
            id: row.id,
            title: row.title,
            description: row.description,
            ingredients,
            instructions,
            tags,
            source_domain: row.source_domain,
            url: row.url,
        })
    }
}

/// SQLite-backed recipe corpus.
#[derive(Debug, Clone)]
pub struct SqliteRecipeStore(pub SqlitePool);

impl SqliteRecipeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self(pool)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.0
    }

    pub async fn find(&self, id: impl Into<String>) -> Result<Option<Recipe>, StoreError> {
        let statement = select_recipes()
            .and_where(Expr::col(table::Recipe::Id).eq(id.into()))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.and_then(decode))
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let statement = Query::select()
            .expr(Func::count(Expr::col(table::Recipe::Id)))
            .from(table::Recipe::Table)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let (count,): (i64,) = sqlx::query_as_with(&sql, values)
            .fetch_one(&self.0)
            .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl RecipeSource for SqliteRecipeStore {
    #[tracing::instrument(skip_all, fields(limit = ?query.limit))]
    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Recipe>, StoreError> {
        let statement = candidate_statement(query);
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        let total = rows.len();
        let recipes: Vec<Recipe> = rows.into_iter().filter_map(decode).collect();

        tracing::debug!(
            rows = total,
            skipped = total - recipes.len(),
            "fetched candidates"
        );

        Ok(recipes)
    }

    #[tracing::instrument(skip_all)]
    async fn sources(&self) -> Result<Vec<String>, StoreError> {
        let statement = Query::select()
            .distinct()
            .column(table::Recipe::SourceDomain)
            .from(table::Recipe::Table)
            .and_where(Expr::col(table::Recipe::SourceDomain).ne(""))
            .order_by(table::Recipe::SourceDomain, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows: Vec<(String,)> = sqlx::query_as_with(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(|(source,)| source).collect())
    }
}

fn select_recipes() -> SelectStatement {
    Query::select()
        .columns([
            table::Recipe::Id,
            table::Recipe::Title,
            table::Recipe::Description,
            table::Recipe::SourceDomain,
            table::Recipe::Url,
            table::Recipe::Ingredients,
            table::Recipe::Instructions,
            table::Recipe::Tags,
        ])
        .from(table::Recipe::Table)
        .to_owned()
}

pub fn candidate_statement(query: &CandidateQuery) -> SelectStatement {
    let mut statement = select_recipes();

    if !query.sources.is_empty() {
        statement.and_where(
            Expr::col(table::Recipe::SourceDomain).is_in(query.sources.iter().cloned()),
        );
    }

    if query.max_steps > 0 {
        statement.and_where(Expr::col(table::Recipe::StepCount).lte(query.max_steps as i64));
    }

    for keyword in &query.keywords_to_include {
        let pattern = like_pattern(keyword);
        statement.and_where(Expr::cust_with_values(
            format!(
                "({} LIKE ? ESCAPE '!' OR {} LIKE ? ESCAPE '!')",
                ascii_folded("title"),
                ascii_folded("description")
            ),
            [pattern.clone(), pattern],
        ));
    }

    for keyword in &query.keywords_to_exclude {
        let pattern = like_pattern(keyword);
        statement.and_where(Expr::cust_with_values(
            "NOT (title LIKE ? ESCAPE '!' OR description LIKE ? ESCAPE '!')",
            [pattern.clone(), pattern],
        ));
    }

    for (category, titles) in &query.excluded_tags {
        if titles.is_empty() {
            continue;
        }

        let in_clause = titles.iter().map(|_| "lower(?)").collect::<Vec<_>>().join(", ");
        statement.and_where(Expr::cust_with_values(
            format!(
                "NOT EXISTS (SELECT 1 FROM json_each(tags) WHERE lower(json_extract(value, '$.category')) = lower(?) AND lower(json_extract(value, '$.title')) IN ({in_clause}))"
            ),
            std::iter::once(category)
                .chain(titles.iter())
                .map(|v| Value::from(v.to_owned()))
                .collect::<Vec<_>>(),
        ));
    }

    statement.order_by(table::Recipe::Id, Order::Asc);

    if let Some(limit) = query.limit {
        statement.limit(limit as u64);
    }

    statement
}

// LIKE folds ASCII case only. The KELVIN SIGN (U+212A) and LATIN CAPITAL
// LETTER I WITH DOT ABOVE (U+0130) are the only characters that lower-case
// to ASCII letters, so they are mapped before matching includes.
fn ascii_folded(column: &str) -> String {
    format!("replace(replace({column}, char(8490), 'k'), char(304), 'i')")
}

fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '!') {
            escaped.push('!');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn decode(row: RecipeRow) -> Option<Recipe> {
    let id = row.id.clone();
    match Recipe::try_from(row) {
        Ok(recipe) => Some(recipe),
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "skipping malformed recipe row");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("50%_off"), "%50!%!_off%");
        assert_eq!(like_pattern("wow!"), "%wow!!%");
    }

    #[test]
    fn candidate_statement_pushes_down_predicates() {
        let query = CandidateQuery {
            sources: ["a.example".to_owned()].into(),
            keywords_to_include: vec!["stew".to_owned()],
            keywords_to_exclude: vec!["quick".to_owned()],
            excluded_tags: [("diet".to_owned(), ["vegan".to_owned()].into())].into(),
            max_steps: 4,
            limit: Some(20),
            ..Default::default()
        };

        let sql = candidate_statement(&query).to_string(SqliteQueryBuilder);

        assert!(sql.contains("\"source_domain\" IN ('a.example')"));
        assert!(sql.contains("\"step_count\" <= 4"));
        assert!(sql.contains(
            "replace(replace(title, char(8490), 'k'), char(304), 'i') LIKE '%stew%'"
        ));
        assert!(sql.contains("NOT (title LIKE"));
        assert!(sql.contains("json_each(tags)"));
        assert!(sql.contains("LIMIT 20"));
    }
}
