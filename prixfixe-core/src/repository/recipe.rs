//! Recipe repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, ListPage, QueryFilter, Recipe, RecipeCreationInput};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Recipes are readable by anyone; only writes check the owning user.
pub(crate) static TABLE: Table = Table {
    name: "recipes",
    columns: &["name", "source", "description", "inspired_by_recipe_id"],
    owner: Owner::User {
        scoped_reads: false,
    },
    list_count: ListCount::Subquery,
};

impl Entity for Recipe {
    type Input = RecipeCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            name: row.text()?,
            source: row.text()?,
            description: row.text()?,
            inspired_by_recipe_id: row.opt_uint()?,
            base: row.lifecycle(id)?,
            belongs_to_user: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_user)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("name", Arg::from(&self.name)),
            ("source", Arg::from(&self.source)),
            ("description", Arg::from(&self.description)),
            ("inspired_by_recipe_id", Arg::from(self.inspired_by_recipe_id)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("name", Arg::from(&input.name)),
            ("source", Arg::from(&input.source)),
            ("description", Arg::from(&input.description)),
            ("inspired_by_recipe_id", Arg::from(input.inspired_by_recipe_id)),
            ("belongs_to_user", Arg::from(input.belongs_to_user)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            name: input.name.clone(),
            source: input.source.clone(),
            description: input.description.clone(),
            inspired_by_recipe_id: input.inspired_by_recipe_id,
            belongs_to_user: input.belongs_to_user,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Check whether an un-archived recipe exists
    async fn exists(&self, id: u64) -> Result<bool>;
    async fn get(&self, id: u64) -> Result<Recipe>;
    async fn get_all_count(&self) -> Result<u64>;
    /// Stream every recipe in id buckets
    async fn get_all(&self, results: mpsc::Sender<Vec<Recipe>>) -> Result<()>;
    /// Fetch recipes in the order of `ids`
    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Recipe>>;
    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Recipe>>;
    async fn create(&self, input: &RecipeCreationInput) -> Result<Recipe>;
    async fn update(&self, recipe: &mut Recipe) -> Result<()>;
    /// Archive a recipe owned by `user_id`
    async fn archive(&self, user_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct RecipeRepositoryImpl {
    table: TableRepository<Recipe>,
}

impl RecipeRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl RecipeRepository for RecipeRepositoryImpl {
    async fn exists(&self, id: u64) -> Result<bool> {
        self.table.exists(&[], id).await
    }

    async fn get(&self, id: u64) -> Result<Recipe> {
        self.table.get(&[], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<Recipe>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Recipe>> {
        self.table.get_with_ids(ids, limit).await
    }

    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Recipe>> {
        self.table.list(&[], filter).await
    }

    async fn create(&self, input: &RecipeCreationInput) -> Result<Recipe> {
        self.table.create(input).await
    }

    async fn update(&self, recipe: &mut Recipe) -> Result<()> {
        self.table.update(recipe).await
    }

    async fn archive(&self, user_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(user_id), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_get_query_ignores_owner() {
        let stmt = TABLE.build_get_query(&[], 10).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT recipes.id, recipes.name, recipes.source, recipes.description, recipes.inspired_by_recipe_id, recipes.created_on, recipes.last_updated_on, recipes.archived_on, recipes.belongs_to_user FROM recipes WHERE recipes.archived_on IS NULL AND recipes.id = $1"
        );
        assert_eq!(stmt.args, vec![Arg::BigInt(10)]);
    }

    #[test]
    fn test_build_create_query_with_null_inspiration() {
        let input = RecipeCreationInput {
            name: "pancakes".to_string(),
            belongs_to_user: 7,
            ..Default::default()
        };
        let stmt = TABLE.build_create_query(Recipe::insert_values(&input));
        assert_eq!(
            stmt.sql,
            "INSERT INTO recipes (name,source,description,inspired_by_recipe_id,belongs_to_user) VALUES ($1,$2,$3,$4,$5) RETURNING id, created_on"
        );
        assert_eq!(stmt.args[3], Arg::NullableBigInt(None));
        assert_eq!(stmt.args[4], Arg::BigInt(7));
    }

    #[test]
    fn test_build_update_query() {
        let recipe = Recipe {
            base: BaseRecord {
                id: 10,
                ..Default::default()
            },
            name: "waffles".to_string(),
            inspired_by_recipe_id: Some(2),
            belongs_to_user: 7,
            ..Default::default()
        };
        let stmt = TABLE.build_update_query(recipe.update_values(), recipe.owner_id(), 10);
        assert_eq!(
            stmt.sql,
            "UPDATE recipes SET name = $1, source = $2, description = $3, inspired_by_recipe_id = $4, last_updated_on = extract(epoch FROM NOW()) WHERE belongs_to_user = $5 AND id = $6 RETURNING last_updated_on"
        );
        assert_eq!(stmt.args[3], Arg::NullableBigInt(Some(2)));
    }

    #[test]
    fn test_archive_is_owner_scoped_but_exists_is_not() {
        let archive = TABLE.build_archive_query(Some(7), 10);
        assert!(archive
            .sql
            .ends_with("WHERE archived_on IS NULL AND belongs_to_user = $1 AND id = $2 RETURNING archived_on"));
        assert_eq!(archive.args, vec![Arg::BigInt(7), Arg::BigInt(10)]);

        let exists = TABLE.build_exists_query(&[], 10).unwrap();
        assert!(!exists.sql.contains("belongs_to_user"));
        assert_eq!(exists.args, vec![Arg::BigInt(10)]);
    }
}
