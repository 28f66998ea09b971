//! Recipe iteration repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, ListPage, QueryFilter, RecipeIteration, RecipeIterationCreationInput,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "recipe_iterations",
    columns: &[
        "recipe_id",
        "end_difficulty_rating",
        "end_complexity_rating",
        "end_taste_rating",
        "end_overall_rating",
    ],
    owner: Owner::Parents(&[Link {
        column: "belongs_to_recipe",
        parent: "recipes",
    }]),
    list_count: ListCount::Subquery,
};

impl Entity for RecipeIteration {
    type Input = RecipeIterationCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            recipe_id: row.uint()?,
            end_difficulty_rating: row.real()?,
            end_complexity_rating: row.real()?,
            end_taste_rating: row.real()?,
            end_overall_rating: row.real()?,
            base: row.lifecycle(id)?,
            belongs_to_recipe: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_recipe)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("recipe_id", Arg::from(self.recipe_id)),
            ("end_difficulty_rating", Arg::from(self.end_difficulty_rating)),
            ("end_complexity_rating", Arg::from(self.end_complexity_rating)),
            ("end_taste_rating", Arg::from(self.end_taste_rating)),
            ("end_overall_rating", Arg::from(self.end_overall_rating)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("recipe_id", Arg::from(input.recipe_id)),
            ("end_difficulty_rating", Arg::from(input.end_difficulty_rating)),
            ("end_complexity_rating", Arg::from(input.end_complexity_rating)),
            ("end_taste_rating", Arg::from(input.end_taste_rating)),
            ("end_overall_rating", Arg::from(input.end_overall_rating)),
            ("belongs_to_recipe", Arg::from(input.belongs_to_recipe)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            recipe_id: input.recipe_id,
            end_difficulty_rating: input.end_difficulty_rating,
            end_complexity_rating: input.end_complexity_rating,
            end_taste_rating: input.end_taste_rating,
            end_overall_rating: input.end_overall_rating,
            belongs_to_recipe: input.belongs_to_recipe,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeIterationRepository: Send + Sync {
    async fn exists(&self, recipe_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, recipe_id: u64, id: u64) -> Result<RecipeIteration>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeIteration>>) -> Result<()>;
    async fn list(&self, recipe_id: u64, filter: &QueryFilter)
        -> Result<ListPage<RecipeIteration>>;
    async fn create(&self, input: &RecipeIterationCreationInput) -> Result<RecipeIteration>;
    async fn update(&self, iteration: &mut RecipeIteration) -> Result<()>;
    async fn archive(&self, recipe_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct RecipeIterationRepositoryImpl {
    table: TableRepository<RecipeIteration>,
}

impl RecipeIterationRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl RecipeIterationRepository for RecipeIterationRepositoryImpl {
    async fn exists(&self, recipe_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[recipe_id], id).await
    }

    async fn get(&self, recipe_id: u64, id: u64) -> Result<RecipeIteration> {
        self.table.get(&[recipe_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeIteration>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(
        &self,
        recipe_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeIteration>> {
        self.table.list(&[recipe_id], filter).await
    }

    async fn create(&self, input: &RecipeIterationCreationInput) -> Result<RecipeIteration> {
        self.table.create(input).await
    }

    async fn update(&self, iteration: &mut RecipeIteration) -> Result<()> {
        self.table.update(iteration).await
    }

    async fn archive(&self, recipe_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(recipe_id), id).await
    }
}
