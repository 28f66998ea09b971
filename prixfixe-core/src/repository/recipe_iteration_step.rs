//! Recipe iteration step repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, ListPage, QueryFilter, RecipeIterationStep, RecipeIterationStepCreationInput,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "recipe_iteration_steps",
    columns: &["started_on", "ended_on", "state"],
    owner: Owner::Parents(&[Link {
        column: "belongs_to_recipe",
        parent: "recipes",
    }]),
    list_count: ListCount::Grouped,
};

impl Entity for RecipeIterationStep {
    type Input = RecipeIterationStepCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            started_on: row.opt_uint()?,
            ended_on: row.opt_uint()?,
            state: row.text()?,
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
            ("started_on", Arg::from(self.started_on)),
            ("ended_on", Arg::from(self.ended_on)),
            ("state", Arg::from(&self.state)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("started_on", Arg::from(input.started_on)),
            ("ended_on", Arg::from(input.ended_on)),
            ("state", Arg::from(&input.state)),
            ("belongs_to_recipe", Arg::from(input.belongs_to_recipe)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            started_on: input.started_on,
            ended_on: input.ended_on,
            state: input.state.clone(),
            belongs_to_recipe: input.belongs_to_recipe,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeIterationStepRepository: Send + Sync {
    async fn exists(&self, recipe_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, recipe_id: u64, id: u64) -> Result<RecipeIterationStep>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeIterationStep>>) -> Result<()>;
    async fn list(
        &self,
        recipe_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeIterationStep>>;
    async fn create(
        &self,
        input: &RecipeIterationStepCreationInput,
    ) -> Result<RecipeIterationStep>;
    async fn update(&self, step: &mut RecipeIterationStep) -> Result<()>;
    async fn archive(&self, recipe_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct RecipeIterationStepRepositoryImpl {
    table: TableRepository<RecipeIterationStep>,
}

impl RecipeIterationStepRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl RecipeIterationStepRepository for RecipeIterationStepRepositoryImpl {
    async fn exists(&self, recipe_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[recipe_id], id).await
    }

    async fn get(&self, recipe_id: u64, id: u64) -> Result<RecipeIterationStep> {
        self.table.get(&[recipe_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeIterationStep>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(
        &self,
        recipe_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeIterationStep>> {
        self.table.list(&[recipe_id], filter).await
    }

    async fn create(
        &self,
        input: &RecipeIterationStepCreationInput,
    ) -> Result<RecipeIterationStep> {
        self.table.create(input).await
    }

    async fn update(&self, step: &mut RecipeIterationStep) -> Result<()> {
        self.table.update(step).await
    }

    async fn archive(&self, recipe_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(recipe_id), id).await
    }
}
