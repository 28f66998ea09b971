//! Recipe step event repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, ListPage, QueryFilter, RecipeStepEvent, RecipeStepEventCreationInput,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "recipe_step_events",
    columns: &["event_type", "done", "recipe_iteration_id", "recipe_step_id"],
    owner: Owner::Parents(&[
        Link {
            column: "belongs_to_recipe_step",
            parent: "recipe_steps",
        },
        Link {
            column: "belongs_to_recipe",
            parent: "recipes",
        },
    ]),
    list_count: ListCount::Subquery,
};

impl Entity for RecipeStepEvent {
    type Input = RecipeStepEventCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            event_type: row.text()?,
            done: row.boolean()?,
            recipe_iteration_id: row.uint()?,
            recipe_step_id: row.uint()?,
            base: row.lifecycle(id)?,
            belongs_to_recipe_step: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_recipe_step)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("event_type", Arg::from(&self.event_type)),
            ("done", Arg::from(self.done)),
            ("recipe_iteration_id", Arg::from(self.recipe_iteration_id)),
            ("recipe_step_id", Arg::from(self.recipe_step_id)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("event_type", Arg::from(&input.event_type)),
            ("done", Arg::from(input.done)),
            ("recipe_iteration_id", Arg::from(input.recipe_iteration_id)),
            ("recipe_step_id", Arg::from(input.recipe_step_id)),
            ("belongs_to_recipe_step", Arg::from(input.belongs_to_recipe_step)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            event_type: input.event_type.clone(),
            done: input.done,
            recipe_iteration_id: input.recipe_iteration_id,
            recipe_step_id: input.recipe_step_id,
            belongs_to_recipe_step: input.belongs_to_recipe_step,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStepEventRepository: Send + Sync {
    async fn exists(&self, recipe_id: u64, recipe_step_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, recipe_id: u64, recipe_step_id: u64, id: u64) -> Result<RecipeStepEvent>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeStepEvent>>) -> Result<()>;
    async fn list(
        &self,
        recipe_id: u64,
        recipe_step_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeStepEvent>>;
    async fn create(&self, input: &RecipeStepEventCreationInput) -> Result<RecipeStepEvent>;
    async fn update(&self, event: &mut RecipeStepEvent) -> Result<()>;
    async fn archive(&self, recipe_step_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct RecipeStepEventRepositoryImpl {
    table: TableRepository<RecipeStepEvent>,
}

impl RecipeStepEventRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl RecipeStepEventRepository for RecipeStepEventRepositoryImpl {
    async fn exists(&self, recipe_id: u64, recipe_step_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[recipe_id, recipe_step_id], id).await
    }

    async fn get(&self, recipe_id: u64, recipe_step_id: u64, id: u64) -> Result<RecipeStepEvent> {
        self.table.get(&[recipe_id, recipe_step_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeStepEvent>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(
        &self,
        recipe_id: u64,
        recipe_step_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeStepEvent>> {
        self.table.list(&[recipe_id, recipe_step_id], filter).await
    }

    async fn create(&self, input: &RecipeStepEventCreationInput) -> Result<RecipeStepEvent> {
        self.table.create(input).await
    }

    async fn update(&self, event: &mut RecipeStepEvent) -> Result<()> {
        self.table.update(event).await
    }

    async fn archive(&self, recipe_step_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(recipe_step_id), id).await
    }
}
