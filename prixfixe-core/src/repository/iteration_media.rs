//! Iteration media repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, IterationMedia, IterationMediaCreationInput, ListPage, QueryFilter,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "iteration_medias",
    columns: &["path", "mimetype", "recipe_iteration_id", "recipe_step_id"],
    owner: Owner::Parents(&[
        Link {
            column: "belongs_to_recipe_iteration",
            parent: "recipe_iterations",
        },
        Link {
            column: "belongs_to_recipe",
            parent: "recipes",
        },
    ]),
    list_count: ListCount::Subquery,
};

impl Entity for IterationMedia {
    type Input = IterationMediaCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            path: row.text()?,
            mimetype: row.text()?,
            recipe_iteration_id: row.uint()?,
            recipe_step_id: row.opt_uint()?,
            base: row.lifecycle(id)?,
            belongs_to_recipe_iteration: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_recipe_iteration)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("path", Arg::from(&self.path)),
            ("mimetype", Arg::from(&self.mimetype)),
            ("recipe_iteration_id", Arg::from(self.recipe_iteration_id)),
            ("recipe_step_id", Arg::from(self.recipe_step_id)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("path", Arg::from(&input.path)),
            ("mimetype", Arg::from(&input.mimetype)),
            ("recipe_iteration_id", Arg::from(input.recipe_iteration_id)),
            ("recipe_step_id", Arg::from(input.recipe_step_id)),
            (
                "belongs_to_recipe_iteration",
                Arg::from(input.belongs_to_recipe_iteration),
            ),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            path: input.path.clone(),
            mimetype: input.mimetype.clone(),
            recipe_iteration_id: input.recipe_iteration_id,
            recipe_step_id: input.recipe_step_id,
            belongs_to_recipe_iteration: input.belongs_to_recipe_iteration,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IterationMediaRepository: Send + Sync {
    async fn exists(&self, recipe_id: u64, recipe_iteration_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, recipe_id: u64, recipe_iteration_id: u64, id: u64)
        -> Result<IterationMedia>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<IterationMedia>>) -> Result<()>;
    async fn list(
        &self,
        recipe_id: u64,
        recipe_iteration_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<IterationMedia>>;
    async fn create(&self, input: &IterationMediaCreationInput) -> Result<IterationMedia>;
    async fn update(&self, media: &mut IterationMedia) -> Result<()>;
    async fn archive(&self, recipe_iteration_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct IterationMediaRepositoryImpl {
    table: TableRepository<IterationMedia>,
}

impl IterationMediaRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl IterationMediaRepository for IterationMediaRepositoryImpl {
    async fn exists(&self, recipe_id: u64, recipe_iteration_id: u64, id: u64) -> Result<bool> {
        self.table
            .exists(&[recipe_id, recipe_iteration_id], id)
            .await
    }

    async fn get(
        &self,
        recipe_id: u64,
        recipe_iteration_id: u64,
        id: u64,
    ) -> Result<IterationMedia> {
        self.table.get(&[recipe_id, recipe_iteration_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<IterationMedia>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(
        &self,
        recipe_id: u64,
        recipe_iteration_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<IterationMedia>> {
        self.table
            .list(&[recipe_id, recipe_iteration_id], filter)
            .await
    }

    async fn create(&self, input: &IterationMediaCreationInput) -> Result<IterationMedia> {
        self.table.create(input).await
    }

    async fn update(&self, media: &mut IterationMedia) -> Result<()> {
        self.table.update(media).await
    }

    async fn archive(&self, recipe_iteration_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(recipe_iteration_id), id).await
    }
}
