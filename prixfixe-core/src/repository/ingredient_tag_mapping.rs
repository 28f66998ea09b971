//! Ingredient tag mapping repository
//!
//! Mappings hang off a valid ingredient. Lists are grouped per mapping id,
//! so the total is counted separately.

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, IngredientTagMapping, IngredientTagMappingCreationInput, ListPage, QueryFilter,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "ingredient_tag_mappings",
    columns: &["valid_ingredient_tag_id"],
    owner: Owner::Parents(&[Link {
        column: "belongs_to_valid_ingredient",
        parent: "valid_ingredients",
    }]),
    list_count: ListCount::Grouped,
};

impl Entity for IngredientTagMapping {
    type Input = IngredientTagMappingCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            valid_ingredient_tag_id: row.uint()?,
            base: row.lifecycle(id)?,
            belongs_to_valid_ingredient: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_valid_ingredient)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![(
            "valid_ingredient_tag_id",
            Arg::from(self.valid_ingredient_tag_id),
        )]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            (
                "valid_ingredient_tag_id",
                Arg::from(input.valid_ingredient_tag_id),
            ),
            (
                "belongs_to_valid_ingredient",
                Arg::from(input.belongs_to_valid_ingredient),
            ),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            valid_ingredient_tag_id: input.valid_ingredient_tag_id,
            belongs_to_valid_ingredient: input.belongs_to_valid_ingredient,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientTagMappingRepository: Send + Sync {
    async fn exists(&self, valid_ingredient_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, valid_ingredient_id: u64, id: u64) -> Result<IngredientTagMapping>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<IngredientTagMapping>>) -> Result<()>;
    async fn list(
        &self,
        valid_ingredient_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<IngredientTagMapping>>;
    async fn create(
        &self,
        input: &IngredientTagMappingCreationInput,
    ) -> Result<IngredientTagMapping>;
    async fn update(&self, mapping: &mut IngredientTagMapping) -> Result<()>;
    async fn archive(&self, valid_ingredient_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct IngredientTagMappingRepositoryImpl {
    table: TableRepository<IngredientTagMapping>,
}

impl IngredientTagMappingRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl IngredientTagMappingRepository for IngredientTagMappingRepositoryImpl {
    async fn exists(&self, valid_ingredient_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[valid_ingredient_id], id).await
    }

    async fn get(&self, valid_ingredient_id: u64, id: u64) -> Result<IngredientTagMapping> {
        self.table.get(&[valid_ingredient_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<IngredientTagMapping>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(
        &self,
        valid_ingredient_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<IngredientTagMapping>> {
        self.table.list(&[valid_ingredient_id], filter).await
    }

    async fn create(
        &self,
        input: &IngredientTagMappingCreationInput,
    ) -> Result<IngredientTagMapping> {
        self.table.create(input).await
    }

    async fn update(&self, mapping: &mut IngredientTagMapping) -> Result<()> {
        self.table.update(mapping).await
    }

    async fn archive(&self, valid_ingredient_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(valid_ingredient_id), id).await
    }
}
