//! Instrument repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, Instrument, InstrumentCreationInput, ListPage, QueryFilter};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "instruments",
    columns: &["name", "variant", "description", "icon"],
    owner: Owner::Catalog,
    list_count: ListCount::Subquery,
};

impl Entity for Instrument {
    type Input = InstrumentCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            name: row.text()?,
            variant: row.text()?,
            description: row.text()?,
            icon: row.text()?,
            base: row.lifecycle(id)?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        None
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("name", Arg::from(&self.name)),
            ("variant", Arg::from(&self.variant)),
            ("description", Arg::from(&self.description)),
            ("icon", Arg::from(&self.icon)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("name", Arg::from(&input.name)),
            ("variant", Arg::from(&input.variant)),
            ("description", Arg::from(&input.description)),
            ("icon", Arg::from(&input.icon)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            name: input.name.clone(),
            variant: input.variant.clone(),
            description: input.description.clone(),
            icon: input.icon.clone(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    async fn exists(&self, id: u64) -> Result<bool>;
    async fn get(&self, id: u64) -> Result<Instrument>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<Instrument>>) -> Result<()>;
    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Instrument>>;
    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Instrument>>;
    async fn create(&self, input: &InstrumentCreationInput) -> Result<Instrument>;
    async fn update(&self, instrument: &mut Instrument) -> Result<()>;
    async fn archive(&self, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct InstrumentRepositoryImpl {
    table: TableRepository<Instrument>,
}

impl InstrumentRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl InstrumentRepository for InstrumentRepositoryImpl {
    async fn exists(&self, id: u64) -> Result<bool> {
        self.table.exists(&[], id).await
    }

    async fn get(&self, id: u64) -> Result<Instrument> {
        self.table.get(&[], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<Instrument>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Instrument>> {
        self.table.get_with_ids(ids, limit).await
    }

    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Instrument>> {
        self.table.list(&[], filter).await
    }

    async fn create(&self, input: &InstrumentCreationInput) -> Result<Instrument> {
        self.table.create(input).await
    }

    async fn update(&self, instrument: &mut Instrument) -> Result<()> {
        self.table.update(instrument).await
    }

    async fn archive(&self, id: u64) -> Result<()> {
        self.table.archive(None, id).await
    }
}
