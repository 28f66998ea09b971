//! Generic CRUD over a [`Table`]
//!
//! Entity repositories are thin typed wrappers around [`TableRepository`];
//! everything that touches SQL for a table lives here.

use super::scanner::{scan_many, RowReader};
use super::table::{ListCount, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, ListPage, QueryFilter};
use crate::error::{AppError, Result};
use crate::querybuilding::{Arg, Statement};
use sqlx::postgres::PgRow;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error};

/// A record stored in one table.
pub trait Entity: Sized + Send + Sync + 'static {
    type Input: Send + Sync;

    fn table() -> &'static Table;

    /// Read a record from a row laid out as [`Table::projection`].
    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error>;

    fn base(&self) -> &BaseRecord;

    fn base_mut(&mut self) -> &mut BaseRecord;

    fn owner_id(&self) -> Option<u64>;

    /// Columns written by an update, in SET order.
    fn update_values(&self) -> Vec<(&'static str, Arg)>;

    /// Columns written by an insert, owner column last.
    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)>;

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self;
}

pub struct TableRepository<E> {
    db: Database,
    batch: BatchConfig,
    count_query: Arc<OnceLock<Statement>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for TableRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            batch: self.batch,
            count_query: self.count_query.clone(),
            _entity: PhantomData,
        }
    }
}

fn scan_row<E: Entity>(
    row: &PgRow,
    with_count: bool,
) -> std::result::Result<(E, Option<u64>), sqlx::Error> {
    let mut reader = RowReader::new(row);
    let record = E::scan(&mut reader)?;
    let count = if with_count {
        Some(reader.uint()?)
    } else {
        None
    };
    Ok((record, count))
}

/// `RETURNING id, created_on` of an insert.
fn read_identity(row: &PgRow) -> std::result::Result<BaseRecord, sqlx::Error> {
    let mut reader = RowReader::new(row);
    Ok(BaseRecord {
        id: reader.uint()?,
        created_on: reader.uint()?,
        ..Default::default()
    })
}

impl<E: Entity> TableRepository<E> {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            db,
            batch,
            count_query: Arc::new(OnceLock::new()),
            _entity: PhantomData,
        }
    }

    fn table(&self) -> &'static Table {
        E::table()
    }

    pub async fn exists(&self, chain: &[u64], id: u64) -> Result<bool> {
        let statement = self.table().build_exists_query(chain, id)?;
        let context = format!("checking {} existence", self.table().name);

        match self.db.fetch_one(&context, &statement).await {
            Ok(row) => RowReader::new(&row)
                .boolean()
                .map_err(|e| AppError::database(context, e)),
            Err(AppError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, chain: &[u64], id: u64) -> Result<E> {
        let statement = self.table().build_get_query(chain, id)?;
        let context = format!("fetching {}", self.table().name);
        let row = self.db.fetch_one(&context, &statement).await?;
        E::scan(&mut RowReader::new(&row)).map_err(|e| AppError::database(context, e))
    }

    /// Run a table-specific single-row select laid out as [`Table::projection`].
    pub async fn query_one(&self, context: &str, statement: &Statement) -> Result<E> {
        let row = self.db.fetch_one(context, statement).await?;
        E::scan(&mut RowReader::new(&row)).map_err(|e| AppError::database(context, e))
    }

    pub async fn query_many(&self, context: &str, statement: &Statement) -> Result<Vec<E>> {
        let rows = self.db.fetch(context, statement)?;
        let (items, _) = scan_many(rows, context, false, scan_row::<E>).await?;
        Ok(items)
    }

    /// Number of un-archived rows in the table.
    pub async fn get_all_count(&self) -> Result<u64> {
        let statement = self
            .count_query
            .get_or_init(|| self.table().build_get_all_count_query());
        let context = format!("counting {}", self.table().name);
        self.count(&context, statement).await
    }

    async fn count(&self, context: &str, statement: &Statement) -> Result<u64> {
        let row = self.db.fetch_one(context, statement).await?;
        RowReader::new(&row)
            .uint()
            .map_err(|e| AppError::database(context, e))
    }

    /// Rows with `begin < id < end`, archived ones included.
    pub async fn get_batch(&self, begin: u64, end: u64) -> Result<Vec<E>> {
        let statement = self.table().build_get_batch_query(begin, end);
        let context = format!("fetching {} batch", self.table().name);
        let rows = self.db.fetch(&context, &statement)?;
        let (items, _) = scan_many(rows, &context, false, scan_row::<E>).await?;
        Ok(items)
    }

    /// Send every row of the table, one id bucket at a time.
    ///
    /// Returns once a worker has been spawned for every bucket, without
    /// waiting for any of them; workers take a permit before querying. The
    /// channel closes when the last worker finishes and the caller drops its
    /// own sender.
    pub async fn get_all(&self, results: mpsc::Sender<Vec<E>>) -> Result<()> {
        let table = self.table();
        let context = format!("fetching highest {} id", table.name);
        let max_id = self.count(&context, &table.build_max_id_query()).await?;

        let bucket_size = self.batch.bucket_size.max(1);
        let permits = Arc::new(Semaphore::new(self.batch.concurrency.max(1)));

        let mut begin = 0u64;
        while begin < max_id {
            let end = begin.saturating_add(bucket_size).saturating_add(1);
            let permits = permits.clone();
            let repo = self.clone();
            let results = results.clone();

            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                match repo.get_batch(begin, end).await {
                    Ok(batch) if batch.is_empty() => {}
                    Ok(batch) => {
                        if results.send(batch).await.is_err() {
                            debug!(table = table.name, begin, "batch receiver dropped");
                        }
                    }
                    Err(AppError::NotFound) => {}
                    Err(e) => {
                        error!(table = table.name, begin, end, error = %e, "querying for database rows");
                    }
                }
            });

            begin = begin.saturating_add(bucket_size);
        }

        Ok(())
    }

    pub async fn list(&self, chain: &[u64], filter: &QueryFilter) -> Result<ListPage<E>> {
        let table = self.table();
        let statement = table.build_list_query(chain, filter)?;
        let context = format!("listing {}", table.name);
        let with_count = table.list_count == ListCount::Subquery;

        let rows = self.db.fetch(&context, &statement)?;
        let (items, mut total) = scan_many(rows, &context, with_count, scan_row::<E>).await?;

        // A page past the end carries no count column to read from.
        if !with_count || (items.is_empty() && filter.offset() > 0) {
            let count_statement = table.build_filtered_count_query(chain, filter)?;
            total = self.count(&context, &count_statement).await?;
        }

        Ok(ListPage::new(filter, items, total))
    }

    /// Records for `ids` in the order given, skipping archived and missing ones.
    pub async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let statement = self.table().build_get_with_ids_query(ids, limit)?;
        let context = format!("fetching {} by ids", self.table().name);
        let rows = self.db.fetch(&context, &statement)?;
        let (items, _) = scan_many(rows, &context, false, scan_row::<E>).await?;
        Ok(items)
    }

    pub async fn create(&self, input: &E::Input) -> Result<E> {
        let statement = self.table().build_create_query(E::insert_values(input));
        let context = format!("creating {}", self.table().name);
        let row = self.db.fetch_one(&context, &statement).await?;

        let base = read_identity(&row).map_err(|e| AppError::database(context, e))?;
        Ok(E::from_input(input, base))
    }

    /// Write the record's mutable columns and refresh its `last_updated_on`.
    pub async fn update(&self, record: &mut E) -> Result<()> {
        let statement = self.table().build_update_query(
            record.update_values(),
            record.owner_id(),
            record.base().id,
        );
        let context = format!("updating {}", self.table().name);
        let row = self.db.fetch_one(&context, &statement).await?;
        let last_updated_on = RowReader::new(&row)
            .opt_uint()
            .map_err(|e| AppError::database(context, e))?;
        record.base_mut().last_updated_on = last_updated_on;
        Ok(())
    }

    pub async fn archive(&self, owner_id: Option<u64>, id: u64) -> Result<()> {
        let statement = self.table().build_archive_query(owner_id, id);
        let context = format!("archiving {}", self.table().name);
        let result = self.db.execute(&context, &statement).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
