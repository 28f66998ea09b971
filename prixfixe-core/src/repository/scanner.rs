//! Row to record adapters

use crate::database::RowStream;
use crate::domain::BaseRecord;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::error;

/// A cursor over query results that must be closed once consumed.
#[async_trait]
pub trait ResultIterator: Send {
    type Row: Send;

    async fn next_row(&mut self) -> Option<std::result::Result<Self::Row, sqlx::Error>>;

    async fn close(&mut self) -> std::result::Result<(), sqlx::Error>;
}

#[async_trait]
impl<'a> ResultIterator for RowStream<'a> {
    type Row = PgRow;

    async fn next_row(&mut self) -> Option<std::result::Result<PgRow, sqlx::Error>> {
        RowStream::next_row(self).await
    }

    async fn close(&mut self) -> std::result::Result<(), sqlx::Error> {
        RowStream::close(self);
        Ok(())
    }
}

/// Collect every row and the total count carried by the first row that has one.
///
/// The iterator is closed on every path. A failure while iterating or
/// scanning discards what was collected so far.
pub async fn scan_many<I, T, F>(
    mut rows: I,
    context: &str,
    include_count: bool,
    mut scan: F,
) -> Result<(Vec<T>, u64)>
where
    I: ResultIterator,
    F: FnMut(&I::Row, bool) -> std::result::Result<(T, Option<u64>), sqlx::Error>,
{
    let mut items = Vec::new();
    let mut total = None;

    let outcome = loop {
        match rows.next_row().await {
            None => break Ok(()),
            Some(Err(e)) => break Err(e),
            Some(Ok(row)) => match scan(&row, include_count) {
                Ok((item, count)) => {
                    if total.is_none() {
                        total = count;
                    }
                    items.push(item);
                }
                Err(e) => break Err(e),
            },
        }
    };

    if let Err(e) = rows.close().await {
        error!(context, error = %e, "closing database rows");
    }

    outcome.map_err(|e| AppError::database(context, e))?;
    Ok((items, total.unwrap_or(0)))
}

/// Positional column reader for a result row.
pub struct RowReader<'r> {
    row: &'r PgRow,
    index: usize,
}

impl<'r> RowReader<'r> {
    pub fn new(row: &'r PgRow) -> Self {
        Self { row, index: 0 }
    }

    fn next<T>(&mut self) -> std::result::Result<T, sqlx::Error>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        let value = self.row.try_get(self.index)?;
        self.index += 1;
        Ok(value)
    }

    /// A non-negative BIGINT column.
    pub fn uint(&mut self) -> std::result::Result<u64, sqlx::Error> {
        let index = self.index;
        let value: i64 = self.next()?;
        u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
            index: index.to_string(),
            source: Box::new(e),
        })
    }

    pub fn opt_uint(&mut self) -> std::result::Result<Option<u64>, sqlx::Error> {
        let index = self.index;
        let value: Option<i64> = self.next()?;
        value
            .map(u64::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: index.to_string(),
                source: Box::new(e),
            })
    }

    pub fn text(&mut self) -> std::result::Result<String, sqlx::Error> {
        self.next()
    }

    pub fn boolean(&mut self) -> std::result::Result<bool, sqlx::Error> {
        self.next()
    }

    pub fn real(&mut self) -> std::result::Result<f32, sqlx::Error> {
        self.next()
    }

    /// Read `created_on, last_updated_on, archived_on` for a record with `id`.
    pub fn lifecycle(&mut self, id: u64) -> std::result::Result<BaseRecord, sqlx::Error> {
        Ok(BaseRecord {
            id,
            created_on: self.uint()?,
            last_updated_on: self.opt_uint()?,
            archived_on: self.opt_uint()?,
        })
    }
}
