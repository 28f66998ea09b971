//! Preparation repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, ListPage, Preparation, PreparationCreationInput, QueryFilter};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "preparations",
    columns: &["name", "variant", "description", "allergy_warning", "icon"],
    owner: Owner::Catalog,
    list_count: ListCount::Subquery,
};

impl Entity for Preparation {
    type Input = PreparationCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            name: row.text()?,
            variant: row.text()?,
            description: row.text()?,
            allergy_warning: row.text()?,
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
            ("allergy_warning", Arg::from(&self.allergy_warning)),
            ("icon", Arg::from(&self.icon)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("name", Arg::from(&input.name)),
            ("variant", Arg::from(&input.variant)),
            ("description", Arg::from(&input.description)),
            ("allergy_warning", Arg::from(&input.allergy_warning)),
            ("icon", Arg::from(&input.icon)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            name: input.name.clone(),
            variant: input.variant.clone(),
            description: input.description.clone(),
            allergy_warning: input.allergy_warning.clone(),
            icon: input.icon.clone(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreparationRepository: Send + Sync {
    async fn exists(&self, id: u64) -> Result<bool>;
    async fn get(&self, id: u64) -> Result<Preparation>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<Preparation>>) -> Result<()>;
    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Preparation>>;
    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Preparation>>;
    async fn create(&self, input: &PreparationCreationInput) -> Result<Preparation>;
    async fn update(&self, preparation: &mut Preparation) -> Result<()>;
    async fn archive(&self, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct PreparationRepositoryImpl {
    table: TableRepository<Preparation>,
}

impl PreparationRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl PreparationRepository for PreparationRepositoryImpl {
    async fn exists(&self, id: u64) -> Result<bool> {
        self.table.exists(&[], id).await
    }

    async fn get(&self, id: u64) -> Result<Preparation> {
        self.table.get(&[], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<Preparation>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Preparation>> {
        self.table.get_with_ids(ids, limit).await
    }

    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Preparation>> {
        self.table.list(&[], filter).await
    }

    async fn create(&self, input: &PreparationCreationInput) -> Result<Preparation> {
        self.table.create(input).await
    }

    async fn update(&self, preparation: &mut Preparation) -> Result<()> {
        self.table.update(preparation).await
    }

    async fn archive(&self, id: u64) -> Result<()> {
        self.table.archive(None, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_get_with_ids_query() {
        let stmt = TABLE.build_get_with_ids_query(&[7, 2, 9], 3).unwrap();
        let columns = "preparations.id, preparations.name, preparations.variant, preparations.description, preparations.allergy_warning, preparations.icon, preparations.created_on, preparations.last_updated_on, preparations.archived_on";
        assert_eq!(
            stmt.sql,
            format!(
                "SELECT {c} FROM (SELECT {c} FROM preparations JOIN unnest('{{7,2,9}}'::int[]) WITH ORDINALITY t(id, ord) USING (id) ORDER BY t.ord LIMIT 3) AS preparations WHERE preparations.archived_on IS NULL",
                c = columns
            )
        );
        assert!(stmt.args.is_empty());
    }

    #[test]
    fn test_build_list_query_with_update_range() {
        let filter = QueryFilter {
            updated_after: Some(50),
            updated_before: Some(60),
            ..Default::default()
        };
        let stmt = TABLE.build_list_query(&[], &filter).unwrap();
        assert!(stmt.sql.contains(
            "WHERE preparations.archived_on IS NULL AND preparations.last_updated_on > $3 AND preparations.last_updated_on < $4 ORDER BY"
        ));
        assert_eq!(stmt.args.len(), 4);
    }

    #[test]
    fn test_page_past_the_end_has_a_standalone_count() {
        let filter = QueryFilter {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        let list = TABLE.build_list_query(&[], &filter).unwrap();
        assert!(list.sql.ends_with("ORDER BY preparations.id LIMIT 10 OFFSET 20"));

        let count = TABLE.build_filtered_count_query(&[], &filter).unwrap();
        assert_eq!(
            count.sql,
            "SELECT COUNT(preparations.id) FROM preparations WHERE preparations.archived_on IS NULL"
        );
    }
}
