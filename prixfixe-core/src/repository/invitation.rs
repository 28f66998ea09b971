//! Invitation repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, Invitation, InvitationCreationInput, ListPage, QueryFilter};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "invitations",
    columns: &["code", "consumed"],
    owner: Owner::User {
        scoped_reads: false,
    },
    list_count: ListCount::Subquery,
};

impl Entity for Invitation {
    type Input = InvitationCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            code: row.text()?,
            consumed: row.boolean()?,
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
            ("code", Arg::from(&self.code)),
            ("consumed", Arg::from(self.consumed)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("code", Arg::from(&input.code)),
            ("consumed", Arg::from(input.consumed)),
            ("belongs_to_user", Arg::from(input.belongs_to_user)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            code: input.code.clone(),
            consumed: input.consumed,
            belongs_to_user: input.belongs_to_user,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn exists(&self, id: u64) -> Result<bool>;
    async fn get(&self, id: u64) -> Result<Invitation>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<Invitation>>) -> Result<()>;
    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Invitation>>;
    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Invitation>>;
    /// Create an invitation; a duplicate code fails with a unique violation
    async fn create(&self, input: &InvitationCreationInput) -> Result<Invitation>;
    async fn update(&self, invitation: &mut Invitation) -> Result<()>;
    async fn archive(&self, user_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct InvitationRepositoryImpl {
    table: TableRepository<Invitation>,
}

impl InvitationRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl InvitationRepository for InvitationRepositoryImpl {
    async fn exists(&self, id: u64) -> Result<bool> {
        self.table.exists(&[], id).await
    }

    async fn get(&self, id: u64) -> Result<Invitation> {
        self.table.get(&[], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<Invitation>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Invitation>> {
        self.table.get_with_ids(ids, limit).await
    }

    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Invitation>> {
        self.table.list(&[], filter).await
    }

    async fn create(&self, input: &InvitationCreationInput) -> Result<Invitation> {
        self.table.create(input).await
    }

    async fn update(&self, invitation: &mut Invitation) -> Result<()> {
        self.table.update(invitation).await
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
    fn test_build_list_query_page_two() {
        let filter = QueryFilter {
            page: 2,
            ..Default::default()
        };
        let stmt = TABLE.build_list_query(&[], &filter).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT invitations.id, invitations.code, invitations.consumed, invitations.created_on, invitations.last_updated_on, invitations.archived_on, invitations.belongs_to_user, (SELECT COUNT(invitations.id) FROM invitations WHERE invitations.archived_on IS NULL) FROM invitations WHERE invitations.archived_on IS NULL ORDER BY invitations.id LIMIT 20 OFFSET 20"
        );
    }

    #[test]
    fn test_build_archive_query() {
        let stmt = TABLE.build_archive_query(Some(1), 2);
        assert_eq!(
            stmt.sql,
            "UPDATE invitations SET last_updated_on = extract(epoch FROM NOW()), archived_on = extract(epoch FROM NOW()) WHERE archived_on IS NULL AND belongs_to_user = $1 AND id = $2 RETURNING archived_on"
        );
    }

    #[test]
    fn test_reads_are_not_user_scoped() {
        let stmt = TABLE.build_exists_query(&[], 2).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT EXISTS ( SELECT invitations.id FROM invitations WHERE invitations.archived_on IS NULL AND invitations.id = $1 )"
        );

        let err = TABLE.build_get_query(&[1], 2).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }
}
