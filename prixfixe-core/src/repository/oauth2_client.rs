//! OAuth2 client repository
//!
//! Clients belong to a user and every read checks that user, except the
//! client-id lookup used while authenticating a token request.

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table, ARCHIVED_ON_COLUMN};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    join_scopes, split_scopes, BaseRecord, ListPage, OAuth2Client, OAuth2ClientCreationInput,
    QueryFilter,
};
use crate::error::Result;
use crate::querybuilding::{finish, select, Arg, Equals, Statement};
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "oauth2_clients",
    columns: &[
        "name",
        "client_id",
        "scopes",
        "redirect_uri",
        "client_secret",
    ],
    owner: Owner::User { scoped_reads: true },
    list_count: ListCount::Grouped,
};

fn build_get_by_client_id_query(client_id: &str) -> Statement {
    finish(
        select(TABLE.projection())
            .from(TABLE.name)
            .where_(
                Equals::new()
                    .is_null(TABLE.qualified(ARCHIVED_ON_COLUMN))
                    .and(TABLE.qualified("client_id"), client_id),
            )
            .to_sql(),
    )
}

fn build_get_all_clients_query() -> Statement {
    finish(
        select(TABLE.projection())
            .from(TABLE.name)
            .where_(Equals::new().is_null(TABLE.qualified(ARCHIVED_ON_COLUMN)))
            .to_sql(),
    )
}

impl Entity for OAuth2Client {
    type Input = OAuth2ClientCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            name: row.text()?,
            client_id: row.text()?,
            scopes: split_scopes(&row.text()?),
            redirect_uri: row.text()?,
            client_secret: row.text()?,
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
            ("client_id", Arg::from(&self.client_id)),
            ("client_secret", Arg::from(&self.client_secret)),
            ("scopes", Arg::from(join_scopes(&self.scopes))),
            ("redirect_uri", Arg::from(&self.redirect_uri)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("name", Arg::from(&input.name)),
            ("client_id", Arg::from(&input.client_id)),
            ("client_secret", Arg::from(&input.client_secret)),
            ("scopes", Arg::from(join_scopes(&input.scopes))),
            ("redirect_uri", Arg::from(&input.redirect_uri)),
            ("belongs_to_user", Arg::from(input.belongs_to_user)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            name: input.name.clone(),
            client_id: input.client_id.clone(),
            scopes: input.scopes.clone(),
            redirect_uri: input.redirect_uri.clone(),
            client_secret: input.client_secret.clone(),
            belongs_to_user: input.belongs_to_user,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuth2ClientRepository: Send + Sync {
    async fn exists(&self, user_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, user_id: u64, id: u64) -> Result<OAuth2Client>;
    /// Look a client up by its public client id, whoever owns it
    async fn get_by_client_id(&self, client_id: &str) -> Result<OAuth2Client>;
    /// Every un-archived client, unpaged
    async fn get_all_clients(&self) -> Result<Vec<OAuth2Client>>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<OAuth2Client>>) -> Result<()>;
    async fn list(&self, user_id: u64, filter: &QueryFilter) -> Result<ListPage<OAuth2Client>>;
    async fn create(&self, input: &OAuth2ClientCreationInput) -> Result<OAuth2Client>;
    async fn update(&self, client: &mut OAuth2Client) -> Result<()>;
    async fn archive(&self, user_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct OAuth2ClientRepositoryImpl {
    table: TableRepository<OAuth2Client>,
}

impl OAuth2ClientRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl OAuth2ClientRepository for OAuth2ClientRepositoryImpl {
    async fn exists(&self, user_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[user_id], id).await
    }

    async fn get(&self, user_id: u64, id: u64) -> Result<OAuth2Client> {
        self.table.get(&[user_id], id).await
    }

    async fn get_by_client_id(&self, client_id: &str) -> Result<OAuth2Client> {
        let statement = build_get_by_client_id_query(client_id);
        self.table
            .query_one("fetching oauth2 client by client id", &statement)
            .await
    }

    async fn get_all_clients(&self) -> Result<Vec<OAuth2Client>> {
        let statement = build_get_all_clients_query();
        self.table
            .query_many("fetching oauth2 clients", &statement)
            .await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<OAuth2Client>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(&self, user_id: u64, filter: &QueryFilter) -> Result<ListPage<OAuth2Client>> {
        self.table.list(&[user_id], filter).await
    }

    async fn create(&self, input: &OAuth2ClientCreationInput) -> Result<OAuth2Client> {
        self.table.create(input).await
    }

    async fn update(&self, client: &mut OAuth2Client) -> Result<()> {
        self.table.update(client).await
    }

    async fn archive(&self, user_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(user_id), id).await
    }
}
