//! The PostgreSQL-backed data manager

use super::Database;
use crate::config::{BatchConfig, Config};
use crate::error::Result;
use crate::migration::{Migrate, SchemaMigrator};
use crate::repository::{
    IngredientRepositoryImpl, IngredientTagMappingRepositoryImpl, InstrumentRepositoryImpl,
    InvitationRepositoryImpl, IterationMediaRepositoryImpl, OAuth2ClientRepositoryImpl,
    PreparationRepositoryImpl, RecipeIterationRepositoryImpl, RecipeIterationStepRepositoryImpl,
    RecipeRepositoryImpl, RecipeStepEventRepositoryImpl, RecipeStepIngredientRepositoryImpl,
    RecipeStepRepositoryImpl, ValidIngredientPreparationRepositoryImpl,
    ValidIngredientRepositoryImpl,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// One connection pool shared by a repository per table.
#[derive(Clone)]
pub struct Postgres {
    db: Database,
    migrator: Arc<dyn Migrate>,
    migrated: Arc<OnceCell<()>>,
    pub valid_ingredients: Arc<ValidIngredientRepositoryImpl>,
    pub ingredients: Arc<IngredientRepositoryImpl>,
    pub instruments: Arc<InstrumentRepositoryImpl>,
    pub preparations: Arc<PreparationRepositoryImpl>,
    pub ingredient_tag_mappings: Arc<IngredientTagMappingRepositoryImpl>,
    pub valid_ingredient_preparations: Arc<ValidIngredientPreparationRepositoryImpl>,
    pub recipes: Arc<RecipeRepositoryImpl>,
    pub recipe_steps: Arc<RecipeStepRepositoryImpl>,
    pub recipe_step_ingredients: Arc<RecipeStepIngredientRepositoryImpl>,
    pub recipe_step_events: Arc<RecipeStepEventRepositoryImpl>,
    pub recipe_iterations: Arc<RecipeIterationRepositoryImpl>,
    pub recipe_iteration_steps: Arc<RecipeIterationStepRepositoryImpl>,
    pub iteration_medias: Arc<IterationMediaRepositoryImpl>,
    pub invitations: Arc<InvitationRepositoryImpl>,
    pub oauth2_clients: Arc<OAuth2ClientRepositoryImpl>,
}

impl Postgres {
    /// Open the pool described by `config` and wire every repository to it.
    pub fn provide(config: &Config) -> Result<Self> {
        let db = Database::connect(&config.database)?;
        Ok(Self::new(db, config.batch))
    }

    pub fn new(db: Database, batch: BatchConfig) -> Self {
        debug!(
            bucket_size = batch.bucket_size,
            concurrency = batch.concurrency,
            "building postgres repositories"
        );

        Self {
            valid_ingredients: Arc::new(ValidIngredientRepositoryImpl::new(db.clone(), batch)),
            ingredients: Arc::new(IngredientRepositoryImpl::new(db.clone(), batch)),
            instruments: Arc::new(InstrumentRepositoryImpl::new(db.clone(), batch)),
            preparations: Arc::new(PreparationRepositoryImpl::new(db.clone(), batch)),
            ingredient_tag_mappings: Arc::new(IngredientTagMappingRepositoryImpl::new(
                db.clone(),
                batch,
            )),
            valid_ingredient_preparations: Arc::new(
                ValidIngredientPreparationRepositoryImpl::new(db.clone(), batch),
            ),
            recipes: Arc::new(RecipeRepositoryImpl::new(db.clone(), batch)),
            recipe_steps: Arc::new(RecipeStepRepositoryImpl::new(db.clone(), batch)),
            recipe_step_ingredients: Arc::new(RecipeStepIngredientRepositoryImpl::new(
                db.clone(),
                batch,
            )),
            recipe_step_events: Arc::new(RecipeStepEventRepositoryImpl::new(db.clone(), batch)),
            recipe_iterations: Arc::new(RecipeIterationRepositoryImpl::new(db.clone(), batch)),
            recipe_iteration_steps: Arc::new(RecipeIterationStepRepositoryImpl::new(
                db.clone(),
                batch,
            )),
            iteration_medias: Arc::new(IterationMediaRepositoryImpl::new(db.clone(), batch)),
            invitations: Arc::new(InvitationRepositoryImpl::new(db.clone(), batch)),
            oauth2_clients: Arc::new(OAuth2ClientRepositoryImpl::new(db.clone(), batch)),
            migrator: Arc::new(SchemaMigrator::default()),
            migrated: Arc::new(OnceCell::new()),
            db,
        }
    }

    /// Replace the schema migrator. Has no effect once `migrate` has succeeded.
    pub fn with_migrator(mut self, migrator: Arc<dyn Migrate>) -> Self {
        self.migrator = migrator;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn is_ready(&self) -> bool {
        self.db.is_ready().await
    }

    /// Apply the schema. Only the first successful call does any work;
    /// clones share the guard.
    pub async fn migrate(&self) -> Result<()> {
        self.migrated
            .get_or_try_init(|| async {
                debug!("migrating database");
                self.migrator.migrate(self.db.pool()).await
            })
            .await?;
        Ok(())
    }
}
