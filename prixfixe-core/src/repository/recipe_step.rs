//! Recipe step repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, ListPage, QueryFilter, RecipeStep, RecipeStepCreationInput};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "recipe_steps",
    columns: &[
        "index",
        "preparation_id",
        "prerequisite_step",
        "min_estimated_time_in_seconds",
        "max_estimated_time_in_seconds",
        "temperature_in_celsius",
        "notes",
        "recipe_id",
    ],
    owner: Owner::Parents(&[Link {
        column: "belongs_to_recipe",
        parent: "recipes",
    }]),
    list_count: ListCount::Subquery,
};

impl Entity for RecipeStep {
    type Input = RecipeStepCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            index: row.uint()?,
            preparation_id: row.uint()?,
            prerequisite_step: row.uint()?,
            min_estimated_time_in_seconds: row.uint()?,
            max_estimated_time_in_seconds: row.uint()?,
            temperature_in_celsius: row.opt_uint()?,
            notes: row.text()?,
            recipe_id: row.uint()?,
            base: row.lifecycle(id)?,
            belongs_to_recipe: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_recipe)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("index", Arg::from(self.index)),
            ("preparation_id", Arg::from(self.preparation_id)),
            ("prerequisite_step", Arg::from(self.prerequisite_step)),
            (
                "min_estimated_time_in_seconds",
                Arg::from(self.min_estimated_time_in_seconds),
            ),
            (
                "max_estimated_time_in_seconds",
                Arg::from(self.max_estimated_time_in_seconds),
            ),
            ("temperature_in_celsius", Arg::from(self.temperature_in_celsius)),
            ("notes", Arg::from(&self.notes)),
            ("recipe_id", Arg::from(self.recipe_id)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("index", Arg::from(input.index)),
            ("preparation_id", Arg::from(input.preparation_id)),
            ("prerequisite_step", Arg::from(input.prerequisite_step)),
            (
                "min_estimated_time_in_seconds",
                Arg::from(input.min_estimated_time_in_seconds),
            ),
            (
                "max_estimated_time_in_seconds",
                Arg::from(input.max_estimated_time_in_seconds),
            ),
            ("temperature_in_celsius", Arg::from(input.temperature_in_celsius)),
            ("notes", Arg::from(&input.notes)),
            ("recipe_id", Arg::from(input.recipe_id)),
            ("belongs_to_recipe", Arg::from(input.belongs_to_recipe)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            index: input.index,
            preparation_id: input.preparation_id,
            prerequisite_step: input.prerequisite_step,
            min_estimated_time_in_seconds: input.min_estimated_time_in_seconds,
            max_estimated_time_in_seconds: input.max_estimated_time_in_seconds,
            temperature_in_celsius: input.temperature_in_celsius,
            notes: input.notes.clone(),
            recipe_id: input.recipe_id,
            belongs_to_recipe: input.belongs_to_recipe,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStepRepository: Send + Sync {
    async fn exists(&self, recipe_id: u64, id: u64) -> Result<bool>;
    async fn get(&self, recipe_id: u64, id: u64) -> Result<RecipeStep>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeStep>>) -> Result<()>;
    async fn list(&self, recipe_id: u64, filter: &QueryFilter) -> Result<ListPage<RecipeStep>>;
    async fn create(&self, input: &RecipeStepCreationInput) -> Result<RecipeStep>;
    async fn update(&self, step: &mut RecipeStep) -> Result<()>;
    async fn archive(&self, recipe_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct RecipeStepRepositoryImpl {
    table: TableRepository<RecipeStep>,
}

impl RecipeStepRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl RecipeStepRepository for RecipeStepRepositoryImpl {
    async fn exists(&self, recipe_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[recipe_id], id).await
    }

    async fn get(&self, recipe_id: u64, id: u64) -> Result<RecipeStep> {
        self.table.get(&[recipe_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeStep>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(&self, recipe_id: u64, filter: &QueryFilter) -> Result<ListPage<RecipeStep>> {
        self.table.list(&[recipe_id], filter).await
    }

    async fn create(&self, input: &RecipeStepCreationInput) -> Result<RecipeStep> {
        self.table.create(input).await
    }

    async fn update(&self, step: &mut RecipeStep) -> Result<()> {
        self.table.update(step).await
    }

    async fn archive(&self, recipe_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(recipe_id), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_list_query_with_filter() {
        let filter = QueryFilter {
            page: 2,
            limit: 5,
            created_after: Some(100),
            created_before: Some(200),
            ..Default::default()
        };
        let stmt = TABLE.build_list_query(&[10], &filter).unwrap();

        let chain = "recipe_steps.archived_on IS NULL AND recipe_steps.belongs_to_recipe = ${} AND recipes.id = ${} AND recipe_steps.created_on > ${} AND recipe_steps.created_on < ${}";
        let numbered = |first: usize| {
            let mut out = chain.to_string();
            for n in first..first + 4 {
                out = out.replacen("${}", &format!("${}", n), 1);
            }
            out
        };
        assert!(stmt.sql.contains(&format!(
            "(SELECT COUNT(recipe_steps.id) FROM recipe_steps JOIN recipes ON recipe_steps.belongs_to_recipe=recipes.id WHERE {})",
            numbered(1)
        )));
        assert!(stmt.sql.ends_with(&format!(
            "FROM recipe_steps JOIN recipes ON recipe_steps.belongs_to_recipe=recipes.id WHERE {} ORDER BY recipe_steps.id LIMIT 5 OFFSET 5",
            numbered(5)
        )));
        assert_eq!(
            stmt.args,
            [10u64, 10, 100, 200, 10, 10, 100, 200]
                .into_iter()
                .map(Arg::BigInt)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_scan_order_matches_projection() {
        let projection = TABLE.projection();
        assert_eq!(projection[1], "recipe_steps.index");
        assert_eq!(projection[6], "recipe_steps.temperature_in_celsius");
        assert_eq!(projection.last().unwrap(), "recipe_steps.belongs_to_recipe");
    }
}
