//! Recipe step ingredient repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{Link, ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, ListPage, QueryFilter, RecipeStepIngredient, RecipeStepIngredientCreationInput,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "recipe_step_ingredients",
    columns: &[
        "ingredient_id",
        "quantity_type",
        "quantity_value",
        "quantity_notes",
        "product_of_recipe",
        "ingredient_notes",
    ],
    owner: Owner::Parents(&[
        Link {
            column: "belongs_to_recipe_step",
            parent: "recipe_steps",
        },
        Link {
            column: "belongs_to_recipe",
            parent: "recipes",
        },
    ]),
    list_count: ListCount::Subquery,
};

impl Entity for RecipeStepIngredient {
    type Input = RecipeStepIngredientCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            ingredient_id: row.opt_uint()?,
            quantity_type: row.text()?,
            quantity_value: row.real()?,
            quantity_notes: row.text()?,
            product_of_recipe: row.boolean()?,
            ingredient_notes: row.text()?,
            base: row.lifecycle(id)?,
            belongs_to_recipe_step: row.uint()?,
        })
    }

    fn base(&self) -> &BaseRecord {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseRecord {
        &mut self.base
    }

    fn owner_id(&self) -> Option<u64> {
        Some(self.belongs_to_recipe_step)
    }

    fn update_values(&self) -> Vec<(&'static str, Arg)> {
        vec![
            ("ingredient_id", Arg::from(self.ingredient_id)),
            ("quantity_type", Arg::from(&self.quantity_type)),
            ("quantity_value", Arg::from(self.quantity_value)),
            ("quantity_notes", Arg::from(&self.quantity_notes)),
            ("product_of_recipe", Arg::from(self.product_of_recipe)),
            ("ingredient_notes", Arg::from(&self.ingredient_notes)),
        ]
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        vec![
            ("ingredient_id", Arg::from(input.ingredient_id)),
            ("quantity_type", Arg::from(&input.quantity_type)),
            ("quantity_value", Arg::from(input.quantity_value)),
            ("quantity_notes", Arg::from(&input.quantity_notes)),
            ("product_of_recipe", Arg::from(input.product_of_recipe)),
            ("ingredient_notes", Arg::from(&input.ingredient_notes)),
            ("belongs_to_recipe_step", Arg::from(input.belongs_to_recipe_step)),
        ]
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            ingredient_id: input.ingredient_id,
            quantity_type: input.quantity_type.clone(),
            quantity_value: input.quantity_value,
            quantity_notes: input.quantity_notes.clone(),
            product_of_recipe: input.product_of_recipe,
            ingredient_notes: input.ingredient_notes.clone(),
            belongs_to_recipe_step: input.belongs_to_recipe_step,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStepIngredientRepository: Send + Sync {
    async fn exists(&self, recipe_id: u64, recipe_step_id: u64, id: u64) -> Result<bool>;
    async fn get(
        &self,
        recipe_id: u64,
        recipe_step_id: u64,
        id: u64,
    ) -> Result<RecipeStepIngredient>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeStepIngredient>>) -> Result<()>;
    async fn list(
        &self,
        recipe_id: u64,
        recipe_step_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeStepIngredient>>;
    async fn create(
        &self,
        input: &RecipeStepIngredientCreationInput,
    ) -> Result<RecipeStepIngredient>;
    async fn update(&self, ingredient: &mut RecipeStepIngredient) -> Result<()>;
    async fn archive(&self, recipe_step_id: u64, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct RecipeStepIngredientRepositoryImpl {
    table: TableRepository<RecipeStepIngredient>,
}

impl RecipeStepIngredientRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl RecipeStepIngredientRepository for RecipeStepIngredientRepositoryImpl {
    async fn exists(&self, recipe_id: u64, recipe_step_id: u64, id: u64) -> Result<bool> {
        self.table.exists(&[recipe_id, recipe_step_id], id).await
    }

    async fn get(
        &self,
        recipe_id: u64,
        recipe_step_id: u64,
        id: u64,
    ) -> Result<RecipeStepIngredient> {
        self.table.get(&[recipe_id, recipe_step_id], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<RecipeStepIngredient>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn list(
        &self,
        recipe_id: u64,
        recipe_step_id: u64,
        filter: &QueryFilter,
    ) -> Result<ListPage<RecipeStepIngredient>> {
        self.table.list(&[recipe_id, recipe_step_id], filter).await
    }

    async fn create(
        &self,
        input: &RecipeStepIngredientCreationInput,
    ) -> Result<RecipeStepIngredient> {
        self.table.create(input).await
    }

    async fn update(&self, ingredient: &mut RecipeStepIngredient) -> Result<()> {
        self.table.update(ingredient).await
    }

    async fn archive(&self, recipe_step_id: u64, id: u64) -> Result<()> {
        self.table.archive(Some(recipe_step_id), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_create_query() {
        let input = RecipeStepIngredientCreationInput {
            ingredient_id: None,
            quantity_type: "grams".to_string(),
            quantity_value: 250.0,
            quantity_notes: String::new(),
            product_of_recipe: true,
            ingredient_notes: String::new(),
            belongs_to_recipe_step: 20,
        };
        let stmt = TABLE.build_create_query(RecipeStepIngredient::insert_values(&input));
        assert_eq!(
            stmt.sql,
            "INSERT INTO recipe_step_ingredients (ingredient_id,quantity_type,quantity_value,quantity_notes,product_of_recipe,ingredient_notes,belongs_to_recipe_step) VALUES ($1,$2,$3,$4,$5,$6,$7) RETURNING id, created_on"
        );
        assert_eq!(stmt.args[0], Arg::NullableBigInt(None));
        assert_eq!(stmt.args[2], Arg::Real(250.0));
        assert_eq!(stmt.args[4], Arg::Bool(true));
    }

    #[test]
    fn test_build_list_query_without_filter() {
        let stmt = TABLE
            .build_list_query(&[10, 20], &QueryFilter::default())
            .unwrap();
        assert!(stmt.sql.contains(
            "(SELECT COUNT(recipe_step_ingredients.id) FROM recipe_step_ingredients JOIN recipe_steps ON recipe_step_ingredients.belongs_to_recipe_step=recipe_steps.id JOIN recipes ON recipe_steps.belongs_to_recipe=recipes.id WHERE recipe_step_ingredients.archived_on IS NULL AND recipe_step_ingredients.belongs_to_recipe_step = $1 AND recipe_steps.belongs_to_recipe = $2 AND recipe_steps.id = $3 AND recipes.id = $4)"
        ));
        assert!(stmt.sql.ends_with("ORDER BY recipe_step_ingredients.id LIMIT 20"));
        assert_eq!(stmt.args.len(), 8);
    }
}
