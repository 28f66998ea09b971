//! Ingredient repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{BaseRecord, Ingredient, IngredientCreationInput, ListPage, QueryFilter};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "ingredients",
    columns: &[
        "name",
        "variant",
        "description",
        "warning",
        "contains_egg",
        "contains_dairy",
        "contains_peanut",
        "contains_tree_nut",
        "contains_soy",
        "contains_wheat",
        "contains_shellfish",
        "contains_sesame",
        "contains_fish",
        "contains_gluten",
        "animal_flesh",
        "animal_derived",
        "considered_staple",
        "icon",
    ],
    owner: Owner::Catalog,
    list_count: ListCount::Subquery,
};

macro_rules! ingredient_values {
    ($src:expr) => {
        vec![
            ("name", Arg::from(&$src.name)),
            ("variant", Arg::from(&$src.variant)),
            ("description", Arg::from(&$src.description)),
            ("warning", Arg::from(&$src.warning)),
            ("contains_egg", Arg::from($src.contains_egg)),
            ("contains_dairy", Arg::from($src.contains_dairy)),
            ("contains_peanut", Arg::from($src.contains_peanut)),
            ("contains_tree_nut", Arg::from($src.contains_tree_nut)),
            ("contains_soy", Arg::from($src.contains_soy)),
            ("contains_wheat", Arg::from($src.contains_wheat)),
            ("contains_shellfish", Arg::from($src.contains_shellfish)),
            ("contains_sesame", Arg::from($src.contains_sesame)),
            ("contains_fish", Arg::from($src.contains_fish)),
            ("contains_gluten", Arg::from($src.contains_gluten)),
            ("animal_flesh", Arg::from($src.animal_flesh)),
            ("animal_derived", Arg::from($src.animal_derived)),
            ("considered_staple", Arg::from($src.considered_staple)),
            ("icon", Arg::from(&$src.icon)),
        ]
    };
}

impl Entity for Ingredient {
    type Input = IngredientCreationInput;

    fn table() -> &'static Table {
        &TABLE
    }

    fn scan(row: &mut RowReader<'_>) -> std::result::Result<Self, sqlx::Error> {
        let id = row.uint()?;
        Ok(Self {
            name: row.text()?,
            variant: row.text()?,
            description: row.text()?,
            warning: row.text()?,
            contains_egg: row.boolean()?,
            contains_dairy: row.boolean()?,
            contains_peanut: row.boolean()?,
            contains_tree_nut: row.boolean()?,
            contains_soy: row.boolean()?,
            contains_wheat: row.boolean()?,
            contains_shellfish: row.boolean()?,
            contains_sesame: row.boolean()?,
            contains_fish: row.boolean()?,
            contains_gluten: row.boolean()?,
            animal_flesh: row.boolean()?,
            animal_derived: row.boolean()?,
            considered_staple: row.boolean()?,
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
        ingredient_values!(self)
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        ingredient_values!(input)
    }

    fn from_input(input: &Self::Input, base: BaseRecord) -> Self {
        Self {
            base,
            name: input.name.clone(),
            variant: input.variant.clone(),
            description: input.description.clone(),
            warning: input.warning.clone(),
            contains_egg: input.contains_egg,
            contains_dairy: input.contains_dairy,
            contains_peanut: input.contains_peanut,
            contains_tree_nut: input.contains_tree_nut,
            contains_soy: input.contains_soy,
            contains_wheat: input.contains_wheat,
            contains_shellfish: input.contains_shellfish,
            contains_sesame: input.contains_sesame,
            contains_fish: input.contains_fish,
            contains_gluten: input.contains_gluten,
            animal_flesh: input.animal_flesh,
            animal_derived: input.animal_derived,
            considered_staple: input.considered_staple,
            icon: input.icon.clone(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    async fn exists(&self, id: u64) -> Result<bool>;
    async fn get(&self, id: u64) -> Result<Ingredient>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<Ingredient>>) -> Result<()>;
    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Ingredient>>;
    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Ingredient>>;
    async fn create(&self, input: &IngredientCreationInput) -> Result<Ingredient>;
    async fn update(&self, ingredient: &mut Ingredient) -> Result<()>;
    async fn archive(&self, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct IngredientRepositoryImpl {
    table: TableRepository<Ingredient>,
}

impl IngredientRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl IngredientRepository for IngredientRepositoryImpl {
    async fn exists(&self, id: u64) -> Result<bool> {
        self.table.exists(&[], id).await
    }

    async fn get(&self, id: u64) -> Result<Ingredient> {
        self.table.get(&[], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<Ingredient>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<Ingredient>> {
        self.table.get_with_ids(ids, limit).await
    }

    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<Ingredient>> {
        self.table.list(&[], filter).await
    }

    async fn create(&self, input: &IngredientCreationInput) -> Result<Ingredient> {
        self.table.create(input).await
    }

    async fn update(&self, ingredient: &mut Ingredient) -> Result<()> {
        self.table.update(ingredient).await
    }

    async fn archive(&self, id: u64) -> Result<()> {
        self.table.archive(None, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sorghum() -> IngredientCreationInput {
        IngredientCreationInput {
            name: "sorghum".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_create_query() {
        let stmt = TABLE.build_create_query(Ingredient::insert_values(&sorghum()));
        assert_eq!(
            stmt.sql,
            "INSERT INTO ingredients (name,variant,description,warning,contains_egg,contains_dairy,contains_peanut,contains_tree_nut,contains_soy,contains_wheat,contains_shellfish,contains_sesame,contains_fish,contains_gluten,animal_flesh,animal_derived,considered_staple,icon) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18) RETURNING id, created_on"
        );
        assert_eq!(stmt.args[0], Arg::Text("sorghum".to_string()));
        assert_eq!(stmt.args[1], Arg::Text(String::new()));
        assert!(stmt.args[4..17].iter().all(|a| *a == Arg::Bool(false)));
    }

    #[test]
    fn test_created_record_mirrors_input() {
        let base = BaseRecord {
            id: 1,
            created_on: 1_600_000_000,
            ..Default::default()
        };
        let ingredient = Ingredient::from_input(&sorghum(), base);
        assert_eq!(ingredient.base.id, 1);
        assert_eq!(ingredient.name, "sorghum");
        assert!(!ingredient.contains_gluten);
        assert!(!ingredient.considered_staple);
        assert_eq!(ingredient.base.last_updated_on, None);
    }

    #[test]
    fn test_build_exists_query() {
        let stmt = TABLE.build_exists_query(&[], 5).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT EXISTS ( SELECT ingredients.id FROM ingredients WHERE ingredients.archived_on IS NULL AND ingredients.id = $1 )"
        );
        assert_eq!(stmt.args, vec![Arg::BigInt(5)]);
    }

    #[test]
    fn test_projection_reads_columns_in_insert_order() {
        let inserted: Vec<String> = Ingredient::insert_values(&sorghum())
            .into_iter()
            .map(|(column, _)| TABLE.qualified(column))
            .collect();
        let projection = TABLE.projection();
        assert_eq!(projection[0], "ingredients.id");
        assert_eq!(projection[1..=inserted.len()].to_vec(), inserted);
    }
}
