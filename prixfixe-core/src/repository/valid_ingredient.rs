//! Valid ingredient repository

use super::crud::{Entity, TableRepository};
use super::scanner::RowReader;
use super::table::{ListCount, Owner, Table};
use crate::config::BatchConfig;
use crate::database::Database;
use crate::domain::{
    BaseRecord, ListPage, QueryFilter, ValidIngredient, ValidIngredientCreationInput,
};
use crate::error::Result;
use crate::querybuilding::Arg;
use async_trait::async_trait;
use tokio::sync::mpsc;

pub(crate) static TABLE: Table = Table {
    name: "valid_ingredients",
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
        "measurable_by_volume",
        "icon",
    ],
    owner: Owner::Catalog,
    list_count: ListCount::Subquery,
};

macro_rules! valid_ingredient_values {
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
            ("measurable_by_volume", Arg::from($src.measurable_by_volume)),
            ("icon", Arg::from(&$src.icon)),
        ]
    };
}

impl Entity for ValidIngredient {
    type Input = ValidIngredientCreationInput;

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
            measurable_by_volume: row.boolean()?,
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
        valid_ingredient_values!(self)
    }

    fn insert_values(input: &Self::Input) -> Vec<(&'static str, Arg)> {
        valid_ingredient_values!(input)
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
            measurable_by_volume: input.measurable_by_volume,
            icon: input.icon.clone(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidIngredientRepository: Send + Sync {
    async fn exists(&self, id: u64) -> Result<bool>;
    async fn get(&self, id: u64) -> Result<ValidIngredient>;
    async fn get_all_count(&self) -> Result<u64>;
    async fn get_all(&self, results: mpsc::Sender<Vec<ValidIngredient>>) -> Result<()>;
    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<ValidIngredient>>;
    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<ValidIngredient>>;
    async fn create(&self, input: &ValidIngredientCreationInput) -> Result<ValidIngredient>;
    async fn update(&self, ingredient: &mut ValidIngredient) -> Result<()>;
    async fn archive(&self, id: u64) -> Result<()>;
}

#[derive(Clone)]
pub struct ValidIngredientRepositoryImpl {
    table: TableRepository<ValidIngredient>,
}

impl ValidIngredientRepositoryImpl {
    pub fn new(db: Database, batch: BatchConfig) -> Self {
        Self {
            table: TableRepository::new(db, batch),
        }
    }
}

#[async_trait]
impl ValidIngredientRepository for ValidIngredientRepositoryImpl {
    async fn exists(&self, id: u64) -> Result<bool> {
        self.table.exists(&[], id).await
    }

    async fn get(&self, id: u64) -> Result<ValidIngredient> {
        self.table.get(&[], id).await
    }

    async fn get_all_count(&self) -> Result<u64> {
        self.table.get_all_count().await
    }

    async fn get_all(&self, results: mpsc::Sender<Vec<ValidIngredient>>) -> Result<()> {
        self.table.get_all(results).await
    }

    async fn get_with_ids(&self, ids: &[u64], limit: u8) -> Result<Vec<ValidIngredient>> {
        self.table.get_with_ids(ids, limit).await
    }

    async fn list(&self, filter: &QueryFilter) -> Result<ListPage<ValidIngredient>> {
        self.table.list(&[], filter).await
    }

    async fn create(&self, input: &ValidIngredientCreationInput) -> Result<ValidIngredient> {
        self.table.create(input).await
    }

    async fn update(&self, ingredient: &mut ValidIngredient) -> Result<()> {
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

    const COLUMNS: &str = "valid_ingredients.id, valid_ingredients.name, valid_ingredients.variant, valid_ingredients.description, valid_ingredients.warning, valid_ingredients.contains_egg, valid_ingredients.contains_dairy, valid_ingredients.contains_peanut, valid_ingredients.contains_tree_nut, valid_ingredients.contains_soy, valid_ingredients.contains_wheat, valid_ingredients.contains_shellfish, valid_ingredients.contains_sesame, valid_ingredients.contains_fish, valid_ingredients.contains_gluten, valid_ingredients.animal_flesh, valid_ingredients.animal_derived, valid_ingredients.measurable_by_volume, valid_ingredients.icon, valid_ingredients.created_on, valid_ingredients.last_updated_on, valid_ingredients.archived_on";

    #[test]
    fn test_build_get_query() {
        let stmt = TABLE.build_get_query(&[], 123).unwrap();
        assert_eq!(
            stmt.sql,
            format!("SELECT {} FROM valid_ingredients WHERE valid_ingredients.archived_on IS NULL AND valid_ingredients.id = $1", COLUMNS)
        );
        assert_eq!(stmt.args, vec![Arg::BigInt(123)]);
    }

    #[test]
    fn test_build_list_query_with_filter() {
        let filter = QueryFilter {
            page: 2,
            limit: 5,
            created_after: Some(100),
            created_before: Some(200),
            ..Default::default()
        };
        let stmt = TABLE.build_list_query(&[], &filter).unwrap();
        assert_eq!(
            stmt.sql,
            format!(
                "SELECT {}, (SELECT COUNT(valid_ingredients.id) FROM valid_ingredients WHERE valid_ingredients.archived_on IS NULL AND valid_ingredients.created_on > $1 AND valid_ingredients.created_on < $2) FROM valid_ingredients WHERE valid_ingredients.archived_on IS NULL AND valid_ingredients.created_on > $3 AND valid_ingredients.created_on < $4 ORDER BY valid_ingredients.id LIMIT 5 OFFSET 5",
                COLUMNS
            )
        );
        assert_eq!(
            stmt.args,
            vec![
                Arg::BigInt(100),
                Arg::BigInt(200),
                Arg::BigInt(100),
                Arg::BigInt(200)
            ]
        );
    }

    #[test]
    fn test_build_archive_query() {
        let stmt = TABLE.build_archive_query(None, 9);
        assert_eq!(
            stmt.sql,
            "UPDATE valid_ingredients SET last_updated_on = extract(epoch FROM NOW()), archived_on = extract(epoch FROM NOW()) WHERE archived_on IS NULL AND id = $1 RETURNING archived_on"
        );
        assert_eq!(stmt.args, vec![Arg::BigInt(9)]);
    }

    #[test]
    fn test_update_writes_every_data_column() {
        let ingredient = ValidIngredient {
            base: BaseRecord {
                id: 4,
                ..Default::default()
            },
            name: "sorghum".to_string(),
            ..Default::default()
        };
        let stmt = TABLE.build_update_query(ingredient.update_values(), ingredient.owner_id(), 4);
        assert!(stmt.sql.starts_with("UPDATE valid_ingredients SET name = $1, variant = $2"));
        assert!(stmt.sql.ends_with(
            "icon = $18, last_updated_on = extract(epoch FROM NOW()) WHERE id = $19 RETURNING last_updated_on"
        ));
        assert_eq!(stmt.args.len(), 19);
    }

    #[test]
    fn test_build_get_batch_query_includes_archived_rows() {
        let stmt = TABLE.build_get_batch_query(0, 1001);
        assert_eq!(
            stmt.sql,
            format!(
                "SELECT {} FROM valid_ingredients WHERE valid_ingredients.id > $1 AND valid_ingredients.id < $2",
                COLUMNS
            )
        );
        assert_eq!(stmt.args, vec![Arg::BigInt(0), Arg::BigInt(1001)]);
    }
}
