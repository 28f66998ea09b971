//! Table descriptors and the statements every entity table shares.
//!
//! A [`Table`] names its data columns and how it hangs off the ownership
//! tree. Reads on a child table join every ancestor and check each link, so a
//! caller holding a stale or foreign parent chain sees nothing.

use crate::domain::QueryFilter;
use crate::error::{AppError, Result};
use crate::querybuilding::{
    finish, insert, select, update, Arg, Equals, Pred, SelectBuilder, Statement, Value,
    CURRENT_UNIX_TIME,
};

pub const ID_COLUMN: &str = "id";
pub const CREATED_ON_COLUMN: &str = "created_on";
pub const LAST_UPDATED_ON_COLUMN: &str = "last_updated_on";
pub const ARCHIVED_ON_COLUMN: &str = "archived_on";
pub const USER_OWNERSHIP_COLUMN: &str = "belongs_to_user";

/// One edge of the ownership tree: `<child>.<column>` references `<parent>.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub column: &'static str,
    pub parent: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Shared reference data with no owner.
    Catalog,
    /// Owned by a user through `belongs_to_user`. With `scoped_reads` the
    /// owner id is part of every read.
    User { scoped_reads: bool },
    /// Owned by another entity; links run from the direct parent to the root.
    Parents(&'static [Link]),
}

/// How a list query reports the number of matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCount {
    /// A `(SELECT COUNT(..))` column repeated on every row.
    Subquery,
    /// `COUNT(id)` with `GROUP BY id`; the total comes from a second query.
    Grouped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    /// Data columns in projection order, excluding id and lifecycle columns.
    pub columns: &'static [&'static str],
    pub owner: Owner,
    pub list_count: ListCount,
}

impl Table {
    pub fn qualified(&self, column: &str) -> String {
        format!("{}.{}", self.name, column)
    }

    pub fn owner_column(&self) -> Option<&'static str> {
        match self.owner {
            Owner::Catalog => None,
            Owner::User { .. } => Some(USER_OWNERSHIP_COLUMN),
            Owner::Parents(links) => links.first().map(|link| link.column),
        }
    }

    /// Number of ancestor ids a read must be given.
    pub fn chain_len(&self) -> usize {
        match self.owner {
            Owner::Catalog | Owner::User { scoped_reads: false } => 0,
            Owner::User { scoped_reads: true } => 1,
            Owner::Parents(links) => links.len(),
        }
    }

    /// `id, <data columns>, created_on, last_updated_on, archived_on[, <owner>]`
    pub fn projection(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.columns.len() + 5);
        columns.push(self.qualified(ID_COLUMN));
        columns.extend(self.columns.iter().map(|c| self.qualified(c)));
        columns.push(self.qualified(CREATED_ON_COLUMN));
        columns.push(self.qualified(LAST_UPDATED_ON_COLUMN));
        columns.push(self.qualified(ARCHIVED_ON_COLUMN));
        if let Some(owner) = self.owner_column() {
            columns.push(self.qualified(owner));
        }
        columns
    }

    fn count_column(&self) -> String {
        format!("COUNT({})", self.qualified(ID_COLUMN))
    }

    fn with_joins(&self, mut query: SelectBuilder) -> SelectBuilder {
        if let Owner::Parents(links) = self.owner {
            let mut child = self.name;
            for link in links {
                query = query.join(format!(
                    "{parent} ON {child}.{column}={parent}.id",
                    parent = link.parent,
                    child = child,
                    column = link.column,
                ));
                child = link.parent;
            }
        }
        query
    }

    /// Un-archived rows under the given ancestors, root first.
    fn ownership_predicate(&self, chain: &[u64]) -> Result<Equals> {
        if chain.len() != self.chain_len() {
            return Err(AppError::InvalidInput(format!(
                "{} reads need {} parent ids, got {}",
                self.name,
                self.chain_len(),
                chain.len()
            )));
        }

        let mut eq = Equals::new().is_null(self.qualified(ARCHIVED_ON_COLUMN));
        match self.owner {
            Owner::Catalog | Owner::User { scoped_reads: false } => {}
            Owner::User { scoped_reads: true } => {
                eq = eq.and(self.qualified(USER_OWNERSHIP_COLUMN), chain[0]);
            }
            Owner::Parents(links) => {
                let mut child = self.name;
                for (link, parent_id) in links.iter().zip(chain.iter().rev()) {
                    eq = eq
                        .and(format!("{}.{}", child, link.column), *parent_id)
                        .and(format!("{}.{}", link.parent, ID_COLUMN), *parent_id);
                    child = link.parent;
                }
            }
        }
        Ok(eq)
    }

    fn filter_predicates(&self, filter: &QueryFilter) -> Vec<Pred> {
        let created = self.qualified(CREATED_ON_COLUMN);
        let updated = self.qualified(LAST_UPDATED_ON_COLUMN);
        let mut preds = Vec::new();
        if let Some(v) = filter.created_after {
            preds.push(Pred::gt(created.clone(), v));
        }
        if let Some(v) = filter.created_before {
            preds.push(Pred::lt(created, v));
        }
        if let Some(v) = filter.updated_after {
            preds.push(Pred::gt(updated.clone(), v));
        }
        if let Some(v) = filter.updated_before {
            preds.push(Pred::lt(updated, v));
        }
        preds
    }

    pub fn build_exists_query(&self, chain: &[u64], id: u64) -> Result<Statement> {
        let eq = self
            .ownership_predicate(chain)?
            .and(self.qualified(ID_COLUMN), id);
        let query = select([self.qualified(ID_COLUMN)])
            .prefix("SELECT EXISTS (")
            .from(self.name);
        Ok(finish(self.with_joins(query).where_(eq).suffix(")").to_sql()))
    }

    pub fn build_get_query(&self, chain: &[u64], id: u64) -> Result<Statement> {
        let eq = self
            .ownership_predicate(chain)?
            .and(self.qualified(ID_COLUMN), id);
        let query = select(self.projection()).from(self.name);
        Ok(finish(self.with_joins(query).where_(eq).to_sql()))
    }

    pub fn build_get_all_count_query(&self) -> Statement {
        finish(
            select([self.count_column()])
                .from(self.name)
                .where_(Equals::new().is_null(self.qualified(ARCHIVED_ON_COLUMN)))
                .to_sql(),
        )
    }

    /// Highest id ever assigned, archived rows included.
    pub fn build_max_id_query(&self) -> Statement {
        finish(
            select([format!("COALESCE(MAX({}), 0)", self.qualified(ID_COLUMN))])
                .from(self.name)
                .to_sql(),
        )
    }

    /// Rows with `begin < id < end`.
    pub fn build_get_batch_query(&self, begin: u64, end: u64) -> Statement {
        finish(
            select(self.projection())
                .from(self.name)
                .where_(Pred::gt(self.qualified(ID_COLUMN), begin))
                .where_(Pred::lt(self.qualified(ID_COLUMN), end))
                .to_sql(),
        )
    }

    fn filtered_count(&self, eq: Equals, filter: &QueryFilter) -> SelectBuilder {
        let query = self.with_joins(select([self.count_column()]).from(self.name));
        self.filter_predicates(filter)
            .into_iter()
            .fold(query.where_(eq), |query, pred| query.where_(pred))
    }

    pub fn build_list_query(&self, chain: &[u64], filter: &QueryFilter) -> Result<Statement> {
        let eq = self.ownership_predicate(chain)?;

        let mut query = select(self.projection());
        query = match self.list_count {
            ListCount::Subquery => query.column_select(self.filtered_count(eq.clone(), filter)),
            ListCount::Grouped => query.columns([self.count_column()]),
        };
        query = self.with_joins(query.from(self.name)).where_(eq);
        for pred in self.filter_predicates(filter) {
            query = query.where_(pred);
        }
        query = match self.list_count {
            ListCount::Subquery => query.order_by(self.qualified(ID_COLUMN)),
            ListCount::Grouped => query.group_by(self.qualified(ID_COLUMN)),
        };

        Ok(finish(
            query
                .limit(u64::from(filter.limit()))
                .offset(filter.offset())
                .to_sql(),
        ))
    }

    /// Number of rows a list query with the same chain and filter matches.
    pub fn build_filtered_count_query(
        &self,
        chain: &[u64],
        filter: &QueryFilter,
    ) -> Result<Statement> {
        let eq = self.ownership_predicate(chain)?;
        Ok(finish(self.filtered_count(eq, filter).to_sql()))
    }

    /// Fetch rows in the order of `ids`. The ids are inlined as `int` literals,
    /// so an id above `i32::MAX` is rejected.
    pub fn build_get_with_ids_query(&self, ids: &[u64], limit: u8) -> Result<Statement> {
        if let Some(id) = ids.iter().find(|id| i32::try_from(**id).is_err()) {
            return Err(AppError::InvalidInput(format!(
                "{} id {} does not fit in an integer array",
                self.name, id
            )));
        }

        let limit = if limit == 0 {
            QueryFilter::default().limit()
        } else {
            limit
        };
        let id_list = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let inner = select(self.projection())
            .from(self.name)
            .join(format!(
                "unnest('{{{}}}'::int[]) WITH ORDINALITY t(id, ord) USING (id)",
                id_list
            ))
            .order_by("t.ord")
            .limit(u64::from(limit));

        Ok(finish(
            select(self.projection())
                .from_select(inner, self.name)
                .where_(Equals::new().is_null(self.qualified(ARCHIVED_ON_COLUMN)))
                .to_sql(),
        ))
    }

    pub fn build_create_query(&self, values: Vec<(&'static str, Arg)>) -> Statement {
        let (columns, values): (Vec<_>, Vec<_>) = values
            .into_iter()
            .map(|(column, arg)| (column, Value::Arg(arg)))
            .unzip();
        finish(
            insert(self.name)
                .columns(columns)
                .values(values)
                .suffix(format!("RETURNING {}, {}", ID_COLUMN, CREATED_ON_COLUMN))
                .to_sql(),
        )
    }

    fn row_identity(&self, owner_id: Option<u64>, id: u64) -> Equals {
        let mut eq = Equals::new().and(ID_COLUMN, id);
        if let (Some(column), Some(owner_id)) = (self.owner_column(), owner_id) {
            eq = eq.and(column, owner_id);
        }
        eq
    }

    pub fn build_update_query(
        &self,
        values: Vec<(&'static str, Arg)>,
        owner_id: Option<u64>,
        id: u64,
    ) -> Statement {
        let query = values
            .into_iter()
            .fold(update(self.name), |query, (column, arg)| {
                query.set(column, Value::Arg(arg))
            })
            .set(LAST_UPDATED_ON_COLUMN, Value::Raw(CURRENT_UNIX_TIME))
            .where_(self.row_identity(owner_id, id))
            .suffix(format!("RETURNING {}", LAST_UPDATED_ON_COLUMN));
        finish(query.to_sql())
    }

    pub fn build_archive_query(&self, owner_id: Option<u64>, id: u64) -> Statement {
        finish(
            update(self.name)
                .set(LAST_UPDATED_ON_COLUMN, Value::Raw(CURRENT_UNIX_TIME))
                .set(ARCHIVED_ON_COLUMN, Value::Raw(CURRENT_UNIX_TIME))
                .where_(self.row_identity(owner_id, id).is_null(ARCHIVED_ON_COLUMN))
                .suffix(format!("RETURNING {}", ARCHIVED_ON_COLUMN))
                .to_sql(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    static GADGETS: Table = Table {
        name: "gadgets",
        columns: &["name"],
        owner: Owner::Catalog,
        list_count: ListCount::Subquery,
    };

    static WIDGETS: Table = Table {
        name: "widgets",
        columns: &["label"],
        owner: Owner::Parents(&[
            Link {
                column: "belongs_to_gadget",
                parent: "gadgets",
            },
        ]),
        list_count: ListCount::Grouped,
    };

    fn placeholder_count(sql: &str) -> usize {
        (1..=64)
            .take_while(|n| sql.contains(&format!("${}", n)))
            .count()
    }

    #[test]
    fn test_projection_order() {
        assert_eq!(
            WIDGETS.projection(),
            vec![
                "widgets.id",
                "widgets.label",
                "widgets.created_on",
                "widgets.last_updated_on",
                "widgets.archived_on",
                "widgets.belongs_to_gadget",
            ]
        );
        assert_eq!(GADGETS.owner_column(), None);
    }

    #[test]
    fn test_wrong_chain_length_is_rejected() {
        let err = WIDGETS.build_get_query(&[], 1).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = GADGETS.build_exists_query(&[4], 1).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_catalog_list_count_without_filter() {
        let stmt = GADGETS
            .build_list_query(&[], &QueryFilter::default())
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT gadgets.id, gadgets.name, gadgets.created_on, gadgets.last_updated_on, gadgets.archived_on, (SELECT COUNT(gadgets.id) FROM gadgets WHERE gadgets.archived_on IS NULL) FROM gadgets WHERE gadgets.archived_on IS NULL ORDER BY gadgets.id LIMIT 20"
        );
        assert!(stmt.args.is_empty());
    }

    #[test]
    fn test_grouped_list_and_filtered_count_agree_on_predicates() {
        let filter = QueryFilter {
            created_after: Some(1),
            ..Default::default()
        };
        let list = WIDGETS.build_list_query(&[3], &filter).unwrap();
        let count = WIDGETS.build_filtered_count_query(&[3], &filter).unwrap();

        assert_eq!(
            list.sql,
            "SELECT widgets.id, widgets.label, widgets.created_on, widgets.last_updated_on, widgets.archived_on, widgets.belongs_to_gadget, COUNT(widgets.id) FROM widgets JOIN gadgets ON widgets.belongs_to_gadget=gadgets.id WHERE gadgets.id = $1 AND widgets.archived_on IS NULL AND widgets.belongs_to_gadget = $2 AND widgets.created_on > $3 GROUP BY widgets.id LIMIT 20"
        );
        assert_eq!(
            count.sql,
            "SELECT COUNT(widgets.id) FROM widgets JOIN gadgets ON widgets.belongs_to_gadget=gadgets.id WHERE gadgets.id = $1 AND widgets.archived_on IS NULL AND widgets.belongs_to_gadget = $2 AND widgets.created_on > $3"
        );
        assert_eq!(list.args, vec![Arg::from(3u64), Arg::from(3u64), Arg::from(1u64)]);
        assert_eq!(list.args, count.args);
    }

    #[test]
    fn test_placeholders_match_args() {
        let filter = QueryFilter {
            page: 3,
            limit: 10,
            created_after: Some(1),
            created_before: Some(2),
            updated_after: Some(3),
            updated_before: Some(4),
        };
        let statements = vec![
            GADGETS.build_list_query(&[], &filter).unwrap(),
            WIDGETS.build_list_query(&[9], &filter).unwrap(),
            WIDGETS.build_exists_query(&[9], 2).unwrap(),
            WIDGETS.build_update_query(vec![("label", Arg::from("x"))], Some(9), 2),
            WIDGETS.build_archive_query(Some(9), 2),
            GADGETS.build_create_query(vec![("name", Arg::from("y"))]),
            GADGETS.build_get_batch_query(0, 1001),
        ];
        for stmt in statements {
            assert_eq!(placeholder_count(&stmt.sql), stmt.args.len(), "{}", stmt.sql);
        }
    }

    #[test]
    fn test_get_with_ids_defaults_limit() {
        let stmt = GADGETS.build_get_with_ids_query(&[3, 1, 2], 0).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT gadgets.id, gadgets.name, gadgets.created_on, gadgets.last_updated_on, gadgets.archived_on FROM (SELECT gadgets.id, gadgets.name, gadgets.created_on, gadgets.last_updated_on, gadgets.archived_on FROM gadgets JOIN unnest('{3,1,2}'::int[]) WITH ORDINALITY t(id, ord) USING (id) ORDER BY t.ord LIMIT 20) AS gadgets WHERE gadgets.archived_on IS NULL"
        );
        assert!(stmt.args.is_empty());
    }

    #[test]
    fn test_list_query_with_huge_page_keeps_a_valid_offset() {
        let filter = QueryFilter {
            page: u64::MAX / 10,
            limit: 250,
            ..Default::default()
        };
        let stmt = GADGETS.build_list_query(&[], &filter).unwrap();
        assert!(
            stmt.sql.ends_with(&format!("LIMIT 250 OFFSET {}", i64::MAX)),
            "{}",
            stmt.sql
        );
    }

    #[test]
    fn test_get_with_ids_rejects_ids_beyond_int() {
        let max = i32::MAX as u64;
        assert!(GADGETS.build_get_with_ids_query(&[1, max], 0).is_ok());

        let err = GADGETS.build_get_with_ids_query(&[1, max + 1], 0).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_max_id_query() {
        assert_eq!(
            GADGETS.build_max_id_query().sql,
            "SELECT COALESCE(MAX(gadgets.id), 0) FROM gadgets"
        );
    }
}
