//! Parameterized SQL builder for PostgreSQL.
//!
//! Builders are plain values: every method consumes the builder and returns
//! the extended one. Placeholders are numbered `$1..$N` in the order their
//! arguments appear in the rendered text, including inside nested selects.

use serde::Serialize;
use std::collections::BTreeMap;

/// The raw expression PostgreSQL evaluates to the current unix time.
pub const CURRENT_UNIX_TIME: &str = "extract(epoch FROM NOW())";

/// Log target used for query building failures.
pub const QUERY_ERROR: &str = "QUERY_ERROR";

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Arg {
    BigInt(u64),
    NullableBigInt(Option<u64>),
    Real(f32),
    Text(String),
    Bool(bool),
}

impl From<u64> for Arg {
    fn from(v: u64) -> Self {
        Arg::BigInt(v)
    }
}

impl From<Option<u64>> for Arg {
    fn from(v: Option<u64>) -> Self {
        Arg::NullableBigInt(v)
    }
}

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Real(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<&String> for Arg {
    fn from(v: &String) -> Self {
        Arg::Text(v.clone())
    }
}

/// Right-hand side of a SET clause or an INSERT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Arg(Arg),
    /// Rendered verbatim, never parameterized.
    Raw(&'static str),
}

impl From<Arg> for Value {
    fn from(arg: Arg) -> Self {
        Value::Arg(arg)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Arg(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Arg(v.into())
    }
}

/// Rendered SQL and the arguments for its placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Arg>,
}

/// A statement that could not be built cleanly.
///
/// `partial` holds the best-effort rendering so callers may still run it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct BuildError {
    pub message: &'static str,
    pub partial: Statement,
}

pub type BuildResult = std::result::Result<Statement, BuildError>;

/// Log a build failure under the `QUERY_ERROR` name.
pub fn log_query_building_error(err: &BuildError) {
    tracing::error!(
        name = QUERY_ERROR,
        sql = %err.partial.sql,
        "building query: {}",
        err.message
    );
}

/// Resolve a build result, logging a failure and falling back to its partial SQL.
pub fn finish(result: BuildResult) -> Statement {
    result.unwrap_or_else(|err| {
        log_query_building_error(&err);
        err.partial
    })
}

/// Equality predicate over several columns.
///
/// Columns render in lexicographic order; a `None` value renders `IS NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equals(BTreeMap<String, Option<Arg>>);

impl Equals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, column: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.0.insert(column.into(), Some(value.into()));
        self
    }

    pub fn is_null(mut self, column: impl Into<String>) -> Self {
        self.0.insert(column.into(), None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pred {
    Eq(Equals),
    Gt(String, Arg),
    Lt(String, Arg),
}

impl From<Equals> for Pred {
    fn from(eq: Equals) -> Self {
        Pred::Eq(eq)
    }
}

impl Pred {
    pub fn gt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Pred::Gt(column.into(), value.into())
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Pred::Lt(column.into(), value.into())
    }

    fn render(&self, out: &mut Renderer) {
        match self {
            Pred::Eq(eq) => {
                for (i, (column, value)) in eq.0.iter().enumerate() {
                    if i > 0 {
                        out.push(" AND ");
                    }
                    out.push(column);
                    match value {
                        Some(arg) => {
                            out.push(" = ");
                            out.placeholder(arg.clone());
                        }
                        None => out.push(" IS NULL"),
                    }
                }
            }
            Pred::Gt(column, arg) => {
                out.push(column);
                out.push(" > ");
                out.placeholder(arg.clone());
            }
            Pred::Lt(column, arg) => {
                out.push(column);
                out.push(" < ");
                out.placeholder(arg.clone());
            }
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Pred::Eq(eq) if eq.is_empty())
    }
}

struct Renderer {
    sql: String,
    args: Vec<Arg>,
}

impl Renderer {
    fn new() -> Self {
        Self {
            sql: String::new(),
            args: Vec::new(),
        }
    }

    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    fn placeholder(&mut self, arg: Arg) {
        self.args.push(arg);
        self.sql.push_str(&format!("${}", self.args.len()));
    }

    fn wheres(&mut self, preds: &[Pred]) {
        let mut first = true;
        for pred in preds.iter().filter(|p| !p.is_empty()) {
            self.push(if first { " WHERE " } else { " AND " });
            pred.render(self);
            first = false;
        }
    }

    fn into_statement(self) -> Statement {
        Statement {
            sql: self.sql,
            args: self.args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Column {
    Expr(String),
    Sub(Box<SelectBuilder>),
}

#[derive(Debug, Clone, PartialEq)]
enum Source {
    Table(String),
    Select(Box<SelectBuilder>, String),
}

/// `SELECT` statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    prefix: Option<String>,
    columns: Vec<Column>,
    from: Option<Source>,
    joins: Vec<String>,
    wheres: Vec<Pred>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    suffix: Option<String>,
}

pub fn select<I, S>(columns: I) -> SelectBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectBuilder::default().columns(columns)
}

impl SelectBuilder {
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns
            .extend(columns.into_iter().map(|c| Column::Expr(c.into())));
        self
    }

    /// Add a parenthesized sub-select to the projection.
    pub fn column_select(mut self, sub: SelectBuilder) -> Self {
        self.columns.push(Column::Sub(Box::new(sub)));
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(Source::Table(table.into()));
        self
    }

    /// `FROM (<sub>) AS alias`
    pub fn from_select(mut self, sub: SelectBuilder, alias: impl Into<String>) -> Self {
        self.from = Some(Source::Select(Box::new(sub), alias.into()));
        self
    }

    pub fn join(mut self, clause: impl Into<String>) -> Self {
        self.joins.push(clause.into());
        self
    }

    pub fn where_(mut self, pred: impl Into<Pred>) -> Self {
        self.wheres.push(pred.into());
        self
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by.push(expr.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// A zero offset is not rendered.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn to_sql(&self) -> BuildResult {
        let mut out = Renderer::new();
        self.render(&mut out);
        let statement = out.into_statement();

        if self.columns.is_empty() {
            return Err(BuildError {
                message: "select statements must have at least one result column",
                partial: statement,
            });
        }
        Ok(statement)
    }

    fn render(&self, out: &mut Renderer) {
        if let Some(prefix) = &self.prefix {
            out.push(prefix);
            out.push(" ");
        }

        out.push("SELECT ");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push(", ");
            }
            match column {
                Column::Expr(expr) => out.push(expr),
                Column::Sub(sub) => {
                    out.push("(");
                    sub.render(out);
                    out.push(")");
                }
            }
        }

        match &self.from {
            Some(Source::Table(table)) => {
                out.push(" FROM ");
                out.push(table);
            }
            Some(Source::Select(sub, alias)) => {
                out.push(" FROM (");
                sub.render(out);
                out.push(") AS ");
                out.push(alias);
            }
            None => {}
        }

        for join in &self.joins {
            out.push(" JOIN ");
            out.push(join);
        }

        out.wheres(&self.wheres);

        if !self.group_by.is_empty() {
            out.push(" GROUP BY ");
            out.push(&self.group_by.join(", "));
        }
        if !self.order_by.is_empty() {
            out.push(" ORDER BY ");
            out.push(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            out.push(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset.filter(|o| *o > 0) {
            out.push(&format!(" OFFSET {}", offset));
        }

        if let Some(suffix) = &self.suffix {
            out.push(" ");
            out.push(suffix);
        }
    }
}

/// `INSERT` statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertBuilder {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
    suffix: Option<String>,
}

pub fn insert(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder {
        table: table.into(),
        ..Default::default()
    }
}

impl InsertBuilder {
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.values.extend(values);
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn to_sql(&self) -> BuildResult {
        let mut out = Renderer::new();
        out.push("INSERT INTO ");
        out.push(&self.table);
        out.push(" (");
        out.push(&self.columns.join(","));
        out.push(") VALUES (");
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                out.push(",");
            }
            match value {
                Value::Arg(arg) => out.placeholder(arg.clone()),
                Value::Raw(raw) => out.push(raw),
            }
        }
        out.push(")");
        if let Some(suffix) = &self.suffix {
            out.push(" ");
            out.push(suffix);
        }
        let statement = out.into_statement();

        let message = if self.table.is_empty() {
            "insert statements must specify a table"
        } else if self.columns.is_empty() {
            "insert statements must have at least one column"
        } else if self.columns.len() != self.values.len() {
            "insert statements must have as many values as columns"
        } else {
            return Ok(statement);
        };
        Err(BuildError {
            message,
            partial: statement,
        })
    }
}

/// `UPDATE` statement builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBuilder {
    table: String,
    set: Vec<(String, Value)>,
    wheres: Vec<Pred>,
    suffix: Option<String>,
}

pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder {
        table: table.into(),
        ..Default::default()
    }
}

impl UpdateBuilder {
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    pub fn where_(mut self, pred: impl Into<Pred>) -> Self {
        self.wheres.push(pred.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn to_sql(&self) -> BuildResult {
        let mut out = Renderer::new();
        out.push("UPDATE ");
        out.push(&self.table);
        out.push(" SET ");
        for (i, (column, value)) in self.set.iter().enumerate() {
            if i > 0 {
                out.push(", ");
            }
            out.push(column);
            out.push(" = ");
            match value {
                Value::Arg(arg) => out.placeholder(arg.clone()),
                Value::Raw(raw) => out.push(raw),
            }
        }
        out.wheres(&self.wheres);
        if let Some(suffix) = &self.suffix {
            out.push(" ");
            out.push(suffix);
        }
        let statement = out.into_statement();

        if self.set.is_empty() {
            return Err(BuildError {
                message: "update statements must have at least one Set clause",
                partial: statement,
            });
        }
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_eq_renders_sorted_with_null() {
        let stmt = select(["things.id"])
            .from("things")
            .where_(
                Equals::new()
                    .and("things.id", 5u64)
                    .is_null("things.archived_on")
                    .and("things.belongs_to_user", 7u64),
            )
            .to_sql()
            .unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT things.id FROM things WHERE things.archived_on IS NULL AND things.belongs_to_user = $1 AND things.id = $2"
        );
        assert_eq!(stmt.args, vec![Arg::BigInt(7), Arg::BigInt(5)]);
    }

    #[test]
    fn test_exists_prefix_and_suffix() {
        let stmt = select(["things.id"])
            .prefix("SELECT EXISTS (")
            .from("things")
            .where_(Equals::new().and("things.id", 1u64))
            .suffix(")")
            .to_sql()
            .unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT EXISTS ( SELECT things.id FROM things WHERE things.id = $1 )"
        );
    }

    #[test]
    fn test_nested_select_placeholders_continue() {
        let count = select(["COUNT(things.id)"])
            .from("things")
            .where_(Equals::new().is_null("things.archived_on"))
            .where_(Pred::gt("things.created_on", 100u64));
        let stmt = select(["things.id"])
            .column_select(count)
            .from("things")
            .where_(Equals::new().is_null("things.archived_on"))
            .where_(Pred::gt("things.created_on", 100u64))
            .where_(Pred::lt("things.created_on", 200u64))
            .order_by("things.id")
            .limit(5)
            .offset(5)
            .to_sql()
            .unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT things.id, (SELECT COUNT(things.id) FROM things WHERE things.archived_on IS NULL AND things.created_on > $1) FROM things WHERE things.archived_on IS NULL AND things.created_on > $2 AND things.created_on < $3 ORDER BY things.id LIMIT 5 OFFSET 5"
        );
        assert_eq!(stmt.args.len(), 3);
    }

    #[test]
    fn test_zero_offset_is_omitted() {
        let stmt = select(["things.id"])
            .from("things")
            .limit(20)
            .offset(0)
            .to_sql()
            .unwrap();
        assert_eq!(stmt.sql, "SELECT things.id FROM things LIMIT 20");
    }

    #[test]
    fn test_from_select_alias() {
        let inner = select(["things.id"]).from("things").limit(3);
        let stmt = select(["things.id"])
            .from_select(inner, "things")
            .where_(Equals::new().is_null("things.archived_on"))
            .to_sql()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT things.id FROM (SELECT things.id FROM things LIMIT 3) AS things WHERE things.archived_on IS NULL"
        );
    }

    #[test]
    fn test_insert_returning() {
        let stmt = insert("things")
            .columns(["name", "belongs_to_user"])
            .values([Value::from("spoon"), Value::from(3u64)])
            .suffix("RETURNING id, created_on")
            .to_sql()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO things (name,belongs_to_user) VALUES ($1,$2) RETURNING id, created_on"
        );
        assert_eq!(
            stmt.args,
            vec![Arg::Text("spoon".to_string()), Arg::BigInt(3)]
        );
    }

    #[test]
    fn test_update_with_raw_value() {
        let stmt = update("things")
            .set("name", "fork")
            .set("last_updated_on", Value::Raw(CURRENT_UNIX_TIME))
            .where_(Equals::new().and("id", 2u64).and("belongs_to_user", 1u64))
            .suffix("RETURNING last_updated_on")
            .to_sql()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE things SET name = $1, last_updated_on = extract(epoch FROM NOW()) WHERE belongs_to_user = $2 AND id = $3 RETURNING last_updated_on"
        );
    }

    #[test]
    fn test_build_errors_carry_partial_sql() {
        let err = update("things").to_sql().unwrap_err();
        assert_eq!(err.partial.sql, "UPDATE things SET ");

        let err = insert("things")
            .columns(["a", "b"])
            .values([Value::from(1u64)])
            .to_sql()
            .unwrap_err();
        assert_eq!(
            err.message,
            "insert statements must have as many values as columns"
        );

        let err = SelectBuilder::default().from("things").to_sql().unwrap_err();
        assert_eq!(err.partial.sql, "SELECT  FROM things");

        let recovered = finish(Err(err));
        assert_eq!(recovered.sql, "SELECT  FROM things");
    }

    #[test]
    fn test_args_serialize_untagged() {
        let args = vec![
            Arg::BigInt(1),
            Arg::NullableBigInt(None),
            Arg::Text("a".to_string()),
            Arg::Bool(true),
        ];
        assert_eq!(
            serde_json::to_string(&args).unwrap(),
            r#"[1,null,"a",true]"#
        );
    }
}
