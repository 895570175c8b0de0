use sea_orm::{
    Condition, Value,
    sea_query::{Expr, LikeExpr, SimpleExpr, extension::postgres::PgExpr},
};

use super::dialect::{Dialect, PatternOperator};
use super::validation::column_ref;

/// Escape character declared in every rendered `LIKE ... ESCAPE` clause.
///
/// `!` is written as-is by every supported backend's string quoting.
pub const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so user input only ever matches literally.
/// Escapes: `!` first, then `%` (match any) and `_` (match single char).
#[must_use]
pub fn escape_like_wildcards(input: &str) -> String {
    input
        .replace(LIKE_ESCAPE, "!!")
        .replace('%', "!%")
        .replace('_', "!_")
}

/// Where a pattern is anchored inside the column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Contains,
    StartsWith,
    EndsWith,
}

impl PatternKind {
    fn wrap(self, escaped: &str) -> String {
        match self {
            Self::Contains => format!("%{escaped}%"),
            Self::StartsWith => format!("{escaped}%"),
            Self::EndsWith => format!("%{escaped}"),
        }
    }
}

/// One backend-neutral query operation.
///
/// Columns are stored as validated identifiers and values as bound parameters;
/// nothing here is spliced into SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq { column: String, value: Value },
    Ne { column: String, value: Value },
    /// Pattern match; the operator is chosen by the dialect at render time.
    Pattern {
        column: String,
        term: String,
        kind: PatternKind,
    },
    /// Inclusive range, either bound may be open.
    Range {
        column: String,
        min: Option<Value>,
        max: Option<Value>,
    },
    In { column: String, values: Vec<Value> },
    Null { column: String, is_null: bool },
    /// OR-combination, used by free-text search.
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    /// Render into a sea-query condition for `dialect`.
    #[must_use]
    pub fn to_condition(&self, dialect: Dialect) -> Condition {
        match self {
            Self::AnyOf(predicates) => predicates
                .iter()
                .fold(Condition::any(), |any, p| any.add(p.to_condition(dialect))),
            Self::Range { column, min, max } => {
                let mut all = Condition::all();
                if let Some(col) = column_ref(column) {
                    if let Some(min) = min {
                        all = all.add(Expr::col(col.clone()).gte(min.clone()));
                    }
                    if let Some(max) = max {
                        all = all.add(Expr::col(col).lte(max.clone()));
                    }
                }
                all
            }
            _ => self
                .to_expr(dialect)
                .map_or_else(Condition::all, |expr| Condition::all().add(expr)),
        }
    }

    fn to_expr(&self, dialect: Dialect) -> Option<SimpleExpr> {
        let expr = match self {
            Self::Eq { column, value } => Expr::col(column_ref(column)?).eq(value.clone()),
            Self::Ne { column, value } => Expr::col(column_ref(column)?).ne(value.clone()),
            Self::Pattern { column, term, kind } => {
                let like = LikeExpr::new(kind.wrap(&escape_like_wildcards(term))).escape(LIKE_ESCAPE);
                let col = Expr::col(column_ref(column)?);
                match dialect.pattern_operator() {
                    PatternOperator::ILike => col.ilike(like),
                    PatternOperator::Like => col.like(like),
                }
            }
            Self::In { column, values } => {
                Expr::col(column_ref(column)?).is_in(values.iter().cloned())
            }
            Self::Null { column, is_null } => {
                let col = Expr::col(column_ref(column)?);
                if *is_null { col.is_null() } else { col.is_not_null() }
            }
            Self::Range { .. } | Self::AnyOf(_) => return None,
        };
        Some(expr)
    }
}

/// What kind of request input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    FilterColumn,
    SearchField,
    SortField,
    SortOrder,
    Include,
}

/// A request field that failed validation and was left out of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub kind: DropKind,
    pub value: String,
}

/// Accumulates structured filter predicates for one request.
///
/// Every method takes an `Option`: `None` means the caller did not ask for the
/// filter and nothing is added, so `Some(0)` or `Some(false)` are real filters.
/// Columns that are not safe identifiers are dropped, never rendered.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
    dropped: Vec<Dropped>,
}

impl FilterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, column: &str, predicate: impl FnOnce(String) -> Predicate) -> Self {
        if column_ref(column).is_some() {
            self.predicates.push(predicate(column.to_string()));
        } else {
            self.dropped.push(Dropped {
                kind: DropKind::FilterColumn,
                value: column.to_string(),
            });
        }
        self
    }

    /// `column = value`
    #[must_use]
    pub fn eq<V: Into<Value>>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(column, |column| Predicate::Eq {
                column,
                value: v.into(),
            }),
            None => self,
        }
    }

    /// `column <> value`
    #[must_use]
    pub fn ne<V: Into<Value>>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(column, |column| Predicate::Ne {
                column,
                value: v.into(),
            }),
            None => self,
        }
    }

    fn pattern<S: AsRef<str>>(self, column: &str, term: Option<S>, kind: PatternKind) -> Self {
        match term {
            Some(term) if !term.as_ref().trim().is_empty() => {
                let term = term.as_ref().trim().to_string();
                self.push(column, |column| Predicate::Pattern { column, term, kind })
            }
            _ => self,
        }
    }

    /// `column LIKE '%term%'` (or `ILIKE` on `PostgreSQL`). Blank terms are skipped.
    #[must_use]
    pub fn contains<S: AsRef<str>>(self, column: &str, term: Option<S>) -> Self {
        self.pattern(column, term, PatternKind::Contains)
    }

    #[must_use]
    pub fn starts_with<S: AsRef<str>>(self, column: &str, term: Option<S>) -> Self {
        self.pattern(column, term, PatternKind::StartsWith)
    }

    #[must_use]
    pub fn ends_with<S: AsRef<str>>(self, column: &str, term: Option<S>) -> Self {
        self.pattern(column, term, PatternKind::EndsWith)
    }

    /// Inclusive range; either bound may be `None`. Both `None` adds nothing.
    #[must_use]
    pub fn between<V: Into<Value>>(self, column: &str, min: Option<V>, max: Option<V>) -> Self {
        if min.is_none() && max.is_none() {
            return self;
        }
        self.push(column, |column| Predicate::Range {
            column,
            min: min.map(Into::into),
            max: max.map(Into::into),
        })
    }

    /// `column >= value`
    #[must_use]
    pub fn gte<V: Into<Value>>(self, column: &str, value: Option<V>) -> Self {
        self.between(column, value, None)
    }

    /// `column <= value`
    #[must_use]
    pub fn lte<V: Into<Value>>(self, column: &str, value: Option<V>) -> Self {
        self.between(column, None, value)
    }

    /// `column IN (...)`. An empty set is treated as unspecified.
    #[must_use]
    pub fn is_in<V: Into<Value>>(self, column: &str, values: Option<Vec<V>>) -> Self {
        match values {
            Some(values) if !values.is_empty() => {
                let values = values.into_iter().map(Into::into).collect();
                self.push(column, |column| Predicate::In { column, values })
            }
            _ => self,
        }
    }

    /// `Some(true)` adds `IS NULL`, `Some(false)` adds `IS NOT NULL`.
    #[must_use]
    pub fn null_check(self, column: &str, is_null: Option<bool>) -> Self {
        match is_null {
            Some(is_null) => self.push(column, |column| Predicate::Null { column, is_null }),
            None => self,
        }
    }

    /// Add a prebuilt predicate as-is. Its columns are still validated at render time.
    #[must_use]
    pub fn raw_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn dropped(&self) -> &[Dropped] {
        &self.dropped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Predicate>, Vec<Dropped>) {
        (self.predicates, self.dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{
        Alias, Asterisk, PostgresQueryBuilder, Query, QueryStatementWriter, SqliteQueryBuilder,
    };

    fn render_sqlite(condition: Condition) -> String {
        Query::select()
            .column(Asterisk)
            .from(Alias::new("athletes"))
            .cond_where(condition)
            .to_string(SqliteQueryBuilder)
    }

    fn render_postgres(condition: Condition) -> String {
        Query::select()
            .column(Asterisk)
            .from(Alias::new("athletes"))
            .cond_where(condition)
            .to_string(PostgresQueryBuilder)
    }

    fn all_of(set: &FilterSet, dialect: Dialect) -> Condition {
        set.predicates()
            .iter()
            .fold(Condition::all(), |all, p| all.add(p.to_condition(dialect)))
    }

    #[test]
    fn test_none_values_add_nothing() {
        let set = FilterSet::new()
            .eq::<i32>("province_id", None)
            .contains::<&str>("name", None)
            .between::<i32>("age", None, None)
            .is_in::<i32>("id", None)
            .null_check("deleted_at", None);
        assert!(set.is_empty());
        assert!(set.dropped().is_empty());
    }

    #[test]
    fn test_explicit_zero_is_a_real_filter() {
        let set = FilterSet::new().eq("age", Some(0)).eq("is_active", Some(false));
        assert_eq!(set.predicates().len(), 2);
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("\"age\" = 0"), "{sql}");
        assert!(sql.contains("\"is_active\" ="), "{sql}");
    }

    #[test]
    fn test_invalid_column_is_dropped() {
        let set = FilterSet::new().eq("name; DROP TABLE athletes", Some("x"));
        assert!(set.is_empty());
        assert_eq!(
            set.dropped(),
            &[Dropped {
                kind: DropKind::FilterColumn,
                value: "name; DROP TABLE athletes".to_string()
            }]
        );
    }

    #[test]
    fn test_range_renders_both_bounds() {
        let set = FilterSet::new().between("age", Some(18), Some(30));
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("\"age\" >= 18"), "{sql}");
        assert!(sql.contains("\"age\" <= 30"), "{sql}");
    }

    #[test]
    fn test_open_ended_range() {
        let set = FilterSet::new().gte("age", Some(21));
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("\"age\" >= 21"), "{sql}");
        assert!(!sql.contains("<="), "{sql}");
    }

    #[test]
    fn test_set_membership_and_empty_set() {
        let set = FilterSet::new()
            .is_in("sport_id", Some(vec![1, 4]))
            .is_in::<i32>("event_id", Some(vec![]));
        assert_eq!(set.predicates().len(), 1);
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("\"sport_id\" IN (1, 4)"), "{sql}");
    }

    #[test]
    fn test_null_checks() {
        let set = FilterSet::new()
            .null_check("deleted_at", Some(true))
            .null_check("event_id", Some(false));
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("\"deleted_at\" IS NULL"), "{sql}");
        assert!(sql.contains("\"event_id\" IS NOT NULL"), "{sql}");
    }

    #[test]
    fn test_pattern_operator_follows_dialect() {
        let set = FilterSet::new().contains("name", Some("bud"));
        let sqlite = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sqlite.contains("\"name\" LIKE '%bud%'"), "{sqlite}");

        let postgres = render_postgres(all_of(&set, Dialect::Postgres));
        assert!(postgres.contains("\"name\" ILIKE '%bud%'"), "{postgres}");
    }

    #[test]
    fn test_pattern_escapes_wildcards() {
        let set = FilterSet::new().starts_with("code", Some("J_T%"));
        match &set.predicates()[0] {
            Predicate::Pattern { term, kind, .. } => {
                assert_eq!(term, "J_T%");
                assert_eq!(*kind, PatternKind::StartsWith);
            }
            other => panic!("unexpected predicate {other:?}"),
        }
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("'J!_T!%%'"), "{sql}");
        assert!(sql.contains("ESCAPE '!'"), "{sql}");
    }

    #[test]
    fn test_blank_pattern_is_skipped() {
        let set = FilterSet::new().contains("name", Some("   "));
        assert!(set.is_empty());
    }

    #[test]
    fn test_qualified_column_is_rendered_with_table() {
        let set = FilterSet::new().eq("athletes.province_id", Some(2));
        let sql = render_sqlite(all_of(&set, Dialect::Sqlite));
        assert!(sql.contains("\"athletes\".\"province_id\" = 2"), "{sql}");
    }

    #[test]
    fn test_any_of_renders_or() {
        let predicate = Predicate::AnyOf(vec![
            Predicate::Pattern {
                column: "name".into(),
                term: "a".into(),
                kind: PatternKind::Contains,
            },
            Predicate::Pattern {
                column: "code".into(),
                term: "a".into(),
                kind: PatternKind::Contains,
            },
        ]);
        let sql = render_sqlite(predicate.to_condition(Dialect::Sqlite));
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn test_values_are_not_spliced_as_sql() {
        let set = FilterSet::new().eq("name", Some("' OR '1'='1"));
        match &set.predicates()[0] {
            Predicate::Eq { value, .. } => {
                assert_eq!(value, &Value::from("' OR '1'='1"));
            }
            other => panic!("unexpected predicate {other:?}"),
        }
    }

    #[test]
    fn test_wildcard_escaping() {
        assert_eq!(escape_like_wildcards("test"), "test");
        assert_eq!(escape_like_wildcards("100%"), "100!%");
        assert_eq!(escape_like_wildcards("a_b"), "a!_b");
        assert_eq!(escape_like_wildcards("!%"), "!!!%");
        assert_eq!(escape_like_wildcards("C:\\tmp"), "C:\\tmp");
    }
}
