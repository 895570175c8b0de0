use sea_orm::DatabaseBackend;
use serde::{Deserialize, Serialize};

/// SQL dialect family a query is rendered for.
///
/// Only pattern matching differs between families: `PostgreSQL` has a native
/// case-insensitive `ILIKE`, everything else uses `LIKE` and its collation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
    SqlServer,
}

/// Pattern-match operator emitted for text predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOperator {
    /// `LIKE`, case sensitivity follows the column collation
    Like,
    /// `ILIKE`, always case-insensitive
    ILike,
}

impl Dialect {
    #[must_use]
    pub const fn pattern_operator(self) -> PatternOperator {
        match self {
            Self::Postgres => PatternOperator::ILike,
            Self::MySql | Self::Sqlite | Self::SqlServer => PatternOperator::Like,
        }
    }

    #[must_use]
    pub const fn is_case_insensitive_match(self) -> bool {
        matches!(self.pattern_operator(), PatternOperator::ILike)
    }
}

impl From<DatabaseBackend> for Dialect {
    fn from(backend: DatabaseBackend) -> Self {
        match backend {
            DatabaseBackend::MySql => Self::MySql,
            DatabaseBackend::Postgres => Self::Postgres,
            DatabaseBackend::Sqlite => Self::Sqlite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_postgres_uses_ilike() {
        assert_eq!(Dialect::Postgres.pattern_operator(), PatternOperator::ILike);
        for dialect in [Dialect::MySql, Dialect::Sqlite, Dialect::SqlServer] {
            assert_eq!(dialect.pattern_operator(), PatternOperator::Like);
            assert!(!dialect.is_case_insensitive_match());
        }
    }

    #[test]
    fn test_from_backend() {
        assert_eq!(Dialect::from(DatabaseBackend::Postgres), Dialect::Postgres);
        assert_eq!(Dialect::from(DatabaseBackend::MySql), Dialect::MySql);
        assert_eq!(Dialect::from(DatabaseBackend::Sqlite), Dialect::Sqlite);
    }

    #[test]
    fn test_deserialize_lowercase_names() {
        let dialect: Dialect = serde_json::from_str("\"sqlserver\"").unwrap();
        assert_eq!(dialect, Dialect::SqlServer);
    }
}
