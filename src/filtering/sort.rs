use sea_orm::{
    Order,
    sea_query::{Expr, SimpleExpr},
};

use super::conditions::{DropKind, Dropped};
use super::validation::{column_ref, is_valid_identifier};

/// Direction accepted from the `order` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `asc` / `desc`. Anything else is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// What a sort clause orders by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortTarget {
    /// A validated request column, rendered as a quoted identifier.
    Column(String),
    /// A trusted fragment from the filter's default sort, rendered verbatim.
    Trusted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub target: SortTarget,
    pub direction: SortDirection,
}

impl SortClause {
    /// The ORDER BY expression, or `None` if a column no longer validates.
    #[must_use]
    pub fn expr(&self) -> Option<SimpleExpr> {
        match &self.target {
            SortTarget::Column(name) => column_ref(name).map(|col| Expr::col(col).into()),
            SortTarget::Trusted(fragment) => Some(Expr::cust(fragment.clone())),
        }
    }
}

/// Split a default sort such as `"name asc, id desc"` into clauses.
///
/// Each comma-separated fragment may end with `asc` or `desc` (default `asc`);
/// the rest of the fragment is kept as-is.
#[must_use]
pub fn parse_default_sort(default_sort: &str) -> Vec<SortClause> {
    default_sort
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            let (head, tail) = fragment
                .rsplit_once(char::is_whitespace)
                .unwrap_or((fragment, ""));
            match SortDirection::parse(tail) {
                Some(direction) => SortClause {
                    target: SortTarget::Trusted(head.trim().to_string()),
                    direction,
                },
                None => SortClause {
                    target: SortTarget::Trusted(fragment.to_string()),
                    direction: SortDirection::Asc,
                },
            }
        })
        .collect()
}

/// Resolve the request's `sort` / `order` into ORDER BY clauses.
///
/// The caller's column wins when it is a valid identifier, appears in
/// `sortable` (when that list is non-empty) and `order` is absent, `asc` or
/// `desc`. Otherwise the default sort applies and the rejected input is
/// recorded in `dropped`.
pub fn resolve_sort(
    sort: Option<&str>,
    order: Option<&str>,
    sortable: &[&str],
    default_sort: &str,
    dropped: &mut Vec<Dropped>,
) -> Vec<SortClause> {
    let Some(field) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
        return parse_default_sort(default_sort);
    };

    let field_ok = is_valid_identifier(field) && (sortable.is_empty() || sortable.contains(&field));
    if !field_ok {
        dropped.push(Dropped {
            kind: DropKind::SortField,
            value: field.to_string(),
        });
        return parse_default_sort(default_sort);
    }

    let direction = match order.map(str::trim).filter(|o| !o.is_empty()) {
        None => SortDirection::Asc,
        Some(raw) => {
            if let Some(direction) = SortDirection::parse(raw) {
                direction
            } else {
                dropped.push(Dropped {
                    kind: DropKind::SortOrder,
                    value: raw.to_string(),
                });
                return parse_default_sort(default_sort);
            }
        }
    };

    vec![SortClause {
        target: SortTarget::Column(field.to_string()),
        direction,
    }]
}
