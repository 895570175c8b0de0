use sea_orm::sea_query::{Alias, ColumnRef, IntoColumnRef};

/// Longest identifier or relation path accepted from a request.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Accept `column` or `table.column`: ASCII letters, digits and underscores,
/// with at most one dot between two non-empty segments.
///
/// Anything else (whitespace, quotes, `;`, comment markers, parentheses,
/// operators) is rejected so the name can never widen the generated SQL.
#[must_use]
pub fn is_valid_identifier(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }
    let mut segments = candidate.split('.');
    let valid = segments.by_ref().take(2).all(is_plain_segment);
    valid && segments.next().is_none()
}

/// Accept a dotted relation path such as `Profile` or `Profile.Address.City`.
#[must_use]
pub fn is_valid_relation_path(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_IDENTIFIER_LENGTH
        && candidate.split('.').all(is_plain_segment)
}

/// Build a column reference for a validated identifier.
///
/// `table.column` becomes a qualified reference; both parts are quoted by the
/// query builder for the target backend.
#[must_use]
pub fn column_ref(name: &str) -> Option<ColumnRef> {
    if !is_valid_identifier(name) {
        return None;
    }
    Some(match name.split_once('.') {
        Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
        None => Alias::new(name).into_column_ref(),
    })
}
