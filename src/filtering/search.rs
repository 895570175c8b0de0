use super::conditions::{DropKind, Dropped, PatternKind, Predicate};
use super::validation::is_valid_identifier;

// Basic safety limits
pub const MAX_SEARCH_QUERY_LENGTH: usize = 10_000;

/// Trim and cap a search term, cutting on a char boundary.
fn sanitize_term(term: &str) -> &str {
    let term = term.trim();
    if term.len() <= MAX_SEARCH_QUERY_LENGTH {
        return term;
    }
    let mut end = MAX_SEARCH_QUERY_LENGTH;
    while !term.is_char_boundary(end) {
        end -= 1;
    }
    term[..end].trim_end()
}

/// Build the free-text search predicate: an OR of `field LIKE '%term%'` over
/// every declared search field that is a safe identifier.
///
/// Returns `None` when the term is blank or no field survives validation.
/// Fields that fail validation are appended to `dropped`.
pub fn build_search_predicate(
    term: Option<&str>,
    search_fields: &[&str],
    dropped: &mut Vec<Dropped>,
) -> Option<Predicate> {
    let term = sanitize_term(term?);
    if term.is_empty() {
        return None;
    }

    let mut any = Vec::with_capacity(search_fields.len());
    for field in search_fields {
        if is_valid_identifier(field) {
            any.push(Predicate::Pattern {
                column: (*field).to_string(),
                term: term.to_string(),
                kind: PatternKind::Contains,
            });
        } else {
            dropped.push(Dropped {
                kind: DropKind::SearchField,
                value: (*field).to_string(),
            });
        }
    }

    if any.is_empty() {
        None
    } else {
        Some(Predicate::AnyOf(any))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_covers_every_field() {
        let mut dropped = Vec::new();
        let predicate =
            build_search_predicate(Some("jakarta"), &["name", "code"], &mut dropped).unwrap();
        match predicate {
            Predicate::AnyOf(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(&parts[0], Predicate::Pattern { column, term, .. } if column == "name" && term == "jakarta"));
                assert!(matches!(&parts[1], Predicate::Pattern { column, .. } if column == "code"));
            }
            other => panic!("expected AnyOf, got {other:?}"),
        }
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_blank_or_missing_term_is_ignored() {
        let mut dropped = Vec::new();
        assert!(build_search_predicate(None, &["name"], &mut dropped).is_none());
        assert!(build_search_predicate(Some("   "), &["name"], &mut dropped).is_none());
    }

    #[test]
    fn test_no_search_fields_means_no_predicate() {
        let mut dropped = Vec::new();
        assert!(build_search_predicate(Some("abc"), &[], &mut dropped).is_none());
    }

    #[test]
    fn test_invalid_search_field_is_dropped() {
        let mut dropped = Vec::new();
        let predicate =
            build_search_predicate(Some("abc"), &["name", "bad field"], &mut dropped).unwrap();
        assert!(matches!(predicate, Predicate::AnyOf(ref parts) if parts.len() == 1));
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].kind, DropKind::SearchField);
    }

    #[test]
    fn test_long_term_is_truncated_on_char_boundary() {
        let term = "é".repeat(MAX_SEARCH_QUERY_LENGTH);
        let sanitized = sanitize_term(&term);
        assert!(sanitized.len() <= MAX_SEARCH_QUERY_LENGTH);
        assert!(sanitized.chars().all(|c| c == 'é'));
    }
}
