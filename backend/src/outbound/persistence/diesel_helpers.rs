//! Shared helpers for Diesel repository implementations.

/// Build an `ILIKE` pattern matching `term` anywhere in the column.
///
/// `%`, `_` and `\` in the term are escaped so user input is matched
/// literally, mirroring the substring semantics of the listing filters.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lisbon", "%lisbon%")]
    #[case("100%", "%100\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\x", "%c:\\\\x%")]
    fn patterns_escape_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }
}
