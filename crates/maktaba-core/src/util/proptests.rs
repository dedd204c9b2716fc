//! Property-based tests for normalization helpers.

#[cfg(test)]
mod tests {
    use crate::content_type::ContentType;
    use crate::util::ids::normalize_slug;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_normalize_slug_is_idempotent(s in "[a-zA-Z0-9 _\\-]{0,40}") {
            let once = normalize_slug(&s);
            prop_assert_eq!(normalize_slug(&once), once);
        }

        #[test]
        fn test_normalize_slug_has_no_whitespace(s in "[a-zA-Z _\t]{0,40}") {
            let slug = normalize_slug(&s);
            prop_assert!(!slug.contains(char::is_whitespace));
            prop_assert!(!slug.contains('_'));
        }

        #[test]
        fn test_content_type_parse_ignores_case(idx in 0usize..8, upper in any::<bool>()) {
            let ct = ContentType::ALL[idx];
            let key = if upper { ct.plural().to_uppercase() } else { ct.as_str().to_string() };
            prop_assert_eq!(key.parse::<ContentType>().ok(), Some(ct));
        }
    }
}
