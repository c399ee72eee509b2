use uuid::Uuid;

/// Produce a fresh identifier for a newly created record.
///
/// UUID v4 carries 122 bits of randomness, so two identifiers generated
/// within one process lifetime are treated as never colliding.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_non_empty_and_hyphenated() {
        let id = fresh_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
    }

    #[test]
    fn test_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| fresh_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
