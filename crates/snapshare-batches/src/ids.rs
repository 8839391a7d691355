//! Identifier generation

use uuid::Uuid;

/// Attempts before giving up on finding an unused id. With 122 random bits
/// a second attempt is already astronomically unlikely.
const MAX_ATTEMPTS: usize = 8;

/// A random 32-character lowercase hex token.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A random id for which `is_taken` returns false.
pub fn generate_unique_id<F>(is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    for _ in 0..MAX_ATTEMPTS {
        let id = generate_id();
        if !is_taken(&id) {
            return id;
        }
        tracing::warn!(id = %id, "Generated id collided with an existing key, retrying");
    }

    // Practically unreachable; fall back to a time-ordered id which cannot
    // repeat a v4 one.
    Uuid::now_v7().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_alphanumeric_and_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids
            .iter()
            .all(|id| id.len() == 32 && id.chars().all(|c| c.is_ascii_alphanumeric())));
    }

    #[test]
    fn test_unique_id_retries_on_collision() {
        let calls = Cell::new(0);
        let id = generate_unique_id(|_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });
        assert_eq!(calls.get(), 3);
        assert_eq!(id.len(), 32);
    }
}
