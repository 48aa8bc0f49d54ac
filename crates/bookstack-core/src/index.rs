//! # Id Indexes
//!
//! Id-to-entity lookup maps derived from the catalog collections.
//!
//! Indexes are rebuilt from scratch whenever the underlying collection
//! changes: an O(n) rebuild keeps them trivially consistent with the
//! collection they were built from, and they are the only sanctioned
//! mechanism for O(1) id lookup elsewhere in the system.

use std::collections::HashMap;

use crate::types::{Author, Book, Store};

/// Anything keyed by an integer id.
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for Store {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Author {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Book {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Builds an id-to-entity map from a collection.
///
/// If the same id appears twice (malformed data), the later entry wins,
/// matching the behavior of a plain insert loop.
pub fn build_index<T: Keyed + Clone>(items: &[T]) -> HashMap<i64, T> {
    items.iter().map(|item| (item.key(), item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(id: i64) -> Author {
        Author {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
        }
    }

    #[test]
    fn test_build_index_keys_by_id() {
        let authors = vec![author(1), author(2), author(3)];
        let index = build_index(&authors);

        assert_eq!(index.len(), 3);
        assert_eq!(index[&2].first_name, "First2");
    }

    #[test]
    fn test_build_index_later_duplicate_wins() {
        let mut dup = author(1);
        dup.first_name = "Replacement".into();
        let authors = vec![author(1), dup];

        let index = build_index(&authors);
        assert_eq!(index.len(), 1);
        assert_eq!(index[&1].first_name, "Replacement");
    }
}
