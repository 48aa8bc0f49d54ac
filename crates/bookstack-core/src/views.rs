//! # View Composer
//!
//! Pure derivation functions that join the raw catalog collections into
//! denormalized, filterable projections for display.
//!
//! ## Derivation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        View Derivations                                 │
//! │                                                                         │
//! │  Collections (owned by the Catalog Store)                               │
//! │  ────────────────────────────────────────                               │
//! │  stores ─┐                                                              │
//! │  books ──┼──► store_inventory()     one row per link that resolves      │
//! │  authors ┤      │                   to a book, with author name,        │
//! │  links ──┘      │                   price and the link's own id         │
//! │                 ▼                                                       │
//! │             search filter          lower-cased substring test against   │
//! │                                    EVERY field's display string         │
//! │                                                                         │
//! │  books ──┬──► books_with_stores()  one entry per book with every        │
//! │  links ──┤                         (store name, price) pair that        │
//! │  stores ─┘                         references it                        │
//! │                                                                         │
//! │  stores ────► find_store()         numeric-coerced id resolution;       │
//! │                                    absence is None, never an error      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity Contract
//! Every function here is a deterministic function of its inputs. Outputs
//! are owned copies: callers may dispose of them freely and nothing here
//! ever writes back into the collections.
//!
//! ## Join Cost
//! The book join in [`store_inventory`] is a linear scan per link, so the
//! worst case is links × books. Fine at the scale of one store's catalog;
//! a precomputed book_id → links multimap is the upgrade path if that ever
//! stops being true.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Author, Book, InventoryLink, Store};

/// Sentinel shown when a book's `author_id` does not resolve.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Sentinel shown when a link's `store_id` does not resolve.
pub const UNKNOWN_STORE: &str = "Unknown Store";

// =============================================================================
// Store Inventory View
// =============================================================================

/// One row of the store inventory view: an inventory link joined to its
/// book, with the author name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreInventoryRow {
    /// Id of the book this row describes.
    pub book_id: i64,

    /// Book title.
    pub name: String,

    /// Book page count.
    pub page_count: u32,

    /// Raw author reference (may dangle; see `author_name`).
    pub author_id: i64,

    /// Resolved author display name, or [`UNKNOWN_AUTHOR`].
    pub author_name: String,

    /// Id of the inventory link itself (the mutation target for
    /// price edits and removals).
    pub inventory_id: i64,

    /// Store carrying this row.
    pub store_id: i64,

    /// Price at this store.
    pub price: f64,
}

impl StoreInventoryRow {
    /// Tests whether any field of the row contains `needle` (already
    /// lower-cased) as a substring of its display string.
    ///
    /// Numeric fields are searched in their decimal string form, so a
    /// search for "12.5" matches a price of 12.5.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.author_name.to_lowercase().contains(needle)
            || self.book_id.to_string().contains(needle)
            || self.page_count.to_string().contains(needle)
            || self.author_id.to_string().contains(needle)
            || self.inventory_id.to_string().contains(needle)
            || self.store_id.to_string().contains(needle)
            || self.price.to_string().contains(needle)
    }
}

/// Derives the store inventory view.
///
/// ## Behavior
/// - `store_id`: `None` or a non-numeric string selects every link
///   (no filter); a numeric string selects links with that `store_id`.
/// - Links whose `book_id` does not resolve are silently dropped — a
///   dangling link is a data condition, not an error.
/// - `search`: blank or absent means no filtering; otherwise each row is
///   kept if any field's lower-cased display string contains the
///   lower-cased term.
pub fn store_inventory(
    books: &[Book],
    inventory: &[InventoryLink],
    authors_by_id: &HashMap<i64, Author>,
    store_id: Option<&str>,
    search: Option<&str>,
) -> Vec<StoreInventoryRow> {
    let wanted_store: Option<i64> = store_id.and_then(|raw| raw.trim().parse().ok());

    let rows = inventory
        .iter()
        .filter(|link| wanted_store.is_none_or(|id| link.store_id == id))
        .filter_map(|link| {
            // Linear scan; see the module-level join cost note.
            let book = books.iter().find(|candidate| candidate.id == link.book_id)?;

            let author_name = authors_by_id
                .get(&book.author_id)
                .map(Author::display_name)
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

            Some(StoreInventoryRow {
                book_id: book.id,
                name: book.name.clone(),
                page_count: book.page_count,
                author_id: book.author_id,
                author_name,
                inventory_id: link.id,
                store_id: link.store_id,
                price: link.price,
            })
        });

    match search.map(str::trim).filter(|term| !term.is_empty()) {
        Some(term) => {
            let needle = term.to_lowercase();
            rows.filter(|row| row.matches(&needle)).collect()
        }
        None => rows.collect(),
    }
}

// =============================================================================
// Books-With-Stores View
// =============================================================================

/// A (store name, price) pair for one book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorePrice {
    /// Resolved store display name, or [`UNKNOWN_STORE`].
    pub name: String,

    /// Price at that store.
    pub price: f64,
}

/// One book together with every store that carries it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookWithStores {
    /// Book title.
    pub title: String,

    /// Resolved author display name, or [`UNKNOWN_AUTHOR`].
    pub author: String,

    /// Every store carrying the book, with its local price.
    pub stores: Vec<StorePrice>,
}

/// Derives the books-with-stores view: every book, joined to every
/// inventory link that references it.
///
/// Books carried nowhere still appear, with an empty `stores` list.
pub fn books_with_stores(
    books: &[Book],
    inventory: &[InventoryLink],
    authors_by_id: &HashMap<i64, Author>,
    stores_by_id: &HashMap<i64, Store>,
) -> Vec<BookWithStores> {
    books
        .iter()
        .map(|book| {
            let author = authors_by_id
                .get(&book.author_id)
                .map(Author::display_name)
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

            let stores = inventory
                .iter()
                .filter(|link| link.book_id == book.id)
                .map(|link| StorePrice {
                    name: stores_by_id
                        .get(&link.store_id)
                        .map(|store| store.name.clone())
                        .unwrap_or_else(|| UNKNOWN_STORE.to_string()),
                    price: link.price,
                })
                .collect();

            BookWithStores {
                title: book.name.clone(),
                author,
                stores,
            }
        })
        .collect()
}

// =============================================================================
// Current Store Resolution
// =============================================================================

/// Resolves a store id (as captured from a route or form, so still a
/// string) against the store collection.
///
/// A non-numeric id or an unknown numeric id both yield `None` — "store
/// not found" is a presentation state, not an error.
pub fn find_store<'a>(stores: &'a [Store], store_id: &str) -> Option<&'a Store> {
    let id: i64 = store_id.trim().parse().ok()?;
    stores.iter().find(|store| store.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Vec<Store>, Vec<Author>, Vec<Book>, Vec<InventoryLink>) {
        let stores = vec![Store {
            id: 1,
            name: "Main".into(),
            address_1: "1 First St".into(),
            address_2: None,
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
        }];
        let authors = vec![Author {
            id: 5,
            first_name: "Frank".into(),
            last_name: "Herbert".into(),
        }];
        let books = vec![Book {
            id: 10,
            name: "Dune".into(),
            page_count: 412,
            author_id: 5,
        }];
        let inventory = vec![InventoryLink {
            id: 100,
            store_id: 1,
            book_id: 10,
            price: 12.5,
        }];
        (stores, authors, books, inventory)
    }

    fn index<T: crate::index::Keyed + Clone>(items: &[T]) -> HashMap<i64, T> {
        crate::index::build_index(items)
    }

    #[test]
    fn test_store_inventory_joins_book_and_author() {
        let (_, authors, books, inventory) = fixture();
        let rows = store_inventory(&books, &inventory, &index(&authors), Some("1"), None);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "Dune");
        assert_eq!(row.author_name, "Frank Herbert");
        assert_eq!(row.price, 12.5);
        assert_eq!(row.inventory_id, 100);
    }

    #[test]
    fn test_store_inventory_drops_link_with_missing_book() {
        let (_, authors, books, mut inventory) = fixture();
        inventory.push(InventoryLink {
            id: 101,
            store_id: 1,
            book_id: 99, // no such book
            price: 8.0,
        });

        let rows = store_inventory(&books, &inventory, &index(&authors), Some("1"), None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].inventory_id, 100);
    }

    #[test]
    fn test_store_inventory_unknown_author_sentinel() {
        let (_, _, mut books, inventory) = fixture();
        books[0].author_id = 404;

        let rows = store_inventory(&books, &inventory, &HashMap::new(), Some("1"), None);
        assert_eq!(rows[0].author_name, UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_store_inventory_non_numeric_filter_selects_all() {
        let (_, authors, books, mut inventory) = fixture();
        inventory.push(InventoryLink {
            id: 101,
            store_id: 2,
            book_id: 10,
            price: 14.0,
        });

        let rows = store_inventory(&books, &inventory, &index(&authors), Some("all"), None);
        assert_eq!(rows.len(), 2);

        let rows = store_inventory(&books, &inventory, &index(&authors), None, None);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_store_inventory_search_matches_any_field() {
        let (_, authors, books, inventory) = fixture();
        let authors_by_id = index(&authors);

        // Title, case-insensitive.
        let rows = store_inventory(&books, &inventory, &authors_by_id, Some("1"), Some("dUnE"));
        assert_eq!(rows.len(), 1);

        // Author name.
        let rows = store_inventory(&books, &inventory, &authors_by_id, Some("1"), Some("herbert"));
        assert_eq!(rows.len(), 1);

        // Numeric field in decimal string form.
        let rows = store_inventory(&books, &inventory, &authors_by_id, Some("1"), Some("12.5"));
        assert_eq!(rows.len(), 1);

        // No match.
        let rows = store_inventory(&books, &inventory, &authors_by_id, Some("1"), Some("hobbit"));
        assert!(rows.is_empty());

        // Blank term is no filter.
        let rows = store_inventory(&books, &inventory, &authors_by_id, Some("1"), Some("   "));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_books_with_stores_resolves_store_names() {
        let (stores, authors, books, inventory) = fixture();
        let view = books_with_stores(&books, &inventory, &index(&authors), &index(&stores));

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].title, "Dune");
        assert_eq!(view[0].author, "Frank Herbert");
        assert_eq!(view[0].stores, vec![StorePrice { name: "Main".into(), price: 12.5 }]);
    }

    #[test]
    fn test_books_with_stores_unknown_store_sentinel() {
        let (_, authors, books, inventory) = fixture();
        let view = books_with_stores(&books, &inventory, &index(&authors), &HashMap::new());

        assert_eq!(view[0].stores[0].name, UNKNOWN_STORE);
    }

    #[test]
    fn test_books_with_stores_unknown_author_sentinel() {
        let (stores, _, mut books, inventory) = fixture();
        books[0].author_id = 404; // no such author

        let view = books_with_stores(&books, &inventory, &HashMap::new(), &index(&stores));
        assert_eq!(view[0].author, UNKNOWN_AUTHOR);
        // The store join is unaffected by the dangling author.
        assert_eq!(view[0].stores[0].name, "Main");
    }

    #[test]
    fn test_books_with_stores_keeps_uncarried_books() {
        let (stores, authors, mut books, inventory) = fixture();
        books.push(Book {
            id: 11,
            name: "Children of Dune".into(),
            page_count: 444,
            author_id: 5,
        });

        let view = books_with_stores(&books, &inventory, &index(&authors), &index(&stores));
        assert_eq!(view.len(), 2);
        assert!(view[1].stores.is_empty());
    }

    #[test]
    fn test_find_store() {
        let (stores, ..) = fixture();

        assert_eq!(find_store(&stores, "1").map(|s| s.id), Some(1));
        assert_eq!(find_store(&stores, " 1 ").map(|s| s.id), Some(1));
        assert!(find_store(&stores, "2").is_none());
        assert!(find_store(&stores, "abc").is_none());
    }
}
