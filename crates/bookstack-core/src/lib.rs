//! # bookstack-core: Pure Domain Logic for Bookstack
//!
//! This crate is the **heart** of the Bookstack catalog client. It contains
//! the domain types and every derived view as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bookstack Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation (external)                        │   │
//! │  │    Store pages ──► Book pages ──► Inventory tables ──► Auth UI  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ reads snapshots, calls mutators        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                bookstack-client (Data Access)                   │   │
//! │  │     Transport ──► Resource Client ──► Catalog Store ──► Auth    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ bookstack-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌───────────┐          │   │
//! │  │   │   types   │      │   index   │      │   views   │          │   │
//! │  │   │  Store    │      │ id → T    │      │ inventory │          │   │
//! │  │   │  Book     │      │ HashMaps  │      │ joins     │          │   │
//! │  │   │  Author   │      │           │      │ search    │          │   │
//! │  │   └───────────┘      └───────────┘      └───────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Store, Book, Author, InventoryLink, session)
//! - [`index`] - Id-to-entity lookup map construction
//! - [`views`] - Denormalized view derivations (the View Composer)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every derivation is deterministic - same
//!    collections in, same view out
//! 2. **No I/O**: network and file system access is FORBIDDEN here
//! 3. **Disposable Outputs**: views are owned copies; nothing here can
//!    write back into the catalog collections
//! 4. **Sentinels, Not Errors**: dangling references resolve to
//!    "Unknown Author" / "Unknown Store" at view time
//!
//! ## Example Usage
//!
//! ```rust
//! use bookstack_core::index::build_index;
//! use bookstack_core::types::{Author, Book, InventoryLink};
//! use bookstack_core::views::store_inventory;
//!
//! let authors = vec![Author { id: 5, first_name: "Frank".into(), last_name: "Herbert".into() }];
//! let books = vec![Book { id: 10, name: "Dune".into(), page_count: 412, author_id: 5 }];
//! let links = vec![InventoryLink { id: 100, store_id: 1, book_id: 10, price: 12.5 }];
//!
//! let rows = store_inventory(&books, &links, &build_index(&authors), Some("1"), None);
//! assert_eq!(rows[0].author_name, "Frank Herbert");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod index;
pub mod types;
pub mod views;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bookstack_core::Book` instead of
// `use bookstack_core::types::Book`

pub use index::build_index;
pub use types::*;
pub use views::{BookWithStores, StoreInventoryRow, StorePrice, UNKNOWN_AUTHOR, UNKNOWN_STORE};
