//! # Domain Types
//!
//! Core domain types used throughout Bookstack.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Store       │   │      Book       │   │     Author      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name           │   │  name           │   │  first_name     │       │
//! │  │  address/city   │   │  page_count     │   │  last_name      │       │
//! │  │  state/zip      │   │  author_id (FK) │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      InventoryLink                              │   │
//! │  │  ───────────────────────────────────────────────────────────    │   │
//! │  │  id (i64)   store_id (FK)   book_id (FK)   price (f64)          │   │
//! │  │                                                                 │   │
//! │  │  Join entity: one row per (store, book) carried by that store.  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Rules
//! - Every entity is keyed by a caller-visible integer `id`.
//! - Ids are assigned by the remote backend on create and adopted verbatim;
//!   they are never minted or reused client-side.
//! - Dangling references (`Book.author_id`, `InventoryLink.book_id`/`store_id`)
//!   are tolerated in the data and resolved to "Unknown" sentinels at view
//!   time, never treated as errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Store
// =============================================================================

/// A physical bookstore location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Unique identifier, assigned by the backend.
    pub id: i64,

    /// Display name shown in store pickers and inventory views.
    pub name: String,

    /// First address line.
    pub address_1: String,

    /// Second address line (suite, floor), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,

    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Payload for creating a store. The backend assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDraft {
    pub name: String,
    pub address_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Partial update for a store. Only the fields that are `Some` are sent,
/// so the PATCH body stays minimal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

// =============================================================================
// Author
// =============================================================================

/// A book author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Unique identifier, assigned by the backend.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    /// Returns the display name shown in views ("first last").
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDraft {
    pub first_name: String,
    pub last_name: String,
}

/// Partial update for an author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

// =============================================================================
// Book
// =============================================================================

/// A book title in the catalog.
///
/// `author_id` may dangle (author deleted, or snapshot out of step); views
/// resolve it to an "Unknown Author" sentinel rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, assigned by the backend.
    pub id: i64,

    /// Title of the book.
    pub name: String,

    /// Number of pages. Positive in well-formed data.
    pub page_count: u32,

    /// Reference to the author. May not resolve.
    pub author_id: i64,
}

/// Payload for creating a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDraft {
    pub name: String,
    pub page_count: u32,
    pub author_id: i64,
}

/// Partial update for a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

// =============================================================================
// Inventory Link
// =============================================================================

/// One book carried by one store at a price.
///
/// ## Well-Formedness
/// A `(store_id, book_id)` pair should appear at most once per store, but
/// this is a caller responsibility and is not enforced here: duplicate links
/// simply produce duplicate rows in the derived views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLink {
    /// Unique identifier, assigned by the backend.
    pub id: i64,

    /// Store carrying the book. May not resolve.
    pub store_id: i64,

    /// Book carried. May not resolve.
    pub book_id: i64,

    /// Price at this store. Non-negative in well-formed data.
    pub price: f64,
}

/// Payload for creating an inventory link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDraft {
    pub store_id: i64,
    pub book_id: i64,
    pub price: f64,
}

/// Partial update for an inventory link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

// =============================================================================
// User & Session
// =============================================================================

/// A signed-in user, as returned by `POST /login`.
///
/// The backend strips the password field before responding, so it never
/// exists client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// An authenticated session.
///
/// Produced by the auth client on a successful login; held by the
/// presentation layer and only ever read by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Opaque bearer token issued by the backend.
    pub token: String,

    /// The signed-in user.
    pub user: User,

    /// When the session was established.
    pub signed_in_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_display_name() {
        let author = Author {
            id: 5,
            first_name: "Frank".into(),
            last_name: "Herbert".into(),
        };
        assert_eq!(author.display_name(), "Frank Herbert");
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = BookPatch {
            page_count: Some(412),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "page_count": 412 }));
    }

    #[test]
    fn test_store_optional_address_line() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Main",
            "address_1": "1 First St",
            "city": "Springfield",
            "state": "IL",
            "zip": "62701"
        });
        let store: Store = serde_json::from_value(json).unwrap();
        assert_eq!(store.address_2, None);
    }
}
