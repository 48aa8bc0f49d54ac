//! # Resource Client
//!
//! One typed operation set per entity, each a thin, fixed mapping onto
//! transport calls.
//!
//! ## Resource Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Resource Path Mapping                            │
//! │                                                                         │
//! │  Entity          List/Create         Update/Delete                      │
//! │  ──────          ───────────         ─────────────                      │
//! │  Store           stores              stores/{id}                        │
//! │  Book            books               books/{id}                         │
//! │  Author          authors             authors/{id}                       │
//! │  InventoryLink   inventory           inventory/{id}                     │
//! │                                                                         │
//! │  inventory_for_store(store_id):                                         │
//! │    live mode   → GET inventory?store_id=N   (server-side filter)        │
//! │    static mode → GET inventory + client-side filter (snapshots are      │
//! │                  not parameterized)                                      │
//! │    non-numeric → Ok(vec![]) with NO transport call                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Create/update payloads pass through unmodified: required-field and
//! range validation is a presentation-layer responsibility, not enforced
//! here.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use bookstack_core::types::{
    Author, AuthorDraft, AuthorPatch, Book, BookDraft, BookPatch, InventoryDraft, InventoryLink,
    InventoryPatch, Store, StoreDraft, StorePatch,
};

use crate::config::SourceMode;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Method, RequestOptions, Transport};

/// Resource path for stores.
const STORES: &str = "stores";
/// Resource path for books.
const BOOKS: &str = "books";
/// Resource path for authors.
const AUTHORS: &str = "authors";
/// Resource path for inventory links.
const INVENTORY: &str = "inventory";

/// Typed CRUD operations over the four catalog resources.
pub struct ResourceClient {
    transport: Arc<Transport>,
}

impl ResourceClient {
    /// Creates a resource client over a shared transport.
    pub fn new(transport: Arc<Transport>) -> Self {
        ResourceClient { transport }
    }

    /// Returns the backend mode the underlying transport runs in.
    pub fn mode(&self) -> SourceMode {
        self.transport.mode()
    }

    // =========================================================================
    // Generic Operations
    // =========================================================================

    async fn list<T: DeserializeOwned>(&self, resource: &str) -> ClientResult<Vec<T>> {
        self.transport
            .request(Method::Get, resource, RequestOptions::default())
            .await?
            .decode()
    }

    async fn create<T, B>(&self, resource: &str, draft: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_json::to_value(draft).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.transport
            .request(Method::Post, resource, RequestOptions::with_body(body))
            .await?
            .decode()
    }

    async fn update<T, B>(&self, resource: &str, id: i64, patch: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let body = serde_json::to_value(patch).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.transport
            .request(
                Method::Patch,
                &format!("{resource}/{id}"),
                RequestOptions::with_body(body),
            )
            .await?
            .decode()
    }

    async fn delete(&self, resource: &str, id: i64) -> ClientResult<()> {
        // Delete responses carry no body worth decoding.
        self.transport
            .request(Method::Delete, &format!("{resource}/{id}"), RequestOptions::default())
            .await?;
        Ok(())
    }

    // =========================================================================
    // Stores
    // =========================================================================

    pub async fn list_stores(&self) -> ClientResult<Vec<Store>> {
        self.list(STORES).await
    }

    pub async fn create_store(&self, draft: &StoreDraft) -> ClientResult<Store> {
        self.create(STORES, draft).await
    }

    pub async fn update_store(&self, id: i64, patch: &StorePatch) -> ClientResult<Store> {
        self.update(STORES, id, patch).await
    }

    pub async fn delete_store(&self, id: i64) -> ClientResult<()> {
        self.delete(STORES, id).await
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub async fn list_books(&self) -> ClientResult<Vec<Book>> {
        self.list(BOOKS).await
    }

    pub async fn create_book(&self, draft: &BookDraft) -> ClientResult<Book> {
        self.create(BOOKS, draft).await
    }

    pub async fn update_book(&self, id: i64, patch: &BookPatch) -> ClientResult<Book> {
        self.update(BOOKS, id, patch).await
    }

    pub async fn delete_book(&self, id: i64) -> ClientResult<()> {
        self.delete(BOOKS, id).await
    }

    // =========================================================================
    // Authors
    // =========================================================================

    pub async fn list_authors(&self) -> ClientResult<Vec<Author>> {
        self.list(AUTHORS).await
    }

    pub async fn create_author(&self, draft: &AuthorDraft) -> ClientResult<Author> {
        self.create(AUTHORS, draft).await
    }

    pub async fn update_author(&self, id: i64, patch: &AuthorPatch) -> ClientResult<Author> {
        self.update(AUTHORS, id, patch).await
    }

    pub async fn delete_author(&self, id: i64) -> ClientResult<()> {
        self.delete(AUTHORS, id).await
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub async fn list_inventory(&self) -> ClientResult<Vec<InventoryLink>> {
        self.list(INVENTORY).await
    }

    /// Lists the inventory links for one store.
    ///
    /// The store id arrives as a string (it is captured from a route or a
    /// form); a non-numeric value is a caller-routing mistake, absorbed
    /// into an empty result with **no transport call**.
    ///
    /// Live mode issues a single filtered list call. Static mode issues an
    /// unfiltered list call and filters here, because snapshots cannot be
    /// server-filtered.
    pub async fn inventory_for_store(&self, store_id: &str) -> ClientResult<Vec<InventoryLink>> {
        let id: i64 = match store_id.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                debug!(store_id, "Non-numeric store id, returning empty inventory");
                return Ok(Vec::new());
            }
        };

        match self.mode() {
            SourceMode::Live => {
                let query = vec![("store_id".to_string(), id.to_string())];
                self.transport
                    .request(Method::Get, INVENTORY, RequestOptions::with_query(query))
                    .await?
                    .decode()
            }
            SourceMode::Static => {
                let all: Vec<InventoryLink> = self.list(INVENTORY).await?;
                Ok(all.into_iter().filter(|link| link.store_id == id).collect())
            }
        }
    }

    pub async fn create_inventory(&self, draft: &InventoryDraft) -> ClientResult<InventoryLink> {
        self.create(INVENTORY, draft).await
    }

    pub async fn update_inventory(
        &self,
        id: i64,
        patch: &InventoryPatch,
    ) -> ClientResult<InventoryLink> {
        self.update(INVENTORY, id, patch).await
    }

    pub async fn delete_inventory(&self, id: i64) -> ClientResult<()> {
        self.delete(INVENTORY, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, SnapshotSettings, SourceSettings};
    use std::path::Path;

    fn static_client(root: &Path) -> ResourceClient {
        let config = ClientConfig {
            source: SourceSettings {
                mode: SourceMode::Static,
            },
            snapshot: SnapshotSettings {
                root: root.to_path_buf(),
            },
            ..Default::default()
        };
        ResourceClient::new(Arc::new(Transport::from_config(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_inventory_for_store_non_numeric_short_circuits() {
        // No snapshot files exist here; a transport call would fail with a
        // Snapshot error, so an Ok(empty) proves none was made.
        let dir = tempfile::tempdir().unwrap();
        let client = static_client(dir.path());

        let links = client.inventory_for_store("abc").await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_inventory_for_store_filters_static_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("inventory.json"),
            r#"[
                {"id":100,"store_id":1,"book_id":10,"price":12.5},
                {"id":101,"store_id":2,"book_id":10,"price":14.0},
                {"id":102,"store_id":1,"book_id":11,"price":9.0}
            ]"#,
        )
        .unwrap();
        let client = static_client(dir.path());

        let links = client.inventory_for_store("1").await.unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|link| link.store_id == 1));
    }

    #[tokio::test]
    async fn test_static_create_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let client = static_client(dir.path());

        let draft = AuthorDraft {
            first_name: "Frank".into(),
            last_name: "Herbert".into(),
        };
        let err = client.create_author(&draft).await.unwrap_err();
        assert!(err.is_write_rejected());
    }

    #[tokio::test]
    async fn test_list_decodes_typed_collection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("books.json"),
            r#"[{"id":10,"name":"Dune","page_count":412,"author_id":5}]"#,
        )
        .unwrap();
        let client = static_client(dir.path());

        let books = client.list_books().await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Dune");
    }
}
