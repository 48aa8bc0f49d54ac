//! # Catalog Store
//!
//! Owns the four in-memory catalog collections, performs the initial
//! all-or-nothing parallel load, and applies confirmed mutation results to
//! local state.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Load State Machine                          │
//! │                                                                         │
//! │  ┌────────┐   load()    ┌─────────┐                                    │
//! │  │  Idle  │ ──────────► │ Loading │                                    │
//! │  └────────┘             └────┬────┘                                    │
//! │                              │                                          │
//! │               all 4 succeed  │  any fails                               │
//! │                        ┌─────┴─────┐                                   │
//! │                        ▼           ▼                                    │
//! │                 ┌─────────┐  ┌─────────┐                               │
//! │                 │ Success │  │  Error  │ (collections unchanged,       │
//! │                 └────┬────┘  └────┬────┘  message retained)            │
//! │                      │            │                                     │
//! │                      └─── load() again (re-enterable) ───┐             │
//! │                                                          ▼             │
//! │                                                     ┌─────────┐        │
//! │                                                     │ Loading │        │
//! │                                                     └─────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutation Discipline: Confirm-Then-Apply
//! The remote call is issued first; only a successful response is
//! reflected into local state (append for create, replace-by-id for
//! update, remove-by-id for delete). A failing call leaves local state
//! untouched and propagates the error to the caller. There is no
//! optimistic pre-application and therefore no rollback path.
//!
//! ## Mutation Serialization
//! All mutations pass through a single writer lock held across the remote
//! call and the local apply, so no two confirmed results can interleave
//! their local application. Without it, two concurrent mutations on the
//! same entity would land in resolution order and the later one could
//! silently discard the earlier one's effect.
//!
//! ## Ownership
//! This store is the single source of truth for the session. It is
//! constructed once at process start, shared by reference (`Arc`), and its
//! own methods are the only writers; everything else reads cloned
//! snapshots. Teardown simply drops the last reference.

use std::collections::HashMap;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use bookstack_core::index::build_index;
use bookstack_core::types::{
    Author, AuthorDraft, AuthorPatch, Book, BookDraft, BookPatch, InventoryDraft, InventoryLink,
    InventoryPatch, Store, StoreDraft, StorePatch,
};

use crate::error::ClientResult;
use crate::resources::ResourceClient;

// =============================================================================
// Load Status
// =============================================================================

/// Where the catalog is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing loaded yet.
    #[default]
    Idle,

    /// The four list calls are in flight.
    Loading,

    /// All four collections committed together.
    Success,

    /// At least one list call failed; collections kept their pre-load
    /// value and the triggering error's message was retained.
    Error,
}

impl LoadStatus {
    /// Returns true while the catalog has nothing usable to show.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Idle | LoadStatus::Loading)
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Idle => write!(f, "idle"),
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::Success => write!(f, "success"),
            LoadStatus::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Catalog State
// =============================================================================

/// The four collections plus their derived indexes.
///
/// Indexes are rebuilt (O(n), pure) whenever the collection under them
/// changes; a rebuild never observes a half-applied mutation because every
/// write path holds the state lock across both steps.
#[derive(Debug, Default)]
struct CatalogState {
    stores: Vec<Store>,
    books: Vec<Book>,
    authors: Vec<Author>,
    inventory: Vec<InventoryLink>,

    stores_by_id: HashMap<i64, Store>,
    books_by_id: HashMap<i64, Book>,
    authors_by_id: HashMap<i64, Author>,

    status: LoadStatus,
    error: Option<String>,
}

impl CatalogState {
    /// Replaces all four collections in one commit and rebuilds every
    /// index from the fresh data.
    fn commit_load(
        &mut self,
        stores: Vec<Store>,
        books: Vec<Book>,
        authors: Vec<Author>,
        inventory: Vec<InventoryLink>,
    ) {
        self.stores = stores;
        self.books = books;
        self.authors = authors;
        self.inventory = inventory;
        self.rebuild_store_index();
        self.rebuild_book_index();
        self.rebuild_author_index();
        self.status = LoadStatus::Success;
        self.error = None;
    }

    fn rebuild_store_index(&mut self) {
        self.stores_by_id = build_index(&self.stores);
    }

    fn rebuild_book_index(&mut self) {
        self.books_by_id = build_index(&self.books);
    }

    fn rebuild_author_index(&mut self) {
        self.authors_by_id = build_index(&self.authors);
    }

    // -------------------------------------------------------------------------
    // Local application of confirmed results
    // -------------------------------------------------------------------------

    fn apply_created_store(&mut self, store: Store) {
        self.stores.push(store);
        self.rebuild_store_index();
    }

    fn apply_updated_store(&mut self, store: Store) {
        if let Some(slot) = self.stores.iter_mut().find(|s| s.id == store.id) {
            *slot = store;
        }
        self.rebuild_store_index();
    }

    /// Removes the store and purges every inventory link that referenced
    /// it, in the same commit (cascading delete).
    fn apply_removed_store(&mut self, id: i64) {
        self.stores.retain(|s| s.id != id);
        self.inventory.retain(|link| link.store_id != id);
        self.rebuild_store_index();
    }

    fn apply_created_book(&mut self, book: Book) {
        self.books.push(book);
        self.rebuild_book_index();
    }

    fn apply_updated_book(&mut self, book: Book) {
        if let Some(slot) = self.books.iter_mut().find(|b| b.id == book.id) {
            *slot = book;
        }
        self.rebuild_book_index();
    }

    /// Removes the book and purges every inventory link that referenced
    /// it, in the same commit (cascading delete).
    fn apply_removed_book(&mut self, id: i64) {
        self.books.retain(|b| b.id != id);
        self.inventory.retain(|link| link.book_id != id);
        self.rebuild_book_index();
    }

    fn apply_created_author(&mut self, author: Author) {
        self.authors.push(author);
        self.rebuild_author_index();
    }

    fn apply_updated_author(&mut self, author: Author) {
        if let Some(slot) = self.authors.iter_mut().find(|a| a.id == author.id) {
            *slot = author;
        }
        self.rebuild_author_index();
    }

    /// Removes the author. Books keep their `author_id`; views resolve a
    /// now-dangling reference to the "Unknown Author" sentinel.
    fn apply_removed_author(&mut self, id: i64) {
        self.authors.retain(|a| a.id != id);
        self.rebuild_author_index();
    }

    fn apply_created_link(&mut self, link: InventoryLink) {
        self.inventory.push(link);
    }

    fn apply_updated_link(&mut self, link: InventoryLink) {
        if let Some(slot) = self.inventory.iter_mut().find(|l| l.id == link.id) {
            *slot = link;
        }
    }

    fn apply_removed_link(&mut self, id: i64) {
        self.inventory.retain(|l| l.id != id);
    }
}

// =============================================================================
// Catalog Snapshot
// =============================================================================

/// A cloned, disposable view of the catalog for presentation code.
///
/// Collections and indexes were captured under one lock acquisition, so
/// every index in the snapshot was built from the collection beside it.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub stores: Vec<Store>,
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
    pub inventory: Vec<InventoryLink>,

    pub stores_by_id: HashMap<i64, Store>,
    pub books_by_id: HashMap<i64, Book>,
    pub authors_by_id: HashMap<i64, Author>,

    pub status: LoadStatus,
    pub error: Option<String>,
}

// =============================================================================
// Catalog Store
// =============================================================================

/// The session's single source of truth for the four catalog collections.
pub struct CatalogStore {
    resources: ResourceClient,
    state: RwLock<CatalogState>,

    /// Serializes mutations: held across the remote call AND the local
    /// apply, so confirmed results land in issue order.
    writer: Mutex<()>,
}

impl CatalogStore {
    /// Creates an empty catalog store over a resource client.
    ///
    /// Collections start empty; call [`load`](Self::load) to populate.
    pub fn new(resources: ResourceClient) -> Self {
        CatalogStore {
            resources,
            state: RwLock::new(CatalogState::default()),
            writer: Mutex::new(()),
        }
    }

    /// Returns the resource client, for reads that bypass the catalog
    /// collections (e.g. per-store inventory lookups).
    pub fn resources(&self) -> &ResourceClient {
        &self.resources
    }

    // =========================================================================
    // Initial / Refresh Load
    // =========================================================================

    /// Loads (or reloads) all four collections.
    ///
    /// The four list calls run concurrently. Commit is all-or-nothing: if
    /// any call fails, no collection changes, status becomes `Error`, and
    /// the triggering error's message is retained — which of the four
    /// failed is not distinguished. This avoids partially-consistent
    /// joins, like inventory referencing books that were never loaded.
    pub async fn load(&self) -> ClientResult<()> {
        {
            let mut state = self.state.write().await;
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        let result = tokio::try_join!(
            self.resources.list_stores(),
            self.resources.list_books(),
            self.resources.list_authors(),
            self.resources.list_inventory(),
        );

        match result {
            Ok((stores, books, authors, inventory)) => {
                let mut state = self.state.write().await;
                info!(
                    stores = stores.len(),
                    books = books.len(),
                    authors = authors.len(),
                    inventory = inventory.len(),
                    "Catalog loaded"
                );
                state.commit_load(stores, books, authors, inventory);
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.write().await;
                warn!(%err, "Catalog load failed; keeping previous collections");
                state.status = LoadStatus::Error;
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    /// Returns a cloned snapshot of the whole catalog.
    pub async fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state.read().await;
        CatalogSnapshot {
            stores: state.stores.clone(),
            books: state.books.clone(),
            authors: state.authors.clone(),
            inventory: state.inventory.clone(),
            stores_by_id: state.stores_by_id.clone(),
            books_by_id: state.books_by_id.clone(),
            authors_by_id: state.authors_by_id.clone(),
            status: state.status,
            error: state.error.clone(),
        }
    }

    /// Returns the current load status.
    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status
    }

    /// Returns the retained load error message, if the last load failed.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    /// Lists the inventory links for one store, delegating to the
    /// resource client (live: server-filtered; static: client-filtered;
    /// non-numeric id: empty result, no call).
    pub async fn inventory_for_store(&self, store_id: &str) -> ClientResult<Vec<InventoryLink>> {
        self.resources.inventory_for_store(store_id).await
    }

    // =========================================================================
    // Store Mutations
    // =========================================================================

    pub async fn create_store(&self, draft: &StoreDraft) -> ClientResult<Store> {
        let _guard = self.writer.lock().await;
        let created = self.resources.create_store(draft).await?;
        self.state.write().await.apply_created_store(created.clone());
        Ok(created)
    }

    pub async fn update_store(&self, id: i64, patch: &StorePatch) -> ClientResult<Store> {
        let _guard = self.writer.lock().await;
        let updated = self.resources.update_store(id, patch).await?;
        self.state.write().await.apply_updated_store(updated.clone());
        Ok(updated)
    }

    /// Deletes a store and purges its inventory links locally in the same
    /// commit.
    ///
    /// The purge is local-only: the remote backend does not cascade, and
    /// the next full reload reconverges either way.
    pub async fn delete_store(&self, id: i64) -> ClientResult<()> {
        let _guard = self.writer.lock().await;
        self.resources.delete_store(id).await?;
        self.state.write().await.apply_removed_store(id);
        Ok(())
    }

    // =========================================================================
    // Book Mutations
    // =========================================================================

    pub async fn create_book(&self, draft: &BookDraft) -> ClientResult<Book> {
        let _guard = self.writer.lock().await;
        let created = self.resources.create_book(draft).await?;
        self.state.write().await.apply_created_book(created.clone());
        Ok(created)
    }

    pub async fn update_book(&self, id: i64, patch: &BookPatch) -> ClientResult<Book> {
        let _guard = self.writer.lock().await;
        let updated = self.resources.update_book(id, patch).await?;
        self.state.write().await.apply_updated_book(updated.clone());
        Ok(updated)
    }

    /// Deletes a book and purges its inventory links locally in the same
    /// commit.
    pub async fn delete_book(&self, id: i64) -> ClientResult<()> {
        let _guard = self.writer.lock().await;
        self.resources.delete_book(id).await?;
        self.state.write().await.apply_removed_book(id);
        Ok(())
    }

    // =========================================================================
    // Author Mutations
    // =========================================================================

    pub async fn create_author(&self, draft: &AuthorDraft) -> ClientResult<Author> {
        let _guard = self.writer.lock().await;
        let created = self.resources.create_author(draft).await?;
        self.state.write().await.apply_created_author(created.clone());
        Ok(created)
    }

    pub async fn update_author(&self, id: i64, patch: &AuthorPatch) -> ClientResult<Author> {
        let _guard = self.writer.lock().await;
        let updated = self.resources.update_author(id, patch).await?;
        self.state.write().await.apply_updated_author(updated.clone());
        Ok(updated)
    }

    /// Deletes an author. Books referencing it keep their `author_id`;
    /// views show the "Unknown Author" sentinel until the data is fixed.
    pub async fn delete_author(&self, id: i64) -> ClientResult<()> {
        let _guard = self.writer.lock().await;
        self.resources.delete_author(id).await?;
        self.state.write().await.apply_removed_author(id);
        Ok(())
    }

    // =========================================================================
    // Inventory Mutations
    // =========================================================================

    pub async fn create_inventory(&self, draft: &InventoryDraft) -> ClientResult<InventoryLink> {
        let _guard = self.writer.lock().await;
        let created = self.resources.create_inventory(draft).await?;
        self.state.write().await.apply_created_link(created.clone());
        Ok(created)
    }

    pub async fn update_inventory(
        &self,
        id: i64,
        patch: &InventoryPatch,
    ) -> ClientResult<InventoryLink> {
        let _guard = self.writer.lock().await;
        let updated = self.resources.update_inventory(id, patch).await?;
        self.state.write().await.apply_updated_link(updated.clone());
        Ok(updated)
    }

    pub async fn delete_inventory(&self, id: i64) -> ClientResult<()> {
        let _guard = self.writer.lock().await;
        self.resources.delete_inventory(id).await?;
        self.state.write().await.apply_removed_link(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, SnapshotSettings, SourceMode, SourceSettings};
    use crate::transport::Transport;
    use std::path::Path;
    use std::sync::Arc;

    // -------------------------------------------------------------------------
    // Pure state application tests
    // -------------------------------------------------------------------------

    fn store(id: i64, name: &str) -> Store {
        Store {
            id,
            name: name.into(),
            address_1: "1 First St".into(),
            address_2: None,
            city: "Springfield".into(),
            state: "IL".into(),
            zip: "62701".into(),
        }
    }

    fn book(id: i64, name: &str) -> Book {
        Book {
            id,
            name: name.into(),
            page_count: 100,
            author_id: 5,
        }
    }

    fn link(id: i64, store_id: i64, book_id: i64) -> InventoryLink {
        InventoryLink {
            id,
            store_id,
            book_id,
            price: 10.0,
        }
    }

    fn seeded_state() -> CatalogState {
        let mut state = CatalogState::default();
        state.commit_load(
            vec![store(1, "Main"), store(2, "Annex")],
            vec![book(10, "Dune"), book(11, "Hyperion")],
            vec![Author {
                id: 5,
                first_name: "Frank".into(),
                last_name: "Herbert".into(),
            }],
            vec![link(100, 1, 10), link(101, 2, 10), link(102, 1, 11)],
        );
        state
    }

    #[test]
    fn test_create_appears_exactly_once_and_indexed() {
        let mut state = seeded_state();
        state.apply_created_store(store(3, "Harbor"));

        assert_eq!(state.stores.iter().filter(|s| s.id == 3).count(), 1);
        assert_eq!(state.stores_by_id[&3].name, "Harbor");
    }

    #[test]
    fn test_update_replaces_only_matching_entry() {
        let mut state = seeded_state();
        let before_annex = state.stores[1].clone();

        state.apply_updated_store(store(1, "Main Street Books"));

        assert_eq!(state.stores[0].name, "Main Street Books");
        assert_eq!(state.stores[1], before_annex);
        assert_eq!(state.stores_by_id[&1].name, "Main Street Books");
    }

    #[test]
    fn test_update_for_absent_id_is_noop() {
        let mut state = seeded_state();
        state.apply_updated_store(store(42, "Ghost"));

        assert_eq!(state.stores.len(), 2);
        assert!(!state.stores_by_id.contains_key(&42));
    }

    #[test]
    fn test_delete_store_cascades_to_inventory() {
        let mut state = seeded_state();
        state.apply_removed_store(1);

        assert_eq!(state.stores.len(), 1);
        assert!(!state.stores_by_id.contains_key(&1));
        // Links 100 and 102 pointed at store 1 and are gone with it.
        assert_eq!(state.inventory.len(), 1);
        assert_eq!(state.inventory[0].id, 101);
    }

    #[test]
    fn test_delete_book_cascades_to_inventory() {
        let mut state = seeded_state();
        state.apply_removed_book(10);

        assert_eq!(state.books.len(), 1);
        // Links 100 and 101 referenced book 10.
        assert_eq!(state.inventory.len(), 1);
        assert_eq!(state.inventory[0].id, 102);
    }

    #[test]
    fn test_repeated_delete_is_locally_idempotent() {
        let mut state = seeded_state();
        state.apply_removed_link(100);
        let after_first = state.inventory.clone();

        state.apply_removed_link(100);
        assert_eq!(state.inventory, after_first);
    }

    #[test]
    fn test_delete_author_leaves_books_dangling() {
        let mut state = seeded_state();
        state.apply_removed_author(5);

        assert!(state.authors.is_empty());
        assert_eq!(state.books.len(), 2); // books keep their author_id
    }

    // -------------------------------------------------------------------------
    // Load lifecycle tests (static snapshots via tempdir)
    // -------------------------------------------------------------------------

    fn write_snapshots(root: &Path) {
        std::fs::write(
            root.join("stores.json"),
            r#"[{"id":1,"name":"Main","address_1":"1 First St","city":"Springfield","state":"IL","zip":"62701"}]"#,
        )
        .unwrap();
        std::fs::write(
            root.join("books.json"),
            r#"[{"id":10,"name":"Dune","page_count":412,"author_id":5}]"#,
        )
        .unwrap();
        std::fs::write(
            root.join("authors.json"),
            r#"[{"id":5,"first_name":"Frank","last_name":"Herbert"}]"#,
        )
        .unwrap();
        std::fs::write(
            root.join("inventory.json"),
            r#"[{"id":100,"store_id":1,"book_id":10,"price":12.5}]"#,
        )
        .unwrap();
    }

    fn static_catalog(root: &Path) -> CatalogStore {
        let config = ClientConfig {
            source: SourceSettings {
                mode: SourceMode::Static,
            },
            snapshot: SnapshotSettings {
                root: root.to_path_buf(),
            },
            ..Default::default()
        };
        let transport = Arc::new(Transport::from_config(&config).unwrap());
        CatalogStore::new(ResourceClient::new(transport))
    }

    #[tokio::test]
    async fn test_load_commits_all_four_collections() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshots(dir.path());
        let catalog = static_catalog(dir.path());

        assert_eq!(catalog.status().await, LoadStatus::Idle);
        catalog.load().await.unwrap();

        let snapshot = catalog.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Success);
        assert_eq!(snapshot.stores.len(), 1);
        assert_eq!(snapshot.books.len(), 1);
        assert_eq!(snapshot.authors.len(), 1);
        assert_eq!(snapshot.inventory.len(), 1);
        // Indexes belong to the same commit as the collections.
        assert_eq!(snapshot.authors_by_id[&5].last_name, "Herbert");
        assert_eq!(snapshot.books_by_id[&10].name, "Dune");
        assert_eq!(snapshot.stores_by_id[&1].name, "Main");
    }

    #[tokio::test]
    async fn test_partial_load_failure_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshots(dir.path());
        let catalog = static_catalog(dir.path());
        catalog.load().await.unwrap();

        // Break one of the four resources, then reload.
        std::fs::remove_file(dir.path().join("authors.json")).unwrap();
        let err = catalog.load().await.unwrap_err();
        assert!(matches!(err, crate::error::ClientError::Snapshot { .. }));

        let snapshot = catalog.snapshot().await;
        assert_eq!(snapshot.status, LoadStatus::Error);
        assert!(snapshot.error.is_some());
        // Pre-load values kept, all four of them.
        assert_eq!(snapshot.stores.len(), 1);
        assert_eq!(snapshot.books.len(), 1);
        assert_eq!(snapshot.authors.len(), 1);
        assert_eq!(snapshot.inventory.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshots(dir.path());
        let catalog = static_catalog(dir.path());
        catalog.load().await.unwrap();

        let before = catalog.snapshot().await;

        // Static mode rejects every write; confirm-then-apply means the
        // rejection leaves local state exactly as it was.
        let err = catalog
            .create_book(&BookDraft {
                name: "Hyperion".into(),
                page_count: 482,
                author_id: 7,
            })
            .await
            .unwrap_err();
        assert!(err.is_write_rejected());

        let err = catalog.delete_store(1).await.unwrap_err();
        assert!(err.is_write_rejected());

        let after = catalog.snapshot().await;
        assert_eq!(after.books, before.books);
        assert_eq!(after.stores, before.stores);
        assert_eq!(after.inventory, before.inventory);
        assert_eq!(after.status, LoadStatus::Success);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LoadStatus::Loading.to_string(), "loading");
        assert_eq!(LoadStatus::Error.to_string(), "error");
        assert!(LoadStatus::Idle.is_loading());
        assert!(!LoadStatus::Success.is_loading());
    }
}
