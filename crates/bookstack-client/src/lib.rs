//! # bookstack-client: Data Access Layer for Bookstack
//!
//! This crate talks to one of two interchangeable backends — a writable
//! remote REST API or a read-only static snapshot directory — holds the
//! four normalized catalog collections in memory, and keeps them
//! consistent after mutations without refetching.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Data Access Architecture                            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 CatalogStore (Session Source of Truth)           │  │
//! │  │                                                                  │  │
//! │  │  Constructed once at process start, Arc-shared to all consumers  │  │
//! │  │  stores / books / authors / inventory + id indexes + status      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ ResourceClient │  │   Transport    │  │  AuthClient            │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Typed CRUD per │  │ Live (reqwest) │  │ POST /login →          │    │
//! │  │ entity at fixed│  │ or Static      │  │ AuthSession            │    │
//! │  │ resource paths │  │ (snapshot dir) │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  DATA FLOWS DOWN:  Transport → ResourceClient → CatalogStore →         │
//! │                    views (bookstack-core) → presentation               │
//! │  MUTATIONS FLOW UP: presentation → CatalogStore mutators →             │
//! │                    ResourceClient → Transport; confirmed results       │
//! │                    flow back down into the collections                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Backend selection (live vs static), TOML + env
//! - [`error`] - Client error types
//! - [`transport`] - One logical request per call, uniform error shape
//! - [`resources`] - Typed CRUD operations per entity
//! - [`catalog`] - The in-memory catalog store (load + confirm-then-apply)
//! - [`auth`] - Login and session construction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bookstack_client::{AuthClient, CatalogStore, ClientConfig, ResourceClient, Transport};
//!
//! let config = ClientConfig::load_or_default(None);
//! let transport = Arc::new(Transport::from_config(&config)?);
//!
//! let catalog = Arc::new(CatalogStore::new(ResourceClient::new(transport.clone())));
//! catalog.load().await?;
//!
//! let auth = AuthClient::new(transport);
//! let session = auth.login("admin@bookstack.io", "admin123").await?;
//!
//! let snapshot = catalog.snapshot().await;
//! println!("{} books across {} stores", snapshot.books.len(), snapshot.stores.len());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod resources;
pub mod transport;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::AuthClient;
pub use catalog::{CatalogSnapshot, CatalogStore, LoadStatus};
pub use config::{ClientConfig, SourceMode};
pub use error::{ClientError, ClientResult};
pub use resources::ResourceClient;
pub use transport::{Method, Payload, RequestOptions, Transport};
