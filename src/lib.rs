// Holly API - ElevenLabs conversation webhook backend
// Copyright (c) 2025 Holly API Contributors
// Licensed under the MIT License

//! # Holly API - ElevenLabs conversation webhook backend
//!
//! Backend for the Holly voice agent: receives conversation webhooks and
//! persists conversations, caller profiles and insights in Azure Cosmos DB.
//!
//! ## Overview
//!
//! This library provides:
//! - **Document access** to the `conversations`, `profiles` and `insights`
//!   containers, with partition-key handling and create/upsert/read/query
//! - **Provisioning** of the database and containers at startup
//! - **An HTTP shell** (health, discovery root, API reference) that external
//!   routers are mounted into
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`api`] - HTTP application shell
//! - [`core`] - Container registry and the document store
//! - [`adapters`] - Storage backends (Cosmos DB, in-memory)
//! - [`domain`] - Documents, identifiers, queries and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use holly_api::api::{self, AppState};
//! use holly_api::config::load_config_or_default;
//! use holly_api::core::DocumentStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("holly.toml")?;
//!
//!     let mut store = DocumentStore::connect(&config)?;
//!     store.initialize_containers().await?;
//!
//!     let state = AppState::new(Arc::new(store), config.application.clone());
//!     let app = api::app(state, axum::Router::new());
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     api::serve(&config.server, app, shutdown_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Writing Documents
//!
//! Every document gets an `id` (defaulting to the partition-key value) and the
//! container's partition-key field, forced to the value passed in:
//!
//! ```rust,no_run
//! use holly_api::core::{ContainerName, DocumentStore};
//! use serde_json::json;
//!
//! # async fn example(store: &DocumentStore) -> holly_api::domain::Result<()> {
//! let outcome = store
//!     .create_item(ContainerName::Profiles, json!({"name": "Alice"}), "user-42")
//!     .await?;
//!
//! if !outcome.stored {
//!     tracing::warn!("storage is degraded, profile was not saved");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], whose error type
//! [`domain::ApiError`] converts into an HTTP response in handlers.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
