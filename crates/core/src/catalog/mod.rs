//! SQLite-backed catalog of items and categories.
//!
//! This module provides the persistent item catalog using SQLite with
//! async access via tokio-rusqlite. It supports:
//!
//! - Item creation with lazy, race-free category resolution
//! - Ordered listing, id lookup, and substring search
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod items;
pub mod migrations;

pub use crate::Error;

pub use connection::CatalogDb;
pub use items::ItemView;
