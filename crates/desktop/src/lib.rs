//! `stockroom-desktop`
//!
//! **Responsibility:** the operator-facing layer over the inventory.
//!
//! This crate provides:
//! - Entry forms with the part/product validation rules
//! - The session that owns the inventory and tracks the open screen
//! - A line-oriented console front end
//! - Start-up configuration

pub mod config;
pub mod console;
pub mod forms;
pub mod session;

pub use config::{ConfigError, DesktopConfig};
pub use forms::{FormError, PartForm, ProductForm, StockFields};
pub use session::{ProductDraft, Screen, SearchQuery, SelectionFor, Session, SessionError};
