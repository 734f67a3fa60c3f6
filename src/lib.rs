//! techtrack: keep track of the technologies you are learning.
//!
//! The crate is organised leaves first:
//!
//! - [`store`]: synchronous key-value persistence with a JSON adapter that
//!   absorbs storage failures.
//! - [`models`]: the technology record and its status cycle.
//! - [`repository`]: the single owner of the list; every mutation is written
//!   through to the store.
//! - [`views`]: filters, sorting and statistics computed from the list.
//! - [`export`]: the JSON snapshot offered for download.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod render;
pub mod repository;
pub mod store;
pub mod views;

pub use error::{StorageError, ValidationError};
pub use repository::TechnologyRepository;
