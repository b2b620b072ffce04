//! `shopbill-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! errors, natural keys and exact decimal helpers shared by the inventory and
//! billing crates.

pub mod decimal;
pub mod entity;
pub mod error;
pub mod key;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use key::{ItemKey, KeyClock};
