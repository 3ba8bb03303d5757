//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (conversation key, timestamps, errors)
//! - `catalog` - Project catalog and resolver
//! - `conversation` - Chat history turns
//! - `issue` - Issue drafts, template validation and preview rendering
//! - `dialogue` - Model contract, structured extraction and normalization

pub mod catalog;
pub mod conversation;
pub mod dialogue;
pub mod foundation;
pub mod issue;
