//! Issue Scribe - Chat-driven issue filing
//!
//! Watches a chat topic, talks with the author through a language model until
//! a complete issue draft emerges, and files it in the issue tracker.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
