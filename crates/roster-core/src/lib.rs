//! Core types and trait definitions for the Roster marketplace.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It holds the application workflow, the access gate, the position
//! classifier and the directory engine; storage backends implement
//! [`store::RosterStore`] and transport adapters call into the facades in
//! [`workflow`], [`directory`] and [`registry`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod application;
pub mod directory;
pub mod error;
pub mod party;
pub mod position;
pub mod principal;
pub mod registry;
pub mod store;
pub mod workflow;

pub use error::{Error, Result};
