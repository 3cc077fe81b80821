//! Accounting engine contract and desk actions for FX Desk.
//!
//! The engine owns every balance and state. This crate describes what the
//! desk can ask of it, talks to it over HTTP, and wraps each operation so the
//! caller always receives a [`State`].
//!
//! # Modules
//!
//! - `engine` - The [`AccountingEngine`] trait
//! - `http` - [`HttpEngine`], the REST implementation
//! - `dto` - Engine responses
//! - `actions` - [`Desk`], one method per operator action
//! - `state` - The uniform action result

pub mod actions;
pub mod dto;
pub mod engine;
pub mod error;
pub mod http;
pub mod state;

pub use actions::Desk;
pub use engine::{AccountingEngine, EngineResult};
pub use error::{ActionError, EngineError};
pub use http::HttpEngine;
pub use state::{BatchOutcome, FailureKind, State, Status};
