//! Core desk logic for FX Desk.
//!
//! This crate contains pure desk logic with ZERO network or runtime dependencies.
//! Every figure shown to an operator and every payload sent to the accounting
//! engine is computed here. The engine stays authoritative for stored balances.
//!
//! # Modules
//!
//! - `conversion` - Rate/amount converter, one quote per transaction or trade shape
//! - `trading` - Wallet balances, trade commit math and grouped commit selection
//! - `request` - Engine request payloads, validation and builders
//! - `workflow` - Transaction and trade lifecycle with the notes audit trail

pub mod conversion;
pub mod request;
pub mod trading;
pub mod workflow;
