//! Transaction and trade lifecycle.
//!
//! # Modules
//!
//! - `types` - States, decisions and workflow actions
//! - `error` - Workflow-specific error types
//! - `notes` - Append-only audit trail
//! - `payment` - Payment sub-records and partial settlement
//! - `service` - Transaction transitions
//! - `trade` - Trade transitions, settlement and flags

pub mod error;
pub mod notes;
pub mod payment;
pub mod service;
pub mod trade;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use notes::{Note, NoteError, NoteKind, NoteTrail};
pub use payment::{PaymentEntry, PaymentState, outstanding, paid_total};
pub use service::{PaymentInput, TransactionWorkflow};
pub use trade::{TradeAction, TradeCorrection, TradeSnapshot, TradeWorkflow};
pub use types::{
    ReviewDecision, Settlement, TransactionState, TransactionType, ValidationState, WorkflowAction,
};
