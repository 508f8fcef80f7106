//! Core traits for the upkeep admin adapter
//!
//! This module defines the collaborators the adapter calls into.
//!
//! - [`Broadcaster`]: Execute read calls and atomic state-changing calls
//! - [`Signer`]: Supply the caller's account address

pub mod broadcaster;
pub mod signer;

pub use broadcaster::{Broadcaster, Log, TxReceipt};
pub use signer::{Signer, StaticSigner};
