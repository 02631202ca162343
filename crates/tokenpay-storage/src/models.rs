// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types live in `tokenpay-core::types` so they can cross the
//! adapter trait boundary. Re-exported here for convenience.

pub use tokenpay_core::types::{CreditOutcome, NewReceipt, ReceiptRecord, UserVerificationConfig};
