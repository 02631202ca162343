// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Receipt verification policy and token crediting for Tokenpay.
//!
//! Depends only on the adapter traits in `tokenpay-core`; the gateway wires
//! in the SQLite store and the HTTP verifier.

pub mod error;
pub mod matcher;
pub mod orchestrator;
pub mod packages;
pub mod policy;
pub mod resolve;

pub use error::{ErrorKind, PurchaseError};
pub use orchestrator::{
    CheckRequest, ConfigOverride, PurchaseOutcome, PurchaseRequest, PurchaseService,
};
pub use packages::{PACKAGES, Package, find_package};
pub use policy::{Decision, PolicyRejection, decide};
pub use resolve::{ConfigLayers, ConfigSource, ResolvedConfig};
