// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tokenpay integration tests.
//!
//! Provides a scripted provider adapter and a harness over a temporary
//! SQLite ledger, so the purchase flow runs end to end without network
//! access.
//!
//! # Components
//!
//! - [`FakeProvider`] - provider adapter answering from a FIFO script
//! - [`TestHarness`] - temp database, fake provider and a wired `PurchaseService`

pub mod fake_provider;
pub mod harness;

pub use fake_provider::{FakeProvider, receipt};
pub use harness::{TestHarness, TestHarnessBuilder};
