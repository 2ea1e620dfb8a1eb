// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to run tours on other Understory crates.
//!
//! Enabled via feature flags so the core carries no document model.

#[cfg(feature = "document_adapter")]
pub mod document;
