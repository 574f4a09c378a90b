// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to the result files written by JavaScript test runners.
//!
//! The types in this crate model the aggregated results document that Jest hands
//! to a results processor (and, through serde aliases, the document written by
//! `jest --json`). They are read-only inputs for `suite-tree`.

mod errors;
mod exit_codes;
mod results;

pub use errors::*;
pub use exit_codes::*;
pub use results::*;
