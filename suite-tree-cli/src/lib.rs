// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn flat test runner results into hierarchical pass/fail reports.
//!
//! This crate provides the `suite-tree` binary. For the library interface, see the
//! [`suite-tree`](https://docs.rs/suite-tree) crate.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
