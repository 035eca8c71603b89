// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage for pattern pipeline state

mod file;
mod memory;
mod mutation;
mod store;
mod traced;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use mutation::{Guard, Mutation};
pub use store::StateStore;
pub use traced::TracedStore;
