// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Five Draw poker turn and deal orchestration.
//!
//! A [Table] drives one round of five card draw over a [GameStore]: it
//! deals the starting hands, applies each player's card exchange, and runs
//! the showdown when the last turn closes:
//!
//! ```
//! # use fivedraw_table::{MemoryStore, Table, core::{Member, PlayerId}};
//! let store = MemoryStore::default();
//! let host = Member::new(PlayerId::new("p1"), "Player 1");
//! let table = Table::create(store, host, &mut rand::rng()).unwrap();
//!
//! table.join(Member::new(PlayerId::new("p2"), "Player 2")).unwrap();
//! table.deal().unwrap();
//!
//! // The host stands pat, the second player too, and the round ends.
//! table.exchange(&PlayerId::new("p1"), &[]).unwrap();
//! table.exchange(&PlayerId::new("p2"), &[]).unwrap();
//! assert!(table.result().unwrap().is_some());
//! ```
//!
//! The turn transitions in [round] are pure functions over a state
//! snapshot; [MemoryStore] is the single process reference store.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod memory;
pub mod round;
pub mod table;

pub use memory::MemoryStore;
pub use round::{Deal, Exchange, TurnError};
pub use table::{Table, TableError};

// Reexport the round records and store interface.
pub use fivedraw_core as core;
pub use fivedraw_core::GameStore;
