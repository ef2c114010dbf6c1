// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Five Draw poker round records and the game store interface.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

pub mod round;
pub mod store;

pub use round::{
    HandResult, Member, PlayerId, RoundId, RoundPhase, RoundResult, RoundState, RoundTxn,
    RoundUpdate,
};
pub use store::{GameStore, StoreError, WatchFn, WatchHandle};

// Reexport cards and eval types.
pub use fivedraw_cards::{Card, Deck, Hand, Rank, Suit};
pub use fivedraw_eval::{HandRank, HandValue};
