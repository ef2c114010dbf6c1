// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Five Draw poker hand evaluator.
//!
//! Evaluates five cards hands into a [HandValue] that orders by category
//! first and by tie-break values within a category:
//!
//! ```
//! # use fivedraw_eval::*;
//! let cards = ["9H", "9D", "9S", "9C", "5H"]
//!     .iter()
//!     .map(|t| t.parse().unwrap())
//!     .collect::<Vec<Card>>();
//! let quads = HandValue::eval(&Hand::try_from(cards.as_slice()).unwrap());
//! assert_eq!(quads.rank(), HandRank::FourOfAKind);
//! assert_eq!(quads.rank().label(), "Four of a Kind");
//! ```
//!
//! Hands dealt from a deck compare directly:
//!
//! ```
//! # use fivedraw_eval::*;
//! let mut deck = Deck::default();
//! let h1 = Hand::try_from(deck.deal(5).unwrap().as_slice()).unwrap();
//! let h2 = Hand::try_from(deck.deal(5).unwrap().as_slice()).unwrap();
//! assert!(HandValue::eval(&h1) != HandValue::eval(&h2));
//! ```
//!
//! and [showdown] ranks many hands and picks a winner.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod eval;
pub use eval::{HandRank, HandValue};

pub mod showdown;
pub use showdown::{RankedHand, Showdown, showdown};

// Reexport cards types.
pub use fivedraw_cards::{Card, Deck, Hand, Rank, Suit};
