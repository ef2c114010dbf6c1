// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Five Draw poker cards types.
//!
//! This crate defines types to create cards:
//!
//! ```
//! # use fivedraw_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd = Card::new(Rank::King, Suit::Diamonds);
//! ```
//!
//! cards parse from and print as their two characters token, rank then suit:
//!
//! ```
//! # use fivedraw_cards::{Card, Rank, Suit};
//! let card = "TH".parse::<Card>().unwrap();
//! assert_eq!(card, Card::new(Rank::Ten, Suit::Hearts));
//! assert_eq!(card.to_string(), "TH");
//! ```
//!
//! and a [Deck] type that deals cards behind an advancing cursor:
//!
//! ```
//! # use fivedraw_cards::{Deck, Hand};
//! let mut deck = Deck::default();
//! let cards = deck.deal(5).unwrap();
//! let hand = Hand::new(cards.try_into().unwrap()).unwrap();
//! assert_eq!(deck.dealt(), 5);
//! assert_eq!(deck.remaining(), 47);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, CardError, Deck, DeckError, Hand, HandError, Rank, Suit};
