// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown ranking over many hands.
use fivedraw_cards::Hand;

use crate::eval::HandValue;

/// A ranked hand in a showdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHand {
    /// Position of the hand in the showdown input.
    pub player: usize,
    /// The evaluated hand value.
    pub value: HandValue,
    /// The hand cards.
    pub hand: Hand,
}

/// The outcome of ranking all hands at a showdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Showdown {
    /// Index of the winning hand.
    pub winner: usize,
    /// All hands in input order with their evaluations.
    pub hands: Vec<RankedHand>,
}

impl Showdown {
    /// The winning hand entry.
    pub fn winning(&self) -> &RankedHand {
        &self.hands[self.winner]
    }
}

/// Ranks all hands and picks the winner, `None` if `hands` is empty.
///
/// The winner is the hand with the highest value; on equal values the
/// first hand in input order keeps the win.
pub fn showdown(hands: &[Hand]) -> Option<Showdown> {
    let ranked = hands
        .iter()
        .enumerate()
        .map(|(player, &hand)| RankedHand {
            player,
            value: HandValue::eval(&hand),
            hand,
        })
        .collect::<Vec<_>>();

    let mut winner = 0;
    let mut best = ranked.first()?.value;
    for entry in &ranked[1..] {
        // Strict improvement keeps the first hand on equal values.
        if entry.value > best {
            winner = entry.player;
            best = entry.value;
        }
    }

    Some(Showdown {
        winner,
        hands: ranked,
    })
}
