// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluation.
use serde::{Deserialize, Serialize};
use std::fmt;

use fivedraw_cards::{Hand, Rank};

/// The rank category of an evaluated hand, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No pattern, ranked by the highest card.
    HighCard = 0,
    /// Two cards of one rank.
    OnePair,
    /// Two cards each of two different ranks.
    TwoPair,
    /// Three cards of one rank.
    ThreeOfAKind,
    /// Five consecutive ranks.
    Straight,
    /// Five cards of one suit.
    Flush,
    /// Three cards of one rank and two of another.
    FullHouse,
    /// Four cards of one rank.
    FourOfAKind,
    /// Five consecutive ranks of one suit.
    StraightFlush,
    /// Ace high straight flush.
    RoyalFlush,
}

impl HandRank {
    /// The category label used in round results.
    pub fn label(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }

    /// The category index, 0 for a high card up to 9 for a royal flush.
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An evaluated five cards hand.
///
/// Values order by category first, then by five tie-break values holding
/// the deciding ranks most significant first: grouped ranks by descending
/// group size, higher rank first within a size, then the side cards in
/// descending order, zero padded. Straights keep only their high card,
/// 5 for the ace low wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandValue {
    rank: HandRank,
    kickers: [u8; 5],
}

impl HandValue {
    /// Evaluates a five cards hand.
    pub fn eval(hand: &Hand) -> HandValue {
        let cards = hand.cards();

        let mut values = [0u8; 5];
        for (pos, card) in cards.iter().enumerate() {
            values[pos] = card.rank().value();
        }
        values.sort_unstable_by(|a, b| b.cmp(a));

        let flush = cards.iter().all(|c| c.suit() == cards[0].suit());
        let straight = straight_high(values);

        if let (true, Some(high)) = (flush, straight) {
            let rank = if high == Rank::Ace.value() {
                HandRank::RoyalFlush
            } else {
                HandRank::StraightFlush
            };
            return Self::new(rank, [high, 0, 0, 0, 0]);
        }

        // Group the rank values by multiplicity, larger groups first and
        // higher values first within the same multiplicity.
        let mut counts = [0u8; 15];
        for value in values {
            counts[value as usize] += 1;
        }

        let mut groups = Vec::with_capacity(5);
        for value in (2..=14u8).rev() {
            let count = counts[value as usize];
            if count > 0 {
                groups.push((count, value));
            }
        }
        groups.sort_by(|a, b| b.cmp(a));

        if groups[0].0 == 4 {
            return Self::new(
                HandRank::FourOfAKind,
                [groups[0].1, groups[1].1, 0, 0, 0],
            );
        }

        if groups[0].0 == 3 && groups[1].0 == 2 {
            return Self::new(HandRank::FullHouse, [groups[0].1, groups[1].1, 0, 0, 0]);
        }

        if flush {
            return Self::new(HandRank::Flush, values);
        }

        if let Some(high) = straight {
            return Self::new(HandRank::Straight, [high, 0, 0, 0, 0]);
        }

        if groups[0].0 == 3 {
            return Self::new(
                HandRank::ThreeOfAKind,
                [groups[0].1, groups[1].1, groups[2].1, 0, 0],
            );
        }

        if groups[0].0 == 2 && groups[1].0 == 2 {
            return Self::new(
                HandRank::TwoPair,
                [groups[0].1, groups[1].1, groups[2].1, 0, 0],
            );
        }

        if groups[0].0 == 2 {
            return Self::new(
                HandRank::OnePair,
                [groups[0].1, groups[1].1, groups[2].1, groups[3].1, 0],
            );
        }

        Self::new(HandRank::HighCard, values)
    }

    /// The hand rank category.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The display score, category index plus the deciding value over 15.
    ///
    /// The fraction stays below one so a score never crosses into the next
    /// category. A royal flush has no deciding value and scores a flat 9.
    /// Ordering between values uses the full tie-break values, not this
    /// score.
    pub fn score(&self) -> f64 {
        match self.rank {
            HandRank::RoyalFlush => self.rank.index() as f64,
            rank => rank.index() as f64 + self.kickers[0] as f64 / 15.0,
        }
    }

    fn new(rank: HandRank, kickers: [u8; 5]) -> Self {
        Self { rank, kickers }
    }
}

/// The straight high card if the descending values are five consecutive
/// ranks, with the ace counting low in the A-5-4-3-2 wheel.
fn straight_high(values: [u8; 5]) -> Option<u8> {
    if values == [14, 5, 4, 3, 2] {
        Some(5)
    } else if values.windows(2).all(|w| w[0] == w[1] + 1) {
        Some(values[0])
    } else {
        None
    }
}
