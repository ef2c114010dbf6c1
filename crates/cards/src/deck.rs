// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards, hands, and deck definitions.
use rand::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Errors from parsing a card token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// The token is not exactly two characters.
    #[error("invalid card token {0:?}: expected rank and suit characters")]
    Token(String),
    /// The rank character is not one of `23456789TJQKA`.
    #[error("invalid card rank {0:?}")]
    Rank(char),
    /// The suit character is not one of `HDCS`.
    #[error("invalid card suit {0:?}")]
    Suit(char),
}

/// A Poker card.
///
/// A card pairs a [Rank] with a [Suit] and prints and parses as the two
/// characters token used in game records, rank then suit: `"7H"` is the
/// seven of hearts, `"TC"` the ten of clubs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Creates a card given a rank and a suit.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Self { rank, suit }
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Position in the canonical deck, 0 for the deuce of clubs up to 51
    /// for the ace of spades.
    fn index(&self) -> usize {
        (self.rank.value() as usize - 2) * 4 + self.suit as usize
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(rank), Some(suit), None) => {
                Ok(Card::new(Rank::try_from(rank)?, Suit::try_from(suit)?))
            }
            _ => Err(CardError::Token(s.to_string())),
        }
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}

/// Card rank.
///
/// Discriminants are the comparison values used by the evaluator, 2 for a
/// deuce up to 14 for an ace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// Deuce
    Deuce = 2,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The numeric comparison value, 2 up to 14 for an ace.
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

impl TryFrom<char> for Rank {
    type Error = CardError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let rank = match c {
            '2' => Rank::Deuce,
            '3' => Rank::Trey,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            _ => return Err(CardError::Rank(c)),
        };

        Ok(rank)
    }
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    /// Clubs suit.
    Clubs,
    /// Diamonds suit.
    Diamonds,
    /// Hearts suit.
    Hearts,
    /// Spades suit.
    Spades,
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

impl TryFrom<char> for Suit {
    type Error = CardError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let suit = match c {
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'H' => Suit::Hearts,
            'S' => Suit::Spades,
            _ => return Err(CardError::Suit(c)),
        };

        Ok(suit)
    }
}

/// Errors from building a hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandError {
    /// The hand does not have exactly five cards.
    #[error("invalid hand size {0}: expected 5 cards")]
    Size(usize),
    /// The same card appears more than once.
    #[error("duplicate card {0} in hand")]
    Duplicate(Card),
}

/// A player hand of exactly five distinct cards.
#[derive(Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hand([Card; 5]);

impl Hand {
    /// Number of cards in a hand.
    pub const SIZE: usize = 5;

    /// Creates a hand, fails if a card appears more than once.
    pub fn new(cards: [Card; Self::SIZE]) -> Result<Self, HandError> {
        for (pos, card) in cards.iter().enumerate() {
            if cards[..pos].contains(card) {
                return Err(HandError::Duplicate(*card));
            }
        }

        Ok(Self(cards))
    }

    /// Returns the hand cards in the order they were assigned.
    pub fn cards(&self) -> &[Card; Self::SIZE] {
        &self.0
    }

    /// Returns an iterator over the hand cards.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.0.iter().copied()
    }

    /// Checks if the hand holds the given card.
    pub fn contains(&self, card: Card) -> bool {
        self.0.contains(&card)
    }
}

impl TryFrom<&[Card]> for Hand {
    type Error = HandError;

    fn try_from(cards: &[Card]) -> Result<Self, Self::Error> {
        let cards: [Card; Self::SIZE] =
            cards.try_into().map_err(|_| HandError::Size(cards.len()))?;
        Hand::new(cards)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pos, card) in self.0.iter().enumerate() {
            if pos > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hand({self})")
    }
}

impl<'de> Deserialize<'de> for Hand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cards = <[Card; Self::SIZE]>::deserialize(deserializer)?;
        Hand::new(cards).map_err(de::Error::custom)
    }
}

/// Errors from deck operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// A draw asked for more cards than remain undealt.
    #[error("deck exhausted: {requested} cards requested, {remaining} undealt")]
    Exhausted {
        /// Number of cards the draw asked for.
        requested: usize,
        /// Number of undealt cards left.
        remaining: usize,
    },
    /// The deck is not a permutation of the 52 distinct cards.
    #[error("invalid deck: {0}")]
    Invalid(&'static str),
}

/// A 52-cards deck with a dealing cursor.
///
/// Dealt cards stay in the deck so that the full permutation round-trips
/// through serialization; the cursor marks the next undealt card and only
/// moves forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck with the cursor at the first card.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Rebuilds a deck from its cards and cursor.
    ///
    /// Fails unless the cards are a permutation of the 52 distinct cards
    /// and the cursor is within bounds.
    pub fn from_parts(cards: Vec<Card>, next: usize) -> Result<Self, DeckError> {
        if cards.len() != Self::SIZE {
            return Err(DeckError::Invalid("expected 52 cards"));
        }

        let mut seen = 0u64;
        for card in &cards {
            let bit = 1u64 << card.index();
            if seen & bit != 0 {
                return Err(DeckError::Invalid("duplicate card"));
            }
            seen |= bit;
        }

        if next > Self::SIZE {
            return Err(DeckError::Invalid("cursor past end of deck"));
        }

        Ok(Self { cards, next })
    }

    /// Deals the next `n` undealt cards and advances the cursor.
    ///
    /// Fails without moving the cursor if fewer than `n` cards remain.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(DeckError::Exhausted {
                requested: n,
                remaining,
            });
        }

        let cards = self.cards[self.next..self.next + n].to_vec();
        self.next += n;

        Ok(cards)
    }

    /// Number of cards dealt so far, the cursor position.
    pub fn dealt(&self) -> usize {
        self.next
    }

    /// Number of undealt cards.
    pub fn remaining(&self) -> usize {
        Self::SIZE - self.next
    }

    /// Checks if all cards have been dealt.
    pub fn is_empty(&self) -> bool {
        self.next == Self::SIZE
    }

    /// Returns all 52 cards in deck order, dealt cards included.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Rank::ranks()
            .flat_map(|r| Suit::suits().map(move |s| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards, next: 0 }
    }
}

impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Parts {
            cards: Vec<Card>,
            next: usize,
        }

        let parts = Parts::deserialize(deserializer)?;
        Deck::from_parts(parts.cards, parts.next).map_err(de::Error::custom)
    }
}
