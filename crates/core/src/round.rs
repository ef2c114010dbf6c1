// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Typed records for a five card draw round.
use serde::{Deserialize, Serialize};
use std::{fmt, sync::atomic};

use fivedraw_cards::{Deck, Hand};
use fivedraw_eval::HandRank;

/// A unique round identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(u32);

impl RoundId {
    /// Create a new unique round id.
    pub fn new_id() -> RoundId {
        static LAST_ID: atomic::AtomicU32 = atomic::AtomicU32::new(1);
        RoundId(LAST_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player id.
    pub fn new(id: impl Into<String>) -> PlayerId {
        PlayerId(id.into())
    }

    /// The id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player seated in a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// This player id.
    pub player_id: PlayerId,
    /// This player display name.
    pub display_name: String,
    /// The player created the round.
    pub is_host: bool,
}

impl Member {
    /// Creates a member with the given id and display name.
    pub fn new(player_id: PlayerId, display_name: impl Into<String>) -> Member {
        Member {
            player_id,
            display_name: display_name.into(),
            is_host: false,
        }
    }

    /// Marks this member as the round host.
    pub fn host(mut self) -> Member {
        self.is_host = true;
        self
    }
}

/// The phase of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for players to join before the deal.
    WaitForPlayers,
    /// Dealing the starting hands.
    Dealing,
    /// Waiting for the current player to exchange cards.
    AwaitingTurn,
    /// All turns played, hands go to showdown.
    Showdown,
    /// Winner recorded, terminal for this round.
    RoundEnded,
}

/// The state of a round.
///
/// Every write to a round goes through a [RoundTxn] naming the `version`
/// the writer read, so concurrent writers cannot both commit against the
/// same deck cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    /// The full deck with its dealing cursor.
    pub deck: Deck,
    /// Player ids in turn order, fixed when dealing starts.
    pub turn_order: Vec<PlayerId>,
    /// Position of the current turn in `turn_order`.
    pub turn_index: usize,
    /// The round lifecycle phase.
    pub phase: RoundPhase,
    /// Human readable status line.
    pub status: String,
    /// Commit version for optimistic writes.
    pub version: u64,
}

impl RoundState {
    /// Creates the state of a new round waiting for players.
    pub fn new(deck: Deck) -> RoundState {
        RoundState {
            deck,
            turn_order: Vec::new(),
            turn_index: 0,
            phase: RoundPhase::WaitForPlayers,
            status: "Waiting for players".to_string(),
            version: 0,
        }
    }

    /// Number of players dealt into the round.
    pub fn player_count(&self) -> usize {
        self.turn_order.len()
    }

    /// The player whose turn it is, `None` outside of turn play.
    pub fn current_player(&self) -> Option<&PlayerId> {
        match self.phase {
            RoundPhase::AwaitingTurn => self.turn_order.get(self.turn_index),
            _ => None,
        }
    }

    /// Applies a partial update to this state.
    pub fn apply(&mut self, update: RoundUpdate) {
        if let Some(deck) = update.deck {
            self.deck = deck;
        }
        if let Some(turn_order) = update.turn_order {
            self.turn_order = turn_order;
        }
        if let Some(turn_index) = update.turn_index {
            self.turn_index = turn_index;
        }
        if let Some(phase) = update.phase {
            self.phase = phase;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// A partial update of the round fields, `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundUpdate {
    /// Replaces the deck and its cursor.
    pub deck: Option<Deck>,
    /// Replaces the turn order.
    pub turn_order: Option<Vec<PlayerId>>,
    /// Replaces the turn index.
    pub turn_index: Option<usize>,
    /// Replaces the phase.
    pub phase: Option<RoundPhase>,
    /// Replaces the status line.
    pub status: Option<String>,
}

/// An atomic round write.
///
/// Hand writes and field updates commit together or not at all; a commit
/// is rejected when `expected_version` no longer matches the round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTxn {
    /// The round version this transaction was built against.
    pub expected_version: u64,
    /// Hands to write, one per player.
    pub hands: Vec<(PlayerId, Hand)>,
    /// Round field updates.
    pub update: RoundUpdate,
}

impl RoundTxn {
    /// Creates an empty transaction against the given version.
    pub fn new(expected_version: u64) -> RoundTxn {
        RoundTxn {
            expected_version,
            hands: Vec::new(),
            update: RoundUpdate::default(),
        }
    }

    /// Adds a hand write for a player.
    pub fn hand(mut self, player: PlayerId, hand: Hand) -> RoundTxn {
        self.hands.push((player, hand));
        self
    }

    /// Sets the round field updates.
    pub fn update(mut self, update: RoundUpdate) -> RoundTxn {
        self.update = update;
        self
    }
}

/// A ranked hand recorded with a round result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    /// The player id.
    pub player_id: PlayerId,
    /// The player display name.
    pub display_name: String,
    /// The hand category.
    pub category: HandRank,
    /// The display score.
    pub score: f64,
    /// The hand cards.
    pub hand: Hand,
}

/// The recorded outcome of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// The winner player id.
    pub winner_id: PlayerId,
    /// The winner display name.
    pub winner_name: String,
    /// The winning category.
    pub category: HandRank,
    /// The winning score.
    pub score: f64,
    /// Every hand shown at the showdown, in turn order.
    pub hands: Vec<HandResult>,
}
