// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! The game store interface.
use std::fmt;
use thiserror::Error;

use fivedraw_cards::Hand;

use crate::round::{Member, PlayerId, RoundId, RoundResult, RoundState, RoundTxn, RoundUpdate};

/// Errors from game store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The round does not exist.
    #[error("unknown round {0}")]
    UnknownRound(RoundId),
    /// The player is not a member of the round.
    #[error("player {player} is not a member of round {round}")]
    UnknownPlayer {
        /// The round id.
        round: RoundId,
        /// The player id.
        player: PlayerId,
    },
    /// The player is already a member of the round.
    #[error("player {player} already joined round {round}")]
    AlreadyJoined {
        /// The round id.
        round: RoundId,
        /// The player id.
        player: PlayerId,
    },
    /// A commit named a version that is no longer current.
    #[error("conflicting write to round {round}: expected version {expected}, found {found}")]
    Conflict {
        /// The round id.
        round: RoundId,
        /// The version named by the transaction.
        expected: u64,
        /// The version the round is at.
        found: u64,
    },
}

/// Callback invoked with the round state after a commit.
pub type WatchFn = Box<dyn Fn(&RoundState) + Send + Sync>;

/// Cancels a round subscription when dropped.
pub struct WatchHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    /// Creates a handle that runs `cancel` when dropped or cancelled.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> WatchHandle {
        WatchHandle {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the subscription, same as dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WatchHandle")
    }
}

/// Storage for round states, members, hands, and results.
///
/// A store keeps every record of a round behind a commit primitive: writes
/// to the round state and hands go through [GameStore::commit], which
/// applies the whole transaction and bumps the version, or rejects it with
/// [StoreError::Conflict] when the named version is stale. Readers must
/// never observe a partially applied transaction.
pub trait GameStore {
    /// Creates a round with the given initial state and host member.
    fn create_round(&self, state: RoundState, host: Member) -> Result<RoundId, StoreError>;

    /// Returns the round state.
    fn round_state(&self, round: RoundId) -> Result<RoundState, StoreError>;

    /// Returns the round members in join order.
    fn members(&self, round: RoundId) -> Result<Vec<Member>, StoreError>;

    /// Adds a member to the round.
    fn add_member(&self, round: RoundId, member: Member) -> Result<(), StoreError>;

    /// Removes a member from the round.
    fn remove_member(&self, round: RoundId, player: &PlayerId) -> Result<(), StoreError>;

    /// Returns a member hand, `None` before cards are dealt.
    fn member_hand(&self, round: RoundId, player: &PlayerId) -> Result<Option<Hand>, StoreError>;

    /// Atomically applies a transaction and returns the new version.
    fn commit(&self, round: RoundId, txn: RoundTxn) -> Result<u64, StoreError>;

    /// Records the round result.
    fn record_result(&self, round: RoundId, result: RoundResult) -> Result<(), StoreError>;

    /// Returns the recorded result, `None` until the round ends.
    fn result(&self, round: RoundId) -> Result<Option<RoundResult>, StoreError>;

    /// Registers a callback invoked after every commit to the round.
    ///
    /// The subscription lasts until the returned handle is dropped. Round
    /// logic never calls this, it exists for surrounding layers that
    /// mirror round updates.
    fn watch(&self, round: RoundId, f: WatchFn) -> Result<WatchHandle, StoreError>;

    /// Writes a member hand under a fresh version check.
    ///
    /// Reads the current version and commits a single hand write against
    /// it; a concurrent commit in between surfaces as
    /// [StoreError::Conflict] for the caller to retry.
    fn set_member_hand(
        &self,
        round: RoundId,
        player: &PlayerId,
        hand: Hand,
    ) -> Result<u64, StoreError> {
        let state = self.round_state(round)?;
        self.commit(round, RoundTxn::new(state.version).hand(player.clone(), hand))
    }

    /// Applies a partial round update under a fresh version check.
    ///
    /// Same read then commit pattern as [GameStore::set_member_hand].
    fn set_round_state(&self, round: RoundId, update: RoundUpdate) -> Result<u64, StoreError> {
        let state = self.round_state(round)?;
        self.commit(round, RoundTxn::new(state.version).update(update))
    }
}
