// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! A table driving a round against a game store.
use log::{error, info};
use rand::Rng;
use thiserror::Error;

use fivedraw_cards::{Card, Deck, Hand};
use fivedraw_core::{
    GameStore, HandResult, Member, PlayerId, RoundId, RoundPhase, RoundResult, RoundState,
    RoundTxn, RoundUpdate, StoreError,
};
use fivedraw_eval::showdown;

use crate::round::{self, TurnError};

/// Errors from table operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A turn transition was rejected.
    #[error(transparent)]
    Turn(#[from] TurnError),
    /// A store operation failed.
    ///
    /// A [StoreError::Conflict] means another writer committed between the
    /// read and the write; the caller may retry the whole operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A table that runs one round of five card draw over a [GameStore].
///
/// The table owns no round state: every operation reads a state snapshot
/// from the store, runs a pure transition, and commits the resulting
/// writes against the version it read. Two tables driving the same round
/// through the same store cannot double deal a card, the later commit is
/// rejected with a conflict.
#[derive(Debug, Clone)]
pub struct Table<S> {
    store: S,
    round: RoundId,
}

impl<S: GameStore> Table<S> {
    /// Creates a round with a freshly shuffled deck and its host member.
    pub fn create<R: Rng>(store: S, host: Member, rng: &mut R) -> Result<Self, TableError> {
        let deck = Deck::new_and_shuffled(rng);
        let host = host.host();
        let round = store.create_round(RoundState::new(deck), host)?;
        info!("Round {round} created, waiting for players");

        Ok(Self { store, round })
    }

    /// Opens a table over an existing round.
    pub fn open(store: S, round: RoundId) -> Result<Self, TableError> {
        store.round_state(round)?;
        Ok(Self { store, round })
    }

    /// The round this table drives.
    pub fn round_id(&self) -> RoundId {
        self.round
    }

    /// The current round state.
    pub fn state(&self) -> Result<RoundState, TableError> {
        Ok(self.store.round_state(self.round)?)
    }

    /// The round members in join order.
    pub fn members(&self) -> Result<Vec<Member>, TableError> {
        Ok(self.store.members(self.round)?)
    }

    /// A member hand, `None` before the deal.
    pub fn hand(&self, player: &PlayerId) -> Result<Option<Hand>, TableError> {
        Ok(self.store.member_hand(self.round, player)?)
    }

    /// The recorded result, `None` until the round ends.
    pub fn result(&self) -> Result<Option<RoundResult>, TableError> {
        Ok(self.store.result(self.round)?)
    }

    /// A player joins the round.
    ///
    /// Joins are only open while the round waits for players and seats
    /// remain.
    pub fn join(&self, member: Member) -> Result<(), TableError> {
        let state = self.state()?;
        if state.phase != RoundPhase::WaitForPlayers {
            return Err(TurnError::WrongPhase {
                expected: RoundPhase::WaitForPlayers,
                found: state.phase,
            }
            .into());
        }

        let members = self.members()?;
        if members.len() == round::MAX_PLAYERS {
            return Err(TurnError::TooManyPlayers(members.len() + 1).into());
        }

        let player_id = member.player_id.clone();
        self.store.add_member(self.round, member)?;
        info!("Round {}: player {player_id} joined", self.round);

        Ok(())
    }

    /// A player leaves the round before the deal.
    pub fn leave(&self, player: &PlayerId) -> Result<(), TableError> {
        let state = self.state()?;
        if state.phase != RoundPhase::WaitForPlayers {
            return Err(TurnError::WrongPhase {
                expected: RoundPhase::WaitForPlayers,
                found: state.phase,
            }
            .into());
        }

        self.store.remove_member(self.round, player)?;
        info!("Round {}: player {player} left", self.round);

        Ok(())
    }

    /// Deals the starting hands and opens the first turn.
    pub fn deal(&self) -> Result<(), TableError> {
        let state = self.state()?;
        let members = self.members()?;

        let deal = round::deal(&state, &members)?;
        let mut txn = RoundTxn::new(state.version);
        for (player, hand) in deal.hands {
            txn = txn.hand(player, hand);
        }
        self.store.commit(self.round, txn.update(deal.update))?;

        info!("Round {}: dealt to {} players", self.round, members.len());

        Ok(())
    }

    /// The current player exchanges cards and closes their turn.
    ///
    /// Returns the hand after the exchange. The last turn of the round
    /// runs the showdown and records the result before returning.
    pub fn exchange(&self, player: &PlayerId, discards: &[Card]) -> Result<Hand, TableError> {
        let state = self.state()?;
        let members = self.members()?;
        let hand = self
            .store
            .member_hand(self.round, player)?
            .ok_or(TurnError::WrongPhase {
                expected: RoundPhase::AwaitingTurn,
                found: state.phase,
            })?;

        let exchange = match round::exchange(&state, &members, player, &hand, discards) {
            Ok(exchange) => exchange,
            Err(err) => {
                error!("Round {}: rejected exchange from {player}: {err}", self.round);
                return Err(err.into());
            }
        };

        let ends_round = exchange.ends_round();
        let txn = RoundTxn::new(state.version)
            .hand(player.clone(), exchange.hand)
            .update(exchange.update);
        self.store.commit(self.round, txn)?;

        info!(
            "Round {}: {player} exchanged {} cards",
            self.round,
            discards.len()
        );

        if ends_round {
            self.resolve()?;
        }

        Ok(exchange.hand)
    }

    /// Ranks the hands, records the result, and ends the round.
    ///
    /// Runs automatically after the last exchange. The round must be in
    /// the showdown phase; when the ending commit conflicts the round
    /// stays there, and calling this again reruns the resolution from the
    /// stored hands. Recording the result is idempotent, rerunning it
    /// records the same outcome.
    pub fn resolve(&self) -> Result<RoundResult, TableError> {
        let state = self.state()?;
        if state.phase != RoundPhase::Showdown {
            return Err(TurnError::WrongPhase {
                expected: RoundPhase::Showdown,
                found: state.phase,
            }
            .into());
        }

        let members = self.members()?;

        let mut hands = Vec::with_capacity(state.player_count());
        for player in &state.turn_order {
            let hand =
                self.store
                    .member_hand(self.round, player)?
                    .ok_or(StoreError::UnknownPlayer {
                        round: self.round,
                        player: player.clone(),
                    })?;
            hands.push(hand);
        }

        let Some(showdown) = showdown(&hands) else {
            return Err(TurnError::NotEnoughPlayers(0).into());
        };

        let hands = showdown
            .hands
            .iter()
            .map(|ranked| HandResult {
                player_id: state.turn_order[ranked.player].clone(),
                display_name: round::display_name(&members, &state.turn_order[ranked.player]),
                category: ranked.value.rank(),
                score: ranked.value.score(),
                hand: ranked.hand,
            })
            .collect::<Vec<_>>();

        let winning = showdown.winning();
        let result = RoundResult {
            winner_id: state.turn_order[showdown.winner].clone(),
            winner_name: hands[showdown.winner].display_name.clone(),
            category: winning.value.rank(),
            score: winning.value.score(),
            hands,
        };

        info!(
            "Round {}: {} wins with {}",
            self.round,
            result.winner_name,
            result.category.label()
        );

        let status = format!(
            "Game ended. {} wins with {}!",
            result.winner_name,
            result.category.label()
        );
        self.store.record_result(self.round, result.clone())?;
        self.store.commit(
            self.round,
            RoundTxn::new(state.version).update(RoundUpdate {
                phase: Some(RoundPhase::RoundEnded),
                status: Some(status),
                ..Default::default()
            }),
        )?;

        Ok(result)
    }
}
