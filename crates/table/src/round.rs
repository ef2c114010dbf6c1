// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Pure transitions over the state of a round.
//!
//! These functions validate a turn against a [RoundState] snapshot and
//! return the [RoundUpdate] and hand writes to commit; they never touch a
//! store, so a rejected transition leaves nothing to roll back.
use thiserror::Error;

use fivedraw_cards::{Card, DeckError, Hand, HandError};
use fivedraw_core::{Member, PlayerId, RoundPhase, RoundState, RoundUpdate};

/// Minimum number of players to deal a round.
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players in a round.
///
/// Five players dealing five cards and each drawing up to five more stay
/// within the 52 cards of the deck.
pub const MAX_PLAYERS: usize = 5;

/// Errors from turn transitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurnError {
    /// The round phase does not allow the transition.
    #[error("round in phase {found:?}: expected {expected:?}")]
    WrongPhase {
        /// The phase the transition requires.
        expected: RoundPhase,
        /// The phase the round is in.
        found: RoundPhase,
    },
    /// Too few players to deal.
    #[error("cannot deal to {0} players: at least {MIN_PLAYERS} required")]
    NotEnoughPlayers(usize),
    /// Too many players for one deck.
    #[error("cannot deal to {0} players: at most {MAX_PLAYERS} supported")]
    TooManyPlayers(usize),
    /// An exchange from a player out of turn.
    #[error("not {actual}'s turn: waiting for {expected}")]
    NotPlayersTurn {
        /// The player whose turn it is.
        expected: PlayerId,
        /// The player who submitted the exchange.
        actual: PlayerId,
    },
    /// A discarded card the player does not hold.
    #[error("discarded card {0} is not in the hand")]
    DiscardNotHeld(Card),
    /// The same card discarded more than once.
    #[error("card {0} discarded more than once")]
    DuplicateDiscard(Card),
    /// The deck ran out of cards.
    #[error(transparent)]
    Deck(#[from] DeckError),
    /// A replacement produced an invalid hand.
    #[error(transparent)]
    Hand(#[from] HandError),
}

/// The writes produced by dealing the starting hands.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    /// Round field updates to commit.
    pub update: RoundUpdate,
    /// The dealt hands, one per player in turn order.
    pub hands: Vec<(PlayerId, Hand)>,
}

/// Deals five cards to every member and opens the first turn.
///
/// The turn order is the member join order. Fails unless the round is
/// waiting for players and the member count is within bounds.
pub fn deal(state: &RoundState, members: &[Member]) -> Result<Deal, TurnError> {
    if state.phase != RoundPhase::WaitForPlayers {
        return Err(TurnError::WrongPhase {
            expected: RoundPhase::WaitForPlayers,
            found: state.phase,
        });
    }

    if members.len() < MIN_PLAYERS {
        return Err(TurnError::NotEnoughPlayers(members.len()));
    }

    if members.len() > MAX_PLAYERS {
        return Err(TurnError::TooManyPlayers(members.len()));
    }

    let mut deck = state.deck.clone();
    let mut hands = Vec::with_capacity(members.len());
    for member in members {
        let cards = deck.deal(Hand::SIZE)?;
        let hand = Hand::try_from(cards.as_slice())?;
        hands.push((member.player_id.clone(), hand));
    }

    let update = RoundUpdate {
        deck: Some(deck),
        turn_order: Some(members.iter().map(|m| m.player_id.clone()).collect()),
        turn_index: Some(0),
        phase: Some(RoundPhase::AwaitingTurn),
        status: Some(format!("{}'s turn", members[0].display_name)),
    };

    Ok(Deal { update, hands })
}

/// The writes produced by a card exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// Round field updates to commit.
    pub update: RoundUpdate,
    /// The player hand after the exchange.
    pub hand: Hand,
    /// The cards drawn to replace the discards.
    pub drawn: Vec<Card>,
}

impl Exchange {
    /// Checks if this exchange closed the last turn of the round.
    pub fn ends_round(&self) -> bool {
        self.update.phase == Some(RoundPhase::Showdown)
    }
}

/// Exchanges up to five cards for the current player.
///
/// Removes the discards from `hand`, draws as many replacements past the
/// deck cursor, and advances the turn; the last turn moves the round to
/// the showdown phase. Fails without producing any write when the round
/// is not awaiting a turn, the player is not the turn holder, or a
/// discard is not held.
pub fn exchange(
    state: &RoundState,
    members: &[Member],
    player: &PlayerId,
    hand: &Hand,
    discards: &[Card],
) -> Result<Exchange, TurnError> {
    let Some(current) = state.current_player() else {
        return Err(TurnError::WrongPhase {
            expected: RoundPhase::AwaitingTurn,
            found: state.phase,
        });
    };

    if current != player {
        return Err(TurnError::NotPlayersTurn {
            expected: current.clone(),
            actual: player.clone(),
        });
    }

    for (pos, card) in discards.iter().enumerate() {
        if !hand.contains(*card) {
            return Err(TurnError::DiscardNotHeld(*card));
        }
        if discards[..pos].contains(card) {
            return Err(TurnError::DuplicateDiscard(*card));
        }
    }

    let mut deck = state.deck.clone();
    let drawn = deck.deal(discards.len())?;

    // Kept cards stay in hand order, replacements go to the back.
    let mut cards = hand
        .iter()
        .filter(|c| !discards.contains(c))
        .collect::<Vec<_>>();
    cards.extend(drawn.iter().copied());
    let hand = Hand::try_from(cards.as_slice())?;

    let turn_index = state.turn_index + 1;
    let (phase, status) = if turn_index == state.player_count() {
        (RoundPhase::Showdown, "Calculating results".to_string())
    } else {
        let next = &state.turn_order[turn_index];
        (
            RoundPhase::AwaitingTurn,
            format!("{}'s turn", display_name(members, next)),
        )
    };

    let update = RoundUpdate {
        deck: Some(deck),
        turn_index: Some(turn_index),
        phase: Some(phase),
        status: Some(status),
        ..Default::default()
    };

    Ok(Exchange {
        update,
        hand,
        drawn,
    })
}

/// The display name of a member, its id for players no longer seated.
pub fn display_name(members: &[Member], player: &PlayerId) -> String {
    members
        .iter()
        .find(|m| &m.player_id == player)
        .map(|m| m.display_name.clone())
        .unwrap_or_else(|| player.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;
    use rand::{SeedableRng, rngs::StdRng};

    use fivedraw_cards::Deck;

    fn new_members(count: usize) -> Vec<Member> {
        (1..=count)
            .map(|n| Member::new(PlayerId::new(format!("p{n}")), format!("Player {n}")))
            .collect()
    }

    fn new_state() -> RoundState {
        RoundState::new(Deck::new_and_shuffled(&mut StdRng::seed_from_u64(13)))
    }

    #[test]
    fn deal_gives_five_unique_cards_each() {
        let state = new_state();
        let members = new_members(3);

        let deal = deal(&state, &members).unwrap();
        assert_eq!(deal.hands.len(), 3);
        assert_eq!(deal.update.deck.as_ref().unwrap().dealt(), 15);
        assert_eq!(deal.update.turn_index, Some(0));
        assert_eq!(deal.update.phase, Some(RoundPhase::AwaitingTurn));
        assert_eq!(deal.update.status.as_deref(), Some("Player 1's turn"));
        assert_eq!(
            deal.update.turn_order.as_deref(),
            Some(&[
                PlayerId::new("p1"),
                PlayerId::new("p2"),
                PlayerId::new("p3")
            ][..])
        );

        // No card dealt twice across the hands.
        let cards = deal
            .hands
            .iter()
            .flat_map(|(_, h)| h.iter())
            .collect::<HashSet<_>>();
        assert_eq!(cards.len(), 15);
    }

    #[test]
    fn deal_checks_phase_and_player_count() {
        let mut state = new_state();

        let err = deal(&state, &new_members(1)).unwrap_err();
        assert_eq!(err, TurnError::NotEnoughPlayers(1));

        let err = deal(&state, &new_members(6)).unwrap_err();
        assert_eq!(err, TurnError::TooManyPlayers(6));

        state.phase = RoundPhase::AwaitingTurn;
        let err = deal(&state, &new_members(2)).unwrap_err();
        assert_eq!(
            err,
            TurnError::WrongPhase {
                expected: RoundPhase::WaitForPlayers,
                found: RoundPhase::AwaitingTurn,
            }
        );
    }

    // Deals into a fresh state and returns it with the dealt hands.
    fn dealt_round(members: &[Member]) -> (RoundState, Vec<(PlayerId, Hand)>) {
        let mut state = new_state();
        let deal = deal(&state, members).unwrap();
        state.apply(deal.update);
        (state, deal.hands)
    }

    #[test]
    fn exchange_replaces_discards_and_advances_turn() {
        let members = new_members(2);
        let (state, hands) = dealt_round(&members);
        assert_eq!(state.deck.dealt(), 10);

        let (player, hand) = &hands[0];
        let discards = &hand.cards()[..2];
        let exchange = exchange(&state, &members, player, hand, discards).unwrap();

        assert_eq!(exchange.drawn.len(), 2);
        assert_eq!(exchange.update.deck.as_ref().unwrap().dealt(), 12);
        assert_eq!(exchange.update.turn_index, Some(1));
        assert_eq!(exchange.update.phase, Some(RoundPhase::AwaitingTurn));
        assert_eq!(exchange.update.status.as_deref(), Some("Player 2's turn"));
        assert!(!exchange.ends_round());

        // Kept cards stay, discards are gone, replacements at the back.
        for card in &hand.cards()[2..] {
            assert!(exchange.hand.contains(*card));
        }
        for card in discards {
            assert!(!exchange.hand.contains(*card));
        }
        assert_eq!(&exchange.hand.cards()[3..], exchange.drawn.as_slice());
    }

    #[test]
    fn last_exchange_ends_the_round() {
        let members = new_members(2);
        let (mut state, hands) = dealt_round(&members);

        let (player, hand) = &hands[0];
        let first = exchange(&state, &members, player, hand, &hand.cards()[..2]).unwrap();
        state.apply(first.update);
        assert_eq!(state.deck.dealt(), 12);
        assert_eq!(state.turn_index, 1);

        // An empty discard draws nothing but still closes the turn.
        let (player, hand) = &hands[1];
        let last = exchange(&state, &members, player, hand, &[]).unwrap();
        assert_eq!(last.drawn, Vec::new());
        assert_eq!(last.hand, *hand);
        assert_eq!(last.update.deck.as_ref().unwrap().dealt(), 12);
        assert_eq!(last.update.turn_index, Some(2));
        assert_eq!(last.update.phase, Some(RoundPhase::Showdown));
        assert_eq!(last.update.status.as_deref(), Some("Calculating results"));
        assert!(last.ends_round());
    }

    #[test]
    fn exchange_out_of_turn_is_rejected() {
        let members = new_members(2);
        let (state, hands) = dealt_round(&members);

        let (player, hand) = &hands[1];
        let err = exchange(&state, &members, player, hand, &[]).unwrap_err();
        assert_eq!(
            err,
            TurnError::NotPlayersTurn {
                expected: PlayerId::new("p1"),
                actual: PlayerId::new("p2"),
            }
        );
    }

    #[test]
    fn exchange_outside_turn_phase_is_rejected() {
        let members = new_members(2);
        let (mut state, hands) = dealt_round(&members);
        state.phase = RoundPhase::Showdown;

        let (player, hand) = &hands[0];
        let err = exchange(&state, &members, player, hand, &[]).unwrap_err();
        assert_eq!(
            err,
            TurnError::WrongPhase {
                expected: RoundPhase::AwaitingTurn,
                found: RoundPhase::Showdown,
            }
        );
    }

    #[test]
    fn exchange_validates_discards() {
        let members = new_members(2);
        let (state, hands) = dealt_round(&members);

        let (player, hand) = &hands[0];
        let held = hand.cards()[0];
        let not_held = hands[1].1.cards()[0];

        let err = exchange(&state, &members, player, hand, &[not_held]).unwrap_err();
        assert_eq!(err, TurnError::DiscardNotHeld(not_held));

        let err = exchange(&state, &members, player, hand, &[held, held]).unwrap_err();
        assert_eq!(err, TurnError::DuplicateDiscard(held));
    }

    #[test]
    fn exhausted_deck_fails_the_exchange() {
        let members = new_members(2);
        let (mut state, hands) = dealt_round(&members);

        // Burn the deck down to two undealt cards.
        state.deck.deal(40).unwrap();
        assert_eq!(state.deck.dealt(), 50);

        let (player, hand) = &hands[0];
        let err = exchange(&state, &members, player, hand, hand.cards()).unwrap_err();
        assert_eq!(
            err,
            TurnError::Deck(DeckError::Exhausted {
                requested: 5,
                remaining: 2,
            })
        );
    }
}
