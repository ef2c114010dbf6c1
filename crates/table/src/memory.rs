// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! In memory game store.
use ahash::AHashMap;
use parking_lot::Mutex;
use std::{fmt, sync::Arc};

use fivedraw_cards::Hand;
use fivedraw_core::{
    GameStore, Member, PlayerId, RoundId, RoundResult, RoundState, RoundTxn, StoreError, WatchFn,
    WatchHandle,
};

/// Everything stored for one round.
struct Record {
    state: RoundState,
    members: Vec<Member>,
    hands: AHashMap<PlayerId, Hand>,
    result: Option<RoundResult>,
    watchers: Vec<(u64, Arc<WatchFn>)>,
    next_watcher: u64,
}

impl Record {
    fn member(&self, round: RoundId, player: &PlayerId) -> Result<&Member, StoreError> {
        self.members
            .iter()
            .find(|m| &m.player_id == player)
            .ok_or_else(|| StoreError::UnknownPlayer {
                round,
                player: player.clone(),
            })
    }
}

/// An in memory [GameStore].
///
/// The reference store for a single process: all rounds live behind one
/// lock, and cloned handles share them. Commits apply the whole
/// transaction under the lock, so readers never observe a hand write
/// without its round update; watchers run after the lock is released with
/// the state they were committed against.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rounds: Arc<Mutex<AHashMap<RoundId, Record>>>,
}

impl MemoryStore {
    fn with_round<T>(
        &self,
        round: RoundId,
        f: impl FnOnce(&mut Record) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut rounds = self.rounds.lock();
        let record = rounds
            .get_mut(&round)
            .ok_or(StoreError::UnknownRound(round))?;
        f(record)
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("rounds", &self.rounds.lock().len())
            .finish()
    }
}

impl GameStore for MemoryStore {
    fn create_round(&self, state: RoundState, host: Member) -> Result<RoundId, StoreError> {
        let round = RoundId::new_id();
        let record = Record {
            state,
            members: vec![host],
            hands: AHashMap::default(),
            result: None,
            watchers: Vec::new(),
            next_watcher: 0,
        };

        self.rounds.lock().insert(round, record);

        Ok(round)
    }

    fn round_state(&self, round: RoundId) -> Result<RoundState, StoreError> {
        self.with_round(round, |record| Ok(record.state.clone()))
    }

    fn members(&self, round: RoundId) -> Result<Vec<Member>, StoreError> {
        self.with_round(round, |record| Ok(record.members.clone()))
    }

    fn add_member(&self, round: RoundId, member: Member) -> Result<(), StoreError> {
        self.with_round(round, |record| {
            if record.member(round, &member.player_id).is_ok() {
                return Err(StoreError::AlreadyJoined {
                    round,
                    player: member.player_id,
                });
            }

            record.members.push(member);
            Ok(())
        })
    }

    fn remove_member(&self, round: RoundId, player: &PlayerId) -> Result<(), StoreError> {
        self.with_round(round, |record| {
            record.member(round, player)?;
            record.members.retain(|m| &m.player_id != player);
            record.hands.remove(player);
            Ok(())
        })
    }

    fn member_hand(&self, round: RoundId, player: &PlayerId) -> Result<Option<Hand>, StoreError> {
        self.with_round(round, |record| {
            record.member(round, player)?;
            Ok(record.hands.get(player).copied())
        })
    }

    fn commit(&self, round: RoundId, txn: RoundTxn) -> Result<u64, StoreError> {
        let (state, watchers) = {
            let mut rounds = self.rounds.lock();
            let record = rounds
                .get_mut(&round)
                .ok_or(StoreError::UnknownRound(round))?;

            if txn.expected_version != record.state.version {
                return Err(StoreError::Conflict {
                    round,
                    expected: txn.expected_version,
                    found: record.state.version,
                });
            }

            for (player, _) in &txn.hands {
                record.member(round, player)?;
            }

            for (player, hand) in txn.hands {
                record.hands.insert(player, hand);
            }
            record.state.apply(txn.update);
            record.state.version += 1;

            (record.state.clone(), record.watchers.clone())
        };

        // Watchers run outside the lock so they may read the store.
        for (_, watcher) in &watchers {
            (**watcher)(&state);
        }

        Ok(state.version)
    }

    fn record_result(&self, round: RoundId, result: RoundResult) -> Result<(), StoreError> {
        self.with_round(round, |record| {
            record.result = Some(result);
            Ok(())
        })
    }

    fn result(&self, round: RoundId) -> Result<Option<RoundResult>, StoreError> {
        self.with_round(round, |record| Ok(record.result.clone()))
    }

    fn watch(&self, round: RoundId, f: WatchFn) -> Result<WatchHandle, StoreError> {
        let id = self.with_round(round, |record| {
            let id = record.next_watcher;
            record.next_watcher += 1;
            record.watchers.push((id, Arc::new(f)));
            Ok(id)
        })?;

        let rounds = self.rounds.clone();
        Ok(WatchHandle::new(move || {
            if let Some(record) = rounds.lock().get_mut(&round) {
                record.watchers.retain(|(wid, _)| *wid != id);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use fivedraw_cards::Deck;
    use fivedraw_core::{RoundPhase, RoundUpdate};

    fn new_store() -> (MemoryStore, RoundId) {
        let store = MemoryStore::default();
        let deck = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(13));
        let host = Member::new(PlayerId::new("p1"), "Player 1").host();
        let round = store.create_round(RoundState::new(deck), host).unwrap();
        (store, round)
    }

    #[test]
    fn unknown_round_fails() {
        let (store, round) = new_store();
        drop(store);

        let store = MemoryStore::default();
        let err = store.round_state(round).unwrap_err();
        assert_eq!(err, StoreError::UnknownRound(round));
    }

    #[test]
    fn members_join_and_leave() {
        let (store, round) = new_store();

        let p2 = PlayerId::new("p2");
        store
            .add_member(round, Member::new(p2.clone(), "Player 2"))
            .unwrap();
        assert_eq!(store.members(round).unwrap().len(), 2);

        let err = store
            .add_member(round, Member::new(p2.clone(), "Player 2"))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::AlreadyJoined {
                round,
                player: p2.clone(),
            }
        );

        store.remove_member(round, &p2).unwrap();
        assert_eq!(store.members(round).unwrap().len(), 1);

        let err = store.member_hand(round, &p2).unwrap_err();
        assert_eq!(err, StoreError::UnknownPlayer { round, player: p2 });
    }

    #[test]
    fn commit_applies_hands_and_update_together() {
        let (store, round) = new_store();
        let p1 = PlayerId::new("p1");
        assert_eq!(store.member_hand(round, &p1).unwrap(), None);

        let mut state = store.round_state(round).unwrap();
        let cards = state.deck.deal(5).unwrap();
        let hand = Hand::try_from(cards.as_slice()).unwrap();

        let txn = RoundTxn::new(0).hand(p1.clone(), hand).update(RoundUpdate {
            deck: Some(state.deck.clone()),
            turn_order: Some(vec![p1.clone()]),
            phase: Some(RoundPhase::AwaitingTurn),
            status: Some("Player 1's turn".to_string()),
            ..Default::default()
        });
        let version = store.commit(round, txn).unwrap();
        assert_eq!(version, 1);

        let state = store.round_state(round).unwrap();
        assert_eq!(state.version, 1);
        assert_eq!(state.deck.dealt(), 5);
        assert_eq!(state.phase, RoundPhase::AwaitingTurn);
        assert_eq!(store.member_hand(round, &p1).unwrap(), Some(hand));
    }

    #[test]
    fn stale_commit_conflicts() {
        let (store, round) = new_store();

        // Two writers read version zero, only the first commits.
        let txn = RoundTxn::new(0).update(RoundUpdate {
            turn_index: Some(1),
            ..Default::default()
        });
        store.commit(round, txn.clone()).unwrap();

        let err = store.commit(round, txn).unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict {
                round,
                expected: 0,
                found: 1,
            }
        );

        // The round keeps the first write.
        assert_eq!(store.round_state(round).unwrap().turn_index, 1);
    }

    #[test]
    fn concurrent_commits_serialize() {
        let (store, round) = new_store();
        let committed = Arc::new(AtomicUsize::new(0));

        // Every thread reads the same version; exactly one commit per
        // version can win.
        let version = store.round_state(round).unwrap().version;
        thread::scope(|s| {
            for _ in 0..8 {
                let store = store.clone();
                let committed = committed.clone();
                s.spawn(move || {
                    let txn = RoundTxn::new(version).update(RoundUpdate {
                        turn_index: Some(1),
                        ..Default::default()
                    });
                    match store.commit(round, txn) {
                        Ok(_) => {
                            committed.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(err) => {
                            assert!(matches!(err, StoreError::Conflict { .. }));
                        }
                    }
                });
            }
        });

        assert_eq!(committed.load(Ordering::SeqCst), 1);
        assert_eq!(store.round_state(round).unwrap().version, 1);
    }

    #[test]
    fn watchers_observe_commits_until_cancelled() {
        let (store, round) = new_store();
        let seen = Arc::new(AtomicUsize::new(0));

        let handle = store
            .watch(round, {
                let seen = seen.clone();
                Box::new(move |state| {
                    assert!(state.version > 0);
                    seen.fetch_add(1, Ordering::SeqCst);
                })
            })
            .unwrap();

        let update = RoundUpdate {
            turn_index: Some(1),
            ..Default::default()
        };
        store.set_round_state(round, update.clone()).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        drop(handle);
        store.set_round_state(round, update).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn watchers_may_read_the_store() {
        let (store, round) = new_store();

        let handle = store
            .watch(round, {
                let store = store.clone();
                Box::new(move |state| {
                    // A reentrant read must not deadlock.
                    let read = store.round_state(round).unwrap();
                    assert_eq!(read.version, state.version);
                })
            })
            .unwrap();

        store
            .set_round_state(
                round,
                RoundUpdate {
                    turn_index: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();

        handle.cancel();
    }

    #[test]
    fn result_roundtrip() {
        let (store, round) = new_store();
        assert_eq!(store.result(round).unwrap(), None);
    }

    #[test]
    fn store_debug_format() {
        let (store, _) = new_store();
        assert_eq!(format!("{store:?}"), "MemoryStore { rounds: 1 }");
    }
}
