// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Runs one round of five card draw against the in memory store.
#![warn(clippy::all, rust_2018_idioms)]
use anyhow::Result;
use clap::Parser;
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};

use fivedraw_table::{
    MemoryStore, Table,
    core::{GameStore, Member, PlayerId},
};

#[derive(Debug, Parser)]
struct Cli {
    /// Number of players.
    #[clap(long, short, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=5))]
    players: u8,
    /// Seed for the deck shuffle and the discards.
    #[clap(long, short)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let store = MemoryStore::default();
    let host = Member::new(PlayerId::new("p1"), "Player 1");
    let table = Table::create(store.clone(), host, &mut rng)?;

    // Mirror every committed status line.
    let _watch = store.watch(
        table.round_id(),
        Box::new(|state| info!("status: {}", state.status)),
    )?;

    for n in 2..=cli.players as usize {
        let member = Member::new(PlayerId::new(format!("p{n}")), format!("Player {n}"));
        table.join(member)?;
    }

    table.deal()?;

    // Each player discards up to three random cards.
    loop {
        let state = table.state()?;
        let Some(player) = state.current_player().cloned() else {
            break;
        };

        let hand = table.hand(&player)?.expect("hand has been dealt");
        let count = rng.random_range(0..=3);
        table.exchange(&player, &hand.cards()[..count])?;
    }

    let result = table.result()?.expect("round has ended");
    for entry in &result.hands {
        info!(
            "{}: {} ({})",
            entry.display_name,
            entry.hand,
            entry.category.label()
        );
    }

    Ok(())
}
