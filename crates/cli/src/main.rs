// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table simulator that plays random but legal hands through the engine.
use anyhow::Result;
use clap::Parser;
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng};

use cooler_engine::{Action, Chips, GameState, Phase, PlayerConfig};

static NICKNAMES: &[&str] = &["Alice", "Bob", "Carol", "Dave", "Frank", "Mike"];

#[derive(Debug, Parser)]
struct Cli {
    /// Number of players at the table.
    #[clap(long, short, default_value_t = 4, value_parser = clap::value_parser!(u8).range(2..=6))]
    players: u8,
    /// Maximum number of hands to play.
    #[clap(long, default_value_t = 20)]
    hands: u32,
    /// The starting stack.
    #[clap(long, default_value_t = 1_000)]
    chips: u32,
    /// The small blind.
    #[clap(long, default_value_t = 10)]
    small_blind: u32,
    /// The big blind.
    #[clap(long, default_value_t = 20)]
    big_blind: u32,
    /// Seed for the table randomness, random when not given.
    #[clap(long)]
    seed: Option<u64>,
    /// Print the players equity at the start of each street.
    #[clap(long)]
    equity: bool,
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

    let configs = NICKNAMES
        .iter()
        .take(cli.players as usize)
        .map(|n| PlayerConfig::new(*n, Chips::new(cli.chips)))
        .collect();

    let mut state = GameState::new(
        configs,
        Chips::new(cli.small_blind),
        Chips::new(cli.big_blind),
    )?;

    for hand in 1..=cli.hands {
        if state.funded_count() < 2 {
            break;
        }

        info!("=== hand {hand} ===");
        state.start_hand(&mut rng)?;

        let mut last_phase = Phase::Setup;
        while state.phase().is_betting() {
            if state.phase() != last_phase {
                last_phase = state.phase();
                if !state.board().is_empty() {
                    info!("{last_phase}: {}", board_string(&state));
                }
                if cli.equity {
                    print_equity(&state, &mut rng);
                }
            }

            let id = state.current_player().expect("a player to act").id().clone();
            let action = choose_action(&state.legal_actions(), &mut rng);
            info!("{id} {action}");
            state.apply_action(&id, action)?;
        }

        if !state.board().is_empty() {
            info!("board: {}", board_string(&state));
        }

        let settlement = state.settle()?;
        for payoff in &settlement.payoffs {
            match &payoff.hand {
                Some(hand) => info!("{} wins {} with {hand}", payoff.player_id, payoff.chips),
                None => info!("{} wins {} uncontested", payoff.player_id, payoff.chips),
            }
        }
        for id in &settlement.eliminated {
            info!("{id} is eliminated");
        }
    }

    info!("=== standings ===");
    for p in state.players() {
        info!("{} {}", p.id(), p.chips());
    }

    Ok(())
}

/// A call station with an occasional raise and a rare fold.
fn choose_action<R: Rng>(actions: &[Action], rng: &mut R) -> Action {
    let raise = actions
        .iter()
        .find(|a| matches!(a, Action::Bet(_) | Action::Raise(_)))
        .copied();
    let facing_bet = actions.contains(&Action::Call);

    let roll = rng.random_range(0..100u32);
    if let Some(raise) = raise {
        if roll < 15 {
            return raise;
        }
    }

    if facing_bet && roll >= 90 {
        return Action::Fold;
    }

    if actions.contains(&Action::Check) {
        Action::Check
    } else if facing_bet {
        Action::Call
    } else {
        Action::Fold
    }
}

fn print_equity<R: Rng>(state: &GameState, rng: &mut R) {
    let mut stats = state.estimate_equity(rng).into_iter().collect::<Vec<_>>();
    stats.sort_by(|a, b| b.1.win_pct.total_cmp(&a.1.win_pct));

    for (id, equity) in stats {
        info!("  {id} {:5.1}% {}", equity.win_pct, equity.hand_rank);
    }
}

fn board_string(state: &GameState) -> String {
    state
        .board()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
