// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cooler Poker betting engine.
//!
//! This crate drives a Texas Hold'em hand from the blinds to the showdown:
//! it owns the [GameState], validates and applies one player action at a
//! time, deals the streets, and settles the main and side pots when the
//! hand ends. The engine performs no I/O and takes its randomness as an
//! injected [rand::Rng], so whole hands replay deterministically from a
//! seed.
//!
//! ```
//! use cooler_engine::{Action, Chips, GameState, PlayerConfig, PlayerId};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let configs = vec![
//!     PlayerConfig::new("alice", Chips::new(1_000)),
//!     PlayerConfig::new("bob", Chips::new(1_000)),
//! ];
//!
//! let mut state = GameState::new(configs, Chips::new(10), Chips::new(20)).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! state.start_hand(&mut rng).unwrap();
//!
//! // The engine validates whatever action source the caller wires in.
//! let to_act = state.current_player().unwrap().id().clone();
//! state.apply_action(&to_act, Action::Call).unwrap();
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]

mod action;
mod chips;
mod error;
mod player;
mod settle;
mod state;

pub use action::Action;
pub use chips::Chips;
pub use error::{EngineError, Result};
pub use player::{Player, PlayerConfig, PlayerId};
pub use settle::{Payoff, Settlement};
pub use state::{GameState, Phase};

// Reexport the types that show up in the engine interface.
pub use cooler_cards::{Card, Deck, Rank, Suit};
pub use cooler_eval::{Equity, HandRank, HandValue};
