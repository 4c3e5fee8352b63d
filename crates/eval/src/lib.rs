// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cooler Poker hand evaluator.
//!
//! Poker hand evaluator for 5, 6 and 7 cards hands. A hand is scored by
//! enumerating its five card combinations and keeping the strongest, so a
//! seven card evaluation looks at C(7,5)=21 candidates.
//!
//! To use the evaluator create a hand and use [HandValue] to evaluate the
//! hand and get its rank:
//!
//! ```
//! # use cooler_eval::*;
//! // 2C, 3C, .., JC
//! let cards = Deck::default().into_iter().take(10).collect::<Vec<_>>();
//! let v1 = HandValue::eval(&cards[0..5]);
//! let v2 = HandValue::eval(&cards[5..]);
//! assert!(v2 > v1);
//! ```
//!
//! The [equity] module estimates live win probabilities for a set of hole
//! cards against a partial board, by exhaustive enumeration of the missing
//! board cards or by Monte Carlo sampling before the flop.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod equity;
pub mod eval;
pub use equity::{Equity, HoleCards};
pub use eval::{HandRank, HandValue};

// Reexport cards types.
pub use cooler_cards::{Card, Deck, Rank, Suit};
