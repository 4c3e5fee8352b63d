// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cooler Poker cards types.
//!
//! This crate defines types to create cards:
//!
//! ```
//! # use cooler_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd = Card::new(Rank::King, Suit::Diamonds);
//! assert!(ah.rank() > kd.rank());
//! ```
//!
//! and a [Deck] type for shuffling, dealing, and enumerating the cards that
//! are still in the deck.
//!
//! A deck starts in canonical order and is shuffled with an injected random
//! source so that tests can replay exact permutations:
//!
//! ```
//! # use cooler_cards::Deck;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut deck = Deck::new_and_shuffled(&mut rng);
//! let card = deck.deal().unwrap();
//! assert_eq!(deck.count(), 51);
//! assert!(!deck.contains(card));
//! ```
//!
//! To enumerate all two card completions of a partial board:
//!
//! ```
//! # use cooler_cards::Deck;
//! let mut count = 0;
//! Deck::default().for_each_combo(2, |cards| {
//!     assert_eq!(cards.len(), 2);
//!     count += 1;
//! });
//! assert_eq!(count, 1_326);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, Rank, Suit};
