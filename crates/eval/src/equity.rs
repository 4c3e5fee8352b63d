// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Win probability estimation.
//!
//! Estimates each hand's share of wins over all the ways the board can be
//! completed. On the turn and river the completions are enumerated
//! exhaustively, before the flop the space is too large and a fixed number
//! of boards is sampled instead.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use cooler_cards::{Card, Deck, Rank, Suit};

use crate::eval::{HandRank, HandValue};

/// A player's two hole cards.
pub type HoleCards = [Card; 2];

/// A player's estimated standing in the hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equity {
    /// Estimated probability of winning the hand, 0 to 100.
    pub win_pct: f64,
    /// The best rank the player makes with the cards visible so far.
    pub hand_rank: HandRank,
}

/// Number of sampled boards for the preflop estimate.
pub const PREFLOP_TRIALS: usize = 2_000;

/// Estimates the win probability of each hand against the given board.
///
/// The board must have 0, 3, 4, or 5 cards. Ties credit each tied hand with
/// an equal share of the win, so probabilities add up to 100 across hands.
/// With fewer than two hands the estimate is trivially 100.
pub fn estimate<R: Rng>(hands: &[HoleCards], board: &[Card], rng: &mut R) -> Vec<Equity> {
    debug_assert!(matches!(board.len(), 0 | 3 | 4 | 5), "invalid board size");

    let ranks = hands
        .iter()
        .map(|h| rank_so_far(h, board))
        .collect::<Vec<_>>();

    // With a single hand there is nothing to estimate.
    if hands.len() < 2 {
        return ranks
            .into_iter()
            .map(|hand_rank| Equity {
                win_pct: 100.0,
                hand_rank,
            })
            .collect();
    }

    // The unseen pool is the deck without any of the visible cards.
    let mut deck = Deck::default();
    for &c in hands.iter().flatten().chain(board.iter()) {
        deck.remove(c);
    }

    let mut wins = vec![0f64; hands.len()];
    let mut trials = 0usize;
    let mut board5 = [Card::new(Rank::Deuce, Suit::Clubs); 5];
    board5[..board.len()].copy_from_slice(board);

    match board.len() {
        0 => {
            let pool = deck.into_iter().collect::<Vec<_>>();
            for _ in 0..PREFLOP_TRIALS {
                for (slot, &c) in board5.iter_mut().zip(pool.choose_multiple(rng, 5)) {
                    *slot = c;
                }
                run_showdown(hands, &board5, &mut wins);
            }
            trials = PREFLOP_TRIALS;
        }
        5 => {
            run_showdown(hands, &board5, &mut wins);
            trials = 1;
        }
        n => {
            deck.for_each_combo(5 - n, |draw| {
                board5[n..].copy_from_slice(draw);
                run_showdown(hands, &board5, &mut wins);
                trials += 1;
            });
        }
    }

    wins.into_iter()
        .zip(ranks)
        .map(|(w, hand_rank)| Equity {
            win_pct: w / trials as f64 * 100.0,
            hand_rank,
        })
        .collect()
}

/// Evaluates every hand against a full board crediting the winners.
fn run_showdown(hands: &[HoleCards], board: &[Card; 5], wins: &mut [f64]) {
    let mut seven = [board[0]; 7];
    seven[..5].copy_from_slice(board);

    let mut best: Option<HandValue> = None;
    let mut winners = Vec::with_capacity(hands.len());

    for (i, hole) in hands.iter().enumerate() {
        seven[5..].copy_from_slice(hole);
        let value = HandValue::eval(&seven);

        match best {
            None => {
                best = Some(value);
                winners.push(i);
            }
            Some(b) => match value.cmp(&b) {
                Ordering::Greater => {
                    best = Some(value);
                    winners.clear();
                    winners.push(i);
                }
                Ordering::Equal => winners.push(i),
                Ordering::Less => {}
            },
        }
    }

    let share = 1.0 / winners.len() as f64;
    for i in winners {
        wins[i] += share;
    }
}

/// The best rank a hand makes with the cards visible so far.
fn rank_so_far(hole: &HoleCards, board: &[Card]) -> HandRank {
    if board.len() >= 3 {
        let mut cards = hole.to_vec();
        cards.extend_from_slice(board);
        HandValue::eval(&cards).rank()
    } else if hole[0].rank() == hole[1].rank() {
        HandRank::OnePair
    } else {
        HandRank::HighCard
    }
}
