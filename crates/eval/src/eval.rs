// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluation.
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use cooler_cards::Card;

/// The rank class of a five cards hand, weakest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum HandRank {
    /// No pair, ranked by its cards.
    HighCard,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Five consecutive ranks, the wheel A5432 counts as a five high.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// A straight in a single suit.
    StraightFlush,
    /// An ace high straight flush.
    RoyalFlush,
}

impl HandRank {
    /// The rank name for display.
    pub fn name(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
            HandRank::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of an evaluated hand.
///
/// Values order first by [HandRank] then by the category tiebreakers, so two
/// hands that differ only by suits compare as equal and split the pot. The
/// five cards that realize the value are kept for display and do not take
/// part in the ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandValue {
    rank: HandRank,
    tiebreaks: [u8; 5],
    cards: [Card; 5],
}

impl HandValue {
    /// Evaluates a hand of 5 to 7 cards returning the value of the best five
    /// cards combination.
    ///
    /// Panics if the hand has fewer than 5 or more than 7 cards.
    pub fn eval(cards: &[Card]) -> HandValue {
        match cards.len() {
            5 => {
                let mut five = [cards[0]; 5];
                five.copy_from_slice(cards);
                Self::score(five)
            }
            6 => {
                // Best of the six hands that drop one card.
                let mut best: Option<HandValue> = None;
                for skip in 0..6 {
                    let mut five = [cards[0]; 5];
                    for (slot, &c) in five.iter_mut().zip(
                        cards
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != skip)
                            .map(|(_, c)| c),
                    ) {
                        *slot = c;
                    }

                    let value = Self::score(five);
                    best = Some(best.map_or(value, |b| b.max(value)));
                }
                best.expect("six cards hand")
            }
            7 => {
                // Best of the C(7,2)=21 hands that drop two cards.
                let mut best: Option<HandValue> = None;
                for skip1 in 0..7 {
                    for skip2 in (skip1 + 1)..7 {
                        let mut five = [cards[0]; 5];
                        for (slot, &c) in five.iter_mut().zip(
                            cards
                                .iter()
                                .enumerate()
                                .filter(|(i, _)| *i != skip1 && *i != skip2)
                                .map(|(_, c)| c),
                        ) {
                            *slot = c;
                        }

                        let value = Self::score(five);
                        best = Some(best.map_or(value, |b| b.max(value)));
                    }
                }
                best.expect("seven cards hand")
            }
            n => panic!("eval requires 5 to 7 cards, got {n}"),
        }
    }

    /// The hand rank class.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The five cards that realize this value, sorted by descending rank.
    pub fn cards(&self) -> &[Card; 5] {
        &self.cards
    }

    /// Scores a five cards hand.
    fn score(mut five: [Card; 5]) -> HandValue {
        five.sort_by(|a, b| b.rank().cmp(&a.rank()));

        let values = five.map(|c| c.rank().value());
        let flush = five.iter().all(|c| c.suit() == five[0].suit());
        let distinct = values.windows(2).all(|w| w[0] != w[1]);

        // The wheel counts as a five high straight.
        let straight_high = if !distinct {
            None
        } else if values[0] - values[4] == 4 {
            Some(values[0])
        } else if values == [14, 5, 4, 3, 2] {
            Some(5)
        } else {
            None
        };

        if let Some(high) = straight_high {
            let rank = match (flush, high) {
                (true, 14) => HandRank::RoyalFlush,
                (true, _) => HandRank::StraightFlush,
                (false, _) => HandRank::Straight,
            };
            return Self::with(rank, &[high], five);
        }

        if flush {
            return Self::with(HandRank::Flush, &values, five);
        }

        // Group repeated ranks, strongest group first.
        let mut groups: Vec<(u8, u8)> = Vec::with_capacity(5);
        for v in values {
            match groups.last_mut() {
                Some(g) if g.1 == v => g.0 += 1,
                _ => groups.push((1, v)),
            }
        }
        groups.sort_by(|a, b| b.cmp(a));

        let rank = match (groups[0].0, groups.get(1).map_or(0, |g| g.0)) {
            (4, _) => HandRank::FourOfAKind,
            (3, 2) => HandRank::FullHouse,
            (3, _) => HandRank::ThreeOfAKind,
            (2, 2) => HandRank::TwoPair,
            (2, _) => HandRank::OnePair,
            _ => HandRank::HighCard,
        };

        let tiebreaks = groups.iter().map(|g| g.1).collect::<Vec<_>>();
        Self::with(rank, &tiebreaks, five)
    }

    fn with(rank: HandRank, tiebreaks: &[u8], cards: [Card; 5]) -> HandValue {
        let mut padded = [0u8; 5];
        padded[..tiebreaks.len()].copy_from_slice(tiebreaks);
        HandValue {
            rank,
            tiebreaks: padded,
            cards,
        }
    }
}

impl PartialEq for HandValue {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.tiebreaks == other.tiebreaks
    }
}

impl Eq for HandValue {}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.tiebreaks.cmp(&other.tiebreaks))
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank)?;
        for c in &self.cards {
            write!(f, " {c}")?;
        }
        Ok(())
    }
}
