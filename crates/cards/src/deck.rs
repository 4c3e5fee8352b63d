// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Poker card.
///
/// Cards are immutable values identified by their rank and suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a card given a rank and suit.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank, self.suit)
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    Deuce = 0,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The rank value, 2 for the deuce up to 14 for the ace.
    ///
    /// The ace counts high everywhere except inside a five high straight.
    pub fn value(self) -> u8 {
        self as u8 + 2
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    Clubs,
    /// Diamonds suit.
    Diamonds,
    /// Hearts suit.
    Hearts,
    /// Spades suit.
    Spades,
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

/// A cards deck.
///
/// Cards are dealt from the tail so a shuffled deck deals a random sequence
/// without further bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in a full deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    /// Shuffles the remaining cards.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals a card from the deck, `None` if the deck is exhausted.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }

    /// Checks if a card is still in the deck.
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Calls the `f` closure for each k-cards combination of the remaining
    /// cards.
    ///
    /// Panics if k is not 1 <= k <= 5.
    pub fn for_each_combo<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        assert!((1..=5).contains(&k), "1 <= k <= 5");

        let n = self.cards.len();
        if k > n {
            return;
        }

        let mut idx: Vec<usize> = (0..k).collect();
        let mut combo = vec![self.cards[0]; k];

        loop {
            for (slot, &i) in combo.iter_mut().zip(idx.iter()) {
                *slot = self.cards[i];
            }

            f(&combo);

            // Advance the rightmost index that has room to grow.
            let mut j = k;
            loop {
                if j == 0 {
                    return;
                }

                j -= 1;
                if idx[j] != n - k + j {
                    break;
                }
            }

            idx[j] += 1;
            for l in (j + 1)..k {
                idx[l] = idx[l - 1] + 1;
            }
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
