// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown and pot settlement.
//!
//! The pot is distributed in layers built from the contribution levels of
//! the players still in the hand, so a short stacked all-in only contests
//! the chips it covered. Within a layer tied hands split the chips evenly
//! and the odd chip goes to the first tied winner left of the dealer.
use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use cooler_eval::HandValue;

use crate::{Chips, EngineError, GameState, Phase, PlayerId, Result};

/// A player's winnings for a hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payoff {
    /// The winning player.
    pub player_id: PlayerId,
    /// The chips won across all pots.
    pub chips: Chips,
    /// The winning hand, `None` when everybody else folded.
    pub hand: Option<HandValue>,
}

/// The outcome of a settled hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// The winning players in seat order.
    pub payoffs: Vec<Payoff>,
    /// Players that lost their last chips this hand.
    pub eliminated: Vec<PlayerId>,
}

impl GameState {
    /// Distributes the pot once the hand has reached showdown.
    ///
    /// Pays every main and side pot to the best eligible hand, reports the
    /// winners and the players eliminated this hand, clears the per hand
    /// state, and returns the table to [Phase::Setup] for the next deal.
    pub fn settle(&mut self) -> Result<Settlement> {
        if self.phase != Phase::Showdown {
            return Err(EngineError::IllegalAction(
                "the hand has not reached showdown".into(),
            ));
        }

        self.verify_chips()?;
        if self.seats.iter().any(|p| p.round_bet != Chips::ZERO) {
            return Err(EngineError::InconsistentState(
                "street bets were not swept".into(),
            ));
        }

        let active = (0..self.seats.len())
            .filter(|&i| self.seats[i].is_active() && self.seats[i].hole.is_some())
            .collect::<Vec<_>>();

        let mut payoffs: AHashMap<usize, Payoff> = AHashMap::new();

        if let [winner] = active[..] {
            // The last player standing takes everything unseen.
            payoffs.insert(
                winner,
                Payoff {
                    player_id: self.seats[winner].id.clone(),
                    chips: self.pot,
                    hand: None,
                },
            );
        } else {
            // Best seven cards hand for each player at showdown.
            let evals = active
                .iter()
                .map(|&i| {
                    let hole = self.seats[i].hole.expect("showdown player has cards");
                    let mut cards = hole.to_vec();
                    cards.extend_from_slice(&self.board);
                    (i, HandValue::eval(&cards))
                })
                .collect::<Vec<_>>();

            // The contribution levels that cap each pot layer.
            let mut levels = active
                .iter()
                .map(|&i| self.seats[i].hand_bet)
                .collect::<Vec<_>>();
            levels.sort();
            levels.dedup();

            let mut prev = Chips::ZERO;
            for &level in &levels {
                // The layer takes every contribution clamped to its span,
                // dead money from folded players included.
                let layer = self.seats.iter().fold(Chips::ZERO, |acc, p| {
                    acc + (p.hand_bet.min(level) - p.hand_bet.min(prev))
                });
                prev = level;

                if layer == Chips::ZERO {
                    continue;
                }

                // Best hand among the players who covered this level.
                let mut best: Option<HandValue> = None;
                let mut winners = Vec::new();
                for (i, value) in &evals {
                    if self.seats[*i].hand_bet < level {
                        continue;
                    }

                    match best {
                        None => {
                            best = Some(*value);
                            winners.push(*i);
                        }
                        Some(b) => match value.cmp(&b) {
                            Ordering::Greater => {
                                best = Some(*value);
                                winners.clear();
                                winners.push(*i);
                            }
                            Ordering::Equal => winners.push(*i),
                            Ordering::Less => {}
                        },
                    }
                }

                let share = layer / winners.len() as u32;
                let remainder = layer % winners.len() as u32;

                // The odd chip goes to the first tied winner left of the
                // dealer.
                let first = winners
                    .iter()
                    .copied()
                    .min_by_key(|&i| self.seat_offset(i))
                    .expect("a layer has a winner");

                for &w in &winners {
                    let chips = if w == first { share + remainder } else { share };
                    if chips == Chips::ZERO {
                        continue;
                    }

                    payoffs
                        .entry(w)
                        .and_modify(|p| p.chips += chips)
                        .or_insert_with(|| Payoff {
                            player_id: self.seats[w].id.clone(),
                            chips,
                            hand: best,
                        });
                }
            }
        }

        // Pay the winners and audit that the whole pot was distributed.
        let mut paid = Chips::ZERO;
        for (&i, payoff) in &payoffs {
            self.seats[i].chips += payoff.chips;
            paid += payoff.chips;
        }

        if paid != self.pot {
            return Err(EngineError::InconsistentState(format!(
                "paid {paid} from a pot of {}",
                self.pot
            )));
        }

        let eliminated = self
            .seats
            .iter()
            .filter(|p| p.hole.is_some() && p.chips == Chips::ZERO)
            .map(|p| p.id.clone())
            .collect::<Vec<_>>();

        for p in &mut self.seats {
            p.end_hand();
        }
        self.pot = Chips::ZERO;
        self.current_bet = Chips::ZERO;
        self.min_raise = self.big_blind;
        self.last_raiser = None;
        self.phase = Phase::Setup;

        let mut payoffs = payoffs.into_iter().collect::<Vec<_>>();
        payoffs.sort_by_key(|(i, _)| *i);
        let payoffs = payoffs.into_iter().map(|(_, p)| p).collect::<Vec<_>>();

        for payoff in &payoffs {
            match &payoff.hand {
                Some(hand) => debug!("{} wins {} with {hand}", payoff.player_id, payoff.chips),
                None => debug!("{} wins {} uncontested", payoff.player_id, payoff.chips),
            }
        }
        for id in &eliminated {
            debug!("{id} eliminated");
        }

        Ok(Settlement {
            payoffs,
            eliminated,
        })
    }

    /// Seats from the first left of the dealer, the settlement tiebreak
    /// order.
    fn seat_offset(&self, seat: usize) -> usize {
        let n = self.seats.len();
        (seat + n - (self.dealer + 1) % n) % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, PlayerConfig};
    use cooler_cards::{Card, Rank, Suit};
    use cooler_eval::HandRank;
    use rand::{SeedableRng, rngs::StdRng};

    fn card(s: &str) -> Card {
        let mut chars = s.chars();
        let rank = match chars.next().unwrap() {
            '2' => Rank::Deuce,
            '3' => Rank::Trey,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            r => panic!("invalid rank {r}"),
        };
        let suit = match chars.next().unwrap() {
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'H' => Suit::Hearts,
            'S' => Suit::Spades,
            s => panic!("invalid suit {s}"),
        };
        Card::new(rank, suit)
    }

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(card).collect()
    }

    // A seat at showdown: remaining stack, hand contribution, and hole
    // cards, `None` for a folded seat.
    type Seat<'a> = (u32, u32, Option<&'a str>);

    fn showdown(seats: &[Seat<'_>], board: &str, dealer: usize) -> GameState {
        let configs = seats
            .iter()
            .enumerate()
            .map(|(i, &(chips, _, _))| PlayerConfig::new(format!("p{i}"), Chips::new(chips)))
            .collect();

        let mut state = GameState::new(configs, Chips::new(10), Chips::new(20)).unwrap();
        state.dealer = dealer;
        state.board = cards(board);
        state.phase = Phase::Showdown;

        for (i, &(_, hand_bet, hole)) in seats.iter().enumerate() {
            state.seats[i].hand_bet = Chips::new(hand_bet);
            state.pot += Chips::new(hand_bet);
            match hole {
                Some(h) => {
                    let h = cards(h);
                    state.seats[i].hole = Some([h[0], h[1]]);
                }
                None => state.seats[i].folded = true,
            }
        }

        state
    }

    fn payoff<'a>(settlement: &'a Settlement, id: &str) -> &'a Payoff {
        settlement
            .payoffs
            .iter()
            .find(|p| p.player_id == PlayerId::new(id))
            .unwrap()
    }

    #[test]
    fn side_pots_go_to_the_best_covering_hand() {
        // Three players all-in for 100, 300, and 500, the shortest stack
        // holding the best hand.
        let mut state = showdown(
            &[
                (0, 100, Some("AS AH")),
                (0, 300, Some("KS KH")),
                (0, 500, Some("QS QH")),
            ],
            "2C 5D 8H 9S 3C",
            0,
        );

        let settlement = state.settle().unwrap();

        // The aces only win the layer they covered, 100 from each player.
        let p0 = payoff(&settlement, "p0");
        assert_eq!(p0.chips, Chips::new(300));
        assert_eq!(p0.hand.unwrap().rank(), HandRank::OnePair);

        // The kings take the middle layer, the overage returns to p2.
        assert_eq!(payoff(&settlement, "p1").chips, Chips::new(400));
        assert_eq!(payoff(&settlement, "p2").chips, Chips::new(200));

        // Everything contributed was distributed.
        assert_eq!(state.players()[0].chips(), Chips::new(300));
        assert_eq!(state.players()[1].chips(), Chips::new(400));
        assert_eq!(state.players()[2].chips(), Chips::new(200));
        assert_eq!(state.pot(), Chips::ZERO);
        assert_eq!(state.phase(), Phase::Setup);
    }

    #[test]
    fn split_pot_remainder_goes_left_of_the_dealer() {
        // Both players play the board, a folded player left 21 dead chips
        // for a 101 pot.
        let seats: &[Seat<'_>] = &[
            (990, 40, Some("2H 3H")),
            (990, 40, Some("2D 3D")),
            (979, 21, None),
        ];

        let mut state = showdown(seats, "AS KS QS JS TS", 2);
        let settlement = state.settle().unwrap();
        assert_eq!(payoff(&settlement, "p0").chips, Chips::new(51));
        assert_eq!(payoff(&settlement, "p1").chips, Chips::new(50));
        let hand = payoff(&settlement, "p0").hand.unwrap();
        assert_eq!(hand.rank(), HandRank::RoyalFlush);

        // Moving the button moves the odd chip.
        let mut state = showdown(seats, "AS KS QS JS TS", 0);
        let settlement = state.settle().unwrap();
        assert_eq!(payoff(&settlement, "p0").chips, Chips::new(50));
        assert_eq!(payoff(&settlement, "p1").chips, Chips::new(51));
    }

    #[test]
    fn uncalled_bet_returns_to_the_bettor() {
        // p0 bet 100 but p1 could only call 60 all-in.
        let mut state = showdown(
            &[(900, 100, Some("AS AH")), (0, 60, Some("KS KH"))],
            "KD 5D 8H 9S 3C",
            0,
        );

        let settlement = state.settle().unwrap();

        // The kings take the contested 120, the overage goes back.
        let p1 = payoff(&settlement, "p1");
        assert_eq!(p1.chips, Chips::new(120));
        assert_eq!(p1.hand.unwrap().rank(), HandRank::ThreeOfAKind);
        assert_eq!(payoff(&settlement, "p0").chips, Chips::new(40));
        assert!(settlement.eliminated.is_empty());
    }

    #[test]
    fn last_player_standing_takes_the_pot() {
        let mut state = showdown(&[(1_000, 20, None), (980, 20, Some("AS KD"))], "", 0);

        let settlement = state.settle().unwrap();
        assert_eq!(settlement.payoffs.len(), 1);

        let p1 = payoff(&settlement, "p1");
        assert_eq!(p1.chips, Chips::new(40));
        assert!(p1.hand.is_none());
        assert_eq!(state.players()[1].chips(), Chips::new(1_020));
    }

    #[test]
    fn felted_players_are_reported_eliminated() {
        let mut state = showdown(
            &[(0, 100, Some("AS AH")), (0, 100, Some("KS KH"))],
            "2C 5D 8H 9S 3C",
            0,
        );

        let settlement = state.settle().unwrap();
        assert_eq!(payoff(&settlement, "p0").chips, Chips::new(200));
        assert_eq!(settlement.eliminated, vec![PlayerId::new("p1")]);

        // Per hand state is cleared for the next deal.
        assert_eq!(state.phase(), Phase::Setup);
        assert!(state.players().iter().all(|p| p.hole().is_none()));
        assert!(state.players().iter().all(|p| p.hand_bet() == Chips::ZERO));
    }

    #[test]
    fn settle_requires_showdown() {
        let configs = vec![
            PlayerConfig::new("p0", Chips::new(1_000)),
            PlayerConfig::new("p1", Chips::new(1_000)),
        ];
        let mut state = GameState::new(configs, Chips::new(10), Chips::new(20)).unwrap();

        let err = state.settle().unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction(_)));
    }

    #[test]
    fn big_blind_pair_wins_a_checked_down_pot() {
        // Heads-up, stacks 1000/1000, blinds 10/20: the big blind holds
        // aces, the small blind deuces, the board pairs neither.
        let mut state = showdown(
            &[(980, 20, Some("AS AH")), (980, 20, Some("2C 2D"))],
            "KD QD JD 5C 3H",
            1,
        );

        let settlement = state.settle().unwrap();
        assert_eq!(settlement.payoffs.len(), 1);

        let p0 = payoff(&settlement, "p0");
        assert_eq!(p0.chips, Chips::new(40));
        assert_eq!(p0.hand.unwrap().rank(), HandRank::OnePair);
        assert_eq!(state.players()[0].chips(), Chips::new(1_020));
        assert_eq!(state.players()[1].chips(), Chips::new(980));
    }

    #[test]
    fn hands_chain_through_settlement() {
        let configs = vec![
            PlayerConfig::new("p0", Chips::new(1_000)),
            PlayerConfig::new("p1", Chips::new(1_000)),
            PlayerConfig::new("p2", Chips::new(1_000)),
        ];
        let mut state = GameState::new(configs, Chips::new(10), Chips::new(20)).unwrap();
        let mut rng = StdRng::seed_from_u64(29);

        for _ in 0..5 {
            state.start_hand(&mut rng).unwrap();

            // Check or call every decision down to the river.
            while state.phase().is_betting() {
                let id = state.current_player().unwrap().id().clone();
                let action = if state.legal_actions().contains(&Action::Check) {
                    Action::Check
                } else {
                    Action::Call
                };
                state.apply_action(&id, action).unwrap();
            }

            let settlement = state.settle().unwrap();
            let paid = settlement
                .payoffs
                .iter()
                .fold(Chips::ZERO, |acc, p| acc + p.chips);
            assert_eq!(paid, Chips::new(60));

            // Chips only move between the players.
            let total = state
                .players()
                .iter()
                .fold(Chips::ZERO, |acc, p| acc + p.chips());
            assert_eq!(total, Chips::new(3_000));
            assert_eq!(state.phase(), Phase::Setup);
        }
    }
}
