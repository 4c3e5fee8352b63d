// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game state and betting rounds.
use ahash::AHashMap;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use cooler_cards::{Card, Deck};
use cooler_eval::{Equity, equity};

use crate::{Action, Chips, EngineError, Player, PlayerConfig, PlayerId, Result};

/// The hand phase.
///
/// A hand moves through the fixed street sequence preflop, flop, turn,
/// river, then showdown, and back to setup once the pot is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between hands, waiting for the next deal.
    Setup,
    /// Betting on the hole cards.
    PreFlop,
    /// Betting on the first three board cards.
    Flop,
    /// Betting on the fourth board card.
    Turn,
    /// Betting on the last board card.
    River,
    /// The hand is over, the pot waits for settlement.
    Showdown,
}

impl Phase {
    /// Checks if the phase is a betting round.
    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Phase::Setup => "setup",
            Phase::PreFlop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        };
        f.write_str(phase)
    }
}

/// The state of a table, mutated one action at a time.
///
/// There is exactly one writer: callers submit actions through
/// [GameState::apply_action] and the engine owns every field. The pot only
/// holds chips swept from completed streets, live street bets stay in front
/// of the players, so `pot + Σ round_bet == Σ hand_bet` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) seats: Vec<Player>,
    pub(crate) deck: Deck,
    pub(crate) board: Vec<Card>,
    pub(crate) pot: Chips,
    pub(crate) current: usize,
    pub(crate) dealer: usize,
    pub(crate) small_blind_seat: usize,
    pub(crate) big_blind_seat: usize,
    pub(crate) small_blind: Chips,
    pub(crate) big_blind: Chips,
    pub(crate) phase: Phase,
    pub(crate) current_bet: Chips,
    pub(crate) min_raise: Chips,
    pub(crate) last_raiser: Option<usize>,
}

impl GameState {
    /// Creates a table with the given seats and blind sizes.
    ///
    /// Seat order is fixed for the life of the table.
    pub fn new(configs: Vec<PlayerConfig>, small_blind: Chips, big_blind: Chips) -> Result<Self> {
        if configs.len() < 2 {
            return Err(EngineError::IllegalAction(
                "a table needs at least two players".into(),
            ));
        }

        for i in 0..configs.len() {
            for j in (i + 1)..configs.len() {
                if configs[i].id == configs[j].id {
                    return Err(EngineError::IllegalAction(format!(
                        "duplicate player id {}",
                        configs[i].id
                    )));
                }
            }
        }

        if small_blind == Chips::ZERO || big_blind < small_blind {
            return Err(EngineError::IllegalAction(
                "blinds must be positive with the big blind at least the small".into(),
            ));
        }

        // The dealer starts on the last seat so the first hand rotates it
        // to the first funded one.
        let dealer = configs.len() - 1;

        Ok(Self {
            seats: configs.into_iter().map(Player::new).collect(),
            deck: Deck::default(),
            board: Vec::new(),
            pot: Chips::ZERO,
            current: 0,
            dealer,
            small_blind_seat: 0,
            big_blind_seat: 0,
            small_blind,
            big_blind,
            phase: Phase::Setup,
            current_bet: Chips::ZERO,
            min_raise: big_blind,
            last_raiser: None,
        })
    }

    /// Starts a new hand: rotates the dealer and blinds over the funded
    /// seats, posts the blinds, shuffles and deals.
    ///
    /// Busted players stay seated but sit the hand out.
    pub fn start_hand<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        if self.phase != Phase::Setup {
            return Err(EngineError::IllegalAction(
                "a hand is already in progress".into(),
            ));
        }

        if self.funded_count() < 2 {
            return Err(EngineError::IllegalAction(
                "a hand needs at least two funded players".into(),
            ));
        }

        for p in &mut self.seats {
            p.start_hand();
        }
        self.board.clear();
        self.pot = Chips::ZERO;

        self.dealer = self.next_funded(self.dealer);
        self.small_blind_seat = self.next_funded(self.dealer);
        self.big_blind_seat = self.next_funded(self.small_blind_seat);

        // Blinds are capped at the poster's stack, a short post is an
        // all-in but the amount to match stays the big blind.
        let (sb, bb) = (self.small_blind, self.big_blind);
        self.seats[self.small_blind_seat].bet_to(sb);
        self.seats[self.big_blind_seat].bet_to(bb);
        self.current_bet = bb;
        self.min_raise = bb;
        self.last_raiser = Some(self.big_blind_seat);

        self.deck = Deck::new_and_shuffled(rng);
        self.deal_hole_cards()?;
        self.phase = Phase::PreFlop;

        info!(
            "hand started, dealer {}, blinds {sb}/{bb}",
            self.seats[self.dealer].id
        );

        match self.next_actor(self.big_blind_seat) {
            Some(seat) => self.current = seat,
            // The blinds left nobody able to act, run the board out.
            None => self.advance()?,
        }

        self.verify_chips()
    }

    /// Validates and applies an action for a player, then advances the
    /// hand: next actor, next street, or showdown.
    ///
    /// This is the engine's only mutation entry point. An illegal action is
    /// rejected before anything changes. The single coercion applied is
    /// clamping a bet or raise above the player's stack to an all-in.
    pub fn apply_action(&mut self, player_id: &PlayerId, action: Action) -> Result<()> {
        if !self.phase.is_betting() {
            return Err(EngineError::IllegalAction(
                "no betting round in progress".into(),
            ));
        }

        let seat = self.current;
        if self.seats[seat].id != *player_id {
            return Err(EngineError::IllegalAction(format!(
                "it is not {player_id}'s turn"
            )));
        }

        // Validate before any mutation.
        let applied = match action {
            Action::Fold => action,
            Action::Check => {
                if self.seats[seat].round_bet != self.current_bet {
                    return Err(EngineError::IllegalAction(
                        "cannot check while facing a bet".into(),
                    ));
                }
                action
            }
            Action::Call => {
                if self.seats[seat].round_bet >= self.current_bet {
                    return Err(EngineError::IllegalAction(
                        "nothing to call, check instead".into(),
                    ));
                }
                action
            }
            Action::Bet(_) if self.current_bet > Chips::ZERO => {
                return Err(EngineError::IllegalAction(
                    "a bet already stands, raise instead".into(),
                ));
            }
            Action::Raise(_) if self.current_bet == Chips::ZERO => {
                return Err(EngineError::IllegalAction(
                    "no bet to raise, bet instead".into(),
                ));
            }
            Action::Bet(amount) | Action::Raise(amount) => {
                let player = &self.seats[seat];
                if player.has_acted {
                    return Err(EngineError::IllegalAction(
                        "betting is not reopened".into(),
                    ));
                }

                let all_in = player.round_bet + player.chips;
                let target = amount.min(all_in);
                if target <= self.current_bet {
                    return Err(EngineError::IllegalAction(format!(
                        "a bet of {target} does not exceed the current bet of {}",
                        self.current_bet
                    )));
                }

                // A raise below the minimum is only legal as an all-in.
                let increment = target - self.current_bet;
                if increment < self.min_raise && target < all_in {
                    return Err(EngineError::IllegalAction(format!(
                        "a raise of {increment} is below the minimum of {}",
                        self.min_raise
                    )));
                }

                match action {
                    Action::Bet(_) => Action::Bet(target),
                    _ => Action::Raise(target),
                }
            }
        };

        // Mutate.
        match applied {
            Action::Fold => self.seats[seat].fold(),
            Action::Check => {}
            Action::Call => {
                let target = self.current_bet;
                self.seats[seat].bet_to(target);
            }
            Action::Bet(target) | Action::Raise(target) => {
                let increment = target - self.current_bet;
                self.seats[seat].bet_to(target);
                self.current_bet = target;
                self.last_raiser = Some(seat);

                // A full size raise reopens the betting for everybody
                // else, a short all-in raise reopens nothing.
                if increment >= self.min_raise {
                    self.min_raise = increment;
                    for (i, p) in self.seats.iter_mut().enumerate() {
                        if i != seat && p.is_active() && p.chips > Chips::ZERO {
                            p.has_acted = false;
                        }
                    }
                }
            }
        }

        let player = &mut self.seats[seat];
        player.has_acted = true;
        player.last_action = Some(applied);
        debug!("{} {} {applied}", self.phase, player.id);

        self.advance()?;
        self.verify_chips()
    }

    /// The legal actions for the player to act, with bet and raise carrying
    /// their minimum legal street total.
    ///
    /// Empty outside a betting round.
    pub fn legal_actions(&self) -> Vec<Action> {
        if !self.phase.is_betting() {
            return Vec::new();
        }

        let player = &self.seats[self.current];
        let mut actions = vec![Action::Fold];

        if player.round_bet == self.current_bet {
            actions.push(Action::Check);
        } else {
            actions.push(Action::Call);
        }

        let all_in = player.round_bet + player.chips;
        if !player.has_acted && all_in > self.current_bet {
            let target = (self.current_bet + self.min_raise).min(all_in);
            if self.current_bet == Chips::ZERO {
                actions.push(Action::Bet(target));
            } else {
                actions.push(Action::Raise(target));
            }
        }

        actions
    }

    /// Estimates each unfolded player's win probability and best hand so
    /// far. Read only, callable at any point during a hand.
    pub fn estimate_equity<R: Rng>(&self, rng: &mut R) -> AHashMap<PlayerId, Equity> {
        let mut ids = Vec::new();
        let mut hands = Vec::new();

        for p in &self.seats {
            if let (true, Some(hole)) = (p.is_active(), p.hole) {
                ids.push(p.id.clone());
                hands.push(hole);
            }
        }

        ids.into_iter()
            .zip(equity::estimate(&hands, &self.board, rng))
            .collect()
    }

    /// The players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.seats
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.seats.iter().find(|p| p.id == *id)
    }

    /// The board cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// The hand phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The chips swept from completed streets.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// The pot plus the live street bets, what a table would display.
    pub fn total_pot(&self) -> Chips {
        self.seats
            .iter()
            .fold(self.pot, |acc, p| acc + p.round_bet)
    }

    /// The player to act, `None` outside a betting round.
    pub fn current_player(&self) -> Option<&Player> {
        self.phase
            .is_betting()
            .then(|| &self.seats[self.current])
    }

    /// The dealer for the current hand.
    pub fn dealer(&self) -> &Player {
        &self.seats[self.dealer]
    }

    /// The current bet to match on this street.
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    /// The big blind size.
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }

    /// The small blind size.
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }

    /// Number of players holding chips.
    pub fn funded_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|p| p.chips > Chips::ZERO)
            .count()
    }

    /// Moves the hand forward after a mutation: hands off to the next
    /// actor, or closes the street and deals forward.
    fn advance(&mut self) -> Result<()> {
        // The hand ends at once when at most one player is left unfolded.
        if self.active_count() <= 1 {
            self.sweep_round();
            self.phase = Phase::Showdown;
            debug!("hand folded out");
            return Ok(());
        }

        if !self.round_complete() {
            self.current = self.next_actor(self.current).ok_or_else(|| {
                EngineError::InconsistentState("no player can act in an open round".into())
            })?;
            return Ok(());
        }

        // The street is closed: deal forward until betting can resume or
        // the board is complete. When at most one player has chips behind
        // the remaining streets run with no further betting. The loop is
        // bounded by the fixed street sequence.
        loop {
            self.sweep_round();

            match self.phase {
                Phase::PreFlop => {
                    self.deal_street(3)?;
                    self.phase = Phase::Flop;
                }
                Phase::Flop => {
                    self.deal_street(1)?;
                    self.phase = Phase::Turn;
                }
                Phase::Turn => {
                    self.deal_street(1)?;
                    self.phase = Phase::River;
                }
                Phase::River => {
                    self.phase = Phase::Showdown;
                    debug!("betting closed, showdown");
                    return Ok(());
                }
                Phase::Setup | Phase::Showdown => {
                    return Err(EngineError::InconsistentState(
                        "betting round outside a hand".into(),
                    ));
                }
            }

            debug!(
                "{}: {}",
                self.phase,
                self.board
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            );

            if self.can_act_count() >= 2 {
                self.current = self.next_actor(self.dealer).ok_or_else(|| {
                    EngineError::InconsistentState("no first actor on a new street".into())
                })?;
                return Ok(());
            }
        }
    }

    /// Checks if every unfolded player with chips has acted and matched
    /// the current bet.
    fn round_complete(&self) -> bool {
        self.seats
            .iter()
            .filter(|p| p.is_active() && p.chips > Chips::ZERO)
            .all(|p| p.has_acted && p.round_bet == self.current_bet)
    }

    /// Sweeps the street bets into the pot and resets the betting state.
    fn sweep_round(&mut self) {
        for p in &mut self.seats {
            self.pot += p.end_street();
        }

        self.current_bet = Chips::ZERO;
        self.min_raise = self.big_blind;
        self.last_raiser = None;
    }

    /// Burns a card then deals `count` cards to the board.
    fn deal_street(&mut self, count: usize) -> Result<()> {
        self.deck.deal().ok_or(EngineError::DeckExhausted)?;

        for _ in 0..count {
            let card = self.deck.deal().ok_or(EngineError::DeckExhausted)?;
            self.board.push(card);
        }

        Ok(())
    }

    /// Deals two hole cards to each player in the hand, one card at a time
    /// starting left of the dealer.
    fn deal_hole_cards(&mut self) -> Result<()> {
        let order = (1..=self.seats.len())
            .map(|off| (self.dealer + off) % self.seats.len())
            .filter(|&i| self.seats[i].is_active())
            .collect::<Vec<_>>();

        let mut first = vec![None; self.seats.len()];
        for round in 0..2 {
            for &i in &order {
                let card = self.deck.deal().ok_or(EngineError::DeckExhausted)?;
                if round == 0 {
                    first[i] = Some(card);
                } else {
                    let c1 = first[i].take().expect("first hole card dealt");
                    self.seats[i].hole = Some([c1, card]);
                }
            }
        }

        Ok(())
    }

    /// Number of players still in the hand.
    fn active_count(&self) -> usize {
        self.seats.iter().filter(|p| p.is_active()).count()
    }

    /// Number of players still in the hand with chips behind.
    fn can_act_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|p| p.is_active() && p.chips > Chips::ZERO)
            .count()
    }

    /// The next seat after `from` with chips, wrapping around the table.
    fn next_funded(&self, from: usize) -> usize {
        (1..=self.seats.len())
            .map(|off| (from + off) % self.seats.len())
            .find(|&i| self.seats[i].chips > Chips::ZERO)
            .expect("a funded seat")
    }

    /// The next seat after `from` that can act, wrapping around the table.
    fn next_actor(&self, from: usize) -> Option<usize> {
        (1..=self.seats.len())
            .map(|off| (from + off) % self.seats.len())
            .find(|&i| {
                let p = &self.seats[i];
                p.is_active() && p.chips > Chips::ZERO
            })
    }

    /// Audits the chip conservation invariant.
    pub(crate) fn verify_chips(&self) -> Result<()> {
        let committed = self
            .seats
            .iter()
            .fold(Chips::ZERO, |acc, p| acc + p.hand_bet);
        let live = self
            .seats
            .iter()
            .fold(Chips::ZERO, |acc, p| acc + p.round_bet);

        if self.pot + live != committed {
            return Err(EngineError::InconsistentState(format!(
                "pot {} plus street bets {live} does not match contributions {committed}",
                self.pot
            )));
        }

        Ok(())
    }
}
