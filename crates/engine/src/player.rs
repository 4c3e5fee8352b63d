// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Table player types.
use serde::{Deserialize, Serialize};
use std::fmt;

use cooler_cards::Card;

use crate::{Action, Chips};

/// A stable player identifier assigned by the lobby layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a player id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A seat request used to create a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// The player id.
    pub id: PlayerId,
    /// The player starting stack.
    pub chips: Chips,
}

impl PlayerConfig {
    /// Creates a seat request.
    pub fn new(id: impl Into<String>, chips: Chips) -> Self {
        Self {
            id: PlayerId::new(id),
            chips,
        }
    }
}

/// A seat at the table.
///
/// Every field is owned and mutated by the engine, callers read the state
/// through the accessors and change it only by submitting actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) chips: Chips,
    pub(crate) hole: Option<[Card; 2]>,
    pub(crate) folded: bool,
    pub(crate) round_bet: Chips,
    pub(crate) hand_bet: Chips,
    pub(crate) last_action: Option<Action>,
    pub(crate) has_acted: bool,
}

impl Player {
    pub(crate) fn new(config: PlayerConfig) -> Self {
        Self {
            id: config.id,
            chips: config.chips,
            hole: None,
            folded: false,
            round_bet: Chips::ZERO,
            hand_bet: Chips::ZERO,
            last_action: None,
            has_acted: false,
        }
    }

    /// The player id.
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// The player stack.
    pub fn chips(&self) -> Chips {
        self.chips
    }

    /// The player hole cards, `None` when not dealt in.
    pub fn hole(&self) -> Option<&[Card; 2]> {
        self.hole.as_ref()
    }

    /// Checks if the player has folded this hand.
    ///
    /// Busted players sit out every hand as folded.
    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// Checks if the player is still in the hand.
    pub fn is_active(&self) -> bool {
        !self.folded
    }

    /// Checks if the player is in the hand with no chips behind.
    pub fn is_all_in(&self) -> bool {
        self.is_active() && self.hole.is_some() && self.chips == Chips::ZERO
    }

    /// The chips the player committed on the current street.
    pub fn round_bet(&self) -> Chips {
        self.round_bet
    }

    /// The chips the player committed over the whole hand.
    pub fn hand_bet(&self) -> Chips {
        self.hand_bet
    }

    /// The last action the player took this street.
    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    /// Checks if the player has acted on the current street.
    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    /// Resets the per hand state, busted players sit the hand out.
    pub(crate) fn start_hand(&mut self) {
        self.folded = self.chips == Chips::ZERO;
        self.hole = None;
        self.round_bet = Chips::ZERO;
        self.hand_bet = Chips::ZERO;
        self.last_action = None;
        self.has_acted = false;
    }

    /// Commits chips toward a street total of `target`, clamped to the
    /// stack for an all-in. Returns the chips actually moved.
    pub(crate) fn bet_to(&mut self, target: Chips) -> Chips {
        let delta = (target - self.round_bet).min(self.chips);
        self.chips -= delta;
        self.round_bet += delta;
        self.hand_bet += delta;
        delta
    }

    /// Folds the player out of the hand.
    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    /// Sweeps the street bet and clears the per street flags, returning
    /// the chips to move into the pot.
    pub(crate) fn end_street(&mut self) -> Chips {
        let bet = self.round_bet;
        self.round_bet = Chips::ZERO;
        self.last_action = None;
        self.has_acted = false;
        bet
    }

    /// Clears the per hand fields once the pot has been paid.
    pub(crate) fn end_hand(&mut self) {
        self.hole = None;
        self.folded = false;
        self.round_bet = Chips::ZERO;
        self.hand_bet = Chips::ZERO;
        self.last_action = None;
        self.has_acted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(chips: u32) -> Player {
        Player::new(PlayerConfig::new("p", Chips::new(chips)))
    }

    #[test]
    fn bet_to_commits_the_difference() {
        let mut p = player(1_000);

        assert_eq!(p.bet_to(Chips::new(100)), Chips::new(100));
        assert_eq!(p.round_bet(), Chips::new(100));
        assert_eq!(p.chips(), Chips::new(900));

        // Raising own bet only moves the increment.
        assert_eq!(p.bet_to(Chips::new(300)), Chips::new(200));
        assert_eq!(p.round_bet(), Chips::new(300));
        assert_eq!(p.hand_bet(), Chips::new(300));
        assert_eq!(p.chips(), Chips::new(700));
    }

    #[test]
    fn bet_to_clamps_to_all_in() {
        let mut p = player(50);

        assert_eq!(p.bet_to(Chips::new(200)), Chips::new(50));
        assert_eq!(p.round_bet(), Chips::new(50));
        assert_eq!(p.chips(), Chips::ZERO);
    }

    #[test]
    fn busted_players_sit_out() {
        let mut p = player(0);
        p.start_hand();
        assert!(p.is_folded());

        let mut p = player(10);
        p.start_hand();
        assert!(!p.is_folded());
    }

    #[test]
    fn end_street_sweeps_the_bet() {
        let mut p = player(100);
        p.bet_to(Chips::new(40));
        p.has_acted = true;
        p.last_action = Some(Action::Call);

        assert_eq!(p.end_street(), Chips::new(40));
        assert_eq!(p.round_bet(), Chips::ZERO);
        assert_eq!(p.hand_bet(), Chips::new(40));
        assert!(!p.has_acted());
        assert!(p.last_action().is_none());
    }
}
