// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Player action types.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Chips;

/// A betting action submitted to the engine.
///
/// Bet and raise amounts are the total the player commits for the street,
/// not the increment over chips already in front of them. An amount above
/// the player's stack is clamped to an all-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Give up the hand.
    Fold,
    /// Pass the action without betting.
    Check,
    /// Match the current bet.
    Call,
    /// Open the betting for the street.
    Bet(Chips),
    /// Increase the current bet.
    Raise(Chips),
}

impl Action {
    /// The action label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Fold => "FOLD",
            Action::Check => "CHECK",
            Action::Call => "CALL",
            Action::Bet(_) => "BET",
            Action::Raise(_) => "RAISE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Bet(chips) | Action::Raise(chips) => {
                write!(f, "{} {chips}", self.label())
            }
            _ => f.write_str(self.label()),
        }
    }
}
