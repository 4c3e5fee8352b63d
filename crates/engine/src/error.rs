// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Engine error types.
use thiserror::Error;

/// Errors returned by the engine.
///
/// All failures are synchronous and local, nothing is retried internally.
/// A rejected action leaves the game state untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An action that violates turn order or the betting rules.
    #[error("illegal action: {0}")]
    IllegalAction(String),
    /// More cards were requested than remain in the deck.
    #[error("deck exhausted")]
    DeckExhausted,
    /// The chip conservation invariant does not hold, the state was
    /// corrupted outside the engine.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, EngineError>;
