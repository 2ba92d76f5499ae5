use std::{path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Errors raised while building an automaton by hand.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaError {
    #[error("unknown state `{0}`")]
    UnknownState(String),

    #[error("symbol `{0}` is not part of the alphabet")]
    UnknownSymbol(String),

    #[error("state `{0}` already exists")]
    DuplicateState(String),

    #[error(
        "transition conflict, `{from}` already goes to `{existing}` on `{symbol}`, cannot also go to `{new}`"
    )]
    TransitionConflict {
        from: String,
        symbol: String,
        existing: String,
        new: String,
    },
}

/// Invariant violations found by [`crate::automaton::dfa::Dfa::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the automaton has no states")]
    NoStates,

    #[error("state `{0}` is declared more than once")]
    DuplicateState(String),

    #[error("symbol `{0}` is declared more than once")]
    DuplicateSymbol(String),

    #[error("the alphabet contains an empty symbol")]
    EmptySymbol,

    #[error("initial state `{0}` is not a declared state")]
    UnknownInitialState(String),

    #[error("final state `{0}` is not a declared state")]
    UnknownFinalState(String),

    #[error("transition source `{0}` is not a declared state")]
    UnknownSource(String),

    #[error("transition `{from}` -{symbol}-> `{to}` targets an undeclared state")]
    UnknownTarget {
        from: String,
        symbol: String,
        to: String,
    },

    #[error("transition `{from}` uses symbol `{symbol}` which is not in the alphabet")]
    UnknownSymbol { from: String, symbol: String },
}

/// Load failures. A failed load never yields a partial automaton.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed automaton definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid automaton definition: {0}")]
    Invalid(#[from] ValidationError),
}

/// Failures of the "show automaton" action.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to run renderer `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to communicate with renderer: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("renderer produced an invalid image: {0}")]
    InvalidImage(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no automaton loaded")]
    NoAutomaton,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
