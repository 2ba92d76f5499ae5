use serde::Serialize;

use crate::automaton::{dfa::Dfa, symbols};

/// How a run through the automaton ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Accepted,
    /// All input was read, but the last state is not accepting.
    Rejected,
    /// No transition for `symbol` in `state`. `position` counts symbols, not
    /// bytes.
    Stuck {
        state: String,
        symbol: String,
        position: usize,
    },
}

/// The states visited while reading an input, starting with the initial
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub states: Vec<String>,
    #[serde(flatten)]
    pub outcome: RunOutcome,
}

impl Run {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, RunOutcome::Accepted)
    }

    pub fn last_state(&self) -> Option<&str> {
        self.states.last().map(String::as_str)
    }

    pub fn to_fancy_string(&self) -> String {
        let path = self.states.join(" -> ");
        match &self.outcome {
            RunOutcome::Accepted => format!("{path} (accepted)"),
            RunOutcome::Rejected => format!("{path} (rejected)"),
            RunOutcome::Stuck {
                symbol, position, ..
            } => format!("{path} (stuck on `{symbol}` at {position})"),
        }
    }
}

impl Dfa {
    /// Same walk as [`Dfa::accepts_str`], recording every visited state.
    pub fn run(&self, input: &str) -> Run {
        let mut current = self.initial_state();
        let mut states = vec![current.to_string()];

        for (position, symbol) in symbols(input).enumerate() {
            match self.target(current, symbol) {
                Some(next) => {
                    current = next;
                    states.push(next.to_string());
                }
                None => {
                    return Run {
                        states,
                        outcome: RunOutcome::Stuck {
                            state: current.to_string(),
                            symbol: symbol.to_string(),
                            position,
                        },
                    };
                }
            }
        }

        let outcome = if self.is_final(current) {
            RunOutcome::Accepted
        } else {
            RunOutcome::Rejected
        };

        Run { states, outcome }
    }
}
