use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Alphabet, Language, symbols},
    error::{DfaError, ValidationError},
};

pub mod io;
pub mod run;

/// Name used for the state added by [`Dfa::complete`] unless configured
/// otherwise.
pub const DEFAULT_SINK_NAME: &str = "sink";

/// A deterministic finite automaton over string states and string symbols.
///
/// The transition function is stored as a map of maps (`source -> symbol ->
/// target`) and may be partial. Field names follow the JSON definition
/// format, see [`Dfa::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dfa {
    #[serde(default)]
    states: Vec<String>,
    #[serde(default)]
    alphabet: Vec<String>,
    #[serde(default)]
    transitions: HashMap<String, HashMap<String, String>>,
    initial_state: String,
    #[serde(default)]
    final_states: Vec<String>,
}

impl Dfa {
    /// Creates an automaton without states. Add states with
    /// [`Dfa::add_state`] and pick the initial one with [`Dfa::set_initial`].
    pub fn new(alphabet: Vec<String>) -> Self {
        Dfa {
            states: vec![],
            alphabet,
            transitions: HashMap::new(),
            initial_state: String::new(),
            final_states: vec![],
        }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn final_states(&self) -> &[String] {
        &self.final_states
    }

    pub fn transitions(&self) -> &HashMap<String, HashMap<String, String>> {
        &self.transitions
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of (source, symbol, target) entries in the transition function.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|row| row.len()).sum()
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.alphabet.iter().any(|s| s == symbol)
    }

    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.iter().any(|s| s == state)
    }

    /// Looks up `transitions[state][symbol]`.
    pub fn target(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .get(state)
            .and_then(|row| row.get(symbol))
            .map(String::as_str)
    }

    pub fn add_state(&mut self, name: impl Into<String>) -> Result<(), DfaError> {
        let name = name.into();
        if self.has_state(&name) {
            return Err(DfaError::DuplicateState(name));
        }

        self.states.push(name);
        Ok(())
    }

    /// Adds `from -symbol-> to`. Adding the same transition twice is fine,
    /// a second target for the same `(from, symbol)` pair is a conflict.
    pub fn add_transition(&mut self, from: &str, symbol: &str, to: &str) -> Result<(), DfaError> {
        for state in [from, to] {
            if !self.has_state(state) {
                return Err(DfaError::UnknownState(state.to_string()));
            }
        }
        if !self.has_symbol(symbol) {
            return Err(DfaError::UnknownSymbol(symbol.to_string()));
        }

        if let Some(existing) = self.target(from, symbol) {
            if existing == to {
                return Ok(());
            }
            return Err(DfaError::TransitionConflict {
                from: from.to_string(),
                symbol: symbol.to_string(),
                existing: existing.to_string(),
                new: to.to_string(),
            });
        }

        self.transitions
            .entry(from.to_string())
            .or_default()
            .insert(symbol.to_string(), to.to_string());
        Ok(())
    }

    pub fn set_initial(&mut self, state: &str) -> Result<(), DfaError> {
        if !self.has_state(state) {
            return Err(DfaError::UnknownState(state.to_string()));
        }

        self.initial_state = state.to_string();
        Ok(())
    }

    pub fn add_final(&mut self, state: &str) -> Result<(), DfaError> {
        if !self.has_state(state) {
            return Err(DfaError::UnknownState(state.to_string()));
        }

        if !self.is_final(state) {
            self.final_states.push(state.to_string());
        }
        Ok(())
    }

    /// All transition entries as `(source, symbol, target)`.
    ///
    /// Entries are sorted by the position of the source in `states` and of
    /// the symbol in `alphabet`, entries referring to undeclared states or
    /// symbols come last.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        let state_pos = |s: &str| {
            self.states
                .iter()
                .position(|x| x == s)
                .unwrap_or(usize::MAX)
        };
        let symbol_pos = |s: &str| {
            self.alphabet
                .iter()
                .position(|x| x == s)
                .unwrap_or(usize::MAX)
        };

        self.transitions
            .iter()
            .flat_map(|(from, row)| {
                row.iter()
                    .map(move |(symbol, to)| (from.as_str(), symbol.as_str(), to.as_str()))
            })
            .sorted_by_key(|&(from, symbol, to)| {
                (state_pos(from), from, symbol_pos(symbol), symbol, to)
            })
    }

    /// Checks that every state has a transition for every symbol. Stops at
    /// the first missing one.
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|state| {
            self.alphabet
                .iter()
                .all(|symbol| self.target(state, symbol).is_some())
        })
    }

    /// The `(state, symbol)` pairs without a transition, in `states` x
    /// `alphabet` order.
    pub fn missing_transitions(&self) -> Vec<(&str, &str)> {
        self.states
            .iter()
            .cartesian_product(self.alphabet.iter())
            .filter(|(state, symbol)| self.target(state, symbol).is_none())
            .map(|(state, symbol)| (state.as_str(), symbol.as_str()))
            .collect_vec()
    }

    /// Returns `base` if no state has that name yet, otherwise the first free
    /// name of the form `base_1`, `base_2`, ...
    pub fn fresh_state_name(&self, base: &str) -> String {
        if !self.has_state(base) {
            return base.to_string();
        }

        let mut suffix = 1usize;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !self.has_state(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Makes the transition function total by routing every missing
    /// transition to a new, non-accepting sink state that loops on every
    /// symbol.
    ///
    /// Does nothing if the automaton is already complete. Returns the name of
    /// the added sink, which is `sink_name` unless a state with that name
    /// already exists (see [`Dfa::fresh_state_name`]).
    pub fn complete(&mut self, sink_name: &str) -> Option<String> {
        if self.is_complete() {
            return None;
        }

        let sink = self.fresh_state_name(sink_name);
        tracing::debug!(
            "Completing automaton with sink `{}`, {} transitions missing",
            sink,
            self.missing_transitions().len()
        );

        self.states.push(sink.clone());
        self.transitions.insert(sink.clone(), HashMap::new());

        for state in &self.states {
            let row = self.transitions.entry(state.clone()).or_default();
            for symbol in &self.alphabet {
                row.entry(symbol.clone()).or_insert_with(|| sink.clone());
            }
        }

        Some(sink)
    }

    /// Like [`Dfa::complete`], but leaves `self` untouched and returns the
    /// completed automaton.
    pub fn completed(&self, sink_name: &str) -> Dfa {
        let mut completed = self.clone();
        completed.complete(sink_name);
        completed
    }

    /// Runs the input through the transition function. A missing transition
    /// rejects right away.
    pub fn accepts_symbols<'a>(&self, input: impl IntoIterator<Item = &'a str>) -> bool {
        let mut current = self.initial_state.as_str();

        for symbol in input {
            match self.target(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }

        self.is_final(current)
    }

    /// [`Dfa::accepts_symbols`] on the characters of `input`.
    pub fn accepts_str(&self, input: &str) -> bool {
        self.accepts_symbols(symbols(input))
    }

    /// Checks that every referenced state and symbol is declared and that
    /// nothing is declared twice.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.states.is_empty() {
            return Err(ValidationError::NoStates);
        }
        if let Some(state) = self.states.iter().duplicates().next() {
            return Err(ValidationError::DuplicateState(state.clone()));
        }
        if let Some(symbol) = self.alphabet.iter().duplicates().next() {
            return Err(ValidationError::DuplicateSymbol(symbol.clone()));
        }
        if self.alphabet.iter().any(|s| s.is_empty()) {
            return Err(ValidationError::EmptySymbol);
        }

        let states: HashSet<&str> = self.states.iter().map(String::as_str).collect();
        let alphabet: HashSet<&str> = self.alphabet.iter().map(String::as_str).collect();

        if !states.contains(self.initial_state.as_str()) {
            return Err(ValidationError::UnknownInitialState(
                self.initial_state.clone(),
            ));
        }
        if let Some(state) = self
            .final_states
            .iter()
            .find(|s| !states.contains(s.as_str()))
        {
            return Err(ValidationError::UnknownFinalState(state.clone()));
        }

        for (from, row) in self.transitions.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            if !states.contains(from.as_str()) {
                return Err(ValidationError::UnknownSource(from.clone()));
            }
            for (symbol, to) in row.iter().sorted() {
                if !alphabet.contains(symbol.as_str()) {
                    return Err(ValidationError::UnknownSymbol {
                        from: from.clone(),
                        symbol: symbol.clone(),
                    });
                }
                if !states.contains(to.as_str()) {
                    return Err(ValidationError::UnknownTarget {
                        from: from.clone(),
                        symbol: symbol.clone(),
                        to: to.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Alphabet for Dfa {
    type Letter = String;

    fn alphabet(&self) -> &[String] {
        &self.alphabet
    }
}

impl Language for Dfa {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a String>) -> bool
    where
        String: 'a,
    {
        self.accepts_symbols(input.into_iter().map(String::as_str))
    }
}
