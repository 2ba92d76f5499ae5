use std::path::Path;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    automaton::{
        Alphabet,
        dfa::{Dfa, io::load_input_file},
    },
    config::EvaluationConfig,
    error::{LoadError, SessionError},
    graph::AutomatonGraph,
    logger::{LogLevel, Logger},
    render::{GraphRenderer, GraphvizRenderer, RenderedImage},
};

/// Result of checking one input string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    /// The input as it was evaluated, after normalization.
    pub input: String,
    pub accepted: bool,
}

/// The automaton as loaded, and the one queries run against. The two differ
/// once an evaluation had to complete the automaton.
#[derive(Debug, Clone)]
struct LoadedAutomaton {
    original: Dfa,
    active: Dfa,
    sink: Option<String>,
}

/// Owns the current automaton of a host application and runs the load,
/// verify and show actions on it.
pub struct Session<'l, R: GraphRenderer = GraphvizRenderer> {
    config: EvaluationConfig,
    renderer: R,
    logger: Option<&'l Logger>,
    loaded: Option<LoadedAutomaton>,
}

impl<'l, R: GraphRenderer> Session<'l, R> {
    pub fn new(config: EvaluationConfig, renderer: R, logger: Option<&'l Logger>) -> Self {
        Session {
            config,
            renderer,
            logger,
            loaded: None,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The automaton queries run against.
    pub fn automaton(&self) -> Option<&Dfa> {
        self.loaded.as_ref().map(|l| &l.active)
    }

    /// The automaton exactly as it was loaded, before any completion.
    pub fn original(&self) -> Option<&Dfa> {
        self.loaded.as_ref().map(|l| &l.original)
    }

    /// Name of the sink state added by completion, if one was added.
    pub fn sink(&self) -> Option<&str> {
        self.loaded.as_ref().and_then(|l| l.sink.as_deref())
    }

    /// Replaces the current automaton. The previous one is dropped before
    /// `dfa` is checked, so on error the session is left empty.
    pub fn load(&mut self, dfa: Dfa) -> Result<&Dfa, LoadError> {
        self.loaded = None;

        if *self.config.get_validate() {
            dfa.validate()?;
        }

        tracing::info!(
            "Loaded automaton with {} states and {} transitions",
            dfa.state_count(),
            dfa.transition_count()
        );
        if let Some(logger) = self.logger {
            logger
                .object("Automaton")
                .add_field("states", dfa.states().join(", "))
                .add_field("alphabet", dfa.alphabet().join(", "))
                .add_field("initial", dfa.initial_state())
                .add_field("final", dfa.final_states().join(", "))
                .add_field("transitions", dfa.transition_count())
                .add_field("complete", dfa.is_complete())
                .log(LogLevel::Info);

            let long_symbols = dfa
                .alphabet()
                .iter()
                .filter(|s| s.chars().count() > 1)
                .collect_vec();
            if !long_symbols.is_empty() {
                logger.warn(&format!(
                    "Symbols {} are longer than one character and can never match an input",
                    long_symbols.iter().join(", ")
                ));
            }
        }

        let loaded = self.loaded.insert(LoadedAutomaton {
            original: dfa.clone(),
            active: dfa,
            sink: None,
        });
        Ok(&loaded.active)
    }

    pub fn load_json(&mut self, json: &str) -> Result<&Dfa, LoadError> {
        self.loaded = None;
        let dfa = Dfa::from_json(json)?;
        self.load(dfa)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&Dfa, LoadError> {
        self.loaded = None;
        let dfa = Dfa::from_file(path)?;
        self.load(dfa)
    }

    /// Applies the configured caller policy to a raw input string.
    pub fn normalize_input(&self, raw: &str) -> String {
        if *self.config.get_lowercase_input() {
            raw.to_lowercase()
        } else {
            raw.to_string()
        }
    }

    /// Reads an input string from a text file and normalizes it like typed
    /// input.
    pub fn load_input<P: AsRef<Path>>(&self, path: P) -> Result<String, LoadError> {
        Ok(self.normalize_input(&load_input_file(path)?))
    }

    /// Completes the current automaton if needed and checks whether it
    /// accepts `raw`.
    pub fn evaluate(&mut self, raw: &str) -> Result<Evaluation, SessionError> {
        let input = self.normalize_input(raw);
        let loaded = self.loaded.as_mut().ok_or(SessionError::NoAutomaton)?;

        if !loaded.active.is_complete() {
            let sink = loaded.active.complete(self.config.get_sink_name());
            if let (Some(logger), Some(sink)) = (self.logger, &sink) {
                logger.debug(&format!("Completed automaton with sink state `{sink}`"));
            }
            loaded.sink = sink;
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("Run: {}", loaded.active.run(&input).to_fancy_string());
        }

        let accepted = loaded.active.accepts_str(&input);
        if let Some(logger) = self.logger {
            let verdict = if accepted { "ACCEPTED" } else { "REJECTED" };
            logger.info(&format!("Input {:?} is {}", input, verdict));
        }

        Ok(Evaluation { input, accepted })
    }

    pub fn graph(&self) -> Result<AutomatonGraph, SessionError> {
        self.automaton()
            .map(AutomatonGraph::build)
            .ok_or(SessionError::NoAutomaton)
    }

    /// Renders the current automaton. A failing renderer leaves the session
    /// as it was.
    pub fn render(&self) -> Result<RenderedImage, SessionError> {
        let dot = self.graph()?.to_graphviz();

        match self.renderer.render(&dot) {
            Ok(image) => {
                if let Some(logger) = self.logger {
                    logger.info(&format!("Rendered automaton ({} bytes)", image.bytes.len()));
                }
                Ok(image)
            }
            Err(e) => {
                if let Some(logger) = self.logger {
                    logger.error(&format!("Failed to render automaton: {e}"));
                }
                Err(e.into())
            }
        }
    }
}
