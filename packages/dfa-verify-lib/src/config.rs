use dfa_verify_macros::config;

use crate::{automaton::dfa::DEFAULT_SINK_NAME, logger::LogLevel};

/// Fills in a config value from a partially specified one.
pub trait IntoOr<T> {
    fn into_or(self, base: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, base: Option<T>) -> Option<T> {
        match self {
            Some(t) => Some(t),
            None => base,
        }
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, base: T) -> T {
        self.unwrap_or(base)
    }
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// Caller-side policy applied around acceptance checks.
    pub struct EvaluationConfig {
        /// Lowercase input strings before running them, typed and loaded
        /// ones alike.
        lowercase_input: bool = true,
        /// Reject definitions referencing undeclared states or symbols when
        /// loading. When off, such references just never match.
        validate: bool = true,
        /// Preferred name of the state added by completion.
        sink_name: String = DEFAULT_SINK_NAME.to_string(),
    }
}

config! {
    pub struct RenderConfig {
        /// Graphviz executable.
        command: String = "dot".to_string(),
        /// Output format passed as `-T<format>`.
        format: String = "png".to_string(),
        /// Where the rendered automaton is written.
        output: String = "automaton.png".to_string(),
    }
}

config! {
    pub struct DfaVerifyConfig {
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
        evaluation: EvaluationConfig (Option<PartialEvaluationConfig> = EvaluationConfig::default()),
        render: RenderConfig (Option<PartialRenderConfig> = RenderConfig::default()),
    }
}
