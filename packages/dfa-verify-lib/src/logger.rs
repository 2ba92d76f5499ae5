use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    str::FromStr,
    sync::Mutex,
};

use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn colored_tag(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "DBG".bright_cyan(),
            LogLevel::Info => "INF".bright_green(),
            LogLevel::Warn => "WAR".yellow(),
            LogLevel::Error => "ERR".bright_red(),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    /// Whether a message of this level gets through a logger set to
    /// `threshold`.
    pub fn show(&self, threshold: &LogLevel) -> bool {
        match self {
            LogLevel::Debug => *threshold == LogLevel::Debug,
            LogLevel::Info => *threshold == LogLevel::Debug || *threshold == LogLevel::Info,
            LogLevel::Warn => *threshold != LogLevel::Error,
            LogLevel::Error => true,
        }
    }

    pub fn to_tracing(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Console logger for user facing events. Messages below the configured
/// level are not printed, but still go to the log file if there is one.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    name: String,
    file: Option<Mutex<BufWriter<File>>>,
}

impl Logger {
    pub fn new(level: LogLevel, name: String) -> Self {
        Logger {
            level,
            name,
            file: None,
        }
    }

    pub fn with_log_file(mut self, path: PathBuf) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.file = Some(Mutex::new(BufWriter::new(file)));
        Ok(self)
    }

    /// Returns `None` if logging is disabled in `config`.
    pub fn from_config(config: &LoggerConfig, name: String) -> std::io::Result<Option<Self>> {
        if !*config.get_enabled() {
            return Ok(None);
        }

        let logger = Logger::new(*config.get_log_level(), name);
        if *config.get_log_file() {
            let path = PathBuf::from(format!(
                "./logs/dfa_verify_{}.txt",
                Local::now().format("%Y-%m-%d_%H-%M-%S")
            ));
            return logger.with_log_file(path).map(Some);
        }

        Ok(Some(logger))
    }

    fn prefix(&self, level: &LogLevel) -> String {
        format!("[{}] {}", level.colored_tag(), format!("{}:", self.name).dimmed())
    }

    fn prefix_no_color(&self, level: &LogLevel) -> String {
        format!("[{}] {}:", level.tag(), self.name)
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.writeln_to_file(&format!("{} {}", self.prefix_no_color(&level), message));
        if level.show(&self.level) {
            eprintln!("{} {}", self.prefix(&level), message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    // write errors are ignored
    fn writeln_to_file(&self, line: &str) {
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = writeln!(f, "{line}");
            let _ = f.flush();
        }
    }

    pub fn object<'a>(&'a self, name: &'a str) -> ObjectBuilder<'a> {
        ObjectBuilder::new(name, self)
    }
}

/// Logs a struct-like block:
///
/// ```text
/// Automaton {
///   states: q0, q1
///   ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ObjectBuilder<'a> {
    logger: &'a Logger,
    name: &'a str,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObjectBuilder<'a> {
    fn new(name: &'a str, logger: &'a Logger) -> Self {
        ObjectBuilder {
            logger,
            name,
            fields: vec![],
        }
    }

    pub fn add_field(mut self, name: &'a str, value: impl Display) -> Self {
        self.fields.push((name, value.to_string()));

        self
    }

    fn build(&self) -> String {
        let mut result = format!("{} {{", self.name);
        for (name, value) in &self.fields {
            result.push_str(&format!("\n  {}: {}", name, value));
        }
        result.push_str("\n}");
        result
    }

    pub fn log(&self, level: LogLevel) {
        self.logger.log(level, &self.build());
    }
}
