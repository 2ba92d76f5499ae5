pub mod automaton;
pub mod config;
pub mod error;
pub mod graph;
pub mod logger;
pub mod render;
pub mod session;
pub mod validation;
