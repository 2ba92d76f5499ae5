use std::path::Path;

use crate::{
    automaton::{Alphabet, dfa::Dfa},
    error::LoadError,
};

impl Dfa {
    /// Parses a JSON definition of the form
    ///
    /// ```json
    /// {
    ///   "states": ["q0", "q1"],
    ///   "alphabet": ["a", "b"],
    ///   "transitions": { "q0": { "a": "q1" }, "q1": { "b": "q0" } },
    ///   "initialState": "q0",
    ///   "finalStates": ["q1"]
    /// }
    /// ```
    ///
    /// Only the shape is checked here, see [`Dfa::validate`] for the
    /// invariants.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let dfa: Dfa = serde_json::from_str(json)?;

        if dfa.alphabet().iter().any(|s| s.chars().count() > 1) {
            tracing::warn!(
                "Alphabet contains multi-character symbols, input is read one character at a time so they can never match"
            );
        }

        Ok(dfa)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let json = read_file(path.as_ref())?;
        Self::from_json(&json)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reads an input string from a text file. A single trailing line break is
/// dropped, everything else is kept as is.
pub fn load_input_file<P: AsRef<Path>>(path: P) -> Result<String, LoadError> {
    let mut content = read_file(path.as_ref())?;

    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }

    Ok(content)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[test]
fn test_from_json_defaults() {
    let dfa = Dfa::from_json(r#"{ "states": ["q0"], "initialState": "q0" }"#).unwrap();
    assert!(dfa.alphabet().is_empty());
    assert!(dfa.final_states().is_empty());
    assert_eq!(dfa.transition_count(), 0);
}

#[test]
fn test_from_json_missing_initial_state() {
    let res = Dfa::from_json(r#"{ "states": ["q0"] }"#);
    assert!(matches!(res, Err(LoadError::Json(_))));
}
