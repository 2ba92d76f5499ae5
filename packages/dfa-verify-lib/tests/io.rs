use dfa_verify_lib::{
    automaton::{
        Alphabet,
        dfa::{DEFAULT_SINK_NAME, Dfa, io::load_input_file},
    },
    error::{LoadError, ValidationError},
};

const PING_PONG: &str = r#"
{
    "states": ["q0", "q1"],
    "alphabet": ["a", "b"],
    "transitions": {
        "q0": { "a": "q1" },
        "q1": { "b": "q0" }
    },
    "initialState": "q0",
    "finalStates": ["q1"]
}
"#;

#[test]
fn test_parse() {
    let dfa = Dfa::from_json(PING_PONG).unwrap();

    assert_eq!(dfa.states(), &["q0", "q1"]);
    assert_eq!(dfa.alphabet(), &["a", "b"]);
    assert_eq!(dfa.initial_state(), "q0");
    assert_eq!(dfa.final_states(), &["q1"]);
    assert_eq!(dfa.target("q0", "a"), Some("q1"));
    assert_eq!(dfa.target("q1", "b"), Some("q0"));
    assert_eq!(dfa.transition_count(), 2);
    assert_eq!(dfa.validate(), Ok(()));

    assert!(dfa.accepts_str("a"));
    assert!(!dfa.accepts_str("ab"));
    assert!(!dfa.accepts_str("ax"));
}

#[test]
fn test_round_trip() {
    let dfa = Dfa::from_json(PING_PONG).unwrap();
    let json = dfa.to_json().unwrap();
    assert_eq!(Dfa::from_json(&json).unwrap(), dfa);

    let completed = dfa.completed(DEFAULT_SINK_NAME);
    let json = completed.to_json().unwrap();
    let parsed = Dfa::from_json(&json).unwrap();
    assert_eq!(parsed, completed);
    assert_eq!(parsed.states(), &["q0", "q1", "sink"]);
}

#[test]
fn test_serialized_field_names() {
    let dfa = Dfa::from_json(PING_PONG).unwrap();
    let value: serde_json::Value = serde_json::from_str(&dfa.to_json().unwrap()).unwrap();

    assert_eq!(value["initialState"], "q0");
    assert_eq!(value["finalStates"], serde_json::json!(["q1"]));
    assert_eq!(value["states"], serde_json::json!(["q0", "q1"]));
    assert_eq!(value["transitions"]["q1"]["b"], "q0");
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("automaton.json");

    let dfa = Dfa::from_json(PING_PONG).unwrap();
    dfa.to_json_file(&path).unwrap();

    assert_eq!(Dfa::from_file(&path).unwrap(), dfa);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let res = Dfa::from_file(dir.path().join("nope.json"));
    assert!(matches!(res, Err(LoadError::Io { .. })));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        Dfa::from_json("{ \"states\": [\"q0\"], "),
        Err(LoadError::Json(_))
    ));
    assert!(matches!(
        Dfa::from_json(r#"{ "states": "q0", "initialState": "q0" }"#),
        Err(LoadError::Json(_))
    ));
}

#[test]
fn test_validation_of_dangling_references() {
    let unknown_target = r#"{
        "states": ["q0"], "alphabet": ["a"],
        "transitions": { "q0": { "a": "q5" } },
        "initialState": "q0", "finalStates": []
    }"#;
    assert_eq!(
        Dfa::from_json(unknown_target).unwrap().validate(),
        Err(ValidationError::UnknownTarget {
            from: "q0".into(),
            symbol: "a".into(),
            to: "q5".into(),
        })
    );

    let unknown_initial = r#"{ "states": ["q0"], "initialState": "q1" }"#;
    assert_eq!(
        Dfa::from_json(unknown_initial).unwrap().validate(),
        Err(ValidationError::UnknownInitialState("q1".into()))
    );

    let unknown_final = r#"{ "states": ["q0"], "initialState": "q0", "finalStates": ["qf"] }"#;
    assert_eq!(
        Dfa::from_json(unknown_final).unwrap().validate(),
        Err(ValidationError::UnknownFinalState("qf".into()))
    );

    let unknown_source = r#"{
        "states": ["q0"], "alphabet": ["a"],
        "transitions": { "qx": { "a": "q0" } },
        "initialState": "q0"
    }"#;
    assert_eq!(
        Dfa::from_json(unknown_source).unwrap().validate(),
        Err(ValidationError::UnknownSource("qx".into()))
    );

    let unknown_symbol = r#"{
        "states": ["q0"], "alphabet": ["a"],
        "transitions": { "q0": { "z": "q0" } },
        "initialState": "q0"
    }"#;
    assert_eq!(
        Dfa::from_json(unknown_symbol).unwrap().validate(),
        Err(ValidationError::UnknownSymbol {
            from: "q0".into(),
            symbol: "z".into(),
        })
    );

    let duplicate = r#"{ "states": ["q0", "q0"], "initialState": "q0" }"#;
    assert_eq!(
        Dfa::from_json(duplicate).unwrap().validate(),
        Err(ValidationError::DuplicateState("q0".into()))
    );
}

#[test]
fn test_dangling_references_never_crash() {
    let dangling = r#"{
        "states": ["q0"], "alphabet": ["a"],
        "transitions": { "q0": { "a": "q5" } },
        "initialState": "q0", "finalStates": ["q5"]
    }"#;
    let dfa = Dfa::from_json(dangling).unwrap();

    // q5 has no row, so anything after the first `a` is stuck
    assert!(dfa.accepts_str("a"));
    assert!(!dfa.accepts_str("aa"));
    // only declared states need outgoing transitions
    assert!(dfa.is_complete());
}

#[test]
fn test_load_input_file() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("input.txt");
    std::fs::write(&path, "abab\n").unwrap();
    assert_eq!(load_input_file(&path).unwrap(), "abab");

    std::fs::write(&path, "abab\r\n").unwrap();
    assert_eq!(load_input_file(&path).unwrap(), "abab");

    std::fs::write(&path, "ab ab").unwrap();
    assert_eq!(load_input_file(&path).unwrap(), "ab ab");

    std::fs::write(&path, "").unwrap();
    assert_eq!(load_input_file(&path).unwrap(), "");

    assert!(matches!(
        load_input_file(dir.path().join("missing.txt")),
        Err(LoadError::Io { .. })
    ));
}
