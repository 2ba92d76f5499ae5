use dfa_verify_lib::{
    automaton::{
        Alphabet,
        dfa::{DEFAULT_SINK_NAME, Dfa, run::RunOutcome},
    },
    error::{DfaError, ValidationError},
    validation::same_language::{assert_same_language, same_language, words},
};

fn alphabet(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

/// q0 -a-> q1, q1 -b-> q0, final q1
fn ping_pong() -> Dfa {
    let mut dfa = Dfa::new(alphabet(&["a", "b"]));
    dfa.add_state("q0").unwrap();
    dfa.add_state("q1").unwrap();
    dfa.set_initial("q0").unwrap();
    dfa.add_final("q1").unwrap();

    dfa.add_transition("q0", "a", "q1").unwrap();
    dfa.add_transition("q1", "b", "q0").unwrap();

    dfa
}

/// Accepts words over {a, b} with an even number of `a`s.
fn even_a() -> Dfa {
    let mut dfa = Dfa::new(alphabet(&["a", "b"]));
    dfa.add_state("even").unwrap();
    dfa.add_state("odd").unwrap();
    dfa.set_initial("even").unwrap();
    dfa.add_final("even").unwrap();

    dfa.add_transition("even", "a", "odd").unwrap();
    dfa.add_transition("even", "b", "even").unwrap();
    dfa.add_transition("odd", "a", "even").unwrap();
    dfa.add_transition("odd", "b", "odd").unwrap();

    dfa
}

#[test]
fn test_acceptance() {
    let dfa = ping_pong();

    assert!(dfa.accepts_str("a"));
    assert!(!dfa.accepts_str("ab"));
    assert!(dfa.accepts_str("aba"));
    // `x` is not in the alphabet
    assert!(!dfa.accepts_str("ax"));
    // missing q0 -b->
    assert!(!dfa.accepts_str("b"));
}

#[test]
fn test_acceptance_on_symbols() {
    let dfa = ping_pong();

    assert!(dfa.accepts_symbols(["a", "b", "a"]));
    assert!(!dfa.accepts_symbols(["ab"]));
}

#[test]
fn test_empty_input() {
    let dfa = ping_pong();
    assert!(!dfa.accepts_str(""));

    let mut single = Dfa::new(vec![]);
    single.add_state("q0").unwrap();
    single.set_initial("q0").unwrap();
    single.add_final("q0").unwrap();

    assert!(single.accepts_str(""));
    assert!(!single.accepts_str("a"));
}

#[test]
fn test_case_is_not_normalized() {
    let dfa = ping_pong();
    assert!(dfa.accepts_str("a"));
    assert!(!dfa.accepts_str("A"));
}

#[test]
fn test_is_complete() {
    assert!(!ping_pong().is_complete());
    assert!(even_a().is_complete());

    assert_eq!(
        ping_pong().missing_transitions(),
        vec![("q0", "b"), ("q1", "a")]
    );
    assert!(even_a().missing_transitions().is_empty());
}

#[test]
fn test_completion() {
    let dfa = ping_pong();
    let completed = dfa.completed(DEFAULT_SINK_NAME);

    assert!(completed.is_complete());
    assert_eq!(completed.states(), &["q0", "q1", "sink"]);

    assert_eq!(completed.target("q0", "a"), Some("q1"));
    assert_eq!(completed.target("q1", "b"), Some("q0"));
    assert_eq!(completed.target("q0", "b"), Some("sink"));
    assert_eq!(completed.target("q1", "a"), Some("sink"));
    assert_eq!(completed.target("sink", "a"), Some("sink"));
    assert_eq!(completed.target("sink", "b"), Some("sink"));
    assert_eq!(completed.transition_count(), 6);

    assert!(!completed.is_final("sink"));
    assert_eq!(completed.final_states(), dfa.final_states());
    assert_eq!(completed.initial_state(), "q0");

    // the original is left alone
    assert!(!dfa.is_complete());
    assert_eq!(dfa.state_count(), 2);
}

#[test]
fn test_completion_in_place() {
    let mut dfa = ping_pong();
    assert_eq!(dfa.complete("trap"), Some("trap".to_string()));
    assert!(dfa.is_complete());

    // already complete, nothing to do
    assert_eq!(dfa.complete("trap"), None);
    assert_eq!(dfa.state_count(), 3);
}

#[test]
fn test_completion_of_complete_automaton_is_noop() {
    let dfa = even_a();
    assert_eq!(dfa.completed(DEFAULT_SINK_NAME), dfa);
}

#[test]
fn test_completion_avoids_name_clash() {
    let mut dfa = Dfa::new(alphabet(&["a"]));
    dfa.add_state("sink").unwrap();
    dfa.add_state("sink_1").unwrap();
    dfa.set_initial("sink").unwrap();
    dfa.add_final("sink").unwrap();
    dfa.add_transition("sink", "a", "sink_1").unwrap();

    let mut completed = dfa.clone();
    let sink = completed.complete(DEFAULT_SINK_NAME).unwrap();

    assert_eq!(sink, "sink_2");
    assert!(completed.is_complete());
    assert_eq!(completed.target("sink_1", "a"), Some("sink_2"));
    // the user state keeps its transition and stays accepting
    assert_eq!(completed.target("sink", "a"), Some("sink_1"));
    assert!(completed.is_final("sink"));
    assert!(!completed.is_final("sink_2"));
}

#[test]
fn test_completion_with_empty_alphabet() {
    let mut dfa = Dfa::new(vec![]);
    dfa.add_state("q0").unwrap();
    dfa.set_initial("q0").unwrap();

    assert!(dfa.is_complete());
    assert_eq!(dfa.completed(DEFAULT_SINK_NAME).state_count(), 1);
}

#[test]
fn test_completion_preserves_language() {
    for dfa in [ping_pong(), even_a()] {
        let completed = dfa.completed(DEFAULT_SINK_NAME);
        assert_same_language(&dfa, &completed, 7);
    }
}

#[test]
fn test_completion_keeps_defined_targets() {
    let dfa = ping_pong();
    let completed = dfa.completed(DEFAULT_SINK_NAME);

    for (from, symbol, to) in dfa.edges() {
        assert_eq!(completed.target(from, symbol), Some(to));
    }
}

#[test]
fn test_different_languages() {
    assert!(!same_language(&ping_pong(), &even_a(), 4));
    assert!(same_language(&even_a(), &even_a(), 4));
}

#[test]
fn test_words() {
    let letters = alphabet(&["a", "b"]);
    let all = words(&letters, 3).collect::<Vec<_>>();

    // "", a, b, aa, ab, ba, bb
    assert_eq!(all.len(), 7);
    assert!(all[0].is_empty());
}

#[test]
fn test_run_trace() {
    let dfa = ping_pong();

    let run = dfa.run("aba");
    assert!(run.is_accepted());
    assert_eq!(run.states, vec!["q0", "q1", "q0", "q1"]);

    let run = dfa.run("ab");
    assert_eq!(run.outcome, RunOutcome::Rejected);
    assert_eq!(run.last_state(), Some("q0"));

    let run = dfa.run("aa");
    assert_eq!(
        run.outcome,
        RunOutcome::Stuck {
            state: "q1".into(),
            symbol: "a".into(),
            position: 1,
        }
    );
    assert_eq!(run.states, vec!["q0", "q1"]);
}

#[test]
fn test_run_agrees_with_accepts() {
    let dfa = ping_pong();
    let letters = alphabet(&["a", "b", "x"]);

    for word in words(&letters, 5) {
        let input = word.concat();
        assert_eq!(dfa.run(&input).is_accepted(), dfa.accepts_str(&input));
    }
}

#[test]
fn test_rejects_on_missing_transition_before_completion() {
    let dfa = ping_pong();

    for word in words(dfa.alphabet(), 5) {
        let input = word.concat();
        if let RunOutcome::Stuck { .. } = dfa.run(&input).outcome {
            assert!(!dfa.accepts_str(&input), "{input:?} must be rejected");
        }
    }
}

#[test]
fn test_builder_errors() {
    let mut dfa = ping_pong();

    assert_eq!(
        dfa.add_state("q0"),
        Err(DfaError::DuplicateState("q0".into()))
    );
    assert_eq!(
        dfa.add_transition("q0", "a", "q9"),
        Err(DfaError::UnknownState("q9".into()))
    );
    assert_eq!(
        dfa.add_transition("q0", "c", "q1"),
        Err(DfaError::UnknownSymbol("c".into()))
    );
    assert_eq!(
        dfa.add_transition("q0", "a", "q0"),
        Err(DfaError::TransitionConflict {
            from: "q0".into(),
            symbol: "a".into(),
            existing: "q1".into(),
            new: "q0".into(),
        })
    );
    // same transition again is fine
    assert_eq!(dfa.add_transition("q0", "a", "q1"), Ok(()));
    assert_eq!(dfa.set_initial("q7"), Err(DfaError::UnknownState("q7".into())));
}

#[test]
fn test_edges_are_sorted_by_declaration() {
    let dfa = even_a();
    let edges = dfa.edges().collect::<Vec<_>>();

    assert_eq!(
        edges,
        vec![
            ("even", "a", "odd"),
            ("even", "b", "even"),
            ("odd", "a", "even"),
            ("odd", "b", "odd"),
        ]
    );
}

#[test]
fn test_validate() {
    assert_eq!(ping_pong().validate(), Ok(()));
    assert_eq!(
        Dfa::new(alphabet(&["a"])).validate(),
        Err(ValidationError::NoStates)
    );
}
