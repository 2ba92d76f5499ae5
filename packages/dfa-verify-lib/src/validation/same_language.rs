use itertools::{Itertools, repeat_n};

use crate::automaton::Language;

/// Every word over `alphabet` with fewer than `max_word_length` letters,
/// shortest first.
pub fn words<L: Clone>(
    alphabet: &[L],
    max_word_length: usize,
) -> impl Iterator<Item = Vec<L>> + '_ {
    (0..max_word_length).flat_map(move |i| {
        repeat_n(alphabet, i)
            .multi_cartesian_product()
            .map(|word| word.into_iter().cloned().collect_vec())
    })
}

/// Checks if two automata accept the same language.
/// This is done by checking if the alphabets are the same and then checking if
/// the automata accept the same words up to a certain length.
pub fn same_language<A, B>(a: &A, b: &B, max_word_length: usize) -> bool
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    if a.alphabet() != b.alphabet() {
        return false;
    }

    words(a.alphabet(), max_word_length).all(|word| a.accepts(&word) == b.accepts(&word))
}

pub fn assert_same_language<A, B>(a: &A, b: &B, max_word_length: usize)
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    assert_eq!(a.alphabet(), b.alphabet(), "Alphabets are not the same");

    for word in words(a.alphabet(), max_word_length) {
        match (a.accepts(&word), b.accepts(&word)) {
            (true, false) => {
                panic!(
                    "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                    word
                );
            }
            (false, true) => {
                panic!(
                    "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                    word
                );
            }
            _ => {}
        }
    }
}
