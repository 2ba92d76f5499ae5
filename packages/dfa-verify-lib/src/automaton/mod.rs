use std::{fmt::Debug, hash::Hash};

pub mod dfa;

pub trait Letter: Debug + Clone + PartialEq + Eq + Hash + Ord {}

impl<T: Debug + Clone + PartialEq + Eq + Hash + Ord> Letter for T {}

pub trait Alphabet {
    type Letter: Letter;

    fn alphabet(&self) -> &[Self::Letter];
}

/// The basic trait for anything that defines a language over a set alphabet.
pub trait Language: Alphabet {
    fn accepts<'a>(&self, input: impl IntoIterator<Item = &'a Self::Letter>) -> bool
    where
        Self::Letter: 'a;
}

/// Splits a string into its one-character symbols, without allocating.
///
/// Symbols are matched literally, no normalization happens here. Callers
/// that want case-insensitive matching lowercase the input beforehand.
pub fn symbols(input: &str) -> impl Iterator<Item = &str> {
    input
        .char_indices()
        .map(move |(i, c)| &input[i..i + c.len_utf8()])
}

#[test]
fn test_symbols() {
    assert_eq!(symbols("ab").collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(symbols("añb").collect::<Vec<_>>(), vec!["a", "ñ", "b"]);
    assert_eq!(symbols("").count(), 0);
}
