/// Character-level result of matching typed input against a target text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub correct: usize,
    pub errors: usize,
}

/// Compare `input` against `target` character by character.
///
/// The overlapping prefix is walked in lockstep; a position counts as
/// correct when the chars match and as an error otherwise. Input typed
/// beyond the end of the target counts entirely as errors.
pub fn compare(input: &str, target: &str) -> Comparison {
    let mut correct = 0;
    let mut errors = 0;

    let mut target_chars = target.chars();

    for typed in input.chars() {
        match target_chars.next() {
            Some(expected) if typed == expected => correct += 1,
            Some(_) => errors += 1,
            // Past the end of the target: overtyping is penalized.
            None => errors += 1,
        }
    }

    Comparison { correct, errors }
}
