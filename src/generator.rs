use crate::corpus::Corpus;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

/// Produces practice texts from a word corpus.
///
/// Selection is uniform with replacement; the RNG is passed in so callers
/// (and tests) control determinism.
#[derive(Debug, Clone)]
pub struct TextGenerator {
    corpus: Corpus,
}

impl TextGenerator {
    pub fn new(corpus: Corpus) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Generate `word_count` random words joined by single spaces.
    pub fn generate(&self, word_count: usize) -> String {
        self.generate_with(&mut rand::thread_rng(), word_count)
    }

    /// Generate with a caller-supplied random source.
    pub fn generate_with<R: Rng>(&self, rng: &mut R, word_count: usize) -> String {
        (0..word_count)
            .map(|_| {
                self.corpus
                    .words
                    .choose(rng)
                    .expect("corpus words must be non-empty")
                    .as_str()
            })
            .join(" ")
    }
}
