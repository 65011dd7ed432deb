use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;

static WORDLIST_DIR: Dir = include_dir!("src/wordlist");

/// A word corpus embedded at compile time.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Corpus {
    /// Load an embedded corpus by name.
    pub fn named(name: &str) -> Result<Self, Box<dyn Error>> {
        let file_name = format!("{name}.json");
        let file = WORDLIST_DIR
            .get_file(&file_name)
            .ok_or_else(|| format!("corpus file not found: {file_name}"))?;

        let contents = file
            .contents_utf8()
            .ok_or("corpus file is not valid utf-8")?;

        let corpus: Corpus = from_str(contents)?;
        Ok(corpus)
    }

    /// The default corpus of common English words. Always present.
    pub fn common() -> Self {
        Self::named("common").expect("embedded common corpus must parse")
    }
}
