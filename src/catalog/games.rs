//! Games catalog
//!
//! The catalog CSV has an unnamed index column followed by `Title`, `Genre`,
//! `Developer`, `Publisher`, `Plots`, `Link` and the release columns. Unknown
//! columns are ignored.

use super::CatalogError;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

const WIKI_ORIGIN: &str = "https://en.wikipedia.org";

/// One row of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Developer", default)]
    pub developer: String,
    #[serde(rename = "Publisher", default)]
    pub publisher: String,
    #[serde(rename = "Plots", default)]
    pub plots: String,
    /// Wiki path, e.g. `/wiki/Chess`
    #[serde(rename = "Link", default)]
    pub link: String,
    #[serde(rename = "Released in: Japan", default)]
    pub released_japan: String,
    #[serde(rename = "North America", default)]
    pub released_north_america: String,
    #[serde(rename = "Rest of countries", default)]
    pub released_elsewhere: String,
}

impl GameRecord {
    pub fn wiki_url(&self) -> String {
        format!("{WIKI_ORIGIN}{}", self.link)
    }
}

/// Games in file order
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: Vec<GameRecord>,
}

impl GameCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path.as_ref()).map_err(|source| CatalogError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut games = Vec::new();
        for record in reader.deserialize::<GameRecord>() {
            let record = record?;
            if record.title.is_empty() {
                continue;
            }
            games.push(record);
        }

        tracing::debug!(count = games.len(), "Loaded games catalog");
        Ok(Self { games })
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    fn position(&self, title: &str) -> Option<usize> {
        let wanted = title.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.games
            .iter()
            .position(|g| g.title.to_lowercase() == wanted)
    }

    /// Find a game by title (case-insensitive)
    pub fn find(&self, title: &str) -> Option<&GameRecord> {
        self.position(title).map(|i| &self.games[i])
    }

    /// Index into a selection list whose first entry is the empty
    /// "Select a game" option. Unknown or empty titles select that entry.
    pub fn default_index(&self, title: &str) -> usize {
        self.position(title).map_or(0, |i| i + 1)
    }

    /// Games whose genre matches (case-insensitive)
    pub fn by_genre(&self, genre: &str) -> Vec<&GameRecord> {
        let wanted = genre.trim().to_lowercase();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.games
            .iter()
            .filter(|g| g.genre.to_lowercase() == wanted)
            .collect()
    }
}
