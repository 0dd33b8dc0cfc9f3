//! Game page lookups
//!
//! What the game page does with `?game=`: resolve the title against the
//! catalog and list the closest games.

mod games;
mod similarity;

pub use games::{GameCatalog, GameRecord};
pub use similarity::SimilarityMatrix;

use crate::config::CatalogConfig;
use serde::Serialize;
use thiserror::Error;

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value on row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("Unknown game: {0}")]
    UnknownTitle(String),

    #[error("No games catalog configured")]
    NotConfigured,
}

/// A resolved game and its neighbours
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub game: GameRecord,
    pub wiki_url: String,
    pub matches: Vec<GameRecord>,
}

/// Catalog plus optional similarity data
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    catalog: GameCatalog,
    similarity: Option<SimilarityMatrix>,
    limit: usize,
}

impl Recommender {
    pub fn new(catalog: GameCatalog, similarity: Option<SimilarityMatrix>, limit: usize) -> Self {
        Self {
            catalog,
            similarity,
            limit,
        }
    }

    /// Load from the configured files. `Ok(None)` when no catalog is set.
    pub fn load(config: &CatalogConfig) -> Result<Option<Self>, CatalogError> {
        let Some(games_csv) = &config.games_csv else {
            return Ok(None);
        };
        let catalog = GameCatalog::from_path(games_csv)?;
        if catalog.is_empty() {
            tracing::warn!(path = %games_csv.display(), "Games catalog has no titles");
        }
        let similarity = config
            .similarity_csv
            .as_ref()
            .map(SimilarityMatrix::from_path)
            .transpose()?;

        tracing::info!(
            games = catalog.len(),
            similarity = similarity.is_some(),
            "Catalog ready"
        );
        Ok(Some(Self::new(catalog, similarity, config.recommendations)))
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Recommend games for a title.
    ///
    /// Uses the similarity matrix when it knows the game, otherwise falls
    /// back to other games of the same genre in catalog order.
    pub fn recommend(&self, title: &str) -> Result<Recommendations, CatalogError> {
        let game = self
            .catalog
            .find(title)
            .ok_or_else(|| CatalogError::UnknownTitle(title.to_string()))?;

        let matches: Vec<GameRecord> = match &self.similarity {
            Some(matrix) if matrix.contains(&game.title) => matrix
                .closest(&game.title, self.limit)?
                .into_iter()
                .filter_map(|t| self.catalog.find(t).cloned())
                .collect(),
            _ => self
                .catalog
                .by_genre(&game.genre)
                .into_iter()
                .filter(|g| g.title != game.title)
                .take(self.limit)
                .cloned()
                .collect(),
        };

        Ok(Recommendations {
            wiki_url: game.wiki_url(),
            game: game.clone(),
            matches,
        })
    }
}
