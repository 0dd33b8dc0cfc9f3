use super::SubmissionError;
use serde::{Deserialize, Serialize};

/// How the target URL is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationStrategy {
    /// Replace the current page
    InPlace,
    /// Launch the user's default browser
    ExternalOpen,
}

impl std::fmt::Display for NavigationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationStrategy::InPlace => write!(f, "in-place"),
            NavigationStrategy::ExternalOpen => write!(f, "external-open"),
        }
    }
}

/// Performs the navigation once the URL is built.
pub trait Navigator {
    fn strategy(&self) -> NavigationStrategy;

    fn navigate(&self, url: &str) -> Result<(), SubmissionError>;
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn strategy(&self) -> NavigationStrategy {
        (**self).strategy()
    }

    fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
        (**self).navigate(url)
    }
}

/// Opens URLs with the platform handler (xdg-open, `open`, `start`).
///
/// The browser is spawned detached; this never waits for it.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalOpener;

#[cfg(not(target_arch = "wasm32"))]
impl Navigator for ExternalOpener {
    fn strategy(&self) -> NavigationStrategy {
        NavigationStrategy::ExternalOpen
    }

    fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
        open::that_detached(url).map_err(|source| SubmissionError::Open {
            url: url.to_string(),
            source,
        })?;
        tracing::info!(%url, "Opened game page in default browser");
        Ok(())
    }
}
