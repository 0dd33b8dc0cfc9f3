//! Title submission handler
//!
//! Turns a submit gesture into a navigation that carries the current title as
//! the `game` query parameter. The same handler serves both hosting contexts:
//! an in-page redirect relative to the current origin, and an external open
//! of an absolute URL in the user's default browser.

mod encode;
mod navigate;

pub use encode::{decode_title, encode_title, extract_game_param};
#[cfg(not(target_arch = "wasm32"))]
pub use navigate::ExternalOpener;
pub use navigate::{NavigationStrategy, Navigator};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameter the game page reads.
pub const GAME_PARAM: &str = "game";

/// Default origin of the game page when opened from outside a browser.
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8501;

/// Submission errors
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Failed to open {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Query value is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Element not found: #{0}")]
    MissingElement(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),
}

/// Where the game page lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetBase {
    /// Root of the current origin
    #[default]
    Relative,
    /// Fixed origin, used when there is no browser to supply one
    Origin { host: String, port: u16 },
}

impl TargetBase {
    pub fn origin(host: impl Into<String>, port: u16) -> Self {
        Self::Origin {
            host: host.into(),
            port,
        }
    }

    /// Build `<base>?game=<encoded title>`.
    pub fn url_for(&self, title: &str) -> String {
        let encoded = encode_title(title);
        match self {
            Self::Relative => format!("/?{GAME_PARAM}={encoded}"),
            Self::Origin { host, port } => {
                format!("http://{host}:{port}/?{GAME_PARAM}={encoded}")
            }
        }
    }
}

/// A user-initiated submit whose default action can be cancelled.
pub trait SubmitEvent {
    fn prevent_default(&self);
}

/// Provides the title as it reads right now.
pub trait TitleSource {
    fn current_title(&self) -> String;
}

impl TitleSource for String {
    fn current_title(&self) -> String {
        self.clone()
    }
}

impl TitleSource for str {
    fn current_title(&self) -> String {
        self.to_string()
    }
}

impl<T: TitleSource + ?Sized> TitleSource for &T {
    fn current_title(&self) -> String {
        (**self).current_title()
    }
}

/// Reads a title, encodes it and hands the URL to a navigator.
///
/// Nothing is cached between submissions: every call reads the source again.
pub struct TitleSubmissionHandler<S, N> {
    source: S,
    base: TargetBase,
    navigator: N,
}

impl<S: TitleSource, N: Navigator> TitleSubmissionHandler<S, N> {
    pub fn new(source: S, base: TargetBase, navigator: N) -> Self {
        Self {
            source,
            base,
            navigator,
        }
    }

    /// Handle a submit event. The event's default action is always cancelled
    /// first so the navigation below is the only one that happens.
    pub fn submit(&self, event: &impl SubmitEvent) {
        event.prevent_default();
        self.dispatch();
    }

    /// Read, encode and navigate without an event (CLI and server callers).
    ///
    /// Navigation failures are logged and swallowed.
    pub fn dispatch(&self) {
        let title = self.source.current_title();
        let url = self.base.url_for(&title);
        tracing::debug!(
            %url,
            strategy = ?self.navigator.strategy(),
            "Submitting game title"
        );

        if let Err(err) = self.navigator.navigate(&url) {
            tracing::error!(%url, error = %err, "Failed to navigate to game page");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct FakeEvent {
        prevented: Cell<u32>,
    }

    impl SubmitEvent for FakeEvent {
        fn prevent_default(&self) {
            self.prevented.set(self.prevented.get() + 1);
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn strategy(&self) -> NavigationStrategy {
            NavigationStrategy::InPlace
        }

        fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
            self.visited.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    struct FailingOpener;

    impl Navigator for FailingOpener {
        fn strategy(&self) -> NavigationStrategy {
            NavigationStrategy::ExternalOpen
        }

        fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
            Err(SubmissionError::Open {
                url: url.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no handler for http"),
            })
        }
    }

    fn redirect_for(title: &str) -> String {
        let navigator = RecordingNavigator::default();
        let handler = TitleSubmissionHandler::new(title, TargetBase::Relative, &navigator);
        handler.submit(&FakeEvent::default());
        let visited = navigator.visited.borrow();
        assert_eq!(visited.len(), 1);
        visited[0].clone()
    }

    #[test]
    fn in_page_redirect_targets() {
        assert_eq!(redirect_for("Chess"), "/?game=Chess");
        assert_eq!(redirect_for("Catan & Co"), "/?game=Catan%20%26%20Co");
        assert_eq!(redirect_for(""), "/?game=");
    }

    #[test]
    fn external_target_uses_fixed_origin() {
        let base = TargetBase::origin(DEFAULT_HOST, DEFAULT_PORT);
        assert_eq!(base.url_for("Go"), "http://localhost:8501/?game=Go");
    }

    #[test]
    fn submit_always_prevents_default() {
        let navigator = RecordingNavigator::default();
        let event = FakeEvent::default();

        TitleSubmissionHandler::new("", TargetBase::Relative, &navigator).submit(&event);
        TitleSubmissionHandler::new("Go", TargetBase::Relative, &navigator).submit(&event);
        TitleSubmissionHandler::new("Go", TargetBase::Relative, FailingOpener).submit(&event);

        assert_eq!(event.prevented.get(), 3);
    }

    struct FakeField(RefCell<String>);

    impl TitleSource for FakeField {
        fn current_title(&self) -> String {
            self.0.borrow().clone()
        }
    }

    #[test]
    fn each_submission_reads_the_field_again() {
        let field = FakeField(RefCell::new(String::from("Chess")));
        let navigator = RecordingNavigator::default();
        let handler = TitleSubmissionHandler::new(&field, TargetBase::Relative, &navigator);

        handler.submit(&FakeEvent::default());
        *field.0.borrow_mut() = "Catan & Co".to_string();
        handler.submit(&FakeEvent::default());
        handler.submit(&FakeEvent::default());

        assert_eq!(
            *navigator.visited.borrow(),
            vec![
                "/?game=Chess".to_string(),
                "/?game=Catan%20%26%20Co".to_string(),
                "/?game=Catan%20%26%20Co".to_string(),
            ]
        );
    }

    #[test]
    #[traced_test]
    fn failed_open_is_logged_not_propagated() {
        let handler = TitleSubmissionHandler::new(
            "Go",
            TargetBase::origin(DEFAULT_HOST, DEFAULT_PORT),
            FailingOpener,
        );
        handler.submit(&FakeEvent::default());

        assert!(logs_contain("Failed to navigate to game page"));
        assert!(logs_contain("http://localhost:8501/?game=Go"));
        assert!(logs_contain("no handler for http"));
    }

    #[test]
    fn target_base_serializes_with_kind_tag() {
        let base = TargetBase::origin("127.0.0.1", 9000);
        let json = serde_json::to_value(&base).unwrap();
        assert_eq!(json["kind"], "origin");
        assert_eq!(json["port"], 9000);
    }
}
