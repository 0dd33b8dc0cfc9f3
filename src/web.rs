//! Browser binding of the title submission handler.
//!
//! Compiled for `wasm32` with the `web` feature. The page loads the wasm
//! module and calls `bindTitleForm("game-form", "gameTitle")`.

use crate::submission::{
    NavigationStrategy, Navigator, SubmissionError, SubmitEvent, TargetBase, TitleSource,
    TitleSubmissionHandler,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlFormElement, HtmlInputElement, Location, Window};

impl SubmitEvent for Event {
    fn prevent_default(&self) {
        Event::prevent_default(self);
    }
}

/// Text input read at submit time.
pub struct LiveInput(HtmlInputElement);

impl LiveInput {
    pub fn new(input: HtmlInputElement) -> Self {
        Self(input)
    }
}

impl TitleSource for LiveInput {
    fn current_title(&self) -> String {
        self.0.value()
    }
}

/// Replaces `window.location` with the target URL.
pub struct LocationRedirect(Location);

impl Navigator for LocationRedirect {
    fn strategy(&self) -> NavigationStrategy {
        NavigationStrategy::InPlace
    }

    fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
        self.0
            .set_href(url)
            .map_err(|err| SubmissionError::Navigation(js_error_message(&err)))
    }
}

/// Opens the target in a new browsing context (embedded shells hand this to
/// the system browser).
pub struct ExternalWindow(Window);

impl Navigator for ExternalWindow {
    fn strategy(&self) -> NavigationStrategy {
        NavigationStrategy::ExternalOpen
    }

    fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
        match self.0.open_with_url_and_target(url, "_blank") {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(SubmissionError::Navigation(
                "window.open was blocked".to_string(),
            )),
            Err(err) => Err(SubmissionError::Navigation(js_error_message(&err))),
        }
    }
}

/// Sends navigation failures to the browser console. The wasm build installs
/// no tracing subscriber, so the handler's own log line goes nowhere there.
pub struct ConsoleReported<N> {
    navigator: N,
    report: fn(&str),
}

impl<N: Navigator> ConsoleReported<N> {
    pub fn new(navigator: N) -> Self {
        Self::with_reporter(navigator, console_error)
    }

    pub fn with_reporter(navigator: N, report: fn(&str)) -> Self {
        Self { navigator, report }
    }
}

impl<N: Navigator> Navigator for ConsoleReported<N> {
    fn strategy(&self) -> NavigationStrategy {
        self.navigator.strategy()
    }

    fn navigate(&self, url: &str) -> Result<(), SubmissionError> {
        self.navigator.navigate(url).inspect_err(|err| {
            (self.report)(&format!("Failed to navigate to game page {url}: {err}"));
        })
    }
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

fn window() -> Result<Window, SubmissionError> {
    web_sys::window().ok_or_else(|| SubmissionError::MissingElement("window".to_string()))
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, SubmissionError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| SubmissionError::MissingElement(id.to_string()))
}

fn listen<N: Navigator + 'static>(
    form_id: &str,
    input_id: &str,
    base: TargetBase,
    navigator: impl FnOnce(&Window) -> N,
) -> Result<(), SubmissionError> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| SubmissionError::MissingElement("document".to_string()))?;
    let form: HtmlFormElement = element(&document, form_id)?;
    let input: HtmlInputElement = element(&document, input_id)?;

    let handler = TitleSubmissionHandler::new(
        LiveInput::new(input),
        base,
        ConsoleReported::new(navigator(&window)),
    );
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| handler.submit(&event));
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
        .map_err(|err| SubmissionError::Navigation(js_error_message(&err)))?;
    // The listener lives as long as the page.
    on_submit.forget();

    tracing::debug!(form_id, input_id, "Bound title form");
    Ok(())
}

/// Redirect the current tab to `/?game=<title>` on submit.
pub fn bind(form_id: &str, input_id: &str) -> Result<(), SubmissionError> {
    listen(form_id, input_id, TargetBase::Relative, |window| {
        LocationRedirect(window.location())
    })
}

/// Open `http://<host>:<port>/?game=<title>` outside the current page on submit.
pub fn bind_external(
    form_id: &str,
    input_id: &str,
    host: &str,
    port: u16,
) -> Result<(), SubmissionError> {
    listen(form_id, input_id, TargetBase::origin(host, port), |window| {
        ExternalWindow(window.clone())
    })
}

#[wasm_bindgen(js_name = bindTitleForm)]
pub fn bind_title_form(form_id: &str, input_id: &str) -> Result<(), JsValue> {
    bind(form_id, input_id).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen(js_name = bindExternalTitleForm)]
pub fn bind_external_title_form(
    form_id: &str,
    input_id: &str,
    host: &str,
    port: u16,
) -> Result<(), JsValue> {
    bind_external(form_id, input_id, host, port).map_err(|err| JsValue::from_str(&err.to_string()))
}
