#![cfg(all(target_arch = "wasm32", feature = "web"))]

use gamelink::submission::{
    NavigationStrategy, Navigator, SubmissionError, SubmitEvent, TargetBase, TitleSource,
    TitleSubmissionHandler,
};
use gamelink::web::{bind, bind_external, ConsoleReported, LiveInput};
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, EventInit, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window()
        .and_then(|win| win.document())
        .expect("document")
}

fn cancelable_submit() -> Event {
    let init = EventInit::new();
    init.set_cancelable(true);
    Event::new_with_event_init_dict("submit", &init).expect("event")
}

fn mount_form(form_id: &str, input_id: &str) -> HtmlInputElement {
    let doc = document();
    let form = doc.create_element("form").expect("create form");
    form.set_id(form_id);
    let input = doc.create_element("input").expect("create input");
    input.set_id(input_id);
    form.append_child(&input).expect("append input");
    doc.body()
        .expect("document body")
        .append_child(&form)
        .expect("append form");
    input.dyn_into::<HtmlInputElement>().expect("input element")
}

#[wasm_bindgen_test]
fn submit_event_default_is_cancelled() {
    let event = cancelable_submit();

    SubmitEvent::prevent_default(&event);

    assert!(event.default_prevented());
}

#[wasm_bindgen_test]
fn live_input_reads_value_at_call_time() {
    let input = mount_form("read-form", "read-title");
    let source = LiveInput::new(input.clone());

    input.set_value("Chess");
    assert_eq!(source.current_title(), "Chess");
    input.set_value("Catan & Co");
    assert_eq!(source.current_title(), "Catan & Co");
}

#[wasm_bindgen_test]
fn bind_reports_missing_elements() {
    let err = bind("no-such-form", "no-such-input").unwrap_err();
    assert_eq!(err.to_string(), "Element not found: #no-such-form");
}

#[wasm_bindgen_test]
fn bound_form_cancels_dispatched_submit() {
    let input = mount_form("bound-form", "bound-title");
    input.set_value("Catan & Co");
    bind_external("bound-form", "bound-title", "localhost", 8501).expect("bind");

    let form = document().get_element_by_id("bound-form").expect("form");
    let event = cancelable_submit();
    let not_cancelled = form.dispatch_event(&event).expect("dispatch");

    assert!(!not_cancelled);
    assert!(event.default_prevented());
}

thread_local! {
    static REPORTED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record_report(message: &str) {
    REPORTED.with(|reported| reported.borrow_mut().push(message.to_string()));
}

struct BlockedWindow;

impl Navigator for BlockedWindow {
    fn strategy(&self) -> NavigationStrategy {
        NavigationStrategy::ExternalOpen
    }

    fn navigate(&self, _url: &str) -> Result<(), SubmissionError> {
        Err(SubmissionError::Navigation(
            "window.open was blocked".to_string(),
        ))
    }
}

#[wasm_bindgen_test]
fn blocked_open_is_reported_to_console() {
    let handler = TitleSubmissionHandler::new(
        "Go",
        TargetBase::origin("localhost", 8501),
        ConsoleReported::with_reporter(BlockedWindow, record_report),
    );

    handler.submit(&cancelable_submit());

    let reported = REPORTED.with(|reported| reported.borrow().clone());
    assert_eq!(reported.len(), 1);
    assert!(reported[0].contains("http://localhost:8501/?game=Go"));
    assert!(reported[0].contains("window.open was blocked"));
}
