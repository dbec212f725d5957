//! DOM presenter: forwards session output to the page as `CustomEvent`s.
//!
//! Events are queued while the session is borrowed and dispatched by [`flush`]
//! afterwards, so a page listener may call back into the exported controls.

use std::cell::RefCell;

use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, window};

use crate::analyzer::Sentiment;
use crate::error::{Error, Result};
use crate::progression::LevelView;
use crate::session::Presenter;
use crate::tracker::PointerState;

#[derive(Clone, Debug)]
enum UiEvent {
    Pointer(PointerState),
    Sentiment(Sentiment),
    Level(LevelView),
    Cleared,
}

impl UiEvent {
    fn name(&self) -> &'static str {
        match self {
            UiEvent::Pointer(_) => "lc:pointer",
            UiEvent::Sentiment(_) => "lc:sentiment",
            UiEvent::Level(_) => "lc:level",
            UiEvent::Cleared => "lc:cleared",
        }
    }

    fn detail_json(&self) -> Result<String> {
        let json = match self {
            UiEvent::Pointer(p) => serde_json::to_string(p)?,
            UiEvent::Sentiment(s) => serde_json::to_string(s)?,
            UiEvent::Level(v) => serde_json::to_string(v)?,
            UiEvent::Cleared => "null".to_string(),
        };
        Ok(json)
    }
}

thread_local! {
    static PENDING: RefCell<Vec<UiEvent>> = const { RefCell::new(Vec::new()) };
}

fn queue(event: UiEvent) {
    PENDING.with(|p| p.borrow_mut().push(event));
}

/// Dispatch everything queued so far on `document`.
pub(super) fn flush() {
    let events = PENDING.with(|p| std::mem::take(&mut *p.borrow_mut()));
    for event in events {
        if let Err(e) = dispatch(&event) {
            log::warn!("dropping {} event: {e}", event.name());
        }
    }
}

fn dispatch(event: &UiEvent) -> Result<()> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::Dom("no document".to_string()))?;
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&event.detail_json()?));
    let evt = CustomEvent::new_with_event_init_dict(event.name(), &init)
        .map_err(|e| Error::Dom(format!("{e:?}")))?;
    doc.dispatch_event(&evt)
        .map_err(|e| Error::Dom(format!("{e:?}")))?;
    Ok(())
}

#[derive(Debug, Default)]
pub(super) struct DomPresenter;

impl Presenter for DomPresenter {
    fn pointer_changed(&mut self, state: PointerState) {
        queue(UiEvent::Pointer(state));
    }

    fn sentiment_changed(&mut self, sentiment: Sentiment) {
        queue(UiEvent::Sentiment(sentiment));
    }

    fn level_changed(&mut self, view: &LevelView) {
        queue(UiEvent::Level(*view));
    }

    fn surface_cleared(&mut self) {
        queue(UiEvent::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::LevelProgress;

    #[test]
    fn test_detail_payloads() {
        let p = UiEvent::Pointer(PointerState::REST).detail_json().unwrap();
        assert_eq!(p, r#"{"is_active":false,"x":0.5,"y":0.5}"#);
        let s = UiEvent::Sentiment(Sentiment::Happy).detail_json().unwrap();
        assert_eq!(s, r#""Happy""#);
        let l = UiEvent::Level(LevelView::from(LevelProgress::default()))
            .detail_json()
            .unwrap();
        assert!(l.contains(r#""level":"LEVEL_1""#));
        assert!(l.contains("The Classic Bob"));
        assert_eq!(UiEvent::Cleared.name(), "lc:cleared");
    }

    #[test]
    fn test_presenter_queues_until_flush() {
        let mut p = DomPresenter;
        p.surface_cleared();
        p.sentiment_changed(Sentiment::Sad);
        let queued = PENDING.with(|q| q.borrow().len());
        assert_eq!(queued, 2);
        PENDING.with(|q| q.borrow_mut().clear());
    }
}
