//! Entry popover: discover time inputs, fill them, submit.
//!
//! The browser sits behind the `FormSurface` trait so the fill strategy can
//! be exercised against a fake popup in tests.

use crate::browser::Session;
use crate::core::entry::WorkEntry;
use crate::core::selectors::{ADD_ENTRY, ADD_ENTRY_TEXTS, FORM_SUBMIT, FORM_SUBMIT_TEXTS, POPUP};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// What we know about one input inside the popup, in document order.
#[derive(Debug, Clone, Deserialize)]
pub struct InputProbe {
    pub index: usize,
    /// The `type` attribute, or the tag name for non-inputs ("textarea").
    pub kind: String,
    /// name + placeholder + aria-label, lowercased, for name-based fallbacks.
    pub name: String,
}

#[async_trait]
pub trait FormSurface {
    async fn inputs(&self) -> AppResult<Vec<InputProbe>>;
    async fn fill(&self, index: usize, value: &str) -> AppResult<()>;
    async fn value(&self, index: usize) -> AppResult<String>;
    /// Click a submit affordance; text needles are the fallback.
    async fn submit(&self) -> AppResult<()>;
}

const NON_TEXT_KINDS: &[&str] = &[
    "checkbox", "radio", "hidden", "button", "submit", "password", "email", "file",
];

/// Pick the two inputs that receive start and end, in order:
/// 1. the first two `type=time` inputs;
/// 2. else the first two generic text-like inputs;
/// 3. else a start-ish and an end-ish input matched by name.
pub fn choose_time_inputs(inputs: &[InputProbe]) -> AppResult<(usize, usize)> {
    let time: Vec<usize> = inputs
        .iter()
        .filter(|i| i.kind == "time")
        .map(|i| i.index)
        .collect();
    if time.len() >= 2 {
        return Ok((time[0], time[1]));
    }

    let generic: Vec<usize> = inputs
        .iter()
        .filter(|i| !NON_TEXT_KINDS.contains(&i.kind.as_str()))
        .map(|i| i.index)
        .collect();
    if generic.len() >= 2 {
        return Ok((generic[0], generic[1]));
    }

    let start = inputs
        .iter()
        .find(|i| ["start", "from", "begin", "clock-in", "clock_in"].iter().any(|n| i.name.contains(n)));
    let end = inputs
        .iter()
        .find(|i| ["end", "to", "finish", "clock-out", "clock_out"].iter().any(|n| i.name.contains(n)));
    if let (Some(s), Some(e)) = (start, end) {
        if s.index != e.index {
            return Ok((s.index, e.index));
        }
    }

    Err(AppError::ElementNotFound {
        what: "start/end time inputs".to_string(),
        tried: inputs.len(),
    })
}

pub fn find_break_input(inputs: &[InputProbe]) -> Option<usize> {
    inputs
        .iter()
        .find(|i| i.kind == "number" || i.name.contains("break") || i.name.contains("pause"))
        .map(|i| i.index)
}

pub fn find_description_input(inputs: &[InputProbe]) -> Option<usize> {
    inputs
        .iter()
        .find(|i| {
            i.kind == "textarea"
                || i.name.contains("desc")
                || i.name.contains("note")
                || i.name.contains("comment")
        })
        .map(|i| i.index)
}

/// Fill start/end (read back to confirm the values stuck), then break minutes
/// and description where the popup has somewhere to put them.
pub async fn fill_entry<S: FormSurface + ?Sized>(surface: &S, entry: &WorkEntry) -> AppResult<()> {
    let inputs = surface.inputs().await?;
    let (start_idx, end_idx) = choose_time_inputs(&inputs)?;
    debug!("filling start into input {start_idx}, end into input {end_idx}");

    let start = entry.start_hhmm();
    let end = entry.end_hhmm();
    surface.fill(start_idx, &start).await?;
    surface.fill(end_idx, &end).await?;

    let got_start = surface.value(start_idx).await?;
    let got_end = surface.value(end_idx).await?;
    if got_start != start || got_end != end {
        return Err(AppError::Other(format!(
            "time fields did not take the values (start {got_start:?}, end {got_end:?})"
        )));
    }

    if let Some(brk) = entry.break_min {
        match find_break_input(&inputs) {
            Some(idx) if idx != start_idx && idx != end_idx => {
                surface.fill(idx, &brk.to_string()).await?;
            }
            _ => debug!("no break input in popup, skipping"),
        }
    }
    if let Some(desc) = &entry.description {
        match find_description_input(&inputs) {
            Some(idx) if idx != start_idx && idx != end_idx => {
                surface.fill(idx, desc).await?;
            }
            _ => debug!("no description input in popup, skipping"),
        }
    }

    surface.submit().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Live implementation over the page
// ---------------------------------------------------------------------------

pub struct PagePopup<'a> {
    session: &'a Session,
    /// Selector of the popup container; inputs are indexed within it.
    scope: &'static str,
}

impl<'a> PagePopup<'a> {
    /// Open the popover for an already-toggled row: wait for the container,
    /// then hit the add affordance (selector cascade, then text fallback).
    pub async fn open(session: &'a Session) -> AppResult<PagePopup<'a>> {
        let (_, scope) = session.wait_for(&POPUP).await?;
        debug!("popup container matched {scope}");

        match session.find_first(&ADD_ENTRY).await {
            Ok((el, sel)) => {
                debug!("add affordance via {sel}");
                el.click().await?;
            }
            Err(_) => {
                if session.click_by_text(ADD_ENTRY_TEXTS).await? {
                    debug!("add affordance via text match");
                } else {
                    // Some layouts open the editor straight from the toggle.
                    info!("no add affordance found, assuming editor is already open");
                }
            }
        }
        session.settle().await;

        Ok(PagePopup { session, scope })
    }

    fn collect_js(&self) -> String {
        format!(
            r#"const root = document.querySelector("{}") || document;
               const els = Array.from(root.querySelectorAll("input, textarea"));"#,
            self.scope
        )
    }
}

#[async_trait]
impl FormSurface for PagePopup<'_> {
    async fn inputs(&self) -> AppResult<Vec<InputProbe>> {
        let script = format!(
            r#"(() => {{
                {collect}
                return els.map((el, i) => ({{
                    index: i,
                    kind: el.tagName === 'TEXTAREA' ? 'textarea' : (el.type || 'text'),
                    name: ((el.name || '') + ' ' + (el.placeholder || '') + ' ' + (el.getAttribute('aria-label') || '')).toLowerCase().trim()
                }}));
            }})()"#,
            collect = self.collect_js()
        );
        self.session
            .page()
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| AppError::Other(format!("failed to decode input probe: {e}")))
    }

    async fn fill(&self, index: usize, value: &str) -> AppResult<()> {
        let value_json = serde_json::to_string(value)
            .map_err(|e| AppError::Other(format!("value encoding: {e}")))?;
        // Set through the native value setter and fire input/change so
        // framework-bound fields actually notice the write.
        let script = format!(
            r#"(() => {{
                {collect}
                const el = els[{index}];
                if (!el) return false;
                const proto = el.tagName === 'TEXTAREA' ? window.HTMLTextAreaElement : window.HTMLInputElement;
                const set = Object.getOwnPropertyDescriptor(proto.prototype, 'value').set;
                set.call(el, {value_json});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()"#,
            collect = self.collect_js()
        );
        let ok: bool = self
            .session
            .page()
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| AppError::Other(format!("failed to decode fill result: {e}")))?;
        if !ok {
            return Err(AppError::ElementNotFound {
                what: format!("popup input #{index}"),
                tried: 1,
            });
        }
        Ok(())
    }

    async fn value(&self, index: usize) -> AppResult<String> {
        let script = format!(
            r#"(() => {{
                {collect}
                const el = els[{index}];
                return el ? el.value : '';
            }})()"#,
            collect = self.collect_js()
        );
        self.session
            .page()
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| AppError::Other(format!("failed to decode input value: {e}")))
    }

    async fn submit(&self) -> AppResult<()> {
        match self.session.find_first(&FORM_SUBMIT).await {
            Ok((el, sel)) => {
                debug!("submit via {sel}");
                el.click().await?;
                Ok(())
            }
            Err(not_found) => {
                if self.session.click_by_text(FORM_SUBMIT_TEXTS).await? {
                    debug!("submit via text match");
                    Ok(())
                } else {
                    warn!("no submit affordance matched");
                    Err(not_found)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_time;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn probe(index: usize, kind: &str, name: &str) -> InputProbe {
        InputProbe {
            index,
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn time_inputs_win_over_everything() {
        let inputs = vec![
            probe(0, "text", "search"),
            probe(1, "time", ""),
            probe(2, "time", ""),
        ];
        assert_eq!(choose_time_inputs(&inputs).unwrap(), (1, 2));
    }

    #[test]
    fn generic_inputs_are_the_first_fallback() {
        let inputs = vec![
            probe(0, "hidden", "csrf"),
            probe(1, "text", ""),
            probe(2, "text", ""),
        ];
        assert_eq!(choose_time_inputs(&inputs).unwrap(), (1, 2));
    }

    #[test]
    fn name_match_is_the_last_resort() {
        let inputs = vec![probe(0, "checkbox", "start of day"), probe(1, "checkbox", "end of day")];
        assert_eq!(choose_time_inputs(&inputs).unwrap(), (0, 1));
    }

    #[test]
    fn no_usable_inputs_is_a_not_found_error() {
        let inputs = vec![probe(0, "checkbox", "remember me")];
        let err = choose_time_inputs(&inputs).unwrap_err();
        assert!(matches!(err, AppError::ElementNotFound { .. }));
    }

    // -- mock popup ---------------------------------------------------------

    struct MockPopup {
        probes: Vec<InputProbe>,
        values: Mutex<Vec<String>>,
        submitted: Mutex<bool>,
    }

    impl MockPopup {
        fn new(probes: Vec<InputProbe>) -> Self {
            let n = probes.len();
            Self {
                probes,
                values: Mutex::new(vec![String::new(); n]),
                submitted: Mutex::new(false),
            }
        }
    }

    #[async_trait]
    impl FormSurface for MockPopup {
        async fn inputs(&self) -> AppResult<Vec<InputProbe>> {
            Ok(self.probes.clone())
        }
        async fn fill(&self, index: usize, value: &str) -> AppResult<()> {
            self.values.lock().unwrap()[index] = value.to_string();
            Ok(())
        }
        async fn value(&self, index: usize) -> AppResult<String> {
            Ok(self.values.lock().unwrap()[index].clone())
        }
        async fn submit(&self) -> AppResult<()> {
            *self.submitted.lock().unwrap() = true;
            Ok(())
        }
    }

    fn entry() -> WorkEntry {
        WorkEntry {
            date: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
            start: parse_time("09:00").unwrap(),
            end: parse_time("17:30").unwrap(),
            break_min: Some(45),
            description: Some("regular day".to_string()),
        }
    }

    #[tokio::test]
    async fn start_goes_first_end_goes_second() {
        let mock = MockPopup::new(vec![probe(0, "time", ""), probe(1, "time", "")]);
        fill_entry(&mock, &entry()).await.unwrap();

        let values = mock.values.lock().unwrap();
        assert_eq!(values[0], "09:00");
        assert_eq!(values[1], "17:30");
        assert!(*mock.submitted.lock().unwrap());
    }

    #[tokio::test]
    async fn break_and_description_fill_when_present() {
        let mock = MockPopup::new(vec![
            probe(0, "time", ""),
            probe(1, "time", ""),
            probe(2, "number", "break minutes"),
            probe(3, "textarea", "description"),
        ]);
        fill_entry(&mock, &entry()).await.unwrap();

        let values = mock.values.lock().unwrap();
        assert_eq!(values[2], "45");
        assert_eq!(values[3], "regular day");
    }

    #[tokio::test]
    async fn missing_break_input_is_not_an_error() {
        let mock = MockPopup::new(vec![probe(0, "time", ""), probe(1, "time", "")]);
        assert!(fill_entry(&mock, &entry()).await.is_ok());
    }

    #[tokio::test]
    async fn empty_popup_surfaces_not_found() {
        let mock = MockPopup::new(vec![]);
        let err = fill_entry(&mock, &entry()).await.unwrap_err();
        assert!(matches!(err, AppError::ElementNotFound { .. }));
    }
}
