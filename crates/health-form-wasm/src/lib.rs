//! Health Form WASM
//!
//! Browser entry point for the health form assistant. Translates DOM events
//! into `FormEvent`s for the shared `FormAssistant` and exposes its actions
//! to page scripts.

use std::cell::RefCell;

use health_form::validation::{compute_bmi, validate_submission};
use health_form::{AssistantConfig, ConstraintTable, EventOutcome, FormAssistant, FormEvent, Severity};
use wasm_bindgen::prelude::*;
use web_sys::console;

mod dom;
mod listeners;

pub use dom::WebSurface;
pub use listeners::WebEventSource;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

struct Page {
    assistant: FormAssistant,
    surface: WebSurface,
    listening: bool,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// Runs `f` against the page state, creating a default one on first use.
///
/// Returns `None` when the page is already being handled further up the
/// stack or there is no document.
fn with_page<R>(f: impl FnOnce(&mut FormAssistant, &mut WebSurface) -> R) -> Option<R> {
    PAGE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            console::warn_1(&"health-form: event dropped while another is being handled".into());
            return None;
        };
        if slot.is_none() {
            let assistant = FormAssistant::default();
            let surface = WebSurface::new(&assistant.config().form.form_id)?;
            *slot = Some(Page {
                assistant,
                surface,
                listening: false,
            });
        }
        let page = slot.as_mut()?;
        Some(f(&mut page.assistant, &mut page.surface))
    })
}

pub(crate) fn dispatch(event: FormEvent) -> Option<EventOutcome> {
    with_page(|assistant, surface| assistant.handle(surface, event))
}

/// Prepare the page and register every listener
///
/// # Arguments
/// * `config` - Optional object shaped like `health-form.toml`
///
/// # Returns
/// Number of listener bindings registered
///
/// # Example (JavaScript)
/// ```javascript
/// document.addEventListener('DOMContentLoaded', () => {
///     mount({ format: { locale: 'id-ID' }, timing: { banner_ms: 8000 } });
/// });
/// ```
#[wasm_bindgen]
pub fn mount(config: JsValue) -> Result<usize, JsValue> {
    let config: AssistantConfig = if config.is_undefined() || config.is_null() {
        AssistantConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
    };

    PAGE.with(|cell| {
        let mut slot = cell
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("health-form is busy"))?;
        if slot.as_ref().is_some_and(|page| page.listening) {
            return Err(JsValue::from_str("health-form is already mounted"));
        }

        let mut surface = WebSurface::new(&config.form.form_id)
            .ok_or_else(|| JsValue::from_str("No document to mount on"))?;
        let assistant = FormAssistant::new(config);
        let mut source = WebEventSource::new(surface.clone());
        let bindings = assistant.attach(&mut surface, &mut source);

        *slot = Some(Page {
            assistant,
            surface,
            listening: true,
        });
        Ok(bindings.len())
    })
}

/// Open a printable copy of the result card
#[wasm_bindgen(js_name = printResults)]
pub fn print_results() -> bool {
    with_page(|assistant, surface| assistant.print_results(surface)).unwrap_or(false)
}

/// Download the form entries as JSON
#[wasm_bindgen(js_name = exportData)]
pub fn export_data() -> bool {
    with_page(|assistant, surface| assistant.export_data(surface)).unwrap_or(false)
}

/// Show a toast; `severity` is `success`, `error` or `info` (default)
#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(message: &str, severity: Option<String>) -> bool {
    let severity = severity.as_deref().map(Severity::parse).unwrap_or_default();
    with_page(|assistant, surface| assistant.show_toast(surface, message, severity).is_some())
        .unwrap_or(false)
}

/// Validate `[name, value]` pairs against the active constraints
///
/// # Returns
/// `{ isValid, messages, violations: [{ field, message }] }`
///
/// # Example (JavaScript)
/// ```javascript
/// const result = validateFields([['Age', '130'], ['bmi', '24.1']]);
/// if (!result.isValid) console.log(result.messages);
/// ```
#[wasm_bindgen(js_name = validateFields)]
pub fn validate_fields(entries: JsValue) -> Result<JsValue, JsValue> {
    let entries: Vec<(String, String)> = serde_wasm_bindgen::from_value(entries)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse entries: {}", e)))?;

    let table = PAGE
        .with(|cell| {
            let slot = cell.try_borrow().ok()?;
            slot.as_ref().map(|page| page.assistant.constraints().clone())
        })
        .unwrap_or_else(ConstraintTable::diabetes_screening);

    let result = validate_submission(&table, entries);
    Ok(serde_wasm_bindgen::to_value(&result)?)
}

/// BMI from weight (kg) and height (cm), one decimal; `undefined` when
/// either is not positive
#[wasm_bindgen(js_name = computeBmi)]
pub fn compute_bmi_js(weight: f64, height: f64) -> Option<f64> {
    compute_bmi(weight, height)
}
