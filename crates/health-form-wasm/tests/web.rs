//! Browser tests for the WASM bindings

use health_form::{
    Content, EventOutcome, FieldKind, FormAssistant, FormEvent, NewElement, Placement, Target,
    UiSurface,
};
use health_form_wasm::{compute_bmi_js, mount, validate_fields, WebSurface};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::{Element, Event, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

/// A form injected into the page, removed again on drop
struct Fixture {
    container: Element,
}

impl Fixture {
    fn new(form_id: &str, controls: &str) -> Self {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_inner_html(&format!("<form id=\"{}\">{}</form>", form_id, controls));
        document.body().unwrap().append_child(&container).unwrap();
        Self { container }
    }

    /// Adds markup next to the form, ahead of it in document order
    fn before_form(&self, html: &str) {
        self.container.insert_adjacent_html("afterbegin", html).unwrap();
    }

    fn input(&self, name: &str) -> HtmlInputElement {
        self.container
            .query_selector(&format!("[name=\"{}\"]", name))
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.container.remove();
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsValidation {
    is_valid: bool,
    messages: Vec<String>,
}

#[wasm_bindgen_test]
fn test_compute_bmi() {
    assert_eq!(compute_bmi_js(70.0, 175.0), Some(22.9));
    assert_eq!(compute_bmi_js(0.0, 175.0), None);
}

#[wasm_bindgen_test]
fn test_validate_fields_reports_messages_in_order() {
    let entries = serde_wasm_bindgen::to_value(&vec![("Age", "130"), ("bmi", "5"), ("hba1c", "5.4")]).unwrap();
    let result: JsValidation = serde_wasm_bindgen::from_value(validate_fields(entries).unwrap()).unwrap();

    assert!(!result.is_valid);
    assert_eq!(
        result.messages,
        vec!["Umur harus antara 0-120 tahun".to_string(), "BMI harus antara 10-60".to_string()]
    );
}

#[wasm_bindgen_test]
fn test_validate_fields_rejects_malformed_entries() {
    assert!(validate_fields(JsValue::from_str("Age=45")).is_err());
}

#[wasm_bindgen_test]
fn test_surface_reads_controls() {
    let _page = Fixture::new(
        "surface-read",
        r#"<input type="number" name="Age" value="45">
           <input type="number" name="income" class="no-format" value="12000">
           <select name="gender"><option value="Male" selected>Male</option></select>
           <textarea name="notes">haus</textarea>
           <button type="submit">Prediksi</button>"#,
    );
    let surface = WebSurface::new("surface-read").unwrap();

    assert!(surface.has_form());
    let income = surface.field("income").unwrap();
    assert!(income.format_opt_out);
    assert!(!income.is_formatted());
    assert!(surface.field("Age").unwrap().is_formatted());
    assert_eq!(surface.field("notes").unwrap().value, "haus");

    let entries = surface.form_entries().unwrap();
    assert_eq!(
        entries,
        vec![
            ("Age".to_string(), "45".to_string()),
            ("income".to_string(), "12000".to_string()),
            ("gender".to_string(), "Male".to_string()),
            ("notes".to_string(), "haus".to_string()),
        ]
    );
    assert_eq!(surface.inner_html(&Target::SubmitButton).as_deref(), Some("Prediksi"));
}

#[wasm_bindgen_test]
fn test_surface_inserts_and_removes_elements() {
    let _page = Fixture::new("surface-insert", r#"<input type="number" name="Age" value="45">"#);
    let mut surface = WebSurface::new("surface-insert").unwrap();

    let banner = NewElement {
        tag: "div",
        id: "test-banner".to_string(),
        class: "validation-error-alert p-4".to_string(),
        content: Content::Html("<b>Validasi Gagal</b>".to_string()),
    };
    assert!(surface.insert(banner, Placement::BeforeForm));

    let element = surface.element(&Target::id("test-banner")).unwrap();
    assert_eq!(element.next_element_sibling().unwrap().id(), "surface-insert");
    assert!(surface.exists(&Target::selector(".validation-error-alert")));

    assert!(surface.remove(&Target::id("test-banner")));
    assert!(!surface.remove(&Target::id("test-banner")));
}

#[wasm_bindgen_test]
fn test_assistant_drives_live_inputs() {
    let page = Fixture::new(
        "surface-drive",
        r#"<input type="number" name="weight" value="70">
           <input type="number" name="height" value="175">
           <input type="number" name="bmi" value="">
           <input type="number" name="income" value="12000">"#,
    );
    let config = health_form::AssistantConfig::from_toml_str("[form]\nform_id = \"surface-drive\"\n").unwrap();
    let mut assistant = FormAssistant::new(config);
    let mut surface = WebSurface::new("surface-drive").unwrap();

    assistant.handle(&mut surface, FormEvent::Input { field: "height".into() });
    assert_eq!(page.input("bmi").value(), "22.9");

    assistant.handle(&mut surface, FormEvent::Blur { field: "income".into() });
    assert_eq!(page.input("income").value(), "12.000");
    assistant.handle(&mut surface, FormEvent::Focus { field: "income".into() });
    assert_eq!(page.input("income").value(), "12000");
}

#[wasm_bindgen_test]
fn test_submit_checks_only_inputs_inside_the_form() {
    let page = Fixture::new(
        "surface-scope",
        r#"<input TYPE="Number" name="Age" value="45">
           <input type="number" name="bmi" value="22.9">"#,
    );
    page.before_form(r#"<input type="number" name="Age" value="500">"#);
    let config = health_form::AssistantConfig::from_toml_str("[form]\nform_id = \"surface-scope\"\n").unwrap();
    let mut assistant = FormAssistant::new(config);
    let mut surface = WebSurface::new("surface-scope").unwrap();

    let numeric: Vec<String> = surface.numeric_fields().into_iter().map(|f| f.value).collect();
    assert_eq!(numeric, vec!["45".to_string(), "22.9".to_string()]);
    let age = surface.field("Age").unwrap();
    assert_eq!(age.kind, FieldKind::Number);
    assert_eq!(age.value, "45");

    assert_eq!(assistant.handle(&mut surface, FormEvent::Submit), EventOutcome::Proceed);
}

#[wasm_bindgen_test]
fn test_mount_wires_dom_events() {
    let page = Fixture::new(
        "predictionForm",
        r#"<input type="number" name="weight" value="70">
           <input type="number" name="height" value="175">
           <input type="number" name="bmi" value="">"#,
    );

    assert_eq!(mount(JsValue::UNDEFINED).unwrap(), 9);

    page.input("height").set_value("160");
    page.input("height")
        .dispatch_event(&Event::new("input").unwrap())
        .unwrap();
    assert_eq!(page.input("bmi").value(), "27.3");

    assert!(mount(JsValue::UNDEFINED).is_err());
}
