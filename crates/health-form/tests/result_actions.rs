/// Result utilities: print, export, toasts, tooltips and page mounting
use chrono::{FixedOffset, TimeZone};
use health_form::assistant::{TOOLTIP_ID, UTILITY_ROW_ID};
use health_form::testing::MemorySurface;
use health_form::{
    Binding, EventKind, EventSource, FormAction, FormAssistant, FormEvent, ListenTarget, Severity,
};
use pretty_assertions::assert_eq;

fn answered_page() -> MemorySurface {
    MemorySurface::new()
        .with_form()
        .number_field("Age", "45")
        .select_field("gender", "Male")
        .number_field("bmi", "24.1")
        .result_card("  Type 2  ", "91.20%", "<ul><li>Olahraga rutin</li></ul>")
}

#[derive(Default)]
struct RecordingSource {
    registered: Vec<Binding>,
}

impl EventSource for RecordingSource {
    fn listen(&mut self, binding: &Binding) {
        self.registered.push(binding.clone());
    }
}

#[test]
fn test_print_without_result_does_nothing() {
    let mut page = MemorySurface::new().with_form();
    let assistant = FormAssistant::default();

    assert!(!assistant.print_results(&mut page));
    assert!(page.windows().is_empty());
    assert_eq!(page.pending(), 0);
}

#[test]
fn test_print_opens_document_then_prints() {
    let mut page = answered_page();
    let assistant = FormAssistant::default();

    assert!(assistant.print_results(&mut page));
    let window = &page.windows()[0];
    assert!(window.document.starts_with("<!DOCTYPE html>"));
    assert!(window.document.contains("<title>Hasil Prediksi Diabetes</title>"));
    assert!(window.document.contains("Tanggal: 17/5/2024"));
    assert!(window.document.contains("<div class=\"print-result\">Type 2</div>"));
    assert!(window.document.contains("Tingkat Keyakinan Model: 91.20%"));
    assert!(window.document.contains("<ul><li>Olahraga rutin</li></ul>"));
    assert!(!window.printed);

    page.advance_ms(499);
    assert!(!page.windows()[0].printed);
    page.advance_ms(1);
    assert!(page.windows()[0].printed);
}

#[test]
fn test_print_with_popups_blocked() {
    let mut page = answered_page().block_popups();
    let assistant = FormAssistant::default();

    assert!(!assistant.print_results(&mut page));
    assert_eq!(page.pending(), 0);
}

#[test]
fn test_export_downloads_form_entries() {
    let mut page = answered_page();
    let mut assistant = FormAssistant::default();

    assert!(assistant.export_data(&mut page));
    let download = &page.downloads()[0];
    assert_eq!(download.file_name, "data-prediksi-diabetes-2024-05-17.json");
    assert_eq!(download.mime, "application/json");
    assert_eq!(
        download.contents,
        "{\n  \"Age\": \"45\",\n  \"gender\": \"Male\",\n  \"bmi\": \"24.1\"\n}"
    );

    let toasts = page.elements_with_class("toast-notification");
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].text, "Data berhasil diekspor");
    assert!(toasts[0].has_class("bg-green-500"));
}

#[test]
fn test_export_file_is_dated_in_utc() {
    let early_morning = FixedOffset::east_opt(7 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 17, 2, 0, 0)
        .unwrap();
    let mut page = answered_page().at(early_morning);
    let mut assistant = FormAssistant::default();

    assistant.export_data(&mut page);
    assert_eq!(page.downloads()[0].file_name, "data-prediksi-diabetes-2024-05-16.json");
}

#[test]
fn test_export_prefix_from_config() {
    let config = health_form::AssistantConfig::from_toml_str("[export]\nfile_prefix = \"skrining\"\n").unwrap();
    let page = answered_page();
    let assistant = FormAssistant::new(config);

    assert_eq!(assistant.export_file_name(&page), "skrining-2024-05-17.json");
}

#[test]
fn test_export_without_form_does_nothing() {
    let mut page = MemorySurface::new().number_field("Age", "45");
    let mut assistant = FormAssistant::default();

    assert!(!assistant.export_data(&mut page));
    assert!(page.downloads().is_empty());
    assert!(page.elements_with_class("toast-notification").is_empty());
}

#[test]
fn test_toast_slides_in_then_out() {
    let mut page = MemorySurface::new();
    let mut assistant = FormAssistant::default();

    let target = assistant.show_toast(&mut page, "Tersimpan", Severity::Info);
    assert!(target.is_some());
    let toast = page.element("toast-1").unwrap();
    assert!(toast.has_class("bg-blue-500"));
    assert!(toast.has_class("translate-y-full"));

    page.advance_ms(10);
    assert!(!page.element("toast-1").unwrap().has_class("translate-y-full"));

    page.advance_ms(2990);
    assert!(page.element("toast-1").unwrap().has_class("translate-y-full"));

    page.advance_ms(299);
    assert!(page.element("toast-1").is_some());
    page.advance_ms(1);
    assert!(page.element("toast-1").is_none());
    assert_eq!(page.pending(), 0);
}

#[test]
fn test_stacked_toasts_are_independent() {
    let mut page = MemorySurface::new();
    let mut assistant = FormAssistant::default();

    assistant.show_toast(&mut page, "Pertama", Severity::Success);
    page.advance_ms(1000);
    assistant.show_toast(&mut page, "Kedua", Severity::Error);
    assert_eq!(page.elements_with_class("toast-notification").len(), 2);

    page.advance_ms(2300);
    assert!(page.element("toast-1").is_none());
    let second = page.element("toast-2").unwrap();
    assert_eq!(second.text, "Kedua");
    assert!(second.has_class("bg-red-500"));

    page.advance_ms(1000);
    assert!(page.element("toast-2").is_none());
}

#[test]
fn test_tooltip_positioned_above_pointer() {
    let mut page = MemorySurface::new();
    let mut assistant = FormAssistant::default();

    assistant.handle(
        &mut page,
        FormEvent::PointerEnter {
            title: "Indeks massa tubuh".into(),
            x: 200.0,
            y: 300.0,
        },
    );
    let tooltip = page.element(TOOLTIP_ID).unwrap();
    assert_eq!(tooltip.text, "Indeks massa tubuh");
    assert_eq!(tooltip.styles.get("top").map(String::as_str), Some("260px"));
    assert_eq!(tooltip.styles.get("left").map(String::as_str), Some("140px"));

    assistant.handle(
        &mut page,
        FormEvent::PointerEnter {
            title: "HbA1c".into(),
            x: 50.0,
            y: 80.0,
        },
    );
    let tooltips: Vec<_> = page.elements_with_class("bg-gray-900");
    assert_eq!(tooltips.len(), 1);
    assert_eq!(tooltips[0].text, "HbA1c");

    assistant.handle(&mut page, FormEvent::PointerLeave);
    assert!(page.element(TOOLTIP_ID).is_none());
}

#[test]
fn test_tooltip_skipped_for_empty_title() {
    let mut page = MemorySurface::new();
    let mut assistant = FormAssistant::default();

    assistant.handle(
        &mut page,
        FormEvent::PointerEnter {
            title: String::new(),
            x: 10.0,
            y: 10.0,
        },
    );
    assert!(page.element(TOOLTIP_ID).is_none());
}

#[test]
fn test_mount_adds_utility_buttons_once() {
    let mut page = answered_page();
    let assistant = FormAssistant::default();

    assistant.mount(&mut page);
    assistant.mount(&mut page);

    let row = page.element(UTILITY_ROW_ID).unwrap();
    assert!(row.html.contains("data-form-action=\"print\""));
    assert!(row.html.contains("data-form-action=\"export\""));
    assert!(row.html.contains("Cetak Hasil"));
    assert_eq!(
        page.elements_with_class("justify-center").len(),
        1,
        "utility row inserted twice"
    );
}

#[test]
fn test_mount_without_result_adds_no_buttons() {
    let mut page = MemorySurface::new().with_form().number_field("Age", "45");
    FormAssistant::default().mount(&mut page);
    assert!(page.element(UTILITY_ROW_ID).is_none());
}

#[test]
fn test_attach_registers_every_binding() {
    let mut page = answered_page();
    let mut source = RecordingSource::default();
    let assistant = FormAssistant::default();

    let bindings = assistant.attach(&mut page, &mut source);
    assert_eq!(source.registered, bindings);
    assert_eq!(
        bindings,
        vec![
            Binding::new(EventKind::Focus, ListenTarget::Controls),
            Binding::new(EventKind::Blur, ListenTarget::Controls),
            Binding::new(EventKind::Submit, ListenTarget::Form),
            Binding::new(EventKind::KeyDown, ListenTarget::Document),
            Binding::new(EventKind::PointerEnter, ListenTarget::Titled),
            Binding::new(EventKind::PointerLeave, ListenTarget::Titled),
            Binding::new(EventKind::Click, ListenTarget::ActionButtons),
        ]
    );
}

#[test]
fn test_no_submit_binding_without_form() {
    let page = MemorySurface::new().number_field("Age", "45");
    let bindings = FormAssistant::default().bindings(&page);
    assert!(!bindings.iter().any(|b| b.kind == EventKind::Submit));
}

#[test]
fn test_utility_button_events_dispatch() {
    let mut page = answered_page();
    let mut assistant = FormAssistant::default();

    assistant.handle(&mut page, FormEvent::Action(FormAction::Print));
    assert_eq!(page.windows().len(), 1);

    assistant.handle(&mut page, FormEvent::Action(FormAction::Export));
    assert_eq!(page.downloads().len(), 1);
    assert_eq!(FormEvent::Action(FormAction::Export).kind(), EventKind::Click);
}
