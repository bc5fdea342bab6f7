// File: src/actions.rs
// Purpose: Print, export and toast actions offered next to a result

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::assistant::FormAssistant;
use crate::deferred::DeferredAction;
use crate::markup::{self, PrintableResult};
use crate::surface::{
    Content, NewElement, Placement, Target, UiSurface, RESULT_CARD, RESULT_CONFIDENCE,
    RESULT_RECOMMENDATION, RESULT_STAGE,
};

const TOAST_CLASS: &str = "toast-notification fixed bottom-4 right-4 px-6 py-3 rounded-lg shadow-lg text-white z-50 transform translate-y-full transition-transform duration-300";
const TOAST_HIDDEN: &[&str] = &["translate-y-full"];

/// Visual treatment of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

impl Severity {
    /// Anything unrecognised is shown as info
    pub fn parse(value: &str) -> Self {
        match value {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn background_class(self) -> &'static str {
        match self {
            Self::Success => "bg-green-500",
            Self::Error => "bg-red-500",
            Self::Info => "bg-blue-500",
        }
    }
}

/// Form entries as pretty-printed JSON, in document order
pub fn export_payload(entries: &[(String, String)]) -> serde_json::Result<String> {
    let data: Map<String, JsonValue> = entries
        .iter()
        .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
        .collect();
    serde_json::to_string_pretty(&data)
}

impl FormAssistant {
    /// Opens a printable copy of the result card.
    ///
    /// Returns false when there is no result or no window could be opened.
    pub fn print_results<S: UiSurface + ?Sized>(&self, surface: &mut S) -> bool {
        if !surface.exists(&Target::selector(RESULT_CARD)) {
            debug!("no result card to print");
            return false;
        }

        let result = PrintableResult {
            stage: surface.text(&Target::selector(RESULT_STAGE)).unwrap_or_default(),
            confidence: surface
                .text(&Target::selector(RESULT_CONFIDENCE))
                .unwrap_or_default(),
            recommendation_html: surface
                .inner_html(&Target::selector(RESULT_RECOMMENDATION))
                .unwrap_or_default(),
        };
        let document = markup::print_document(&result, surface.now().date_naive()).into_string();

        let Some(window) = surface.open_window(&document) else {
            warn!("print window could not be opened");
            return false;
        };
        surface.schedule(self.config.timing.print_delay(), DeferredAction::Print(window));
        true
    }

    /// Name of the export file for the current UTC date
    pub fn export_file_name<S: UiSurface + ?Sized>(&self, surface: &S) -> String {
        let date = surface.now().naive_utc().date();
        format!("{}-{}.json", self.config.export.file_prefix, date.format("%Y-%m-%d"))
    }

    /// Downloads the current form entries as JSON and confirms with a toast.
    ///
    /// Returns false without a form.
    pub fn export_data<S: UiSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let Some(entries) = surface.form_entries() else {
            debug!("no form to export");
            return false;
        };

        let json = match export_payload(&entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode form entries");
                return false;
            }
        };

        let file_name = self.export_file_name(surface);
        surface.download(&file_name, "application/json", &json);
        self.show_toast(surface, "Data berhasil diekspor", Severity::Success);
        true
    }

    /// Shows a transient notification; each call gets its own element.
    ///
    /// Returns the toast's target, or `None` if it could not be inserted.
    pub fn show_toast<S: UiSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        message: &str,
        severity: Severity,
    ) -> Option<Target> {
        let id = self.next_id("toast");
        let toast = NewElement {
            tag: "div",
            id: id.clone(),
            class: format!("{} {}", TOAST_CLASS, severity.background_class()),
            content: Content::Text(message.to_string()),
        };
        if !surface.insert(toast, Placement::AppendToBody) {
            return None;
        }

        let target = Target::Id(id);
        let timing = &self.config.timing;
        surface.schedule(
            timing.toast_enter(),
            DeferredAction::remove_classes(target.clone(), TOAST_HIDDEN),
        );
        surface.schedule(
            timing.toast_visible(),
            DeferredAction::add_classes(target.clone(), TOAST_HIDDEN)
                .then(timing.toast_exit(), DeferredAction::Remove(target.clone())),
        );
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_export_payload_keeps_entries_as_strings() {
        let entries = vec![
            ("Age".to_string(), "45".to_string()),
            ("bmi".to_string(), "24.1".to_string()),
        ];
        let json = export_payload(&entries).unwrap();
        let parsed: JsonValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, json!({"Age": "45", "bmi": "24.1"}));
        assert_eq!(json, "{\n  \"Age\": \"45\",\n  \"bmi\": \"24.1\"\n}");
    }

    #[test]
    fn test_export_payload_preserves_document_order() {
        let entries = vec![
            ("gender".to_string(), "Male".to_string()),
            ("Age".to_string(), "45".to_string()),
        ];
        let json = export_payload(&entries).unwrap();
        assert!(json.find("gender").unwrap() < json.find("Age").unwrap());
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("success"), Severity::Success);
        assert_eq!(Severity::parse("error"), Severity::Error);
        assert_eq!(Severity::parse("warning"), Severity::Info);
        assert_eq!(Severity::default().background_class(), "bg-blue-500");
    }
}
