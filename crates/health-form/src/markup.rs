// File: src/markup.rs
// Purpose: Maud templates for everything the assistant renders

use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::event::FormAction;

/// Content of the submit button while a prediction is running
pub fn busy_button() -> Markup {
    html! {
        i class="fas fa-spinner fa-spin mr-3" {}
        "Memproses Prediksi..."
    }
}

/// Body of the validation banner; one line per message
pub fn validation_banner(messages: &[String]) -> Markup {
    html! {
        div class="flex items-center" {
            div class="p-2 rounded-full bg-red-100 mr-4" {
                i class="fas fa-exclamation-circle text-red-600" {}
            }
            div {
                h4 class="font-bold text-gray-900" { "Validasi Gagal" }
                p class="text-sm text-gray-700 mt-1" {
                    @for (i, message) in messages.iter().enumerate() {
                        @if i > 0 { br; }
                        (message)
                    }
                }
            }
        }
    }
}

/// Print and export buttons added to the result card
pub fn utility_buttons() -> Markup {
    html! {
        button type="button" data-form-action=(FormAction::Print.as_str())
            class="px-4 py-2 bg-white border border-gray-300 rounded-lg flex items-center hover:bg-gray-50" {
            i class="fas fa-print mr-2" {}
            " Cetak Hasil"
        }
        button type="button" data-form-action=(FormAction::Export.as_str())
            class="px-4 py-2 bg-white border border-gray-300 rounded-lg flex items-center hover:bg-gray-50" {
            i class="fas fa-download mr-2" {}
            " Ekspor Data"
        }
    }
}

const PRINT_STYLE: &str = "\
body { font-family: Arial, sans-serif; padding: 20px; }
.print-header { text-align: center; margin-bottom: 30px; border-bottom: 2px solid #333; padding-bottom: 20px; }
.print-result { font-size: 24px; font-weight: bold; text-align: center; margin: 30px 0; }
.print-confidence { text-align: center; margin: 20px 0; }
.print-recommendation { margin-top: 30px; padding: 20px; border: 1px solid #ccc; border-radius: 5px; }
.print-footer { margin-top: 30px; text-align: center; font-size: 12px; color: #666; }
@media print { body { -webkit-print-color-adjust: exact; } }";

/// Result fields copied into the print document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintableResult {
    pub stage: String,
    pub confidence: String,
    /// Markup taken verbatim from the result card
    pub recommendation_html: String,
}

/// Standalone printable document for a prediction result
pub fn print_document(result: &PrintableResult, date: NaiveDate) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Hasil Prediksi Diabetes" }
                style { (PreEscaped(PRINT_STYLE)) }
            }
            body {
                div class="print-header" {
                    h1 { "Sistem Prediksi Risiko Diabetes" }
                    p { "Tanggal: " (date.format("%-d/%-m/%Y")) }
                }
                div class="print-result" { (result.stage.trim()) }
                div class="print-confidence" {
                    "Tingkat Keyakinan Model: " (result.confidence.trim())
                }
                div class="print-recommendation" {
                    (PreEscaped(&result.recommendation_html))
                }
                div class="print-footer" {
                    p { "Hasil ini merupakan prediksi berdasarkan model machine learning dan bukan diagnosis medis." }
                    p { "Konsultasikan dengan profesional kesehatan untuk diagnosis yang akurat." }
                }
            }
        }
    }
}
