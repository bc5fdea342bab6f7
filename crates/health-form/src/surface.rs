// File: src/surface.rs
// Purpose: The UI surface capability the assistant drives

//! Everything the assistant does to the page goes through [`UiSurface`].
//!
//! The browser binding implements it over the live DOM; tests use
//! `testing::MemorySurface`. Every mutating method must treat a
//! missing target as a no-op.

use chrono::{DateTime, FixedOffset};
use std::time::Duration;

use crate::deferred::DeferredAction;

/// Selector of the card that holds a prediction result
pub const RESULT_CARD: &str = ".result-card";
/// Headline inside the result card
pub const RESULT_STAGE: &str = ".result-card .result-stage-text";
/// Confidence value inside the result card
pub const RESULT_CONFIDENCE: &str = ".result-card .confidence-value";
/// Recommendation markup inside the result card
pub const RESULT_RECOMMENDATION: &str = ".result-card .result-recommendation";
/// Trailing button row of the result card
pub const RESULT_ACTIONS: &str = ".result-card .text-center:last-child";
/// Class that opts a numeric input out of display formatting
pub const NO_FORMAT_CLASS: &str = "no-format";

/// Addresses one element of the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Form control by `name` (falling back to `id`)
    Field(String),
    /// Element by `id`
    Id(String),
    /// First element matching a CSS selector
    Selector(String),
    /// The form's `button[type="submit"]`
    SubmitButton,
}

impl Target {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }
}

/// Kind of form control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `input[type="number"]`
    Number,
    /// Any other `input`
    Input,
    Select,
    TextArea,
}

/// Snapshot of one form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    /// Carries the `no-format` class
    pub format_opt_out: bool,
}

impl FieldInfo {
    /// Numeric input that takes part in display formatting
    pub fn is_formatted(&self) -> bool {
        self.kind == FieldKind::Number && !self.format_opt_out
    }

    /// Cleared by the dismissal key
    pub fn is_clearable(&self) -> bool {
        matches!(self.kind, FieldKind::Number | FieldKind::Input | FieldKind::Select)
    }
}

/// Vertical alignment when scrolling an element into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
}

/// Element to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewElement {
    pub tag: &'static str,
    pub id: String,
    pub class: String,
    pub content: Content,
}

/// Body of a created element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Html(String),
}

/// Where a created element goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Sibling immediately before the form
    BeforeForm,
    /// Last child of `<body>`
    AppendToBody,
    /// Last child of the target's parent
    AppendToParentOf(Target),
    /// Inside the target, before its first `<button>`
    BeforeFirstButtonIn(Target),
}

/// Opaque handle of a window opened for printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u32);

/// Injectable stand-in for the document tree
pub trait UiSurface {
    /// True when the prediction form exists
    fn has_form(&self) -> bool;

    /// All `input`, `select` and `textarea` controls in document order
    fn fields(&self) -> Vec<FieldInfo>;

    /// Named entries of the form in document order, `None` without a form
    fn form_entries(&self) -> Option<Vec<(String, String)>>;

    fn field(&self, name: &str) -> Option<FieldInfo> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// Numeric inputs inside the form, in document order
    fn numeric_fields(&self) -> Vec<FieldInfo>;

    /// Focused `input`/`select`/`textarea`, if any
    fn focused_field(&self) -> Option<FieldInfo>;

    fn exists(&self, target: &Target) -> bool;

    fn text(&self, target: &Target) -> Option<String>;

    fn inner_html(&self, target: &Target) -> Option<String>;

    /// Rendered width in CSS pixels (0 when unknown)
    fn width(&self, target: &Target) -> f64;

    fn set_field_value(&mut self, name: &str, value: &str);

    fn set_title(&mut self, target: &Target, title: &str);

    fn set_text(&mut self, target: &Target, text: &str);

    fn set_inner_html(&mut self, target: &Target, html: &str);

    fn set_disabled(&mut self, target: &Target, disabled: bool);

    fn add_classes(&mut self, target: &Target, classes: &[&str]);

    fn remove_classes(&mut self, target: &Target, classes: &[&str]);

    /// Class change on the target's parent element
    fn add_parent_classes(&mut self, target: &Target, classes: &[&str]);

    fn remove_parent_classes(&mut self, target: &Target, classes: &[&str]);

    fn set_style(&mut self, target: &Target, property: &str, value: &str);

    fn scroll_into_view(&mut self, target: &Target, block: ScrollBlock);

    /// Returns false when the placement anchor is missing
    fn insert(&mut self, element: NewElement, placement: Placement) -> bool;

    /// Returns false when nothing was removed
    fn remove(&mut self, target: &Target) -> bool;

    /// Opens a new window holding `document`
    fn open_window(&mut self, document: &str) -> Option<WindowHandle>;

    fn print_window(&mut self, window: WindowHandle);

    /// Offers `contents` as a file download
    fn download(&mut self, file_name: &str, mime: &str, contents: &str);

    /// Submits the form without firing submit listeners
    fn submit_form(&mut self);

    /// Runs `action` once after `delay`; fire and forget
    fn schedule(&mut self, delay: Duration, action: DeferredAction);

    /// Wall clock with the user's UTC offset
    fn now(&self) -> DateTime<FixedOffset>;
}
