// File: src/testing.rs
// Purpose: In-memory UiSurface with a virtual clock

//! [`MemorySurface`] models the handful of page elements the assistant
//! touches. Scheduled actions wait in a queue until [`MemorySurface::advance`]
//! moves the virtual clock past their due time.
//!
//! ```
//! use health_form::testing::MemorySurface;
//! use health_form::{FormAssistant, FormEvent};
//!
//! let mut page = MemorySurface::new()
//!     .with_form()
//!     .number_field("weight", "70")
//!     .number_field("height", "175")
//!     .number_field("bmi", "");
//! let mut assistant = FormAssistant::default();
//! assistant.handle(&mut page, FormEvent::Input { field: "height".into() });
//! assert_eq!(page.field_value("bmi"), Some("22.9"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::deferred::DeferredAction;
use crate::surface::{
    Content, FieldInfo, FieldKind, NewElement, Placement, ScrollBlock, Target, UiSurface,
    WindowHandle, RESULT_ACTIONS, RESULT_CARD, RESULT_CONFIDENCE, RESULT_RECOMMENDATION,
    RESULT_STAGE,
};

/// A form control
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryField {
    pub info: FieldInfo,
    pub title: Option<String>,
    pub classes: BTreeSet<String>,
    pub parent_classes: BTreeSet<String>,
    /// False for controls elsewhere on the page
    pub in_form: bool,
}

/// An element the assistant created
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    pub id: String,
    pub tag: String,
    pub classes: Vec<String>,
    pub styles: BTreeMap<String, String>,
    pub text: String,
    pub html: String,
    pub placement: Placement,
}

impl MemoryElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub html: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub stage: String,
    pub confidence: String,
    pub recommendation_html: String,
    /// Has a trailing `.text-center` button row
    pub has_actions: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryWindow {
    pub document: String,
    pub printed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: String,
    pub contents: String,
}

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    seq: u64,
    action: DeferredAction,
}

enum Resolved {
    Field(usize),
    Element(usize),
    Button,
    Card,
    CardStage,
    CardConfidence,
    CardRecommendation,
    CardActions,
}

/// In-memory page for driving the assistant without a browser
#[derive(Debug)]
pub struct MemorySurface {
    form: bool,
    fields: Vec<MemoryField>,
    focused: Option<String>,
    submit_button: Option<SubmitButton>,
    result_card: Option<ResultCard>,
    elements: Vec<MemoryElement>,
    windows: Vec<MemoryWindow>,
    popups_blocked: bool,
    downloads: Vec<Download>,
    submissions: usize,
    scrolls: Vec<(Target, ScrollBlock)>,
    element_width: f64,
    now: DateTime<FixedOffset>,
    clock: Duration,
    seq: u64,
    queue: Vec<Scheduled>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Empty page; the clock reads 2024-05-17 10:30 UTC+7
    pub fn new() -> Self {
        let now = FixedOffset::east_opt(7 * 3600)
            .and_then(|wib| wib.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).single())
            .unwrap_or_else(|| chrono::Utc::now().fixed_offset());
        Self {
            form: false,
            fields: Vec::new(),
            focused: None,
            submit_button: None,
            result_card: None,
            elements: Vec::new(),
            windows: Vec::new(),
            popups_blocked: false,
            downloads: Vec::new(),
            submissions: 0,
            scrolls: Vec::new(),
            element_width: 120.0,
            now,
            clock: Duration::ZERO,
            seq: 0,
            queue: Vec::new(),
        }
    }

    // -- Page builders --

    pub fn with_form(mut self) -> Self {
        self.form = true;
        self
    }

    fn push_field(self, name: &str, kind: FieldKind, value: &str, format_opt_out: bool) -> Self {
        self.push_control(name, kind, value, format_opt_out, true)
    }

    fn push_control(
        mut self,
        name: &str,
        kind: FieldKind,
        value: &str,
        format_opt_out: bool,
        in_form: bool,
    ) -> Self {
        self.fields.push(MemoryField {
            info: FieldInfo {
                name: name.to_string(),
                kind,
                value: value.to_string(),
                format_opt_out,
            },
            title: None,
            classes: BTreeSet::new(),
            parent_classes: BTreeSet::new(),
            in_form,
        });
        self
    }

    pub fn number_field(self, name: &str, value: &str) -> Self {
        self.push_field(name, FieldKind::Number, value, false)
    }

    /// Numeric input placed outside the form, such as a search box
    pub fn outside_number_field(self, name: &str, value: &str) -> Self {
        self.push_control(name, FieldKind::Number, value, false, false)
    }

    /// Numeric input carrying the `no-format` class
    pub fn unformatted_number_field(self, name: &str, value: &str) -> Self {
        self.push_field(name, FieldKind::Number, value, true)
    }

    pub fn text_field(self, name: &str, value: &str) -> Self {
        self.push_field(name, FieldKind::Input, value, false)
    }

    pub fn select_field(self, name: &str, value: &str) -> Self {
        self.push_field(name, FieldKind::Select, value, false)
    }

    pub fn textarea(self, name: &str, value: &str) -> Self {
        self.push_field(name, FieldKind::TextArea, value, false)
    }

    pub fn submit_button(mut self, html: &str) -> Self {
        self.submit_button = Some(SubmitButton {
            html: html.to_string(),
            disabled: false,
        });
        self
    }

    pub fn result_card(mut self, stage: &str, confidence: &str, recommendation_html: &str) -> Self {
        self.result_card = Some(ResultCard {
            stage: stage.to_string(),
            confidence: confidence.to_string(),
            recommendation_html: recommendation_html.to_string(),
            has_actions: true,
        });
        self
    }

    pub fn block_popups(mut self) -> Self {
        self.popups_blocked = true;
        self
    }

    pub fn at(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = now;
        self
    }

    pub fn element_width(mut self, width: f64) -> Self {
        self.element_width = width;
        self
    }

    // -- Interaction --

    /// Simulates the user typing a full value
    pub fn type_into(&mut self, name: &str, value: &str) {
        self.set_field_value(name, value);
    }

    pub fn focus(&mut self, name: &str) {
        self.focused = Some(name.to_string());
    }

    /// Runs every action due within `by`, in due order
    pub fn advance(&mut self, by: Duration) {
        let until = self.clock + by;
        loop {
            let next = self
                .queue
                .iter()
                .enumerate()
                .filter(|(_, s)| s.due <= until)
                .min_by_key(|(_, s)| (s.due, s.seq))
                .map(|(i, _)| i);
            let Some(index) = next else { break };
            let scheduled = self.queue.remove(index);
            self.clock = scheduled.due;
            scheduled.action.apply(self);
        }
        self.clock = until;
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    // -- Inspection --

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    pub fn field_state(&self, name: &str) -> Option<&MemoryField> {
        self.position(name).map(|i| &self.fields[i])
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.field_state(name).map(|f| f.info.value.as_str())
    }

    pub fn element(&self, id: &str) -> Option<&MemoryElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements_with_class(&self, class: &str) -> Vec<&MemoryElement> {
        self.elements.iter().filter(|e| e.has_class(class)).collect()
    }

    pub fn submit_button_state(&self) -> Option<&SubmitButton> {
        self.submit_button.as_ref()
    }

    pub fn windows(&self) -> &[MemoryWindow] {
        &self.windows
    }

    pub fn downloads(&self) -> &[Download] {
        &self.downloads
    }

    pub fn submissions(&self) -> usize {
        self.submissions
    }

    pub fn scrolls(&self) -> &[(Target, ScrollBlock)] {
        &self.scrolls
    }

    /// A control by name, preferring the one inside the form
    fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.in_form && f.info.name == name)
            .or_else(|| self.fields.iter().position(|f| f.info.name == name))
    }

    fn resolve(&self, target: &Target) -> Option<Resolved> {
        match target {
            Target::Field(name) => self.position(name).map(Resolved::Field),
            Target::Id(id) => self.elements.iter().position(|e| &e.id == id).map(Resolved::Element),
            Target::SubmitButton => self.submit_button.as_ref().map(|_| Resolved::Button),
            Target::Selector(selector) => self.resolve_selector(selector),
        }
    }

    fn resolve_selector(&self, selector: &str) -> Option<Resolved> {
        let card = self.result_card.as_ref();
        match selector {
            RESULT_CARD => card.map(|_| Resolved::Card),
            RESULT_STAGE => card.map(|_| Resolved::CardStage),
            RESULT_CONFIDENCE => card.map(|_| Resolved::CardConfidence),
            RESULT_RECOMMENDATION => card.map(|_| Resolved::CardRecommendation),
            RESULT_ACTIONS => card.filter(|c| c.has_actions).map(|_| Resolved::CardActions),
            _ => {
                let class = selector.strip_prefix('.')?;
                self.elements
                    .iter()
                    .position(|e| e.has_class(class))
                    .map(Resolved::Element)
            }
        }
    }
}

impl UiSurface for MemorySurface {
    fn has_form(&self) -> bool {
        self.form
    }

    fn fields(&self) -> Vec<FieldInfo> {
        self.fields.iter().map(|f| f.info.clone()).collect()
    }

    fn field(&self, name: &str) -> Option<FieldInfo> {
        self.field_state(name).map(|f| f.info.clone())
    }

    fn numeric_fields(&self) -> Vec<FieldInfo> {
        if !self.form {
            return Vec::new();
        }
        self.fields
            .iter()
            .filter(|f| f.in_form && f.info.kind == FieldKind::Number)
            .map(|f| f.info.clone())
            .collect()
    }

    fn form_entries(&self) -> Option<Vec<(String, String)>> {
        if !self.form {
            return None;
        }
        Some(
            self.fields
                .iter()
                .filter(|f| f.in_form)
                .map(|f| (f.info.name.clone(), f.info.value.clone()))
                .collect(),
        )
    }

    fn focused_field(&self) -> Option<FieldInfo> {
        let name = self.focused.as_deref()?;
        self.field(name)
    }

    fn exists(&self, target: &Target) -> bool {
        self.resolve(target).is_some()
    }

    fn text(&self, target: &Target) -> Option<String> {
        let card = self.result_card.as_ref();
        match self.resolve(target)? {
            Resolved::Field(i) => Some(self.fields[i].info.value.clone()),
            Resolved::Element(i) => Some(self.elements[i].text.clone()),
            Resolved::Button => self.submit_button.as_ref().map(|b| b.html.clone()),
            Resolved::CardStage => card.map(|c| c.stage.clone()),
            Resolved::CardConfidence => card.map(|c| c.confidence.clone()),
            Resolved::CardRecommendation => card.map(|c| c.recommendation_html.clone()),
            Resolved::Card | Resolved::CardActions => Some(String::new()),
        }
    }

    fn inner_html(&self, target: &Target) -> Option<String> {
        let card = self.result_card.as_ref();
        match self.resolve(target)? {
            Resolved::Element(i) => Some(self.elements[i].html.clone()),
            Resolved::Button => self.submit_button.as_ref().map(|b| b.html.clone()),
            Resolved::CardRecommendation => card.map(|c| c.recommendation_html.clone()),
            _ => self.text(target),
        }
    }

    fn width(&self, target: &Target) -> f64 {
        match self.resolve(target) {
            Some(Resolved::Element(_)) => self.element_width,
            _ => 0.0,
        }
    }

    fn set_field_value(&mut self, name: &str, value: &str) {
        if let Some(i) = self.position(name) {
            self.fields[i].info.value = value.to_string();
        }
    }

    fn set_title(&mut self, target: &Target, title: &str) {
        if let Some(Resolved::Field(i)) = self.resolve(target) {
            self.fields[i].title = Some(title.to_string());
        }
    }

    fn set_text(&mut self, target: &Target, text: &str) {
        if let Some(Resolved::Element(i)) = self.resolve(target) {
            self.elements[i].text = text.to_string();
        }
    }

    fn set_inner_html(&mut self, target: &Target, html: &str) {
        match self.resolve(target) {
            Some(Resolved::Element(i)) => self.elements[i].html = html.to_string(),
            Some(Resolved::Button) => {
                if let Some(button) = self.submit_button.as_mut() {
                    button.html = html.to_string();
                }
            }
            _ => {}
        }
    }

    fn set_disabled(&mut self, target: &Target, disabled: bool) {
        if let (Some(Resolved::Button), Some(button)) = (self.resolve(target), self.submit_button.as_mut()) {
            button.disabled = disabled;
        }
    }

    fn add_classes(&mut self, target: &Target, classes: &[&str]) {
        match self.resolve(target) {
            Some(Resolved::Field(i)) => {
                self.fields[i].classes.extend(classes.iter().map(|c| c.to_string()));
            }
            Some(Resolved::Element(i)) => {
                let element = &mut self.elements[i];
                for class in classes {
                    if !element.has_class(class) {
                        element.classes.push(class.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    fn remove_classes(&mut self, target: &Target, classes: &[&str]) {
        match self.resolve(target) {
            Some(Resolved::Field(i)) => {
                for class in classes {
                    self.fields[i].classes.remove(*class);
                }
            }
            Some(Resolved::Element(i)) => {
                self.elements[i].classes.retain(|c| !classes.contains(&c.as_str()));
            }
            _ => {}
        }
    }

    fn add_parent_classes(&mut self, target: &Target, classes: &[&str]) {
        if let Some(Resolved::Field(i)) = self.resolve(target) {
            self.fields[i]
                .parent_classes
                .extend(classes.iter().map(|c| c.to_string()));
        }
    }

    fn remove_parent_classes(&mut self, target: &Target, classes: &[&str]) {
        if let Some(Resolved::Field(i)) = self.resolve(target) {
            for class in classes {
                self.fields[i].parent_classes.remove(*class);
            }
        }
    }

    fn set_style(&mut self, target: &Target, property: &str, value: &str) {
        if let Some(Resolved::Element(i)) = self.resolve(target) {
            self.elements[i]
                .styles
                .insert(property.to_string(), value.to_string());
        }
    }

    fn scroll_into_view(&mut self, target: &Target, block: ScrollBlock) {
        if self.exists(target) {
            self.scrolls.push((target.clone(), block));
        }
    }

    fn insert(&mut self, element: NewElement, placement: Placement) -> bool {
        let anchored = match &placement {
            Placement::BeforeForm => self.form,
            Placement::AppendToBody => true,
            Placement::AppendToParentOf(target) | Placement::BeforeFirstButtonIn(target) => {
                self.exists(target)
            }
        };
        if !anchored {
            return false;
        }

        let (text, html) = match element.content {
            Content::Text(text) => (text.clone(), text),
            Content::Html(html) => (String::new(), html),
        };
        self.elements.push(MemoryElement {
            id: element.id,
            tag: element.tag.to_string(),
            classes: element.class.split_whitespace().map(str::to_string).collect(),
            styles: BTreeMap::new(),
            text,
            html,
            placement,
        });
        true
    }

    fn remove(&mut self, target: &Target) -> bool {
        match self.resolve(target) {
            Some(Resolved::Element(i)) => {
                self.elements.remove(i);
                true
            }
            _ => false,
        }
    }

    fn open_window(&mut self, document: &str) -> Option<WindowHandle> {
        if self.popups_blocked {
            return None;
        }
        self.windows.push(MemoryWindow {
            document: document.to_string(),
            printed: false,
        });
        Some(WindowHandle((self.windows.len() - 1) as u32))
    }

    fn print_window(&mut self, window: WindowHandle) {
        if let Some(w) = self.windows.get_mut(window.0 as usize) {
            w.printed = true;
        }
    }

    fn download(&mut self, file_name: &str, mime: &str, contents: &str) {
        self.downloads.push(Download {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            contents: contents.to_string(),
        });
    }

    fn submit_form(&mut self) {
        if self.form {
            self.submissions += 1;
        }
    }

    fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        self.seq += 1;
        self.queue.push(Scheduled {
            due: self.clock + delay,
            seq: self.seq,
            action,
        });
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}
