// File: src/assistant.rs
// Purpose: FormAssistant, the event handlers of the prediction form

use std::collections::HashMap;

use health_form_validation::{
    format_for_display, recompute_bmi, validate_submission, ConstraintTable, ValidationResult,
};
use tracing::{debug, info};

use crate::config::AssistantConfig;
use crate::deferred::DeferredAction;
use crate::event::{
    Binding, EventKind, EventOutcome, EventSource, FormAction, FormEvent, KeyPress, ListenTarget,
};
use crate::markup;
use crate::surface::{
    Content, FieldInfo, FieldKind, NewElement, Placement, ScrollBlock, Target, UiSurface, RESULT_ACTIONS,
    RESULT_CARD,
};

const HIGHLIGHT_CLASSES: &[&str] = &["border-red-500", "bg-red-50"];
const FOCUS_CLASSES: &[&str] = &["scale-105", "transition-transform", "duration-300"];
const FOCUS_SCALE: &[&str] = &["scale-105"];

/// Class shared by every validation banner; also the selector used to
/// replace an existing one
pub const BANNER_CLASS: &str = "validation-error-alert";
const BANNER_STYLE: &str = "p-4 mb-6 bg-red-50 border-l-4 border-red-500 rounded-lg";

pub const TOOLTIP_ID: &str = "custom-tooltip";
const TOOLTIP_CLASS: &str = "absolute z-50 px-3 py-2 text-sm text-white bg-gray-900 rounded-lg shadow-lg";
const TOOLTIP_OFFSET_Y: f64 = 40.0;

pub const UTILITY_ROW_ID: &str = "result-utility-actions";
const UTILITY_ROW_CLASS: &str = "flex justify-center gap-4 mt-4";

const COUNTER_CLASS: &str = "text-xs text-gray-500 text-right mt-1";

const DIET_SCORE_HINT: &str = "1 = Pola makan sangat buruk\n10 = Pola makan sangat sehat dan seimbang";
const HBA1C_HINT: &str = "Normal: <5.7%\nPre-Diabetes: 5.7-6.4%\nDiabetes: ≥6.5%";

/// Id of the character counter attached to a textarea
pub fn counter_id(field: &str) -> String {
    format!("{}-char-counter", field)
}

/// Grouped text written on blur and the value it replaced
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupedValue {
    shown: String,
    raw: String,
}

/// Behaviour layer of the prediction form.
///
/// Every handler reads the surface, mutates it, and schedules whatever has
/// to happen later. The only page state kept here is the raw value behind
/// each field currently showing grouped text.
#[derive(Debug, Clone)]
pub struct FormAssistant {
    pub(crate) config: AssistantConfig,
    constraints: ConstraintTable,
    /// Suffix for generated element ids (banners, toasts)
    pub(crate) seq: u64,
    grouped: HashMap<String, GroupedValue>,
}

impl FormAssistant {
    /// Assistant with the diabetes screening constraints
    pub fn new(config: AssistantConfig) -> Self {
        Self::with_constraints(config, ConstraintTable::diabetes_screening())
    }

    pub fn with_constraints(config: AssistantConfig, constraints: ConstraintTable) -> Self {
        Self {
            config,
            constraints,
            seq: 0,
            grouped: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintTable {
        &self.constraints
    }

    pub(crate) fn next_id(&mut self, prefix: &str) -> String {
        self.seq += 1;
        format!("{}-{}", prefix, self.seq)
    }

    /// One-time page preparation, then the listeners to register
    pub fn mount<S: UiSurface + ?Sized>(&self, surface: &mut S) -> Vec<Binding> {
        self.apply_field_hints(surface);
        self.attach_textarea_counters(surface);
        self.add_utility_buttons(surface);
        self.bindings(surface)
    }

    /// Mounts the page and registers every binding with `source`
    pub fn attach<S, E>(&self, surface: &mut S, source: &mut E) -> Vec<Binding>
    where
        S: UiSurface + ?Sized,
        E: EventSource + ?Sized,
    {
        let bindings = self.mount(surface);
        for binding in &bindings {
            source.listen(binding);
        }
        debug!(count = bindings.len(), "form listeners registered");
        bindings
    }

    /// Listeners needed for what the surface currently contains
    pub fn bindings<S: UiSurface + ?Sized>(&self, surface: &S) -> Vec<Binding> {
        let mut bindings = vec![
            Binding::new(EventKind::Focus, ListenTarget::Controls),
            Binding::new(EventKind::Blur, ListenTarget::Controls),
        ];

        if surface.has_form() {
            bindings.push(Binding::new(EventKind::Submit, ListenTarget::Form));
        }

        let form = &self.config.form;
        let bmi_inputs = [&form.weight_field, &form.height_field, &form.bmi_field];
        if bmi_inputs.iter().all(|name| surface.field(name).is_some()) {
            for source in [&form.weight_field, &form.height_field] {
                bindings.push(Binding::new(
                    EventKind::Input,
                    ListenTarget::Field(source.clone()),
                ));
            }
        }

        if surface.fields().iter().any(|f| f.kind == FieldKind::TextArea) {
            bindings.push(Binding::new(EventKind::Input, ListenTarget::TextAreas));
        }

        bindings.extend([
            Binding::new(EventKind::KeyDown, ListenTarget::Document),
            Binding::new(EventKind::PointerEnter, ListenTarget::Titled),
            Binding::new(EventKind::PointerLeave, ListenTarget::Titled),
            Binding::new(EventKind::Click, ListenTarget::ActionButtons),
        ]);
        bindings
    }

    /// Dispatch one event
    pub fn handle<S: UiSurface + ?Sized>(&mut self, surface: &mut S, event: FormEvent) -> EventOutcome {
        match event {
            FormEvent::Submit => return self.on_submit(surface),
            FormEvent::Input { field } => self.on_input(surface, &field),
            FormEvent::Focus { field } => self.on_focus(surface, &field),
            FormEvent::Blur { field } => self.on_blur(surface, &field),
            FormEvent::KeyDown(key) => self.on_key_down(surface, &key),
            FormEvent::PointerEnter { title, x, y } => self.show_tooltip(surface, &title, x, y),
            FormEvent::PointerLeave => self.hide_tooltip(surface),
            FormEvent::Action(FormAction::Print) => {
                self.print_results(surface);
            }
            FormEvent::Action(FormAction::Export) => {
                self.export_data(surface);
            }
        }
        EventOutcome::Proceed
    }

    /// Validates the form's numeric inputs.
    ///
    /// A field still showing the grouped text written on blur is checked
    /// against the value it replaced.
    pub fn validate<S: UiSurface + ?Sized>(&self, surface: &S) -> ValidationResult {
        let fields = surface.numeric_fields().into_iter().map(|f| {
            let value = self.raw_value(&f);
            (f.name, value)
        });
        validate_submission(&self.constraints, fields)
    }

    /// The value a field stands for: its recorded raw value while it still
    /// shows the grouped text, otherwise its text as typed
    fn raw_value(&self, field: &FieldInfo) -> String {
        match self.grouped.get(&field.name) {
            Some(grouped) if grouped.shown == field.value => grouped.raw.clone(),
            _ => field.value.clone(),
        }
    }

    /// Gate for the form's submit event
    pub fn on_submit<S: UiSurface + ?Sized>(&mut self, surface: &mut S) -> EventOutcome {
        let result = self.validate(surface);
        if !result.is_valid {
            info!(violations = result.violations.len(), "submission blocked");
            for field in result.failed_fields() {
                self.highlight_error(surface, field);
            }
            self.show_validation_error(surface, &result.messages);
            return EventOutcome::PreventDefault;
        }

        self.start_busy_indicator(surface);
        EventOutcome::Proceed
    }

    fn highlight_error<S: UiSurface + ?Sized>(&self, surface: &mut S, field: &str) {
        let target = Target::field(field);
        surface.add_classes(&target, HIGHLIGHT_CLASSES);
        surface.scroll_into_view(&target, ScrollBlock::Center);
        surface.schedule(
            self.config.timing.highlight(),
            DeferredAction::remove_classes(target, HIGHLIGHT_CLASSES),
        );
    }

    /// Replaces any banner with one listing `messages`, then fades and
    /// removes it on a timer.
    pub fn show_validation_error<S: UiSurface + ?Sized>(&mut self, surface: &mut S, messages: &[String]) {
        let existing = Target::selector(format!(".{}", BANNER_CLASS));
        while surface.remove(&existing) {}

        let id = self.next_id(BANNER_CLASS);
        let banner = NewElement {
            tag: "div",
            id: id.clone(),
            class: format!("{} {}", BANNER_CLASS, BANNER_STYLE),
            content: Content::Html(markup::validation_banner(messages).into_string()),
        };
        if !surface.insert(banner, Placement::BeforeForm) {
            debug!("no form to anchor the validation banner");
            return;
        }

        let target = Target::Id(id);
        surface.scroll_into_view(&target, ScrollBlock::Start);

        let timing = &self.config.timing;
        let fade = DeferredAction::set_styles(
            target.clone(),
            &[("opacity", "0"), ("transition", "opacity 0.5s")],
        );
        surface.schedule(
            timing.banner(),
            fade.then(timing.banner_fade(), DeferredAction::Remove(target)),
        );
    }

    fn start_busy_indicator<S: UiSurface + ?Sized>(&self, surface: &mut S) {
        let button = Target::SubmitButton;
        let Some(original) = surface.inner_html(&button) else {
            debug!("no submit button, skipping busy indicator");
            return;
        };
        surface.set_inner_html(&button, &markup::busy_button().into_string());
        surface.set_disabled(&button, true);

        let timing = &self.config.timing;
        let scroll = DeferredAction::ScrollIntoView {
            target: Target::selector(RESULT_CARD),
            block: ScrollBlock::Start,
        };
        let restore = DeferredAction::Restore {
            target: button,
            html: original,
        };
        surface.schedule(timing.scroll_delay(), scroll.then(timing.busy_restore(), restore));
    }

    fn on_input<S: UiSurface + ?Sized>(&self, surface: &mut S, field: &str) {
        let form = &self.config.form;
        if field == form.weight_field || field == form.height_field {
            self.recompute_bmi(surface);
            return;
        }
        if let Some(info) = surface.field(field) {
            if info.kind == FieldKind::TextArea {
                let count = info.value.chars().count();
                surface.set_text(&Target::id(counter_id(field)), &format!("{} karakter", count));
            }
        }
    }

    /// Rewrites the BMI input from weight and height.
    ///
    /// Returns the value written, or `None` when the inputs are missing or
    /// not positive and the previous BMI is kept.
    pub fn recompute_bmi<S: UiSurface + ?Sized>(&self, surface: &mut S) -> Option<String> {
        let form = &self.config.form;
        let weight = self.editable_value(surface, &form.weight_field)?;
        let height = self.editable_value(surface, &form.height_field)?;
        let bmi = recompute_bmi(&weight, &height)?;
        surface.set_field_value(&form.bmi_field, &bmi);
        Some(bmi)
    }

    fn editable_value<S: UiSurface + ?Sized>(&self, surface: &S, name: &str) -> Option<String> {
        surface.field(name).map(|info| self.raw_value(&info))
    }

    fn on_focus<S: UiSurface + ?Sized>(&mut self, surface: &mut S, field: &str) {
        surface.add_parent_classes(&Target::field(field), FOCUS_CLASSES);

        let Some(grouped) = self.grouped.remove(field) else {
            return;
        };
        // Text edited since blur is left as it is
        if surface.field(field).is_some_and(|info| info.value == grouped.shown) {
            surface.set_field_value(field, &grouped.raw);
        }
    }

    fn on_blur<S: UiSurface + ?Sized>(&mut self, surface: &mut S, field: &str) {
        surface.remove_parent_classes(&Target::field(field), FOCUS_SCALE);

        if !self.config.format.enabled {
            return;
        }
        let Some(info) = surface.field(field).filter(|f| f.is_formatted()) else {
            return;
        };
        if self.grouped.get(field).is_some_and(|g| g.shown == info.value) {
            return;
        }
        if let Some(shown) = format_for_display(&info.value, self.config.format.locale) {
            surface.set_field_value(field, &shown);
            self.grouped.insert(
                field.to_string(),
                GroupedValue {
                    shown,
                    raw: info.value,
                },
            );
        }
    }

    fn on_key_down<S: UiSurface + ?Sized>(&mut self, surface: &mut S, key: &KeyPress) {
        if key.is_submit_shortcut() && surface.has_form() {
            if self.on_submit(surface) == EventOutcome::Proceed {
                surface.submit_form();
            }
        }
        if key.is_dismiss() {
            if let Some(focused) = surface.focused_field().filter(|f| f.is_clearable()) {
                surface.set_field_value(&focused.name, "");
            }
        }
    }

    fn show_tooltip<S: UiSurface + ?Sized>(&self, surface: &mut S, title: &str, x: f64, y: f64) {
        if title.is_empty() {
            return;
        }
        let target = Target::id(TOOLTIP_ID);
        surface.remove(&target);

        let tooltip = NewElement {
            tag: "div",
            id: TOOLTIP_ID.to_string(),
            class: TOOLTIP_CLASS.to_string(),
            content: Content::Text(title.to_string()),
        };
        if !surface.insert(tooltip, Placement::AppendToBody) {
            return;
        }
        let width = surface.width(&target);
        surface.set_style(&target, "top", &format!("{}px", y - TOOLTIP_OFFSET_Y));
        surface.set_style(&target, "left", &format!("{}px", x - width / 2.0));
    }

    fn hide_tooltip<S: UiSurface + ?Sized>(&self, surface: &mut S) {
        surface.remove(&Target::id(TOOLTIP_ID));
    }

    fn apply_field_hints<S: UiSurface + ?Sized>(&self, surface: &mut S) {
        for (field, hint) in [("diet_score", DIET_SCORE_HINT), ("hba1c", HBA1C_HINT)] {
            if surface.field(field).is_some() {
                surface.set_title(&Target::field(field), hint);
            }
        }
    }

    fn attach_textarea_counters<S: UiSurface + ?Sized>(&self, surface: &mut S) {
        let textareas: Vec<_> = surface
            .fields()
            .into_iter()
            .filter(|f| f.kind == FieldKind::TextArea)
            .collect();

        for textarea in textareas {
            let id = counter_id(&textarea.name);
            if surface.exists(&Target::id(id.clone())) {
                continue;
            }
            let counter = NewElement {
                tag: "div",
                id,
                class: COUNTER_CLASS.to_string(),
                content: Content::Text(format!("{} karakter", textarea.value.chars().count())),
            };
            surface.insert(counter, Placement::AppendToParentOf(Target::field(textarea.name)));
        }
    }

    fn add_utility_buttons<S: UiSurface + ?Sized>(&self, surface: &mut S) {
        let container = Target::selector(RESULT_ACTIONS);
        if !surface.exists(&container) || surface.exists(&Target::id(UTILITY_ROW_ID)) {
            return;
        }
        let row = NewElement {
            tag: "div",
            id: UTILITY_ROW_ID.to_string(),
            class: UTILITY_ROW_CLASS.to_string(),
            content: Content::Html(markup::utility_buttons().into_string()),
        };
        surface.insert(row, Placement::BeforeFirstButtonIn(container));
    }
}

impl Default for FormAssistant {
    fn default() -> Self {
        Self::new(AssistantConfig::default())
    }
}
