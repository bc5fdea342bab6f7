//! DOM listener registration for assistant bindings

use health_form::{
    Binding, EventKind, EventOutcome, EventSource, FormAction, FormEvent, KeyPress, ListenTarget,
    Target,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Element, Event, EventTarget, KeyboardEvent, MouseEvent};

use crate::dom::{field_name, WebSurface};

/// Translates a native event into what the assistant understands
fn translate(kind: EventKind, event: &Event) -> Option<FormEvent> {
    let element = event
        .current_target()
        .and_then(|target| target.dyn_into::<Element>().ok());

    match kind {
        EventKind::Submit => Some(FormEvent::Submit),
        EventKind::Input => Some(FormEvent::Input {
            field: field_name(&element?)?,
        }),
        EventKind::Focus => Some(FormEvent::Focus {
            field: field_name(&element?)?,
        }),
        EventKind::Blur => Some(FormEvent::Blur {
            field: field_name(&element?)?,
        }),
        EventKind::KeyDown => event.dyn_ref::<KeyboardEvent>().map(|key| {
            FormEvent::KeyDown(KeyPress {
                key: key.key(),
                ctrl: key.ctrl_key(),
            })
        }),
        EventKind::PointerEnter => {
            let title = element?.get_attribute("title")?;
            let pointer = event.dyn_ref::<MouseEvent>()?;
            Some(FormEvent::PointerEnter {
                title,
                x: f64::from(pointer.page_x()),
                y: f64::from(pointer.page_y()),
            })
        }
        EventKind::PointerLeave => Some(FormEvent::PointerLeave),
        EventKind::Click => element?
            .get_attribute("data-form-action")
            .and_then(|action| FormAction::parse(&action))
            .map(FormEvent::Action),
    }
}

/// Registers bindings as real listeners on the page
pub struct WebEventSource {
    surface: WebSurface,
}

impl WebEventSource {
    pub fn new(surface: WebSurface) -> Self {
        Self { surface }
    }

    fn targets(&self, target: &ListenTarget) -> Vec<EventTarget> {
        let elements = match target {
            ListenTarget::Document => return vec![self.surface.document().clone().into()],
            ListenTarget::Form => self.surface.form().map(Element::from).into_iter().collect(),
            ListenTarget::Field(name) => self
                .surface
                .element(&Target::field(name.as_str()))
                .into_iter()
                .collect(),
            ListenTarget::Controls => self.surface.query_all("input, select"),
            ListenTarget::TextAreas => self.surface.query_all("textarea"),
            ListenTarget::Titled => self.surface.query_all("[title]"),
            ListenTarget::ActionButtons => self.surface.query_all("[data-form-action]"),
        };
        elements.into_iter().map(EventTarget::from).collect()
    }
}

impl EventSource for WebEventSource {
    fn listen(&mut self, binding: &Binding) {
        let kind = binding.kind;
        for target in self.targets(&binding.target) {
            let handler = Closure::wrap(Box::new(move |event: Event| {
                let Some(form_event) = translate(kind, &event) else {
                    return;
                };
                if crate::dispatch(form_event) == Some(EventOutcome::PreventDefault) {
                    event.prevent_default();
                }
            }) as Box<dyn FnMut(_)>);

            if target
                .add_event_listener_with_callback(kind.dom_name(), handler.as_ref().unchecked_ref())
                .is_err()
            {
                console::warn_1(&format!("health-form: could not listen for {}", kind.dom_name()).into());
            }
            // Listeners live as long as the page
            handler.forget();
        }
    }
}
