// File: src/event.rs
// Purpose: Events the assistant reacts to and the bindings it asks for

/// Kind of DOM event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    Input,
    Focus,
    Blur,
    KeyDown,
    PointerEnter,
    PointerLeave,
    Click,
}

impl EventKind {
    /// DOM event type name
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Input => "input",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::KeyDown => "keydown",
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::Click => "click",
        }
    }
}

/// What a listener is attached to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// The whole document
    Document,
    /// The prediction form
    Form,
    /// One control by name
    Field(String),
    /// Every `input` and `select`
    Controls,
    /// Every `textarea`
    TextAreas,
    /// Every element carrying a `title`
    Titled,
    /// Buttons carrying `data-form-action`
    ActionButtons,
}

/// A listener the assistant needs registered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub kind: EventKind,
    pub target: ListenTarget,
}

impl Binding {
    pub fn new(kind: EventKind, target: ListenTarget) -> Self {
        Self { kind, target }
    }
}

/// Capability that turns bindings into real listeners
pub trait EventSource {
    fn listen(&mut self, binding: &Binding);
}

/// Keyboard state at key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub(crate) fn is_submit_shortcut(&self) -> bool {
        self.ctrl && self.key == "Enter"
    }

    pub(crate) fn is_dismiss(&self) -> bool {
        self.key == "Escape"
    }
}

/// Utility button actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Print,
    Export,
}

impl FormAction {
    /// Value of the `data-form-action` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Export => "export",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "print" => Some(Self::Print),
            "export" => Some(Self::Export),
            _ => None,
        }
    }
}

/// One dispatched event, already translated from the DOM
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Submit,
    Input { field: String },
    Focus { field: String },
    Blur { field: String },
    KeyDown(KeyPress),
    /// Pointer entered an element with a `title`; page coordinates
    PointerEnter { title: String, x: f64, y: f64 },
    PointerLeave,
    Action(FormAction),
}

impl FormEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Submit => EventKind::Submit,
            Self::Input { .. } => EventKind::Input,
            Self::Focus { .. } => EventKind::Focus,
            Self::Blur { .. } => EventKind::Blur,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::PointerEnter { .. } => EventKind::PointerEnter,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::Action(_) => EventKind::Click,
        }
    }
}

/// What the dispatcher should do with the native event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Proceed,
    PreventDefault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shortcuts() {
        assert!(KeyPress::new("Enter").with_ctrl().is_submit_shortcut());
        assert!(!KeyPress::new("Enter").is_submit_shortcut());
        assert!(KeyPress::new("Escape").is_dismiss());
    }

    #[test]
    fn test_action_names() {
        assert_eq!(FormAction::parse(FormAction::Print.as_str()), Some(FormAction::Print));
        assert_eq!(FormAction::parse("share"), None);
        assert_eq!(FormEvent::Action(FormAction::Export).kind(), EventKind::Click);
    }
}
