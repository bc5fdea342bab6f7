// Health Form - behaviour layer of the diabetes prediction form
// Validation gate, derived BMI, number display, print/export and notifications

pub mod actions;
pub mod assistant;
pub mod config;
pub mod deferred;
pub mod event;
pub mod markup;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export the assistant and its capabilities
pub use actions::{export_payload, Severity};
pub use assistant::FormAssistant;
pub use config::AssistantConfig;
pub use deferred::DeferredAction;
pub use event::{Binding, EventKind, EventOutcome, EventSource, FormAction, FormEvent, KeyPress, ListenTarget};
pub use surface::{Content, FieldInfo, FieldKind, NewElement, Placement, ScrollBlock, Target, UiSurface, WindowHandle};

// Re-export validation rules
pub use health_form_validation as validation;
pub use health_form_validation::{ConstraintTable, FieldConstraint, NumberLocale, ValidationResult};
