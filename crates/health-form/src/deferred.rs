// File: src/deferred.rs
// Purpose: Fire-and-forget page mutations scheduled after a delay

use std::time::Duration;

use tracing::debug;

use crate::surface::{ScrollBlock, Target, UiSurface, WindowHandle};

/// A page mutation to run later.
///
/// Values are plain data so a surface can hold them until its timer fires
/// and then call [`DeferredAction::apply`]. Missing targets are skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    AddClasses {
        target: Target,
        classes: Vec<String>,
    },
    RemoveClasses {
        target: Target,
        classes: Vec<String>,
    },
    SetStyles {
        target: Target,
        styles: Vec<(String, String)>,
    },
    Remove(Target),
    ScrollIntoView {
        target: Target,
        block: ScrollBlock,
    },
    /// Put saved markup back into a control and enable it
    Restore {
        target: Target,
        html: String,
    },
    Print(WindowHandle),
    /// Schedule another action
    After {
        delay: Duration,
        action: Box<DeferredAction>,
    },
    All(Vec<DeferredAction>),
}

impl DeferredAction {
    pub fn add_classes(target: Target, classes: &[&str]) -> Self {
        Self::AddClasses {
            target,
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn remove_classes(target: Target, classes: &[&str]) -> Self {
        Self::RemoveClasses {
            target,
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn set_styles(target: Target, styles: &[(&str, &str)]) -> Self {
        Self::SetStyles {
            target,
            styles: styles
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Chain: run `self`, then `next` after `delay`
    pub fn then(self, delay: Duration, next: DeferredAction) -> Self {
        Self::All(vec![
            self,
            Self::After {
                delay,
                action: Box::new(next),
            },
        ])
    }

    pub fn apply<S: UiSurface + ?Sized>(self, surface: &mut S) {
        match self {
            Self::AddClasses { target, classes } => {
                let classes: Vec<&str> = classes.iter().map(String::as_str).collect();
                surface.add_classes(&target, &classes);
            }
            Self::RemoveClasses { target, classes } => {
                let classes: Vec<&str> = classes.iter().map(String::as_str).collect();
                surface.remove_classes(&target, &classes);
            }
            Self::SetStyles { target, styles } => {
                if !surface.exists(&target) {
                    debug!(?target, "deferred style change skipped, target gone");
                    return;
                }
                for (property, value) in &styles {
                    surface.set_style(&target, property, value);
                }
            }
            Self::Remove(target) => {
                if !surface.remove(&target) {
                    debug!(?target, "deferred removal found nothing");
                }
            }
            Self::ScrollIntoView { target, block } => {
                if surface.exists(&target) {
                    surface.scroll_into_view(&target, block);
                }
            }
            Self::Restore { target, html } => {
                surface.set_inner_html(&target, &html);
                surface.set_disabled(&target, false);
            }
            Self::Print(window) => surface.print_window(window),
            Self::After { delay, action } => surface.schedule(delay, *action),
            Self::All(actions) => {
                for action in actions {
                    action.apply(&mut *surface);
                }
            }
        }
    }
}
