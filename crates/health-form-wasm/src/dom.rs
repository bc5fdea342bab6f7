//! `UiSurface` over the live document

use std::cell::RefCell;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local};
use health_form::surface::NO_FORMAT_CLASS;
use health_form::{
    Content, DeferredAction, FieldInfo, FieldKind, NewElement, Placement, ScrollBlock, Target,
    UiSurface, WindowHandle,
};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, Blob, BlobPropertyBag, Document, Element, FormData, HtmlAnchorElement, HtmlDocument,
    HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Node,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Url, Window,
};

thread_local! {
    /// Print windows, indexed by `WindowHandle`
    static WINDOWS: RefCell<Vec<Window>> = const { RefCell::new(Vec::new()) };
}

/// Name a control is known by: `name`, falling back to `id`
pub(crate) fn field_name(element: &Element) -> Option<String> {
    element
        .get_attribute("name")
        .filter(|name| !name.is_empty())
        .or_else(|| Some(element.id()).filter(|id| !id.is_empty()))
}

fn control_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    element.dyn_ref::<HtmlTextAreaElement>().map(|t| t.value())
}

fn set_control_value(element: &Element, value: &str) {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    } else if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
        textarea.set_value(value);
    }
}

fn field_kind(element: &Element) -> Option<FieldKind> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        // `type_` reflects the attribute in any letter case
        return Some(if input.type_().eq_ignore_ascii_case("number") {
            FieldKind::Number
        } else {
            FieldKind::Input
        });
    }
    if element.is_instance_of::<HtmlSelectElement>() {
        return Some(FieldKind::Select);
    }
    element
        .is_instance_of::<HtmlTextAreaElement>()
        .then_some(FieldKind::TextArea)
}

fn field_info(element: &Element) -> Option<FieldInfo> {
    let kind = field_kind(element)?;
    Some(FieldInfo {
        name: field_name(element)?,
        kind,
        value: control_value(element)?,
        format_opt_out: element.class_list().contains(NO_FORMAT_CLASS),
    })
}

/// The browser page the assistant drives
#[derive(Debug, Clone)]
pub struct WebSurface {
    window: Window,
    document: Document,
    form_id: String,
}

impl WebSurface {
    /// `None` outside a browser window
    pub fn new(form_id: &str) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            form_id: form_id.to_string(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn form(&self) -> Option<HtmlFormElement> {
        self.document
            .get_element_by_id(&self.form_id)?
            .dyn_into::<HtmlFormElement>()
            .ok()
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// Every element matching `selector`, in document order
    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Controls inside the form, in document order
    fn form_controls(&self) -> Vec<Element> {
        let Some(list) = self
            .form()
            .and_then(|form| form.query_selector_all("input, select, textarea").ok())
        else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// A control by name, looked up inside the form before the rest of the page
    fn control(&self, name: &str) -> Option<Element> {
        let selector = format!("[name=\"{}\"]", name);
        self.form()
            .and_then(|form| form.query_selector(&selector).ok().flatten())
            .or_else(|| self.query(&selector))
            .or_else(|| self.document.get_element_by_id(name))
    }

    /// Resolves a target against the live document
    pub fn element(&self, target: &Target) -> Option<Element> {
        match target {
            Target::Field(name) => self.control(name),
            Target::Id(id) => self.document.get_element_by_id(id),
            Target::Selector(selector) => self.query(selector),
            Target::SubmitButton => self
                .form()?
                .query_selector("button[type=\"submit\"]")
                .ok()
                .flatten(),
        }
    }

    fn html_element(&self, target: &Target) -> Option<HtmlElement> {
        self.element(target)?.dyn_into::<HtmlElement>().ok()
    }

    fn anchor(&self, placement: Placement, node: &Element) -> Option<Node> {
        match placement {
            Placement::BeforeForm => {
                let form: Node = self.form()?.into();
                form.parent_node()?.insert_before(node, Some(&form)).ok()
            }
            Placement::AppendToBody => self.document.body()?.append_child(node).ok(),
            Placement::AppendToParentOf(target) => {
                self.element(&target)?.parent_node()?.append_child(node).ok()
            }
            Placement::BeforeFirstButtonIn(target) => {
                let container = self.element(&target)?;
                let button: Option<Node> = container.query_selector("button").ok().flatten().map(Into::into);
                container.insert_before(node, button.as_ref()).ok()
            }
        }
    }
}

impl UiSurface for WebSurface {
    fn has_form(&self) -> bool {
        self.form().is_some()
    }

    fn fields(&self) -> Vec<FieldInfo> {
        self.query_all("input, select, textarea")
            .iter()
            .filter_map(field_info)
            .collect()
    }

    fn field(&self, name: &str) -> Option<FieldInfo> {
        field_info(&self.control(name)?)
    }

    fn numeric_fields(&self) -> Vec<FieldInfo> {
        self.form_controls()
            .iter()
            .filter_map(field_info)
            .filter(|f| f.kind == FieldKind::Number)
            .collect()
    }

    fn form_entries(&self) -> Option<Vec<(String, String)>> {
        let form = self.form()?;
        let data = FormData::new_with_form(&form).ok()?;
        let entries = js_sys::try_iter(&data).ok()??;

        let mut pairs = Vec::new();
        for entry in entries {
            let entry: Array = entry.ok()?.unchecked_into();
            // File entries carry no string value
            if let (Some(key), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
                pairs.push((key, value));
            }
        }
        Some(pairs)
    }

    fn focused_field(&self) -> Option<FieldInfo> {
        field_info(&self.document.active_element()?)
    }

    fn exists(&self, target: &Target) -> bool {
        self.element(target).is_some()
    }

    fn text(&self, target: &Target) -> Option<String> {
        let element = self.element(target)?;
        match target {
            Target::Field(_) => control_value(&element),
            _ => Some(element.text_content().unwrap_or_default()),
        }
    }

    fn inner_html(&self, target: &Target) -> Option<String> {
        self.element(target).map(|e| e.inner_html())
    }

    fn width(&self, target: &Target) -> f64 {
        self.html_element(target)
            .map(|e| f64::from(e.offset_width()))
            .unwrap_or(0.0)
    }

    fn set_field_value(&mut self, name: &str, value: &str) {
        if let Some(element) = self.control(name) {
            set_control_value(&element, value);
        }
    }

    fn set_title(&mut self, target: &Target, title: &str) {
        if let Some(element) = self.element(target) {
            let _ = element.set_attribute("title", title);
        }
    }

    fn set_text(&mut self, target: &Target, text: &str) {
        if let Some(element) = self.element(target) {
            element.set_text_content(Some(text));
        }
    }

    fn set_inner_html(&mut self, target: &Target, html: &str) {
        if let Some(element) = self.element(target) {
            element.set_inner_html(html);
        }
    }

    fn set_disabled(&mut self, target: &Target, disabled: bool) {
        if let Some(element) = self.element(target) {
            let _ = if disabled {
                element.set_attribute("disabled", "")
            } else {
                element.remove_attribute("disabled")
            };
        }
    }

    fn add_classes(&mut self, target: &Target, classes: &[&str]) {
        if let Some(element) = self.element(target) {
            let list = element.class_list();
            for class in classes {
                let _ = list.add_1(class);
            }
        }
    }

    fn remove_classes(&mut self, target: &Target, classes: &[&str]) {
        if let Some(element) = self.element(target) {
            let list = element.class_list();
            for class in classes {
                let _ = list.remove_1(class);
            }
        }
    }

    fn add_parent_classes(&mut self, target: &Target, classes: &[&str]) {
        if let Some(parent) = self.element(target).and_then(|e| e.parent_element()) {
            let list = parent.class_list();
            for class in classes {
                let _ = list.add_1(class);
            }
        }
    }

    fn remove_parent_classes(&mut self, target: &Target, classes: &[&str]) {
        if let Some(parent) = self.element(target).and_then(|e| e.parent_element()) {
            let list = parent.class_list();
            for class in classes {
                let _ = list.remove_1(class);
            }
        }
    }

    fn set_style(&mut self, target: &Target, property: &str, value: &str) {
        if let Some(element) = self.html_element(target) {
            let _ = element.style().set_property(property, value);
        }
    }

    fn scroll_into_view(&mut self, target: &Target, block: ScrollBlock) {
        let Some(element) = self.element(target) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(match block {
            ScrollBlock::Start => ScrollLogicalPosition::Start,
            ScrollBlock::Center => ScrollLogicalPosition::Center,
        });
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn insert(&mut self, element: NewElement, placement: Placement) -> bool {
        let Ok(node) = self.document.create_element(element.tag) else {
            return false;
        };
        node.set_id(&element.id);
        node.set_class_name(&element.class);
        match &element.content {
            Content::Text(text) => node.set_text_content(Some(text)),
            Content::Html(html) => node.set_inner_html(html),
        }
        self.anchor(placement, &node).is_some()
    }

    fn remove(&mut self, target: &Target) -> bool {
        match self.element(target) {
            Some(element) => {
                element.remove();
                true
            }
            None => false,
        }
    }

    fn open_window(&mut self, document: &str) -> Option<WindowHandle> {
        let popup = self.window.open_with_url_and_target("", "_blank").ok()??;
        let page = popup.document()?.dyn_into::<HtmlDocument>().ok()?;
        page.write(&Array::of1(&JsValue::from_str(document))).ok()?;
        page.close().ok()?;

        WINDOWS.with(|windows| {
            let mut windows = windows.borrow_mut();
            windows.push(popup);
            u32::try_from(windows.len() - 1).ok().map(WindowHandle)
        })
    }

    fn print_window(&mut self, window: WindowHandle) {
        WINDOWS.with(|windows| {
            if let Some(popup) = windows.borrow().get(window.0 as usize) {
                let _ = popup.print();
            }
        });
    }

    fn download(&mut self, file_name: &str, mime: &str, contents: &str) {
        let parts = Array::of1(&JsValue::from_str(contents));
        let options = BlobPropertyBag::new();
        options.set_type(mime);
        let Ok(blob) = Blob::new_with_str_sequence_and_options(&parts, &options) else {
            console::warn_1(&"health-form: could not create export blob".into());
            return;
        };
        let Ok(url) = Url::create_object_url_with_blob(&blob) else {
            return;
        };

        let anchor = self
            .document
            .create_element("a")
            .ok()
            .and_then(|e| e.dyn_into::<HtmlAnchorElement>().ok());
        if let (Some(anchor), Some(body)) = (anchor, self.document.body()) {
            anchor.set_href(&url);
            anchor.set_download(file_name);
            if body.append_child(&anchor).is_ok() {
                anchor.click();
                anchor.remove();
            }
        }
        let _ = Url::revoke_object_url(&url);
    }

    fn submit_form(&mut self) {
        if let Some(form) = self.form() {
            let _ = form.submit();
        }
    }

    fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        let form_id = self.form_id.clone();
        let callback = Closure::once_into_js(move || {
            if let Some(mut surface) = WebSurface::new(&form_id) {
                action.apply(&mut surface);
            }
        });
        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
            .is_err()
        {
            console::warn_1(&"health-form: setTimeout unavailable, deferred action dropped".into());
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}
