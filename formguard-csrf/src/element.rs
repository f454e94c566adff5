//! Form element plumbing shared by element types.

use crate::error::{CsrfError, Result};
use formguard_validation::{NotEmpty, ValidationError, Validator, ValidatorChain};
use formguard_view::{View, ViewResult, templates};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A form element that renders itself and validates submitted values.
pub trait FormElement {
    fn name(&self) -> &str;

    fn label(&self) -> Option<&str>;

    /// Current value: the last value set or validated.
    fn value(&self) -> Option<&str>;

    fn set_value(&mut self, value: Option<String>);

    /// Validate a submitted value. Failures are recorded in `messages`.
    fn is_valid(&mut self, value: &str) -> bool;

    /// Errors recorded by the last `is_valid` call.
    fn messages(&self) -> &[ValidationError];

    fn has_errors(&self) -> bool {
        !self.messages().is_empty()
    }

    /// Render the element through its decorators.
    fn render(&mut self, view: &dyn View) -> Result<String>;
}

/// One step of the rendering pipeline.
///
/// Each decorator receives the markup produced so far and returns the new
/// markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    /// Append the element's view helper output
    ViewHelper,
    /// Append the error list, when there are errors
    Errors,
    /// Wrap everything in `<tag id="{id}-element">`
    HtmlTag { tag: String },
    /// Prepend the label
    Label,
}

impl Decorator {
    pub fn name(&self) -> &'static str {
        match self {
            Decorator::ViewHelper => "ViewHelper",
            Decorator::Errors => "Errors",
            Decorator::HtmlTag { .. } => "HtmlTag",
            Decorator::Label => "Label",
        }
    }

    /// Decorators applied when none are configured.
    pub fn defaults() -> Vec<Decorator> {
        vec![
            Decorator::ViewHelper,
            Decorator::Errors,
            Decorator::HtmlTag {
                tag: "dd".to_string(),
            },
            Decorator::Label,
        ]
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &dyn View, content: String) -> ViewResult<String> {
        match self {
            Decorator::ViewHelper => {
                let data = json!({
                    "name": ctx.name,
                    "id": ctx.id,
                    "value": ctx.value,
                    "attribs": ctx.attribs,
                });
                let html = view.render(ctx.helper, &data)?;
                Ok(join(content, html))
            }
            Decorator::Errors => {
                if ctx.messages.is_empty() {
                    return Ok(content);
                }
                let html = view.render(templates::FORM_ERRORS, &json!({ "messages": ctx.messages }))?;
                Ok(join(content, html))
            }
            Decorator::HtmlTag { tag } => view.render(
                templates::HTML_TAG,
                &json!({
                    "tag": tag,
                    "id": format!("{}-element", ctx.id),
                    "content": content,
                }),
            ),
            Decorator::Label => {
                let html = view.render(
                    templates::FORM_LABEL,
                    &json!({
                        "id": ctx.id,
                        "label": ctx.label,
                        "required": ctx.required,
                    }),
                )?;
                Ok(join(html, content))
            }
        }
    }
}

fn join(first: String, second: String) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second,
        (_, true) => first,
        _ => format!("{}\n{}", first, second),
    }
}

struct RenderContext<'a> {
    name: &'a str,
    id: &'a str,
    value: Option<&'a str>,
    label: Option<&'a str>,
    required: bool,
    helper: &'a str,
    attribs: &'a BTreeMap<String, String>,
    messages: Vec<&'a str>,
}

/// State common to every form element.
pub struct ElementCore {
    name: String,
    label: Option<String>,
    value: Option<String>,
    required: bool,
    allow_empty: bool,
    helper: &'static str,
    attribs: BTreeMap<String, String>,
    validators: ValidatorChain,
    decorators: Vec<Decorator>,
    view: Option<Arc<dyn View>>,
    errors: Vec<ValidationError>,
}

impl fmt::Debug for ElementCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCore")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("required", &self.required)
            .field("allow_empty", &self.allow_empty)
            .field("helper", &self.helper)
            .field("validators", &self.validators.names())
            .field("decorators", &self.decorators)
            .field("has_view", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

impl ElementCore {
    /// Element rendered by the `helper` template, with the default decorators.
    pub fn new(name: impl Into<String>, helper: &'static str) -> Self {
        Self {
            name: name.into(),
            label: None,
            value: None,
            required: false,
            allow_empty: true,
            helper,
            attribs: BTreeMap::new(),
            validators: ValidatorChain::new(),
            decorators: Decorator::defaults(),
            view: None,
            errors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// HTML id, derived from the name with brackets flattened.
    pub fn id(&self) -> String {
        self.name
            .replace("[]", "")
            .replace(['[', ']'], "-")
            .trim_end_matches('-')
            .to_string()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn set_allow_empty(&mut self, allow: bool) {
        self.allow_empty = allow;
    }

    pub fn attribs(&self) -> &BTreeMap<String, String> {
        &self.attribs
    }

    pub fn set_attrib(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attribs.insert(key.into(), value.into());
    }

    pub fn validators(&self) -> &ValidatorChain {
        &self.validators
    }

    pub fn validators_mut(&mut self) -> &mut ValidatorChain {
        &mut self.validators
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    pub fn set_decorators(&mut self, decorators: Vec<Decorator>) {
        self.decorators = decorators;
    }

    pub fn view(&self) -> Option<&Arc<dyn View>> {
        self.view.as_ref()
    }

    pub fn set_view(&mut self, view: Arc<dyn View>) {
        self.view = Some(view);
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Store `value`, then run the required check and the validator chain.
    pub fn is_valid(&mut self, value: &str) -> bool {
        self.value = Some(value.to_string());
        self.errors.clear();

        if value.is_empty() {
            if self.required && !self.allow_empty {
                if let Err(e) = NotEmpty.validate(value, &self.name) {
                    self.errors.push(e);
                }
                return false;
            }
            if !self.required && self.allow_empty {
                return true;
            }
        }

        match self.validators.validate(value, &self.name) {
            Ok(()) => true,
            Err(errors) => {
                self.errors.extend(errors);
                false
            }
        }
    }

    fn context(&self) -> (String, Vec<&str>) {
        let messages = self.errors.iter().map(|e| e.message.as_str()).collect();
        (self.id(), messages)
    }

    /// Run every decorator in order.
    pub fn render(&self, view: &dyn View) -> Result<String> {
        let (id, messages) = self.context();
        let ctx = self.render_context(&id, messages);

        let mut content = String::new();
        for decorator in &self.decorators {
            content = decorator.render(&ctx, view, content)?;
        }
        Ok(content)
    }

    /// Run only the decorator called `name`, against empty content.
    pub fn render_decorator(&self, name: &str, view: &dyn View) -> Result<String> {
        let decorator = self
            .decorators
            .iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| CsrfError::UnknownDecorator(name.to_string()))?;

        let (id, messages) = self.context();
        let ctx = self.render_context(&id, messages);
        Ok(decorator.render(&ctx, view, String::new())?)
    }

    fn render_context<'a>(&'a self, id: &'a str, messages: Vec<&'a str>) -> RenderContext<'a> {
        RenderContext {
            name: &self.name,
            id,
            value: self.value.as_deref(),
            label: self.label.as_deref(),
            required: self.required,
            helper: self.helper,
            attribs: &self.attribs,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formguard_validation::Identical;
    use formguard_view::HandlebarsView;

    fn hidden(name: &str) -> ElementCore {
        ElementCore::new(name, templates::FORM_HIDDEN)
    }

    #[test]
    fn test_id_from_name() {
        assert_eq!(hidden("csrf").id(), "csrf");
        assert_eq!(hidden("user[csrf]").id(), "user-csrf");
        assert_eq!(hidden("tokens[]").id(), "tokens");
    }

    #[test]
    fn test_default_render_pipeline() {
        let view = HandlebarsView::new().unwrap();
        let mut core = hidden("csrf");
        core.set_value(Some("abc".to_string()));

        let html = core.render(&view).unwrap();
        assert_eq!(
            html,
            "<dt id=\"csrf-label\">&#160;</dt>\n\
             <dd id=\"csrf-element\"><input type=\"hidden\" name=\"csrf\" value=\"abc\" id=\"csrf\" /></dd>"
        );
    }

    #[test]
    fn test_errors_rendered_after_failed_validation() {
        let view = HandlebarsView::new().unwrap();
        let mut core = hidden("csrf");
        core.validators_mut().add(Identical::new(Some("abc".into())), true);

        assert!(!core.is_valid("xyz"));
        let html = core.render(&view).unwrap();
        assert!(html.contains(r#"<ul class="errors"><li>The two given tokens do not match</li></ul>"#));
    }

    #[test]
    fn test_required_empty_value() {
        let mut core = hidden("csrf");
        core.set_required(true);
        core.set_allow_empty(false);

        assert!(!core.is_valid(""));
        assert_eq!(core.errors()[0].constraint, "isEmpty");
    }

    #[test]
    fn test_optional_empty_value_skips_validators() {
        let mut core = hidden("csrf");
        core.validators_mut().add(Identical::new(None), true);
        assert!(core.is_valid(""));
        assert!(core.errors().is_empty());
    }

    #[test]
    fn test_render_single_decorator() {
        let view = HandlebarsView::new().unwrap();
        let mut core = hidden("csrf");
        core.set_value(Some("abc".to_string()));

        let html = core.render_decorator("ViewHelper", &view).unwrap();
        assert_eq!(html, r#"<input type="hidden" name="csrf" value="abc" id="csrf" />"#);

        assert!(matches!(
            core.render_decorator("Description", &view),
            Err(CsrfError::UnknownDecorator(_))
        ));
    }

    #[test]
    fn test_custom_decorators() {
        let view = HandlebarsView::new().unwrap();
        let mut core = hidden("csrf");
        core.set_label(Some("Token".to_string()));
        core.set_decorators(vec![Decorator::ViewHelper, Decorator::Label]);
        core.set_value(Some("abc".to_string()));

        let html = core.render(&view).unwrap();
        assert!(html.starts_with(r#"<dt id="csrf-label"><label for="csrf">Token</label></dt>"#));
        assert!(!html.contains("<dd"));
    }
}
