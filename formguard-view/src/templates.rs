//! Built-in form templates
//!
//! Each template receives a JSON object. Optional fields are passed as
//! `null` rather than omitted so the templates also render in strict mode.

use handlebars::{Handlebars, TemplateError};

/// `{name, id, value, attribs}` - hidden input carrying a value
pub const FORM_HIDDEN: &str = "formHidden";

/// `{messages}` - list of error messages
pub const FORM_ERRORS: &str = "formErrors";

/// `{tag, id, content}` - wraps already-rendered markup
pub const HTML_TAG: &str = "htmlTag";

/// `{id, label, required}` - definition-term label
pub const FORM_LABEL: &str = "formLabel";

const FORM_HIDDEN_SRC: &str = r#"<input type="hidden" name="{{name}}" value="{{value}}" id="{{id}}"{{#each attribs}} {{@key}}="{{this}}"{{/each}} />"#;

const FORM_ERRORS_SRC: &str =
    r#"<ul class="errors">{{#each messages}}<li>{{this}}</li>{{/each}}</ul>"#;

const HTML_TAG_SRC: &str = r#"<{{tag}}{{#if id}} id="{{id}}"{{/if}}>{{{content}}}</{{tag}}>"#;

const FORM_LABEL_SRC: &str = r#"<dt id="{{id}}-label">{{#if label}}<label for="{{id}}"{{#if required}} class="required"{{/if}}>{{label}}</label>{{else}}&#160;{{/if}}</dt>"#;

/// Names of all built-in templates
pub const BUILTIN: [&str; 4] = [FORM_HIDDEN, FORM_ERRORS, HTML_TAG, FORM_LABEL];

/// Register the built-in form templates
pub fn register_builtin_templates(handlebars: &mut Handlebars) -> Result<(), TemplateError> {
    handlebars.register_template_string(FORM_HIDDEN, FORM_HIDDEN_SRC)?;
    handlebars.register_template_string(FORM_ERRORS, FORM_ERRORS_SRC)?;
    handlebars.register_template_string(HTML_TAG, HTML_TAG_SRC)?;
    handlebars.register_template_string(FORM_LABEL, FORM_LABEL_SRC)?;
    Ok(())
}
