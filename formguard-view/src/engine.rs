//! Handlebars view

use crate::{View, config::ViewConfig, error::ViewError, templates, ViewResult};
use formguard_log::debug;
use handlebars::Handlebars;
use parking_lot::RwLock;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// View rendering form markup through Handlebars templates
#[derive(Clone)]
pub struct HandlebarsView {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
    config: ViewConfig,
}

impl std::fmt::Debug for HandlebarsView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsView")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HandlebarsView {
    /// View with only the built-in form templates
    pub fn new() -> ViewResult<Self> {
        Self::with_config(ViewConfig::default())
    }

    /// View with built-ins, overridden by any templates in the configured directory
    pub fn with_config(config: ViewConfig) -> ViewResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(config.strict_mode);

        if !config.escape_html {
            handlebars.register_escape_fn(handlebars::no_escape);
        }

        let view = Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
            config,
        };
        view.load_templates()?;
        Ok(view)
    }

    fn load_templates(&self) -> ViewResult<()> {
        templates::register_builtin_templates(&mut self.handlebars.write())?;

        if let Some(dir) = &self.config.template_dir {
            if !dir.is_dir() {
                return Err(ViewError::Config(format!(
                    "Template directory not found: {:?}",
                    dir
                )));
            }
            self.load_templates_from_dir(dir, dir)?;
        }
        Ok(())
    }

    fn load_templates_from_dir(&self, root: &Path, dir: &Path) -> ViewResult<()> {
        let wanted = self.config.template_extension.trim_start_matches('.');

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                self.load_templates_from_dir(root, &path)?;
                continue;
            }
            if path.extension().is_none_or(|ext| ext != wanted) {
                continue;
            }

            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");
            let source = fs::read_to_string(&path)?;

            debug!(target: "formguard::view", "registering template {}", name);
            self.handlebars
                .write()
                .register_template_string(&name, source)?;
        }
        Ok(())
    }

    /// Register a template from a string, replacing any existing one
    pub fn register_template(&self, name: &str, template: &str) -> ViewResult<()> {
        self.handlebars
            .write()
            .register_template_string(name, template)
            .map_err(ViewError::from)
    }

    pub fn unregister_template(&self, name: &str) {
        self.handlebars.write().unregister_template(name);
    }

    /// Names of all registered templates
    pub fn templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlebars
            .read()
            .get_templates()
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Drop everything and load built-ins and the template directory again
    pub fn reload_templates(&self) -> ViewResult<()> {
        self.handlebars.write().clear_templates();
        self.load_templates()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }
}

impl View for HandlebarsView {
    fn render(&self, template: &str, data: &Value) -> ViewResult<String> {
        if self.config.dev_mode {
            self.reload_templates()?;
        }

        let handlebars = self.handlebars.read();
        if !handlebars.has_template(template) {
            return Err(ViewError::TemplateNotFound(template.to_string()));
        }
        handlebars.render(template, data).map_err(ViewError::from)
    }

    fn has_template(&self, name: &str) -> bool {
        self.handlebars.read().has_template(name)
    }
}
