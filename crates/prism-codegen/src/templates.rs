//! Template engine for code generation.

use crate::error::{CodegenError, Result};
use convert_case::{Case, Casing};
use handlebars::{Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext};
use serde::Serialize;

/// Template engine using Handlebars.
///
/// Output is source code, so HTML escaping is disabled.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the case and layout helpers.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        Self::register_helpers(&mut handlebars);
        Self { handlebars }
    }

    /// Register a named template.
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| CodegenError::template_render(name, e))
    }

    /// Render a registered template.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| CodegenError::template_render(name, e))
    }

    /// Compile and render a template read from `path`.
    ///
    /// Compile errors and render errors both surface as
    /// [`CodegenError::TemplateRender`] naming `path`.
    pub fn render_template<T: Serialize>(&self, path: &str, source: &str, data: &T) -> Result<String> {
        self.handlebars
            .render_template(source, data)
            .map_err(|e| CodegenError::template_render(path, e))
    }

    fn register_helpers(handlebars: &mut Handlebars) {
        handlebars.register_helper("pascal_case", string_helper(|s| s.to_case(Case::Pascal)));
        handlebars.register_helper("camel_case", string_helper(|s| s.to_case(Case::Camel)));
        handlebars.register_helper("snake_case", string_helper(|s| s.to_case(Case::Snake)));
        handlebars.register_helper("kebab_case", string_helper(|s| s.to_case(Case::Kebab)));
        handlebars.register_helper("upper", string_helper(|s| s.to_uppercase()));
        handlebars.register_helper("lower", string_helper(|s| s.to_lowercase()));

        // {{indent text 4}}
        handlebars.register_helper(
            "indent",
            Box::new(
                |h: &Helper,
                 _r: &Handlebars,
                 _ctx: &Context,
                 _rc: &mut RenderContext,
                 out: &mut dyn Output|
                 -> HelperResult {
                    let content = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
                    let spaces = h.param(1).and_then(|v| v.value().as_u64()).unwrap_or(4) as usize;
                    out.write(&indent(content, spaces))?;
                    Ok(())
                },
            ),
        );

        // {{join items ", "}}
        handlebars.register_helper(
            "join",
            Box::new(
                |h: &Helper,
                 _r: &Handlebars,
                 _ctx: &Context,
                 _rc: &mut RenderContext,
                 out: &mut dyn Output|
                 -> HelperResult {
                    let sep = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");
                    if let Some(items) = h.param(0).and_then(|v| v.value().as_array()) {
                        let joined = items
                            .iter()
                            .map(prism_core::value_label)
                            .collect::<Vec<_>>()
                            .join(sep);
                        out.write(&joined)?;
                    }
                    Ok(())
                },
            ),
        );
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper applying a string transform to its first parameter.
fn string_helper(transform: fn(&str) -> String) -> Box<dyn HelperDef + Send + Sync> {
    Box::new(
        move |h: &Helper,
              _r: &Handlebars,
              _ctx: &Context,
              _rc: &mut RenderContext,
              out: &mut dyn Output|
              -> HelperResult {
            let param = h.param(0).and_then(|v| v.value().as_str()).unwrap_or("");
            out.write(&transform(param))?;
            Ok(())
        },
    )
}

/// Indent every non-blank line by `spaces`.
pub fn indent(content: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_registered() {
        let mut engine = TemplateEngine::new();
        engine.register_template("hello", "Hello, {{name}}!").unwrap();
        let result = engine.render("hello", &json!({"name": "World"})).unwrap();
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_case_helpers() {
        let engine = TemplateEngine::new();
        let data = json!({"name": "date_picker"});
        let render = |t: &str| engine.render_template("t", t, &data).unwrap();
        assert_eq!(render("{{pascal_case name}}"), "DatePicker");
        assert_eq!(render("{{camel_case name}}"), "datePicker");
        assert_eq!(render("{{kebab_case name}}"), "date-picker");
        assert_eq!(render("{{snake_case name}}"), "date_picker");
        assert_eq!(render("{{upper name}}"), "DATE_PICKER");
    }

    #[test]
    fn test_join_and_indent() {
        let engine = TemplateEngine::new();
        let out = engine
            .render_template(
                "t",
                "{{join values \" | \"}}\n{{indent body 2}}",
                &json!({"values": ["a", "b"], "body": "x\ny"}),
            )
            .unwrap();
        assert_eq!(out, "a | b\n  x\n  y");
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let engine = TemplateEngine::new();
        let out = engine
            .render_template("t", "{{ty}}", &json!({"ty": "Array<string>"}))
            .unwrap();
        assert_eq!(out, "Array<string>");
    }

    #[test]
    fn test_malformed_template_is_render_error() {
        let engine = TemplateEngine::new();
        let err = engine
            .render_template("react/form/input.hbs", "{{#if open}}unclosed", &json!({}))
            .unwrap_err();
        match err {
            CodegenError::TemplateRender { path, .. } => assert_eq!(path, "react/form/input.hbs"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
