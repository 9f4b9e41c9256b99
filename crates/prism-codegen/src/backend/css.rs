use super::web::{
    accessible_label, component_stylesheet, css_custom_properties, custom_property, html_tag, implicit_role,
    modifier_class, modifier_props, text_prop,
};
use super::{Artifact, PlatformBackend};
use crate::context::{ComponentContext, PropContext};
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use prism_core::{BuiltinPlatform, FlatTokens, PlatformFamily, PlatformId};

/// Framework-free stylesheets with BEM class names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssBackend;

impl CssBackend {
    fn element_class(ctx: &ComponentContext, prop: &PropContext) -> String {
        format!("{}__{}", ctx.kebab_name, prop.kebab)
    }

    fn prop_note(ctx: &ComponentContext, prop: &PropContext) -> String {
        if prop.is_callback {
            return format!("{}: event, bind with a listener", prop.kebab);
        }
        if prop.is_content {
            return format!("{}: slot (.{})", prop.kebab, Self::element_class(ctx, prop));
        }
        let mut note = format!("{}: {}", prop.kebab, prop.ty);
        if let Some(default) = &prop.default {
            note.push_str(&format!(", default {}", default));
        }
        if prop.enum_values.is_some() {
            note.push_str(&format!(", modifier .{}", modifier_class(ctx, &prop.kebab, "*")));
        }
        if prop.required {
            note.push_str(", required");
        }
        note
    }

    fn markup(ctx: &ComponentContext) -> Vec<String> {
        let tag = html_tag(&ctx.a11y.role);
        let mut classes = vec![ctx.kebab_name.clone()];
        for prop in modifier_props(ctx) {
            if let Some(value) = prop.default.as_deref().map(|d| d.trim_matches('\'')) {
                classes.push(modifier_class(ctx, &prop.kebab, value));
            }
        }
        let mut open = format!("<{} class=\"{}\"", tag, classes.join(" "));
        if !implicit_role(tag, &ctx.a11y.role) {
            open.push_str(&format!(" role=\"{}\"", ctx.a11y.role));
        }
        open.push_str(&format!(" aria-label=\"{}\">", accessible_label(ctx)));

        let mut lines = vec![open];
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            lines.push(format!("  <span class=\"{}\"></span>", Self::element_class(ctx, prop)));
        }
        for prop in ctx.props.iter().filter(|p| text_prop(p)) {
            let text = prop
                .sample
                .as_deref()
                .map(|s| s.trim_matches('\'').to_string())
                .unwrap_or_else(|| prop.ident.clone());
            lines.push(format!("  {}", text));
        }
        lines.push(format!("</{}>", tag));
        lines
    }
}

impl PlatformBackend for CssBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::Css.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Stylesheet
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::Css)
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("components/{}.css", ctx.kebab_name)
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let mut lines = vec!["/*".to_string(), format!(" * {}", ctx.pascal_name)];
        if let Some(description) = &ctx.description {
            lines.push(format!(" * {}", description));
        }
        lines.push(" *".to_string());
        lines.extend(Self::markup(ctx).into_iter().map(|l| format!(" * {}", l)));
        if !ctx.props.is_empty() {
            lines.push(" *".to_string());
            lines.push(" * Props:".to_string());
            for prop in &ctx.props {
                lines.push(format!(" *   {}", Self::prop_note(ctx, prop)));
            }
        }
        lines.push(" */".to_string());
        lines.push(String::new());
        lines.push(component_stylesheet(ctx).trim_end().to_string());
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            lines.push(String::new());
            lines.push(format!(".{} {{", Self::element_class(ctx, prop)));
            lines.push("  display: inline-flex;".to_string());
            lines.push("  align-items: center;".to_string());
            lines.push("}".to_string());
        }
        lines.join("\n") + "\n"
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        vec![Artifact::new("tokens.css", css_custom_properties(tokens))]
    }

    fn theme(&self, tokens: &FlatTokens) -> Artifact {
        let font = tokens
            .iter()
            .find(|t| t.path.first().is_some_and(|p| p.starts_with("font")))
            .map(|t| format!("var({}, system-ui)", custom_property(&t.name)))
            .unwrap_or_else(|| "system-ui".to_string());
        let lines = [
            "@import './tokens.css';".to_string(),
            String::new(),
            ":root {".to_string(),
            "  color-scheme: light dark;".to_string(),
            "}".to_string(),
            String::new(),
            "[data-theme='dark'] {".to_string(),
            "  color-scheme: dark;".to_string(),
            "}".to_string(),
            String::new(),
            "body {".to_string(),
            "  margin: 0;".to_string(),
            format!("  font-family: {};", font),
            "}".to_string(),
        ];
        Artifact::new("theme.css", lines.join("\n") + "\n")
    }

    fn utils(&self) -> Vec<Artifact> {
        let source = r#".visually-hidden {
  position: absolute;
  width: 1px;
  height: 1px;
  padding: 0;
  margin: -1px;
  overflow: hidden;
  clip: rect(0, 0, 0, 0);
  white-space: nowrap;
  border: 0;
}

.focus-ring:focus-visible {
  outline: 2px solid currentColor;
  outline-offset: 2px;
}

@media (prefers-reduced-motion: reduce) {
  *,
  *::before,
  *::after {
    transition-duration: 0.01ms !important;
    animation-duration: 0.01ms !important;
  }
}
"#;
        vec![Artifact::new("utilities.css", source)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        format!(
            "<link rel=\"stylesheet\" href=\"components/{}.css\" />\n\n{}",
            ctx.kebab_name,
            Self::markup(ctx).join("\n")
        )
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["button", "text-field", "card", "badge", "alert", "nav"])
            .layouts(&["Stack", "Cluster", "Sidebar", "Grid"])
            .pattern(
                "form",
                r#"
<form class="stack">
  <label class="text-field">Email <input type="email" name="email" /></label>
  <button class="button button--variant-primary" type="submit">Save</button>
</form>"#,
            )
            .pattern(
                "list",
                r#"
<ul class="stack" role="list">
  <li class="card">First</li>
  <li class="card">Second</li>
</ul>"#,
            )
            .pattern(
                "dashboard",
                r#"
<main class="grid">
  <nav class="nav"></nav>
  <section class="card"><h2>Revenue</h2></section>
</main>"#,
            )
    }
}
