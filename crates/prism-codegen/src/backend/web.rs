//! Helpers shared by the web and stylesheet backends.

use super::Artifact;
use crate::context::{ComponentContext, PropContext};
use crate::values::escape_single;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use prism_core::{FlatTokens, TokenLayer};

/// `:root` custom-property block. Tokens that reference another token emit
/// `var(--target)` so overrides cascade.
pub fn css_custom_properties(tokens: &FlatTokens) -> String {
    let mut lines = vec![":root {".to_string()];
    for layer in TokenLayer::ALL {
        let mut first = true;
        for token in tokens.layer(layer) {
            if first {
                lines.push(format!("  /* {} */", layer));
                first = false;
            }
            let value = match &token.reference {
                Some(target) => css_var(target),
                None => token.value.render(),
            };
            lines.push(format!("  {}: {};", custom_property(&token.name), value));
        }
    }
    lines.push("}".to_string());
    lines.join("\n") + "\n"
}

/// `--name` with every character outside `[A-Za-z0-9_-]` backslash-escaped
/// (`spacing-0.5` → `--spacing-0\.5`).
pub fn custom_property(name: &str) -> String {
    let mut property = String::from("--");
    for c in name.chars() {
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()) {
            property.push('\\');
        }
        property.push(c);
    }
    property
}

/// `var(--name)` for a flattened token name.
pub fn css_var(name: &str) -> String {
    format!("var({})", custom_property(name))
}

/// Nested runtime constant object (`export const tokens = {...} as const`).
pub fn ts_token_object(tokens: &FlatTokens, typescript: bool) -> String {
    let mut root = TokenTree::default();
    for token in tokens.iter() {
        root.insert(&token.path, format!("'{}'", escape_single(&token.value.render())));
    }
    let mut lines = Vec::new();
    lines.push(format!("export const tokens = {}{};", root.render(0), if typescript { " as const" } else { "" }));
    if typescript {
        lines.push(String::new());
        lines.push("export type Tokens = typeof tokens;".to_string());
    }
    lines.join("\n") + "\n"
}

#[derive(Default)]
struct TokenTree {
    children: IndexMap<String, TokenTree>,
    value: Option<String>,
}

impl TokenTree {
    fn insert(&mut self, path: &[String], value: String) {
        match path.split_first() {
            None => self.value = Some(value),
            Some((head, rest)) => self
                .children
                .entry(head.clone())
                .or_default()
                .insert(rest, value),
        }
    }

    fn render(&self, depth: usize) -> String {
        if let Some(value) = &self.value {
            return value.clone();
        }
        let pad = "  ".repeat(depth + 1);
        let mut lines = vec!["{".to_string()];
        for (key, child) in &self.children {
            lines.push(format!("{}{}: {},", pad, object_key(key), child.render(depth + 1)));
        }
        lines.push(format!("{}}}", "  ".repeat(depth)));
        lines.join("\n")
    }
}

/// Quote object keys that are not plain identifiers.
pub fn object_key(key: &str) -> String {
    let ident = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if ident {
        key.to_string()
    } else {
        format!("'{}'", escape_single(key))
    }
}

/// `export interface XProps { ... }` with JSDoc for descriptions and deprecations.
/// Only props accepted by `include` become members.
pub fn ts_props_interface(
    ctx: &ComponentContext,
    include: impl Fn(&PropContext) -> bool,
    extra: &[&str],
) -> String {
    let mut lines = Vec::new();
    for decl in &ctx.declarations {
        lines.push(decl.source.clone());
        lines.push(String::new());
    }
    lines.push(format!("export interface {}Props {{", ctx.pascal_name));
    for prop in ctx.props.iter().filter(|p| include(p)) {
        if let Some(doc) = jsdoc(prop) {
            lines.push(doc);
        }
        let optional = if prop.required { "" } else { "?" };
        lines.push(format!("  {}{}: {};", prop.ident, optional, prop.ty));
    }
    for line in extra {
        lines.push(format!("  {}", line));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn jsdoc(prop: &PropContext) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(description) = &prop.description {
        parts.push(description.clone());
    }
    if let Some(default) = &prop.default {
        parts.push(format!("@default {}", default));
    }
    if let Some(deprecated) = &prop.deprecated {
        let mut note = format!("@deprecated since {}: {}", deprecated.since, deprecated.reason);
        if let Some(alternative) = &deprecated.alternative {
            note.push_str(&format!(" Use `{}` instead.", alternative.to_case(Case::Camel)));
        }
        parts.push(note);
    }
    match parts.len() {
        0 => None,
        1 => Some(format!("  /** {} */", parts[0])),
        _ => {
            let mut lines = vec!["  /**".to_string()];
            lines.extend(parts.iter().map(|p| format!("   * {}", p)));
            lines.push("   */".to_string());
            Some(lines.join("\n"))
        }
    }
}

/// HTML element used for an ARIA role when no template says otherwise.
pub fn html_tag(role: &str) -> &'static str {
    match role {
        "button" => "button",
        "link" => "a",
        "textbox" | "searchbox" => "input",
        "navigation" => "nav",
        "dialog" => "dialog",
        "list" => "ul",
        "listitem" => "li",
        "img" => "img",
        "form" => "form",
        "banner" => "header",
        "contentinfo" => "footer",
        "main" => "main",
        "region" | "article" => "section",
        _ => "div",
    }
}

/// Whether the tag carries its role implicitly.
pub fn implicit_role(tag: &str, role: &str) -> bool {
    matches!(
        (tag, role),
        ("button", "button")
            | ("a", "link")
            | ("nav", "navigation")
            | ("dialog", "dialog")
            | ("ul", "list")
            | ("li", "listitem")
            | ("img", "img")
            | ("form", "form")
            | ("header", "banner")
            | ("footer", "contentinfo")
            | ("main", "main")
    )
}

/// DOM event a callback prop binds to (`onPress` → `click`).
pub fn dom_event(prop: &PropContext) -> Option<&'static str> {
    if !prop.is_callback {
        return None;
    }
    let event = prop.ident.strip_prefix("on").unwrap_or(&prop.ident).to_lowercase();
    Some(match event.as_str() {
        "press" | "click" | "tap" | "activate" | "select" => "click",
        "change" | "valuechange" => "change",
        "input" => "input",
        "focus" => "focus",
        "blur" => "blur",
        "keydown" => "keydown",
        "submit" => "submit",
        _ => return None,
    })
}

/// Props forwarded as native HTML attributes.
pub fn native_attr(prop: &PropContext) -> bool {
    !prop.is_callback
        && !prop.is_content
        && prop.enum_values.is_none()
        && matches!(
            prop.ident.as_str(),
            "disabled" | "checked" | "placeholder" | "name" | "value" | "href" | "target"
                | "type" | "readOnly" | "required" | "id" | "title" | "alt" | "src"
        )
}

/// Props rendered as text content.
pub fn text_prop(prop: &PropContext) -> bool {
    !prop.is_callback
        && !prop.is_content
        && matches!(prop.ident.as_str(), "label" | "text" | "title" | "children" | "message")
}

/// Props that select a style modifier: enumerated, non-callback props.
pub fn modifier_props(ctx: &ComponentContext) -> Vec<&PropContext> {
    ctx.props
        .iter()
        .filter(|p| p.enum_values.is_some() && !p.is_callback)
        .collect()
}

/// BEM modifier class: `button--size-md`.
pub fn modifier_class(ctx: &ComponentContext, axis: &str, value: &str) -> String {
    format!("{}--{}-{}", ctx.kebab_name, axis.to_case(Case::Kebab), value)
}

/// Stylesheet for a component: root block, component tokens, modifiers and
/// compound variants.
pub fn component_stylesheet(ctx: &ComponentContext) -> String {
    let mut lines = vec![format!(".{} {{", ctx.kebab_name)];
    lines.push("  box-sizing: border-box;".to_string());
    for token in &ctx.tokens {
        lines.push(format!("  {}: {};", css_property(&token.key), css_var(&token.name)));
    }
    if ctx.a11y.focusable {
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push(format!(".{}:focus-visible {{", ctx.kebab_name));
        lines.push("  outline: 2px solid currentColor;".to_string());
        lines.push("  outline-offset: 2px;".to_string());
    }
    lines.push("}".to_string());

    for prop in modifier_props(ctx) {
        for value in prop.enum_values.iter().flatten() {
            lines.push(String::new());
            lines.push(format!(".{} {{", modifier_class(ctx, &prop.kebab, value)));
            lines.push(format!("  --{}-{}: {};", ctx.kebab_name, prop.kebab, value));
            lines.push("}".to_string());
        }
    }

    for axis in &ctx.variants {
        for value in &axis.values {
            lines.push(String::new());
            lines.push(format!(".{} {{", modifier_class(ctx, &axis.name, value)));
            lines.push("}".to_string());
        }
    }

    for compound in &ctx.compounds {
        let selector: String = compound
            .conditions
            .iter()
            .map(|c| format!(".{}", modifier_class(ctx, &c.prop, &c.value)))
            .collect();
        lines.push(String::new());
        if let Some(description) = &compound.description {
            lines.push(format!("/* {} */", description));
        }
        match &compound.class_name {
            Some(class) => lines.push(format!(".{}{}, .{} {{", ctx.kebab_name, selector, class)),
            None => lines.push(format!(".{}{} {{", ctx.kebab_name, selector)),
        }
        lines.push("}".to_string());
    }

    lines.join("\n") + "\n"
}

/// CSS property for a component token key (`background` → `background`,
/// `radius` → `border-radius`).
pub fn css_property(key: &str) -> String {
    match key {
        "radius" => "border-radius".to_string(),
        "text" | "foreground" | "fg" => "color".to_string(),
        "bg" => "background".to_string(),
        "font" => "font-family".to_string(),
        "shadow" => "box-shadow".to_string(),
        other => other.to_string(),
    }
}

/// Class-name arguments for JS frameworks: the root class, one modifier
/// lookup per enumerated prop and one guarded entry per compound variant.
/// `lookup` renders a class for `(axis, value expression)`.
pub fn class_parts(ctx: &ComponentContext, root: &str, lookup: impl Fn(&str, &str) -> String) -> Vec<String> {
    let mut parts = vec![root.to_string()];
    for prop in modifier_props(ctx) {
        parts.push(lookup(&prop.kebab, &prop.ident));
    }
    for compound in &ctx.compounds {
        let condition = compound
            .conditions
            .iter()
            .map(|c| match &c.literal {
                Some(lit) => format!("{} === {}", c.prop, lit),
                None => format!("{} === '{}'", c.prop, c.value),
            })
            .collect::<Vec<_>>()
            .join(" && ");
        let class = match &compound.class_name {
            Some(class) => class.clone(),
            None => compound
                .conditions
                .iter()
                .map(|c| modifier_class(ctx, &c.prop, &c.value))
                .collect::<Vec<_>>()
                .join(" "),
        };
        parts.push(format!("{} && '{}'", condition, class));
    }
    parts
}

/// `cx(...)` over [`class_parts`].
pub fn class_list_expr(ctx: &ComponentContext, root: &str, lookup: impl Fn(&str, &str) -> String) -> String {
    format!("cx({})", class_parts(ctx, root, lookup).join(", "))
}

/// `cx` helper shared by the JS frameworks.
pub fn cx_util(path: &str, typescript: bool) -> Artifact {
    let signature = if typescript {
        "export function cx(...classes: Array<string | false | null | undefined>): string {"
    } else {
        "export function cx(...classes) {"
    };
    Artifact::new(
        path,
        format!("{}\n  return classes.filter(Boolean).join(' ');\n}}\n", signature),
    )
}

/// Attribute value for an example prop.
pub fn jsx_attr(prop: &PropContext) -> Option<String> {
    let sample = prop.sample.as_ref()?;
    if let Some(inner) = sample.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return Some(format!("{}=\"{}\"", prop.ident, inner));
    }
    Some(format!("{}={{{}}}", prop.ident, sample))
}

/// Usage snippet for JSX-like syntaxes.
pub fn jsx_usage(ctx: &ComponentContext, tag: &str, attr: impl Fn(&PropContext) -> Option<String>) -> String {
    let attrs: Vec<String> = ctx
        .props
        .iter()
        .filter(|p| p.required || p.enum_values.is_some())
        .filter_map(attr)
        .collect();
    if attrs.is_empty() {
        format!("<{} />", tag)
    } else {
        format!("<{} {} />", tag, attrs.join(" "))
    }
}

/// Title used by stories: `Interactive/Button`.
pub fn story_title(ctx: &ComponentContext) -> String {
    format!("{}/{}", ctx.category.to_case(Case::Title), ctx.pascal_name)
}

/// `{ size: 'xs', label: 'Label' }` from prop samples.
pub fn story_args(ctx: &ComponentContext) -> String {
    let args: Vec<String> = ctx
        .value_props()
        .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
        .collect();
    format!("{{ {} }}", args.join(", "))
}

/// Accessible name: explicit label, else the component name in title case.
pub fn accessible_label(ctx: &ComponentContext) -> String {
    ctx.a11y
        .label
        .clone()
        .unwrap_or_else(|| ctx.name.to_case(Case::Title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for, sample_tokens};
    use crate::backend::ReactBackend;
    use prism_core::DesignTokens;

    #[test]
    fn test_custom_properties_use_var_for_references() {
        let css = css_custom_properties(&sample_tokens());
        assert!(css.contains("  --spacing-md: 1rem;"));
        assert!(css.contains("  --spacing-section: var(--spacing-md);"));
        assert!(css.contains("  --font-sans: Inter, system-ui;"));
    }

    #[test]
    fn test_token_object_nests_paths() {
        let ts = ts_token_object(&sample_tokens(), true);
        assert!(ts.starts_with("export const tokens = {"));
        assert!(ts.contains("      '500': '#3b82f6',"));
        assert!(ts.contains("as const;"));
    }

    #[test]
    fn test_stylesheet_has_modifiers_and_compounds() {
        let ctx = context_for(&ReactBackend, &button_spec()).with_tokens(&sample_tokens());
        let css = component_stylesheet(&ctx);
        assert!(css.contains(".button--size-md {"));
        assert!(css.contains(".button.button--size-lg.button--variant-primary, .button-hero {"));
        assert!(css.contains("  background: var(--button-background);"));
        assert!(css.contains(".button:focus-visible {"));
    }

    #[test]
    fn test_object_keys() {
        assert_eq!(object_key("primary"), "primary");
        assert_eq!(object_key("500"), "'500'");
        assert_eq!(object_key("2xl"), "'2xl'");
    }

    #[test]
    fn test_custom_property_escapes_punctuation() {
        assert_eq!(custom_property("spacing-md"), "--spacing-md");
        assert_eq!(custom_property("spacing-0.5"), "--spacing-0\\.5");
        assert_eq!(css_var("spacing-1/2"), "var(--spacing-1\\/2)");
    }

    #[test]
    fn test_token_object_escapes_keys_and_values() {
        let tokens: DesignTokens = serde_json::from_value(serde_json::json!({
            "primitive": {
                "font": {"path": "C:\\fonts\\", "quote": "it's\nfine"},
                "spacing": {"0.5": "2px"}
            }
        }))
        .unwrap();
        let tokens = FlatTokens::resolve(&tokens).unwrap();
        let ts = ts_token_object(&tokens, true);
        assert!(ts.contains("    path: 'C:\\\\fonts\\\\',"));
        assert!(ts.contains("    quote: 'it\\'s\\nfine',"));
        assert!(ts.contains("    '0.5': '2px',"));
        assert_eq!(object_key("it's"), "'it\\'s'");

        let css = css_custom_properties(&tokens);
        assert!(css.contains("  --spacing-0\\.5: 2px;"));
    }
}
