use super::web::{
    accessible_label, class_parts, component_stylesheet, css_custom_properties, cx_util,
    dom_event, html_tag, implicit_role, jsx_attr, jsx_usage, modifier_props, native_attr,
    story_args, story_title, text_prop, ts_props_interface, ts_token_object,
};
use super::{Artifact, PlatformBackend};
use crate::context::ComponentContext;
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use convert_case::{Case, Casing};
use prism_core::{BuiltinPlatform, FlatTokens, PlatformFamily, PlatformId};

/// React function components with CSS modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReactBackend;

impl ReactBackend {
    fn dir(ctx: &ComponentContext) -> String {
        format!("src/components/{}/{}", ctx.category, ctx.pascal_name)
    }

    fn ext(ctx: &ComponentContext) -> &'static str {
        if ctx.features.typescript {
            "tsx"
        } else {
            "jsx"
        }
    }
}

impl PlatformBackend for ReactBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::React.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Web
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::React)
    }

    fn routing_conventions(&self) -> &'static [&'static str] {
        &["app-router", "pages-router"]
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("{}/{}.{}", Self::dir(ctx), ctx.pascal_name, Self::ext(ctx))
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let ts = ctx.features.typescript;
        let tag = html_tag(&ctx.a11y.role);
        let mut lines = Vec::new();

        // The app router renders server components by default.
        if ctx.has_callbacks && ctx.platform.convention.as_deref() == Some("app-router") {
            lines.push("'use client';".to_string());
            lines.push(String::new());
        }
        lines.push("import React from 'react';".to_string());
        if ctx.features.i18n {
            lines.push("import { useTranslation } from 'react-i18next';".to_string());
        }
        lines.push("import { cx } from '../../../lib/cx';".to_string());
        lines.push(format!("import styles from './{}.module.css';", ctx.pascal_name));
        if ts {
            lines.push(format!(
                "import type {{ {}Props }} from './{}.types';",
                ctx.pascal_name, ctx.pascal_name
            ));
        }
        lines.push(String::new());

        if let Some(description) = &ctx.description {
            lines.push(format!("/** {} */", description));
        }
        let mut params: Vec<String> = ctx
            .props
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{} = {}", p.ident, default),
                None => p.ident.clone(),
            })
            .collect();
        params.push("className".to_string());
        let annotation = if ts {
            format!(": {}Props", ctx.pascal_name)
        } else {
            String::new()
        };
        lines.push(format!(
            "export function {}({{ {} }}{}) {{",
            ctx.pascal_name,
            params.join(", "),
            annotation
        ));

        let label = accessible_label(ctx);
        let aria_label = if ctx.features.i18n {
            lines.push("  const { t } = useTranslation();".to_string());
            format!("{{t('{}.a11y.label', '{}')}}", ctx.name, label.replace('\'', "\\'"))
        } else {
            format!("\"{}\"", label)
        };
        lines.push(String::new());

        let root = if ctx.kebab_name.contains('-') {
            format!("styles['{}']", ctx.kebab_name)
        } else {
            format!("styles.{}", ctx.kebab_name)
        };
        let mut classes = class_parts(ctx, &root, |axis, ident| {
            format!("styles[`{}--{}-${{{}}}`]", ctx.kebab_name, axis, ident)
        });
        classes.push("className".to_string());

        lines.push("  return (".to_string());
        lines.push(format!("    <{}", tag));
        if tag == "button" {
            lines.push("      type=\"button\"".to_string());
        }
        if !implicit_role(tag, &ctx.a11y.role) {
            lines.push(format!("      role=\"{}\"", ctx.a11y.role));
        }
        if ctx.a11y.focusable && tag == "div" {
            lines.push("      tabIndex={0}".to_string());
        }
        if ctx.a11y.live_region {
            lines.push("      aria-live=\"polite\"".to_string());
        }
        lines.push(format!("      aria-label={}", aria_label));
        lines.push(format!("      className={{cx({})}}", classes.join(", ")));
        for prop in &ctx.props {
            if let Some(event) = dom_event(prop) {
                lines.push(format!("      on{}={{{}}}", event.to_case(Case::Pascal), prop.ident));
            } else if native_attr(prop) {
                lines.push(format!("      {}={{{}}}", prop.ident, prop.ident));
            }
        }
        for prop in modifier_props(ctx) {
            lines.push(format!("      data-{}={{{}}}", prop.kebab, prop.ident));
        }
        lines.push("    >".to_string());
        let content = ctx.props.iter().filter(|p| p.is_content);
        for prop in content.chain(ctx.props.iter().filter(|p| text_prop(p))) {
            lines.push(format!("      {{{}}}", prop.ident));
        }
        lines.push(format!("    </{}>", tag));
        lines.push("  );".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push(format!("export default {};", ctx.pascal_name));
        lines.join("\n") + "\n"
    }

    fn types(&self, ctx: &ComponentContext) -> Option<Artifact> {
        if !ctx.features.typescript {
            return None;
        }
        let body = ts_props_interface(ctx, |_| true, &["className?: string;"]);
        let content = if body.contains("React.") {
            format!("import type * as React from 'react';\n\n{}\n", body)
        } else {
            format!("{}\n", body)
        };
        Some(Artifact::new(
            format!("{}/{}.types.ts", Self::dir(ctx), ctx.pascal_name),
            content,
        ))
    }

    fn styles(&self, ctx: &ComponentContext) -> Option<Artifact> {
        Some(Artifact::new(
            format!("{}/{}.module.css", Self::dir(ctx), ctx.pascal_name),
            component_stylesheet(ctx),
        ))
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let usage = jsx_usage(ctx, &ctx.pascal_name, jsx_attr);
        let mut lines = vec![
            "import { render, screen } from '@testing-library/react';".to_string(),
            "import userEvent from '@testing-library/user-event';".to_string(),
            "import { describe, expect, it, vi } from 'vitest';".to_string(),
            format!("import {{ {} }} from './{}';", ctx.pascal_name, ctx.pascal_name),
            String::new(),
            format!("describe('{}', () => {{", ctx.pascal_name),
            format!("  it('renders with the {} role', () => {{", ctx.a11y.role),
            format!("    render({});", usage),
            format!("    expect(screen.getByRole('{}')).toBeInTheDocument();", ctx.a11y.role),
            "  });".to_string(),
        ];
        for prop in ctx.props.iter().filter(|p| dom_event(p) == Some("click")) {
            let with_handler = usage.replacen(" />", &format!(" {}={{handler}} />", prop.ident), 1);
            lines.push(String::new());
            lines.push(format!("  it('calls {} on click', async () => {{", prop.ident));
            lines.push("    const handler = vi.fn();".to_string());
            lines.push(format!("    render({});", with_handler));
            lines.push(format!(
                "    await userEvent.click(screen.getByRole('{}'));",
                ctx.a11y.role
            ));
            lines.push("    expect(handler).toHaveBeenCalledOnce();".to_string());
            lines.push("  });".to_string());
        }
        lines.push("});".to_string());
        Some(Artifact::new(
            format!("{}/{}.test.{}", Self::dir(ctx), ctx.pascal_name, Self::ext(ctx)),
            lines.join("\n") + "\n",
        ))
    }

    fn story(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let mut lines = vec![
            "import type { Meta, StoryObj } from '@storybook/react';".to_string(),
            format!("import {{ {} }} from './{}';", ctx.pascal_name, ctx.pascal_name),
            String::new(),
            "const meta = {".to_string(),
            format!("  title: '{}',", story_title(ctx)),
            format!("  component: {},", ctx.pascal_name),
            format!("  args: {},", story_args(ctx)),
            "  tags: ['autodocs'],".to_string(),
            format!("}} satisfies Meta<typeof {}>;", ctx.pascal_name),
            String::new(),
            "export default meta;".to_string(),
            "type Story = StoryObj<typeof meta>;".to_string(),
            String::new(),
            "export const Default: Story = {};".to_string(),
        ];
        if let Some(prop) = modifier_props(ctx).first() {
            for value in prop.enum_values.iter().flatten() {
                lines.push(String::new());
                lines.push(format!(
                    "export const {}{}: Story = {{ args: {{ {}: '{}' }} }};",
                    prop.pascal,
                    value.to_case(Case::Pascal),
                    prop.ident,
                    value
                ));
            }
        }
        Some(Artifact::new(
            format!("{}/{}.stories.{}", Self::dir(ctx), ctx.pascal_name, Self::ext(ctx)),
            lines.join("\n") + "\n",
        ))
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        vec![
            Artifact::new("src/styles/tokens.css", css_custom_properties(tokens)),
            Artifact::new("src/theme/tokens.ts", ts_token_object(tokens, true)),
        ]
    }

    fn theme(&self, _tokens: &FlatTokens) -> Artifact {
        let source = r#"import React, { createContext, useContext } from 'react';
import { tokens, type Tokens } from './tokens';
import '../styles/tokens.css';

const ThemeContext = createContext<Tokens>(tokens);

export function ThemeProvider({ children }: { children: React.ReactNode }) {
  return <ThemeContext.Provider value={tokens}>{children}</ThemeContext.Provider>;
}

export function useTheme(): Tokens {
  return useContext(ThemeContext);
}
"#;
        Artifact::new("src/theme/ThemeProvider.tsx", source)
    }

    fn utils(&self) -> Vec<Artifact> {
        vec![cx_util("src/lib/cx.ts", true)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        format!(
            "import {{ {} }} from '@/components/{}/{}/{}';\n\n{}",
            ctx.pascal_name,
            ctx.category,
            ctx.pascal_name,
            ctx.pascal_name,
            jsx_usage(ctx, &ctx.pascal_name, jsx_attr)
        )
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["Button", "Input", "Select", "Dialog", "Tabs", "Toast", "DataTable"])
            .layouts(&["Stack", "Grid", "Sidebar layout", "Holy grail"])
            .pattern(
                "form",
                r#"
<form onSubmit={handleSubmit(onSubmit)}>
  <Input label="Email" {...register('email')} />
  <Button type="submit">Save</Button>
</form>"#,
            )
            .pattern(
                "list",
                r#"
<ul role="list">
  {items.map((item) => (
    <ListItem key={item.id} {...item} />
  ))}
</ul>"#,
            )
            .pattern(
                "dashboard",
                r#"
<main className={styles.grid}>
  <Sidebar />
  <section>{cards.map((card) => <StatCard key={card.id} {...card} />)}</section>
</main>"#,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for};

    #[test]
    fn test_fallback_component() {
        let ctx = context_for(&ReactBackend, &button_spec());
        let code = ReactBackend.fallback_component(&ctx);
        assert!(code.contains("export function Button({ size = 'md', variant = 'primary', label, onPress, icon, className }: ButtonProps) {"));
        assert!(code.contains("      onClick={onPress}"));
        assert!(code.contains("styles[`button--size-${size}`]"));
        assert!(code.contains("size === 'lg' && variant === 'primary' && 'button-hero'"));
        assert!(code.contains("      {icon}\n      {label}"));
        assert!(!code.contains("role=\"button\""));
    }

    #[test]
    fn test_paths_follow_typescript_flag() {
        let mut ctx = context_for(&ReactBackend, &button_spec());
        assert_eq!(
            ReactBackend.component_path(&ctx),
            "src/components/interactive/Button/Button.tsx"
        );
        ctx.features.typescript = false;
        assert_eq!(
            ReactBackend.component_path(&ctx),
            "src/components/interactive/Button/Button.jsx"
        );
        assert!(ReactBackend.types(&ctx).is_none());
    }

    #[test]
    fn test_types_import_react_for_nodes() {
        let ctx = context_for(&ReactBackend, &button_spec());
        let types = ReactBackend.types(&ctx).unwrap();
        assert!(types.content.starts_with("import type * as React from 'react';"));
        assert!(types.content.contains("  label: string;"));
        assert!(types.content.contains("  icon?: React.ReactNode;"));
    }

    #[test]
    fn test_click_handler_test_is_generated() {
        let ctx = context_for(&ReactBackend, &button_spec());
        let test = ReactBackend.test(&ctx).unwrap();
        assert!(test.content.contains("it('calls onPress on click'"));
        assert!(test.content.contains("onPress={handler}"));
    }
}
