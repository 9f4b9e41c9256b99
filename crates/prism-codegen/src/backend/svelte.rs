use super::web::{
    accessible_label, class_list_expr, component_stylesheet, css_custom_properties, cx_util,
    dom_event, html_tag, implicit_role, jsx_attr, jsx_usage, modifier_props, native_attr,
    story_args, story_title, text_prop, ts_props_interface, ts_token_object,
};
use super::{Artifact, PlatformBackend};
use crate::context::ComponentContext;
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use prism_core::{BuiltinPlatform, FlatTokens, PlatformFamily, PlatformId};

/// Svelte 5 components using runes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvelteBackend;

impl SvelteBackend {
    fn kit(ctx: &ComponentContext) -> bool {
        ctx.platform.convention.as_deref() != Some("vite")
    }

    fn dir(ctx: &ComponentContext) -> String {
        if Self::kit(ctx) {
            format!("src/lib/components/{}", ctx.category)
        } else {
            format!("src/components/{}", ctx.category)
        }
    }
}

impl PlatformBackend for SvelteBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::Svelte.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Web
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::Svelte)
    }

    fn routing_conventions(&self) -> &'static [&'static str] {
        &["kit", "vite"]
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("{}/{}.svelte", Self::dir(ctx), ctx.pascal_name)
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let ts = ctx.features.typescript;
        let tag = html_tag(&ctx.a11y.role);
        let mut lines = vec![if ts {
            "<script lang=\"ts\">".to_string()
        } else {
            "<script>".to_string()
        }];
        if ts {
            lines.push("  import type { Snippet } from 'svelte';".to_string());
        }
        if ctx.features.i18n {
            lines.push("  import { _ } from 'svelte-i18n';".to_string());
        }
        if Self::kit(ctx) {
            lines.push("  import { cx } from '$lib/utils/cx';".to_string());
        } else {
            lines.push("  import { cx } from '../../lib/utils/cx';".to_string());
        }
        lines.push(String::new());

        let mut names: Vec<String> = ctx
            .props
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{} = {}", p.ident, default),
                None => p.ident.clone(),
            })
            .collect();
        names.push("children".to_string());
        if ts {
            let interface = ts_props_interface(ctx, |_| true, &["children?: Snippet;"])
                .replacen("export interface", "interface", 1)
                .replacen(&format!("interface {}Props", ctx.pascal_name), "interface Props", 1);
            for line in interface.lines() {
                lines.push(if line.is_empty() { String::new() } else { format!("  {}", line) });
            }
            lines.push(String::new());
            lines.push(format!("  let {{ {} }}: Props = $props();", names.join(", ")));
        } else {
            lines.push(format!("  let {{ {} }} = $props();", names.join(", ")));
        }
        lines.push(String::new());
        lines.push(format!(
            "  const classes = $derived({});",
            class_list_expr(ctx, &format!("'{}'", ctx.kebab_name), |axis, ident| {
                format!("`{}--{}-${{{}}}`", ctx.kebab_name, axis, ident)
            })
        ));
        lines.push("</script>".to_string());
        lines.push(String::new());

        lines.push(format!("<{}", tag));
        if tag == "button" {
            lines.push("  type=\"button\"".to_string());
        }
        if !implicit_role(tag, &ctx.a11y.role) {
            lines.push(format!("  role=\"{}\"", ctx.a11y.role));
        }
        if ctx.a11y.focusable && tag == "div" {
            lines.push("  tabindex=\"0\"".to_string());
        }
        if ctx.a11y.live_region {
            lines.push("  aria-live=\"polite\"".to_string());
        }
        if ctx.features.i18n {
            lines.push(format!("  aria-label={{$_('{}.a11y.label')}}", ctx.name));
        } else {
            lines.push(format!("  aria-label=\"{}\"", accessible_label(ctx)));
        }
        lines.push("  class={classes}".to_string());
        for prop in &ctx.props {
            if let Some(event) = dom_event(prop) {
                lines.push(format!("  on{}={{{}}}", event, prop.ident));
            } else if native_attr(prop) {
                lines.push(format!("  {}={{{}}}", prop.kebab, prop.ident));
            }
        }
        for prop in modifier_props(ctx) {
            lines.push(format!("  data-{}={{{}}}", prop.kebab, prop.ident));
        }
        lines.push(">".to_string());
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            lines.push(format!("  {{#if {}}}{{@render {}()}}{{/if}}", prop.ident, prop.ident));
        }
        for prop in ctx.props.iter().filter(|p| text_prop(p)) {
            lines.push(format!("  {{{}}}", prop.ident));
        }
        lines.push("  {@render children?.()}".to_string());
        lines.push(format!("</{}>", tag));
        lines.push(String::new());
        lines.push("<style>".to_string());
        for line in component_stylesheet(ctx).lines() {
            lines.push(if line.is_empty() { String::new() } else { format!("  {}", line) });
        }
        lines.push("</style>".to_string());
        lines.join("\n") + "\n"
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let props = story_args(ctx);
        let mut lines = vec![
            "import { render, screen } from '@testing-library/svelte';".to_string(),
            "import userEvent from '@testing-library/user-event';".to_string(),
            "import { describe, expect, it, vi } from 'vitest';".to_string(),
            format!("import {} from './{}.svelte';", ctx.pascal_name, ctx.pascal_name),
            String::new(),
        ];
        if ctx.features.i18n {
            lines.push("vi.mock('svelte-i18n', async () => {".to_string());
            lines.push("  const { readable } = await import('svelte/store');".to_string());
            lines.push("  return { _: readable((key: string) => key) };".to_string());
            lines.push("});".to_string());
            lines.push(String::new());
        }
        lines.push(format!("describe('{}', () => {{", ctx.pascal_name));
        lines.push(format!("  it('renders with the {} role', () => {{", ctx.a11y.role));
        lines.push(format!("    render({}, {{ props: {} }});", ctx.pascal_name, props));
        lines.push(format!(
            "    expect(screen.getByRole('{}')).toBeInTheDocument();",
            ctx.a11y.role
        ));
        lines.push("  });".to_string());
        for prop in ctx.props.iter().filter(|p| dom_event(p) == Some("click")) {
            lines.push(String::new());
            lines.push(format!("  it('calls {} on click', async () => {{", prop.ident));
            lines.push("    const handler = vi.fn();".to_string());
            lines.push(format!(
                "    render({}, {{ props: {{ ...{}, {}: handler }} }});",
                ctx.pascal_name, props, prop.ident
            ));
            lines.push(format!(
                "    await userEvent.click(screen.getByRole('{}'));",
                ctx.a11y.role
            ));
            lines.push("    expect(handler).toHaveBeenCalledOnce();".to_string());
            lines.push("  });".to_string());
        }
        lines.push("});".to_string());
        Some(Artifact::new(
            format!("{}/{}.test.ts", Self::dir(ctx), ctx.pascal_name),
            lines.join("\n") + "\n",
        ))
    }

    fn story(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let lines = vec![
            "import type { Meta, StoryObj } from '@storybook/svelte';".to_string(),
            format!("import {} from './{}.svelte';", ctx.pascal_name, ctx.pascal_name),
            String::new(),
            "const meta = {".to_string(),
            format!("  title: '{}',", story_title(ctx)),
            format!("  component: {},", ctx.pascal_name),
            format!("  args: {},", story_args(ctx)),
            format!("}} satisfies Meta<{}>;", ctx.pascal_name),
            String::new(),
            "export default meta;".to_string(),
            "type Story = StoryObj<typeof meta>;".to_string(),
            String::new(),
            "export const Default: Story = {};".to_string(),
        ];
        Some(Artifact::new(
            format!("{}/{}.stories.ts", Self::dir(ctx), ctx.pascal_name),
            lines.join("\n") + "\n",
        ))
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        vec![
            Artifact::new("src/lib/styles/tokens.css", css_custom_properties(tokens)),
            Artifact::new("src/lib/tokens.ts", ts_token_object(tokens, true)),
        ]
    }

    fn theme(&self, _tokens: &FlatTokens) -> Artifact {
        let source = r#"import { writable } from 'svelte/store';
import { tokens } from './tokens';
import './styles/tokens.css';

export type ColorScheme = 'light' | 'dark';

export const theme = tokens;
export const colorScheme = writable<ColorScheme>('light');

export function applyColorScheme(scheme: ColorScheme): void {
  document.documentElement.dataset.theme = scheme;
  colorScheme.set(scheme);
}
"#;
        Artifact::new("src/lib/theme.ts", source)
    }

    fn utils(&self) -> Vec<Artifact> {
        vec![cx_util("src/lib/utils/cx.ts", true)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        format!(
            "<script lang=\"ts\">\n  import {} from '$lib/components/{}/{}.svelte';\n</script>\n\n{}",
            ctx.pascal_name,
            ctx.category,
            ctx.pascal_name,
            jsx_usage(ctx, &ctx.pascal_name, jsx_attr)
        )
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["Button", "TextField", "Select", "Dialog", "Tabs", "Toast"])
            .layouts(&["+layout.svelte shell", "Grid", "Sidebar layout"])
            .pattern(
                "form",
                r#"
<form method="POST" use:enhance>
  <TextField name="email" label="Email" />
  <Button type="submit">Save</Button>
</form>"#,
            )
            .pattern(
                "list",
                r#"
<ul role="list">
  {#each items as item (item.id)}
    <ListItem {...item} />
  {/each}
</ul>"#,
            )
            .pattern(
                "dashboard",
                r#"
<main class="dashboard">
  <Sidebar />
  {#each cards as card (card.id)}<StatCard {...card} />{/each}
</main>"#,
            )
    }
}
