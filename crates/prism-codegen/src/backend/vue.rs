use super::web::{
    accessible_label, class_list_expr, component_stylesheet, css_custom_properties, cx_util,
    dom_event, html_tag, implicit_role, modifier_props, native_attr, story_args, story_title,
    text_prop, ts_props_interface, ts_token_object,
};
use super::{Artifact, PlatformBackend};
use crate::context::ComponentContext;
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use prism_core::{BuiltinPlatform, FlatTokens, PlatformFamily, PlatformId};

/// Vue 3 single-file components using `<script setup>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VueBackend;

impl VueBackend {
    fn dir(ctx: &ComponentContext) -> String {
        format!("src/components/{}", ctx.category)
    }
}

impl PlatformBackend for VueBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::Vue.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Web
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::Vue)
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("{}/{}.vue", Self::dir(ctx), ctx.pascal_name)
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let tag = html_tag(&ctx.a11y.role);
        let lang = if ctx.features.typescript { " lang=\"ts\"" } else { "" };
        let mut lines = vec![format!("<script setup{}>", lang)];
        lines.push("import { computed } from 'vue';".to_string());
        if ctx.has_content && ctx.features.typescript {
            lines.push("import type { VNode } from 'vue';".to_string());
        }
        lines.push("import { cx } from '../../lib/cx';".to_string());
        lines.push(String::new());

        // Props are destructured reactively; defaults live in the destructuring.
        let names: Vec<String> = ctx
            .props
            .iter()
            .filter(|p| !p.is_content)
            .map(|p| match &p.default {
                Some(default) => format!("{} = {}", p.ident, default),
                None => p.ident.clone(),
            })
            .collect();
        if ctx.features.typescript {
            lines.push(ts_props_interface(ctx, |p| !p.is_content, &[]));
            lines.push(String::new());
            lines.push(format!(
                "const {{ {} }} = defineProps<{}Props>();",
                names.join(", "),
                ctx.pascal_name
            ));
        } else {
            let keys: Vec<&str> = ctx
                .props
                .iter()
                .filter(|p| !p.is_content)
                .map(|p| p.ident.as_str())
                .collect();
            lines.push(format!(
                "const {{ {} }} = defineProps([{}]);",
                names.join(", "),
                keys.iter().map(|k| format!("'{}'", k)).collect::<Vec<_>>().join(", ")
            ));
        }

        let slots: Vec<_> = ctx.props.iter().filter(|p| p.is_content).collect();
        if !slots.is_empty() && ctx.features.typescript {
            lines.push(String::new());
            lines.push("defineSlots<{".to_string());
            for slot in &slots {
                lines.push(format!("  {}?: () => VNode[];", slot.ident));
            }
            lines.push("  default?: () => VNode[];".to_string());
            lines.push("}>();".to_string());
        }

        lines.push(String::new());
        lines.push(format!(
            "const classes = computed(() => {});",
            class_list_expr(ctx, &format!("'{}'", ctx.kebab_name), |axis, ident| {
                format!("`{}--{}-${{{}}}`", ctx.kebab_name, axis, ident)
            })
        ));
        lines.push("</script>".to_string());
        lines.push(String::new());

        lines.push("<template>".to_string());
        lines.push(format!("  <{}", tag));
        if tag == "button" {
            lines.push("    type=\"button\"".to_string());
        }
        if !implicit_role(tag, &ctx.a11y.role) {
            lines.push(format!("    role=\"{}\"", ctx.a11y.role));
        }
        if ctx.a11y.focusable && tag == "div" {
            lines.push("    tabindex=\"0\"".to_string());
        }
        if ctx.a11y.live_region {
            lines.push("    aria-live=\"polite\"".to_string());
        }
        if ctx.features.i18n {
            lines.push(format!("    :aria-label=\"$t('{}.a11y.label')\"", ctx.name));
        } else {
            lines.push(format!("    aria-label=\"{}\"", accessible_label(ctx)));
        }
        lines.push("    :class=\"classes\"".to_string());
        for prop in &ctx.props {
            if let Some(event) = dom_event(prop) {
                lines.push(format!("    @{}=\"{}?.($event)\"", event, prop.ident));
            } else if native_attr(prop) {
                lines.push(format!("    :{}=\"{}\"", prop.kebab, prop.ident));
            }
        }
        for prop in modifier_props(ctx) {
            lines.push(format!("    :data-{}=\"{}\"", prop.kebab, prop.ident));
        }
        lines.push("  >".to_string());
        for slot in &slots {
            lines.push(format!("    <slot name=\"{}\" />", slot.kebab));
        }
        let text: Vec<_> = ctx.props.iter().filter(|p| text_prop(p)).collect();
        match text.first() {
            Some(prop) => lines.push(format!("    <slot>{{{{ {} }}}}</slot>", prop.ident)),
            None => lines.push("    <slot />".to_string()),
        }
        lines.push(format!("  </{}>", tag));
        lines.push("</template>".to_string());
        lines.push(String::new());

        lines.push("<style scoped>".to_string());
        lines.push(component_stylesheet(ctx).trim_end().to_string());
        lines.push("</style>".to_string());
        lines.join("\n") + "\n"
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let tag = html_tag(&ctx.a11y.role);
        let props = story_args(ctx);
        let global = if ctx.features.i18n {
            ", global: { mocks: { $t: (key: string) => key } }"
        } else {
            ""
        };
        let mut lines = vec![
            "import { mount } from '@vue/test-utils';".to_string(),
            "import { describe, expect, it, vi } from 'vitest';".to_string(),
            format!("import {} from './{}.vue';", ctx.pascal_name, ctx.pascal_name),
            String::new(),
            format!("describe('{}', () => {{", ctx.pascal_name),
            format!("  it('renders a {} element', () => {{", tag),
            format!(
                "    const wrapper = mount({}, {{ props: {}{} }});",
                ctx.pascal_name, props, global
            ),
            format!("    expect(wrapper.find('{}').exists()).toBe(true);", tag),
            "  });".to_string(),
        ];
        for prop in ctx.props.iter().filter(|p| dom_event(p) == Some("click")) {
            let with_handler = format!("{{ ...{}, {}: handler }}", props, prop.ident);
            lines.push(String::new());
            lines.push(format!("  it('calls {} on click', async () => {{", prop.ident));
            lines.push("    const handler = vi.fn();".to_string());
            lines.push(format!(
                "    const wrapper = mount({}, {{ props: {}{} }});",
                ctx.pascal_name, with_handler, global
            ));
            lines.push("    await wrapper.trigger('click');".to_string());
            lines.push("    expect(handler).toHaveBeenCalledOnce();".to_string());
            lines.push("  });".to_string());
        }
        lines.push("});".to_string());
        Some(Artifact::new(
            format!("{}/{}.spec.ts", Self::dir(ctx), ctx.pascal_name),
            lines.join("\n") + "\n",
        ))
    }

    fn story(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let lines = vec![
            "import type { Meta, StoryObj } from '@storybook/vue3';".to_string(),
            format!("import {} from './{}.vue';", ctx.pascal_name, ctx.pascal_name),
            String::new(),
            "const meta = {".to_string(),
            format!("  title: '{}',", story_title(ctx)),
            format!("  component: {},", ctx.pascal_name),
            format!("  args: {},", story_args(ctx)),
            format!("}} satisfies Meta<typeof {}>;", ctx.pascal_name),
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
            Artifact::new("src/styles/tokens.css", css_custom_properties(tokens)),
            Artifact::new("src/theme/tokens.ts", ts_token_object(tokens, true)),
        ]
    }

    fn theme(&self, _tokens: &FlatTokens) -> Artifact {
        let source = r#"import type { App, InjectionKey } from 'vue';
import { tokens, type Tokens } from '../theme/tokens';
import '../styles/tokens.css';

export const themeKey: InjectionKey<Tokens> = Symbol('theme');

export const themePlugin = {
  install(app: App) {
    app.provide(themeKey, tokens);
  },
};
"#;
        Artifact::new("src/plugins/theme.ts", source)
    }

    fn utils(&self) -> Vec<Artifact> {
        let use_theme = r#"import { inject } from 'vue';
import { themeKey } from '../plugins/theme';
import { tokens } from '../theme/tokens';

export function useTheme() {
  return inject(themeKey, tokens);
}
"#;
        vec![
            cx_util("src/lib/cx.ts", true),
            Artifact::new("src/composables/useTheme.ts", use_theme),
        ]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        let attrs: Vec<String> = ctx
            .props
            .iter()
            .filter(|p| p.required || p.enum_values.is_some())
            .filter_map(|p| {
                let sample = p.sample.as_ref()?;
                Some(match sample.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
                    Some(inner) => format!("{}=\"{}\"", p.kebab, inner),
                    None => format!(":{}=\"{}\"", p.kebab, sample),
                })
            })
            .collect();
        format!(
            "<script setup lang=\"ts\">\nimport {} from '@/components/{}/{}.vue';\n</script>\n\n<template>\n  <{} {} />\n</template>",
            ctx.pascal_name,
            ctx.category,
            ctx.pascal_name,
            ctx.pascal_name,
            attrs.join(" ")
        )
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["BaseButton", "BaseInput", "BaseSelect", "AppDialog", "AppTabs", "DataTable"])
            .layouts(&["DefaultLayout with slots", "Grid", "Sidebar layout"])
            .pattern(
                "form",
                r#"
<form @submit.prevent="onSubmit">
  <BaseInput v-model="form.email" label="Email" />
  <BaseButton type="submit">Save</BaseButton>
</form>"#,
            )
            .pattern(
                "list",
                r#"
<ul role="list">
  <ListItem v-for="item in items" :key="item.id" v-bind="item" />
</ul>"#,
            )
            .pattern(
                "dashboard",
                r#"
<DefaultLayout>
  <template #sidebar><AppSidebar /></template>
  <StatCard v-for="card in cards" :key="card.id" v-bind="card" />
</DefaultLayout>"#,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for};

    #[test]
    fn test_sfc_structure() {
        let ctx = context_for(&VueBackend, &button_spec());
        let sfc = VueBackend.fallback_component(&ctx);
        assert!(sfc.starts_with("<script setup lang=\"ts\">"));
        assert!(sfc.contains(
            "const { size = 'md', variant = 'primary', label, onPress } = defineProps<ButtonProps>();"
        ));
        assert!(sfc.contains("  icon?: () => VNode[];"));
        assert!(sfc.contains("    @click=\"onPress?.($event)\""));
        assert!(sfc.contains("    <slot name=\"icon\" />"));
        assert!(sfc.contains("    <slot>{{ label }}</slot>"));
        assert!(sfc.contains("<style scoped>\n.button {"));
    }

    #[test]
    fn test_content_props_are_not_declared_as_props() {
        let ctx = context_for(&VueBackend, &button_spec());
        let sfc = VueBackend.fallback_component(&ctx);
        assert!(!sfc.contains("  icon?: VNode;"));
    }

    #[test]
    fn test_spec_mocks_translation() {
        let ctx = context_for(&VueBackend, &button_spec());
        let test = VueBackend.test(&ctx).unwrap();
        assert_eq!(test.path, "src/components/interactive/Button.spec.ts");
        assert!(test.content.contains("mocks: { $t: (key: string) => key }"));
    }
}
