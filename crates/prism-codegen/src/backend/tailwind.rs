use super::web::{
    class_parts, css_custom_properties, css_var, jsx_attr, jsx_usage, modifier_props, object_key,
    ts_props_interface,
};
use super::{Artifact, PlatformBackend};
use crate::context::ComponentContext;
use crate::recommendations::Recommendations;
use crate::values::escape_single;
use crate::typemap::{mapper_for, TypeMapper};
use indexmap::IndexMap;
use prism_core::{BuiltinPlatform, FlatTokens, PlatformFamily, PlatformId, TokenLayer};

/// Tailwind variant recipes plus a `theme.extend` bound to CSS variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TailwindBackend;

/// Utility classes for well-known variant values.
fn value_classes(axis: &str, value: &str) -> Option<&'static str> {
    Some(match (axis, value) {
        ("size", "xs") => "h-7 px-2 text-xs",
        ("size", "sm") => "h-8 px-3 text-sm",
        ("size", "md") => "h-10 px-4 text-base",
        ("size", "lg") => "h-12 px-5 text-lg",
        ("size", "xl") => "h-14 px-6 text-xl",
        ("variant", "primary") => "bg-primary text-white hover:bg-primary/90",
        ("variant", "secondary") => "bg-secondary text-white hover:bg-secondary/90",
        ("variant", "outline") => "border border-current bg-transparent",
        ("variant", "ghost") => "bg-transparent hover:bg-black/5",
        ("variant", "danger") => "bg-red-600 text-white hover:bg-red-700",
        _ => return None,
    })
}

/// Arbitrary-value utility for a component token key.
fn token_utility(key: &str, name: &str) -> Option<String> {
    let prefix = match key {
        "background" | "bg" => "bg",
        "color" | "text" | "foreground" | "fg" => "text",
        "padding" => "p",
        "radius" | "border-radius" => "rounded",
        "gap" => "gap",
        "shadow" => "shadow",
        "border-color" => "border",
        _ => return None,
    };
    Some(format!("{}-[{}]", prefix, css_var(name)))
}

/// `theme.extend` section for the first path segment of a token.
fn theme_section(group: &str) -> Option<&'static str> {
    Some(match group {
        "color" | "colors" => "colors",
        "spacing" | "space" => "spacing",
        "radius" | "radii" | "rounded" => "borderRadius",
        "font" | "fonts" | "fontFamily" => "fontFamily",
        "fontSize" | "font-size" | "text" => "fontSize",
        "shadow" | "shadows" => "boxShadow",
        "breakpoint" | "breakpoints" | "screens" => "screens",
        _ => return None,
    })
}

impl TailwindBackend {
    fn recipe_name(ctx: &ComponentContext) -> String {
        format!("{}Variants", ctx.camel_name)
    }

    fn recipe(ctx: &ComponentContext) -> Vec<String> {
        let mut base = vec!["inline-flex items-center gap-2".to_string()];
        base.extend(ctx.tokens.iter().filter_map(|t| token_utility(&t.key, &t.name)));
        if ctx.a11y.focusable {
            base.push("focus-visible:outline-2 focus-visible:outline-offset-2".to_string());
        }

        let mut lines = vec![format!("export const {} = {{", Self::recipe_name(ctx))];
        lines.push(format!("  base: '{}',", base.join(" ")));
        lines.push("  variants: {".to_string());
        for prop in modifier_props(ctx) {
            lines.push(format!("    {}: {{", prop.ident));
            for value in prop.enum_values.iter().flatten() {
                let classes = value_classes(&prop.ident, value)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}-{}-{}", ctx.kebab_name, prop.kebab, value));
                lines.push(format!("      {}: '{}',", object_key(value), classes));
            }
            lines.push("    },".to_string());
        }
        lines.push("  },".to_string());

        lines.push("  compoundVariants: [".to_string());
        for compound in &ctx.compounds {
            let mut fields: Vec<String> = compound
                .conditions
                .iter()
                .map(|c| match &c.literal {
                    Some(literal) => format!("{}: {}", c.prop, literal),
                    None => format!("{}: '{}'", c.prop, c.value),
                })
                .collect();
            if let Some(class) = &compound.class_name {
                fields.push(format!("class: '{}'", class));
            }
            lines.push(format!("    {{ {} }},", fields.join(", ")));
        }
        lines.push("  ],".to_string());

        let defaults: Vec<String> = modifier_props(ctx)
            .into_iter()
            .filter_map(|p| p.default.as_ref().map(|d| format!("{}: {}", p.ident, d)))
            .collect();
        lines.push(format!("  defaultVariants: {{ {} }},", defaults.join(", ")));
        lines.push("} as const;".to_string());
        lines
    }
}

impl PlatformBackend for TailwindBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::Tailwind.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Stylesheet
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::Tailwind)
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("src/components/{}.ts", ctx.kebab_name)
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let recipe = Self::recipe_name(ctx);
        let modifiers = modifier_props(ctx);
        let mut lines = vec!["import { cn } from '../lib/cn';".to_string(), String::new()];
        lines.push(ts_props_interface(ctx, |_| true, &["className?: string;"]));
        lines.push(String::new());
        lines.extend(Self::recipe(ctx));
        lines.push(String::new());

        let picked: Vec<String> = modifiers.iter().map(|p| format!("'{}'", p.ident)).collect();
        let options = if picked.is_empty() {
            format!("Pick<{}Props, 'className'>", ctx.pascal_name)
        } else {
            format!("Pick<{}Props, {} | 'className'>", ctx.pascal_name, picked.join(" | "))
        };
        lines.push(format!("export type {}ClassOptions = {};", ctx.pascal_name, options));
        lines.push(String::new());

        let mut params: Vec<String> = modifiers
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{} = {}", p.ident, default),
                None => p.ident.clone(),
            })
            .collect();
        params.push("className".to_string());
        lines.push(format!(
            "export function {}Classes({{ {} }}: {}ClassOptions = {{}}): string {{",
            ctx.camel_name,
            params.join(", "),
            ctx.pascal_name
        ));
        let mut parts = class_parts(ctx, &format!("{}.base", recipe), |_, ident| {
            let prop = modifiers.iter().find(|p| p.ident == ident);
            match prop.and_then(|p| p.default.as_ref()) {
                Some(_) => format!("{}.variants.{}[{}]", recipe, ident, ident),
                None => format!("{} && {}.variants.{}[{}]", ident, recipe, ident, ident),
            }
        });
        parts.push("className".to_string());
        lines.push("  return cn(".to_string());
        for part in parts {
            lines.push(format!("    {},", part));
        }
        lines.push("  );".to_string());
        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        let mut sections: IndexMap<&str, Vec<(String, String)>> = IndexMap::new();
        for token in tokens.iter().filter(|t| t.layer != TokenLayer::Component) {
            let Some((group, rest)) = token.path.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if let Some(section) = theme_section(group) {
                sections
                    .entry(section)
                    .or_default()
                    .push((rest.join("-"), css_var(&token.name)));
            }
        }

        let mut lines = vec![
            "import type { Config } from 'tailwindcss';".to_string(),
            String::new(),
            "export default {".to_string(),
            "  content: ['./src/**/*.{ts,tsx,html}'],".to_string(),
            "  theme: {".to_string(),
            "    extend: {".to_string(),
        ];
        for (section, entries) in &sections {
            lines.push(format!("      {}: {{", section));
            for (key, value) in entries {
                lines.push(format!("        {}: '{}',", object_key(key), escape_single(value)));
            }
            lines.push("      },".to_string());
        }
        lines.push("    },".to_string());
        lines.push("  },".to_string());
        lines.push("} satisfies Config;".to_string());

        vec![
            Artifact::new("tailwind.config.ts", lines.join("\n") + "\n"),
            Artifact::new("src/styles/tokens.css", css_custom_properties(tokens)),
        ]
    }

    fn theme(&self, _tokens: &FlatTokens) -> Artifact {
        let source = r#"@import './tokens.css';

@tailwind base;
@tailwind components;
@tailwind utilities;

@layer base {
  :root {
    color-scheme: light dark;
  }

  [data-theme='dark'] {
    color-scheme: dark;
  }
}
"#;
        Artifact::new("src/styles/globals.css", source)
    }

    fn utils(&self) -> Vec<Artifact> {
        let source = r#"import { clsx, type ClassValue } from 'clsx';
import { twMerge } from 'tailwind-merge';

export function cn(...inputs: ClassValue[]): string {
  return twMerge(clsx(inputs));
}
"#;
        vec![Artifact::new("src/lib/cn.ts", source)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        let args: Vec<String> = modifier_props(ctx)
            .into_iter()
            .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
            .collect();
        let markup = jsx_usage(ctx, "button", jsx_attr);
        format!(
            "import {{ {}Classes }} from './components/{}';\n\nconst className = {}Classes({{ {} }});\n// {}",
            ctx.camel_name,
            ctx.kebab_name,
            ctx.camel_name,
            args.join(", "),
            markup.replacen("<button", "<button className={className}", 1)
        )
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["Button", "Input", "Card", "Badge", "Dialog", "Dropdown"])
            .layouts(&["Container", "Flex stack", "Responsive grid"])
            .pattern(
                "form",
                r#"
<form class="flex flex-col gap-4">
  <input class="h-10 rounded-md border px-3" name="email" />
  <button class="h-10 px-4 bg-primary text-white" type="submit">Save</button>
</form>"#,
            )
            .pattern(
                "list",
                r#"
<ul class="divide-y rounded-md border" role="list">
  <li class="p-4">First</li>
  <li class="p-4">Second</li>
</ul>"#,
            )
            .pattern(
                "dashboard",
                r#"
<main class="grid gap-6 md:grid-cols-[16rem_1fr]">
  <nav class="border-r p-4"></nav>
  <section class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3"></section>
</main>"#,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for, sample_tokens};

    #[test]
    fn test_recipe_has_variants_and_compounds() {
        let ctx = context_for(&TailwindBackend, &button_spec()).with_tokens(&sample_tokens());
        let code = TailwindBackend.fallback_component(&ctx);
        assert!(code.contains("export const buttonVariants = {"));
        assert!(code.contains("      md: 'h-10 px-4 text-base',"));
        assert!(code.contains("    { size: 'lg', variant: 'primary', class: 'button-hero' },"));
        assert!(code.contains("  defaultVariants: { size: 'md', variant: 'primary' },"));
        assert!(code.contains("bg-[var(--button-background)] p-[var(--button-padding)]"));
        assert!(code.contains("    buttonVariants.variants.size[size],"));
        assert!(code.contains("    size === 'lg' && variant === 'primary' && 'button-hero',"));
    }

    #[test]
    fn test_class_options_pick_modifiers() {
        let ctx = context_for(&TailwindBackend, &button_spec());
        let code = TailwindBackend.fallback_component(&ctx);
        assert!(code.contains(
            "export type ButtonClassOptions = Pick<ButtonProps, 'size' | 'variant' | 'className'>;"
        ));
        assert!(code.contains(
            "export function buttonClasses({ size = 'md', variant = 'primary', className }: ButtonClassOptions = {}): string {"
        ));
    }

    #[test]
    fn test_config_extends_theme_with_variables() {
        let files = TailwindBackend.emit_tokens(&sample_tokens());
        assert_eq!(files[0].path, "tailwind.config.ts");
        let config = &files[0].content;
        assert!(config.contains("        'blue-500': 'var(--colors-blue-500)',"));
        assert!(config.contains("        primary: 'var(--colors-primary)',"));
        assert!(config.contains("      borderRadius: {"));
        assert!(config.contains("        sans: 'var(--font-sans)',"));
        assert!(!config.contains("button"));
    }
}
