use super::{activation_callback, token_ident, Artifact, PlatformBackend};
use crate::context::{ComponentContext, PropContext};
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use crate::values::{escape_single, format_number, ValueKind};
use convert_case::{Case, Casing};
use prism_core::{BuiltinPlatform, FlatToken, FlatTokens, PlatformFamily, PlatformId, TokenValue};

/// Dart package name used in generated imports.
const PACKAGE: &str = "design_system";

/// Flutter stateless widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlutterBackend;

impl FlutterBackend {
    fn module(ctx: &ComponentContext) -> String {
        format!("components/{}/{}.dart", ctx.category.to_case(Case::Snake), ctx.snake_name)
    }
}

/// Dart can only default constructor parameters to constant expressions.
fn const_default(prop: &PropContext) -> Option<String> {
    let default = prop.default.as_ref()?;
    if default.starts_with("Uri.parse(") {
        return None;
    }
    if default.starts_with('[') {
        return Some(format!("const {}", default));
    }
    Some(default.clone())
}

fn nullable(prop: &PropContext) -> bool {
    !prop.required && const_default(prop).is_none()
}

/// `(type, literal)` for a token constant.
fn token_constant(token: &FlatToken) -> (&'static str, String) {
    if let TokenValue::List(items) = &token.value {
        let items: Vec<String> = items.iter().map(|i| format!("'{}'", escape_single(i))).collect();
        return ("List<String>", format!("[{}]", items.join(", ")));
    }
    if let TokenValue::Bool(b) = &token.value {
        return ("bool", b.to_string());
    }
    let kind = ValueKind::classify(&token.value);
    match kind {
        ValueKind::Color { argb } => ("Color", format!("Color(0x{:08X})", argb)),
        ValueKind::Number(n) => ("double", format_number(n)),
        ValueKind::Dimension { .. } => match kind.as_points() {
            Some(points) => ("double", format_number(points)),
            None => ("String", format!("'{}'", escape_single(&token.value.render()))),
        },
        ValueKind::Text(text) => ("String", format!("'{}'", escape_single(&text))),
    }
}

impl PlatformBackend for FlutterBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::Flutter.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Mobile
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::Flutter)
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("lib/{}", Self::module(ctx))
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let name = &ctx.pascal_name;
        let mut lines = vec!["import 'package:flutter/material.dart';".to_string(), String::new()];
        for decl in &ctx.declarations {
            lines.push(decl.source.clone());
            lines.push(String::new());
        }

        if let Some(description) = &ctx.description {
            lines.push(format!("/// {}", description));
        }
        lines.push(format!("class {} extends StatelessWidget {{", name));
        lines.push(format!("  const {}({{", name));
        lines.push("    super.key,".to_string());
        for prop in &ctx.props {
            if prop.required {
                lines.push(format!("    required this.{},", prop.ident));
            } else if let Some(default) = const_default(prop) {
                lines.push(format!("    this.{} = {},", prop.ident, default));
            } else {
                lines.push(format!("    this.{},", prop.ident));
            }
        }
        lines.push("  });".to_string());
        lines.push(String::new());
        for prop in &ctx.props {
            if let Some(deprecated) = &prop.deprecated {
                lines.push(format!("  @Deprecated('{}')", escape_single(&deprecated.reason)));
            }
            if let Some(description) = &prop.description {
                lines.push(format!("  /// {}", description));
            }
            let ty = if nullable(prop) { &prop.optional_ty } else { &prop.ty };
            lines.push(format!("  final {} {};", ty, prop.ident));
        }
        lines.push(String::new());

        let label = ctx.a11y.label.clone().unwrap_or_else(|| ctx.name.to_case(Case::Title));
        let mut children = Vec::new();
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            if nullable(prop) {
                children.push(format!("if ({} != null) {}!", prop.ident, prop.ident));
            } else {
                children.push(prop.ident.clone());
            }
        }
        for prop in ctx.value_props().filter(|p| p.ty == "String") {
            if nullable(prop) {
                children.push(format!("if ({} != null) Text({}!)", prop.ident, prop.ident));
            } else {
                children.push(format!("Text({})", prop.ident));
            }
        }
        lines.push("  @override".to_string());
        lines.push("  Widget build(BuildContext context) {".to_string());
        lines.push("    return Semantics(".to_string());
        match ctx.a11y.role.as_str() {
            "button" => lines.push("      button: true,".to_string()),
            "link" => lines.push("      link: true,".to_string()),
            "textbox" | "searchbox" => lines.push("      textField: true,".to_string()),
            "img" => lines.push("      image: true,".to_string()),
            "heading" => lines.push("      header: true,".to_string()),
            _ => {}
        }
        if ctx.a11y.live_region {
            lines.push("      liveRegion: true,".to_string());
        }
        lines.push(format!("      label: '{}',", escape_single(&label)));
        let row = format!(
            "Row(mainAxisSize: MainAxisSize.min, children: [{}])",
            children.join(", ")
        );
        match activation_callback(ctx) {
            Some(callback) => {
                lines.push("      child: InkWell(".to_string());
                lines.push(format!("        onTap: {},", callback.ident));
                lines.push("        child: Padding(".to_string());
                lines.push(
                    "          padding: const EdgeInsets.symmetric(horizontal: 16, vertical: 8),"
                        .to_string(),
                );
                lines.push(format!("          child: {},", row));
                lines.push("        ),".to_string());
                lines.push("      ),".to_string());
            }
            None => lines.push(format!("      child: {},", row)),
        }
        lines.push("    );".to_string());
        lines.push("  }".to_string());
        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let name = &ctx.pascal_name;
        let args: Vec<String> = ctx
            .value_props()
            .filter(|p| p.required)
            .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
            .collect();
        let mut lines = vec![
            "import 'package:flutter/material.dart';".to_string(),
            "import 'package:flutter_test/flutter_test.dart';".to_string(),
            format!("import 'package:{}/{}';", PACKAGE, Self::module(ctx)),
            String::new(),
            "void main() {".to_string(),
            format!("  testWidgets('{} renders', (tester) async {{", name),
            format!(
                "    await tester.pumpWidget(MaterialApp(home: Scaffold(body: {}({}))));",
                name,
                args.join(", ")
            ),
            format!("    expect(find.byType({}), findsOneWidget);", name),
            "  });".to_string(),
        ];
        if let Some(callback) = activation_callback(ctx) {
            let mut with_handler = args.clone();
            with_handler.push(format!("{}: () => calls++", callback.ident));
            lines.push(String::new());
            lines.push(format!("  testWidgets('{} calls {}', (tester) async {{", name, callback.ident));
            lines.push("    var calls = 0;".to_string());
            lines.push(format!(
                "    await tester.pumpWidget(MaterialApp(home: Scaffold(body: {}({}))));",
                name,
                with_handler.join(", ")
            ));
            lines.push(format!("    await tester.tap(find.byType({}));", name));
            lines.push("    expect(calls, 1);".to_string());
            lines.push("  });".to_string());
        }
        lines.push("}".to_string());
        Some(Artifact::new(
            format!("test/components/{}_test.dart", ctx.snake_name),
            lines.join("\n") + "\n",
        ))
    }

    fn story(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let args: Vec<String> = ctx
            .value_props()
            .filter(|p| p.required)
            .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
            .collect();
        let lines = vec![
            "import 'package:flutter/widgets.dart';".to_string(),
            "import 'package:widgetbook_annotation/widgetbook_annotation.dart' as widgetbook;".to_string(),
            format!("import 'package:{}/{}';", PACKAGE, Self::module(ctx)),
            String::new(),
            format!("@widgetbook.UseCase(name: 'Default', type: {})", ctx.pascal_name),
            format!("Widget build{}UseCase(BuildContext context) {{", ctx.pascal_name),
            format!("  return {}({});", ctx.pascal_name, args.join(", ")),
            "}".to_string(),
        ];
        Some(Artifact::new(
            format!("widgetbook/lib/{}.use_case.dart", ctx.snake_name),
            lines.join("\n") + "\n",
        ))
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        let mut lines = vec![
            "import 'package:flutter/widgets.dart';".to_string(),
            String::new(),
            "abstract final class AppTokens {".to_string(),
        ];
        for token in tokens.iter() {
            let (ty, literal) = token_constant(token);
            let value = match token.reference.as_ref().and_then(|r| tokens.get(r)) {
                Some(target) if token_constant(target).0 == ty => token_ident(&target.name),
                _ => literal,
            };
            lines.push(format!("  static const {} {} = {};", ty, token_ident(&token.name), value));
        }
        lines.push("}".to_string());
        vec![Artifact::new("lib/theme/tokens.dart", lines.join("\n") + "\n")]
    }

    fn theme(&self, tokens: &FlatTokens) -> Artifact {
        let colors: Vec<&FlatToken> = tokens
            .iter()
            .filter(|t| matches!(ValueKind::classify(&t.value), ValueKind::Color { .. }))
            .collect();
        let seed = colors
            .iter()
            .find(|t| t.name.contains("primary"))
            .or_else(|| colors.first())
            .map(|t| format!("AppTokens.{}", token_ident(&t.name)))
            .unwrap_or_else(|| "Colors.blue".to_string());
        let lines = vec![
            "import 'package:flutter/material.dart';".to_string(),
            String::new(),
            "import 'tokens.dart';".to_string(),
            String::new(),
            "abstract final class AppTheme {".to_string(),
            "  static ThemeData light() => _build(Brightness.light);".to_string(),
            String::new(),
            "  static ThemeData dark() => _build(Brightness.dark);".to_string(),
            String::new(),
            "  static ThemeData _build(Brightness brightness) {".to_string(),
            "    return ThemeData(".to_string(),
            "      useMaterial3: true,".to_string(),
            format!(
                "      colorScheme: ColorScheme.fromSeed(seedColor: {}, brightness: brightness),",
                seed
            ),
            "    );".to_string(),
            "  }".to_string(),
            "}".to_string(),
        ];
        Artifact::new("lib/theme/app_theme.dart", lines.join("\n") + "\n")
    }

    fn utils(&self) -> Vec<Artifact> {
        let source = r#"import 'package:flutter/widgets.dart';

enum ScreenSize { compact, medium, expanded }

extension ResponsiveContext on BuildContext {
  ScreenSize get screenSize {
    final width = MediaQuery.sizeOf(this).width;
    if (width < 600) return ScreenSize.compact;
    if (width < 840) return ScreenSize.medium;
    return ScreenSize.expanded;
  }
}
"#;
        vec![Artifact::new("lib/utils/responsive.dart", source)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        let mut args: Vec<String> = ctx
            .value_props()
            .filter(|p| p.required || p.enum_values.is_some())
            .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
            .collect();
        if let Some(callback) = activation_callback(ctx) {
            args.push(format!("{}: () {{}}", callback.ident));
        }
        format!(
            "import 'package:{}/{}';\n\n{}({})",
            PACKAGE,
            Self::module(ctx),
            ctx.pascal_name,
            args.join(", ")
        )
    }

    fn token_symbol(&self, name: &str) -> String {
        token_ident(name)
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["FilledButton", "TextFormField", "DropdownMenu", "AlertDialog", "NavigationBar", "SnackBar"])
            .layouts(&["Scaffold", "Column/Row", "LayoutBuilder breakpoints", "CustomScrollView"])
            .pattern(
                "form",
                r#"
Form(
  key: _formKey,
  child: Column(children: [
    TextFormField(decoration: const InputDecoration(labelText: 'Email')),
    FilledButton(onPressed: _submit, child: const Text('Save')),
  ]),
)"#,
            )
            .pattern(
                "list",
                r#"
ListView.builder(
  itemCount: items.length,
  itemBuilder: (context, index) => ListTile(title: Text(items[index].title)),
)"#,
            )
            .pattern(
                "dashboard",
                r#"
Scaffold(
  body: Row(children: [
    const NavigationRail(destinations: destinations, selectedIndex: 0),
    Expanded(child: GridView.count(crossAxisCount: 2, children: cards)),
  ]),
)"#,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for, sample_tokens};

    #[test]
    fn test_widget_fields_and_constructor() {
        let ctx = context_for(&FlutterBackend, &button_spec());
        let code = FlutterBackend.fallback_component(&ctx);
        assert!(code.contains("enum ButtonSize {"));
        assert!(code.contains("    this.size = ButtonSize.md,"));
        assert!(code.contains("    required this.label,"));
        assert!(code.contains("  final VoidCallback? onPress;"));
        assert!(code.contains("  final Widget? icon;"));
        assert!(code.contains("      button: true,"));
        assert!(code.contains("onTap: onPress,"));
        assert!(code.contains("children: [if (icon != null) icon!, Text(label)])"));
    }

    #[test]
    fn test_component_path_uses_snake_case() {
        let ctx = context_for(&FlutterBackend, &button_spec());
        assert_eq!(
            FlutterBackend.component_path(&ctx),
            "lib/components/interactive/button.dart"
        );
    }

    #[test]
    fn test_tokens_are_typed_constants() {
        let files = FlutterBackend.emit_tokens(&sample_tokens());
        let dart = &files[0].content;
        assert!(dart.contains("  static const Color colorsBlue500 = Color(0xFF3B82F6);"));
        assert!(dart.contains("  static const double spacingMd = 16;"));
        assert!(dart.contains("  static const double spacingSection = spacingMd;"));
        assert!(dart.contains("  static const List<String> fontSans = ['Inter', 'system-ui'];"));
    }

    #[test]
    fn test_theme_seeds_from_primary() {
        let theme = FlutterBackend.theme(&sample_tokens());
        assert!(theme.content.contains("seedColor: AppTokens.colorsPrimary"));
    }
}
