use super::{activation_callback, token_ident, Artifact, PlatformBackend};
use crate::context::{ComponentContext, ComponentToken, PropContext};
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use crate::values::{escape_double, format_number, ValueKind};
use convert_case::{Case, Casing};
use prism_core::{BuiltinPlatform, FlatToken, FlatTokens, PlatformFamily, PlatformId, TokenValue};

/// SwiftUI views named `{Component}View`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwiftUIBackend;

impl SwiftUIBackend {
    fn view_name(ctx: &ComponentContext) -> String {
        format!("{}View", ctx.pascal_name)
    }
}

fn property_line(prop: &PropContext) -> String {
    if prop.required {
        format!("    let {}: {}", prop.ident, prop.ty)
    } else if let Some(default) = &prop.default {
        format!("    var {}: {} = {}", prop.ident, prop.ty, default)
    } else {
        format!("    var {}: {} = nil", prop.ident, prop.optional_ty)
    }
}

/// `(type annotation, literal)` for a token constant.
fn token_constant(token: &FlatToken) -> (&'static str, String) {
    if let TokenValue::List(items) = &token.value {
        let items: Vec<String> = items.iter().map(|i| format!("\"{}\"", escape_double(i))).collect();
        return ("[String]", format!("[{}]", items.join(", ")));
    }
    if let TokenValue::Bool(b) = &token.value {
        return ("Bool", b.to_string());
    }
    let kind = ValueKind::classify(&token.value);
    match kind {
        ValueKind::Color { argb } => ("Color", format!("Color(argb: 0x{:08X})", argb)),
        ValueKind::Number(n) => ("CGFloat", format_number(n)),
        ValueKind::Dimension { .. } => match kind.as_points() {
            Some(points) => ("CGFloat", format_number(points)),
            None => ("String", format!("\"{}\"", escape_double(&token.value.render()))),
        },
        ValueKind::Text(text) => ("String", format!("\"{}\"", escape_double(&text))),
    }
}

/// View modifier applying a component token, when its key and value agree.
fn token_modifier(token: &ComponentToken) -> Option<String> {
    let kind = ValueKind::classify(&TokenValue::String(token.value.clone()));
    let ident = format!("Tokens.{}", token_ident(&token.name));
    match (token.key.as_str(), kind) {
        ("background" | "bg", ValueKind::Color { .. }) => Some(format!(".background({})", ident)),
        ("foreground" | "text" | "fg", ValueKind::Color { .. }) => {
            Some(format!(".foregroundStyle({})", ident))
        }
        ("padding", k) if k.as_points().is_some() => Some(format!(".padding({})", ident)),
        ("radius", k) if k.as_points().is_some() => Some(format!(
            ".clipShape(RoundedRectangle(cornerRadius: {}))",
            ident
        )),
        _ => None,
    }
}

impl PlatformBackend for SwiftUIBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::IosSwift.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Native
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::IosSwift)
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!(
            "Sources/Components/{}/{}.swift",
            ctx.category.to_case(Case::Pascal),
            ctx.pascal_name
        )
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let view = Self::view_name(ctx);
        let mut lines = vec!["import SwiftUI".to_string(), String::new()];
        for decl in &ctx.declarations {
            lines.push(decl.source.clone());
            lines.push(String::new());
        }

        if let Some(description) = &ctx.description {
            lines.push(format!("/// {}", description));
        }
        lines.push(format!("struct {}: View {{", view));
        for prop in &ctx.props {
            if let Some(deprecated) = &prop.deprecated {
                lines.push(format!(
                    "    @available(*, deprecated, message: \"{}\")",
                    escape_double(&deprecated.reason)
                ));
            }
            if let Some(description) = &prop.description {
                lines.push(format!("    /// {}", description));
            }
            lines.push(property_line(prop));
        }
        lines.push(String::new());

        let mut content = Vec::new();
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            if prop.required {
                content.push(prop.ident.clone());
            } else {
                content.push(format!("if let {} {{ {} }}", prop.ident, prop.ident));
            }
        }
        for prop in ctx.value_props().filter(|p| p.ty == "String") {
            if prop.optional {
                content.push(format!("if let {} {{ Text({}) }}", prop.ident, prop.ident));
            } else {
                content.push(format!("Text({})", prop.ident));
            }
        }

        lines.push("    var body: some View {".to_string());
        let indent = match activation_callback(ctx) {
            Some(callback) => {
                let call = if callback.optional {
                    format!("{}?()", callback.ident)
                } else {
                    format!("{}()", callback.ident)
                };
                lines.push(format!("        Button(action: {{ {} }}) {{", call));
                "            "
            }
            None => "        ",
        };
        lines.push(format!("{}HStack(spacing: 8) {{", indent));
        for item in &content {
            lines.push(format!("{}    {}", indent, item));
        }
        lines.push(format!("{}}}", indent));
        if activation_callback(ctx).is_some() {
            lines.push("        }".to_string());
        } else {
            lines.push("        .accessibilityElement(children: .combine)".to_string());
        }
        for modifier in ctx.tokens.iter().filter_map(token_modifier) {
            lines.push(format!("        {}", modifier));
        }
        let label = ctx.a11y.label.clone().unwrap_or_else(|| ctx.name.to_case(Case::Title));
        lines.push(format!(
            "        .accessibilityLabel(Text(\"{}\"))",
            escape_double(&label)
        ));
        let trait_name = match ctx.a11y.role.as_str() {
            "button" if activation_callback(ctx).is_none() => Some(".isButton"),
            "link" => Some(".isLink"),
            "heading" => Some(".isHeader"),
            "img" => Some(".isImage"),
            "searchbox" => Some(".isSearchField"),
            _ => None,
        };
        if let Some(trait_name) = trait_name {
            lines.push(format!("        .accessibilityAddTraits({})", trait_name));
        }
        if ctx.a11y.live_region {
            lines.push("        .accessibilityAddTraits(.updatesFrequently)".to_string());
        }
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        let args = preview_args(ctx);
        lines.push("#Preview {".to_string());
        lines.push(format!("    {}({})", view, args.join(", ")));
        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let view = Self::view_name(ctx);
        let required: Vec<String> = ctx
            .value_props()
            .filter(|p| p.required)
            .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
            .collect();
        let mut lines = vec![
            "import SwiftUI".to_string(),
            "import XCTest".to_string(),
            "@testable import Components".to_string(),
            String::new(),
            format!("final class {}Tests: XCTestCase {{", view),
            "    func testBodyBuilds() {".to_string(),
            format!("        _ = {}({}).body", view, required.join(", ")),
            "    }".to_string(),
        ];
        let enum_defaults: Vec<&PropContext> = ctx
            .props
            .iter()
            .filter(|p| p.default.as_deref().is_some_and(|d| d.starts_with('.')))
            .collect();
        if !enum_defaults.is_empty() {
            lines.push(String::new());
            lines.push("    func testDefaults() {".to_string());
            lines.push(format!("        let view = {}({})", view, required.join(", ")));
            for prop in enum_defaults {
                if let Some(default) = &prop.default {
                    lines.push(format!("        XCTAssertEqual(view.{}, {})", prop.ident, default));
                }
            }
            lines.push("    }".to_string());
        }
        if let Some(callback) = activation_callback(ctx).filter(|c| c.ty == "() -> Void") {
            let mut args = required.clone();
            args.push(format!("{}: {{ fired = true }}", callback.ident));
            let call = if callback.optional { "?()" } else { "()" };
            lines.push(String::new());
            lines.push(format!("    func test{}IsInvoked() {{", callback.pascal));
            lines.push("        var fired = false".to_string());
            lines.push(format!("        let view = {}({})", view, args.join(", ")));
            lines.push(format!("        view.{}{}", callback.ident, call));
            lines.push("        XCTAssertTrue(fired)".to_string());
            lines.push("    }".to_string());
        }
        lines.push("}".to_string());
        Some(Artifact::new(
            format!("Tests/ComponentsTests/{}Tests.swift", view),
            lines.join("\n") + "\n",
        ))
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        let mut lines = vec![
            "import SwiftUI".to_string(),
            String::new(),
            "public enum Tokens {".to_string(),
        ];
        for token in tokens.iter() {
            let (ty, literal) = token_constant(token);
            let line = match token.reference.as_ref().and_then(|r| tokens.get(r)) {
                Some(target) if token_constant(target).0 == ty => format!(
                    "    public static let {} = {}",
                    token_ident(&token.name),
                    token_ident(&target.name)
                ),
                _ => format!(
                    "    public static let {}: {} = {}",
                    token_ident(&token.name),
                    ty,
                    literal
                ),
            };
            lines.push(line);
        }
        lines.push("}".to_string());
        vec![Artifact::new("Sources/Theme/Tokens.swift", lines.join("\n") + "\n")]
    }

    fn theme(&self, tokens: &FlatTokens) -> Artifact {
        let colors: Vec<&FlatToken> = tokens
            .iter()
            .filter(|t| matches!(ValueKind::classify(&t.value), ValueKind::Color { .. }))
            .collect();
        let primary = colors
            .iter()
            .find(|t| t.name.contains("primary"))
            .or_else(|| colors.first())
            .map(|t| format!("Tokens.{}", token_ident(&t.name)))
            .unwrap_or_else(|| "Color.accentColor".to_string());
        let source = format!(
            r#"import SwiftUI

public struct Theme {{
    public var primary: Color

    public init(primary: Color) {{
        self.primary = primary
    }}

    public static let standard = Theme(primary: {primary})
}}

private struct ThemeKey: EnvironmentKey {{
    static let defaultValue = Theme.standard
}}

public extension EnvironmentValues {{
    var theme: Theme {{
        get {{ self[ThemeKey.self] }}
        set {{ self[ThemeKey.self] = newValue }}
    }}
}}
"#
        );
        Artifact::new("Sources/Theme/Theme.swift", source)
    }

    fn utils(&self) -> Vec<Artifact> {
        let source = r#"import SwiftUI

public extension Color {
    init(argb: UInt32) {
        self.init(
            .sRGB,
            red: Double((argb >> 16) & 0xFF) / 255,
            green: Double((argb >> 8) & 0xFF) / 255,
            blue: Double(argb & 0xFF) / 255,
            opacity: Double((argb >> 24) & 0xFF) / 255
        )
    }

    init(hex: String) {
        let digits = hex.trimmingCharacters(in: CharacterSet.alphanumerics.inverted)
        var value: UInt64 = 0
        Scanner(string: digits).scanHexInt64(&value)
        let argb: UInt32
        switch digits.count {
        case 3:
            let r = UInt32((value >> 8) & 0xF) * 17
            let g = UInt32((value >> 4) & 0xF) * 17
            let b = UInt32(value & 0xF) * 17
            argb = 0xFF00_0000 | r << 16 | g << 8 | b
        case 6:
            argb = 0xFF00_0000 | UInt32(value)
        case 8:
            argb = UInt32(value >> 8) | UInt32(value & 0xFF) << 24
        default:
            argb = 0xFF00_0000
        }
        self.init(argb: argb)
    }
}
"#;
        vec![Artifact::new("Sources/Utilities/Color+Hex.swift", source)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        format!("{}({})", Self::view_name(ctx), preview_args(ctx).join(", "))
    }

    fn token_symbol(&self, name: &str) -> String {
        token_ident(name)
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["Button", "TextField", "Picker", "Toggle", "NavigationStack", "List", "Sheet"])
            .layouts(&["VStack/HStack", "Grid", "NavigationSplitView", "ScrollView with LazyVStack"])
            .pattern(
                "form",
                r#"
Form {
    TextField("Email", text: $email)
    Button("Save", action: save)
}"#,
            )
            .pattern(
                "list",
                r#"
List(items) { item in
    Text(item.title)
}"#,
            )
            .pattern(
                "dashboard",
                r#"
NavigationSplitView {
    SidebarView()
} detail: {
    LazyVGrid(columns: [GridItem(.adaptive(minimum: 160))]) {
        ForEach(cards) { StatCardView(card: $0) }
    }
}"#,
            )
    }
}

/// Arguments for previews and examples: required and enumerated props in
/// declaration order.
fn preview_args(ctx: &ComponentContext) -> Vec<String> {
    ctx.value_props()
        .filter(|p| p.required || p.enum_values.is_some())
        .filter_map(|p| p.sample.as_ref().map(|s| format!("{}: {}", p.ident, s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for, sample_tokens};
    use insta::assert_snapshot;

    #[test]
    fn test_view_properties() {
        let ctx = context_for(&SwiftUIBackend, &button_spec());
        let code = SwiftUIBackend.fallback_component(&ctx);
        assert!(code.contains("enum ButtonSize: String, CaseIterable {"));
        assert!(code.contains("struct ButtonView: View {"));
        assert!(code.contains("    var size: ButtonSize = .md"));
        assert!(code.contains("    let label: String"));
        assert!(code.contains("    var onPress: (() -> Void)? = nil"));
        assert!(code.contains("    var icon: AnyView? = nil"));
        assert!(code.contains("        Button(action: { onPress?() }) {"));
        assert!(code.contains("                if let icon { icon }"));
        assert!(code.contains("        .accessibilityLabel(Text(\"Action\"))"));
        assert!(code.contains("#Preview {\n    ButtonView(size: .md, variant: .primary, label: \"Label\")\n}"));
    }

    #[test]
    fn test_component_tokens_become_modifiers() {
        let ctx = context_for(&SwiftUIBackend, &button_spec()).with_tokens(&sample_tokens());
        let code = SwiftUIBackend.fallback_component(&ctx);
        assert!(code.contains("        .background(Tokens.buttonBackground)"));
        assert!(code.contains("        .padding(Tokens.buttonPadding)"));
    }

    #[test]
    fn test_tests_cover_defaults_and_callback() {
        let ctx = context_for(&SwiftUIBackend, &button_spec());
        let test = SwiftUIBackend.test(&ctx).unwrap();
        assert_eq!(test.path, "Tests/ComponentsTests/ButtonViewTests.swift");
        assert!(test.content.contains("        XCTAssertEqual(view.size, .md)"));
        assert!(test.content.contains("        view.onPress?()"));
    }

    #[test]
    fn test_tokens_file() {
        let files = SwiftUIBackend.emit_tokens(&sample_tokens());
        assert_snapshot!(files[0].content, @r###"
        import SwiftUI

        public enum Tokens {
            public static let colorsBlue500: Color = Color(argb: 0xFF3B82F6)
            public static let colorsWhite: Color = Color(argb: 0xFFFFFFFF)
            public static let spacingSm: CGFloat = 8
            public static let spacingMd: CGFloat = 16
            public static let radiusMd: CGFloat = 6
            public static let fontSans: [String] = ["Inter", "system-ui"]
            public static let colorsPrimary = colorsBlue500
            public static let spacingSection = spacingMd
            public static let buttonBackground = colorsPrimary
            public static let buttonPadding = spacingSm
        }
        "###);
    }
}
