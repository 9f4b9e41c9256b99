use super::{activation_callback, token_ident, Artifact, PlatformBackend};
use crate::context::{ComponentContext, ComponentToken, PropContext};
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use crate::values::{escape_kotlin, format_number, ValueKind};
use convert_case::{Case, Casing};
use prism_core::{BuiltinPlatform, FlatToken, FlatTokens, PlatformFamily, PlatformId, TokenValue};
use std::collections::BTreeSet;

/// Kotlin package every generated file lives under.
const PACKAGE: &str = "com.example.designsystem";

/// Jetpack Compose functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeBackend;

impl ComposeBackend {
    fn package(ctx: &ComponentContext) -> String {
        format!("{}.components.{}", PACKAGE, ctx.category.to_case(Case::Snake))
    }

    fn source_dir(package: &str) -> String {
        format!("src/main/java/{}", package.replace('.', "/"))
    }
}

/// Parameter line. Nullable optionals default to `null`.
fn parameter(prop: &PropContext) -> String {
    if prop.required {
        format!("    {}: {},", prop.ident, prop.ty)
    } else if let Some(default) = &prop.default {
        format!("    {}: {} = {},", prop.ident, prop.ty, default)
    } else {
        format!("    {}: {} = null,", prop.ident, prop.optional_ty)
    }
}

fn semantics_role(role: &str) -> Option<&'static str> {
    Some(match role {
        "button" => "Role.Button",
        "checkbox" => "Role.Checkbox",
        "switch" => "Role.Switch",
        "radio" => "Role.RadioButton",
        "tab" => "Role.Tab",
        "img" => "Role.Image",
        "combobox" | "listbox" => "Role.DropdownList",
        _ => return None,
    })
}

/// `(literal, imports)` for a token constant.
fn token_constant(token: &FlatToken) -> (String, Option<&'static str>) {
    if let TokenValue::List(items) = &token.value {
        let items: Vec<String> = items.iter().map(|i| format!("\"{}\"", escape_kotlin(i))).collect();
        return (format!("listOf({})", items.join(", ")), None);
    }
    if let TokenValue::Bool(b) = &token.value {
        return (b.to_string(), None);
    }
    let kind = ValueKind::classify(&token.value);
    match &kind {
        ValueKind::Color { argb } => (
            format!("Color(0x{:08X})", argb),
            Some("androidx.compose.ui.graphics.Color"),
        ),
        ValueKind::Number(n) => (format!("{}f", format_number(*n)), None),
        ValueKind::Dimension { unit, .. } => match kind.as_points() {
            Some(points) if unit == "sp" => {
                (format!("{}.sp", format_number(points)), Some("androidx.compose.ui.unit.sp"))
            }
            Some(points) => (format!("{}.dp", format_number(points)), Some("androidx.compose.ui.unit.dp")),
            None => (format!("\"{}\"", escape_kotlin(&token.value.render())), None),
        },
        ValueKind::Text(text) => (format!("\"{}\"", escape_kotlin(text)), None),
    }
}

/// Modifier applying a component token, with the import it needs.
fn token_modifier(token: &ComponentToken) -> Option<(String, &'static str)> {
    let kind = ValueKind::classify(&TokenValue::String(token.value.clone()));
    let ident = format!("AppTokens.{}", token_ident(&token.name));
    match (token.key.as_str(), &kind) {
        ("background" | "bg", ValueKind::Color { .. }) => Some((
            format!(".background({})", ident),
            "androidx.compose.foundation.background",
        )),
        ("padding", ValueKind::Dimension { .. }) if kind.as_points().is_some() => Some((
            format!(".padding({})", ident),
            "androidx.compose.foundation.layout.padding",
        )),
        ("radius", ValueKind::Dimension { .. }) if kind.as_points().is_some() => Some((
            format!(".clip(RoundedCornerShape({}))", ident),
            "androidx.compose.foundation.shape.RoundedCornerShape",
        )),
        _ => None,
    }
}

impl PlatformBackend for ComposeBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::AndroidKotlin.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Native
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::AndroidKotlin)
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("{}/{}.kt", Self::source_dir(&Self::package(ctx)), ctx.pascal_name)
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let name = &ctx.pascal_name;
        let mut imports: BTreeSet<&'static str> = [
            "androidx.compose.foundation.layout.Arrangement",
            "androidx.compose.foundation.layout.Row",
            "androidx.compose.foundation.layout.padding",
            "androidx.compose.runtime.Composable",
            "androidx.compose.ui.Alignment",
            "androidx.compose.ui.Modifier",
            "androidx.compose.ui.semantics.contentDescription",
            "androidx.compose.ui.semantics.semantics",
            "androidx.compose.ui.tooling.preview.Preview",
            "androidx.compose.ui.unit.dp",
        ]
        .into_iter()
        .collect();

        let mut semantics = Vec::new();
        if let Some(role) = semantics_role(&ctx.a11y.role) {
            imports.insert("androidx.compose.ui.semantics.Role");
            imports.insert("androidx.compose.ui.semantics.role");
            semantics.push(format!("role = {}", role));
        }
        let label = ctx.a11y.label.clone().unwrap_or_else(|| ctx.name.to_case(Case::Title));
        semantics.push(format!("contentDescription = \"{}\"", escape_kotlin(&label)));
        if ctx.a11y.role == "heading" {
            imports.insert("androidx.compose.ui.semantics.heading");
            semantics.push("heading()".to_string());
        }
        if ctx.a11y.live_region {
            imports.insert("androidx.compose.ui.semantics.LiveRegionMode");
            imports.insert("androidx.compose.ui.semantics.liveRegion");
            semantics.push("liveRegion = LiveRegionMode.Polite".to_string());
        }

        let mut chain = vec![format!(
            ".semantics {{ {} }}",
            semantics.join("; ")
        )];
        if let Some(callback) = activation_callback(ctx) {
            imports.insert("androidx.compose.foundation.clickable");
            if callback.optional {
                chain.push(format!(
                    ".clickable(enabled = {} != null) {{ {}?.invoke() }}",
                    callback.ident, callback.ident
                ));
            } else {
                chain.push(format!(".clickable(onClick = {})", callback.ident));
            }
        }
        let mut has_tokens = false;
        let mut padded = false;
        for (modifier, import) in ctx.tokens.iter().filter_map(token_modifier) {
            padded |= modifier.starts_with(".padding(");
            imports.insert(import);
            if import.ends_with("RoundedCornerShape") {
                imports.insert("androidx.compose.ui.draw.clip");
            }
            chain.push(modifier);
            has_tokens = true;
        }
        if !padded {
            chain.push(".padding(horizontal = 16.dp, vertical = 8.dp)".to_string());
        }

        let mut body = Vec::new();
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            if prop.required {
                body.push(format!("{}()", prop.ident));
            } else {
                body.push(format!("{}?.invoke()", prop.ident));
            }
        }
        for prop in ctx.value_props().filter(|p| p.ty == "String") {
            imports.insert("androidx.compose.material3.Text");
            if prop.optional {
                body.push(format!("{}?.let {{ Text(text = it) }}", prop.ident));
            } else {
                body.push(format!("Text(text = {})", prop.ident));
            }
        }

        let mut lines = vec![format!("package {}", Self::package(ctx)), String::new()];
        for import in &imports {
            lines.push(format!("import {}", import));
        }
        if has_tokens {
            lines.push(format!("import {}.theme.AppTokens", PACKAGE));
        }
        lines.push(String::new());
        for decl in &ctx.declarations {
            lines.push(decl.source.clone());
            lines.push(String::new());
        }

        let mut doc = Vec::new();
        if let Some(description) = &ctx.description {
            doc.push(format!(" * {}", description));
        }
        let params: Vec<String> = ctx
            .props
            .iter()
            .filter_map(|p| {
                let note = match (&p.description, &p.deprecated) {
                    (_, Some(d)) => format!("Deprecated since {}: {}", d.since, d.reason),
                    (Some(description), None) => description.clone(),
                    (None, None) => return None,
                };
                Some(format!(" * @param {} {}", p.ident, note))
            })
            .collect();
        if !params.is_empty() {
            if !doc.is_empty() {
                doc.push(" *".to_string());
            }
            doc.extend(params);
        }
        if !doc.is_empty() {
            lines.push("/**".to_string());
            lines.extend(doc);
            lines.push(" */".to_string());
        }
        lines.push("@Composable".to_string());
        lines.push(format!("fun {}(", name));
        let required = ctx.props.iter().filter(|p| p.required && !p.is_content);
        let optional = ctx.props.iter().filter(|p| !p.required && !p.is_content);
        for prop in required {
            lines.push(parameter(prop));
        }
        lines.push("    modifier: Modifier = Modifier,".to_string());
        for prop in optional {
            lines.push(parameter(prop));
        }
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            lines.push(parameter(prop));
        }
        lines.push(") {".to_string());
        lines.push("    Row(".to_string());
        lines.push("        modifier = modifier".to_string());
        for (i, link) in chain.iter().enumerate() {
            let end = if i + 1 == chain.len() { "," } else { "" };
            lines.push(format!("            {}{}", link, end));
        }
        lines.push("        horizontalArrangement = Arrangement.spacedBy(8.dp),".to_string());
        lines.push("        verticalAlignment = Alignment.CenterVertically,".to_string());
        lines.push("    ) {".to_string());
        for item in &body {
            lines.push(format!("        {}", item));
        }
        lines.push("    }".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push("@Preview".to_string());
        lines.push("@Composable".to_string());
        lines.push(format!("private fun {}Preview() {{", name));
        lines.push(format!("    {}({})", name, named_args(ctx).join(", ")));
        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let name = &ctx.pascal_name;
        let label = ctx.a11y.label.clone().unwrap_or_else(|| ctx.name.to_case(Case::Title));
        let required: Vec<String> = ctx
            .value_props()
            .filter(|p| p.required)
            .filter_map(|p| p.sample.as_ref().map(|s| format!("{} = {}", p.ident, s)))
            .collect();
        let test_package = format!("{}.components", PACKAGE);
        let mut lines = vec![
            format!("package {}", test_package),
            String::new(),
            "import androidx.compose.ui.test.assertIsDisplayed".to_string(),
            "import androidx.compose.ui.test.junit4.createComposeRule".to_string(),
            "import androidx.compose.ui.test.onNodeWithContentDescription".to_string(),
        ];
        let callback = activation_callback(ctx).filter(|c| c.ty == "() -> Unit");
        if callback.is_some() {
            lines.push("import androidx.compose.ui.test.performClick".to_string());
        }
        lines.push(format!("import {}.{}", Self::package(ctx), name));
        if callback.is_some() {
            lines.push("import org.junit.Assert.assertTrue".to_string());
        }
        lines.push("import org.junit.Rule".to_string());
        lines.push("import org.junit.Test".to_string());
        lines.push(String::new());
        lines.push(format!("class {}Test {{", name));
        lines.push("    @get:Rule".to_string());
        lines.push("    val composeTestRule = createComposeRule()".to_string());
        lines.push(String::new());
        lines.push("    @Test".to_string());
        lines.push("    fun rendersWithContentDescription() {".to_string());
        lines.push(format!(
            "        composeTestRule.setContent {{ {}({}) }}",
            name,
            required.join(", ")
        ));
        lines.push(format!(
            "        composeTestRule.onNodeWithContentDescription(\"{}\").assertIsDisplayed()",
            escape_kotlin(&label)
        ));
        lines.push("    }".to_string());
        if let Some(callback) = callback {
            let mut args = required.clone();
            args.push(format!("{} = {{ fired = true }}", callback.ident));
            lines.push(String::new());
            lines.push("    @Test".to_string());
            lines.push(format!("    fun invokes{}() {{", callback.pascal));
            lines.push("        var fired = false".to_string());
            lines.push(format!(
                "        composeTestRule.setContent {{ {}({}) }}",
                name,
                args.join(", ")
            ));
            lines.push(format!(
                "        composeTestRule.onNodeWithContentDescription(\"{}\").performClick()",
                escape_kotlin(&label)
            ));
            lines.push("        assertTrue(fired)".to_string());
            lines.push("    }".to_string());
        }
        lines.push("}".to_string());
        Some(Artifact::new(
            format!(
                "src/androidTest/java/{}/{}Test.kt",
                test_package.replace('.', "/"),
                name
            ),
            lines.join("\n") + "\n",
        ))
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        let mut imports = BTreeSet::new();
        let mut body = Vec::new();
        for token in tokens.iter() {
            let (literal, import) = token_constant(token);
            let ident = token_ident(&token.name);
            let value = match token.reference.as_ref().and_then(|r| tokens.get(r)) {
                Some(target) if token_constant(target).1 == import => token_ident(&target.name),
                _ => {
                    if let Some(import) = import {
                        imports.insert(import);
                    }
                    literal.clone()
                }
            };
            let keyword = if literal.starts_with('"') || matches!(token.value, TokenValue::Bool(_)) {
                "const val"
            } else {
                "val"
            };
            body.push(format!("    {} {} = {}", keyword, ident, value));
        }
        let mut lines = vec![format!("package {}.theme", PACKAGE), String::new()];
        for import in &imports {
            lines.push(format!("import {}", import));
        }
        if !imports.is_empty() {
            lines.push(String::new());
        }
        lines.push("object AppTokens {".to_string());
        lines.extend(body);
        lines.push("}".to_string());
        vec![Artifact::new(
            format!("{}/theme/AppTokens.kt", Self::source_dir(PACKAGE)),
            lines.join("\n") + "\n",
        )]
    }

    fn theme(&self, tokens: &FlatTokens) -> Artifact {
        let primary = tokens
            .iter()
            .filter(|t| matches!(ValueKind::classify(&t.value), ValueKind::Color { .. }))
            .max_by_key(|t| t.name.contains("primary"))
            .map(|t| format!("primary = AppTokens.{}", token_ident(&t.name)))
            .unwrap_or_default();
        let source = format!(
            r#"package {PACKAGE}.theme

import androidx.compose.foundation.isSystemInDarkTheme
import androidx.compose.material3.MaterialTheme
import androidx.compose.material3.darkColorScheme
import androidx.compose.material3.lightColorScheme
import androidx.compose.runtime.Composable

@Composable
fun AppTheme(
    darkTheme: Boolean = isSystemInDarkTheme(),
    content: @Composable () -> Unit,
) {{
    val colors = if (darkTheme) {{
        darkColorScheme({primary})
    }} else {{
        lightColorScheme({primary})
    }}
    MaterialTheme(colorScheme = colors, content = content)
}}
"#
        );
        Artifact::new(format!("{}/theme/AppTheme.kt", Self::source_dir(PACKAGE)), source)
    }

    fn utils(&self) -> Vec<Artifact> {
        let source = format!(
            r#"package {PACKAGE}.util

import androidx.compose.ui.Modifier

/** Apply `block` only when `condition` holds. */
inline fun Modifier.thenIf(condition: Boolean, block: Modifier.() -> Modifier): Modifier =
    if (condition) then(block(Modifier)) else this
"#
        );
        vec![Artifact::new(
            format!("{}/util/Modifiers.kt", Self::source_dir(PACKAGE)),
            source,
        )]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        let mut args = named_args(ctx);
        if let Some(callback) = activation_callback(ctx) {
            args.push(format!("{} = {{ /* handle */ }}", callback.ident));
        }
        format!(
            "import {}.{}\n\n{}({})",
            Self::package(ctx),
            ctx.pascal_name,
            ctx.pascal_name,
            args.join(", ")
        )
    }

    fn token_symbol(&self, name: &str) -> String {
        token_ident(name)
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["Button", "OutlinedTextField", "ExposedDropdownMenuBox", "AlertDialog", "NavigationBar", "Snackbar"])
            .layouts(&["Scaffold", "Column/Row", "LazyColumn", "ListDetailPaneScaffold"])
            .pattern(
                "form",
                r#"
Column(verticalArrangement = Arrangement.spacedBy(12.dp)) {
    OutlinedTextField(value = email, onValueChange = { email = it }, label = { Text("Email") })
    Button(onClick = onSave) { Text("Save") }
}"#,
            )
            .pattern(
                "list",
                r#"
LazyColumn {
    items(items, key = { it.id }) { item -> ListItem(headlineContent = { Text(item.title) }) }
}"#,
            )
            .pattern(
                "dashboard",
                r#"
Scaffold(topBar = { TopAppBar(title = { Text("Dashboard") }) }) { padding ->
    LazyVerticalGrid(columns = GridCells.Adaptive(160.dp), contentPadding = padding) {
        items(cards) { StatCard(it) }
    }
}"#,
            )
    }
}

/// `name = literal` arguments for required and enumerated value props.
fn named_args(ctx: &ComponentContext) -> Vec<String> {
    ctx.value_props()
        .filter(|p| p.required || p.enum_values.is_some())
        .filter_map(|p| p.sample.as_ref().map(|s| format!("{} = {}", p.ident, s)))
        .collect()
}
