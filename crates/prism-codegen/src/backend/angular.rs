use super::web::{
    accessible_label, class_list_expr, component_stylesheet, css_custom_properties, cx_util,
    dom_event, html_tag, implicit_role, modifier_props, native_attr, story_args, story_title,
    text_prop,
};
use super::{Artifact, PlatformBackend};
use crate::context::{ComponentContext, PropContext};
use crate::recommendations::Recommendations;
use crate::typemap::{mapper_for, TypeMapper};
use prism_core::{BuiltinPlatform, FlatTokens, PlatformFamily, PlatformId, TokenLayer};

/// Angular components with signal-free `@Input`/`@Output` bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct AngularBackend;

impl AngularBackend {
    fn dir(ctx: &ComponentContext) -> String {
        format!("src/app/components/{}", ctx.kebab_name)
    }

    fn standalone(ctx: &ComponentContext) -> bool {
        ctx.platform.convention.as_deref() != Some("module")
    }
}

/// Payload type of an `EventEmitter` for a callback type such as
/// `(value: string) => void`.
fn emitter_payload(ty: &str) -> String {
    let params = ty
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(") =>"))
        .map(|(params, _)| params.trim());
    match params {
        None | Some("") => "void".to_string(),
        Some(params) => match params.split_once(": ") {
            Some((_, first)) if !params.contains(", ") => first.to_string(),
            _ => "unknown[]".to_string(),
        },
    }
}

fn input_line(prop: &PropContext) -> String {
    if prop.required {
        format!("  @Input({{ required: true }}) {}!: {};", prop.ident, prop.ty)
    } else if let Some(default) = &prop.default {
        format!("  @Input() {}: {} = {};", prop.ident, prop.ty, default)
    } else {
        format!("  @Input() {}?: {};", prop.ident, prop.ty)
    }
}

/// Sass variable for a flattened token. Sass treats `-` and `_` alike, so
/// both become `-` along with any other character an identifier cannot hold.
fn scss_variable(name: &str) -> String {
    let body: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || !c.is_ascii() { c } else { '-' })
        .collect();
    if body.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        format!("$t-{}", body)
    } else {
        format!("${}", body)
    }
}

impl PlatformBackend for AngularBackend {
    fn id(&self) -> PlatformId {
        BuiltinPlatform::Angular.into()
    }

    fn family(&self) -> PlatformFamily {
        PlatformFamily::Web
    }

    fn type_mapper(&self) -> &dyn TypeMapper {
        mapper_for(BuiltinPlatform::Angular)
    }

    fn routing_conventions(&self) -> &'static [&'static str] {
        &["standalone", "module"]
    }

    fn component_path(&self, ctx: &ComponentContext) -> String {
        format!("{}/{}.component.ts", Self::dir(ctx), ctx.kebab_name)
    }

    fn fallback_component(&self, ctx: &ComponentContext) -> String {
        let tag = html_tag(&ctx.a11y.role);
        let standalone = Self::standalone(ctx);
        let has_outputs = ctx.has_callbacks;

        let mut core = vec!["ChangeDetectionStrategy", "Component"];
        if has_outputs {
            core.push("EventEmitter");
        }
        core.push("Input");
        if has_outputs {
            core.push("Output");
        }
        let mut lines = vec![format!("import {{ {} }} from '@angular/core';", core.join(", "))];
        if ctx.features.i18n && standalone {
            lines.push("import { TranslateModule } from '@ngx-translate/core';".to_string());
        }
        lines.push("import { cx } from '../../lib/class-names';".to_string());
        lines.push(String::new());
        for decl in &ctx.declarations {
            lines.push(decl.source.clone());
            lines.push(String::new());
        }

        lines.push("@Component({".to_string());
        lines.push(format!("  selector: 'app-{}',", ctx.kebab_name));
        if standalone {
            lines.push("  standalone: true,".to_string());
            if ctx.features.i18n {
                lines.push("  imports: [TranslateModule],".to_string());
            }
        } else {
            lines.push("  standalone: false,".to_string());
        }

        lines.push("  template: `".to_string());
        lines.push(format!("    <{}", tag));
        if tag == "button" {
            lines.push("      type=\"button\"".to_string());
        }
        if !implicit_role(tag, &ctx.a11y.role) {
            lines.push(format!("      role=\"{}\"", ctx.a11y.role));
        }
        if ctx.a11y.focusable && tag == "div" {
            lines.push("      tabindex=\"0\"".to_string());
        }
        if ctx.a11y.live_region {
            lines.push("      aria-live=\"polite\"".to_string());
        }
        if ctx.features.i18n {
            lines.push(format!(
                "      [attr.aria-label]=\"'{}.a11y.label' | translate\"",
                ctx.name
            ));
        } else {
            lines.push(format!("      aria-label=\"{}\"", accessible_label(ctx)));
        }
        lines.push("      [class]=\"classes\"".to_string());
        for prop in &ctx.props {
            if let Some(event) = dom_event(prop) {
                lines.push(format!("      ({})=\"{}.emit($event)\"", event, prop.ident));
            } else if native_attr(prop) {
                lines.push(format!("      [attr.{}]=\"{}\"", prop.kebab, prop.ident));
            }
        }
        for prop in modifier_props(ctx) {
            lines.push(format!("      [attr.data-{}]=\"{}\"", prop.kebab, prop.ident));
        }
        lines.push("    >".to_string());
        for prop in ctx.props.iter().filter(|p| p.is_content) {
            lines.push(format!("      <ng-content select=\"[{}]\" />", prop.kebab));
        }
        for prop in ctx.props.iter().filter(|p| text_prop(p)) {
            lines.push(format!("      {{{{ {} }}}}", prop.ident));
        }
        lines.push("      <ng-content />".to_string());
        lines.push(format!("    </{}>", tag));
        lines.push("  `,".to_string());
        lines.push(format!("  styleUrl: './{}.component.scss',", ctx.kebab_name));
        lines.push("  changeDetection: ChangeDetectionStrategy.OnPush,".to_string());
        lines.push("})".to_string());

        lines.push(format!("export class {}Component {{", ctx.pascal_name));
        for prop in ctx.value_props() {
            if let Some(deprecated) = &prop.deprecated {
                lines.push(format!(
                    "  /** @deprecated since {}: {} */",
                    deprecated.since, deprecated.reason
                ));
            } else if let Some(description) = &prop.description {
                lines.push(format!("  /** {} */", description));
            }
            lines.push(input_line(prop));
        }
        for prop in ctx.props.iter().filter(|p| p.is_callback) {
            lines.push(format!(
                "  @Output() readonly {} = new EventEmitter<{}>();",
                prop.ident,
                emitter_payload(&prop.ty)
            ));
        }

        let mut used: Vec<&str> = modifier_props(ctx).iter().map(|p| p.ident.as_str()).collect();
        for condition in ctx.compounds.iter().flat_map(|c| &c.conditions) {
            if !used.contains(&condition.prop.as_str()) {
                used.push(&condition.prop);
            }
        }
        lines.push(String::new());
        lines.push("  get classes(): string {".to_string());
        if !used.is_empty() {
            lines.push(format!("    const {{ {} }} = this;", used.join(", ")));
        }
        lines.push(format!(
            "    return {};",
            class_list_expr(ctx, &format!("'{}'", ctx.kebab_name), |axis, ident| {
                format!("`{}--{}-${{{}}}`", ctx.kebab_name, axis, ident)
            })
        ));
        lines.push("  }".to_string());
        lines.push("}".to_string());
        lines.join("\n") + "\n"
    }

    fn styles(&self, ctx: &ComponentContext) -> Option<Artifact> {
        Some(Artifact::new(
            format!("{}/{}.component.scss", Self::dir(ctx), ctx.kebab_name),
            format!(":host {{\n  display: contents;\n}}\n\n{}", component_stylesheet(ctx)),
        ))
    }

    fn test(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let class = format!("{}Component", ctx.pascal_name);
        let tag = html_tag(&ctx.a11y.role);
        let mut imports = Vec::new();
        if Self::standalone(ctx) {
            imports.push(class.clone());
        }
        if ctx.features.i18n {
            imports.push("TranslateModule.forRoot()".to_string());
        }
        let mut lines = vec!["import { ComponentFixture, TestBed } from '@angular/core/testing';".to_string()];
        if ctx.features.i18n {
            lines.push("import { TranslateModule } from '@ngx-translate/core';".to_string());
        }
        lines.push(format!("import {{ {} }} from './{}.component';", class, ctx.kebab_name));
        lines.push(String::new());
        lines.push(format!("describe('{}', () => {{", class));
        lines.push(format!("  let fixture: ComponentFixture<{}>;", class));
        lines.push(String::new());
        lines.push("  beforeEach(async () => {".to_string());
        lines.push("    await TestBed.configureTestingModule({".to_string());
        if !Self::standalone(ctx) {
            lines.push(format!("      declarations: [{}],", class));
        }
        lines.push(format!("      imports: [{}],", imports.join(", ")));
        lines.push("    }).compileComponents();".to_string());
        lines.push(format!("    fixture = TestBed.createComponent({});", class));
        for prop in ctx.value_props().filter(|p| p.required) {
            if let Some(sample) = &prop.sample {
                lines.push(format!(
                    "    fixture.componentRef.setInput('{}', {});",
                    prop.ident, sample
                ));
            }
        }
        lines.push("    fixture.detectChanges();".to_string());
        lines.push("  });".to_string());
        lines.push(String::new());
        lines.push("  it('should create', () => {".to_string());
        lines.push("    expect(fixture.componentInstance).toBeTruthy();".to_string());
        lines.push("  });".to_string());
        for prop in ctx.props.iter().filter(|p| dom_event(p) == Some("click")) {
            lines.push(String::new());
            lines.push(format!("  it('emits {} on click', () => {{", prop.ident));
            lines.push("    const spy = jasmine.createSpy('handler');".to_string());
            lines.push(format!(
                "    fixture.componentInstance.{}.subscribe(spy);",
                prop.ident
            ));
            lines.push(format!(
                "    fixture.nativeElement.querySelector('{}').click();",
                tag
            ));
            lines.push("    expect(spy).toHaveBeenCalled();".to_string());
            lines.push("  });".to_string());
        }
        lines.push("});".to_string());
        Some(Artifact::new(
            format!("{}/{}.component.spec.ts", Self::dir(ctx), ctx.kebab_name),
            lines.join("\n") + "\n",
        ))
    }

    fn story(&self, ctx: &ComponentContext) -> Option<Artifact> {
        let class = format!("{}Component", ctx.pascal_name);
        let lines = vec![
            "import type { Meta, StoryObj } from '@storybook/angular';".to_string(),
            format!("import {{ {} }} from './{}.component';", class, ctx.kebab_name),
            String::new(),
            format!("const meta: Meta<{}> = {{", class),
            format!("  title: '{}',", story_title(ctx)),
            format!("  component: {},", class),
            format!("  args: {},", story_args(ctx)),
            "};".to_string(),
            String::new(),
            "export default meta;".to_string(),
            format!("type Story = StoryObj<{}>;", class),
            String::new(),
            "export const Default: Story = {};".to_string(),
        ];
        Some(Artifact::new(
            format!("{}/{}.component.stories.ts", Self::dir(ctx), ctx.kebab_name),
            lines.join("\n") + "\n",
        ))
    }

    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact> {
        let mut scss = Vec::new();
        for layer in TokenLayer::ALL {
            for token in tokens.layer(layer) {
                let value = match &token.reference {
                    Some(target) => scss_variable(target),
                    None => token.value.render(),
                };
                scss.push(format!("{}: {};", scss_variable(&token.name), value));
            }
        }
        vec![
            Artifact::new("src/styles/_tokens.scss", scss.join("\n") + "\n"),
            Artifact::new("src/styles/tokens.css", css_custom_properties(tokens)),
        ]
    }

    fn theme(&self, _tokens: &FlatTokens) -> Artifact {
        let source = r#"import { DOCUMENT } from '@angular/common';
import { Injectable, inject } from '@angular/core';

export type ColorScheme = 'light' | 'dark';

@Injectable({ providedIn: 'root' })
export class ThemeService {
  private readonly document = inject(DOCUMENT);

  setScheme(scheme: ColorScheme): void {
    this.document.documentElement.dataset['theme'] = scheme;
  }

  token(name: string): string {
    return getComputedStyle(this.document.documentElement)
      .getPropertyValue(`--${name}`)
      .trim();
  }
}
"#;
        Artifact::new("src/app/theme/theme.service.ts", source)
    }

    fn utils(&self) -> Vec<Artifact> {
        vec![cx_util("src/app/lib/class-names.ts", true)]
    }

    fn usage_example(&self, ctx: &ComponentContext) -> String {
        let mut attrs = Vec::new();
        for prop in ctx.value_props().filter(|p| p.required || p.enum_values.is_some()) {
            if let Some(sample) = &prop.sample {
                attrs.push(format!("[{}]=\"{}\"", prop.ident, sample.replace('"', "&quot;")));
            }
        }
        for prop in ctx.props.iter().filter(|p| p.is_callback) {
            attrs.push(format!("({})=\"handle{}($event)\"", prop.ident, prop.pascal));
        }
        format!("<app-{} {}></app-{}>", ctx.kebab_name, attrs.join(" "), ctx.kebab_name)
    }

    fn token_symbol(&self, name: &str) -> String {
        scss_variable(name)
    }

    fn recommendations(&self) -> Recommendations {
        Recommendations::new(self.id())
            .components(&["mat-button", "mat-form-field", "mat-select", "mat-dialog", "mat-table", "mat-snack-bar"])
            .layouts(&["mat-sidenav-container", "CSS grid host", "Flex layout"])
            .pattern(
                "form",
                r#"
<form [formGroup]="form" (ngSubmit)="save()">
  <mat-form-field><input matInput formControlName="email" /></mat-form-field>
  <button mat-flat-button type="submit">Save</button>
</form>"#,
            )
            .pattern(
                "list",
                r#"
<ul role="list">
  @for (item of items; track item.id) {
    <app-list-item [item]="item" />
  }
</ul>"#,
            )
            .pattern(
                "dashboard",
                r#"
<mat-sidenav-container>
  <mat-sidenav mode="side" opened><app-nav /></mat-sidenav>
  <mat-sidenav-content><app-stat-grid [cards]="cards" /></mat-sidenav-content>
</mat-sidenav-container>"#,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for};

    #[test]
    fn test_emitter_payload() {
        assert_eq!(emitter_payload("() => void"), "void");
        assert_eq!(emitter_payload("(value: string) => void"), "string");
        assert_eq!(emitter_payload("(a: string, b: number) => void"), "unknown[]");
    }

    #[test]
    fn test_standalone_component() {
        let ctx = context_for(&AngularBackend, &button_spec());
        let code = AngularBackend.fallback_component(&ctx);
        assert!(code.contains("  standalone: true,"));
        assert!(code.contains("  @Input({ required: true }) label!: string;"));
        assert!(code.contains("  @Output() readonly onPress = new EventEmitter<void>();"));
        assert!(code.contains("      (click)=\"onPress.emit($event)\""));
        assert!(code.contains("      <ng-content select=\"[icon]\" />"));
        assert!(code.contains("    const { size, variant } = this;"));
    }

    #[test]
    fn test_module_convention_declares_component() {
        let mut ctx = context_for(&AngularBackend, &button_spec());
        ctx.platform.convention = Some("module".into());
        let code = AngularBackend.fallback_component(&ctx);
        assert!(code.contains("  standalone: false,"));
        let test = AngularBackend.test(&ctx).unwrap();
        assert!(test.content.contains("      declarations: [ButtonComponent],"));
    }

    #[test]
    fn test_scss_tokens_reference_variables() {
        let files = AngularBackend.emit_tokens(&crate::backend::tests::sample_tokens());
        assert!(files[0].content.contains("$spacing-section: $spacing-md;"));
    }

    #[test]
    fn test_scss_variables_are_identifiers() {
        assert_eq!(scss_variable("spacing-md"), "$spacing-md");
        assert_eq!(scss_variable("spacing-0.5"), "$spacing-0-5");
        assert_eq!(scss_variable("font_size"), "$font-size");
        assert_eq!(scss_variable("2xl"), "$t-2xl");
    }
}
