//! Cached vs uncached transformation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prism_engine::{EngineConfig, Orchestrator, TokenSchema};
use tokio::runtime::Runtime;

const SCHEMA: &str = r##"{
  "id": "bench",
  "tokens": {
    "primitive": {
      "colors": {"blue": {"500": "#3b82f6", "600": "#2563eb"}, "white": "#ffffff"},
      "spacing": {"sm": "0.5rem", "md": "1rem", "lg": "1.5rem"},
      "radius": {"md": "6px"}
    },
    "semantic": {
      "colors": {"primary": "{colors.blue.500}", "primary-hover": "{colors.blue.600}"},
      "spacing": {"section": {"ref": "lg"}}
    },
    "component": {
      "button": {"background": "{colors.primary}", "padding": "{spacing.sm}"}
    }
  },
  "components": {
    "Button": {
      "name": "Button",
      "category": "interactive",
      "props": {
        "size": {"type": "custom", "custom": "size", "default": "md"},
        "variant": {"type": "custom", "custom": "variant", "default": "primary"},
        "label": {"type": "primitive", "primitive": "string", "required": true},
        "on_press": {"type": "complex", "complex": "function"}
      },
      "accessibility": {"role": "button"}
    },
    "Card": {
      "name": "Card",
      "category": "layout",
      "props": {
        "title": {"type": "primitive", "primitive": "string"},
        "elevated": {"type": "primitive", "primitive": "boolean", "default": false}
      },
      "accessibility": {"role": "region"}
    }
  }
}"##;

fn transform_uncached(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let schema = TokenSchema::from_json(SCHEMA).unwrap();
    c.bench_function("transform_uncached_react", |b| {
        b.iter(|| {
            let engine = Orchestrator::from_config(&EngineConfig::default());
            runtime.block_on(engine.transform(black_box(&schema), "react")).unwrap()
        })
    });
}

fn transform_cached(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let schema = TokenSchema::from_json(SCHEMA).unwrap();
    let engine = Orchestrator::from_config(&EngineConfig::default());
    runtime.block_on(engine.transform(&schema, "react")).unwrap();
    c.bench_function("transform_cached_react", |b| {
        b.iter(|| runtime.block_on(engine.transform(black_box(&schema), "react")).unwrap())
    });
}

criterion_group!(benches, transform_uncached, transform_cached);
criterion_main!(benches);
