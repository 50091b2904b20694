use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use std::collections::HashMap;
use std::hint::black_box;
use swaggerize::{describe, DrainConfig, Generator, PathItemInfo, Reflect};

#[derive(Reflect)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: Option<String>,
}

#[derive(Reflect)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub addresses: Vec<Address>,
    pub labels: HashMap<String, String>,
}

#[derive(Reflect)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Reflect)]
pub struct Order {
    pub id: u64,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub parent: Option<Box<Order>>,
}

#[derive(Reflect)]
pub struct OrderParams {
    #[swagger(path = "id")]
    pub id: u64,
    #[swagger(param = "expand", required = false)]
    pub expand: Vec<String>,
}

fn bench_parse_definition(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_definition");
    for (label, config) in [
        ("sequential", DrainConfig::sequential()),
        ("parallel", DrainConfig::default()),
    ] {
        group.bench_function(label, |b| {
            let generator = Generator::new().with_drain_config(config);
            b.iter(|| {
                generator.reset_definitions();
                black_box(generator.parse_definition(&describe::<Order>()).unwrap());
            })
        });
    }
    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let generator = Generator::new().with_drain_config(DrainConfig::sequential());
    for i in 0..50 {
        generator
            .set_path_item(
                &PathItemInfo::new(format!("/orders{i}/{{id:[0-9]+}}"), Method::GET),
                Some(&describe::<OrderParams>()),
                None,
                Some(&describe::<Order>()),
            )
            .unwrap();
    }
    c.bench_function("gen_document_50_paths", |b| {
        b.iter(|| black_box(generator.gen_document().unwrap()))
    });
}

criterion_group!(benches, bench_parse_definition, bench_document);
criterion_main!(benches);
