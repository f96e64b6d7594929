use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use storefront_core::{BrandId, ProductId};
use storefront_pricing::{
    ActivationCode, BrandRef, DiscountRule, ListingItem, PriceField, PricedProduct, ProductPrices,
    annotate_listing, quote_for_product,
};

fn rules(count: u64) -> Vec<DiscountRule> {
    let code = ActivationCode::parse("BENCH").unwrap();
    (0..count)
        .map(|i| DiscountRule {
            activation_code: code.clone(),
            bc_brand_ids: (i * 10..i * 10 + 10).map(BrandId::new).collect(),
            discount: Some((i % 40) as f64),
        })
        .collect()
}

fn listing(count: u64) -> Vec<ListingItem> {
    (0..count)
        .map(|i| ListingItem {
            entity_id: Some(ProductId::new(i)),
            brand: Some(BrandRef::new(BrandId::new(i % 500))),
            original_price: Some(PriceField::new(10.0 + i as f64)),
            ..ListingItem::default()
        })
        .collect()
}

/// Single product-detail quote; the matching rule sits at the end of the list.
fn bench_product_quote(c: &mut Criterion) {
    let code = ActivationCode::parse("BENCH").unwrap();
    let rules = rules(50);
    let product = PricedProduct {
        entity_id: Some(ProductId::new(1)),
        sku: Some("SKU-1".to_string()),
        brand: Some(BrandRef::new(BrandId::new(495))),
        prices: Some(ProductPrices {
            price: Some(PriceField::new(249.0)),
            sale_price: Some(PriceField::new(199.0)),
            ..ProductPrices::default()
        }),
    };

    c.bench_function("quote_for_product/last_rule_match", |b| {
        b.iter(|| {
            quote_for_product(
                black_box(&product),
                Some(&code),
                black_box(BrandId::new(495)),
                black_box(&rules),
            )
        })
    });
}

/// Listing annotation throughput for typical page sizes.
fn bench_listing_annotation(c: &mut Criterion) {
    let code = ActivationCode::parse("BENCH").unwrap();
    let rules = rules(50);
    let mut group = c.benchmark_group("annotate_listing");

    for size in [24u64, 96, 480] {
        let items = listing(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| annotate_listing(black_box(items.clone()), Some(&code), &rules))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_product_quote, bench_listing_annotation);
criterion_main!(benches);
