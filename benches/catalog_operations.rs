use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use menu_catalog::models::{
    format_price, normalize_price, CreateDishRequest, CreateMenuRequest, CreateSubmenuRequest,
    Dish, Menu, Submenu,
};
use menu_catalog::repositories::{
    DishRepository, InMemoryCatalog, MenuRepository, SubmenuRepository,
};
use menu_catalog::services::{dish_service::DishService, menu_service::MenuService};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Catalog with `menus` menus, each holding 5 submenus of 10 dishes
fn seeded_catalog(rt: &Runtime, menus: usize) -> (Arc<InMemoryCatalog>, Uuid, Uuid) {
    let catalog = Arc::new(InMemoryCatalog::new());
    let mut first = (Uuid::nil(), Uuid::nil());

    rt.block_on(async {
        for m in 0..menus {
            let menu = MenuRepository::create(
                &*catalog,
                Menu::new(CreateMenuRequest {
                    title: format!("Menu {}", m),
                    description: "Benchmark menu".to_string(),
                }),
            )
            .await
            .unwrap();

            for s in 0..5 {
                let submenu = SubmenuRepository::create(
                    &*catalog,
                    Submenu::new(
                        menu.id,
                        CreateSubmenuRequest {
                            title: format!("Submenu {}-{}", m, s),
                            description: String::new(),
                        },
                    ),
                )
                .await
                .unwrap();
                if m == 0 && s == 0 {
                    first = (menu.id, submenu.id);
                }

                for d in 0..10 {
                    DishRepository::create(
                        &*catalog,
                        Dish::new(
                            submenu.id,
                            CreateDishRequest {
                                title: format!("Dish {}-{}-{}", m, s, d),
                                description: String::new(),
                                price: Decimal::new(1_000 + d as i64 * 125, 3),
                            },
                        ),
                    )
                    .await
                    .unwrap();
                }
            }
        }
    });

    (catalog, first.0, first.1)
}

fn bench_price_formatting(c: &mut Criterion) {
    let prices = [
        Decimal::new(123_456, 3),
        Decimal::new(5, 0),
        Decimal::new(5, 3),
        Decimal::new(9_999_999_999, 4),
    ];

    let mut group = c.benchmark_group("price_formatting");
    group.bench_function("format_price", |b| {
        b.iter(|| {
            for price in prices {
                black_box(format_price(black_box(price)));
            }
        })
    });
    group.bench_function("normalize_price", |b| {
        b.iter(|| {
            for price in prices {
                black_box(normalize_price(black_box(price)));
            }
        })
    });
    group.finish();
}

fn bench_list_menus_with_counts(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("list_menus_with_counts");
    group.measurement_time(Duration::from_secs(10));

    for size in [10, 50, 100].iter() {
        let (catalog, _, _) = seeded_catalog(&rt, *size);
        let service = MenuService::new(catalog);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                rt.block_on(async {
                    let menus = service.list_menus(0, size as i64).await.unwrap();
                    black_box(menus)
                })
            })
        });
    }

    group.finish();
}

fn bench_list_dishes(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let (catalog, menu_id, submenu_id) = seeded_catalog(&rt, 50);
    let service = DishService::new(catalog.clone(), catalog);

    c.bench_function("list_dishes_scoped", |b| {
        b.iter(|| {
            rt.block_on(async {
                let dishes = service
                    .list_dishes(black_box(menu_id), black_box(submenu_id), 0, 10)
                    .await
                    .unwrap();
                black_box(dishes)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_price_formatting,
    bench_list_menus_with_counts,
    bench_list_dishes
);
criterion_main!(benches);
