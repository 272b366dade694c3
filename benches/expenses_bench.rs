use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::tempdir;
use tokio::runtime::Runtime;

use expense_tracker::database::init_db;
use expense_tracker::models::NewExpense;
use expense_tracker::store::{ExpenseStore, MemoryExpenseStore, SharedStore, SqlExpenseStore};

// Benchmark constants
const BENCH_EXPENSE_COUNT: usize = 1000;
const BENCH_CATEGORY_COUNT: usize = 10;

async fn populate(store: &SharedStore, count: usize) {
    let mut category_ids = Vec::new();
    for i in 0..BENCH_CATEGORY_COUNT {
        let category = store
            .create_category(format!("category_{}", i))
            .await
            .unwrap();
        category_ids.push(category.id);
    }

    for i in 0..count {
        store
            .create_expense(NewExpense {
                name: format!("Benchmark Expense {}", i),
                amount: 10.0 + (i % 100) as f64,
                category_id: Some(category_ids[i % BENCH_CATEGORY_COUNT]),
            })
            .await
            .unwrap();
    }
}

fn bench_stores(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir.path().to_str().unwrap().to_string();

    let memory: SharedStore = Arc::new(MemoryExpenseStore::new());
    let db = rt.block_on(init_db(&data_path)).unwrap();
    let sqlite: SharedStore = Arc::new(SqlExpenseStore::new(db));

    for (backend, store) in [("memory", &memory), ("sqlite", &sqlite)] {
        rt.block_on(populate(store, BENCH_EXPENSE_COUNT));

        c.bench_function(&format!("{}_list_expenses", backend), |b| {
            b.to_async(&rt)
                .iter(|| async { black_box(store.list_expenses().await.unwrap()) })
        });

        c.bench_function(&format!("{}_get_expense", backend), |b| {
            b.to_async(&rt)
                .iter(|| async { black_box(store.get_expense(500).await.unwrap()) })
        });

        c.bench_function(&format!("{}_list_category_expenses", backend), |b| {
            b.to_async(&rt)
                .iter(|| async { black_box(store.list_category_expenses(3).await.unwrap()) })
        });
    }
}

criterion_group!(benches, bench_stores);
criterion_main!(benches);
