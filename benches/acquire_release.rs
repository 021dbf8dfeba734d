//! Acquire/release benchmark suite.
//!
//! Benchmarks pool hand-out at different scales:
//! - Warm pool, single caller: reuse only, no dials
//! - Contended pool: tasks competing for a capped pool
//!
//! Run with: cargo bench --bench acquire_release
//! Results saved to: target/criterion/

use std::io::Result as IoResult;
use std::sync::Arc;

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use netpool::{Connection, ConnectionPool};
use tokio::runtime::Runtime;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const POOL_SIZES: &[usize] = &[1, 8, 64];
const TASK_COUNTS: &[usize] = &[4, 32];
const ROUNDS_PER_TASK: usize = 100;

// ============================================================================
// In-Memory Connection
// ============================================================================

struct NullConn;

#[async_trait]
impl Connection for NullConn {
    async fn read(&mut self, _buf: &mut [u8]) -> IoResult<usize> {
        Ok(0)
    }

    async fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
        Ok(buf.len())
    }

    async fn close(&mut self) -> IoResult<()> {
        Ok(())
    }
}

async fn null_pool(max_idle: usize, max_open: usize) -> Arc<ConnectionPool<NullConn>> {
    ConnectionPool::new(max_idle, max_open, || async { Ok::<_, std::io::Error>(NullConn) })
        .await
        .expect("pool creation")
}

// ============================================================================
// Benchmark: Warm Reuse
// ============================================================================

fn bench_warm_reuse(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("warm_reuse");

    for &size in POOL_SIZES {
        let pool = rt.block_on(null_pool(size, size));

        group.bench_with_input(BenchmarkId::new("acquire_release", size), &pool, |b, pool| {
            b.to_async(&rt).iter(move || async move {
                let conn = pool.acquire().await.expect("acquire");
                pool.release(conn).await.expect("release");
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Contended Pool
// ============================================================================

fn bench_contended(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("contended");
    group.sample_size(20);

    for &tasks in TASK_COUNTS {
        let pool = rt.block_on(null_pool(2, 4));

        group.bench_with_input(BenchmarkId::new("tasks", tasks), &tasks, |b, &task_count| {
            b.to_async(&rt).iter(|| run_contended(Arc::clone(&pool), task_count));
        });
    }

    group.finish();
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn run_contended(pool: Arc<ConnectionPool<NullConn>>, task_count: usize) {
    let workers: Vec<_> = (0..task_count)
        .map(|_| {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move {
                for _ in 0..ROUNDS_PER_TASK {
                    let conn = pool.acquire().await.expect("acquire");
                    pool.release(conn).await.expect("release");
                }
            })
        })
        .collect();

    for result in futures_util::future::join_all(workers).await {
        result.expect("worker panicked");
    }
}

// ============================================================================
// Criterion Setup
// ============================================================================

criterion_group!(benches, bench_warm_reuse, bench_contended);
criterion_main!(benches);
