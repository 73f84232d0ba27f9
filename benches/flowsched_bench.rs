//! Criterion benchmarks for u-flowsched.
//!
//! Uses randomly generated instances (fixed seeds) sized like the
//! processor/task grids the scheduler is typically swept over.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_flowsched::parallel::{ParallelAnnealer, ParallelConfig};
use u_flowsched::random::create_rng;
use u_flowsched::sa::{Annealer, AnnealConfig};
use u_flowsched::schedule::{Instance, ScheduleState};

fn seed_schedule(proc_num: usize, task_num: usize) -> ScheduleState {
    let mut rng = create_rng(42);
    Instance::random(proc_num, task_num, 1..=100, &mut rng)
        .expect("valid instance")
        .assign(&mut rng)
}

// ===========================================================================
// Objective
// ===========================================================================

fn bench_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("quality");

    for &tasks in &[100, 500, 2000] {
        let schedule = seed_schedule(10, tasks);
        group.bench_with_input(BenchmarkId::from_parameter(tasks), &schedule, |b, s| {
            b.iter(|| black_box(s).quality())
        });
    }
    group.finish();
}

// ===========================================================================
// Annealing
// ===========================================================================

fn bench_single_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_single");
    group.sample_size(10);

    for (procs, tasks) in [(2usize, 100usize), (10, 500), (20, 1000)] {
        let schedule = seed_schedule(procs, tasks);
        let config = AnnealConfig::default().with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("p{procs}_t{tasks}"), tasks),
            &(schedule, config),
            |b, (s, c)| {
                b.iter(|| {
                    let result = Annealer::run(black_box(s.clone()), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_parallel");
    group.sample_size(10);

    let schedule = seed_schedule(10, 300);
    for &workers in &[1, 2, 4, 8] {
        let config = ParallelConfig::default()
            .with_workers(workers)
            .with_round_stagnation_limit(3)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &(schedule.clone(), config),
            |b, (s, c)| {
                b.iter(|| {
                    let result = ParallelAnnealer::run(black_box(s.clone()), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_quality, bench_single_run, bench_parallel);
criterion_main!(benches);
