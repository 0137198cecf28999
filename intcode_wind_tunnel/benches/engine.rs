// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main,
};

use intcode_engine::engine::Engine;
use intcode_engine::parse::parse_program;
use intcode_engine::port::{BufferOutput, QueueInput};
use intcode_loop::FeedbackLoop;

const COMPARE_TO_8: &str = "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,1106,0,36,\
                            98,0,0,1002,21,125,20,4,20,1105,1,46,104,999,1105,1,46,1101,\
                            1000,1,20,4,20,1105,1,46,98,99";

const FEEDBACK_CHAIN: &str = "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,\
                              28,-1,28,1005,28,6,99,0,0,5";

fn bench_engine(c: &mut Criterion) {
    bench_add_chain(c);
    bench_comparator(c);
    bench_memory_growth(c);
    bench_feedback_chain(c);
    bench_parse(c);
}

fn build_add_chain(n: usize) -> Vec<i64> {
    // Each link bumps a scratch word one past the image, so the chain also
    // exercises the first growth step.
    let scratch = (4 * n + 1) as i64;
    let mut words = Vec::with_capacity(4 * n + 1);
    for _ in 0..n {
        words.extend_from_slice(&[1101, 1, 1, scratch]);
    }
    words.push(99);
    words
}

fn bench_add_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_chain");
    for &chain_len in &[10_usize, 50, 200, 1000] {
        let image = build_add_chain(chain_len);
        group.bench_with_input(BenchmarkId::from_parameter(chain_len), &image, |b, image| {
            b.iter_batched(
                || Engine::new(image.clone()),
                |mut engine| black_box(engine.run().unwrap()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_comparator(c: &mut Criterion) {
    let image = parse_program(COMPARE_TO_8).unwrap();
    c.bench_function("comparator", |b| {
        b.iter_batched(
            || {
                Engine::new(image.clone())
                    .with_io(QueueInput::with_values([8]), BufferOutput::new())
            },
            |mut engine| black_box(engine.run().unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_memory_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_growth");
    for &far in &[1_i64 << 10, 1 << 14, 1 << 17] {
        let image = vec![1101, 1, 1, far, 99];
        group.bench_with_input(BenchmarkId::from_parameter(far), &image, |b, image| {
            b.iter_batched(
                || Engine::new(image.clone()),
                |mut engine| {
                    engine.run().unwrap();
                    black_box(engine.memory().len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_feedback_chain(c: &mut Criterion) {
    let prototype = Engine::from_source(FEEDBACK_CHAIN).unwrap();
    let phases = [9, 8, 7, 6, 5];
    c.bench_function("feedback_chain", |b| {
        b.iter_batched(
            || FeedbackLoop::from_engine(&prototype, &phases),
            |mut chain| black_box(chain.run(0).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for &words in &[100_usize, 1000, 10_000] {
        let source = build_add_chain(words)
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        group.bench_with_input(BenchmarkId::from_parameter(words), &source, |b, source| {
            b.iter(|| black_box(parse_program(source).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);
