//! Execution benchmarks for the interpreter.
//!
//! These benchmarks measure instruction dispatch, branch unwinding and call
//! overhead on the mixed stack.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use watrun::runtime::Interpreter;
use watrun::wat::ast::Module;

/// Load and parse a module from benches/modules/
fn load_module(name: &str) -> Module {
    let path = format!("benches/modules/{}.wat", name);
    let source = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    watrun::wat::parse(&source).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

/// Verify module correctness before benchmarking
fn verify_modules() {
    {
        let module = load_module("noop_loop");
        let mut interp = Interpreter::instantiate(&module);
        let result = interp.invoke_export("run", &[1000]).unwrap();
        assert_eq!(result, vec![1000], "noop_loop(1000) should be 1000");
    }

    {
        let module = load_module("fib_iterative");
        let mut interp = Interpreter::instantiate(&module);
        for (n, expected) in [(0, 0), (1, 1), (10, 55), (20, 6765), (40, 102334155)] {
            let result = interp.invoke_export("fib", &[n]).unwrap();
            assert_eq!(result, vec![expected], "fib_iterative({}) should be {}", n, expected);
        }
    }

    {
        let module = load_module("fib_recursive");
        let mut interp = Interpreter::instantiate(&module);
        for (n, expected) in [(0, 0), (1, 1), (10, 55), (20, 6765)] {
            let result = interp.invoke_export("fib", &[n]).unwrap();
            assert_eq!(result, vec![expected], "fib_recursive({}) should be {}", n, expected);
        }
    }

    println!("All module correctness checks passed.");
}

fn bench_noop_loop(c: &mut Criterion) {
    let module = load_module("noop_loop");

    let mut group = c.benchmark_group("dispatch");
    for iterations in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("noop_loop", iterations), &iterations, |b, &n| {
            let mut interp = Interpreter::instantiate(&module);
            b.iter(|| black_box(interp.invoke_export("run", &[n]).unwrap()));
        });
    }
    group.finish();
}

fn bench_fib_iterative(c: &mut Criterion) {
    let module = load_module("fib_iterative");

    let mut group = c.benchmark_group("compute");
    for n in [10, 20, 30, 40, 46] {
        group.bench_with_input(BenchmarkId::new("fib_iterative", n), &n, |b, &n| {
            let mut interp = Interpreter::instantiate(&module);
            b.iter(|| black_box(interp.invoke_export("fib", &[n]).unwrap()));
        });
    }
    group.finish();
}

fn bench_fib_recursive(c: &mut Criterion) {
    let module = load_module("fib_recursive");

    let mut group = c.benchmark_group("call_overhead");
    // n=20 is already ~22k calls
    for n in [10, 15, 20] {
        group.bench_with_input(BenchmarkId::new("fib_recursive", n), &n, |b, &n| {
            let mut interp = Interpreter::instantiate(&module);
            b.iter(|| black_box(interp.invoke_export("fib", &[n]).unwrap()));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let source = std::fs::read_to_string("benches/modules/fib_iterative.wat").unwrap();

    c.bench_function("parse/fib_iterative", |b| {
        b.iter(|| black_box(watrun::wat::parse(black_box(&source)).unwrap()))
    });
}

fn verify_and_bench(c: &mut Criterion) {
    verify_modules();
    bench_noop_loop(c);
    bench_fib_iterative(c);
    bench_fib_recursive(c);
    bench_parse(c);
}

criterion_group!(benches, verify_and_bench);
criterion_main!(benches);
