use std::collections::HashSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lrumemo::{Cache, Recurse, Recursive};

fn fibonacci(n: u64) -> u64 {
    if n <= 1 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
}

fn bench_fibonacci(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibonacci");
    group.sample_size(20);

    group.bench_function("direct", |b| b.iter(|| black_box(fibonacci(black_box(25)))));

    group.bench_function("recursive_cache", |b| {
        b.iter(|| {
            // Only the last two values are needed.
            let mut fib = Recursive::new(
                |fib: &mut dyn Recurse<(u64,), u64>, (n,): (u64,)| {
                    if n <= 1 {
                        return n;
                    }
                    let smaller = fib.call((n - 2,));
                    fib.call((n - 1,)) + smaller
                },
                2,
            )
            .unwrap();
            black_box(fib.call((black_box(25),)))
        })
    });

    let mut cache = Cache::new(fibonacci, 2).unwrap();
    group.bench_function("outer_cache_hit", |b| b.iter(|| black_box(cache.call((25,)))));

    group.finish();
}

fn factorial(n: u32) -> f64 {
    if n <= 1 { 1.0 } else { n as f64 * factorial(n - 1) }
}

fn unique_paths_recursive(m: u32, n: u32) -> f64 {
    let steps = (m - 1) + (n - 1);
    factorial(steps) / (factorial(n - 1) * factorial(m - 1))
}

fn unique_paths_iterative(m: u32, n: u32) -> f64 {
    let factorial = |n: u32| (2..=n).fold(1.0, |acc, i| acc * i as f64);
    let steps = (m - 1) + (n - 1);
    factorial(steps) / (factorial(n - 1) * factorial(m - 1))
}

fn unique_paths_reference(m: usize, n: usize) -> f64 {
    let mut row = vec![1.0; n];
    for _ in 1..m {
        for j in 1..n {
            row[j] += row[j - 1];
        }
    }
    row[n - 1]
}

fn bench_unique_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_paths");
    let (m, n) = (20, 25);

    group.bench_function("reference", |b| {
        b.iter(|| black_box(unique_paths_reference(black_box(m as usize), black_box(n as usize))))
    });
    group.bench_function("iterative", |b| {
        b.iter(|| black_box(unique_paths_iterative(black_box(m), black_box(n))))
    });
    group.bench_function("recursive", |b| {
        b.iter(|| black_box(unique_paths_recursive(black_box(m), black_box(n))))
    });

    let mut factorials = Cache::with_default_capacity(factorial);
    group.bench_function("cache", |b| {
        b.iter(|| {
            let steps = (m - 1) + (n - 1);
            black_box(
                factorials.call((steps,))
                    / (factorials.call((n - 1,)) * factorials.call((m - 1,))),
            )
        })
    });

    group.finish();
}

fn concatenated_words<'w>(words: &[&'w str]) -> Vec<&'w str> {
    let dictionary: HashSet<&str> = words.iter().copied().collect();
    let mut can_form = Recursive::new(
        |can_form: &mut dyn Recurse<(&'w str,), bool>, (s,): (&'w str,)| {
            s.char_indices().skip(1).any(|(i, _)| {
                let (prefix, suffix) = s.split_at(i);
                dictionary.contains(prefix)
                    && (dictionary.contains(suffix) || can_form.call((suffix,)))
            })
        },
        16384,
    )
    .unwrap();

    words
        .iter()
        .copied()
        .filter(|&word| !word.is_empty() && can_form.call((word,)))
        .collect()
}

fn bench_concatenated_words(c: &mut Criterion) {
    let mut group = c.benchmark_group("concatenated_words");
    let mut owned: Vec<String> = (1..=30).map(|n| "a".repeat(n)).collect();
    owned.push(format!("{}z", "a".repeat(29)));
    let words: Vec<&str> = owned.iter().map(String::as_str).collect();

    group.bench_function("cache", |b| b.iter(|| black_box(concatenated_words(black_box(&words)))));

    group.finish();
}

criterion_group!(benches, bench_fibonacci, bench_unique_paths, bench_concatenated_words);
criterion_main!(benches);
