use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use varnam_core::dictionary::{expand, match_dictionary, resolve_patterns};
use varnam_core::learn::{learn, train};
use varnam_core::{DictStore, Scheme, SchemeTable};

const WORDS: &[&str] = &[
    "മലയാളം",
    "മലയാളി",
    "മലയാളികൾ",
    "കേരളം",
    "കേരളത്തിൽ",
    "തിരുവനന്തപുരം",
    "ഇന്ത്യ",
    "ഇന്ത്യയിൽ",
    "കോളേജ്",
    "വിദ്യാർത്ഥി",
];

const TRAINED: &[(&str, &str)] = &[("india", "ഇന്ത്യ"), ("college", "കോളേജ്")];

fn bench_store() -> DictStore {
    let store = DictStore::new();
    let scheme = SchemeTable::global();
    for w in WORDS {
        learn(&store, scheme, w, 0).expect("bench word must be valid");
    }
    for (pattern, w) in TRAINED {
        train(&store, scheme, pattern, w).expect("bench pattern must be valid");
    }
    store
}

static INPUTS: &[(&str, &str)] = &[
    ("short", "kera"),
    ("medium", "malayaaLaM"),
    ("long", "thiruvananthapuraM"),
];

fn bench_match(c: &mut Criterion) {
    let store = bench_store();
    let scheme = SchemeTable::global();
    let mut group = c.benchmark_group("dictionary/match");
    for &(label, input) in INPUTS {
        let tokens = scheme.tokenize(input);
        group.bench_with_input(BenchmarkId::new(label, input.len()), &tokens, |b, tokens| {
            b.iter(|| match_dictionary(&store, tokens));
        });
    }
    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let store = bench_store();
    let scheme = SchemeTable::global();
    let mut group = c.benchmark_group("dictionary/expand");
    for &(label, input) in INPUTS {
        let found = match_dictionary(&store, &scheme.tokenize(input))
            .map(|r| r.suggestions)
            .unwrap_or_default();
        group.bench_with_input(BenchmarkId::new(label, input.len()), &found, |b, found| {
            b.iter(|| expand(&store, found));
        });
    }
    group.finish();
}

fn bench_patterns(c: &mut Criterion) {
    let store = bench_store();
    c.bench_function("dictionary/resolve_patterns", |b| {
        b.iter(|| resolve_patterns(&store, "indiayil"));
    });
}

criterion_group!(benches, bench_match, bench_expand, bench_patterns);
criterion_main!(benches);
