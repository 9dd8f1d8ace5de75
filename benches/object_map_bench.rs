use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use keyed_collections::{DefaultObjectMap, DefaultPrimitiveMap, ObjectMap, OrderedMap};
use std::time::Duration;

#[derive(Clone, Copy)]
struct Point {
    x: u32,
    y: u32,
}

fn encode(p: &Point) -> u64 {
    u64::from(p.x) << 32 | u64::from(p.y)
}

fn decode(&p: &u64) -> Point {
    Point {
        x: (p >> 32) as u32,
        y: p as u32,
    }
}

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn point(n: u64) -> Point {
    decode(&n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("ordered_map_insert_10k", |b| {
        b.iter_batched(
            OrderedMap::<u64, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(x, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("object_map_insert_10k", |b| {
        b.iter_batched(
            || ObjectMap::<Point, u64, _>::new(encode, decode),
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(&point(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("object_map_get_hit", |b| {
        let mut m = ObjectMap::new(encode, decode);
        let keys: Vec<Point> = lcg(7).take(20_000).map(point).collect();
        for (i, k) in keys.iter().enumerate() {
            m.insert(k, i as u64);
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("object_map_get_miss", |b| {
        let mut m = ObjectMap::new(encode, decode);
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.insert(&point(x), i as u64);
        }
        let mut miss = lcg(0xdead_beef).map(point);
        b.iter(|| {
            let k = miss.next().unwrap();
            black_box(m.get(&k));
        })
    });
}

fn bench_default_materialize(c: &mut Criterion) {
    c.bench_function("default_primitive_map_materialize_10k", |b| {
        b.iter_batched(
            || DefaultPrimitiveMap::new(|k: &u64| k.count_ones()),
            |mut m| {
                for x in lcg(3).take(10_000) {
                    black_box(m.get(&x));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("default_object_map_count_10k", |b| {
        b.iter_batched(
            || DefaultObjectMap::new(|_: &Point| 0u32, encode, decode),
            |mut m| {
                // Narrow key space so most updates hit a cached entry.
                for x in lcg(5).take(10_000) {
                    m.map(&point(x % 512), |n| n + 1);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iterate(c: &mut Criterion) {
    c.bench_function("object_map_iter_10k", |b| {
        let mut m = ObjectMap::new(encode, decode);
        for (i, x) in lcg(13).take(10_000).enumerate() {
            m.insert(&point(x), i as u64);
        }
        b.iter(|| {
            let sum: u64 = m.iter().map(|(k, v)| u64::from(k.x) ^ v).sum();
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_get_hit, bench_get_miss, bench_default_materialize, bench_iterate
}
criterion_main!(benches);
