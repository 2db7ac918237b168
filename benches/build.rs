use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use pubgraph::{GraphBuilder, NdjsonSource, Person, Publication};

const PEOPLE: usize = 500;
const PUBLICATIONS: usize = 2_000;

fn make_people() -> Vec<Person> {
    (0..PEOPLE)
        .map(|i| Person::new(format!("p{i}"), format!("Person {i}")))
        .collect()
}

// Each publication mixes an id hit, a name hit and an unresolved token.
fn make_publications() -> Vec<Publication> {
    (0..PUBLICATIONS)
        .map(|i| {
            Publication::new(format!("b{i}"), format!("Title {i}")).with_authors([
                format!("p{}", i % PEOPLE),
                format!("person {}", (i * 7) % PEOPLE),
                format!("External {}", i % 97),
            ])
        })
        .collect()
}

fn to_ndjson<T: serde::Serialize>(rows: &[T]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row).unwrap());
        out.push('\n');
    }
    out
}

fn bench_build_in_memory(c: &mut Criterion) {
    let people = make_people();
    let publications = make_publications();

    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements((PEOPLE + PUBLICATIONS) as u64));
    group.bench_function("in_memory", |b| {
        b.iter(|| GraphBuilder::new(&people, &publications).build());
    });
    group.finish();
}

fn bench_build_from_ndjson(c: &mut Criterion) {
    let people = NdjsonSource::from_text(to_ndjson(&make_people()));
    let publications = NdjsonSource::from_text(to_ndjson(&make_publications()));

    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements((PEOPLE + PUBLICATIONS) as u64));
    group.bench_function("ndjson_text", |b| {
        b.iter(|| GraphBuilder::new(&people, &publications).build());
    });
    group.finish();
}

criterion_group!(benches, bench_build_in_memory, bench_build_from_ndjson);
criterion_main!(benches);
