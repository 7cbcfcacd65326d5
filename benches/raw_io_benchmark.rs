use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fs_rawio::raw_io::{get_each, get_vec, put_each, put_slice};
use fs_rawio::stream::{Disposition, SeekMode, Stream};
use rand::prelude::*;
use tempdir::TempDir;

fn generate_random_data(count: usize) -> Vec<u32> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen()).collect()
}

fn put_in_memory(c: &mut Criterion) {
    let inputs = [
        ("put_small", 256),
        ("put_medium", 16384),
        ("put_large", 262144),
    ];

    for (name, count) in inputs.iter() {
        let values = generate_random_data(*count);
        let mut group = c.benchmark_group(name.to_string());
        group.measurement_time(std::time::Duration::from_secs(5));

        group.bench_function("put_slice", |b| {
            b.iter(|| {
                let mut bytes = Vec::with_capacity(values.len() * 4);
                put_slice(&mut bytes, black_box(&values))
                    .expect("put_slice returned an error");
                bytes
            });
        });

        group.bench_function("put_each", |b| {
            b.iter(|| {
                let mut bytes = Vec::with_capacity(values.len() * 4);
                put_each(&mut bytes, black_box(&values).iter().copied())
                    .expect("put_each returned an error");
                bytes
            });
        });

        group.finish();
    }
}

fn get_from_file(c: &mut Criterion) {
    let dir = TempDir::new("raw_io_benchmark").unwrap();
    let path = dir.path().join("values.bin");
    let count = 16384;
    let values = generate_random_data(count);

    let mut stream =
        Stream::open(&path, Disposition::CreateOrTruncate).unwrap();
    put_slice(&mut stream, &values).unwrap();

    let mut group = c.benchmark_group("get_from_file");
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("get_vec", |b| {
        b.iter(|| {
            stream.seek(0, SeekMode::Start).unwrap();
            get_vec::<u32, _>(&mut stream, count)
                .expect("get_vec returned an error")
        });
    });

    group.bench_function("get_each", |b| {
        let mut restored = vec![0u32; count];
        b.iter(|| {
            stream.seek(0, SeekMode::Start).unwrap();
            get_each(&mut stream, restored.iter_mut())
                .expect("get_each returned an error");
        });
    });

    group.finish();
}

criterion_group!(benches, put_in_memory, get_from_file);
criterion_main!(benches);
