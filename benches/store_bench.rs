//! Benchmarks for devstore operations

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use devstore::record::{self, Device, DeviceText};
use devstore::{Config, DeviceStore, SyncStrategy};
use tempfile::TempDir;

const STORE_SIZE: u32 = 1_000;

fn populated_store(dir: &TempDir) -> DeviceStore {
    let config = Config::builder()
        .store_path(dir.path().join("devices.dat"))
        .sync_strategy(SyncStrategy::OnClose)
        .build();
    let store = DeviceStore::open(config).unwrap();

    for serial in 0..STORE_SIZE {
        let device =
            Device::try_new(&format!("dev{}", serial), "bench", serial, serial % 16, serial).unwrap();
        store.add(device).unwrap();
    }
    store
}

fn codec_benchmarks(c: &mut Criterion) {
    let device = Device::try_new("sensor1", "thermo", 0x10, 0x2, 1001).unwrap();
    let block = record::encode(&device).unwrap();

    c.bench_function("record_encode", |b| b.iter(|| record::encode(&device).unwrap()));
    c.bench_function("record_decode", |b| b.iter(|| record::decode(&block).unwrap()));
}

fn store_benchmarks(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store = populated_store(&dir);

    c.bench_function("search_by_vendor_1k", |b| {
        b.iter(|| store.search(&devstore::Criterion::Vendor(7)).unwrap())
    });

    c.bench_function("list_1k", |b| b.iter(|| store.list().unwrap()));

    // Each iteration removes one record from a fresh copy of the store
    c.bench_function("remove_by_name_1k", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().unwrap();
                let store = populated_store(&dir);
                (dir, store)
            },
            |(_dir, store)| {
                let name = DeviceText::new("dev500").unwrap();
                store.remove(&devstore::Criterion::Name(name)).unwrap()
            },
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(benches, codec_benchmarks, store_benchmarks);
criterion_main!(benches);
