// Build pipeline benchmarks for ledgerkit.
//
// Covers registry construction, descriptor processing, full sign-and-hash
// runs, aggregate binding at various sizes and decoding.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ledgerkit::crypto::PrivateKey;
use ledgerkit::network::Network;
use ledgerkit::transaction::EmbeddedTransaction;
use ledgerkit::{descriptor, Descriptor, Entity, Facade};

fn transfer_descriptor() -> Descriptor {
    descriptor! {
        "type" => "transfer_transaction",
        "fee" => 1_000u64,
        "deadline" => 60_000u64,
        "mosaics" => vec![
            descriptor! { "mosaic_id" => 0xE74B_99BA_41F4_AFEEu64, "amount" => 1_000_000u64 },
            descriptor! { "mosaic_id" => 0x1234u64, "amount" => 5u64 },
        ],
        "message" => "benchmark transfer",
    }
}

fn bench_registry(c: &mut Criterion) {
    c.bench_function("registry/symbol", |b| {
        b.iter(|| Facade::new(Network::symbol_testnet()).unwrap());
    });
    c.bench_function("registry/nem", |b| {
        b.iter(|| Facade::new(Network::nem_testnet()).unwrap());
    });
}

fn bench_create(c: &mut Criterion) {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let descriptor = transfer_descriptor();

    c.bench_function("factory/create_transfer", |b| {
        b.iter(|| facade.factory().create(&descriptor).unwrap());
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let key_pair = facade.key_pair(PrivateKey::from_bytes([7u8; 32]));
    let transaction = facade.factory().create(&transfer_descriptor()).unwrap();

    c.bench_function("pipeline/symbol_transfer", |b| {
        b.iter(|| facade.pipeline(transaction.clone()).run(&key_pair).unwrap());
    });
}

fn bench_embedded_hash(c: &mut Criterion) {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let mut group = c.benchmark_group("aggregate/hash_embedded");

    for size in [1, 10, 100] {
        let embedded: Vec<EmbeddedTransaction> = (0..size)
            .map(|i| {
                facade
                    .factory()
                    .create_embedded(&descriptor! {
                        "type" => "transfer_transaction",
                        "message" => format!("embedded-{i:04}"),
                    })
                    .unwrap()
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &embedded, |b, embedded| {
            b.iter(|| facade.hash_embedded_transactions(embedded));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let bytes = facade
        .factory()
        .create(&transfer_descriptor())
        .unwrap()
        .serialize();

    c.bench_function("codec/decode_transfer", |b| {
        b.iter(|| facade.deserialize_transaction(&bytes).unwrap());
    });
}

criterion_group!(
    benches,
    bench_registry,
    bench_create,
    bench_pipeline,
    bench_embedded_hash,
    bench_decode,
);
criterion_main!(benches);
