//! Benchmark suite for LZSS decoding and archive reads
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench lzss_decode
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml --bench lzss_decode -- --profile-time=5

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fife_benches::{generate_archive, generate_lzss_stream, sizes};
use fife_types::file::{Archive, ArchiveKind, Dat2Compression, RawData, lzss};

/// Benchmark raw block decoding into a caller buffer
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("lzss_decode");

	for (name, len) in [("small", sizes::SMALL_FILE), ("large", sizes::LARGE_FILE)] {
		let (packed, original) = generate_lzss_stream(len);
		let mut output = vec![0u8; original.len()];

		group.throughput(Throughput::Bytes(original.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &packed, |b, packed| {
			b.iter(|| {
				let mut input = RawData::new(packed.clone());
				let written = lzss::decode(&mut input, black_box(&mut output));
				black_box(written)
			});
		});
	}

	group.finish();
}

/// Benchmark the allocating wrapper used by archive reads
fn bench_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("lzss_decompress");

	let (packed, original) = generate_lzss_stream(sizes::LARGE_FILE);
	group.throughput(Throughput::Bytes(original.len() as u64));
	group.bench_function("decompress", |b| {
		b.iter(|| black_box(lzss::decompress(black_box(packed.clone()), original.len())));
	});

	group.finish();
}

/// Benchmark the encoder used to build fixtures
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("lzss_encode");

	let (_, original) = generate_lzss_stream(sizes::LARGE_FILE);
	group.throughput(Throughput::Bytes(original.len() as u64));
	group.sample_size(20);
	group.bench_function("encode", |b| {
		b.iter(|| black_box(lzss::encode(black_box(&original))));
	});

	group.finish();
}

/// Benchmark index parsing and compressed entry reads for both archive layouts
fn bench_archive(c: &mut Criterion) {
	let mut group = c.benchmark_group("dat_archive");

	let kinds = [
		("dat1", ArchiveKind::Dat1),
		("dat2_lzss", ArchiveKind::Dat2(Dat2Compression::Lzss)),
		("dat2_zlib", ArchiveKind::Dat2(Dat2Compression::Zlib)),
	];

	for (name, kind) in kinds {
		let data = generate_archive(kind, 256, sizes::SMALL_FILE);

		group.bench_with_input(BenchmarkId::new("parse_index", name), &data, |b, data| {
			b.iter(|| black_box(Archive::from_bytes(data.clone(), kind)));
		});

		let Ok(archive) = Archive::from_bytes(data, kind) else {
			eprintln!("Warning: Could not parse generated {name} archive");
			continue;
		};
		group.throughput(Throughput::Bytes(sizes::SMALL_FILE as u64));
		group.bench_function(BenchmarkId::new("open", name), |b| {
			b.iter(|| black_box(archive.open(black_box("text/english/dialog/file0128.msg"))));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode, bench_decompress, bench_encode, bench_archive);

criterion_main!(benches);
