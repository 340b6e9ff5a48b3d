//! Benchmark suite for FRM parsing and frame decoding
//!
//! Decoded frames are cached inside the sprite, so every iteration parses
//! a fresh sprite before decoding.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench frm_decode

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fife_benches::{generate_context, generate_frm, generate_palette, generate_sprite_pixels, sizes};
use fife_types::file::{AnimatedPalette, FrmFile, LightLevel};

/// Benchmark header and frame table parsing without pixel decoding
fn bench_parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_parse");

	let (width, height) = sizes::CRITTER;
	let data = generate_frm(width, height, 8, false);
	let context = generate_context(false);

	group.bench_function("parse_critter", |b| {
		b.iter(|| black_box(FrmFile::from_bytes(data.clone(), context.clone())));
	});

	group.finish();
}

/// Benchmark first frame decoding across sizes and surface kinds
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_decode");

	let cases = [
		("icon_indexed", sizes::ICON, false),
		("critter_indexed", sizes::CRITTER, false),
		("critter_rgba", sizes::CRITTER, true),
		("panel_indexed", sizes::PANEL, false),
		("splash_rgba", sizes::SPLASH, true),
	];

	for (name, (width, height), translucent) in cases {
		let data = generate_frm(width, height, 1, false);
		let context = generate_context(translucent);

		group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
		group.bench_with_input(BenchmarkId::new("first_frame", name), &data, |b, data| {
			b.iter(|| {
				let Ok(sprite) = FrmFile::from_bytes(data.clone(), context.clone()) else {
					return;
				};
				black_box(sprite.frame(0, 0).map(|frame| frame.frame_count()));
			});
		});
	}

	group.finish();
}

/// Benchmark decoding a sprite that expands into one image per palette frame
fn bench_animated(c: &mut Criterion) {
	let mut group = c.benchmark_group("frm_animated");

	let (width, height) = sizes::CRITTER;
	let data = generate_frm(width, height, 1, true);
	let context = generate_context(false);

	group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
	group.bench_function("slime_critter", |b| {
		b.iter(|| {
			let Ok(sprite) = FrmFile::from_bytes(data.clone(), context.clone()) else {
				return;
			};
			black_box(sprite.frame(0, 0).map(|frame| frame.frame_count()));
		});
	});

	group.finish();
}

/// Benchmark per-index color resolution against a full table lookup
fn bench_resolve(c: &mut Criterion) {
	let mut group = c.benchmark_group("palette_resolve");

	let palette = AnimatedPalette::fallout(generate_palette());
	let (width, height) = sizes::SPLASH;
	let pixels = generate_sprite_pixels(width, height, true);

	group.throughput(Throughput::Elements(pixels.len() as u64));
	group.bench_function("resolve_each", |b| {
		let resolver = palette.resolver(LightLevel::new(3), None, 0);
		b.iter(|| {
			let sum: u64 = pixels.iter().map(|&index| u64::from(resolver.red(index))).sum();
			black_box(sum)
		});
	});

	group.bench_function("resolve_table", |b| {
		b.iter(|| {
			let table = palette.resolver(LightLevel::new(3), None, 0).table();
			let sum: u64 = pixels.iter().map(|&index| u64::from(table[usize::from(index)].r)).sum();
			black_box(sum)
		});
	});

	group.finish();
}

criterion_group!(benches, bench_parse, bench_decode, bench_animated, bench_resolve);

criterion_main!(benches);
