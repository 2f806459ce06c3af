use criterion::{criterion_group, criterion_main, Criterion};
use flickr_login::services::flickr::extract_albums;
use serde_json::{json, Value};
use std::hint::black_box;

fn photoset_payload(count: usize) -> Value {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("7215764988654{:04}", i),
                "title": {"_content": format!("album {}", i)},
                "description": {"_content": ""},
                "photos": (i % 500).to_string(),
                "videos": 0,
                "primary_photo_extras": {
                    "height_t": "63",
                    "width_t": "100",
                    "url_t": format!("https://farm9.staticflickr.com/8597/{}_t.jpg", i)
                }
            })
        })
        .collect();

    json!({"stat": "ok", "photosets": {"page": 1, "pages": 1, "photoset": records}})
}

fn benchmark_extract_albums(c: &mut Criterion) {
    let small = photoset_payload(10);
    let large = photoset_payload(500);

    let mut group = c.benchmark_group("extract_albums");

    group.bench_function("ten_photosets", |b| {
        b.iter(|| extract_albums(black_box(&small)))
    });

    group.bench_function("five_hundred_photosets", |b| {
        b.iter(|| extract_albums(black_box(&large)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_extract_albums);
criterion_main!(benches);
