use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raystep::*;

fn cave() -> CollisionWorld {
    // walled room with a few ledges
    let mut tiles = vec![vec![0u8; 32]; 32];
    for i in 0..32 {
        tiles[0][i] = 1;
        tiles[31][i] = 1;
        tiles[i][0] = 1;
        tiles[i][31] = 1;
    }
    for x in 6..14 {
        tiles[8][x] = 1;
        tiles[16][x + 10] = 1;
    }

    let mut world = CollisionWorld::new(2.0);
    world.insert_tiles(&tiles, Vec2::new(-16.0, -16.0), 1.0, LayerMask::ALL);
    world
}

fn criterion_benchmark(c: &mut Criterion) {
    let world = cave();
    let raycaster = RaycastController::new(RaycastConfig::default()).unwrap();
    let body = Body::new(Vec2::new(0.0, -14.0), Vec2::new(0.8, 1.6));
    let previous = CollisionInfo::default();

    c.bench_function("resolve diagonal into floor", |b| b.iter(|| resolve(
        black_box(&raycaster),
        black_box(&body.bounds()),
        black_box(&world),
        black_box(Vec2::new(0.3, -0.5)),
        black_box(&previous))));
    c.bench_function("resolve free fall", |b| b.iter(|| resolve(
        black_box(&raycaster),
        black_box(&Body::new(Vec2::new(0.0, 4.0), Vec2::new(0.8, 1.6)).bounds()),
        black_box(&world),
        black_box(Vec2::new(0.1, -0.2)),
        black_box(&previous))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
