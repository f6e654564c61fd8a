use collision2d::{Collider, ColliderHandle, ColliderSet, CollisionWorld, LayerMask, Shape, Vec2, AABB};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// --- Helper for populating a world with a grid of mixed shapes ---
fn populate(world: &mut CollisionWorld, colliders: &mut ColliderSet, count: usize) -> Vec<ColliderHandle> {
    let side = (count as f64).sqrt().ceil() as usize;
    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        let position = Vec2::new((i % side) as f64 * 12.0, (i / side) as f64 * 12.0);
        let shape = match i % 3 {
            0 => Shape::circle(5.0),
            1 => Shape::rect(8.0, 8.0),
            _ => Shape::polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(9.0, 0.0), Vec2::new(4.0, 7.0)]),
        };
        let Ok(shape) = shape else {
            continue;
        };
        let handle = colliders.insert(Collider::new(shape).with_position(position).with_rotation((i % 7) as f64 * 0.1));
        if world.add(colliders, handle).is_ok() {
            handles.push(handle);
        }
    }
    handles
}

// Broadphase + narrowphase for every collider against its neighbours
fn bench_shape_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_queries");

    for count in [100, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            let mut colliders = ColliderSet::with_key();
            let mut world = CollisionWorld::new(32.0).unwrap();
            let handles = populate(&mut world, &mut colliders, n);
            b.iter(|| {
                let mut total = 0;
                for handle in &handles {
                    total += world.collisions(&colliders, black_box(*handle)).map_or(0, |hits| hits.len());
                }
                total
            });
        });
    }
    group.finish();
}

// Whole-index pair enumeration
fn bench_collision_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_pairs");

    for count in [100, 1000, 5000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &n| {
            let mut colliders = ColliderSet::with_key();
            let mut world = CollisionWorld::new(32.0).unwrap();
            populate(&mut world, &mut colliders, n);
            b.iter(|| world.collision_pairs(black_box(&colliders)).len());
        });
    }
    group.finish();
}

// Move every collider once, re-indexing as it goes
fn bench_move_reindex(c: &mut Criterion) {
    c.bench_function("move_reindex_1000", |b| {
        let mut colliders = ColliderSet::with_key();
        let mut world = CollisionWorld::new(32.0).unwrap();
        let handles = populate(&mut world, &mut colliders, 1000);
        let mut sign = 1.0;
        b.iter(|| {
            sign = -sign;
            for handle in &handles {
                let _ = world.move_by(&mut colliders, *handle, black_box(Vec2::new(sign * 3.0, 0.0)));
            }
        });
    });
}

fn bench_linecast(c: &mut Criterion) {
    c.bench_function("linecast_1000", |b| {
        let mut colliders = ColliderSet::with_key();
        let mut world = CollisionWorld::new(32.0).unwrap();
        populate(&mut world, &mut colliders, 1000);
        b.iter(|| {
            world
                .linecast_all(
                    &colliders,
                    black_box(Vec2::new(-10.0, -10.0)),
                    black_box(Vec2::new(400.0, 380.0)),
                    LayerMask::ALL,
                )
                .map_or(0, |hits| hits.len())
        });
    });
}

fn bench_rect_query(c: &mut Criterion) {
    c.bench_function("collisions_in_rect_1000", |b| {
        let mut colliders = ColliderSet::with_key();
        let mut world = CollisionWorld::new(32.0).unwrap();
        populate(&mut world, &mut colliders, 1000);
        let rect = AABB::new(Vec2::new(50.0, 50.0), Vec2::new(150.0, 150.0));
        b.iter(|| world.collisions_in_rect(&colliders, black_box(&rect)).len());
    });
}

criterion_group!(
    benches,
    bench_shape_queries,
    bench_collision_pairs,
    bench_move_reindex,
    bench_linecast,
    bench_rect_query
);
criterion_main!(benches);
