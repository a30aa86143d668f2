//! Sweep-level tests: watertightness across cell faces, orientation and
//! capacity handling on real fields

use amc_cases::CaseTable;
use amc_core::{ScalarField, VoxelField};
use amc_math::Vec3;
use amc_mesh::{Mesh, MeshBuilder, MeshCapacity, UsageStats};

fn table() -> CaseTable {
    CaseTable::build().expect("case table should build")
}

fn is_positive(code: u8, corner: usize) -> bool {
    code & (1 << corner) != 0
}

/// Two cells stacked along `axis`: `first` at the origin, `second` after it
///
/// Returns `None` when the codes disagree on the shared face.
fn cell_pair(axis: usize, first: u8, second: u8) -> Option<VoxelField> {
    let bit = 1 << axis;
    let shared_agrees = (0..8)
        .filter(|v| v & bit != 0)
        .all(|v| is_positive(first, v) == is_positive(second, v & !bit));
    if !shared_agrees {
        return None;
    }

    let mut size = [2, 2, 2];
    size[axis] = 3;
    VoxelField::from_fn(size, |x, y, z| {
        let p = [x, y, z];
        let (code, offset) = if p[axis] < 2 { (first, 0) } else { (second, 1) };
        let corner = (0..3).fold(0, |c, a| {
            let local = if a == axis { p[a] - offset } else { p[a] };
            c | (local << a)
        });
        let sign = if is_positive(code, corner) { 1.0 } else { -1.0 };
        sign * (1.0 + 0.1 * ((x * 7 + y * 3 + z * 5) % 4) as f32)
    })
    .ok()
}

/// Segments lying in the plane `axis == 1.0` that are not used exactly twice
fn open_face_segments(mesh: &Mesh, axis: usize) -> usize {
    let on_face = |i: u32| mesh.vertices[i as usize].position[axis] == 1.0;
    mesh.edge_incidence()
        .iter()
        .filter(|&(&(a, b), &n)| on_face(a) && on_face(b) && n != 2)
        .count()
}

/// Deterministic noise in `[0, 1)`
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }
}

/// Random interior with a negative shell, so the surface must close
fn noise_field(n: usize, seed: u64) -> VoxelField {
    let mut rng = Lcg(seed);
    VoxelField::from_fn([n, n, n], |x, y, z| {
        let border = x.min(y).min(z) == 0 || x.max(y).max(z) == n - 1;
        let magnitude = 0.1 + 0.9 * rng.next();
        if border {
            -1.0
        } else if rng.next() < 0.5 {
            magnitude
        } else {
            -magnitude
        }
    })
    .unwrap()
}

// ==================== Cell faces ====================

#[test]
fn test_every_cell_pair_is_watertight_on_the_shared_face() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let mut pairs = 0;

    for axis in 0..3 {
        for first in 0..=u8::MAX {
            for second in 0..=u8::MAX {
                let Some(field) = cell_pair(axis, first, second) else {
                    continue;
                };
                pairs += 1;
                let mesh = builder.build(&field, MeshCapacity::unbounded());
                assert_eq!(
                    open_face_segments(&mesh, axis),
                    0,
                    "codes {} and {} along axis {}",
                    first,
                    second,
                    axis
                );
                assert!(
                    mesh.is_consistently_oriented(),
                    "codes {} and {} along axis {} disagree on winding",
                    first,
                    second,
                    axis
                );
            }
        }
    }

    // 16 shared-face patterns per first code
    assert_eq!(pairs, 3 * 256 * 16);
}

#[test]
fn test_random_fields_close() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    for seed in 0..20 {
        let mesh = builder.build(&noise_field(7, seed), MeshCapacity::unbounded());
        assert!(!mesh.is_empty(), "seed {}", seed);
        assert!(mesh.is_closed(), "seed {} has {} boundary edges", seed, mesh.boundary_edge_count());
        assert!(mesh.is_consistently_oriented(), "seed {}", seed);
    }
}

#[test]
fn test_alternating_cube() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let mut field = VoxelField::filled([2, 2, 2], 10.0).unwrap();
    for [x, y, z] in [[0, 0, 0], [0, 1, 1], [1, 0, 1], [1, 1, 0]] {
        field.set(x, y, z, -5.0).unwrap();
    }

    let inspection = builder.inspect_cell(&field, [0, 0, 0]).unwrap();
    assert_eq!(inspection.code, 150);
    assert_eq!(inspection.triangles.len(), 4);

    let mesh = builder.build(&field, MeshCapacity::unbounded());
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.vertex_count(), 12);
    // no neighbour to stitch with
    assert_eq!(mesh.summary.caps_emitted, 0);
    assert_eq!(mesh.summary.caps_unmatched, 6);
}

// ==================== Spheres ====================

#[test]
fn test_sphere_is_a_closed_surface() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let field = VoxelField::from_fn([10, 10, 10], |x, y, z| {
        3.0 - (Vec3::new(x as f32, y as f32, z as f32) - Vec3::splat(4.5)).length()
    })
    .unwrap();

    let mesh = builder.build(&field, MeshCapacity::unbounded());
    assert_eq!(mesh.vertex_count(), 192);
    assert_eq!(mesh.triangle_count(), 380);
    assert_eq!(mesh.euler_characteristic(), 2);
    assert!(mesh.is_closed());

    // every vertex sits on a cell edge where the field changes sign
    for v in &mesh.vertices {
        let r = (v.position() - Vec3::splat(4.5)).length();
        assert!((r - 3.0).abs() < 0.5, "vertex at radius {}", r);
    }
}

#[test]
fn test_offset_sphere() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let center = Vec3::new(5.3, 5.1, 5.7);
    let field = VoxelField::from_fn([12, 12, 12], |x, y, z| {
        3.7 - (Vec3::new(x as f32, y as f32, z as f32) - center).length()
    })
    .unwrap();

    let mesh = builder.build(&field, MeshCapacity::unbounded());
    assert_eq!(mesh.vertex_count(), 246);
    assert_eq!(mesh.triangle_count(), 488);
    assert!(mesh.is_closed());
    assert!(mesh.is_consistently_oriented());
}

#[test]
fn test_bump_spheres() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);

    let mut field = VoxelField::filled([16, 16, 16], -1.0).unwrap();
    field.add_sphere(Vec3::new(7.3, 7.6, 7.1), 6.2);
    let mesh = builder.build(&field, MeshCapacity::unbounded());
    assert_eq!(mesh.vertex_count(), 176);
    assert_eq!(mesh.triangle_count(), 348);
    assert!(mesh.is_closed());

    let mut field = VoxelField::filled([24, 24, 24], -1.0).unwrap();
    field.add_sphere(Vec3::new(8.3, 11.6, 11.1), 6.2);
    field.add_sphere(Vec3::new(14.7, 11.2, 12.4), 5.3);
    let mesh = builder.build(&field, MeshCapacity::unbounded());
    assert_eq!(mesh.vertex_count(), 302);
    assert_eq!(mesh.triangle_count(), 600);
    assert!(mesh.is_closed());
    assert!(mesh.is_consistently_oriented());
}

// ==================== Capacity and stats ====================

#[test]
fn test_truncation_keeps_output_consistent() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let field = noise_field(9, 7);

    let full = builder.build(&field, MeshCapacity::unbounded());
    let limited = builder.build(&field, MeshCapacity::new(full.vertex_count() / 2, usize::MAX));

    assert!(limited.truncated);
    assert!(limited.vertex_count() <= full.vertex_count() / 2);
    assert!(limited.triangle_count() < full.triangle_count());
    for t in &limited.triangles {
        assert!(t.indices.iter().all(|&i| (i as usize) < limited.vertex_count()));
    }
}

#[test]
fn test_stats_report_covers_the_field() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let mut stats = UsageStats::new();
    let field = noise_field(8, 3);

    let mesh = builder.build_with_stats(&field, MeshCapacity::unbounded(), &mut stats);
    let [cx, cy, cz] = field.cell_counts();
    assert_eq!(mesh.summary.cells_visited, cx * cy * cz);
    assert_eq!(stats.total() as usize, mesh.summary.live_cells);
    assert!(stats.distinct_cases() > 10);

    let report = stats.report(&table);
    let summary = format!("cases ok: 254, cases empty: 0, cells: {}\n", stats.total());
    assert!(report.ends_with(&summary), "{}", report);
}
