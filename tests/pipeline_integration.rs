//! End-to-end tests: demo scene -> sweep -> checks and export

use std::collections::HashMap;

use amc::config::{SceneConfig, SceneKind};
use amc::export::write_obj;
use amc::scene::{ambiguous_scenario, build_scene, AMBIGUOUS_CASE_COUNT};
use amc_cases::CaseTable;
use amc_core::ScalarField;
use amc_mesh::{Mesh, MeshBuilder, MeshCapacity};

fn table() -> CaseTable {
    CaseTable::build().expect("case table should build")
}

/// Directed uses of every segment whose ends lie on the face `axis == 1`
fn shared_face_segments(mesh: &Mesh, axis: usize) -> HashMap<(u32, u32), usize> {
    let on_face = |i: u32| mesh.vertices[i as usize].position[axis] == 1.0;
    let mut uses = HashMap::new();
    for triangle in &mesh.triangles {
        for (a, b) in triangle.half_edges() {
            if on_face(a) && on_face(b) {
                *uses.entry((a, b)).or_insert(0) += 1;
            }
        }
    }
    uses
}

#[test]
fn test_ambiguous_scenarios_are_stitched() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);

    for index in 0..AMBIGUOUS_CASE_COUNT {
        let field = ambiguous_scenario(index).unwrap();
        let axis = (0..3).position(|a| field.size()[a] == 3).unwrap();
        let mesh = builder.build(&field, MeshCapacity::unbounded());

        assert_eq!(mesh.vertex_count(), 14, "scenario {}", index);
        assert_eq!(mesh.triangle_count(), 8, "scenario {}", index);
        assert_eq!(mesh.summary.caps_emitted, 1, "scenario {}", index);

        let segments = shared_face_segments(&mesh, axis);
        assert!(!segments.is_empty(), "scenario {}", index);
        for (&(a, b), &count) in &segments {
            assert_eq!(count, 1, "scenario {}: segment {}-{} repeated", index, a, b);
            assert_eq!(
                segments.get(&(b, a)),
                Some(&1),
                "scenario {}: segment {}-{} has no opposite use",
                index,
                a,
                b
            );
        }
    }
}

#[test]
fn test_default_sphere_scene() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);
    let field = build_scene(&SceneConfig::default(), [24, 24, 24]).unwrap();

    let mesh = builder.build(&field, MeshCapacity::unbounded());
    assert_eq!(mesh.vertex_count(), 302);
    assert_eq!(mesh.triangle_count(), 600);
    assert!(mesh.is_closed());
    assert!(mesh.is_consistently_oriented());
    // two overlapping spheres blend into one genus-0 surface
    assert_eq!(mesh.euler_characteristic(), 2);
}

#[test]
fn test_animated_spheres_stay_closed() {
    let table = table();
    let mut builder = MeshBuilder::new(&table);

    for step in 0..8 {
        let scene = SceneConfig {
            phase: step as f32 * 0.8,
            orbit: 1.5,
            ..Default::default()
        };
        let field = build_scene(&scene, [24, 24, 24]).unwrap();
        let mesh = builder.build(&field, MeshCapacity::unbounded());
        assert!(!mesh.is_empty(), "step {}", step);
        assert!(mesh.is_closed(), "step {}", step);
        assert!(mesh.is_consistently_oriented(), "step {}", step);
    }
}

#[test]
fn test_loaded_table_meshes_identically() {
    let table = table();
    let path = std::env::temp_dir().join(format!("amc_pipeline_{}.ron", std::process::id()));
    table.save_ron(&path).unwrap();
    let loaded = CaseTable::load_ron(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, table);

    let scene = SceneConfig {
        kind: SceneKind::Spheres,
        ..Default::default()
    };
    let field = build_scene(&scene, [24, 24, 24]).unwrap();
    let original = MeshBuilder::new(&table).build(&field, MeshCapacity::unbounded());
    let reloaded = MeshBuilder::new(&loaded).build(&field, MeshCapacity::unbounded());
    assert_eq!(original, reloaded);
}

#[test]
fn test_obj_export_of_a_scene() {
    let table = table();
    let field = ambiguous_scenario(0).unwrap();
    let mesh = MeshBuilder::new(&table).build(&field, MeshCapacity::unbounded());

    let mut out = Vec::new();
    write_obj(&mesh, &mut out).unwrap();
    let obj = String::from_utf8(out).unwrap();

    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 14);
    assert_eq!(obj.lines().filter(|l| l.starts_with("vn ")).count(), 14);
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 8);
}
