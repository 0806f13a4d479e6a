//! End-to-end hierarchy builds from OBJ files on disk

use occlusion_hierarchy::constants::{NULL_INDEX, NULL_INDEX_SIGNED};
use occlusion_hierarchy::element_tree::traversal_order;
use occlusion_hierarchy::gpu::{traverse_packed_disks, traverse_packed_elements};
use occlusion_hierarchy::mesh::{load_obj, triangle_count, triangle_positions};
use occlusion_hierarchy::{
    build_occlusion_tree, build_surface_elements, HierarchyConfig, HierarchyError, PackOrder,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::f32::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

const QUAD: &str = "\
# unit quad, one texture island
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3
f 1/1 3/3 4/4
";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_file(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("Failed to write test file");
    path
}

/// Jittered n x n vertex grid with a height field, split into two texture
/// islands down the middle column
fn jittered_grid(n: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut obj = String::new();
    for y in 0..n {
        for x in 0..n {
            let jx = (rng.gen::<f32>() - 0.5) * 0.3;
            let jy = (rng.gen::<f32>() - 0.5) * 0.3;
            let h = rng.gen::<f32>() * 0.5;
            writeln!(obj, "v {} {} {}", x as f32 + jx, y as f32 + jy, h).unwrap();
        }
    }

    let half = n / 2;
    let mut texcoords: HashMap<(usize, bool), usize> = HashMap::new();
    let mut faces = String::new();
    let mut corner = |v: usize, right: bool, obj: &mut String| -> usize {
        let next = texcoords.len() + 1;
        *texcoords.entry((v, right)).or_insert_with(|| {
            let (x, y) = (v % n, v / n);
            let u = x as f32 / n as f32 * 0.5 + if right { 0.5 } else { 0.0 };
            writeln!(obj, "vt {} {}", u, y as f32 / n as f32).unwrap();
            next
        })
    };
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let right = x >= half;
            let quad = [y * n + x, y * n + x + 1, (y + 1) * n + x + 1, (y + 1) * n + x];
            let t: Vec<usize> = quad.iter().map(|&v| corner(v, right, &mut obj)).collect();
            writeln!(
                faces,
                "f {}/{} {}/{} {}/{}",
                quad[0] + 1, t[0], quad[1] + 1, t[1], quad[2] + 1, t[2]
            )
            .unwrap();
            writeln!(
                faces,
                "f {}/{} {}/{} {}/{}",
                quad[0] + 1, t[0], quad[2] + 1, t[2], quad[3] + 1, t[3]
            )
            .unwrap();
        }
    }
    obj.push_str(&faces);
    obj
}

#[test]
fn test_quad_builds_both_variants() {
    init_logger();
    let dir = tempfile::tempdir().expect("Failed to create temporary directory for test");
    let path = write_file(&dir, "quad.obj", QUAD);
    let config = HierarchyConfig::default();

    let tree = build_occlusion_tree(&path, &config).expect("quad builds");
    assert_eq!(tree.records.len(), 3);
    assert_eq!(tree.root_index, 0);
    assert_eq!(tree.stats.leaf_count, 2);
    assert_eq!(tree.stats.max_depth, 1);

    let root = tree.records[0];
    assert!((root.area_over_pi - 1.0 / PI).abs() < 1e-6);
    assert_eq!(root.parent_index, NULL_INDEX);
    assert_eq!(root.next_index, NULL_INDEX);
    assert_eq!(root.normal, [0.0, 0.0, 1.0]);
    assert!((root.centroid[0] - 0.5).abs() < 1e-6);
    assert!((root.centroid[1] - 0.5).abs() < 1e-6);

    let left = tree.records[root.left_child_index as usize];
    let right = tree.records[root.right_child_index as usize];
    assert_eq!(left.next_index, root.right_child_index);
    assert_eq!(right.next_index, NULL_INDEX);
    assert_eq!(left.parent_index, 0);
    assert!((left.area_over_pi - 0.5 / PI).abs() < 1e-6);
    assert_eq!(tree.indices, vec![0, 1, 2, 0, 2, 3]);
    assert_eq!(tree.vertices.len(), 4);

    let elements = build_surface_elements(&path, &config).expect("quad builds");
    assert_eq!(elements.chart_count, 1);
    assert_eq!(elements.forest.summary.leaf_count, 4);
    // one root over four promoted leaves; the two split nodes are dropped
    assert_eq!(elements.records.len(), 5);
    let head = elements.records[0];
    assert_eq!(head.child_index, 1);
    assert_eq!(head.next_index, NULL_INDEX_SIGNED);
    assert!((head.area_over_pi - 1.0 / PI).abs() < 1e-6);
    for leaf in &elements.records[1..] {
        assert_eq!(leaf.child_index, NULL_INDEX_SIGNED);
    }
    assert_eq!(elements.records[4].next_index, NULL_INDEX_SIGNED);
    assert_eq!(elements.receivers.len(), 4);
    assert!(elements.receivers.iter().all(|r| r.accessibility == 1.0));
}

#[test]
fn test_missing_file_is_io_error() {
    init_logger();
    let dir = tempfile::tempdir().expect("Failed to create temporary directory for test");
    let path = dir.path().join("missing.obj");
    let config = HierarchyConfig::default();

    match build_surface_elements(&path, &config) {
        Err(HierarchyError::IoError { path: p, .. }) => assert!(p.ends_with("missing.obj")),
        other => panic!("expected IoError, got {:?}", other.map(|_| ())),
    }
    assert!(matches!(
        build_occlusion_tree(&path, &config),
        Err(HierarchyError::IoError { .. })
    ));
}

#[test]
fn test_malformed_face_is_reported() {
    init_logger();
    let dir = tempfile::tempdir().expect("Failed to create temporary directory for test");
    let path = write_file(&dir, "bad.obj", "v 0 0 0\nv 1 0 0\nf 1 2\n");
    let err = build_occlusion_tree(&path, &HierarchyConfig::default()).unwrap_err();
    assert!(matches!(err, HierarchyError::MalformedFace { line: 3, .. }));
}

#[test]
fn test_config_file_drives_pack_order() {
    init_logger();
    let dir = tempfile::tempdir().expect("Failed to create temporary directory for test");
    let mesh_path = write_file(&dir, "grid.obj", &jittered_grid(6, 3));
    let config_path = write_file(&dir, "hierarchy.toml", "pack_order = \"build\"\n");
    let config = HierarchyConfig::load(&config_path).expect("config loads");
    assert_eq!(config.pack_order, PackOrder::Build);

    let tree = build_occlusion_tree(&mesh_path, &config).unwrap();
    // build order keeps leaves at their face slots
    let faces = tree.tree.face_count;
    assert!(tree.root_index >= faces);
    for (i, record) in tree.records.iter().enumerate().take(faces as usize) {
        assert_eq!(record.left_child_index, NULL_INDEX, "face {}", i);
    }

    let elements = build_surface_elements(&mesh_path, &config).unwrap();
    let visited = traverse_packed_elements(&elements.records, 0).unwrap();
    assert_eq!(visited.len(), elements.records.len());
}

#[test]
fn test_random_meshes_are_cycle_free_and_conserve_area() {
    init_logger();
    let dir = tempfile::tempdir().expect("Failed to create temporary directory for test");

    for (i, &(n, seed)) in [(3usize, 1u64), (8, 2), (17, 3), (24, 4)].iter().enumerate() {
        let path = write_file(&dir, &format!("grid{}.obj", i), &jittered_grid(n, seed));
        let mesh = load_obj(&path).unwrap();
        let mesh_area: f32 = (0..triangle_count(&mesh))
            .map(|t| {
                let [a, b, c] = triangle_positions(&mesh, t);
                (b - a).cross(c - a).length() * 0.5
            })
            .sum();

        for order in [PackOrder::Traversal, PackOrder::Build] {
            let config = HierarchyConfig {
                pack_order: order,
                ..Default::default()
            };

            let tree = build_occlusion_tree(&path, &config).unwrap();
            let visited = traverse_packed_disks(&tree.records, tree.root_index).unwrap();
            assert_eq!(visited.len(), tree.records.len());
            let root_area = tree.records[tree.root_index as usize].area_over_pi * PI;
            assert!((root_area - mesh_area).abs() < 1e-3 * mesh_area, "n = {}", n);

            let elements = build_surface_elements(&path, &config).unwrap();
            assert_eq!(elements.chart_count, 2);
            let visited = traverse_packed_elements(&elements.records, 0).unwrap();
            assert_eq!(visited.len(), elements.records.len());

            let leaf_area: f32 = elements
                .records
                .iter()
                .filter(|r| r.child_index == NULL_INDEX_SIGNED)
                .map(|r| r.area_over_pi * PI)
                .sum();
            assert!((leaf_area - mesh_area).abs() < 1e-3 * mesh_area, "n = {}", n);

            // every interior record holds exactly the sum of its children
            let forest = &elements.forest;
            for &node in &traversal_order(&forest.nodes, forest.head).unwrap() {
                let parent = forest.nodes[node as usize];
                if parent.child == NULL_INDEX {
                    continue;
                }
                let mut sum = 0.0;
                let mut c = parent.child;
                while c != NULL_INDEX && c != parent.next {
                    sum += forest.nodes[c as usize].area;
                    c = forest.nodes[c as usize].next;
                }
                assert_eq!(parent.area, sum);
            }
        }
    }
}
