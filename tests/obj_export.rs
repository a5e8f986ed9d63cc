use height_forge::{
    error::ExportError,
    export::{write_obj, write_obj_file},
    settings::sample_count,
};

fn temp_obj(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("height_forge_{tag}_{}.obj", std::process::id()))
}

#[test]
fn flat_two_by_two_grid_has_nine_vertices_and_eight_faces() {
    let heights = vec![0.0f32; sample_count(2)];
    let mut out = Vec::new();
    write_obj(&mut out, &heights, 2, 1.0).unwrap();
    let text = String::from_utf8(out).unwrap();

    let vertices: Vec<&str> = text.lines().filter(|l| l.starts_with("v ")).collect();
    let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
    assert_eq!(vertices.len(), 9);
    assert_eq!(faces.len(), 8);

    for v in &vertices {
        let coords: Vec<f32> = v[2..].split(' ').map(|c| c.parse().unwrap()).collect();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[1], 0.0);
        assert!(coords[0].abs() <= 1.0 && coords[2].abs() <= 1.0);
    }
    for f in &faces {
        for index in f[2..].split(' ') {
            let index: u32 = index.parse().unwrap();
            assert!((1..=9).contains(&index), "{f}");
        }
    }
}

#[test]
fn tobj_reads_back_the_same_mesh() {
    let detail = 4;
    let heights: Vec<f32> = (0..sample_count(detail)).map(|i| i as f32 * 0.125).collect();
    let path = temp_obj("tobj");
    write_obj_file(&path, &heights, detail, 2.0).unwrap();

    let (models, _materials) = tobj::load_obj(
        &path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(models.len(), 1);
    let mesh = &models[0].mesh;
    assert_eq!(mesh.positions.len(), heights.len() * 3);
    assert_eq!(mesh.indices.len(), (detail * detail * 2 * 3) as usize);

    // tobj renumbers vertices by first use, so match them back by position.
    let side = detail + 1;
    let position = |i: u32| glam::Vec3::from_slice(&mesh.positions[i as usize * 3..][..3]);
    for i in 0..(mesh.positions.len() / 3) as u32 {
        let p = position(i);
        let gx = ((p.x + 2.0) / 4.0 * detail as f32).round() as u32;
        let gy = ((p.z + 2.0) / 4.0 * detail as f32).round() as u32;
        assert_eq!(p.y, heights[(gy * side + gx) as usize], "{p:?}");
    }
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (position(tri[0]), position(tri[1]), position(tri[2]));
        let flat = |v: glam::Vec3| glam::Vec3::new(v.x, 0.0, v.z);
        let normal = (flat(b) - flat(a)).cross(flat(c) - flat(a));
        assert!(normal.y > 0.0, "{tri:?}");
    }
}

#[test]
fn short_height_buffer_leaves_no_file_behind() {
    let path = temp_obj("short");
    let err = write_obj_file(&path, &[0.0; 3], 2, 1.0).unwrap_err();
    assert!(matches!(
        err,
        ExportError::ShortBuffer {
            available: 3,
            required: 9,
            ..
        }
    ));
    assert!(!path.exists());
}

#[test]
fn unwritable_destination_reports_the_path() {
    let path = std::env::temp_dir()
        .join("height_forge_missing_dir")
        .join("mesh.obj");
    let err = write_obj_file(&path, &[0.0; 4], 1, 1.0).unwrap_err();
    assert!(err.to_string().contains("mesh.obj"));
}
