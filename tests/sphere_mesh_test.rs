use approx::assert_relative_eq;
use globe_flow::{
    cgmath::{InnerSpace, Vector3},
    resources::mesh::SphereGeometry,
};

fn v(a: [f32; 3]) -> Vector3<f32> {
    Vector3::new(a[0], a[1], a[2])
}

#[test]
fn vertex_and_index_counts() {
    for (w, h) in [(3, 2), (8, 6), (32, 32), (64, 17)] {
        let sphere = SphereGeometry::new(1.0, w, h);
        let mesh = sphere.tessellate();
        assert_eq!(mesh.vertices.len(), ((w + 1) * (h + 1)) as usize);
        assert_eq!(mesh.vertices.len(), sphere.vertex_count());
        assert_eq!(mesh.indices.len(), (6 * w * (h - 1)) as usize);
        assert_eq!(mesh.indices.len(), sphere.index_count());
    }
}

#[test]
fn degenerate_segment_counts_are_raised() {
    let sphere = SphereGeometry::new(1.0, 0, 1);
    assert_eq!(sphere.width_segments, 3);
    assert_eq!(sphere.height_segments, 2);
    assert_eq!(sphere.tessellate().indices.len(), 18);
}

#[test]
fn every_vertex_sits_on_the_radius() {
    let mesh = SphereGeometry::new(3.05, 24, 16).tessellate();
    for vertex in &mesh.vertices {
        assert_relative_eq!(v(vertex.position).magnitude(), 3.05, epsilon = 1e-5);
        assert_relative_eq!(v(vertex.normal).magnitude(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn indices_stay_in_bounds() {
    let mesh = SphereGeometry::new(1.0, 12, 9).tessellate();
    let count = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < count));
}

#[test]
fn tangent_frames_are_orthonormal_and_right_handed() {
    let mesh = SphereGeometry::new(2.0, 16, 12).tessellate();
    for vertex in &mesh.vertices {
        let n = v(vertex.normal);
        let t = v(vertex.tangent);
        let b = v(vertex.bitangent);
        assert_relative_eq!(t.magnitude(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(b.magnitude(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(t.dot(n), 0.0, epsilon = 1e-5);
        assert_relative_eq!(b.dot(n), 0.0, epsilon = 1e-5);
        assert_relative_eq!(t.dot(b), 0.0, epsilon = 1e-5);
        let cross = t.cross(b);
        assert_relative_eq!(cross.x, n.x, epsilon = 1e-5);
        assert_relative_eq!(cross.y, n.y, epsilon = 1e-5);
        assert_relative_eq!(cross.z, n.z, epsilon = 1e-5);
    }
}

#[test]
fn uv_runs_from_north_to_south() {
    let (w, h) = (8_usize, 4_usize);
    let mesh = SphereGeometry::new(1.0, w as u32, h as u32).tessellate();

    let north = &mesh.vertices[0];
    assert_relative_eq!(north.position[1], 1.0);
    assert_relative_eq!(north.tex_coords[1], 0.0);

    let south = &mesh.vertices[h * (w + 1)];
    assert_relative_eq!(south.position[1], -1.0, epsilon = 1e-6);
    assert_relative_eq!(south.tex_coords[1], 1.0);

    // A middle row spans the full texture width with a duplicated seam
    let row = &mesh.vertices[2 * (w + 1)..3 * (w + 1)];
    assert_relative_eq!(row[0].tex_coords[0], 0.0);
    assert_relative_eq!(row[w].tex_coords[0], 1.0);
    for (a, b) in row[0].position.iter().zip(row[w].position.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn triangles_face_outward() {
    let mesh = SphereGeometry::new(1.0, 10, 8).tessellate();
    for tri in mesh.indices.chunks(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| v(mesh.vertices[i as usize].position));
        let face_normal = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        assert!(
            face_normal.dot(centroid) > 0.0,
            "triangle {:?} winds inward",
            tri
        );
    }
}
