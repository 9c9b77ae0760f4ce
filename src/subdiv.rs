use crate::{
    element::Handle,
    error::Error,
    mesh::PolyMesh,
    topol::{Adjacency, VertexKind},
};

/// Compute the face points: the arithmetic mean of each face's vertex
/// positions, with equal weight regardless of polygon shape.
fn calc_face_points(mesh: &PolyMesh) -> Vec<glam::Vec3> {
    let points = mesh.points();
    mesh.faces()
        .map(|f| {
            let vs = mesh.face_loop(f);
            vs.iter()
                .fold(glam::Vec3::ZERO, |total, vi| total + points[*vi as usize])
                / vs.len() as f32
        })
        .collect()
}

/// Compute the edge points. An interior edge averages its two endpoints with
/// the two adjacent face points; a boundary edge is split at its midpoint.
fn calc_edge_points(
    mesh: &PolyMesh,
    adj: &Adjacency,
    face_points: &[glam::Vec3],
) -> Vec<glam::Vec3> {
    let points = mesh.points();
    adj.edges()
        .map(|e| {
            let edge = adj.edge(e);
            let (a, b) = edge.vertices();
            let ends = points[a.index() as usize] + points[b.index() as usize];
            match edge.faces() {
                [fa, fb] => {
                    (ends + face_points[fa.index() as usize] + face_points[fb.index() as usize])
                        * 0.25
                }
                _ => ends * 0.5,
            }
        })
        .collect()
}

/// Compute the updated vertex positions.
///
/// An interior vertex of valence `n` moves to `(F + 2R + (n - 3) * P) / n`,
/// where `F` is the mean of the incident face points and `R` is the mean of
/// the incident edge midpoints. The midpoints are the plain endpoint averages,
/// not the edge points computed above. A boundary vertex is smoothed along the
/// boundary only, with the conventional crease weights: the two boundary edge
/// midpoints and 6 times the original position, divided by 8.
fn calc_vertex_points(
    mesh: &PolyMesh,
    adj: &Adjacency,
    face_points: &[glam::Vec3],
) -> Vec<glam::Vec3> {
    let points = mesh.points();
    mesh.vertices()
        .map(|v| {
            let pos = points[v.index() as usize];
            match adj.vertex_kind(v) {
                VertexKind::Boundary { ends } => {
                    (adj.edge(ends[0]).midpoint(points)
                        + adj.edge(ends[1]).midpoint(points)
                        + pos * 6.0)
                        / 8.0
                }
                VertexKind::Interior => {
                    let vfaces = adj.vertex_faces(v);
                    let favg = vfaces.iter().fold(glam::Vec3::ZERO, |total, f| {
                        total + face_points[f.index() as usize]
                    }) / vfaces.len() as f32;
                    let n = adj.valence(v) as f32;
                    let ravg = adj.vertex_edges(v).iter().fold(glam::Vec3::ZERO, |total, e| {
                        total + adj.edge(*e).midpoint(points)
                    }) / n;
                    (favg + ravg * 2.0 + pos * (n - 3.0)) / n
                }
            }
        })
        .collect()
}

/// Assemble the refined mesh. The new vertex array is the concatenation of all
/// face points, then all edge points, then all updated vertex points, each new
/// index equal to its position in that order. Every corner of every original
/// face becomes one quad: vertex point, outgoing edge point, face point,
/// incoming edge point, preserving the face's winding.
fn build_topology(
    mesh: &PolyMesh,
    adj: &Adjacency,
    face_points: &[glam::Vec3],
    edge_points: &[glam::Vec3],
    vertex_points: &[glam::Vec3],
) -> Result<PolyMesh, Error> {
    let nf = mesh.num_faces();
    let ne = adj.num_edges();
    let nv = mesh.num_vertices();
    let mut out = PolyMesh::with_capacity(nf + ne + nv, mesh.num_loops(), mesh.num_loops() * 4);
    for &p in face_points {
        out.add_vertex(p);
    }
    for &p in edge_points {
        out.add_vertex(p);
    }
    for &p in vertex_points {
        out.add_vertex(p);
    }
    let edge_offset = nf as u32;
    let vertex_offset = (nf + ne) as u32;
    let loop_edges = adj.loop_edges();
    for f in mesh.faces() {
        let vs = mesh.face_loop(f);
        let start = mesh.loop_start()[f.index() as usize] as usize;
        let n = vs.len();
        for i in 0..n {
            let eout = loop_edges[start + i];
            let ein = loop_edges[start + (i + n - 1) % n];
            out.add_quad_face(
                (vertex_offset + vs[i]).into(),
                (edge_offset + eout.index()).into(),
                f.index().into(),
                (edge_offset + ein.index()).into(),
            )?;
        }
    }
    Ok(out)
}

impl PolyMesh {
    /// Perform one step of [Catmull-Clark
    /// subdivision](https://en.wikipedia.org/wiki/Catmull%E2%80%93Clark_subdivision_surface),
    /// producing a new mesh in which every face is a quadrilateral.
    ///
    /// The input may contain triangles, quads and n-gons, with or without
    /// boundary. The output has one vertex per input face, edge and vertex,
    /// and `sum(loop_total)` quad faces, one per input face corner. The input
    /// is not modified; structural errors abort the call with no output.
    ///
    /// ```rust
    /// use gypsum::PolyMesh;
    ///
    /// let mesh = PolyMesh::unit_box().expect("Cannot create box");
    /// let fine = mesh.subdivide_catmull_clark().expect("Subdivision failed");
    /// assert_eq!((26, 24), (fine.num_vertices(), fine.num_faces()));
    /// ```
    pub fn subdivide_catmull_clark(&self) -> Result<PolyMesh, Error> {
        let adj = Adjacency::build(self)?;
        let face_points = calc_face_points(self);
        let edge_points = calc_edge_points(self, &adj, &face_points);
        let vertex_points = calc_vertex_points(self, &adj, &face_points);
        build_topology(self, &adj, &face_points, &edge_points, &vertex_points)
    }

    /// Subdivide the mesh for the given number of `iterations`, feeding each
    /// level's output to the next level as input.
    pub fn subdivide_catmull_clark_n(&self, iterations: usize) -> Result<PolyMesh, Error> {
        if iterations == 0 {
            return Ok(self.clone());
        }
        let mut mesh = self.subdivide_catmull_clark()?;
        for _ in 1..iterations {
            mesh = mesh.subdivide_catmull_clark()?;
        }
        Ok(mesh)
    }
}

/// Subdivide a mesh given in the flat encoding: 3 consecutive floats per
/// vertex, one vertex index per face corner in `loops`, and a start/total pair
/// per face describing that face's slice of `loops`. All indices are 0-based.
///
/// The result is returned in the same shape, so multi-level subdivision is a
/// matter of feeding each call's output to the next call.
pub fn subdivide(
    vertices: &[f32],
    loop_start: &[u32],
    loop_total: &[u32],
    loops: &[u32],
) -> Result<(Vec<f32>, Vec<u32>, Vec<u32>, Vec<u32>), Error> {
    let mesh = PolyMesh::from_flat_arrays(vertices, loop_start, loop_total, loops)?;
    Ok(mesh.subdivide_catmull_clark()?.into_flat_arrays())
}

#[cfg(test)]
mod test {
    use super::subdivide;
    use crate::{element::FH, error::Error, macros::assert_f32_eq, mesh::PolyMesh};

    fn assert_vec3_eq(a: glam::Vec3, b: glam::Vec3) {
        assert_f32_eq!(a.x, b.x, 1e-6, (a, b));
        assert_f32_eq!(a.y, b.y, 1e-6, (a, b));
        assert_f32_eq!(a.z, b.z, 1e-6, (a, b));
    }

    #[test]
    fn t_box_catmull_clark() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        let out = mesh.subdivide_catmull_clark().expect("Subdivision failed");
        // One vertex per input face, edge and vertex; one quad per corner.
        assert_eq!(6 + 12 + 8, out.num_vertices());
        assert_eq!(24, out.num_faces());
        assert!(out.loop_total().iter().all(|&t| t == 4));
        out.check().expect("Structural errors found");
        assert!(out.is_closed().expect("Cannot build adjacency"));
    }

    #[test]
    fn t_box_geometry() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        let out = mesh.subdivide_catmull_clark().expect("Subdivision failed");
        let points = out.points();
        // Face 0 is the z = 0 face; its face point is the centroid.
        assert_vec3_eq(points[0], glam::vec3(0.5, 0.5, 0.0));
        // Edges are indexed in encounter order while walking face loops, so
        // the edge between vertices 0 and 1 is edge 3, at new index 6 + 3.
        // Its point averages both endpoints and both adjacent face points.
        assert_vec3_eq(points[9], glam::vec3(0.5, 0.125, 0.125));
        // Corner vertices have valence 3: F = (1/3, 1/3, 1/3), R = (1/6, 1/6,
        // 1/6), so corner 0 moves to (F + 2R + 0 * P) / 3 = (2/9, 2/9, 2/9).
        assert_vec3_eq(points[18], glam::Vec3::splat(2.0 / 9.0));
    }

    #[test]
    fn t_box_two_levels() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        let out = mesh
            .subdivide_catmull_clark_n(2)
            .expect("Subdivision failed");
        // Level 1 is a closed quad mesh with 26 vertices, 48 edges and 24
        // faces, so level 2 has 26 + 48 + 24 vertices and 24 * 4 faces.
        assert_eq!(98, out.num_vertices());
        assert_eq!(96, out.num_faces());
        out.check().expect("Structural errors found");
        assert!(out.is_closed().expect("Cannot build adjacency"));
    }

    #[test]
    fn t_zero_iterations() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        let out = mesh.subdivide_catmull_clark_n(0).expect("Cannot clone");
        assert_eq!(mesh.num_vertices(), out.num_vertices());
        assert_eq!(mesh.num_faces(), out.num_faces());
    }

    #[test]
    fn t_quad_planar() {
        let mesh = PolyMesh::unit_quad().expect("Cannot create quad");
        let out = mesh.subdivide_catmull_clark().expect("Subdivision failed");
        assert_eq!(1 + 4 + 4, out.num_vertices());
        assert_eq!(4, out.num_faces());
        out.check().expect("Structural errors found");
        let points = out.points();
        // The children stay in the plane of the parent.
        assert!(points.iter().all(|p| p.z == 0.0));
        // Face point at the centroid, boundary edge points at the midpoints.
        assert_vec3_eq(points[0], glam::vec3(0.5, 0.5, 0.0));
        assert_vec3_eq(points[1], glam::vec3(0.5, 0.0, 0.0));
        assert_vec3_eq(points[2], glam::vec3(1.0, 0.5, 0.0));
        assert_vec3_eq(points[3], glam::vec3(0.5, 1.0, 0.0));
        assert_vec3_eq(points[4], glam::vec3(0.0, 0.5, 0.0));
        // Corner 0 is smoothed along the boundary by the crease rule.
        assert_vec3_eq(points[5], glam::vec3(0.0625, 0.0625, 0.0));
        // The first child quad walks corner 0's new vertex, the outgoing edge
        // point, the face point, and the incoming edge point.
        assert_eq!(out.face_loop(0.into()), [5, 1, 0, 4]);
    }

    #[test]
    fn t_grid_interior_vertex() {
        let mesh = PolyMesh::quad_grid(2, 2).expect("Cannot create grid");
        let out = mesh.subdivide_catmull_clark().expect("Subdivision failed");
        assert_eq!(4 + 12 + 9, out.num_vertices());
        assert_eq!(16, out.num_faces());
        out.check().expect("Structural errors found");
        // The center vertex of the grid is interior with valence 4 and is a
        // fixed point of the interior rule by symmetry.
        assert_vec3_eq(out.points()[4 + 12 + 4], glam::vec3(1.0, 1.0, 0.0));
    }

    #[test]
    fn t_triangles_become_quads() {
        // A tetrahedron; n-gon input other than quads must still produce an
        // all-quad closed mesh.
        let mut mesh = PolyMesh::new();
        mesh.add_vertex(glam::vec3(1.0, 1.0, 1.0));
        mesh.add_vertex(glam::vec3(1.0, -1.0, -1.0));
        mesh.add_vertex(glam::vec3(-1.0, 1.0, -1.0));
        mesh.add_vertex(glam::vec3(-1.0, -1.0, 1.0));
        for (a, b, c) in [(0, 1, 2), (0, 3, 1), (0, 2, 3), (1, 3, 2)] {
            mesh.add_tri_face(a.into(), b.into(), c.into())
                .expect("Cannot add face");
        }
        let out = mesh.subdivide_catmull_clark().expect("Subdivision failed");
        assert_eq!(4 + 6 + 4, out.num_vertices());
        assert_eq!(12, out.num_faces());
        assert!(out.loop_total().iter().all(|&t| t == 4));
        out.check().expect("Structural errors found");
        assert!(out.is_closed().expect("Cannot build adjacency"));
    }

    #[test]
    fn t_subdivide_flat_cube() {
        // The 2 x 2 x 2 cube in the raw flat encoding.
        let vertices = [
            -1.0f32, -1.0, -1.0, //
            -1.0, -1.0, 1.0, //
            -1.0, 1.0, -1.0, //
            -1.0, 1.0, 1.0, //
            1.0, -1.0, -1.0, //
            1.0, -1.0, 1.0, //
            1.0, 1.0, -1.0, //
            1.0, 1.0, 1.0, //
        ];
        let loop_start = [0u32, 4, 8, 12, 16, 20];
        let loop_total = [4u32; 6];
        let loops = [
            0u32, 1, 3, 2, //
            2, 3, 7, 6, //
            6, 7, 5, 4, //
            4, 5, 1, 0, //
            2, 6, 4, 0, //
            7, 3, 1, 5, //
        ];
        let (verts, starts, totals, new_loops) =
            subdivide(&vertices, &loop_start, &loop_total, &loops).expect("Subdivision failed");
        assert_eq!(26 * 3, verts.len());
        assert_eq!(24, starts.len());
        assert!(totals.iter().all(|&t| t == 4));
        assert_eq!(96, new_loops.len());
        // The output composes with itself.
        let (verts2, starts2, ..) =
            subdivide(&verts, &starts, &totals, &new_loops).expect("Subdivision failed");
        assert_eq!(98 * 3, verts2.len());
        assert_eq!(96, starts2.len());
    }

    #[test]
    fn t_deterministic_output() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        let a = mesh
            .subdivide_catmull_clark()
            .expect("Subdivision failed")
            .into_flat_arrays();
        let b = mesh
            .subdivide_catmull_clark()
            .expect("Subdivision failed")
            .into_flat_arrays();
        assert_eq!(a, b);
    }

    #[test]
    fn t_empty_mesh() {
        let out = PolyMesh::new()
            .subdivide_catmull_clark()
            .expect("Subdivision failed");
        assert_eq!(0, out.num_vertices());
        assert_eq!(0, out.num_faces());
    }

    #[test]
    fn t_degenerate_face_aborts() {
        let vertices = [0.0f32; 9];
        assert_eq!(
            subdivide(&vertices, &[0], &[3], &[0, 0, 1]).err(),
            Some(Error::DegenerateFace(FH::from(0)))
        );
    }
}
