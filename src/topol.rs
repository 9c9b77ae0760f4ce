use crate::{
    element::{EH, FH, Handle, VH},
    error::Error,
    mesh::PolyMesh,
};
use arrayvec::ArrayVec;
use std::collections::HashMap;

/**
 * An edge derived from the face loops: a canonical unordered pair of vertex
 * indices, plus the faces containing that pair as consecutive loop entries, in
 * encounter order.
 *
 * The adjacent face list is capped at 2 because an edge shared by more than 2
 * faces is non-manifold and rejected during the build.
 */
pub struct Edge {
    verts: (VH, VH),
    faces: ArrayVec<FH, 2>,
}

impl Edge {
    /// The endpoints of the edge, smaller index first.
    pub fn vertices(&self) -> (VH, VH) {
        self.verts
    }

    /// The faces incident on this edge, in the order they were encountered
    /// while walking the face loops.
    pub fn faces(&self) -> &[FH] {
        &self.faces
    }

    /// An edge is a boundary edge if it has exactly one incident face.
    pub fn is_boundary(&self) -> bool {
        self.faces.len() == 1
    }

    /// Midpoint of the edge's endpoint positions. This is the plain midpoint,
    /// not the averaged edge point of the subdivision scheme.
    pub fn midpoint(&self, points: &[glam::Vec3]) -> glam::Vec3 {
        (points[self.verts.0.index() as usize] + points[self.verts.1.index() as usize]) * 0.5
    }
}

/**
 * Interior / boundary classification of a vertex.
 *
 * A boundary vertex records its two boundary edges, so the crease rule can
 * average their midpoints without searching the incidence lists again. A
 * boundary vertex with any other number of boundary edges is rejected as
 * [`Error::IrregularBoundaryVertex`] during the build.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    Interior,
    Boundary { ends: [EH; 2] },
}

/**
 * Edge and vertex-neighborhood structures derived from a [`PolyMesh`].
 *
 * The flat encoding stores no edges and no neighbor records, so these are
 * reconstructed by walking every face loop cyclically and collapsing the two
 * directed traversals of a shared edge onto one canonical record. All the
 * structural errors of the input surface here: out of range vertex indices,
 * degenerate faces, non-manifold edges, singular vertices and irregular
 * boundary vertices. A successfully built `Adjacency` therefore certifies the
 * mesh for subdivision.
 *
 * Everything in here is indexed by entity, not linked by pointers, and is
 * meant to be built fresh per call and dropped with it.
 */
pub struct Adjacency {
    edges: Vec<Edge>,
    edge_map: HashMap<(u32, u32), EH>,
    // Edge handle per face corner, parallel to the mesh's `loops` array. The
    // entry at a corner is the edge leading out of that corner in the face's
    // winding direction.
    loop_edges: Vec<EH>,
    vertex_edges: Vec<Vec<EH>>,
    vertex_faces: Vec<Vec<FH>>,
    vertex_kinds: Vec<VertexKind>,
}

fn check_face_loop(mesh: &PolyMesh, f: FH, vs: &[u32]) -> Result<(), Error> {
    if let Some(&vi) = vs.iter().find(|&&vi| (vi as usize) >= mesh.num_vertices()) {
        return Err(Error::OutOfRangeIndex(vi.into()));
    }
    // Repeated consecutive indices (including the wrap-around pair) collapse
    // an edge of the face to a point.
    for (i, &a) in vs.iter().enumerate() {
        if a == vs[(i + 1) % vs.len()] {
            return Err(Error::DegenerateFace(f));
        }
    }
    // Loops are short, so a quadratic scan for distinct vertices is fine.
    let distinct = vs
        .iter()
        .enumerate()
        .filter(|&(i, a)| !vs[..i].contains(a))
        .count();
    if distinct < 3 {
        return Err(Error::DegenerateFace(f));
    }
    Ok(())
}

impl Adjacency {
    /// Walk every face loop of `mesh` and accumulate the edge records and
    /// per-vertex incidence lists.
    ///
    /// Edge indices are assigned in first-encounter order during the walk, so
    /// the result is a pure function of the input arrays.
    pub fn build(mesh: &PolyMesh) -> Result<Self, Error> {
        let nv = mesh.num_vertices();
        let mut edges: Vec<Edge> = Vec::new();
        let mut edge_map: HashMap<(u32, u32), EH> = HashMap::with_capacity(mesh.num_loops());
        let mut loop_edges: Vec<EH> = vec![0u32.into(); mesh.num_loops()];
        let mut vertex_edges: Vec<Vec<EH>> = vec![Vec::new(); nv];
        let mut vertex_faces: Vec<Vec<FH>> = vec![Vec::new(); nv];
        for f in mesh.faces() {
            let vs = mesh.face_loop(f);
            check_face_loop(mesh, f, vs)?;
            let start = mesh.loop_start()[f.index() as usize] as usize;
            for (i, &a) in vs.iter().enumerate() {
                let b = vs[(i + 1) % vs.len()];
                let key = if a < b { (a, b) } else { (b, a) };
                let e = *edge_map.entry(key).or_insert_with(|| {
                    let e: EH = (edges.len() as u32).into();
                    edges.push(Edge {
                        verts: (key.0.into(), key.1.into()),
                        faces: ArrayVec::new(),
                    });
                    vertex_edges[key.0 as usize].push(e);
                    vertex_edges[key.1 as usize].push(e);
                    e
                });
                if edges[e.index() as usize].faces.try_push(f).is_err() {
                    return Err(Error::NonManifoldEdge(e));
                }
                loop_edges[start + i] = e;
                // Pushes for one face are contiguous, so checking the last
                // entry is enough to keep the list deduplicated.
                let vfaces = &mut vertex_faces[a as usize];
                if vfaces.last() != Some(&f) {
                    vfaces.push(f);
                }
            }
        }
        let mut vertex_kinds = Vec::with_capacity(nv);
        for (vi, ves) in vertex_edges.iter().enumerate() {
            let v: VH = (vi as u32).into();
            if ves.is_empty() {
                return Err(Error::SingularVertex(v));
            }
            let mut ends: ArrayVec<EH, 2> = ArrayVec::new();
            let mut nboundary = 0usize;
            for &e in ves {
                if edges[e.index() as usize].is_boundary() {
                    nboundary += 1;
                    let _ = ends.try_push(e);
                }
            }
            vertex_kinds.push(match nboundary {
                0 => VertexKind::Interior,
                2 => VertexKind::Boundary {
                    ends: [ends[0], ends[1]],
                },
                n => return Err(Error::IrregularBoundaryVertex(v, n)),
            });
        }
        Ok(Adjacency {
            edges,
            edge_map,
            loop_edges,
            vertex_edges,
            vertex_faces,
            vertex_kinds,
        })
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> {
        (0..(self.num_edges() as u32)).map(|i| i.into())
    }

    pub fn edge(&self, e: EH) -> &Edge {
        &self.edges[e.index() as usize]
    }

    /// Look up the edge connecting `a` and `b`, if any. The order of the two
    /// vertices does not matter.
    pub fn edge_between(&self, a: VH, b: VH) -> Option<EH> {
        let (a, b) = (a.index(), b.index());
        let key = if a < b { (a, b) } else { (b, a) };
        self.edge_map.get(&key).copied()
    }

    /// The edge leading out of each face corner, parallel to the mesh's
    /// `loops` array.
    pub fn loop_edges(&self) -> &[EH] {
        &self.loop_edges
    }

    pub fn vertex_kind(&self, v: VH) -> VertexKind {
        self.vertex_kinds[v.index() as usize]
    }

    /// The edges incident on `v`, in encounter order.
    pub fn vertex_edges(&self, v: VH) -> &[EH] {
        &self.vertex_edges[v.index() as usize]
    }

    /// The faces incident on `v`, in encounter order.
    pub fn vertex_faces(&self, v: VH) -> &[FH] {
        &self.vertex_faces[v.index() as usize]
    }

    /// The number of edges incident on `v`.
    pub fn valence(&self, v: VH) -> usize {
        self.vertex_edges[v.index() as usize].len()
    }

    /// A mesh is closed if every edge has exactly two incident faces.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| !e.is_boundary())
    }
}
