use crate::{
    element::{FH, Handle, VH},
    error::Error,
};

/**
 * A polygon mesh in the flat encoding: a vertex position array, and per face a
 * `(loop_start, loop_total)` pair describing that face's slice of a shared
 * `loops` array of vertex indices, taken in winding order.
 *
 * This is the same encoding hosts like Blender use for their mesh data, so a
 * mesh can be built directly from the four arrays and converted back without
 * reshaping. There are no explicit edge or neighbor records; those are derived
 * per call by [`Adjacency`](crate::Adjacency).
 *
 * Invariants maintained by all constructors: every face has at least 3
 * vertices, every face's loop range is a valid slice of `loops`, and the loop
 * totals sum to the length of `loops`. Vertex indices stored in `loops` are
 * *not* guaranteed to be in range; they are checked when the adjacency is
 * built.
 */
#[derive(Clone)]
pub struct PolyMesh {
    points: Vec<glam::Vec3>,
    loop_start: Vec<u32>,
    loop_total: Vec<u32>,
    loops: Vec<u32>,
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl PolyMesh {
    pub fn new() -> Self {
        PolyMesh {
            points: Vec::new(),
            loop_start: Vec::new(),
            loop_total: Vec::new(),
            loops: Vec::new(),
        }
    }

    pub fn with_capacity(nverts: usize, nfaces: usize, nloops: usize) -> Self {
        PolyMesh {
            points: Vec::with_capacity(nverts),
            loop_start: Vec::with_capacity(nfaces),
            loop_total: Vec::with_capacity(nfaces),
            loops: Vec::with_capacity(nloops),
        }
    }

    /// Build a mesh from the flat arrays: 3 consecutive floats per vertex, one
    /// vertex index per face corner in `loops`, and a start/total pair per
    /// face. All indices are 0-based.
    pub fn from_flat_arrays(
        vertices: &[f32],
        loop_start: &[u32],
        loop_total: &[u32],
        loops: &[u32],
    ) -> Result<Self, Error> {
        if vertices.len() % 3 != 0 {
            return Err(Error::IncorrectNumberOfCoordinates(vertices.len()));
        }
        if loop_start.len() != loop_total.len() {
            return Err(Error::MismatchedArrayLengths(
                loop_start.len(),
                loop_total.len(),
            ));
        }
        let total: usize = loop_total.iter().map(|&t| t as usize).sum();
        if total != loops.len() {
            return Err(Error::MismatchedArrayLengths(total, loops.len()));
        }
        for (i, (&start, &total)) in loop_start.iter().zip(loop_total.iter()).enumerate() {
            let f: FH = (i as u32).into();
            if total < 3 {
                return Err(Error::DegenerateFace(f));
            }
            if (start as usize) + (total as usize) > loops.len() {
                return Err(Error::InvalidLoopRange(f));
            }
        }
        Ok(PolyMesh {
            points: vertices
                .chunks_exact(3)
                .map(|triplet| glam::vec3(triplet[0], triplet[1], triplet[2]))
                .collect(),
            loop_start: loop_start.to_vec(),
            loop_total: loop_total.to_vec(),
            loops: loops.to_vec(),
        })
    }

    /// Consume the mesh and return the flat arrays in the same shape
    /// [`from_flat_arrays`](Self::from_flat_arrays) consumes.
    pub fn into_flat_arrays(self) -> (Vec<f32>, Vec<u32>, Vec<u32>, Vec<u32>) {
        let vertices = self
            .points
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect();
        (vertices, self.loop_start, self.loop_total, self.loops)
    }

    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    pub fn num_faces(&self) -> usize {
        self.loop_start.len()
    }

    pub fn num_loops(&self) -> usize {
        self.loops.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> {
        (0..(self.num_vertices() as u32)).map(|i| i.into())
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> {
        (0..(self.num_faces() as u32)).map(|i| i.into())
    }

    pub fn points(&self) -> &[glam::Vec3] {
        &self.points
    }

    pub fn point(&self, v: VH) -> Result<glam::Vec3, Error> {
        self.points
            .get(v.index() as usize)
            .copied()
            .ok_or(Error::OutOfRangeIndex(v))
    }

    /// The vertex indices of face `f`, in winding order.
    ///
    /// `f` must be a valid face of this mesh.
    pub fn face_loop(&self, f: FH) -> &[u32] {
        let fi = f.index() as usize;
        let start = self.loop_start[fi] as usize;
        let total = self.loop_total[fi] as usize;
        &self.loops[start..(start + total)]
    }

    pub fn loop_start(&self) -> &[u32] {
        &self.loop_start
    }

    pub fn loop_total(&self) -> &[u32] {
        &self.loop_total
    }

    pub fn loops(&self) -> &[u32] {
        &self.loops
    }

    pub fn add_vertex(&mut self, pos: glam::Vec3) -> VH {
        let vi = self.points.len() as u32;
        self.points.push(pos);
        vi.into()
    }

    pub fn add_face(&mut self, verts: &[VH]) -> Result<FH, Error> {
        let fi: FH = (self.loop_start.len() as u32).into();
        if verts.len() < 3 {
            return Err(Error::DegenerateFace(fi));
        }
        if let Some(v) = verts.iter().find(|v| !v.is_valid(self)) {
            return Err(Error::OutOfRangeIndex(*v));
        }
        self.loop_start.push(self.loops.len() as u32);
        self.loop_total.push(verts.len() as u32);
        self.loops.extend(verts.iter().map(|v| v.index()));
        Ok(fi)
    }

    pub fn add_tri_face(&mut self, v0: VH, v1: VH, v2: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2])
    }

    pub fn add_quad_face(&mut self, v0: VH, v1: VH, v2: VH, v3: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2, v3])
    }
}
