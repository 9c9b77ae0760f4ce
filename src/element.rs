use crate::mesh::PolyMesh;
use std::fmt::{Debug, Display};

/**
 * All elements of the mesh implement this trait. They are identified by their
 * index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct VH {
    idx: u32,
}

/**
 * Edge handle. Edges are not part of the flat encoding; they are derived from
 * the face loops, so these handles refer into an
 * [`Adjacency`](crate::Adjacency) built from the mesh.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EH {
    idx: u32,
}

/**
 * Face handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FH {
    idx: u32,
}

impl Handle for VH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for VH {
    fn from(idx: u32) -> Self {
        VH { idx }
    }
}

impl From<&u32> for VH {
    fn from(idx: &u32) -> Self {
        VH { idx: *idx }
    }
}

impl Handle for EH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for EH {
    fn from(idx: u32) -> Self {
        EH { idx }
    }
}

impl From<&u32> for EH {
    fn from(idx: &u32) -> Self {
        EH { idx: *idx }
    }
}

impl Handle for FH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for FH {
    fn from(idx: u32) -> Self {
        FH { idx }
    }
}

impl From<&u32> for FH {
    fn from(idx: &u32) -> Self {
        FH { idx: *idx }
    }
}

impl Display for VH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VH({})", self.index())
    }
}

impl Display for EH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EH({})", self.index())
    }
}

impl Display for FH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FH({})", self.index())
    }
}

impl Debug for VH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VH({})", self.index())
    }
}

impl Debug for EH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EH({})", self.index())
    }
}

impl Debug for FH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FH({})", self.index())
    }
}

impl VH {
    /// Check if this vertex is valid for the `mesh`.
    ///
    /// The index has to be less than the number of vertices in the mesh.
    pub fn is_valid(self, mesh: &PolyMesh) -> bool {
        (self.idx as usize) < mesh.num_vertices()
    }
}

impl FH {
    /// Check if this face is valid for the `mesh`.
    ///
    /// The index has to be less than the number of faces in the mesh.
    pub fn is_valid(self, mesh: &PolyMesh) -> bool {
        (self.idx as usize) < mesh.num_faces()
    }

    /// The number of vertices in this face's loop.
    pub fn valence(self, mesh: &PolyMesh) -> usize {
        mesh.face_loop(self).len()
    }
}
