/*!
Catmull-Clark subdivision of polygon meshes in a flat array encoding.

# Overview

+ A mesh is four flat arrays: vertex positions (3 floats per vertex), a
  `loops` array holding one vertex index per face corner, and a
  `loop_start`/`loop_total` pair per face describing that face's slice of
  `loops`. This is the encoding hosts like Blender hand out, so mesh data can
  flow in and out without reshaping. All indices at this boundary are 0-based.

+ [`subdivide`] performs one Catmull-Clark subdivision step over the raw
  arrays and returns the refined mesh in the same shape, so repeated calls
  give multi-level subdivision. [`PolyMesh`] is the owned form of the same
  encoding, with [`PolyMesh::subdivide_catmull_clark`] and
  [`PolyMesh::subdivide_catmull_clark_n`] as the method equivalents.

+ The encoding stores no edges and no neighborhood records. Each call derives
  them by walking the face loops: an [`Adjacency`] maps every unordered vertex
  pair to an edge record with its adjacent faces, and gives every vertex its
  incident edges and faces in a stable order. Edges and vertices are
  classified as interior or boundary, and the averaging rules follow that
  split: interior vertices use the valence-n Catmull-Clark rule, boundary
  vertices are smoothed along the boundary with the crease weights.

+ Malformed input is rejected, never repaired: out of range indices,
  degenerate faces, non-manifold edges, singular vertices and irregular
  boundary vertices all abort the call with an [`Error`] and no output.
*/

mod check;
mod element;
mod error;
mod macros;
mod mesh;
mod primitive;
mod subdiv;
mod topol;

pub use element::{EH, FH, Handle, VH};
pub use error::Error;
pub use mesh::PolyMesh;
pub use subdiv::subdivide;
pub use topol::{Adjacency, Edge, VertexKind};
