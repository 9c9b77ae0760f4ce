use crate::element::{EH, FH, VH};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    // Flat input arrays.
    IncorrectNumberOfCoordinates(usize),
    MismatchedArrayLengths(usize, usize),
    InvalidLoopRange(FH),
    // Topology.
    OutOfRangeIndex(VH),
    DegenerateFace(FH),
    NonManifoldEdge(EH),
    /// A boundary vertex incident to a number of boundary edges other than
    /// 2. There is no agreed upon smoothing rule for such a vertex, so the
    /// input is rejected. The boundary edge count is included in the error.
    IrregularBoundaryVertex(VH, usize),
    /// A vertex with no incident edges or faces. Such a vertex cannot be
    /// repositioned by the subdivision rules.
    SingularVertex(VH),
}
