use crate::{element::FH, error::Error, mesh::PolyMesh, topol::Adjacency};

fn check_loops(mesh: &PolyMesh) -> Result<(), Error> {
    let total: usize = mesh.loop_total().iter().map(|&t| t as usize).sum();
    if total != mesh.num_loops() {
        return Err(Error::MismatchedArrayLengths(total, mesh.num_loops()));
    }
    for (i, (&start, &total)) in mesh
        .loop_start()
        .iter()
        .zip(mesh.loop_total().iter())
        .enumerate()
    {
        let f: FH = (i as u32).into();
        if total < 3 {
            return Err(Error::DegenerateFace(f));
        }
        if (start as usize) + (total as usize) > mesh.num_loops() {
            return Err(Error::InvalidLoopRange(f));
        }
    }
    Ok(())
}

impl PolyMesh {
    /// Check the structural invariants of the mesh.
    ///
    /// This verifies the flat encoding (loop totals account for the whole
    /// `loops` array, every face's loop range is a valid slice), and then
    /// rebuilds the adjacency, which surfaces out of range indices, degenerate
    /// faces, non-manifold edges, singular vertices and irregular boundary
    /// vertices. Returns the first error found.
    pub fn check(&self) -> Result<(), Error> {
        check_loops(self)?;
        Adjacency::build(self)?;
        Ok(())
    }

    /// Check whether the mesh is closed, i.e. every edge has exactly two
    /// incident faces. Fails if the adjacency cannot be built.
    pub fn is_closed(&self) -> Result<bool, Error> {
        Ok(Adjacency::build(self)?.is_closed())
    }
}
