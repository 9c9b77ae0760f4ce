use crate::{error::Error, mesh::PolyMesh};

impl PolyMesh {
    /// Makes a box with the following topology, spanning from the min point to
    /// the max point.
    ///
    ///  ```text
    ///       7-----------6
    ///      /|          /|
    ///     / |         / |
    ///    4-----------5  |
    ///    |  |        |  |
    ///    |  3--------|--2
    ///    | /         | /
    ///    |/          |/
    ///    0-----------1
    ///  ```
    pub fn quad_box(min: glam::Vec3, max: glam::Vec3) -> Result<Self, Error> {
        const BOX_POS: [(bool, bool, bool); 8] = [
            (false, false, false),
            (true, false, false),
            (true, true, false),
            (false, true, false),
            (false, false, true),
            (true, false, true),
            (true, true, true),
            (false, true, true),
        ];
        const BOX_IDX: [(u32, u32, u32, u32); 6] = [
            (0, 3, 2, 1),
            (0, 1, 5, 4),
            (1, 2, 6, 5),
            (2, 3, 7, 6),
            (3, 0, 4, 7),
            (4, 5, 6, 7),
        ];
        let mut qbox = Self::with_capacity(8, 6, 24);
        for (xf, yf, zf) in BOX_POS {
            qbox.add_vertex(glam::vec3(
                if xf { max.x } else { min.x },
                if yf { max.y } else { min.y },
                if zf { max.z } else { min.z },
            ));
        }
        for (a, b, c, d) in BOX_IDX {
            qbox.add_quad_face(a.into(), b.into(), c.into(), d.into())?;
        }
        Ok(qbox)
    }

    /// Create a mesh representing a box with quadrilateral faces, of size 1,
    /// spanning from the origin to (1, 1, 1).
    pub fn unit_box() -> Result<Self, Error> {
        Self::quad_box(glam::Vec3::splat(0.0), glam::Vec3::splat(1.0))
    }

    /// A single quadrilateral face in the z = 0 plane, spanning from the
    /// origin to (1, 1, 0). The smallest mesh with a boundary.
    pub fn unit_quad() -> Result<Self, Error> {
        let mut quad = Self::with_capacity(4, 1, 4);
        quad.add_vertex(glam::vec3(0.0, 0.0, 0.0));
        quad.add_vertex(glam::vec3(1.0, 0.0, 0.0));
        quad.add_vertex(glam::vec3(1.0, 1.0, 0.0));
        quad.add_vertex(glam::vec3(0.0, 1.0, 0.0));
        quad.add_quad_face(0.into(), 1.into(), 2.into(), 3.into())?;
        Ok(quad)
    }

    /// A planar grid of `nx` by `ny` unit quads in the z = 0 plane. The grid
    /// has both interior and boundary vertices, which makes it a convenient
    /// input for exercising the boundary rules.
    pub fn quad_grid(nx: u32, ny: u32) -> Result<Self, Error> {
        let mut grid = Self::with_capacity(
            ((nx + 1) * (ny + 1)) as usize,
            (nx * ny) as usize,
            (nx * ny * 4) as usize,
        );
        for j in 0..=ny {
            for i in 0..=nx {
                grid.add_vertex(glam::vec3(i as f32, j as f32, 0.0));
            }
        }
        let row = nx + 1;
        for j in 0..ny {
            for i in 0..nx {
                let a = j * row + i;
                grid.add_quad_face(
                    a.into(),
                    (a + 1).into(),
                    (a + 1 + row).into(),
                    (a + row).into(),
                )?;
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod test {
    use crate::mesh::PolyMesh;

    #[test]
    fn t_unit_box() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        assert_eq!(8, mesh.num_vertices());
        assert_eq!(6, mesh.num_faces());
        assert_eq!(24, mesh.num_loops());
    }

    #[test]
    fn t_quad_grid() {
        let mesh = PolyMesh::quad_grid(3, 2).expect("Cannot create grid");
        assert_eq!(12, mesh.num_vertices());
        assert_eq!(6, mesh.num_faces());
        assert_eq!(24, mesh.num_loops());
    }
}
