use anyhow::{Result, bail};
use polyview_io::{MeshBlob, decode_stl};
use truck_polymesh::PolygonMesh;

use crate::math::{Bounds3, Vec3, bounds_of};

/// Triangle soup ready for display.
#[derive(Clone, Debug, Default)]
pub struct ViewerMesh {
    pub positions: Vec<Vec3>,
    pub tri_faces: Vec<[usize; 3]>,
    pub bounds: Option<Bounds3>,
}

impl ViewerMesh {
    pub fn from_mesh(mesh: &PolygonMesh) -> Self {
        let positions: Vec<Vec3> = mesh.positions().iter().copied().map(Vec3::from).collect();
        let bounds = bounds_of(positions.iter().copied());

        let mut tri_faces = Vec::new();
        tri_faces.extend(mesh.tri_faces().iter().map(|tri| [tri[0].pos, tri[1].pos, tri[2].pos]));
        for quad in mesh.quad_faces() {
            tri_faces.push([quad[0].pos, quad[1].pos, quad[2].pos]);
            tri_faces.push([quad[0].pos, quad[2].pos, quad[3].pos]);
        }
        for face in mesh.faces().other_faces() {
            if face.len() < 3 {
                continue;
            }
            for idx in 1..(face.len() - 1) {
                tri_faces.push([face[0].pos, face[idx].pos, face[idx + 1].pos]);
            }
        }

        Self {
            positions,
            tri_faces,
            bounds,
        }
    }

    /// Decodes an STL payload, centers it on the origin and turns it Y-up.
    pub fn from_blob(blob: &MeshBlob) -> Result<Self> {
        let mesh = Self::from_mesh(&decode_stl(blob)?).centered().z_up_to_y_up();
        if mesh.is_empty() {
            bail!("mesh has no triangles");
        }
        Ok(mesh)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.tri_faces.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.tri_faces.len()
    }

    pub fn center(&self) -> Option<Vec3> {
        self.bounds.map(|(min, max)| (min + max) * 0.5)
    }

    pub fn centered(self) -> Self {
        match self.center() {
            Some(center) => self.map_positions(|p| p - center),
            None => self,
        }
    }

    pub fn z_up_to_y_up(self) -> Self {
        self.map_positions(Vec3::z_up_to_y_up)
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.tri_faces.iter().filter_map(|tri| {
            Some([
                *self.positions.get(tri[0])?,
                *self.positions.get(tri[1])?,
                *self.positions.get(tri[2])?,
            ])
        })
    }

    fn map_positions(self, f: impl Fn(Vec3) -> Vec3) -> Self {
        let positions: Vec<Vec3> = self.positions.into_iter().map(f).collect();
        let bounds = bounds_of(positions.iter().copied());
        Self {
            positions,
            tri_faces: self.tri_faces,
            bounds,
        }
    }
}
