use anyhow::{Context, Result, anyhow, bail};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use truck_meshalgo::prelude::*;
use truck_polymesh::PolygonMesh;
use truck_polymesh::stl::{self, StlType};

pub const EXPORT_FILE_NAME: &str = "puzzle_project.stl";

/// Opaque STL payload returned by the mesh backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshBlob {
    bytes: Vec<u8>,
}

impl MeshBlob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decodes ASCII or binary STL, merging coincident vertices and adding normals.
pub fn decode_stl(blob: &MeshBlob) -> Result<PolygonMesh> {
    if blob.is_empty() {
        bail!("mesh payload is empty");
    }
    let mut mesh = stl::read(Cursor::new(blob.as_bytes()), StlType::Automatic)
        .map_err(|err| anyhow!("decode STL payload: {err}"))?;
    if mesh.positions().is_empty() {
        bail!("STL payload contains no triangles");
    }
    mesh.add_naive_normals(true);
    mesh.put_together_same_attrs(truck_base::tolerance::TOLERANCE);
    mesh.remove_unused_attrs();
    Ok(mesh)
}

/// Writes the payload, forcing an `.stl` extension. Returns the written path.
pub fn save_mesh(blob: &MeshBlob, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = stl_path(path.as_ref());
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    std::fs::write(&path, blob.as_bytes())
        .with_context(|| format!("write STL file {}", path.display()))?;
    Ok(path)
}

fn stl_path(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return PathBuf::from(EXPORT_FILE_NAME);
    }
    let is_stl = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"));
    if is_stl {
        path.to_path_buf()
    } else {
        path.with_extension("stl")
    }
}
