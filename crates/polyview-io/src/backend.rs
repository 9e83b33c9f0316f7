use std::future::Future;
use std::sync::Arc;

use crate::Result;
use crate::mesh::MeshBlob;
use crate::protocol::{GenerateParams, GeneratedPuzzle, MeshParams, SolveParams};

/// Puzzle generation and solving collaborator.
pub trait PuzzleBackend: Send + Sync + 'static {
    fn generate(&self, params: &GenerateParams) -> impl Future<Output = Result<GeneratedPuzzle>> + Send;

    /// Solves the backend's current puzzle and returns the number of solutions found.
    fn find_solutions(&self, params: &SolveParams) -> impl Future<Output = Result<usize>> + Send;
}

/// Mesh generation collaborator shared by preview refresh and manual export.
pub trait MeshSource: Send + Sync + 'static {
    fn build_mesh(&self, params: &MeshParams) -> impl Future<Output = Result<MeshBlob>> + Send;
}

impl<T: PuzzleBackend> PuzzleBackend for Arc<T> {
    fn generate(&self, params: &GenerateParams) -> impl Future<Output = Result<GeneratedPuzzle>> + Send {
        (**self).generate(params)
    }

    fn find_solutions(&self, params: &SolveParams) -> impl Future<Output = Result<usize>> + Send {
        (**self).find_solutions(params)
    }
}

impl<T: MeshSource> MeshSource for Arc<T> {
    fn build_mesh(&self, params: &MeshParams) -> impl Future<Output = Result<MeshBlob>> + Send {
        (**self).build_mesh(params)
    }
}
