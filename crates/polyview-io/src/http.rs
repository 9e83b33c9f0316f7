use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::{MeshSource, PuzzleBackend};
use crate::mesh::MeshBlob;
use crate::protocol::{
    GenerateParams, GeneratedPuzzle, MeshParams, SolveParams, decode_mesh_reply, parse_generate,
    parse_solve,
};
use crate::{BackendError, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const GENERATE_PATH: &str = "/api/generate";
pub const FIND_SOLUTIONS_PATH: &str = "/api/find_solutions";
pub const EXPORT_STL_PATH: &str = "/api/export_stl";

/// JSON-over-HTTP client for the puzzle and mesh backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<(u16, Vec<u8>)> {
        let url = self.endpoint(path);
        debug!(%url, "backend request");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| BackendError::Transport(err.to_string()))?;
        debug!(%url, status, len = bytes.len(), "backend reply");
        Ok((status, bytes.to_vec()))
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl PuzzleBackend for HttpBackend {
    async fn generate(&self, params: &GenerateParams) -> Result<GeneratedPuzzle> {
        params.validate()?;
        let (status, body) = self.post(GENERATE_PATH, params).await?;
        let generated = parse_generate(status, &body).inspect_err(|err| {
            warn!(error = %err, "generate failed");
        })?;
        info!(
            rows = generated.puzzle.grid().rows(),
            cols = generated.puzzle.grid().cols(),
            pieces = generated.piece_count,
            "puzzle generated"
        );
        Ok(generated)
    }

    async fn find_solutions(&self, params: &SolveParams) -> Result<usize> {
        let (status, body) = self.post(FIND_SOLUTIONS_PATH, params).await?;
        let count = parse_solve(status, &body).inspect_err(|err| {
            warn!(error = %err, "find_solutions failed");
        })?;
        info!(solutions = count, "solutions found");
        Ok(count)
    }
}

impl MeshSource for HttpBackend {
    async fn build_mesh(&self, params: &MeshParams) -> Result<MeshBlob> {
        params.validate()?;
        let (status, body) = self.post(EXPORT_STL_PATH, params).await?;
        let blob = decode_mesh_reply(status, body)?;
        info!(bytes = blob.len(), "mesh received");
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slash() {
        let backend = HttpBackend::new("http://localhost:5000/");
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(backend.endpoint(GENERATE_PATH), "http://localhost:5000/api/generate");
    }
}
