use thiserror::Error;

pub mod backend;
pub mod http;
pub mod mesh;
pub mod protocol;

pub use backend::{MeshSource, PuzzleBackend};
pub use http::{DEFAULT_BACKEND_URL, EXPORT_STL_PATH, FIND_SOLUTIONS_PATH, GENERATE_PATH, HttpBackend};
pub use mesh::{EXPORT_FILE_NAME, MeshBlob, decode_stl, save_mesh};
pub use protocol::{
    GenerateParams, GeneratedPuzzle, MESH_PARAM_NAMES, MeshParams, PartitionMode, SolveParams,
    decode_mesh_reply, decode_reply, parse_generate, parse_solve,
};

#[derive(Error, Debug)]
pub enum BackendError {
    /// `success: false` payload; the message is shown to the user as is.
    #[error("{0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed backend response: {0}")]
    Decode(String),
    #[error(transparent)]
    Invalid(#[from] polyview_base::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;
