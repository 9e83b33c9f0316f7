use thiserror::Error;

pub mod camera;
pub mod controller;
pub mod debounce;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;

pub use camera::{ViewerCameraState, Viewport};
pub use controller::{ViewerPhase, ViewerSyncController};
pub use debounce::{DEBOUNCE_WINDOW, Debouncer};
pub use math::{Bounds3, Vec3};
pub use mesh::ViewerMesh;
pub use render::render_frame;
pub use scene::{Lighting, ViewerScene};

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("3D viewer is not initialised")]
    NotMounted,
    #[error("could not load mesh into viewer: {0}")]
    Geometry(String),
    #[error(transparent)]
    Backend(#[from] polyview_io::BackendError),
    #[error("mesh export failed: {0}")]
    Export(String),
    #[error("refresh superseded by a newer request")]
    Superseded,
    #[error(transparent)]
    Invalid(#[from] polyview_base::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
