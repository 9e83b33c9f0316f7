//! Request and reply shapes of the puzzle backend.

use polyview_base::{Error as BaseError, Grid, Piece, Puzzle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::mesh::MeshBlob;
use crate::{BackendError, Result};

/// Partitioning strategy, sent with the backend's own labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionMode {
    #[serde(rename = "Fast (original)")]
    Fast,
    #[serde(rename = "Force minimum")]
    ForceMinimum,
    #[default]
    #[serde(rename = "Balanced")]
    Balanced,
    #[serde(rename = "Smart")]
    Smart,
}

impl PartitionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::ForceMinimum => "force-minimum",
            Self::Balanced => "balanced",
            Self::Smart => "smart",
        }
    }
}

impl std::fmt::Display for PartitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionMode {
    type Err = BaseError;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "fast" | "fast-(original)" => Ok(Self::Fast),
            "force-minimum" | "force-min" => Ok(Self::ForceMinimum),
            "balanced" => Ok(Self::Balanced),
            "smart" => Ok(Self::Smart),
            other => Err(BaseError::InvalidParameter(format!(
                "unknown partition mode '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateParams {
    #[serde(rename = "M")]
    pub rows: usize,
    #[serde(rename = "N")]
    pub cols: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub border_prob: f64,
    pub air_prob: f64,
    pub mode: PartitionMode,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 6,
            min_size: 2,
            max_size: 4,
            border_prob: 0.0,
            air_prob: 0.0,
            mode: PartitionMode::Balanced,
        }
    }
}

impl GenerateParams {
    pub fn validate(&self) -> polyview_base::Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(BaseError::InvalidParameter(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.min_size == 0 || self.min_size > self.max_size {
            return Err(BaseError::InvalidParameter(format!(
                "piece size range {}..={} is empty",
                self.min_size, self.max_size
            )));
        }
        for (name, value) in [("border_prob", self.border_prob), ("air_prob", self.air_prob)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(BaseError::InvalidParameter(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveParams {
    pub max_solutions: usize,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self { max_solutions: 10 }
    }
}

pub const MESH_PARAM_NAMES: [&str; 7] = [
    "cube_size",
    "height",
    "gap_mm",
    "tolerance_mm",
    "border",
    "base_thickness",
    "wall_height",
];

/// Mesh generation parameters. The same set drives preview and export.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    pub cube_size: f64,
    pub height: f64,
    pub gap_mm: f64,
    pub tolerance_mm: f64,
    pub border: f64,
    pub base_thickness: f64,
    pub wall_height: f64,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            cube_size: 10.0,
            height: 2.0,
            gap_mm: 5.0,
            tolerance_mm: 0.3,
            border: 5.0,
            base_thickness: 1.0,
            wall_height: 2.0,
        }
    }
}

impl MeshParams {
    pub fn get(&self, name: &str) -> Option<f64> {
        Some(match name {
            "cube_size" => self.cube_size,
            "height" => self.height,
            "gap_mm" => self.gap_mm,
            "tolerance_mm" => self.tolerance_mm,
            "border" => self.border,
            "base_thickness" => self.base_thickness,
            "wall_height" => self.wall_height,
            _ => return None,
        })
    }

    /// Updates one field by name; the whole set is validated before it is kept.
    pub fn set(&mut self, name: &str, value: f64) -> polyview_base::Result<()> {
        let mut next = *self;
        let Some(slot) = next.slot_mut(name) else {
            return Err(BaseError::InvalidParameter(format!(
                "unknown mesh parameter '{name}', expected one of {}",
                MESH_PARAM_NAMES.join(", ")
            )));
        };
        *slot = value;
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> polyview_base::Result<()> {
        let fields = [
            ("cube_size", self.cube_size),
            ("height", self.height),
            ("gap_mm", self.gap_mm),
            ("tolerance_mm", self.tolerance_mm),
            ("border", self.border),
            ("base_thickness", self.base_thickness),
            ("wall_height", self.wall_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(BaseError::InvalidParameter(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.cube_size <= 0.0 || self.height <= 0.0 {
            return Err(BaseError::InvalidParameter(
                "cube_size and height must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        Some(match name {
            "cube_size" => &mut self.cube_size,
            "height" => &mut self.height,
            "gap_mm" => &mut self.gap_mm,
            "tolerance_mm" => &mut self.tolerance_mm,
            "border" => &mut self.border,
            "base_thickness" => &mut self.base_thickness,
            "wall_height" => &mut self.wall_height,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedPuzzle {
    pub puzzle: Puzzle,
    pub piece_count: usize,
}

#[derive(Deserialize)]
struct GenerateReply {
    grid: Grid,
    pieces: Vec<Piece>,
    #[serde(default)]
    piece_count: Option<usize>,
}

#[derive(Deserialize)]
struct SolveReply {
    solutions_count: usize,
}

/// Decodes a JSON reply carrying the `success` / `error` envelope.
pub fn decode_reply<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) if is_success(status) => return Err(BackendError::Decode(err.to_string())),
        Err(_) => return Err(status_error(status, body)),
    };

    match value.get("success").and_then(Value::as_bool) {
        Some(false) => Err(BackendError::Rejected(error_message(&value))),
        Some(true) if is_success(status) => {
            serde_json::from_value(value).map_err(|err| BackendError::Decode(err.to_string()))
        }
        _ if !is_success(status) => Err(status_error(status, body)),
        _ => Err(BackendError::Decode("reply has no success flag".to_string())),
    }
}

pub fn parse_generate(status: u16, body: &[u8]) -> Result<GeneratedPuzzle> {
    let reply: GenerateReply = decode_reply(status, body)?;
    let puzzle = Puzzle::new(reply.grid, reply.pieces)?;
    let piece_count = reply.piece_count.unwrap_or_else(|| puzzle.piece_count());
    Ok(GeneratedPuzzle {
        puzzle,
        piece_count,
    })
}

pub fn parse_solve(status: u16, body: &[u8]) -> Result<usize> {
    let reply: SolveReply = decode_reply(status, body)?;
    Ok(reply.solutions_count)
}

/// Mesh replies are raw bytes on success and a JSON envelope on failure.
pub fn decode_mesh_reply(status: u16, body: Vec<u8>) -> Result<MeshBlob> {
    if is_success(status) {
        return Ok(MeshBlob::new(body));
    }
    match serde_json::from_slice::<Value>(&body) {
        Ok(value) if value.get("error").is_some() => {
            Err(BackendError::Rejected(error_message(&value)))
        }
        _ => Err(status_error(status, &body)),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn error_message(value: &Value) -> String {
    match value.get("error") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "unknown error".to_string(),
    }
}

fn status_error(status: u16, body: &[u8]) -> BackendError {
    BackendError::Status {
        status,
        message: String::from_utf8_lossy(body).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_params_use_backend_field_names() {
        let value = serde_json::to_value(GenerateParams::default()).unwrap();
        assert_eq!(value["M"], 6);
        assert_eq!(value["N"], 6);
        assert_eq!(value["mode"], "Balanced");
        assert!(value.get("rows").is_none());
    }

    #[test]
    fn partition_mode_parses_cli_names() {
        assert_eq!("force-minimum".parse::<PartitionMode>().unwrap(), PartitionMode::ForceMinimum);
        assert_eq!("Fast (original)".parse::<PartitionMode>().unwrap(), PartitionMode::Fast);
        assert!("random".parse::<PartitionMode>().is_err());
    }

    #[test]
    fn generate_params_are_validated() {
        let mut params = GenerateParams::default();
        assert!(params.validate().is_ok());
        params.min_size = 5;
        assert!(params.validate().is_err());
        params.min_size = 2;
        params.air_prob = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejected_mesh_param_keeps_previous_value() {
        let mut params = MeshParams::default();
        params.set("gap_mm", 2.5).unwrap();
        assert_eq!(params.gap_mm, 2.5);
        assert!(params.set("cube_size", 0.0).is_err());
        assert_eq!(params.cube_size, 10.0);
        assert!(params.set("depth", 1.0).is_err());
    }

    #[test]
    fn failure_envelope_is_rejected_verbatim() {
        let body = br#"{"success": false, "error": "No puzzle generated"}"#;
        match parse_solve(400, body) {
            Err(BackendError::Rejected(message)) => assert_eq!(message, "No puzzle generated"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_json_error_keeps_status() {
        match parse_solve(502, b"Bad Gateway") {
            Err(BackendError::Status { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mesh_reply_passes_bytes_through() {
        let blob = decode_mesh_reply(200, vec![1, 2, 3]).unwrap();
        assert_eq!(blob.as_bytes(), &[1, 2, 3]);
        assert!(matches!(
            decode_mesh_reply(400, br#"{"success": false, "error": "bad"}"#.to_vec()),
            Err(BackendError::Rejected(_))
        ));
    }
}
