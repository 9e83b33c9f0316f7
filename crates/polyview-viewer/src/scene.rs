use polyview_paint::Color;
use std::sync::Arc;

use crate::math::{Bounds3, Vec3, union_bounds};
use crate::mesh::ViewerMesh;

pub const MODEL_COLOR: Color = Color::from_u24(0x6699cc);
pub const VIEWER_BACKGROUND: Color = Color::from_u24(0xf5f7fa);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub direction: Vec3,
    pub directional: f64,
    /// Ambient contribution per channel, `0x66 / 0xff`.
    pub ambient: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, 1.0, 1.0),
            directional: 0.9,
            ambient: f64::from(0x66u8) / 255.0,
        }
    }
}

/// The displayed model group. Only ever mutated as a whole.
#[derive(Clone, Debug)]
pub struct ViewerScene {
    group: Vec<Arc<ViewerMesh>>,
    revision: u64,
    pub material: Color,
    pub background: Color,
    pub lighting: Lighting,
}

impl Default for ViewerScene {
    fn default() -> Self {
        Self {
            group: Vec::new(),
            revision: 0,
            material: MODEL_COLOR,
            background: VIEWER_BACKGROUND,
            lighting: Lighting::default(),
        }
    }
}

impl ViewerScene {
    pub fn group(&self) -> &[Arc<ViewerMesh>] {
        &self.group
    }

    pub fn has_model(&self) -> bool {
        !self.group.is_empty()
    }

    /// Number of completed swaps.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clears the group, then adds `mesh`.
    pub fn replace_group(&mut self, mesh: ViewerMesh) {
        self.group.clear();
        self.group.push(Arc::new(mesh));
        self.revision += 1;
    }

    pub fn bounds(&self) -> Option<Bounds3> {
        self.group
            .iter()
            .fold(None, |acc, mesh| union_bounds(acc, mesh.bounds))
    }
}
