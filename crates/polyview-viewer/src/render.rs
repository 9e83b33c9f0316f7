//! Software rendition of the scene: triangles painted far to near.

use polyview_paint::{Canvas, Color, DrawList, Fill, Point2, Rect, pos2};

use crate::camera::{ViewerCameraState, Viewport};
use crate::math::Vec3;
use crate::scene::{Lighting, ViewerScene};

struct ProjectedTriangle {
    points: [Point2; 3],
    depth: f64,
    color: Color,
}

pub fn render_frame(scene: &ViewerScene, camera: &ViewerCameraState, viewport: Viewport) -> DrawList {
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    let mut list = DrawList::new(width, height);
    list.fill_rect(
        Rect::from_points(pos2(0.0, 0.0), pos2(width, height)),
        0.0,
        Fill::Solid(scene.background),
    );

    let mut triangles = Vec::new();
    for mesh in scene.group() {
        for [a, b, c] in mesh.triangles() {
            let (Some((pa, da)), Some((pb, db)), Some((pc, dc))) = (
                camera.project(a, viewport),
                camera.project(b, viewport),
                camera.project(c, viewport),
            ) else {
                continue;
            };
            let normal = (b - a).cross(c - a).normalized();
            if normal == Vec3::ZERO {
                continue;
            }
            triangles.push(ProjectedTriangle {
                points: [pa, pb, pc],
                depth: (da + db + dc) / 3.0,
                color: lit_color(scene.material, &scene.lighting, normal, camera.position - a),
            });
        }
    }

    triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    for triangle in triangles {
        list.fill_polygon(triangle.points.to_vec(), Fill::Solid(triangle.color));
    }
    list
}

// Lambert term on the side facing the viewer.
fn lit_color(base: Color, lighting: &Lighting, normal: Vec3, to_eye: Vec3) -> Color {
    let normal = if normal.dot(to_eye) < 0.0 { -normal } else { normal };
    let diffuse = normal.dot(lighting.direction.normalized()).max(0.0);
    base.scaled((lighting.ambient + lighting.directional * diffuse) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::bounds_of;
    use crate::mesh::ViewerMesh;
    use polyview_paint::Shape;

    fn quad(z: f64) -> ViewerMesh {
        let positions = vec![
            Vec3::new(-10.0, -10.0, z),
            Vec3::new(10.0, -10.0, z),
            Vec3::new(10.0, 10.0, z),
            Vec3::new(-10.0, 10.0, z),
        ];
        ViewerMesh {
            bounds: bounds_of(positions.iter().copied()),
            positions,
            tri_faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn empty_scene_is_background_only() {
        let list = render_frame(
            &ViewerScene::default(),
            &ViewerCameraState::default(),
            Viewport::new(64, 48),
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn triangles_are_painted_far_to_near() {
        let mut scene = ViewerScene::default();
        scene.replace_group(quad(0.0));
        let camera = ViewerCameraState {
            position: Vec3::new(0.0, 0.0, 100.0),
            ..ViewerCameraState::default()
        };
        let list = render_frame(&scene, &camera, Viewport::new(200, 200));
        assert_eq!(list.len(), 3);
        assert!(list.shapes()[1..].iter().all(|shape| matches!(shape, Shape::Polygon { .. })));
    }

    #[test]
    fn lit_faces_stay_within_material_range() {
        let lighting = Lighting::default();
        let facing = lit_color(
            ViewerScene::default().material,
            &lighting,
            Vec3::new(1.0, 1.0, 1.0).normalized(),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let away = lit_color(
            ViewerScene::default().material,
            &lighting,
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
        );
        assert!(facing.r > away.r);
        assert_eq!(away, ViewerScene::default().material.scaled(lighting.ambient as f32));
    }
}
