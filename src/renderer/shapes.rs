//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, with_alpha};
use crate::scene::{Color, DrawCommand, RenderList, Shadow};

/// Segments used for every circle
pub const CIRCLE_SEGMENTS: u32 = 48;

/// Number of concentric layers used to fake a shadow blur
const SHADOW_LAYERS: u32 = 4;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Soft shadow: stacked translucent disks growing out to `radius + blur / 2`
pub fn shadow(center: Vec2, radius: f32, shadow: &Shadow, segments: u32) -> Vec<Vertex> {
    let center = center + shadow.offset;
    let layer_alpha = shadow.color[3] / SHADOW_LAYERS as f32;
    let mut vertices = Vec::with_capacity((segments * 3 * SHADOW_LAYERS) as usize);

    for layer in 0..SHADOW_LAYERS {
        let spread = shadow.blur * 0.5 * (1.0 - layer as f32 / SHADOW_LAYERS as f32);
        vertices.extend(circle(
            center,
            radius + spread,
            with_alpha(shadow.color, layer_alpha),
            segments,
        ));
    }

    vertices
}

/// Tessellate a whole frame, back to front. `Clear` is handled by the render pass.
pub fn tessellate(list: &RenderList) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for command in &list.commands {
        match *command {
            DrawCommand::Clear { .. } => {}
            DrawCommand::Disk {
                center,
                radius,
                color,
                shadow: drop_shadow,
            } => {
                if let Some(s) = drop_shadow {
                    vertices.extend(shadow(center, radius, &s, CIRCLE_SEGMENTS));
                }
                vertices.extend(circle(center, radius, color, CIRCLE_SEGMENTS));
            }
            DrawCommand::Ring {
                center,
                radius,
                width,
                color,
            } => {
                let half = width * 0.5;
                vertices.extend(ring(
                    center,
                    (radius - half).max(0.0),
                    radius + half,
                    color,
                    CIRCLE_SEGMENTS,
                ));
            }
        }
    }

    vertices
}

/// Clear color of a frame (last `Clear` wins), if it has one
pub fn clear_color(list: &RenderList) -> Option<Color> {
    list.commands.iter().rev().find_map(|c| match c {
        DrawCommand::Clear { color } => Some(*color),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BACKGROUND;

    #[test]
    fn test_circle_vertices_on_rim() {
        let verts = circle(Vec2::new(10.0, 20.0), 5.0, [1.0; 4], 8);
        assert_eq!(verts.len(), 24);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 20.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position).distance(Vec2::new(10.0, 20.0));
                assert!((d - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_tessellate_counts() {
        let list = RenderList {
            size: Vec2::new(600.0, 300.0),
            commands: vec![
                DrawCommand::Clear { color: BACKGROUND },
                DrawCommand::Ring {
                    center: Vec2::ZERO,
                    radius: 100.0,
                    width: 4.0,
                    color: [0.0, 0.0, 0.0, 1.0],
                },
                DrawCommand::Disk {
                    center: Vec2::ZERO,
                    radius: 10.0,
                    color: [1.0; 4],
                    shadow: None,
                },
                DrawCommand::Disk {
                    center: Vec2::ZERO,
                    radius: 10.0,
                    color: [1.0; 4],
                    shadow: Some(Shadow::default()),
                },
            ],
        };
        let n = CIRCLE_SEGMENTS as usize;
        let expected = n * 6 + n * 3 + (n * 3 * SHADOW_LAYERS as usize + n * 3);
        assert_eq!(tessellate(&list).len(), expected);
        assert_eq!(clear_color(&list), Some(BACKGROUND));
    }

    #[test]
    fn test_shadow_drawn_under_disk() {
        let list = RenderList {
            size: Vec2::new(600.0, 300.0),
            commands: vec![DrawCommand::Disk {
                center: Vec2::ZERO,
                radius: 10.0,
                color: [1.0; 4],
                shadow: Some(Shadow::default()),
            }],
        };
        let verts = tessellate(&list);
        let first = verts.first().unwrap();
        let last = verts.last().unwrap();
        // Shadow layers first (offset, translucent), pebble last (opaque)
        assert_eq!(first.position, [5.0, 5.0]);
        assert!(first.color[3] < 1.0);
        assert_eq!(last.color, [1.0; 4]);
    }
}
