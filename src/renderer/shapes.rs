//! Shape generation for 2D primitives
//!
//! Everything here works in viewport pixels (origin top-left, y down); the
//! pipeline maps to NDC on upload.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::Settings;
use crate::consts::{LANE_COUNT, OBSTACLE_HEIGHT, OBSTACLE_WIDTH};
use crate::platform::LightRig;
use crate::sim::{Bike, DayPhase, GameSession, Obstacle, ObstacleKind, TextureVariant};

/// Scale a color by the ambient light, keeping alpha
fn lit(color: [f32; 4], ambient: [f32; 3]) -> [f32; 4] {
    [
        color[0] * ambient[0],
        color[1] * ambient[1],
        color[2] * ambient[2],
        color[3],
    ]
}

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Generate vertices for an axis-aligned rectangle
pub fn rect(center: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    rotated_rect(center, size, 0.0, color)
}

/// Generate vertices for a rectangle rotated by `angle` radians about its center
pub fn rotated_rect(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = size / 2.0;
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));

    // Two triangles
    [0, 1, 2, 0, 2, 3]
        .iter()
        .map(|&i| Vertex::new(corners[i].x, corners[i].y, color))
        .collect()
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
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

fn road_colors(phase: DayPhase) -> ([f32; 4], [f32; 4]) {
    match phase {
        DayPhase::Day => (colors::ROAD_DAY, colors::VERGE_DAY),
        DayPhase::Night => (colors::ROAD_NIGHT, colors::VERGE_NIGHT),
    }
}

/// One background layer: road surface, verges and dashed lane marks
fn road_layer(
    center_y: f32,
    width: f32,
    height: f32,
    phase: DayPhase,
    alpha: f32,
    ambient: [f32; 3],
) -> Vec<Vertex> {
    let (road, verge) = road_colors(phase);
    let verge_w = (width * 0.03).max(4.0);
    let mut vertices = Vec::new();

    vertices.extend(rect(
        Vec2::new(width / 2.0, center_y),
        Vec2::new(width, height),
        with_alpha(lit(road, ambient), alpha),
    ));
    for x in [verge_w / 2.0, width - verge_w / 2.0] {
        vertices.extend(rect(
            Vec2::new(x, center_y),
            Vec2::new(verge_w, height),
            with_alpha(lit(verge, ambient), alpha),
        ));
    }

    // Dashes are anchored to the layer, so they scroll with it
    let dash_len = height / 12.0;
    let mark = with_alpha(lit(colors::LANE_MARK, ambient), alpha);
    for lane in 1..LANE_COUNT {
        let x = width * lane as f32 / LANE_COUNT as f32;
        for k in 0..6 {
            let y = center_y - height / 2.0 + dash_len * (2 * k) as f32 + dash_len;
            vertices.extend(rect(Vec2::new(x, y), Vec2::new(4.0, dash_len), mark));
        }
    }

    vertices
}

/// Bike body plus rider, leaning by `tilt`
pub fn bike_vertices(bike: &Bike, tilt: f32, ambient: [f32; 3]) -> Vec<Vertex> {
    let size = bike.bounds().half * 2.0;
    let body = match bike.texture {
        TextureVariant::Day => colors::BIKE_DAY,
        TextureVariant::Night => colors::BIKE_NIGHT,
    };

    let mut vertices = rotated_rect(bike.pos, Vec2::new(size.x * 0.4, size.y), tilt, lit(body, ambient));
    let rider_offset = Vec2::from_angle(tilt).rotate(Vec2::new(0.0, -size.y * 0.15));
    vertices.extend(rotated_rect(
        bike.pos + rider_offset,
        Vec2::new(size.x * 0.8, size.y * 0.3),
        tilt,
        lit(colors::RIDER, ambient),
    ));
    vertices
}

/// One obstacle; a glowing one throws a headlight pool ahead of it
pub fn obstacle_vertices(obstacle: &Obstacle, glowing: bool, ambient: [f32; 3]) -> Vec<Vertex> {
    let size = Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT);
    let mut vertices = Vec::new();

    if glowing {
        // Emissive, not darkened by ambient
        let glow = obstacle.pos + Vec2::new(0.0, size.y * 0.9);
        vertices.extend(circle(glow, size.x * 0.7, colors::HEADLIGHT, 16));
    }

    match obstacle.kind {
        ObstacleKind::Car => {
            vertices.extend(rect(obstacle.pos, size, lit(colors::CAR, ambient)));
            vertices.extend(rect(
                obstacle.pos + Vec2::new(0.0, size.y * 0.15),
                Vec2::new(size.x * 0.7, size.y * 0.25),
                lit(colors::CAR_WINDOW, ambient),
            ));
        }
        ObstacleKind::Hurdle => {
            vertices.extend(rect(obstacle.pos, size, lit(colors::HURDLE, ambient)));
            let stripe_h = size.y / 7.0;
            for k in [-2.0, 0.0, 2.0] {
                vertices.extend(rect(
                    obstacle.pos + Vec2::new(0.0, k * stripe_h),
                    Vec2::new(size.x, stripe_h),
                    lit(colors::HURDLE_STRIPE, ambient),
                ));
            }
        }
    }

    vertices
}

/// Build the whole frame: background, obstacles, bike
///
/// Ambient color and headlights come from the host's `LightRig`, so only
/// lights the host actually attached are drawn.
pub fn scene_vertices(session: &GameSession, settings: &Settings, rig: &LightRig) -> Vec<Vertex> {
    let viewport = session.viewport;
    let day_night = &session.day_night;
    let ambient = rig.ambient();
    let fade = day_night.fade_alpha();
    let height = session.background.height();

    let mut vertices = Vec::new();
    for center_y in session.background.layer_centers() {
        if fade < 1.0 {
            let previous = day_night.phase().toggled();
            vertices.extend(road_layer(center_y, viewport.width, height, previous, 1.0, ambient));
        }
        vertices.extend(road_layer(
            center_y,
            viewport.width,
            height,
            day_night.phase(),
            fade,
            ambient,
        ));
    }

    for obstacle in &session.obstacles {
        let glowing = obstacle.light.is_some_and(|l| rig.is_lit(l));
        vertices.extend(obstacle_vertices(obstacle, glowing, ambient));
    }

    let tilt = settings.effective_tilt(session.bike.tilt);
    vertices.extend(bike_vertices(&session.bike, tilt, ambient));

    vertices
}

/// Clear color behind the scene
pub fn sky_color(session: &GameSession) -> [f32; 4] {
    match session.day_night.phase() {
        DayPhase::Day => colors::SKY_DAY,
        DayPhase::Night => colors::SKY_NIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::platform::SceneHost;
    use crate::sim::{LightHandle, NIGHT_AMBIENT, Viewport};

    fn session() -> GameSession {
        GameSession::new(&Tuning::default(), Viewport::default(), 1)
    }

    fn car(light: Option<LightHandle>) -> Obstacle {
        Obstacle {
            id: 1,
            kind: ObstacleKind::Car,
            pos: Vec2::new(400.0, 200.0),
            fall_speed: 200.0,
            lane: Some(1),
            light,
        }
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|&x| x == 8.0 || x == 12.0));
    }

    #[test]
    fn test_rotated_rect_keeps_center() {
        let center = Vec2::new(50.0, 50.0);
        let v = rotated_rect(center, Vec2::new(10.0, 30.0), 0.3, [1.0; 4]);
        // Corners 0 and 2 are opposite
        let mid = (Vec2::from(v[0].position) + Vec2::from(v[2].position)) / 2.0;
        assert!((mid - center).length() < 1e-4);
    }

    #[test]
    fn test_scene_is_triangles() {
        let mut s = session();
        s.obstacles.push(car(None));
        let v = scene_vertices(&s, &Settings::default(), &LightRig::default());
        assert!(!v.is_empty());
        assert_eq!(v.len() % 3, 0);
    }

    #[test]
    fn test_reduced_motion_draws_upright_bike() {
        let mut s = session();
        s.bike.tilt = 0.2;
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let upright = bike_vertices(&s.bike, settings.effective_tilt(s.bike.tilt), [1.0; 3]);
        let xs: Vec<f32> = upright.iter().take(6).map(|v| v.position[0]).collect();
        let min = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert!((max - min - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_headlight_only_when_lit() {
        let dark = obstacle_vertices(&car(None), false, [1.0; 3]);
        let lit_car = obstacle_vertices(&car(Some(LightHandle(0))), true, [1.0; 3]);
        assert!(lit_car.len() > dark.len());
        assert!(lit_car.iter().any(|v| v.color == colors::HEADLIGHT));
        assert!(!dark.iter().any(|v| v.color == colors::HEADLIGHT));
    }

    #[test]
    fn test_ambient_darkens_but_headlight_does_not() {
        let v = obstacle_vertices(&car(Some(LightHandle(0))), true, NIGHT_AMBIENT);
        assert!(v.iter().any(|v| v.color == colors::HEADLIGHT));
        assert!(v.iter().any(|v| v.color[0] < colors::CAR[0]));
    }

    #[test]
    fn test_scene_glow_follows_attached_lights() {
        let mut s = session();
        s.obstacles.push(car(Some(LightHandle(3))));
        let mut rig = LightRig::default();
        fn has_glow(v: &[Vertex]) -> bool {
            v.iter().any(|v| v.color == colors::HEADLIGHT)
        }

        assert!(!has_glow(&scene_vertices(&s, &Settings::default(), &rig)));
        rig.attach_light(LightHandle(3));
        assert!(has_glow(&scene_vertices(&s, &Settings::default(), &rig)));
        rig.release_light(LightHandle(3));
        assert!(!has_glow(&scene_vertices(&s, &Settings::default(), &rig)));
    }

    #[test]
    fn test_scene_uses_rig_ambient() {
        let s = session();
        let mut rig = LightRig::default();
        let day = scene_vertices(&s, &Settings::default(), &rig);
        rig.set_ambient_light(NIGHT_AMBIENT);
        let night = scene_vertices(&s, &Settings::default(), &rig);
        // First vertex is the road surface
        assert!(night[0].color[0] < day[0].color[0]);
    }

    #[test]
    fn test_sky_follows_phase() {
        let mut s = session();
        assert_eq!(sky_color(&s), colors::SKY_DAY);
        s.day_night.toggle(0.0);
        assert_eq!(sky_color(&s), colors::SKY_NIGHT);
    }
}
