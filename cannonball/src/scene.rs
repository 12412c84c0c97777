//! Camera and light placement, built once per window from the config

use common::Camera3D;
use glam::Vec3;

use crate::config::SceneConfig;

/// Directional light plus a flat ambient term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector pointing from the scene toward the light
    pub direction: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: f32,
}

impl DirectionalLight {
    pub fn from_direction(direction: Vec3, intensity: f32, ambient: f32) -> Self {
        Self {
            direction: direction.try_normalize().unwrap_or(Vec3::Y),
            color: [1.0, 1.0, 1.0],
            intensity,
            ambient,
        }
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.try_normalize().unwrap_or(Vec3::Y);
    }
}

pub struct Scene {
    pub camera: Camera3D,
    pub light: DirectionalLight,
    pub clear_color: [f32; 4],
    pub ball_radius: f32,
    pub cannon_radius: f32,
    /// Height of the floor grid, the bottom face of the bounds
    pub floor_y: f32,
    /// Half width of the floor grid
    pub floor_extent: f32,
    pub show_grid: bool,
    pub show_trail: bool,
    home_camera: Camera3D,
}

impl Scene {
    pub fn new(config: &SceneConfig, aspect_ratio: f32) -> Self {
        let camera = Camera3D::looking_at(
            config.camera_position,
            config.camera_target,
            config.fov_degrees,
            aspect_ratio,
            config.near,
            config.far,
        );

        Self {
            home_camera: camera.clone(),
            camera,
            light: DirectionalLight::from_direction(
                config.light_direction,
                config.light_intensity,
                config.ambient_intensity,
            ),
            clear_color: config.clear_color,
            ball_radius: config.ball_radius,
            cannon_radius: config.cannon_radius,
            floor_y: -config.bounds.y,
            floor_extent: config.bounds.x.min(config.bounds.z),
            show_grid: true,
            show_trail: true,
        }
    }

    pub fn resize(&mut self, aspect_ratio: f32) {
        self.camera.update_aspect_ratio(aspect_ratio);
        self.home_camera.update_aspect_ratio(aspect_ratio);
    }

    /// Put the camera back where the config placed it
    pub fn reset_view(&mut self) {
        self.camera = self.home_camera.clone();
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_direction_is_normalized() {
        let light = DirectionalLight::from_direction(Vec3::new(150.0, 150.0, 150.0), 1.0, 0.1);
        assert!((light.direction.length() - 1.0).abs() < 1e-6);
        assert!((light.direction.x - light.direction.y).abs() < 1e-6);
    }

    #[test]
    fn test_zero_light_direction_points_up() {
        let mut light = DirectionalLight::from_direction(Vec3::ZERO, 1.0, 0.1);
        assert_eq!(light.direction, Vec3::Y);
        light.set_direction(Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(light.direction, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_scene_from_default_config() {
        let config = SceneConfig::default();
        let scene = Scene::new(&config, 16.0 / 9.0);

        assert!((scene.camera.position - config.camera_position).length() < 1e-3);
        assert!((scene.camera.fov - 80.0f32.to_radians()).abs() < 1e-6);
        assert_eq!(scene.floor_y, -500.0);
        assert_eq!(scene.floor_extent, 1000.0);
        assert_eq!(scene.ball_radius, 10.0);
        assert_eq!(scene.cannon_radius, 15.0);
    }

    #[test]
    fn test_reset_view_keeps_current_aspect() {
        let mut scene = Scene::new(&SceneConfig::default(), 1.0);
        scene.camera.orbit(0.7, 0.3);
        scene.camera.zoom(40.0);
        scene.resize(2.0);

        scene.reset_view();

        assert_eq!(scene.camera.aspect_ratio, 2.0);
        assert!((scene.camera.position - Vec3::new(0.0, 0.0, 150.0)).length() < 1e-3);
    }

    #[test]
    fn test_clear_color_defaults_to_white() {
        let scene = Scene::new(&SceneConfig::default(), 1.0);
        let color = scene.clear_color();
        assert_eq!((color.r, color.g, color.b, color.a), (1.0, 1.0, 1.0, 1.0));
    }
}
