//! Control state edited by the slider panel and polled once per frame

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::physics::Cannon;

/// Vector component addressed by a slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    pub fn get(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Replace one component of `v`, leaving the others untouched
pub fn set_axis(v: Vec3, axis: Axis, value: f32) -> Vec3 {
    match axis {
        Axis::X => Vec3::new(value, v.y, v.z),
        Axis::Y => Vec3::new(v.x, value, v.z),
        Axis::Z => Vec3::new(v.x, v.y, value),
    }
}

/// Range and granularity of a single slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Clamp and round to the nearest step counted from `min`
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }
}

/// Per-axis slider ranges for one vector control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorRange {
    pub x: SliderRange,
    pub y: SliderRange,
    pub z: SliderRange,
}

impl VectorRange {
    pub const fn uniform(range: SliderRange) -> Self {
        Self {
            x: range,
            y: range,
            z: range,
        }
    }

    pub fn axis(&self, axis: Axis) -> SliderRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn clamp(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.x.clamp(v.x), self.y.clamp(v.y), self.z.clamp(v.z))
    }

    pub fn snap(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.x.snap(v.x), self.y.snap(v.y), self.z.snap(v.z))
    }
}

pub const CANNON_DIRECTION_RANGE: VectorRange =
    VectorRange::uniform(SliderRange::new(-10.0, 10.0, 0.1));

pub const CANNON_POSITION_RANGE: VectorRange = VectorRange {
    x: SliderRange::new(-200.0, 200.0, 1.0),
    y: SliderRange::new(-100.0, 100.0, 1.0),
    z: SliderRange::new(-50.0, 50.0, 1.0),
};

pub const LIGHT_DIRECTION_RANGE: VectorRange =
    VectorRange::uniform(SliderRange::new(-1.0, 1.0, 0.05));

pub const OBJECT_POSITION_RANGE: VectorRange =
    VectorRange::uniform(SliderRange::new(-500.0, 500.0, 1.0));

pub const OBJECT_ROTATION_RANGE: VectorRange =
    VectorRange::uniform(SliderRange::new(-PI, PI, 0.01));

pub const OBJECT_SCALE_RANGE: SliderRange = SliderRange::new(1.0, 100.0, 1.0);

/// Most static objects kept at once; the renderer sizes its instance buffer from this
pub const DEFAULT_MAX_OBJECTS: usize = 256;

/// A decorative box that never moves on its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticObject {
    pub position: Vec3,
    /// Euler angles applied in XYZ order, radians
    pub rotation: Vec3,
    pub scale: f32,
    pub color: [f32; 4],
}

impl StaticObject {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

impl Default for StaticObject {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 20.0,
            color: [0.55, 0.45, 0.85, 1.0],
        }
    }
}

/// Current values of every slider
#[derive(Debug, Clone)]
pub struct Controls {
    pub cannon: Cannon,
    pub light_direction: Vec3,
    pub objects: Vec<StaticObject>,
    pub max_objects: usize,
}

impl Controls {
    pub fn new(cannon: Cannon, light_direction: Vec3) -> Self {
        Self {
            cannon,
            light_direction,
            objects: Vec::new(),
            max_objects: DEFAULT_MAX_OBJECTS,
        }
    }

    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self.objects.truncate(max_objects);
        self
    }

    /// Replace the object list, dropping whatever does not fit
    pub fn set_objects(&mut self, mut objects: Vec<StaticObject>) {
        if objects.len() > self.max_objects {
            log::warn!(
                "Keeping {} of {} objects, the rest exceed the object limit",
                self.max_objects,
                objects.len()
            );
            objects.truncate(self.max_objects);
        }
        self.objects = objects;
    }

    pub fn set_cannon_direction(&mut self, axis: Axis, value: f32) {
        let value = CANNON_DIRECTION_RANGE.axis(axis).clamp(value);
        self.cannon.direction = set_axis(self.cannon.direction, axis, value);
    }

    pub fn set_cannon_position(&mut self, axis: Axis, value: f32) {
        let value = CANNON_POSITION_RANGE.axis(axis).clamp(value);
        self.cannon.position = set_axis(self.cannon.position, axis, value);
    }

    pub fn set_light_direction(&mut self, axis: Axis, value: f32) {
        let value = LIGHT_DIRECTION_RANGE.axis(axis).clamp(value);
        self.light_direction = set_axis(self.light_direction, axis, value);
    }

    /// Add up to `count` randomly placed boxes, stopping at `max_objects`
    pub fn scatter_objects<R: Rng>(&mut self, count: usize, rng: &mut R) {
        let room = self.max_objects.saturating_sub(self.objects.len());
        let added = count.min(room);
        if added < count {
            log::warn!(
                "Object limit {} reached, scattering {} of {} objects",
                self.max_objects,
                added,
                count
            );
        }

        for _ in 0..added {
            // Keep scattered values on the slider grid
            let position = OBJECT_POSITION_RANGE.snap(Vec3::new(
                rng.gen_range(-400.0..400.0),
                rng.gen_range(-450.0..100.0),
                rng.gen_range(-400.0..-50.0),
            ));
            let rotation = Vec3::new(
                rng.gen_range(-PI..PI),
                rng.gen_range(-PI..PI),
                rng.gen_range(-PI..PI),
            );
            let t: f32 = rng.gen();
            let color = [0.3 + 0.6 * t, 0.5, 0.9 - 0.5 * t, 1.0];

            self.objects.push(
                StaticObject::new(position)
                    .with_rotation(rotation)
                    .with_scale(OBJECT_SCALE_RANGE.snap(rng.gen_range(8.0..40.0)))
                    .with_color(color),
            );
        }
        log::info!("Scattered {} objects ({} total)", added, self.objects.len());
    }

    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(Cannon::default(), Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_set_axis_replaces_single_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(set_axis(v, Axis::X, 9.0), Vec3::new(9.0, 2.0, 3.0));
        assert_eq!(set_axis(v, Axis::Y, 9.0), Vec3::new(1.0, 9.0, 3.0));
        assert_eq!(set_axis(v, Axis::Z, 9.0), Vec3::new(1.0, 2.0, 9.0));
        for axis in Axis::ALL {
            assert_eq!(axis.get(set_axis(v, axis, -4.0)), -4.0);
        }
    }

    #[test]
    fn test_cannon_setters_clamp_to_slider_range() {
        let mut controls = Controls::default();

        controls.set_cannon_direction(Axis::Y, 25.0);
        assert_eq!(controls.cannon.direction, Vec3::new(3.0, 10.0, -4.0));

        controls.set_cannon_position(Axis::X, -500.0);
        controls.set_cannon_position(Axis::Z, 12.0);
        assert_eq!(controls.cannon.position, Vec3::new(-200.0, 0.0, 12.0));

        controls.set_light_direction(Axis::Z, -3.0);
        assert_eq!(controls.light_direction, Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_snap_rounds_to_step() {
        let range = SliderRange::new(-10.0, 10.0, 0.5);
        assert_eq!(range.snap(1.2), 1.0);
        assert_eq!(range.snap(1.3), 1.5);
        assert_eq!(range.snap(42.0), 10.0);
        assert_eq!(SliderRange::new(0.0, 1.0, 0.0).snap(0.37), 0.37);
    }

    #[test]
    fn test_vector_range_clamp() {
        let clamped = CANNON_POSITION_RANGE.clamp(Vec3::new(300.0, -300.0, 10.0));
        assert_eq!(clamped, Vec3::new(200.0, -100.0, 10.0));
    }

    #[test]
    fn test_scatter_and_clear_objects() {
        let mut controls = Controls::default();
        let mut rng = StdRng::seed_from_u64(7);

        controls.scatter_objects(12, &mut rng);
        assert_eq!(controls.objects.len(), 12);
        for object in &controls.objects {
            assert_eq!(OBJECT_POSITION_RANGE.clamp(object.position), object.position);
            assert!(object.scale >= OBJECT_SCALE_RANGE.min && object.scale <= OBJECT_SCALE_RANGE.max);
        }

        controls.clear_objects();
        assert!(controls.objects.is_empty());
    }

    #[test]
    fn test_scatter_stops_at_object_limit() {
        let mut controls = Controls::default().with_max_objects(20);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..3 {
            controls.scatter_objects(8, &mut rng);
            assert!(controls.objects.len() <= controls.max_objects);
        }
        assert_eq!(controls.objects.len(), 20);

        controls.scatter_objects(8, &mut rng);
        assert_eq!(controls.objects.len(), 20);
    }

    #[test]
    fn test_set_objects_truncates_to_limit() {
        let mut controls = Controls::default().with_max_objects(3);
        let objects: Vec<_> = (0..5)
            .map(|i| StaticObject::new(Vec3::new(i as f32, 0.0, 0.0)))
            .collect();

        controls.set_objects(objects);

        assert_eq!(controls.objects.len(), 3);
        assert_eq!(controls.objects[2].position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_static_object_defaults_fill_missing_fields() {
        let object: StaticObject = serde_json::from_str(r#"{ "position": [1.0, 2.0, 3.0] }"#).unwrap();
        assert_eq!(object.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(object.scale, StaticObject::default().scale);
    }
}
