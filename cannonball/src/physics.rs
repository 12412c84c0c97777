//! Cannonball motion: a single point mass under constant downward
//! acceleration, relaunched from the cannon whenever it leaves the bounds.

use glam::Vec3;

/// Downward acceleration applied to the ball's vertical velocity
pub const GRAVITY: f32 = -1.0;

/// Default half extents of the bounding volume
pub const DEFAULT_HALF_EXTENTS: Vec3 = Vec3::new(1000.0, 500.0, 1000.0);

/// Launch parameters controlled from the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cannon {
    pub direction: Vec3,
    pub position: Vec3,
}

impl Cannon {
    pub fn new(direction: Vec3, position: Vec3) -> Self {
        Self { direction, position }
    }
}

impl Default for Cannon {
    fn default() -> Self {
        Self::new(Vec3::new(3.0, 1.0, -4.0), Vec3::ZERO)
    }
}

/// Axis-aligned box centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub half_extents: Vec3,
}

impl Bounds {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    /// True once any coordinate strictly exceeds its half extent
    pub fn is_outside(&self, point: Vec3) -> bool {
        point.y.abs() > self.half_extents.y
            || point.x.abs() > self.half_extents.x
            || point.z.abs() > self.half_extents.z
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_EXTENTS)
    }
}

/// The ball in flight
#[derive(Debug, Clone)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub trail: Vec<Vec3>,
    pub trail_max_length: usize,
}

impl Ball {
    pub fn launch(cannon: &Cannon) -> Self {
        Self {
            position: cannon.position,
            velocity: cannon.direction,
            trail: Vec::new(),
            trail_max_length: 240,
        }
    }

    /// Put the ball back in the cannon, keeping the same ball
    pub fn reset(&mut self, cannon: &Cannon) {
        self.velocity = cannon.direction;
        self.position = cannon.position;
        self.trail.clear();
    }

    pub fn update_trail(&mut self) {
        if self.trail_max_length == 0 {
            return;
        }
        self.trail.push(self.position);
        if self.trail.len() > self.trail_max_length {
            self.trail.remove(0);
        }
    }
}

/// What happened to the ball during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Flying,
    Reset,
}

/// Ball state plus the constants it moves under
pub struct Simulation {
    pub ball: Ball,
    pub bounds: Bounds,
    pub gravity: f32,
    pub elapsed_time: f32,
    pub resets: u32,
    pub record_trail: bool,
}

impl Simulation {
    pub fn new(cannon: &Cannon) -> Self {
        Self {
            ball: Ball::launch(cannon),
            bounds: Bounds::default(),
            gravity: GRAVITY,
            elapsed_time: 0.0,
            resets: 0,
            record_trail: true,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_trail_length(mut self, length: usize) -> Self {
        self.ball.trail_max_length = length;
        self
    }

    /// Start or stop recording the trail; stopping drops the points kept so far
    pub fn set_trail_recording(&mut self, enabled: bool) {
        self.record_trail = enabled;
        if !enabled {
            self.ball.trail.clear();
        }
    }

    /// Advance the ball by one frame.
    ///
    /// Gravity is scaled by `dt`, but the displacement adds the raw velocity,
    /// so horizontal speed is per frame rather than per second.
    pub fn step(&mut self, dt: f32, cannon: &Cannon) -> Motion {
        self.elapsed_time += dt;

        if self.bounds.is_outside(self.ball.position) {
            return self.relaunch(cannon);
        }

        self.ball.velocity.y += dt * self.gravity;
        self.ball.position += self.ball.velocity;

        if self.bounds.is_outside(self.ball.position) {
            return self.relaunch(cannon);
        }

        if self.record_trail {
            self.ball.update_trail();
        }
        Motion::Flying
    }

    /// Reset the ball from the cannon's current parameters
    pub fn relaunch(&mut self, cannon: &Cannon) -> Motion {
        self.ball.reset(cannon);
        self.resets += 1;
        log::debug!(
            "ball relaunched from {:?} with velocity {:?} (reset #{})",
            cannon.position,
            cannon.direction,
            self.resets
        );
        Motion::Reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_gravity_only_changes_vertical_velocity() {
        let cannon = Cannon::default();
        let mut sim = Simulation::new(&cannon);
        sim.ball.velocity = Vec3::new(2.5, -7.0, 0.25);
        sim.ball.position = Vec3::new(10.0, 20.0, 30.0);

        let dt = 0.033;
        sim.step(dt, &cannon);

        assert_eq!(sim.ball.velocity.x, 2.5);
        assert_eq!(sim.ball.velocity.y, -7.0 + dt * GRAVITY);
        assert_eq!(sim.ball.velocity.z, 0.25);
    }

    #[test]
    fn test_position_advances_by_raw_velocity() {
        let cannon = Cannon::default();
        let mut sim = Simulation::new(&cannon);
        sim.ball.velocity = Vec3::new(-4.0, 3.0, 9.0);
        sim.ball.position = Vec3::new(1.0, 2.0, 3.0);

        sim.step(0.5, &cannon);

        let v = sim.ball.velocity;
        assert_eq!(sim.ball.position.x, 1.0 + v.x);
        assert_eq!(sim.ball.position.y, 2.0 + v.y);
        assert_eq!(sim.ball.position.z, 3.0 + v.z);
    }

    #[test]
    fn test_first_frame_from_default_cannon() {
        let cannon = Cannon::new(Vec3::new(3.0, 1.0, -4.0), Vec3::ZERO);
        let mut sim = Simulation::new(&cannon);

        let motion = sim.step(0.016, &cannon);

        assert_eq!(motion, Motion::Flying);
        assert!(approx(sim.ball.velocity, Vec3::new(3.0, 0.984, -4.0)));
        assert!(approx(sim.ball.position, Vec3::new(3.0, 0.984, -4.0)));
    }

    #[test]
    fn test_out_of_bounds_resets_from_cannon() {
        let cannon = Cannon::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let mut sim = Simulation::new(&cannon);
        sim.ball.position = Vec3::new(0.0, 501.0, 0.0);
        sim.ball.velocity = Vec3::ZERO;

        let motion = sim.step(0.016, &cannon);

        assert_eq!(motion, Motion::Reset);
        assert_eq!(sim.ball.position, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(sim.ball.velocity, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sim.resets, 1);
    }

    #[test]
    fn test_reset_ignores_prior_velocity() {
        let cannon = Cannon::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let outside = [
            Vec3::new(0.0, -600.0, 0.0),
            Vec3::new(1000.5, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1200.0),
        ];

        for position in outside {
            let mut sim = Simulation::new(&cannon);
            sim.ball.position = position;
            // Would carry the ball back inside if it were integrated first
            sim.ball.velocity = -position;

            assert_eq!(sim.step(0.016, &cannon), Motion::Reset);
            assert_eq!(sim.ball.position, cannon.position);
            assert_eq!(sim.ball.velocity, cannon.direction);
        }
    }

    #[test]
    fn test_leaving_bounds_during_step_resets() {
        let cannon = Cannon::new(Vec3::new(0.5, 0.0, 0.5), Vec3::new(-5.0, 0.0, 5.0));
        let mut sim = Simulation::new(&cannon);
        sim.ball.position = Vec3::new(999.0, 0.0, 0.0);
        sim.ball.velocity = Vec3::new(2.0, 0.0, 0.0);

        assert_eq!(sim.step(0.016, &cannon), Motion::Reset);
        assert_eq!(sim.ball.position, cannon.position);
        assert_eq!(sim.ball.velocity, cannon.direction);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let bounds = Bounds::default();
        assert!(!bounds.is_outside(Vec3::new(1000.0, 500.0, -1000.0)));
        assert!(bounds.is_outside(Vec3::new(0.0, -500.01, 0.0)));
        assert!(bounds.is_outside(Vec3::new(-1000.01, 0.0, 0.0)));
        assert!(bounds.is_outside(Vec3::new(0.0, 0.0, 1000.01)));
    }

    #[test]
    fn test_step_after_reset_is_fresh_launch() {
        let cannon = Cannon::new(Vec3::new(2.0, 5.0, -1.0), Vec3::new(-20.0, 0.0, 4.0));
        let mut sim = Simulation::new(&cannon);
        sim.ball.position = Vec3::new(0.0, 800.0, 0.0);
        sim.step(0.016, &cannon);

        let dt = 0.02;
        sim.step(dt, &cannon);

        let mut fresh = Simulation::new(&cannon);
        fresh.step(dt, &cannon);

        assert_eq!(sim.ball.velocity, fresh.ball.velocity);
        assert_eq!(sim.ball.position, fresh.ball.position);
        assert_eq!(sim.ball.velocity.y, 5.0 + dt * GRAVITY);
    }

    #[test]
    fn test_cannon_is_read_at_reset_time() {
        let launch = Cannon::default();
        let mut sim = Simulation::new(&launch);

        let moved = Cannon::new(Vec3::new(0.0, 4.0, 0.0), Vec3::new(50.0, -20.0, 10.0));
        sim.ball.position = Vec3::new(0.0, 0.0, 2000.0);
        sim.step(0.016, &moved);

        assert_eq!(sim.ball.position, moved.position);
        assert_eq!(sim.ball.velocity, moved.direction);
    }

    #[test]
    fn test_ball_eventually_falls_out_and_relaunches() {
        let cannon = Cannon::default();
        let mut sim = Simulation::new(&cannon);

        let mut frames = 0;
        while sim.step(0.016, &cannon) == Motion::Flying {
            frames += 1;
            assert!(frames < 10_000, "ball never left the bounds");
        }

        assert_eq!(sim.ball.position, cannon.position);
        assert!(sim.ball.trail.is_empty());
    }

    #[test]
    fn test_trail_is_bounded() {
        let cannon = Cannon::new(Vec3::new(0.1, 0.0, 0.0), Vec3::ZERO);
        let mut sim = Simulation::new(&cannon).with_trail_length(5);

        for _ in 0..20 {
            sim.step(0.001, &cannon);
        }

        assert_eq!(sim.ball.trail.len(), 5);
        assert_eq!(*sim.ball.trail.last().unwrap(), sim.ball.position);
    }

    #[test]
    fn test_trail_disabled() {
        let cannon = Cannon::default();
        let mut sim = Simulation::new(&cannon);
        sim.step(0.016, &cannon);
        sim.step(0.016, &cannon);
        assert_eq!(sim.ball.trail.len(), 2);

        sim.set_trail_recording(false);
        assert!(sim.ball.trail.is_empty());
        sim.step(0.016, &cannon);
        assert!(sim.ball.trail.is_empty());

        sim.set_trail_recording(true);
        sim.step(0.016, &cannon);
        assert_eq!(sim.ball.trail, vec![sim.ball.position]);
    }
}
