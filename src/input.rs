//! Input sources that aim rays at the stage.
//!
//! A pointer turns a screen position into a ray through a top-down camera.
//! A hand controller casts a ray straight ahead of its own orientation.
//! Both only produce rays and remember which keys they pressed, so each
//! source can release exactly its own keys.

use crate::scene::{KeyRef, Quat, Ray, Stage, Vec3};

/// Keys pressed by one input source and not yet released by it.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: Vec<KeyRef>,
}

impl HeldKeys {
    /// Remembers a key. Holding the same key twice is recorded once.
    pub fn hold(&mut self, key: KeyRef) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Forgets every held key and returns them in press order.
    pub fn take_all(&mut self) -> Vec<KeyRef> {
        std::mem::take(&mut self.keys)
    }

    pub fn contains(&self, key: KeyRef) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Orthographic camera looking straight down at the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanCamera {
    /// World point under the center of the view (y is ignored).
    pub center: Vec3,
    /// Half the visible extent along x, in meters.
    pub half_width: f64,
    /// Half the visible extent along z, in meters.
    pub half_depth: f64,
    /// Height rays start from.
    pub height: f64,
}

impl PlanCamera {
    /// A camera framing the whole stage, with a small margin.
    ///
    /// Falls back to a 1 m square around the origin for an empty stage.
    pub fn framing(stage: &Stage) -> Self {
        const MARGIN: f64 = 0.01;
        match stage.bounds() {
            Some((min, max)) => Self {
                center: Vec3::new((min.x + max.x) / 2.0, 0.0, (min.z + max.z) / 2.0),
                half_width: (max.x - min.x) / 2.0 + MARGIN,
                half_depth: (max.z - min.z) / 2.0 + MARGIN,
                height: max.y + 1.0,
            },
            None => Self {
                center: Vec3::ZERO,
                half_width: 0.5,
                half_depth: 0.5,
                height: 1.0,
            },
        }
    }

    /// Ray through normalized device coordinates.
    ///
    /// `ndc_x` runs -1 (left) to 1 (right); `ndc_y` runs -1 (bottom, nearest
    /// the player) to 1 (top, farthest away).
    pub fn ray_through(&self, ndc_x: f64, ndc_y: f64) -> Ray {
        let origin = Vec3::new(
            self.center.x + ndc_x * self.half_width,
            self.height,
            self.center.z - ndc_y * self.half_depth,
        );
        Ray::new(origin, Vec3::new(0.0, -1.0, 0.0))
    }

    /// Inverse of `ray_through` for a world point: its `(ndc_x, ndc_y)`.
    pub fn project(&self, point: Vec3) -> (f64, f64) {
        (
            (point.x - self.center.x) / self.half_width,
            (self.center.z - point.z) / self.half_depth,
        )
    }
}

/// Mouse or touch pointer.
///
/// Every key the pointer presses stays down until the pointer is lifted,
/// which releases them all together.
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    pub held: HeldKeys,
}

/// A tracked hand controller.
#[derive(Debug, Clone)]
pub struct Controller {
    pub position: Vec3,
    pub orientation: Quat,
    trigger_down: bool,
    pub held: HeldKeys,
}

impl Controller {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
            trigger_down: false,
            held: HeldKeys::default(),
        }
    }

    /// Updates the tracked pose.
    pub fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
    }

    /// Unit vector the controller points along: its local -z axis.
    pub fn pointing_direction(&self) -> Vec3 {
        let forward = self.orientation.rotate(Vec3::new(0.0, 0.0, -1.0));
        forward.normalize().unwrap_or(Vec3::new(0.0, 0.0, -1.0))
    }

    /// Ray from the controller along its pointing direction.
    pub fn forward_ray(&self) -> Ray {
        Ray::new(self.position, self.pointing_direction())
    }

    pub fn is_trigger_down(&self) -> bool {
        self.trigger_down
    }

    pub(crate) fn set_trigger_down(&mut self, down: bool) {
        self.trigger_down = down;
    }
}

impl Default for Controller {
    /// Held above the keyboard, pointing straight down.
    fn default() -> Self {
        Self::new(
            Vec3::new(0.0, 0.3, 0.0),
            Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), -std::f64::consts::FRAC_PI_2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piano::{Keyboard, Note};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_held_keys_dedup() {
        let mut held = HeldKeys::default();
        held.hold(KeyRef::new(0, 1));
        held.hold(KeyRef::new(0, 1));
        held.hold(KeyRef::new(1, 1));
        assert_eq!(held.len(), 2);
        assert!(held.contains(KeyRef::new(1, 1)));
        assert_eq!(held.take_all(), vec![KeyRef::new(0, 1), KeyRef::new(1, 1)]);
        assert!(held.is_empty());
    }

    #[test]
    fn test_controller_pointing() {
        let ahead = Controller::new(Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(ahead.pointing_direction(), Vec3::new(0.0, 0.0, -1.0));

        let down = Controller::default();
        assert!((down.pointing_direction() - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-12);

        let left = Controller::new(
            Vec3::ZERO,
            Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), FRAC_PI_2),
        );
        assert!((left.forward_ray().direction - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_plan_camera_round_trip() {
        let mut stage = Stage::new();
        stage.add(Vec3::ZERO, Keyboard::new(88, Note::new(21)).unwrap());
        let camera = PlanCamera::framing(&stage);

        let ray = camera.ray_through(0.25, -0.5);
        assert_eq!(ray.direction, Vec3::new(0.0, -1.0, 0.0));
        let (x, y) = camera.project(ray.origin);
        assert!((x - 0.25).abs() < 1e-12);
        assert!((y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_plan_camera_frames_stage() {
        let mut stage = Stage::new();
        stage.add(Vec3::ZERO, Keyboard::new(88, Note::new(21)).unwrap());
        let camera = PlanCamera::framing(&stage);
        let (min, max) = stage.bounds().unwrap();
        assert!(camera.ray_through(-1.0, 0.0).origin.x < min.x);
        assert!(camera.ray_through(1.0, 0.0).origin.x > max.x);
        assert!(camera.height > max.y);

        let empty = PlanCamera::framing(&Stage::new());
        assert_eq!(empty.center, Vec3::ZERO);
    }
}
