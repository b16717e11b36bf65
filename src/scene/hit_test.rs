//! Ray hit testing against key surfaces.
//!
//! Every key is an oriented box: an axis-aligned box that has been swung
//! about the x axis of its pivot. Testing a ray against it means moving the
//! ray into the box's own frame and running a slab test there.
//!
//! Only surfaces tagged with an owning key can be hit. Decorative surfaces
//! (controller markers, helpers) carry no owner and are skipped even when
//! they are in front.

use super::{KeyRef, Ray, Vec3};

/// A box that a ray can be tested against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// World position of the rotation pivot.
    pub pivot: Vec3,
    /// Current rotation about the pivot's x axis, in radians.
    pub rotation_x: f64,
    /// Box center relative to the pivot, before rotation.
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Key this surface belongs to, or None for decoration.
    pub owner: Option<KeyRef>,
}

impl Surface {
    /// An unrotated box centered on `center`.
    pub fn axis_aligned(center: Vec3, half_extents: Vec3, owner: Option<KeyRef>) -> Self {
        Self {
            pivot: center,
            rotation_x: 0.0,
            center: Vec3::ZERO,
            half_extents,
            owner,
        }
    }

    /// Distance along `ray` to the first point of this surface, if any.
    ///
    /// `ray.direction` must be unit length for the result to be a distance.
    /// A ray starting inside the box hits at distance 0.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let origin = (ray.origin - self.pivot).rotate_x(-self.rotation_x) - self.center;
        let direction = ray.direction.rotate_x(-self.rotation_x);

        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        let axes = [
            (origin.x, direction.x, self.half_extents.x),
            (origin.y, direction.y, self.half_extents.y),
            (origin.z, direction.z, self.half_extents.z),
        ];
        for (o, d, h) in axes {
            if d.abs() < 1e-12 {
                // Parallel to this slab: inside it or never.
                if o < -h || o > h {
                    return None;
                }
                continue;
            }
            let (t1, t2) = ((-h - o) / d, (h - o) / d);
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_far < t_near || t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// The key a ray resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub key: KeyRef,
    /// Distance from the ray origin to the hit point.
    pub distance: f64,
}

/// Resolves a ray to the nearest key surface it passes through.
///
/// Works the same for any input source: only ray geometry is involved.
///
/// # Arguments
///
/// * `ray` - Ray to cast; the direction need not be normalized
/// * `surfaces` - Candidate surfaces, in any order
///
/// # Returns
///
/// The owning key of the nearest intersected tagged surface, or None if the
/// ray misses every key (or has no direction)
pub fn resolve(ray: Ray, surfaces: &[Surface]) -> Option<Hit> {
    let Some(direction) = ray.direction.normalize() else {
        tracing::debug!("Ignoring hit test with degenerate ray direction");
        return None;
    };
    let ray = Ray::new(ray.origin, direction);

    surfaces
        .iter()
        .filter_map(|surface| {
            let key = surface.owner?;
            surface
                .intersect(&ray)
                .map(|distance| Hit { key, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: Vec3 = Vec3::new(0.5, 0.5, 0.5);

    fn down_ray(x: f64, z: f64) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_nearest_wins() {
        let near = KeyRef::new(0, 1);
        let far = KeyRef::new(0, 2);
        // Ray along -z from the origin; box faces at distance 2.0 and 5.0.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let surfaces = [
            Surface::axis_aligned(Vec3::new(0.0, 0.0, -5.5), UNIT, Some(far)),
            Surface::axis_aligned(Vec3::new(0.0, 0.0, -2.5), UNIT, Some(near)),
        ];

        let hit = resolve(ray, &surfaces).unwrap();
        assert_eq!(hit.key, near);
        assert!((hit.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_miss() {
        let surfaces = [Surface::axis_aligned(Vec3::ZERO, UNIT, Some(KeyRef::new(0, 0)))];
        assert_eq!(resolve(down_ray(2.0, 0.0), &surfaces), None);
        assert_eq!(resolve(down_ray(0.0, 0.0), &[]), None);
    }

    #[test]
    fn test_surface_behind_ray_is_ignored() {
        let surfaces = [Surface::axis_aligned(
            Vec3::new(0.0, 20.0, 0.0),
            UNIT,
            Some(KeyRef::new(0, 0)),
        )];
        assert_eq!(resolve(down_ray(0.0, 0.0), &surfaces), None);
    }

    #[test]
    fn test_untagged_surfaces_skipped() {
        let key = KeyRef::new(0, 7);
        let surfaces = [
            Surface::axis_aligned(Vec3::new(0.0, 5.0, 0.0), UNIT, None),
            Surface::axis_aligned(Vec3::ZERO, UNIT, Some(key)),
        ];
        let hit = resolve(down_ray(0.0, 0.0), &surfaces).unwrap();
        assert_eq!(hit.key, key);
        assert!((hit.distance - 9.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_direction() {
        let surfaces = [Surface::axis_aligned(Vec3::ZERO, UNIT, Some(KeyRef::new(0, 0)))];
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert_eq!(resolve(ray, &surfaces), None);
    }

    #[test]
    fn test_unnormalized_direction_reports_distance() {
        let surfaces = [Surface::axis_aligned(Vec3::ZERO, UNIT, Some(KeyRef::new(0, 0)))];
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -4.0, 0.0));
        let hit = resolve(ray, &surfaces).unwrap();
        assert!((hit.distance - 9.5).abs() < 1e-12);
    }

    #[test]
    fn test_origin_inside_box() {
        let surfaces = [Surface::axis_aligned(Vec3::ZERO, UNIT, Some(KeyRef::new(0, 0)))];
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(resolve(ray, &surfaces).map(|h| h.distance), Some(0.0));
    }

    #[test]
    fn test_rotated_surface() {
        // A long thin box hinged at its far end (-z), tilted so the near end
        // dips. A vertical ray over the near end hits lower than it would
        // for the flat box.
        let key = KeyRef::new(0, 0);
        let flat = Surface {
            pivot: Vec3::ZERO,
            rotation_x: 0.0,
            center: Vec3::new(0.0, 0.0, 0.5),
            half_extents: Vec3::new(0.1, 0.01, 0.5),
            owner: Some(key),
        };
        let tilted = Surface {
            rotation_x: 0.2,
            ..flat
        };

        let flat_hit = resolve(down_ray(0.0, 0.9), &[flat]).unwrap();
        let tilted_hit = resolve(down_ray(0.0, 0.9), &[tilted]).unwrap();
        assert!((flat_hit.distance - 9.99).abs() < 1e-12);
        assert!(tilted_hit.distance > flat_hit.distance);
    }
}
