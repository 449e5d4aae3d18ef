//! Circle hit-testing
//!
//! Two predicates drive the whole interaction model:
//! - picking uses an inclusive point-in-circle test (`<=`)
//! - dropping uses a strict circle-in-circle test (`<`) against the
//!   pebble's logical radius, never its oscillating drawn radius

use glam::Vec2;

/// True iff `point` lies inside or on the circle at `center` with radius `r`
#[inline]
pub fn point_in_circle(center: Vec2, r: f32, point: Vec2) -> bool {
    center.distance_squared(point) <= r * r
}

/// True iff a circle of `inner_radius` at `inner` sits strictly inside the
/// circle of `outer_radius` at `outer`
///
/// Compares squared center distance against `(outer_radius - inner_radius)²`.
/// An inner circle larger than the outer one can still pass when the
/// centers coincide closely enough, since the margin is squared.
#[inline]
pub fn circle_contains_circle(outer: Vec2, outer_radius: f32, inner: Vec2, inner_radius: f32) -> bool {
    let margin = outer_radius - inner_radius;
    outer.distance_squared(inner) < margin * margin
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_on_boundary_is_inside() {
        let center = Vec2::new(10.0, 10.0);
        assert!(point_in_circle(center, 5.0, Vec2::new(15.0, 10.0)));
        assert!(point_in_circle(center, 5.0, Vec2::new(10.0, 5.0)));
        assert!(!point_in_circle(center, 5.0, Vec2::new(15.5, 10.0)));
    }

    #[test]
    fn test_containment_is_strict() {
        let bowl = Vec2::new(150.0, 150.0);
        // Exactly bowl_radius - pebble_radius away: not contained
        assert!(!circle_contains_circle(bowl, 100.0, Vec2::new(230.0, 150.0), 20.0));
        // One unit closer: contained
        assert!(circle_contains_circle(bowl, 100.0, Vec2::new(229.0, 150.0), 20.0));
    }

    #[test]
    fn test_containment_depends_on_inner_radius() {
        let bowl = Vec2::ZERO;
        let pebble = Vec2::new(70.0, 0.0);
        assert!(circle_contains_circle(bowl, 100.0, pebble, 20.0));
        // Same spot, grown pebble no longer fits
        assert!(!circle_contains_circle(bowl, 100.0, pebble, 30.0));
    }

    proptest! {
        #[test]
        fn prop_point_in_circle_matches_distance(
            cx in -500.0f32..500.0,
            cy in -500.0f32..500.0,
            r in 0.0f32..200.0,
            px in -500.0f32..500.0,
            py in -500.0f32..500.0,
        ) {
            let center = Vec2::new(cx, cy);
            let point = Vec2::new(px, py);
            let dx = px - cx;
            let dy = py - cy;
            prop_assert_eq!(point_in_circle(center, r, point), dx * dx + dy * dy <= r * r);
        }

        #[test]
        fn prop_concentric_smaller_circle_is_contained(
            r_outer in 1.0f32..200.0,
            frac in 0.0f32..0.99,
        ) {
            let inner_radius = r_outer * frac;
            prop_assert!(circle_contains_circle(Vec2::ZERO, r_outer, Vec2::ZERO, inner_radius));
        }

        #[test]
        fn prop_contained_center_is_pickable(
            x in -80.0f32..80.0,
            y in -80.0f32..80.0,
            inner_radius in 1.0f32..20.0,
        ) {
            let p = Vec2::new(x, y);
            if circle_contains_circle(Vec2::ZERO, 100.0, p, inner_radius) {
                prop_assert!(point_in_circle(Vec2::ZERO, 100.0, p));
            }
        }
    }
}
