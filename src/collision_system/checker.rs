use super::CollisionResult;
use crate::body::Body;
use crate::geo::*;
use serde::{Deserialize, Serialize};

/// Narrow phase test between two bodies. `None` means no collision.
pub trait CollisionChecker {
    fn check(&self, body1: &Body, body2: &Body) -> Option<CollisionResult>;
}

/// Compares bounds only.
#[derive(Copy, Clone, Debug, Default)]
pub struct AabbChecker;

/// Separating axis test over both bodies' edge normals plus the axis towards
/// the closest point for circles.
#[derive(Copy, Clone, Debug, Default)]
pub struct SatChecker;

/// Center distance test, defined for circle pairs only.
#[derive(Copy, Clone, Debug, Default)]
pub struct DistanceChecker;

/// Bounds pre check, then `DistanceChecker` for two circles and
/// `SatChecker` for everything else.
#[derive(Copy, Clone, Debug, Default)]
pub struct SmartChecker;

/// Selects a checker from configuration.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CheckerKind {
    Aabb,
    Sat,
    Distance,
    #[default]
    Smart,
}

impl CollisionChecker for AabbChecker {
    fn check(&self, body1: &Body, body2: &Body) -> Option<CollisionResult> {
        let a = body1.bounds();
        let b = body2.bounds();
        if !a.overlaps(b) {
            return None;
        }
        // pushes of body1 out of body2 along +x, -x, +y, -y
        let candidates = [
            (b.right - a.left, V2::new(1.0, 0.0)),
            (a.right - b.left, V2::new(-1.0, 0.0)),
            (b.bottom - a.top, V2::new(0.0, 1.0)),
            (a.bottom - b.top, V2::new(0.0, -1.0)),
        ];
        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.0 < best.0 {
                best = *candidate;
            }
        }
        let (overlap, direction) = best;
        Some(CollisionResult::new(overlap, direction * overlap))
    }
}

/// axis from a circle's center to the closest point of `other`
fn circle_axis(circle: &Body, other: &Body) -> Option<V2> {
    if !circle.is_circle() {
        return None;
    }
    let center = circle.position();
    let axis = (other.get_closest(&center) - center).normalize_or_zero();
    if axis == V2::zeros() {
        None
    } else {
        Some(axis)
    }
}

impl CollisionChecker for SatChecker {
    fn check(&self, body1: &Body, body2: &Body) -> Option<CollisionResult> {
        if body1.is_circle() && body2.is_circle() {
            return DistanceChecker.check(body1, body2);
        }
        let axes = body1
            .normals()
            .iter()
            .chain(body2.normals().iter())
            .copied()
            .chain(circle_axis(body1, body2))
            .chain(circle_axis(body2, body1));

        let mut best: Option<(Float, V2)> = None;
        for axis in axes {
            let p1 = body1.project(&axis);
            let p2 = body2.project(&axis);
            if p1.separated_from(&p2) {
                return None;
            }
            let push_positive = p2.max - p1.min;
            let push_negative = p1.max - p2.min;
            let candidate = if push_positive < push_negative {
                (push_positive, axis)
            } else {
                (push_negative, -axis)
            };
            // first axis wins ties
            if best.map_or(true, |(overlap, _)| candidate.0 < overlap) {
                best = Some(candidate);
            }
        }
        best.map(|(overlap, direction)| CollisionResult::new(overlap, direction * overlap))
    }
}

impl CollisionChecker for DistanceChecker {
    fn check(&self, body1: &Body, body2: &Body) -> Option<CollisionResult> {
        let (c1, c2) = match (body1.shape().as_circle(), body2.shape().as_circle()) {
            (Some(c1), Some(c2)) => (c1, c2),
            _ => return None,
        };
        let p1 = body1.position();
        let p2 = body2.position();
        let d = p1 - p2;
        let dist = d.norm();
        let r1 = c1.radius_towards(body1.pose(), &p2);
        let r2 = c2.radius_towards(body2.pose(), &p1);
        let overlap = r1 + r2 - dist;
        if overlap <= 0.0 {
            return None;
        }
        // concentric circles get pushed apart along x
        let direction = if dist > 0.0 { d / dist } else { V2::x() };
        Some(CollisionResult::new(overlap, direction * overlap))
    }
}

impl CollisionChecker for SmartChecker {
    fn check(&self, body1: &Body, body2: &Body) -> Option<CollisionResult> {
        if !body1.bounds().overlaps(body2.bounds()) {
            return None;
        }
        if body1.is_circle() && body2.is_circle() {
            DistanceChecker.check(body1, body2)
        } else {
            SatChecker.check(body1, body2)
        }
    }
}

impl CollisionChecker for CheckerKind {
    fn check(&self, body1: &Body, body2: &Body) -> Option<CollisionResult> {
        match self {
            CheckerKind::Aabb => AabbChecker.check(body1, body2),
            CheckerKind::Sat => SatChecker.check(body1, body2),
            CheckerKind::Distance => DistanceChecker.check(body1, body2),
            CheckerKind::Smart => SmartChecker.check(body1, body2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quickcheck::TestResult;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rect(x: Float, y: Float, w: Float, h: Float) -> Body {
        Body::rectangle(P2::new(x, y), w, h, 1.0)
    }

    #[test]
    fn aabb_picks_the_smallest_push() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.5, 0.2, 2.0, 2.0);
        let r = AabbChecker.check(&a, &b).unwrap();
        assert_relative_eq!(r.overlap(), 0.5);
        assert_relative_eq!(r.overlap_vector(), V2::new(-0.5, 0.0));
        assert!(AabbChecker.check(&a, &rect(5.0, 0.0, 2.0, 2.0)).is_none());
    }

    #[test]
    fn aabb_touching_reports_zero_overlap() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(2.0, 0.0, 2.0, 2.0);
        let r = AabbChecker.check(&a, &b).unwrap();
        assert_eq!(r.overlap(), 0.0);
    }

    #[test]
    fn aabb_result_iff_bounds_overlap() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let a: Aabb = rng.gen();
            let b: Aabb = rng.gen();
            let ba = rect(a.center().x, a.center().y, a.width(), a.height());
            let bb = rect(b.center().x, b.center().y, b.width(), b.height());
            assert_eq!(
                AabbChecker.check(&ba, &bb).is_none(),
                !ba.bounds().overlaps(bb.bounds())
            );
        }
    }

    #[test]
    fn sat_polygon_polygon() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.5, 0.0, 2.0, 2.0);
        let r = SatChecker.check(&a, &b).unwrap();
        assert_relative_eq!(r.overlap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(r.overlap_vector(), V2::new(-0.5, 0.0), epsilon = 1e-12);
        // swapping the pair flips the push
        let r = SatChecker.check(&b, &a).unwrap();
        assert_relative_eq!(r.overlap_vector(), V2::new(0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn sat_finds_rotated_gap() {
        // a diamond whose corner would overlap the square's bounds but not the square
        let square = rect(0.0, 0.0, 2.0, 2.0);
        let mut diamond = rect(2.3, 2.3, 2.0, 2.0);
        diamond.rotate(std::f64::consts::FRAC_PI_4, None);
        assert!(square.bounds().overlaps(diamond.bounds()));
        assert!(SatChecker.check(&square, &diamond).is_none());
        assert!(SmartChecker.check(&square, &diamond).is_none());
        assert!(AabbChecker.check(&square, &diamond).is_some());
    }

    #[test]
    fn sat_circle_polygon_uses_closest_point_axis() {
        let circle = Body::circle(P2::new(0.0, 0.0), 5.0, 1.0);
        let wall = rect(12.0, 0.0, 10.0, 10.0);
        assert!(SatChecker.check(&circle, &wall).is_none());

        let circle = Body::circle(P2::new(4.0, 0.0), 5.0, 1.0);
        let r = SatChecker.check(&circle, &wall).unwrap();
        assert_relative_eq!(r.overlap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(r.overlap_vector(), V2::new(-2.0, 0.0), epsilon = 1e-12);

        // corner region: rectangle normals overlap, the closest point axis separates
        let circle = Body::circle(P2::new(0.0, -9.5), 5.0, 1.0);
        let corner = rect(4.0, -4.0, 2.0, 2.0);
        assert!(circle.bounds().overlaps(corner.bounds()));
        assert!(SatChecker.check(&circle, &corner).is_none());
    }

    #[test]
    fn sat_circle_line() {
        let floor = Body::line(P2::new(-10.0, 0.0), P2::new(10.0, 0.0));
        let ball = Body::circle(P2::new(0.0, -0.5), 1.0, 1.0);
        let r = SmartChecker.check(&ball, &floor).unwrap();
        assert_relative_eq!(r.overlap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(r.overlap_vector(), V2::new(0.0, -0.5), epsilon = 1e-12);
    }

    #[test]
    fn circle_pairs_never_use_sat_axes() {
        let a = Body::circle(P2::new(0.0, 0.0), 1.0, 1.0);
        let b = Body::circle(P2::new(1.5, 0.0), 1.0, 1.0);
        let sat = SatChecker.check(&a, &b).unwrap();
        let dist = DistanceChecker.check(&a, &b).unwrap();
        assert_eq!(sat, dist);
        assert_relative_eq!(dist.overlap(), 0.5);
        assert_relative_eq!(dist.overlap_vector(), V2::new(-0.5, 0.0));
    }

    #[test]
    fn distance_ignores_non_circles() {
        let a = Body::circle(P2::new(0.0, 0.0), 1.0, 1.0);
        assert!(DistanceChecker.check(&a, &rect(0.0, 0.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn concentric_circles_get_a_direction() {
        let a = Body::circle(P2::new(1.0, 1.0), 1.0, 1.0);
        let b = Body::circle(P2::new(1.0, 1.0), 2.0, 1.0);
        let r = DistanceChecker.check(&a, &b).unwrap();
        assert_relative_eq!(r.overlap(), 3.0);
        assert_relative_eq!(r.overlap_vector(), V2::new(3.0, 0.0));
    }

    #[test]
    fn smart_rejects_on_bounds() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(10.0, 0.0, 1.0, 1.0);
        assert!(SmartChecker.check(&a, &b).is_none());
        assert!(CheckerKind::Smart.check(&a, &b).is_none());
    }

    #[test]
    fn sat_agrees_with_aabb_for_axis_aligned_rectangles() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let a: Aabb = rng.gen();
            let b: Aabb = rng.gen();
            let ba = rect(a.center().x, a.center().y, a.width(), a.height());
            let bb = rect(b.center().x, b.center().y, b.width(), b.height());
            let sat = SatChecker.check(&ba, &bb);
            let aabb = AabbChecker.check(&ba, &bb);
            assert_eq!(sat.is_some(), aabb.is_some());
            if let (Some(s), Some(a)) = (sat, aabb) {
                assert_relative_eq!(s.overlap(), a.overlap(), epsilon = 1e-9);
            }
        }
    }

    #[quickcheck]
    fn distance_matches_radii(r1: u8, r2: u8, dx: i16, dy: i16) -> TestResult {
        if r1 == 0 || r2 == 0 {
            return TestResult::discard();
        }
        let (r1, r2) = (r1 as Float / 8.0, r2 as Float / 8.0);
        let p2 = P2::new(dx as Float / 64.0, dy as Float / 64.0);
        let a = Body::circle(P2::origin(), r1, 1.0);
        let b = Body::circle(p2, r2, 1.0);
        let d = p2.coords.norm();
        let res = DistanceChecker.check(&a, &b);
        match res {
            Some(r) => TestResult::from_bool(
                d < r1 + r2 && (r.overlap() - (r1 + r2 - d)).abs() < 1e-9,
            ),
            None => TestResult::from_bool(d >= r1 + r2),
        }
    }
}
