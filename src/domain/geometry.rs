//! Swept collision solvers for the arena physics.
//!
//! Both solvers model the moving circle's center as a line through its
//! current position with direction `velocity`, expressed as `y = mx + c`,
//! and intersect that trajectory against dilated obstacle geometry by
//! solving quadratics in x. A segment is dilated into a stadium: two
//! offset lines parallel to the segment at distance `radius`, capped by
//! radius-circles at the endpoints. Vertical slopes are substituted with
//! the finite sentinel `BIG` so every quadratic stays well-defined and no
//! NaN can escape.

use glam::DVec2;

/// Sentinel slope standing in for a vertical (infinite) slope
pub const BIG: f64 = 10_000.0;

const SLOPE_EPS: f64 = 1e-9;

/// Earliest contact found along a swept trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct SweepHit {
    /// Pre-penetration position: the raw intersection backed off by one
    /// velocity step
    pub position: DVec2,
    /// Slope of the contact normal; `BIG` when the normal is vertical
    pub normal_slope: f64,
}

/// Slope of `dy/dx`, substituting the sentinel when the run is near zero
fn slope(dy: f64, dx: f64) -> f64 {
    if dx.abs() < SLOPE_EPS {
        BIG
    } else {
        dy / dx
    }
}

fn normal_of_tangent(tangent: f64) -> f64 {
    if tangent.abs() < SLOPE_EPS {
        BIG
    } else {
        -1.0 / tangent
    }
}

/// Both x-roots of the line `y = m x + c` intersected with the circle of
/// radius `r` around `center`. `None` when the discriminant is negative.
fn line_circle_roots(m: f64, c: f64, center: DVec2, r: f64) -> Option<(f64, f64)> {
    let a = m * m + 1.0;
    let b = 2.0 * (m * c - m * center.y - center.x);
    let k = center.y * center.y - r * r + center.x * center.x - 2.0 * c * center.y + c * c;
    let det = b * b - 4.0 * a * k;
    if det < 0.0 {
        return None;
    }
    let sqrt_det = det.sqrt();
    Some(((-b + sqrt_det) / (2.0 * a), (-b - sqrt_det) / (2.0 * a)))
}

/// Tracks the nearest attainable candidate across sub-tests
struct Nearest {
    limit: f64,
    best: Option<(f64, DVec2, f64)>, // (distance, position, tangent slope)
}

impl Nearest {
    fn new(limit: f64) -> Self {
        Self { limit, best: None }
    }

    fn offer(&mut self, start: DVec2, candidate: DVec2, tangent: f64) {
        let dist = (candidate - start).length();
        if dist > self.limit {
            return;
        }
        if self.best.as_ref().map_or(true, |(d, _, _)| dist < *d) {
            self.best = Some((dist, candidate, tangent));
        }
    }

    fn finish(self, velocity: DVec2) -> Option<SweepHit> {
        self.best.map(|(_, position, tangent)| SweepHit {
            position: position - velocity,
            normal_slope: normal_of_tangent(tangent),
        })
    }
}

/// Sweep a moving circle against a static line segment.
///
/// Returns the earliest contact within one `velocity` step of `center`,
/// or `None` when the swept path never reaches the dilated segment.
pub fn sweep_circle_segment(
    center: DVec2,
    radius: f64,
    seg_start: DVec2,
    seg_end: DVec2,
    velocity: DVec2,
) -> Option<SweepHit> {
    if velocity.length_squared() == 0.0 {
        return None;
    }

    let traj_m = slope(velocity.y, velocity.x);
    let traj_c = center.y - traj_m * center.x;

    let line_m = slope(seg_end.y - seg_start.y, seg_end.x - seg_start.x);
    let line_c = seg_start.y - line_m * seg_start.x;

    // Offset the segment's carrier line so each bounding line sits one
    // circle-radius away in perpendicular distance. A vertical segment
    // (sentinel slope) is offset in x instead, which keeps the quadratic
    // well-defined.
    let (upper_c, lower_c) = if line_m == BIG {
        (
            seg_start.y - line_m * (seg_start.x + radius),
            seg_start.y - line_m * (seg_start.x - radius),
        )
    } else {
        let offset = radius * (line_m * line_m + 1.0).sqrt();
        (line_c + offset, line_c - offset)
    };

    let mut nearest = Nearest::new(velocity.length());

    // Endpoint caps: trajectory vs the radius-circle at each segment end
    for cap in [seg_start, seg_end] {
        if let Some((x1, x2)) = line_circle_roots(traj_m, traj_c, cap, radius) {
            let p1 = DVec2::new(x1, traj_m * x1 + traj_c);
            let p2 = DVec2::new(x2, traj_m * x2 + traj_c);
            let p = if (p1 - center).length() < (p2 - center).length() {
                p1
            } else {
                p2
            };
            nearest.offer(center, p, slope(cap.x - p.x, p.y - cap.y));
        }
    }

    // Offset lines, bounded to the segment's finite span
    let seg_dir = seg_end - seg_start;
    for offset_c in [upper_c, lower_c] {
        let denom = traj_m - line_m;
        if denom.abs() < SLOPE_EPS {
            continue; // trajectory parallel to the segment
        }
        let x = (offset_c - traj_c) / denom;
        let y = line_m * x + offset_c;
        let candidate = DVec2::new(x, y);
        // Candidates past either endpoint belong to the cap tests
        let t = (candidate - seg_start).dot(seg_dir) / seg_dir.length_squared();
        if (0.0..=1.0).contains(&t) {
            nearest.offer(center, candidate, line_m);
        }
    }

    nearest.finish(velocity)
}

/// Sweep a moving circle against a static circle by intersecting the
/// trajectory with a single circle of combined radius.
pub fn sweep_circle_circle(
    center: DVec2,
    moving_radius: f64,
    static_center: DVec2,
    static_radius: f64,
    velocity: DVec2,
) -> Option<SweepHit> {
    if velocity.length_squared() == 0.0 {
        return None;
    }

    let traj_m = slope(velocity.y, velocity.x);
    let traj_c = center.y - traj_m * center.x;

    let mut nearest = Nearest::new(velocity.length());
    let combined = moving_radius + static_radius;
    if let Some((x1, x2)) = line_circle_roots(traj_m, traj_c, static_center, combined) {
        let p1 = DVec2::new(x1, traj_m * x1 + traj_c);
        let p2 = DVec2::new(x2, traj_m * x2 + traj_c);
        let p = if (p1 - center).length() < (p2 - center).length() {
            p1
        } else {
            p2
        };
        nearest.offer(center, p, slope(static_center.x - p.x, p.y - static_center.y));
    }

    nearest.finish(velocity)
}

/// Mirror-reflect `velocity` off a contact whose normal has slope
/// `normal_slope`.
///
/// The velocity is decomposed against the normal line through the origin
/// and its perpendicular foot is subtracted twice, negating the normal
/// component while keeping the tangential one. When the incoming velocity
/// points into the same quadrant as the sentinel vertical normal the
/// normal's sign must be flipped, otherwise the reflection would pass
/// through the wall instead of bouncing off it.
pub fn reflect(velocity: DVec2, normal_slope: f64) -> DVec2 {
    let mut normal = normal_slope;
    if velocity.x * velocity.y > 0.0 && normal == BIG {
        normal = -normal;
    }

    let tangent_m = if normal.abs() < SLOPE_EPS {
        -BIG
    } else {
        -1.0 / normal
    };
    let tangent_c = velocity.y - tangent_m * velocity.x;

    // Foot of the perpendicular from the velocity tip to the normal line
    let foot_x = -tangent_c / (tangent_m - normal);
    let foot_y = normal * foot_x;

    velocity - 2.0 * DVec2::new(foot_x, foot_y)
}
