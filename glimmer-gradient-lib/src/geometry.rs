//! Gradient line resolution
//!
//! A linear gradient over a rectangle is described by two points on the
//! rectangle's boundary. Both points lie on the line through the center at
//! the configured angle: the first endpoint is where that line crosses the
//! top edge (or the left edge when it never reaches the top inside the
//! rectangle), the second where it crosses the bottom edge (or the right).
//!
//! ```text
//!   (0,0) ──── start ──────────── (w,0)
//!     │           ╲                 │
//!     │            ╲ θ              │
//!     │             ● center        │
//!     │              ╲              │
//!   (0,h) ────────── end ──────── (w,h)
//! ```

/// Tolerance for floating-point noise when snapping and bounds checking.
const EPSILON: f64 = 1e-6;

/// Integer point in surface coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The two endpoints a linear gradient shader interpolates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientLine {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointF {
    x: f64,
    y: f64,
}

impl PointF {
    const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which coordinate of an intersection must fall inside the edge.
#[derive(Debug, Clone, Copy)]
enum Edge {
    /// Horizontal edge: `x` must be within `[0, width]`
    Horizontal,
    /// Vertical edge: `y` must be within `[0, height]`
    Vertical,
}

/// Resolve the gradient line for a `width` x `height` surface.
///
/// Returns `None` when either extent is zero; there is no meaningful line
/// for an empty surface and callers are expected to wait for a real size.
#[must_use]
pub fn resolve_gradient_line(width: u32, height: u32, angle_degrees: f64) -> Option<GradientLine> {
    if width == 0 || height == 0 {
        return None;
    }

    let w = f64::from(width);
    let h = f64::from(height);
    let theta = angle_degrees.to_radians();

    // Any radius >= half the diagonal works; w + h always is.
    let radius = w + h;
    let center = PointF::new(w / 2.0, h / 2.0);
    let secant_a = PointF::new(
        center.x - radius * theta.cos(),
        center.y - radius * theta.sin(),
    );
    let secant_b = PointF::new(
        center.x + radius * theta.cos(),
        center.y + radius * theta.sin(),
    );

    let top_left = PointF::new(0.0, 0.0);
    let top_right = PointF::new(w, 0.0);
    let bottom_left = PointF::new(0.0, h);
    let bottom_right = PointF::new(w, h);

    let hit = |p3: PointF, p4: PointF, edge: Edge| {
        intersection_point(secant_a, secant_b, p3, p4)
            .and_then(|p| clamp_to_edge(p, edge, w, h))
    };

    let start = hit(top_left, top_right, Edge::Horizontal)
        .or_else(|| hit(top_left, bottom_left, Edge::Vertical))
        .unwrap_or_else(|| nearest_corner(secant_a, w, h));
    let end = hit(bottom_left, bottom_right, Edge::Horizontal)
        .or_else(|| hit(top_right, bottom_right, Edge::Vertical))
        .unwrap_or_else(|| nearest_corner(secant_b, w, h));

    Some(GradientLine {
        start: to_point(start),
        end: to_point(end),
    })
}

/// Intersection of the lines through `(p1, p2)` and `(p3, p4)`.
///
/// Uses the two-line determinant form; parallel or collinear lines have a
/// zero determinant and yield `None`.
fn intersection_point(p1: PointF, p2: PointF, p3: PointF, p4: PointF) -> Option<PointF> {
    let d = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if d == 0.0 {
        return None;
    }

    let cross_12 = p1.x * p2.y - p1.y * p2.x;
    let cross_34 = p3.x * p4.y - p3.y * p4.x;

    let x = ((p3.x - p4.x) * cross_12 - (p1.x - p2.x) * cross_34) / d;
    let y = ((p3.y - p4.y) * cross_12 - (p1.y - p2.y) * cross_34) / d;
    Some(PointF::new(x, y))
}

/// Accept an intersection only if it lies on the edge segment itself.
///
/// Values within [`EPSILON`] outside the segment are pulled back onto it,
/// which keeps lines passing exactly through a corner on the boundary.
fn clamp_to_edge(p: PointF, edge: Edge, width: f64, height: f64) -> Option<PointF> {
    let (value, limit) = match edge {
        Edge::Horizontal => (p.x, width),
        Edge::Vertical => (p.y, height),
    };
    if !(-EPSILON..=limit + EPSILON).contains(&value) {
        return None;
    }
    let clamped = value.clamp(0.0, limit);
    Some(match edge {
        Edge::Horizontal => PointF::new(clamped, p.y),
        Edge::Vertical => PointF::new(p.x, clamped),
    })
}

/// Fallback for a secant end that missed both candidate edges.
fn nearest_corner(p: PointF, width: f64, height: f64) -> PointF {
    PointF::new(p.x.clamp(0.0, width), p.y.clamp(0.0, height))
}

fn to_point(p: PointF) -> Point {
    Point::new(truncate_coordinate(p.x), truncate_coordinate(p.y))
}

/// Truncate toward zero after snapping floating-point noise to the nearest
/// integer, so 49.999_999_999_99 becomes 50 rather than 49.
fn truncate_coordinate(value: f64) -> i32 {
    let rounded = value.round();
    let snapped = if (value - rounded).abs() < EPSILON {
        rounded
    } else {
        value
    };
    // Coordinates are bounded by the surface size, which comes from u32.
    #[allow(clippy::cast_possible_truncation)]
    let truncated = snapped.trunc() as i32;
    truncated
}
