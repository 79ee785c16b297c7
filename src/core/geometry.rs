use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamps negative or non-finite extents to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(clamp_extent(self.width), clamp_extent(self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Normalizes a rect spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }

    #[must_use]
    pub fn deflate(self, margins: Margins) -> Self {
        Self::new(
            self.x + margins.left,
            self.y + margins.top,
            clamp_extent(self.width - margins.horizontal()),
            clamp_extent(self.height - margins.vertical()),
        )
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Outer spacing around a component, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

#[must_use]
pub fn clamp_extent(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Even-odd point-in-polygon test.
#[must_use]
pub fn point_in_poly(point: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[j];
        if (a.y > point.y) != (b.y > point.y) {
            let cross_x = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Annulus-sector test used by pie hit-testing.
///
/// Angles are in degrees, measured clockwise from the positive X axis in
/// screen space (Y grows downwards). `inner_radius == 0` is a plain sector.
#[must_use]
pub fn point_in_pie(
    point: Point,
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
    start_angle: f64,
    sweep_angle: f64,
) -> bool {
    let distance = point.distance_to(center);
    if distance > outer_radius || distance < inner_radius {
        return false;
    }
    if sweep_angle >= 360.0 {
        return true;
    }
    if sweep_angle <= 0.0 {
        return false;
    }

    let angle = (point.y - center.y).atan2(point.x - center.x).to_degrees();
    let relative = normalize_degrees(angle - start_angle);
    relative <= sweep_angle
}

/// Maps any angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Point on a circle for a screen-space angle in degrees.
#[must_use]
pub fn polar_point(center: Point, radius: f64, angle_degrees: f64) -> Point {
    let radians = angle_degrees.to_radians();
    Point::new(
        center.x + radius * radians.cos(),
        center.y + radius * radians.sin(),
    )
}

/// Euclidean distance from `point` to the segment `a..b`.
#[must_use]
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return point.distance_to(a);
    }
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    point.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, point_in_pie, point_in_poly};

    #[test]
    fn square_contains_center_but_not_outside() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_poly(Point::new(5.0, 5.0), &square));
        assert!(!point_in_poly(Point::new(15.0, 5.0), &square));
    }

    #[test]
    fn pie_sector_wraps_past_zero_degrees() {
        let center = Point::new(0.0, 0.0);
        // 315..45 degrees, pointing right.
        assert!(point_in_pie(Point::new(5.0, 0.0), center, 10.0, 0.0, 315.0, 90.0));
        assert!(!point_in_pie(Point::new(-5.0, 0.0), center, 10.0, 0.0, 315.0, 90.0));
    }

    #[test]
    fn doughnut_hole_is_excluded() {
        let center = Point::new(0.0, 0.0);
        assert!(!point_in_pie(Point::new(1.0, 0.0), center, 10.0, 4.0, 0.0, 360.0));
        assert!(point_in_pie(Point::new(6.0, 0.0), center, 10.0, 4.0, 0.0, 360.0));
    }

    #[test]
    fn rect_union_covers_both() {
        let merged = Rect::new(0.0, 0.0, 10.0, 10.0).union(Rect::new(20.0, 5.0, 5.0, 10.0));
        assert_eq!(merged, Rect::new(0.0, 0.0, 25.0, 15.0));
    }
}
