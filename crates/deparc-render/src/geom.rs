pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(point(x, y), euclid::size2(width, height))
}

/// Point on the cubic Bézier `p0 p1 p2 p3` at parameter `t` in `[0, 1]`.
pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    point(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab: Vector = b - a;
    let len2 = ab.square_length();
    if len2 <= f64::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Distance from `p` to the curve approximated by `segments` straight pieces.
pub fn distance_to_cubic(p: Point, curve: [Point; 4], segments: usize) -> f64 {
    let segments = segments.max(1);
    let [p0, p1, p2, p3] = curve;
    let mut prev = p0;
    let mut best = f64::INFINITY;
    for i in 1..=segments {
        let t = i as f64 / segments as f64;
        let next = cubic_point(p0, p1, p2, p3, t);
        best = best.min(distance_to_segment(p, prev, next));
        prev = next;
    }
    best
}

/// Inclusive containment (euclid's `Rect::contains` excludes the far edges).
pub fn rect_contains(r: &Rect, p: Point) -> bool {
    p.x >= r.min_x() && p.x <= r.max_x() && p.y >= r.min_y() && p.y <= r.max_y()
}
