// Defines an Axis-Aligned Bounding Box

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum and maximum corner points.
///
/// Screen conventions apply: `min.y` is the top edge, `max.y` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec2,
    pub max: Vec2,
}

impl AABB {
    /// Creates a new AABB. The corners may be given in any order.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        AABB {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Creates an AABB from its top-left corner and size.
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self::new(position, position + size)
    }

    /// Creates a square AABB of half-extent `half` around `center`.
    pub fn from_center_half_extent(center: Vec2, half: f64) -> Self {
        let h = Vec2::new(half, half);
        Self::new(center - h, center + h)
    }

    /// Creates an AABB that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(AABB { min, max })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Corners in ring order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Checks if this AABB overlaps with another AABB. Shared edges do not count.
    pub fn overlaps(&self, other: &AABB) -> bool {
        let x_overlap = self.max.x > other.min.x && self.min.x < other.max.x;
        let y_overlap = self.max.y > other.min.y && self.min.y < other.max.y;
        x_overlap && y_overlap
    }

    /// Inclusive containment test: points on the border are inside.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Exclusive containment test: points on the border are outside.
    pub fn strictly_contains(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }

    /// Merges another AABB into this one, expanding this AABB to contain both.
    pub fn merge(&mut self, other: &AABB) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// The rectangle `self ⊖ other`: it contains the origin iff the two boxes overlap.
    pub fn minkowski_difference(&self, other: &AABB) -> AABB {
        let top_left = self.min - other.max;
        AABB::from_position_size(top_left, self.size() + other.size())
    }

    /// The point on the border of this box that is nearest to the origin.
    pub fn closest_point_on_bounds_to_origin(&self) -> Vec2 {
        let mut min_dist = self.min.x.abs();
        let mut bounds_point = Vec2::new(self.min.x, 0.0);

        if self.max.x.abs() < min_dist {
            min_dist = self.max.x.abs();
            bounds_point = Vec2::new(self.max.x, 0.0);
        }
        if self.max.y.abs() < min_dist {
            min_dist = self.max.y.abs();
            bounds_point = Vec2::new(0.0, self.max.y);
        }
        if self.min.y.abs() < min_dist {
            bounds_point = Vec2::new(0.0, self.min.y);
        }
        bounds_point
    }

    /// Nearest point on the border to `point`, with the outward normal of the
    /// edge it lies on. Outside corners report a diagonal (unnormalized) normal.
    pub fn closest_point_on_border(&self, point: Vec2) -> (Vec2, Vec2) {
        let mut result = Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        );
        let mut normal = Vec2::ZERO;

        if self.strictly_contains(result) {
            let dist_left = result.x - self.min.x;
            let dist_right = self.max.x - result.x;
            let dist_top = result.y - self.min.y;
            let dist_bottom = self.max.y - result.y;
            let min = dist_left.min(dist_right).min(dist_top).min(dist_bottom);

            if min == dist_top {
                result.y = self.min.y;
                normal.y = -1.0;
            } else if min == dist_bottom {
                result.y = self.max.y;
                normal.y = 1.0;
            } else if min == dist_left {
                result.x = self.min.x;
                normal.x = -1.0;
            } else {
                result.x = self.max.x;
                normal.x = 1.0;
            }
        } else {
            if result.x == self.min.x {
                normal.x = -1.0;
            } else if result.x == self.max.x {
                normal.x = 1.0;
            }
            if result.y == self.min.y {
                normal.y = -1.0;
            } else if result.y == self.max.y {
                normal.y = 1.0;
            }
        }
        (result, normal)
    }

    /// Slab test for the segment `start -> end`.
    /// Returns the entry fraction in `[0, 1]`, or `None` if the segment misses.
    pub fn segment_intersects(&self, start: Vec2, end: Vec2) -> Option<f64> {
        let dir = end - start;
        let mut t_min = 0.0_f64;
        let mut t_max = 1.0_f64;

        for (origin, d, lo, hi) in [
            (start.x, dir.x, self.min.x, self.max.x),
            (start.y, dir.y, self.min.y, self.max.y),
        ] {
            if d.abs() < 1e-12 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (t1, t2) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                if a < b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}
