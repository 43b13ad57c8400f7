//! Planar points and the left/right split of the two-armed figure.

use serde::{Deserialize, Serialize};

/// 2D point in figure space (y grows downwards, as in SVG user units).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn translate(self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Which arm of the figure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Right, Side::Left];

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Right => "right",
            Side::Left => "left",
        }
    }
}

/// One value per arm.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SidePair<T> {
    pub right: T,
    pub left: T,
}

impl<T> SidePair<T> {
    pub fn new(right: T, left: T) -> Self {
        Self { right, left }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Right => &mut self.right,
            Side::Left => &mut self.left,
        }
    }

    /// Right first, then left.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Right, &self.right), (Side::Left, &self.left)].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_and_midpoint() {
        let p = Point::new(-90.0, 10.0).translate(Point::new(0.0, -10.0));
        assert_eq!(p, Point::new(-90.0, 0.0));
        assert_eq!(p.midpoint(Point::new(-30.0, 0.0)), Point::new(-60.0, 0.0));
    }

    #[test]
    fn side_pair_access() {
        let mut pair = SidePair::new(1, 2);
        *pair.get_mut(Side::Left) += 10;
        assert_eq!(*pair.get(Side::Right), 1);
        assert_eq!(*pair.get(Side::Left), 12);
        assert_eq!(Side::Right.opposite(), Side::Left);
        let names: Vec<_> = pair.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, ["right", "left"]);
    }
}
