#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;

/// A routing point along an edge path.
pub type Vertex = Point;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Position and size of a drawable cell.
///
/// Every cell owns its own geometry; it is never shared. Dimensions are expected to be
/// non-negative but this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub coordinates: Point,
    pub dimensions: Size,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::zero()
    }
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            coordinates: point(x, y),
            dimensions: size(width, height),
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn x(&self) -> f64 {
        self.coordinates.x
    }

    pub fn y(&self) -> f64 {
        self.coordinates.y
    }

    pub fn width(&self) -> f64 {
        self.dimensions.width
    }

    pub fn height(&self) -> f64 {
        self.dimensions.height
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.coordinates = point(x, y);
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.dimensions = size(width, height);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.coordinates, self.dimensions)
    }
}
