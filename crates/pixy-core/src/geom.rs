pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// A 2D affine transform.
///
/// Coefficients follow the SVG `matrix(a b c d e f)` order:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
///
/// Composition methods post-multiply, so a transform added later applies *before* the ones
/// already present. This matches walking an SVG tree: ancestor transforms are composed first and
/// descendant transforms are applied to the geometry first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(Transform);

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Self(Transform::identity())
    }

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self(Transform::new(a, b, c, d, e, f))
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self(Transform::translation(x, y))
    }

    pub fn scaling(x: f64, y: f64) -> Self {
        Self(Transform::scale(x, y))
    }

    pub fn rotation(degrees: f64) -> Self {
        Self(Transform::rotation(euclid::Angle::degrees(degrees)))
    }

    /// `[a, b, c, d, e, f]`
    pub fn coefficients(&self) -> [f64; 6] {
        self.0.to_array()
    }

    pub fn is_identity(&self) -> bool {
        self.0 == Transform::identity()
    }

    /// `self = self * other`: `other` is applied to points first.
    pub fn multiply(&mut self, other: &Matrix) {
        self.0 = other.0.then(&self.0);
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.multiply(&Self::translation(x, y));
    }

    pub fn scale(&mut self, x: f64, y: f64) {
        self.multiply(&Self::scaling(x, y));
    }

    pub fn rotate(&mut self, degrees: f64) {
        self.multiply(&Self::rotation(degrees));
    }

    pub fn transform_point(&self, p: Point) -> Point {
        self.0.transform_point(p)
    }

    pub fn as_transform(&self) -> &Transform {
        &self.0
    }
}

impl From<Transform> for Matrix {
    fn from(value: Transform) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn identity_is_default_and_maps_points_unchanged() {
        let m = Matrix::default();
        assert!(m.is_identity());
        assert_eq!(m.coefficients(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_close(m.transform_point(point(3.5, -2.0)), point(3.5, -2.0));
    }

    #[test]
    fn raw_coefficients_follow_svg_matrix_order() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        // x' = a*x + c*y + e, y' = b*x + d*y + f
        assert_close(m.transform_point(point(1.0, 1.0)), point(9.0, 12.0));
    }

    #[test]
    fn later_compositions_apply_to_points_first() {
        let mut m = Matrix::identity();
        m.translate(10.0, 0.0);
        m.scale(2.0, 2.0);
        // scale first, then translate
        assert_close(m.transform_point(point(1.0, 1.0)), point(12.0, 2.0));

        let mut n = Matrix::identity();
        n.scale(2.0, 2.0);
        n.translate(10.0, 0.0);
        assert_close(n.transform_point(point(1.0, 1.0)), point(22.0, 2.0));
    }

    #[test]
    fn rotation_is_counter_clockwise_in_svg_space() {
        let m = Matrix::rotation(90.0);
        assert_close(m.transform_point(point(1.0, 0.0)), point(0.0, 1.0));
    }

    #[test]
    fn composition_is_associative() {
        let a = Matrix::new(1.0, 0.5, -0.25, 2.0, 3.0, -1.0);
        let b = Matrix::rotation(30.0);
        let c = Matrix::translation(-4.0, 7.5);

        let mut left = a;
        left.multiply(&b);
        left.multiply(&c);

        let mut bc = b;
        bc.multiply(&c);
        let mut right = a;
        right.multiply(&bc);

        let p = point(2.0, -3.0);
        assert_close(left.transform_point(p), right.transform_point(p));
    }
}
