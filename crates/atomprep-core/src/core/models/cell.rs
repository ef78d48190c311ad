use nalgebra::{Matrix3, Point3, Vector3};

/// A periodic simulation cell.
///
/// The three lattice vectors are stored as the rows of a 3x3 matrix, in Angstroms, so that a
/// fractional coordinate row vector `f` maps to Cartesian space as `f * M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    matrix: Matrix3<f64>,
}

impl Cell {
    pub fn from_vectors(a: Vector3<f64>, b: Vector3<f64>, c: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]),
        }
    }

    /// Creates a cubic cell with edge length `length`.
    pub fn cubic(length: f64) -> Self {
        Self::orthorhombic(length, length, length)
    }

    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Self {
            matrix: Matrix3::from_diagonal(&Vector3::new(a, b, c)),
        }
    }

    /// Builds the cell of a LAMMPS simulation box.
    ///
    /// `bounds` holds `(lo, hi)` for x, y and z, and `tilt` the `xy xz yz` tilt factors of a
    /// triclinic box (zero for orthogonal boxes). The box origin is not part of the cell.
    pub fn from_lammps_box(bounds: [(f64, f64); 3], tilt: [f64; 3]) -> Self {
        let [(xlo, xhi), (ylo, yhi), (zlo, zhi)] = bounds;
        let [xy, xz, yz] = tilt;
        Self::from_vectors(
            Vector3::new(xhi - xlo, 0.0, 0.0),
            Vector3::new(xy, yhi - ylo, 0.0),
            Vector3::new(xz, yz, zhi - zlo),
        )
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Returns the lattice vector `i` (0 = a, 1 = b, 2 = c).
    pub fn vector(&self, i: usize) -> Vector3<f64> {
        self.matrix.row(i).transpose()
    }

    /// Returns the lengths of the three lattice vectors.
    pub fn lengths(&self) -> [f64; 3] {
        [0, 1, 2].map(|i| self.vector(i).norm())
    }

    /// Cell volume in cubic Angstroms.
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    /// Converts fractional coordinates into a Cartesian position.
    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Point3<f64> {
        Point3::from(self.matrix.transpose() * fractional)
    }

    /// Returns the nine matrix components in row-major order (a, then b, then c).
    pub fn to_row_major(&self) -> [f64; 9] {
        let m = &self.matrix;
        [
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 0)],
            m[(2, 1)],
            m[(2, 2)],
        ]
    }

    pub fn from_row_major(values: [f64; 9]) -> Self {
        Self {
            matrix: Matrix3::from_row_slice(&values),
        }
    }
}
