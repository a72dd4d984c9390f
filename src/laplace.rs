//! Low order expansions of the 3D Laplace kernel
//!
//! Multipole expansions hold the monopole and dipole moments of a source region.
//! Local expansions hold the potential and its gradient at the centre of a target
//! region. Potentials use the Green's function `1 / (4 pi |x - y|)`.
use std::marker::PhantomData;

use num::traits::FloatConst;

use crate::traits::{Expansion, M2lOperator, Supported};
use crate::types::{Point, RealScalar};

/// Monopole and dipole moments `[q, p_x, p_y, p_z]`
pub type Laplace3dMultipole<T> = [T; 4];

/// Potential and gradient `[u, du/dx, du/dy, du/dz]`
pub type Laplace3dLocal<T> = [T; 4];

/// Monopole/dipole expansion of the 3D Laplace kernel
#[derive(Debug, Clone, Copy)]
pub struct Laplace3dExpansion<T> {
    _marker: PhantomData<T>,
}

impl<T: RealScalar + FloatConst> Default for Laplace3dExpansion<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealScalar + FloatConst> Laplace3dExpansion<T> {
    /// Create the expansion
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn scale() -> T {
        let four = T::one() + T::one() + T::one() + T::one();
        T::FRAC_1_PI() / four
    }

    /// Multipole expansion about `center` of point charges at `sources`.
    pub fn multipole(
        &self,
        center: &Point<T>,
        sources: &[Point<T>],
        charges: &[T],
    ) -> Laplace3dMultipole<T> {
        debug_assert_eq!(sources.len(), charges.len());

        let mut multipole = [T::zero(); 4];
        for (source, &charge) in sources.iter().zip(charges) {
            let d = *source - *center;
            multipole[0] = multipole[0] + charge;
            for i in 0..3 {
                multipole[i + 1] = multipole[i + 1] + charge * d[i];
            }
        }
        multipole
    }

    /// Evaluate a local expansion about `center` at `point`.
    pub fn evaluate(&self, local: &Laplace3dLocal<T>, center: &Point<T>, point: &Point<T>) -> T {
        let d = *point - *center;
        local[0] + local[1] * d[0] + local[2] * d[1] + local[3] * d[2]
    }

    /// Potential at `target` of point charges at `sources`, by direct summation.
    pub fn direct(&self, sources: &[Point<T>], charges: &[T], target: &Point<T>) -> T {
        sources
            .iter()
            .zip(charges)
            .fold(T::zero(), |acc, (source, &charge)| {
                acc + charge / (*target - *source).norm()
            })
            * Self::scale()
    }
}

impl<T: RealScalar + FloatConst> Expansion for Laplace3dExpansion<T> {
    type Multipole = Laplace3dMultipole<T>;
    type Local = Laplace3dLocal<T>;
    type Point = Point<T>;
    type M2l = Supported;
}

impl<T: RealScalar + FloatConst> M2lOperator for Laplace3dExpansion<T> {
    fn m2l(
        &self,
        source: &Laplace3dMultipole<T>,
        target: &mut Laplace3dLocal<T>,
        translation: &Point<T>,
    ) {
        let r2 = translation.dot(translation);
        debug_assert!(r2 > T::zero(), "M2L between coincident centres");

        let inv_r = r2.sqrt().recip();
        let inv_r3 = inv_r * inv_r * inv_r;
        let inv_r5 = inv_r3 * inv_r * inv_r;
        let three = T::one() + T::one() + T::one();

        let charge = source[0];
        let dipole = Point::new(source[1], source[2], source[3]);
        let p_dot_r = dipole.dot(translation);
        let scale = Self::scale();

        target[0] = target[0] + scale * (charge * inv_r + p_dot_r * inv_r3);
        for i in 0..3 {
            let gradient = -charge * translation[i] * inv_r3 + dipole[i] * inv_r3
                - three * p_dot_r * translation[i] * inv_r5;
            target[i + 1] = target[i + 1] + scale * gradient;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cluster(center: Point<f64>, n: usize, seed: u64) -> (Vec<Point<f64>>, Vec<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = (0..n)
            .map(|_| {
                center
                    + Point::new(
                        rng.gen_range(-0.05..0.05),
                        rng.gen_range(-0.05..0.05),
                        rng.gen_range(-0.05..0.05),
                    )
            })
            .collect();
        let charges = (0..n).map(|_| rng.gen_range(0.5..1.0)).collect();
        (points, charges)
    }

    #[test]
    fn test_m2l_matches_direct() {
        let expansion = Laplace3dExpansion::<f64>::new();
        let source_center = Point::new(0.0, 0.0, 0.0);
        let target_center = Point::new(4.0, 1.0, -2.0);
        let (sources, charges) = cluster(source_center, 20, 0);

        let multipole = expansion.multipole(&source_center, &sources, &charges);
        let mut local = [0.0; 4];
        expansion.m2l(&multipole, &mut local, &(target_center - source_center));

        let expected = expansion.direct(&sources, &charges, &target_center);
        assert_relative_eq!(
            expansion.evaluate(&local, &target_center, &target_center),
            expected,
            max_relative = 1e-3
        );

        let point = target_center + Point::new(0.05, 0.0, -0.05);
        let expected = expansion.direct(&sources, &charges, &point);
        assert_relative_eq!(
            expansion.evaluate(&local, &target_center, &point),
            expected,
            max_relative = 2e-3
        );
    }

    #[test]
    fn test_dipole_field() {
        let expansion = Laplace3dExpansion::<f64>::new();
        let mut local = [0.0; 4];
        expansion.m2l(
            &[0.0, 0.0, 0.0, 1.0],
            &mut local,
            &Point::new(0.0, 0.0, 2.0),
        );

        let scale = 0.25 / std::f64::consts::PI;
        assert_relative_eq!(local[0], 0.25 * scale, epsilon = 1e-14);
        assert_relative_eq!(local[1], 0.0, epsilon = 1e-14);
        assert_relative_eq!(local[2], 0.0, epsilon = 1e-14);
        assert_relative_eq!(local[3], -0.25 * scale, epsilon = 1e-14);
    }

    #[test]
    fn test_m2l_accumulates() {
        let expansion = Laplace3dExpansion::<f32>::new();
        let multipole = [1.0, 0.1, -0.2, 0.3];
        let translation = Point::new(3.0, 0.0, 4.0);

        let mut once = [0.0; 4];
        expansion.m2l(&multipole, &mut once, &translation);
        let mut twice = once;
        expansion.m2l(&multipole, &mut twice, &translation);

        for (a, b) in once.iter().zip(twice.iter()) {
            assert_relative_eq!(2.0 * a, *b, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_multipole_moments() {
        let expansion = Laplace3dExpansion::<f64>::new();
        let center = Point::new(1.0, 1.0, 1.0);
        let sources = vec![Point::new(1.5, 1.0, 1.0), Point::new(1.0, 0.0, 1.0)];
        let charges = vec![2.0, -1.0];

        let multipole = expansion.multipole(&center, &sources, &charges);
        assert_eq!(multipole, [1.0, 1.0, 1.0, 0.0]);
    }
}
