// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  Pure functions of a point on the
//! complex plane; no state, no failure modes.

use num::Complex;

/// The iteration cap used by the standard render.
pub const ITERATIONS: usize = 10_000;

/// The iteration stops once the modulus reaches this value.  Note
/// that this is compared against |z|, not |z|², so the escape radius
/// is effectively 4 rather than the textbook 2.  Renders depend on
/// the exact boundary, so it stays.
pub const ESCAPE_MODULUS: f64 = 4.0;

/// This is our classic iterator function: iterate `z = z² + c` from
/// zero and count how many iterations run before the modulus reaches
/// `ESCAPE_MODULUS` or the limit is hit.  The count includes the
/// iteration that escaped, so a point that is already far outside
/// returns 1.
pub fn escape_count(point: Complex<f64>, limit: usize) -> usize {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    let mut modulus = 0.0_f64;
    let mut n = 0;
    while n < limit && modulus < ESCAPE_MODULUS {
        z = z * z + point;
        modulus = z.norm();
        n += 1;
    }
    n
}

/// Scale an iteration count onto a gray level: 0 for points that
/// leave at once, 255 for points that never leave within the limit.
pub fn shade(count: usize, limit: usize) -> u8 {
    if limit == 0 {
        return 0;
    }
    ((count * 255) / limit) as u8
}

/// Evaluate a point with an explicit iteration limit.
pub fn evaluate_with_limit(point: Complex<f64>, limit: usize) -> u8 {
    shade(escape_count(point, limit), limit)
}

/// Evaluate a point with the standard iteration cap.
pub fn evaluate(point: Complex<f64>) -> u8 {
    evaluate_with_limit(point, ITERATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_count(Complex::new(0.0, 0.0), ITERATIONS), ITERATIONS);
        assert_eq!(evaluate(Complex::new(0.0, 0.0)), 255);
    }

    #[test]
    fn far_points_escape_on_the_first_iteration() {
        assert_eq!(escape_count(Complex::new(3.0, 3.0), ITERATIONS), 1);
        assert_eq!(evaluate(Complex::new(3.0, 3.0)), 0);
    }

    #[test]
    fn escape_radius_is_four_on_the_modulus() {
        // |3| < 4 keeps going: z = 3, 12.
        assert_eq!(escape_count(Complex::new(3.0, 0.0), ITERATIONS), 2);
        // The textbook |z|² test would stop here after one step.
        assert_eq!(escape_count(Complex::new(2.5, 0.0), ITERATIONS), 2);
        assert_eq!(escape_count(Complex::new(4.0, 0.0), ITERATIONS), 1);
    }

    #[test]
    fn periodic_points_reach_the_cap() {
        assert_eq!(evaluate(Complex::new(-1.0, 0.0)), 255);
        assert_eq!(evaluate(Complex::new(-2.0, 0.0)), 255);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let c = Complex::new(-0.743_643_887, 0.131_825_904);
        assert_eq!(evaluate(c), evaluate(c));
        assert_eq!(escape_count(c, 500), escape_count(c, 500));
    }

    #[test]
    fn shade_scales_integer_counts() {
        assert_eq!(shade(0, ITERATIONS), 0);
        assert_eq!(shade(39, ITERATIONS), 0);
        assert_eq!(shade(40, ITERATIONS), 1);
        assert_eq!(shade(ITERATIONS, ITERATIONS), 255);
        assert_eq!(shade(5, 10), 127);
        assert_eq!(shade(3, 0), 0);
    }

    #[test]
    fn limit_bounds_the_count() {
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 7), 7);
        assert_eq!(evaluate_with_limit(Complex::new(0.0, 0.0), 7), 255);
    }
}
