// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a window on the complex plane given by its top-left and
//! bottom-right corners.  Also holds the two values that travel down
//! the pipeline: the Coordinate a worker is asked about and the
//! Sample it answers with.
use num::Complex;

use crate::error::{Error, Result};

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the top-left and bottom-right corners of the window on
/// the complex plane, treating the real part of each value as the
/// x-component and the imaginary part as the y-component.  The
/// y-axis runs downward on the raster, so the imaginary part usually
/// shrinks from the first corner to the second.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// The x, y of a pixel on the raster.  One unit of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Column, `0 <= x < width`.
    pub x: usize,
    /// Row, `0 <= y < height`.
    pub y: usize,
}

impl Coordinate {
    /// Builds a coordinate.
    pub fn new(x: usize, y: usize) -> Self {
        Coordinate { x, y }
    }

    /// Attach a computed color, producing the result of this unit of work.
    pub fn with_color(self, color: u8) -> Sample {
        Sample {
            coordinate: self,
            color,
        }
    }
}

/// A coordinate together with the gray level computed for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    /// Where the sample belongs.
    pub coordinate: Coordinate,
    /// The escape-time color, 0 to 255.
    pub color: u8,
}

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a window onto the complex plane.  Maps pixels from the
/// former to points on the latter via a per-axis scale.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The size of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// The two corners of the complex window, top-left and bottom-right.
    pub complex_plane: ComplexPlane,
    // How far one pixel steps along each axis of the complex plane.
    scale: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the raster size and the two corners of the
    /// complex window.  A zero-sized raster or a window collapsed
    /// along either axis is rejected.
    pub fn new(
        width: usize,
        height: usize,
        topleft: Complex<f64>,
        bottomright: Complex<f64>,
    ) -> Result<PlaneMapper> {
        if width == 0 || height == 0 {
            return Err(Error::Plane(format!(
                "the raster must not be empty, got {}x{}",
                width, height
            )));
        }

        let delta = bottomright - topleft;
        if !(delta.re.is_finite() && delta.im.is_finite()) || delta.re == 0.0 || delta.im == 0.0 {
            return Err(Error::Plane(format!(
                "the window {} .. {} has no area",
                topleft, bottomright
            )));
        }

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(topleft, bottomright),
            scale: (delta.re / (width as f64), delta.im / (height as f64)),
        })
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// corresponding point on the complex plane: `scale * (x, y) + topleft`.
    pub fn pixel_to_point(&self, coordinate: &Coordinate) -> Complex<f64> {
        Complex::new(
            self.scale.0 * (coordinate.x as f64) + self.complex_plane.0.re,
            self.scale.1 * (coordinate.y as f64) + self.complex_plane.0.im,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_empty_raster() {
        let pm = PlaneMapper::new(0, 4, Complex::new(-2.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 0, Complex::new(-2.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_fails_on_flat_window() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, 1.0));
        assert!(pm.is_err());
        let pm = PlaneMapper::new(4, 4, Complex::new(1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_accepts_downward_imaginary_axis() {
        let pm = PlaneMapper::new(800, 600, Complex::new(-2.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_ok());
        let pm = pm.unwrap();
        assert_eq!((pm.width(), pm.height()), (800, 600));
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = PlaneMapper::new(5, 5, Complex::new(0.0, 0.0), Complex::new(5.0, 5.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Coordinate::new(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Coordinate::new(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Coordinate::new(4, 4)), Complex::new(4.0, 4.0));
    }

    #[test]
    fn pixel_to_point_on_the_standard_window() {
        let pm = PlaneMapper::new(4, 2, Complex::new(-2.0, 1.0), Complex::new(1.0, -1.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Coordinate::new(0, 0)), Complex::new(-2.0, 1.0));
        assert_eq!(pm.pixel_to_point(&Coordinate::new(2, 1)), Complex::new(-0.5, 0.0));
        assert_eq!(pm.pixel_to_point(&Coordinate::new(3, 1)), Complex::new(0.25, 0.0));
    }

    #[test]
    fn coordinates_carry_their_color() {
        let sample = Coordinate::new(3, 1).with_color(42);
        assert_eq!(sample.coordinate, Coordinate::new(3, 1));
        assert_eq!(sample.color, 42);
    }
}
