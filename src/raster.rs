// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The raster buffer: one 4-byte pixel per coordinate, laid out
//! row-major with a pitch of `width * 4`, in blue-green-red-alpha
//! byte order.

use crate::error::{Error, Result};
use crate::planes::{Coordinate, Sample};

/// Bytes per pixel in the raster.
pub const BYTES_PER_PIXEL: usize = 4;

/// A fixed-size pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    pitch: usize,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// A fully transparent black raster.
    pub fn new(width: usize, height: usize) -> Self {
        let pitch = width * BYTES_PER_PIXEL;
        RasterBuffer {
            width,
            height,
            pitch,
            pixels: vec![0_u8; pitch * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// The raw bytes, suitable for a streaming texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// The byte offset of a pixel, or None when it falls outside the
    /// raster.
    pub fn offset(&self, coordinate: &Coordinate) -> Option<usize> {
        if coordinate.x < self.width && coordinate.y < self.height {
            Some(self.pitch * coordinate.y + coordinate.x * BYTES_PER_PIXEL)
        } else {
            None
        }
    }

    /// Write a sample as an opaque gray pixel.
    pub fn write(&mut self, sample: &Sample) -> Result<usize> {
        let Coordinate { x, y } = sample.coordinate;
        let offset = self.offset(&sample.coordinate).ok_or(Error::OutOfBounds { x, y })?;
        let c = sample.color;
        self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&[c, c, c, 255]);
        Ok(offset)
    }

    /// The pixel at a coordinate, if it is on the raster.
    pub fn pixel(&self, coordinate: &Coordinate) -> Option<[u8; 4]> {
        self.offset(coordinate).map(|o| {
            let mut px = [0_u8; 4];
            px.copy_from_slice(&self.pixels[o..o + BYTES_PER_PIXEL]);
            px
        })
    }

    /// One byte per pixel: the blue channel, which equals the gray
    /// level for everything the aggregator writes.
    pub fn to_gray(&self) -> Vec<u8> {
        self.pixels.chunks(BYTES_PER_PIXEL).map(|px| px[0]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_the_pitch() {
        let raster = RasterBuffer::new(4, 2);
        assert_eq!(raster.pitch(), 16);
        assert_eq!(raster.as_bytes().len(), 32);
        assert_eq!(raster.offset(&Coordinate::new(0, 0)), Some(0));
        assert_eq!(raster.offset(&Coordinate::new(3, 0)), Some(12));
        assert_eq!(raster.offset(&Coordinate::new(1, 1)), Some(20));
        assert_eq!(raster.offset(&Coordinate::new(4, 0)), None);
        assert_eq!(raster.offset(&Coordinate::new(0, 2)), None);
    }

    #[test]
    fn write_lays_down_opaque_gray() {
        let mut raster = RasterBuffer::new(4, 2);
        let offset = raster.write(&Coordinate::new(2, 1).with_color(9)).unwrap();
        assert_eq!(offset, 24);
        assert_eq!(&raster.as_bytes()[24..28], &[9, 9, 9, 255]);
        assert_eq!(raster.pixel(&Coordinate::new(2, 1)), Some([9, 9, 9, 255]));
        assert_eq!(raster.pixel(&Coordinate::new(1, 1)), Some([0, 0, 0, 0]));
    }

    #[test]
    fn write_refuses_to_leave_the_buffer() {
        let mut raster = RasterBuffer::new(4, 2);
        match raster.write(&Coordinate::new(4, 1).with_color(1)) {
            Err(Error::OutOfBounds { x: 4, y: 1 }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(raster.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn to_gray_takes_one_channel() {
        let mut raster = RasterBuffer::new(2, 1);
        raster.write(&Coordinate::new(1, 0).with_color(200)).unwrap();
        assert_eq!(raster.to_gray(), vec![0, 200]);
    }
}
