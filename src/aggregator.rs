// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame aggregator: the single consumer of finished samples and
//! the only writer of the raster.  It runs on the control thread, so
//! the raster needs no lock.

use log::trace;

use crate::error::Result;
use crate::planes::Sample;
use crate::raster::RasterBuffer;

/// Owns the raster and the running pixel count.
#[derive(Debug, Clone)]
pub struct FrameAggregator {
    raster: RasterBuffer,
    processed: u64,
}

impl FrameAggregator {
    /// An empty frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        FrameAggregator {
            raster: RasterBuffer::new(width, height),
            processed: 0,
        }
    }

    /// Write a sample into the raster at its own offset and count it.
    /// Arrival order is irrelevant; samples carry their coordinate.
    pub fn absorb(&mut self, sample: Sample) -> Result<()> {
        let offset = self.raster.write(&sample)?;
        trace!("Result: {:?}. Offset: {}", sample, offset);
        self.processed += 1;
        Ok(())
    }

    /// The number of samples absorbed so far.  Never decreases.
    pub fn pixels_processed(&self) -> u64 {
        self.processed
    }

    /// Whether every pixel has been seen at least once by count.
    pub fn is_complete(&self) -> bool {
        self.processed >= (self.raster.width() * self.raster.height()) as u64
    }

    /// Read-only view of the frame.
    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }
}
