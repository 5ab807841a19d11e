// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The coordinate generator: walks the raster once, row by row, and
//! hands each pixel to whichever worker is ready for it.

use crossbeam::channel::Sender;
use itertools::iproduct;
use log::debug;

use crate::planes::Coordinate;

/// Every coordinate of a `width` x `height` raster exactly once, in
/// row-major order (y outer, x inner).
pub fn coordinates(width: usize, height: usize) -> impl Iterator<Item = Coordinate> {
    iproduct!(0..height, 0..width).map(|(y, x)| Coordinate::new(x, y))
}

/// Publish every coordinate of the raster to `work`.  Each send
/// blocks until a worker takes the coordinate, which is the only
/// thing stopping generation from running ahead of computation.
///
/// Returns the number of coordinates handed off.  The sender is
/// dropped on return, which is how the workers learn the raster is
/// exhausted.  If every worker has already gone away the walk stops
/// early.
pub fn generate(width: usize, height: usize, work: Sender<Coordinate>) -> usize {
    debug!("Generating input. W: {}, H: {}", width, height);
    let mut sent = 0;
    for coordinate in coordinates(width, height) {
        if work.send(coordinate).is_err() {
            debug!("Generation abandoned after {} coordinates", sent);
            return sent;
        }
        sent += 1;
    }
    debug!("Generation complete");
    sent
}
