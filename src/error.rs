// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by the whole crate.  The rendering hot path
//! never fails; everything here is about acquiring and driving the
//! collaborators around it.

use failure::Fail;
use std::io;

/// Everything that can go wrong while setting up or presenting a
/// render.
#[derive(Debug, Fail)]
pub enum Error {
    /// The plane window or the raster could not be constructed.
    #[fail(display = "invalid plane: {}", _0)]
    Plane(String),

    /// A sample landed outside the raster.
    #[fail(display = "pixel ({}, {}) is outside the raster", x, y)]
    OutOfBounds {
        /// Column of the offending sample.
        x: usize,
        /// Row of the offending sample.
        y: usize,
    },

    /// The presentation surface could not be acquired or written.
    #[fail(display = "display surface failure: {}", _0)]
    Surface(#[fail(cause)] io::Error),

    /// The final frame could not be written to disk.
    #[fail(display = "could not write snapshot: {}", _0)]
    Snapshot(#[fail(cause)] io::Error),

    /// One of the generator or worker threads panicked.
    #[fail(display = "a render thread panicked")]
    WorkerPanicked,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Surface(err)
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
