#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Streaming Mandelbrot renderer
//!
//! The Mandelbrot takes a point on the complex plane and repeatedly
//! squares it and adds the original point back in, measuring how
//! quickly that number runs off to infinity.  That "velocity" is the
//! gray level of the pixel.  Points that never leave are white.
//!
//! Rather than render the frame in one go, this crate streams it.  A
//! generator walks the raster one pixel at a time, a pool of workers
//! evaluates the pixels in parallel, and a single control loop writes
//! each finished pixel into the frame at its own offset while
//! refreshing a display and reporting progress on fixed cadences.
//! The three stages talk only over zero-capacity channels, so each
//! stage can get no further ahead of the next than one hand-off.

pub mod aggregator;
pub mod error;
pub mod escape;
pub mod generator;
pub mod pipeline;
pub mod planes;
pub mod raster;
pub mod scheduler;
pub mod snapshot;
pub mod terminal;
pub mod workers;

pub use aggregator::FrameAggregator;
pub use error::{Error, Result};
pub use escape::{evaluate, ITERATIONS};
pub use pipeline::{Pipeline, BOTTOM_RIGHT, HEIGHT, TOP_LEFT, WIDTH};
pub use planes::{Coordinate, PlaneMapper, Sample};
pub use raster::RasterBuffer;
pub use scheduler::{
    ControlEvent, ControlSource, DiagnosticsSink, Display, LogDiagnostics, NullDisplay,
    PresentationScheduler, State, DIAGNOSTICS_INTERVAL, REFRESH_INTERVAL,
};
