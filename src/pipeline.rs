// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Wires the generator, the worker pool and the aggregator together.
//!
//! ```text
//! generator --work--> worker x N --results--> control loop --> display
//! ```
//!
//! Both channels are zero-capacity: every send waits for a matching
//! receive, so a slow aggregator stalls the workers and a stalled
//! worker pool stalls the generator.  Completion and shutdown travel
//! the same channels by disconnection.  When the generator runs dry
//! it drops its sender, the workers drain and exit, and the result
//! channel disconnects.  When the control loop stops it drops the
//! result receiver, and the workers and generator fail their next
//! send and exit.  All threads are scoped and joined before a render
//! returns.

use crossbeam::channel::{self, Receiver};
use crossbeam::select;
use crossbeam::thread::ScopedJoinHandle;
use log::{debug, info};
use num::Complex;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::aggregator::FrameAggregator;
use crate::error::{Error, Result};
use crate::escape::ITERATIONS;
use crate::generator::generate;
use crate::planes::{PlaneMapper, Sample};
use crate::scheduler::{
    ControlSource, DiagnosticsSink, Display, PresentationScheduler, DIAGNOSTICS_INTERVAL,
    REFRESH_INTERVAL,
};
use crate::workers::spawn_workers;

/// Raster width of the standard render.
pub const WIDTH: usize = 800;

/// Raster height of the standard render.
pub const HEIGHT: usize = 600;

/// Top-left corner of the standard window.
pub const TOP_LEFT: Complex<f64> = Complex { re: -2.0, im: 1.0 };

/// Bottom-right corner of the standard window.
pub const BOTTOM_RIGHT: Complex<f64> = Complex { re: 1.0, im: -1.0 };

/// Everything needed to render one frame.  Fixed once a render starts.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Raster size and complex window.
    pub plane: PlaneMapper,
    /// Iteration cap per pixel.
    pub limit: usize,
    /// Number of workers.
    pub threads: usize,
    /// Display refresh and control polling cadence.
    pub refresh: Duration,
    /// Pixel count reporting cadence.
    pub diagnostics: Duration,
}

/// Wait for a render thread, turning a panic into an error.
fn joined<T>(handle: ScopedJoinHandle<'_, T>) -> Result<T> {
    handle.join().map_err(|_| Error::WorkerPanicked)
}

impl Pipeline {
    /// A pipeline over the given plane with the standard cadences.
    pub fn new(plane: PlaneMapper, limit: usize, threads: usize) -> Self {
        Pipeline {
            plane,
            limit,
            threads,
            refresh: REFRESH_INTERVAL,
            diagnostics: DIAGNOSTICS_INTERVAL,
        }
    }

    /// The standard render: 800x600 over (-2, 1) .. (1, -1), 10000
    /// iterations, one worker per CPU.
    pub fn standard() -> Result<Self> {
        let plane = PlaneMapper::new(WIDTH, HEIGHT, TOP_LEFT, BOTTOM_RIGHT)?;
        Ok(Pipeline::new(plane, ITERATIONS, num_cpus::get()))
    }

    /// Start the generator and the workers, hand the result channel to
    /// `consume` on the calling thread, then join everything.  A panic
    /// on any of these threads, the calling one included, comes back as
    /// `WorkerPanicked` once the rest have been joined.
    fn drive<T, F>(&self, consume: F) -> Result<T>
    where
        F: FnOnce(Receiver<Sample>) -> Result<T>,
    {
        let (work_tx, work_rx) = channel::bounded(0);
        let (result_tx, result_rx) = channel::bounded(0);
        let (width, height) = (self.plane.width(), self.plane.height());
        let plane = &self.plane;

        crossbeam::scope(|spawner| {
            let generator = spawner.spawn(move |_| generate(width, height, work_tx));
            let workers = spawn_workers(spawner, self.threads, plane, self.limit, work_rx, result_tx);

            // The receiver is dropped on the way out, panic or not, which
            // releases any worker blocked on a send.
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| consume(result_rx)))
                .map_err(|_| Error::WorkerPanicked);

            let generated = joined(generator)?;
            let mut delivered = 0;
            for worker in workers {
                delivered += joined(worker)?;
            }
            debug!("Generated {}, delivered {}", generated, delivered);
            outcome?
        })
        .map_err(|_| Error::WorkerPanicked)?
    }

    /// Run the interactive render: aggregate results as they arrive,
    /// refresh the display and poll for control events on one cadence,
    /// report the pixel count on another, and return the frame once a
    /// control event stops the loop.  Finishing the raster does not
    /// stop the loop; the frame stays up until asked to go.
    pub fn run<D, C, R>(
        &self,
        display: &mut D,
        control: &mut C,
        diagnostics: &mut R,
    ) -> Result<FrameAggregator>
    where
        D: Display,
        C: ControlSource,
        R: DiagnosticsSink,
    {
        let (width, height) = (self.plane.width(), self.plane.height());
        let mut scheduler = PresentationScheduler::new(self.refresh, self.diagnostics);

        self.drive(|mut results| {
            let mut frame = FrameAggregator::new(width, height);
            let refresh = channel::tick(scheduler.refresh_every);
            let report = channel::tick(scheduler.report_every);

            while scheduler.is_running() {
                let mut drained = false;
                select! {
                    recv(results) -> sample => match sample {
                        Ok(sample) => frame.absorb(sample)?,
                        Err(_) => drained = true,
                    },
                    recv(refresh) -> _ => {
                        scheduler.refresh(&frame, display, control)?;
                    },
                    recv(report) -> _ => scheduler.report(&frame, diagnostics),
                }
                if drained {
                    info!("Render complete: {} pixels", frame.pixels_processed());
                    results = channel::never();
                }
            }

            info!("Stopped after {} pixels", frame.pixels_processed());
            Ok(frame)
        })
    }

    /// Run the headless render: aggregate until every worker has
    /// finished, reporting the pixel count along the way and once more
    /// at the end, and return the finished frame.
    pub fn render<R: DiagnosticsSink>(&self, diagnostics: &mut R) -> Result<FrameAggregator> {
        let (width, height) = (self.plane.width(), self.plane.height());
        let cadence = self.diagnostics;

        self.drive(|results| {
            let mut frame = FrameAggregator::new(width, height);
            let report = channel::tick(cadence);

            let mut open = true;
            while open {
                select! {
                    recv(results) -> sample => match sample {
                        Ok(sample) => frame.absorb(sample)?,
                        Err(_) => open = false,
                    },
                    recv(report) -> _ => diagnostics.report(frame.pixels_processed()),
                }
            }

            diagnostics.report(frame.pixels_processed());
            Ok(frame)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::evaluate;
    use crate::generator::coordinates;
    use crate::scheduler::{ControlEvent, NullDisplay};

    struct QuitOnce(bool);

    impl ControlSource for QuitOnce {
        fn poll_event(&mut self) -> Result<Option<ControlEvent>> {
            if self.0 {
                return Ok(None);
            }
            self.0 = true;
            Ok(Some(ControlEvent::Quit))
        }
    }

    #[derive(Default)]
    struct Silent;

    impl DiagnosticsSink for Silent {
        fn report(&mut self, _pixels: u64) {}
    }

    fn small() -> Pipeline {
        let plane = PlaneMapper::new(4, 2, TOP_LEFT, BOTTOM_RIGHT).unwrap();
        let mut pipeline = Pipeline::new(plane, ITERATIONS, 3);
        pipeline.refresh = Duration::from_millis(1);
        pipeline.diagnostics = Duration::from_millis(5);
        pipeline
    }

    #[test]
    fn standard_pipeline_uses_the_fixed_parameters() {
        let pipeline = Pipeline::standard().unwrap();
        assert_eq!(pipeline.plane.width(), 800);
        assert_eq!(pipeline.plane.height(), 600);
        assert_eq!(pipeline.limit, 10_000);
        assert_eq!(pipeline.threads, num_cpus::get());
        assert_eq!(pipeline.refresh, Duration::from_millis(50));
        assert_eq!(pipeline.diagnostics, Duration::from_millis(1000));
    }

    #[test]
    fn render_drains_the_whole_raster() {
        let pipeline = small();
        let frame = pipeline.render(&mut Silent).unwrap();
        assert_eq!(frame.pixels_processed(), 8);
        assert_eq!(frame.raster().as_bytes().len(), 32);
        for c in coordinates(4, 2) {
            let shade = evaluate(pipeline.plane.pixel_to_point(&c));
            assert_eq!(frame.raster().pixel(&c), Some([shade, shade, shade, 255]));
        }
    }

    #[test]
    fn a_panicked_thread_joins_as_an_error() {
        let joined = crossbeam::scope(|spawner| {
            let handle = spawner.spawn(|_| -> usize { panic!("worker lost") });
            joined(handle)
        })
        .unwrap();
        match joined {
            Err(Error::WorkerPanicked) => {}
            other => panic!("expected WorkerPanicked, got {:?}", other),
        }
    }

    #[test]
    fn a_panicking_consumer_still_joins_the_workers() {
        let plane = PlaneMapper::new(40, 30, TOP_LEFT, BOTTOM_RIGHT).unwrap();
        let pipeline = Pipeline::new(plane, 100, 3);
        let outcome: Result<()> = pipeline.drive(|results| {
            let _ = results.recv();
            panic!("consumer lost");
        });
        match outcome {
            Err(Error::WorkerPanicked) => {}
            other => panic!("expected WorkerPanicked, got {:?}", other),
        }
    }

    #[test]
    fn run_stops_on_quit_and_joins_the_threads() {
        let pipeline = small();
        let frame = pipeline
            .run(&mut NullDisplay, &mut QuitOnce(false), &mut Silent)
            .unwrap();
        assert!(frame.pixels_processed() <= 8);
    }
}
