// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The presentation scheduler and the collaborators it talks to.
//!
//! Two periodic triggers share the control loop with the aggregator:
//! the refresh trigger polls control events and pushes the current
//! frame to the display, and the diagnostics trigger reports the
//! running pixel count.  Because both run on the thread that writes
//! the raster, a presented frame is never torn.

use log::info;
use std::time::Duration;

use crate::aggregator::FrameAggregator;
use crate::error::Result;

/// A surface that can show a full frame of 32-bit pixels.
pub trait Display {
    /// Replace the surface contents with `pixels`, `pitch` bytes per row.
    fn update(&mut self, pixels: &[u8], pitch: usize) -> Result<()>;

    /// Clear, composite the updated surface, and present it.
    fn present(&mut self) -> Result<()>;
}

/// Things the outside world can tell the control loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// The user asked to quit.
    Quit,
    /// A key was released.
    KeyRelease,
    /// Anything else; ignored.
    Other,
}

/// A queue of pending control events, drained on every refresh.
pub trait ControlSource {
    /// The next pending event, or None when the queue is empty.
    fn poll_event(&mut self) -> Result<Option<ControlEvent>>;
}

/// Somewhere to send the running pixel count.
pub trait DiagnosticsSink {
    /// Fire-and-forget report of the cumulative pixels processed.
    fn report(&mut self, pixels: u64);
}

/// Reports the pixel count through the log.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&mut self, pixels: u64) {
        info!("Pixels: {}", pixels);
    }
}

/// A display with nothing behind it.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn update(&mut self, _pixels: &[u8], _pitch: usize) -> Result<()> {
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Whether the control loop should keep going.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// The loop is servicing results and timers.
    Running,
    /// Terminal: the loop exits and releases the surface.
    Stopped,
}

/// The refresh cadence used by the standard render.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(50);

/// The diagnostics cadence used by the standard render.
pub const DIAGNOSTICS_INTERVAL: Duration = Duration::from_millis(1000);

/// Holds the two cadences and the running/stopped state.
#[derive(Debug, Clone)]
pub struct PresentationScheduler {
    /// How often the display is refreshed and control events polled.
    pub refresh_every: Duration,
    /// How often the pixel count is reported.
    pub report_every: Duration,
    state: State,
}

impl Default for PresentationScheduler {
    fn default() -> Self {
        PresentationScheduler::new(REFRESH_INTERVAL, DIAGNOSTICS_INTERVAL)
    }
}

impl PresentationScheduler {
    /// A scheduler in the running state.
    pub fn new(refresh_every: Duration, report_every: Duration) -> Self {
        PresentationScheduler {
            refresh_every,
            report_every,
            state: State::Running,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the loop should keep going.
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Feed one control event through the state machine.  Quit and
    /// key-release stop the loop; nothing restarts it.
    pub fn observe(&mut self, event: ControlEvent) -> State {
        match event {
            ControlEvent::Quit | ControlEvent::KeyRelease => {
                if self.state == State::Running {
                    info!("Stopping on {:?}", event);
                }
                self.state = State::Stopped;
            }
            ControlEvent::Other => {}
        }
        self.state
    }

    /// The refresh trigger: drain pending control events, then hand
    /// the current frame to the display.  The frame is presented even
    /// when this tick is the one that stops the loop.
    pub fn refresh<D, C>(
        &mut self,
        frame: &FrameAggregator,
        display: &mut D,
        control: &mut C,
    ) -> Result<State>
    where
        D: Display,
        C: ControlSource,
    {
        while let Some(event) = control.poll_event()? {
            self.observe(event);
        }
        let raster = frame.raster();
        display.update(raster.as_bytes(), raster.pitch())?;
        display.present()?;
        Ok(self.state)
    }

    /// The diagnostics trigger.
    pub fn report<R: DiagnosticsSink>(&self, frame: &FrameAggregator, sink: &mut R) {
        sink.report(frame.pixels_processed());
    }
}
