// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use log::{Level, LevelFilter};

use mandelflow::snapshot::write_image;
use mandelflow::terminal::{TerminalEvents, TerminalSurface, TitleDiagnostics};
use mandelflow::{FrameAggregator, LogDiagnostics, Pipeline};

const OUTPUT: &str = "output";
const HEADLESS: &str = "headless";
const VERBOSE: &str = "verbose";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandelflow")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Streaming Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Write the final frame to this file as a PGM"),
        )
        .arg(
            Arg::with_name(HEADLESS)
                .long(HEADLESS)
                .help("Render without a display and exit once every pixel is done"),
        )
        .arg(
            Arg::with_name(VERBOSE)
                .long(VERBOSE)
                .short("v")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .get_matches()
}

/// The pixel count is reported at info, so headless runs show it by
/// default; each `-v` raises the level by one step.
fn log_level(occurrences: u64, headless: bool) -> LevelFilter {
    let floor = if headless { Level::Info } else { Level::Warn };
    match (floor as u64) + occurrences {
        0 | 1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn interactive(pipeline: &Pipeline) -> mandelflow::Result<FrameAggregator> {
    let mut surface = TerminalSurface::open()?;
    pipeline.run(&mut surface, &mut TerminalEvents, &mut TitleDiagnostics)
}

fn main() {
    let matches = args();
    let headless = matches.is_present(HEADLESS);
    env_logger::Builder::new()
        .filter_level(log_level(matches.occurrences_of(VERBOSE), headless))
        .init();

    let pipeline = match Pipeline::standard() {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Could not set up the render: {}", e);
            std::process::exit(1);
        }
    };

    let rendered = if headless {
        pipeline.render(&mut LogDiagnostics)
    } else {
        interactive(&pipeline)
    };

    let frame = match rendered {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(outfile) = matches.value_of(OUTPUT) {
        if let Err(e) = write_image(outfile, frame.raster()) {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    }
}
