// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The worker pool.  Each worker pulls one coordinate at a time off
//! the shared work channel, maps it onto the complex plane, runs the
//! escape-time evaluator, and passes the colored sample on.  Workers
//! share nothing but the two channels.

use crossbeam::channel::{Receiver, Sender};
use crossbeam::thread::{Scope, ScopedJoinHandle};
use log::debug;

use crate::escape::evaluate_with_limit;
use crate::planes::{Coordinate, PlaneMapper, Sample};

/// Run a single worker until either channel is closed: the work
/// channel when the generator has nothing left to give, the result
/// channel when the aggregator has stopped listening.  Returns the
/// number of samples delivered.
pub fn worker(
    id: usize,
    plane: &PlaneMapper,
    limit: usize,
    work: Receiver<Coordinate>,
    results: Sender<Sample>,
) -> usize {
    debug!("Worker {} start rendering, window: {:?}", id, plane.complex_plane);
    let mut delivered = 0;
    for coordinate in work.iter() {
        let color = evaluate_with_limit(plane.pixel_to_point(&coordinate), limit);
        if results.send(coordinate.with_color(color)).is_err() {
            debug!("Worker {} has no one to deliver to", id);
            break;
        }
        delivered += 1;
    }
    debug!("Worker {} stop rendering after {} samples", id, delivered);
    delivered
}

/// Spawn `threads` workers on the scope, each with its own handle on
/// the two channels.  The caller's copies of the channels are
/// consumed, so once the returned workers exit the result channel
/// disconnects.
pub fn spawn_workers<'env, 'scope>(
    spawner: &'scope Scope<'env>,
    threads: usize,
    plane: &'env PlaneMapper,
    limit: usize,
    work: Receiver<Coordinate>,
    results: Sender<Sample>,
) -> Vec<ScopedJoinHandle<'scope, usize>> {
    (0..threads.max(1))
        .map(|id| {
            let work = work.clone();
            let results = results.clone();
            spawner.spawn(move |_| worker(id, plane, limit, work, results))
        })
        .collect()
}
