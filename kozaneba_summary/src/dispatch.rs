// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background summarization on a fixed pool of worker threads.
//!
//! Jobs travel to the workers over one shared channel and completions come
//! back over another. The frame loop polls completions with
//! [`SummaryDispatcher::drain`], which never blocks; offline callers use
//! [`SummaryDispatcher::wait_all`]. Completions arrive in whatever order the
//! workers finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::SummaryProvider;

/// A finished summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryDone<K> {
    /// Caller-chosen key, typically a cluster id.
    pub key: K,
    /// Generation the job was submitted under.
    pub generation: u64,
    /// The summary text.
    pub summary: String,
}

struct Job<K> {
    key: K,
    generation: u64,
    texts: Vec<String>,
}

impl<K> Job<K> {
    fn run(self, provider: &SummaryProvider) -> SummaryDone<K> {
        SummaryDone {
            summary: provider.summarize(&self.texts),
            key: self.key,
            generation: self.generation,
        }
    }
}

/// Runs [`SummaryProvider::summarize`] for submitted jobs on worker threads.
///
/// Dropping the dispatcher closes the job channel, drops the jobs no worker
/// has started yet and joins the workers once their current job returns.
pub struct SummaryDispatcher<K: Send + 'static> {
    provider: Arc<SummaryProvider>,
    jobs: Option<Sender<Job<K>>>,
    done_tx: Sender<SummaryDone<K>>,
    done_rx: Receiver<SummaryDone<K>>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    in_flight: usize,
}

impl<K: Send + 'static> SummaryDispatcher<K> {
    /// Starts `workers` threads (at least one) sharing `provider`.
    ///
    /// If no thread can be spawned, jobs run inline in
    /// [`submit`](Self::submit).
    pub fn new(provider: Arc<SummaryProvider>, workers: usize) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job<K>>();
        let (done_tx, done_rx) = mpsc::channel();
        let jobs_rx = Arc::new(Mutex::new(jobs_rx));
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::new();
        for index in 0..workers.max(1) {
            let jobs_rx = Arc::clone(&jobs_rx);
            let done_tx = done_tx.clone();
            let provider = Arc::clone(&provider);
            let shutdown = Arc::clone(&shutdown);
            let spawned = thread::Builder::new()
                .name(format!("kozaneba-summary-{index}"))
                .spawn(move || worker_loop(&jobs_rx, &done_tx, &provider, &shutdown));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => tracing::warn!(error = %err, "could not spawn summary worker"),
            }
        }
        tracing::debug!(workers = handles.len(), "summary dispatcher started");

        Self {
            provider,
            jobs: (!handles.is_empty()).then_some(jobs_tx),
            done_tx,
            done_rx,
            workers: handles,
            shutdown,
            in_flight: 0,
        }
    }

    /// Queues a summary of `texts` under `key` and `generation`.
    pub fn submit(&mut self, key: K, generation: u64, texts: Vec<String>) {
        let job = Job {
            key,
            generation,
            texts,
        };
        self.in_flight += 1;
        let job = match &self.jobs {
            Some(jobs) => match jobs.send(job) {
                Ok(()) => return,
                Err(mpsc::SendError(job)) => job,
            },
            None => job,
        };
        // Every worker is gone; finish the job here so it is still delivered.
        let done = job.run(&self.provider);
        let _ = self.done_tx.send(done);
    }

    /// Number of submitted jobs whose completion has not been returned yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Returns the completions that are ready, without blocking.
    pub fn drain(&mut self) -> Vec<SummaryDone<K>> {
        let mut done = Vec::new();
        while let Ok(item) = self.done_rx.try_recv() {
            done.push(item);
        }
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Blocks until every submitted job has completed and returns them.
    pub fn wait_all(&mut self) -> Vec<SummaryDone<K>> {
        let mut done = Vec::with_capacity(self.in_flight);
        while done.len() < self.in_flight {
            match self.done_rx.recv() {
                Ok(item) => done.push(item),
                Err(_) => break,
            }
        }
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }
}

fn worker_loop<K>(
    jobs: &Mutex<Receiver<Job<K>>>,
    done: &Sender<SummaryDone<K>>,
    provider: &SummaryProvider,
    shutdown: &AtomicBool,
) {
    loop {
        let next = match jobs.lock() {
            Ok(receiver) => receiver.recv(),
            Err(_) => return,
        };
        let Ok(job) = next else {
            return;
        };
        if shutdown.load(Ordering::Acquire) {
            return;
        }
        if done.send(job.run(provider)).is_err() {
            return;
        }
    }
}

impl<K: Send + 'static> std::fmt::Debug for SummaryDispatcher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryDispatcher")
            .field("provider", &self.provider)
            .field("workers", &self.workers.len())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<K: Send + 'static> Drop for SummaryDispatcher<K> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        self.jobs = None;
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use super::SummaryDispatcher;
    use crate::{Result, Summarizer, SummaryProvider, local_summary};

    struct Panicking;

    impl Summarizer for Panicking {
        fn summarize(&self, _texts: &[String]) -> Result<String> {
            panic!("summarizer exploded");
        }
    }

    struct Slow(Arc<AtomicUsize>);

    impl Summarizer for Slow {
        fn summarize(&self, texts: &[String]) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
            Ok(texts.join(" "))
        }
    }

    #[test]
    fn wait_all_returns_every_job() {
        let mut dispatcher = SummaryDispatcher::new(Arc::new(SummaryProvider::local()), 3);
        for key in 0..10_u32 {
            dispatcher.submit(key, 7, vec![format!("text number {key}.")]);
        }
        assert_eq!(dispatcher.pending(), 10);
        let mut done = dispatcher.wait_all();
        assert_eq!(dispatcher.pending(), 0);
        done.sort_by_key(|d| d.key);
        assert_eq!(done.len(), 10);
        for (key, item) in (0..10_u32).zip(&done) {
            assert_eq!(item.key, key);
            assert_eq!(item.generation, 7);
            assert_eq!(item.summary, local_summary(&[format!("text number {key}.")]));
        }
    }

    #[test]
    fn drain_on_idle_dispatcher_is_empty() {
        let mut dispatcher: SummaryDispatcher<u32> =
            SummaryDispatcher::new(Arc::new(SummaryProvider::local()), 1);
        assert!(dispatcher.drain().is_empty());
        assert!(dispatcher.wait_all().is_empty());
    }

    #[test]
    fn zero_workers_still_gets_one() {
        let mut dispatcher = SummaryDispatcher::new(Arc::new(SummaryProvider::local()), 0);
        dispatcher.submit("a", 1, vec!["x".to_string()]);
        assert_eq!(dispatcher.wait_all().len(), 1);
    }

    #[test]
    fn panicking_summarizer_still_completes() {
        let provider = Arc::new(SummaryProvider::with_external(Panicking));
        let mut dispatcher = SummaryDispatcher::new(provider, 1);
        dispatcher.submit(1_u32, 1, vec!["Roads. Bridges.".to_string()]);
        dispatcher.submit(2_u32, 1, vec!["Parks.".to_string()]);

        let mut done = dispatcher.wait_all();
        done.sort_by_key(|d| d.key);
        assert_eq!(dispatcher.pending(), 0);
        assert_eq!(done.len(), 2);
        assert_eq!(done[0].summary, local_summary(&["Roads. Bridges.".to_string()]));
    }

    #[test]
    fn drop_skips_jobs_not_yet_started() {
        let started = Arc::new(AtomicUsize::new(0));
        let provider = Arc::new(SummaryProvider::with_external(Slow(Arc::clone(&started))));
        let mut dispatcher = SummaryDispatcher::new(provider, 1);
        for key in 0..10_u32 {
            dispatcher.submit(key, 1, vec![format!("job {key}")]);
        }
        // Let the worker pick up its first job.
        while started.load(Ordering::SeqCst) == 0 {
            std::thread::yield_now();
        }

        let begin = Instant::now();
        drop(dispatcher);
        assert!(begin.elapsed() < Duration::from_millis(1500));
        assert!(started.load(Ordering::SeqCst) < 10);
    }
}
