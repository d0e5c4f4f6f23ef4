//! Bounded-concurrency aggregation of the Dedekind sum. Each antichain of
//! the base lattice yields one independent term; a fixed worker pool
//! evaluates terms as they stream out of the interval iterator and folds
//! them into a shared accumulator. The bounded channel doubles as the
//! admission gate, so at most one term per worker waits in flight.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

use crate::algebra::antichain::AntiChain;
use crate::algebra::set::{SetError, SmallSet};
use crate::classes::class_representatives;
use crate::interval::AntiChainInterval;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool has shut down")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum DedekindError {
    #[error("universe capacity exceeded: {0}")]
    Capacity(#[from] SetError),
    #[error("aggregation failed: {0}")]
    Pool(#[from] PoolError),
}

type Term = Box<dyn FnOnce() -> BigUint + Send + 'static>;

#[derive(Default)]
struct Accumulator {
    total: BigUint,
    evaluations: u64,
    busy: Duration,
}

/// Final tally of a drained pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub total: BigUint,
    pub evaluations: u64,
    /// Wall time the workers spent inside terms, summed across threads.
    pub busy: Duration,
    /// Pool size the run used.
    pub workers: usize,
}

/// Fixed pool of worker threads summing big-integer terms.
///
/// `submit` blocks once every worker is busy and the channel is full, which
/// keeps the producer from racing ahead of evaluation. `drain` closes the
/// channel, waits for the workers, and returns the totals.
pub struct TermPool {
    sender: Option<SyncSender<Term>>,
    workers: Vec<JoinHandle<()>>,
    shared: Arc<Mutex<Accumulator>>,
    size: usize,
}

impl TermPool {
    pub fn with_workers(count: usize) -> TermPool {
        let count = count.max(1);
        let (sender, receiver) = mpsc::sync_channel::<Term>(count);
        let receiver = Arc::new(Mutex::new(receiver));
        let shared = Arc::new(Mutex::new(Accumulator::default()));
        let workers = (0..count)
            .map(|_| {
                let receiver = Arc::clone(&receiver);
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(&receiver, &shared))
            })
            .collect();
        TermPool {
            sender: Some(sender),
            workers,
            shared,
            size: count,
        }
    }

    /// Queue a term for evaluation, blocking while the pool is saturated.
    pub fn submit(
        &self,
        term: impl FnOnce() -> BigUint + Send + 'static,
    ) -> Result<(), PoolError> {
        let sender = self.sender.as_ref().ok_or(PoolError::Disconnected)?;
        sender
            .send(Box::new(term))
            .map_err(|_| PoolError::Disconnected)
    }

    /// Close the queue, wait for in-flight terms, and return the totals.
    pub fn drain(mut self) -> Totals {
        let workers = self.size;
        self.shutdown();
        let acc = self.shared.lock().expect("accumulator mutex poisoned");
        Totals {
            total: acc.total.clone(),
            evaluations: acc.evaluations,
            busy: acc.busy,
            workers,
        }
    }

    fn shutdown(&mut self) {
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("term worker panicked");
            }
        }
    }
}

impl Drop for TermPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: &Mutex<Receiver<Term>>, shared: &Mutex<Accumulator>) {
    loop {
        // The receive lock is released before the term runs.
        let term = match receiver.lock().expect("receiver mutex poisoned").recv() {
            Ok(term) => term,
            Err(_) => return,
        };
        let start = Instant::now();
        let value = term();
        let elapsed = start.elapsed();
        let mut acc = shared.lock().expect("accumulator mutex poisoned");
        acc.total += value;
        acc.evaluations += 1;
        acc.busy += elapsed;
    }
}

/// `2^c` where `c` counts the connected components of the members of `f`
/// outside `r`, joined when their intersection reaches above `r`. Zero when
/// `r` is not below `f`, one when they coincide.
pub fn pair_coefficient(r: &AntiChain, f: &AntiChain) -> BigUint {
    if r == f {
        return BigUint::one();
    }
    if !r.le(f) {
        return BigUint::zero();
    }
    let vertices: Vec<SmallSet> = f
        .members()
        .filter(|m| !r.contains_member(*m))
        .collect();
    let mut assigned = vec![usize::MAX; vertices.len()];
    let mut components = 0usize;
    for start in 0..vertices.len() {
        if assigned[start] != usize::MAX {
            continue;
        }
        components += 1;
        let mut stack = vec![start];
        assigned[start] = components;
        while let Some(i) = stack.pop() {
            for j in 0..vertices.len() {
                if assigned[j] == usize::MAX
                    && !r.dominates(vertices[i].intersection(vertices[j]))
                {
                    assigned[j] = components;
                    stack.push(j);
                }
            }
        }
    }
    BigUint::one() << components
}

struct TermContext {
    /// Representative, orbit size, and `|[⊥, R]|` per equivalence class.
    reps: Vec<(AntiChain, u64, BigUint)>,
    top: AntiChain,
}

fn evaluate_term(ctx: &TermContext, f: &AntiChain) -> BigUint {
    let above = AntiChainInterval::closed(f.clone(), ctx.top.clone()).size();
    let mut inner = BigUint::zero();
    for (r, mult, below) in &ctx.reps {
        if !r.le(f) {
            continue;
        }
        inner += below * *mult * pair_coefficient(r, f);
    }
    above * inner
}

/// The `n`-th Dedekind number.
///
/// For `n ≥ 2` the sum runs over the lattice on `n − 2` elements, with the
/// inner sum collapsed to equivalence-class representatives. Smaller `n`
/// fall back to counting the full lattice directly.
pub fn dedekind(n: u8, workers: usize) -> Result<BigUint, DedekindError> {
    let span = tracing::info_span!("dedekind", n, workers);
    let _guard = span.enter();
    if n < 2 {
        let u = SmallSet::universe(n)?;
        let full = AntiChainInterval::closed(
            AntiChain::empty(u),
            AntiChain::universe_function(u),
        );
        return Ok(full.size());
    }
    let base = n - 2;
    let universe = SmallSet::universe(base)?;
    let bottom = AntiChain::empty(universe);
    let top = AntiChain::universe_function(universe);
    let levels = class_representatives(base)?;
    let reps = levels
        .last()
        .map(|level| {
            level
                .iter()
                .map(|(r, mult)| {
                    let r = r.with_universe(universe);
                    let below =
                        AntiChainInterval::closed(bottom.clone(), r.clone()).size();
                    (r, *mult, below)
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    tracing::debug!(classes = reps.len(), "class representatives prepared");
    let context = Arc::new(TermContext {
        reps,
        top: top.clone(),
    });
    let pool = TermPool::with_workers(workers);
    for f in AntiChainInterval::closed(bottom, top).fast_iter() {
        let ctx = Arc::clone(&context);
        pool.submit(move || evaluate_term(&ctx, &f))?;
    }
    let totals = pool.drain();
    tracing::info!(
        evaluations = totals.evaluations,
        busy_ms = totals.busy.as_millis() as u64,
        "aggregation complete"
    );
    Ok(totals.total)
}
