//! Solve-or-Cache Orchestration
//!
//! Turns a raw request into a reply, computing each distinct problem at most
//! once at a time.
//!
//! ## Flow
//! 1. **Parse**: Lines become a validated `SearchProblem` plus its `Fingerprint`.
//! 2. **Lookup**: A cached reply is returned straight from the `ResultCache`.
//! 3. **Claim**: Otherwise the caller atomically claims the fingerprint in the
//!    in-flight map, or joins whoever claimed it first.
//! 4. **Solve**: The claimant spawns the search on a blocking thread, detached
//!    from the connection. The rendered path is persisted, then published on
//!    the fingerprint's `watch` channel, then the claim is retired.

use super::fingerprint::Fingerprint;
use super::request::parse_request;
use super::types::{DispatchError, DispatchStats, Outcome, StatsSnapshot};
use crate::search::render::render_path;
use crate::search::solver::Solve;
use crate::search::types::SearchProblem;
use crate::storage::cache::ResultCache;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::watch;

type Completion = watch::Receiver<Option<Outcome>>;

pub struct Dispatcher {
    cache: Arc<ResultCache>,
    solver: Arc<dyn Solve>,
    /// One completion signal per fingerprint currently being solved.
    in_flight: Arc<DashMap<Fingerprint, Completion>>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    pub fn new(cache: Arc<ResultCache>, solver: Arc<dyn Solve>) -> Arc<Self> {
        Arc::new(Self {
            cache,
            solver,
            in_flight: Arc::new(DashMap::new()),
            stats: Arc::new(DispatchStats::default()),
        })
    }

    /// Parse `lines` and return the rendered path for the problem they describe.
    pub async fn handle<S: AsRef<str> + Sync>(&self, lines: &[S]) -> Outcome {
        DispatchStats::bump(&self.stats.requests);

        let request = parse_request(lines).inspect_err(|_| {
            DispatchStats::bump(&self.stats.failures);
        })?;
        let fingerprint = request.fingerprint();

        let outcome = self.solve_or_lookup(fingerprint, request.problem).await;
        if outcome.is_err() {
            DispatchStats::bump(&self.stats.failures);
        }
        outcome
    }

    /// Return the cached reply for `fingerprint`, or solve `problem` once and
    /// share the result with every concurrent caller asking for it.
    pub async fn solve_or_lookup(&self, fingerprint: Fingerprint, problem: SearchProblem) -> Outcome {
        if let Some(hit) = self.cache.get(&fingerprint) {
            tracing::debug!("Cache hit for {}", fingerprint.short());
            DispatchStats::bump(&self.stats.cache_hits);
            return Ok(hit);
        }

        let mut completion = match self.in_flight.entry(fingerprint.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!("Joining in-flight solve for {}", fingerprint.short());
                DispatchStats::bump(&self.stats.joined);
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                // The previous solver may have published and retired between
                // our first lookup and taking the entry lock.
                if let Some(hit) = self.cache.get(&fingerprint) {
                    DispatchStats::bump(&self.stats.cache_hits);
                    return Ok(hit);
                }

                let (tx, rx) = watch::channel(None);
                entry.insert(rx.clone());
                tracing::debug!("Starting solve for {}", fingerprint.short());
                DispatchStats::bump(&self.stats.solves);
                self.spawn_solve(fingerprint.clone(), problem, tx);
                rx
            }
        };

        let published = completion
            .wait_for(Option::is_some)
            .await
            .map(|value| value.clone());

        match published {
            Ok(Some(outcome)) => outcome,
            _ => Err(DispatchError::Internal(format!(
                "solve for {} ended without a result",
                fingerprint.short()
            ))),
        }
    }

    /// Run the search on its own task so a dropped connection cannot cancel it.
    fn spawn_solve(
        &self,
        fingerprint: Fingerprint,
        problem: SearchProblem,
        tx: watch::Sender<Option<Outcome>>,
    ) {
        let cache = self.cache.clone();
        let solver = self.solver.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            let key = fingerprint.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                solve_and_store(solver.as_ref(), &cache, key, &problem)
            })
            .await
            .unwrap_or_else(|e| Err(DispatchError::Internal(format!("solver task failed: {}", e))));

            if let Err(e) = &outcome {
                tracing::debug!("Solve for {} failed: {}", fingerprint.short(), e);
            }

            // Publish before retiring the claim so a late joiner that still
            // holds a receiver sees the value.
            tx.send_replace(Some(outcome));
            in_flight.remove(&fingerprint);
        });
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

/// Blocking part of a solve: search, render, persist.
fn solve_and_store(
    solver: &dyn Solve,
    cache: &ResultCache,
    fingerprint: Fingerprint,
    problem: &SearchProblem,
) -> Outcome {
    let solution = solver.solve(problem)?;
    tracing::debug!(
        "Solved {} at cost {} ({} nodes expanded)",
        fingerprint.short(),
        solution.total_cost(),
        solution.expanded
    );
    let rendered = render_path(&solution).map_err(|e| {
        tracing::error!("Rendering {} failed: {}", fingerprint.short(), e);
        DispatchError::Internal(e.to_string())
    })?;
    drop(solution);

    cache.put(fingerprint.clone(), rendered.clone()).map_err(|e| {
        tracing::error!("Persisting {} failed: {}", fingerprint.short(), e);
        DispatchError::Storage(e.to_string())
    })?;

    Ok(rendered)
}
