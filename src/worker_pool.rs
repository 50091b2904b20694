//! # Worker Pool Module
//!
//! Drains the [`ResolutionQueue`](crate::registry::ResolutionQueue): every type queued during
//! resolution is expanded into its definition, which may queue further types, until the queue
//! is empty.
//!
//! ## Features
//!
//! - **Fan-out per round**: one worker coroutine per queued type, joined before the next round
//! - **Sequential mode**: the same rounds resolved in a plain loop on the calling thread
//! - **Panic isolation**: a panicking worker becomes [`SchemaError::WorkerPanicked`]
//! - **Metrics**: rounds, dispatched and completed resolutions
//!
//! ## Configuration
//!
//! - `SWAGGERIZE_DRAIN_MODE`: `parallel` (default) or `sequential`
//! - `SWAGGERIZE_DRAIN_STACK_SIZE`: worker coroutine stack size, decimal or `0x` hex
//!   (default: 256KB)
//!
//! The result never depends on the mode: resolution is idempotent per type and the registry
//! tolerates concurrent registration.

use crate::error::{Result, SchemaError};
use crate::reflect::TypeDescriptor;
use crate::resolver::Resolver;
use std::any::TypeId;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const DEFAULT_STACK_SIZE: usize = 0x40000;

/// How queued types are resolved within a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrainMode {
    /// One `may` coroutine per queued type
    #[default]
    Parallel,
    /// Resolve queued types one after another on the calling thread
    Sequential,
}

impl DrainMode {
    /// Parse drain mode from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "parallel" => Some(Self::Parallel),
            "sequential" => Some(Self::Sequential),
            _ => None,
        }
    }
}

/// Configuration for draining the resolution queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainConfig {
    pub mode: DrainMode,
    /// Stack size for worker coroutines
    pub stack_size: usize,
}

impl DrainConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mode = std::env::var("SWAGGERIZE_DRAIN_MODE")
            .ok()
            .and_then(|s| DrainMode::parse(&s))
            .unwrap_or_default();

        let stack_size = std::env::var("SWAGGERIZE_DRAIN_STACK_SIZE")
            .ok()
            .and_then(|s| {
                if let Some(hex) = s.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).ok()
                } else {
                    s.parse().ok()
                }
            })
            .unwrap_or(DEFAULT_STACK_SIZE);

        Self { mode, stack_size }
    }

    pub fn sequential() -> Self {
        Self {
            mode: DrainMode::Sequential,
            ..Self::default()
        }
    }
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            mode: DrainMode::Parallel,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// Counters accumulated over every drain of a generator
#[derive(Debug, Default)]
pub struct DrainMetrics {
    rounds: AtomicU64,
    dispatched: AtomicU64,
    completed: AtomicU64,
}

impl DrainMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_round(&self) {
        self.rounds.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    fn record_completion(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Rounds run (a round resolves everything queued when it starts)
    pub fn rounds(&self) -> u64 {
        self.rounds.load(Ordering::Relaxed)
    }

    /// Resolutions started
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Resolutions finished successfully
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Resolve queued types until the queue is empty.
///
/// Each round takes a snapshot of the queue, resolves every entry and removes the entries that
/// resolved successfully. Types queued during a round are picked up by the next one.
///
/// # Arguments
///
/// * `resolver` - Shared resolution state
/// * `config` - Drain mode and worker stack size
/// * `metrics` - Counters to update
///
/// # Errors
///
/// Returns the first error of a round, after every worker of that round has finished.
/// Entries that failed stay queued.
pub fn drain(resolver: &Arc<Resolver>, config: &DrainConfig, metrics: &DrainMetrics) -> Result<()> {
    loop {
        let pending = resolver.queue.snapshot();
        if pending.is_empty() {
            return Ok(());
        }

        metrics.record_round();
        info!(
            queued = pending.len(),
            mode = ?config.mode,
            "draining resolution queue"
        );

        let outcomes = match config.mode {
            DrainMode::Parallel => resolve_parallel(resolver, config, metrics, pending),
            DrainMode::Sequential => pending
                .into_iter()
                .map(|desc| {
                    metrics.record_dispatch();
                    resolve_guarded(resolver, &desc)
                })
                .collect(),
        };

        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(id) => {
                    resolver.queue.remove(id);
                    metrics.record_completion();
                }
                Err(err) => {
                    error!(error = %err, "queued type failed to resolve");
                    first_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
    }
}

fn resolve_parallel(
    resolver: &Arc<Resolver>,
    config: &DrainConfig,
    metrics: &DrainMetrics,
    pending: Vec<TypeDescriptor>,
) -> Vec<Result<TypeId>> {
    let mut handles = Vec::with_capacity(pending.len());
    let mut outcomes = Vec::with_capacity(pending.len());

    for desc in pending {
        metrics.record_dispatch();
        let worker_resolver = Arc::clone(resolver);
        let type_name = desc.qualified_name;
        let worker_desc = desc.clone();

        // SAFETY: the worker only touches data it owns (`worker_desc`) and `Resolver`, whose
        // state is behind locks; it never blocks on thread-local state, so it is sound to run
        // on a may coroutine.
        #[allow(unsafe_code)]
        let spawned = unsafe {
            may::coroutine::Builder::new()
                .name(format!("resolve:{type_name}"))
                .stack_size(config.stack_size)
                .spawn(move || resolve_one(&worker_resolver, &worker_desc))
        };

        match spawned {
            Ok(handle) => {
                debug!(type_name = %type_name, "resolution worker spawned");
                handles.push((type_name, handle));
            }
            Err(err) => {
                warn!(
                    type_name = %type_name,
                    error = %err,
                    "failed to spawn resolution worker, resolving inline"
                );
                outcomes.push(resolve_guarded(resolver, &desc));
            }
        }
    }

    for (type_name, handle) in handles {
        let outcome = match handle.join() {
            Ok(result) => result,
            Err(payload) => Err(SchemaError::WorkerPanicked {
                type_name: type_name.to_string(),
                message: panic_message(payload.as_ref()),
            }),
        };
        outcomes.push(outcome);
    }

    outcomes
}

fn resolve_one(resolver: &Resolver, desc: &TypeDescriptor) -> Result<TypeId> {
    resolver.resolve(desc).map(|_| desc.id)
}

fn resolve_guarded(resolver: &Resolver, desc: &TypeDescriptor) -> Result<TypeId> {
    match catch_unwind(AssertUnwindSafe(|| resolve_one(resolver, desc))) {
        Ok(result) => result,
        Err(payload) => Err(SchemaError::WorkerPanicked {
            type_name: desc.qualified_name.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
