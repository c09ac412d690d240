//! Execution engines for parallel (SMP) assignment
//!
//! An engine pairs the backend that collapses lane packs with a policy for
//! splitting the entries of a reduction result across threads. SMP
//! assignment is a synchronous delegation: the caller's thread blocks until
//! every chunk has been computed, then writes the chunks into the target.

use crate::numeric::Element;
use crate::primitives::ComputePrimitives;
#[cfg(feature = "parallel")]
use crate::Result;

/// Compile-time properties of an engine's scheduling policy
pub trait ExecutionMode {
    /// Whether every batch runs on the calling thread
    const IS_SEQUENTIAL: bool;

    /// Number of result entries computed per batch item
    fn chunk_size(n_items: usize, n_threads: usize) -> usize;
}

/// Engine consulted by SMP assignment
///
/// `T` is the element type of the reduced operand; the engine's primitives
/// finish every vectorized line it computes.
pub trait ExecutionEngine<T: Element>: Clone + Send + Sync + ExecutionMode {
    /// Backend for horizontal pack reductions
    type Primitives: ComputePrimitives<T>;

    fn primitives(&self) -> &Self::Primitives;

    /// Compute `f(0), ..., f(count - 1)`, in order
    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send;

    /// Whether batches may be split across threads
    fn is_parallel(&self) -> bool {
        !Self::IS_SEQUENTIAL
    }

    fn num_threads(&self) -> usize;
}

/// Engine that computes every batch on the calling thread
#[derive(Clone, Debug)]
pub struct SequentialEngine<T: Element, P: ComputePrimitives<T>> {
    primitives: P,
    _element: std::marker::PhantomData<T>,
}

impl<T: Element, P: ComputePrimitives<T>> SequentialEngine<T, P> {
    pub fn new(primitives: P) -> Self {
        Self {
            primitives,
            _element: std::marker::PhantomData,
        }
    }
}

impl<T: Element, P: ComputePrimitives<T>> ExecutionMode for SequentialEngine<T, P> {
    const IS_SEQUENTIAL: bool = true;

    fn chunk_size(n_items: usize, _n_threads: usize) -> usize {
        n_items.max(1)
    }
}

impl<T: Element, P: ComputePrimitives<T>> ExecutionEngine<T> for SequentialEngine<T, P> {
    type Primitives = P;

    fn primitives(&self) -> &P {
        &self.primitives
    }

    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        (0..count).map(f).collect()
    }

    fn num_threads(&self) -> usize {
        1
    }
}

/// Engine that splits batches over a Rayon pool
///
/// Without a dedicated pool the global Rayon pool is used.
#[cfg(feature = "parallel")]
#[derive(Clone, Debug)]
pub struct ParallelEngine<T: Element, P: ComputePrimitives<T>> {
    primitives: P,
    pool: Option<std::sync::Arc<rayon::ThreadPool>>,
    _element: std::marker::PhantomData<T>,
}

#[cfg(feature = "parallel")]
impl<T: Element, P: ComputePrimitives<T>> ParallelEngine<T, P> {
    /// Engine on the global Rayon pool
    pub fn new(primitives: P) -> Self {
        Self {
            primitives,
            pool: None,
            _element: std::marker::PhantomData,
        }
    }

    /// Engine on a caller-provided pool
    pub fn with_thread_pool(primitives: P, pool: std::sync::Arc<rayon::ThreadPool>) -> Self {
        Self {
            primitives,
            pool: Some(pool),
            _element: std::marker::PhantomData,
        }
    }

    /// Engine on a dedicated pool of `num_threads` threads
    pub fn with_num_threads(primitives: P, num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| crate::Error::Execution(format!("failed to build thread pool: {e}")))?;
        log::debug!("built SMP pool with {num_threads} threads");
        Ok(Self::with_thread_pool(primitives, std::sync::Arc::new(pool)))
    }
}

#[cfg(feature = "parallel")]
impl<T: Element, P: ComputePrimitives<T>> ExecutionMode for ParallelEngine<T, P> {
    const IS_SEQUENTIAL: bool = false;

    // About six chunks per thread, at least four entries each
    fn chunk_size(n_items: usize, n_threads: usize) -> usize {
        let chunk = n_items.div_ceil(n_threads.max(1) * 6);
        chunk.max(4).min(n_items).max(1)
    }
}

#[cfg(feature = "parallel")]
impl<T: Element, P: ComputePrimitives<T>> ExecutionEngine<T> for ParallelEngine<T, P> {
    type Primitives = P;

    fn primitives(&self) -> &P {
        &self.primitives
    }

    fn execute_batch<F, R>(&self, count: usize, f: F) -> Vec<R>
    where
        F: Fn(usize) -> R + Sync + Send,
        R: Send,
    {
        use rayon::prelude::*;

        match &self.pool {
            Some(pool) => pool.install(|| (0..count).into_par_iter().map(f).collect()),
            None => (0..count).into_par_iter().map(f).collect(),
        }
    }

    fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

/// Sequential f64 engine with the scalar backend
pub fn scalar_sequential() -> SequentialEngine<f64, crate::primitives::ScalarBackend> {
    SequentialEngine::new(crate::primitives::ScalarBackend)
}

/// Sequential f64 engine with the best horizontal-op backend
pub fn simd_sequential() -> SequentialEngine<f64, crate::primitives::FloatBackend> {
    SequentialEngine::new(crate::primitives::float_backend())
}

/// Parallel f64 engine with the scalar backend
#[cfg(feature = "parallel")]
pub fn scalar_parallel() -> ParallelEngine<f64, crate::primitives::ScalarBackend> {
    ParallelEngine::new(crate::primitives::ScalarBackend)
}

/// Parallel f64 engine with the best horizontal-op backend
#[cfg(feature = "parallel")]
pub fn simd_parallel() -> ParallelEngine<f64, crate::primitives::FloatBackend> {
    ParallelEngine::new(crate::primitives::float_backend())
}

/// Sequential engine for any element type
pub fn sequential<T: Element>() -> SequentialEngine<T, T::Backend> {
    SequentialEngine::new(T::backend())
}

/// Parallel engine for any element type, sized from the installed
/// configuration
#[cfg(feature = "parallel")]
pub fn parallel<T: Element>() -> Result<ParallelEngine<T, T::Backend>> {
    let threads = crate::config::current().num_threads;
    ParallelEngine::with_num_threads(T::backend(), threads)
}

/// Parallel f64 engine when the `parallel` feature is enabled, sequential
/// otherwise
pub fn auto_engine() -> impl ExecutionEngine<f64> {
    #[cfg(feature = "parallel")]
    {
        simd_parallel()
    }
    #[cfg(not(feature = "parallel"))]
    {
        simd_sequential()
    }
}
