//! Deterministic random number sources.
//!
//! # Ownership model
//!
//! A run owns exactly one [`RandomModel`], constructed from an explicit seed.
//! Nothing mutates it implicitly after creation: consumers obtain an
//! [`RngProvider`] handle via [`RandomModel::provider`] and every accessor on
//! the provider consumes it, so a handle can be used at most once.  The
//! compiler enforces what would otherwise be a runtime "already used" check.
//!
//! Derived generators are seeded from the master generator in the order they
//! are requested, so the same seed plus the same request order always yields
//! the same streams.

use std::any::TypeId;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;

/// Seed used when no seed is configured.
pub const DEFAULT_SEED: u64 = 123;

// ── SimRng ────────────────────────────────────────────────────────────────────

/// A seeded generator owned by a single consumer.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SharedRng ─────────────────────────────────────────────────────────────────

/// A generator shared by every consumer of one type.
///
/// Cloning the handle shares the underlying stream.
#[derive(Clone)]
pub struct SharedRng(Arc<Mutex<SimRng>>);

impl SharedRng {
    fn new(seed: u64) -> Self {
        SharedRng(Arc::new(Mutex::new(SimRng::new(seed))))
    }

    /// Run `f` with exclusive access to the shared generator.
    pub fn with<R>(&self, f: impl FnOnce(&mut SimRng) -> R) -> R {
        f(&mut *self.0.lock())
    }

    /// `true` if both handles draw from the same stream.
    pub fn same_stream(&self, other: &SharedRng) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// ── RandomModel ───────────────────────────────────────────────────────────────

/// Run-wide owner of the master generator.
pub struct RandomModel {
    master: SimRng,
    shared: FxHashMap<TypeId, SharedRng>,
}

impl RandomModel {
    pub fn new(seed: u64) -> Self {
        Self {
            master: SimRng::new(seed),
            shared: FxHashMap::default(),
        }
    }

    /// A model seeded with [`DEFAULT_SEED`].
    pub fn with_default_seed() -> Self {
        Self::new(DEFAULT_SEED)
    }

    /// Hand out a single-use provider.
    pub fn provider(&mut self) -> RngProvider<'_> {
        RngProvider { model: self }
    }
}

/// Single-use access to the [`RandomModel`].  Every method consumes `self`.
pub struct RngProvider<'a> {
    model: &'a mut RandomModel,
}

impl RngProvider<'_> {
    /// Draw a fresh seed from the master generator.
    pub fn seed(self) -> u64 {
        self.model.master.random()
    }

    /// A new generator, seeded from the master generator.
    pub fn new_instance(self) -> SimRng {
        SimRng::new(self.model.master.random())
    }

    /// The generator shared by all consumers of type `T`.
    ///
    /// Created (and seeded from the master) on first request; subsequent
    /// requests for the same `T` return the same stream.
    pub fn shared_instance<T: 'static>(self) -> SharedRng {
        let RandomModel { master, shared } = self.model;
        shared
            .entry(TypeId::of::<T>())
            .or_insert_with(|| SharedRng::new(master.random()))
            .clone()
    }
}
