//! Lockstep (synchronous) simulation world.
//!
//! [`LockstepWorld`] is the primary user-facing API for running a
//! simulation. Each call to [`step_sync()`](LockstepWorld::step_sync)
//! executes one tick of the propagator pipeline and returns the new
//! slice; [`run_to_horizon()`](LockstepWorld::run_to_horizon) drives the
//! whole run with checkpointed progress reports.
//!
//! # Ownership model
//!
//! `LockstepWorld` is [`Send`] but not [`Sync`]. All mutating methods take
//! `&mut self`, and the returned slice borrows from `self`, so the caller
//! cannot step again while holding it.

use lynx_core::{FieldDef, FieldId, StepError, TickId};
use lynx_space::GridIndexing;

use crate::config::{ConfigError, WorldConfig};
use crate::history::{FieldHistory, Slice};
use crate::metrics::StepMetrics;
use crate::progress::ProgressMeter;
use crate::seed::InitialState;
use crate::tick::TickEngine;

// Compile-time assertion: LockstepWorld is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<LockstepWorld>();
    }
};

// ── StepResult ──────────────────────────────────────────────────

/// Result of a successful [`LockstepWorld::step_sync()`] call.
pub struct StepResult<'w> {
    /// The slice produced by this tick.
    pub snapshot: &'w Slice,
    /// Performance metrics for this tick.
    pub metrics: StepMetrics,
}

// ── LockstepWorld ───────────────────────────────────────────────

/// Single-threaded simulation world for lockstep execution.
///
/// # Example
///
/// ```
/// use lynx_engine::{InitialState, LockstepWorld, Retention, SimulationConfig};
///
/// let cfg = SimulationConfig { domain_size: 8, horizon: 5, ..Default::default() };
/// let initial = InitialState::lotka_cold(&cfg).unwrap();
/// let mut world = LockstepWorld::new(cfg.world_config(Retention::Rolling).unwrap(), initial).unwrap();
/// while !world.is_finished() {
///     world.step_sync().unwrap();
/// }
/// assert_eq!(world.current_tick().0, 5);
/// ```
pub struct LockstepWorld {
    engine: TickEngine,
}

impl LockstepWorld {
    /// Create a world from a [`WorldConfig`] and the tick-1 state.
    pub fn new(config: WorldConfig, initial: InitialState) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: TickEngine::new(config, initial)?,
        })
    }

    /// Execute one tick synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] if a propagator fails, a state field diverges
    /// under the abort policy, or the horizon has been reached. The world
    /// stays at its previous tick.
    pub fn step_sync(&mut self) -> Result<StepResult<'_>, StepError> {
        let result = self.engine.execute_tick()?;
        Ok(StepResult {
            snapshot: self.engine.snapshot(),
            metrics: result.metrics,
        })
    }

    /// Step until the horizon, reporting progress through `progress`.
    ///
    /// `progress` counts completed ticks, so it should be built with
    /// `horizon - current_tick` units.
    pub fn run_to_horizon(&mut self, progress: &mut ProgressMeter) -> Result<&Slice, StepError> {
        let start = self.engine.current_tick();
        while !self.engine.is_finished() {
            let result = self.engine.execute_tick()?;
            progress.observe(result.tick.0 - start.0, result.tick.0);
        }
        Ok(self.engine.snapshot())
    }

    /// Ticks left until the horizon.
    pub fn remaining(&self) -> u64 {
        self.engine.horizon().0 - self.engine.current_tick().0
    }

    /// The most recent slice.
    pub fn snapshot(&self) -> &Slice {
        self.engine.snapshot()
    }

    /// The slice at `tick`, if retained.
    pub fn snapshot_at(&self, tick: TickId) -> Option<&Slice> {
        self.engine.snapshot_at(tick)
    }

    /// All retained slices.
    pub fn history(&self) -> &FieldHistory {
        self.engine.history()
    }

    /// Tick of the most recent slice (1 after construction).
    pub fn current_tick(&self) -> TickId {
        self.engine.current_tick()
    }

    /// Last tick of the run.
    pub fn horizon(&self) -> TickId {
        self.engine.horizon()
    }

    /// Whether the horizon slice has been produced.
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Metrics from the most recent successful tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        self.engine.last_metrics()
    }

    /// Lattice addressing.
    pub fn grid(&self) -> GridIndexing {
        self.engine.grid()
    }

    /// Field definitions, indexed by [`FieldId`].
    pub fn fields(&self) -> &[FieldDef] {
        self.engine.fields()
    }

    /// IDs of the state fields.
    pub fn state_fields(&self) -> &[FieldId] {
        self.engine.state_fields()
    }
}

impl std::fmt::Debug for LockstepWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockstepWorld")
            .field("current_tick", &self.engine.current_tick())
            .field("horizon", &self.engine.horizon())
            .field("retained", &self.engine.history().len())
            .finish()
    }
}
