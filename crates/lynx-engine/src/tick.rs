//! Tick engine: the single-threaded simulation loop.
//!
//! [`TickEngine`] wires together the field history, propagators, staged
//! buffers and overlay caches into a deterministic tick loop. Producing
//! tick `t`:
//!
//! 1. synchronize the ghost ring of every state field at `t - 1`;
//! 2. run the pipeline in order against zero-filled staged buffers;
//! 3. scan the new state for non-finite values per [`DivergencePolicy`];
//! 4. commit the staged state fields to history as slice `t`.
//!
//! The slice at the horizon is synchronized as soon as it is committed.
//! A failed tick commits nothing and leaves the engine at `t - 1`.

use std::time::Instant;

use lynx_core::{FieldDef, FieldId, FieldKind, FieldSet, StepError, TickId};
use lynx_propagator::{Propagator, ReadResolutionPlan, StepContext};
use lynx_space::{synchronize, GridIndexing};
use tracing::{trace, warn};

use crate::config::{ConfigError, DivergencePolicy, WorldConfig};
use crate::history::{FieldHistory, Slice};
use crate::metrics::StepMetrics;
use crate::overlay::{OverlayReader, StagedBuffers, StagedFieldCache};
use crate::seed::InitialState;

// ── TickResult ───────────────────────────────────────────────────

/// Result of a successful tick execution.
#[derive(Debug)]
pub struct TickResult {
    /// The tick that was produced.
    pub tick: TickId,
    /// Performance metrics for this tick.
    pub metrics: StepMetrics,
}

// ── TickEngine ───────────────────────────────────────────────────

/// Single-threaded tick engine.
///
/// Owns all simulation state and executes ticks synchronously.
pub struct TickEngine {
    grid: GridIndexing,
    fields: Vec<FieldDef>,
    state_fields: Vec<FieldId>,
    propagators: Vec<Box<dyn Propagator>>,
    plan: ReadResolutionPlan,
    history: FieldHistory,
    spare: Option<Slice>,
    staged: StagedBuffers,
    staged_cache: StagedFieldCache,
    horizon: TickId,
    divergence: DivergencePolicy,
    warned: FieldSet,
    last_metrics: StepMetrics,
}

impl TickEngine {
    /// Construct a tick engine from a [`WorldConfig`] and the tick-1 state.
    ///
    /// Validates the configuration, builds the read resolution plan and
    /// installs one initial slice per state field.
    pub fn new(config: WorldConfig, mut initial: InitialState) -> Result<Self, ConfigError> {
        let plan = config.validate()?;
        let grid = config.grid;

        let state_fields: Vec<FieldId> = config
            .field_ids()
            .filter(|f| config.fields[f.0 as usize].kind == FieldKind::State)
            .collect();

        let mut grids = indexmap::IndexMap::with_capacity(state_fields.len());
        for &field in &state_fields {
            let name = &config.fields[field.0 as usize].name;
            let slice = initial
                .take(field)
                .ok_or_else(|| ConfigError::MissingInitialSlice {
                    field: name.clone(),
                })?;
            if slice.indexing() != grid {
                return Err(ConfigError::InitialShapeMismatch {
                    field: name.clone(),
                    expected: grid.padded_size(),
                    found: slice.indexing().padded_size(),
                });
            }
            grids.insert(field, slice);
        }
        let mut history = FieldHistory::new(config.retention, Slice::new(TickId::INITIAL, grids));
        if config.horizon == TickId::INITIAL {
            for g in history.latest_mut().grids_mut() {
                synchronize(g);
            }
        }

        let outputs: Vec<FieldId> = config
            .field_ids()
            .filter(|&f| plan.writer_of(f).is_some())
            .collect();
        let staged = StagedBuffers::new(outputs, grid.cell_count());

        Ok(Self {
            grid,
            fields: config.fields,
            state_fields,
            propagators: config.propagators,
            plan,
            history,
            spare: None,
            staged,
            staged_cache: StagedFieldCache::new(),
            horizon: config.horizon,
            divergence: config.divergence,
            warned: FieldSet::empty(),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Execute one tick.
    ///
    /// # Errors
    ///
    /// - [`StepError::HorizonReached`] once the horizon slice exists.
    /// - [`StepError::PropagatorFailed`] if a propagator fails.
    /// - [`StepError::NumericDivergence`] under [`DivergencePolicy::Abort`].
    ///
    /// On error nothing is committed.
    pub fn execute_tick(&mut self) -> Result<TickResult, StepError> {
        let tick_start = Instant::now();
        let current = self.current_tick();
        if current >= self.horizon {
            return Err(StepError::HorizonReached {
                horizon: self.horizon,
            });
        }
        let next = current.next();

        // 1. Synchronize slice t - 1.
        let sync_start = Instant::now();
        for g in self.history.latest_mut().grids_mut() {
            synchronize(g);
        }
        let sync_us = sync_start.elapsed().as_micros() as u64;

        // 2. Run propagator pipeline.
        self.staged.begin_tick();
        let previous = self.history.latest();
        let mut propagator_us = Vec::with_capacity(self.propagators.len());
        let empty_routes = indexmap::IndexMap::new();
        for (i, prop) in self.propagators.iter().enumerate() {
            let prop_start = Instant::now();
            let routes = self.plan.routes_for(i).unwrap_or(&empty_routes);
            self.staged_cache.refill(routes, &self.staged);
            let overlay = OverlayReader::new(routes, previous, &self.staged_cache);
            self.staged.restrict(prop.writes());
            {
                let mut ctx =
                    StepContext::new(&overlay, previous, &mut self.staged, self.grid, next);
                prop.step(&mut ctx)
                    .map_err(|reason| StepError::PropagatorFailed {
                        name: prop.name().to_string(),
                        reason,
                    })?;
            }
            propagator_us.push((
                prop.name().to_string(),
                prop_start.elapsed().as_micros() as u64,
            ));
        }

        // 3. Divergence scan.
        let check_start = Instant::now();
        self.check_divergence(next)?;
        let divergence_check_us = check_start.elapsed().as_micros() as u64;

        // 4. Commit.
        let commit_start = Instant::now();
        self.commit(next);
        let commit_us = commit_start.elapsed().as_micros() as u64;

        let metrics = StepMetrics {
            total_us: tick_start.elapsed().as_micros() as u64,
            sync_us,
            propagator_us,
            divergence_check_us,
            commit_us,
            retained_slices: self.history.len(),
            retained_bytes: self.history.retained_bytes(),
        };
        trace!(
            tick = next.0,
            total_us = metrics.total_us,
            sync_us,
            commit_us,
            "tick complete"
        );
        self.last_metrics = metrics.clone();
        Ok(TickResult {
            tick: next,
            metrics,
        })
    }

    fn check_divergence(&mut self, tick: TickId) -> Result<(), StepError> {
        for &field in &self.state_fields {
            if self.warned.contains(field) {
                continue;
            }
            let Some(cells) = self.staged.read(field) else {
                continue;
            };
            let Some((row, col, value)) = self
                .grid
                .interior()
                .map(|(r, c)| (r, c, cells[self.grid.index(r, c)]))
                .find(|&(_, _, v)| !v.is_finite())
            else {
                continue;
            };
            let name = &self.fields[field.0 as usize].name;
            match self.divergence {
                DivergencePolicy::Abort => {
                    return Err(StepError::NumericDivergence {
                        field: name.clone(),
                        tick,
                        cell: (row, col),
                        value,
                    });
                }
                DivergencePolicy::Propagate => {
                    warn!(
                        field = name.as_str(),
                        tick = tick.0,
                        row,
                        col,
                        value,
                        "non-finite value, continuing"
                    );
                    self.warned.insert(field);
                }
            }
        }
        Ok(())
    }

    fn commit(&mut self, tick: TickId) {
        let mut slice = match self.spare.take() {
            Some(mut s) => {
                s.set_tick(tick);
                s
            }
            None => Slice::zeros(tick, self.grid, &self.state_fields),
        };
        for &field in &self.state_fields {
            if let (Some(dst), Some(src)) = (slice.grid_mut(field), self.staged.read(field)) {
                dst.as_mut_slice().copy_from_slice(src);
            }
        }
        self.spare = self.history.push(slice);
        if tick == self.horizon {
            for g in self.history.latest_mut().grids_mut() {
                synchronize(g);
            }
        }
    }

    /// Tick of the most recent slice.
    pub fn current_tick(&self) -> TickId {
        self.history.latest().tick()
    }

    /// Last tick of the run.
    pub fn horizon(&self) -> TickId {
        self.horizon
    }

    /// Whether the horizon slice has been produced.
    pub fn is_finished(&self) -> bool {
        self.current_tick() >= self.horizon
    }

    /// The most recent slice.
    pub fn snapshot(&self) -> &Slice {
        self.history.latest()
    }

    /// The slice at `tick`, if retained.
    pub fn snapshot_at(&self, tick: TickId) -> Option<&Slice> {
        self.history.get(tick)
    }

    /// All retained slices.
    pub fn history(&self) -> &FieldHistory {
        &self.history
    }

    /// Lattice addressing.
    pub fn grid(&self) -> GridIndexing {
        self.grid
    }

    /// Field definitions, indexed by [`FieldId`].
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// IDs of the state fields.
    pub fn state_fields(&self) -> &[FieldId] {
        &self.state_fields
    }

    /// Metrics from the most recent successful tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}
