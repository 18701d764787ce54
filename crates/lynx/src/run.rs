//! The full run: load or seed, simulate, save, render.
//!
//! Each phase fails with its own [`RunError`] variant so the binary can
//! report which part of the run went wrong. A load failure aborts before
//! any tick runs; a save failure happens after the trajectory completed;
//! a render failure happens after the state was saved.

use std::fmt;
use std::path::PathBuf;

use lynx_core::{FieldId, StepError, TickId};
use lynx_engine::{
    ConfigError, FieldHistory, FieldStats, InitialState, LockstepWorld, ProgressMeter, Retention,
    SimulationConfig,
};
use lynx_propagators::{PREDATOR, PREY};
use lynx_render::{FrameLayout, FrameSink, GifSink, RenderError};
use lynx_store::{snapshot_hash, DirStore, SnapshotStore, StoreError, TableCodec};
use tracing::info;

/// Store keys of the persisted fields.
pub const STATE_KEYS: [(FieldId, &str); 2] = [(PREY, "prey"), (PREDATOR, "predator")];

const STATE_FIELDS: [FieldId; 2] = [PREY, PREDATOR];

// ── RunConfig ──────────────────────────────────────────────────────

/// Everything a run needs beyond the simulation parameters.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Simulation parameters.
    pub sim: SimulationConfig,
    /// Directory of the warm-start tables.
    pub state_dir: PathBuf,
    /// Path of the GIF.
    pub output: PathBuf,
    /// Pixels per lattice cell in each panel.
    pub cell_px: u32,
    /// Whether to write the animation at all.
    pub render: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sim: SimulationConfig::default(),
            state_dir: PathBuf::from("state"),
            output: PathBuf::from("lynx.gif"),
            cell_px: 4,
            render: true,
        }
    }
}

impl RunConfig {
    /// History retention for this run: the rendered window, or just the
    /// last two slices when not rendering.
    pub fn retention(&self) -> Retention {
        if self.render {
            self.sim.render_retention()
        } else {
            Retention::Rolling
        }
    }
}

// ── RunError ───────────────────────────────────────────────────────

/// Terminal failure of a run, by phase.
#[derive(Debug)]
pub enum RunError {
    /// Invalid parameters or pipeline.
    Config(ConfigError),
    /// Warm-start tables could not be loaded.
    Load(StoreError),
    /// A tick failed.
    Step(StepError),
    /// The final slice could not be saved. The trajectory itself completed.
    Save {
        /// Tick the trajectory reached.
        tick: TickId,
        /// Underlying store error.
        source: StoreError,
    },
    /// The animation could not be produced. The final slice was saved.
    Render(RenderError),
}

impl RunError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Load(_) => 3,
            Self::Step(_) => 4,
            Self::Save { .. } => 5,
            Self::Render(_) => 6,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Load(e) => write!(f, "warm start failed: {e}"),
            Self::Step(e) => write!(f, "simulation failed: {e}"),
            Self::Save { tick, source } => {
                write!(f, "saving final state at tick {tick} failed: {source}")
            }
            Self::Render(e) => write!(f, "rendering failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Load(e) | Self::Save { source: e, .. } => Some(e),
            Self::Step(e) => Some(e),
            Self::Render(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StepError> for RunError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

// ── RunSummary ─────────────────────────────────────────────────────

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Tick of the saved slice.
    pub final_tick: TickId,
    /// Prey statistics at the final tick.
    pub prey: FieldStats,
    /// Predator statistics at the final tick.
    pub predator: FieldStats,
    /// Fingerprint of the saved slice.
    pub state_hash: u64,
    /// Frames written to the animation (zero when not rendering).
    pub frames: usize,
}

// ── Phases ─────────────────────────────────────────────────────────

/// Build slice 1: warm-start tables or a seeded cold start, then noise.
pub fn initial_state(
    sim: &SimulationConfig,
    store: &dyn SnapshotStore,
) -> Result<InitialState, RunError> {
    let mut initial = if sim.warm_start {
        let ix = sim.indexing()?;
        store
            .load_all(&STATE_KEYS, ix)
            .map_err(RunError::Load)?
            .into_iter()
            .fold(InitialState::new(), |s, (field, grid)| s.with(field, grid))
    } else {
        InitialState::lotka_cold(sim)?
    };
    if let Some(noise) = sim.noise_injection()? {
        initial.apply_noise(PREY, &noise);
    }
    Ok(initial)
}

/// Render every retained slice from `from` onwards into `sink`.
///
/// Frames are labelled with their tick. Returns the number of frames
/// written.
pub fn render_frames(
    history: &FieldHistory,
    from: TickId,
    layout: &FrameLayout,
    sink: &mut dyn FrameSink,
    checkpoints: u32,
) -> Result<usize, RenderError> {
    let total = history.since(from).count() as u64;
    let mut progress = ProgressMeter::new("animation", total, checkpoints);
    let mut done = 0u64;
    for slice in history.since(from) {
        let (Some(prey), Some(predator)) = (slice.grid(PREY), slice.grid(PREDATOR)) else {
            continue;
        };
        sink.push(layout.render(prey, predator, slice.tick().0)?)?;
        done += 1;
        progress.observe(done, slice.tick().0);
    }
    Ok(done as usize)
}

/// Run the whole sequence described by `config`.
pub fn run(config: &RunConfig) -> Result<RunSummary, RunError> {
    let sim = &config.sim;
    sim.validate()?;
    let ix = sim.indexing()?;
    let layout = if config.render {
        Some(
            FrameLayout::new(ix.domain_size(), config.cell_px, sim.horizon)
                .map_err(RunError::Render)?,
        )
    } else {
        None
    };

    let codec = TableCodec::new(sim.delimiter).map_err(RunError::Load)?;
    let mut store = DirStore::new(&config.state_dir, codec);
    let initial = initial_state(sim, &store)?;
    info!(
        domain = sim.domain_size,
        horizon = sim.horizon,
        warm_start = sim.warm_start,
        noise = sim.noise,
        "starting simulation"
    );

    let mut world = LockstepWorld::new(sim.world_config(config.retention())?, initial)?;
    let mut progress = ProgressMeter::new("simulation", world.remaining(), sim.progress_checkpoints);
    let last = world.run_to_horizon(&mut progress)?;

    store
        .save_snapshot(last, &STATE_KEYS, ix)
        .map_err(|source| RunError::Save {
            tick: last.tick(),
            source,
        })?;

    let stats = |field| {
        last.grid(field)
            .map(FieldStats::of)
            .ok_or(StepError::MissingSlice {
                field_id: field,
                tick: last.tick(),
            })
    };
    let (prey, predator) = (stats(PREY)?, stats(PREDATOR)?);
    let state_hash = snapshot_hash(last, &STATE_FIELDS);
    let final_tick = last.tick();
    info!(
        tick = final_tick.0,
        prey_mean = prey.mean,
        predator_mean = predator.mean,
        state_hash = %format!("{state_hash:016x}"),
        "run complete"
    );

    let frames = match layout {
        Some(layout) => {
            let mut sink = GifSink::create(&config.output, sim.frame_rate).map_err(RunError::Render)?;
            let frames = render_frames(
                world.history(),
                TickId(sim.animation_start),
                &layout,
                &mut sink,
                sim.progress_checkpoints,
            )
            .map_err(RunError::Render)?;
            sink.finish().map_err(RunError::Render)?;
            info!(frames, path = %config.output.display(), "animation written");
            frames
        }
        None => 0,
    };

    Ok(RunSummary {
        final_tick,
        prey,
        predator,
        state_hash,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lynx_render::VecSink;
    use lynx_store::MemoryStore;

    fn small(horizon: u64) -> SimulationConfig {
        SimulationConfig {
            domain_size: 5,
            horizon,
            ..Default::default()
        }
    }

    #[test]
    fn exit_codes_are_distinct() {
        let errors = [
            RunError::Config(ConfigError::NoCheckpoints),
            RunError::Load(StoreError::Missing { key: "prey".into() }),
            RunError::Step(StepError::HorizonReached { horizon: TickId(3) }),
            RunError::Save {
                tick: TickId(3),
                source: StoreError::InvalidKey { key: "".into() },
            },
            RunError::Render(RenderError::ZeroCellSize),
        ];
        let codes: Vec<u8> = errors.iter().map(RunError::exit_code).collect();
        assert_eq!(codes, [2, 3, 4, 5, 6]);
    }

    #[test]
    fn retention_follows_render_flag() {
        let mut cfg = RunConfig {
            sim: SimulationConfig {
                animation_start: 4,
                ..small(10)
            },
            ..Default::default()
        };
        assert_eq!(cfg.retention(), Retention::Since(TickId(4)));
        cfg.render = false;
        assert_eq!(cfg.retention(), Retention::Rolling);
    }

    #[test]
    fn cold_initial_state_ignores_store() {
        let store = MemoryStore::default();
        let initial = initial_state(&small(3), &store).unwrap();
        assert!(initial.get(PREY).is_some());
        assert!(initial.get(PREDATOR).is_some());
    }

    #[test]
    fn warm_initial_state_needs_both_tables() {
        let sim = SimulationConfig {
            warm_start: true,
            ..small(3)
        };
        let mut store = MemoryStore::default();
        let cold = InitialState::lotka_cold(&small(3)).unwrap();
        store.save("prey", cold.get(PREY).unwrap()).unwrap();
        assert!(matches!(
            initial_state(&sim, &store),
            Err(RunError::Load(StoreError::Missing { key })) if key == "predator"
        ));

        store.save("predator", cold.get(PREDATOR).unwrap()).unwrap();
        let warm = initial_state(&sim, &store).unwrap();
        assert_eq!(warm.get(PREY), cold.get(PREY));
    }

    #[test]
    fn noise_clamps_warm_prey() {
        let sim = SimulationConfig {
            warm_start: true,
            noise: true,
            noise_amplitude: 0.5,
            ..small(3)
        };
        let ix = sim.indexing().unwrap();
        let mut store = MemoryStore::default();
        store
            .save("prey", &lynx_space::PaddedGrid::filled(ix, 0.9))
            .unwrap();
        store
            .save("predator", &lynx_space::PaddedGrid::filled(ix, 0.3))
            .unwrap();
        let initial = initial_state(&sim, &store).unwrap();
        let prey = initial.get(PREY).unwrap();
        assert!(prey.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(prey.as_slice().iter().any(|&v| v != 0.9));
        assert!(initial
            .get(PREDATOR)
            .unwrap()
            .as_slice()
            .iter()
            .all(|&v| v == 0.3));
    }

    #[test]
    fn frames_cover_the_animation_window() {
        let sim = SimulationConfig {
            animation_start: 3,
            ..small(7)
        };
        let initial = InitialState::lotka_cold(&sim).unwrap();
        let mut world =
            LockstepWorld::new(sim.world_config(sim.render_retention()).unwrap(), initial).unwrap();
        let mut progress = ProgressMeter::new("simulation", world.remaining(), 1);
        world.run_to_horizon(&mut progress).unwrap();

        let layout = FrameLayout::new(5, 2, sim.horizon).unwrap();
        let mut sink = VecSink::new();
        let frames = render_frames(world.history(), TickId(3), &layout, &mut sink, 2).unwrap();
        assert_eq!(frames, 5);
        assert_eq!(sink.frames(), 5);
        assert!(sink
            .images()
            .iter()
            .all(|img| img.dimensions() == (layout.width(), layout.height())));
    }
}
