//! Initial slice construction: cold-start draws, installed warm-start
//! tables, and optional noise injection.

use indexmap::IndexMap;
use lynx_core::FieldId;
use lynx_propagators::{NoiseInjection, PREDATOR, PREY};
use lynx_space::{GridIndexing, PaddedGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{ColdStartRange, ConfigError, SimulationConfig};

/// Tick 1 of every state field, assembled before the engine is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitialState {
    slices: IndexMap<FieldId, PaddedGrid>,
}

impl InitialState {
    /// An empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field's slice.
    pub fn with(mut self, field: FieldId, grid: PaddedGrid) -> Self {
        self.slices.insert(field, grid);
        self
    }

    /// Add or replace a field's slice, returning the previous one.
    pub fn insert(&mut self, field: FieldId, grid: PaddedGrid) -> Option<PaddedGrid> {
        self.slices.insert(field, grid)
    }

    /// Draw every cell (ghost ring included) of each field from its range.
    ///
    /// Fields are drawn in the order given, each in row-major order, from
    /// one ChaCha8 stream seeded with `seed`.
    pub fn cold(indexing: GridIndexing, ranges: &[(FieldId, ColdStartRange)], seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let slices = ranges
            .iter()
            .map(|&(field, range)| {
                let mut grid = PaddedGrid::zeros(indexing);
                for v in grid.as_mut_slice() {
                    *v = range.scale(rng.random::<f64>());
                }
                (field, grid)
            })
            .collect();
        Self { slices }
    }

    /// Cold start of prey and predator from a validated configuration.
    pub fn lotka_cold(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let indexing = config.indexing()?;
        Ok(Self::cold(
            indexing,
            &[(PREY, config.prey_range), (PREDATOR, config.predator_range)],
            config.seed,
        ))
    }

    /// Perturb one field in place. Returns `false` if the field is absent.
    pub fn apply_noise(&mut self, field: FieldId, noise: &NoiseInjection) -> bool {
        match self.slices.get_mut(&field) {
            Some(grid) => {
                noise.apply(grid);
                true
            }
            None => false,
        }
    }

    /// The slice of one field.
    pub fn get(&self, field: FieldId) -> Option<&PaddedGrid> {
        self.slices.get(&field)
    }

    /// Fields with a slice, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.slices.keys().copied()
    }

    pub(crate) fn take(&mut self, field: FieldId) -> Option<PaddedGrid> {
        self.slices.shift_remove(&field)
    }
}

impl SimulationConfig {
    /// The prey noise operator, or `None` when noise is disabled.
    pub fn noise_injection(&self) -> Result<Option<NoiseInjection>, ConfigError> {
        if !self.noise {
            return Ok(None);
        }
        NoiseInjection::builder()
            .amplitude(self.noise_amplitude)
            .seed(self.seed)
            .build()
            .map(Some)
            .map_err(|reason| ConfigError::Propagator {
                name: "NoiseInjection",
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ix(n: u32) -> GridIndexing {
        GridIndexing::new(n).unwrap()
    }

    #[test]
    fn cold_start_respects_ranges() {
        let state = InitialState::cold(
            ix(6),
            &[
                (PREY, ColdStartRange::new(0.0, 1.0)),
                (PREDATOR, ColdStartRange::new(0.3, 0.4)),
            ],
            42,
        );
        let prey = state.get(PREY).unwrap();
        let predator = state.get(PREDATOR).unwrap();
        assert_eq!(prey.as_slice().len(), 64);
        assert!(prey.as_slice().iter().all(|v| (0.0..1.0).contains(v)));
        assert!(predator.as_slice().iter().all(|v| (0.3..0.4).contains(v)));
    }

    #[test]
    fn same_seed_same_cold_start() {
        let cfg = SimulationConfig {
            domain_size: 5,
            ..Default::default()
        };
        let a = InitialState::lotka_cold(&cfg).unwrap();
        let b = InitialState::lotka_cold(&cfg).unwrap();
        assert_eq!(a, b);

        let other = SimulationConfig { seed: 7, ..cfg };
        assert_ne!(a, InitialState::lotka_cold(&other).unwrap());
    }

    #[test]
    fn degenerate_range_is_constant() {
        let state = InitialState::cold(ix(3), &[(PREY, ColdStartRange::new(0.25, 0.25))], 1);
        assert!(state.get(PREY).unwrap().as_slice().iter().all(|&v| v == 0.25));
    }

    #[test]
    fn noise_touches_only_the_named_field() {
        let cfg = SimulationConfig {
            domain_size: 4,
            noise: true,
            noise_amplitude: 0.5,
            ..Default::default()
        };
        let base = InitialState::lotka_cold(&cfg).unwrap();
        let mut noisy = base.clone();
        let noise = cfg.noise_injection().unwrap().unwrap();
        assert!(noisy.apply_noise(PREY, &noise));
        assert_ne!(noisy.get(PREY), base.get(PREY));
        assert_eq!(noisy.get(PREDATOR), base.get(PREDATOR));
        assert!(!noisy.apply_noise(FieldId(9), &noise));
    }

    #[test]
    fn noise_disabled_yields_none() {
        assert!(SimulationConfig::default().noise_injection().unwrap().is_none());
    }

    #[test]
    fn warm_slices_install_in_order() {
        let state = InitialState::new()
            .with(PREDATOR, PaddedGrid::filled(ix(2), 0.5))
            .with(PREY, PaddedGrid::filled(ix(2), 0.1));
        let fields: Vec<FieldId> = state.fields().collect();
        assert_eq!(fields, [PREDATOR, PREY]);
    }

    proptest! {
        #[test]
        fn noisy_prey_stays_in_unit_interval(seed in any::<u64>(), amplitude in 0.0f64..1.0) {
            let cfg = SimulationConfig {
                domain_size: 4,
                seed,
                noise: true,
                noise_amplitude: amplitude,
                ..Default::default()
            };
            let mut state = InitialState::lotka_cold(&cfg).unwrap();
            let noise = cfg.noise_injection().unwrap().unwrap();
            state.apply_noise(PREY, &noise);
            prop_assert!(state
                .get(PREY)
                .unwrap()
                .as_slice()
                .iter()
                .all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
