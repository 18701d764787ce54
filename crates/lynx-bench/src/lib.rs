//! Benchmark profiles for Lynx simulations.
//!
//! - [`reference_profile`]: 100x100 domain (10K cells), default rates
//! - [`stress_profile`]: 316x316 domain (~100K cells)
//! - [`profile_world`]: a ready-to-step world for either profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lynx_engine::{ConfigError, InitialState, LockstepWorld, Retention, SimulationConfig};

/// Horizon far enough out that benchmark loops never reach it.
pub const OPEN_HORIZON: u64 = 1 << 40;

/// Reference profile: 100x100 domain with the default pipeline.
///
/// Cold start, no noise, no rendering.
pub fn reference_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        domain_size: 100,
        horizon: OPEN_HORIZON,
        seed,
        ..Default::default()
    }
}

/// Stress profile: 316x316 domain, otherwise as [`reference_profile`].
pub fn stress_profile(seed: u64) -> SimulationConfig {
    SimulationConfig {
        domain_size: 316,
        ..reference_profile(seed)
    }
}

/// Build a cold-started world that keeps only the last two slices.
pub fn profile_world(config: &SimulationConfig) -> Result<LockstepWorld, ConfigError> {
    LockstepWorld::new(
        config.world_config(Retention::Rolling)?,
        InitialState::lotka_cold(config)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_validates() {
        reference_profile(42).validate().unwrap();
    }

    #[test]
    fn stress_profile_validates() {
        let cfg = stress_profile(42);
        cfg.validate().unwrap();
        assert_eq!(cfg.indexing().unwrap().cell_count(), 318 * 318);
    }

    #[test]
    fn profile_world_steps() {
        let cfg = SimulationConfig {
            domain_size: 8,
            ..reference_profile(1)
        };
        let mut world = profile_world(&cfg).unwrap();
        for _ in 0..5 {
            world.step_sync().unwrap();
        }
        assert_eq!(world.history().len(), 2);
    }
}
