//! `lynx` command-line entry point.
//!
//! Runs one simulation with the given parameters, saves the final state
//! and writes the animation. Set `RUST_LOG` to change log verbosity.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lynx::engine::{ColdStartRange, DivergencePolicy, SimulationConfig};
use lynx::{run, RunConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lynx")]
#[command(version)]
#[command(about = "Predator–prey simulation on a periodic lattice")]
struct Cli {
    /// Side length of the square domain
    #[arg(long, default_value_t = 100)]
    domain_size: u32,

    /// Last tick of the run (the seeded slice is tick 1)
    #[arg(long, default_value_t = 500)]
    horizon: u64,

    /// Prey growth rate
    #[arg(long, default_value_t = 4.0)]
    growth: f64,

    /// Predation rate
    #[arg(long, default_value_t = 5.0)]
    predation: f64,

    /// Prey diffusion coefficient
    #[arg(long, default_value_t = 0.001)]
    prey_diffusion: f64,

    /// Predator diffusion coefficient
    #[arg(long, default_value_t = 0.2)]
    predator_diffusion: f64,

    /// Lower bound of cold-start prey density
    #[arg(long, default_value_t = 0.0)]
    prey_min: f64,

    /// Upper bound of cold-start prey density
    #[arg(long, default_value_t = 1.0)]
    prey_max: f64,

    /// Lower bound of cold-start predator density
    #[arg(long, default_value_t = 0.3)]
    predator_min: f64,

    /// Upper bound of cold-start predator density
    #[arg(long, default_value_t = 0.4)]
    predator_max: f64,

    /// Resume from the tables in --state-dir instead of a cold start
    #[arg(long)]
    warm_start: bool,

    /// Perturb the initial prey slice
    #[arg(long)]
    noise: bool,

    /// Half-width of the uniform prey perturbation
    #[arg(long, default_value_t = 0.05)]
    noise_amplitude: f64,

    /// Progress reports per phase
    #[arg(long, default_value_t = 10)]
    progress_checkpoints: u32,

    /// First tick included in the animation
    #[arg(long, default_value_t = 1)]
    animation_start: u64,

    /// Animation frame rate
    #[arg(long, default_value_t = 20)]
    fps: u32,

    /// Pixels per lattice cell in the animation
    #[arg(long, default_value_t = 4)]
    cell_px: u32,

    /// Seed for cold starts and noise
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Directory of the warm-start tables
    #[arg(long, default_value = "state")]
    state_dir: PathBuf,

    /// Column separator of the warm-start tables
    #[arg(long, default_value_t = '|')]
    delimiter: char,

    /// Animation output path
    #[arg(short, long, default_value = "lynx.gif")]
    output: PathBuf,

    /// Skip the animation
    #[arg(long)]
    no_render: bool,

    /// Keep running when a cell becomes NaN or infinite
    #[arg(long)]
    allow_divergence: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        RunConfig {
            sim: SimulationConfig {
                domain_size: self.domain_size,
                horizon: self.horizon,
                growth: self.growth,
                predation: self.predation,
                prey_diffusion: self.prey_diffusion,
                predator_diffusion: self.predator_diffusion,
                prey_range: ColdStartRange::new(self.prey_min, self.prey_max),
                predator_range: ColdStartRange::new(self.predator_min, self.predator_max),
                warm_start: self.warm_start,
                noise: self.noise,
                noise_amplitude: self.noise_amplitude,
                progress_checkpoints: self.progress_checkpoints,
                animation_start: self.animation_start,
                frame_rate: self.fps,
                seed: self.seed,
                delimiter: self.delimiter,
                divergence: if self.allow_divergence {
                    DivergencePolicy::Propagate
                } else {
                    DivergencePolicy::Abort
                },
            },
            state_dir: self.state_dir,
            output: self.output,
            cell_px: self.cell_px,
            render: !self.no_render,
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Cli::parse().into_config();
    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.exit_code(), "{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_simulation_defaults() {
        let cfg = Cli::parse_from(["lynx"]).into_config();
        let defaults = RunConfig::default();
        assert_eq!(cfg.sim, defaults.sim);
        assert_eq!(cfg.state_dir, defaults.state_dir);
        assert_eq!(cfg.output, defaults.output);
        assert_eq!(cfg.cell_px, defaults.cell_px);
        assert!(cfg.render);
    }

    #[test]
    fn flags_map_onto_config() {
        let cfg = Cli::parse_from([
            "lynx",
            "--domain-size",
            "4",
            "--horizon",
            "3",
            "--prey-min",
            "0.2",
            "--warm-start",
            "--delimiter",
            ";",
            "--no-render",
            "--allow-divergence",
            "-o",
            "out.gif",
        ])
        .into_config();
        assert_eq!(cfg.sim.domain_size, 4);
        assert_eq!(cfg.sim.horizon, 3);
        assert_eq!(cfg.sim.prey_range, ColdStartRange::new(0.2, 1.0));
        assert!(cfg.sim.warm_start);
        assert_eq!(cfg.sim.delimiter, ';');
        assert_eq!(cfg.sim.divergence, DivergencePolicy::Propagate);
        assert!(!cfg.render);
        assert_eq!(cfg.output, PathBuf::from("out.gif"));
    }
}
