//! Generate DM command files
//!
//! Usage:
//! ```
//! cargo run --bin dm_profile -- gradient --config profile.toml --k-lambda 6
//! cargo run --bin dm_profile -- superposition --spec spec.toml --output out/sup.csv
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dm_patterns::{
    export, GeneratorConfig, GridVectorMapper, PatternGenerator, ProfileConfig, ProfileShape,
    SuperpositionSpec,
};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "dm_profile", about = "Writes DM actuator command files", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Column gradient around mid-stroke
    Gradient {
        /// Profile configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Optical path difference across the grid, in wavelengths
        #[arg(short, long, default_value_t = 6.0)]
        k_lambda: f64,
    },
    /// Superposition of Zernike modes
    Superposition {
        /// Superposition spec (TOML with [general] and [modes])
        #[arg(short, long)]
        spec: PathBuf,

        /// Generator settings (TOML); lab defaults when omitted
        #[arg(short, long)]
        generator: Option<PathBuf>,

        /// Output file, one command per line
        #[arg(short, long, default_value = "output_shapes/superposition.csv")]
        output: PathBuf,

        /// Refuse out-of-range commands instead of clipping them
        #[arg(long)]
        no_clip: bool,
    },
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Gradient { config, k_lambda } => {
            let config: ProfileConfig = read_toml(&config)?;
            let mut shape = ProfileShape::new(config)?;
            let path = shape.generate_gradient_file(k_lambda)?;
            info!("gradient k={} written to {}", k_lambda, path.display());
        }
        Command::Superposition {
            spec,
            generator,
            output,
            no_clip,
        } => {
            let spec: SuperpositionSpec = read_toml(&spec)?;
            let gen_config: GeneratorConfig = match generator {
                Some(path) => read_toml(&path)?,
                None => GeneratorConfig::default(),
            };
            let gen = PatternGenerator::from_config(&gen_config)?;
            let cmd = gen
                .superposition(&spec, !no_clip)
                .context("composing superposition")?;
            let mapper = match gen_config.n_actuators {
                Some(n) => GridVectorMapper::new(gen.geometry().clone(), n)?,
                None => GridVectorMapper::for_geometry(gen.geometry().clone()),
            };
            let masked = gen.geometry().apply_mask(&cmd.view())?;
            let vector = mapper.grid_to_vector(&masked.view())?;
            export::write_vector(&output, &vector.view())
                .with_context(|| format!("writing {}", output.display()))?;
            info!(
                "{} modes, {} actuators written to {}",
                spec.len(),
                vector.len(),
                output.display()
            );
        }
    }
    Ok(())
}
