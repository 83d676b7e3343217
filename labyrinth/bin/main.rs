use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use labyrinth::{preprocess, solve_preprocessed, util::parse_img, Config};
use log::info;

/// Reconstructs a maze from a picture, prints its solution and reports cycles.
///
/// The picture must show a rectangular grid with black, 1 pixel thick,
/// axis-aligned walls on white, evenly spaced a few pixels apart. Start and
/// finish cells are marked with a saturated color at their center.
#[derive(Parser)]
#[command(name = "labyrinth", version)]
struct Cli {
    /// Path to the maze picture.
    image: PathBuf,

    /// JSON file with pipeline settings (missing fields use defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Channel threshold for binarization.
    #[arg(long)]
    threshold: Option<u8>,

    /// Fraction of black pixels above which a line counts as a wall.
    #[arg(long)]
    wall_density: Option<f64>,

    /// Do not count start/finish markers as exits in the first pass.
    #[arg(long)]
    no_special_exits: bool,

    /// Fail when two neighboring cells disagree about a wall.
    #[arg(long)]
    strict: bool,

    /// Directory for the preprocessed and cropped intermediate pictures.
    #[arg(long)]
    save_intermediate: Option<PathBuf>,

    /// Write the full solution as JSON to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// More output (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> Result<Config, anyhow::Error> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(threshold) = self.threshold {
            config.binarize_threshold = threshold;
        }
        if let Some(density) = self.wall_density {
            config.wall_density = density;
        }
        if self.no_special_exits {
            config.count_special_as_exit = false;
        }
        if self.strict {
            config.strict_adjacency = true;
        }

        Ok(config)
    }
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = cli.load_config()?;

    let img = image::open(&cli.image)
        .with_context(|| format!("failed to open {}", cli.image.display()))?;
    let pre = preprocess(&parse_img(&img), &config);

    if let Some(dir) = &cli.save_intermediate {
        fs::create_dir_all(dir)?;
        pre.binarized.save(dir.join("01-preprocessed.png"))?;
        pre.cropped.save(dir.join("02-autocropped.png"))?;
        info!("Intermediate pictures written to {}", dir.display());
    }

    let solution = solve_preprocessed(&pre, &config)?;

    println!(
        "{}x{} maze, white border {}",
        solution.solved.rows(),
        solution.solved.columns(),
        solution.border
    );
    println!("{}", solution.solved);
    println!(
        "Dead ends eliminated: {} in {} rounds (first pass), {} in {} rounds (second pass)",
        solution.first_pass.eliminated(),
        solution.first_pass.rounds.len(),
        solution.second_pass.eliminated(),
        solution.second_pass.rounds.len()
    );

    if solution.has_cycle {
        println!("The maze contains cycles:");
        println!("{}", solution.residual);
    } else {
        println!("The maze contains no cycles.");
    }

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&solution)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}
