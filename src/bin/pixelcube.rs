//! Command-line front end: renders one cube image to a file or stdout.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pixelcube::{CubeGenerator, GenerationRequest, OutputFormat};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pixelcube")]
#[command(about = "Generate isometric pixel-art cube images", long_about = None)]
struct Cli {
    /// Size tier (xs, s, m, l, xl); ignored when --width and --height are given
    #[arg(short, long, default_value = "m")]
    size: String,

    /// Explicit canvas width in pixels (1-256)
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Explicit canvas height in pixels (1-256)
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Base color as RRGGBB or #RRGGBB; random palette colors when omitted
    #[arg(short, long)]
    color: Option<String>,

    /// solid, gradient, mixed or random
    #[arg(short, long, default_value = "random")]
    pattern: String,

    /// PNG, JPEG or WEBP
    #[arg(short, long, default_value = "PNG")]
    format: String,

    /// Exact number of cubes (clamped to 1-20)
    #[arg(long)]
    cubes: Option<i64>,

    /// Lower bound for a random cube count
    #[arg(long, default_value_t = 1)]
    min_cubes: i64,

    /// Upper bound for a random cube count
    #[arg(long, default_value_t = 10)]
    max_cubes: i64,

    /// transparent, palette, or a hex color
    #[arg(short, long, default_value = "transparent")]
    background: String,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Print a data URL instead of raw bytes
    #[arg(long)]
    data_url: bool,

    /// Output file; raw bytes go to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> GenerationRequest {
        let mut pairs: Vec<(&str, String)> = vec![
            ("size", self.size.clone()),
            ("pattern", self.pattern.clone()),
            ("format", self.format.clone()),
            ("min_cubes", self.min_cubes.to_string()),
            ("max_cubes", self.max_cubes.to_string()),
            ("background", self.background.clone()),
        ];
        if let Some(color) = &self.color {
            pairs.push(("color", color.clone()));
        }
        if let Some(cubes) = self.cubes {
            pairs.push(("cubes", cubes.to_string()));
        }

        let request = GenerationRequest::from_query_pairs(pairs);
        match (self.width, self.height) {
            (Some(width), Some(height)) => request.with_size((width, height)),
            _ => request,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if OutputFormat::from_name(&cli.format).is_none() {
        tracing::warn!(requested = %cli.format, "unrecognized format, writing PNG");
    }
    let request = cli.request();

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut generator = CubeGenerator::with_rng(rng);
    let image = generator.generate(&request).context("failed to generate image")?;

    let payload = if cli.data_url {
        image.to_data_url()?.into_bytes()
    } else {
        image.encode()?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &payload).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                cubes = image.cubes.len(),
                format = %image.format,
                "wrote image"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&payload)?;
            if cli.data_url {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
