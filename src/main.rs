use clap::{Parser, Subcommand};
use downscale::imaging::{Bounds, ImageRequest, Quality};
use downscale::resizer::ImageResizer;
use downscale::{config, output};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Bounds shared by commands that look at an image.
#[derive(clap::Args, Clone, Copy)]
struct BoundsArgs {
    /// Maximum width in pixels (omit for no width limit)
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum height in pixels (omit for no height limit)
    #[arg(long)]
    max_height: Option<u32>,
}

impl BoundsArgs {
    fn bounds(self) -> Bounds {
        Bounds::new(self.max_width, self.max_height)
    }
}

#[derive(Parser)]
#[command(name = "downscale")]
#[command(about = "Scale images down to fit maximum dimensions")]
#[command(long_about = "\
Scale images down to fit maximum dimensions

An image is only touched when it is larger than a given bound. Scaled copies
keep their aspect ratio and are written to the output directory as
scaled_<name>; the source file is never modified.

Images with transparency are written as PNG, everything else as JPEG at the
requested quality. The file extension is kept from the source.

Run 'downscale gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML). Stock defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory; overrides `output_dir` from the config
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scale an image if it exceeds the bounds, printing the resulting path
    Resize {
        /// Source image
        source: PathBuf,

        #[command(flatten)]
        bounds: BoundsArgs,

        /// JPEG quality 0-100 (defaults to `quality` from the config)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        quality: Option<u32>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show whether and how an image would be scaled, without writing anything
    Plan {
        /// Source image
        source: PathBuf,

        #[command(flatten)]
        bounds: BoundsArgs,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "downscale=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resize {
            source,
            bounds,
            quality,
            json,
        } => {
            let mut settings = config::load_config(cli.config.as_deref())?;
            if let Some(dir) = cli.output_dir {
                settings.output_dir = dir;
            }
            std::fs::create_dir_all(&settings.output_dir)?;

            let resizer = ImageResizer::from_config(&settings);
            let request = ImageRequest {
                source,
                bounds: bounds.bounds(),
                quality: Quality::new(quality.unwrap_or(settings.quality)),
            };
            let outcome = resizer.run(&request)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                output::print_outcome(&outcome);
            }
        }
        Command::Plan { source, bounds } => {
            let settings = config::load_config(cli.config.as_deref())?;
            let resizer = ImageResizer::from_config(&settings);
            let preview = resizer.preview(&source, bounds.bounds())?;
            output::print_preview(&source, &preview);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
