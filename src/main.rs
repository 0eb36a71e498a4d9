use clap::{Parser, Subcommand, ValueEnum};
use pixfit::config::{self, PixfitConfig};
use pixfit::imaging::{
    Colorize, ImageEditor, Rect, Rotation, Size, plan_fit_exact, plan_fit_within,
};
use pixfit::output;
use pixfit::process::{self, BatchJob, BatchOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "pixfit")]
#[command(version)]
#[command(about = "Resize planning and simple editing for JPEG, PNG and GIF images")]
#[command(long_about = "\
Resize planning and simple editing for JPEG, PNG and GIF images

Two resize modes:

  fit   Shrink to fit inside a bounding box, keeping the aspect ratio.
        Images already inside the box are left alone.
  fill  Scale to cover an exact size, then crop the overhang from the center.
        Give only --width or --height to follow the image's aspect ratio.

The plan-* commands print what would happen to an image of a given size
without reading any file.

Settings (JPEG quality, resampling filter, worker count) come from
./pixfit.toml or --config. Run 'pixfit gen-config' for a documented file.")]
struct Cli {
    /// Config file (default: ./pixfit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the fit-within plan for an image size
    PlanWithin {
        /// Source size, e.g. 4000x3000
        #[arg(long)]
        source: Size,
        /// Bounding box, e.g. 800x800
        #[arg(long)]
        max: Size,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the exact-fit plan for an image size
    PlanExact {
        /// Source size, e.g. 4000x3000
        #[arg(long)]
        source: Size,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print format and dimensions of image files
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Shrink images to fit within a bounding box
    Fit {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Bounding box, e.g. 800x800
        #[arg(long)]
        max: Size,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Resize images to an exact size, cropping from the center
    Fill {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Cut out a rectangle
    Crop {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Cut out a centered rectangle (square when --height is omitted)
    CropCenter {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Rotate by a quarter or half turn
    Rotate {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "cw")]
        direction: Direction,
    },
    /// Apply a colour filter
    Filter {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(subcommand)]
        filter: FilterCommand,
    },
    /// Print a stock pixfit.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Cw,
    Ccw,
    Half,
}

impl From<Direction> for Rotation {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Cw => Rotation::Clockwise,
            Direction::Ccw => Rotation::CounterClockwise,
            Direction::Half => Rotation::Half,
        }
    }
}

#[derive(Subcommand)]
enum FilterCommand {
    /// Convert to grayscale
    Grayscale,
    /// Lighten (positive) or darken (negative)
    Brightness {
        #[arg(long, allow_negative_numbers = true)]
        value: i32,
    },
    /// Shift colour channels and fade opacity
    Colorize {
        #[arg(long, allow_negative_numbers = true)]
        red: i32,
        #[arg(long, allow_negative_numbers = true)]
        green: i32,
        #[arg(long, allow_negative_numbers = true)]
        blue: i32,
        /// 0 (opaque) to 127 (transparent)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=127))]
        alpha: u8,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::PlanWithin { source, max, json } => {
            let plan = plan_fit_within(source, max.width, max.height)?;
            if json {
                println!("{}", output::format_plan_json(source, &plan)?);
            } else {
                output::print_plan(source, &plan);
            }
        }
        Command::PlanExact {
            source,
            width,
            height,
            json,
        } => {
            let plan = plan_fit_exact(source, width, height)?;
            if json {
                println!("{}", output::format_plan_json(source, &plan)?);
            } else {
                output::print_plan(source, &plan);
            }
        }
        Command::Info { files } => {
            let mut failed = 0;
            for path in &files {
                match ImageEditor::open(path) {
                    Ok(editor) => output::print_info(path, editor.kind(), editor.size()),
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "cannot read image");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                return Err(format!("{failed} of {} files could not be read", files.len()).into());
            }
        }
        Command::Fit {
            files,
            max,
            out_dir,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_batch(&files, BatchJob::FitWithin { max }, out_dir, &config)?;
        }
        Command::Fill {
            files,
            width,
            height,
            out_dir,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_batch(&files, BatchJob::FitExact { width, height }, out_dir, &config)?;
        }
        Command::Crop {
            input,
            output,
            x,
            y,
            width,
            height,
        } => {
            let config = load_config(cli.config.as_deref())?;
            edit_file(&input, &output, &config, |editor| {
                editor.crop(Rect::new(x, y, width, height)).map(|_| ())
            })?;
        }
        Command::CropCenter {
            input,
            output,
            width,
            height,
        } => {
            let config = load_config(cli.config.as_deref())?;
            edit_file(&input, &output, &config, |editor| {
                editor.crop_from_center(width, height).map(|_| ())
            })?;
        }
        Command::Rotate {
            input,
            output,
            direction,
        } => {
            let config = load_config(cli.config.as_deref())?;
            edit_file(&input, &output, &config, |editor| {
                editor.rotate(direction.into());
                Ok(())
            })?;
        }
        Command::Filter {
            input,
            output,
            filter,
        } => {
            let config = load_config(cli.config.as_deref())?;
            edit_file(&input, &output, &config, |editor| {
                match filter {
                    FilterCommand::Grayscale => editor.grayscale(),
                    FilterCommand::Brightness { value } => editor.brightness(value),
                    FilterCommand::Colorize {
                        red,
                        green,
                        blue,
                        alpha,
                    } => editor.colorize(Colorize {
                        red,
                        green,
                        blue,
                        alpha,
                    }),
                };
                Ok(())
            })?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. Warnings only unless `-v` is given.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PixfitConfig, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    Ok(config::load_config(path, &cwd)?)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn run_batch(
    files: &[PathBuf],
    job: BatchJob,
    out_dir: PathBuf,
    config: &PixfitConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);
    let options = BatchOptions {
        out_dir,
        quality: config.quality(),
        filter: config.resize.filter,
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = process::process_batch(files, &job, &options, Some(tx));
    printer.join().map_err(|_| "output thread panicked")?;
    let summary = result?;

    println!("{}", output::format_batch_summary(&summary));
    match summary.failed_count() {
        0 => Ok(()),
        failed => Err(format!("{failed} of {} images failed", files.len()).into()),
    }
}

/// Open `input`, apply `edit`, and write the result to `output` in the
/// input's format.
fn edit_file(
    input: &Path,
    output: &Path,
    config: &PixfitConfig,
    edit: impl FnOnce(&mut ImageEditor) -> Result<(), pixfit::imaging::BackendError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = ImageEditor::open(input)?.with_filter(config.resize.filter);
    let before = editor.size();
    edit(&mut editor)?;
    editor.save_as(output, config.quality())?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        %before,
        after = %editor.size(),
        "saved"
    );
    println!("{}: {before} \u{2192} {}", output.display(), editor.size());
    Ok(())
}
