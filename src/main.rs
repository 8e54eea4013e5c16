use clap::{Args, Parser, Subcommand};
use simple_frame::batch::{self, BatchJob, CancelFlag, ErrorPolicy};
use simple_frame::config::{self, ConfigError, FrameConfig, FrameOverrides};
use simple_frame::{logging, output};
use std::path::PathBuf;
use std::process::ExitCode;

/// Frame parameters shared by `run` and `check`. Each overrides `frame.toml`.
#[derive(Args, Clone)]
struct FrameArgs {
    /// Target aspect ratio: W:H or square, portrait, story, landscape
    #[arg(long)]
    aspect: Option<String>,

    /// Border on every side: pixels ("60") or percent of the short side ("5%")
    #[arg(long)]
    thickness: Option<String>,

    /// Border color: CSS name, #hex, rgb(...) or hsl(...)
    #[arg(long)]
    color: Option<String>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Label inserted before the extension: photo.jpg → photo-<label>.jpg
    #[arg(long, visible_alias = "framemode")]
    label: Option<String>,
}

impl FrameArgs {
    fn overrides(&self) -> FrameOverrides {
        FrameOverrides {
            aspect: self.aspect.clone(),
            thickness: self.thickness.clone(),
            color: self.color.clone(),
            quality: self.quality,
            label: self.label.clone(),
        }
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    frame: FrameArgs,

    /// Maximum parallel workers (capped at the core count and 8)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    workers: Option<u64>,

    /// Stop at the first file that fails instead of framing the rest
    #[arg(long)]
    fail_fast: bool,

    /// Write a JSON report of every framed and failed file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "simple-frame")]
#[command(about = "Pad photos with a solid border to a target aspect ratio")]
#[command(long_about = "\
Pad photos with a solid border to a target aspect ratio

Every .jpg, .jpeg, .png and .webp directly inside the input folder is placed,
unscaled and uncropped, on the smallest canvas of the target ratio that holds
it, plus an even border. Results go to the output folder as
<name>-<label>.<ext>.

  input/                       output/
  ├── frame.toml   (optional)  ├── beach-frame.jpg
  ├── beach.jpg         ──▶    └── dog-frame.png
  └── dog.png

Settings come from frame.toml in the input folder (or --config), with
command-line flags taking precedence. Without a command, the run flags
apply directly: 'simple-frame --aspect 4:5' is 'simple-frame run --aspect 4:5'.

Run 'simple-frame gen-config' to generate a documented frame.toml.")]
#[command(version)]
struct Cli {
    /// Folder of photos to frame
    #[arg(long, default_value = "input", global = true)]
    input: PathBuf,

    /// Folder for framed photos (created if missing)
    #[arg(long, default_value = "output", global = true)]
    output: PathBuf,

    /// Config file [default: <input>/frame.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Frame every photo in the input folder (the default)
    Run(RunArgs),
    /// Show the canvas each photo would get, without writing anything
    Check(FrameArgs),
    /// Print a stock frame.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match &cli.command {
        None => run_batch(cli, None),
        Some(Command::Run(args)) => run_batch(cli, Some(args)),
        Some(Command::Check(frame)) => {
            let job = build_job(cli, &[&cli.run.frame, frame], None, false)?;
            let planned = batch::plan_folder(&job)?;
            if planned.is_empty() {
                println!("{}", output::format_nothing_to_do(&job.input_dir));
                return Ok(ExitCode::SUCCESS);
            }

            output::print_check_output(&job.settings, &planned);
            Ok(if planned.iter().all(|p| p.plan.is_ok()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Frame the input folder. Flags given after `run` win over top-level ones.
fn run_batch(cli: &Cli, args: Option<&RunArgs>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let base = &cli.run;
    let mut frames = vec![&base.frame];
    frames.extend(args.map(|a| &a.frame));
    let workers = args
        .and_then(|a| a.workers)
        .or(base.workers)
        .map(usize::try_from)
        .transpose()?;
    let fail_fast = base.fail_fast || args.is_some_and(|a| a.fail_fast);
    let report_path = args.and_then(|a| a.report.as_ref()).or(base.report.as_ref());

    let job = build_job(cli, &frames, workers, fail_fast)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_batch_event(&event);
        }
    });
    let result = batch::process_folder(&job, &CancelFlag::new(), move |event| {
        tx.send(event).ok();
    });
    printer.join().ok();
    let report = result?;

    if let Some(path) = report_path {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    if report.is_empty() {
        println!("{}", output::format_nothing_to_do(&job.input_dir));
        return Ok(ExitCode::SUCCESS);
    }

    println!();
    output::print_report(&report);
    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// `--config` if given, otherwise `frame.toml` in the input folder (if any).
fn load_config(cli: &Cli) -> Result<FrameConfig, ConfigError> {
    match &cli.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(&cli.input),
    }
}

/// Merge file config and flags, then parse everything before touching images.
///
/// `frames` are applied in order, so later flag sets win.
fn build_job(
    cli: &Cli,
    frames: &[&FrameArgs],
    workers: Option<usize>,
    fail_fast: bool,
) -> Result<BatchJob, ConfigError> {
    let mut config = load_config(cli)?;
    for frame in frames {
        config.frame.apply(&frame.overrides());
    }
    if workers.is_some() {
        config.processing.max_workers = workers;
    }
    if fail_fast {
        config.processing.on_error = ErrorPolicy::Abort;
    }
    config.validate()?;

    Ok(BatchJob {
        input_dir: cli.input.clone(),
        output_dir: cli.output.clone(),
        settings: config.frame.settings()?,
        label: config.frame.label.trim().to_string(),
        max_workers: config.processing.max_workers,
        on_error: config.processing.on_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("simple-frame").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_flags_run_without_a_command() {
        let cli = parse(&["--aspect", "4:5", "--workers", "2"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.run.frame.aspect.as_deref(), Some("4:5"));
        assert_eq!(cli.run.workers, Some(2));
    }

    #[test]
    fn no_arguments_at_all_is_a_default_run() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.input, PathBuf::from("input"));
        assert_eq!(cli.output, PathBuf::from("output"));
    }

    #[test]
    fn explicit_run_still_parses() {
        let cli = parse(&["run", "--framemode", "ig", "--fail-fast"]);
        match cli.command {
            Some(Command::Run(args)) => {
                assert_eq!(args.frame.label.as_deref(), Some("ig"));
                assert!(args.fail_fast);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn subcommand_flags_win_over_top_level_flags() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().to_string_lossy().into_owned();
        let cli = parse(&[
            "--input", &input, "--aspect", "4:5", "--color", "red", "check", "--color", "black",
        ]);
        let Some(Command::Check(frame)) = &cli.command else {
            panic!("expected check");
        };

        let job = build_job(&cli, &[&cli.run.frame, frame], None, false).unwrap();

        assert_eq!(job.settings.aspect.as_tuple(), (4, 5));
        assert_eq!(job.settings.color.to_array(), [0, 0, 0]);
    }
}
