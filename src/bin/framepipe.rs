use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use framepipe::{
    BatchSummary, ExtractionConfig, ExtractionResult, FrameExtractor, FrameFormat, Gateway,
    GatewayTimeouts, VideoInfo, discovery,
    frames::{frame_dimensions, list_frames},
    logging::{self, LoggingConfig},
    write_summary,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};

const CLI_AFTER_HELP: &str = "Examples:\n  framepipe info data/input/clip.mp4 --json\n  framepipe extract data/input/clip.mp4 --out data/output/clip --every 10\n  framepipe batch --input data/input --output data/output --progress\n  framepipe completions zsh > _framepipe";

const REPORT_FILE_NAME: &str = "frame_extraction_report.md";

#[derive(Debug, Parser)]
#[command(
    name = "framepipe",
    version,
    about = "Extract every Nth frame from videos with ffmpeg and report the results",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Path or name of the ffmpeg executable.
    #[arg(long, global = true, default_value = framepipe::DEFAULT_GATEWAY_PROGRAM)]
    ffmpeg: PathBuf,

    /// Show debug logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a progress bar for batch runs.
    #[arg(long, global = true)]
    progress: bool,

    /// Also append log lines to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Time limit for one extraction, in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

/// Options shared by `extract` and `batch`.
#[derive(Debug, Args, Clone)]
struct FrameOptions {
    /// Extract every Nth frame.
    #[arg(long, default_value_t = framepipe::DEFAULT_FRAME_INTERVAL)]
    every: u32,
    /// Start offset (seconds, MM:SS, or HH:MM:SS).
    #[arg(long)]
    start: Option<String>,
    /// End offset (seconds, MM:SS, or HH:MM:SS).
    #[arg(long)]
    end: Option<String>,
    /// Frame image format (png, jpg).
    #[arg(long, default_value = "png")]
    format: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print duration, frame rate, and resolution of a video.
    #[command(
        about = "Print video metadata",
        visible_alias = "probe",
        after_help = "Examples:\n  framepipe info clip.mp4\n  framepipe info clip.mp4 --json"
    )]
    Info {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract frames from one video.
    #[command(
        about = "Extract frames from one video",
        after_help = "Examples:\n  framepipe extract clip.mp4 --every 10 --format jpg\n  framepipe extract clip.mp4 --out frames --start 0:10 --end 0:20"
    )]
    Extract {
        /// Input video path.
        input: PathBuf,
        /// Output directory for frame images.
        #[arg(long, default_value = "data/output/frames")]
        out: PathBuf,
        #[command(flatten)]
        frames: FrameOptions,
        /// Print the result as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract frames from every video in a directory and write a report.
    #[command(
        about = "Extract frames from a directory of videos",
        after_help = "Examples:\n  framepipe batch\n  framepipe batch --input videos --output frames --recursive --report report.md"
    )]
    Batch {
        /// Directory to read videos from.
        #[arg(long, default_value = "data/input")]
        input: PathBuf,
        /// Base directory; each video gets a subdirectory named after it.
        #[arg(long, default_value = "data/output")]
        output: PathBuf,
        /// Search subdirectories of the input directory too.
        #[arg(long)]
        recursive: bool,
        #[command(flatten)]
        frames: FrameOptions,
        /// Report path (defaults to <output>/frame_extraction_report.md).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Print per-video results as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_timecode(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("time value cannot be empty".into());
    }

    if let Ok(seconds) = trimmed.parse::<f64>() {
        return seconds_to_duration(seconds, trimmed);
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("invalid time format: {trimmed}").into());
    }

    let (hours, minutes, seconds_str) = if parts.len() == 3 {
        (parts[0].parse::<u64>()?, parts[1].parse::<u64>()?, parts[2])
    } else {
        (0_u64, parts[0].parse::<u64>()?, parts[1])
    };

    let seconds = seconds_str.parse::<f64>()?;
    let total_seconds = (hours as f64 * 3600.0) + (minutes as f64 * 60.0) + seconds;
    seconds_to_duration(total_seconds, trimmed)
}

fn seconds_to_duration(seconds: f64, original: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    if seconds.is_nan() {
        return Err(format!("invalid time value: {original}").into());
    }
    Duration::try_from_secs_f64(seconds.max(0.0))
        .map_err(|error| format!("invalid time value {original}: {error}").into())
}

fn extraction_config(options: &FrameOptions) -> Result<ExtractionConfig, Box<dyn std::error::Error>> {
    if options.every == 0 {
        return Err("--every must be greater than 0".into());
    }

    let format = FrameFormat::from_name(&options.format)
        .ok_or(format!("unsupported --format: {} (png, jpg)", options.format))?;

    let mut config = ExtractionConfig::new()
        .with_frame_interval(options.every)
        .with_frame_format(format);

    if let Some(start) = &options.start {
        config = config.with_start_time(parse_timecode(start)?.as_secs_f64());
    }
    if let Some(end) = &options.end {
        config = config.with_end_time(parse_timecode(end)?.as_secs_f64());
    }

    if config.has_inverted_window() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            "--end is not after --start; ffmpeg will most likely write no frames".yellow()
        );
    }

    Ok(config)
}

fn build_extractor(global: &GlobalOptions) -> FrameExtractor {
    let mut timeouts = GatewayTimeouts::new();
    if let Some(seconds) = global.timeout {
        timeouts = timeouts.with_extraction(Duration::from_secs(seconds));
    }
    FrameExtractor::with_gateway(Gateway::new(&global.ffmpeg).with_timeouts(timeouts))
}

fn init_logging(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = LoggingConfig::new().with_verbose(global.verbose);
    if let Some(path) = &global.log_file {
        config = config.with_log_file(path);
    }
    logging::init(config)?;
    Ok(())
}

fn info_json(info: Option<&VideoInfo>) -> Value {
    match info {
        Some(info) => json!({
            "duration": info.duration,
            "duration_seconds": info.duration_seconds(),
            "fps": info.fps,
            "width": info.width,
            "height": info.height,
        }),
        None => Value::Null,
    }
}

fn result_json(result: &ExtractionResult) -> Value {
    json!({
        "status": result.status().to_string(),
        "input_path": result.input_path.display().to_string(),
        "output_path": result.output_path().map(|path| path.display().to_string()),
        "error_message": result.error_message(),
        "processing_time": result.processing_time.as_secs_f64(),
    })
}

fn print_result(result: &ExtractionResult, format: FrameFormat, verbose: bool) {
    match result.output_path() {
        Some(directory) => {
            let stem = result
                .input_path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy();
            let frames = list_frames(directory, &stem, format).unwrap_or_default();
            let size = frames
                .first()
                .and_then(|first| frame_dimensions(first).ok())
                .map(|(width, height)| format!(" at {width}x{height}"))
                .unwrap_or_default();
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{}: {} frame(s){size} in {} ({:.2}s)",
                    result.input_name(),
                    frames.len(),
                    directory.display(),
                    result.processing_time.as_secs_f64()
                )
                .green()
            );
            if verbose {
                for frame in &frames {
                    eprintln!("  {}", frame.display());
                }
            }
        }
        None => {
            println!(
                "{} {}",
                "failed:".red().bold(),
                format!(
                    "{}: {}",
                    result.input_name(),
                    result.error_message().unwrap_or_default()
                )
                .red()
            );
        }
    }
}

fn batch_progress_bar(length: usize) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let progress_bar = ProgressBar::new(length as u64);
    let style = ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    progress_bar.set_style(style.progress_chars("##-"));
    Ok(progress_bar)
}

fn report_path(output: &Path, report: Option<PathBuf>) -> PathBuf {
    report.unwrap_or_else(|| output.join(REPORT_FILE_NAME))
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "framepipe", &mut io::stdout());
        return Ok(true);
    }

    init_logging(&cli.global)?;
    let extractor = build_extractor(&cli.global);

    match cli.command {
        Commands::Info { input, json } => {
            if !input.exists() {
                return Err(format!("input does not exist: {}", input.display()).into());
            }
            let info = extractor.video_info(&input);
            if json {
                println!("{}", serde_json::to_string_pretty(&info_json(info.as_ref()))?);
            } else {
                let Some(info) = info else {
                    println!("No video information could be read from {}", input.display());
                    return Ok(false);
                };
                let unknown = || "unknown".to_string();
                println!("Duration: {}", info.duration.clone().unwrap_or_else(unknown));
                println!("FPS: {}", info.fps.clone().unwrap_or_else(unknown));
                match info.dimensions() {
                    Some((width, height)) => println!("Resolution: {width}x{height}"),
                    None => println!("Resolution: unknown"),
                }
                if let Some(estimate) = info.estimated_frame_count(&ExtractionConfig::default()) {
                    println!(
                        "Frames at default interval ({}): ~{estimate}",
                        framepipe::DEFAULT_FRAME_INTERVAL
                    );
                }
            }
            Ok(true)
        }
        Commands::Extract {
            input,
            out,
            frames,
            json,
        } => {
            let config = extraction_config(&frames)?;
            let result = extractor.extract(&input, &out, Some(&config));
            if json {
                println!("{}", serde_json::to_string_pretty(&result_json(&result))?);
            } else {
                print_result(&result, config.frame_format(), cli.global.verbose);
            }
            Ok(result.is_success())
        }
        Commands::Batch {
            input,
            output,
            recursive,
            frames,
            report,
            json,
        } => {
            let config = extraction_config(&frames)?;
            let videos = discovery::find_videos(&input, recursive)?;
            if videos.is_empty() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("no video files found in {}", input.display()).yellow()
                );
                return Ok(true);
            }
            log::info!(
                "Extracting every {}th frame from {} video(s)",
                config.frame_interval(),
                videos.len()
            );

            std::fs::create_dir_all(&output)?;

            let progress_bar = if cli.global.progress {
                Some(batch_progress_bar(videos.len())?)
            } else {
                None
            };

            let mut results = Vec::with_capacity(videos.len());
            for result in extractor.extract_batch(&videos, &output, Some(&config)) {
                if let Some(progress_bar) = &progress_bar {
                    progress_bar.set_message(result.input_name());
                    progress_bar.inc(1);
                } else if !json {
                    print_result(&result, config.frame_format(), cli.global.verbose);
                }
                results.push(result);
            }
            if let Some(progress_bar) = progress_bar {
                progress_bar.finish_with_message("done");
            }

            let report_path = report_path(&output, report);
            write_summary(&results, &report_path)?;
            let summary = BatchSummary::from_results(&results);

            if json {
                let payload = json!({
                    "total": summary.total,
                    "succeeded": summary.succeeded,
                    "failed": summary.failed,
                    "total_time": summary.total_time.as_secs_f64(),
                    "report": report_path.display().to_string(),
                    "results": results.iter().map(result_json).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}/{} video(s) succeeded in {:.2}s, report written to {}",
                    "done:".bold(),
                    summary.succeeded,
                    summary.total,
                    summary.total_time.as_secs_f64(),
                    report_path.display()
                );
            }
            Ok(summary.all_succeeded())
        }
        Commands::Completions { .. } => Ok(true),
    }
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}
