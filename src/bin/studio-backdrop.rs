use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use studio_backdrop::{
    default_output_path, load_logo, ProcessOptions, ProcessResult, StudioConfig, StudioEngine,
};

#[derive(Parser)]
#[command(
    name = "studio-backdrop",
    about = "Place product cutouts on hue-matched studio backdrops",
    version,
    after_help = "Simple usage: studio-backdrop <cutout.png> --logo logo.png\n\n\
                  NOTE: Input must already be a cutout with a transparent background.\n\
                  Images without an alpha channel are used whole."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input cutout image or directory
    input: Option<String>,

    /// Output file or directory (default: {name}_studio.png)
    #[arg(short, long)]
    output: Option<String>,

    /// Watermark logo image; the badge is skipped if missing or unreadable
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// Do not stamp the watermark badge
    #[arg(long)]
    no_watermark: bool,

    /// JSON file overriding palettes, thresholds and ratios
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sharpen cutout edges with an unsharp mask before compositing
    #[arg(short, long)]
    sharpen: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &cli.config {
        Some(path) => match StudioConfig::from_path(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Fatal: {e}");
                process::exit(1);
            }
        },
        None => StudioConfig::default(),
    };

    if cli.print_config {
        match config.to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Fatal: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let Some(input) = cli.input.as_deref() else {
        eprintln!("Error: an input image or directory is required");
        process::exit(1);
    };

    let opts = ProcessOptions {
        add_watermark: !cli.no_watermark,
        sharpen: cli.sharpen,
    };

    let logo = if opts.add_watermark {
        cli.logo.as_deref().and_then(load_logo)
    } else {
        None
    };

    let engine = match StudioEngine::new(config) {
        Ok(e) => e.with_logo(logo),
        Err(e) => {
            eprintln!("Fatal: Failed to initialize engine: {e}");
            process::exit(1);
        }
    };

    let input_path = Path::new(input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {input}");
        process::exit(1);
    }

    if !cli.quiet {
        if !opts.add_watermark {
            eprintln!("Watermark disabled");
        } else if engine.logo().is_none() {
            eprintln!("No usable logo - rendering without watermark");
        }
        if opts.sharpen {
            eprintln!("Edge sharpening enabled");
        }
        eprintln!();
    }

    let results = if input_path.is_dir() {
        let output_dir = if let Some(o) = &cli.output {
            PathBuf::from(o)
        } else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: studio-backdrop <input_dir> -o <output_dir>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir, &opts)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path),
        };
        vec![engine.process_file(input_path, &output_path, &opts)]
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &cli);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Rendered: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, cli: &Cli) {
    if cli.quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        match &result.palette {
            Some(p) => eprintln!("[OK] {filename} ({p})"),
            None => eprintln!("[OK] {filename}"),
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }

    if cli.verbose && !result.message.is_empty() {
        eprintln!("  -> {}", result.message);
    }
}
