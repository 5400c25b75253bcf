//! Place a single cutout on its studio backdrop.
//!
//! Usage:
//! ```sh
//! cargo run --example render_photo -- cutout.png output.png [logo.png]
//! ```

use std::env;
use std::path::Path;
use std::process;

use studio_backdrop::{load_logo, ProcessOptions, StudioEngine};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output> [logo]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let logo = args.get(3).and_then(|p| load_logo(Path::new(p)));

    let engine = StudioEngine::default().with_logo(logo);
    let opts = ProcessOptions::default();
    let result = engine.process_file(input.as_ref(), output.as_ref(), &opts);

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
