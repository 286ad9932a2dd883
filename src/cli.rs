use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "squeeze-originals",
    about = "Compress the site's original images into public/images",
    long_about = "squeeze-originals walks public/images/_original, re-encodes JPEG, PNG and WebP \
                  images (scaling anything wider than 1300px down), copies SVG/GIF/AVIF/HEIC \
                  files unchanged, and mirrors the directory structure into public/images. \
                  Every other file is skipped.",
    version,
    after_help = "EXAMPLES:\n  \
    squeeze-originals\n  \
    squeeze-originals --project-root ./site -j 4\n  \
    squeeze-originals -q"
)]
pub struct Args {
    #[arg(
        long,
        value_name = "DIR",
        help = "Project root (default: current directory)",
        long_help = "Directory containing public/images/_original. \
                     Defaults to the current working directory."
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        short = 'j',
        long,
        help = "Number of files processed at once (default: CPU count, max 8)",
        long_help = "Upper bound on files processed concurrently. \
                     Values are clamped to the range 1..=8."
    )]
    pub jobs: Option<usize>,

    #[arg(short = 'q', long, help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print per-file codec details")]
    pub verbose: bool,
}
