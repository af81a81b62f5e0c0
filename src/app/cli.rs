use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Collect the contents of matching files from folders into a JSON file"
)]
pub struct Cli {
    /// Directory holding content.json. Remembered for later runs; defaults to the
    /// last remembered directory, then the current directory
    pub output_dir: Option<PathBuf>,
}
