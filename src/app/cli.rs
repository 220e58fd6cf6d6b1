use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Locate and configure the RetDec decompiler used by the plugin"
)]
pub struct Cli {
    /// Settings file to use instead of the one in the user config directory
    #[arg(long)]
    pub settings_file: Option<PathBuf>,

    /// Open the plugin options form and exit
    #[arg(long)]
    pub configure: bool,

    /// Run decompilation in a separate thread
    #[arg(long)]
    pub threads: bool,

    /// Report settings files that cannot be parsed
    #[arg(long)]
    pub strict_config: bool,
}
