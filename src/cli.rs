use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-loader")]
#[command(about = "Locate Java classes on a classpath and decode their class files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JRE directory holding the bootstrap libraries under lib/
    #[arg(long, value_name = "DIR", global = true)]
    pub xjre: Option<PathBuf>,

    /// User classpath, entries separated by the platform path-list separator
    #[arg(long, visible_alias = "cp", value_name = "PATHS", global = true)]
    pub classpath: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Find a class and print its decoded structure
    Parse {
        class_name: String,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Report which classpath entry provides each class
    Locate {
        #[arg(required = true)]
        class_names: Vec<String>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Decode a class file read straight from disk
    Dump {
        file: PathBuf,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the bootstrap, extension and user classpaths
    Classpath,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
