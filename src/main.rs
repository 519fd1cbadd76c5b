use anyhow::{Context, Result};
use clap::Parser;
use class_loader::classfile::ClassFile;
use class_loader::classpath::Classpath;
use class_loader::cli::{Cli, Commands, OutputFormat};
use class_loader::config::LoaderConfig;
use class_loader::error::ClasspathError;
use class_loader::report::{ClassReport, LocateReport};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = parse_cli()?;
    init_tracing(cli.verbose);

    match cli.command.clone() {
        Commands::Parse { class_name, format } => {
            let classpath = open_classpath(&cli)?;
            let class_name = normalize_class_name(&class_name);
            let report = parse_class(&classpath, &class_name)?;
            write_output(&report, format, ClassReport::to_text)?;
        }
        Commands::Locate {
            class_names,
            format,
        } => {
            let classpath = open_classpath(&cli)?;
            let reports = locate_classes(&classpath, &class_names);
            match format {
                OutputFormat::Json => print_text(&serde_json::to_string_pretty(&reports)?),
                OutputFormat::Text => {
                    print_text(&reports.iter().map(LocateReport::to_text).collect::<String>())
                }
            }
            let missing = reports.iter().filter(|r| !r.found).count();
            if missing > 0 {
                anyhow::bail!("{missing} of {} classes not found", reports.len());
            }
        }
        Commands::Dump { file, format } => {
            let report = dump_class_file(&file)?;
            write_output(&report, format, ClassReport::to_text)?;
        }
        Commands::Classpath => {
            let classpath = open_classpath(&cli)?;
            print_text(&classpath_listing(&classpath));
        }
    }

    Ok(())
}

fn parse_cli() -> Result<Cli> {
    let args: Vec<String> = std::env::args().collect();
    Ok(Cli::parse_from(rewrite_args_for_implicit_parse(args)))
}

/// `class-loader [opts] java.lang.Object` means `class-loader [opts] parse java.lang.Object`.
fn rewrite_args_for_implicit_parse(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = ["parse", "locate", "dump", "classpath", "help"];
    let valued = ["--xjre", "--classpath", "--cp"];

    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if a == "--" {
            idx += 1;
            break;
        }

        if valued.contains(&a) {
            idx += 2;
            continue;
        }

        if a.starts_with('-') {
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(idx, "parse".to_string());
        }
    }

    args
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_classpath(cli: &Cli) -> Result<Classpath> {
    let config = LoaderConfig::from_cli(cli);
    Classpath::parse(&config)
        .context("Failed to set up the bootstrap classpath (use --xjre or JAVA_HOME)")
}

fn normalize_class_name(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

fn parse_class(classpath: &Classpath, class_name: &str) -> Result<ClassReport> {
    let found = match classpath.read_class(class_name) {
        Ok(found) => found,
        Err(ClasspathError::ClassNotFound { .. }) => {
            anyhow::bail!("Could not find or load main class {class_name}")
        }
        Err(err) => return Err(err.into()),
    };
    let class = ClassFile::parse(&found.data)
        .with_context(|| format!("Failed to decode {class_name} from {}", found.entry))?;
    Ok(ClassReport::new(&class, &found.data, Some(found.entry)))
}

fn locate_classes(classpath: &Classpath, class_names: &[String]) -> Vec<LocateReport> {
    class_names
        .par_iter()
        .map(|raw| {
            let class_name = normalize_class_name(raw);
            LocateReport::new(&class_name, &classpath.read_class(&class_name))
        })
        .collect()
}

fn dump_class_file(path: &Path) -> Result<ClassReport> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read class file: {}", path.display()))?;
    let class = ClassFile::parse(&data)
        .with_context(|| format!("Failed to decode class file: {}", path.display()))?;
    Ok(ClassReport::new(&class, &data, None))
}

fn write_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl Fn(&T) -> String,
) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Text => text(value),
    };
    print_text(&content);
    Ok(())
}

/// Each root followed by its leaf entries, one per line, in search order.
fn classpath_listing(classpath: &Classpath) -> String {
    let mut out = String::new();
    for (root, entry) in [
        ("boot", classpath.boot()),
        ("ext", classpath.ext()),
        ("user", classpath.user()),
    ] {
        out.push_str(&format!("{root}:\n"));
        for leaf in entry.leaves() {
            out.push_str(&format!("  {leaf}\n"));
        }
    }
    out
}

fn print_text(content: &str) {
    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
}
