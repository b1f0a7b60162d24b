use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roster::{employees, find_employees, Editor, Employee, MatchCriteria, WriterConfig, XmlElement};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Edit XML employee rosters")]
struct Args {
    /// Roster file to read and rewrite
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Log filter, e.g. `debug` or `roster=trace` (defaults to RUST_LOG, then `info`)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,
    /// Write indented output with an XML declaration
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every employee
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print employees matching any criterion
    Find {
        /// Criterion `field=value`, compared ignoring case
        #[arg(short, long = "match", value_name = "FIELD=VALUE", value_parser = parse_pair, required = true)]
        criteria: Vec<(String, String)>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Append a new employee
    Add {
        /// Field `name=value`, in order
        #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_pair, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Append a group of fields under each matching employee
    AddGroup {
        /// Group tag, e.g. `address`
        #[arg(short, long)]
        group: String,
        /// Sub-field `name=value`, in order
        #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_pair, required = true)]
        fields: Vec<(String, String)>,
        /// Criterion `field=value`, compared ignoring case
        #[arg(short, long = "match", value_name = "FIELD=VALUE", value_parser = parse_pair, required = true)]
        criteria: Vec<(String, String)>,
    },
    /// Remove employees matching any criterion
    Remove {
        /// Criterion `field=value`, compared ignoring case
        #[arg(short, long = "match", value_name = "FIELD=VALUE", value_parser = parse_pair, required = true)]
        criteria: Vec<(String, String)>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref())?;

    let writer = if args.pretty {
        WriterConfig::pretty(4)
    } else {
        WriterConfig::compact()
    };
    let editor = Editor::new().with_writer_config(writer);
    let path = args.file.as_path();
    let mut doc = editor.load(path).context("could not open roster")?;

    match args.command {
        Command::List { json } => {
            let staff: Vec<&XmlElement> = employees(&doc).collect();
            print_employees(&staff, json)?;
        }
        Command::Find { criteria, json } => {
            let criteria: MatchCriteria = criteria.into_iter().collect();
            print_employees(&find_employees(&doc, &criteria), json)?;
        }
        Command::Add { fields } => {
            let (names, values) = split_pairs(fields);
            let outcome = editor
                .add_employee(&mut doc, &names, &values, path)
                .context("could not add employee")?;
            println!("{outcome}");
        }
        Command::AddGroup {
            group,
            fields,
            criteria,
        } => {
            let (names, values) = split_pairs(fields);
            let criteria: MatchCriteria = criteria.into_iter().collect();
            let outcome = editor
                .add_group_to_employee(&mut doc, &group, &names, &values, path, &criteria)
                .with_context(|| format!("could not add group {group}"))?;
            println!("{outcome}");
        }
        Command::Remove { criteria } => {
            let criteria: MatchCriteria = criteria.into_iter().collect();
            let outcome = editor
                .remove_employee(&mut doc, path, &criteria)
                .context("could not remove employee")?;
            println!("{outcome}");
        }
    }

    Ok(())
}

fn init_logging(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(filter) => EnvFilter::try_new(filter).context("invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false) // Don't show target
        .without_time() // Don't show timestamps
        .with_writer(std::io::stderr) // Keep stdout for roster output
        .init();
    Ok(())
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}

fn split_pairs(pairs: Vec<(String, String)>) -> (Vec<String>, Vec<String>) {
    pairs.into_iter().unzip()
}

fn print_employees(staff: &[&XmlElement], json: bool) -> Result<()> {
    let staff: Vec<Employee> = staff.iter().map(|e| Employee::from_element(e)).collect();

    if json {
        let out = serde_json::to_string_pretty(&staff).context("could not encode employees")?;
        println!("{out}");
        return Ok(());
    }

    if staff.is_empty() {
        println!("no employees");
        return Ok(());
    }

    for (index, employee) in staff.iter().enumerate() {
        println!("employee {}", index + 1);
        for field in &employee.fields {
            println!("  {}: {}", field.name, field.value);
        }
        for group in &employee.groups {
            println!("  {}:", group.name);
            for field in &group.fields {
                println!("    {}: {}", field.name, field.value);
            }
        }
    }
    Ok(())
}
