//! Topic Data Tools CLI
//!
//! Command-line tool for converting delimited topic files to JSON
//! documents and for generating a topic index over a directory of
//! JSON files.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use td_core::multi::DEFAULT_MIN_ALTERNATIVES;
use td_core::{
    analyze_file, build_index, convert_multi, convert_pairs, multi, pairs,
    DEFAULT_INDEX_FILENAME,
};

#[derive(Debug, Parser)]
#[command(name = "td-cli")]
#[command(about = "Topic data conversion and indexing tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a CSV of term pairs (exactly two columns) to JSON
    Pairs {
        /// Path to the input CSV file
        input: PathBuf,

        /// Output JSON path (default: input with a .json extension)
        output: Option<PathBuf>,
    },

    /// Convert a CSV of grouped alternatives to JSON
    Multi {
        /// Path to the input CSV file
        input: PathBuf,

        /// Output JSON path (default: input stem + _multiple.json)
        output: Option<PathBuf>,

        /// Minimum number of alternatives required per row
        #[arg(long, default_value_t = DEFAULT_MIN_ALTERNATIVES)]
        min_alternatives: usize,

        /// Show the distribution of alternatives instead of converting
        #[arg(long)]
        analyze: bool,
    },

    /// Generate a topic index manifest for a directory of JSON files
    Index {
        /// Directory containing the JSON files to index
        dir: PathBuf,

        /// Manifest filename, written into the directory
        #[arg(short, long, default_value = DEFAULT_INDEX_FILENAME)]
        output: String,
    },
}

fn main() {
    // Usage text and argument errors go to standard output; the exit
    // code stays non-zero for real errors (0 for --help/--version).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            print!("{}", e.render());
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> td_core::Result<()> {
    match cli.command {
        Commands::Pairs { input, output } => cmd_pairs(&input, output),
        Commands::Multi {
            input,
            output,
            min_alternatives,
            analyze,
        } => {
            if analyze {
                cmd_analyze(&input)
            } else {
                cmd_multi(&input, output, min_alternatives)
            }
        }
        Commands::Index { dir, output } => cmd_index(&dir, &output),
    }
}

fn cmd_pairs(input: &PathBuf, output: Option<PathBuf>) -> td_core::Result<()> {
    let doc = convert_pairs(input)?;
    let out = output.unwrap_or_else(|| pairs::default_output_path(input));

    if let Some(invalid) = &doc.invalid_rows {
        println!(
            "Warning: Found {} rows that don't contain exactly 2 elements.",
            invalid.count
        );
        println!("These rows have been recorded in the 'invalid_rows' section of the JSON output.");
    }

    doc.save(&out)?;

    println!(
        "Successfully converted '{}' to '{}'",
        input.display(),
        out.display()
    );
    println!("Total valid pairs: {}", doc.total_pairs);
    if doc.invalid_count() > 0 {
        println!("Invalid rows (not pairs): {}", doc.invalid_count());
    }

    Ok(())
}

fn cmd_multi(input: &PathBuf, output: Option<PathBuf>, min: usize) -> td_core::Result<()> {
    let doc = convert_multi(input, min)?;
    let out = output.unwrap_or_else(|| multi::default_output_path(input));

    if let Some(invalid) = &doc.invalid_rows {
        println!(
            "Warning: Found {} rows with less than {} elements.",
            invalid.count, min
        );
        println!("These rows have been recorded in the 'invalid_rows' section of the JSON output.");
    }

    doc.save(&out)?;

    println!(
        "Successfully converted '{}' to '{}'",
        input.display(),
        out.display()
    );
    println!("Total entries: {}", doc.metadata.total_entries);
    println!(
        "Alternative counts: min={}, max={}, avg={}",
        doc.statistics.min_alternatives,
        doc.statistics.max_alternatives,
        doc.statistics.average_alternatives
    );
    if doc.invalid_count() > 0 {
        println!(
            "Invalid rows (less than {} alternatives): {}",
            min,
            doc.invalid_count()
        );
    }

    Ok(())
}

fn cmd_analyze(input: &PathBuf) -> td_core::Result<()> {
    let dist = analyze_file(input)?;

    println!();
    println!("Analysis of '{}':", input.display());
    println!("Total non-empty rows: {}", dist.total_rows);
    println!();
    println!("Distribution of alternatives per row:");
    for (count, rows) in &dist.counts {
        println!(
            "  {} alternatives: {} rows ({:.1}%)",
            count,
            rows,
            dist.percentage(*rows)
        );
    }

    Ok(())
}

fn cmd_index(dir: &PathBuf, output: &str) -> td_core::Result<()> {
    let out_path = dir.join(output);
    if out_path.exists() {
        println!("Note: Existing {} will be completely replaced.", output);
    }

    let index = build_index(dir, output, "td-cli")?;

    println!("Found {} JSON files to index", index.total_files);
    for file in &index.files {
        if let Some(err) = &file.read_error {
            println!("  Warning: Could not read {}: {}", file.filename, err);
        }
        println!("  - Added {}", file.filename);
    }

    index.save(&out_path)?;

    println!();
    println!(
        "Successfully regenerated {} with {} files",
        output, index.total_files
    );
    println!("Output saved to: {}", out_path.display());

    println!();
    println!("Summary of indexed files:");
    for file in &index.files {
        let entries = file
            .total_entries
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("  - {}: {} entries", file.filename, entries);
    }

    Ok(())
}
