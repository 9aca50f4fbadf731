//! Command-line interface for geo_dge

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "geo_dge")]
#[command(version)]
#[command(about = "Two-group differential gene expression analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a two-group differential expression comparison
    #[command(
        long_about = "Run a two-group differential expression comparison\n\n\
            Partitions samples by a phenotype column, compares the case group\n\
            against the control group gene-by-gene (mean difference + Welch's\n\
            t-test), and writes the ranked result table. No multiple-testing\n\
            correction is applied to the reported p-values.",
        after_long_help = "\
Examples:
  # Compare tumor vs normal, ranked table to results.tsv
  geo_dge run -e expr.csv -p phenotypes.csv --column disease \\
    --control normal --case tumor -o results.tsv

  # Restrict to a gene list, keep only the top 10 significant genes
  geo_dge run -e expr.csv -p phenotypes.csv --column disease \\
    --control normal --case tumor --genes panel.txt --top 10

  # JSON sidecar for plotting
  geo_dge run -e expr.csv -p phenotypes.csv --column disease \\
    --control normal --case tumor -o results.tsv --json results.json"
    )]
    Run {
        /// Path to the expression matrix CSV/TSV file
        #[arg(short, long,
            long_help = "Path to the expression matrix file.\n\
                Format: first column = gene ids, header row = sample ids.\n\
                Comma and tab delimiters are auto-detected. Values are used\n\
                as-is; if they are log-scaled the fold change is a log2 FC.")]
        expression: String,

        /// Path to the phenotype table CSV/TSV file
        #[arg(short, long,
            long_help = "Path to the phenotype table file.\n\
                Format: first column = sample ids (matching expression matrix\n\
                columns), remaining columns = categorical attributes.")]
        phenotypes: String,

        /// Phenotype column to partition samples by
        #[arg(long)]
        column: String,

        /// Control (baseline) group name
        #[arg(long)]
        control: String,

        /// Case group name
        #[arg(long)]
        case: String,

        /// Optional gene list file (one id per line) to restrict the matrix
        #[arg(long)]
        genes: Option<String>,

        /// Fold-change magnitude threshold [default: 1]
        #[arg(long, default_value = "1.0",
            long_help = "Fold-change magnitude threshold for significance.\n\
                Inclusive: a gene passes with |fold change| >= threshold.")]
        fc_threshold: f64,

        /// P-value threshold [default: 0.05]
        #[arg(long, default_value = "0.05",
            long_help = "P-value threshold for significance.\n\
                Strict: a gene passes with p < threshold, so NaN p-values\n\
                (zero-variance genes) never pass.")]
        p_threshold: f64,

        /// Keep only the top N significant genes (omit to write all results)
        #[arg(long)]
        top: Option<usize>,

        /// Output file path [default: de_results.tsv]
        #[arg(short, long, default_value = "de_results.tsv")]
        output: String,

        /// Also write the results as JSON to this path
        #[arg(long)]
        json: Option<String>,

        /// Number of threads (0 = auto) [default: 0]
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },

    /// Partition samples and write the per-group mean expression table
    #[command(
        long_about = "Partition samples by a phenotype column and write the\n\
            group x gene mean expression summary (heatmap input).",
        after_long_help = "\
Examples:
  geo_dge groups -e expr.csv -p phenotypes.csv --column disease -o means.tsv"
    )]
    Groups {
        /// Path to the expression matrix CSV/TSV file
        #[arg(short, long)]
        expression: String,

        /// Path to the phenotype table CSV/TSV file
        #[arg(short, long)]
        phenotypes: String,

        /// Phenotype column to partition samples by
        #[arg(long)]
        column: String,

        /// Optional gene list file to restrict the matrix
        #[arg(long)]
        genes: Option<String>,

        /// Output file path [default: group_means.tsv]
        #[arg(short, long, default_value = "group_means.tsv")]
        output: String,
    },
}
