//! geo_dge command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use geo_dge::cli::{Cli, Commands};
use geo_dge::prelude::*;

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Run {
            expression,
            phenotypes,
            column,
            control,
            case,
            genes,
            fc_threshold,
            p_threshold,
            top,
            output,
            json,
            threads,
        } => run_analysis(
            &expression,
            &phenotypes,
            &column,
            &control,
            &case,
            genes.as_deref(),
            fc_threshold,
            p_threshold,
            top,
            &output,
            json.as_deref(),
            threads,
        ),
        Commands::Groups {
            expression,
            phenotypes,
            column,
            genes,
            output,
        } => run_groups(&expression, &phenotypes, &column, genes.as_deref(), &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_matrix(expression_path: &str, gene_list_path: Option<&str>) -> Result<ExpressionMatrix> {
    info!("Loading expression matrix from: {}", expression_path);
    let mut matrix = read_expression_matrix(expression_path)?;
    info!("  {} genes, {} samples", matrix.n_genes(), matrix.n_samples());

    if let Some(path) = gene_list_path {
        info!("Restricting to gene list: {}", path);
        let gene_list = read_gene_list(path)?;
        matrix = matrix.retain_genes(&gene_list)?;
        info!(
            "  {} of {} listed genes found in matrix",
            matrix.n_genes(),
            gene_list.len()
        );
    }

    Ok(matrix)
}

#[allow(clippy::too_many_arguments)]
fn run_analysis(
    expression_path: &str,
    phenotypes_path: &str,
    column: &str,
    control_name: &str,
    case_name: &str,
    gene_list_path: Option<&str>,
    fc_threshold: f64,
    p_threshold: f64,
    top: Option<usize>,
    output_path: &str,
    json_path: Option<&str>,
    threads: usize,
) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    let matrix = load_matrix(expression_path, gene_list_path)?;

    info!("Loading phenotype table from: {}", phenotypes_path);
    let phenotypes = read_phenotype_table(phenotypes_path)?;

    info!("Partitioning samples by '{}'", column);
    let grouped = partition(&matrix, &phenotypes, column)?;

    let control = grouped
        .group(control_name)
        .ok_or_else(|| DgeError::InvalidInput {
            reason: format!(
                "Control group '{}' not found; available: {:?}",
                control_name,
                grouped.group_names()
            ),
        })?;
    let case = grouped.group(case_name).ok_or_else(|| DgeError::InvalidInput {
        reason: format!(
            "Case group '{}' not found; available: {:?}",
            case_name,
            grouped.group_names()
        ),
    })?;

    info!(
        "Comparing '{}' ({} samples) against '{}' ({} samples)",
        case_name,
        case.n_samples(),
        control_name,
        control.n_samples()
    );
    let results = run_comparison(control, case)?;

    let ranked = results.sorted_by_pvalue();
    let table = match top {
        Some(n) => {
            info!(
                "Selecting top {} significant genes (|FC| >= {}, p < {})",
                n, fc_threshold, p_threshold
            );
            select_top(&ranked, fc_threshold, p_threshold, n)
        }
        None => ranked,
    };

    info!("Writing results to: {}", output_path);
    write_results(output_path, &table)?;

    if let Some(path) = json_path {
        info!("Writing JSON results to: {}", path);
        write_results_json(path, &table)?;
    }

    let summary = results.summary(fc_threshold, p_threshold);
    println!("\n{}", summary);

    Ok(())
}

fn run_groups(
    expression_path: &str,
    phenotypes_path: &str,
    column: &str,
    gene_list_path: Option<&str>,
    output_path: &str,
) -> Result<()> {
    let matrix = load_matrix(expression_path, gene_list_path)?;

    info!("Loading phenotype table from: {}", phenotypes_path);
    let phenotypes = read_phenotype_table(phenotypes_path)?;

    info!("Partitioning samples by '{}'", column);
    let grouped = partition(&matrix, &phenotypes, column)?;

    let summary = grouped.mean_summary()?;

    info!("Writing group mean summary to: {}", output_path);
    write_group_summary(output_path, &summary)?;

    for group in grouped.iter() {
        println!("{}: {} samples", group.name(), group.n_samples());
    }

    Ok(())
}
