//! Tabular input/output for expression matrices, phenotype tables and
//! results
//!
//! Readers accept the column layout produced by upstream preprocessing:
//! first column is the row identifier (gene or sample id), first row is
//! the header. Comma and tab delimiters are auto-detected.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use ndarray::Array2;

use crate::aggregate::GroupSummary;
use crate::data::{ExpressionMatrix, PhenotypeTable};
use crate::error::{DgeError, Result};

/// Strip surrounding quotes from a field
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')) {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Detect the delimiter from the header line (tab wins over comma)
fn detect_delimiter(header: &str) -> u8 {
    if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn build_reader<P: AsRef<Path>>(path: P) -> Result<csv::Reader<BufReader<File>>> {
    let mut probe = BufReader::new(File::open(path.as_ref())?);
    let mut header = String::new();
    probe.read_line(&mut header)?;
    if header.trim().is_empty() {
        return Err(DgeError::EmptyData {
            reason: format!("Empty file: {}", path.as_ref().display()),
        });
    }

    Ok(csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(&header))
        .has_headers(true)
        .flexible(false)
        .from_reader(BufReader::new(File::open(path.as_ref())?)))
}

/// Read an expression matrix.
/// Expected format: first column gene ids, header row sample ids,
/// remaining cells numeric intensities (negative values allowed).
pub fn read_expression_matrix<P: AsRef<Path>>(path: P) -> Result<ExpressionMatrix> {
    let mut reader = build_reader(&path)?;

    let sample_ids: Vec<String> = reader
        .headers()?
        .iter()
        .skip(1)
        .map(strip_quotes)
        .collect();
    let n_samples = sample_ids.len();
    if n_samples == 0 {
        return Err(DgeError::InvalidMatrix {
            reason: "No sample columns in header".to_string(),
        });
    }

    let mut gene_ids: Vec<String> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.len() != n_samples + 1 {
            return Err(DgeError::InvalidMatrix {
                reason: format!(
                    "Row has {} columns, expected {}",
                    record.len(),
                    n_samples + 1
                ),
            });
        }

        gene_ids.push(strip_quotes(&record[0]));
        for field in record.iter().skip(1) {
            let cleaned = strip_quotes(field);
            let value = cleaned
                .parse::<f64>()
                .map_err(|_| DgeError::InvalidMatrix {
                    reason: format!("Invalid expression value: '{}'", cleaned),
                })?;
            values.push(value);
        }
    }

    if gene_ids.is_empty() {
        return Err(DgeError::EmptyData {
            reason: "No genes found in expression matrix".to_string(),
        });
    }

    let n_genes = gene_ids.len();
    let matrix =
        Array2::from_shape_vec((n_genes, n_samples), values).map_err(|e| DgeError::InvalidMatrix {
            reason: e.to_string(),
        })?;

    ExpressionMatrix::new(matrix, gene_ids, sample_ids)
}

/// Read a phenotype table.
/// Expected format: first column sample ids, remaining columns
/// categorical attributes.
pub fn read_phenotype_table<P: AsRef<Path>>(path: P) -> Result<PhenotypeTable> {
    let mut reader = build_reader(&path)?;

    let column_names: Vec<String> = reader
        .headers()?
        .iter()
        .skip(1)
        .map(strip_quotes)
        .collect();

    let mut sample_ids: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); column_names.len()];

    for record in reader.records() {
        let record = record?;
        if record.len() != column_names.len() + 1 {
            return Err(DgeError::InvalidPhenotypes {
                reason: format!(
                    "Row has {} columns, expected {}",
                    record.len(),
                    column_names.len() + 1
                ),
            });
        }

        sample_ids.push(strip_quotes(&record[0]));
        for (i, field) in record.iter().skip(1).enumerate() {
            columns[i].push(strip_quotes(field));
        }
    }

    if sample_ids.is_empty() {
        return Err(DgeError::EmptyData {
            reason: "No samples found in phenotype table".to_string(),
        });
    }

    let mut table = PhenotypeTable::new(sample_ids);
    for (name, values) in column_names.iter().zip(columns.into_iter()) {
        table.add_column(name, values)?;
    }

    Ok(table)
}

/// Read a gene list: one id per line, blank lines skipped
pub fn read_gene_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut genes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            genes.push(trimmed.to_string());
        }
    }
    if genes.is_empty() {
        return Err(DgeError::EmptyData {
            reason: "Gene list file is empty".to_string(),
        });
    }
    Ok(genes)
}

/// Write a results table as TSV, rows in the table's order
pub fn write_results<P: AsRef<Path>>(path: P, results: &super::DeResults) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "gene\tlog2_fold_change\tp_value\tneg_log10_pvalue")?;
    for i in 0..results.n_genes() {
        writeln!(
            file,
            "{}\t{:.6}\t{:.6e}\t{:.6}",
            results.gene_ids[i],
            results.fold_changes[i],
            results.p_values[i],
            results.neg_log10_pvalues[i],
        )?;
    }

    Ok(())
}

/// Write a results table as JSON (plotting/export sidecar)
pub fn write_results_json<P: AsRef<Path>>(path: P, results: &super::DeResults) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

/// Write a group x gene mean summary as TSV: one row per group
pub fn write_group_summary<P: AsRef<Path>>(path: P, summary: &GroupSummary) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "group\t{}", summary.gene_ids().join("\t"))?;
    for (gi, name) in summary.group_names().iter().enumerate() {
        let row: Vec<String> = (0..summary.n_genes())
            .map(|j| format!("{:.4}", summary.mean(gi, j)))
            .collect();
        writeln!(file, "{}\t{}", name, row.join("\t"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_expression_matrix_tsv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "symbol\ts1\ts2\ts3").unwrap();
        writeln!(file, "G1\t1.5\t2.5\t3.5").unwrap();
        writeln!(file, "G2\t-0.5\t0.0\t0.5").unwrap();

        let matrix = read_expression_matrix(file.path()).unwrap();
        assert_eq!(matrix.n_genes(), 2);
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.values()[[1, 0]], -0.5);
    }

    #[test]
    fn test_read_expression_matrix_csv_with_quotes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "symbol,s1,s2").unwrap();
        writeln!(file, "\"G1\",1.0,2.0").unwrap();

        let matrix = read_expression_matrix(file.path()).unwrap();
        assert_eq!(matrix.gene_ids(), &["G1".to_string()]);
    }

    #[test]
    fn test_read_expression_matrix_bad_value() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "symbol,s1").unwrap();
        writeln!(file, "G1,abc").unwrap();

        assert!(read_expression_matrix(file.path()).is_err());
    }

    #[test]
    fn test_read_phenotype_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id,disease,tissue").unwrap();
        writeln!(file, "s1,tumor,lung").unwrap();
        writeln!(file, "s2,normal,lung").unwrap();

        let table = read_phenotype_table(file.path()).unwrap();
        assert_eq!(table.n_samples(), 2);
        assert!(table.has_column("disease"));
        assert_eq!(table.value("disease", 1).unwrap(), "normal");
    }

    #[test]
    fn test_read_gene_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "G1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  G2  ").unwrap();

        let genes = read_gene_list(file.path()).unwrap();
        assert_eq!(genes, vec!["G1", "G2"]);
    }

    #[test]
    fn test_write_and_reread_results_json() {
        use crate::io::{Contrast, DeResults};

        let results = DeResults {
            gene_ids: vec!["G1".to_string()],
            fold_changes: vec![2.0],
            p_values: vec![0.01],
            neg_log10_pvalues: vec![2.0],
            contrast: Contrast {
                control: "A".to_string(),
                case: "B".to_string(),
            },
            dropped_genes: 0,
        };

        let file = NamedTempFile::new().unwrap();
        write_results_json(file.path(), &results).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let back: DeResults = serde_json::from_str(&text).unwrap();
        assert_eq!(back.gene_ids, results.gene_ids);
        assert_eq!(back.contrast.case, "B");
    }

    #[test]
    fn test_write_results_tsv_header() {
        use crate::io::{Contrast, DeResults};

        let results = DeResults {
            gene_ids: vec!["G1".to_string()],
            fold_changes: vec![1.0],
            p_values: vec![0.5],
            neg_log10_pvalues: vec![0.30103],
            contrast: Contrast {
                control: "A".to_string(),
                case: "B".to_string(),
            },
            dropped_genes: 0,
        };

        let file = NamedTempFile::new().unwrap();
        write_results(file.path(), &results).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("gene\tlog2_fold_change\tp_value\tneg_log10_pvalue\n"));
        assert!(text.contains("G1\t"));
    }
}
