//! Sample grouping: partition an expression matrix by a phenotype column

use std::collections::HashMap;

use crate::aggregate::{mean_summary, GroupSummary};
use crate::data::{ExpressionMatrix, PhenotypeTable};
use crate::error::Result;

/// A named group of samples: one distinct phenotype value plus the
/// expression sub-matrix restricted to that group's sample columns.
/// The full gene row set is retained.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    data: ExpressionMatrix,
}

impl Group {
    pub fn new(name: String, data: ExpressionMatrix) -> Self {
        Self { name, data }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ExpressionMatrix {
        &self.data
    }

    pub fn n_samples(&self) -> usize {
        self.data.n_samples()
    }

    pub fn n_genes(&self) -> usize {
        self.data.n_genes()
    }

    pub fn gene_ids(&self) -> &[String] {
        self.data.gene_ids()
    }

    pub fn sample_ids(&self) -> &[String] {
        self.data.sample_ids()
    }
}

/// An expression matrix partitioned into named groups by one phenotype
/// column. Immutable after construction; changing the grouping column
/// means building a new partition.
#[derive(Debug, Clone)]
pub struct GroupedExpression {
    /// The phenotype column the partition was keyed by
    column: String,
    /// Group names in order of first appearance in the phenotype column
    group_names: Vec<String>,
    groups: HashMap<String, Group>,
}

impl GroupedExpression {
    /// The phenotype column this partition was built from
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Group names, in first-appearance order
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn n_groups(&self) -> usize {
        self.group_names.len()
    }

    /// Iterate groups in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.group_names.iter().filter_map(|n| self.groups.get(n))
    }

    /// Per-group mean expression table (group x gene), recomputed from
    /// the groups on each call. Convenience input for cross-group
    /// summaries and heatmaps.
    pub fn mean_summary(&self) -> Result<GroupSummary> {
        let groups: Vec<&Group> = self.iter().collect();
        mean_summary(&groups)
    }
}

/// Partition an expression matrix into groups keyed by the distinct
/// values of `column` in the phenotype table.
///
/// Each sample column lands in exactly one group (the partition is keyed
/// by a single categorical value per sample). Samples listed in the
/// phenotype table but absent from the matrix are skipped with a debug
/// log; a phenotype value whose samples are all absent yields an empty
/// group, which downstream statistics reject via `EmptyGroup`.
pub fn partition(
    matrix: &ExpressionMatrix,
    phenotypes: &PhenotypeTable,
    column: &str,
) -> Result<GroupedExpression> {
    let group_names = phenotypes.distinct_values(column)?;

    let mut groups = HashMap::with_capacity(group_names.len());
    for name in &group_names {
        let sample_ids = phenotypes.samples_with_value(column, name)?;

        let mut indices = Vec::with_capacity(sample_ids.len());
        for id in sample_ids {
            match matrix.sample_index(id) {
                Some(idx) => indices.push(idx),
                None => {
                    log::debug!(
                        "Sample '{}' ({} = '{}') not present in expression matrix, skipping",
                        id,
                        column,
                        name
                    );
                }
            }
        }

        let data = matrix.subset_samples(&indices)?;
        log::info!("Group '{}': {} samples", name, data.n_samples());
        groups.insert(name.clone(), Group::new(name.clone(), data));
    }

    Ok(GroupedExpression {
        column: column.to_string(),
        group_names,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::HashSet;

    fn matrix() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            vec!["g1".to_string(), "g2".to_string()],
            vec!["s1".to_string(), "s2".to_string(), "s3".to_string()],
        )
        .unwrap()
    }

    fn phenotypes(values: &[&str]) -> PhenotypeTable {
        let ids: Vec<String> = (1..=values.len()).map(|i| format!("s{}", i)).collect();
        let mut t = PhenotypeTable::new(ids);
        t.add_column("disease", values.iter().map(|s| s.to_string()).collect())
            .unwrap();
        t
    }

    #[test]
    fn test_partition_is_disjoint_and_covering() {
        let grouped = partition(&matrix(), &phenotypes(&["A", "A", "B"]), "disease").unwrap();
        assert_eq!(grouped.n_groups(), 2);

        let a = grouped.group("A").unwrap();
        let b = grouped.group("B").unwrap();
        assert_eq!(a.n_samples(), 2);
        assert_eq!(b.n_samples(), 1);

        let all: HashSet<&String> = a
            .sample_ids()
            .iter()
            .chain(b.sample_ids().iter())
            .collect();
        assert_eq!(all.len(), 3, "groups must be disjoint and cover all samples");
    }

    #[test]
    fn test_partition_retains_full_gene_set() {
        let grouped = partition(&matrix(), &phenotypes(&["A", "B", "B"]), "disease").unwrap();
        for group in grouped.iter() {
            assert_eq!(group.n_genes(), 2);
        }
    }

    #[test]
    fn test_partition_group_order_is_first_appearance() {
        let grouped = partition(&matrix(), &phenotypes(&["B", "A", "B"]), "disease").unwrap();
        assert_eq!(grouped.group_names(), &["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_partition_unknown_column() {
        let result = partition(&matrix(), &phenotypes(&["A", "A", "B"]), "tissue");
        assert!(matches!(
            result,
            Err(crate::error::DgeError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_partition_skips_samples_missing_from_matrix() {
        // Phenotype table lists s4, which the matrix does not carry
        let mut t = PhenotypeTable::new(vec![
            "s1".to_string(),
            "s2".to_string(),
            "s3".to_string(),
            "s4".to_string(),
        ]);
        t.add_column(
            "disease",
            vec![
                "A".to_string(),
                "A".to_string(),
                "B".to_string(),
                "B".to_string(),
            ],
        )
        .unwrap();

        let grouped = partition(&matrix(), &t, "disease").unwrap();
        assert_eq!(grouped.group("B").unwrap().n_samples(), 1);
    }

    #[test]
    fn test_partition_keeps_empty_group() {
        // All of C's samples are missing from the matrix: the group
        // exists but is empty, and statistics reject it later
        let mut t = PhenotypeTable::new(vec![
            "s1".to_string(),
            "s2".to_string(),
            "s3".to_string(),
            "s9".to_string(),
        ]);
        t.add_column(
            "disease",
            vec![
                "A".to_string(),
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
            ],
        )
        .unwrap();

        let grouped = partition(&matrix(), &t, "disease").unwrap();
        assert_eq!(grouped.n_groups(), 3);
        assert_eq!(grouped.group("C").unwrap().n_samples(), 0);
    }
}
