use statrs::statistics::Statistics;
use std::collections::HashMap;
use tracing::debug;

use crate::data::Table;
use crate::error::{PipelineError, PipelineResult};

/// Per-group means of every indicator.
///
/// Rows are keyed by diet group and carry no meaningful order, so callers look
/// them up with [`GroupAggregate::row`] instead of iterating by position.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAggregate {
    indicators: Vec<String>,
    rows: HashMap<String, Vec<f64>>,
}

impl GroupAggregate {
    // group the table rows by key, then take the mean of every indicator per group
    pub fn from_table(table: &Table) -> PipelineResult<GroupAggregate> {
        let width = table.indicators.len();
        let mut columns: HashMap<&str, Vec<Vec<f64>>> = HashMap::new();

        for record in &table.records {
            let per_group = columns
                .entry(record.group.as_str())
                .or_insert_with(|| vec![Vec::new(); width]);
            // missing cells are skipped, same as a dataframe mean
            for (column, value) in per_group.iter_mut().zip(&record.values) {
                if let Some(v) = value {
                    column.push(*v);
                }
            }
        }

        // a group with nothing present in a column gets NaN there, like a dataframe mean;
        // only the groups that get drawn are held to having values, in require_groups
        let mut rows = HashMap::with_capacity(columns.len());
        for (group, per_group) in columns {
            let means: Vec<f64> = per_group
                .iter()
                .map(|values| if values.is_empty() { f64::NAN } else { Statistics::mean(values) })
                .collect();
            debug!("{}: '{}' -> {:?}", table.path.display(), group, means);
            rows.insert(group.to_string(), means);
        }

        Ok(GroupAggregate {
            indicators: table.indicators.clone(),
            rows,
        })
    }

    pub(crate) fn from_rows(indicators: Vec<String>, rows: HashMap<String, Vec<f64>>) -> GroupAggregate {
        GroupAggregate { indicators, rows }
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn row(&self, group: &str) -> PipelineResult<&[f64]> {
        self.rows
            .get(group)
            .map(Vec::as_slice)
            .ok_or_else(|| PipelineError::MissingGroup { group: group.to_string() })
    }

    /// Fails on the first configured group, in the order given, that has no
    /// rows or has an indicator with no values at all.
    pub fn require_groups<'a>(&self, groups: impl IntoIterator<Item = &'a str>) -> PipelineResult<()> {
        for group in groups {
            let row = self.row(group)?;
            if let Some((_, name)) = row.iter().zip(&self.indicators).find(|(v, _)| v.is_nan()) {
                return Err(PipelineError::NoValues {
                    group: group.to_string(),
                    column: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Values of one indicator across every group.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.values().map(move |row| row[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn table(indicators: &[&str], rows: Vec<(&str, Vec<Option<f64>>)>) -> Table {
        Table {
            path: PathBuf::from("test.csv"),
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
            records: rows
                .into_iter()
                .map(|(group, values)| Record { group: group.to_string(), values })
                .collect(),
        }
    }

    #[test]
    fn test_group_means() {
        let t = table(
            &["mean_ghgs"],
            vec![
                ("vegan", vec![Some(2.0)]),
                ("vegan", vec![Some(4.0)]),
                ("meat", vec![Some(10.0)]),
            ],
        );
        let agg = GroupAggregate::from_table(&t).unwrap();

        assert_eq!(agg.len(), 2);
        assert!((agg.row("vegan").unwrap()[0] - 3.0).abs() < 1e-12);
        assert!((agg.row("meat").unwrap()[0] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_cells_are_skipped() {
        let t = table(
            &["mean_ghgs", "mean_land"],
            vec![
                ("fish", vec![Some(1.0), None]),
                ("fish", vec![Some(3.0), Some(5.0)]),
            ],
        );
        let agg = GroupAggregate::from_table(&t).unwrap();

        let fish = agg.row("fish").unwrap();
        assert!((fish[0] - 2.0).abs() < 1e-12);
        assert!((fish[1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_without_values() {
        let t = table(&["mean_ghgs", "mean_bio"], vec![("veggie", vec![Some(1.0), None])]);
        let agg = GroupAggregate::from_table(&t).unwrap();

        assert!(agg.row("veggie").unwrap()[1].is_nan());
        let err = agg.require_groups(["veggie"]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::NoValues { ref group, ref column } if group == "veggie" && column == "mean_bio"
        ));
    }

    #[test]
    fn test_empty_column_in_undrawn_group() {
        let t = table(
            &["mean_ghgs", "mean_land", "mean_bio"],
            vec![
                ("vegan", vec![Some(1.0), Some(2.0), Some(3.0)]),
                ("meat", vec![Some(4.0), Some(5.0), Some(6.0)]),
                ("pescatarian", vec![Some(1.0), None, None]),
                ("pescatarian", vec![Some(2.0), None, None]),
            ],
        );
        let agg = GroupAggregate::from_table(&t).unwrap();

        assert_eq!(agg.len(), 3);
        assert!(agg.require_groups(["vegan", "meat"]).is_ok());
        // the first empty column is reported, whatever the map order
        for _ in 0..10 {
            let err = agg.require_groups(["vegan", "pescatarian"]).unwrap_err();
            assert!(matches!(err, PipelineError::NoValues { ref column, .. } if column == "mean_land"));
        }
    }

    #[test]
    fn test_missing_group() {
        let t = table(&["mean_ghgs"], vec![("meat", vec![Some(1.0)])]);
        let agg = GroupAggregate::from_table(&t).unwrap();

        let err = agg.row("vegan").unwrap_err();
        assert!(matches!(err, PipelineError::MissingGroup { ref group } if group == "vegan"));
        assert!(agg.require_groups(["meat", "vegan"]).is_err());
        assert!(agg.require_groups(["meat"]).is_ok());
    }

    #[test]
    fn test_one_row_per_distinct_group() {
        let names = ["meat100", "meat", "meat50", "fish", "veggie", "vegan"];
        let mut rng = StdRng::seed_from_u64(210);

        for _ in 0..20 {
            let n_rows = rng.gen_range(1..200);
            let rows: Vec<(&str, Vec<Option<f64>>)> = (0..n_rows)
                .map(|_| {
                    let group = names[rng.gen_range(0..names.len())];
                    (group, vec![Some(rng.gen_range(0.0..50.0)), Some(rng.gen_range(0.0..5.0))])
                })
                .collect();
            let distinct: HashSet<&str> = rows.iter().map(|(g, _)| *g).collect();

            let agg = GroupAggregate::from_table(&table(&["a", "b"], rows)).unwrap();
            assert_eq!(agg.len(), distinct.len());
            assert_eq!(agg.groups().collect::<HashSet<_>>(), distinct);
        }
    }
}
