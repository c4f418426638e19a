use std::collections::HashMap;
use tracing::warn;

use crate::aggregate::GroupAggregate;
use crate::error::PipelineResult;

/// Group means rescaled so each indicator column tops out at `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledAggregate {
    table: GroupAggregate,
    degenerate: Vec<String>,
}

impl ScaledAggregate {
    pub fn row(&self, group: &str) -> PipelineResult<&[f64]> {
        self.table.row(group)
    }

    /// Columns whose maximum was not positive and were zeroed.
    pub fn degenerate_columns(&self) -> &[String] {
        &self.degenerate
    }
}

// divide each column by its own max, then multiply by the scale
pub fn scale_by_max(aggregate: &GroupAggregate, scale: f64) -> ScaledAggregate {
    let indicators = aggregate.indicators().to_vec();
    let maxima: Vec<f64> = (0..indicators.len())
        .map(|i| aggregate.column(i).fold(f64::NEG_INFINITY, f64::max))
        .collect();

    // a column max of zero (or below) would divide into NaN, so the column is zeroed instead
    let mut degenerate = Vec::new();
    for (name, &max) in indicators.iter().zip(&maxima) {
        if max <= 0.0 {
            warn!("Indicator '{}' has maximum {} across groups, scaling it to zero", name, max);
            degenerate.push(name.clone());
        }
    }

    let rows: HashMap<String, Vec<f64>> = aggregate
        .groups()
        .map(|group| {
            // every key from groups() is present
            let row = aggregate.row(group).unwrap_or(&[]);
            let scaled = row
                .iter()
                .zip(&maxima)
                .map(|(&value, &max)| if max > 0.0 { (value / max) * scale } else { 0.0 })
                .collect();
            (group.to_string(), scaled)
        })
        .collect();

    ScaledAggregate {
        table: GroupAggregate::from_rows(indicators, rows),
        degenerate,
    }
}
