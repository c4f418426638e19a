use chrono::{DateTime, Utc};
use csv::Writer;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::aggregate::GroupAggregate;
use crate::error::PipelineResult;
use crate::normalize::ScaledAggregate;
use crate::render::DietGroup;

/// One dataset's means and their scaled values.
pub struct SummarySource<'a> {
    pub name: &'a str,
    pub means: &'a GroupAggregate,
    pub scaled: &'a ScaledAggregate,
}

// one row per (dataset, diet group): raw mean and scaled value for every indicator
pub fn write_summary(
    path: &Path,
    sources: &[SummarySource<'_>],
    groups: &[DietGroup],
    generated_at: DateTime<Utc>,
) -> PipelineResult<usize> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    let indicators: &[String] = match sources.first() {
        Some(source) => source.means.indicators(),
        None => &[],
    };
    let mut header = vec!["generated_at".to_string(), "dataset".to_string(), "diet_group".to_string()];
    for name in indicators {
        header.push(name.clone());
        header.push(format!("{}_scaled", name));
    }
    wtr.write_record(&header)?;

    let stamp = generated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let mut rows = 0;
    for source in sources {
        for group in groups {
            let means = source.means.row(&group.name)?;
            let scaled = source.scaled.row(&group.name)?;

            let mut record = vec![stamp.clone(), source.name.to_string(), group.name.clone()];
            for (mean, value) in means.iter().zip(scaled) {
                record.push(mean.to_string());
                record.push(value.to_string());
            }
            wtr.write_record(&record)?;
            rows += 1;
        }
    }

    wtr.flush()?; // make sure it's saved
    info!("Wrote {} summary rows to {}", rows, path.display());
    Ok(rows)
}
