use std::path::Path;
use futures::StreamExt;
use log::{error, info};
use crate::error::LookupFailure;
use crate::geocode::{lookup_first, GeocodeProvider};
use crate::place::normalize;
use crate::record::Record;

/// Outcome of geocoding a list of queries
#[derive(Debug)]
pub struct BatchReport {
    /// successful rows, in input order
    pub records: Vec<Record>,
    pub failed: Vec<(String, LookupFailure)>,
}

/// Non-blank lines that are not `#` comments, trimmed.
pub fn parse_queries(input: &str) -> Vec<String> {
    input.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Geocode every query with at most `concurrency` lookups in flight.
pub async fn geocode_all<P: GeocodeProvider>(provider: &P, queries: Vec<String>, concurrency: usize) -> BatchReport {
    let total = queries.len();
    let mut outcomes = futures::stream::iter(queries).enumerate().map(|(idx, query)| {
        async move {
            info!("[{}/{total}] geocoding [{}]", idx + 1, query);
            let outcome = lookup_first(provider, &query).await;
            (idx, query, outcome)
        }
    })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    outcomes.sort_by_key(|(idx, _, _)| *idx);

    let mut report = BatchReport { records: Vec::new(), failed: Vec::new() };
    for (_, query, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                let place = normalize(&result);
                report.records.push(Record::from_query_and_place(query, place));
            }
            Err(e) => {
                error!("cannot geocode [{}]: {}", query, e);
                report.failed.push((query, e));
            }
        }
    }
    report
}

/// write records to a CSV file, creating parent directories as needed
pub fn save_records(records: &[Record], save_path: impl AsRef<Path>) -> Result<(), csv::Error> {
    if let Some(parent) = save_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(save_path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
