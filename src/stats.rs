// src/stats.rs

use crate::cli::GroupBy;
use crate::model::{IndexRecord, PackageCount, RankedResult};
use log::info;

/// Count index entries per key.
///
/// With [`GroupBy::Line`] the key is the package field exactly as it appears
/// after the path. The other modes split that field on commas into its
/// individual `area/package` entries. Records without a package field are
/// not counted.
pub fn count_occurrences(records: Vec<IndexRecord>, group_by: GroupBy) -> PackageCount {
    info!("Counting index entries occurrences ...");
    let mut counts = PackageCount::new();

    for record in records {
        let Some(packages) = record.packages else {
            continue;
        };
        match group_by {
            GroupBy::Line => {
                if !packages.is_empty() {
                    *counts.entry(packages).or_insert(0) += 1;
                }
            }
            GroupBy::Package | GroupBy::Name => {
                for entry in packages.split(',').map(str::trim).filter(|e| !e.is_empty()) {
                    let key = match group_by {
                        GroupBy::Name => strip_area(entry),
                        _ => entry,
                    };
                    *counts.entry(key.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    info!("Counting finished.");
    counts
}

/// `admin/dpkg` -> `dpkg`; `non-free/games/foo` -> `foo`.
fn strip_area(entry: &str) -> &str {
    entry.rsplit_once('/').map_or(entry, |(_, name)| name)
}

/// Order counts descending, ties by ascending key.
pub fn rank(counts: PackageCount) -> RankedResult {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    RankedResult { entries }
}
