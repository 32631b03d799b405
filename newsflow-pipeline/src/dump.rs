//! Debug dump: cluster memberships and cohesion distributions.

use std::fmt::Write as _;
use std::path::Path;

use newsflow_core::errors::{NewsflowResult, StorageError};
use newsflow_clustering::reevaluate::CohesionObservations;
use newsflow_clustering::ClusterStore;

/// Dump cluster membership (largest first) plus the sorted cos and
/// cos_std samples under `output_path`.
pub fn write_debug_dump(
    output_path: &Path,
    date: &str,
    store: &ClusterStore,
    observations: &CohesionObservations,
) -> NewsflowResult<()> {
    std::fs::create_dir_all(output_path).map_err(|e| StorageError::OutputUnwritable {
        path: output_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut entries: Vec<_> = store.iter().collect();
    entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));

    let mut membership = String::new();
    for (event_id, cluster) in entries {
        let _ = writeln!(membership, "Cluster {event_id} num = {}", cluster.len());
        for article_id in &cluster.article_ids {
            if let Some(article) = store.article(article_id) {
                let _ = writeln!(
                    membership,
                    "Title: {} Time: {} Content: {}",
                    article.title, article.crawl_time, article.content
                );
            }
        }
    }
    write_file(&output_path.join(date), &membership)?;

    for (name, values) in [
        ("cos", &observations.cos),
        ("cos_std", &observations.cos_std),
    ] {
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let body: String = sorted.iter().map(|v| format!("{v}\n")).collect();
        write_file(&output_path.join(format!("{name}{date}")), &body)?;
    }
    Ok(())
}

fn write_file(path: &Path, body: &str) -> NewsflowResult<()> {
    std::fs::write(path, body).map_err(|e| {
        StorageError::OutputUnwritable {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
