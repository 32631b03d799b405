//! Vector math over f32 vectors with f64 accumulation.

/// Cosine similarity. Returns 0 when either vector has zero norm, which
/// doubles as the guard for empty-matrix centroids.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Per-dimension arithmetic mean over a set of vectors. An empty set
/// yields the zero vector of the requested dimension.
pub fn centroid(rows: &[Vec<f32>], dim: usize) -> Vec<f32> {
    if rows.is_empty() {
        return vec![0.0; dim];
    }
    let mut sums = vec![0.0f64; dim];
    for row in rows {
        for (sum, v) in sums.iter_mut().zip(row.iter()) {
            *sum += *v as f64;
        }
    }
    let n = rows.len() as f64;
    sums.into_iter().map(|s| (s / n) as f32).collect()
}

/// Mean and population standard deviation of member-to-centroid cosines.
/// The diffusion metric: a high deviation means the cluster no longer
/// describes one occurrence.
pub fn cohesion(rows: &[Vec<f32>], center: &[f32]) -> (f64, f64) {
    if rows.is_empty() {
        return (0.0, 0.0);
    }
    let cosines: Vec<f64> = rows.iter().map(|row| cosine(row, center)).collect();
    let n = cosines.len() as f64;
    let mean = cosines.iter().sum::<f64>() / n;
    let variance = cosines.iter().map(|c| (c - mean) * (c - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
