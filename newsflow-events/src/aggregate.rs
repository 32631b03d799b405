//! Decay-weighted entity aggregation.
//!
//! Members are presented in descending similarity to the centroid; the
//! i-th member's terms carry weight `0.99^i`. Per list, the top entries
//! by summed score survive and their scores are L2-normalised across the
//! kept set, so every emitted list has unit norm.

use std::collections::HashMap;

use newsflow_core::constants::ENTITY_DECAY;
use newsflow_core::models::{EntityMention, EntityScore, NerEntity, TermScore};

/// Member indices ordered by descending similarity to the centroid,
/// ties broken by index order.
pub fn decay_order(sims: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sims.len()).collect();
    order.sort_by(|&a, &b| {
        sims[b]
            .partial_cmp(&sims[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

/// Aggregate weighted term scores across members (keywords, when,
/// where, who). `lists` must already be in decay order.
pub fn aggregate_terms(lists: &[&[TermScore]], top_k: usize) -> Vec<EntityScore> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut summed: HashMap<String, f64> = HashMap::new();

    let mut weight = 1.0;
    for terms in lists {
        for term in terms.iter() {
            if !summed.contains_key(&term.word) {
                first_seen.push(term.word.clone());
            }
            *summed.entry(term.word.clone()).or_insert(0.0) += term.score * weight;
        }
        weight *= ENTITY_DECAY;
    }

    let mut ranked: Vec<(String, f64)> = first_seen
        .into_iter()
        .map(|word| {
            let score = summed[&word];
            (word, score)
        })
        .collect();
    // Stable sort: equal sums keep first-seen order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);

    let norm = l2_norm(ranked.iter().map(|(_, s)| *s));
    ranked
        .into_iter()
        .map(|(word, score)| EntityScore {
            word,
            score: format_two_decimal(normalised(score, norm)),
        })
        .collect()
}

/// Aggregate named-entity mentions across members (persons, locations,
/// organizations). Counts sum raw; linkedURL keeps the first-seen value
/// in decay order. Ranked by summed count, the kept counts are
/// L2-normalised into `score` while `count` stays raw.
pub fn aggregate_mentions(lists: &[&[EntityMention]], top_k: usize) -> Vec<NerEntity> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut summed: HashMap<String, (f64, String)> = HashMap::new();

    for mentions in lists {
        for mention in mentions.iter() {
            match summed.get_mut(&mention.mention) {
                Some((count, _)) => *count += mention.count,
                None => {
                    first_seen.push(mention.mention.clone());
                    summed.insert(
                        mention.mention.clone(),
                        (mention.count, mention.linked_url.clone()),
                    );
                }
            }
        }
    }

    let mut ranked: Vec<(String, f64, String)> = first_seen
        .into_iter()
        .map(|mention| {
            let (count, url) = summed[&mention].clone();
            (mention, count, url)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);

    let norm = l2_norm(ranked.iter().map(|(_, c, _)| *c));
    ranked
        .into_iter()
        .map(|(mention, count, linked_url)| NerEntity {
            mention,
            count: format_two_decimal(count),
            score: format_two_decimal(normalised(count, norm)),
            linked_url,
        })
        .collect()
}

fn l2_norm(values: impl Iterator<Item = f64>) -> f64 {
    values.map(|v| v * v).sum::<f64>().sqrt()
}

fn normalised(value: f64, norm: f64) -> f64 {
    if norm == 0.0 {
        value
    } else {
        value / norm
    }
}

fn format_two_decimal(value: f64) -> String {
    format!("{value:.2}")
}
