//! Pure post-processing over a probability vector: argmax and top-K ranking.

/// Index of the first maximal entry, or `None` for an empty slice.
///
/// The first-index tie-break keeps predictions deterministic when several
/// classes share the maximum probability. NaN entries never win a comparison
/// and are effectively skipped.
pub fn argmax(probs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probs.iter().enumerate() {
        match best {
            None => best = Some((i, p)),
            Some((_, bp)) if p > bp => best = Some((i, p)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

/// Every class index paired with its probability, sorted descending and
/// truncated to `k`. The sort is stable, so ties keep ascending index order.
pub fn rank_top_k(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_picks_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
    }

    #[test]
    fn test_argmax_tie_break_is_lowest_index() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_rank_is_descending() {
        let ranked = rank_top_k(&[0.2, 0.5, 0.1, 0.2], 10);
        let probs: Vec<f32> = ranked.iter().map(|&(_, p)| p).collect();
        assert_eq!(ranked[0].0, 1);
        for pair in probs.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_rank_ties_keep_index_order() {
        let ranked = rank_top_k(&[0.25, 0.25, 0.25, 0.25], 4);
        let ids: Vec<usize> = ranked.iter().map(|&(i, _)| i).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rank_truncates_to_k() {
        let probs = vec![0.01; 96];
        assert_eq!(rank_top_k(&probs, 10).len(), 10);
        assert_eq!(rank_top_k(&probs[..5], 10).len(), 5);
    }
}
