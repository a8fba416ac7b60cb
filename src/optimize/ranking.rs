// Ranking of scored permutations
//
// Order is ascending standard deviation; equal sd values keep enumeration
// order (earliest-enumerated permutation wins the lower rank). The comparison
// is the total order (sd, enumeration_index), so sequential ranking and the
// merge of partitioned partial rankings always agree.

use std::cmp::Ordering;

use super::evaluator::{Candidate, ScoredPermutation};

/// Anything that can be placed in a ranking
pub trait RankKey {
    fn sd(&self) -> f64;
    fn enumeration_index(&self) -> u64;
}

impl RankKey for ScoredPermutation {
    fn sd(&self) -> f64 {
        self.sd
    }

    fn enumeration_index(&self) -> u64 {
        self.enumeration_index
    }
}

impl RankKey for Candidate {
    fn sd(&self) -> f64 {
        self.sd
    }

    fn enumeration_index(&self) -> u64 {
        self.enumeration_index
    }
}

/// Compare two ranked items by (sd, enumeration_index)
pub fn rank_order<T: RankKey>(a: &T, b: &T) -> Ordering {
    a.sd()
        .total_cmp(&b.sd())
        .then_with(|| a.enumeration_index().cmp(&b.enumeration_index()))
}

/// Sort in place, best first (stable)
pub fn sort_ranked<T: RankKey>(items: &mut [T]) {
    items.sort_by(rank_order);
}

/// Sort candidates and assign `rank = 1 + position`
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    sort_ranked(&mut candidates);
    for (position, candidate) in candidates.iter_mut().enumerate() {
        candidate.rank = position + 1;
    }
    candidates
}

/// Merge locally ranked partial lists into one ranking
///
/// Each part must already be sorted with [`sort_ranked`].
pub fn merge_ranked<T: RankKey>(parts: Vec<Vec<T>>) -> Vec<T> {
    let total = parts.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut sources: Vec<std::vec::IntoIter<T>> = parts.into_iter().map(Vec::into_iter).collect();
    let mut heads: Vec<Option<T>> = sources.iter_mut().map(Iterator::next).collect();

    loop {
        let mut best: Option<usize> = None;
        for (idx, head) in heads.iter().enumerate() {
            let Some(item) = head else {
                continue;
            };
            best = match best {
                Some(current)
                    if heads[current]
                        .as_ref()
                        .is_some_and(|held| rank_order(held, item) != Ordering::Greater) =>
                {
                    Some(current)
                }
                _ => Some(idx),
            };
        }

        let Some(idx) = best else {
            break;
        };
        if let Some(item) = heads[idx].take() {
            merged.push(item);
        }
        heads[idx] = sources[idx].next();
    }

    merged
}

/// Keep the `k` best entries of an already ranked list; `None` keeps all
pub fn top_k<T>(mut ranked: Vec<T>, k: Option<usize>) -> Vec<T> {
    if let Some(k) = k {
        ranked.truncate(k);
    }
    ranked
}
