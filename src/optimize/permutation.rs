// Exhaustive permutation enumeration in lexicographic order
//
// The enumerator walks [0, 1, ..., n-1] forward with the classic
// next-permutation step, so the k-th permutation visited is always the k-th in
// lexicographic order. `unrank` builds that same permutation directly from k
// via the factorial number system, which lets a worker start in the middle of
// the sequence and still agree with the sequential enumeration index.

use crate::error::{OptimizeError, Result};

/// Largest n whose factorial fits in a `u64`
pub const HARD_MAX_N: usize = 20;

/// Position i holds the reference index assigned to sample index i
pub type Permutation = Vec<usize>;

/// n! as `u64`, or `None` on overflow
pub fn factorial(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}

/// Build the permutation at lexicographic position `rank`
///
/// # Example
/// ```
/// use qpcr_optimizer::optimize::unrank;
///
/// assert_eq!(unrank(3, 0).unwrap(), vec![0, 1, 2]);
/// assert_eq!(unrank(3, 3).unwrap(), vec![1, 2, 0]);
/// assert_eq!(unrank(3, 5).unwrap(), vec![2, 1, 0]);
/// ```
pub fn unrank(n: usize, rank: u64) -> Result<Permutation> {
    let total = permutation_count(n)?;
    if rank >= total {
        return Err(OptimizeError::InvalidInput(format!(
            "permutation rank {} out of range for n={} ({} permutations)",
            rank, n, total
        )));
    }

    let mut pool: Vec<usize> = (0..n).collect();
    let mut perm = Vec::with_capacity(n);
    let mut remainder = rank;

    for i in 0..n {
        // (n-1-i)! never overflows: n! already fit
        let block = factorial(n - 1 - i).unwrap_or(1);
        let digit = (remainder / block) as usize;
        remainder %= block;
        perm.push(pool.remove(digit));
    }

    Ok(perm)
}

/// Number of permutations of n elements, validated for enumeration
pub fn permutation_count(n: usize) -> Result<u64> {
    if n < 1 {
        return Err(OptimizeError::InvalidInput(
            "cannot enumerate permutations of an empty index set".to_string(),
        ));
    }

    factorial(n).ok_or_else(|| {
        OptimizeError::InvalidInput(format!(
            "n={} exceeds the enumerable limit of {}",
            n, HARD_MAX_N
        ))
    })
}

/// Advance `perm` to its lexicographic successor; false once it is the last
fn advance(perm: &mut [usize]) -> bool {
    let n = perm.len();
    if n < 2 {
        return false;
    }

    // Longest non-increasing suffix starts at `pivot`
    let mut pivot = n - 1;
    while pivot > 0 && perm[pivot - 1] >= perm[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }

    let mut successor = n - 1;
    while perm[successor] <= perm[pivot - 1] {
        successor -= 1;
    }
    perm.swap(pivot - 1, successor);
    perm[pivot..].reverse();
    true
}

/// Lazy, deterministic walk over every bijection of {0, ..., n-1}
///
/// Iterating yields owned permutations; hot loops should prefer
/// [`PermutationEnumerator::next_permutation`], which lends the internal
/// buffer and never allocates.
#[derive(Debug, Clone)]
pub struct PermutationEnumerator {
    current: Permutation,
    next_index: u64,
    end: u64,
    started: bool,
}

impl PermutationEnumerator {
    /// Enumerate all n! permutations
    pub fn new(n: usize) -> Result<Self> {
        let total = permutation_count(n)?;
        Self::range(n, 0, total)
    }

    /// Enumerate the permutations with enumeration index in `[start, end)`
    pub fn range(n: usize, start: u64, end: u64) -> Result<Self> {
        let total = permutation_count(n)?;
        if start > end || end > total {
            return Err(OptimizeError::InvalidInput(format!(
                "enumeration range {}..{} out of bounds for n={} ({} permutations)",
                start, end, n, total
            )));
        }

        let current = if start < total {
            unrank(n, start)?
        } else {
            (0..n).collect()
        };

        Ok(Self {
            current,
            next_index: start,
            end,
            started: false,
        })
    }

    /// Enumeration index of the next permutation to be produced
    pub fn position(&self) -> u64 {
        self.next_index
    }

    /// Permutations left in this range
    pub fn remaining(&self) -> u64 {
        self.end - self.next_index
    }

    /// Produce the next permutation and its enumeration index
    pub fn next_permutation(&mut self) -> Option<(u64, &[usize])> {
        if self.next_index >= self.end {
            return None;
        }

        if self.started {
            // Cannot fail: next_index < end <= n!
            advance(&mut self.current);
        } else {
            self.started = true;
        }

        let index = self.next_index;
        self.next_index += 1;
        Some((index, &self.current))
    }
}

impl Iterator for PermutationEnumerator {
    type Item = Permutation;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_permutation().map(|(_, perm)| perm.to_vec())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).ok();
        (remaining.unwrap_or(usize::MAX), remaining)
    }
}
