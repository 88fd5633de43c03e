//! Ratcliff/Obershelp string similarity and the typo thresholds built on it.

use std::collections::BTreeSet;

/// Bonus added in candidate search when the first letters agree
/// (case-insensitive) and again when the lengths differ by at most one.
pub const CANDIDATE_BONUS: f64 = 0.05;

/// Default cutoff for [`best_candidate`].
pub const CANDIDATE_CUTOFF: f64 = 0.8;

/// `2 * M / (|a| + |b|)`, where `M` is the number of characters covered by
/// the recursive longest-common-block decomposition. Two empty strings score 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_block(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`. Ties go to the
/// block starting earliest in `a`, then earliest in `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best) = (alo, blo, 0);
    // run[j] = length of the common run ending at (i - 1, j - 1)
    let mut run = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        let mut next = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = if j > blo { run[j] + 1 } else { 1 };
            next[j + 1] = k;
            if k > best {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best = k;
            }
        }
        run = next;
    }
    (best_i, best_j, best)
}

/// Whether `score` makes `ident` a plausible misspelling of `word`.
///
/// Short words tolerate proportionally more damage: one wrong letter in a
/// three-letter keyword already costs a third of the score.
#[must_use]
pub fn is_keyword_typo(ident: &str, word: &str, score: f64) -> bool {
    let len = ident.chars().count().max(word.chars().count());
    let threshold = match len {
        0..=3 => 0.66,
        4..=5 => 0.75,
        _ => 0.8,
    };
    score >= threshold
}

/// Closest vocabulary word to `ident`, with its score.
///
/// Ties go to the lexicographically smallest word, so the result does not
/// depend on the iteration order of a hash set.
#[must_use]
pub fn closest<'v, I>(ident: &str, vocabulary: I) -> Option<(&'v str, f64)>
where
    I: IntoIterator<Item = &'v str>,
{
    let mut best: Option<(&str, f64)> = None;
    for word in vocabulary {
        let score = ratio(ident, word);
        let better = best.is_none_or(|(w, s)| {
            score > s || ((score - s).abs() < f64::EPSILON && word < w)
        });
        if better {
            best = Some((word, score));
        }
    }
    best.filter(|&(_, score)| score > 0.0)
}

/// Whether the closest vocabulary word is close enough to call `ident` a typo of it.
#[must_use]
pub fn is_typo_of_any<'v, I>(ident: &str, vocabulary: I) -> bool
where
    I: IntoIterator<Item = &'v str>,
{
    closest(ident, vocabulary).is_some_and(|(word, score)| is_keyword_typo(ident, word, score))
}

/// Best-scoring candidate name at or above `cutoff`.
///
/// Scores are boosted by [`CANDIDATE_BONUS`] for a shared first letter and for
/// near-equal length, so they can exceed 1. The bonuses only reorder close
/// candidates; they are not probabilities.
#[must_use]
pub fn best_candidate<'c>(
    ident: &str,
    candidates: &'c BTreeSet<String>,
    cutoff: f64,
) -> Option<&'c str> {
    let ident_first = ident.chars().next().map(|c| c.to_lowercase().to_string());
    let ident_len = ident.chars().count();

    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let mut score = ratio(ident, candidate);
        let first = candidate.chars().next().map(|c| c.to_lowercase().to_string());
        if first.is_some() && first == ident_first {
            score += CANDIDATE_BONUS;
        }
        if candidate.chars().count().abs_diff(ident_len) <= 1 {
            score += CANDIDATE_BONUS;
        }
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.filter(|&(_, score)| score >= cutoff).map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[rstest]
    #[case("retrun", "return", 10.0 / 12.0)]
    #[case("abcd", "abcd", 1.0)]
    #[case("abc", "xyz", 0.0)]
    #[case("", "", 1.0)]
    #[case("ab", "", 0.0)]
    #[case("vecotr", "vector", 10.0 / 12.0)]
    fn ratio_matches_block_decomposition(#[case] a: &str, #[case] b: &str, #[case] expected: f64) {
        assert!(approx(ratio(a, b), expected), "{a} vs {b}: {}", ratio(a, b));
    }

    #[test]
    fn ratio_stays_in_unit_interval() {
        let forward = ratio("tide", "diet");
        let backward = ratio("diet", "tide");
        assert!((0.0..=1.0).contains(&forward));
        assert!((0.0..=1.0).contains(&backward));
    }

    #[rstest]
    #[case("fro", "for", 0.66, true)]
    #[case("fro", "for", 0.6, false)]
    #[case("whlie", "while", 0.8, true)]
    #[case("whlie", "while", 0.7, false)]
    #[case("retrun", "return", 0.8, true)]
    #[case("retrun", "return", 0.79, false)]
    fn thresholds_follow_length_buckets(
        #[case] ident: &str,
        #[case] word: &str,
        #[case] score: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(is_keyword_typo(ident, word, score), expected);
    }

    #[test]
    fn closest_picks_highest_score() {
        let (word, score) = closest("retrun", ["return", "break", "case"]).unwrap();
        assert_eq!(word, "return");
        assert!(score > 0.8);
    }

    #[test]
    fn closest_of_unrelated_is_none() {
        assert!(closest("zzz", ["abc"]).is_none());
    }

    #[test]
    fn best_candidate_applies_bonuses() {
        let candidates: BTreeSet<String> =
            ["counter", "total", "index"].into_iter().map(String::from).collect();
        assert_eq!(best_candidate("conuter", &candidates, CANDIDATE_CUTOFF), Some("counter"));
        assert_eq!(best_candidate("zzz", &candidates, CANDIDATE_CUTOFF), None);
    }

    #[test]
    fn best_candidate_of_empty_set_is_none() {
        assert_eq!(best_candidate("x", &BTreeSet::new(), 0.0), None);
    }
}
