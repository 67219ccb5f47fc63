use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use quiz_core::answer;

/// Builds the multiple-choice option list for one question.
///
/// Candidates whose trimmed, case-folded value equals the correct answer are
/// excluded from the distractor pool, and the pool itself is deduplicated by
/// the same folded key (first-seen casing wins). Up to `width - 1`
/// distractors are sampled uniformly without replacement; when the pool is
/// smaller the whole pool is used and the result is simply shorter. The
/// exact `correct` string always appears exactly once, and the final list is
/// shuffled uniformly.
#[must_use]
pub fn generate_options(correct: &str, universe: &[String], width: usize) -> Vec<String> {
    let correct_key = answer::normalize(correct);

    let mut seen: HashSet<String> = HashSet::new();
    let mut pool: Vec<&str> = Vec::new();
    for candidate in universe {
        let key = answer::normalize(candidate);
        if key == correct_key || !seen.insert(key) {
            continue;
        }
        pool.push(candidate);
    }

    let mut rng = rng();
    pool.shuffle(&mut rng);

    let distractors = width.saturating_sub(1).min(pool.len());
    let mut options: Vec<String> = pool[..distractors].iter().map(|s| (*s).to_owned()).collect();
    options.push(correct.to_owned());
    options.shuffle(&mut rng);
    options
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
