//! "Did you mean?" suggestions for unresolved names.
//!
//! Produces at most one candidate from a caller-supplied pool using a
//! cost-bounded edit distance. The cost model (substitution 2, case-only
//! substitution 1, insert/delete 2, no transposition) and the distance
//! budget formula are fixed; changing them changes which hints users see.

/// Candidate pools larger than this never produce a suggestion.
pub const MAX_CANDIDATE_ITEMS: usize = 750;
/// Names longer than this never participate in matching.
pub const MAX_STRING_SIZE: usize = 40;

const MOVE_COST: usize = 2;
const CASE_COST: usize = 1;

fn substitution_cost(a: char, b: char) -> usize {
    if a == b {
        return 0;
    }
    if a.to_lowercase().eq(b.to_lowercase()) {
        return CASE_COST;
    }
    MOVE_COST
}

/// Pick the closest candidate to `target`, or `None` when nothing is
/// plausibly a typo for it.
///
/// A candidate equal to `target` is never suggested: the name was
/// "found" and still missing, so repeating it would not help. Each
/// candidate's budget is `(len(c) + len(target) + 3) * 2 / 6`, clamped
/// so later candidates must strictly beat the best distance so far;
/// ties therefore go to the earliest candidate in pool order.
pub fn suggest(target: &str, candidates: &[String]) -> Option<String> {
    if candidates.is_empty() || candidates.len() > MAX_CANDIDATE_ITEMS {
        return None;
    }
    let target_len = target.chars().count();
    if target_len > MAX_STRING_SIZE {
        return None;
    }

    let mut best_distance = target_len;
    let mut suggestion: Option<&str> = None;
    for candidate in candidates {
        if candidate == target {
            continue;
        }
        // No more than 1/3 of the involved characters should need to change.
        let mut max_distance = (candidate.chars().count() + target_len + 3) * MOVE_COST / 6;
        // Don't take matches we've already beaten.
        max_distance = max_distance.min(best_distance.saturating_sub(1));
        let distance = levenshtein_distance(target, candidate, max_distance);
        if distance > max_distance {
            continue;
        }
        if suggestion.is_none() || distance < best_distance {
            suggestion = Some(candidate);
            best_distance = distance;
        }
    }
    suggestion.map(str::to_string)
}

/// Edit distance between `a` and `b` under the module cost model,
/// aborting with `max_cost + 1` as soon as the bound is provably
/// exceeded.
pub fn levenshtein_distance(a: &str, b: &str, max_cost: usize) -> usize {
    if a == b {
        return 0;
    }

    // Trim away common affixes before comparing.
    let mut a: Vec<char> = a.chars().collect();
    let mut b: Vec<char> = b.chars().collect();
    let prefix = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
    a.drain(..prefix);
    b.drain(..prefix);
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    a.truncate(a.len() - suffix);
    b.truncate(b.len() - suffix);

    if a.is_empty() || b.is_empty() {
        return MOVE_COST * (a.len() + b.len());
    }
    if a.len() > MAX_STRING_SIZE || b.len() > MAX_STRING_SIZE {
        return max_cost + 1;
    }

    // Keep the shorter string in the row buffer.
    if b.len() < a.len() {
        std::mem::swap(&mut a, &mut b);
    }

    // Quick fail when a match is impossible.
    if (b.len() - a.len()) * MOVE_COST > max_cost {
        return max_cost + 1;
    }

    // One rolling cost row instead of the full matrix.
    let mut row: Vec<usize> = (1..=a.len()).map(|i| i * MOVE_COST).collect();

    let mut result = 0;
    for (bindex, &bchar) in b.iter().enumerate() {
        result = bindex * MOVE_COST;
        let mut distance = result;
        let mut minimum = usize::MAX;
        for (index, &achar) in a.iter().enumerate() {
            // Previous value in this row is cost(b[..bindex], a[..index]).
            let substitute = distance + substitution_cost(bchar, achar);
            // Value from the previous row is cost(b[..bindex], a[..=index]).
            distance = row[index];
            let insert_delete = result.min(distance) + MOVE_COST;
            result = insert_delete.min(substitute);
            row[index] = result;
            minimum = minimum.min(result);
        }
        if minimum > max_cost {
            // Every entry in this row is over budget; no later row can
            // recover.
            return max_cost + 1;
        }
    }
    result
}
