//! Fuzzy resolution of model-proposed meal names against the recipes
//! that were just persisted. Models tend to drift slightly between the
//! recipe list and the plan grid ("Grilled chicken salad" vs "Grilled
//! Chicken Salad Bowl"), so matching relaxes in stages.

use std::collections::HashSet;

use uuid::Uuid;

/// Resolve `name` against `(recipe_name, id)` pairs.
///
/// Stages: exact, case-insensitive, word overlap (at least two common
/// words, best score wins), then substring either way.
pub fn resolve(name: &str, saved: &[(String, Uuid)]) -> Option<Uuid> {
    let name = name.trim();

    if let Some((_, id)) = saved.iter().find(|(n, _)| n == name) {
        return Some(*id);
    }

    let lower = name.to_lowercase();
    if let Some((_, id)) = saved
        .iter()
        .find(|(n, _)| n.to_lowercase().trim() == lower.trim())
    {
        return Some(*id);
    }

    let words: HashSet<String> = lower.split_whitespace().map(str::to_string).collect();
    let mut best: Option<(usize, Uuid)> = None;
    for (candidate, id) in saved {
        let candidate_words: HashSet<String> = candidate
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let score = words.intersection(&candidate_words).count();
        if score >= 2 && best.map_or(true, |(s, _)| score > s) {
            best = Some((score, *id));
        }
    }
    if let Some((_, id)) = best {
        return Some(id);
    }

    saved
        .iter()
        .find(|(n, _)| {
            let n_lower = n.to_lowercase();
            n_lower.contains(&lower) || lower.contains(&n_lower)
        })
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(names: &[&str]) -> Vec<(String, Uuid)> {
        names.iter().map(|n| (n.to_string(), Uuid::new_v4())).collect()
    }

    #[test]
    fn exact_match_wins() {
        let s = saved(&["Pho Bo", "Pho Ga"]);
        assert_eq!(resolve("Pho Ga", &s), Some(s[1].1));
    }

    #[test]
    fn case_insensitive_match() {
        let s = saved(&["Grilled Chicken Salad"]);
        assert_eq!(resolve("grilled chicken salad", &s), Some(s[0].1));
    }

    #[test]
    fn word_overlap_prefers_best_score() {
        let s = saved(&["Steamed Chicken Rice", "Fried Chicken Rice Bowl"]);
        // Shares three words with the second entry, two with the first.
        assert_eq!(resolve("Chicken Rice Bowl", &s), Some(s[1].1));
    }

    #[test]
    fn substring_fallback() {
        let s = saved(&["Bun Cha Hanoi"]);
        assert_eq!(resolve("Bun Cha", &s), Some(s[0].1));
    }

    #[test]
    fn unresolvable_name_is_none() {
        let s = saved(&["Pho Bo"]);
        assert_eq!(resolve("Spaghetti Carbonara", &s), None);
    }
}
