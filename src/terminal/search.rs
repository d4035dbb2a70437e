// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Name matching for the `find` program.

use std::sync::Arc;

use crate::technology::{compare_names, Technology};

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

/// Technologies whose name matches `query`, best match first.
///
/// Substring hits always outrank subsequence-only hits.
pub(crate) fn rank_technologies(query: &str, technologies: &[Arc<Technology>]) -> Vec<Arc<Technology>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored = technologies
        .iter()
        .filter_map(|tech| {
            let haystack = tech.name.to_lowercase();
            let score = substring_score(&needle, &haystack).or_else(|| fuzzy_score(&needle, &haystack))?;
            Some((score, tech))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|(score_a, tech_a), (score_b, tech_b)| {
        score_b.cmp(score_a).then_with(|| compare_names(&tech_a.name, &tech_b.name))
    });
    scored.into_iter().map(|(_, tech)| Arc::clone(tech)).collect()
}

fn substring_score(needle: &str, haystack: &str) -> Option<i64> {
    let first = haystack.find(needle)?;
    let starts = first == 0;
    let start_boundary =
        starts || haystack[..first].chars().last().is_some_and(is_boundary_char);

    let mut score = 200_000i64.saturating_sub((first as i64) * 1000);
    score -= haystack.chars().count() as i64;
    if starts {
        score += 50_000;
    }
    if start_boundary {
        score += 20_000;
    }
    if haystack == needle {
        score += 100_000;
    }
    Some(score)
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());

    let mut score = (ratio * 1000.0).round() as i64;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last = 0usize;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0usize;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }
        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | '.' | '-' | '_' | ' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn techs(names: &[&str]) -> Vec<Arc<Technology>> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                Arc::new(Technology {
                    id: Some(idx as u64 + 1),
                    name: (*name).to_owned(),
                    ..Technology::default()
                })
            })
            .collect()
    }

    fn names(ranked: &[Arc<Technology>]) -> Vec<&str> {
        ranked.iter().map(|tech| tech.name.as_str()).collect()
    }

    #[test]
    fn exact_and_prefix_matches_come_first() {
        let all = techs(&["TypeScript", "Rust", "Rustls", "Trust Store"]);
        let ranked = rank_technologies("rust", &all);
        assert_eq!(names(&ranked), vec!["Rust", "Rustls", "Trust Store"]);
    }

    #[test]
    fn subsequences_match_after_substrings() {
        let all = techs(&["PostgreSQL", "Postman", "Go"]);
        let ranked = rank_technologies("pgsql", &all);
        assert_eq!(names(&ranked), vec!["PostgreSQL"]);
    }

    #[test]
    fn blank_query_matches_nothing() {
        assert!(rank_technologies("  ", &techs(&["Rust"])).is_empty());
    }
}
