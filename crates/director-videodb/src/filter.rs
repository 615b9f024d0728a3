//! Relevance filters for semantic search.
//!
//! The filters travel with every search request and the service applies
//! them. Returned shots are already filtered and must not be filtered again:
//! the dynamic threshold depends on the score range of its input, so a
//! second pass over the survivors cuts more shots.
//!
//! [`SearchFilters::apply`] states the service's rule for shot lists that
//! did not come out of a filtered search.

use crate::types::Shot;

/// Tunable filters of a semantic search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchFilters {
    /// Number of top candidates considered
    pub result_threshold: usize,
    /// Absolute minimum relevance score
    pub score_threshold: f64,
    /// Share of the candidates' score range kept below the best score
    pub dynamic_score_percentage: f64,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            result_threshold: 5,
            score_threshold: 0.2,
            dynamic_score_percentage: 20.0,
        }
    }
}

impl SearchFilters {
    /// `max - (max - min) * pct / 100` over the given scores.
    pub fn dynamic_threshold(&self, scores: &[f64]) -> Option<f64> {
        let max = scores.iter().copied().reduce(f64::max)?;
        let min = scores.iter().copied().reduce(f64::min)?;
        Some(max - (max - min) * self.dynamic_score_percentage / 100.0)
    }

    /// Keep the candidates scoring at or above both thresholds.
    ///
    /// Candidates are the first `result_threshold` shots; order is preserved.
    pub fn apply(&self, shots: Vec<Shot>) -> Vec<Shot> {
        let candidates: Vec<Shot> = shots.into_iter().take(self.result_threshold).collect();
        let scores: Vec<f64> = candidates.iter().map(|s| s.search_score).collect();

        let Some(dynamic) = self.dynamic_threshold(&scores) else {
            return Vec::new();
        };
        let cutoff = dynamic.max(self.score_threshold);

        candidates
            .into_iter()
            .filter(|shot| shot.search_score >= cutoff)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use director_models::VideoId;

    fn shot(score: f64, text: &str) -> Shot {
        Shot {
            video_id: VideoId::from("m-1"),
            video_title: None,
            video_length: None,
            start: 0.0,
            end: 1.0,
            text: text.to_string(),
            search_score: score,
        }
    }

    #[test]
    fn test_dynamic_threshold_from_score_range() {
        let filters = SearchFilters {
            result_threshold: 10,
            score_threshold: 0.2,
            dynamic_score_percentage: 20.0,
        };
        let threshold = filters.dynamic_threshold(&[0.9, 0.7, 0.3, 0.1]).unwrap();
        assert!((threshold - 0.74).abs() < 1e-9);
    }

    #[test]
    fn test_dynamic_filter_keeps_only_top_shot() {
        let filters = SearchFilters {
            result_threshold: 10,
            score_threshold: 0.2,
            dynamic_score_percentage: 20.0,
        };
        let kept = filters.apply(vec![
            shot(0.9, "a"),
            shot(0.7, "b"),
            shot(0.3, "c"),
            shot(0.1, "d"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "a");
    }

    #[test]
    fn test_absolute_threshold_wins_when_stricter() {
        let filters = SearchFilters {
            result_threshold: 10,
            score_threshold: 0.8,
            dynamic_score_percentage: 100.0,
        };
        let kept = filters.apply(vec![shot(0.85, "a"), shot(0.75, "b"), shot(0.5, "c")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "a");
    }

    #[test]
    fn test_result_threshold_caps_candidates_and_keeps_order() {
        let filters = SearchFilters {
            result_threshold: 2,
            score_threshold: 0.0,
            dynamic_score_percentage: 100.0,
        };
        let kept = filters.apply(vec![shot(0.4, "x"), shot(0.6, "y"), shot(0.9, "z")]);
        let texts: Vec<_> = kept.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "y"]);
    }

    #[test]
    fn test_second_pass_narrows_survivors() {
        let filters = SearchFilters::default();
        let once = filters.apply(vec![
            shot(1.0, "a"),
            shot(0.9, "b"),
            shot(0.85, "c"),
            shot(0.0, "d"),
        ]);
        assert_eq!(once.len(), 3);

        let twice = filters.apply(once);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(SearchFilters::default().apply(Vec::new()).is_empty());
    }
}
