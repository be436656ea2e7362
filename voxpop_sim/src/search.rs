//! Canned search results for offline runs.

use voxpop_provider::SearchResult;

const MAX_DEMO_RESULTS: usize = 5;

/// Produces up to five canned search hits about the query, for runs
/// where no live search backend is wired in.
pub fn demo_search_results(query: &str, requested: usize) -> Vec<SearchResult> {
    let templates = [
        (
            format!("Government panel debates {query}"),
            format!("An expert panel met this week to weigh policy options around {query}, with a report expected next month."),
        ),
        (
            format!("Public opinion split over {query}"),
            format!("A recent poll shows respondents divided on {query}, with large gaps between age groups."),
        ),
        (
            format!("Economists weigh cost of {query}"),
            format!("Analysts disagree on the fiscal impact of {query}, citing uncertainty in long-term projections."),
        ),
        (
            format!("Local leaders respond to {query}"),
            format!("Regional governments have begun announcing their own measures related to {query}."),
        ),
        (
            format!("What {query} means for households"),
            format!("A consumer group published a guide explaining how {query} could affect daily budgets."),
        ),
    ];

    templates
        .into_iter()
        .take(requested.min(MAX_DEMO_RESULTS))
        .enumerate()
        .map(|(i, (title, snippet))| SearchResult {
            title,
            snippet,
            url: format!("https://example{}.com", i + 1),
            date: "2025 latest".to_string(),
        })
        .collect()
}
