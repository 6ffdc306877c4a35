//! Keyword Search
//!
//! Case-insensitive substring matching over four operation fields. Each
//! field contributes its weight at most once and the weights add up, so an
//! operation matching everywhere scores 8.

use crate::document::OpenApiDocument;
use crate::views::ApiSearchResult;

/// Weight multipliers for the matched fields
pub const WEIGHT_PATH: u32 = 3;
pub const WEIGHT_SUMMARY: u32 = 2;
pub const WEIGHT_TAG: u32 = 2;
pub const WEIGHT_DESCRIPTION: u32 = 1;

/// Fields of one operation that take part in scoring.
#[derive(Debug, Clone, Copy)]
pub struct SearchFields<'a> {
    pub path: &'a str,
    pub summary: Option<&'a str>,
    pub description: Option<&'a str>,
    pub tags: &'a [String],
}

/// Score one operation against an already lower-cased keyword.
///
/// Absent summary and description count as empty text.
pub fn score(fields: &SearchFields<'_>, keyword: &str) -> u32 {
    let contains = |text: &str| text.to_lowercase().contains(keyword);

    let mut score = 0;
    if contains(fields.path) {
        score += WEIGHT_PATH;
    }
    if contains(fields.summary.unwrap_or_default()) {
        score += WEIGHT_SUMMARY;
    }
    if contains(fields.description.unwrap_or_default()) {
        score += WEIGHT_DESCRIPTION;
    }
    if fields.tags.iter().any(|tag| contains(tag.as_str())) {
        score += WEIGHT_TAG;
    }
    score
}

/// Rank every operation of `document` against `keyword`.
///
/// Only positive scores are returned, highest first; equal scores keep
/// document scan order.
pub fn search(document: &OpenApiDocument, keyword: &str) -> Vec<ApiSearchResult> {
    let keyword = keyword.to_lowercase();

    let mut results: Vec<ApiSearchResult> = document
        .operations()
        .filter_map(|(path, method, operation)| {
            let fields = SearchFields {
                path,
                summary: operation.summary.as_deref(),
                description: operation.description.as_deref(),
                tags: operation.tag_names(),
            };
            let score = score(&fields, &keyword);
            (score > 0).then(|| ApiSearchResult {
                path: path.to_string(),
                method: method.as_upper().to_string(),
                summary: operation.summary.clone(),
                description: operation.description.clone(),
                tags: operation.tags.clone(),
                score,
            })
        })
        .collect();

    // Stable sort keeps scan order among ties.
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}
