use std::time::Duration;

use crate::constants::{defaults, endpoints, replies};
use crate::error::ClawdError;

/// One web search hit: title, resolved URL, and snippet text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// DuckDuckGo HTML-lite search. No API key, no pagination, no retry.
pub struct WebSearch {
    max_results: usize,
}

impl WebSearch {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Run one search. Each call builds and drops its own HTTP client, so no
    /// connection state outlives the request.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClawdError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::SEARCH_TIMEOUT_SECS))
            .user_agent("Clawdbot/0.1")
            .build()
            .map_err(|e| ClawdError::Search(format!("HTTP client error: {e}")))?;

        let url = endpoints::SEARCH_ENGINE_URL.replace("{}", &urlencoding::encode(query));

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClawdError::Search(format!("Search request failed: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| ClawdError::Search(format!("Failed to read response: {e}")))?;

        Ok(parse_results(&html, self.max_results))
    }
}

impl Default for WebSearch {
    fn default() -> Self {
        Self::new(defaults::SEARCH_MAX_RESULTS)
    }
}

/// Render results into the text block appended to the session as the
/// assistant turn for a search command.
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return replies::NO_SEARCH_RESULTS.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n   {}\n   {}", i + 1, r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    // DuckDuckGo HTML lite uses class="result__a" for links and class="result__snippet" for snippets
    for segment in html.split("class=\"result__a\"").skip(1) {
        if results.len() >= max_results {
            break;
        }

        let url = extract_between(segment, "href=\"", "\"").unwrap_or_default();
        let title = extract_between(segment, ">", "</a>").unwrap_or_default();
        let snippet = if let Some(snip_start) = segment.find("class=\"result__snippet\"") {
            let snip_segment = &segment[snip_start..];
            extract_between(snip_segment, ">", "</")
                .unwrap_or_default()
                .trim()
                .to_string()
        } else {
            String::new()
        };

        // Skip internal DDG links
        if url.is_empty() || url.starts_with('/') {
            continue;
        }

        // DDG wraps destinations in a redirect; unwrap the uddg param
        let clean_url = if url.contains("uddg=") {
            urlencoding::decode(
                url.split("uddg=")
                    .nth(1)
                    .unwrap_or(&url)
                    .split('&')
                    .next()
                    .unwrap_or(&url),
            )
            .unwrap_or_else(|_| url.clone().into())
            .to_string()
        } else {
            url.clone()
        };

        results.push(SearchResult {
            title: strip_html_tags(&title),
            url: clean_url,
            snippet: strip_html_tags(&snippet),
        });
    }

    results
}

fn extract_between(text: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = text.find(start)? + start.len();
    let remaining = &text[start_idx..];
    let end_idx = remaining.find(end)?;
    Some(remaining[..end_idx].to_string())
}

fn strip_html_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}
