// src/ingest/query.rs
//! Search-feed address construction for query-based sources. The query is
//! AND-ed with a fixed disjunction of AI terms so a broad query like a
//! country name still only returns on-topic items.

const SEARCH_ENDPOINT: &str = "https://news.google.com/rss/search";

/// Curated topic terms, quoted where multi-word. The same curated set the
/// relevance gate matches on, spelled for a search engine.
const TOPIC_QUERY_TERMS: &[&str] = &[
    "\"artificial intelligence\"",
    "\"machine learning\"",
    "\"deep learning\"",
    "\"large language model\"",
    "LLM",
    "AI",
    "ChatGPT",
    "GPT",
    "Claude",
    "Gemini",
    "OpenAI",
    "DeepMind",
    "Anthropic",
];

/// `(query) AND (term OR term OR ...)`; empty for a blank query.
pub fn build_search_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    format!("({trimmed}) AND ({})", TOPIC_QUERY_TERMS.join(" OR "))
}

/// URL-encode the full query into the search feed address.
pub fn build_search_url(query: &str) -> String {
    format!(
        "{SEARCH_ENDPOINT}?q={}&hl=en&gl=US&ceid=US:en",
        urlencoding::encode(query)
    )
}
