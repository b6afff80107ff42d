// src/relevance.rs
//! Relevance gate: two pure predicates over the normalized text of a feed
//! entry, backed by curated pattern tables. Rows are data, not control flow;
//! add or remove a term without touching the matching code.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Topical (AI) patterns. Word-boundary anchored; multi-word phrases stay
/// intact so they match even when a shorter row is their substring.
const TOPIC_PATTERNS: &[&str] = &[
    r"\bartificial intelligence\b",
    r"\bai\b",
    r"\ba\.i\.\b",
    r"\bmachine learning\b",
    r"\bdeep learning\b",
    r"\bgenerative ai\b",
    r"\bgenai\b",
    r"\bllm(s)?\b",
    r"\blarge language model(s)?\b",
    r"\btransformer(s)?\b",
    r"\bneural network(s)?\b",
    r"\bcomputer vision\b",
    r"\bchatgpt\b",
    r"\bgpt-?\d+(?:\.\d+)?\b",
    r"\bgpt\b",
    r"\bclaude\b",
    r"\bgemini\b",
    r"\bllama\b",
    r"\bmistral\b",
    r"\bopenai\b",
    r"\bdeepmind\b",
    r"\banthropic\b",
];

/// Geographic (Africa) patterns: regions, countries, major cities.
const REGION_PATTERNS: &[&str] = &[
    r"\bafrica\b",
    r"\bafrican\b",
    r"\bafrican union\b",
    r"\bafcfta\b",
    r"\bsub-saharan\b",
    r"\bnorth africa\b",
    r"\bwest africa\b",
    r"\beast africa\b",
    r"\bsouthern africa\b",
    r"\bcentral africa\b",
    r"\bmaghreb\b",
    r"\bnigeria\b",
    r"\bghana\b",
    r"\bkenya\b",
    r"\bethiopia\b",
    r"\buganda\b",
    r"\btanzania\b",
    r"\brwanda\b",
    r"\bsenegal\b",
    r"\bivory coast\b",
    r"\bcote d'?ivoire\b",
    r"\bcameroon\b",
    r"\bmalawi\b",
    r"\bnamibia\b",
    r"\bbotswana\b",
    r"\bmozambique\b",
    r"\bmadagascar\b",
    r"\bmauritius\b",
    r"\bseychelles\b",
    r"\bzimbabwe\b",
    r"\bzambia\b",
    r"\bguinea\b",
    r"\bguinea-bissau\b",
    r"\bgambia\b",
    r"\bsierra leone\b",
    r"\bliberia\b",
    r"\bbenin\b",
    r"\btogo\b",
    r"\bniger\b",
    r"\bchad\b",
    r"\bmauritania\b",
    r"\bsouth africa\b",
    r"\bmorocco\b",
    r"\balgeria\b",
    r"\btunisia\b",
    r"\blibya\b",
    r"\begypt\b",
    r"\bsudan\b",
    r"\bsouth sudan\b",
    r"\bcongo\b",
    r"\bdr congo\b",
    r"\bdrc\b",
    r"\bcongo-kinshasa\b",
    r"\bcongo-brazzaville\b",
    r"\bangola\b",
    r"\bburkina faso\b",
    r"\bmali\b",
    r"\bconakry\b",
    r"\bcasablanca\b",
    r"\baddis ababa\b",
    r"\blagos\b",
    r"\babuja\b",
    r"\bnairobi\b",
    r"\baccra\b",
    r"\bjohannesburg\b",
    r"\bcape town\b",
    r"\bpretoria\b",
    r"\bdakar\b",
    r"\bkampala\b",
    r"\bkinshasa\b",
    r"\byaounde\b",
    r"\btunis\b",
    r"\btripoli\b",
    r"\bcairo\b",
    r"\bkhartoum\b",
];

static TOPIC_RES: Lazy<Vec<Regex>> = Lazy::new(|| compile(TOPIC_PATTERNS));
static REGION_RES: Lazy<Vec<Regex>> = Lazy::new(|| compile(REGION_PATTERNS));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .unwrap_or_else(|e| panic!("relevance pattern `{p}`: {e}"))
        })
        .collect()
}

/// True if the text mentions AI at all. Empty input is never relevant.
pub fn is_topic_relevant(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    TOPIC_RES.iter().any(|re| re.is_match(text))
}

/// True if the text mentions Africa, an African country, or a major city.
pub fn is_region_relevant(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    REGION_RES.iter().any(|re| re.is_match(text))
}

/// Space-join the non-empty parts into the blob both predicates run over.
pub fn build_relevance_text(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_matches_whole_words_only() {
        assert!(is_topic_relevant("The AI summit opens today"));
        assert!(is_topic_relevant("new machine learning lab"));
        // "ai" inside a word must not match
        assert!(!is_topic_relevant("a fresh coat of paint"));
    }

    #[test]
    fn topic_matches_product_and_versioned_names() {
        assert!(is_topic_relevant("ChatGPT adoption grows"));
        assert!(is_topic_relevant("benchmarks for GPT-4.1 released"));
        assert!(is_topic_relevant("Anthropic opens a new office"));
    }

    #[test]
    fn topic_is_case_insensitive() {
        assert!(is_topic_relevant("ARTIFICIAL INTELLIGENCE strategy"));
        assert!(is_topic_relevant("openai and deepmind"));
    }

    #[test]
    fn region_matches_countries_and_cities() {
        assert!(is_region_relevant("startups in Nairobi"));
        assert!(is_region_relevant("South Africa announces a fund"));
        assert!(is_region_relevant("Cote d'Ivoire tech hub"));
        assert!(is_region_relevant("cote divoire roundup"));
        assert!(!is_region_relevant("a conference in Lisbon"));
    }

    #[test]
    fn empty_text_is_never_relevant() {
        assert!(!is_topic_relevant(""));
        assert!(!is_region_relevant(""));
    }

    #[test]
    fn relevance_text_skips_empty_parts() {
        assert_eq!(build_relevance_text(&["title", "", "tags"]), "title tags");
        assert_eq!(build_relevance_text(&["", ""]), "");
    }
}
