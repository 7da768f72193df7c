// src/ingest/mod.rs
pub mod providers;
pub mod trends;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

const MAX_TITLE_CHARS: usize = 300;

/// One-time metrics registration (so series carry help text when exported).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "digest_headlines_total",
            "Headlines or trend entries delivered by a source."
        );
        describe_counter!(
            "digest_source_errors_total",
            "Source fetch/parse failures (source treated as empty)."
        );
        describe_histogram!("digest_source_fetch_ms", "Source fetch time in milliseconds.");
    });
}

/// Record the outcome of one source fetch.
pub(crate) fn record_source_outcome(source: &'static str, delivered: Option<usize>, ms: f64) {
    ensure_metrics_described();
    metrics::histogram!("digest_source_fetch_ms", "source" => source).record(ms);
    match delivered {
        Some(n) => counter!("digest_headlines_total", "source" => source).increment(n as u64),
        None => counter!("digest_source_errors_total", "source" => source).increment(1),
    }
}

/// Normalize a headline: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TITLE_CHARS {
        out = out.chars().take(MAX_TITLE_CHARS).collect();
    }

    out
}

/// Escape the characters Telegram's legacy Markdown treats as entity markers.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
