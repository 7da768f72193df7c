//! Text heuristics for the trends page.
//!
//! The page has no structured API; trends show up in its visible text as a
//! title line immediately followed by a search-volume line such as `200K+`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between entries in the rendered trends line.
pub const TRENDS_SEPARATOR: &str = " • ";

/// Minimum parsed volume. Compared against the raw digits, so `50+` and
/// `50K+` both qualify.
pub const MIN_VOLUME: u64 = 50;

static RE_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-\s']+$").unwrap());
static RE_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9,]+)(K?)\+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendEntry {
    pub label: String,
    /// Parsed volume, multiplied by 1000 when the count carries a `K`.
    pub approximate_volume: u64,
    /// Count exactly as shown on the page, e.g. `120K+`.
    pub count_text: String,
}

impl TrendEntry {
    pub fn render(&self) -> String {
        format!("{} {}", self.label, self.count_text)
    }
}

fn is_title_line(line: &str) -> bool {
    let len = line.chars().count();
    len > 2 && len < 100 && RE_TITLE.is_match(line)
}

/// Parse a volume line. Returns `(raw_number, has_k_suffix)`.
fn parse_count(line: &str) -> Option<(u64, bool)> {
    let caps = RE_COUNT.captures(line)?;
    let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
    let raw = digits.parse::<u64>().ok()?;
    Some((raw, !caps[2].is_empty()))
}

/// Qualify one adjacent line pair as a trend entry.
pub fn qualify_pair(current: &str, next: &str) -> Option<TrendEntry> {
    if !is_title_line(current) {
        return None;
    }
    let (raw, thousands) = parse_count(next)?;
    if raw < MIN_VOLUME {
        return None;
    }
    Some(TrendEntry {
        label: current.to_string(),
        approximate_volume: if thousands {
            raw.saturating_mul(1000)
        } else {
            raw
        },
        count_text: next.to_string(),
    })
}

/// Scan the page text for qualifying (title, volume) pairs, in page order.
pub fn parse_trend_entries(page_text: &str) -> Vec<TrendEntry> {
    let lines: Vec<&str> = page_text.split('\n').map(str::trim).collect();
    lines
        .windows(2)
        .filter_map(|pair| qualify_pair(pair[0], pair[1]))
        .collect()
}

/// Render at most `limit` entries as one line joined by [`TRENDS_SEPARATOR`].
pub fn render_trends_line(entries: &[TrendEntry], limit: usize) -> String {
    entries
        .iter()
        .take(limit)
        .map(TrendEntry::render)
        .collect::<Vec<_>>()
        .join(TRENDS_SEPARATOR)
}

/// Page text straight to the published trends line.
pub fn extract_trends_line(page_text: &str, limit: usize) -> String {
    render_trends_line(&parse_trend_entries(page_text), limit)
}
