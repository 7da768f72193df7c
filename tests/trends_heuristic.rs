// tests/trends_heuristic.rs
use hot_bot::ingest::trends::{extract_trends_line, parse_trend_entries, qualify_pair};

#[test]
fn plain_title_over_threshold_qualifies() {
    let e = qualify_pair("Foo Bar", "50+").expect("qualifies");
    assert_eq!(e.render(), "Foo Bar 50+");
    assert_eq!(e.approximate_volume, 50);
}

#[test]
fn volume_below_threshold_is_dropped() {
    assert!(qualify_pair("Foo Bar", "49+").is_none());
}

#[test]
fn too_short_title_is_dropped() {
    assert!(qualify_pair("a", "1000+").is_none());
    assert!(qualify_pair("ab", "1000+").is_none());
    assert!(qualify_pair("abc", "1000+").is_some());
}

#[test]
fn too_long_title_is_dropped() {
    let long = "x".repeat(101);
    assert!(qualify_pair(&long, "1000+").is_none());
    let edge = "x".repeat(99);
    assert!(qualify_pair(&edge, "1000+").is_some());
}

#[test]
fn punctuation_outside_the_allowed_set_disqualifies() {
    assert!(qualify_pair("Who won?", "200K+").is_none());
    assert!(qualify_pair("Rock 'n' Roll-Hall", "2,000+").is_some());
}

#[test]
fn count_must_end_with_plus() {
    assert!(qualify_pair("Elections", "80K").is_none());
    assert!(qualify_pair("Elections", "80M+").is_none());
}

#[test]
fn page_text_scan_keeps_order_and_limit() {
    let page = "Trending now\n\
                AI Boom\n\
                120K+\n\
                searches\n\
                Elections\n\
                80K+\n\
                Local Weather\n\
                20+\n\
                Cup Final\n\
                1,500+\n";
    let entries = parse_trend_entries(page);
    let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["AI Boom", "Elections", "Cup Final"]);

    assert_eq!(
        extract_trends_line(page, 2),
        "AI Boom 120K+ • Elections 80K+"
    );
}

#[test]
fn lines_are_trimmed_before_matching() {
    let page = "   Space Launch  \r\n  300K+  \n";
    assert_eq!(extract_trends_line(page, 25), "Space Launch 300K+");
}

#[test]
fn nothing_qualifying_gives_empty_line() {
    assert_eq!(extract_trends_line("Sign in\nMenu\nSettings", 25), "");
}
