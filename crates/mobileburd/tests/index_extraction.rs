// ABOUTME: Integration tests for front page extraction against a saved page shape.
// ABOUTME: Covers headers, group and row ordering, new-report badges, and empty groups.

use mobileburd::dom::parse_document;
use mobileburd::{extract_index, Client, ReportSummary};
use pretty_assertions::assert_eq;
use std::fs;

fn load_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path, e))
}

#[test]
fn headers_follow_positional_rules() {
    let doc = parse_document(&load_fixture("index.html"));
    let (headers, _) = extract_index(&doc).unwrap();

    assert_eq!(headers.title, "Bob Burd's Trip Reports");
    assert_eq!(
        headers.summary_text,
        "Climbing and hiking adventures in the Sierra Nevada and beyond."
    );
    assert_eq!(headers.last_update.as_deref(), Some("Last update: 11/24/2019"));
    assert_eq!(
        headers.disclaimer,
        "The information here is provided as-is. Conditions change; use your own judgement."
    );
    assert_eq!(headers.challenge_year, "2019");
}

#[test]
fn groups_and_rows_keep_page_order() {
    let doc = parse_document(&load_fixture("index.html"));
    let (_, groups) = extract_index(&doc).unwrap();

    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["2019 Sierra Peaks", "2019 Other Peaks", "2020 Sierra Peaks"]
    );

    assert_eq!(
        groups[0].entries,
        vec![
            ReportSummary {
                date: "Nov 20".to_string(),
                name: "Tower Peak".to_string(),
                relative_url: "tower_peak_1.html".to_string(),
                is_new: true,
            },
            ReportSummary {
                date: "Nov 18".to_string(),
                name: "Matterhorn Peak".to_string(),
                relative_url: "matterhorn_3.html".to_string(),
                is_new: false,
            },
        ]
    );
    assert_eq!(groups[1].entries.len(), 1);
    assert_eq!(groups[1].entries[0].relative_url, "boundary_peak_2.html");
}

#[test]
fn header_only_table_is_an_empty_group() {
    let doc = parse_document(&load_fixture("index.html"));
    let (_, groups) = extract_index(&doc).unwrap();
    assert_eq!(groups[2].label, "2020 Sierra Peaks");
    assert!(groups[2].entries.is_empty());
}

#[test]
fn relative_url_is_never_a_full_url() {
    let doc = parse_document(&load_fixture("index.html"));
    let (_, groups) = extract_index(&doc).unwrap();
    for entry in groups.iter().flat_map(|g| g.entries.iter()) {
        assert!(!entry.relative_url.contains('/'), "{:?}", entry);
    }
}

#[test]
fn synthetic_groups_preserve_order() {
    let html = r#"<html><head><title>T</title></head><body>
<table><tr><td>summary</td></tr></table>
<nobr>n</nobr><p>a</p><p>b</p>
<a href="challenge/">c</a><a href="challenge/2018">c</a>
<table><tr><td><font>G1</font></td></tr>
<tr><td>d1</td><td><a href="x/r1.html">R1</a></td></tr>
<tr><td>d2</td><td><a href="x/r2.html">R2</a><img src="new.gif"></td></tr></table>
<table><tr><td><font>G2</font></td></tr>
<tr><td>d3</td><td><a href="r3.html">R3</a></td></tr></table>
</body></html>"#;
    let doc = parse_document(html);
    let (headers, groups) = extract_index(&doc).unwrap();

    assert_eq!(headers.last_update, None);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "G1");
    assert_eq!(groups[1].label, "G2");
    let g1: Vec<(&str, bool)> = groups[0]
        .entries
        .iter()
        .map(|e| (e.name.as_str(), e.is_new))
        .collect();
    assert_eq!(g1, vec![("R1", false), ("R2", true)]);
    assert_eq!(groups[1].entries[0].relative_url, "r3.html");
}

#[test]
fn missing_title_is_malformed() {
    let html = "<html><body><table><tr><td><font>G</font></td></tr></table></body></html>";
    let err = extract_index(&parse_document(html)).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn client_parses_index_html_without_fetching() {
    let client = Client::builder().build().unwrap();
    let page = client
        .parse_index_html(&load_fixture("index.html"), "https://www.snwburd.com/bob/")
        .unwrap();
    assert_eq!(page.report_count(), 3);
    assert_eq!(page.new_reports().count(), 1);
}
