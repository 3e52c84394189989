//! Integration tests for the recovery pipeline.

use std::path::{Path, PathBuf};

use reclaim_cli::config::RunConfig;
use reclaim_cli::pipeline::{MatchRequest, OutputPaths, check_truncation, run_check, run_match};
use reclaim_ingest::load_incomplete_json;
use reclaim_match::MatchConfig;
use reclaim_model::RecordId;
use tempfile::TempDir;

const REFERENCE_CSV: &str = "\
Question,Question_html,URL
\"While researching a topic, a student has taken the following notes: Pando is a colony of trees.\",<p>notes</p>,https://example.test/q/1
\"The following text is from Jane Austen's 1811 novel Sense and Sensibility.\",\"<p>The following text is from <em>Jane Austen</em>'s 1811 novel</p>\",https://example.test/q/2
\"The mimosa tree evolved in East Asia, where its main pollinators are bees.\",,https://example.test/q/3
";

const INCOMPLETE_JSON: &str = r#"[
  {"id": "q1", "questionText": "A 1811 novel by Jane Austen intro...", "moduleTitle": "RW Module 1"},
  {"id": "q2", "questionText": "Quantum dots emit light at sizes that", "moduleTitle": "RW Module 2", "order": 4},
  {"id": "q3", "questionText": "<div class=\"\"><p>The mimosa tree evolved in East Asia, where its main"}
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn request(dir: &TempDir, reference: &str, outputs: bool) -> MatchRequest {
    let config = RunConfig {
        matching: MatchConfig {
            keywords: vec!["Jane Austen".to_string()],
            // q2 must stay unresolved.
            fallback_requires_fragment: true,
            ..MatchConfig::default()
        },
        ..RunConfig::default()
    };
    MatchRequest {
        reference: write(dir.path(), "reference.csv", reference),
        incomplete: write(dir.path(), "unfixed.json", INCOMPLETE_JSON),
        config,
        outputs: outputs.then(|| {
            OutputPaths::in_dir(
                &dir.path().join("out"),
                "matched_records.json",
                "unmatched_records.json",
            )
        }),
    }
}

#[test]
fn run_writes_matched_and_unmatched_artifacts() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, REFERENCE_CSV, true);

    let report = run_match(&request).unwrap();

    assert_eq!(report.reference_records, 3);
    assert_eq!(report.incomplete_records, 3);
    let summary: Vec<String> = report
        .outcome
        .matched
        .iter()
        .map(|m| format!("{} {} row={}", m.id, m.rule, m.reference_row))
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    q1 keyword-set row=2
    q3 prefix-containment row=3
    ");

    let outputs = report.outputs.unwrap();
    let matched: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outputs.matched).unwrap()).unwrap();
    assert_eq!(matched[0]["id"], "q1");
    assert_eq!(matched[0]["sourceUrl"], "https://example.test/q/2");
    assert_eq!(matched[1]["resolvedHtml"], serde_json::Value::Null);

    // Unresolved records are written back exactly as they were read.
    let input: serde_json::Value = serde_json::from_str(INCOMPLETE_JSON).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outputs.unmatched).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!([input[1].clone()]));
    let unmatched = load_incomplete_json(&outputs.unmatched).unwrap();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].id.as_str(), "q2");
    assert_eq!(unmatched[0].module_title.as_deref(), Some("RW Module 2"));
    assert_eq!(unmatched[0].field("order"), Some(&serde_json::json!(4)));
}

#[test]
fn empty_reference_fails_without_writing_output() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, "Question,Question_html,URL\n", true);

    let err = run_match(&request).unwrap_err();

    assert!(format!("{err:#}").contains("reference collection"));
    let outputs = request.outputs.unwrap();
    assert!(!outputs.matched.exists());
    assert!(!outputs.unmatched.exists());
}

#[test]
fn failed_unmatched_write_keeps_prior_matched_artifact() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, REFERENCE_CSV, true);
    let outputs = request.outputs.clone().unwrap();
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    std::fs::write(&outputs.matched, "previous run").unwrap();
    // A directory where the unmatched staging file should go.
    std::fs::create_dir(dir.path().join("out/unmatched_records.json.partial")).unwrap();

    assert!(run_match(&request).is_err());

    assert_eq!(std::fs::read_to_string(&outputs.matched).unwrap(), "previous run");
    assert!(!dir.path().join("out/matched_records.json.partial").exists());
    assert!(!outputs.unmatched.exists());
}

#[test]
fn missing_reference_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, "Question,Question_html\nText,<p>Text</p>\n", true);

    let err = run_match(&request).unwrap_err();

    assert!(format!("{err:#}").contains("missing required field 'URL'"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let request = request(&dir, REFERENCE_CSV, false);

    let report = run_match(&request).unwrap();

    assert!(report.outputs.is_none());
    assert_eq!(report.outcome.matched.len(), 2);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn pattern_table_from_config_is_used() {
    let dir = TempDir::new().unwrap();
    let table = write(
        dir.path(),
        "patterns.toml",
        "[patterns]\n\"q2\" = \"Pando.*colony\"\n",
    );
    let mut request = request(&dir, REFERENCE_CSV, false);
    request.config.pattern_table = Some(table);

    let report = run_match(&request).unwrap();

    assert_eq!(report.patterns, 1);
    let q2 = report
        .outcome
        .matched
        .iter()
        .find(|m| m.id.as_str() == "q2")
        .unwrap();
    assert_eq!(q2.reference_row, 1);
    assert!(report.outcome.unmatched.is_empty());
}

#[test]
fn truncation_check_flags_cut_records() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "unfixed.json", INCOMPLETE_JSON);

    let report = run_check(&path, 5).unwrap();

    assert_eq!(report.total, 3);
    let ids: Vec<&str> = report.truncated.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["q1", "q2", "q3"]);

    let records = load_incomplete_json(&path).unwrap();
    assert_eq!(check_truncation(&records, 1).endings.len(), 1);
}

#[test]
fn shipped_config_builds_rules() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/reclaim.toml");

    let config = RunConfig::load(&path).unwrap();
    let rules = reclaim_cli::pipeline::build_rules(&config).unwrap();

    assert_eq!(rules.rules().len(), 4);
    assert_eq!(rules.patterns().len(), 184);
    let short_id = RecordId::new("cmf863nc000z1v67mlke").unwrap();
    let pattern = rules.patterns().get(&short_id).unwrap();
    assert!(pattern.is_match("Carmen Lomas Garza paints scenes of Mexican Americans"));
    assert!(config.matching.keywords.iter().any(|k| k == "Jane Austen"));
}
