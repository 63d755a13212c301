use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn guide_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("guide");
    path
}

const SOURCE_CSV: &str = "\u{feff}หมวดหมู่,หัวข้อ,กฎหมายที่ให้สิทธิ,รู้สิทธิตัวเอง,วิธีสังเกตุ,วิธีช่วยตัวเอง,remark\n\
Work,Wage theft,Labour Protection Act,\"• overtime pay rules\n◦ paid within 3 days\",Check your payslip,- Contact the labour office,\n\
Documents,Visa renewal,,Renew before expiry,,,\n\
Work,Wage theft,,Second entry,,,\n\
Work,,,orphan row without a title,,,\n";

fn setup_test_env_with(source: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("source.csv"), source).unwrap();

    let config_content = format!(
        r#"[source]
path = "{root}/data/source.csv"

[output]
dir = "{root}/public/data"

[analytics]
sink = "log"

[[scenarios]]
id = "workplace-problem"
title = "Problems at work"
urgency = "medium"
category = "Work"

[[scenarios]]
id = "pay"
keywords = ["OVERTIME"]
"#,
        root = root.display()
    );

    let config_path = config_dir.join("guide.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn setup_test_env() -> (TempDir, PathBuf) {
    setup_test_env_with(SOURCE_CSV)
}

fn output_dir(tmp: &TempDir) -> PathBuf {
    tmp.path().join("public/data")
}

fn run_guide(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = guide_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run guide binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn generate(config_path: &Path) {
    let (stdout, stderr, success) = run_guide(config_path, &["generate"]);
    assert!(success, "generate failed: stdout={}, stderr={}", stdout, stderr);
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_generate_writes_all_artifacts() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_guide(&config_path, &["generate"]);
    assert!(success, "generate failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("topics: 3"));
    assert!(stdout.contains("categories: 2"));
    assert!(stdout.contains("ok"));

    let out = output_dir(&tmp);
    for name in [
        "data_flat.json",
        "data_grouped.json",
        "data_normalized.json",
        "schema.json",
    ] {
        assert!(out.join(name).exists(), "{} missing", name);
    }
}

#[test]
fn test_generate_flat_and_grouped_shapes() {
    let (tmp, config_path) = setup_test_env();
    generate(&config_path);

    let flat = read_json(&output_dir(&tmp).join("data_flat.json"));
    let slugs: Vec<&str> = flat
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["wage-theft", "visa-renewal", "wage-theft-2"]);
    assert_eq!(flat[0]["category"], "Work");
    assert_eq!(flat[0]["law"], "Labour Protection Act");
    assert!(flat[1].get("law").is_none());

    let grouped = read_json(&output_dir(&tmp).join("data_grouped.json"));
    assert_eq!(grouped["Wage theft"].as_array().unwrap().len(), 2);
    assert_eq!(grouped["Visa renewal"].as_array().unwrap().len(), 1);
}

#[test]
fn test_generate_structured_document() {
    let (tmp, config_path) = setup_test_env();
    generate(&config_path);

    let doc = read_json(&output_dir(&tmp).join("data_normalized.json"));
    assert_eq!(doc["metadata"]["version"], "2.0.0");
    assert_eq!(doc["metadata"]["source"], "source.csv");
    assert_eq!(doc["metadata"]["totalTopics"], 3);
    assert_eq!(doc["metadata"]["totalCategories"], 2);

    let first = &doc["topics"][0];
    assert_eq!(first["id"], "wage_theft");
    assert_eq!(first["category"]["slug"], "work");
    let rights = first["sections"]["rights"].as_array().unwrap();
    assert_eq!(rights.len(), 2);
    assert_eq!(rights[0]["kind"], "bullet");
    assert_eq!(rights[0]["level"], 1);
    assert_eq!(rights[0]["text"], "overtime pay rules");
    assert_eq!(rights[1]["level"], 2);

    let work = &doc["topicsByCategory"]["work"];
    assert_eq!(work["topics"].as_array().unwrap().len(), 2);
}

#[test]
fn test_generate_is_idempotent_apart_from_timestamp() {
    let (tmp, config_path) = setup_test_env();
    let out = output_dir(&tmp);

    generate(&config_path);
    let flat_1 = fs::read_to_string(out.join("data_flat.json")).unwrap();
    let mut doc_1 = read_json(&out.join("data_normalized.json"));

    generate(&config_path);
    let flat_2 = fs::read_to_string(out.join("data_flat.json")).unwrap();
    let mut doc_2 = read_json(&out.join("data_normalized.json"));

    assert_eq!(flat_1, flat_2);
    doc_1["metadata"]["generatedAt"] = serde_json::Value::Null;
    doc_2["metadata"]["generatedAt"] = serde_json::Value::Null;
    assert_eq!(doc_1, doc_2);
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_guide(&config_path, &["generate", "--dry-run"]);
    assert!(success);
    assert!(stdout.contains("dry-run"));
    assert!(stdout.contains("topics: 3"));
    assert!(!output_dir(&tmp).exists());
}

#[test]
fn test_generate_missing_required_header_fails() {
    let (tmp, config_path) = setup_test_env_with("title,notes\nWage theft,x\n");

    let (_, stderr, success) = run_guide(&config_path, &["generate"]);
    assert!(!success);
    assert!(stderr.contains("Invalid source file"), "stderr={}", stderr);
    assert!(!output_dir(&tmp).exists());
}

#[test]
fn test_generate_missing_source_fails() {
    let (tmp, config_path) = setup_test_env();
    fs::remove_file(tmp.path().join("data/source.csv")).unwrap();

    let (_, stderr, success) = run_guide(&config_path, &["generate"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read source file"));
}

#[test]
fn test_search_case_insensitive() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, stderr, success) = run_guide(&config_path, &["search", "OVERTIME"]);
    assert!(success, "search failed: stderr={}", stderr);
    assert!(stdout.contains("wage-theft"));
    assert!(!stdout.contains("visa-renewal"));
}

#[test]
fn test_search_with_category_narrows_first() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, _, success) =
        run_guide(&config_path, &["search", "renew", "--category", "Work"]);
    assert!(success);
    assert!(stdout.contains("No results."));

    let (stdout, _, success) =
        run_guide(&config_path, &["search", "renew", "--category", "Documents"]);
    assert!(success);
    assert!(stdout.contains("visa-renewal"));
}

#[test]
fn test_search_empty_query_lists_everything() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, _, success) = run_guide(&config_path, &["search", ""]);
    assert!(success);
    assert!(stdout.contains("wage-theft"));
    assert!(stdout.contains("visa-renewal"));
    assert!(stdout.contains("wage-theft-2"));
}

#[test]
fn test_search_before_generate_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_guide(&config_path, &["search", "wage"]);
    assert!(!success);
    assert!(stderr.contains("guide generate"));
}

#[test]
fn test_get_topic() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, _, success) = run_guide(&config_path, &["get", "wage-theft-2"]);
    assert!(success);
    assert!(stdout.contains("Second entry"));
    assert!(stdout.contains("category: Work"));
}

#[test]
fn test_get_unknown_slug_is_not_an_error() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, _, success) = run_guide(&config_path, &["get", "no-such-topic"]);
    assert!(success);
    assert!(stdout.contains("Topic not found: no-such-topic"));
}

#[test]
fn test_scenario_list_and_resolve() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, _, success) = run_guide(&config_path, &["scenario"]);
    assert!(success);
    assert!(stdout.contains("workplace-problem"));
    assert!(stdout.contains("category"));
    assert!(stdout.contains("pay"));

    let (stdout, _, success) = run_guide(&config_path, &["scenario", "workplace-problem"]);
    assert!(success);
    assert!(stdout.contains("wage-theft"));
    assert!(stdout.contains("wage-theft-2"));
    assert!(!stdout.contains("visa-renewal"));

    let (stdout, _, success) = run_guide(&config_path, &["scenario", "pay"]);
    assert!(success);
    assert!(stdout.contains("1. Wage theft"));
    assert!(!stdout.contains("wage-theft-2"));
}

#[test]
fn test_scenario_unknown_id_fails() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (_, stderr, success) = run_guide(&config_path, &["scenario", "nope"]);
    assert!(!success);
    assert!(stderr.contains("Unknown scenario"));
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();
    generate(&config_path);

    let (stdout, stderr, success) = run_guide(&config_path, &["stats"]);
    assert!(success, "stats failed: stderr={}", stderr);
    assert!(stdout.contains("Topics:      3"));
    assert!(stdout.contains("Categories:  2"));
    assert!(stdout.contains("Documents"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_guide(&tmp.path().join("missing.toml"), &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
