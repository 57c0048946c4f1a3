//! End-to-end export tests: configuration file, JSON record store, archive

use rowpack::adapters::store::create_record_store;
use rowpack::config::{load_config, RowpackConfig};
use rowpack::core::export::export;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const DATA: &str = r#"{
  "Customer": [
    { "id": 1, "signupDate": 0, "managerId": 2, "fullName": "Smith, Jane" },
    { "id": 2, "signupDate": { "$date": "1970-01-01T00:00:00Z" }, "fullName": "Alice" }
  ],
  "User": [
    { "id": 2, "fullName": "Alice" },
    { "id": 3, "fullName": "Zoë" }
  ]
}"#;

fn config_toml(dir: &Path, extra_export: &str) -> String {
    format!(
        r#"
[export]
entity = "Customer"
file_name = "customers"
max = 100
output_dir = "{out}"
{extra_export}

[[export.fields]]
field_name = "id"
data_type = "Integer"

[[export.fields]]
field_name = "signupDate"
data_type = "Date"
format = "yyyy-MM-dd"

[[export.fields]]
field_name = "managerId"
data_type = "Lookup"
lookup_entity = "User"
target_field = "id"
lookup_field = "fullName"

[store]
backend = "json"
path = "{data}"
log_path = "{log}"

[[entities]]
name = "Customer"
attributes = [{{ name = "id" }}, {{ name = "signupDate" }}, {{ name = "managerId" }}, {{ name = "fullName" }}]

[[entities]]
name = "User"
attributes = [{{ name = "id" }}, {{ name = "fullName" }}]
"#,
        out = dir.join("out").display(),
        data = dir.join("data.json").display(),
        log = dir.join("lookups.jsonl").display(),
    )
}

fn setup(data: &str, extra_export: &str) -> (TempDir, RowpackConfig) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data.json"), data).unwrap();
    let config_path = dir.path().join("rowpack.toml");
    std::fs::write(&config_path, config_toml(dir.path(), extra_export)).unwrap();
    let config = load_config(&config_path).unwrap();
    (dir, config)
}

fn read_entry(archive: &Path, name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

fn run(config: &RowpackConfig) -> rowpack::core::export::ExportSummary {
    let registry = config.registry().unwrap();
    let store = create_record_store(&config.store, &registry).unwrap();
    export(&config.export, &registry, &store).unwrap()
}

#[test]
fn test_end_to_end_example() {
    let (dir, config) = setup(DATA, "");
    let summary = run(&config);

    let archive = summary.archive.clone().unwrap();
    assert_eq!(archive, dir.path().join("out").join("customers.zip"));
    let csv = String::from_utf8(read_entry(&archive, "customers.csv")).unwrap();
    assert_eq!(
        csv,
        "id,signupDate,managerId\n1,1970-01-01,Alice\n2,1970-01-01,\n"
    );
    assert!(summary.is_clean());
    assert!(!dir.path().join("lookups.jsonl").exists());
}

#[test]
fn test_every_row_has_header_width() {
    let (_dir, config) = setup(DATA, "");
    let summary = run(&config);
    let bytes = read_entry(summary.archive.as_ref().unwrap(), "customers.csv");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let widths: Vec<usize> = reader.records().map(|r| r.unwrap().len()).collect();
    assert_eq!(widths, vec![3, 3, 3]);
}

#[test]
fn test_lookup_miss_logged_to_store() {
    let data = DATA.replace("\"managerId\": 2", "\"managerId\": 42");
    let (dir, config) = setup(&data, "");
    let summary = run(&config);

    let csv = String::from_utf8(read_entry(summary.archive.as_ref().unwrap(), "customers.csv"))
        .unwrap();
    assert_eq!(csv, "id,signupDate,managerId\n1,1970-01-01,\n2,1970-01-01,\n");
    assert_eq!(summary.degraded.len(), 1);

    let log = std::fs::read_to_string(dir.path().join("lookups.jsonl")).unwrap();
    let entry: serde_json::Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
    assert_eq!(entry["object_name"], "FieldConverter");
    let message = entry["message"].as_str().unwrap();
    assert!(message.contains("column 'managerId'"));
    assert!(message.contains("lookup_entity=User"));
}

#[test]
fn test_configured_encoding_applied() {
    let data = DATA.replace("\"managerId\": 2", "\"managerId\": 3");
    let (_dir, config) = setup(&data, "encoding = \"windows-1252\"");
    let summary = run(&config);

    assert_eq!(summary.encoding, "windows-1252");
    let bytes = read_entry(summary.archive.as_ref().unwrap(), "customers.csv");
    assert!(bytes.windows(3).any(|w| w == b"Zo\xEB"));
}

#[test]
fn test_unknown_encoding_falls_back_to_utf8() {
    let data = DATA.replace("\"managerId\": 2", "\"managerId\": 3");
    let (_dir, config) = setup(&data, "encoding = \"no-such-charset\"");
    let summary = run(&config);

    assert_eq!(summary.encoding, "UTF-8");
    let csv = String::from_utf8(read_entry(summary.archive.as_ref().unwrap(), "customers.csv"))
        .unwrap();
    assert!(csv.contains("1,1970-01-01,Zoë\n"));
}

#[test]
fn test_empty_entity_writes_no_archive() {
    let (dir, config) = setup(r#"{"Customer": [], "User": []}"#, "");
    let summary = run(&config);

    assert_eq!(summary.records_found, 0);
    assert!(summary.archive.is_none());
    assert!(!dir.path().join("out").join("customers.zip").exists());
}

#[test]
fn test_rerun_overwrites_archive() {
    let (_dir, mut config) = setup(DATA, "");
    run(&config);

    config.export.max = 1;
    let summary = run(&config);
    let csv = String::from_utf8(read_entry(summary.archive.as_ref().unwrap(), "customers.csv"))
        .unwrap();
    assert_eq!(csv, "id,signupDate,managerId\n1,1970-01-01,Alice\n");
}
