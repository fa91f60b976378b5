//! Snapshot files, config files and statement output.

use crate::common::*;
use wpmigrate::StatementLog;

const SNAPSHOT: &str = r#"{
  "tables": [
    {
      "name": "wp_options",
      "primary_key": "option_id",
      "rows": [
        {"option_id": 1, "option_name": "siteurl", "option_value": "http://old.test", "autoload": "yes"},
        {"option_id": 2, "option_name": "widget", "option_value": "a:1:{i:0;s:15:\"http://old.test\";}", "autoload": "yes"},
        {"option_id": 3, "option_name": "untouched", "option_value": "nothing", "autoload": null}
      ]
    },
    {
      "name": "wp_postmeta",
      "primary_key": "meta_id",
      "rows": [
        {"meta_id": 0, "meta_value": "http://old.test"},
        {"meta_id": 7, "meta_value": "b:0; "}
      ]
    },
    {
      "name": "wp_term_relationships",
      "rows": [{"object_id": 1, "term_taxonomy_id": 1}]
    }
  ]
}"#;

#[test]
fn snapshot_run_produces_updates_and_report() {
    let dir = TestDir::new();
    let config_path = dir.file(
        "wpmigrate.toml",
        "select_limit = 2\n\n[[find_replace]]\nfind = \"//old.test\"\nreplace = \"//new.test\"\n",
    );
    let snapshot = dir.file("snapshot.json", SNAPSHOT);

    let config = MigrateConfig::from_file(&config_path).unwrap();
    let store = MemoryStore::load(&snapshot).unwrap();
    let mut migrator = config.migrator().unwrap();
    let mut logged = StatementLog::new(store);
    let summary = migrator.find_and_replace(&mut logged).unwrap();
    let (store, statements) = logged.into_parts();

    assert_eq!(summary.tables, 3);
    assert_eq!(summary.rows_scanned, 5);
    assert_eq!(summary.rows_updated, 2);
    assert_eq!(
        statements,
        vec![
            "UPDATE `wp_options` SET `option_name`='siteurl',`option_value`='http://new.test',`autoload`='yes' WHERE `option_id`=1;".to_string(),
            r#"UPDATE `wp_options` SET `option_name`='widget',`option_value`='a:1:{i:0;s:15:\"http://new.test\";}',`autoload`='yes' WHERE `option_id`=2;"#.to_string(),
        ]
    );

    let issues = migrator.issues();
    // meta_id 0, the ambiguous false and the keyless table
    assert_eq!(issues.len(), 3);
    assert_eq!(issues.count(IssueKind::MissingPrimaryKey), 2);
    assert_eq!(issues.count(IssueKind::AmbiguousScalar), 1);
    assert!(issues.report().starts_with("3 errors were logged."));

    // The rewritten snapshot keeps column order and untouched rows
    let out = dir.path("rewritten.json");
    store.save(&out).unwrap();
    let reloaded = MemoryStore::load(&out).unwrap();
    let options = &reloaded.table("wp_options").unwrap().rows;
    let columns: Vec<_> = options[0].iter().map(|(c, _)| c.to_string()).collect();
    assert_eq!(columns, vec!["option_id", "option_name", "option_value", "autoload"]);
    assert_eq!(options[2].get("autoload"), Some(&Cell::Null));
    assert_eq!(
        reloaded.table("wp_postmeta").unwrap().rows[0].text("meta_value"),
        Some("http://old.test")
    );
}

#[test]
fn default_config_file_round_trips() {
    let dir = TestDir::new();
    let path = dir.file("wpmigrate.toml", MigrateConfig::default_toml());
    let config = MigrateConfig::from_file(&path).unwrap();
    assert_eq!(config, MigrateConfig::default());
}

#[test]
fn snapshot_with_bad_shape_is_fatal() {
    let dir = TestDir::new();
    let path = dir.file("broken.json", "{\"tables\": [{\"rows\": []}]}");
    assert!(MemoryStore::load(&path).is_err());
}
