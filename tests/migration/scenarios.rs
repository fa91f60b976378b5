//! Reference scenarios for the serialized-aware rewrite.

use crate::common::*;
use wpmigrate::{is_serialized, Strictness};

#[test]
fn scenario_a_same_length_replacement() {
    let (out, issues) = rewrite(&rules(&[("hello", "howdy")]), "s:5:\"hello\";");
    assert_eq!(out, "s:5:\"howdy\";");
    assert!(issues.is_empty());
}

#[test]
fn scenario_b_shorter_replacement_updates_length() {
    let (out, _) = rewrite(&rules(&[("hello", "hi")]), "s:5:\"hello\";");
    assert_eq!(out, "s:2:\"hi\";");
}

#[test]
fn scenario_c_array_leaf_replacement() {
    let (out, _) = rewrite(
        &rules(&[("foo", "baz")]),
        "a:2:{i:0;s:3:\"foo\";i:1;s:3:\"bar\";}",
    );
    assert_eq!(out, "a:2:{i:0;s:3:\"baz\";i:1;s:3:\"bar\";}");
}

#[test]
fn scenario_d_null_passes_through() {
    assert!(is_serialized(b"N;"));
    assert_eq!(decode(b"N;").unwrap(), Value::Null);
    assert_eq!(encode(&Value::Null), b"N;");

    let rules = rules(&[("N", "X")]);
    let mut issues = IssueLog::new();
    assert_eq!(ValueRewriter::new(&rules).rewrite_text(b"N;", &at(), &mut issues), None);
    assert!(issues.is_empty());
}

#[test]
fn scenario_e_prefix_anchored_path() {
    let config = MigrateConfig {
        domain_changes: vec!["example.com/old => example.com/new".to_string()],
        ..MigrateConfig::default()
    };
    let mut store = MemoryStore::new();
    store.add_table(table(
        "wp_blogs",
        "blog_id",
        vec![
            vec![("domain", "example.com"), ("path", "/old/sub/")],
            vec![("domain", "example.com"), ("path", "/otherold/sub/")],
        ],
    ));
    let (summary, issues) = migrate(&config, &mut store);

    let rows = &store.table("wp_blogs").unwrap().rows;
    assert_eq!(rows[0].text("path"), Some("/new/sub/"));
    assert_eq!(rows[1].text("path"), Some("/otherold/sub/"));
    assert_eq!(summary.rows_updated, 1);
    assert!(issues.is_empty());
}

#[test]
fn scenario_f_malformed_value_is_isolated() {
    let mut config = MigrateConfig::default();
    config.add_find_replace_arg("short => long").unwrap();

    let mut store = MemoryStore::new();
    store.add_table(table(
        "wp_postmeta",
        "meta_id",
        vec![vec![("meta_value", "s:99:\"short\";"), ("meta_key", "short key")]],
    ));
    let (summary, issues) = migrate(&config, &mut store);

    let row = &store.table("wp_postmeta").unwrap().rows[0];
    assert_eq!(row.text("meta_value"), Some("s:99:\"short\";"));
    assert_eq!(row.text("meta_key"), Some("long key"));
    assert_eq!(summary.rows_updated, 1);
    assert_eq!(issues.count(IssueKind::Decode), 1);
    assert_eq!(issues.issues()[0].context, "s:99:\"short\";");
}

#[test]
fn lenient_detection_accepts_truncated_tail() {
    assert!(!wpmigrate::is_serialized_with(b"s:5:\"hello\";x", Strictness::Strict));
    assert!(wpmigrate::is_serialized_with(b"s:5:\"hello\";x", Strictness::Lenient));
}

#[test]
fn nested_serialized_option_is_rewritten_at_every_level() {
    let inner = format!("a:1:{{s:4:\"home\";{}}}", s("http://old.test/blog"));
    let outer = format!("a:2:{{s:6:\"widget\";{}s:5:\"count\";i:3;}}", s(&inner));
    let (out, issues) = rewrite(&rules(&[("//old.test", "//new.example")]), &outer);
    assert!(issues.is_empty());

    let expected_inner = format!("a:1:{{s:4:\"home\";{}}}", s("http://new.example/blog"));
    let expected = format!("a:2:{{s:6:\"widget\";{}s:5:\"count\";i:3;}}", s(&expected_inner));
    assert_eq!(out, expected);
}

#[test]
fn untouched_float_text_is_preserved() {
    // Nothing matches, so the stored text (with its non-canonical float) is kept as is
    let text = "a:2:{i:0;d:0.50000000000000000;i:1;s:3:\"abc\";}";
    let (out, _) = rewrite(&rules(&[("zzz", "y")]), text);
    assert_eq!(out, text);
}
