//! Dump files split into statements.

use std::fs::File;

use crate::common::*;
use wpmigrate::sql::insert_statement;
use wpmigrate::StatementSplitter;

#[test]
fn dump_written_with_insert_statements_splits_back() {
    let dir = TestDir::new();
    let rows = vec![
        Row::new().with("ID", 1).with("post_content", "first line\nsecond line"),
        Row::new().with("ID", 2).with("post_content", "a:1:{i:0;s:3:\"x'y\";}"),
        Row::new().with("ID", 3).with("post_content", Cell::Null),
    ];
    // Newlines inside values are escaped, so one statement per line
    let dump: String = rows
        .iter()
        .map(|row| format!("{}\n", insert_statement("wp_posts", row)))
        .collect();
    let path = dir.file("wp_posts.sql", &dump);

    let statements: Vec<String> = StatementSplitter::new(File::open(&path).unwrap(), "\n")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(statements.len(), 3);
    assert_eq!(
        statements[0],
        "INSERT INTO `wp_posts` SET `ID`=1,`post_content`='first line\\nsecond line'"
    );
    assert_eq!(statements[2], "INSERT INTO `wp_posts` SET `ID`=3,`post_content`=NULL");
}

#[test]
fn large_dump_with_custom_delimiter() {
    let dir = TestDir::new();
    let body: String = (0..500)
        .map(|i| format!("INSERT INTO `t` SET `id`={},`v`='{}';;\n", i, "x".repeat(i % 97)))
        .collect();
    let path = dir.file("t.sql", &body);

    let count = StatementSplitter::new(File::open(&path).unwrap(), ";;\n")
        .unwrap()
        .map(|s| s.unwrap())
        .filter(|s| s.starts_with("INSERT INTO `t`"))
        .count();
    assert_eq!(count, 500);
}
