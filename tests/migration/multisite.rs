//! Site moves across the multisite tables and ordinary content.

use crate::common::*;

fn network_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.add_table(table(
        "wp_site",
        "id",
        vec![vec![("domain", "example.com"), ("path", "/blog/")]],
    ));
    store.add_table(table(
        "wp_blogs",
        "blog_id",
        vec![
            vec![("domain", "example.com"), ("path", "/blog/")],
            vec![("domain", "example.com"), ("path", "/blog/team/")],
            vec![("domain", "other.org"), ("path", "/blog/")],
        ],
    ));
    let siteurl = s("https://example.com/blog");
    let sidebar = format!(
        "a:1:{{s:5:\"links\";a:2:{{i:0;{}i:1;{}}}}}",
        s("https://example.com/blog/about"),
        s("https://other.org/blog")
    );
    store.add_table(table(
        "wp_options",
        "option_id",
        vec![
            vec![("option_name", "siteurl"), ("option_value", "https://example.com/blog")],
            vec![("option_name", "serialized_url"), ("option_value", siteurl.as_str())],
            vec![("option_name", "sidebar"), ("option_value", sidebar.as_str())],
        ],
    ));
    store
}

fn config() -> MigrateConfig {
    let mut config = MigrateConfig::default();
    config.add_domain_change_arg("https://example.com/blog/ => localhost/dev").unwrap();
    config
}

#[test]
fn site_and_blog_tables_use_exact_and_prefix_matching() {
    let mut store = network_store();
    let (_, issues) = migrate(&config(), &mut store);
    assert!(issues.is_empty());

    let site = &store.table("wp_site").unwrap().rows[0];
    assert_eq!(site.text("domain"), Some("localhost"));
    assert_eq!(site.text("path"), Some("/dev/"));

    let blogs = &store.table("wp_blogs").unwrap().rows;
    assert_eq!(blogs[0].text("domain"), Some("localhost"));
    assert_eq!(blogs[0].text("path"), Some("/dev/"));
    assert_eq!(blogs[1].text("path"), Some("/dev/team/"));
    // A blog on another domain keeps both columns
    assert_eq!(blogs[2].text("domain"), Some("other.org"));
    assert_eq!(blogs[2].text("path"), Some("/blog/"));
}

#[test]
fn urls_in_content_follow_the_domain_change() {
    let mut store = network_store();
    migrate(&config(), &mut store);

    let options = &store.table("wp_options").unwrap().rows;
    assert_eq!(options[0].text("option_value"), Some("https://localhost/dev"));
    assert_eq!(options[1].text("option_value"), Some(s("https://localhost/dev").as_str()));

    let sidebar = decode(options[2].text("option_value").unwrap().as_bytes()).unwrap();
    let links = sidebar.get(&Value::from("links")).unwrap();
    assert_eq!(
        links.get(&Value::Int(0)),
        Some(&Value::from("https://localhost/dev/about"))
    );
    assert_eq!(links.get(&Value::Int(1)), Some(&Value::from("https://other.org/blog")));
}

#[test]
fn site_tables_under_a_custom_prefix() {
    let mut config = config();
    config.wp_prefix = "net_".to_string();

    let mut store = MemoryStore::new();
    store.add_table(table(
        "net_blogs",
        "blog_id",
        vec![vec![("domain", "example.com"), ("path", "/blog/x/")]],
    ));
    migrate(&config, &mut store);

    let row = &store.table("net_blogs").unwrap().rows[0];
    assert_eq!(row.text("domain"), Some("localhost"));
    assert_eq!(row.text("path"), Some("/dev/x/"));
}

#[test]
fn literal_rules_run_before_domain_rules() {
    let mut config = config();
    config.add_find_replace_arg("/var/www/example => /home/dev/site").unwrap();

    let mut store = MemoryStore::new();
    let upload = format!("a:1:{{s:4:\"path\";{}}}", s("/var/www/example/wp-content/uploads"));
    store.add_table(table(
        "wp_options",
        "option_id",
        vec![vec![("option_value", upload.as_str())]],
    ));
    migrate(&config, &mut store);

    let expected = format!("a:1:{{s:4:\"path\";{}}}", s("/home/dev/site/wp-content/uploads"));
    assert_eq!(
        store.table("wp_options").unwrap().rows[0].text("option_value"),
        Some(expected.as_str())
    );
}
