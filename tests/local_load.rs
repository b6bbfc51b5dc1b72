//! Local Load Integration Tests
//!
//! Drives `ContentLoader::get_data` against on-disk fixture trees.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use treeload::{Config, ContentLoader, ContentType, Error};

/// Temp root below the working directory, where staging directories live
fn workspace() -> TempDir {
    std::fs::create_dir_all("target").unwrap();
    tempfile::Builder::new()
        .prefix("treeload-test-")
        .tempdir_in("target")
        .unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Content dir plus a separate staging dir, both under one temp root
fn fixture() -> (TempDir, Config) {
    let temp = workspace();
    std::fs::create_dir_all(temp.path().join("content")).unwrap();
    let config = Config::local(temp.path().join("content"))
        .with_staging_dir(temp.path().join("staging"))
        .with_verbose_ms(None);
    (temp, config)
}

fn content_dir(temp: &TempDir) -> std::path::PathBuf {
    temp.path().join("content")
}

fn find<'a>(content: &'a [ContentType], name: &str) -> &'a ContentType {
    content
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("missing content type {}", name))
}

#[tokio::test]
async fn test_team_member_scenario() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "team/alice/bio.md", "# Hi");
    write(&root, "team/alice/photo.jpg", "\u{0}\u{1}binary");

    let content = ContentLoader::new(config.with_asset_base_url("https://x/y"))
        .get_data()
        .await
        .unwrap();

    assert_eq!(content.len(), 1);
    let team = find(&content, "team");
    assert_eq!(
        team.items,
        vec![json!({
            "slug": "alice",
            "bio": "<h1>Hi</h1>\n",
            "photo": "https://x/y/team/alice/photo.jpg",
        })]
    );
}

#[tokio::test]
async fn test_image_field_wins_over_markdown() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "sponsors/acme/logo.png", "png");
    write(&root, "sponsors/acme/logo.md", "Acme logo");
    write(&root, "sponsors/acme/blurb.md", "Thanks");

    let content = ContentLoader::new(config).get_data().await.unwrap();

    assert_eq!(
        find(&content, "sponsors").items,
        vec![json!({
            "slug": "acme",
            "blurb": "<p>Thanks</p>\n",
            "logo": "sponsors/acme/logo.png",
        })]
    );
}

#[tokio::test]
async fn test_type_names_match_dirs_and_json_files() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "team/alice/data.json", r#"{"a": 1}"#);
    write(&root, "humans/jane/data.json", r#"{"role": "writer"}"#);
    write(&root, "staff.json", r#"[{"name": "Sam"}]"#);
    write(&root, "README.md", "# Content");
    write(&root, "logo.png", "png");
    std::fs::create_dir_all(root.join("empty")).unwrap();

    let content = ContentLoader::new(config).get_data().await.unwrap();
    let names: Vec<&str> = content.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names, vec!["empty", "humans", "staff", "team"]);
    assert!(find(&content, "empty").is_empty());
    assert_eq!(find(&content, "team").item("alice").unwrap()["a"], json!(1));
}

#[tokio::test]
async fn test_item_count_excludes_hidden_underscore_and_readme() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "posts/first/body.md", "one");
    write(&root, "posts/second/body.md", "two");
    write(&root, "posts/_draft/body.md", "draft");
    write(&root, "posts/.cache/body.md", "cache");
    write(&root, "posts/README.md/body.md", "odd but a directory");
    write(&root, "posts/index.md", "not a directory");

    let content = ContentLoader::new(config).get_data().await.unwrap();
    let posts = find(&content, "posts");

    assert_eq!(posts.slugs(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_humans_role_normalized() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "humans/jane/data.json", r#"{"role": "writer"}"#);
    write(&root, "humans/joe/data.json", r#"{"role": ["editor", "writer"]}"#);
    write(&root, "humans/kim/bio.md", "No role here");

    let content = ContentLoader::new(config).get_data().await.unwrap();
    let humans = find(&content, "humans");

    assert_eq!(humans.item("jane").unwrap()["role"], json!(["writer"]));
    assert_eq!(humans.item("joe").unwrap()["role"], json!(["editor", "writer"]));
    assert!(!humans.item("kim").unwrap().contains_key("role"));
}

#[tokio::test]
async fn test_file_backed_humans_normalized() {
    let (temp, config) = fixture();
    write(
        &content_dir(&temp),
        "humans.json",
        r#"[{"name": "Ada", "role": "speaker"}, {"name": "Grace"}]"#,
    );

    let content = ContentLoader::new(config).get_data().await.unwrap();
    assert_eq!(
        find(&content, "humans").items,
        vec![
            json!({"name": "Ada", "role": ["speaker"]}),
            json!({"name": "Grace"}),
        ]
    );
}

#[tokio::test]
async fn test_malformed_item_json_does_not_abort() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "team/alice/bad.json", "{invalid");
    write(&root, "team/alice/bio.md", "Still here");

    let content = ContentLoader::new(config).get_data().await.unwrap();
    let alice = find(&content, "team").item("alice").unwrap().clone();

    assert_eq!(
        serde_json::Value::Object(alice),
        json!({"slug": "alice", "bio": "<p>Still here</p>\n"})
    );
}

#[tokio::test]
async fn test_single_object_file_becomes_one_item() {
    let (temp, config) = fixture();
    write(
        &content_dir(&temp),
        "staff.json",
        r#"{"name": "Sam", "since": 2017}"#,
    );

    let content = ContentLoader::new(config).get_data().await.unwrap();
    assert_eq!(
        find(&content, "staff").items,
        vec![json!({"name": "Sam", "since": 2017})]
    );
}

#[tokio::test]
async fn test_malformed_root_json_is_fatal() {
    let (temp, config) = fixture();
    write(&content_dir(&temp), "staff.json", "{not json");

    let result = ContentLoader::new(config).get_data().await;
    assert!(matches!(result, Err(Error::InvalidContent { .. })));
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let (temp, config) = fixture();
    let root = content_dir(&temp);
    write(&root, "team/alice/bio.md", "# Alice");
    write(&root, "team/bob/data.json", r#"{"nested": {"deep": [1, 2, 3]}}"#);
    write(&root, "staff.json", r#"[{"name": "Sam"}]"#);

    let loader = ContentLoader::new(config);
    let first = loader.get_data().await.unwrap();
    let second = loader.get_data().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_staging_dir_emptied_for_local_runs() {
    let (temp, config) = fixture();
    write(&content_dir(&temp), "team/alice/bio.md", "# Alice");
    write(&temp.path().join("staging"), "stale/leftover.json", "{}");

    ContentLoader::new(config).get_data().await.unwrap();

    let staging = temp.path().join("staging");
    assert!(staging.is_dir());
    assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
}

#[tokio::test]
async fn test_local_path_inside_staging_rejected() {
    let temp = workspace();
    let staging = temp.path().join("staging");
    write(&staging, "team/alice/bio.md", "# Alice");

    let config = Config::local(staging.join("team"))
        .with_staging_dir(&staging)
        .with_verbose_ms(None);

    let result = ContentLoader::new(config).get_data().await;
    assert!(matches!(result, Err(Error::Configuration(_))));
    assert!(staging.join("team/alice/bio.md").exists());
}

#[tokio::test]
async fn test_local_path_reaching_into_staging_rejected() {
    let temp = workspace();
    let staging = temp.path().join("staging");
    write(&staging, "content/team/alice/bio.md", "# Alice");

    let config = Config::local(temp.path().join("other/../staging/content"))
        .with_staging_dir(&staging)
        .with_verbose_ms(None);

    let result = ContentLoader::new(config).get_data().await;
    assert!(matches!(result, Err(Error::Configuration(_))));
    assert!(staging.join("content/team/alice/bio.md").exists());
}

#[tokio::test]
async fn test_staging_dir_inside_local_root_not_loaded() {
    let temp = workspace();
    let root = temp.path().join("content");
    write(&root, "team/alice/bio.md", "# Alice");

    let config = Config::local(&root)
        .with_staging_dir(root.join(".treeload/staging"))
        .with_verbose_ms(None);

    let content = ContentLoader::new(config).get_data().await.unwrap();
    let names: Vec<&str> = content.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names, vec!["team"]);
    assert!(root.join(".treeload/staging").is_dir());
}

#[tokio::test]
async fn test_no_source_configured() {
    let temp = workspace();
    let config = Config::default()
        .with_staging_dir(temp.path().join("staging"))
        .with_verbose_ms(None);

    let result = ContentLoader::new(config).get_data().await;
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[tokio::test]
async fn test_output_is_plain_json() {
    let (temp, config) = fixture();
    write(&content_dir(&temp), "team/alice/data.json", r#"{"a": 1}"#);

    let content = ContentLoader::new(config).get_data().await.unwrap();
    let encoded = serde_json::to_value(&content).unwrap();

    assert_eq!(
        encoded,
        json!([{"type": "team", "items": [{"slug": "alice", "a": 1}]}])
    );
}
