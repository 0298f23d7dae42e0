//! A console wired from a config file: lists, theme and sign-in.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_roster::auth::{AuthService, CodeTarget, Credentials, InMemoryAuthProvider};
use horizon_roster::config::{ConsoleConfig, ListConfig};
use horizon_roster::countdown::{CountdownTick, VerificationCountdown};
use horizon_roster::error::ConfigError;
use horizon_roster::model::{FieldValue, ListRecord, Record, RecordId};
use horizon_roster::page::ListPage;
use horizon_roster::theme::{MemoryThemeStore, ThemeController};

const CONSOLE_TOML: &str = r##"
[theme]
vi_color = "#16a34a"

[lists.activities]
page_size = 2
search_field = "title"
exportable = false

[lists.members]
page_size = 3
"##;

#[derive(Debug, Clone, PartialEq)]
struct Activity {
    id: RecordId,
    title: String,
    signups: i64,
}

impl ListRecord for Activity {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => Some(FieldValue::from(self.title.as_str())),
            "signups" => Some(FieldValue::from(self.signups)),
            _ => None,
        }
    }
}

fn activities() -> Vec<Activity> {
    [
        ("a1", "Spring tea tasting", 12),
        ("a2", "Member day", 40),
        ("a3", "Spring hike", 25),
        ("a4", "Autumn gala", 80),
        ("a5", "Product launch", 55),
    ]
    .into_iter()
    .map(|(id, title, signups)| Activity {
        id: RecordId::new(id),
        title: title.to_string(),
        signups,
    })
    .collect()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("horizon_roster=debug")
        .with_test_writer()
        .try_init();
}

#[test]
fn config_file_round_trip() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("console.toml");
    std::fs::write(&toml_path, CONSOLE_TOML).unwrap();
    let config = ConsoleConfig::load(&toml_path).unwrap();

    assert_eq!(config.theme.vi_color, "#16a34a");
    assert_eq!(config.list("activities").map(|l| l.page_size), Some(2));
    assert_eq!(config.list_or_default("members").search_field, "name");

    let json_path = dir.path().join("console.json");
    config.save(&json_path).unwrap();
    assert_eq!(ConsoleConfig::load(&json_path).unwrap(), config);

    let toml_copy = dir.path().join("copy.toml");
    config.save(&toml_copy).unwrap();
    assert_eq!(ConsoleConfig::load(&toml_copy).unwrap(), config);
}

#[test]
fn config_load_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        ConsoleConfig::load(&missing),
        Err(ConfigError::Io { .. })
    ));

    let yaml = dir.path().join("console.yaml");
    std::fs::write(&yaml, "theme: {}").unwrap();
    assert!(matches!(
        ConsoleConfig::load(&yaml),
        Err(ConfigError::UnknownFormat(_))
    ));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"lists": {"files": {"page_size": 0}}}"#).unwrap();
    assert!(matches!(
        ConsoleConfig::load(&bad),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn activity_list_from_config() {
    init_tracing();
    let config = ConsoleConfig::from_toml_str(CONSOLE_TOML).unwrap();
    let list_config = config.list_or_default("activities");
    assert!(!list_config.exportable);

    let page = ListPage::from_config(list_config, activities());
    let pages = Arc::new(Mutex::new(Vec::new()));
    let recv = pages.clone();
    page.page_changed.connect(move |&p| recv.lock().push(p));

    page.go_to_page(3);
    assert_eq!(page.render().records[0].id.as_str(), "a5");

    page.set_search_text("spring");
    let rendered = page.render();
    let titles: Vec<&str> = rendered.records.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Spring tea tasting", "Spring hike"]);
    assert!(!rendered.page_info.shows_controls());

    assert!(page.drag_end(&RecordId::new("a3"), &RecordId::new("a1")));
    let rendered = page.render();
    assert_eq!(rendered.records[0].id.as_str(), "a3");

    assert_eq!(*pages.lock(), vec![3, 1]);
}

#[test]
fn removing_records_clamps_and_prunes() {
    let page = ListPage::from_config(ListConfig::new().with_page_size(2), activities());
    page.go_to_page(3);
    page.set_selected(&RecordId::new("a5"), true);
    page.set_selected(&RecordId::new("a1"), true);

    assert!(page.remove_record(&RecordId::new("a5")).is_some());
    assert_eq!(page.selected_ids(), vec![RecordId::new("a1")]);

    let rendered = page.render();
    assert_eq!(rendered.page_info.effective_page, 2);
    assert_eq!(page.current_page(), 2);
    assert_eq!(rendered.records.len(), 2);

    page.replace_records(Vec::new());
    let rendered = page.render();
    assert!(rendered.records.is_empty());
    assert_eq!(rendered.page_info.total_pages, 1);
    assert!(page.selected_ids().is_empty());
}

#[test]
fn generic_records_from_json_fixture() {
    let records = Record::list_from_json(
        r#"[
            {"id": "c1", "fields": {"name": "Industry news", "articles": 14}},
            {"id": "c2", "fields": {"name": "Company news", "articles": 3}},
            {"id": "c3", "fields": {"name": "Case studies"}}
        ]"#,
    )
    .unwrap();

    let page = ListPage::from_config(ListConfig::new(), records);
    page.set_search_text("NEWS");
    assert_eq!(page.render().records.len(), 2);
    assert!(page.add_record(Record::new("c1")).is_err());
}

#[test]
fn theme_from_config_applies_variables() {
    let config = ConsoleConfig::from_toml_str(CONSOLE_TOML).unwrap();
    let theme = ThemeController::new(MemoryThemeStore::new(), config.theme.vi_color);

    let mut root = BTreeMap::new();
    theme.apply(&mut root);
    assert_eq!(root["--primary"], "142 76% 36%");
    assert_eq!(root["--accent"], "142 76% 97%");
    assert_eq!(root["--admin-icon-bg"], "142 76% 95%");
}

#[test]
fn code_sign_in_with_countdown() {
    init_tracing();
    let auth = AuthService::new(InMemoryAuthProvider::new().with_fixed_code("777777"));
    let countdown = VerificationCountdown::with_duration(2);

    let target = CodeTarget::Phone("13900000000".into());
    auth.send_code(&target).unwrap();
    countdown.start();
    assert!(countdown.is_active());
    assert_eq!(countdown.tick(), CountdownTick::Running(1));
    assert_eq!(countdown.tick(), CountdownTick::Finished);
    assert!(!countdown.is_active());

    let session = auth
        .sign_in(&Credentials::PhoneCode {
            phone: "13900000000".into(),
            code: "777777".into(),
        })
        .unwrap();
    assert_eq!(session.account, "13900000000");
    auth.sign_out().unwrap();
    assert!(auth.session().is_none());
}
