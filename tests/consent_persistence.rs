//! 同意状态机的持久化与不变量测试
//!
//! 文件后端走真实磁盘（tempfile），重点验证：决定跨"重启"存活、
//! 持久化布局与 Web 版逐字节兼容、存储不可用时静默退化、
//! `essential` 在任意操作序列下恒真。

use std::cell::RefCell;
use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use prompt_gallery::consent::storage::{FileStorage, MemoryStorage};
use prompt_gallery::consent::{
    ConsentCategory, ConsentDecision, ConsentPreferences, ConsentStore, ServiceGate,
};

/// 记录初始化调用的门禁
struct RecordingGate {
    initialized: RefCell<Vec<ConsentCategory>>,
}

impl RecordingGate {
    fn new() -> Self {
        Self {
            initialized: RefCell::new(Vec::new()),
        }
    }
}

impl ServiceGate for RecordingGate {
    fn initialize(&self, category: ConsentCategory) {
        self.initialized.borrow_mut().push(category);
    }
}

/// 什么都不做的门禁（性质测试用）
struct NullGate;

impl ServiceGate for NullGate {
    fn initialize(&self, _category: ConsentCategory) {}
}

// ============================================================================
// 首次访问与决定存活
// ============================================================================

#[test]
fn first_visit_shows_prompt_with_defaults() {
    let dir = tempdir().expect("create temp dir");
    let store = ConsentStore::load(Box::new(FileStorage::new(dir.path().join("consent.json"))));

    assert_eq!(store.decision(), ConsentDecision::Unset);
    assert!(store.prompt_visible());
    assert_eq!(store.preferences(), ConsentPreferences::default());
}

#[test]
fn accept_all_survives_reload() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("consent.json");

    let mut store = ConsentStore::load(Box::new(FileStorage::new(path.clone())));
    store.accept_all(&NullGate);

    // "重启"：从同一文件重新加载
    let reloaded = ConsentStore::load(Box::new(FileStorage::new(path)));
    assert_eq!(reloaded.decision(), ConsentDecision::AcceptedAll);
    assert_eq!(reloaded.preferences(), ConsentPreferences::all_accepted());
    assert!(!reloaded.prompt_visible());
}

#[test]
fn reject_all_survives_reload_and_initializes_nothing() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("consent.json");

    let mut store = ConsentStore::load(Box::new(FileStorage::new(path.clone())));
    store.reject_all();

    let reloaded = ConsentStore::load(Box::new(FileStorage::new(path)));
    let prefs = reloaded.preferences();
    assert_eq!(reloaded.decision(), ConsentDecision::RejectedAll);
    assert!(prefs.essential);
    assert!(!prefs.analytics && !prefs.marketing && !prefs.preferences);
}

#[test]
fn custom_toggle_isolation_across_reload() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("consent.json");

    let mut store = ConsentStore::load(Box::new(FileStorage::new(path.clone())));
    let before = store.preferences();
    let working = store.toggle(ConsentCategory::Analytics);

    let gate = RecordingGate::new();
    store.save_preferences(working, &gate);
    assert_eq!(*gate.initialized.borrow(), vec![ConsentCategory::Analytics]);

    let reloaded = ConsentStore::load(Box::new(FileStorage::new(path)));
    let prefs = reloaded.preferences();
    assert_eq!(reloaded.decision(), ConsentDecision::Custom);
    assert!(prefs.analytics);
    assert_eq!(prefs.marketing, before.marketing);
    assert_eq!(prefs.preferences, before.preferences);
}

// ============================================================================
// 持久化布局（与 Web 版 localStorage 兼容）
// ============================================================================

#[test]
fn persisted_layout_matches_web_version() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("consent.json");

    let mut store = ConsentStore::load(Box::new(FileStorage::new(path.clone())));
    store.accept_all(&NullGate);

    let raw = fs::read_to_string(&path).expect("consent file written");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

    // 键名与取值字面量
    assert_eq!(parsed["cookieConsent"], "accepted");

    // cookiePreferences 的值本身是 JSON 编码的字符串
    let encoded = parsed["cookiePreferences"]
        .as_str()
        .expect("preferences stored as a JSON-encoded string");
    let prefs: serde_json::Value = serde_json::from_str(encoded).expect("nested json");
    assert_eq!(prefs["essential"], true);
    assert_eq!(prefs["analytics"], true);
    assert_eq!(prefs["marketing"], true);
    assert_eq!(prefs["preferences"], true);
}

#[test]
fn rejected_literal_is_persisted() {
    let dir = tempdir().expect("create temp dir");
    let path = dir.path().join("consent.json");

    let mut store = ConsentStore::load(Box::new(FileStorage::new(path.clone())));
    store.reject_all();

    let raw = fs::read_to_string(&path).expect("consent file written");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(parsed["cookieConsent"], "rejected");
}

// ============================================================================
// 存储不可用时的退化
// ============================================================================

#[test]
fn unavailable_storage_degrades_to_session_only_state() {
    // 指向一个不存在且不会被创建的目录：写必然失败
    let path = std::path::PathBuf::from("/nonexistent-root/consent/consent.json");

    let mut store = ConsentStore::load(Box::new(FileStorage::new(path.clone())));
    store.accept_all(&NullGate);

    // 本次会话内决定仍然生效（仅内存）
    assert_eq!(store.decision(), ConsentDecision::AcceptedAll);
    assert!(!store.prompt_visible());

    // "下次启动"：什么都没存下来，横幅重新出现
    let reloaded = ConsentStore::load(Box::new(FileStorage::new(path)));
    assert_eq!(reloaded.decision(), ConsentDecision::Unset);
    assert!(reloaded.prompt_visible());
}

// ============================================================================
// essential 不变量（任意操作序列）
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    AcceptAll,
    RejectAll,
    Toggle(ConsentCategory),
    Save(ConsentPreferences),
}

fn category_strategy() -> impl Strategy<Value = ConsentCategory> {
    prop_oneof![
        Just(ConsentCategory::Essential),
        Just(ConsentCategory::Analytics),
        Just(ConsentCategory::Marketing),
        Just(ConsentCategory::Preferences),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AcceptAll),
        Just(Op::RejectAll),
        category_strategy().prop_map(Op::Toggle),
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(essential, analytics, marketing, preferences)| Op::Save(ConsentPreferences {
                essential,
                analytics,
                marketing,
                preferences,
            })
        ),
    ]
}

proptest! {
    /// 任何可达状态下 `preferences.essential` 均为 true，
    /// 包括恶意传入 `essential = false` 的自定义组合
    #[test]
    fn essential_is_true_in_every_reachable_state(
        ops in proptest::collection::vec(op_strategy(), 0..24)
    ) {
        let storage = MemoryStorage::new();
        let mut store = ConsentStore::load(Box::new(storage.clone()));
        prop_assert!(store.preferences().essential);

        for op in ops {
            match op {
                Op::AcceptAll => store.accept_all(&NullGate),
                Op::RejectAll => store.reject_all(),
                Op::Toggle(category) => {
                    store.toggle(category);
                }
                Op::Save(prefs) => store.save_preferences(prefs, &NullGate),
            }
            prop_assert!(store.preferences().essential, "操作后 essential 必须仍为 true");
        }

        // 跨重载同样成立
        let reloaded = ConsentStore::load(Box::new(storage));
        prop_assert!(reloaded.preferences().essential);
    }
}
