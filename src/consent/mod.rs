//! Cookie 同意管理模块
//!
//! # 设计思路
//!
//! 站点带有四类 Cookie 的同意横幅：必要（essential）不可关闭，
//! 分析（analytics）、营销（marketing）、偏好（preferences）由用户决定。
//! 桌面端沿用同一套状态机：
//!
//! ```text
//! 未提示 ──(无持久化决定)──► 已提示（横幅可见）
//!    │                           │
//!    └──(读到持久化决定)──► 已决定（acceptedAll / rejectedAll / custom）
//! ```
//!
//! 决定一经做出即为终态并持久化；后续启动直接读取，不再弹横幅。
//!
//! # 实现思路
//!
//! - 状态封装在显式的 `ConsentStore` 对象中，不使用模块级全局变量；
//!   存储后端（[`storage::ConsentStorage`]）与下游服务初始化
//!   （[`ServiceGate`]）都在构造/调用时注入，store 本身不依赖任何
//!   UI 框架，可独立测试。
//! - 不变量：`essential` 在任何可达状态下恒为 `true`，所有写路径
//!   （toggle / save_preferences / 反序列化）都做强制归一。
//! - 持久化尽力而为：写失败仅记录 warn 日志，状态保留在内存中，
//!   横幅下次启动重新出现。

pub mod storage;

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::error::AppError;
use storage::{ConsentStorage, DECISION_KEY, PREFERENCES_KEY};

// ============================================================================
// 数据模型
// ============================================================================

/// Cookie 类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentCategory {
    Essential,
    Analytics,
    Marketing,
    Preferences,
}

impl ConsentCategory {
    /// 是否为不可关闭的必要类别
    pub fn is_required(self) -> bool {
        matches!(self, ConsentCategory::Essential)
    }
}

/// 四类 Cookie 的同意偏好
///
/// 字段名与 Web 版持久化布局一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentPreferences {
    pub essential: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
}

impl Default for ConsentPreferences {
    /// 首次访问的默认值：必要恒真，其余待用户决定
    fn default() -> Self {
        Self {
            essential: true,
            analytics: false,
            marketing: false,
            preferences: false,
        }
    }
}

impl ConsentPreferences {
    /// 全部同意
    pub fn all_accepted() -> Self {
        Self {
            essential: true,
            analytics: true,
            marketing: true,
            preferences: true,
        }
    }

    /// 强制 `essential = true` 的归一化（所有入口统一经过这里）
    fn normalized(mut self) -> Self {
        self.essential = true;
        self
    }

    /// 已启用的可选类别（必要类别不在其中）
    pub fn enabled_optional(&self) -> Vec<ConsentCategory> {
        let mut enabled = Vec::new();
        if self.analytics {
            enabled.push(ConsentCategory::Analytics);
        }
        if self.marketing {
            enabled.push(ConsentCategory::Marketing);
        }
        if self.preferences {
            enabled.push(ConsentCategory::Preferences);
        }
        enabled
    }
}

/// 用户对同意横幅的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsentDecision {
    /// 尚未决定（横幅可见）
    Unset,
    AcceptedAll,
    RejectedAll,
    Custom,
}

impl ConsentDecision {
    /// 持久化字面量（与 Web 版 localStorage 取值一致）
    fn as_persisted(self) -> Option<&'static str> {
        match self {
            ConsentDecision::Unset => None,
            ConsentDecision::AcceptedAll => Some("accepted"),
            ConsentDecision::RejectedAll => Some("rejected"),
            ConsentDecision::Custom => Some("custom"),
        }
    }

    fn from_persisted(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(ConsentDecision::AcceptedAll),
            "rejected" => Some(ConsentDecision::RejectedAll),
            "custom" => Some(ConsentDecision::Custom),
            _ => None,
        }
    }
}

// ============================================================================
// 下游服务门禁
// ============================================================================

/// 可选服务的初始化门禁
///
/// 同意某类 Cookie 之后对应的下游服务（埋点、营销像素等）才允许启动。
/// 以 trait 注入使测试能精确观察哪些类别被初始化了。
pub trait ServiceGate {
    fn initialize(&self, category: ConsentCategory);
}

/// 默认门禁：桌面端没有真实的埋点 SDK，仅记录日志
pub struct LoggingGate;

impl ServiceGate for LoggingGate {
    fn initialize(&self, category: ConsentCategory) {
        log::info!("✅ 按用户同意启用可选服务: {:?}", category);
    }
}

// ============================================================================
// ConsentStore — 同意状态机
// ============================================================================

/// 同意状态的显式 store
///
/// 持有当前偏好的内存工作副本与已持久化的决定；所有变更经由
/// 下方的操作方法进入，UI 层只做消息转发。
pub struct ConsentStore {
    preferences: ConsentPreferences,
    decision: ConsentDecision,
    storage: Box<dyn ConsentStorage>,
}

impl ConsentStore {
    /// 从存储加载同意状态
    ///
    /// - 无持久化决定 → `Unset` + 默认偏好（横幅可见）
    /// - 有决定但偏好缺失/损坏 → 按决定推导（acceptedAll → 全真，
    ///   其余 → 默认），损坏内容不传播
    pub fn load(storage: Box<dyn ConsentStorage>) -> Self {
        let decision = storage
            .read(DECISION_KEY)
            .as_deref()
            .and_then(ConsentDecision::from_persisted)
            .unwrap_or(ConsentDecision::Unset);

        let stored_preferences = storage.read(PREFERENCES_KEY).and_then(|raw| {
            serde_json::from_str::<ConsentPreferences>(&raw)
                .map_err(|e| log::warn!("同意偏好内容损坏，回退为默认值: {}", e))
                .ok()
        });

        let preferences = match (stored_preferences, decision) {
            (Some(prefs), _) => prefs.normalized(),
            (None, ConsentDecision::AcceptedAll) => ConsentPreferences::all_accepted(),
            (None, _) => ConsentPreferences::default(),
        };

        Self {
            preferences,
            decision,
            storage,
        }
    }

    /// 当前决定
    pub fn decision(&self) -> ConsentDecision {
        self.decision
    }

    /// 当前偏好（内存工作副本）
    pub fn preferences(&self) -> ConsentPreferences {
        self.preferences
    }

    /// 同意横幅是否应当显示
    pub fn prompt_visible(&self) -> bool {
        self.decision == ConsentDecision::Unset
    }

    /// 全部接受：四类全真，持久化 `accepted`，启用全部可选服务
    pub fn accept_all(&mut self, gate: &dyn ServiceGate) {
        self.preferences = ConsentPreferences::all_accepted();
        self.decision = ConsentDecision::AcceptedAll;
        self.persist();
        self.initialize_enabled(gate);
    }

    /// 全部拒绝：仅保留必要类别，持久化 `rejected`
    ///
    /// 签名上就不接受门禁参数——拒绝路径在类型层面保证不会触发
    /// 任何可选服务初始化。
    pub fn reject_all(&mut self) {
        self.preferences = ConsentPreferences::default();
        self.decision = ConsentDecision::RejectedAll;
        self.persist();
    }

    /// 保存自定义组合：`essential` 无条件归一为真，持久化 `custom`，
    /// 仅启用组合中为真的可选服务
    pub fn save_preferences(&mut self, preferences: ConsentPreferences, gate: &dyn ServiceGate) {
        self.preferences = preferences.normalized();
        self.decision = ConsentDecision::Custom;
        self.persist();
        self.initialize_enabled(gate);
    }

    /// 翻转内存工作副本中的单个可选类别（`save_preferences` 之前的
    /// 横幅内勾选操作）；必要类别为 no-op
    pub fn toggle(&mut self, category: ConsentCategory) -> ConsentPreferences {
        match category {
            ConsentCategory::Essential => {}
            ConsentCategory::Analytics => self.preferences.analytics = !self.preferences.analytics,
            ConsentCategory::Marketing => self.preferences.marketing = !self.preferences.marketing,
            ConsentCategory::Preferences => {
                self.preferences.preferences = !self.preferences.preferences
            }
        }
        self.preferences
    }

    /// 持久化当前状态（尽力而为，失败仅记录日志）
    fn persist(&mut self) {
        let Some(literal) = self.decision.as_persisted() else {
            return;
        };

        if let Err(e) = self.storage.write(DECISION_KEY, literal) {
            log::warn!("同意决定持久化失败，本次会话仅保留内存状态: {}", e);
            return;
        }

        match serde_json::to_string(&self.preferences) {
            Ok(encoded) => {
                if let Err(e) = self.storage.write(PREFERENCES_KEY, &encoded) {
                    log::warn!("同意偏好持久化失败，本次会话仅保留内存状态: {}", e);
                }
            }
            Err(e) => log::warn!("同意偏好序列化失败: {}", e),
        }
    }

    fn initialize_enabled(&self, gate: &dyn ServiceGate) {
        for category in self.preferences.enabled_optional() {
            gate.initialize(category);
        }
    }
}

// ============================================================================
// Tauri 状态与命令
// ============================================================================

/// 同意 store 的托管状态
pub struct ConsentState(pub Mutex<ConsentStore>);

/// 返回给前端的同意状态快照
#[derive(Debug, Clone, Serialize)]
pub struct ConsentSnapshot {
    pub decision: ConsentDecision,
    pub preferences: ConsentPreferences,
    pub prompt_visible: bool,
}

impl ConsentSnapshot {
    fn of(store: &ConsentStore) -> Self {
        Self {
            decision: store.decision(),
            preferences: store.preferences(),
            prompt_visible: store.prompt_visible(),
        }
    }
}

fn locked<'a>(
    state: &'a State<'_, ConsentState>,
) -> Result<std::sync::MutexGuard<'a, ConsentStore>, AppError> {
    state
        .0
        .lock()
        .map_err(|_| AppError::State("同意状态锁被毒化".to_string()))
}

/// 读取同意状态（应用启动时由前端调用，决定是否弹横幅）
#[tauri::command]
pub fn consent_load(state: State<'_, ConsentState>) -> Result<ConsentSnapshot, AppError> {
    let store = locked(&state)?;
    Ok(ConsentSnapshot::of(&store))
}

/// 横幅"全部接受"
#[tauri::command]
pub fn consent_accept_all(state: State<'_, ConsentState>) -> Result<ConsentSnapshot, AppError> {
    let mut store = locked(&state)?;
    store.accept_all(&LoggingGate);
    Ok(ConsentSnapshot::of(&store))
}

/// 横幅"全部拒绝"
#[tauri::command]
pub fn consent_reject_all(state: State<'_, ConsentState>) -> Result<ConsentSnapshot, AppError> {
    let mut store = locked(&state)?;
    store.reject_all();
    Ok(ConsentSnapshot::of(&store))
}

/// 横幅"保存我的选择"
#[tauri::command]
pub fn consent_save_preferences(
    state: State<'_, ConsentState>,
    preferences: ConsentPreferences,
) -> Result<ConsentSnapshot, AppError> {
    let mut store = locked(&state)?;
    store.save_preferences(preferences, &LoggingGate);
    Ok(ConsentSnapshot::of(&store))
}

/// 横幅内勾选某个类别
#[tauri::command]
pub fn consent_toggle(
    state: State<'_, ConsentState>,
    category: ConsentCategory,
) -> Result<ConsentSnapshot, AppError> {
    let mut store = locked(&state)?;
    store.toggle(category);
    Ok(ConsentSnapshot::of(&store))
}

#[cfg(test)]
mod tests {
    use super::storage::MemoryStorage;
    use super::*;
    use std::cell::RefCell;

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

    fn fresh_store() -> ConsentStore {
        ConsentStore::load(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn first_visit_is_unset_with_defaults() {
        let store = fresh_store();
        assert_eq!(store.decision(), ConsentDecision::Unset);
        assert!(store.prompt_visible());
        assert_eq!(store.preferences(), ConsentPreferences::default());
        assert!(store.preferences().essential);
    }

    #[test]
    fn accept_all_enables_everything_and_hides_prompt() {
        let mut store = fresh_store();
        let gate = RecordingGate::new();
        store.accept_all(&gate);

        assert_eq!(store.decision(), ConsentDecision::AcceptedAll);
        assert!(!store.prompt_visible());
        assert_eq!(store.preferences(), ConsentPreferences::all_accepted());
        assert_eq!(
            *gate.initialized.borrow(),
            vec![
                ConsentCategory::Analytics,
                ConsentCategory::Marketing,
                ConsentCategory::Preferences
            ]
        );
    }

    #[test]
    fn reject_all_keeps_only_essential() {
        let mut store = fresh_store();
        store.reject_all();

        let prefs = store.preferences();
        assert_eq!(store.decision(), ConsentDecision::RejectedAll);
        assert!(prefs.essential);
        assert!(!prefs.analytics && !prefs.marketing && !prefs.preferences);
        assert!(!store.prompt_visible());
    }

    #[test]
    fn toggle_essential_is_noop() {
        let mut store = fresh_store();
        let prefs = store.toggle(ConsentCategory::Essential);
        assert!(prefs.essential);
        assert_eq!(prefs, ConsentPreferences::default());
    }

    #[test]
    fn toggle_analytics_leaves_other_categories_alone() {
        let mut store = fresh_store();
        let before = store.preferences();
        let after = store.toggle(ConsentCategory::Analytics);

        assert!(after.analytics);
        assert_eq!(after.marketing, before.marketing);
        assert_eq!(after.preferences, before.preferences);

        // 随后保存为自定义组合，其余类别保持不变
        let gate = RecordingGate::new();
        store.save_preferences(after, &gate);
        assert_eq!(store.decision(), ConsentDecision::Custom);
        assert_eq!(
            *gate.initialized.borrow(),
            vec![ConsentCategory::Analytics]
        );
    }

    #[test]
    fn save_preferences_forces_essential_true() {
        let mut store = fresh_store();
        let gate = RecordingGate::new();
        store.save_preferences(
            ConsentPreferences {
                essential: false,
                analytics: false,
                marketing: true,
                preferences: false,
            },
            &gate,
        );
        assert!(store.preferences().essential);
    }

    #[test]
    fn decision_survives_reload_through_shared_storage() {
        let storage = MemoryStorage::new();
        let mut store = ConsentStore::load(Box::new(storage.clone()));
        store.accept_all(&LoggingGate);

        let reloaded = ConsentStore::load(Box::new(storage));
        assert_eq!(reloaded.decision(), ConsentDecision::AcceptedAll);
        assert_eq!(reloaded.preferences(), ConsentPreferences::all_accepted());
        assert!(!reloaded.prompt_visible());
    }

    #[test]
    fn corrupted_preferences_fall_back_per_decision() {
        let mut storage = MemoryStorage::new();
        storage.write(DECISION_KEY, "accepted").unwrap();
        storage.write(PREFERENCES_KEY, "not-json{{").unwrap();

        let store = ConsentStore::load(Box::new(storage));
        assert_eq!(store.decision(), ConsentDecision::AcceptedAll);
        assert_eq!(store.preferences(), ConsentPreferences::all_accepted());
    }

    #[test]
    fn unknown_decision_literal_treated_as_unset() {
        let mut storage = MemoryStorage::new();
        storage.write(DECISION_KEY, "maybe-later").unwrap();

        let store = ConsentStore::load(Box::new(storage));
        assert_eq!(store.decision(), ConsentDecision::Unset);
        assert!(store.prompt_visible());
    }
}
