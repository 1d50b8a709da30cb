//! 同意偏好的持久化层
//!
//! # 设计思路
//!
//! Web 版把同意状态放在浏览器 localStorage 的两个键位里；桌面版保持
//! 同样的键值布局（键名、取值字面量逐字节一致），存储介质换成应用
//! 数据目录下的 JSON 文件，未来做站点与桌面端同步时无需迁移。
//!
//! 持久化是尽力而为的：存储不可用时上层退化为仅内存状态，
//! 同意横幅下次启动会重新出现，这不算错误。
//!
//! # 实现思路
//!
//! - `ConsentStorage` trait 抽象"字符串键值对"读写，文件实现与
//!   内存实现各一个；内存实现同时充当存储不可用时的兜底。
//! - 文件实现采用读-改-写整个 JSON 对象的方式，与设置文件同样的
//!   `serde_json` 读写路径。
//! - `MemoryStorage` 内部用 `Arc<Mutex<…>>`，克隆体共享同一份数据，
//!   测试可以用两个克隆体模拟"重启后重新加载"。

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

/// 决定项的存储键（与 Web 版 localStorage 一致）
pub const DECISION_KEY: &str = "cookieConsent";
/// 偏好对象的存储键（与 Web 版 localStorage 一致）
pub const PREFERENCES_KEY: &str = "cookiePreferences";

/// 持久化失败
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("读写同意偏好文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("同意偏好文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 字符串键值对存储
///
/// localStorage 的桌面版替身：值永远是字符串，
/// `cookiePreferences` 的值本身是一段 JSON 编码的文本。
pub trait ConsentStorage: Send {
    /// 读取键对应的值，不存在时返回 `None`
    fn read(&self, key: &str) -> Option<String>;

    /// 写入键值对
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ============================================================================
// 文件存储
// ============================================================================

/// 文件后端：单个 JSON 对象文件，字段即键值对
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_map(&self) -> Map<String, Value> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                log::warn!("同意偏好文件不是 JSON 对象，按空文件处理");
                Map::new()
            }
            Err(e) => {
                log::warn!("同意偏好文件解析失败，按空文件处理: {}", e);
                Map::new()
            }
        }
    }
}

impl ConsentStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.load_map()
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.load_map();
        map.insert(key.to_string(), Value::String(value.to_string()));

        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

// ============================================================================
// 内存存储
// ============================================================================

/// 内存后端：文件存储不可用时的兜底，也是测试的默认后端
///
/// 克隆体共享同一份数据，用于模拟"重启后重新加载"。
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConsentStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.read(DECISION_KEY).is_none());
        storage.write(DECISION_KEY, "accepted").unwrap();
        assert_eq!(storage.read(DECISION_KEY).as_deref(), Some("accepted"));
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let mut storage = MemoryStorage::new();
        let twin = storage.clone();
        storage.write(PREFERENCES_KEY, "{}").unwrap();
        assert_eq!(twin.read(PREFERENCES_KEY).as_deref(), Some("{}"));
    }
}
