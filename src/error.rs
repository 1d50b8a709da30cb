//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! 所有 `#[tauri::command]` 函数统一返回 `Result<T, AppError>`，
//! 前端通过 `Serialize` 获得结构化的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `CopyError` / `reqwest::Error` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，满足 Tauri IPC 要求。

use serde::Serialize;

use crate::clipboard::CopyError;

/// 应用级统一错误类型
///
/// 所有 Tauri command 均返回此类型，确保前端收到一致的错误格式。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板复制失败（主通道与回退通道均失败）
    #[error("{0}")]
    Clipboard(#[from] CopyError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 存储目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),

    /// 托管状态异常（锁被毒化等，正常运行不应出现）
    #[error("内部状态错误: {0}")]
    State(String),

    /// 表单 / 入参校验失败
    #[error("校验失败: {0}")]
    Validation(String),

    /// 请求的内容不存在（提示词 / 文章）
    #[error("内容不存在: {0}")]
    NotFound(String),

    /// 身份服务调用失败
    #[error("身份服务错误: {0}")]
    Auth(String),

    /// 网络请求失败
    #[error("网络错误: {0}")]
    Network(#[from] reqwest::Error),

    /// 打开外部链接失败
    #[error("打开外部链接失败: {0}")]
    Shell(String),
}

/// Tauri IPC 要求返回值实现 `Serialize`。
/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
