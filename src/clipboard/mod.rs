//! 剪贴板复制服务模块
//!
//! # 设计思路
//!
//! 图库中的每条提示词都要能一键复制到系统剪贴板，供用户粘贴进外部 AI
//! 绘图工具。不同桌面环境的剪贴板能力参差不齐（无图形会话、Wayland
//! 权限限制等），因此复制过程采用两级通道：
//! - **主通道**：现代剪贴板 API（`arboard`），可用时直接写入
//! - **回退通道**：将文本通过管道喂给平台自带的复制工具
//!   （`pbcopy` / `clip` / `wl-copy` / `xclip`）
//!
//! 两级通道都失败时才算失败，且两级的失败原因都保留在 `CopyError` 中，
//! 不做静默吞错。服务内部不重试、不超时；调用方（前端的"复制"按钮）
//! 可在用户再次点击时重新发起。
//!
//! # 实现思路
//!
//! - 通道抽象为 `ClipboardWriter` trait，平台能力在边界处注入，
//!   两级决策逻辑位于边界之上，可用 mock 独立测试。
//! - 每次调用创建全新的剪贴板句柄 / 子进程，调用之间没有共享可变状态，
//!   并发触发（快速双击）互不干扰。
//! - 回退通道的子进程由 RAII 守卫管理，任何退出路径（成功、失败、
//!   提前返回）都会回收，不留下僵尸进程。
//! - `copy_prompt_text` 为对外的 Tauri command，返回 `CopyReceipt`
//!   （操作 id + 实际使用的通道），由前端决定展示"已复制"还是错误提示。

pub mod command;
pub mod system;

use std::sync::Mutex;

use chrono::Local;
use serde::Serialize;
use tauri::State;

use crate::error::AppError;
use command::CommandClipboard;
use system::SystemClipboard;

// ============================================================================
// 数据模型
// ============================================================================

/// 单次复制请求
///
/// 仅在一次复制尝试期间存在，不做任何持久化。
/// `operation_id` 用于日志串联与前端回执对账。
#[derive(Debug, Clone)]
pub struct CopyRequest {
    pub text: String,
    pub operation_id: String,
}

impl CopyRequest {
    /// 构造请求并生成操作 id（时间戳形式，毫秒级足够区分人手点击）
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            operation_id: format!("copy_{}", Local::now().format("%Y%m%d%H%M%S%3f")),
        }
    }

    /// 指定操作 id 的构造（测试与日志回放用）
    pub fn with_id(text: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            operation_id: operation_id.into(),
        }
    }
}

/// 复制成功时实际使用的通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMethod {
    /// 现代剪贴板 API
    Primary,
    /// 平台复制工具回退
    Fallback,
}

/// 两级通道均失败时的错误，保留各自的失败原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("剪贴板复制失败: 主通道({primary}); 回退通道({fallback})")]
pub struct CopyError {
    pub primary: String,
    pub fallback: String,
}

// ============================================================================
// 通道抽象
// ============================================================================

/// 剪贴板写入通道
///
/// 平台能力的注入点：实现者只负责"把文本放上剪贴板"这一件事，
/// 失败时返回人类可读的原因字符串（最终进入 `CopyError`）。
/// 实现必须满足：单次 `write_text` 使用的临时资源（剪贴板句柄、
/// 子进程）在返回前全部释放。
pub trait ClipboardWriter: Send {
    /// 通道名称，用于日志
    fn name(&self) -> &'static str;

    /// 将文本写入系统剪贴板
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

// ============================================================================
// 复制服务
// ============================================================================

/// 两级复制服务
///
/// 持有主通道与回退通道两个 `ClipboardWriter`，按顺序尝试。
pub struct CopyService {
    primary: Box<dyn ClipboardWriter>,
    fallback: Box<dyn ClipboardWriter>,
}

impl CopyService {
    /// 以注入的通道构造服务（测试入口）
    pub fn new(primary: Box<dyn ClipboardWriter>, fallback: Box<dyn ClipboardWriter>) -> Self {
        Self { primary, fallback }
    }

    /// 以系统默认通道构造服务：arboard 主通道 + 平台复制工具回退
    pub fn system() -> Self {
        Self::new(
            Box::new(SystemClipboard),
            Box::new(CommandClipboard::detect()),
        )
    }

    /// 执行一次复制
    ///
    /// 算法（与 Web 版行为保持一致）：
    /// 1. 主通道写入成功 → `Ok(Primary)`
    /// 2. 主通道失败 → 尝试回退通道，成功 → `Ok(Fallback)`
    /// 3. 两级均失败 → `Err(CopyError)`，携带两级原因
    ///
    /// 单次失败即终态，内部不重试。
    pub fn copy_text(&mut self, request: &CopyRequest) -> Result<CopyMethod, CopyError> {
        let primary_reason = match self.primary.write_text(&request.text) {
            Ok(()) => {
                log::debug!(
                    "📋 [{}] 主通道 {} 复制成功（{} 字符）",
                    request.operation_id,
                    self.primary.name(),
                    request.text.chars().count()
                );
                return Ok(CopyMethod::Primary);
            }
            Err(reason) => reason,
        };

        log::debug!(
            "📋 [{}] 主通道 {} 失败（{}），尝试回退通道 {}",
            request.operation_id,
            self.primary.name(),
            primary_reason,
            self.fallback.name()
        );

        match self.fallback.write_text(&request.text) {
            Ok(()) => Ok(CopyMethod::Fallback),
            Err(fallback_reason) => Err(CopyError {
                primary: primary_reason,
                fallback: fallback_reason,
            }),
        }
    }
}

// ============================================================================
// Tauri 状态与命令
// ============================================================================

/// 复制服务的托管状态
pub struct CopyState(pub Mutex<CopyService>);

/// 复制回执，返回给前端用于展示"已复制"提示
#[derive(Debug, Clone, Serialize)]
pub struct CopyReceipt {
    pub operation_id: String,
    pub method: CopyMethod,
}

/// 将任意文本复制到系统剪贴板
///
/// # 返回
/// - `Ok(CopyReceipt)`：复制成功，含实际使用的通道
/// - `Err(AppError::Clipboard)`：两级通道均失败，原因在错误消息中
#[tauri::command]
pub fn copy_text_to_clipboard(
    state: State<'_, CopyState>,
    text: String,
) -> Result<CopyReceipt, AppError> {
    let request = CopyRequest::new(text);
    let mut service = state
        .0
        .lock()
        .map_err(|_| AppError::State("复制服务状态锁被毒化".to_string()))?;

    let method = service.copy_text(&request)?;
    Ok(CopyReceipt {
        operation_id: request.operation_id,
        method,
    })
}
