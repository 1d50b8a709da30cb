//! 应用数据目录管理模块
//!
//! # 设计思路
//!
//! 统一管理应用数据目录的解析与创建，目前唯一的持久化文件是
//! 同意偏好 `consent.json`。目录不存在时自动创建，避免上层判断。
//! 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::PathBuf;

use tauri::{AppHandle, Manager};

use crate::error::AppError;

/// 获取应用数据目录（不存在时自动创建）
pub fn get_data_dir(app: &AppHandle) -> Result<PathBuf, AppError> {
    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Storage(format!("获取应用数据目录失败: {}", e)))?;

    fs::create_dir_all(&app_data_dir)
        .map_err(|e| AppError::Storage(format!("创建应用数据目录失败: {}", e)))?;

    Ok(app_data_dir)
}

/// 同意偏好文件的完整路径
pub fn consent_file_path(app: &AppHandle) -> Result<PathBuf, AppError> {
    Ok(get_data_dir(app)?.join("consent.json"))
}
