//! 身份服务客户端模块
//!
//! # 设计思路
//!
//! 注册 / 会话由外部托管的身份服务负责，本模块只是薄封装：
//! 组装请求、缓存当前会话、把登录状态变化广播给前端。
//! 凭据校验只做入口形状检查（邮箱形状、密码长度），
//! 真正的策略在服务端。
//!
//! # 实现思路
//!
//! - `reqwest::Client` 随托管状态复用连接池；会话缓存在 `Mutex` 里，
//!   锁不跨 `await` 持有。
//! - 服务地址从环境变量 `PROMPT_GALLERY_AUTH_URL` 读取，未设置时
//!   使用线上默认地址。
//! - 登录状态变化经 Tauri 事件 `auth-state-changed` 通知前端
//!   （Web 版 `onAuthStateChange` 回调的桌面版对应物）。

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Emitter, State};

use crate::contact::is_valid_email;
use crate::error::AppError;

const BASE_URL_ENV: &str = "PROMPT_GALLERY_AUTH_URL";
const DEFAULT_BASE_URL: &str = "https://identity.promptgallery.app";

/// 身份服务返回的用户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// 会话（对本应用不透明，原样缓存与透传）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

/// 身份服务客户端的托管状态
pub struct AuthState {
    client: reqwest::Client,
    base_url: String,
    session: Mutex<Option<Session>>,
}

impl AuthState {
    pub fn new() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            client: reqwest::Client::new(),
            base_url,
            session: Mutex::new(None),
        }
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

/// 去掉末尾斜杠，拼接路径时统一由本模块补 `/`
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// 登录状态变化事件的负载
#[derive(Debug, Clone, Serialize)]
struct AuthEventPayload {
    /// `"signed_up"` 或 `"signed_out"`
    event: &'static str,
    session: Option<Session>,
}

fn emit_auth_change(app: &AppHandle, event: &'static str, session: Option<Session>) {
    let _ = app.emit("auth-state-changed", AuthEventPayload { event, session });
}

/// 注册入参的形状检查
fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::Validation("邮箱格式不正确".to_string()));
    }
    if password.chars().count() < 8 {
        return Err(AppError::Validation("密码至少 8 个字符".to_string()));
    }
    Ok(())
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
}

// ============================================================================
// Tauri 命令
// ============================================================================

/// 邮箱 + 密码注册
///
/// 成功后缓存会话并广播 `auth-state-changed`。
#[tauri::command]
pub async fn auth_sign_up(
    app: AppHandle,
    state: State<'_, AuthState>,
    email: String,
    password: String,
) -> Result<Session, AppError> {
    validate_credentials(&email, &password)?;

    let response = state
        .client
        .post(format!("{}/auth/v1/signup", state.base_url))
        .json(&SignUpBody {
            email: &email,
            password: &password,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::Auth(format!(
            "注册失败（HTTP {}）",
            response.status()
        )));
    }

    let session: Session = response.json().await?;

    if let Ok(mut cached) = state.session.lock() {
        *cached = Some(session.clone());
    }
    emit_auth_change(&app, "signed_up", Some(session.clone()));
    log::info!("👤 注册成功: {}", session.user.email);

    Ok(session)
}

/// 读取当前会话（无会话时返回 `None`）
#[tauri::command]
pub fn auth_get_session(state: State<'_, AuthState>) -> Result<Option<Session>, AppError> {
    state
        .session
        .lock()
        .map(|cached| cached.clone())
        .map_err(|_| AppError::State("会话状态锁被毒化".to_string()))
}

/// 登出：通知身份服务、清除本地缓存、广播状态变化
///
/// 服务端登出失败不阻断本地清除——本地会话无论如何都会被丢弃。
#[tauri::command]
pub async fn auth_sign_out(
    app: AppHandle,
    state: State<'_, AuthState>,
) -> Result<(), AppError> {
    let token = match state.session.lock() {
        Ok(mut cached) => cached.take().map(|s| s.access_token),
        Err(_) => None,
    };

    if let Some(token) = token {
        let result = state
            .client
            .post(format!("{}/auth/v1/logout", state.base_url))
            .bearer_auth(token)
            .send()
            .await;
        if let Err(e) = result {
            log::warn!("服务端登出失败，本地会话已清除: {}", e);
        }
    }

    emit_auth_change(&app, "signed_out", None);
    Ok(())
}
