//! # 提示词图库桌面端 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  前端 (React + TypeScript)                │
//! │                                                          │
//! │  GalleryCtx ── ConsentBanner ── AuthCtx ── ContactForm   │
//! │       ↕              ↕             ↕                     │
//! │  TauriService (统一 invoke + 错误处理)                    │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ clipboard ── 两级复制服务 (arboard → 平台命令回退)     │
//! │  │   ├─ system         主通道 (arboard)                  │
//! │  │   └─ command        回退通道 + ChildGuard (RAII)      │
//! │  │                                                       │
//! │  ├─ consent ──── 同意状态机 + 键值持久化                  │
//! │  │   └─ storage        文件 / 内存后端                   │
//! │  │                                                       │
//! │  ├─ content ──── 图库·博客·团队静态内容                   │
//! │  ├─ contact ──── 联系表单校验与模拟提交                   │
//! │  ├─ auth ─────── 外部身份服务薄客户端                     │
//! │  └─ storage ──── 应用数据目录 (返回 Result)               │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`clipboard`] | 两级剪贴板复制服务：现代 API 主通道 + 平台命令回退 |
//! | [`consent`] | Cookie 同意状态机、四类偏好、键值持久化（与 Web 版布局一致） |
//! | [`content`] | 提示词图库、博客、团队的静态内容与查询命令 |
//! | [`contact`] | 联系表单校验（预编译正则）与模拟提交 |
//! | [`auth`] | 托管身份服务的注册 / 会话 / 登出薄封装 |
//! | [`storage`] | 应用数据目录的获取与自动创建 |

pub mod error;
pub mod clipboard;
pub mod consent;
pub mod content;
pub mod contact;
pub mod auth;
pub mod storage;
