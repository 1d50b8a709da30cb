// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # 提示词图库桌面端 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::sync::Mutex;

use prompt_gallery::{auth, clipboard, consent, contact, content, storage};
use tauri::Manager;

use clipboard::{CopyService, CopyState};
use consent::storage::{FileStorage, MemoryStorage};
use consent::{ConsentState, ConsentStore};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_shell::init())
        // 应用设置
        .setup(|app| {
            log::info!("setup: begin");

            // 同意状态：文件存储不可用时退化为内存存储，
            // 横幅会在下次启动重新出现（规格如此，不算错误）
            let consent_store = match storage::consent_file_path(app.handle()) {
                Ok(path) => ConsentStore::load(Box::new(FileStorage::new(path))),
                Err(err) => {
                    log::warn!("setup: 同意偏好存储不可用，退化为仅内存状态: {err}");
                    ConsentStore::load(Box::new(MemoryStorage::new()))
                }
            };
            app.manage(ConsentState(Mutex::new(consent_store)));
            log::info!("setup: consent state managed");

            // 两级剪贴板复制服务
            app.manage(CopyState(Mutex::new(CopyService::system())));
            log::info!("setup: copy service managed");

            // 身份服务客户端
            app.manage(auth::AuthState::new());
            log::info!("setup: auth client managed");

            log::info!("setup: complete");
            Ok(())
        })
        // 注册所有 Tauri 命令
        .invoke_handler(tauri::generate_handler![
            // 剪贴板复制
            clipboard::copy_text_to_clipboard,
            // 同意管理
            consent::consent_load,
            consent::consent_accept_all,
            consent::consent_reject_all,
            consent::consent_save_preferences,
            consent::consent_toggle,
            // 图库与静态内容
            content::get_prompt_gallery,
            content::get_prompt,
            content::get_prompt_categories,
            content::copy_prompt,
            content::get_generators,
            content::open_generator,
            content::get_blog_articles,
            content::get_blog_article,
            content::get_team,
            // 联系表单
            contact::submit_contact_form,
            // 身份服务
            auth::auth_sign_up,
            auth::auth_get_session,
            auth::auth_sign_out,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
