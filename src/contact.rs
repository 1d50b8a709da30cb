//! 联系表单模块
//!
//! # 设计思路
//!
//! 站点的联系表单没有真实的邮件后端，提交是模拟的：校验通过后记录
//! 日志、等一小段人为延迟（让前端的"发送中"状态可见）、返回回执。
//! 校验逻辑（尤其邮箱格式）是真实的，注册表单也复用这里的邮箱校验。
//!
//! # 实现思路
//!
//! - 邮箱正则用 `once_cell::sync::Lazy` 预编译，首次调用编译一次。
//! - 故意选了宽松的正则：只拦 "明显不是邮箱" 的输入，
//!   真正的有效性由身份服务的验证邮件保证。

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 宽松的邮箱形状校验：非空本地部分 @ 非空域名 . 顶级域
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

/// 判断字符串是否像一个邮箱地址
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// 联系表单内容
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// 校验表单：姓名/留言非空白，邮箱形状正确
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("请填写姓名".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("邮箱格式不正确".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::Validation("留言内容不能为空".to_string()));
        }
        Ok(())
    }
}

/// 提交回执
#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub received_at: String,
}

/// 提交联系表单（模拟发送）
///
/// 没有邮件后端；校验 → 模拟网络延迟 → 记日志 → 回执。
#[tauri::command]
pub async fn submit_contact_form(form: ContactForm) -> Result<ContactReceipt, AppError> {
    form.validate()?;

    // 人为延迟，让前端的发送中状态可感知
    tokio::time::sleep(std::time::Duration::from_millis(350)).await;

    log::info!(
        "📮 收到联系表单: {} <{}>（{} 字符）",
        form.name.trim(),
        form.email,
        form.message.chars().count()
    );

    Ok(ContactReceipt {
        received_at: Local::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(form("林晚", "wan@example.com", "想投稿一组提示词").validate().is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(form("   ", "wan@example.com", "hi").validate().is_err());
    }

    #[test]
    fn blank_message_rejected() {
        assert!(form("林晚", "wan@example.com", "\n\t ").validate().is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.domain.dev"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@missing-local.com"));
    }
}
