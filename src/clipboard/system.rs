//! 主通道：现代剪贴板 API（arboard）
//!
//! 每次写入都新建 `arboard::Clipboard` 句柄，调用之间不共享任何状态；
//! 句柄在函数返回时随作用域释放。无图形会话（headless CI、SSH）时
//! `Clipboard::new()` 会失败，此时由上层落入回退通道。

use super::ClipboardWriter;

/// arboard 写入通道
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn name(&self) -> &'static str {
        "arboard"
    }

    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("剪贴板不可用: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| format!("写入剪贴板失败: {}", e))
    }
}
