//! 回退通道：平台复制工具
//!
//! # 设计思路
//!
//! 主通道（arboard）在部分环境下起不来：Wayland 下权限受限、
//! 远程会话没有可连的显示服务等。Web 版在这种场景回退到
//! "隐藏文本框 + execCommand('copy')"；桌面版的对应做法是把文本
//! 通过管道喂给平台自带的复制工具：
//! - macOS: `pbcopy`
//! - Windows: `clip`
//! - Linux: Wayland 会话用 `wl-copy`，否则 `xclip -selection clipboard`
//!
//! # 实现思路
//!
//! - 子进程是本通道的临时资源（对应 Web 版的临时 DOM 元素），
//!   由 `ChildGuard` RAII 守卫持有：正常路径显式 `wait()`，
//!   提前返回路径在 `Drop` 中 kill + wait，任何退出路径都不留僵尸进程。
//! - 每次 `write_text` 派生全新子进程，调用之间没有共享状态。
//! - 程序与参数可注入（`with_command`），测试用 `cat` / `false`
//!   等确定性命令替代真实复制工具。

use std::process::{Child, Command, ExitStatus, Stdio};

use super::ClipboardWriter;

/// 平台复制工具写入通道
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// 按当前平台选择复制工具
    pub fn detect() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::with_command("pbcopy", &[])
        }
        #[cfg(target_os = "windows")]
        {
            Self::with_command("clip", &[])
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                Self::with_command("wl-copy", &[])
            } else {
                Self::with_command("xclip", &["-selection", "clipboard"])
            }
        }
    }

    /// 指定程序与参数的构造（测试与自定义环境用）
    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ClipboardWriter for CommandClipboard {
    fn name(&self) -> &'static str {
        "platform-command"
    }

    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("启动 {} 失败: {}", self.program, e))?;

        let mut guard = ChildGuard::new(child);

        {
            use std::io::Write;
            let mut stdin = guard
                .stdin()
                .ok_or_else(|| format!("{} 的 stdin 不可写", self.program))?;
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| format!("向 {} 写入文本失败: {}", self.program, e))?;
            // stdin 随作用域关闭，子进程收到 EOF 后才会写剪贴板并退出
        }

        let status = guard
            .wait()
            .map_err(|e| format!("等待 {} 退出失败: {}", self.program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!("{} 复制命令被拒绝（{}）", self.program, status))
        }
    }
}

// ============================================================================
// ChildGuard — 子进程 RAII 守卫
// ============================================================================

/// 子进程的 RAII 守卫
///
/// 正常路径调用 `wait()` 取走子进程并等待退出；
/// 任何提前返回路径在 `Drop` 中 kill + wait 兜底回收。
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child: Some(child) }
    }

    /// 取走子进程的 stdin 管道
    fn stdin(&mut self) -> Option<std::process::ChildStdin> {
        self.child.as_mut().and_then(|c| c.stdin.take())
    }

    /// 等待子进程退出（消费守卫持有的子进程）
    fn wait(&mut self) -> std::io::Result<ExitStatus> {
        match self.child.take() {
            Some(mut child) => child.wait(),
            None => Err(std::io::Error::other("子进程已被回收")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            log::debug!("🧹 回退通道子进程在提前返回路径被回收");
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn cat_accepts_piped_text() {
        // cat 读完 stdin 后以 0 退出，等价于复制命令成功
        let mut writer = CommandClipboard::with_command("cat", &[]);
        assert!(writer.write_text("星夜下的城市，赛博朋克风").is_ok());
    }

    #[test]
    fn failing_command_reports_rejection() {
        // false 不读 stdin 直接以 1 退出：依时序可能表现为写入管道失败
        // 或退出码非零，两种路径都必须携带程序名
        let mut writer = CommandClipboard::with_command("false", &[]);
        let err = writer.write_text("any").unwrap_err();
        assert!(err.contains("false"), "err = {}", err);
    }

    #[test]
    fn missing_program_reports_spawn_failure() {
        let mut writer = CommandClipboard::with_command("definitely-not-a-copy-tool", &[]);
        let err = writer.write_text("any").unwrap_err();
        assert!(err.contains("启动"), "err = {}", err);
    }

    #[test]
    fn repeated_calls_are_independent() {
        let mut writer = CommandClipboard::with_command("cat", &[]);
        for i in 0..5 {
            assert!(writer.write_text(&format!("prompt-{}", i)).is_ok());
        }
    }
}
