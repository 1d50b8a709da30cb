//! 站点静态内容模块（提示词图库 / 博客 / 团队）
//!
//! # 设计思路
//!
//! 站点内容是人工精选的静态数据，没有后端 CMS，也没有本地数据库：
//! 提示词卡片、博客文章、团队介绍全部编译进二进制，前端通过查询
//! 命令取用。`copy_prompt` 把图库与剪贴板复制服务接起来——这是
//! 整个应用的核心动线：浏览示例图 → 复制提示词 → 去外部 AI 绘图
//! 工具里粘贴生成。
//!
//! # 实现思路
//!
//! - 数据用 `&'static str` 静态切片，结构体派生 `Serialize` 直接过 IPC。
//! - 列表命令返回摘要（不含正文），详情命令按 id / slug 查找，
//!   查不到返回 `AppError::NotFound`。
//! - 外部绘图工具只开放白名单内的地址，经 `tauri-plugin-shell` 打开
//!   系统浏览器。

use serde::Serialize;
use tauri::{AppHandle, State};
use tauri_plugin_shell::ShellExt;

use crate::clipboard::{CopyReceipt, CopyRequest, CopyState};
use crate::error::AppError;

// ============================================================================
// 数据模型
// ============================================================================

/// 提示词卡片：一张示例图配一段可复制的提示词
#[derive(Debug, Clone, Serialize)]
pub struct PromptCard {
    pub id: &'static str,
    pub title: &'static str,
    /// 喂给 AI 绘图工具的英文提示词
    pub prompt: &'static str,
    /// 前端资源目录下的示例图文件名
    pub image: &'static str,
    pub category: &'static str,
}

/// 博客文章
#[derive(Debug, Clone, Serialize)]
pub struct BlogArticle {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub body: &'static str,
    pub published_at: &'static str,
}

/// 文章列表项（不含正文）
#[derive(Debug, Clone, Serialize)]
pub struct BlogSummary {
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub published_at: &'static str,
}

/// 团队成员介绍
#[derive(Debug, Clone, Serialize)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static str,
}

/// 外部 AI 绘图工具（白名单）
#[derive(Debug, Clone, Serialize)]
pub struct Generator {
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

// ============================================================================
// 静态内容
// ============================================================================

static PROMPTS: &[PromptCard] = &[
    PromptCard {
        id: "neon-alley",
        title: "雨夜霓虹小巷",
        prompt: "a narrow alley in a cyberpunk city at night, neon signs reflecting in rain puddles, cinematic lighting, ultra detailed, 35mm photography",
        image: "neon-alley.webp",
        category: "城市",
    },
    PromptCard {
        id: "paper-fox",
        title: "折纸狐狸",
        prompt: "an origami fox made of textured washi paper, studio lighting, soft shadows, minimalist white background, product photography",
        image: "paper-fox.webp",
        category: "动物",
    },
    PromptCard {
        id: "floating-temple",
        title: "云上浮空寺",
        prompt: "an ancient temple floating among clouds at sunrise, mist, volumetric light, matte painting, epic fantasy concept art",
        image: "floating-temple.webp",
        category: "幻想",
    },
    PromptCard {
        id: "glass-botany",
        title: "玻璃植物标本",
        prompt: "a botanical specimen made entirely of blown glass, backlit, macro photography, iridescent refraction, dark background",
        image: "glass-botany.webp",
        category: "静物",
    },
    PromptCard {
        id: "polar-station",
        title: "极地观测站",
        prompt: "a lonely research station under the aurora borealis, snow drifts, long exposure, wide angle, muted cold palette",
        image: "polar-station.webp",
        category: "风景",
    },
    PromptCard {
        id: "clockwork-whale",
        title: "机械鲸鱼",
        prompt: "a colossal clockwork whale swimming through golden clouds, brass gears visible through translucent skin, steampunk illustration, intricate detail",
        image: "clockwork-whale.webp",
        category: "幻想",
    },
    PromptCard {
        id: "tea-master",
        title: "茶室老匠人",
        prompt: "portrait of an elderly tea master in a dim kyoto tea house, window side light, wrinkled hands holding a raku bowl, 85mm lens, shallow depth of field",
        image: "tea-master.webp",
        category: "人物",
    },
    PromptCard {
        id: "isometric-bakery",
        title: "等距视角面包店",
        prompt: "a cozy corner bakery in isometric view, warm lamplight, tiny customers, pastel color palette, 3d render, blender style",
        image: "isometric-bakery.webp",
        category: "插画",
    },
];

static ARTICLES: &[BlogArticle] = &[
    BlogArticle {
        slug: "prompt-anatomy",
        title: "一段好提示词的解剖",
        summary: "主体、环境、光线、镜头、风格——五要素拆解图库中的高赞提示词。",
        body: "写提示词和写镜头脚本很像：先说拍什么（主体），再说在哪拍（环境），\
然后是怎么打光（光线）、用什么镜头（视角与焦段），最后声明整体风格。\
图库里每一条提示词都按这个顺序组织，你可以直接替换其中的主体词做二次创作。",
        published_at: "2025-11-03",
    },
    BlogArticle {
        slug: "negative-prompts",
        title: "负面提示词并不是垃圾桶",
        summary: "把所有不想要的东西一股脑塞进负面提示词，往往适得其反。",
        body: "常见的误区是把几十个'不要'堆进负面提示词。实际上多数模型只需要排除\
三五个真正冲突的概念；其余的交给正面描述的精确度。本文用图库中'雨夜霓虹小巷'\
一图的迭代过程演示如何做减法。",
        published_at: "2025-12-18",
    },
    BlogArticle {
        slug: "style-transfer-ethics",
        title: "风格迁移与创作者伦理",
        summary: "当提示词里出现在世艺术家的名字时，我们的收录标准。",
        body: "图库不收录以在世艺术家名字为风格锚点的提示词。风格描述退回到流派、\
媒介与年代（如'水彩''浮世绘''七十年代科幻插画'），既保留表达力，\
也避免把个人风格当作免费素材。",
        published_at: "2026-02-07",
    },
];

static TEAM: &[TeamMember] = &[
    TeamMember {
        name: "林晚",
        role: "内容策划",
        bio: "前杂志图片编辑，负责图库的选图与提示词文案打磨。",
    },
    TeamMember {
        name: "Sam Ortega",
        role: "工程",
        bio: "维护站点与桌面端，坚持认为复制按钮必须在任何环境下都能用。",
    },
    TeamMember {
        name: "陈屿",
        role: "社区",
        bio: "处理投稿与反馈，每周从社区投稿中挑选新卡片入库。",
    },
];

static GENERATORS: &[Generator] = &[
    Generator {
        id: "midjourney",
        name: "Midjourney",
        url: "https://www.midjourney.com/",
    },
    Generator {
        id: "dalle",
        name: "DALL·E",
        url: "https://openai.com/dall-e",
    },
    Generator {
        id: "stable-diffusion",
        name: "Stable Diffusion",
        url: "https://stability.ai/",
    },
];

/// 按 id 查找提示词卡片
fn find_prompt(id: &str) -> Option<&'static PromptCard> {
    PROMPTS.iter().find(|card| card.id == id)
}

// ============================================================================
// 图库命令
// ============================================================================

/// 获取提示词图库（可按类别过滤）
#[tauri::command]
pub fn get_prompt_gallery(category: Option<String>) -> Vec<PromptCard> {
    match category.as_deref() {
        Some(wanted) if !wanted.is_empty() => PROMPTS
            .iter()
            .filter(|card| card.category == wanted)
            .cloned()
            .collect(),
        _ => PROMPTS.to_vec(),
    }
}

/// 获取单张提示词卡片
#[tauri::command]
pub fn get_prompt(id: String) -> Result<PromptCard, AppError> {
    find_prompt(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("提示词卡片 '{}'", id)))
}

/// 复制某张卡片的提示词到系统剪贴板
///
/// 图库页"复制"按钮的入口：按 id 查卡片，文本交给两级复制服务。
#[tauri::command]
pub fn copy_prompt(state: State<'_, CopyState>, id: String) -> Result<CopyReceipt, AppError> {
    let card = find_prompt(&id)
        .ok_or_else(|| AppError::NotFound(format!("提示词卡片 '{}'", id)))?;

    let request = CopyRequest::new(card.prompt);
    log::info!("🖼️ [{}] 复制提示词: {}", request.operation_id, card.title);

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

/// 图库中出现的全部类别（去重，保持首次出现的顺序）
#[tauri::command]
pub fn get_prompt_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for card in PROMPTS {
        if !categories.contains(&card.category) {
            categories.push(card.category);
        }
    }
    categories
}

// ============================================================================
// 外部绘图工具
// ============================================================================

/// 外部 AI 绘图工具白名单
#[tauri::command]
pub fn get_generators() -> Vec<Generator> {
    GENERATORS.to_vec()
}

/// 在系统浏览器中打开某个外部绘图工具
#[tauri::command]
pub fn open_generator(app: AppHandle, id: String) -> Result<(), AppError> {
    let generator = GENERATORS
        .iter()
        .find(|g| g.id == id)
        .ok_or_else(|| AppError::NotFound(format!("绘图工具 '{}'", id)))?;

    app.shell()
        .open(generator.url, None)
        .map_err(|e| AppError::Shell(e.to_string()))
}

// ============================================================================
// 博客与团队命令
// ============================================================================

/// 博客文章列表（摘要）
#[tauri::command]
pub fn get_blog_articles() -> Vec<BlogSummary> {
    ARTICLES
        .iter()
        .map(|a| BlogSummary {
            slug: a.slug,
            title: a.title,
            summary: a.summary,
            published_at: a.published_at,
        })
        .collect()
}

/// 单篇博客文章（含正文）
#[tauri::command]
pub fn get_blog_article(slug: String) -> Result<BlogArticle, AppError> {
    ARTICLES
        .iter()
        .find(|a| a.slug == slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("文章 '{}'", slug)))
}

/// 团队介绍
#[tauri::command]
pub fn get_team() -> Vec<TeamMember> {
    TEAM.to_vec()
}
