//! 内容划分模块
//!
//! 章节、部分、小节、附录等内容单元组成的有序树。

use crate::epub::error::{EpubError, Result};
use std::path::{Path, PathBuf};

/// 内容划分类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivisionKind {
    Chapter,
    Section,
    Part,
    Appendix,
    Index,
    /// 自定义类型
    Custom(String),
}

impl DivisionKind {
    /// 类型名称，用作NCX中navPoint的class
    pub fn as_str(&self) -> &str {
        match self {
            DivisionKind::Chapter => "chapter",
            DivisionKind::Section => "section",
            DivisionKind::Part => "part",
            DivisionKind::Appendix => "appendix",
            DivisionKind::Index => "index",
            DivisionKind::Custom(name) => name,
        }
    }
}

impl From<&str> for DivisionKind {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "chapter" => DivisionKind::Chapter,
            "section" => DivisionKind::Section,
            "part" => DivisionKind::Part,
            "appendix" => DivisionKind::Appendix,
            "index" => DivisionKind::Index,
            _ => DivisionKind::Custom(name.trim().to_string()),
        }
    }
}

/// 内容划分的选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionOptions {
    /// 源文件只包含body片段，需要包装成完整的XHTML文档
    pub body_only: bool,
    /// 是否收集源文件中引用的图片
    pub include_images: bool,
    /// 解析相对图片地址时使用的基准URL
    pub url: Option<String>,
}

impl Default for DivisionOptions {
    fn default() -> Self {
        Self {
            body_only: true,
            include_images: true,
            url: None,
        }
    }
}

/// 内容划分：内容树中的一个节点
#[derive(Debug, Clone)]
pub struct Division {
    /// 类型
    pub kind: DivisionKind,
    /// 标题，结构性分隔可以为空
    pub title: String,
    /// 源文件路径
    pub file: PathBuf,
    /// 选项
    pub options: DivisionOptions,
    /// 子划分
    pub divisions: Vec<Division>,
}

impl Division {
    /// 创建新的内容划分
    pub fn new(kind: DivisionKind, title: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            title: title.into(),
            file: file.into(),
            options: DivisionOptions::default(),
            divisions: Vec::new(),
        }
    }

    pub fn chapter(title: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(DivisionKind::Chapter, title, file)
    }

    pub fn section(title: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(DivisionKind::Section, title, file)
    }

    pub fn part(title: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(DivisionKind::Part, title, file)
    }

    pub fn appendix(title: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(DivisionKind::Appendix, title, file)
    }

    pub fn index(title: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::new(DivisionKind::Index, title, file)
    }

    /// 设置源文件是否只包含body片段
    pub fn body_only(mut self, body_only: bool) -> Self {
        self.options.body_only = body_only;
        self
    }

    /// 设置是否收集图片
    pub fn include_images(mut self, include_images: bool) -> Self {
        self.options.include_images = include_images;
        self
    }

    /// 设置图片的基准URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.options.url = Some(url.into());
        self
    }

    /// 添加子划分（构建器风格）
    pub fn with_division(mut self, child: Division) -> Self {
        self.divisions.push(child);
        self
    }

    /// 添加子划分
    pub fn add_division(&mut self, child: Division) {
        self.divisions.push(child);
    }

    pub fn is_body_only(&self) -> bool {
        self.options.body_only
    }

    pub fn includes_images(&self) -> bool {
        self.options.include_images
    }

    /// 源文件所在目录
    pub fn source_dir(&self) -> &Path {
        self.file.parent().unwrap_or_else(|| Path::new(""))
    }

    /// 深度：叶子节点为1，否则为1加上子节点的最大深度
    pub fn depth(&self) -> usize {
        1 + self.divisions.iter().map(Division::depth).max().unwrap_or(0)
    }

    /// 先序遍历：先访问自身，再按顺序递归访问子节点
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Division)) {
        visit(self);
        for child in &self.divisions {
            child.walk(visit);
        }
    }

    /// 校验划分及其子划分，`field`为错误信息中使用的字段路径
    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        if self.file.as_os_str().is_empty() || self.file.file_stem().is_none() {
            return Err(EpubError::validation(format!("{}.file", field), "未指定源文件"));
        }

        if let Some(url) = &self.options.url {
            super::parse_base_url(&format!("{}.url", field), url)?;
        }

        for (i, child) in self.divisions.iter().enumerate() {
            child.validate(&format!("{}.divisions[{}]", field, i))?;
        }

        Ok(())
    }
}
