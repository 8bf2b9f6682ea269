//! 书籍模型模块
//!
//! 描述待生成的书籍：元数据、输出格式以及由章节、部分等组成的内容树。
//! 生成期间该模型只读。

mod config;
mod division;
mod metadata;

pub use config::{BookConfig, DivisionConfig, MetadataConfig};
pub use division::{Division, DivisionKind, DivisionOptions};
pub use metadata::{MetadataEntry, MetadataKind};

use crate::epub::error::{EpubError, Result};
use reqwest::Url;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

/// 默认语言
const DEFAULT_LANGUAGE: &str = "en";

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// EPUB 2.0.1（OPF + NCX）
    Epub2,
    /// EPUB 3（OPF + 导航文档）
    Epub3,
}

impl Format {
    /// OPF中`package`元素的版本号
    pub fn version(&self) -> &'static str {
        match self {
            Format::Epub2 => "2.0",
            Format::Epub3 => "3.0",
        }
    }

    /// 格式名称
    pub fn name(&self) -> &'static str {
        match self {
            Format::Epub2 => "epub2",
            Format::Epub3 => "epub3",
        }
    }
}

impl FromStr for Format {
    type Err = EpubError;

    /// `epub`是`epub2`的别名
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "epub" | "epub2" => Ok(Format::Epub2),
            "epub3" => Ok(Format::Epub3),
            other => Err(EpubError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

/// 书籍：生成EPUB所需的全部描述
#[derive(Debug, Clone, Default)]
pub struct Book {
    /// 输出文件基本名（不含扩展名），只能设置一次
    output: Option<String>,
    /// 标题
    pub title: Option<String>,
    /// 副标题
    pub subtitle: Option<String>,
    /// 作者
    pub author: Option<String>,
    /// 语言（如 en、zh-CN）
    pub language: Option<String>,
    /// 书籍URL
    pub url: Option<String>,
    /// ISBN
    pub isbn: Option<String>,
    /// 封面图片引用（URL或本地路径）
    pub cover: Option<String>,
    /// 自定义样式表，设置后替换内置样式表
    pub stylesheet: Option<String>,
    /// 附加在内置样式表之后的样式
    pub extra_stylesheet: Option<String>,
    /// 额外的元数据
    pub metadata: Vec<MetadataEntry>,
    /// 脚本文件路径
    pub scripts: Vec<PathBuf>,
    /// 顶层内容划分
    pub divisions: Vec<Division>,
    /// 请求的输出格式
    formats: Vec<Format>,
}

impl Book {
    /// 创建空书籍
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置输出文件基本名
    ///
    /// 重复设置会返回 [`EpubError::DuplicateOutput`]。
    pub fn set_output(&mut self, output: impl Into<String>) -> Result<()> {
        let requested = output.into();
        if let Some(existing) = &self.output {
            return Err(EpubError::DuplicateOutput {
                existing: existing.clone(),
                requested,
            });
        }
        self.output = Some(requested);
        Ok(())
    }

    /// 输出文件基本名
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// 添加输出格式，重复的格式会被忽略
    pub fn add_format(&mut self, format: Format) {
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
    }

    /// 清空已请求的格式
    pub fn clear_formats(&mut self) {
        self.formats.clear();
    }

    /// 实际要生成的格式列表，未指定时默认为EPUB2
    pub fn formats(&self) -> Vec<Format> {
        if self.formats.is_empty() {
            vec![Format::Epub2]
        } else {
            self.formats.clone()
        }
    }

    /// 添加元数据元素
    pub fn add_metadata(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        self.metadata.push(MetadataEntry::new(name, value)?);
        Ok(())
    }

    /// 添加脚本文件
    pub fn add_script(&mut self, path: impl Into<PathBuf>) {
        self.scripts.push(path.into());
    }

    /// 添加顶层内容划分
    pub fn add_division(&mut self, division: Division) {
        self.divisions.push(division);
    }

    /// 完整标题：标题加上可选的副标题
    pub fn full_title(&self) -> String {
        let title = self.title.clone().unwrap_or_default();
        match &self.subtitle {
            Some(subtitle) => format!("{}: {}", title, subtitle),
            None => title,
        }
    }

    /// 书籍语言，未设置时为英语
    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// 内容树的最大嵌套深度，没有内容时为0
    pub fn depth(&self) -> usize {
        self.divisions.iter().map(Division::depth).max().unwrap_or(0)
    }

    /// 按先序遍历所有内容划分
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Division)) {
        for division in &self.divisions {
            division.walk(visit);
        }
    }

    /// 内容划分总数（递归）
    pub fn division_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// 在任何文件操作之前校验书籍配置
    pub fn validate(&self) -> Result<()> {
        match self.output.as_deref() {
            Some(output) if !output.trim().is_empty() => {}
            _ => return Err(EpubError::validation("output", "未设置输出文件名")),
        }

        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => {}
            _ => return Err(EpubError::validation("title", "未设置书名")),
        }

        if self.divisions.is_empty() {
            return Err(EpubError::validation("divisions", "至少需要一个章节"));
        }

        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                return Err(EpubError::validation("url", "URL不能为空"));
            }
        }

        for (i, script) in self.scripts.iter().enumerate() {
            if script.file_name().is_none() {
                return Err(EpubError::validation(
                    format!("scripts[{}]", i),
                    format!("无效的脚本路径: {}", script.display()),
                ));
            }
        }

        for (i, division) in self.divisions.iter().enumerate() {
            division.validate(&format!("divisions[{}]", i))?;
        }

        Ok(())
    }
}

/// 校验作为图片基准地址的URL
pub(crate) fn parse_base_url(field: &str, url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| EpubError::validation(field, format!("无效的URL {}: {}", url, e)))
}
