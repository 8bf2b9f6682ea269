//! 书籍描述配置模块
//!
//! 提供从YAML文件加载书籍描述的功能，并可生成示例配置文件。

use crate::book::{Book, Division, DivisionKind, Format, MetadataEntry};
use crate::epub::error::{EpubError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "book.yaml";

/// 额外元数据的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// 元素名称，如 publisher、rights
    pub name: String,
    /// 元素内容
    pub value: String,
    /// 元素属性
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

/// 单个内容划分的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionConfig {
    /// 类型：chapter、section、part、appendix、index或自定义名称
    #[serde(default = "default_kind")]
    pub kind: String,
    pub title: Option<String>,
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub divisions: Vec<DivisionConfig>,
}

fn default_kind() -> String {
    "chapter".to_string()
}

/// 书籍描述配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookConfig {
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<String>,
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_stylesheet: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<PathBuf>,
    #[serde(default)]
    pub divisions: Vec<DivisionConfig>,
}

impl BookConfig {
    /// 从YAML文件加载书籍描述
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EpubError::ConfigError(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&content)
    }

    /// 从YAML字符串解析书籍描述
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 加载YAML文件并转换为书籍，相对路径以配置文件所在目录为基准
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Book> {
        let path = path.as_ref();
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_file(path)?.into_book(base_dir)
    }

    /// 转换为书籍模型
    ///
    /// # 参数
    /// * `base_dir` - 解析相对文件路径时使用的目录
    pub fn into_book(self, base_dir: &Path) -> Result<Book> {
        let mut book = Book::new();

        if let Some(output) = self.output {
            book.set_output(output)?;
        }

        for format in &self.formats {
            book.add_format(format.parse::<Format>()?);
        }

        book.title = self.title;
        book.subtitle = self.subtitle;
        book.author = self.author;
        book.language = self.language;
        book.url = self.url;
        book.isbn = self.isbn;
        book.cover = self.cover.map(|cover| resolve_reference(base_dir, &cover));
        book.stylesheet = self.stylesheet;
        book.extra_stylesheet = self.extra_stylesheet;

        for entry in self.metadata {
            let mut metadata = MetadataEntry::new(&entry.name, entry.value)?;
            for (key, value) in entry.attributes {
                metadata = metadata.with_attribute(key, value);
            }
            book.metadata.push(metadata);
        }

        for script in self.scripts {
            book.add_script(base_dir.join(script));
        }

        for (i, division) in self.divisions.into_iter().enumerate() {
            book.add_division(division.into_division(base_dir, &format!("divisions[{}]", i))?);
        }

        Ok(book)
    }

    /// 生成示例配置文件
    ///
    /// # 参数
    /// * `path` - 要写入的配置文件路径
    pub fn generate_template<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::template())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        // 在YAML内容前添加注释说明
        let content_with_header = format!(
            "# 书籍描述文件\n# 文件路径相对于本文件所在目录\n# 每个内容划分可以包含子划分（divisions）\n\n{}",
            yaml_content
        );

        fs::write(path, content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 示例配置
    pub fn template() -> Self {
        Self {
            output: Some("my_book".to_string()),
            formats: vec!["epub2".to_string(), "epub3".to_string()],
            title: Some("My Book".to_string()),
            author: Some("Anonymous".to_string()),
            language: Some("en".to_string()),
            url: Some("http://example.com/my_book".to_string()),
            metadata: vec![MetadataConfig {
                name: "publisher".to_string(),
                value: "Self-published".to_string(),
                attributes: BTreeMap::new(),
            }],
            divisions: vec![
                DivisionConfig {
                    kind: "chapter".to_string(),
                    title: Some("Chapter 1".to_string()),
                    file: Some(PathBuf::from("chapter_1.html")),
                    body_only: None,
                    include_images: None,
                    url: None,
                    divisions: Vec::new(),
                },
                DivisionConfig {
                    kind: "part".to_string(),
                    title: Some("Appendices".to_string()),
                    file: Some(PathBuf::from("appendices.html")),
                    body_only: None,
                    include_images: None,
                    url: None,
                    divisions: vec![DivisionConfig {
                        kind: "appendix".to_string(),
                        title: Some("Errata".to_string()),
                        file: Some(PathBuf::from("errata.html")),
                        body_only: Some(false),
                        include_images: Some(false),
                        url: None,
                        divisions: Vec::new(),
                    }],
                },
            ],
            ..Self::default()
        }
    }
}

impl DivisionConfig {
    fn into_division(self, base_dir: &Path, field: &str) -> Result<Division> {
        let title = self
            .title
            .ok_or_else(|| EpubError::validation(format!("{}.title", field), "未指定标题"))?;
        let file = self
            .file
            .ok_or_else(|| EpubError::validation(format!("{}.file", field), "未指定源文件"))?;

        let mut division = Division::new(DivisionKind::from(self.kind.as_str()), title, base_dir.join(file));
        if let Some(body_only) = self.body_only {
            division = division.body_only(body_only);
        }
        if let Some(include_images) = self.include_images {
            division = division.include_images(include_images);
        }
        if let Some(url) = self.url {
            division = division.url(url);
        }

        for (i, child) in self.divisions.into_iter().enumerate() {
            division.add_division(child.into_division(base_dir, &format!("{}.divisions[{}]", field, i))?);
        }

        Ok(division)
    }
}

/// URL保持不变，本地路径以`base_dir`为基准
fn resolve_reference(base_dir: &Path, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        reference.to_string()
    } else {
        base_dir.join(reference).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::MetadataKind;

    const SAMPLE: &str = r#"
output: trivial
formats: [epub]
title: A Trivial Example
author: Glenn
url: http://glenn.mp/book/trivial_example
language: en
cover: cover.png
metadata:
  - name: rights
    value: All rights reserved
  - name: contributor
    value: Jane
    attributes:
      opf:role: edt
scripts: [js/app.js]
divisions:
  - title: Chapter 1
    file: chapter_1.html
  - title: Chapter 2
    file: chapter_2.html
    body_only: false
  - kind: part
    title: Appendices
    file: appendices.html
    divisions:
      - kind: appendix
        title: Errata
        file: errata.html
        url: http://example.com/errata/
"#;

    #[test]
    fn test_parse_and_convert() {
        let config = BookConfig::from_yaml(SAMPLE).unwrap();
        let book = config.into_book(Path::new("books")).unwrap();

        assert_eq!(book.output(), Some("trivial"));
        assert_eq!(book.formats(), vec![Format::Epub2]);
        assert_eq!(book.title.as_deref(), Some("A Trivial Example"));
        assert_eq!(book.cover.as_deref(), Some(Path::new("books").join("cover.png").to_str().unwrap()));
        assert_eq!(book.scripts, vec![Path::new("books").join("js/app.js")]);

        assert_eq!(book.metadata.len(), 2);
        assert_eq!(book.metadata[0].kind, MetadataKind::DublinCore);
        assert_eq!(book.metadata[1].attributes, vec![("opf:role".to_string(), "edt".to_string())]);

        assert_eq!(book.divisions.len(), 3);
        assert_eq!(book.divisions[0].kind, DivisionKind::Chapter);
        assert_eq!(book.divisions[0].file, Path::new("books").join("chapter_1.html"));
        assert!(!book.divisions[1].is_body_only());
        let part = &book.divisions[2];
        assert_eq!(part.kind, DivisionKind::Part);
        assert_eq!(part.divisions[0].kind, DivisionKind::Appendix);
        assert_eq!(part.divisions[0].options.url.as_deref(), Some("http://example.com/errata/"));
        assert!(book.validate().is_ok());
    }

    #[test]
    fn test_missing_division_title_names_field() {
        let yaml = "output: x\ntitle: X\ndivisions:\n  - file: a.html\n  - title: B\n";
        let result = BookConfig::from_yaml(yaml).unwrap().into_book(Path::new(""));
        match result {
            Err(EpubError::Validation { field, .. }) => assert_eq!(field, "divisions[0].title"),
            other => panic!("期望Validation错误, 得到 {:?}", other),
        }

        let yaml = "output: x\ntitle: X\ndivisions:\n  - title: B\n";
        let result = BookConfig::from_yaml(yaml).unwrap().into_book(Path::new(""));
        match result {
            Err(EpubError::Validation { field, .. }) => assert_eq!(field, "divisions[0].file"),
            other => panic!("期望Validation错误, 得到 {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let yaml = "output: x\nformats: [mobi]\ndivisions: []\n";
        let result = BookConfig::from_yaml(yaml).unwrap().into_book(Path::new(""));
        assert!(matches!(result, Err(EpubError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(BookConfig::from_yaml("divisions: {"), Err(EpubError::ConfigError(_))));
    }

    #[test]
    fn test_remote_cover_is_untouched() {
        let yaml = "cover: http://example.com/cover.jpg\n";
        let book = BookConfig::from_yaml(yaml).unwrap().into_book(Path::new("books")).unwrap();
        assert_eq!(book.cover.as_deref(), Some("http://example.com/cover.jpg"));
    }

    #[test]
    fn test_generate_template_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_PATH);
        BookConfig::generate_template(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# 书籍描述文件"));

        let book = BookConfig::load(&path).unwrap();
        assert_eq!(book.output(), Some("my_book"));
        assert_eq!(book.formats(), vec![Format::Epub2, Format::Epub3]);
        assert_eq!(book.division_count(), 3);
        assert!(!book.divisions[1].divisions[0].includes_images());
    }
}
