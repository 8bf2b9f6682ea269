//! 书籍元数据模块
//!
//! 额外元数据分为两类：Dublin Core元素（写作`dc:*`）与特殊元素（写作`meta`标签）。

use crate::epub::error::{EpubError, Result};

/// 元数据类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// Dublin Core元素，如 <dc:publisher>...</dc:publisher>
    DublinCore,
    /// 特殊元素，如 <meta name="cover" content="..."/>
    Special,
}

/// 支持的元数据元素名称及其类型
const METADATA_ELEMENTS: &[(&str, MetadataKind)] = &[
    ("contributor", MetadataKind::DublinCore),
    ("cover", MetadataKind::Special),
    ("coverage", MetadataKind::DublinCore),
    ("creator", MetadataKind::DublinCore),
    ("date", MetadataKind::DublinCore),
    ("description", MetadataKind::DublinCore),
    ("format", MetadataKind::DublinCore),
    ("identifier", MetadataKind::DublinCore),
    ("language", MetadataKind::DublinCore),
    ("publisher", MetadataKind::DublinCore),
    ("relation", MetadataKind::DublinCore),
    ("rights", MetadataKind::DublinCore),
    ("source", MetadataKind::DublinCore),
    ("subject", MetadataKind::DublinCore),
    ("title", MetadataKind::DublinCore),
    ("type", MetadataKind::DublinCore),
];

/// 一条额外的元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// 元素名称（不含`dc:`前缀）
    pub name: String,
    /// 元素内容
    pub value: String,
    /// 元素属性（如 opf:role、opf:file-as）
    pub attributes: Vec<(String, String)>,
    /// 元数据类型
    pub kind: MetadataKind,
}

impl MetadataEntry {
    /// 创建元数据，类型由元素名称决定，未知名称返回错误
    pub fn new(name: &str, value: impl Into<String>) -> Result<Self> {
        let name = name.trim();
        let kind = METADATA_ELEMENTS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| EpubError::UnknownMetadata(name.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            value: value.into(),
            attributes: Vec::new(),
            kind,
        })
    }

    /// 添加属性
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn is_dublin_core(&self) -> bool {
        self.kind == MetadataKind::DublinCore
    }
}
