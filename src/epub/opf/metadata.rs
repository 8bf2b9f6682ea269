//! 元数据处理模块
//!
//! 提供OPF元数据的结构定义，以及根据书籍描述生成元数据的逻辑。

use crate::book::{Book, Format, MetadataKind};
use crate::epub::images::COVER_IMAGE_ID;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 唯一标识符元素的ID，`package`的`unique-identifier`引用它
pub const BOOK_ID: &str = "BookId";

/// 作者元素的ID（EPUB3）
pub const CREATOR_ID: &str = "Creator";

/// 元数据值枚举，表示不同类型的元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// EPUB规范的Dublin Core标签元数据
    DublinCore {
        /// 标签名，如 dc:title
        tag: String,
        /// 元素内容
        value: String,
        /// 元素属性（如 opf:role, opf:scheme, id等），按写入顺序
        attributes: Vec<(String, String)>,
    },
    /// meta标签的自定义元数据
    Meta(MetaValue),
}

/// meta标签值枚举
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    /// 基于name属性的meta标签，如 <meta name="cover" content="cover-image"/>
    NameBased { name: String, content: String },
    /// 基于property属性的meta标签，如 <meta property="dcterms:modified">2025-06-05T11:24:01Z</meta>
    PropertyBased { property: String, content: String },
}

/// 标识符信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// 标识符值
    pub value: String,
    /// 标识符类型(ISBN、URL、UUID)
    pub scheme: String,
}

impl Identifier {
    /// 书籍的主标识符：优先ISBN，其次URL，都没有时生成UUID
    pub fn for_book(book: &Book) -> Self {
        if let Some(isbn) = &book.isbn {
            Self {
                value: isbn.clone(),
                scheme: "ISBN".to_string(),
            }
        } else if let Some(url) = &book.url {
            Self {
                value: url.clone(),
                scheme: "URL".to_string(),
            }
        } else {
            Self {
                value: format!("urn:uuid:{}", Uuid::new_v4()),
                scheme: "UUID".to_string(),
            }
        }
    }
}

/// OPF文件中的元数据信息，按写入顺序保存
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    entries: Vec<MetadataValue>,
}

impl Metadata {
    /// 创建新的元数据实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据书籍描述生成元数据
    ///
    /// # 参数
    /// * `book` - 书籍
    /// * `format` - 目标格式
    /// * `identifier` - 本次生成使用的主标识符
    /// * `has_cover` - 是否收集到了封面图片
    /// * `modified` - 修改时间（仅EPUB3写入）
    pub fn for_book(
        book: &Book,
        format: Format,
        identifier: &Identifier,
        has_cover: bool,
        modified: DateTime<Utc>,
    ) -> Self {
        let mut metadata = Self::new();
        metadata.add_dublin_core("dc:title", book.full_title(), Vec::new());

        if let Some(author) = &book.author {
            let attributes = match format {
                Format::Epub2 => vec![attr("opf:role", "aut")],
                Format::Epub3 => vec![attr("id", CREATOR_ID)],
            };
            metadata.add_dublin_core("dc:creator", author.clone(), attributes);
        }

        metadata.add_dublin_core("dc:language", book.language().to_string(), Vec::new());

        let mut attributes = vec![attr("id", BOOK_ID)];
        if format == Format::Epub2 {
            attributes.push(attr("opf:scheme", &identifier.scheme));
        }
        metadata.add_dublin_core("dc:identifier", identifier.value.clone(), attributes);

        // ISBN作为主标识符时，URL作为附加标识符保留
        if let (Some(_), Some(url)) = (&book.isbn, &book.url) {
            let attributes = match format {
                Format::Epub2 => vec![attr("opf:scheme", "URL")],
                Format::Epub3 => Vec::new(),
            };
            metadata.add_dublin_core("dc:identifier", url.clone(), attributes);
        }

        for entry in &book.metadata {
            match entry.kind {
                MetadataKind::DublinCore => metadata.add_dublin_core(
                    format!("dc:{}", entry.name),
                    entry.value.clone(),
                    entry.attributes.clone(),
                ),
                MetadataKind::Special => {
                    metadata.add_meta_name_based(entry.name.clone(), entry.value.clone())
                }
            }
        }

        if has_cover {
            metadata.add_meta_name_based("cover", COVER_IMAGE_ID);
        }

        if format == Format::Epub3 {
            metadata.add_meta_property_based(
                "dcterms:modified",
                modified.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            );
        }

        metadata
    }

    /// 添加Dublin Core元数据
    pub fn add_dublin_core(
        &mut self,
        tag: impl Into<String>,
        value: impl Into<String>,
        attributes: Vec<(String, String)>,
    ) {
        self.entries.push(MetadataValue::DublinCore {
            tag: tag.into(),
            value: value.into(),
            attributes,
        });
    }

    /// 添加基于name的meta元数据
    pub fn add_meta_name_based(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.entries.push(MetadataValue::Meta(MetaValue::NameBased {
            name: name.into(),
            content: content.into(),
        }));
    }

    /// 添加基于property的meta元数据
    pub fn add_meta_property_based(&mut self, property: impl Into<String>, content: impl Into<String>) {
        self.entries.push(MetadataValue::Meta(MetaValue::PropertyBased {
            property: property.into(),
            content: content.into(),
        }));
    }

    pub fn entries(&self) -> &[MetadataValue] {
        &self.entries
    }

    /// 查找第一个指定标签的Dublin Core值
    pub fn dublin_core(&self, tag: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            MetadataValue::DublinCore { tag: t, value, .. } if t == tag => Some(value.as_str()),
            _ => None,
        })
    }

    /// 查找基于name的meta内容
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            MetadataValue::Meta(MetaValue::NameBased { name: n, content }) if n == name => {
                Some(content.as_str())
            }
            _ => None,
        })
    }
}

fn attr(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}
