//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义，以及按内容布局构建清单的逻辑。

use crate::book::Format;
use crate::epub::layout::Layout;
use crate::epub::media;

/// 清单项信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: impl Into<String>, href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            properties: None,
        }
    }

    /// 设置属性（空格分隔）
    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    /// 检查是否包含指定属性
    pub fn has_property(&self, property: &str) -> bool {
        if let Some(properties) = &self.properties {
            properties.split_whitespace().any(|p| p == property)
        } else {
            false
        }
    }

    /// 检查是否为图片文件
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// 检查是否为XHTML文件
    pub fn is_xhtml(&self) -> bool {
        self.media_type == media::XHTML
    }
}

/// 包文档中的清单
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: Vec<ManifestItem>,
}

impl Manifest {
    /// 按固定顺序构建清单：导航资源、内容划分（先序）、样式表、脚本、图片
    ///
    /// # 参数
    /// * `format` - 目标格式
    /// * `layout` - 已分配名称的内容布局
    /// * `stylesheet` - 样式表清单项
    /// * `scripts` - 脚本清单项
    /// * `images` - 已收集的图片清单项
    pub fn build(
        format: Format,
        layout: &Layout<'_>,
        stylesheet: ManifestItem,
        scripts: &[ManifestItem],
        images: &[ManifestItem],
    ) -> Self {
        let mut manifest = Self::default();
        manifest.push(navigation_item(format));

        let scripted = format == Format::Epub3 && !scripts.is_empty();
        layout.walk(&mut |planned| {
            let mut item = ManifestItem::new(&planned.id, &planned.output_file, media::XHTML);
            if scripted {
                item = item.with_properties("scripted");
            }
            manifest.push(item);
        });

        manifest.push(stylesheet);
        manifest.items.extend(scripts.iter().cloned());
        manifest.items.extend(images.iter().cloned());
        manifest
    }

    pub fn push(&mut self, item: ManifestItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ManifestItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 根据ID查找清单项
    pub fn find_by_id(&self, id: &str) -> Option<&ManifestItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// 导航资源的清单项：EPUB2为NCX，EPUB3为导航文档
pub fn navigation_item(format: Format) -> ManifestItem {
    match format {
        Format::Epub2 => ManifestItem::new("ncx", crate::epub::NCX_FILE, media::NCX),
        Format::Epub3 => {
            ManifestItem::new("toc", crate::epub::NAV_FILE, media::XHTML).with_properties("nav")
        }
    }
}
