//! 脊柱模块
//!
//! 提供EPUB包中阅读顺序（脊柱）的结构定义。

use crate::book::Format;
use crate::epub::layout::Layout;

/// 脊柱项信息(阅读顺序)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpineItem {
    /// 引用的清单项ID
    pub idref: String,
    /// 是否线性阅读
    pub linear: bool,
}

impl SpineItem {
    /// 创建新的脊柱项
    pub fn new(idref: impl Into<String>) -> Self {
        Self {
            idref: idref.into(),
            linear: true,
        }
    }

    /// 创建非线性的脊柱项
    pub fn new_non_linear(idref: impl Into<String>) -> Self {
        Self {
            idref: idref.into(),
            linear: false,
        }
    }
}

/// 阅读顺序
#[derive(Debug, Clone, Default)]
pub struct Spine {
    /// `toc`属性引用的NCX清单项ID（仅EPUB2）
    pub toc: Option<String>,
    items: Vec<SpineItem>,
}

impl Spine {
    /// 按内容布局的先序构建脊柱
    ///
    /// EPUB3在最前面加入非线性的导航文档。
    pub fn build(format: Format, layout: &Layout<'_>) -> Self {
        let mut spine = Self::default();
        match format {
            Format::Epub2 => spine.toc = Some("ncx".to_string()),
            Format::Epub3 => spine.items.push(SpineItem::new_non_linear("toc")),
        }
        layout.walk(&mut |planned| spine.items.push(SpineItem::new(&planned.id)));
        spine
    }

    pub fn items(&self) -> &[SpineItem] {
        &self.items
    }

    /// 线性阅读项
    pub fn linear_items(&self) -> impl Iterator<Item = &SpineItem> {
        self.items.iter().filter(|item| item.linear)
    }
}
