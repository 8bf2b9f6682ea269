pub mod book;
pub mod epub;

// === 核心API重新导出 ===

/// 书籍模型
pub use book::{Book, Division, DivisionKind, DivisionOptions, Format, MetadataEntry, MetadataKind};

/// 书籍描述文件
pub use book::{BookConfig, DivisionConfig, MetadataConfig};

/// 错误处理
pub use epub::{EpubError, Result};

/// 生成入口
pub use epub::{GenerationReport, Packager, generate_with};

/// 图片获取
pub use epub::{Fetcher, HttpFetcher};

// === 底层组件（高级用法） ===

/// 容器组件
pub use epub::{Container, RootFile};

/// OPF组件
pub use epub::{Identifier, Manifest, ManifestItem, Metadata, Opf, Spine, SpineItem};

/// 导航组件
pub use epub::{
    DocTitle,
    NavDocument,
    NavMap,
    NavPoint,
    Ncx,
    TocTree,
    TocTreeNode,
    TocTreeStyle,
    create_toc_tree_from_nav_map,
};

// === 库信息 ===

/// Bindery库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bindery库的描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// === 便捷函数 ===

/// 生成书籍请求的所有EPUB格式
///
/// 压缩包写在当前目录，图片通过网络（或本地文件）获取。
///
/// # 参数
/// * `book` - 书籍描述
///
/// # 返回值
/// * `Result<Vec<GenerationReport>>` - 每个格式一份生成结果
///
/// # 示例
///
/// ```rust,no_run
/// let book = bindery::BookConfig::load("book.yaml")?;
/// for report in bindery::generate(&book)? {
///     println!("{}: {}", report.format, report.output.display());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn generate(book: &Book) -> Result<Vec<GenerationReport>> {
    epub::generate(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        println!("Bindery version: {}", VERSION);
    }

    #[test]
    fn test_description() {
        assert!(!DESCRIPTION.is_empty());
    }
}
