pub mod container;
pub mod error;
pub mod fetch;
pub mod images;
pub mod layout;
pub mod media;
pub mod nav;
pub mod naming;
pub mod ncx;
pub mod opf;
pub mod packager;
pub mod style;
pub mod xhtml;
pub mod xml;

/// 包文档路径
pub const OPF_FILE: &str = "book.opf";

/// EPUB2导航控制文件路径
pub const NCX_FILE: &str = "book.ncx";

/// EPUB3导航文档路径
pub const NAV_FILE: &str = "toc.xhtml";

/// 容器描述路径
pub const CONTAINER_FILE: &str = "META-INF/container.xml";

/// mimetype条目
pub const MIMETYPE_FILE: &str = "mimetype";

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出图片获取
pub use fetch::{Fetcher, HttpFetcher};

// 重新导出打包入口
pub use packager::{GenerationReport, Packager, archive_name, generate, generate_with};

// 重新导出OPF相关
pub use opf::{Identifier, Manifest, ManifestItem, Metadata, Opf, Spine, SpineItem};

// 重新导出NCX相关
pub use ncx::{
    DocTitle,
    NavMap,
    NavPoint,
    Ncx,
    TocTree,
    TocTreeNode,
    TocTreeStyle,
    create_toc_tree_from_nav_map
};

// 重新导出导航文档
pub use nav::NavDocument;
