//! NCX（Navigation Control file for XML）导航模块
//!
//! 此模块生成EPUB2的NCX导航控制文件，并提供目录结构的树形文本显示。

pub mod navigation;
pub mod toc_tree;
pub mod writer;

pub use navigation::{DocTitle, NavContent, NavLabel, NavMap, NavPoint, NcxMetadata};
pub use toc_tree::{TocTree, TocTreeNode, TocTreeStyle, create_toc_tree_from_nav_map};
pub use writer::Ncx;
