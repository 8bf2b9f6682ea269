//! OPF（Open Packaging Format）包文档模块
//!
//! 此模块根据书籍和内容布局生成EPUB包文档，包括元数据、清单和脊柱。

mod manifest;
mod metadata;
mod spine;
mod writer;

pub use manifest::{Manifest, ManifestItem, navigation_item};
pub use metadata::{BOOK_ID, CREATOR_ID, Identifier, MetaValue, Metadata, MetadataValue};
pub use spine::{Spine, SpineItem};
pub use writer::Opf;
