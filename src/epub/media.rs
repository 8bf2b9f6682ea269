//! 媒体类型模块
//!
//! 图片扩展名到MIME类型的静态映射，EPUB3额外支持SVG。

use crate::book::Format;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const XHTML: &str = "application/xhtml+xml";
pub const CSS: &str = "text/css";
pub const JAVASCRIPT: &str = "text/javascript";
pub const NCX: &str = "application/x-dtbncx+xml";
pub const OEBPS_PACKAGE: &str = "application/oebps-package+xml";
pub const EPUB: &str = "application/epub+zip";

static EPUB2_IMAGE_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".jpg", "image/jpeg"),
        (".jpeg", "image/jpeg"),
        (".png", "image/png"),
        (".gif", "image/gif"),
    ])
});

static EPUB3_IMAGE_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut types = EPUB2_IMAGE_TYPES.clone();
    types.insert(".svg", "image/svg+xml");
    types
});

/// 根据扩展名（含点）查找图片的MIME类型
pub fn image_type(format: Format, ext: &str) -> Option<&'static str> {
    let table = match format {
        Format::Epub2 => &*EPUB2_IMAGE_TYPES,
        Format::Epub3 => &*EPUB3_IMAGE_TYPES,
    };
    table.get(ext.to_ascii_lowercase().as_str()).copied()
}

/// 根据文件头推断图片扩展名
pub fn sniff_image_extension(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(".jpg")
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(".png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some(".gif")
    } else {
        let head = String::from_utf8_lossy(&data[..data.len().min(512)]);
        if head.contains("<svg") {
            Some(".svg")
        } else {
            None
        }
    }
}
