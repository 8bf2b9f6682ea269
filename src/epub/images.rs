//! 图片收集模块
//!
//! 扫描章节源文件中引用的图片，解析为绝对地址后获取内容，在包内分配
//! 不冲突的路径并改写引用。单张图片获取失败只记录日志，不影响生成。

use crate::book::Format;
use crate::epub::error::{EpubError, Result};
use crate::epub::fetch::Fetcher;
use crate::epub::media;
use crate::epub::naming::{self, Namespace};
use crate::epub::opf::ManifestItem;
use crate::epub::xhtml::SourceDocument;
use reqwest::Url;
use std::collections::HashMap;
use std::path::{self, Path};
use tracing::{debug, warn};

/// 包内图片目录
pub const IMAGES_DIR: &str = "images";

/// 封面图片的清单项ID
pub const COVER_IMAGE_ID: &str = "cover-image";

/// 已获取、等待写入包中的图片
#[derive(Debug, Clone)]
pub struct HarvestedImage {
    /// 清单项
    pub item: ManifestItem,
    /// 图片内容
    pub data: Vec<u8>,
}

/// 图片收集器
///
/// 在一次生成过程中累积已收集的图片清单项和失败的引用。
/// 同一地址只获取一次，之后的引用直接指向已分配的路径。
pub struct ImageHarvester<'f> {
    format: Format,
    fetcher: &'f dyn Fetcher,
    resolved: HashMap<String, Option<String>>,
    images: Vec<ManifestItem>,
    failed: Vec<String>,
}

impl<'f> ImageHarvester<'f> {
    pub fn new(format: Format, fetcher: &'f dyn Fetcher) -> Self {
        Self {
            format,
            fetcher,
            resolved: HashMap::new(),
            images: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// 收集一个章节中的图片
    ///
    /// # 参数
    /// * `document` - 已解析的源文件，成功收集的图片引用会被改写
    /// * `base_url` - 解析相对地址使用的基准URL
    /// * `source_dir` - 源文件所在目录，没有基准URL时相对地址按此目录解析
    /// * `namespace` - 本次生成的命名空间
    ///
    /// # 返回值
    /// 本次新获取的图片（已出现过的地址不会重复返回）
    pub fn harvest(
        &mut self,
        document: &mut SourceDocument,
        base_url: Option<&Url>,
        source_dir: &Path,
        namespace: &mut Namespace,
    ) -> Vec<HarvestedImage> {
        let mut harvested = Vec::new();

        for (node, src) in document.images() {
            let Some(url) = resolve_reference(&src, base_url, source_dir) else {
                debug!("跳过图片引用: {}", src);
                continue;
            };

            match self.resolved.get(url.as_str()) {
                Some(Some(href)) => {
                    document.set_image_src(node, href.clone());
                    continue;
                }
                Some(None) => {
                    self.failed.push(src);
                    continue;
                }
                None => {}
            }

            match self.fetch_image(&url, None, namespace) {
                Ok(image) => {
                    debug!("收集图片: {} -> {}", url, image.item.href);
                    document.set_image_src(node, image.item.href.clone());
                    self.resolved
                        .insert(url.to_string(), Some(image.item.href.clone()));
                    self.images.push(image.item.clone());
                    harvested.push(image);
                }
                Err(e) => {
                    warn!("图片获取失败，保留原始引用 {}: {}", src, e);
                    self.resolved.insert(url.to_string(), None);
                    self.failed.push(src);
                }
            }
        }

        harvested
    }

    /// 收集封面图片
    ///
    /// 封面使用固定的清单项ID，EPUB3额外带有`cover-image`属性。失败时返回`None`。
    pub fn harvest_cover(&mut self, reference: &str, namespace: &mut Namespace) -> Option<HarvestedImage> {
        let Some(url) = resolve_reference(reference, None, Path::new("")) else {
            warn!("无法解析封面图片地址: {}", reference);
            self.failed.push(reference.to_string());
            return None;
        };

        match self.fetch_image(&url, Some(COVER_IMAGE_ID), namespace) {
            Ok(mut image) => {
                if self.format == Format::Epub3 {
                    image.item = image.item.with_properties("cover-image");
                }
                debug!("收集封面: {} -> {}", url, image.item.href);
                self.resolved
                    .insert(url.to_string(), Some(image.item.href.clone()));
                self.images.push(image.item.clone());
                Some(image)
            }
            Err(e) => {
                warn!("封面图片获取失败 {}: {}", reference, e);
                self.resolved.insert(url.to_string(), None);
                self.failed.push(reference.to_string());
                None
            }
        }
    }

    /// 已收集图片的清单项，按收集顺序
    pub fn images(&self) -> &[ManifestItem] {
        &self.images
    }

    /// 获取失败的原始引用
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// 是否收集到了封面
    pub fn has_cover(&self) -> bool {
        self.images.iter().any(|item| item.id == COVER_IMAGE_ID)
    }

    fn fetch_image(&self, url: &Url, id: Option<&str>, namespace: &mut Namespace) -> Result<HarvestedImage> {
        let data = self.fetcher.fetch(url)?;

        let (_, ext) = naming::base_parts(&naming::url_file_name(url));
        let (media_type, sniffed_ext) = match media::image_type(self.format, &ext) {
            Some(media_type) => (media_type, None),
            None => {
                let sniffed = media::sniff_image_extension(&data)
                    .and_then(|sniffed| media::image_type(self.format, sniffed).map(|t| (t, sniffed)));
                match sniffed {
                    Some((media_type, sniffed)) => (media_type, Some(sniffed)),
                    None => return Err(EpubError::UnsupportedImage(url.to_string())),
                }
            }
        };

        let href = namespace.claim_asset_path(IMAGES_DIR, url, sniffed_ext);
        let id = match id {
            Some(id) => id.to_string(),
            None => namespace.claim_id(&naming::identifier_for(&href)),
        };

        Ok(HarvestedImage {
            item: ManifestItem::new(id, href, media_type),
            data,
        })
    }
}

/// 把图片引用解析为绝对地址
///
/// 已是绝对地址的直接使用；相对地址在提供基准URL时与其拼接，
/// 否则按源文件所在目录解析为本地文件。`data:`地址返回`None`。
pub fn resolve_reference(src: &str, base_url: Option<&Url>, source_dir: &Path) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }

    if let Ok(url) = Url::parse(src) {
        return Some(url);
    }

    match base_url {
        Some(base) => base.join(src).ok(),
        None => {
            let path = path::absolute(source_dir.join(src)).ok()?;
            Url::from_file_path(path).ok()
        }
    }
}
