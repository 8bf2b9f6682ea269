//! 打包模块
//!
//! 按顺序生成EPUB压缩包：mimetype（不压缩，第一个条目）、容器描述、内容文档及其图片、
//! 样式表、脚本，最后是包文档和导航资源。压缩包先写入同目录下的临时文件，
//! 全部成功后才改名为最终路径，失败时不会留下不完整的文件。

use crate::book::{self, Book, Format};
use crate::epub::container::Container;
use crate::epub::error::{EpubError, Result};
use crate::epub::fetch::{Fetcher, HttpFetcher};
use crate::epub::images::{COVER_IMAGE_ID, ImageHarvester};
use crate::epub::layout::{Layout, PlannedDivision};
use crate::epub::media;
use crate::epub::nav::NavDocument;
use crate::epub::naming::{self, Namespace};
use crate::epub::ncx::{DocTitle, NavMap, Ncx, NcxMetadata, TocTree, create_toc_tree_from_nav_map};
use crate::epub::opf::{BOOK_ID, CREATOR_ID, Identifier, Manifest, ManifestItem, Metadata, Opf, Spine};
use crate::epub::style::{STYLESHEET_FILE, STYLESHEET_ID, stylesheet_for};
use crate::epub::xhtml::{SourceDocument, XhtmlWrapper};
use crate::epub::{CONTAINER_FILE, MIMETYPE_FILE, NAV_FILE, NCX_FILE, OPF_FILE};
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 包内脚本目录
const SCRIPTS_DIR: &str = "js";

/// 一个压缩包的生成结果
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// 格式
    pub format: Format,
    /// 压缩包路径
    pub output: PathBuf,
    /// 书名
    pub title: String,
    /// 内容划分数
    pub divisions: usize,
    /// 清单项数
    pub manifest_items: usize,
    /// 收集到的图片（包内路径）
    pub images: Vec<String>,
    /// 获取失败、保留原样的图片引用
    pub failed_images: Vec<String>,
    /// 导航地图
    pub nav_map: NavMap,
}

impl GenerationReport {
    /// 以目录树形式表示导航结构
    pub fn toc_tree(&self) -> TocTree {
        create_toc_tree_from_nav_map(&self.nav_map, Some(self.title.clone()))
    }
}

/// 压缩包文件名：只有一种格式时为`{output}.epub`，多种格式时为`{output}-{format}.epub`
pub fn archive_name(output: &str, format: Format, multiple_formats: bool) -> String {
    if multiple_formats {
        format!("{}-{}.epub", output, format.name())
    } else {
        format!("{}.epub", output)
    }
}

/// 使用默认的网络获取实现，在当前目录生成书籍请求的所有格式
pub fn generate(book: &Book) -> Result<Vec<GenerationReport>> {
    let fetcher = HttpFetcher::new()?;
    generate_with(book, &fetcher, Path::new("."))
}

/// 生成书籍请求的所有格式
///
/// 任何文件操作之前先校验书籍配置。
///
/// # 参数
/// * `book` - 书籍
/// * `fetcher` - 图片获取实现
/// * `out_dir` - 输出目录
///
/// # 返回值
/// 每个压缩包一份生成结果
pub fn generate_with(book: &Book, fetcher: &dyn Fetcher, out_dir: &Path) -> Result<Vec<GenerationReport>> {
    book.validate()?;
    let output = book
        .output()
        .ok_or_else(|| EpubError::validation("output", "未设置输出文件名"))?;

    let formats = book.formats();
    let multiple = formats.len() > 1;
    formats
        .into_iter()
        .map(|format| {
            let path = out_dir.join(archive_name(output, format, multiple));
            Packager::new(book, format, fetcher, path).package()
        })
        .collect()
}

/// 单一格式的打包过程
pub struct Packager<'a> {
    book: &'a Book,
    format: Format,
    fetcher: &'a dyn Fetcher,
    output: PathBuf,
}

impl<'a> Packager<'a> {
    pub fn new(book: &'a Book, format: Format, fetcher: &'a dyn Fetcher, output: impl Into<PathBuf>) -> Self {
        Self {
            book,
            format,
            fetcher,
            output: output.into(),
        }
    }

    /// 生成压缩包
    pub fn package(&self) -> Result<GenerationReport> {
        info!("生成 {}: {}", self.format, self.output.display());

        if self.output.exists() {
            debug!("删除已有文件: {}", self.output.display());
            fs::remove_file(&self.output)?;
        }

        let parent = match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        let report = {
            let mut archive = ArchiveWriter::new(temp.as_file_mut());
            let report = self.write_contents(&mut archive)?;
            archive.finish()?;
            report
        };
        temp.persist(&self.output).map_err(|e| EpubError::Io(e.error))?;

        info!(
            "完成 {}: {} 个章节, {} 个清单项, {} 张图片",
            self.output.display(),
            report.divisions,
            report.manifest_items,
            report.images.len()
        );
        Ok(report)
    }

    fn write_contents<W: Write + Seek>(&self, archive: &mut ArchiveWriter<W>) -> Result<GenerationReport> {
        let book = self.book;
        let format = self.format;

        let mut namespace = reserved_namespace(format);
        let layout = Layout::plan(book, &mut namespace);
        let scripts = self.plan_scripts(&mut namespace);
        let script_hrefs: Vec<String> = scripts.iter().map(|(_, item)| item.href.clone()).collect();

        archive.write_mimetype()?;
        archive.write_file(CONTAINER_FILE, Container::for_package(OPF_FILE).to_xml()?.as_bytes())?;

        let mut harvester = ImageHarvester::new(format, self.fetcher);
        if let Some(cover) = &book.cover {
            if let Some(image) = harvester.harvest_cover(cover, &mut namespace) {
                archive.write_file(&image.item.href, &image.data)?;
            }
        }

        info!("写入 {} 个内容文档", layout.len());
        let wrapper = XhtmlWrapper::new(format, book.language(), STYLESHEET_FILE, &script_hrefs);
        let mut divisions = DivisionWriter {
            archive: &mut *archive,
            harvester: &mut harvester,
            namespace: &mut namespace,
            wrapper: &wrapper,
        };
        divisions.write_all(&layout.divisions)?;

        archive.write_file(STYLESHEET_FILE, stylesheet_for(book).as_bytes())?;
        for (path, item) in &scripts {
            let data = fs::read(path).map_err(|source| EpubError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
            archive.write_file(&item.href, &data)?;
        }

        info!("写入包文档与导航");
        let identifier = Identifier::for_book(book);
        let stylesheet = ManifestItem::new(STYLESHEET_ID, STYLESHEET_FILE, media::CSS);
        let script_items: Vec<ManifestItem> = scripts.iter().map(|(_, item)| item.clone()).collect();
        let opf = Opf {
            format,
            language: book.language().to_string(),
            metadata: Metadata::for_book(book, format, &identifier, harvester.has_cover(), Utc::now()),
            manifest: Manifest::build(format, &layout, stylesheet, &script_items, harvester.images()),
            spine: Spine::build(format, &layout),
        };
        archive.write_file(OPF_FILE, opf.to_xml()?.as_bytes())?;

        let nav_map = NavMap::from_layout(&layout);
        let full_title = book.full_title();
        match format {
            Format::Epub2 => {
                let ncx = Ncx {
                    xml_lang: book.language().to_string(),
                    metadata: NcxMetadata::new(identifier.value.clone(), nav_map.get_depth()),
                    doc_title: DocTitle::new(full_title.clone()),
                    doc_author: book.author.clone(),
                    nav_map: nav_map.clone(),
                };
                archive.write_file(NCX_FILE, ncx.to_xml()?.as_bytes())?;
            }
            Format::Epub3 => {
                let nav = NavDocument {
                    title: &full_title,
                    language: book.language(),
                    stylesheet: STYLESHEET_FILE,
                    nav_map: &nav_map,
                };
                archive.write_file(NAV_FILE, nav.to_xml()?.as_bytes())?;
            }
        }

        Ok(GenerationReport {
            format,
            output: self.output.clone(),
            title: full_title,
            divisions: layout.len(),
            manifest_items: opf.manifest.len(),
            images: harvester.images().iter().map(|item| item.href.clone()).collect(),
            failed_images: harvester.failed().to_vec(),
            nav_map,
        })
    }

    /// 为脚本分配包内路径和清单项
    fn plan_scripts(&self, namespace: &mut Namespace) -> Vec<(&'a Path, ManifestItem)> {
        self.book
            .scripts
            .iter()
            .map(|path| {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let (stem, ext) = naming::base_parts(&file_name);
                let href = namespace.claim_file(SCRIPTS_DIR, &stem, &ext);
                let id = namespace.claim_id(&naming::identifier_for(&href));
                (path.as_path(), ManifestItem::new(id, href, media::JAVASCRIPT))
            })
            .collect()
    }
}

/// 预先占用包自身使用的标识符和文件名
fn reserved_namespace(format: Format) -> Namespace {
    let (nav_id, nav_file) = match format {
        Format::Epub2 => ("ncx", NCX_FILE),
        Format::Epub3 => ("toc", NAV_FILE),
    };
    Namespace::with_reserved(
        &[nav_id, STYLESHEET_ID, BOOK_ID, CREATOR_ID, COVER_IMAGE_ID],
        &[MIMETYPE_FILE, CONTAINER_FILE, OPF_FILE, nav_file, STYLESHEET_FILE],
    )
}

/// 按先序写入内容文档，收集图片后再包装
struct DivisionWriter<'w, 'f, W: Write + Seek> {
    archive: &'w mut ArchiveWriter<W>,
    harvester: &'w mut ImageHarvester<'f>,
    namespace: &'w mut Namespace,
    wrapper: &'w XhtmlWrapper<'w>,
}

impl<W: Write + Seek> DivisionWriter<'_, '_, W> {
    fn write_all(&mut self, divisions: &[PlannedDivision<'_>]) -> Result<()> {
        for planned in divisions {
            self.write_division(planned)?;
            self.write_all(&planned.children)?;
        }
        Ok(())
    }

    fn write_division(&mut self, planned: &PlannedDivision<'_>) -> Result<()> {
        let division = planned.division;
        let mut document = SourceDocument::read(&division.file)?;

        if division.includes_images() {
            let base_url = division
                .options
                .url
                .as_deref()
                .map(|url| book::parse_base_url("url", url))
                .transpose()?;
            let images = self.harvester.harvest(
                &mut document,
                base_url.as_ref(),
                division.source_dir(),
                self.namespace,
            );
            for image in images {
                self.archive.write_file(&image.item.href, &image.data)?;
            }
        }

        let content = self
            .wrapper
            .wrap(planned.title(), &document, division.is_body_only())?;
        self.archive.write_file(&planned.output_file, content.as_bytes())
    }
}

/// 压缩包写入器，目录条目在第一次使用时创建
struct ArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    directories: HashSet<String>,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            directories: HashSet::new(),
        }
    }

    fn deflated() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    /// mimetype必须是第一个条目且不压缩
    fn write_mimetype(&mut self) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.zip.start_file(MIMETYPE_FILE, options)?;
        self.zip.write_all(media::EPUB.as_bytes())?;
        Ok(())
    }

    fn write_file(&mut self, path: &str, data: &[u8]) -> Result<()> {
        if let Some((dir, _)) = path.rsplit_once('/') {
            self.ensure_directory(dir)?;
        }
        debug!("写入条目: {} ({} 字节)", path, data.len());
        self.zip.start_file(path, Self::deflated())?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn ensure_directory(&mut self, dir: &str) -> Result<()> {
        if self.directories.insert(dir.to_string()) {
            self.zip.add_directory(format!("{}/", dir), Self::deflated())?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.zip.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Division;
    use crate::epub::fetch::StubFetcher;
    use std::fs::File;
    use std::io::Read;
    use zip::ZipArchive;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n0000";

    fn open(path: &Path) -> ZipArchive<File> {
        ZipArchive::new(File::open(path).unwrap()).unwrap()
    }

    fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    fn entry_names(archive: &mut ZipArchive<File>) -> Vec<String> {
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn demo_book(dir: &Path) -> Book {
        fs::write(dir.join("intro.html"), "<body><p>Hi</p></body>").unwrap();
        let mut book = Book::new();
        book.set_output("demo").unwrap();
        book.title = Some("Demo".to_string());
        book.add_division(Division::chapter("Intro", dir.join("intro.html")));
        book
    }

    #[test]
    fn test_demo_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let book = demo_book(dir.path());

        let reports = generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.output, dir.path().join("demo.epub"));
        assert_eq!(report.divisions, 1);
        assert_eq!(report.manifest_items, 3);

        let mut archive = open(&report.output);
        {
            let mimetype = archive.by_index(0).unwrap();
            assert_eq!(mimetype.name(), "mimetype");
            assert_eq!(mimetype.compression(), CompressionMethod::Stored);
        }
        assert_eq!(read_entry(&mut archive, "mimetype"), "application/epub+zip");

        let names = entry_names(&mut archive);
        for expected in ["META-INF/", "META-INF/container.xml", "intro.xhtml", "css/", "css/book.css", "book.opf", "book.ncx"] {
            assert!(names.contains(&expected.to_string()), "缺少条目 {}", expected);
        }
        assert!(!names.iter().any(|name| name.starts_with("images")));

        let intro = read_entry(&mut archive, "intro.xhtml");
        assert!(intro.contains("<title>Intro</title>"));
        assert!(intro.contains("<body><p>Hi</p></body>"));

        let opf = read_entry(&mut archive, "book.opf");
        assert_eq!(opf.matches("<item ").count(), 3);
        assert_eq!(opf.matches("<itemref ").count(), 1);
        assert!(opf.contains("<itemref idref=\"intro\"/>"));

        let container = read_entry(&mut archive, "META-INF/container.xml");
        assert!(container.contains("full-path=\"book.opf\""));
    }

    #[test]
    fn test_opf_and_nav_written_last() {
        let dir = tempfile::tempdir().unwrap();
        let book = demo_book(dir.path());
        let reports = generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();

        let names = entry_names(&mut open(&reports[0].output));
        let len = names.len();
        assert_eq!(names[len - 2], "book.opf");
        assert_eq!(names[len - 1], "book.ncx");
    }

    #[test]
    fn test_nested_tree_spine_and_play_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["part.html", "one.html", "two.html", "deep.html", "end.html"] {
            fs::write(dir.path().join(name), "<p>x</p>").unwrap();
        }
        let mut book = Book::new();
        book.set_output("nested").unwrap();
        book.title = Some("Nested".to_string());
        book.add_division(
            Division::part("Part", dir.path().join("part.html"))
                .with_division(Division::chapter("One", dir.path().join("one.html")))
                .with_division(
                    Division::chapter("Two", dir.path().join("two.html"))
                        .with_division(Division::section("Deep", dir.path().join("deep.html"))),
                ),
        );
        book.add_division(Division::appendix("End", dir.path().join("end.html")));

        let reports = generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        let mut archive = open(&reports[0].output);

        let opf = read_entry(&mut archive, "book.opf");
        let positions: Vec<usize> = ["part", "one", "two", "deep", "end"]
            .iter()
            .map(|id| opf.find(&format!("<itemref idref=\"{}\"/>", id)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(opf.matches("<itemref ").count(), 5);

        let ncx = read_entry(&mut archive, "book.ncx");
        for order in 1..=5 {
            assert_eq!(ncx.matches(&format!("playOrder=\"{}\"", order)).count(), 1);
        }
        assert!(!ncx.contains("playOrder=\"6\""));
        assert!(ncx.contains("<meta name=\"dtb:depth\" content=\"3\"/>"));
        assert_eq!(reports[0].nav_map.get_depth(), 3);
    }

    #[test]
    fn test_same_name_images() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pics.html"),
            "<p><img src=\"http://a.example.com/foo.png\"><img src=\"http://b.example.com/foo.png\"></p>",
        )
        .unwrap();
        let mut book = Book::new();
        book.set_output("pics").unwrap();
        book.title = Some("Pictures".to_string());
        book.add_division(Division::chapter("Pics", dir.path().join("pics.html")));

        let fetcher = StubFetcher::new()
            .with("http://a.example.com/foo.png", PNG)
            .with("http://b.example.com/foo.png", PNG);
        let reports = generate_with(&book, &fetcher, dir.path()).unwrap();
        assert_eq!(reports[0].images, vec!["images/foo.png", "images/foo_1.png"]);
        assert_eq!(reports[0].manifest_items, 5);

        let mut archive = open(&reports[0].output);
        let names = entry_names(&mut archive);
        assert!(names.contains(&"images/".to_string()));
        assert!(names.contains(&"images/foo.png".to_string()));
        assert!(names.contains(&"images/foo_1.png".to_string()));

        let page = read_entry(&mut archive, "pics.xhtml");
        assert!(page.contains("src=\"images/foo.png\""));
        assert!(page.contains("src=\"images/foo_1.png\""));

        let opf = read_entry(&mut archive, "book.opf");
        assert!(opf.contains("<item id=\"images-foo_1\" href=\"images/foo_1.png\" media-type=\"image/png\"/>"));
    }

    #[test]
    fn test_failed_image_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("broken.html"),
            "<p><img src=\"http://unreachable.invalid/x.png\"></p>",
        )
        .unwrap();
        let mut book = Book::new();
        book.set_output("broken").unwrap();
        book.title = Some("Broken".to_string());
        book.add_division(Division::chapter("Broken", dir.path().join("broken.html")));

        let reports = generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        assert_eq!(reports[0].failed_images, vec!["http://unreachable.invalid/x.png"]);
        assert!(reports[0].images.is_empty());

        let mut archive = open(&reports[0].output);
        let page = read_entry(&mut archive, "broken.xhtml");
        assert!(page.contains("src=\"http://unreachable.invalid/x.png\""));
        assert!(!entry_names(&mut archive).iter().any(|name| name.starts_with("images")));
    }

    #[test]
    fn test_include_images_disabled() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plain.html"), "<img src=\"http://example.com/a.png\">").unwrap();
        let mut book = Book::new();
        book.set_output("plain").unwrap();
        book.title = Some("Plain".to_string());
        book.add_division(Division::chapter("Plain", dir.path().join("plain.html")).include_images(false));

        let fetcher = StubFetcher::new().with("http://example.com/a.png", PNG);
        let reports = generate_with(&book, &fetcher, dir.path()).unwrap();
        assert!(fetcher.requests().is_empty());
        assert!(reports[0].images.is_empty());
    }

    #[test]
    fn test_existing_output_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.epub");
        fs::write(&path, b"stale bytes").unwrap();

        let mut book = demo_book(dir.path());
        fs::write(dir.path().join("old.html"), "<p>old</p>").unwrap();
        book.add_division(Division::chapter("Old", dir.path().join("old.html")));
        generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        assert!(entry_names(&mut open(&path)).contains(&"old.xhtml".to_string()));

        let book = demo_book(dir.path());
        generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        let names = entry_names(&mut open(&path));
        assert!(names.contains(&"intro.xhtml".to_string()));
        assert!(!names.contains(&"old.xhtml".to_string()));
    }

    #[test]
    fn test_missing_source_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = Book::new();
        book.set_output("missing").unwrap();
        book.title = Some("Missing".to_string());
        book.add_division(Division::chapter("Gone", dir.path().join("gone.html")));

        let result = generate_with(&book, &StubFetcher::new(), dir.path());
        match result {
            Err(EpubError::SourceUnreadable { path, .. }) => assert_eq!(path, dir.path().join("gone.html")),
            other => panic!("期望SourceUnreadable错误, 得到 {:?}", other),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_validation_happens_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = Book::new();
        book.set_output("untitled").unwrap();
        book.add_division(Division::chapter("Intro", dir.path().join("intro.html")));

        let result = generate_with(&book, &StubFetcher::new(), dir.path());
        assert!(matches!(result, Err(EpubError::Validation { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_epub3_with_scripts() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = demo_book(dir.path());
        fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();
        book.add_script(dir.path().join("app.js"));
        book.add_format(Format::Epub3);

        let reports = generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        assert_eq!(reports[0].output, dir.path().join("demo.epub"));
        let mut archive = open(&reports[0].output);

        let names = entry_names(&mut archive);
        assert!(names.contains(&"toc.xhtml".to_string()));
        assert!(names.contains(&"js/app.js".to_string()));
        assert!(!names.contains(&"book.ncx".to_string()));

        let opf = read_entry(&mut archive, "book.opf");
        assert!(opf.contains("version=\"3.0\""));
        assert!(opf.contains("<item id=\"intro\" href=\"intro.xhtml\" media-type=\"application/xhtml+xml\" properties=\"scripted\"/>"));
        assert!(opf.contains("<item id=\"js-app\" href=\"js/app.js\" media-type=\"text/javascript\"/>"));
        let spine_start = opf.find("<spine>").unwrap();
        assert!(opf[spine_start..].find("<itemref idref=\"toc\" linear=\"no\"/>").unwrap() < opf[spine_start..].find("idref=\"intro\"").unwrap());

        let intro = read_entry(&mut archive, "intro.xhtml");
        assert!(intro.starts_with("<!DOCTYPE html>"));
        assert!(intro.contains("<script src=\"js/app.js\" type=\"text/javascript\" charset=\"utf-8\"></script></body>"));

        let nav = read_entry(&mut archive, "toc.xhtml");
        assert!(nav.contains("<a href=\"intro.xhtml\">Intro</a>"));
    }

    #[test]
    fn test_full_document_mode() {
        let dir = tempfile::tempdir().unwrap();
        let source = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                      <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
                      <head>\n<title>Two</title>\n</head>\n\
                      <body>\n<p>Second</p>\n<img src=\"http://example.com/a.png\"/>\n</body>\n\
                      </html>\n";
        fs::write(dir.path().join("two.html"), source).unwrap();
        let mut book = Book::new();
        book.set_output("full").unwrap();
        book.title = Some("Full".to_string());
        book.add_division(Division::chapter("Two", dir.path().join("two.html")).body_only(false));

        let fetcher = StubFetcher::new().with("http://example.com/a.png", PNG);
        let reports = generate_with(&book, &fetcher, dir.path()).unwrap();
        let page = read_entry(&mut open(&reports[0].output), "two.xhtml");
        assert_eq!(page, source.replace("http://example.com/a.png", "images/a.png"));
    }

    #[test]
    fn test_multiple_formats_get_distinct_archives() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = demo_book(dir.path());
        book.add_format(Format::Epub2);
        book.add_format(Format::Epub3);

        let reports = generate_with(&book, &StubFetcher::new(), dir.path()).unwrap();
        let outputs: Vec<PathBuf> = reports.iter().map(|report| report.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![dir.path().join("demo-epub2.epub"), dir.path().join("demo-epub3.epub")]
        );
        assert!(entry_names(&mut open(&outputs[1])).contains(&"toc.xhtml".to_string()));
    }

    #[test]
    fn test_cover_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut book = demo_book(dir.path());
        book.cover = Some("http://example.com/cover.png".to_string());
        book.add_format(Format::Epub3);

        let fetcher = StubFetcher::new().with("http://example.com/cover.png", PNG);
        let reports = generate_with(&book, &fetcher, dir.path()).unwrap();
        assert_eq!(reports[0].images, vec!["images/cover.png"]);

        let opf = read_entry(&mut open(&reports[0].output), "book.opf");
        assert!(opf.contains("<item id=\"cover-image\" href=\"images/cover.png\" media-type=\"image/png\" properties=\"cover-image\"/>"));
        assert!(opf.contains("<meta name=\"cover\" content=\"cover-image\"/>"));
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name("demo", Format::Epub2, false), "demo.epub");
        assert_eq!(archive_name("demo", Format::Epub3, true), "demo-epub3.epub");
    }
}
