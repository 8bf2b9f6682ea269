//! XHTML内容文档模块
//!
//! 读取章节源文件（HTML片段或完整文档），把它序列化为格式良好的XHTML，
//! 并在片段模式下包装成完整的内容文档。

use crate::book::Format;
use crate::epub::error::{EpubError, Result};
use crate::epub::media;
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use quick_xml::escape::escape;
use quick_xml::{Reader, Writer};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const EPUB_NAMESPACE: &str = "http://www.idpf.org/2007/ops";

const XHTML11_DOCTYPE: &str = "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">";

/// 没有内容、必须写成`<x/>`的HTML元素
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body选择器是合法的"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("img选择器是合法的"));

/// 解析后的章节源文件
///
/// 图片地址的改写单独记录，在序列化时生效，源文档树本身保持不变。
pub struct SourceDocument {
    markup: String,
    html: Html,
    image_sources: HashMap<NodeId, String>,
}

impl SourceDocument {
    /// 宽松解析HTML文本
    pub fn parse(markup: &str) -> Self {
        Self {
            markup: markup.to_string(),
            html: Html::parse_document(without_xml_declaration(markup)),
            image_sources: HashMap::new(),
        }
    }

    /// 读取并解析源文件
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| EpubError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// 文档中所有带`src`属性的`img`元素，按文档顺序
    pub fn images(&self) -> Vec<(NodeId, String)> {
        self.html
            .select(&IMAGE_SELECTOR)
            .filter_map(|img| img.value().attr("src").map(|src| (img.id(), src.to_string())))
            .collect()
    }

    /// 改写图片元素的`src`
    pub fn set_image_src(&mut self, node: NodeId, src: impl Into<String>) {
        self.image_sources.insert(node, src.into());
    }

    /// 图片元素当前的`src`（改写后的值优先）
    pub fn image_src(&self, node: NodeId) -> Option<&str> {
        if let Some(src) = self.image_sources.get(&node) {
            return Some(src);
        }
        self.html
            .tree
            .get(node)
            .and_then(ElementRef::wrap)
            .and_then(|img| img.value().attr("src"))
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        self.html.select(&BODY_SELECTOR).next()
    }

    /// 原始`src`到改写后地址的映射
    fn rewrites(&self) -> HashMap<&str, &str> {
        self.image_sources
            .iter()
            .filter_map(|(node, src)| {
                let original = self.html.tree.get(*node).and_then(ElementRef::wrap)?.value().attr("src")?;
                Some((original, src.as_str()))
            })
            .collect()
    }
}

/// HTML解析器会把XML声明当作注释，解析前先去掉
fn without_xml_declaration(markup: &str) -> &str {
    let trimmed = markup.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with("<?xml") {
        if let Some(end) = trimmed.find("?>") {
            return &trimmed[end + 2..];
        }
    }
    markup
}

/// 内容文档包装器
///
/// # 参数
/// * `format` - 目标格式，决定文档外壳的写法
/// * `language` - 书籍语言
/// * `stylesheet` - 样式表在包内的路径
/// * `scripts` - 需要在body末尾引用的脚本（包内路径）
pub struct XhtmlWrapper<'a> {
    format: Format,
    language: &'a str,
    stylesheet: &'a str,
    scripts: &'a [String],
}

impl<'a> XhtmlWrapper<'a> {
    pub fn new(format: Format, language: &'a str, stylesheet: &'a str, scripts: &'a [String]) -> Self {
        Self {
            format,
            language,
            stylesheet,
            scripts,
        }
    }

    /// 生成内容文档
    ///
    /// # 参数
    /// * `title` - 文档标题（片段模式下写入head）
    /// * `document` - 已解析的源文件
    /// * `body_only` - 源文件是否只是body片段
    ///
    /// # 返回值
    /// 完整的XHTML文本
    pub fn wrap(&self, title: &str, document: &SourceDocument, body_only: bool) -> Result<String> {
        let mut serializer = XhtmlSerializer::new(document, self.scripts);

        let mut content = if body_only {
            let mut content = self.shell_head(title);
            match document.body() {
                Some(body) => serializer.write_node(*body)?,
                None => serializer.write_empty_body()?,
            }
            content.push_str(&serializer.finish());
            content.push_str("\n</html>");
            content
        } else if let Some(source) = verbatim_document(document, self.scripts) {
            let mut content = self.prolog(source.doctype.as_deref());
            content.push_str(&source.root);
            content
        } else {
            debug!("源文件不是格式良好的XML，按HTML重新序列化");
            let mut content = self.prolog(None);
            for child in document.html.tree.root().children() {
                serializer.write_node(child)?;
            }
            content.push_str(&serializer.finish());
            content
        };

        content.push('\n');
        Ok(content)
    }

    /// 完整文档模式下写在根元素之前的内容
    ///
    /// EPUB2保留源文件的文档类型声明；EPUB3统一使用`<!DOCTYPE html>`。
    fn prolog(&self, doctype: Option<&str>) -> String {
        match (self.format, doctype) {
            (Format::Epub2, Some(doctype)) => {
                format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", doctype)
            }
            (Format::Epub2, None) => "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n".to_string(),
            (Format::Epub3, _) => "<!DOCTYPE html>\n".to_string(),
        }
    }

    /// 片段模式的文档外壳，到`</head>`为止
    fn shell_head(&self, title: &str) -> String {
        let title = escape(title);
        let language = escape(self.language);
        let stylesheet = escape(self.stylesheet);

        match self.format {
            Format::Epub2 => format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                 {doctype}\n\
                 <html xmlns=\"{ns}\" xml:lang=\"{language}\">\n\
                 <head>\n  \
                 <meta http-equiv=\"Content-Type\" content=\"{mime}; charset=utf-8\"/>\n  \
                 <title>{title}</title>\n  \
                 <link rel=\"stylesheet\" type=\"text/css\" href=\"{stylesheet}\"/>\n\
                 </head>\n",
                doctype = XHTML11_DOCTYPE,
                ns = XHTML_NAMESPACE,
                mime = media::XHTML,
            ),
            Format::Epub3 => format!(
                "<!DOCTYPE html>\n\
                 <html xmlns=\"{ns}\" xmlns:epub=\"{epub}\" xml:lang=\"{language}\" lang=\"{language}\">\n\
                 <head>\n  \
                 <meta charset=\"UTF-8\"/>\n  \
                 <title>{title}</title>\n  \
                 <link rel=\"stylesheet\" type=\"text/css\" href=\"{stylesheet}\"/>\n\
                 </head>\n",
                ns = XHTML_NAMESPACE,
                epub = EPUB_NAMESPACE,
            ),
        }
    }
}

/// 把HTML节点树写成XHTML
struct XhtmlSerializer<'d> {
    document: &'d SourceDocument,
    scripts: &'d [String],
    writer: Writer<Vec<u8>>,
}

impl<'d> XhtmlSerializer<'d> {
    fn new(document: &'d SourceDocument, scripts: &'d [String]) -> Self {
        Self {
            document,
            scripts,
            writer: Writer::new(Vec::new()),
        }
    }

    fn write_node(&mut self, node: NodeRef<'_, Node>) -> Result<()> {
        match node.value() {
            Node::Document | Node::Fragment => {
                for child in node.children() {
                    self.write_node(child)?;
                }
            }
            Node::Element(element) => self.write_element(node, element)?,
            Node::Text(text) => {
                let content: &str = text;
                self.writer.write_event(Event::Text(BytesText::new(content)))?;
            }
            Node::Comment(comment) => {
                let content = xml_comment_text(comment);
                self.writer
                    .write_event(Event::Comment(BytesText::from_escaped(content)))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn write_element(&mut self, node: NodeRef<'_, Node>, element: &Element) -> Result<()> {
        let name = element.name();
        let is_svg = &*element.name.ns == SVG_NAMESPACE;
        let has_xmlns = element.attrs().any(|(attr, _)| attr == "xmlns");

        let mut start = BytesStart::new(name);
        if !has_xmlns && name == "html" {
            start.push_attribute(("xmlns", XHTML_NAMESPACE));
        } else if !has_xmlns && is_svg && name == "svg" {
            start.push_attribute(("xmlns", SVG_NAMESPACE));
        }

        let rewritten = if name == "img" {
            self.document.image_sources.get(&node.id())
        } else {
            None
        };
        for (attr, value) in element.attrs() {
            match rewritten {
                Some(src) if attr == "src" => start.push_attribute((attr, src.as_str())),
                _ => start.push_attribute((attr, value)),
            }
        }

        let is_body = name == "body" && !self.scripts.is_empty();
        let is_empty = !node.has_children() && !is_body;
        if is_empty && (is_svg || VOID_ELEMENTS.contains(&name)) {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(start))?;
        for child in node.children() {
            self.write_node(child)?;
        }
        if is_body {
            self.write_scripts()?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_empty_body(&mut self) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new("body")))?;
        self.write_scripts()?;
        self.writer.write_event(Event::End(BytesEnd::new("body")))?;
        Ok(())
    }

    fn write_scripts(&mut self) -> Result<()> {
        write_script_tags(&mut self.writer, self.scripts)?;
        Ok(())
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.writer.into_inner()).into_owned()
    }
}

fn write_script_tags(writer: &mut Writer<Vec<u8>>, scripts: &[String]) -> io::Result<()> {
    for script in scripts {
        let start = BytesStart::new("script").with_attributes([
            ("src", script.as_str()),
            ("type", media::JAVASCRIPT),
            ("charset", "utf-8"),
        ]);
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::End(BytesEnd::new("script")))?;
    }
    Ok(())
}

/// XML注释中不允许出现`--`，也不能以`-`结尾
fn xml_comment_text(comment: &str) -> String {
    let mut text = comment.to_string();
    if text.contains("--") {
        debug!("注释中含有\"--\"，已替换: {}", comment);
        while text.contains("--") {
            text = text.replace("--", "- -");
        }
    }
    if text.ends_with('-') {
        text.push(' ');
    }
    text
}

/// 按源文本原样保留的完整文档
struct VerbatimDocument {
    /// 源文件的文档类型声明
    doctype: Option<String>,
    /// 从`<html>`到`</html>`的文本
    root: String,
}

/// 源文件是以`html`为根的格式良好的XML时，逐个事件原样写回
///
/// 只改写图片地址、补充缺少的XHTML命名空间，并在`</body>`之前插入脚本。
/// 源文件无法按XML读取时返回`None`。
fn verbatim_document(document: &SourceDocument, scripts: &[String]) -> Option<VerbatimDocument> {
    let rewrites = document.rewrites();
    let mut reader = Reader::from_str(&document.markup);
    let mut writer = Writer::new(Vec::new());
    let mut doctype = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event().ok()? {
            Event::Eof => return None,
            Event::Decl(_) => {}
            Event::DocType(content) if depth == 0 => {
                doctype = Some(format!("<!DOCTYPE {}>", String::from_utf8_lossy(&content)));
            }
            Event::Text(_) if depth == 0 => {}
            Event::Start(start) => {
                let start = if depth == 0 {
                    if start.name().as_ref() != b"html" {
                        return None;
                    }
                    with_xhtml_namespace(start)?
                } else {
                    rewrite_image(start, &rewrites)?
                };
                depth += 1;
                writer.write_event(Event::Start(start)).ok()?;
            }
            Event::Empty(start) => {
                if depth == 0 {
                    return None;
                }
                if start.name().as_ref() == b"body" && !scripts.is_empty() {
                    writer.write_event(Event::Start(start)).ok()?;
                    write_script_tags(&mut writer, scripts).ok()?;
                    writer.write_event(Event::End(BytesEnd::new("body"))).ok()?;
                } else {
                    writer.write_event(Event::Empty(rewrite_image(start, &rewrites)?)).ok()?;
                }
            }
            Event::End(end) => {
                if end.name().as_ref() == b"body" {
                    write_script_tags(&mut writer, scripts).ok()?;
                }
                writer.write_event(Event::End(end)).ok()?;
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            event if depth == 0 => {
                writer.write_event(event).ok()?;
                writer.get_mut().push(b'\n');
            }
            event => writer.write_event(event).ok()?,
        }
    }

    let root = String::from_utf8(writer.into_inner()).ok()?;
    Some(VerbatimDocument { doctype, root })
}

fn with_xhtml_namespace(mut start: BytesStart<'_>) -> Option<BytesStart<'_>> {
    let mut has_xmlns = false;
    for attr in start.attributes() {
        has_xmlns |= attr.ok()?.key.as_ref() == b"xmlns";
    }
    if !has_xmlns {
        start.push_attribute(("xmlns", XHTML_NAMESPACE));
    }
    Some(start)
}

/// 按映射改写`img`的`src`，其他元素原样返回
fn rewrite_image<'e>(start: BytesStart<'e>, rewrites: &HashMap<&str, &str>) -> Option<BytesStart<'e>> {
    if rewrites.is_empty() || start.name().as_ref() != b"img" {
        return Some(start);
    }

    let mut target = None;
    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"src" {
            let value = attr.unescape_value().ok()?;
            target = rewrites.get(value.as_ref()).copied();
        }
    }
    let Some(src) = target else {
        return Some(start);
    };

    let mut rewritten = BytesStart::new("img");
    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"src" {
            rewritten.push_attribute(("src", src));
        } else {
            rewritten.push_attribute(attr);
        }
    }
    Some(rewritten)
}
