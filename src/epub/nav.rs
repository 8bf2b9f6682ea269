//! EPUB3导航文档模块
//!
//! 生成`toc.xhtml`：嵌套的有序列表与内容树结构一致，顺序由嵌套本身表达。

use crate::epub::error::Result;
use crate::epub::ncx::{NavMap, NavPoint};
use crate::epub::xml::XmlBuilder;

const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const EPUB_NAMESPACE: &str = "http://www.idpf.org/2007/ops";

/// 导航文档
#[derive(Debug, Clone)]
pub struct NavDocument<'a> {
    /// 书名
    pub title: &'a str,
    /// 书籍语言
    pub language: &'a str,
    /// 样式表路径
    pub stylesheet: &'a str,
    /// 导航地图
    pub nav_map: &'a NavMap,
}

impl NavDocument<'_> {
    /// 生成导航文档内容
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new();
        xml.doctype("html")?;
        xml.start(
            "html",
            &[
                ("xmlns", XHTML_NAMESPACE),
                ("xmlns:epub", EPUB_NAMESPACE),
                ("xml:lang", self.language),
                ("lang", self.language),
            ],
        )?;

        xml.start("head", &[])?;
        xml.empty("meta", &[("charset", "UTF-8")])?;
        xml.text_element("title", &[], self.title)?;
        xml.empty(
            "link",
            &[("rel", "stylesheet"), ("type", "text/css"), ("href", self.stylesheet)],
        )?;
        xml.end("head")?;

        xml.start("body", &[])?;
        xml.start("section", &[("epub:type", "frontmatter toc")])?;
        xml.start("header", &[])?;
        xml.text_element("h1", &[], "Contents")?;
        xml.end("header")?;
        xml.start("nav", &[("epub:type", "toc"), ("id", "toc")])?;
        write_list(&mut xml, &self.nav_map.nav_points)?;
        xml.end("nav")?;
        xml.end("section")?;
        xml.end("body")?;

        xml.end("html")?;
        Ok(xml.finish())
    }
}

fn write_list(xml: &mut XmlBuilder, nav_points: &[NavPoint]) -> Result<()> {
    xml.start("ol", &[])?;
    for nav_point in nav_points {
        // 导航文档中的链接文本不能为空
        let label = if nav_point.nav_label.text.trim().is_empty() {
            nav_point.id.as_str()
        } else {
            nav_point.nav_label.text.as_str()
        };

        xml.start("li", &[("id", nav_point.id.as_str())])?;
        xml.text_element("a", &[("href", nav_point.content.src.as_str())], label)?;
        if !nav_point.children.is_empty() {
            write_list(xml, &nav_point.children)?;
        }
        xml.end("li")?;
    }
    xml.end("ol")
}
