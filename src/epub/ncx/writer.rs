//! NCX写入模块
//!
//! 生成EPUB2的导航控制文件（book.ncx）。

use crate::epub::error::Result;
use crate::epub::ncx::{DocTitle, NavMap, NavPoint, NcxMetadata};
use crate::epub::xml::XmlBuilder;

const NCX_NAMESPACE: &str = "http://www.daisy.org/z3986/2005/ncx/";
const NCX_DOCTYPE: &str =
    "ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\" \"http://www.daisy.org/z3986/2005/ncx-2005-1.dtd\"";

/// NCX文件
#[derive(Debug, Clone)]
pub struct Ncx {
    /// XML语言
    pub xml_lang: String,
    /// 元数据
    pub metadata: NcxMetadata,
    /// 文档标题
    pub doc_title: DocTitle,
    /// 文档作者
    pub doc_author: Option<String>,
    /// 导航地图
    pub nav_map: NavMap,
}

impl Ncx {
    /// 生成NCX文件内容
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new();
        xml.declaration()?;
        xml.doctype(NCX_DOCTYPE)?;
        xml.start(
            "ncx",
            &[
                ("xmlns", NCX_NAMESPACE),
                ("version", "2005-1"),
                ("xml:lang", self.xml_lang.as_str()),
            ],
        )?;

        let depth = self.metadata.depth.to_string();
        let total_page_count = self.metadata.total_page_count.to_string();
        let max_page_number = self.metadata.max_page_number.to_string();
        xml.start("head", &[])?;
        for (name, content) in [
            ("dtb:uid", self.metadata.uid.as_str()),
            ("dtb:depth", depth.as_str()),
            ("dtb:totalPageCount", total_page_count.as_str()),
            ("dtb:maxPageNumber", max_page_number.as_str()),
        ] {
            xml.empty("meta", &[("name", name), ("content", content)])?;
        }
        xml.end("head")?;

        xml.start("docTitle", &[])?;
        xml.text_element("text", &[], &self.doc_title.text)?;
        xml.end("docTitle")?;

        if let Some(author) = &self.doc_author {
            xml.start("docAuthor", &[])?;
            xml.text_element("text", &[], author)?;
            xml.end("docAuthor")?;
        }

        xml.start("navMap", &[])?;
        for nav_point in &self.nav_map.nav_points {
            write_nav_point(&mut xml, nav_point)?;
        }
        xml.end("navMap")?;

        xml.end("ncx")?;
        Ok(xml.finish())
    }
}

fn write_nav_point(xml: &mut XmlBuilder, nav_point: &NavPoint) -> Result<()> {
    let play_order = nav_point.play_order.to_string();
    let mut attributes = vec![("id", nav_point.id.as_str())];
    if let Some(class) = &nav_point.class {
        attributes.push(("class", class.as_str()));
    }
    attributes.push(("playOrder", play_order.as_str()));

    xml.start("navPoint", &attributes)?;
    xml.start("navLabel", &[])?;
    xml.text_element("text", &[], &nav_point.nav_label.text)?;
    xml.end("navLabel")?;
    xml.empty("content", &[("src", nav_point.content.src.as_str())])?;
    for child in &nav_point.children {
        write_nav_point(xml, child)?;
    }
    xml.end("navPoint")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Book, Division};
    use crate::epub::layout::Layout;
    use crate::epub::naming::Namespace;

    #[test]
    fn test_ncx_document() {
        let mut book = Book::new();
        book.add_division(
            Division::part("Part <1>", "part.html").with_division(Division::chapter("Intro", "intro.html")),
        );
        let layout = Layout::plan(&book, &mut Namespace::default());
        let nav_map = NavMap::from_layout(&layout);

        let ncx = Ncx {
            xml_lang: "en".to_string(),
            metadata: NcxMetadata::new("urn:isbn:123", nav_map.get_depth()),
            doc_title: DocTitle::new("Demo".to_string()),
            doc_author: Some("Jane Roe".to_string()),
            nav_map,
        };
        let xml = ncx.to_xml().unwrap();

        assert!(xml.contains("<!DOCTYPE ncx PUBLIC \"-//NISO//DTD ncx 2005-1//EN\""));
        assert!(xml.contains("<ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\" xml:lang=\"en\">"));
        assert!(xml.contains("<meta name=\"dtb:uid\" content=\"urn:isbn:123\"/>"));
        assert!(xml.contains("<meta name=\"dtb:depth\" content=\"2\"/>"));
        assert!(xml.contains("<meta name=\"dtb:totalPageCount\" content=\"0\"/>"));
        assert!(xml.contains("<meta name=\"dtb:maxPageNumber\" content=\"0\"/>"));
        assert!(xml.contains("<text>Demo</text>"));
        assert!(xml.contains("<docAuthor>"));
        assert!(xml.contains("<navPoint id=\"part\" class=\"part\" playOrder=\"1\">"));
        assert!(xml.contains("<text>Part &lt;1&gt;</text>"));
        assert!(xml.contains("<navPoint id=\"intro\" class=\"chapter\" playOrder=\"2\">"));
        assert!(xml.contains("<content src=\"intro.xhtml\"/>"));

        let intro = xml.find("id=\"intro\"").unwrap();
        let part_end = xml.rfind("</navPoint>").unwrap();
        assert!(intro < part_end);
    }
}
