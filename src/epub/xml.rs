//! XML写入辅助
//!
//! 对quick-xml的`Writer`做一层薄封装，供OPF、NCX、导航文档等生成器使用。
//! 文本和属性值都会被转义。

use crate::epub::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// 带缩进的XML文档构建器
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// 创建使用两个空格缩进的构建器
    pub fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    /// 写入 `<?xml version="1.0" encoding="UTF-8"?>`
    pub fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// 写入 `<!DOCTYPE ...>`，`content`不做转义
    pub fn doctype(&mut self, content: &str) -> Result<()> {
        self.writer
            .write_event(Event::DocType(BytesText::from_escaped(content)))?;
        Ok(())
    }

    /// 写入开始标签
    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    /// 写入结束标签
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// 写入空元素
    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// 写入只包含文本的元素
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attributes)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// 结束构建，返回文档文本（末尾带换行）
    pub fn finish(self) -> String {
        let mut content = String::from_utf8_lossy(&self.writer.into_inner()).into_owned();
        content.push('\n');
        content
    }
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut xml = XmlBuilder::new();
        xml.start("root", &[("title", "a \"quoted\" <title>")]).unwrap();
        xml.text_element("name", &[], "Tom & Jerry").unwrap();
        xml.empty("leaf", &[("id", "x")]).unwrap();
        xml.end("root").unwrap();
        let output = xml.finish();

        assert!(output.contains("title=\"a &quot;quoted&quot; &lt;title&gt;\""));
        assert!(output.contains("<name>Tom &amp; Jerry</name>"));
        assert!(output.contains("<leaf id=\"x\"/>"));
        assert!(output.ends_with("</root>\n"));
    }

    #[test]
    fn test_declaration_and_doctype() {
        let mut xml = XmlBuilder::new();
        xml.declaration().unwrap();
        xml.doctype("html").unwrap();
        xml.empty("html", &[]).unwrap();
        let output = xml.finish();
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(output.contains("<!DOCTYPE html>"));
    }
}
