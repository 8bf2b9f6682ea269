//! OPF写入模块
//!
//! 把元数据、清单和脊柱写成包文档（book.opf）。

use crate::book::Format;
use crate::epub::error::Result;
use crate::epub::opf::metadata::{BOOK_ID, MetaValue, Metadata, MetadataValue};
use crate::epub::opf::{Manifest, Spine};
use crate::epub::xml::XmlBuilder;

const OPF_NAMESPACE: &str = "http://www.idpf.org/2007/opf";
const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// 包文档
#[derive(Debug, Clone)]
pub struct Opf {
    /// 目标格式
    pub format: Format,
    /// 书籍语言（EPUB3写入`package`的`xml:lang`）
    pub language: String,
    /// 元数据
    pub metadata: Metadata,
    /// 清单项(文件列表)
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Spine,
}

impl Opf {
    /// 生成OPF文件内容
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new();
        xml.declaration()?;

        let mut package = vec![
            ("xmlns", OPF_NAMESPACE),
            ("version", self.format.version()),
            ("unique-identifier", BOOK_ID),
        ];
        if self.format == Format::Epub3 {
            package.push(("xml:lang", self.language.as_str()));
        }
        xml.start("package", &package)?;

        self.write_metadata(&mut xml)?;
        self.write_manifest(&mut xml)?;
        self.write_spine(&mut xml)?;

        xml.end("package")?;
        Ok(xml.finish())
    }

    fn write_metadata(&self, xml: &mut XmlBuilder) -> Result<()> {
        xml.start(
            "metadata",
            &[("xmlns:dc", DC_NAMESPACE), ("xmlns:opf", OPF_NAMESPACE)],
        )?;

        for entry in self.metadata.entries() {
            match entry {
                MetadataValue::DublinCore {
                    tag,
                    value,
                    attributes,
                } => {
                    let attributes: Vec<(&str, &str)> = attributes
                        .iter()
                        .map(|(key, value)| (key.as_str(), value.as_str()))
                        .collect();
                    xml.text_element(tag, &attributes, value)?;
                }
                MetadataValue::Meta(MetaValue::NameBased { name, content }) => {
                    xml.empty("meta", &[("name", name.as_str()), ("content", content.as_str())])?;
                }
                MetadataValue::Meta(MetaValue::PropertyBased { property, content }) => {
                    xml.text_element("meta", &[("property", property.as_str())], content)?;
                }
            }
        }

        xml.end("metadata")
    }

    fn write_manifest(&self, xml: &mut XmlBuilder) -> Result<()> {
        xml.start("manifest", &[])?;
        for item in self.manifest.items() {
            let mut attributes = vec![
                ("id", item.id.as_str()),
                ("href", item.href.as_str()),
                ("media-type", item.media_type.as_str()),
            ];
            if let Some(properties) = &item.properties {
                attributes.push(("properties", properties.as_str()));
            }
            xml.empty("item", &attributes)?;
        }
        xml.end("manifest")
    }

    fn write_spine(&self, xml: &mut XmlBuilder) -> Result<()> {
        match &self.spine.toc {
            Some(toc) => xml.start("spine", &[("toc", toc.as_str())])?,
            None => xml.start("spine", &[])?,
        }
        for item in self.spine.items() {
            if item.linear {
                xml.empty("itemref", &[("idref", item.idref.as_str())])?;
            } else {
                xml.empty("itemref", &[("idref", item.idref.as_str()), ("linear", "no")])?;
            }
        }
        xml.end("spine")
    }
}
