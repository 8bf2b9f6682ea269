//! OCF容器描述模块
//!
//! 生成`META-INF/container.xml`，指向包文档。

use crate::epub::error::Result;
use crate::epub::media;
use crate::epub::xml::XmlBuilder;

const CONTAINER_NAMESPACE: &str = "urn:oasis:names:tc:opendocument:xmlns:container";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// Container.xml
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 只包含一个包文档的容器描述
    ///
    /// # 参数
    /// * `opf_path` - 包文档在包内的路径
    pub fn for_package(opf_path: &str) -> Self {
        Self {
            rootfiles: vec![RootFile {
                full_path: opf_path.to_string(),
                media_type: media::OEBPS_PACKAGE.to_string(),
            }],
        }
    }

    /// 生成container.xml内容
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = XmlBuilder::new();
        xml.declaration()?;
        xml.start(
            "container",
            &[("version", "1.0"), ("xmlns", CONTAINER_NAMESPACE)],
        )?;
        xml.start("rootfiles", &[])?;
        for rootfile in &self.rootfiles {
            xml.empty(
                "rootfile",
                &[
                    ("full-path", rootfile.full_path.as_str()),
                    ("media-type", rootfile.media_type.as_str()),
                ],
            )?;
        }
        xml.end("rootfiles")?;
        xml.end("container")?;
        Ok(xml.finish())
    }

    /// 获取主要的OPF文件路径
    pub fn get_opf_path(&self) -> Option<&str> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == media::OEBPS_PACKAGE)
            .map(|rootfile| rootfile.full_path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_xml() {
        let container = Container::for_package("book.opf");
        assert_eq!(container.get_opf_path(), Some("book.opf"));

        let xml = container.to_xml().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(
            "<container version=\"1.0\" xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\">"
        ));
        assert!(xml.contains(
            "<rootfile full-path=\"book.opf\" media-type=\"application/oebps-package+xml\"/>"
        ));
    }
}
