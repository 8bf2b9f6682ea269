use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// 生成EPUB过程中的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("书籍配置无效: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("无法读取源文件 {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("输出名称已设置为 {existing}, 不能再设置为 {requested}")]
    DuplicateOutput { existing: String, requested: String },

    #[error("不支持的输出格式: {0}")]
    UnsupportedFormat(String),

    #[error("未知的元数据元素: {0}")]
    UnknownMetadata(String),

    #[error("获取图片失败 {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("无法识别的图片类型: {0}")]
    UnsupportedImage(String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}

impl EpubError {
    /// 创建一个指明字段的配置校验错误
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EpubError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
