//! 标识符与路径分配模块
//!
//! 为内容划分和资源分配唯一的XML标识符和包内文件名，并以确定的方式解决命名冲突。

use percent_encoding::percent_decode_str;
use reqwest::Url;
use std::collections::HashSet;
use tracing::warn;

/// 根据路径生成XML标识符
///
/// 去掉最后一段的扩展名，目录分隔符及其他不安全字符替换为`-`。
/// 结果不是以字母或下划线开头时加上`_`前缀，使其成为合法的NCName。
pub fn identifier_for(path: &str) -> String {
    let path = path.trim_matches('/');
    let without_ext = match path.rfind('.') {
        Some(dot) if dot > path.rfind('/').map(|slash| slash + 1).unwrap_or(0) => &path[..dot],
        _ => path,
    };

    let id = sanitize(without_ext);
    match id.chars().next() {
        None => "division".to_string(),
        Some(first) if first.is_alphabetic() || first == '_' => id,
        Some(_) => format!("_{}", id),
    }
}

/// 在已有名称集合中为资源分配不冲突的路径
///
/// 名称取自URL路径的最后一段；已存在时在扩展名前追加`_N`（N从1开始）。
///
/// # 参数
/// * `existing` - 已分配的包内路径
/// * `dir` - 资源所在目录，如 `images`
/// * `url` - 资源地址
/// * `ext` - 替代URL中扩展名的扩展名（含点），如根据内容识别出的类型
pub fn asset_path_for(existing: &HashSet<String>, dir: &str, url: &Url, ext: Option<&str>) -> String {
    let (stem, url_ext) = base_parts(&url_file_name(url));
    unique_path(existing, dir, &stem, ext.unwrap_or(&url_ext))
}

/// 按`stem`和`ext`在`dir`下分配第一个可用的路径
pub(crate) fn unique_path(existing: &HashSet<String>, dir: &str, stem: &str, ext: &str) -> String {
    let mut candidate = format!("{}/{}{}", dir, stem, ext);
    let mut n = 0;
    while existing.contains(&candidate) {
        n += 1;
        candidate = format!("{}/{}_{}{}", dir, stem, n, ext);
    }
    candidate
}

/// 把文件名拆分为主干名和扩展名（扩展名含点，小写）
pub(crate) fn base_parts(file_name: &str) -> (String, String) {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => (
            sanitize(&file_name[..dot]),
            file_name[dot..].to_ascii_lowercase(),
        ),
        _ => (sanitize(file_name), String::new()),
    }
}

/// URL路径的最后一段（已解码），为空时为`image`
pub(crate) fn url_file_name(url: &Url) -> String {
    let last = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("");
    let decoded = percent_decode_str(last).decode_utf8_lossy().to_string();
    if decoded.is_empty() {
        "image".to_string()
    } else {
        decoded
    }
}

/// 只保留字母、数字、`_`、`.`，其余字符（连续的）替换为单个`-`
fn sanitize(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_alphanumeric() || c == '_' || c == '.' {
            result.push(c);
        } else if !result.ends_with('-') {
            result.push('-');
        }
    }
    result.trim_matches('-').to_string()
}

/// 一次生成过程中的命名空间：已分配的XML标识符与包内文件
#[derive(Debug, Default)]
pub struct Namespace {
    ids: HashSet<String>,
    files: HashSet<String>,
}

impl Namespace {
    /// 创建命名空间，并预先占用包自身使用的标识符和文件名
    pub fn with_reserved(ids: &[&str], files: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            files: files.iter().map(|file| file.to_string()).collect(),
        }
    }

    /// 占用一个标识符；冲突时追加`_N`后缀
    pub fn claim_id(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 0;
        while self.ids.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        if n > 0 {
            warn!("标识符冲突: {} 已被占用，改用 {}", base, candidate);
        }
        self.ids.insert(candidate.clone());
        candidate
    }

    /// 为URL对应的资源在`dir`下占用一个不冲突的路径
    pub fn claim_asset_path(&mut self, dir: &str, url: &Url, ext: Option<&str>) -> String {
        let path = asset_path_for(&self.files, dir, url, ext);
        self.files.insert(path.clone());
        path
    }

    /// 以给定的主干名和扩展名在`dir`下占用一个不冲突的路径
    pub fn claim_file(&mut self, dir: &str, stem: &str, ext: &str) -> String {
        let path = unique_path(&self.files, dir, stem, ext);
        self.files.insert(path.clone());
        path
    }
}
