//! 目录树（Table of Contents Tree）模块
//!
//! 提供导航地图的树形表示和文本显示功能，供命令行输出生成结果。

use crate::epub::ncx::{NavMap, NavPoint};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// 目录树显示样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TocTreeStyle {
    /// 使用树状符号（├── └──）
    TreeSymbols,
    /// 使用缩进和符号（• ）
    Indented,
}

/// 目录树节点
#[derive(Debug, Clone)]
pub struct TocTreeNode {
    /// 播放顺序
    pub play_order: u32,
    /// 标题
    pub title: String,
    /// 文件路径
    pub src: String,
    /// 子节点
    pub children: Vec<TocTreeNode>,
}

impl TocTreeNode {
    /// 创建新的目录树节点
    pub fn new(play_order: u32, title: String, src: String) -> Self {
        Self {
            play_order,
            title,
            src,
            children: Vec::new(),
        }
    }

    /// 获取节点及其所有子节点的数量
    pub fn get_total_nodes(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TocTreeNode::get_total_nodes)
            .sum::<usize>()
    }
}

/// 目录树结构
#[derive(Debug, Clone)]
pub struct TocTree {
    /// 文档标题
    pub title: Option<String>,
    /// 根节点列表
    pub roots: Vec<TocTreeNode>,
    /// 显示样式
    pub style: TocTreeStyle,
    /// 是否显示文件路径
    pub show_paths: bool,
    /// 最大显示深度（None表示显示所有）
    pub max_depth: Option<u32>,
}

impl TocTree {
    /// 创建新的目录树
    pub fn new() -> Self {
        Self {
            title: None,
            roots: Vec::new(),
            style: TocTreeStyle::TreeSymbols,
            show_paths: true,
            max_depth: None,
        }
    }

    /// 设置文档标题
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// 设置显示样式
    pub fn with_style(mut self, style: TocTreeStyle) -> Self {
        self.style = style;
        self
    }

    /// 设置是否显示文件路径
    pub fn with_show_paths(mut self, show_paths: bool) -> Self {
        self.show_paths = show_paths;
        self
    }

    /// 设置最大显示深度
    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// 添加根节点
    pub fn add_root(&mut self, node: TocTreeNode) {
        self.roots.push(node);
    }

    /// 节点总数
    pub fn total_nodes(&self) -> usize {
        self.roots.iter().map(TocTreeNode::get_total_nodes).sum()
    }

    fn node_content(&self, node: &TocTreeNode) -> String {
        if self.show_paths {
            format!("[{}] {} → {}", node.play_order, node.title, node.src)
        } else {
            format!("[{}] {}", node.play_order, node.title)
        }
    }

    fn depth_allowed(&self, depth: u32) -> bool {
        self.max_depth.is_none_or(|max_depth| depth < max_depth)
    }

    /// 渲染树状符号风格
    fn render_tree_style(
        &self,
        node: &TocTreeNode,
        current_depth: u32,
        is_last: bool,
        prefix: &str,
        result: &mut String,
    ) {
        if !self.depth_allowed(current_depth) {
            return;
        }

        let current_prefix = if is_last { "└── " } else { "├── " };
        result.push_str(&format!("{}{}{}\n", prefix, current_prefix, self.node_content(node)));

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        for (index, child) in node.children.iter().enumerate() {
            let is_child_last = index == node.children.len() - 1;
            self.render_tree_style(child, current_depth + 1, is_child_last, &child_prefix, result);
        }
    }

    /// 渲染缩进风格
    fn render_indent_style(&self, node: &TocTreeNode, current_depth: u32, result: &mut String) {
        if !self.depth_allowed(current_depth) {
            return;
        }

        let indent = "  ".repeat(current_depth as usize);
        result.push_str(&format!("{}• {}\n", indent, self.node_content(node)));

        for child in &node.children {
            self.render_indent_style(child, current_depth + 1, result);
        }
    }
}

impl Default for TocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TocTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut result = String::new();

        if let Some(ref title) = self.title {
            let depth_info = if let Some(max_depth) = self.max_depth {
                format!(" (深度限制: {})", max_depth)
            } else {
                String::new()
            };
            result.push_str(&format!("📖 {}{}\n", title, depth_info));
            result.push_str("═══════════════════════════════════════\n\n");
        }

        for (index, root) in self.roots.iter().enumerate() {
            match self.style {
                TocTreeStyle::TreeSymbols => {
                    let is_last = index == self.roots.len() - 1;
                    self.render_tree_style(root, 0, is_last, "", &mut result);
                }
                TocTreeStyle::Indented => self.render_indent_style(root, 0, &mut result),
            }
        }

        write!(f, "{}", result)
    }
}

/// 从导航地图创建目录树
pub fn create_toc_tree_from_nav_map(nav_map: &NavMap, title: Option<String>) -> TocTree {
    let mut toc_tree = TocTree::new().with_title(title);
    for nav_point in &nav_map.nav_points {
        toc_tree.add_root(convert_nav_point_to_toc_node(nav_point));
    }
    toc_tree
}

/// 递归转换导航点为目录树节点
fn convert_nav_point_to_toc_node(nav_point: &NavPoint) -> TocTreeNode {
    let mut toc_node = TocTreeNode::new(
        nav_point.play_order,
        nav_point.nav_label.text.clone(),
        nav_point.content.src.clone(),
    );
    for child in &nav_point.children {
        toc_node.children.push(convert_nav_point_to_toc_node(child));
    }
    toc_node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::ncx::{NavContent, NavLabel};

    fn nav_point(id: &str, play_order: u32, title: &str) -> NavPoint {
        NavPoint::new(
            id.to_string(),
            play_order,
            NavLabel::new(title.to_string()),
            NavContent::new(format!("{}.xhtml", id)),
        )
    }

    fn sample_nav_map() -> NavMap {
        let mut part = nav_point("part", 1, "Part");
        part.add_child(nav_point("one", 2, "One"));
        part.add_child(nav_point("two", 3, "Two"));
        let mut nav_map = NavMap::new();
        nav_map.add_nav_point(part);
        nav_map.add_nav_point(nav_point("end", 4, "End"));
        nav_map
    }

    #[test]
    fn test_tree_symbols() {
        let tree = create_toc_tree_from_nav_map(&sample_nav_map(), Some("Demo".to_string()));
        assert_eq!(tree.total_nodes(), 4);

        let rendered = tree.to_string();
        assert!(rendered.starts_with("📖 Demo\n"));
        assert!(rendered.contains("├── [1] Part → part.xhtml\n"));
        assert!(rendered.contains("│   ├── [2] One → one.xhtml\n"));
        assert!(rendered.contains("│   └── [3] Two → two.xhtml\n"));
        assert!(rendered.contains("└── [4] End → end.xhtml\n"));
    }

    #[test]
    fn test_indented_without_paths() {
        let tree = create_toc_tree_from_nav_map(&sample_nav_map(), None)
            .with_style(TocTreeStyle::Indented)
            .with_show_paths(false);
        assert_eq!(tree.to_string(), "• [1] Part\n  • [2] One\n  • [3] Two\n• [4] End\n");
    }

    #[test]
    fn test_max_depth() {
        let tree = create_toc_tree_from_nav_map(&sample_nav_map(), None)
            .with_style(TocTreeStyle::Indented)
            .with_show_paths(false)
            .with_max_depth(Some(1));
        assert_eq!(tree.to_string(), "• [1] Part\n• [4] End\n");
    }
}
