//! NCX导航元素数据结构定义
//!
//! 定义NCX文件中的各种导航元素，包括导航点、导航标签、内容引用等，
//! 以及从内容布局构建导航地图的逻辑。

use crate::epub::layout::{Layout, PlannedDivision};

/// NCX元数据信息
#[derive(Debug, Clone, Default)]
pub struct NcxMetadata {
    /// 唯一标识符（dtb:uid）
    pub uid: String,
    /// 导航深度（dtb:depth）
    pub depth: u32,
    /// 总页数（dtb:totalPageCount）
    pub total_page_count: u32,
    /// 最大页码（dtb:maxPageNumber）
    pub max_page_number: u32,
}

impl NcxMetadata {
    /// 创建新的NCX元数据，页数信息为0
    pub fn new(uid: impl Into<String>, depth: u32) -> Self {
        Self {
            uid: uid.into(),
            depth,
            total_page_count: 0,
            max_page_number: 0,
        }
    }
}

/// 文档标题
#[derive(Debug, Clone)]
pub struct DocTitle {
    /// 标题文本
    pub text: String,
}

impl DocTitle {
    /// 创建新的文档标题
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

/// 导航标签
#[derive(Debug, Clone)]
pub struct NavLabel {
    /// 标签文本
    pub text: String,
}

impl NavLabel {
    /// 创建新的导航标签
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

/// 导航内容引用
#[derive(Debug, Clone)]
pub struct NavContent {
    /// 源文件路径
    pub src: String,
}

impl NavContent {
    /// 创建新的导航内容引用
    pub fn new(src: String) -> Self {
        Self { src }
    }
}

/// 导航点
#[derive(Debug, Clone)]
pub struct NavPoint {
    /// 唯一标识符
    pub id: String,
    /// 播放顺序
    pub play_order: u32,
    /// CSS类名（内容划分类型）
    pub class: Option<String>,
    /// 导航标签
    pub nav_label: NavLabel,
    /// 内容引用
    pub content: NavContent,
    /// 子导航点
    pub children: Vec<NavPoint>,
}

impl NavPoint {
    /// 创建新的导航点
    pub fn new(id: String, play_order: u32, nav_label: NavLabel, content: NavContent) -> Self {
        Self {
            id,
            play_order,
            class: None,
            nav_label,
            content,
            children: Vec::new(),
        }
    }

    /// 添加子导航点
    pub fn add_child(&mut self, child: NavPoint) {
        self.children.push(child);
    }

    /// 获取所有导航点（包括子导航点）的平铺列表
    pub fn get_all_nav_points(&self) -> Vec<&NavPoint> {
        let mut points = vec![self];
        for child in &self.children {
            points.extend(child.get_all_nav_points());
        }
        points
    }

    /// 获取导航深度
    pub fn get_depth(&self) -> u32 {
        1 + self
            .children
            .iter()
            .map(|child| child.get_depth())
            .max()
            .unwrap_or(0)
    }

    /// 按先序从已分配名称的划分构建导航点，`play_order`在遍历中递增
    fn from_planned(planned: &PlannedDivision<'_>, play_order: &mut u32) -> Self {
        *play_order += 1;
        let mut nav_point = NavPoint::new(
            planned.id.clone(),
            *play_order,
            NavLabel::new(planned.title().to_string()),
            NavContent::new(planned.output_file.clone()),
        );
        nav_point.class = Some(planned.division.kind.as_str().to_string());

        for child in &planned.children {
            nav_point.add_child(NavPoint::from_planned(child, play_order));
        }
        nav_point
    }
}

/// 导航地图
#[derive(Debug, Clone, Default)]
pub struct NavMap {
    /// 导航点列表
    pub nav_points: Vec<NavPoint>,
}

impl NavMap {
    /// 创建新的导航地图
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据内容布局构建导航地图，结构与内容树一致，`playOrder`从1开始
    pub fn from_layout(layout: &Layout<'_>) -> Self {
        let mut play_order = 0;
        let mut nav_map = Self::new();
        for planned in &layout.divisions {
            nav_map.add_nav_point(NavPoint::from_planned(planned, &mut play_order));
        }
        nav_map
    }

    /// 添加导航点
    pub fn add_nav_point(&mut self, nav_point: NavPoint) {
        self.nav_points.push(nav_point);
    }

    /// 获取所有导航点的平铺列表（先序）
    pub fn get_all_nav_points(&self) -> Vec<&NavPoint> {
        let mut all_points = Vec::new();
        for nav_point in &self.nav_points {
            all_points.extend(nav_point.get_all_nav_points());
        }
        all_points
    }

    /// 获取导航深度
    pub fn get_depth(&self) -> u32 {
        self.nav_points
            .iter()
            .map(|point| point.get_depth())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Book, Division};
    use crate::epub::naming::Namespace;

    fn sample_book() -> Book {
        let mut book = Book::new();
        book.add_division(
            Division::part("Part One", "part1.html")
                .with_division(Division::chapter("A", "a.html"))
                .with_division(
                    Division::chapter("B", "b.html").with_division(Division::section("B.1", "b1.html")),
                ),
        );
        book.add_division(Division::appendix("Notes", "notes.html"));
        book
    }

    #[test]
    fn test_nav_map_mirrors_tree() {
        let book = sample_book();
        let layout = Layout::plan(&book, &mut Namespace::default());
        let nav_map = NavMap::from_layout(&layout);

        assert_eq!(nav_map.nav_points.len(), 2);
        let part = &nav_map.nav_points[0];
        assert_eq!(part.nav_label.text, "Part One");
        assert_eq!(part.content.src, "part1.xhtml");
        assert_eq!(part.class.as_deref(), Some("part"));
        assert_eq!(part.children.len(), 2);
        assert_eq!(part.children[1].children[0].id, "b1");
        assert_eq!(nav_map.nav_points[1].class.as_deref(), Some("appendix"));
    }

    #[test]
    fn test_play_order_is_contiguous_preorder() {
        let book = sample_book();
        let layout = Layout::plan(&book, &mut Namespace::default());
        let nav_map = NavMap::from_layout(&layout);

        let orders: Vec<u32> = nav_map
            .get_all_nav_points()
            .iter()
            .map(|point| point.play_order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);

        let ids: Vec<&str> = nav_map
            .get_all_nav_points()
            .iter()
            .map(|point| point.id.as_str())
            .collect();
        assert_eq!(ids, vec!["part1", "a", "b", "b1", "notes"]);
    }

    #[test]
    fn test_depth() {
        let book = sample_book();
        let layout = Layout::plan(&book, &mut Namespace::default());
        assert_eq!(NavMap::from_layout(&layout).get_depth(), 3);
        assert_eq!(NavMap::new().get_depth(), 0);
    }
}
