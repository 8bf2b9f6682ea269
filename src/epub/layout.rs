//! 内容布局模块
//!
//! 一次生成过程开始时，为内容树中的每个划分分配XML标识符和输出文件名。
//! 分配按先序进行，冲突时由 [`Namespace`] 追加后缀，因此结果是确定的。

use crate::book::{Book, Division};
use crate::epub::naming::{Namespace, identifier_for};

/// 已分配名称的内容划分
#[derive(Debug)]
pub struct PlannedDivision<'b> {
    /// 原始划分
    pub division: &'b Division,
    /// XML标识符
    pub id: String,
    /// 包内输出文件，`{id}.xhtml`
    pub output_file: String,
    /// 子划分
    pub children: Vec<PlannedDivision<'b>>,
}

impl<'b> PlannedDivision<'b> {
    fn plan(division: &'b Division, namespace: &mut Namespace) -> Self {
        let file_name = division
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = namespace.claim_id(&identifier_for(&file_name));
        let output_file = format!("{}.xhtml", id);

        let children = division
            .divisions
            .iter()
            .map(|child| PlannedDivision::plan(child, namespace))
            .collect();

        Self {
            division,
            id,
            output_file,
            children,
        }
    }

    pub fn title(&self) -> &str {
        &self.division.title
    }

    fn walk<'s>(&'s self, visit: &mut impl FnMut(&'s PlannedDivision<'b>)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// 一次生成过程的内容布局
#[derive(Debug)]
pub struct Layout<'b> {
    pub divisions: Vec<PlannedDivision<'b>>,
}

impl<'b> Layout<'b> {
    /// 为书籍的全部内容划分分配名称
    pub fn plan(book: &'b Book, namespace: &mut Namespace) -> Self {
        let divisions = book
            .divisions
            .iter()
            .map(|division| PlannedDivision::plan(division, namespace))
            .collect();
        Self { divisions }
    }

    /// 先序遍历
    pub fn walk<'s>(&'s self, visit: &mut impl FnMut(&'s PlannedDivision<'b>)) {
        for division in &self.divisions {
            division.walk(visit);
        }
    }

    /// 划分总数
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
}
