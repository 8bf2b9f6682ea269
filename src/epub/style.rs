//! 样式表模块

use crate::book::Book;

/// 样式表在包内的路径
pub const STYLESHEET_FILE: &str = "css/book.css";

/// 样式表的清单项ID
pub const STYLESHEET_ID: &str = "stylesheet";

/// 内置样式表
const DEFAULT_STYLESHEET: &str = "\
@page {
  margin-top: 0.8em;
  margin-bottom: 0.8em;}

body {
  margin-left: 1em;
  margin-right: 1em;
  padding: 0;}

h2 {
  padding-top:0;
  display:block;}

p {
  margin-top: 0;
  margin-bottom: 0;
  text-indent: 2.0em;
  text-align: justify;}

code {
  text-indent: 0;}

:not(p) + p {text-indent: 0}
body > p:first-child {text-indent: 0}
div.text p:first-child {text-indent: 0}

blockquote p, li p {
  text-align: left;}

div.chapter {padding-top: 3.0em;}
div.part {padding-top: 3.0em;}
h3.section_title {text-align: center;}
";

/// 书籍使用的样式表
///
/// 书籍提供了样式表时原样使用；否则使用内置样式表，并在其后追加附加样式。
pub fn stylesheet_for(book: &Book) -> String {
    if let Some(stylesheet) = &book.stylesheet {
        return stylesheet.clone();
    }

    match &book.extra_stylesheet {
        Some(extra) => format!("{}\n{}", DEFAULT_STYLESHEET, extra),
        None => DEFAULT_STYLESHEET.to_string(),
    }
}
