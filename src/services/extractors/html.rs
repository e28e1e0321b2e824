//! 页面解析辅助函数

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// 解析 CSS 选择器，非法选择器视为不匹配
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// 元素的全部文本（去除首尾空白）
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// 文档中第一个匹配元素的文本
pub(crate) fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    document.select(&sel).next().map(text_of)
}

/// 在 `th`/`td` 形式的信息表中查找表头包含 `label` 的值
pub(crate) fn table_value(document: &Html, rows_css: &str, label: &str) -> Option<String> {
    let (rows, th, td) = (selector(rows_css)?, selector("th")?, selector("td")?);
    document.select(&rows).find_map(|row| {
        let header = row.select(&th).next().map(text_of)?;
        if header.to_lowercase().contains(label) {
            row.select(&td).next().map(text_of)
        } else {
            None
        }
    })
}

/// URL 的主机是否为 `domain` 或其子域名
pub(crate) fn host_matches(url: &str, domain: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|host| host == domain || host.ends_with(&format!(".{domain}")))
        })
        .unwrap_or(false)
}
