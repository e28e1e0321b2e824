//! 时间 / 内存文本解析

/// 将时间字符串解析为毫秒
///
/// 支持 `100ms`、`0.2s` 以及不带单位的毫秒数
pub fn parse_time_to_ms(s: &str) -> Option<i32> {
    let lower = s.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if let Some(num) = lower.strip_suffix("ms") {
        num.trim().parse::<f64>().ok().map(|v| v as i32)
    } else if let Some(num) = lower.strip_suffix('s') {
        num.trim().parse::<f64>().ok().map(|v| (v * 1000.0).round() as i32)
    } else {
        lower.parse::<f64>().ok().map(|v| v as i32)
    }
}

/// 将内存字符串解析为 KB
///
/// 不带单位时按 KB 处理
pub fn parse_mem_to_kb(s: &str) -> Option<i32> {
    let lower = s.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let number = |txt: &str| txt.trim().parse::<f64>().ok();

    if let Some(num) = lower.strip_suffix("mb").or_else(|| lower.strip_suffix('m')) {
        return number(num).map(|v| (v * 1024.0).round() as i32);
    }
    if let Some(num) = lower.strip_suffix("kb").or_else(|| lower.strip_suffix('k')) {
        return number(num).map(|v| v as i32);
    }
    if let Some(num) = lower.strip_suffix('b') {
        return number(num).map(|v| (v / 1024.0) as i32);
    }
    number(&lower).map(|v| v as i32)
}
