/// 按字符数截取前缀，不会切断多字节字符
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// 截取前缀并总是追加省略标记，表示这是原文摘录而非完整文本
pub fn excerpt_with_marker(text: &str, max_chars: usize, marker: &str) -> String {
    format!("{}{}", truncate_chars(text, max_chars), marker)
}
