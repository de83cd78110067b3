// ==========================================
// 正文标题提取
// ==========================================
// Markdown 标题 + 内嵌 HTML <h1>..<h6> 块
// ==========================================

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// 提取正文中全部标题文本（按出现顺序）
///
/// HTML 块按行产出事件,行内 HTML 与文字交替产出;
/// 二者都先缓冲,到块/段落结束再整体识别 <hN>
pub fn extract_headings(content: &str) -> Vec<String> {
    let mut headings = Vec::new();
    let mut current: Option<String> = None;
    let mut html = String::new();

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::End(TagEnd::Heading(_)) => {
                if let Some(text) = current.take() {
                    headings.push(text.trim().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => match current.as_mut() {
                Some(buf) => buf.push_str(&text),
                None if !html.is_empty() => html.push_str(&text),
                None => {}
            },
            Event::Html(fragment) | Event::InlineHtml(fragment) => {
                if current.is_none() {
                    html.push_str(&fragment);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if current.is_none() && !html.is_empty() {
                    html.push('\n');
                }
            }
            Event::End(TagEnd::HtmlBlock) | Event::End(TagEnd::Paragraph) => {
                flush_html(&mut html, &mut headings);
            }
            _ => {}
        }
    }
    flush_html(&mut html, &mut headings);

    headings
}

fn flush_html(html: &mut String, headings: &mut Vec<String>) {
    if !html.is_empty() {
        headings.extend(html_headings(html));
        html.clear();
    }
}

/// 从 HTML 片段中提取 <hN>...</hN> 文本,忽略内部标签
fn html_headings(html: &str) -> Vec<String> {
    let lowered = html.to_ascii_lowercase();
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = lowered[cursor..].find("<h") {
        let start = cursor + offset;
        let level = lowered[start + 2..].chars().next();
        if !matches!(level, Some('1'..='6')) {
            cursor = start + 2;
            continue;
        }

        let open_end = match lowered[start..].find('>') {
            Some(i) => start + i + 1,
            None => break,
        };
        let close = match lowered[open_end..].find("</h") {
            Some(i) => open_end + i,
            None => break,
        };

        let text = strip_tags(&html[open_end..close]);
        found.push(text.split_whitespace().collect::<Vec<_>>().join(" "));
        cursor = close + 3;
    }

    found
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}
