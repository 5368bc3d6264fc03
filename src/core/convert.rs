//! HTML to Markdown conversion for notification bodies.
//!
//! Bodies arrive as a small HTML subset (headings, links, emphasis, code,
//! lists, paragraphs, line breaks). Those tags are transcribed to Markdown by
//! an ordered list of substitutions, then every remaining tag is stripped.
//! Link targets are transcribed as-is; protocol filtering happens in the
//! renderer.
//!
//! All patterns run on the `regex` crate's finite automata; there is no
//! backtracking, so adversarial input cannot blow up conversion time.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Converts an HTML fragment into Markdown.
///
/// The output must never contain a tag opener (`<` followed by a letter or
/// `/`). Implementations must be pure: same input, same output.
pub trait HtmlConverter {
    fn convert(&self, html: &str) -> String;
}

/// Ordered regex substitution pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegexConverter;

struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

/// Case-insensitive, `.` matches newlines.
fn pattern(source: &str) -> Regex {
    Regex::new(&format!("(?is){}", source)).expect("static conversion pattern")
}

static HEADINGS: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    std::array::from_fn(|i| pattern(&format!(r"<h{0}\b[^>]*>(.*?)</h{0}\s*>", i + 1)))
});

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r#"<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>(.*?)</a\s*>"#)
});

static SUBSTITUTIONS: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    [
        (r"<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)\s*>", "**${1}**"),
        (r"<(?:em|i)\b[^>]*>(.*?)</(?:em|i)\s*>", "*${1}*"),
        (r"<code\b[^>]*>(.*?)</code\s*>", "`${1}`"),
        (r"</?(?:ul|ol)\b[^>]*>", ""),
        (r"<li\b[^>]*>(.*?)</li\s*>", "- ${1}\n"),
        (r"<p\b[^>]*>(.*?)</p\s*>", "${1}\n\n"),
        (r"<br\b[^>]*>", "\n"),
    ]
    .into_iter()
    .map(|(source, replacement)| Substitution {
        pattern: pattern(source),
        replacement,
    })
    .collect()
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| pattern(r"<[^>]*>"));

impl HtmlConverter for RegexConverter {
    fn convert(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        let mut text = html.to_string();

        for (index, heading) in HEADINGS.iter().enumerate() {
            let marker = "#".repeat(index + 1);
            text = heading
                .replace_all(&text, |caps: &Captures| {
                    format!("{} {}\n\n", marker, caps[1].trim())
                })
                .into_owned();
        }

        text = ANCHOR
            .replace_all(&text, |caps: &Captures| {
                let href = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                format!("[{}]({})", &caps[3], href)
            })
            .into_owned();

        for substitution in SUBSTITUTIONS.iter() {
            text = substitution
                .pattern
                .replace_all(&text, substitution.replacement)
                .into_owned();
        }

        let text = ANY_TAG.replace_all(&text, "");
        strip_dangling_openers(&text)
    }
}

/// Remove every `<` that would start a tag but has no closing `>`.
///
/// A `<` followed by another `<` is removed too, so no removal can leave a
/// new opener behind.
fn strip_dangling_openers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '<' && chars.peek().is_some_and(|next| opens_tag(*next)) {
            continue;
        }
        out.push(c);
    }
    out
}

fn opens_tag(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '/' | '!' | '?' | '<')
}

/// Convert an optional HTML body to Markdown. `None` and `""` yield `""`.
pub fn convert(html: Option<&str>) -> String {
    html.map(convert_str).unwrap_or_default()
}

/// Convert an HTML fragment to Markdown.
pub fn convert_str(html: &str) -> String {
    RegexConverter.convert(html)
}
