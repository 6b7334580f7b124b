//! Small HTML building blocks shared by the report sections.

use std::fmt::Write as _;

/// Escape text for HTML element and attribute content
///
/// Device serials and other operator-entered strings are untrusted; every
/// cell the report renders goes through here.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an HTML table from pre-escaped-free header and cell text
///
/// All cells are escaped here; callers pass raw strings.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str("<table>\n  <thead>\n    <tr>");
    for h in headers {
        let _ = write!(out, "<th>{}</th>", escape(h));
    }
    out.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        out.push_str("    <tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape("KPS<3>&\"quoted\"'x'"),
            "KPS&lt;3&gt;&amp;&quot;quoted&quot;&#39;x&#39;"
        );
    }

    #[test]
    fn table_escapes_cells() {
        let html = table(
            &["Serial", "Model"],
            &[vec!["KPS<1>".to_string(), "LifePort & Co".to_string()]],
        );
        assert!(html.contains("<th>Serial</th>"));
        assert!(html.contains("<td>KPS&lt;1&gt;</td>"));
        assert!(html.contains("LifePort &amp; Co"));
        assert!(!html.contains("KPS<1>"));
    }
}
