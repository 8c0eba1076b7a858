//! Fixed HTML document templates.
//!
//! Two templates exist: the styled one handed to the PDF renderer and a
//! lighter one written as the browser-viewable fallback. Neither is
//! configurable beyond the title; the stylesheets are tuned for print.

use crate::pipeline::markdown::escape_html;

/// Stylesheet embedded in the document rendered to PDF.
pub const PDF_STYLESHEET: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
        }

        h1 {
            color: #2c3e50;
            border-bottom: 3px solid #3498db;
            padding-bottom: 10px;
        }

        h2 {
            color: #34495e;
            border-bottom: 1px solid #bdc3c7;
            padding-bottom: 5px;
            margin-top: 30px;
        }

        h3 {
            color: #2980b9;
        }

        code {
            background-color: #f8f9fa;
            padding: 2px 4px;
            border-radius: 3px;
            font-family: 'Consolas', 'Monaco', monospace;
        }

        pre {
            background-color: #f8f9fa;
            border: 1px solid #e9ecef;
            border-radius: 5px;
            padding: 15px;
            overflow-x: auto;
        }

        pre code {
            padding: 0;
            background-color: transparent;
        }

        blockquote {
            border-left: 4px solid #3498db;
            margin: 0;
            padding-left: 20px;
            color: #555;
        }

        table {
            border-collapse: collapse;
            width: 100%;
            margin: 20px 0;
        }

        th, td {
            border: 1px solid #ddd;
            padding: 12px;
            text-align: left;
        }

        th {
            background-color: #f8f9fa;
            font-weight: bold;
        }

        .emoji {
            font-size: 1.2em;
        }

        .toc ul {
            list-style: none;
        }

        ul, ol {
            padding-left: 30px;
        }

        li {
            margin-bottom: 5px;
        }
"#;

/// Inline stylesheet of the browser fallback.
pub const FALLBACK_STYLESHEET: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; margin: 40px; }
        h1 { color: #333; border-bottom: 2px solid #333; }
        h2 { color: #666; }
        code { background: #f4f4f4; padding: 2px 5px; }
        pre { background: #f4f4f4; padding: 10px; overflow-x: auto; }
"#;

/// Full document for the PDF renderer.
///
/// `highlight_css` is the codehilite theme stylesheet, appended after the
/// base rules so token colours win over the generic `code` styling.
pub fn styled_document(title: &str, body: &str, highlight_css: Option<&str>) -> String {
    let mut css = String::from(PDF_STYLESHEET);
    if let Some(extra) = highlight_css {
        css.push_str(extra);
        css.push('\n');
    }
    document(title, &css, body)
}

/// Simpler document written when PDF rendering fails.
pub fn fallback_document(title: &str, body: &str) -> String {
    document(title, FALLBACK_STYLESHEET, body)
}

fn document(title: &str, css: &str, body: &str) -> String {
    let mut out = String::with_capacity(css.len() + body.len() + 256);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"UTF-8\">\n    <title>");
    out.push_str(&escape_html(title));
    out.push_str("</title>\n    <style>");
    out.push_str(css);
    out.push_str("    </style>\n</head>\n<body>\n");
    out.push_str(body);
    out.push_str("</body>\n</html>\n");
    out
}
