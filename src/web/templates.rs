use std::borrow::Cow;

use chrono::{Datelike, Utc};

const PAGE_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: Arial, sans-serif; margin: 0; background: #f8fafc; color: #141414; }
        main { max-width: 700px; margin: 40px auto; padding: 0 1rem; text-align: center; box-sizing: border-box; }
        h1 { color: #141414; }
        .picker { margin-top: 20px; }
        button { margin: 10px; padding: 8px 14px; background-color: #3b3b3b; color: #ffffff; border: none; font-weight: bold; border-radius: 6px; cursor: pointer; min-width: 20%; }
        button:disabled { opacity: 0.6; cursor: not-allowed; }
        .error { color: red; margin-top: 10px; }
        .selected { color: #475569; font-size: 0.95rem; }
        .results { margin-top: 30px; text-align: left; }
        table { width: 100%; border-collapse: collapse; margin-top: 10px; background: #ffffff; }
        th { background-color: #636363; color: #ffffff; border: 1px solid #636363; padding: 8px; }
        td { border: 1px solid #636363; padding: 8px; }
        .export { margin-top: 30px; text-align: left; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 768px) {
            main { margin: 20px auto; }
            table { font-size: 0.9rem; }
            th, td { padding: 0.5rem; }
        }
"#;

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub page_heading: &'a str,
    pub body_html: Cow<'a, str>,
    pub footer_html: Cow<'a, str>,
    pub extra_style_blocks: Vec<Cow<'a, str>>,
    pub body_scripts: Vec<Cow<'a, str>>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        page_heading,
        body_html,
        footer_html,
        extra_style_blocks,
        body_scripts,
    } = layout;

    let styles = std::iter::once(Cow::Borrowed(PAGE_BASE_STYLES))
        .chain(extra_style_blocks)
        .map(|block| block.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    let scripts = body_scripts
        .into_iter()
        .map(|script| script.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
{styles}
    </style>
</head>
<body>
    <main>
        <h1>{page_heading}</h1>
{body_html}
        {footer_html}
    </main>
{scripts}
</body>
</html>"#,
    )
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} Glad Connect</footer>"#,
        year = current_year
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn layout_includes_heading_body_and_extra_blocks() {
        let html = render_page(PageLayout {
            meta_title: "Title",
            page_heading: "Heading",
            body_html: Cow::Borrowed("<p id=\"body\"></p>"),
            footer_html: Cow::Owned(render_footer()),
            extra_style_blocks: vec![Cow::Borrowed(".extra { color: blue; }")],
            body_scripts: vec![Cow::Borrowed("<script>void 0;</script>")],
        });

        assert!(html.contains("<title>Title</title>"));
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<p id=\"body\"></p>"));
        assert!(html.contains(".extra { color: blue; }"));
        assert!(html.contains("<script>void 0;</script>"));
        assert!(html.contains("app-footer"));
    }
}
