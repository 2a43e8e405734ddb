//! The live prompt overview page.

use std::fmt::Write as _;

use axum::extract::State;
use axum::response::Html;
use axum::{Router, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

const PAGE_HEAD: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>Carbot Prompts</title>
    <style>
        body {
            font-family: system-ui, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
            background: #0f172a;
            color: #e5e7eb;
            margin: 0;
            padding: 2rem;
        }
        .container {
            max-width: 960px;
            margin: 0 auto;
        }
        h1 {
            text-align: center;
            margin-bottom: 1rem;
        }
        .subtitle {
            text-align: center;
            color: #9ca3af;
            margin-bottom: 2rem;
            font-size: 0.95rem;
        }
        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
            gap: 1.5rem;
        }
        .card {
            background: #111827;
            border-radius: 0.75rem;
            padding: 1rem 1.25rem;
            box-shadow: 0 10px 30px rgba(0,0,0,0.35);
            border: 1px solid #1f2937;
        }
        .card h2 {
            font-size: 1.1rem;
            margin-top: 0;
            margin-bottom: 0.5rem;
        }
        .card small {
            color: #6b7280;
        }
        ul {
            list-style: none;
            padding-left: 0;
            margin: 0.5rem 0 0;
            max-height: 420px;
            overflow-y: auto;
        }
        li {
            padding: 0.35rem 0;
            border-bottom: 1px solid #1f2937;
            font-size: 0.95rem;
        }
        li:last-child {
            border-bottom: none;
        }
        .index {
            color: #9ca3af;
            font-size: 0.8rem;
            margin-right: 0.5rem;
            opacity: 0.9;
        }
        .footer {
            margin-top: 2rem;
            text-align: center;
            font-size: 0.8rem;
            color: #6b7280;
        }
        .code {
            font-family: ui-monospace, Menlo, Monaco, "SF Mono", monospace;
            background: #111827;
            padding: 0.15rem 0.4rem;
            border-radius: 0.35rem;
            border: 1px solid #1f2937;
        }
    </style>
</head>
<body>
<div class="container">
    <h1>Carbot Prompts</h1>
    <div class="subtitle">
        Live view of the prompts your Discord bot is using.<br />
        Add/remove via slash commands in Discord (e.g. <span class="code">/addtruth</span>, <span class="code">/removetruth</span>).
    </div>
    <div class="grid">
"##;

const PAGE_FOOT: &str = r#"    </div>
    <div class="footer">
        This page is backed by the same store the Discord bot uses.<br />
        Prompts survive restarts through the configured backend.
    </div>
</div>
</body>
</html>
"#;

/// Escapes text for inclusion in HTML body content.
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn push_card(page: &mut String, title: &str, hint: &str, entries: &[String]) {
    let _ = write!(
        page,
        "        <div class=\"card\">\n            <h2>{title}</h2>\n            <small>{hint}</small>\n            <ul>\n"
    );
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            page,
            "                <li><span class=\"index\">#{}</span>{}</li>",
            i + 1,
            html_escape(entry)
        );
    }
    page.push_str("            </ul>\n        </div>\n");
}

fn render_page(truths: &[String], dares: &[String]) -> String {
    let mut page = String::from(PAGE_HEAD);
    push_card(
        &mut page,
        "Truths",
        r#"Use <span class="code">/truth</span> or <span class="code">/addtruth</span> in Discord"#,
        truths,
    );
    push_card(
        &mut page,
        "Dares",
        r#"Use <span class="code">/dare</span> or <span class="code">/adddare</span> in Discord"#,
        dares,
    );
    page.push_str(PAGE_FOOT);
    page
}

/// GET /
async fn home(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let truths = state.store.list_truths().await?;
    let dares = state.store.list_dares().await?;
    Ok(Html(render_page(&truths, &dares)))
}

/// Returns the router for the overview page.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_handles_markup_characters() {
        assert_eq!(
            html_escape(r#"<b>&"quote"'</b>"#),
            "&lt;b&gt;&amp;&quot;quote&quot;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_page_numbers_entries_from_one() {
        let truths = vec!["A".to_owned(), "B".to_owned()];
        let dares = vec!["X <script>".to_owned()];

        let page = render_page(&truths, &dares);

        assert!(page.contains(r##"<span class="index">#1</span>A"##));
        assert!(page.contains(r##"<span class="index">#2</span>B"##));
        assert!(page.contains(r##"<span class="index">#1</span>X &lt;script&gt;"##));
        assert!(!page.contains("<script>"));
    }
}
