use reqwest::{Client, ClientBuilder, header};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{AppError, Result};

/// Maximum number of characters forwarded to the summarizer.
pub const EXCERPT_BUDGET: usize = 3000;

const USER_AGENT: &str = "Mozilla/5.0";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

// Create static selectors to avoid recompiling them each time
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Fetches `url` and reduces it to a plain-text excerpt of at most
/// [`EXCERPT_BUDGET`] characters.
pub async fn extract_text(url: &str) -> Result<String> {
    let html = fetch_html(url).await?;
    let text = html_to_text(&html);
    tracing::debug!("Extracted {} chars of text from {}", text.chars().count(), url);
    Ok(truncate_to_budget(&text, EXCERPT_BUDGET))
}

pub async fn fetch_html(url: &str) -> Result<String> {
    let response = CLIENT.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::FetchError(format!("HTTP {} for {}", status, url)));
    }

    if let Some(content_type) = response.headers().get(header::CONTENT_TYPE) {
        let content_type = content_type.to_str().unwrap_or_default().to_ascii_lowercase();
        if !is_textual(&content_type) {
            return Err(AppError::FetchError(format!(
                "Unsupported content type {:?} for {}",
                content_type, url
            )));
        }
    }

    let html = response.text().await?;
    Ok(html)
}

fn is_textual(content_type: &str) -> bool {
    content_type.starts_with("text/") || content_type.contains("html") || content_type.contains("xml")
}

/// Paragraph text joined by newlines. Pages without usable paragraphs fall
/// back to the visible text of `<body>`.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH_SELECTOR)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect();

    if !paragraphs.is_empty() {
        return paragraphs.join("\n");
    }

    document
        .select(&BODY_SELECTOR)
        .next()
        .map(|body| format_text(&visible_text(body)))
        .unwrap_or_default()
}

fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        if let Node::Text(chunk) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
            });
            if !hidden {
                text.push_str(chunk);
            }
        }
    }
    text
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drops blank lines and trims the rest.
pub fn format_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(trimmed);
        }
    }

    result
}

/// Cuts `text` to at most `budget` characters, never inside a UTF-8 sequence.
pub fn truncate_to_budget(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn paragraphs_are_joined_line_by_line() {
        let html = r#"<html><head><title>T</title></head><body>
            <nav>Home | About</nav>
            <p>First   paragraph
               spans lines.</p>
            <p>   </p>
            <p>Second with a <a href="/x">link</a> inline.</p>
        </body></html>"#;

        assert_eq!(
            html_to_text(html),
            "First paragraph spans lines.\nSecond with a link inline."
        );
    }

    #[test]
    fn body_text_is_used_when_there_are_no_paragraphs() {
        let html = r#"<html><body>
            <div>Headline here</div>
            <script>var tracking = 1;</script>
            <style>.x { color: red }</style>
            <div>  Body copy  </div>
        </body></html>"#;

        assert_eq!(html_to_text(html), "Headline here\nBody copy");
    }

    #[test]
    fn empty_document_yields_empty_text() {
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn truncation_is_exact_and_char_safe() {
        let long = "é".repeat(EXCERPT_BUDGET + 25);
        let cut = truncate_to_budget(&long, EXCERPT_BUDGET);
        assert_eq!(cut.chars().count(), EXCERPT_BUDGET);

        assert_eq!(truncate_to_budget("short", EXCERPT_BUDGET), "short");
        assert_eq!(truncate_to_budget("abcdef", 3), "abc");
    }

    #[tokio::test]
    async fn extract_text_fetches_and_truncates() {
        let mut server = Server::new_async().await;
        let body = format!("<html><body><p>{}</p></body></html>", "word ".repeat(1000));
        let mock = server
            .mock("GET", "/article")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create_async()
            .await;

        let text = extract_text(&format!("{}/article", server.url())).await.unwrap();

        assert_eq!(text.chars().count(), EXCERPT_BUDGET);
        assert!(text.starts_with("word word"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_status_is_a_fetch_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let result = extract_text(&format!("{}/missing", server.url())).await;

        assert!(matches!(result, Err(AppError::FetchError(msg)) if msg.contains("404")));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn binary_content_is_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/image.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body([0x89, b'P', b'N', b'G'])
            .create_async()
            .await;

        let result = extract_text(&format!("{}/image.png", server.url())).await;

        assert!(matches!(result, Err(AppError::FetchError(_))));
    }
}
