//! Status page rendering.
//!
//! The page is a minijinja template registered under an `.html` name, so
//! every interpolated value is HTML-escaped.

use minijinja::{context, Environment};

const TEMPLATE_NAME: &str = "status.html";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Is {{ subject }} out yet?</title>
</head>
<body>
<center>
<h2>Is {{ subject }} out yet?</h2>
{% if tagged %}<h1><a href="{{ link }}">YES!</a></h1>{% else %}<h1>No. :-(</h1>{% endif %}
</center>
</body>
</html>
"#;

/// The human-readable page served for every request.
pub struct StatusPage {
    env: Environment<'static>,
    subject: String,
    link: String,
}

impl StatusPage {
    /// `subject` completes "Is ... out yet?"; `link` is where "YES!" points.
    pub fn new(subject: impl Into<String>, link: impl Into<String>) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;

        Ok(Self {
            env,
            subject: subject.into(),
            link: link.into(),
        })
    }

    /// Render the page. Falls back to the bare answer if rendering fails.
    pub fn render(&self, tagged: bool) -> String {
        let rendered = self.env.get_template(TEMPLATE_NAME).and_then(|template| {
            template.render(context! {
                subject => &self.subject,
                link => &self.link,
                tagged => tagged,
            })
        });

        match rendered {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(error = %e, "Failed to render status page");
                if tagged { "YES!" } else { "No." }.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tokens() {
        let page = StatusPage::new("Go 1.4", "https://example.com/go1.4").unwrap();

        let yes = page.render(true);
        assert!(yes.contains("<title>Is Go 1.4 out yet?</title>"));
        assert!(yes.contains("<h2>Is Go 1.4 out yet?</h2>"));
        assert!(yes.contains("<a href=\""));
        assert!(yes.contains("example.com"));
        assert!(yes.contains("\">YES!</a>"));
        assert!(!yes.contains("No."));

        let no = page.render(false);
        assert!(no.contains("<h1>No. :-(</h1>"));
        assert!(!no.contains("YES!"));
        assert!(!no.contains("href"));
    }

    #[test]
    fn test_subject_is_escaped() {
        let page = StatusPage::new("<script>\"x\" & y's</script>", "http://t/?a=1&b=2").unwrap();
        let html = page.render(true);

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(" &amp; y"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("\"x\""));
        assert!(!html.contains('\''), "single quote left unescaped: {}", html);
        assert!(html.contains("a=1&amp;b=2"));
    }
}
