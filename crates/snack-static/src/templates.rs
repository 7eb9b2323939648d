//! Template engine for rendering the site page.

use std::path::Path;

use minijinja::{context, path_loader, Environment, Value};
use snack_content::Page;

/// Context for rendering the page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Site title, used for the document title
    pub site_title: String,
    /// Base URL all links are prefixed with
    pub base_url: String,
    /// Hero heading text
    pub hero_title: String,
    /// Hero subheading text
    pub hero_subtitle: String,
    /// Rendered social link markup
    pub social_links: String,
    /// Extra scripts to include before `</body>`
    pub scripts: Vec<String>,
}

impl Context {
    /// Build a context from the loaded page.
    pub fn from_page(page: &Page, site_title: &str, base_url: &str) -> Self {
        Self {
            site_title: site_title.to_string(),
            base_url: base_url.to_string(),
            hero_title: page.hero_title().text().to_string(),
            hero_subtitle: page.hero_subtitle().text().to_string(),
            social_links: page.social_links().inner_html(),
            scripts: Vec::new(),
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        Self { env }
    }

    /// Create a template engine that loads templates from `dir`.
    ///
    /// The directory must provide `index.html`; it may extend or include other
    /// templates from the same directory.
    pub fn with_template_dir(dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(dir));
        Self { env }
    }

    /// Render the site page.
    ///
    /// Hero text is escaped; the social markup, base URL and script paths are
    /// inserted verbatim.
    pub fn render_page(&self, context: &Context) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            site_title => &context.site_title,
            base_url => Value::from_safe_string(context.base_url.clone()),
            hero_title => &context.hero_title,
            hero_subtitle => &context.hero_subtitle,
            social_links => Value::from_safe_string(context.social_links.clone()),
            scripts => context
                .scripts
                .iter()
                .map(|s| Value::from_safe_string(s.clone()))
                .collect::<Vec<_>>(),
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ site_title }}</title>
  <link rel="stylesheet" href="{{ base_url }}assets/main.css">
</head>
<body>
  {% block content %}{% endblock %}
  {% for script in scripts %}<script src="{{ script }}"></script>
  {% endfor %}
</body>
</html>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="hero">
  <h1 id="hero-title">{{ hero_title }}</h1>
  <p id="hero-subtitle">{{ hero_subtitle }}</p>
</header>

<footer id="social-links" class="footer">
  <div class="flex">{{ social_links }}</div>
</footer>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn context() -> Context {
        Context {
            site_title: "Snacks".to_string(),
            base_url: "/blog/".to_string(),
            hero_title: "Hello <world>".to_string(),
            hero_subtitle: "Sub".to_string(),
            social_links: r#"<a href="https://x" aria-label="X"></a>"#.to_string(),
            scripts: vec!["/__hmr.js".to_string()],
        }
    }

    #[test]
    fn renders_builtin_page() {
        let html = TemplateEngine::new().render_page(&context()).unwrap();

        assert!(html.contains(r#"<h1 id="hero-title">Hello &lt;world&gt;</h1>"#));
        assert!(html.contains(r#"<p id="hero-subtitle">Sub</p>"#));
        assert!(html.contains(r#"<a href="https://x" aria-label="X"></a>"#));
        assert!(html.contains("/blog/assets/main.css"));
        assert!(html.contains(r#"<script src="/__hmr.js"></script>"#));
    }

    #[test]
    fn loads_templates_from_directory() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("index.html"),
            "<h1 id=\"hero-title\">{{ hero_title }}</h1>",
        )
        .unwrap();

        let html = TemplateEngine::with_template_dir(temp.path())
            .render_page(&context())
            .unwrap();

        assert_eq!(html, "<h1 id=\"hero-title\">Hello &lt;world&gt;</h1>");
    }

    #[test]
    fn missing_template_is_an_error() {
        let temp = tempdir().unwrap();
        let result = TemplateEngine::with_template_dir(temp.path()).render_page(&context());
        assert!(result.is_err());
    }
}
