//! Stylesheet generation and minification.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Page layout plus the handful of utility classes the social links use.
const DEFAULT_CSS: &str = r#"/* staticsnack default theme */

:root {
  --background: #0f0f14;
  --foreground: #f4f4f5;
  --muted: #a1a1aa;
  --accent: #9333ea;
  --surface: #1f2937;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
  min-height: 100vh;
  display: flex;
  flex-direction: column;
}

/* Hero */
.hero {
  flex: 1;
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: center;
  text-align: center;
  padding: 6rem 1.5rem;
}

#hero-title {
  font-size: 3rem;
  font-weight: 800;
  margin-bottom: 1rem;
}

#hero-subtitle {
  font-size: 1.25rem;
  color: var(--muted);
}

/* Footer */
.footer {
  padding: 2rem 1.5rem;
  border-top: 1px solid var(--surface);
}

.footer > .flex {
  justify-content: center;
  gap: 1rem;
}

/* Utilities used by social links */
.flex { display: flex; }
.items-center { align-items: center; }
.justify-center { justify-content: center; }
.w-10 { width: 2.5rem; }
.h-10 { height: 2.5rem; }
.rounded-full { border-radius: 9999px; }
.bg-gray-800 { background: var(--surface); }
.hover\:bg-purple-600:hover { background: var(--accent); }
.transition { transition: background 0.15s; }
.text-lg { font-size: 1.125rem; }

a {
  color: var(--foreground);
  text-decoration: none;
}

@media (max-width: 640px) {
  #hero-title {
    font-size: 2rem;
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(":root"));
        assert!(css.contains("#hero-title"));
        assert!(css.contains(".rounded-full"));
    }

    #[test]
    fn minifies_css() {
        let css = r#"
.hero {
    background-color: blue;
    padding: 10px;
}
        "#;

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".hero"));
    }

    #[test]
    fn default_css_minifies() {
        let minified = AssetPipeline::minify_css(&AssetPipeline::generate_css()).unwrap();
        assert!(minified.contains("#hero-title"));
    }
}
