//! Inline stylesheet shared by every page

use crate::config::ThemeConfig;

const STYLESHEET: &str = r#"
body {
  max-width: 65ch;
  margin: 15px;
  padding: 0;
  font-family: {{font_family}};
  font-size: 13px;
  line-height: 1.5;
  background: {{background}};
  color: {{text}};
  text-rendering: optimizeLegibility;
  -webkit-font-smoothing: antialiased;
}
* {
  box-sizing: border-box;
}
a, a:hover, a:visited, nav a:visited {
  color: {{link}};
  text-decoration: underline;
}
pre, code {
  font-family: inherit;
  background: #111111;
  color: #ffffff;
  padding: 1em;
  margin: 1em 0;
  overflow-x: auto;
  font-size: inherit;
  line-height: inherit;
  white-space: pre;
}
code {
  padding: 0.2em;
  margin: 0;
  background: #111111;
}
pre code {
  padding: 0;
  background: none;
}
h1, h2, h3 {
  font-size: inherit;
  font-weight: inherit;
  margin: 1.5em 0 0.2em;
}

.h1-box {
  margin: 0;
  padding: 0;
  font-family: inherit;
  font-size: inherit;
  line-height: inherit;
  background: none;
  color: inherit;
  white-space: pre;
}

.h2-box {
  margin: 0;
  padding: 0;
  font-family: inherit;
  font-size: inherit;
  line-height: inherit;
  background: none;
  color: inherit;
  white-space: pre;
}

h3 u {
  text-decoration: underline;
  text-underline-offset: 0.2em;
  opacity: 0.8;
}

h1 + p, h2 + p, h3 + p {
  margin-top: 1em;
}
.post-preview {
  margin: 1.5em 0;
}
.post-preview h2 {
  margin: 0;
}
.post-preview .metadata {
  margin: 0.2em 0;
}
.post-preview .tags {
  margin-top: 0.2em;
  display: block;
}
.tags span {
  margin-right: 1em;
}
.metadata {
  margin: 0 0 2em 0;
}
.tags {
  margin: 0;
}
.tags span {
  margin-right: 1em;
}
nav {
  margin: 0 0 2em 0;
  text-transform: lowercase;
}
nav a {
  margin-right: 1.5em;
}
.divider {
  white-space: pre;
  color: {{text}};
  opacity: 0.5;
  margin: 1.5em 0;
}
.pagination {
  margin: 2em 0;
}
.pagination a, .pagination span {
  margin-right: 1em;
}
.current-page {
  color: {{text}};
  opacity: 0.5;
}
p {
  margin: 1em 0;
}
.toc {
  margin: 2em 0;
}
.toc-item {
  margin: 0.5em 0;
}
.toc-item a {
  text-decoration: none;
}
.toc-item a:hover {
  text-decoration: underline;
}
.draft-notice {
  color: {{text}};
  opacity: 0.7;
  margin: 1em 0;
}
.draft-tag {
  opacity: 0.7;
  margin-left: 1em;
}
.ascii-title {
  margin: 0 0 1em 0;
  padding: 0;
  font-family: inherit;
  font-size: 0.8em;
  line-height: 1.2;
  background: none;
  color: inherit;
  white-space: pre;
  display: block;
}

.ascii-title a {
  color: inherit;
  text-decoration: none;
}
h1 {
  margin: 0 0 0.5em 0;
}

ul {
  list-style: square;
  padding-left: 15px;
  margin: 1em 0;
}

ul ul {
  padding-left: 2em;
}

li {
  margin: 0.5em 0;
}

pre {
  font-family: inherit;
  background: #111111;
  color: #ffffff;
  padding: 1em;
  margin: 1em 0;
  overflow-x: auto;
  font-size: inherit;
  line-height: 1.4;
  white-space: pre;
}

pre code {
  padding: 0;
  margin: 0;
  font-size: inherit;
  line-height: inherit;
  white-space: pre;
  background: none;
  border: none;
  display: block;
}

code {
  font-family: inherit;
  background: #111111;
  color: #ffffff;
  padding: 0.2em;
  margin: 0;
  font-size: inherit;
  line-height: inherit;
  white-space: pre;
}
"#;

/// Fill the theme colors and font into the stylesheet
pub fn stylesheet(theme: &ThemeConfig) -> String {
    STYLESHEET
        .replace("{{font_family}}", &theme.font_family)
        .replace("{{background}}", &theme.background)
        .replace("{{text}}", &theme.text)
        .replace("{{link}}", &theme.link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_applied() {
        let theme = ThemeConfig {
            font_family: "\"Iosevka\", monospace".to_string(),
            background: "#101010".to_string(),
            text: "#eeeeee".to_string(),
            link: "#88ccff".to_string(),
        };
        let css = stylesheet(&theme);
        assert!(css.contains("font-family: \"Iosevka\", monospace;"));
        assert!(css.contains("background: #101010;"));
        assert!(css.contains("color: #88ccff;"));
        assert!(!css.contains("{{"));
    }
}
