//! HTML report generation
//!
//! Produces an email-friendly HTML document: one table row per target with
//! its summary sentence and linked findings.

use crate::checker::{ErrorCategory, ResultSet};
use crate::output::traits::{ordered_findings, summary_sentence, Reporter, NO_FINDINGS_TEXT};

const ERROR_COLOR: &str = "#d80d0d";
const WARNING_COLOR: &str = "#e27600";

/// Reporter producing HTML email bodies
#[derive(Debug, Clone, Default)]
pub struct HtmlReporter {
    footer: Option<String>,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a small footer line (e.g. the configuration hash) to each document
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

impl Reporter for HtmlReporter {
    fn render_target(&self, target_name: &str, results: &ResultSet) -> String {
        if results.url_count() == 0 {
            return String::new();
        }

        let mut findings = String::new();
        for finding in ordered_findings(results) {
            let color = match finding.category() {
                ErrorCategory::HttpWarning => WARNING_COLOR,
                _ => ERROR_COLOR,
            };
            findings.push_str(&format!(
                "<a title=\"{}\" href=\"{}\" style=\"color: {};\">{}</a> <br /> {} <br /> <br />\n",
                escape_html(&finding.category().to_string()),
                escape_html(finding.url()),
                color,
                escape_html(finding.url()),
                escape_html(finding.message())
            ));
        }
        if findings.is_empty() {
            findings.push_str(NO_FINDINGS_TEXT);
        }

        let mut row = String::new();
        row.push_str("<tr>\n");
        row.push_str("  <td style=\"vertical-align:top;padding:35px 20px;font-family:Lato, Tahoma, sans-serif;font-size:12px;\">\n");
        row.push_str(&format!(
            "    <h2 style=\"color: #757575; line-height: 100%;\">{}</h2>\n",
            escape_html(target_name)
        ));
        row.push_str(&format!("    <p>{}</p>\n", summary_sentence(results)));
        row.push_str("  </td>\n");
        row.push_str("  <td style=\"vertical-align:top;padding:35px 20px;font-family:Ubuntu, Helvetica, Arial, sans-serif;font-size:12px;\">\n");
        row.push_str(&format!("    <p>\n{}</p>\n", findings));
        row.push_str("  </td>\n");
        row.push_str("</tr>\n");
        row
    }

    fn render_document(&self, body: &str, title: &str) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("  <meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\">\n");
        html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
        html.push_str("</head>\n<body style=\"background: #FFFFFF; margin: 0; padding: 0;\">\n");

        // Preview text shown by mail clients next to the subject
        html.push_str(&format!(
            "<div style=\"display: none; max-height: 0px; overflow: hidden;\">{}</div>\n",
            escape_html(title)
        ));

        html.push_str("<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" style=\"background:#000b29;width:100%;\">\n");
        html.push_str("  <tr><td align=\"center\" style=\"padding:50px 20px;color:#FFFFFF;font-family:Lato, Tahoma, sans-serif;\">\n");
        html.push_str("    <h1 style=\"font-size: 32px; line-height: 100%;\">Landing Page Monitor</h1>\n");
        html.push_str(&format!("    <p style=\"font-size: 14px;\">{}</p>\n", escape_html(title)));
        html.push_str("  </td></tr>\n</table>\n");

        html.push_str("<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" align=\"center\" style=\"max-width:600px;width:100%;\">\n");
        html.push_str("<tbody>\n");
        html.push_str(body);
        html.push_str("</tbody>\n</table>\n");

        if let Some(footer) = &self.footer {
            html.push_str(&format!(
                "<p style=\"color:#9e9e9e;font-size:10px;text-align:center;\">{}</p>\n",
                escape_html(footer)
            ));
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Escapes text for inclusion in HTML content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
