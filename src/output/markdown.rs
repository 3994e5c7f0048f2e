//! Markdown report generation

use crate::checker::ResultSet;
use crate::output::traits::{ordered_findings, summary_sentence, Reporter, NO_FINDINGS_TEXT};

/// Reporter producing a plain markdown document
#[derive(Debug, Clone, Default)]
pub struct MarkdownReporter {
    footer: Option<String>,
}

impl MarkdownReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

impl Reporter for MarkdownReporter {
    fn render_target(&self, target_name: &str, results: &ResultSet) -> String {
        if results.url_count() == 0 {
            return String::new();
        }

        let mut md = String::new();
        md.push_str(&format!("## {}\n\n", target_name));
        md.push_str(&format!("{}\n\n", summary_sentence(results)));

        let mut any = false;
        for finding in ordered_findings(results) {
            any = true;
            md.push_str(&format!(
                "- **{}** [{}]({}): {}\n",
                finding.category(),
                finding.url(),
                finding.url(),
                finding.message()
            ));
        }

        if !any {
            md.push_str(NO_FINDINGS_TEXT);
            md.push('\n');
        }
        md.push('\n');
        md
    }

    fn render_document(&self, body: &str, title: &str) -> String {
        let mut md = String::new();
        md.push_str("# Landing Page Monitor\n\n");
        md.push_str(&format!("> {}\n\n", title));
        md.push_str(body);
        if let Some(footer) = &self.footer {
            md.push_str(&format!("---\n\n_{}_\n", footer));
        }
        md
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
