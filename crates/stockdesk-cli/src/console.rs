//! Line-oriented [`View`] for the `research` subcommand.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use stockdesk_engine::{
    ErrorNotice, Progress, QuotaLevel, QuotaStatus, ReportCard, ReportFormat, StageStatus, View,
    ViewKind,
};
use stockdesk_tui::text::render_markdown;
use tracing::debug;

/// Prints the report to `out` and status lines to `status`.
pub struct ConsoleView<O, S> {
    out: Mutex<O>,
    status: Mutex<S>,
}

impl<O: Write + Send, S: Write + Send> ConsoleView<O, S> {
    pub fn new(out: O, status: S) -> Self {
        Self {
            out: Mutex::new(out),
            status: Mutex::new(status),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> (O, S) {
        (
            self.out.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.status.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }

    fn status_line(&self, line: &str) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(status, "{line}");
    }

    fn print_report(&self, card: &ReportCard) -> std::io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{} [{}]", card.heading(), card.badge())?;
        if let Some(notice) = &card.notice {
            writeln!(out, "{notice}")?;
        }
        writeln!(out)?;
        match card.format {
            ReportFormat::Plain => writeln!(out, "{}", card.content)?,
            ReportFormat::Markdown => {
                for line in render_markdown(&card.content) {
                    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                    writeln!(out, "{text}")?;
                }
            }
        }
        out.flush()
    }
}

impl<O: Write + Send, S: Write + Send> View for ConsoleView<O, S> {
    fn show(&self, kind: ViewKind) {
        debug!(%kind, "Showing section");
    }

    fn set_loading(&self, ticker: &str, progress: &Progress) {
        self.status_line(&format!("Researching {ticker}..."));
        self.set_progress(progress);
    }

    fn set_progress(&self, progress: &Progress) {
        if let Some((label, _)) = progress
            .stages()
            .find(|(_, status)| *status == StageStatus::Active)
        {
            self.status_line(&format!("  {label}"));
        }
    }

    fn set_report(&self, card: &ReportCard) {
        if let Err(e) = self.print_report(card) {
            self.status_line(&format!("Failed to print report: {e}"));
        }
    }

    fn set_error(&self, notice: &ErrorNotice) {
        self.status_line(&format!("{}: {}", notice.title, notice.message));
    }

    fn set_quota(&self, quota: QuotaStatus, level: QuotaLevel) {
        let suffix = match level {
            QuotaLevel::Normal => "",
            QuotaLevel::Warning => " (last one)",
            QuotaLevel::Empty => " (none left today)",
        };
        self.status_line(&format!(
            "Quota: {}/{} remaining{suffix}",
            quota.remaining, quota.total
        ));
    }

    fn flag_invalid_input(&self) {
        self.status_line("Ticker is empty");
    }

    fn set_input(&self, _text: &str) {}

    fn clear_input(&self) {}

    fn focus_input(&self) {}

    fn scroll_to_top(&self) {}

    fn scroll_report_into_view(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(format: ReportFormat) -> ReportCard {
        ReportCard {
            ticker: "2330".into(),
            name: Some("TSMC".into()),
            cached: true,
            notice: Some("From today's cache".into()),
            content: "# Outlook\n\n- **Strong** demand".into(),
            format,
        }
    }

    fn output(view: ConsoleView<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, status) = view.into_inner();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(status).unwrap(),
        )
    }

    #[test]
    fn test_markdown_report_printed_as_text() {
        let view = ConsoleView::new(Vec::new(), Vec::new());
        view.set_report(&card(ReportFormat::Markdown));

        let (out, _) = output(view);
        assert!(out.starts_with("2330 TSMC [Cached report]\nFrom today's cache\n"));
        assert!(out.contains("Outlook\n"));
        assert!(out.contains("• Strong demand"));
        assert!(!out.contains("**"));
    }

    #[test]
    fn test_plain_report_printed_raw() {
        let view = ConsoleView::new(Vec::new(), Vec::new());
        view.set_report(&card(ReportFormat::Plain));

        let (out, _) = output(view);
        assert!(out.contains("# Outlook"));
        assert!(out.contains("- **Strong** demand"));
    }

    #[test]
    fn test_status_lines() {
        let view = ConsoleView::new(Vec::new(), Vec::new());
        let progress = Progress::new(vec!["Fetching market data".into(), "Writing".into()], 0);
        view.set_loading("2454", &progress);
        view.set_error(&ErrorNotice::new("Quota exceeded", "Try tomorrow"));
        view.set_quota(QuotaStatus { remaining: 0, total: 3 }, QuotaLevel::Empty);

        let (out, status) = output(view);
        assert!(out.is_empty());
        assert_eq!(
            status,
            "Researching 2454...\n  Fetching market data\nQuota exceeded: Try tomorrow\nQuota: 0/3 remaining (none left today)\n"
        );
    }
}
