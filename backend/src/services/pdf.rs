//! Timesheet PDF rendering.
//!
//! The approval state machine only depends on the [`TimesheetPdfRenderer`]
//! trait; where the artifact ends up (local disk here, object storage in a
//! larger deployment) is a collaborator concern. Renders are idempotent:
//! the same timesheet and variant always produce the same artifact path, so
//! a retry after a failed approval overwrites rather than duplicates.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::shift::RoleCode;

#[derive(Debug, Error)]
pub enum PdfRenderError {
    #[error("failed to write timesheet document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which milestone of the approval pipeline the document captures.
pub enum PdfVariant {
    /// Snapshot at submission, no signatures.
    Unsigned,
    /// After company approval, carries the company signature.
    Signed,
    /// After manager approval, carries both signatures.
    Final,
}

impl PdfVariant {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            PdfVariant::Unsigned => "unsigned",
            PdfVariant::Signed => "signed",
            PdfVariant::Final => "final",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            PdfVariant::Unsigned => "TIMESHEET (UNSIGNED)",
            PdfVariant::Signed => "TIMESHEET (COMPANY APPROVED)",
            PdfVariant::Final => "TIMESHEET (FINAL)",
        }
    }
}

/// One worker's row on the rendered timesheet.
#[derive(Debug, Clone)]
pub struct WorkerLine {
    pub worker_name: String,
    pub role: RoleCode,
    pub hours: f64,
}

/// Everything the renderer needs, already loaded; the renderer itself does
/// no database access.
#[derive(Debug, Clone)]
pub struct TimesheetDocument {
    pub timesheet_id: String,
    pub variant: PdfVariant,
    pub company_name: String,
    pub job_name: String,
    pub shift_date: NaiveDate,
    pub lines: Vec<WorkerLine>,
    pub company_signature: Option<String>,
    pub manager_signature: Option<String>,
}

impl TimesheetDocument {
    /// Flattens the document into the text lines printed on the page.
    fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.variant.title().to_string(),
            format!("Company: {}", self.company_name),
            format!("Job: {}", self.job_name),
            format!("Shift date: {}", self.shift_date),
            String::new(),
        ];
        for line in &self.lines {
            lines.push(format!(
                "{}  -  {}  -  {:.2} h",
                line.worker_name,
                line.role.label(),
                line.hours
            ));
        }
        let total: f64 = self.lines.iter().map(|l| l.hours).sum();
        lines.push(String::new());
        lines.push(format!("Total hours: {:.2}", total));
        lines.push(String::new());
        lines.push(signature_line("Company", self.company_signature.as_deref()));
        lines.push(signature_line("Manager", self.manager_signature.as_deref()));
        lines
    }
}

fn signature_line(label: &str, signature: Option<&str>) -> String {
    match signature {
        Some(sig) => {
            let display: String = sig.chars().take(60).collect();
            format!("{} signature: {}", label, display)
        }
        None => format!("{} signature: ____________________", label),
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimesheetPdfRenderer: Send + Sync {
    /// Renders the document and returns an opaque artifact reference.
    async fn render(&self, document: &TimesheetDocument) -> Result<String, PdfRenderError>;
}

/// Renderer that writes single-page PDFs under a local directory.
#[derive(Debug, Clone)]
pub struct FilePdfRenderer {
    output_dir: PathBuf,
}

impl FilePdfRenderer {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Deterministic artifact path for a timesheet and variant; re-renders
    /// land on the same file.
    pub fn artifact_path(&self, timesheet_id: &str, variant: PdfVariant) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.pdf", timesheet_id, variant.file_suffix()))
    }
}

#[async_trait]
impl TimesheetPdfRenderer for FilePdfRenderer {
    async fn render(&self, document: &TimesheetDocument) -> Result<String, PdfRenderError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.artifact_path(&document.timesheet_id, document.variant);
        let bytes = build_pdf(&document.text_lines());
        tokio::fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Builds a minimal single-page PDF (Helvetica, US Letter) from text lines.
pub fn build_pdf(lines: &[String]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 10 Tf\n14 TL\n72 740 Td\n");
    for line in lines {
        content.push_str(&format!("({}) Tj\nT*\n", escape_pdf_text(line)));
    }
    content.push_str("ET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, body).as_bytes());
    }
    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn escape_pdf_text(text: &str) -> String {
    text.chars()
        .flat_map(|c| match c {
            '(' => vec!['\\', '('],
            ')' => vec!['\\', ')'],
            '\\' => vec!['\\', '\\'],
            c if c.is_ascii() => vec![c],
            // Helvetica with the default encoding cannot show arbitrary
            // unicode; fall back to a placeholder.
            _ => vec!['?'],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(variant: PdfVariant) -> TimesheetDocument {
        TimesheetDocument {
            timesheet_id: "ts-1".into(),
            variant,
            company_name: "Acme Events".into(),
            job_name: "Arena load-in".into(),
            shift_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            lines: vec![WorkerLine {
                worker_name: "Jo".into(),
                role: RoleCode::Stagehand,
                hours: 8.0,
            }],
            company_signature: Some("Jane Foreman".into()),
            manager_signature: None,
        }
    }

    #[test]
    fn build_pdf_emits_a_wellformed_header_and_trailer() {
        let bytes = build_pdf(&["hello".to_string()]);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(hello) Tj"));
        assert!(text.contains("/Root 1 0 R"));
    }

    #[test]
    fn pdf_text_is_escaped() {
        assert_eq!(escape_pdf_text("a(b)c\\d"), "a\\(b\\)c\\\\d");
        assert_eq!(escape_pdf_text("café"), "caf?");
    }

    #[test]
    fn document_lines_include_signatures_when_present() {
        let lines = document(PdfVariant::Signed).text_lines();
        assert!(lines.iter().any(|l| l.contains("Jane Foreman")));
        assert!(lines
            .iter()
            .any(|l| l.contains("Manager signature: ____")));
        assert_eq!(lines[0], "TIMESHEET (COMPANY APPROVED)");
    }

    #[test]
    fn artifact_paths_are_stable_per_variant() {
        let renderer = FilePdfRenderer::new(PathBuf::from("/tmp/pdfs"));
        let a = renderer.artifact_path("ts-1", PdfVariant::Signed);
        let b = renderer.artifact_path("ts-1", PdfVariant::Signed);
        assert_eq!(a, b);
        assert_ne!(a, renderer.artifact_path("ts-1", PdfVariant::Final));
    }
}
