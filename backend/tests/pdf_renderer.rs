//! File-backed PDF renderer behavior, including the idempotent re-render
//! guarantee the approval retry path relies on.

use chrono::NaiveDate;
use crewcall_backend::models::shift::RoleCode;
use crewcall_backend::services::pdf::{
    FilePdfRenderer, PdfVariant, TimesheetDocument, TimesheetPdfRenderer, WorkerLine,
};

fn document(variant: PdfVariant) -> TimesheetDocument {
    TimesheetDocument {
        timesheet_id: "ts-42".to_string(),
        variant,
        company_name: "Acme Events".to_string(),
        job_name: "Arena load-in (night)".to_string(),
        shift_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        lines: vec![
            WorkerLine {
                worker_name: "Jo Rivera".to_string(),
                role: RoleCode::CrewChief,
                hours: 9.5,
            },
            WorkerLine {
                worker_name: "Sam Okafor".to_string(),
                role: RoleCode::Stagehand,
                hours: 8.0,
            },
        ],
        company_signature: Some("Jane Foreman".to_string()),
        manager_signature: None,
    }
}

#[tokio::test]
async fn render_writes_a_pdf_under_the_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FilePdfRenderer::new(dir.path().to_path_buf());

    let url = renderer.render(&document(PdfVariant::Signed)).await.unwrap();
    assert!(url.ends_with("ts-42-signed.pdf"));

    let bytes = std::fs::read(&url).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("Jo Rivera"));
    assert!(text.contains("Jane Foreman"));
}

#[tokio::test]
async fn re_rendering_overwrites_instead_of_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FilePdfRenderer::new(dir.path().to_path_buf());

    let first = renderer.render(&document(PdfVariant::Signed)).await.unwrap();
    let second = renderer.render(&document(PdfVariant::Signed)).await.unwrap();
    assert_eq!(first, second);

    let count = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn variants_produce_distinct_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = FilePdfRenderer::new(dir.path().to_path_buf());

    let unsigned = renderer
        .render(&document(PdfVariant::Unsigned))
        .await
        .unwrap();
    let final_pdf = renderer.render(&document(PdfVariant::Final)).await.unwrap();
    assert_ne!(unsigned, final_pdf);

    let count = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn missing_output_dir_is_created_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deep").join("pdfs");
    let renderer = FilePdfRenderer::new(nested.clone());

    renderer
        .render(&document(PdfVariant::Unsigned))
        .await
        .unwrap();
    assert!(nested.join("ts-42-unsigned.pdf").exists());
}
