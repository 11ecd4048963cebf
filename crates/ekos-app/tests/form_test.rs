//! Integration tests for the report form coordinator: reference loading with
//! the legacy map merge, project→city derivation, create-vs-update
//! submission, and sequential staged uploads with per-file failure capture.

mod helpers;

use ekos_app::{ReportForm, StagedFile};
use ekos_core::models::Role;
use ekos_core::validation::FileSlot;
use helpers::{client_for, report_value};
use mockito::{Matcher, Server};
use serde_json::json;

async fn mock_reference_endpoints(server: &mut Server) {
    server
        .mock("GET", "/api/kategoriler")
        .with_body(
            json!([
                {
                    "id": "k-1",
                    "isim": "Vinç",
                    "alt_kategoriler": ["Kule Vinç"],
                    "created_at": "2025-01-01T00:00:00Z"
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/kategori-alt-kategoriler")
        .with_body(json!({"Vinç": ["Kule Vinç", "Mobil Vinç"]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/api/projeler")
        .with_body(
            json!([
                {
                    "id": "p-1",
                    "proje_adi": "Ankara Konut Projesi",
                    "lokasyon": "Ankara",
                    "created_at": "2025-01-01T00:00:00Z"
                }
            ])
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/sehirler")
        .with_body(json!([{"kod": "ANK", "isim": "Ankara"}, {"kod": "IST", "isim": "İstanbul"}]).to_string())
        .create_async()
        .await;
}

#[tokio::test]
async fn open_merges_legacy_sub_category_map_and_derives_city() {
    let mut server = Server::new_async().await;
    mock_reference_endpoints(&mut server).await;

    let client = client_for(&server.url(), Some(Role::Inspector));
    let mut form = ReportForm::open(client, None).await.unwrap();

    // Legacy endpoint won over the embedded single-entry list.
    form.set_category("Vinç");
    assert_eq!(form.sub_category_options(), ["Kule Vinç", "Mobil Vinç"]);

    // Project "Ankara Konut Projesi" with location "Ankara" fills the city.
    form.set_project("p-1");
    assert_eq!(form.draft().city, "Ankara");
}

#[tokio::test]
async fn create_submits_then_uploads_sequentially_reporting_failures_per_file() {
    let mut server = Server::new_async().await;
    mock_reference_endpoints(&mut server).await;

    let client = client_for(&server.url(), Some(Role::Inspector));
    let mut form = ReportForm::open(client, None).await.unwrap();
    form.set_project("p-1");
    form.set_category("Vinç");
    form.draft_mut().equipment_name = "Kule Vinç".to_string();
    form.draft_mut().firm = "ABC İnşaat".to_string();

    form.stage_image(StagedFile::new("foto.jpg", vec![0xFF, 0xD8]))
        .unwrap();
    form.stage_document(StagedFile::new("belge.pdf", vec![0x25, 0x50]))
        .unwrap();

    let create_mock = server
        .mock("POST", "/api/raporlar")
        .with_body(report_value("r-9").to_string())
        .expect(1)
        .create_async()
        .await;
    let image_upload = server
        .mock("POST", "/api/upload/r-9")
        .match_body(Matcher::Regex("foto.jpg".to_string()))
        .with_body(json!({"message": "Dosya yüklendi", "file_id": "d-1"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let failing_upload = server
        .mock("POST", "/api/upload/r-9")
        .match_body(Matcher::Regex("belge.pdf".to_string()))
        .with_status(400)
        .with_body(json!({"detail": "Dosya kaydedilemedi"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let outcome = form.submit().await.unwrap();
    assert_eq!(outcome.report.id, "r-9");
    assert_eq!(outcome.uploaded, vec!["foto.jpg".to_string()]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].file_name, "belge.pdf");

    create_mock.assert_async().await;
    image_upload.assert_async().await;
    failing_upload.assert_async().await;

    // The record is durable; nothing was rolled back and the form now edits it.
    assert!(form.is_edit());
}

#[tokio::test]
async fn missing_required_fields_fail_before_any_network_call() {
    let mut server = Server::new_async().await;
    mock_reference_endpoints(&mut server).await;
    let create_mock = server
        .mock("POST", "/api/raporlar")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some(Role::Inspector));
    let mut form = ReportForm::open(client, None).await.unwrap();
    let err = form.submit().await.unwrap_err();
    assert!(err.is_local());
    create_mock.assert_async().await;
}

#[tokio::test]
async fn editing_issues_a_full_record_put_against_the_existing_id() {
    let mut server = Server::new_async().await;
    mock_reference_endpoints(&mut server).await;

    let existing: ekos_core::models::Report =
        serde_json::from_value(report_value("r-5")).unwrap();

    let put_mock = server
        .mock("PUT", "/api/raporlar/r-5")
        .match_body(Matcher::PartialJson(json!({
            "ekipman_adi": "Kule Vinç",
            "sehir": "Ankara",
            "firma": "ABC İnşaat"
        })))
        .with_body(report_value("r-5").to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some(Role::Admin));
    let mut form = ReportForm::open(client, Some(&existing)).await.unwrap();
    assert!(form.is_edit());
    let outcome = form.submit().await.unwrap();
    assert_eq!(outcome.report.id, "r-5");
    assert!(outcome.failed.is_empty());
    put_mock.assert_async().await;
}

#[tokio::test]
async fn viewer_cannot_submit() {
    let mut server = Server::new_async().await;
    mock_reference_endpoints(&mut server).await;
    let create_mock = server
        .mock("POST", "/api/raporlar")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some(Role::Viewer));
    let mut form = ReportForm::open(client, None).await.unwrap();
    let err = form.submit().await.unwrap_err();
    assert!(matches!(err, ekos_core::AppError::Forbidden(_)));
    create_mock.assert_async().await;
}

#[tokio::test]
async fn txt_file_is_rejected_for_the_image_slot_with_no_network_call() {
    let mut server = Server::new_async().await;
    mock_reference_endpoints(&mut server).await;
    let upload_mock = server
        .mock("POST", Matcher::Regex("/api/upload/.*".to_string()))
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server.url(), Some(Role::Inspector));
    let mut form = ReportForm::open(client, None).await.unwrap();

    // Not silently accepted into the "other files" slot either.
    let rejected = form.stage_batch(
        FileSlot::Image,
        vec![StagedFile::new("notlar.txt", vec![1, 2, 3])],
    );
    assert_eq!(rejected.len(), 1);
    assert!(form.staged_images().is_empty());
    upload_mock.assert_async().await;
}
