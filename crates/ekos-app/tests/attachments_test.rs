//! Integration tests for the attachment handler: preview strategy dispatch
//! over real fetches, handle release accounting, role gating, and the
//! delete-then-refetch flow.

mod helpers;

use ekos_app::{AttachmentManager, Preview};
use ekos_core::models::{Attachment, Role};
use helpers::{attachment_value, client_for};
use serde_json::json;

fn attachment(id: &str, file_name: &str) -> Attachment {
    serde_json::from_value(attachment_value(id, file_name)).unwrap()
}

#[tokio::test]
async fn pdf_preview_embeds_a_data_uri_with_download_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/dosyalar/d-1/indir")
        .with_body("PDFDATA")
        .create_async()
        .await;

    let manager = AttachmentManager::new(client_for(&server.url(), Some(Role::Viewer)), "r-1");
    let preview = manager
        .preview(&attachment("d-1", "muayene.pdf"))
        .await
        .unwrap();

    match preview {
        Preview::Document {
            data_uri,
            file_name,
        } => {
            assert!(data_uri.starts_with("data:application/pdf;base64,"));
            // The filename stays available for the fallback download action.
            assert_eq!(file_name, "muayene.pdf");
        }
        other => panic!("expected document strategy, got {other:?}"),
    }
}

#[tokio::test]
async fn image_preview_is_a_scoped_handle_released_on_close() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/dosyalar/d-2/indir")
        .with_body(vec![0xFF, 0xD8, 0xFF])
        .create_async()
        .await;

    let manager = AttachmentManager::new(client_for(&server.url(), Some(Role::Viewer)), "r-1");
    let preview = manager
        .preview(&attachment("d-2", "foto.jpg"))
        .await
        .unwrap();

    let Preview::Image(handle) = preview else {
        panic!("expected image strategy");
    };
    assert_eq!(manager.live_preview_count(), 1);
    assert_eq!(handle.bytes().as_ref(), &[0xFF, 0xD8, 0xFF]);

    handle.release();
    assert_eq!(manager.live_preview_count(), 0);
}

#[tokio::test]
async fn failed_image_fetch_leaves_no_live_handle() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/dosyalar/d-3/indir")
        .with_status(404)
        .with_body(json!({"detail": "Dosya bulunamadı"}).to_string())
        .create_async()
        .await;

    let manager = AttachmentManager::new(client_for(&server.url(), Some(Role::Viewer)), "r-1");
    let result = manager.preview(&attachment("d-3", "foto.png")).await;
    assert!(result.is_err());
    assert_eq!(manager.live_preview_count(), 0);
}

#[tokio::test]
async fn unknown_extension_offers_download_only_without_fetching() {
    let mut server = mockito::Server::new_async().await;
    let download_mock = server
        .mock("GET", "/api/dosyalar/d-4/indir")
        .expect(0)
        .create_async()
        .await;

    let manager = AttachmentManager::new(client_for(&server.url(), Some(Role::Viewer)), "r-1");
    let preview = manager
        .preview(&attachment("d-4", "veri.csv"))
        .await
        .unwrap();
    assert!(matches!(preview, Preview::Unsupported { .. }));
    download_mock.assert_async().await;
}

#[tokio::test]
async fn upload_refreshes_the_list_after_success() {
    let mut server = mockito::Server::new_async().await;
    let upload_mock = server
        .mock("POST", "/api/upload/r-1")
        .with_body(json!({"message": "Dosya yüklendi", "file_id": "d-9"}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/api/dosyalar/r-1")
        .with_body(json!([attachment_value("d-9", "foto.jpg")]).to_string())
        .create_async()
        .await;

    let mut manager =
        AttachmentManager::new(client_for(&server.url(), Some(Role::Inspector)), "r-1");
    manager.upload("foto.jpg", vec![0xFF, 0xD8]).await.unwrap();
    assert_eq!(manager.attachments().len(), 1);
    upload_mock.assert_async().await;
}

#[tokio::test]
async fn viewer_upload_and_delete_are_withheld_locally() {
    let mut server = mockito::Server::new_async().await;
    let upload_mock = server
        .mock("POST", "/api/upload/r-1")
        .expect(0)
        .create_async()
        .await;
    let delete_mock = server
        .mock("DELETE", "/api/dosyalar/d-1")
        .expect(0)
        .create_async()
        .await;

    let mut manager = AttachmentManager::new(client_for(&server.url(), Some(Role::Viewer)), "r-1");
    assert!(!manager.can_modify());
    assert!(manager.upload("foto.jpg", vec![1]).await.is_err());
    assert!(manager.delete("d-1").await.is_err());
    upload_mock.assert_async().await;
    delete_mock.assert_async().await;
}

#[tokio::test]
async fn txt_upload_is_rejected_locally() {
    let mut server = mockito::Server::new_async().await;
    let upload_mock = server
        .mock("POST", "/api/upload/r-1")
        .expect(0)
        .create_async()
        .await;

    let mut manager =
        AttachmentManager::new(client_for(&server.url(), Some(Role::Inspector)), "r-1");
    let err = manager.upload("notlar.txt", vec![1, 2]).await.unwrap_err();
    assert!(err.is_local());
    upload_mock.assert_async().await;
}

#[tokio::test]
async fn delete_is_immediate_and_refetches_the_owning_list() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/dosyalar/r-1")
        .with_body(
            json!([
                attachment_value("d-1", "muayene.pdf"),
                attachment_value("d-2", "foto.jpg")
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let mut manager =
        AttachmentManager::new(client_for(&server.url(), Some(Role::Inspector)), "r-1");
    manager.refresh().await.unwrap();
    assert_eq!(manager.attachments().len(), 2);

    let delete_mock = server
        .mock("DELETE", "/api/dosyalar/d-1")
        .with_body(json!({"message": "Dosya silindi"}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/api/dosyalar/r-1")
        .with_body(json!([attachment_value("d-2", "foto.jpg")]).to_string())
        .create_async()
        .await;

    manager.delete("d-1").await.unwrap();
    assert_eq!(manager.attachments().len(), 1);
    assert_eq!(manager.attachments()[0].file_name, "foto.jpg");
    delete_mock.assert_async().await;
}
