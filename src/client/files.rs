use crate::models::FileRecord;
use std::sync::Arc;

use super::api::{StudyApi, UploadFile};
use super::error::ClientError;

/// Yes/no prompt shown before destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// View state behind the upload panel and the uploaded-file list.
///
/// The list is re-fetched after an upload, but single deletes and clears are
/// applied locally, so it can drift from the server if someone else mutates
/// the collection meanwhile.
pub struct FilePanel {
    api: Arc<dyn StudyApi>,
    confirm: Box<dyn Confirm>,
    files: Vec<FileRecord>,
    upload_status: String,
    selected_file: Option<UploadFile>,
    clear_status: String,
    delete_status: String,
}

impl FilePanel {
    pub fn new(api: Arc<dyn StudyApi>, confirm: impl Confirm + 'static) -> Self {
        Self {
            api,
            confirm: Box::new(confirm),
            files: Vec::new(),
            upload_status: String::new(),
            selected_file: None,
            clear_status: String::new(),
            delete_status: String::new(),
        }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn upload_status(&self) -> &str {
        &self.upload_status
    }

    pub fn selected_file(&self) -> Option<&UploadFile> {
        self.selected_file.as_ref()
    }

    pub fn clear_status(&self) -> &str {
        &self.clear_status
    }

    pub fn delete_status(&self) -> &str {
        &self.delete_status
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Replaces the local list with the server's; failures leave it untouched
    pub async fn refresh(&mut self) {
        match self.api.list_files().await {
            Ok(files) => self.files = files,
            Err(e) => tracing::error!("Error fetching PDF list: {}", e),
        }
    }

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.selected_file = file;
    }

    pub async fn submit_upload(&mut self) {
        let Some(file) = self.selected_file.clone() else {
            return;
        };

        self.upload_status = "Uploading...".to_string();

        match self.api.upload_file(&file).await {
            Ok(_) => {
                self.upload_status = "Upload successful!".to_string();
                self.selected_file = None;
                self.refresh().await;
            }
            Err(ClientError::Http { body, .. }) => {
                self.upload_status = format!("Upload failed: {}", body);
            }
            Err(e) => {
                tracing::error!("Error uploading file: {}", e);
                self.upload_status = "Upload failed. Please try again.".to_string();
            }
        }
    }

    /// Deletes one file after confirmation and drops it from the local list
    pub async fn delete_file(&mut self, id: &str, filename: &str) {
        let prompt = format!("Are you sure you want to delete \"{}\"?", filename);
        if !self.confirm.confirm(&prompt) {
            return;
        }

        match self.api.delete_file(id).await {
            Ok(_) => {
                self.delete_status = format!("Successfully deleted {}", filename);
                self.files.retain(|f| f.id != id);
            }
            Err(ClientError::Http { body, .. }) => {
                self.delete_status = format!("Failed to delete: {}", body);
            }
            Err(e) => {
                tracing::error!("Error deleting PDF: {}", e);
                self.delete_status = "Failed to delete PDF. Please try again.".to_string();
            }
        }
    }

    pub async fn clear_all(&mut self) {
        if !self.confirm.confirm("Are you sure you want to clear all PDFs?") {
            return;
        }

        tracing::info!("Starting clear all operation...");
        match self.api.clear_files().await {
            Ok(report) => {
                if !report.is_complete() {
                    tracing::warn!(
                        "{} stored files could not be removed",
                        report.failed().count()
                    );
                }
                self.clear_status = "All PDFs cleared successfully".to_string();
                self.files.clear();
            }
            Err(ClientError::Http { body, .. }) => {
                tracing::info!("Clear operation failed: {}", body);
                self.clear_status = format!("Failed to clear PDFs: {}", body);
            }
            Err(e) => {
                tracing::error!("Error clearing PDFs: {}", e);
                self.clear_status = "Failed to clear PDFs. Please try again.".to_string();
            }
        }
    }
}

/// Whether a status line reports a failure
pub fn is_error(status: &str) -> bool {
    status.starts_with("Failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeApi;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn panel(api: &Arc<FakeApi>, answer: bool) -> FilePanel {
        FilePanel::new(api.clone(), move |_: &str| answer)
    }

    #[tokio::test]
    async fn test_mount_fetches_list() {
        let api = Arc::new(FakeApi::with_files(&["a.pdf", "b.pdf"]));
        let mut panel = panel(&api, true);

        panel.mount().await;

        assert_eq!(panel.files().len(), 2);
        assert_eq!(api.calls(), vec!["GET /pdfs"]);
    }

    #[tokio::test]
    async fn test_upload_without_selection_is_a_noop() {
        let api = Arc::new(FakeApi::new());
        let mut panel = panel(&api, true);

        panel.submit_upload().await;

        assert!(api.calls().is_empty());
        assert_eq!(panel.upload_status(), "");
    }

    #[tokio::test]
    async fn test_upload_success_refetches_list() {
        let api = Arc::new(FakeApi::new());
        let mut panel = panel(&api, true);

        panel.select_file(Some(UploadFile::pdf("notes.pdf", b"%PDF".to_vec())));
        panel.submit_upload().await;

        assert_eq!(panel.upload_status(), "Upload successful!");
        assert!(panel.selected_file().is_none());
        assert_eq!(panel.files().len(), 1);
        assert_eq!(panel.files()[0].original_name, "notes.pdf");
        assert_eq!(api.calls(), vec!["POST /upload notes.pdf", "GET /pdfs"]);
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_response_text() {
        let api = Arc::new(FakeApi::new());
        api.fail(400, "Only PDF files are allowed!");
        let mut panel = panel(&api, true);

        panel.select_file(Some(UploadFile::new("notes.txt", "text/plain", b"hi".to_vec())));
        panel.submit_upload().await;

        assert_eq!(panel.upload_status(), "Upload failed: Only PDF files are allowed!");
        assert!(panel.selected_file().is_some());
        assert!(panel.files().is_empty());
    }

    #[tokio::test]
    async fn test_upload_network_failure() {
        let api = Arc::new(FakeApi::new());
        api.go_offline();
        let mut panel = panel(&api, true);

        panel.select_file(Some(UploadFile::pdf("notes.pdf", b"%PDF".to_vec())));
        panel.submit_upload().await;

        assert_eq!(panel.upload_status(), "Upload failed. Please try again.");
    }

    #[tokio::test]
    async fn test_delete_asks_and_filters_locally() {
        let api = Arc::new(FakeApi::with_files(&["a.pdf", "b.pdf"]));
        let asked = Arc::new(AtomicBool::new(false));
        let seen = asked.clone();
        let mut panel = FilePanel::new(api.clone(), move |msg: &str| {
            assert_eq!(msg, "Are you sure you want to delete \"a.pdf\"?");
            seen.store(true, Ordering::SeqCst);
            true
        });
        panel.mount().await;
        let id = panel
            .files()
            .iter()
            .find(|f| f.original_name == "a.pdf")
            .map(|f| f.id.clone())
            .unwrap();

        panel.delete_file(&id, "a.pdf").await;

        assert!(asked.load(Ordering::SeqCst));
        assert_eq!(panel.delete_status(), "Successfully deleted a.pdf");
        assert_eq!(panel.files().len(), 1);
        assert_eq!(panel.files()[0].original_name, "b.pdf");
        // no re-fetch after a delete
        assert_eq!(api.calls().iter().filter(|c| *c == "GET /pdfs").count(), 1);
    }

    #[tokio::test]
    async fn test_delete_declined_does_nothing() {
        let api = Arc::new(FakeApi::with_files(&["a.pdf"]));
        let mut panel = panel(&api, false);
        panel.mount().await;
        let id = panel.files()[0].id.clone();

        panel.delete_file(&id, "a.pdf").await;

        assert_eq!(panel.files().len(), 1);
        assert_eq!(panel.delete_status(), "");
        assert_eq!(api.calls(), vec!["GET /pdfs"]);
    }

    #[tokio::test]
    async fn test_delete_unknown_reports_server_text() {
        let api = Arc::new(FakeApi::new());
        let mut panel = panel(&api, true);

        panel.delete_file("missing", "ghost.pdf").await;

        assert_eq!(panel.delete_status(), "Failed to delete: PDF file not found");
        assert!(is_error(panel.delete_status()));
    }

    #[tokio::test]
    async fn test_clear_all_empties_local_state() {
        let api = Arc::new(FakeApi::with_files(&["a.pdf", "b.pdf", "c.pdf"]));
        let mut panel = panel(&api, true);
        panel.mount().await;

        panel.clear_all().await;

        assert_eq!(panel.clear_status(), "All PDFs cleared successfully");
        assert!(!is_error(panel.clear_status()));
        assert!(panel.files().is_empty());
        assert!(api.files.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_failure_keeps_list() {
        let api = Arc::new(FakeApi::with_files(&["a.pdf"]));
        let mut panel = panel(&api, true);
        panel.mount().await;
        api.fail(500, "Internal Server Error");

        panel.clear_all().await;

        assert_eq!(panel.clear_status(), "Failed to clear PDFs: Internal Server Error");
        assert_eq!(panel.files().len(), 1);
    }
}
