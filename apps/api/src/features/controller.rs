//! Per-feature submit state machine: Idle -> Pending -> {Success, Failed} -> Idle.
//!
//! A busy flag enforces at most one in-flight request per controller. The
//! flag is only taken after input validation passes and is released on every
//! exit path, so a failed generation always returns the controller to Idle.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::info;

use crate::errors::AppError;
use crate::history::HistoryStore;
use crate::llm_client::GenerationClient;
use crate::models::generation::{GenerationKind, GenerationRequest, GenerationResult};
use crate::models::history::HistoryEntry;

pub struct FeatureController {
    kind: GenerationKind,
    busy: AtomicBool,
    current: RwLock<Option<GenerationResult>>,
}

/// Releases the busy flag when dropped.
struct PendingGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl FeatureController {
    pub fn new(kind: GenerationKind) -> Self {
        Self {
            kind,
            busy: AtomicBool::new(false),
            current: RwLock::new(None),
        }
    }

    pub fn feature_name(&self) -> &'static str {
        match self.kind {
            GenerationKind::Resume => "resume",
            GenerationKind::Poster => "poster",
            GenerationKind::Form => "form",
        }
    }

    /// True while a submit is in flight.
    pub fn is_pending(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<PendingGuard<'_>, AppError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Busy(self.feature_name().to_string()));
        }
        Ok(PendingGuard { busy: &self.busy })
    }

    /// Runs one generation: validate, call the client, record history, retain
    /// the result for display.
    ///
    /// Invalid input is rejected while still Idle (no call is made and the
    /// busy flag is never taken). A second submit while Pending fails with
    /// `Busy`. On failure the previous current result is left untouched.
    /// If the history write fails, the result is still retained as current
    /// but the storage error is surfaced to the caller.
    pub async fn submit(
        &self,
        client: &dyn GenerationClient,
        history: &HistoryStore,
        request: GenerationRequest,
    ) -> Result<GenerationResult, AppError> {
        request.validate()?;
        let _pending = self.begin()?;

        let result = client.generate(request.clone()).await?;
        info!("{} generation succeeded", self.feature_name());

        let entry = HistoryEntry::for_generation(&request, &result);
        *self.current.write().await = Some(result.clone());
        history.append(entry).await?;

        Ok(result)
    }

    /// The last successful result, retained for display.
    pub async fn current(&self) -> Option<GenerationResult> {
        self.current.read().await.clone()
    }

    pub async fn set_current(&self, result: GenerationResult) {
        *self.current.write().await = Some(result);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::llm_client::ClientError;
    use crate::models::generation::{FormFillResult, PosterResult, ResumeResult};

    /// Scriptable stand-in for the Gemini client. Counts calls and can hold
    /// the request in flight until the test releases the gate.
    struct MockClient {
        response: Mutex<Option<Result<GenerationResult, ClientError>>>,
        calls: AtomicUsize,
        gate: Option<Arc<Semaphore>>,
    }

    impl MockClient {
        fn returning(response: Result<GenerationResult, ClientError>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(response: Result<GenerationResult, ClientError>, gate: Arc<Semaphore>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationClient for MockClient {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResult, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _permit = gate.acquire().await.unwrap();
            }
            self.response
                .lock()
                .unwrap()
                .take()
                .expect("mock response already consumed")
        }
    }

    fn resume_result() -> GenerationResult {
        GenerationResult::Resume(ResumeResult {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+1 555 0100".to_string(),
            summary: "Frontend engineer with 5 years of React experience.".to_string(),
            experience: vec![],
            education: vec![],
            skills: vec!["React".to_string(), "TypeScript".to_string()],
        })
    }

    fn temp_store(dir: &tempfile::TempDir) -> HistoryStore {
        HistoryStore::load(dir.path().join("history.json"))
    }

    #[tokio::test]
    async fn test_successful_resume_submit_records_one_history_entry() {
        let dir = tempfile::tempdir().unwrap();
        let history = temp_store(&dir);
        let client = MockClient::returning(Ok(resume_result()));
        let controller = FeatureController::new(GenerationKind::Resume);

        let request = GenerationRequest::Resume {
            profile_text: "5 years React experience".to_string(),
        };
        let result = controller.submit(&client, &history, request).await.unwrap();

        assert!(matches!(result, GenerationResult::Resume(_)));
        assert!(!controller.is_pending());
        assert!(controller.current().await.is_some());

        let entries = history.list().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, GenerationKind::Resume);
    }

    #[tokio::test]
    async fn test_submit_transitions_through_pending() {
        let dir = tempfile::tempdir().unwrap();
        let history = Arc::new(temp_store(&dir));
        let gate = Arc::new(Semaphore::new(0));
        let client = Arc::new(MockClient::gated(Ok(resume_result()), gate.clone()));
        let controller = Arc::new(FeatureController::new(GenerationKind::Resume));

        assert!(!controller.is_pending());

        let task = tokio::spawn({
            let controller = controller.clone();
            let client = client.clone();
            let history = history.clone();
            async move {
                controller
                    .submit(
                        client.as_ref(),
                        &history,
                        GenerationRequest::Resume {
                            profile_text: "5 years React experience".to_string(),
                        },
                    )
                    .await
            }
        });

        while !controller.is_pending() {
            tokio::task::yield_now().await;
        }

        gate.add_permits(1);
        task.await.unwrap().unwrap();
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected_busy() {
        let dir = tempfile::tempdir().unwrap();
        let history = Arc::new(temp_store(&dir));
        let gate = Arc::new(Semaphore::new(0));
        let client = Arc::new(MockClient::gated(Ok(resume_result()), gate.clone()));
        let controller = Arc::new(FeatureController::new(GenerationKind::Resume));

        let request = GenerationRequest::Resume {
            profile_text: "5 years React experience".to_string(),
        };

        let task = tokio::spawn({
            let controller = controller.clone();
            let client = client.clone();
            let history = history.clone();
            let request = request.clone();
            async move { controller.submit(client.as_ref(), &history, request).await }
        });

        while !controller.is_pending() {
            tokio::task::yield_now().await;
        }

        let second = controller
            .submit(client.as_ref(), &history, request)
            .await;
        assert!(matches!(second, Err(AppError::Busy(_))));
        // The rejected submit never reached the client.
        assert_eq!(client.call_count(), 1);

        gate.add_permits(1);
        task.await.unwrap().unwrap();
        assert_eq!(history.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_without_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let history = temp_store(&dir);
        let client = MockClient::returning(Ok(resume_result()));
        let controller = FeatureController::new(GenerationKind::Resume);

        let request = GenerationRequest::Resume {
            profile_text: "   ".to_string(),
        };
        let result = controller.submit(&client, &history, request).await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(client.call_count(), 0);
        assert!(history.list().await.is_empty());
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_poster_reply_without_image_fails_and_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let history = temp_store(&dir);
        let client = MockClient::returning(Err(ClientError::NoImage));
        let controller = FeatureController::new(GenerationKind::Poster);

        let request = GenerationRequest::Poster {
            prompt: "CYBER NIGHT 2025 concert poster".to_string(),
            aspect_ratio: Default::default(),
        };
        let result = controller.submit(&client, &history, request).await;

        assert!(matches!(result, Err(AppError::NoImageProduced)));
        assert!(history.list().await.is_empty());
        assert!(controller.current().await.is_none());
        // Failure returns the controller to Idle; a new submit is accepted.
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn test_failure_leaves_previous_result_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let history = temp_store(&dir);
        let controller = FeatureController::new(GenerationKind::Poster);

        let poster = GenerationResult::Poster(PosterResult {
            image_data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
        });
        controller.set_current(poster.clone()).await;

        let client = MockClient::returning(Err(ClientError::EmptyContent));
        let request = GenerationRequest::Poster {
            prompt: "another poster".to_string(),
            aspect_ratio: Default::default(),
        };
        let result = controller.submit(&client, &history, request).await;

        assert!(result.is_err());
        assert_eq!(controller.current().await, Some(poster));
    }

    #[tokio::test]
    async fn test_form_fill_result_exposes_the_field_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let history = temp_store(&dir);
        let reply = GenerationResult::FormFill(FormFillResult {
            filled_text: "Name: John".to_string(),
            fields: BTreeMap::from([("Name".to_string(), "John".to_string())]),
        });
        let client = MockClient::returning(Ok(reply));
        let controller = FeatureController::new(GenerationKind::Form);

        let request = GenerationRequest::FormFill {
            form_text: "Name: ____".to_string(),
            user_data_text: "My name is John".to_string(),
        };
        let result = controller.submit(&client, &history, request).await.unwrap();

        let form = result.into_form_fill().unwrap();
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields.get("Name").map(String::as_str), Some("John"));
        assert_eq!(history.list().await.len(), 1);
        assert_eq!(history.list().await[0].kind, GenerationKind::Form);
    }

    #[tokio::test]
    async fn test_history_write_failure_surfaces_but_retains_result() {
        let dir = tempfile::tempdir().unwrap();
        // Store path is a directory: every persist fails.
        let history = HistoryStore::load(dir.path());
        let client = MockClient::returning(Ok(resume_result()));
        let controller = FeatureController::new(GenerationKind::Resume);

        let request = GenerationRequest::Resume {
            profile_text: "5 years React experience".to_string(),
        };
        let result = controller.submit(&client, &history, request).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(controller.current().await.is_some());
        assert!(history.list().await.is_empty());
        assert!(!controller.is_pending());
    }
}
