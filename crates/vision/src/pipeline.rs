use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{VisionClient, VisionClientError};
use crate::interpret::interpret;
use crate::policy::PolicyProfile;
use crate::prompt::{assemble, JobMetadata, PhotoPair};
use haulsight_common::error::{HaulsightError, HaulsightResult};
use haulsight_common::types::Confidence;
use haulsight_db::estimates::models::{NewEstimate, SavedEstimate};
use haulsight_db::estimates::repositories::EstimateRepository;

/// Seam between the pipeline and the provider, so tests (and future
/// providers) can swap the transport without touching the pipeline.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn complete(
        &self,
        policy_text: &str,
        doc: &crate::prompt::PromptDocument,
    ) -> Result<String, VisionClientError>;
}

#[async_trait]
impl VisionBackend for VisionClient {
    async fn complete(
        &self,
        policy_text: &str,
        doc: &crate::prompt::PromptDocument,
    ) -> Result<String, VisionClientError> {
        VisionClient::complete(self, policy_text, doc).await
    }
}

/// One estimation request, validated at intake.
#[derive(Debug, Clone)]
pub struct EstimationSubmission {
    pub metadata: JobMetadata,
    pub pairs: Vec<PhotoPair>,
}

/// Whether the computed estimate made it to the store. A failed write is a
/// first-class outcome, not an error: the inference already happened and its
/// result belongs to the caller.
#[derive(Debug, Clone, Copy)]
pub enum SaveOutcome {
    Saved(SavedEstimate),
    Unsaved,
}

#[derive(Debug, Clone)]
pub struct EstimationOutcome {
    pub result_text: String,
    pub confidence: Option<Confidence>,
    pub saved: SaveOutcome,
}

/// The estimation request pipeline: assemble → invoke → interpret → append.
#[derive(Clone)]
pub struct EstimationPipeline {
    backend: Arc<dyn VisionBackend>,
    store: Arc<dyn EstimateRepository>,
    policy: PolicyProfile,
    model_name: String,
}

impl EstimationPipeline {
    pub fn new(
        backend: Arc<dyn VisionBackend>,
        store: Arc<dyn EstimateRepository>,
        policy: PolicyProfile,
        model_name: String,
    ) -> Self {
        Self {
            backend,
            store,
            policy,
            model_name,
        }
    }

    pub async fn run(&self, submission: EstimationSubmission) -> HaulsightResult<EstimationOutcome> {
        if submission.pairs.is_empty() {
            return Err(HaulsightError::Validation(
                "Please upload at least 1 photo.".to_string(),
            ));
        }
        let photo_count = submission.pairs.len() as i32;

        let doc = assemble(&submission.metadata, &submission.pairs);
        let raw = self
            .backend
            .complete(self.policy.text(), &doc)
            .await
            .map_err(|e| HaulsightError::Inference(e.to_string()))?;

        let interpretation = interpret(&raw)?;

        let record = NewEstimate {
            agent_label: submission.metadata.agent_label.clone(),
            job_type: submission.metadata.job_type,
            dumpster_size: submission.metadata.dumpster_size,
            notes: submission.metadata.notes.clone(),
            photo_count,
            model_name: self.model_name.clone(),
            result_text: interpretation.text.clone(),
            confidence: interpretation.confidence,
        };

        let saved = match self.store.insert(record).await {
            Ok(saved) => SaveOutcome::Saved(saved),
            Err(e) => {
                tracing::warn!(error = %e, "estimate computed but not persisted");
                SaveOutcome::Unsaved
            }
        };

        Ok(EstimationOutcome {
            result_text: interpretation.text,
            confidence: interpretation.confidence,
            saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ImageBlob, PromptDocument, PromptSegment};
    use bytes::Bytes;
    use chrono::Utc;
    use haulsight_common::types::JobType;
    use haulsight_db::estimates::models::{EstimateRecord, EstimateSummary};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubBackend {
        response: String,
        calls: AtomicUsize,
        last_policy: Mutex<Option<String>>,
    }

    impl StubBackend {
        fn new(response: &str) -> Self {
            Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
                last_policy: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl VisionBackend for StubBackend {
        async fn complete(
            &self,
            policy_text: &str,
            _doc: &PromptDocument,
        ) -> Result<String, VisionClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_policy.lock().unwrap() = Some(policy_text.to_string());
            Ok(self.response.clone())
        }
    }

    struct MockRepo {
        records: Mutex<Vec<NewEstimate>>,
        fail: bool,
    }

    impl MockRepo {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl EstimateRepository for MockRepo {
        async fn insert(&self, estimate: NewEstimate) -> HaulsightResult<SavedEstimate> {
            if self.fail {
                return Err(HaulsightError::Database("store unreachable".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            records.push(estimate);
            Ok(SavedEstimate {
                id: records.len() as i64,
                created_at: Utc::now(),
            })
        }

        async fn list(&self, _limit: i64) -> HaulsightResult<Vec<EstimateSummary>> {
            Ok(vec![])
        }

        async fn get(&self, _id: i64) -> HaulsightResult<Option<EstimateRecord>> {
            Ok(None)
        }
    }

    fn submission(photo_count: usize) -> EstimationSubmission {
        EstimationSubmission {
            metadata: JobMetadata {
                job_type: JobType::Standard,
                dumpster_size: None,
                agent_label: Some("Dana".to_string()),
                notes: None,
            },
            pairs: (0..photo_count)
                .map(|_| PhotoPair {
                    photo: ImageBlob::new("image/jpeg", Bytes::from_static(b"photo")),
                    overlay: None,
                })
                .collect(),
        }
    }

    fn pipeline(backend: Arc<StubBackend>, repo: Arc<MockRepo>) -> EstimationPipeline {
        EstimationPipeline::new(
            backend,
            repo,
            PolicyProfile::Standard,
            "gpt-4o".to_string(),
        )
    }

    const MODEL_REPLY: &str = "Estimated Volume: 3-5 cubic yards\nConfidence: Medium\nNotes: None";

    #[tokio::test]
    async fn happy_path_persists_and_returns_result() {
        let backend = Arc::new(StubBackend::new(MODEL_REPLY));
        let repo = Arc::new(MockRepo::new());

        let outcome = pipeline(backend.clone(), repo.clone())
            .run(submission(2))
            .await
            .expect("should succeed");

        assert_eq!(outcome.result_text, MODEL_REPLY);
        assert_eq!(outcome.confidence, Some(Confidence::Medium));
        assert!(matches!(
            outcome.saved,
            SaveOutcome::Saved(SavedEstimate { id: 1, .. })
        ));

        let records = repo.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].photo_count, 2);
        assert_eq!(records[0].model_name, "gpt-4o");
        assert_eq!(records[0].confidence, Some(Confidence::Medium));
        assert_eq!(records[0].result_text, MODEL_REPLY);
    }

    #[tokio::test]
    async fn zero_photos_fails_before_invoking_the_model() {
        let backend = Arc::new(StubBackend::new(MODEL_REPLY));
        let repo = Arc::new(MockRepo::new());

        let err = pipeline(backend.clone(), repo.clone())
            .run(submission(0))
            .await
            .unwrap_err();

        assert!(matches!(err, HaulsightError::Validation(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(repo.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn whitespace_output_fails_with_no_store_append() {
        let backend = Arc::new(StubBackend::new("   \n  "));
        let repo = Arc::new(MockRepo::new());

        let err = pipeline(backend.clone(), repo.clone())
            .run(submission(1))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Empty response from model"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(repo.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failure_degrades_to_unsaved() {
        let backend = Arc::new(StubBackend::new(MODEL_REPLY));
        let repo = Arc::new(MockRepo::failing());

        let outcome = pipeline(backend, repo)
            .run(submission(1))
            .await
            .expect("storage failure must not fail the request");

        assert!(matches!(outcome.saved, SaveOutcome::Unsaved));
        // The computed answer survives the failed write unchanged.
        assert_eq!(outcome.result_text, MODEL_REPLY);
        assert_eq!(outcome.confidence, Some(Confidence::Medium));
    }

    #[tokio::test]
    async fn configured_policy_text_reaches_the_backend() {
        let backend = Arc::new(StubBackend::new(MODEL_REPLY));
        let repo = Arc::new(MockRepo::new());

        pipeline(backend.clone(), repo)
            .run(submission(1))
            .await
            .expect("should succeed");

        let policy = backend.last_policy.lock().unwrap().clone().unwrap();
        assert_eq!(policy, PolicyProfile::Standard.text());
    }

    #[tokio::test]
    async fn missing_confidence_is_stored_as_none() {
        let backend = Arc::new(StubBackend::new("Estimated Volume: about 2 cubic yards"));
        let repo = Arc::new(MockRepo::new());

        let outcome = pipeline(backend, repo.clone())
            .run(submission(1))
            .await
            .expect("should succeed");

        assert_eq!(outcome.confidence, None);
        assert_eq!(repo.records.lock().unwrap()[0].confidence, None);
    }
}
