use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use super::classifier::TemplateClassifier;
use super::document_parser::DocumentTextLoader;
use super::id_generator::{IdGenerator, TimestampIdGenerator};
use super::models::{BatchResult, DocumentInput, RuntimeSettings};
use super::pdf::PdfTextExtractor;
use super::pipeline::{CvPipeline, ProcessedDocument};
use super::remote_scoring::{
    CareerMatcher, LocalCareerMatcher, RemoteCareerMatcher, ScoringModel,
};
use super::template_catalog::TemplateCatalog;

enum DocumentOutcome {
    Processed(Box<ProcessedDocument>),
    Failed,
    Skipped,
}

pub struct CoreService {
    settings: RuntimeSettings,
    pipeline: Arc<CvPipeline>,
    loader: DocumentTextLoader,
}

impl CoreService {
    /// Builds the service, loading the template catalog named in the settings.
    /// A missing or corrupt catalog fails here, before any document is touched.
    pub async fn new(settings: RuntimeSettings) -> anyhow::Result<Self> {
        let catalog = if settings.catalog_path.trim().is_empty() {
            TemplateCatalog::builtin()
        } else {
            TemplateCatalog::load(Path::new(settings.catalog_path.trim())).await?
        };

        Ok(Self::with_parts(
            settings,
            Arc::new(catalog),
            Arc::new(TimestampIdGenerator::new()),
        ))
    }

    pub fn with_parts(
        settings: RuntimeSettings,
        catalog: Arc<TemplateCatalog>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let classifier = TemplateClassifier::new(catalog);
        Self {
            settings,
            pipeline: Arc::new(CvPipeline::new(classifier, ids)),
            loader: DocumentTextLoader::new(PdfTextExtractor::new()),
        }
    }

    pub fn pipeline(&self) -> Arc<CvPipeline> {
        Arc::clone(&self.pipeline)
    }

    /// Local heuristics unless a remote scoring model is requested.
    pub fn career_matcher(
        &self,
        model: Option<ScoringModel>,
    ) -> anyhow::Result<Box<dyn CareerMatcher>> {
        match model {
            Some(model) => Ok(Box::new(RemoteCareerMatcher::from_settings(
                &self.settings,
                model,
            )?)),
            None => Ok(Box::new(LocalCareerMatcher::new(
                self.pipeline(),
                self.loader.clone(),
            ))),
        }
    }

    /// Processes every document independently. Failures are isolated to their
    /// document; cancellation is observed before each document starts.
    pub async fn process_batch(
        &self,
        documents: Vec<DocumentInput>,
        cancellation_token: &CancellationToken,
    ) -> BatchResult {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%batch_id, documents = documents.len(), "starting CV batch");

        let max_concurrency = self.settings.max_concurrent_documents.max(1);
        let outcomes: Vec<(String, DocumentOutcome)> = stream::iter(documents)
            .map(|document| {
                let pipeline = self.pipeline();
                let loader = self.loader.clone();
                let token = cancellation_token.clone();
                async move {
                    let file_name = document.file_name.clone();
                    if token.is_cancelled() {
                        return (file_name, DocumentOutcome::Skipped);
                    }

                    let outcome = run_document(pipeline, loader, document).await;
                    (file_name, outcome)
                }
            })
            .buffered(max_concurrency)
            .collect()
            .await;

        let mut result = BatchResult::default();
        for (file_name, outcome) in outcomes {
            match outcome {
                DocumentOutcome::Processed(processed) => {
                    let ProcessedDocument {
                        candidate,
                        template,
                    } = *processed;
                    result.template_info.insert(file_name.clone(), template);
                    result.candidates.push(candidate);
                    result.success.push(file_name);
                }
                DocumentOutcome::Failed => result.failed.push(file_name),
                DocumentOutcome::Skipped => result.skipped.push(file_name),
            }
        }

        let summary = result.summary();
        let duration_seconds = (Utc::now() - started_at).num_milliseconds() as f64 / 1000.0;
        info!(
            %batch_id,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            average_confidence = summary.average_confidence,
            duration_seconds,
            "{summary}"
        );

        result
    }
}

async fn run_document(
    pipeline: Arc<CvPipeline>,
    loader: DocumentTextLoader,
    document: DocumentInput,
) -> DocumentOutcome {
    let file_name = document.file_name.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let text = loader.load(&document.file_name, document.content)?;
        pipeline.process(&document.file_name, &text)
    })
    .await;

    match joined {
        Ok(Ok(processed)) => DocumentOutcome::Processed(Box::new(processed)),
        Ok(Err(err)) => {
            warn!(file_name = %file_name, "failed to process document: {err}");
            DocumentOutcome::Failed
        }
        Err(err) => {
            warn!(file_name = %file_name, "document pipeline aborted: {err}");
            DocumentOutcome::Failed
        }
    }
}
