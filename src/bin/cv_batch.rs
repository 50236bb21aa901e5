use std::path::{Path, PathBuf};

use clap::Parser;
use cv_ranker_lib::core::models::DocumentInput;
use cv_ranker_lib::core::remote_scoring::ScoringModel;
use cv_ranker_lib::core::service::CoreService;
use cv_ranker_lib::core::settings_store::SettingsStore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "cv_batch", about = "Classify and score a batch of CVs")]
struct Args {
    /// CV files (.pdf, .docx or plain text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Settings file, defaults to the per-user settings location
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Send documents to the remote scoring service with this model
    /// (Onet-dataset, Stack-Overflow, ESCOU) instead of scoring locally
    #[arg(long)]
    remote: Option<ScoringModel>,

    /// Override the number of documents processed concurrently
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = SettingsStore::locate(args.settings.clone()).load().await?;
    if let Some(concurrency) = args.concurrency {
        settings.max_concurrent_documents = concurrency;
    }

    cv_ranker_lib::init_tracing(&settings.log_filter);

    let service = CoreService::new(settings).await?;

    let mut documents = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file_name = display_name(path);
        match tokio::fs::read(path).await {
            Ok(bytes) => documents.push(DocumentInput::bytes(file_name, bytes)),
            Err(err) => {
                error!(file_name = %file_name, "cannot read file: {err}");
                documents.push(DocumentInput::unreadable(file_name, err.to_string()));
            }
        }
    }

    if let Some(model) = args.remote {
        let matcher = service.career_matcher(Some(model))?;
        let mut all_matches = Vec::new();
        for document in documents {
            let file_name = document.file_name.clone();
            match matcher.match_document(document).await {
                Ok(matches) => all_matches.extend(matches),
                Err(err) => error!(file_name = %file_name, "remote scoring failed: {err}"),
            }
        }

        println!("{}", serde_json::to_string_pretty(&all_matches)?);
        return Ok(());
    }

    let cancellation_token = CancellationToken::new();
    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("cancellation requested, finishing in-flight documents");
            ctrl_c_token.cancel();
        }
    });

    let result = service.process_batch(documents, &cancellation_token).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|v| v.to_str())
        .unwrap_or("resume.pdf")
        .to_string()
}
