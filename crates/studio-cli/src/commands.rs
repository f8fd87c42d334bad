//! Handlers for the non-config commands.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncReadExt;

use studio_api::{AppState, FileStore, MemoryStore, SubmissionStore};
use studio_client::{DraftSource, LocalSource, SessionStatus, Studio, StudioClient, SystemClipboard};
use studio_content::{PostCatalog, PostMeta, Preview};
use studio_core::traits::ConfigProvider;
use studio_core::{Error, Result};
use studio_generate::{BriefRequest, GenerationService};
use studio_llm::build_provider;

use crate::cli::GenerateArgs;
use crate::config::{FormStorage, StudioConfig};

/// Build the in-process generation service.
pub fn generation_service(config: &StudioConfig) -> Result<GenerationService> {
    let provider = build_provider(&config.provider_settings())?;
    Ok(GenerationService::new(provider)
        .with_max_tokens(config.llm.max_tokens)
        .with_temperature(config.llm.temperature))
}

/// Build the form store named by the config.
pub fn submission_store(config: &StudioConfig) -> Result<Arc<dyn SubmissionStore>> {
    Ok(match config.forms.storage {
        FormStorage::Memory => Arc::new(MemoryStore::new()),
        FormStorage::File => Arc::new(FileStore::new(config.content_path("forms")?)),
    })
}

/// `studio serve`
pub async fn serve(mut config: StudioConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let state = AppState::new(generation_service(&config)?)
        .with_catalog(PostCatalog::from_config(&config).await?)
        .with_palette(config.palette())
        .with_store(submission_store(&config)?);

    studio_api::serve(config.server_addr()?, state).await
}

/// `studio generate`: stream a draft to stdout, then save or copy it.
pub async fn generate(config: &StudioConfig, args: GenerateArgs) -> Result<()> {
    let source: Arc<dyn DraftSource> = if args.remote {
        Arc::new(StudioClient::new(config.client.server_url.clone()))
    } else {
        Arc::new(LocalSource::new(generation_service(config)?))
    };
    let mut studio = Studio::new(source);
    let mut updates = studio.subscribe();

    studio
        .generate(BriefRequest {
            topic: Some(args.topic),
            category: args.category,
            tone: args.tone,
            keywords: args.keywords,
        })
        .await?;

    let mut printed = 0;
    let mut stdout = std::io::stdout();
    loop {
        let generating = updates.borrow_and_update().status.is_generating();
        {
            let session = studio.session().lock().await;
            let raw = session.raw();
            if raw.len() > printed {
                stdout.write_all(raw[printed..].as_bytes()).map_err(Error::io)?;
                stdout.flush().map_err(Error::io)?;
                printed = raw.len();
            }
        }
        if !generating || updates.changed().await.is_err() {
            break;
        }
    }
    studio.wait().await;
    println!();

    let snapshot = studio.snapshot().await;
    if let SessionStatus::Failed { reason } = &snapshot.status {
        return Err(Error::stream_interrupted(format!(
            "draft incomplete after {} bytes: {reason}",
            snapshot.bytes
        )));
    }

    if let Some(dir) = &args.out {
        let path = studio.download(dir).await?;
        eprintln!("Saved {}", path.display());
    }
    if args.copy {
        studio.copy(&SystemClipboard::new()).await?;
        eprintln!("Copied to clipboard");
    }
    Ok(())
}

/// `studio preview`
pub async fn preview(config: &StudioConfig, file: Option<&Path>, html: bool) -> Result<()> {
    let raw = match file {
        Some(path) => studio_core::util::files::read_file(path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .map_err(Error::io)?;
            buf
        }
    };
    println!("{}", render_preview(config, &raw, html)?);
    Ok(())
}

/// Preview output for `raw`: the HTML fragment or pretty JSON.
pub fn render_preview(config: &StudioConfig, raw: &str, html: bool) -> Result<String> {
    let preview = Preview::of(raw, &config.palette());
    if html {
        Ok(preview.html)
    } else {
        serde_json::to_string_pretty(&preview).map_err(|e| Error::serialization(e.to_string()))
    }
}

/// `studio posts`
pub async fn posts(
    config: &StudioConfig,
    category: Option<&str>,
    query: Option<&str>,
    remote: bool,
) -> Result<()> {
    let posts = if remote {
        StudioClient::new(config.client.server_url.clone())
            .posts(category, query)
            .await?
    } else {
        PostCatalog::from_config(config).await?.filter(category, query)
    };
    if posts.is_empty() {
        eprintln!("No posts found");
    }
    for post in &posts {
        println!("{}", post_line(post));
    }
    Ok(())
}

/// One listing line: date, category, slug and title.
pub fn post_line(post: &PostMeta) -> String {
    format!("{:<10}  {:<9}  {:<32}  {}", post.date, post.category, post.slug, post.title)
}

/// `studio health`
pub async fn health(config: &StudioConfig, remote: bool) -> Result<()> {
    if remote {
        let health = StudioClient::new(config.client.server_url.clone()).health().await?;
        println!("{}: {} ({})", config.client.server_url, health.status, health.version);
        return Ok(());
    }

    let settings = config.provider_settings();
    build_provider(&settings)?;
    println!("provider: {} ({})", settings.kind, settings.effective_model());

    let posts_dir = config.content_path("posts")?;
    let catalog = PostCatalog::load(&posts_dir).await?;
    println!("posts: {} in {}", catalog.len(), posts_dir.display());
    println!("forms: {:?}", config.forms.storage);
    println!("healthy");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use studio_llm::ProviderKind;
    use tempfile::TempDir;

    fn mock_config(dir: &TempDir) -> StudioConfig {
        let mut config = StudioConfig {
            base_path: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        config.llm.provider = ProviderKind::Mock;
        config.llm.max_attempts = 1;
        config
    }

    #[tokio::test]
    async fn test_generate_with_mock_saves_draft() {
        let dir = TempDir::new().unwrap();
        let config = mock_config(&dir);
        let out = dir.path().join("drafts");

        generate(
            &config,
            GenerateArgs {
                topic: "Follow-up emails".into(),
                out: Some(out.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let saved = out.join("five-follow-up-emails-that-close-deals.mdx");
        let text = tokio::fs::read_to_string(saved).await.unwrap();
        assert_eq!(text, studio_llm::SAMPLE_DRAFT);
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_tone() {
        let dir = TempDir::new().unwrap();
        let err = generate(
            &mock_config(&dir),
            GenerateArgs {
                topic: "x".into(),
                tone: Some("Whimsical".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_input());
    }

    #[test]
    fn test_render_preview() {
        let config = StudioConfig::default();
        let raw = "---\ntitle: 'X'\ncategory: Sales\n---\n## Hi";
        let html = render_preview(&config, raw, true).unwrap();
        assert!(html.contains("#3B82F6"));
        let json: serde_json::Value = serde_json::from_str(&render_preview(&config, raw, false).unwrap()).unwrap();
        assert_eq!(json["blocks"][0]["level"], 2);
    }

    #[tokio::test]
    async fn test_local_health_with_empty_content() {
        let dir = TempDir::new().unwrap();
        health(&mock_config(&dir), false).await.unwrap();
    }

    #[test]
    fn test_file_store_selected() {
        let dir = TempDir::new().unwrap();
        let mut config = mock_config(&dir);
        config.forms.storage = FormStorage::File;
        assert!(submission_store(&config).is_ok());
    }
}
