use doc_assistant::infrastructure::{build_assistant, AppConfig};
use std::io::{BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ask=info,doc_assistant=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let assistant = build_assistant(&config)?;

    let report = assistant.ingest_and_index().await?;
    println!(
        "Indexed {} documents ({} chunks).",
        report.documents, report.chunks
    );
    for skipped in &report.skipped {
        println!("  skipped empty document: {skipped}");
    }

    println!("\nLoaded documents:");
    for doc in assistant.list_documents().await? {
        println!("  {} ({} bytes, {})", doc.filename, doc.size_bytes, doc.file_type);
    }

    println!("\nReady! Ask questions about your documents. Type 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let query = line?;
        let query = query.trim();
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }
        if query.is_empty() {
            continue;
        }

        match assistant.query(query, None).await {
            Ok(answer) => {
                println!("\nAI: {}", answer.answer);
                if !answer.sources.is_empty() {
                    println!("\nSources:");
                    for (i, source) in answer.sources.iter().enumerate() {
                        println!("{}. {} (score {:.3})", i + 1, source.filename, source.score);
                    }
                }
                println!();
            }
            Err(e) => println!("\nError: {e}\n"),
        }
    }

    Ok(())
}
