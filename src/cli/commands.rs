//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;

/// Commands for the Sarvam document translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate Word documents
    Doc {
        /// Input file or directory (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source language code (e.g. en-IN)
        #[arg(long)]
        source_lang: String,

        /// Target language code (e.g. hi-IN)
        #[arg(short, long)]
        target_lang: String,

        /// Recursively translate subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Enable debug mode
        #[arg(long)]
        debug: bool,
    },
}

/// Handle document translation command
pub async fn handle_doc(
    file: PathBuf,
    output: Option<PathBuf>,
    source_lang: String,
    target_lang: String,
    recursive: bool,
) -> anyhow::Result<()> {
    use crate::core::client::SarvamClient;
    use crate::processors::docx::DocxProcessor;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;
    use tracing::info;

    let start_time = Instant::now();

    // Determine output path
    let translating_dir = file.is_dir();
    let output = output.unwrap_or_else(|| {
        if translating_dir {
            file.join("translated")
        } else {
            let mut out = file.clone();
            let mut filename = file.file_stem().unwrap().to_os_string();
            filename.push("_translated.docx");
            out.set_file_name(filename);
            out
        }
    });

    info!("Starting document translation");
    info!("Input: {}", file.display());
    info!("Output: {}", output.display());
    info!("Source language: {}", source_lang);
    info!("Target language: {}", target_lang);
    info!("Recursive: {}", recursive);

    // Create client and processor
    let translator = SarvamClient::from_env()?;
    let max_chars = translator.config().max_chars;
    let processor = DocxProcessor::new();

    // Find files
    let files = if translating_dir {
        if recursive {
            processor.find_docx_files_recursive(&file)?
        } else {
            processor.find_docx_files(&file)?
        }
    } else {
        vec![file]
    };

    if files.is_empty() {
        anyhow::bail!("No docx files found");
    }

    // Create progress bar
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap()
        .progress_chars("=>-"));

    // Process files
    let mut processed = 0;
    let mut failed = 0;

    for file_path in files {
        pb.set_message(format!("Processing: {}", file_path.display()));

        let destination = if translating_dir {
            output.join(file_path.file_name().unwrap())
        } else {
            output.clone()
        };

        match processor
            .translate_file(
                &translator,
                &file_path,
                &destination,
                &source_lang,
                &target_lang,
                max_chars,
            )
            .await
        {
            Ok(_) => {
                processed += 1;
                pb.inc(1);
            }
            Err(e) => {
                failed += 1;
                pb.set_message(format!("Failed: {} - {}", file_path.display(), e));
                eprintln!("Error processing {}: {}", file_path.display(), e);
            }
        }
    }

    pb.finish_with_message("Completed");

    let duration = start_time.elapsed();
    info!(
        "Completed: {} processed, {} failed in {:?}",
        processed, failed, duration
    );

    println!("\n✅ Translation completed!");
    println!("   Processed: {}", processed);
    println!("   Failed: {}", failed);
    println!("   Time: {:?}", duration);

    Ok(())
}

/// Handle server command
pub async fn handle_server(host: String, port: u16, debug: bool) -> anyhow::Result<()> {
    use crate::server::api::run_server;
    use tracing::info;

    if debug {
        std::env::set_var("RUST_LOG", "debug");
    }

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Server starting on http://{}:{}", host, port);

    run_server(host, port).await?;

    Ok(())
}
