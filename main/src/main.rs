//! `bible-importer`: ingests Bible text and reference data into the Prism
//! retrieval service with token-aware chunking.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use common::utils::config::{get_config, AppConfig};
use ingestion_pipeline::chunker::{ChunkingConfig, TiktokenCounter, VerseChunker, FILL_THRESHOLD};
use ingestion_pipeline::importers::{books, geography::GeographyImporter, lexicon::LexiconImporter};
use ingestion_pipeline::parser::{parse_bible_csv, validate_verse_integrity};
use prism_client::{
    import_documents_in_batches, BatchImportReport, ImportFailure, PrismClient, UploadOptions,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "bible-importer",
    version,
    about = "Bible text ingestion for the Prism retrieval service"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Bible translation from a verses CSV
    ImportBible {
        /// Translation identifier (e.g. kjv, asv)
        #[arg(short = 'v', long)]
        version: String,
        /// Path to the verses CSV file
        #[arg(long)]
        verses_csv: PathBuf,
        /// Comma-separated book names to import (default: all)
        #[arg(long)]
        books: Option<String>,
        /// Documents per API batch (max 100)
        #[arg(long)]
        batch_size: Option<usize>,
        /// Skip embedding generation
        #[arg(long)]
        no_embed: bool,
        /// Parse and chunk only, without calling Prism
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate verses CSV data quality
    Validate {
        /// Translation identifier (e.g. kjv)
        #[arg(short = 'v', long)]
        version: String,
        /// Path to the verses CSV file
        #[arg(long)]
        verses_csv: PathBuf,
    },
    /// Check import status in Prism
    Status {
        /// Translation to count documents for (optional)
        #[arg(short = 'v', long)]
        version: Option<String>,
    },
    /// Run a semantic search against imported documents
    Search {
        /// Search query text
        #[arg(short = 'q', long)]
        query: String,
        /// Filter by translation (e.g. kjv)
        #[arg(short = 'v', long)]
        version: Option<String>,
        /// Number of results to return
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
    /// Import Strong's Hebrew and Greek lexicons
    ImportLexicon {
        /// Directory holding the Strong's dictionary files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        no_embed: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Import biblical geography data
    ImportGeography {
        /// Directory holding (or receiving) the place data
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Do not download the data file if missing
        #[arg(long)]
        no_download: bool,
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        no_embed: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Import book-level metadata documents
    ImportBooks {
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long)]
        no_embed: bool,
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let config = get_config()?;

    let exit = match cli.command {
        Commands::ImportBible {
            version,
            verses_csv,
            books,
            batch_size,
            no_embed,
            dry_run,
        } => {
            import_bible(
                &config, &version, &verses_csv, books, batch_size, no_embed, dry_run,
            )
            .await?
        }
        Commands::Validate {
            version,
            verses_csv,
        } => validate(&config, &version, &verses_csv)?,
        Commands::Status { version } => status(&config, version.as_deref()).await?,
        Commands::Search {
            query,
            version,
            top_k,
        } => search(&config, &query, version.as_deref(), top_k).await?,
        Commands::ImportLexicon {
            data_dir,
            batch_size,
            no_embed,
            dry_run,
        } => import_lexicon(&config, data_dir, batch_size, no_embed, dry_run).await?,
        Commands::ImportGeography {
            data_dir,
            no_download,
            batch_size,
            no_embed,
            dry_run,
        } => {
            import_geography(&config, data_dir, no_download, batch_size, no_embed, dry_run).await?
        }
        Commands::ImportBooks {
            batch_size,
            no_embed,
            dry_run,
        } => import_books(&config, batch_size, no_embed, dry_run).await?,
    };

    Ok(exit)
}

fn build_chunker(config: &AppConfig) -> anyhow::Result<VerseChunker> {
    Ok(VerseChunker::new(
        Arc::new(TiktokenCounter::new()?),
        ChunkingConfig::from(config),
    )?)
}

fn upload_options(config: &AppConfig, batch_size: Option<usize>, no_embed: bool) -> UploadOptions {
    UploadOptions {
        batch_size: batch_size.unwrap_or(config.batch_size),
        embed: !no_embed && config.embed,
        ..UploadOptions::default()
    }
}

#[allow(clippy::too_many_arguments)]
async fn import_bible(
    config: &AppConfig,
    version: &str,
    verses_csv: &std::path::Path,
    books: Option<String>,
    batch_size: Option<usize>,
    no_embed: bool,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    let translation = version.to_uppercase();

    println!("Parsing {translation} from {}...", verses_csv.display());

    let filter_books: Option<Vec<String>> = books.map(|list| {
        list.split(',')
            .map(|name| name.trim().to_string())
            .collect()
    });
    if let Some(filter) = &filter_books {
        println!("   Filtering to books: {}", filter.join(", "));
    }

    let verses = match parse_bible_csv(verses_csv, &translation, filter_books.as_deref()) {
        Ok(verses) => verses,
        Err(err) => {
            eprintln!("Error parsing CSV: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("Parsed {} verses", verses.len());

    let report = validate_verse_integrity(&verses);
    println!("   Books: {}", report.books_found);
    println!("   Chapters: {}", report.chapters_found);
    if !report.issues.is_empty() {
        println!("Found {} issues:", report.issues.len());
        for issue in report.issues.iter().take(5) {
            println!("   - {issue}");
        }
    }

    println!("\nChunking verses...");
    let chunker = build_chunker(config)?;
    let chunks = chunker.chunk_verses(&verses, &translation)?;
    println!("Created {} chunks", chunks.len());

    let quality = chunker.analyze(&verses, &translation)?;
    let target = config.target_chunk_tokens as f64;
    println!("\nChunking quality:");
    println!(
        "   Verses per chunk (avg): {:.1}",
        quality.verses_per_chunk_avg
    );
    println!("   Token distribution:");
    println!("      Min: {}", quality.token_stats.min);
    println!("      Avg: {:.0}", quality.token_stats.avg);
    println!("      Max: {}", quality.token_stats.max);
    if quality.total_chunks > 0 {
        println!(
            "   Chunks in target range ({:.0}-{:.0} tokens): {} ({:.1}%)",
            target * FILL_THRESHOLD,
            target * 1.2,
            quality.chunks_in_target_range,
            quality.chunks_in_target_range as f64 / quality.total_chunks as f64 * 100.0
        );
    }
    if quality.chunks_below_min > 0 {
        println!(
            "   {} chunks below minimum ({} tokens)",
            quality.chunks_below_min, config.min_chunk_tokens
        );
    }
    if quality.chunks_above_max > 0 {
        println!(
            "   {} chunks above maximum ({} tokens)",
            quality.chunks_above_max, config.max_chunk_tokens
        );
    }

    if dry_run {
        println!("\nDry run complete (no data imported)");
        return Ok(ExitCode::SUCCESS);
    }

    let documents = chunks
        .into_iter()
        .map(|chunk| chunk.into_document())
        .collect::<Result<Vec<_>, _>>()?;

    let options = upload_options(config, batch_size, no_embed);
    println!("\nImporting to Prism ({})...", config.prism_base_url);
    println!("   Domain: bible/{}", translation.to_lowercase());
    println!("   Batch size: {}", options.batch_size);
    println!(
        "   Embedding: {}",
        if options.embed { "enabled" } else { "disabled" }
    );

    let client = PrismClient::from_config(config)?;
    let report = import_documents_in_batches(&client, &documents, &options).await?;
    print_import_report(&report);

    if report.error_count > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(
    config: &AppConfig,
    version: &str,
    verses_csv: &std::path::Path,
) -> anyhow::Result<ExitCode> {
    let translation = version.to_uppercase();
    println!("Validating {translation} from {}...", verses_csv.display());

    let verses = match parse_bible_csv(verses_csv, &translation, None) {
        Ok(verses) => verses,
        Err(err) => {
            eprintln!("Error parsing CSV: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = validate_verse_integrity(&verses);
    println!("\nValidation results:");
    println!("   Total verses: {}", report.total_verses);
    println!("   Books: {}", report.books_found);
    println!("   Chapters: {}", report.chapters_found);

    if !report.issues.is_empty() {
        println!("\nIssues found ({}):", report.issues.len());
        for issue in &report.issues {
            println!("   - {issue}");
        }
        return Ok(ExitCode::FAILURE);
    }
    println!("\nNo issues found");

    let chunker = build_chunker(config)?;
    let quality = chunker.analyze(&verses, &translation)?;
    println!("\nChunking analysis:");
    println!("   Estimated chunks: {}", quality.total_chunks);
    println!(
        "   Verses per chunk (avg): {:.1}",
        quality.verses_per_chunk_avg
    );
    println!(
        "   Token range: {}-{}",
        quality.token_stats.min, quality.token_stats.max
    );
    println!("   Token average: {:.0}", quality.token_stats.avg);

    Ok(ExitCode::SUCCESS)
}

async fn status(config: &AppConfig, version: Option<&str>) -> anyhow::Result<ExitCode> {
    let domain = version.map(|v| format!("bible/{}", v.to_lowercase()));
    match version {
        Some(version) => println!("Checking status for {}...", version.to_uppercase()),
        None => println!("Checking Prism status..."),
    }

    let client = PrismClient::from_config(config)?;
    if !client.check_health().await {
        eprintln!("Prism not accessible at {}", client.base_url());
        return Ok(ExitCode::FAILURE);
    }
    println!("Prism is healthy");

    let stats = client.get_stats().await?;
    println!("\nPrism statistics:");
    println!("   Total documents: {}", stats.total_documents);
    println!("   Corpus documents: {}", stats.corpus_documents);
    println!("   KB documents: {}", stats.kb_documents);
    println!("   Total chunks: {}", stats.total_chunks);
    println!("   Embedded chunks: {}", stats.embedded_chunks);
    println!("   Unique domains: {}", stats.domains);

    if let Some(domain) = domain {
        let count = client.count_domain_documents(&domain).await;
        println!("\n   Documents in {domain}: {count}");
    }

    Ok(ExitCode::SUCCESS)
}

async fn search(
    config: &AppConfig,
    query: &str,
    version: Option<&str>,
    top_k: usize,
) -> anyhow::Result<ExitCode> {
    let domain = version.map(|v| format!("bible/{}", v.to_lowercase()));

    println!("Searching for: '{query}'");
    if let Some(domain) = &domain {
        println!("   Domain: {domain}");
    }

    let client = PrismClient::from_config(config)?;
    let response = client
        .search_documents(query, domain.as_deref(), top_k)
        .await?;

    if response.results.is_empty() {
        println!("\nNo results found");
        return Ok(ExitCode::SUCCESS);
    }

    println!("\nFound {} results:\n", response.results.len());
    for (idx, hit) in response.results.iter().enumerate() {
        println!(
            "{}. {} (similarity: {:.3})",
            idx + 1,
            hit.display_title(),
            hit.similarity
        );
        let preview: String = if hit.content.chars().count() > 200 {
            let truncated: String = hit.content.chars().take(200).collect();
            format!("{truncated}...")
        } else {
            hit.content.clone()
        };
        println!("   {preview}\n");
    }

    Ok(ExitCode::SUCCESS)
}

async fn import_lexicon(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
    batch_size: Option<usize>,
    no_embed: bool,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    let data_dir =
        data_dir.unwrap_or_else(|| PathBuf::from(&config.data_dir).join("strongs"));

    let importer = LexiconImporter::new(&data_dir);
    let documents = importer.load_all()?;
    println!("Parsed {} lexicon entries", documents.len());

    upload_or_preview(config, documents, batch_size, no_embed, dry_run).await
}

async fn import_geography(
    config: &AppConfig,
    data_dir: Option<PathBuf>,
    no_download: bool,
    batch_size: Option<usize>,
    no_embed: bool,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    let data_dir =
        data_dir.unwrap_or_else(|| PathBuf::from(&config.data_dir).join("geography"));

    let importer = GeographyImporter::new(&data_dir);
    if !no_download {
        importer.download_data(false).await?;
    }
    let documents = importer.load_documents()?;
    println!("Converted {} place entries to documents", documents.len());

    upload_or_preview(config, documents, batch_size, no_embed, dry_run).await
}

async fn import_books(
    config: &AppConfig,
    batch_size: Option<usize>,
    no_embed: bool,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    let documents = books::book_documents();
    println!("Generated {} book metadata documents", documents.len());

    upload_or_preview(config, documents, batch_size, no_embed, dry_run).await
}

async fn upload_or_preview(
    config: &AppConfig,
    documents: Vec<common::document::CorpusDocument>,
    batch_size: Option<usize>,
    no_embed: bool,
    dry_run: bool,
) -> anyhow::Result<ExitCode> {
    if dry_run {
        println!("\nDry run complete (no data imported). Sample documents:");
        for document in documents.iter().take(3) {
            println!("   - {}", document.title);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let options = upload_options(config, batch_size, no_embed);
    let client = PrismClient::from_config(config)?;
    let report = import_documents_in_batches(&client, &documents, &options).await?;
    print_import_report(&report);

    if report.error_count > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_import_report(report: &BatchImportReport) {
    println!("\nImport complete");
    println!("   Total documents: {}", report.total_documents);
    println!("   Successful: {}", report.success_count);
    println!("   Errors: {}", report.error_count);

    if !report.failures.is_empty() {
        println!("\nErrors encountered:");
        for failure in report.failures.iter().take(10) {
            match failure {
                ImportFailure::Batch { batch, message } => {
                    println!("   - Batch {batch}: {message}");
                }
                ImportFailure::Document { title, message } => {
                    println!("   - {title}: {message}");
                }
            }
        }
    }
}
