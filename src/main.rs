use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::info;

use phrasemark::{
    check_files, expand_inputs, BatchConfig, Lang, PhraseMatch, RefKind, TermExport, TermIndex,
    TermRecord, TextChecker,
};

#[derive(Parser, Debug)]
#[command(name = "phrasemark")]
#[command(about = "Inline highlighter for sensitive terms and translations in bilingual text")]
#[command(version)]
struct Args {
    /// Term export JSON file with terms and translations
    #[arg(long)]
    terms: PathBuf,

    /// Language of the checked text (de or en)
    #[arg(long)]
    lang: String,

    /// Text files to check; directories contribute their *.txt files.
    /// With no inputs and no --text, the text is read from stdin.
    inputs: Vec<PathBuf>,

    /// Check this literal text instead of files or stdin
    #[arg(long)]
    text: Option<String>,

    /// Emit matches as JSON instead of a readable report
    #[arg(long)]
    json: bool,

    /// Rewrite marks files even when they already exist
    #[arg(long)]
    overwrite: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Concurrent file checks in batch mode
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    /// Stats output file path for batch mode
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging keeps the report output on stdout clean
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let lang: Lang = args.lang.parse()?;

    if !args.terms.exists() {
        anyhow::bail!("Term export file does not exist: {}", args.terms.display());
    }

    let raw_export = tokio::fs::read_to_string(&args.terms)
        .await
        .with_context(|| format!("Failed to read term export {}", args.terms.display()))?;
    let export = TermExport::from_json(&raw_export)
        .with_context(|| format!("Failed to parse term export {}", args.terms.display()))?;
    info!(
        "Loaded export: {} terms, {} translations",
        export.terms.len(),
        export.translations.len()
    );

    let checker = TextChecker::new();
    checker.publish(TermIndex::build(&export.terms, &export.translations)?);

    if let Some(text) = args.text {
        return check_single(&text, lang, &checker, &export, args.json);
    }

    if args.inputs.is_empty() {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read text from stdin")?;
        return check_single(&text, lang, &checker, &export, args.json);
    }

    let paths = expand_inputs(&args.inputs)?;
    if paths.is_empty() {
        anyhow::bail!("No input files to check");
    }

    let config = BatchConfig {
        lang,
        overwrite: args.overwrite,
        fail_fast: args.fail_fast,
        concurrency: args.concurrency,
        show_progress: !args.no_progress,
    };
    let index = checker.snapshot()?;
    let stats = check_files(&paths, index, &config).await?;

    println!(
        "phrasemark v{} - batch check complete",
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "  Checked: {} files, skipped: {}, failed: {}",
        stats.files_checked, stats.files_skipped, stats.files_failed
    );
    println!(
        "  Total: {} characters, {} matches",
        stats.total_chars, stats.total_matches
    );

    if let Some(stats_out) = args.stats_out {
        let payload = serde_json::to_vec_pretty(&stats)?;
        tokio::fs::write(&stats_out, payload)
            .await
            .with_context(|| format!("Failed to write stats file {}", stats_out.display()))?;
        println!("  Stats written to {}", stats_out.display());
    }

    Ok(())
}

fn check_single(
    text: &str,
    lang: Lang,
    checker: &TextChecker,
    export: &TermExport,
    json: bool,
) -> Result<()> {
    let matches = checker.check(text, lang)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No sensitive terms found.");
        return Ok(());
    }

    let terms_by_id: HashMap<&str, &TermRecord> =
        export.terms.iter().map(|t| (t.id.as_str(), t)).collect();

    println!("{} sensitive phrase(s) found:", matches.len());
    for phrase_match in &matches {
        print_match(text, phrase_match, &terms_by_id);
    }
    Ok(())
}

fn print_match(text: &str, phrase_match: &PhraseMatch, terms_by_id: &HashMap<&str, &TermRecord>) {
    let snippet: String = text
        .chars()
        .skip(phrase_match.start)
        .take(phrase_match.end - phrase_match.start)
        .collect();
    println!(
        "  [{}..{}] \"{}\" ({})",
        phrase_match.start, phrase_match.end, snippet, phrase_match.display
    );
    for entry_ref in &phrase_match.refs {
        let kind = match entry_ref.kind {
            RefKind::Term => "term",
            RefKind::Translation => "translation",
        };
        println!("      {} {}", kind, entry_ref.id);
        if entry_ref.kind == RefKind::Term {
            if let Some(term) = terms_by_id.get(entry_ref.id.as_str()) {
                for example in &term.examples {
                    println!("        {}: {}", example.kind_label(), example.citation());
                }
            }
        }
    }
}
