use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use lexmend_core::{DocumentRepairer, RepairConfig};
use lexmend_ingest::OutputFormat;
use tracing_subscriber::EnvFilter;

mod config_file;
mod output;

use config_file::ConfigFile;
use output::ColorMode;

/// Repair word segmentation in text extracted from PDF documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Vocabulary sources shared by every subcommand.
#[derive(Args, Debug)]
struct Sources {
    /// Independent extraction pass (plain text); repeatable
    #[arg(long = "pass", value_name = "FILE")]
    passes: Vec<PathBuf>,

    /// Word list, plain or gzip-compressed (falls back to LEXMEND_LEXICON)
    #[arg(long)]
    lexicon: Option<PathBuf>,
}

/// Repair behavior flags. Each one overrides the config file.
#[derive(Args, Debug)]
struct RepairFlags {
    /// Keep the vocabulary case-sensitive
    #[arg(long)]
    case_sensitive: bool,

    /// Pass tokens through without segmentation or ligature repair
    #[arg(long)]
    skip_merge: bool,

    /// Do not join hyphenated line breaks
    #[arg(long)]
    skip_dehyphenation: bool,

    /// Segment every line letter by letter
    #[arg(long)]
    force_character_split: bool,

    /// Emit one paragraph per block
    #[arg(long)]
    no_paragraph_merge: bool,

    /// Close paragraphs only at non-paragraph tags
    #[arg(long)]
    never_split_paragraphs: bool,

    /// The primary extractor drops ligatures; try to restore them
    #[arg(long)]
    ligature_repair: bool,

    /// Additional tag treated as a paragraph; repeatable
    #[arg(long = "paragraph-tag", value_name = "TAG")]
    paragraph_tags: Vec<String>,

    /// Print every repair decision to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Repair a primary extraction (XHTML or plain text)
    Repair {
        /// Path to the primary extraction
        primary: PathBuf,

        #[command(flatten)]
        sources: Sources,

        #[command(flatten)]
        flags: RepairFlags,

        /// Do not count the primary's own text as an extraction pass
        #[arg(long)]
        no_count_primary: bool,

        /// Output format: xhtml, text or json
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Path to output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Segment one string against the collected vocabulary
    Segment {
        /// Text to segment
        text: String,

        #[command(flatten)]
        sources: Sources,

        #[command(flatten)]
        flags: RepairFlags,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();
    let cli = Cli::parse();
    let file = config_file::load_config();

    match cli.command {
        Command::Repair {
            primary,
            sources,
            flags,
            no_count_primary,
            format,
            output,
        } => {
            let format = match format {
                Some(format) => format,
                None => file
                    .format()
                    .map(str::parse::<OutputFormat>)
                    .transpose()
                    .map_err(|e: String| anyhow::anyhow!("config file: {}", e))?
                    .unwrap_or_default(),
            };
            let count_primary = !no_count_primary && file.count_primary();
            repair(&primary, &sources, &flags, &file, count_primary, format, output)
        }
        Command::Segment {
            text,
            sources,
            flags,
        } => segment(&text, &sources, &flags, &file),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve configuration: CLI flags > config file > defaults
fn build_config(flags: &RepairFlags, file: &ConfigFile) -> anyhow::Result<RepairConfig> {
    let mut builder = file.repair_builder().verbose_trace(flags.verbose);
    if flags.case_sensitive {
        builder = builder.lowercase_fold(false);
    }
    if flags.skip_merge {
        builder = builder.skip_merge(true);
    }
    if flags.skip_dehyphenation {
        builder = builder.skip_dehyphenation(true);
    }
    if flags.force_character_split {
        builder = builder.force_character_split(true);
    }
    if flags.no_paragraph_merge {
        builder = builder.auto_merge_paragraphs(false);
    }
    if flags.never_split_paragraphs {
        builder = builder.never_split_paragraphs(true);
    }
    if flags.ligature_repair {
        builder = builder.ligature_repair(true);
    }
    for tag in &flags.paragraph_tags {
        builder = builder.add_paragraph_tag(tag.clone());
    }
    Ok(builder.build()?)
}

/// Build a repairer and feed it the lexicon and every pass.
fn collect(
    config: RepairConfig,
    sources: &Sources,
    file: &ConfigFile,
) -> anyhow::Result<DocumentRepairer> {
    let mut repairer = DocumentRepairer::new(config);

    let lexicon = sources
        .lexicon
        .clone()
        .or_else(|| std::env::var("LEXMEND_LEXICON").ok().map(PathBuf::from))
        .or_else(|| file.lexicon());
    if let Some(path) = lexicon {
        repairer.add_lexicon(lexmend_ingest::load_lexicon(&path)?);
    }

    for path in &sources.passes {
        if !path.exists() {
            anyhow::bail!("Pass not found: {}", path.display());
        }
        repairer.add_pass(lexmend_ingest::read_pass(path)?);
    }
    Ok(repairer)
}

fn repair(
    primary: &Path,
    sources: &Sources,
    flags: &RepairFlags,
    file: &ConfigFile,
    count_primary: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let color = ColorMode(!flags.no_color && file.color());
    let config = build_config(flags, file)?;

    if !primary.exists() {
        anyhow::bail!("File not found: {}", primary.display());
    }
    let blocks = lexmend_ingest::read_primary(primary)?;

    let mut repairer = collect(config, sources, file)?;
    if count_primary {
        repairer.add_pass(blocks.iter().flat_map(|b| b.lines.iter()));
    }

    let mut stderr = std::io::stderr();
    if flags.verbose {
        output::print_collection_summary(
            &mut stderr,
            repairer.passes(),
            repairer.vocabulary().len(),
            repairer.model().max_word_length(),
            color,
        )?;
    }

    let doc = repairer.repair_blocks(&blocks)?;

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };
    lexmend_ingest::render(format, &doc.items, &mut writer)?;
    writer.flush()?;

    if flags.verbose {
        output::print_trace(&mut stderr, &doc.trace, color)?;
    }
    Ok(())
}

fn segment(text: &str, sources: &Sources, flags: &RepairFlags, file: &ConfigFile) -> anyhow::Result<()> {
    let color = ColorMode(!flags.no_color && file.color());
    let config = build_config(flags, file)?;
    let mut repairer = collect(config, sources, file)?;

    let seg = repairer.segment_text(text)?;
    output::print_segmentation(&mut std::io::stdout(), &seg)?;

    if flags.verbose {
        let mut stderr = std::io::stderr();
        output::print_search_stats(&mut stderr, &seg, color)?;
        output::print_trace(&mut stderr, &repairer.take_trace(), color)?;
    }
    Ok(())
}
