//! CLI tool to inspect and edit slide assignments of transcript scripts.
//!
//! Usage:
//!   slidecurator [--root DIR] list
//!   slidecurator [--root DIR] show <SCRIPT>
//!   slidecurator [--root DIR] assign <SCRIPT> --paragraph N --slide FILE [--dry-run]

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slidecurator::{Action, CurationSession, CuratorConfig, FsRepository, SlideCandidate};

#[derive(Parser, Debug)]
#[command(
    name = "slidecurator",
    about = "Review and edit slide-to-paragraph assignments",
    version
)]
struct Cli {
    /// Directory holding one sub-directory per script
    #[arg(short, long, env = "SLIDECURATOR_ROOT")]
    root: Option<PathBuf>,

    /// Prefix joined onto slide files from slide_matches.json
    #[arg(long)]
    slide_prefix: Option<String>,

    /// JSON configuration file (script_root, slide_image_prefix, ignored_entries)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory entry under the root that is never a script (repeatable)
    #[arg(long = "ignore")]
    ignored: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List scripts that have both script.json and slide_matches.json
    List,

    /// Print paragraphs, candidates and assignments of a script
    Show {
        script: String,
    },

    /// Confirm a slide for a paragraph (detaches it from any other paragraph)
    Assign {
        #[command(flatten)]
        target: SlideTarget,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Remove a slide from a paragraph's candidates and assignments
    Unassign {
        #[command(flatten)]
        target: SlideTarget,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Drop all pending candidates of a paragraph
    ClearCandidates {
        script: String,
        #[arg(short, long)]
        paragraph: i64,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Replace a paragraph's text
    EditText {
        script: String,
        #[arg(short, long)]
        paragraph: i64,
        #[arg(short, long)]
        text: String,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Split a paragraph at a character offset
    Split {
        script: String,
        #[arg(short, long)]
        paragraph: i64,
        #[arg(long)]
        at: usize,
        #[command(flatten)]
        save: SaveArgs,
    },

    /// Remove a slide from the usable library
    DeleteSlide {
        script: String,
        #[arg(short, long)]
        slide: String,
        #[command(flatten)]
        save: SaveArgs,
    },
}

#[derive(Args, Debug)]
struct SlideTarget {
    script: String,
    #[arg(short, long)]
    paragraph: i64,
    #[arg(short, long)]
    slide: String,
}

#[derive(Args, Debug)]
struct SaveArgs {
    /// Apply the edit and print the result without writing script_edited.json
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let mut session = CurationSession::new(FsRepository::new(), config);

    match cli.command {
        Command::List => {
            let scripts = session.list_scripts().with_context(|| {
                format!(
                    "Failed to list scripts in {}",
                    session.config().script_root.display()
                )
            })?;
            if scripts.is_empty() {
                println!("No scripts found.");
            }
            for script in scripts {
                println!("{}", script);
            }
            Ok(())
        }
        Command::Show { script } => {
            open(&mut session, &script)?;
            report::print_script(session.store());
            Ok(())
        }
        Command::Assign { target, save } => {
            open(&mut session, &target.script)?;
            let candidate = candidate_for(&session, target.paragraph, &target.slide)?;
            edit(&mut session, Action::select_slide(target.paragraph, candidate), &save)
        }
        Command::Unassign { target, save } => {
            open(&mut session, &target.script)?;
            ensure_paragraph(&session, target.paragraph)?;
            let candidate = SlideCandidate::new(target.slide, 0.0);
            edit(&mut session, Action::reject_slide(target.paragraph, candidate), &save)
        }
        Command::ClearCandidates {
            script,
            paragraph,
            save,
        } => {
            open(&mut session, &script)?;
            ensure_paragraph(&session, paragraph)?;
            let action = Action::ClearSlideCandidatesForParagraph {
                paragraph_id: paragraph,
            };
            edit(&mut session, action, &save)
        }
        Command::EditText {
            script,
            paragraph,
            text,
            save,
        } => {
            open(&mut session, &script)?;
            ensure_paragraph(&session, paragraph)?;
            edit(&mut session, Action::update_text(paragraph, text), &save)
        }
        Command::Split {
            script,
            paragraph,
            at,
            save,
        } => {
            open(&mut session, &script)?;
            let target = session
                .store()
                .paragraph(paragraph)
                .with_context(|| format!("Cannot split in script {}", script))?;
            let action = Action::split_at(target, at, at)
                .with_context(|| format!("Cannot split paragraph {}", paragraph))?;
            edit(&mut session, action, &save)
        }
        Command::DeleteSlide {
            script,
            slide,
            save,
        } => {
            open(&mut session, &script)?;
            let action = Action::DeleteSlideFromLibrary { slide_file: slide };
            edit(&mut session, action, &save)
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<CuratorConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            CuratorConfig::from_json_str(&raw).context("Failed to parse config file")?
        }
        None => CuratorConfig::default(),
    };
    if let Some(root) = &cli.root {
        config = config.with_script_root(root);
    }
    if let Some(prefix) = &cli.slide_prefix {
        config = config.with_slide_image_prefix(prefix);
    }
    for entry in &cli.ignored {
        config = config.with_ignored_entry(entry);
    }
    Ok(config)
}

fn open(session: &mut CurationSession<FsRepository>, script: &str) -> Result<()> {
    session
        .open_script(script)
        .with_context(|| format!("Failed to open script {}", script))
}

fn ensure_paragraph(session: &CurationSession<FsRepository>, paragraph: i64) -> Result<()> {
    session.store().paragraph(paragraph)?;
    Ok(())
}

/// Reuses the paragraph's own candidate (and its score) when there is one.
fn candidate_for(
    session: &CurationSession<FsRepository>,
    paragraph: i64,
    slide: &str,
) -> Result<SlideCandidate> {
    let candidate = session
        .store()
        .paragraph(paragraph)?
        .slide_candidates
        .iter()
        .find(|c| c.slide_file == slide)
        .cloned()
        .unwrap_or_else(|| SlideCandidate::new(slide, 0.0));
    Ok(candidate)
}

fn edit(
    session: &mut CurationSession<FsRepository>,
    action: Action,
    save: &SaveArgs,
) -> Result<()> {
    let name = action.name();
    session.dispatch(action);

    if !session.store().script_edited() {
        println!("Nothing changed ({}).", name);
        return Ok(());
    }

    report::print_script(session.store());

    if save.dry_run {
        println!();
        println!("Dry run: not saved.");
        return Ok(());
    }

    let path = session.save().context("Failed to save script")?;
    println!();
    println!("Saved {}", path.display());
    Ok(())
}
