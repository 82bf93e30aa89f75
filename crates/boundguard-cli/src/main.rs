//! CLI entry point for boundguard.
//!
//! This module only handles argument parsing, logging setup, I/O, and exit codes.
//! The use cases live in the `boundguard-app` crate.

use anyhow::Context;
use boundguard_app::{
    CheckInput, ClassifyInput, ConfigFormat, ExplainOutput, format_classification,
    format_explanation, format_not_found, load_config, parse_report_json, render_annotations,
    render_markdown, run_check, run_classify, run_explain, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code,
};
use boundguard_domain::policy::Scope;
use boundguard_settings::Overrides;
use boundguard_types::{BoundguardReport, RepoPath};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::process::Command;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "boundguard",
    version,
    about = "Architectural layer-boundary checks for front-end source trees"
)]
struct Cli {
    /// Project root; file paths in the import graph are relative to it.
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Path to the boundguard config (TOML, or JSON when it ends in `.json`).
    #[arg(long, default_value = "boundguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|recommended|warn).
    #[arg(long)]
    profile: Option<String>,

    /// Override scope (repo|diff).
    #[arg(long)]
    scope: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long)]
    max_findings: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` applies when absent.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the boundary policy over an import graph and write artifacts.
    Check(CheckArgs),

    /// Print the element each project file is classified as.
    Classify {
        /// Emit a JSON array instead of aligned text.
        #[arg(long)]
        json: bool,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/boundguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/boundguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a check_id or code with remediation guidance.
    Explain {
        /// The check_id (e.g. "boundaries.element_types") or code (e.g. "not_in_allow_list").
        identifier: String,
    },

    /// Print the JSON schema of the config file.
    Schema,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Import graph, relative to the repo root: JSON, or one `importer -> imported` per line.
    #[arg(long, default_value = "imports.json")]
    graph: Utf8PathBuf,

    /// In diff scope: git base revision (e.g. origin/main).
    #[arg(long)]
    base: Option<String>,

    /// In diff scope: git head revision (e.g. HEAD).
    #[arg(long)]
    head: Option<String>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/boundguard/report.json")]
    report_out: Utf8PathBuf,

    /// Write a Markdown report alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown report (if enabled).
    #[arg(long, default_value = "artifacts/boundguard/comment.md")]
    markdown_out: Utf8PathBuf,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            profile: self.profile.clone(),
            scope: self.scope.clone(),
            max_findings: self.max_findings,
        }
    }

    fn resolved_root(&self) -> Utf8PathBuf {
        self.repo_root
            .canonicalize_utf8()
            .unwrap_or_else(|_| self.repo_root.clone())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.cmd {
        Commands::Check(args) => cmd_check(&cli, args),
        Commands::Classify { json } => cmd_classify(&cli, *json),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
        Commands::Explain { identifier } => cmd_explain(identifier),
        Commands::Schema => cmd_schema(),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    // A second init (e.g. from a test harness) is not an error worth failing on.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn cmd_check(cli: &Cli, args: &CheckArgs) -> anyhow::Result<()> {
    let repo_root = cli.resolved_root();

    let result = (|| -> anyhow::Result<i32> {
        if !repo_root.exists() {
            anyhow::bail!("repo root does not exist: {}", repo_root);
        }
        let (cfg_text, cfg_format) = read_config(&repo_root, &cli.config)?;
        let overrides = cli.overrides();

        // Only diff scope needs git; resolve first so a config-selected scope counts too.
        let resolved = load_config(&cfg_text, cfg_format, overrides.clone())?;
        let changed_files = match resolved.effective.scope {
            Scope::Repo => None,
            Scope::Diff => {
                let base = args.base.as_deref().context("diff scope requires --base")?;
                let head = args.head.as_deref().context("diff scope requires --head")?;
                Some(
                    git_changed_files(&repo_root, base, head)
                        .context("git diff --name-only failed")?,
                )
            }
        };

        let graph_path = repo_root.join(&args.graph);
        let output = run_check(CheckInput {
            repo_root: &repo_root,
            config_text: &cfg_text,
            config_format: cfg_format,
            graph_path: &graph_path,
            overrides,
            changed_files,
        })?;

        write_report_file(&args.report_out, &output.report).context("write report json")?;
        if args.write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(&args.report_out, &report);
            eprintln!("boundguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_classify(cli: &Cli, json: bool) -> anyhow::Result<()> {
    let repo_root = cli.resolved_root();
    let (cfg_text, cfg_format) = read_config(&repo_root, &cli.config)?;

    let entries = run_classify(ClassifyInput {
        repo_root: &repo_root,
        config_text: &cfg_text,
        config_format: cfg_format,
        overrides: cli.overrides(),
    })?;
    print!("{}", format_classification(&entries, json)?);
    Ok(())
}

/// A missing config file is allowed; defaults apply.
fn read_config(repo_root: &Utf8Path, config: &Utf8Path) -> anyhow::Result<(String, ConfigFormat)> {
    let path = repo_root.join(config);
    let format = ConfigFormat::from_path(&path);
    if !path.exists() {
        debug!(path = %path, "no config file; using defaults");
        return Ok((String::new(), format));
    }
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("read config: {}", path))?;
    Ok((text, format))
}

fn git_changed_files(
    repo_root: &Utf8Path,
    base: &str,
    head: &str,
) -> anyhow::Result<Vec<RepoPath>> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["diff", "--name-only", &format!("{base}..{head}")])
        .output()
        .context("spawn git")?;

    if !output.status.success() {
        anyhow::bail!("git diff returned non-zero exit status");
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(RepoPath::new)
        .collect())
}

fn write_report_file(path: &Utf8Path, report: &BoundguardReport) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    write_bytes(path, &data).with_context(|| format!("write report: {}", path))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {}", path))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<BoundguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {}", path))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{}", md),
    }
    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_schema() -> anyhow::Result<()> {
    let schema = boundguard_settings::config_schema();
    let text = serde_json::to_string_pretty(&schema).context("serialize config schema")?;
    println!("{text}");
    Ok(())
}
