use anyhow::Context;
use boundguard_types::RepoPath;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[".git", "node_modules"];

/// Include/ignore glob sets selecting project files.
#[derive(Clone, Debug)]
pub struct FileFilter {
    include: GlobSet,
    ignore: GlobSet,
}

impl FileFilter {
    pub fn new(include: &[String], ignore: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            include: build_globset(include).context("compile include globset")?,
            ignore: build_globset(ignore).context("compile ignore globset")?,
        })
    }

    /// True when `path` is selected by `include` and not removed by `ignore`.
    pub fn accepts(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.ignore.is_match(path)
    }
}

/// Walk `repo_root` and return every file accepted by `filter`, sorted.
pub fn discover_files(repo_root: &Utf8Path, filter: &FileFilter) -> anyhow::Result<Vec<RepoPath>> {
    let mut out: Vec<RepoPath> = Vec::new();

    let walker = WalkDir::new(repo_root).into_iter().filter_entry(|e| {
        !(e.file_type().is_dir()
            && e.depth() > 0
            && e.file_name().to_str().is_some_and(|n| SKIP_DIRS.contains(&n)))
    });

    for entry in walker {
        let entry = entry.with_context(|| format!("walk {repo_root}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(abs) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            continue;
        };
        let Some(rel) = RepoPath::relative_to(repo_root, &abs) else {
            continue;
        };
        if filter.accepts(rel.as_str()) {
            out.push(rel);
        }
    }

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
