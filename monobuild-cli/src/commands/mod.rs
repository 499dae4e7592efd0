pub mod build;
pub mod classify;
pub mod select;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use monobuild_select::{
    pipeline::{self, LayoutSource},
    Selection,
};

/// Options shared by every command that runs selection.
#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Directory to start repository discovery from.
    #[arg(long, env = "MONOBUILD_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Layout file; defaults to `<repo root>/monobuild.yaml` when present.
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,
}

impl SelectionArgs {
    /// Absolute start directory; a relative `--root` resolves against the cwd.
    pub fn start_dir(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        Ok(match &self.root {
            Some(root) => cwd.join(root).components().collect(),
            None => cwd,
        })
    }

    pub fn layout_source(&self) -> LayoutSource {
        match &self.layout {
            Some(path) => LayoutSource::File(path.clone()),
            None => LayoutSource::Discover,
        }
    }

    pub fn select(&self) -> Result<Selection> {
        let start = self.start_dir()?;
        pipeline::run(&start, self.layout_source())
            .with_context(|| format!("selection failed in {}", start.display()))
    }
}

/// `path` relative to `root` when it lies inside it.
pub fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
