//! Per-generation population statistics.
//!
//! The genetic solver hands every finished generation to an optional
//! [`StatsSink`]. [`StatsDirectory`] persists them as two plain-text files per
//! problem, one `generation value` line per specimen:
//!
//! - `<dir>/<id>.<label>fitness`: fitness values
//! - `<dir>/<id>.<label>specimen`: genomes as bit strings
//!
//! Generation 0 truncates both files; later generations append.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::types::Specimen;

/// Receives the population at the end of every generation.
pub trait StatsSink: Send + Sync {
    /// Records one generation of the run for problem `problem_id`.
    fn record(&self, problem_id: u64, generation: usize, population: &[Specimen]) -> io::Result<()>;
}

/// Writes generation statistics into a directory.
#[derive(Debug, Clone)]
pub struct StatsDirectory {
    dir: PathBuf,
    label: String,
}

impl StatsDirectory {
    /// Creates a sink writing into `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            label: String::new(),
        }
    }

    /// Prefix inserted between the problem id and the file kind.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn fitness_path(&self, problem_id: u64) -> PathBuf {
        self.path(problem_id, "fitness")
    }

    pub fn specimen_path(&self, problem_id: u64) -> PathBuf {
        self.path(problem_id, "specimen")
    }

    fn path(&self, problem_id: u64, kind: &str) -> PathBuf {
        self.dir.join(format!("{problem_id}.{}{kind}", self.label))
    }
}

fn open(path: &Path, truncate: bool) -> io::Result<BufWriter<File>> {
    let file = if truncate {
        File::create(path)?
    } else {
        OpenOptions::new().create(true).append(true).open(path)?
    };
    Ok(BufWriter::new(file))
}

impl StatsSink for StatsDirectory {
    fn record(&self, problem_id: u64, generation: usize, population: &[Specimen]) -> io::Result<()> {
        let truncate = generation == 0;
        let mut fitness = open(&self.fitness_path(problem_id), truncate)?;
        let mut specimens = open(&self.specimen_path(problem_id), truncate)?;
        for s in population {
            writeln!(fitness, "{generation} {}", s.fitness)?;
            writeln!(specimens, "{generation} {}", s.genome)?;
        }
        fitness.flush()?;
        specimens.flush()
    }
}
