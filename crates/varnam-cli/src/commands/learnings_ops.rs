use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

use super::open_engine;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Write learnings as JSON to `output`, or stdout when `None`.
pub fn export(db: &Path, output: Option<&str>) {
    let v = die!(open_engine(db), "Error opening learnings: {}");
    let learnings = match output {
        Some(file) => {
            let f = die!(File::create(file), "Error creating {file}: {}");
            let mut w = BufWriter::new(f);
            let l = die!(v.export_learnings(&mut w), "Error exporting: {}");
            die!(w.flush(), "Error writing {file}: {}");
            l
        }
        None => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            let l = die!(v.export_learnings(&mut w), "Error exporting: {}");
            die!(writeln!(w), "Error writing output: {}");
            l
        }
    };
    eprintln!(
        "Exported {} words, {} patterns ({})",
        learnings.words.len(),
        learnings.patterns.len(),
        learnings.language
    );
}

pub fn import(db: &Path, input: &str) {
    let f = die!(File::open(input), "Error opening {input}: {}");
    let v = die!(open_engine(db), "Error opening learnings: {}");
    let summary = die!(
        v.import_learnings(BufReader::new(f)),
        "Error importing {input}: {}"
    );
    die!(v.checkpoint(), "Error writing checkpoint: {}");
    println!(
        "Imported {} words, {} patterns ({} skipped)",
        summary.words, summary.patterns, summary.skipped
    );
}
