use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};

use varnam_cli::commands::{
    config_ops, default_db_path, learn_ops, learnings_ops, lookup_ops,
};

#[derive(Parser)]
#[command(name = "varnamtool", about = "Varnam learnings and suggestion tool")]
struct Cli {
    /// Learnings file (default: ~/.local/share/varnam/learnings.vrns)
    #[arg(long, global = true)]
    db: Option<String>,
    /// Write JSON trace logs to this directory (requires --features trace)
    #[cfg(feature = "trace")]
    #[arg(long, global = true)]
    trace_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Learn a word, or every word in a list file
    Learn {
        /// Word in script
        #[arg(required_unless_present = "file")]
        word: Option<String>,
        /// Word list (one word per line)
        #[arg(long, conflicts_with = "word")]
        file: Option<String>,
        /// Extra confidence added on first learn
        #[arg(long, default_value = "0")]
        confidence: u32,
    },
    /// Map a typed pattern to a word
    Train {
        /// Typed pattern
        #[arg(requires = "word", required_unless_present = "file")]
        pattern: Option<String>,
        /// Word in script
        word: Option<String>,
        /// Training file (`pattern<TAB>word` per line)
        #[arg(long, conflicts_with_all = ["pattern", "word"])]
        file: Option<String>,
    },
    /// Delete a word and its patterns
    Unlearn {
        /// Word in script
        word: String,
    },
    /// Look up words (exact, or as prefixes with --prefix)
    Search {
        /// Words in script
        #[arg(required = true)]
        words: Vec<String>,
        /// Return learnt words extending the given prefixes
        #[arg(long)]
        prefix: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Tokenize input and walk it against the dictionary
    Match {
        /// Typed input
        input: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve trained patterns for typed input
    Patterns {
        /// Typed input
        input: String,
        /// Only patterns extending the input
        #[arg(long)]
        trailing: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Full suggestion lists for typed input
    Transliterate {
        /// Typed input
        input: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export learnt words and patterns as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Import learnt words and patterns from JSON
    Import {
        /// JSON file written by `export`
        input: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Export the default scheme as TOML
    SchemeExport,
    /// Validate a custom scheme TOML file
    SchemeValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn usage_error(msg: &str) -> ! {
    eprintln!("Error: {msg}");
    process::exit(2);
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "trace")]
    if let Some(dir) = cli.trace_dir.as_deref() {
        varnam_engine::init_tracing(Path::new(dir));
    }

    let db_str = cli.db.unwrap_or_else(default_db_path);
    let db = Path::new(&db_str);

    match cli.command {
        Command::Learn {
            word,
            file,
            confidence,
        } => match (file, word) {
            (Some(file), _) => learn_ops::learn_file(db, &file),
            (None, Some(word)) => learn_ops::learn(db, &word, confidence),
            (None, None) => usage_error("learn needs a word or --file"),
        },
        Command::Train {
            pattern,
            word,
            file,
        } => match (file, pattern, word) {
            (Some(file), _, _) => learn_ops::train_file(db, &file),
            (None, Some(pattern), Some(word)) => learn_ops::train(db, &pattern, &word),
            _ => usage_error("train needs a pattern and a word, or --file"),
        },
        Command::Unlearn { word } => learn_ops::unlearn(db, &word),
        Command::Search {
            words,
            prefix,
            json,
        } => lookup_ops::search(db, &words, prefix, json),
        Command::Match { input, json } => lookup_ops::match_input(db, &input, json),
        Command::Patterns {
            input,
            trailing,
            json,
        } => lookup_ops::patterns(db, &input, trailing, json),
        Command::Transliterate { input, json } => lookup_ops::transliterate(db, &input, json),
        Command::Export { output } => learnings_ops::export(db, output.as_deref()),
        Command::Import { input } => learnings_ops::import(db, &input),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
        Command::SchemeExport => config_ops::scheme_export(),
        Command::SchemeValidate { file } => config_ops::scheme_validate(&file),
    }
}
