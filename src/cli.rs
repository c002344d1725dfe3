//! Command line front end: check (validate) or fmt (re-emit compact) JSON files.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use json_field::{Json, ParseError, Variant};
use rayon::prelude::*;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON documents or rewrite them in compact form
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// log parser diagnostics (debug level)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse every document and report the first error of each with its position
    Check(CheckArgs),
    /// parse every document and write it back as compact JSON
    Fmt(FmtArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(clap::Parser, Debug)]
struct FmtArgs {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One document of one source file, kept as raw bytes so that invalid UTF-8
/// is reported per document.
struct Document {
    path: PathBuf,
    /// 1-based line of the document inside an NDJSON file.
    line: Option<usize>,
    source: Vec<u8>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        let mut documents = Vec::new();
        for path in source_paths {
            let source = std::fs::read(&path)
                .with_context(|| format!("failed to read source file {}", path.display()))?;
            if !self.ndjson {
                documents.push(Document { path, line: None, source });
                continue;
            }
            for (index, line) in source.split(|byte| *byte == b'\n').enumerate() {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                documents.push(Document { path: path.clone(), line: Some(index + 1), source: line.to_vec() });
            }
        }
        log::debug!("loaded {} document(s)", documents.len());
        Ok(documents)
    }
}

impl Document {
    fn parse(&self) -> Result<Variant, ParseError> {
        let mut value = Variant::new();
        value.from_json_reader(self.source.as_slice())?;
        Ok(value)
    }

    /// `path:line:column` of a byte offset.
    fn locate(&self, offset: usize) -> String {
        let text = String::from_utf8_lossy(&self.source[..offset.min(self.source.len())]);
        let (line, column) = line_column(&text, offset);
        let line = self.line.unwrap_or(line);
        format!("{}:{line}:{column}", self.path.display())
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Check(target) => {
                let documents = target.input_settings.load_documents()?;
                let failures: Vec<String> = documents
                    .par_iter()
                    .filter_map(|document| {
                        let error = document.parse().err()?;
                        Some(format!("{} {}", document.locate(error.offset()).bold(), error.error().to_string().red()))
                    })
                    .collect();
                for failure in &failures {
                    eprintln!("{failure}");
                }
                let passed = documents.len() - failures.len();
                if failures.is_empty() {
                    eprintln!("{} {passed} document(s) ok", "✓".green());
                    return Ok(ExitCode::SUCCESS);
                }
                eprintln!("{} {} of {} document(s) failed", "✗".red(), failures.len(), documents.len());
                Ok(ExitCode::FAILURE)
            }
            Command::Fmt(target) => {
                let documents = target.input_settings.load_documents()?;
                let mut output = String::new();
                for document in &documents {
                    let value = match document.parse() {
                        Ok(value) => value,
                        Err(error) => bail!("{}: {error}", document.locate(error.offset())),
                    };
                    output.push_str(&value.to_json());
                    output.push('\n');
                }
                match target.out.as_ref() {
                    Some(out) => write_output(out, &output)?,
                    None => print!("{output}"),
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |tail| tail.chars().count()) + 1;
    (line, column)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_map_to_line_and_column() {
        let text = "{\n  \"a\": é,\n}";
        assert_eq!(line_column(text, 0), (1, 1));
        assert_eq!(line_column(text, 2), (2, 1));
        assert_eq!(line_column(text, 9), (2, 8));
        assert_eq!(line_column(text, 10), (2, 8));
        assert_eq!(line_column(text, 999), (3, 2));
    }

    #[test]
    fn ndjson_documents_keep_their_line() {
        let document = Document { path: PathBuf::from("x.ndjson"), line: Some(4), source: b"[1,".to_vec() };
        let error = document.parse().unwrap_err();
        assert_eq!(document.locate(error.offset()), "x.ndjson:4:4");
    }

    #[test]
    fn invalid_utf8_is_a_document_failure() {
        let document = Document { path: PathBuf::from("x.json"), line: None, source: b"[\"ok\",\n \xff]".to_vec() };
        let error = document.parse().unwrap_err();
        assert_eq!(error.error(), &json_field::Error::InvalidUtf8);
        assert_eq!(error.offset(), 8);
        assert_eq!(document.locate(error.offset()), "x.json:2:2");
    }
}
