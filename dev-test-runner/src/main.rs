//! Runs the fixture suites under `cases/` through the engine.
//!
//! Each suite file lists cases of the form
//! `{"name", "target", "input", "expect": {"ok": "<text>"} | {"error": {"offset", "kind"?}}}`.
//! An optional first argument is a regex; only matching case names run.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use json_field::{Array, Bool, Date, Error, Field, Int, Json, Num, Str, Variant, json_object};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;

static FILTER: Lazy<Option<Regex>> = Lazy::new(|| {
    let pattern = std::env::args().nth(1)?;
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            eprintln!("ignoring invalid filter {pattern:?}: {error}");
            None
        }
    }
});

json_object! {
    struct Address {
        street: Str,
        city: Str,
    }
}

json_object! {
    struct Person {
        name: Str,
        age: Int,
        address: Address,
        tags: Array<Str>,
        #[key = "extra"]
        misc: Variant,
    }
}

json_object! {
    struct Employee extends Person {
        badge: Int,
        hired: Date,
    }
}

#[derive(Debug, Deserialize)]
struct Suite {
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    target: Target,
    input: String,
    expect: Expect,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Target {
    Variant,
    Int,
    Num,
    Str,
    Bool,
    Date,
    IntArray,
    NestedIntArray,
    Person,
    Employee,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Expect {
    Ok(String),
    Error {
        offset: usize,
        #[serde(default)]
        kind: Option<String>,
    },
}

impl Target {
    fn fresh(self) -> Box<dyn Field> {
        match self {
            Target::Variant => Box::new(Variant::new()),
            Target::Int => Box::new(Int::default()),
            Target::Num => Box::new(Num::default()),
            Target::Str => Box::new(Str::default()),
            Target::Bool => Box::new(Bool::default()),
            Target::Date => Box::new(Date::default()),
            Target::IntArray => Box::new(Array::<Int>::new()),
            Target::NestedIntArray => Box::new(Array::<Array<Int>>::new()),
            Target::Person => Box::new(Person::default()),
            Target::Employee => Box::new(Employee::default()),
        }
    }
}

impl Case {
    fn run(&self) -> Result<(), String> {
        let mut target = self.target.fresh();
        let outcome = target.from_json(&self.input);
        match (&self.expect, outcome) {
            (Expect::Ok(expected), Ok(())) => {
                let written = target.to_json();
                if &written != expected {
                    return Err(format!("wrote {written:?}, expected {expected:?}"));
                }
                let mut again = self.target.fresh();
                again.from_json(&written).map_err(|error| format!("re-parse of {written:?} failed: {error}"))?;
                if again.to_json() != written {
                    return Err(format!("round trip of {written:?} changed the text"));
                }
                Ok(())
            }
            (Expect::Ok(_), Err(error)) => Err(format!("failed: {error}")),
            (Expect::Error { offset, kind }, Err(error)) => {
                if error.offset() != *offset {
                    return Err(format!("error {error}, expected offset {offset}"));
                }
                if let Some(kind) = kind {
                    let actual = kind_of(error.error());
                    if actual != kind {
                        return Err(format!("error kind {actual}, expected {kind}"));
                    }
                }
                if !target.is_undefined() {
                    return Err("target not reset after failure".to_owned());
                }
                Ok(())
            }
            (Expect::Error { .. }, Ok(())) => Err(format!("succeeded with {:?}", target.to_json())),
        }
    }
}

fn kind_of(error: &Error) -> &'static str {
    match error {
        Error::UnexpectedEndOfInput => "unexpected_end_of_input",
        Error::UnexpectedCharacter => "unexpected_character",
        Error::TypeMismatch { .. } => "type_mismatch",
        Error::ConversionTypeMismatch { .. } => "conversion_type_mismatch",
        Error::MalformedNumber(_) => "malformed_number",
        Error::MalformedDate(_) => "malformed_date",
        Error::NestingTooDeep(_) => "nesting_too_deep",
        Error::Io(_) => "io",
        Error::InvalidUtf8 => "invalid_utf8",
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

fn suite_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn main() -> ExitCode {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cases");
    let files = match suite_files(&dir) {
        Ok(files) => files,
        Err(error) => {
            eprintln!("cannot list {}: {error}", dir.display());
            return ExitCode::FAILURE;
        }
    };

    let (mut passed, mut failed) = (0usize, 0usize);
    for file in files {
        let source = match std::fs::read_to_string(&file) {
            Ok(source) => source,
            Err(error) => {
                eprintln!("❌ {}: {error}", file.display());
                failed += 1;
                continue;
            }
        };
        let suite = match from_str_with_path::<Suite>(&source) {
            Ok(suite) => suite,
            Err(error) => {
                eprintln!("❌ {}: {error}", file.display());
                failed += 1;
                continue;
            }
        };
        for case in &suite.cases {
            if FILTER.as_ref().is_some_and(|filter| !filter.is_match(&case.name)) {
                continue;
            }
            match case.run() {
                Ok(()) => passed += 1,
                Err(reason) => {
                    eprintln!("❌ {} / {}: {reason}", file.display(), case.name);
                    failed += 1;
                }
            }
        }
    }

    eprintln!("{passed} passed, {failed} failed");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
