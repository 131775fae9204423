//! Filename to display-title conversion.
//!
//! Catalog entries that ship without an explicit title get one derived from
//! their file name: `knowledge-webpage.html` becomes `knowledge webpage`,
//! `InteractiveGuidetoMachineLearning.html` becomes
//! `Interactive Guide to Machine Learning`.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.html?$").expect("extension regex compiles"));

// A lowercase "to" glued onto a headword that takes it ("GuidetoMachine").
// Limited to these headwords so names like "Toronto" or "Esperanto" survive.
static GLUED_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(Guide|Introduction|Intro|Path|Road|Gateway|Journey)to([A-Z])")
        .expect("connective regex compiles")
});

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel regex compiles"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex compiles"));

/// Convert a raw file name into a human-readable title.
///
/// Steps, in order:
/// 1. strip a trailing `.htm`/`.html` (any case)
/// 2. split a lowercase `to` glued between a headword such as `Guide` and the
///    next capitalized word
/// 3. turn `-` and `_` into spaces
/// 4. split camel-case boundaries (`aB` -> `a B`)
/// 5. collapse whitespace runs and trim
///
/// Total over every input and idempotent on its own output for names without
/// nested extensions.
pub fn normalize_title(file: &str) -> String {
    let stem = HTML_EXTENSION.replace(file, "");
    let stem = GLUED_TO.replace_all(&stem, "$1 to $2");
    let spaced = stem.replace(['-', '_'], " ");
    let split = CAMEL_BOUNDARY.replace_all(&spaced, "$1 $2");
    WHITESPACE_RUN.replace_all(&split, " ").trim().to_string()
}
