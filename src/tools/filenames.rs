//! Filename cleaning and extraction

use log::debug;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LEADING_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\-_\s]+").expect("leading junk pattern"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digits pattern"));
static SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-_.]").expect("special character pattern"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("dash pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static TEXT_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\s<>"'|*?:;,]+\.[A-Za-z0-9]{1,10}"#).expect("filename pattern")
});
static LONG_LISTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\-dlbcps][rwxsStT\-]{9}[@+.]?\s+").expect("long listing pattern")
});

/// Fallback when nothing of the name survives cleaning
pub const UNNAMED_FILE: &str = "unnamed_file";

/// How [`clean_filename`] treats digits and underscores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    pub keep_numbers: bool,
    pub underscores_to_spaces: bool,
}

/// Where [`extract_filenames`] reads names from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Free text; anything shaped like `name.ext`
    Text,
    /// `ls` output, short or long format
    Listing,
    /// CSV with a header row; every field is searched like free text
    Csv,
}

crate::choice_enum!(SourceKind {
    Text => "text",
    Listing => "listing",
    Csv => "csv",
});

/// Cleans one filename, keeping its extension
///
/// Leading digits, dashes, underscores and spaces go first, then digits
/// (unless kept) and special characters. Dash runs collapse, whitespace is
/// normalised and the stem is title-cased. A stem that ends up empty becomes
/// `file.<ext>`, or `unnamed_file` without an extension.
pub fn clean_filename(name: &str, options: CleanOptions) -> String {
    let (stem, extension) = split_extension(name.trim());

    let mut stem = LEADING_JUNK.replace(stem, "").into_owned();
    if !options.keep_numbers {
        stem = DIGITS.replace_all(&stem, "").into_owned();
    }
    stem = SPECIAL.replace_all(&stem, "").into_owned();
    stem = DASHES.replace_all(&stem, "-").into_owned();
    if options.underscores_to_spaces {
        stem = stem.replace('_', " ");
    }
    let stem = WHITESPACE.replace_all(&stem, " ");
    let stem = title_case(stem.trim().trim_matches(|c| c == '-' || c == '.'));

    match (stem.is_empty(), extension) {
        (false, Some(ext)) => format!("{}.{}", stem, ext),
        (false, None) => stem,
        (true, Some(ext)) => format!("file.{}", ext),
        (true, None) => UNNAMED_FILE.to_string(),
    }
}

/// Splits at the last dot; a leading dot does not start an extension
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}

/// Upper-cases the first letter of every run of letters, lower-cases the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Extracts filenames from `content`, first occurrence first
pub fn extract_filenames(content: &str, kind: SourceKind) -> Vec<String> {
    let names: Vec<String> = match kind {
        SourceKind::Text => matches(content).collect(),
        SourceKind::Listing => content.lines().filter_map(listing_entry).collect(),
        SourceKind::Csv => csv_names(content),
    };
    dedupe(names)
}

fn listing_entry(line: &str) -> Option<String> {
    let line = line.trim_end();
    if line.trim().is_empty() || line.starts_with("total ") || line.ends_with(':') {
        return None;
    }
    let name = if let Some(prefix) = LONG_LISTING.find(line) {
        if line.starts_with('d') {
            return None;
        }
        // Past the permissions: links, owner, group, size and three date fields
        let name = skip_fields(&line[prefix.end()..], 7)?;
        name.split(" -> ").next().unwrap_or(name)
    } else {
        line.trim()
    };
    match name {
        "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Returns what follows the first `count` whitespace-separated fields
fn skip_fields(text: &str, count: usize) -> Option<&str> {
    let mut rest = text.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }
    (!rest.is_empty()).then_some(rest)
}

fn matches(text: &str) -> impl Iterator<Item = String> + '_ {
    TEXT_FILENAME.find_iter(text).map(|m| m.as_str().to_string())
}

/// Searches every field of every record after the header row
///
/// Rows of differing length are accepted; malformed records are skipped.
fn csv_names(content: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut names = Vec::new();
    for (row, record) in reader.records().enumerate() {
        match record {
            Ok(record) => names.extend(record.iter().flat_map(|field| matches(field))),
            Err(e) => debug!("skipping CSV record {}: {}", row + 1, e),
        }
    }
    names
}

fn dedupe(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
