use crate::error::Result;
use crate::models::{Deck, Flashcard};
use ::csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_csv_files(decks_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(decks_dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
            .collect(),
        Err(e) => {
            log::warn!("Cannot read decks directory {}: {}", decks_dir.display(), e);
            Vec::new()
        }
    };

    files.sort();
    files
}

pub fn deck_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn deck_reader(content: &str) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes())
}

/// Question is the first field; unquoted commas after it stay in the answer.
fn card_fields(record: &StringRecord) -> Option<(String, String)> {
    if record.len() < 2 {
        return None;
    }
    let answer = record.iter().skip(1).collect::<Vec<_>>().join(",");
    Some((record[0].to_string(), answer))
}

/// Loads a `question,answer` deck. Rows with an empty side are skipped and
/// repeated questions keep their first answer. Quoted fields may span lines.
pub fn load_deck(path: &Path) -> Result<Deck> {
    let content = fs::read_to_string(path)?;
    let name = deck_name(path);
    let mut seen = HashSet::new();
    let mut cards = Vec::new();

    let mut reader = deck_reader(&content);
    for result in reader.records() {
        let record = result?;
        let Some((question, answer)) = card_fields(&record) else {
            continue;
        };
        if question.trim().is_empty() || answer.trim().is_empty() {
            continue;
        }

        let card = Flashcard::new(question, answer);
        if !seen.insert(card.id.clone()) {
            log::warn!(
                "{}:{}: duplicate question '{}' ignored",
                path.display(),
                record.position().map_or(0, |pos| pos.line()),
                card.id
            );
            continue;
        }
        cards.push(card);
    }

    log::info!("Loaded deck '{}' with {} cards", name, cards.len());
    Ok(Deck { name, cards })
}

/// Splits one line into question and answer. Double quotes group commas and
/// `""` is a literal quote. Returns `None` for blank, single-field and `#`
/// comment lines.
pub fn parse_csv_line(line: &str) -> Option<(String, String)> {
    let record = deck_reader(line).into_records().next()?.ok()?;
    card_fields(&record)
}
