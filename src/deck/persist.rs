//! Saving and loading decks.
//!
//! The saved form is line-oriented text:
//!
//! ```text
//! <number of entries>
//! <card id> \t <count> \t <date added>     (one line per entry, deck order)
//! <number of categories>
//! <category spec line>                    (one line per category)
//! ```
//!
//! Dates use the deck's configured format. Category lines are the
//! `Display` form of `CategorySpec`. Cards are resolved by id against a
//! `CardRegistry` when loading; filters are rebuilt by a caller-supplied
//! parser, since only the caller knows its filter language.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use log::{info, warn};

use crate::cards::{CardId, CardRegistry};
use crate::category::{CategorySpec, Filter};
use crate::collection::CardList;
use crate::error::{DeckError, Result};

use super::deck::Deck;

impl Deck {
    /// Write the saved form to `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.size())?;
        for entry in &self.master_list {
            let date = format_date(entry.date_added(), &self.config.date_format)?;
            writeln!(writer, "{}\t{}\t{}", entry.card().id, entry.count(), date)?;
        }
        writeln!(writer, "{}", self.num_categories())?;
        for spec in self.categories() {
            writeln!(writer, "{spec}")?;
        }
        Ok(())
    }

    /// Save to `path`.
    ///
    /// Writes a sibling temporary file and renames it over `path`, so an
    /// existing file is either fully replaced or left as it was.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp = path.with_file_name(temp_name);

        let written = File::create(&temp).map_err(DeckError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            self.write_to(&mut writer)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        });
        if let Err(err) = written {
            warn!("event=save_failed module=persist path={} error={}", path.display(), err);
            let _ = fs::remove_file(&temp);
            return Err(err);
        }
        fs::rename(&temp, path)?;

        info!(
            "event=deck_saved module=persist path={} cards={} categories={}",
            path.display(),
            self.size(),
            self.num_categories()
        );
        Ok(())
    }

    /// Load a deck saved by [`Deck::save`], using default configuration.
    pub fn load<F>(path: impl AsRef<Path>, registry: &CardRegistry, parse_filter: F) -> Result<Deck>
    where
        F: FnMut(&str) -> Result<Filter>,
    {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut deck = Deck::new();
        deck.read_from(reader, registry, parse_filter)?;

        info!(
            "event=deck_loaded module=persist path={} cards={} categories={}",
            path.display(),
            deck.size(),
            deck.num_categories()
        );
        Ok(deck)
    }

    /// Read the saved form into this deck, parsing dates with this deck's
    /// configured format.
    ///
    /// Entries and categories are added through the ordinary mutators, so
    /// listeners see them arrive.
    pub fn read_from<R, F>(&mut self, reader: R, registry: &CardRegistry, mut parse_filter: F) -> Result<()>
    where
        R: BufRead,
        F: FnMut(&str) -> Result<Filter>,
    {
        let mut lines = SavedLines::new(reader);

        let (line, text) = lines.next_line()?;
        let entries = parse_count(line, &text)?;
        for _ in 0..entries {
            let (line, text) = lines.next_line()?;
            let fields: Vec<&str> = text.split('\t').collect();
            let &[id, count, date] = fields.as_slice() else {
                return Err(DeckError::Parse {
                    line,
                    message: format!("expected 3 tab-separated fields, found {}", fields.len()),
                });
            };
            let card = registry
                .get(&CardId::new(id))
                .ok_or_else(|| DeckError::UnknownCard { line, id: id.to_string() })?;
            let count = parse_count(line, count)?;
            if count == 0 {
                return Err(DeckError::Parse {
                    line,
                    message: "entry count must be positive".to_string(),
                });
            }
            let count = i64::try_from(count).map_err(|_| DeckError::Parse {
                line,
                message: format!("entry count {count} is too large"),
            })?;
            let date = NaiveDate::parse_from_str(date, &self.config.date_format).map_err(|e| DeckError::Parse {
                line,
                message: format!("bad date {date:?}: {e}"),
            })?;
            self.add_dated(card, count, date);
        }

        let (line, text) = lines.next_line()?;
        let categories = parse_count(line, &text)?;
        for _ in 0..categories {
            let (line, text) = lines.next_line()?;
            let spec = CategorySpec::from_line(&text, &mut parse_filter).map_err(|e| match e {
                DeckError::InvalidSpec(message) => DeckError::Parse { line, message },
                other => other,
            })?;
            self.add_category(spec);
        }
        Ok(())
    }
}

/// Line reader that tracks 1-based line numbers for error messages.
struct SavedLines<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> SavedLines<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }

    fn next_line(&mut self) -> Result<(usize, String)> {
        let mut text = String::new();
        let read = self.reader.read_line(&mut text)?;
        self.line += 1;
        if read == 0 {
            return Err(DeckError::Parse {
                line: self.line,
                message: "unexpected end of file".to_string(),
            });
        }
        let trimmed = text.trim_end_matches(['\r', '\n']).len();
        text.truncate(trimmed);
        Ok((self.line, text))
    }
}

fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut text = String::new();
    write!(text, "{}", date.format(format)).map_err(|_| DeckError::DateFormat(format.to_string()))?;
    Ok(text)
}

fn parse_count(line: usize, text: &str) -> Result<usize> {
    text.trim().parse().map_err(|_| DeckError::Parse {
        line,
        message: format!("expected a count, found {text:?}"),
    })
}
