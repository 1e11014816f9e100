//! PGN file parsing functionality

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tracing::info;

use super::game::{Game, GameBuilder};
use crate::error::{Error, Result};

/// Turns each parsed game into the caller's output as soon as it is complete,
/// so a large file never has to be held as `Game`s all at once.
pub trait GameConverter<A> {
    fn convert(&mut self, game: Game) -> A;
}

impl<A, F> GameConverter<A> for F
where
    F: FnMut(Game) -> A,
{
    fn convert(&mut self, game: Game) -> A {
        self(game)
    }
}

#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub progress_interval: Option<u64>,
    pub max_games: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            progress_interval: Some(10_000),
            max_games: None,
        }
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log progress every `games` parsed games.
    pub fn progress_interval(mut self, games: u64) -> Self {
        self.progress_interval = Some(games);
        self
    }

    pub fn no_progress(mut self) -> Self {
        self.progress_interval = None;
        self
    }

    /// Stop after `games` complete games.
    pub fn max_games(mut self, games: usize) -> Self {
        self.max_games = Some(games);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Tags,
    Moves,
}

/// Streams games out of PGN text one line at a time.
///
/// Yields `Err` at most once; iteration ends after the first error.
pub struct GameReader<R> {
    lines: Lines<R>,
    line_number: usize,
    phase: Phase,
    builder: GameBuilder,
    done: bool,
}

impl<R: BufRead> GameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            phase: Phase::Tags,
            builder: GameBuilder::new(),
            done: false,
        }
    }

    fn next_game(&mut self) -> Result<Option<Game>> {
        while let Some(line) = self.lines.next() {
            self.line_number += 1;
            let line_number = self.line_number;
            let line = line.map_err(|e| Error::from(e).at_line(line_number, None))?;
            if let Some(game) = self
                .process_line(&line)
                .map_err(|e| e.at_line(line_number, None))?
            {
                return Ok(Some(game));
            }
        }

        if self.builder.is_started() {
            return Err(Error::UnexpectedEndOfInput.at_line(self.line_number, None));
        }
        Ok(None)
    }

    fn process_line(&mut self, line: &str) -> Result<Option<Game>> {
        let line = line.trim();

        if self.phase == Phase::Tags {
            if line.is_empty() {
                return Ok(None);
            }
            if line.starts_with('[') {
                let (key, value) = parse_tag(line)?;
                self.builder.add_metadata(key, value)?;
                return Ok(None);
            }
            self.phase = Phase::Moves;
        }

        if line.is_empty() {
            return Err(Error::UnexpectedBlankLine);
        }

        let mut tokens = line.split_whitespace();
        while let Some(token) = tokens.next() {
            self.builder
                .feed(token)
                .map_err(|e| e.at_line(self.line_number, Some(token)))?;

            if self.builder.is_finished() {
                if let Some(extra) = tokens.next() {
                    return Err(Error::GameAlreadyOver {
                        token: extra.to_string(),
                    }
                    .at_line(self.line_number, Some(extra)));
                }
                self.phase = Phase::Tags;
                return std::mem::take(&mut self.builder).finish().map(Some);
            }
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for GameReader<R> {
    type Item = Result<Game>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_game() {
            Ok(Some(game)) => Some(Ok(game)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Splits `[Key "Value"]` into its key and unescaped value.
fn parse_tag(line: &str) -> Result<(String, String)> {
    let malformed = || Error::MetadataFormat(format!("expected [Key \"Value\"], found {:?}", line));

    let body = line.strip_prefix('[').ok_or_else(malformed)?;
    let key = body
        .split_whitespace()
        .next()
        .filter(|key| !key.contains('"'))
        .ok_or_else(malformed)?;
    let open = body.find('"').ok_or_else(malformed)?;
    let close = body.rfind('"').filter(|&close| close > open).ok_or_else(malformed)?;

    Ok((key.to_string(), unescape(&body[open + 1..close])))
}

fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '"' || next == '\\' => {
                value.push(next);
                chars.next();
            }
            _ => value.push(c),
        }
    }
    value
}

/// Parses every game in `reader`, converting each as it completes.
///
/// Draws are included. Any error aborts the whole parse.
pub fn parse<R, A, C>(reader: R, converter: C) -> Result<Vec<A>>
where
    R: BufRead,
    C: GameConverter<A>,
{
    parse_with_options(reader, &ParserOptions::default(), converter)
}

pub fn parse_with_options<R, A, C>(reader: R, options: &ParserOptions, mut converter: C) -> Result<Vec<A>>
where
    R: BufRead,
    C: GameConverter<A>,
{
    let mut converted = Vec::new();

    for game in GameReader::new(reader) {
        converted.push(converter.convert(game?));

        let parsed = converted.len() as u64;
        if let Some(every) = options.progress_interval.filter(|&n| n > 0) {
            if parsed % every == 0 {
                info!(games = parsed, "games parsed");
            }
        }
        if options.max_games.is_some_and(|max| converted.len() >= max) {
            break;
        }
    }

    info!(games = converted.len(), "finished parsing PGN");
    Ok(converted)
}

pub fn parse_str<A, C>(pgn: &str, converter: C) -> Result<Vec<A>>
where
    C: GameConverter<A>,
{
    parse(pgn.as_bytes(), converter)
}

pub fn parse_file<P, A, C>(path: P, converter: C) -> Result<Vec<A>>
where
    P: AsRef<Path>,
    C: GameConverter<A>,
{
    let file = File::open(path)?;
    parse(BufReader::new(file), converter)
}
