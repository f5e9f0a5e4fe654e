//! Treebank sources
//!
//! Splits aligned bracket-notation text into sentence blocks. A block is a run
//! of consecutive lines that contain an opening bracket; any other line
//! (typically blank) ends the block. Files may be plain text or gzip
//! compressed. Bytes that are not valid UTF-8 are replaced, so one bad byte
//! never ends a file early.

use crate::assembly::{SentenceError, assemble_sentence};
use crate::scanner::is_bracket_line;
use crate::tree::ParseTree;
use bstr::ByteSlice;
use flate2::bufread::MultiGzDecoder;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Error while reading a treebank source
#[derive(Debug, Error)]
pub enum TreebankError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// The raw lines of one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceBlock {
    /// 0-based sentence number within its source
    pub index: usize,
    /// 1-based line number of the block's first line
    pub start_line: usize,
    pub lines: Vec<String>,
}

impl SentenceBlock {
    /// Assemble the block's lines into a tree
    pub fn assemble(&self) -> Result<ParseTree, SentenceError> {
        assemble_sentence(&self.lines)
    }

    /// Assemble the block, logging and discarding it on failure
    pub fn assemble_logged(&self) -> Option<ParseTree> {
        match self.assemble() {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!(
                    "skipping sentence {} (line {}): {}",
                    self.index, self.start_line, e
                );
                None
            }
        }
    }
}

/// Reader that iterates over the sentence blocks of one source
pub struct BlockReader<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    line_num: usize,
    sentence_index: usize,
    done: bool,
}

impl<R: BufRead> BlockReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_num: 0,
            sentence_index: 0,
            done: false,
        }
    }

    /// Read the next line without its terminator, decoding lossily
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = self.buf.trim_end_with(|c| c == '\n' || c == '\r');
                if line.to_str().is_err() {
                    debug!("line {}: replacing invalid UTF-8", self.line_num + 1);
                }
                Some(Ok(line.to_str_lossy().into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl BlockReader<Box<dyn BufRead>> {
    /// Create a reader from a file path, decompressing gzip input
    pub fn from_file(path: &Path) -> Result<Self, TreebankError> {
        Ok(Self::new(open_file(path)?))
    }
}

impl BlockReader<Cursor<String>> {
    /// Create a reader from a string
    pub fn from_string(text: &str) -> Self {
        Self::new(Cursor::new(text.to_string()))
    }
}

impl<R: BufRead> Iterator for BlockReader<R> {
    type Item = Result<SentenceBlock, TreebankError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut lines = Vec::new();
        let mut start_line = 0;

        loop {
            match self.next_line() {
                None => {
                    self.done = true;
                    if lines.is_empty() {
                        return None;
                    }
                    // Last sentence without a trailing separator
                    break;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(TreebankError::Io(e)));
                }
                Some(Ok(line)) => {
                    self.line_num += 1;
                    if !is_bracket_line(&line) {
                        if lines.is_empty() {
                            continue;
                        }
                        break;
                    }
                    if lines.is_empty() {
                        start_line = self.line_num;
                    }
                    lines.push(line);
                }
            }
        }

        let block = SentenceBlock {
            index: self.sentence_index,
            start_line,
            lines,
        };
        self.sentence_index += 1;
        Some(Ok(block))
    }
}

/// Open a file, transparently decompressing gzip content
fn open_file(path: &Path) -> Result<Box<dyn BufRead>, TreebankError> {
    let file = File::open(path).map_err(|source| TreebankError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

#[derive(Debug, Clone)]
enum TreebankSource {
    /// In-memory text
    String(String),
    /// Multiple file paths (from glob or explicit paths)
    Files(Vec<PathBuf>),
}

/// Collection of sentence blocks from a string, files or a glob pattern
///
/// Sources are read in order, one sentence at a time.
#[derive(Debug, Clone)]
pub struct Treebank {
    source: TreebankSource,
}

impl Treebank {
    /// Create from in-memory text
    pub fn from_string(text: &str) -> Self {
        Self {
            source: TreebankSource::String(text.to_string()),
        }
    }

    /// Create from a single file path
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::from_paths(vec![path.as_ref().to_path_buf()])
    }

    /// Create from a glob pattern
    ///
    /// Files are processed in sorted order for deterministic results.
    pub fn from_glob(pattern: &str) -> Result<Self, TreebankError> {
        Ok(Self::from_paths(glob_paths(pattern)?))
    }

    /// Create from a mix of plain paths and glob patterns
    ///
    /// Plain paths are kept as given, even if they do not exist.
    pub fn from_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Self, TreebankError> {
        let mut file_paths = Vec::new();
        for input in inputs {
            let input = input.as_ref();
            if !input.contains(['*', '?', '[']) {
                file_paths.push(PathBuf::from(input));
                continue;
            }
            let matched = glob_paths(input)?;
            if matched.is_empty() {
                warn!("no files match {}", input);
            }
            file_paths.extend(matched);
        }
        Ok(Self::from_paths(file_paths))
    }

    /// Create from explicit file paths
    pub fn from_paths(file_paths: Vec<PathBuf>) -> Self {
        Self {
            source: TreebankSource::Files(file_paths),
        }
    }

    /// Iterate over all sentence blocks
    ///
    /// A file that cannot be opened yields one error and is skipped.
    pub fn blocks(&self) -> Box<dyn Iterator<Item = Result<SentenceBlock, TreebankError>>> {
        match &self.source {
            TreebankSource::String(text) => Box::new(BlockReader::from_string(text)),
            TreebankSource::Files(paths) => {
                let paths = paths.clone();
                Box::new(paths.into_iter().flat_map(open_file_blocks))
            }
        }
    }

    /// Iterate over assembled trees
    ///
    /// Unreadable input and unparsable sentences are logged and skipped.
    pub fn trees(&self) -> impl Iterator<Item = ParseTree> {
        self.blocks().filter_map(|result| match result {
            Ok(block) => block.assemble_logged(),
            Err(e) => {
                warn!("{}", e);
                None
            }
        })
    }
}

/// Files matching a glob pattern, in sorted order
fn glob_paths(pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
    let mut file_paths: Vec<PathBuf> = glob::glob(pattern)?.filter_map(Result::ok).collect();
    file_paths.sort();
    Ok(file_paths)
}

/// Open a file and return an iterator over its blocks
fn open_file_blocks(path: PathBuf) -> Box<dyn Iterator<Item = Result<SentenceBlock, TreebankError>>> {
    match BlockReader::from_file(&path) {
        Ok(reader) => Box::new(reader),
        Err(e) => Box::new(std::iter::once(Err(e))),
    }
}
