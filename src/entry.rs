//! Classpath entries: the places a class file can be read from.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use memmap2::Mmap;
use std::fmt;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Separator between entries of a path list (`:` on Unix, `;` on Windows).
pub const PATH_LIST_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

const ARCHIVE_SUFFIXES: [&str; 2] = [".jar", ".zip"];
const WILDCARD_SUFFIX: &str = ".jar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Class files laid out under a directory.
    Dir(PathBuf),
    /// A jar or zip archive.
    Zip(PathBuf),
    /// Children searched in order.
    Composite(Vec<Entry>),
    /// Every jar directly inside `base`, expanded when the entry is built.
    Wildcard { base: PathBuf, archives: Vec<Entry> },
}

/// Class bytes and the concrete entry that produced them.
#[derive(Debug)]
pub struct Located<'a> {
    pub data: Vec<u8>,
    pub entry: &'a Entry,
}

impl Entry {
    /// Classifies one raw classpath string.
    pub fn new(path: &str) -> Self {
        if path.contains(PATH_LIST_SEPARATOR) {
            return Self::composite(path);
        }
        if let Some(base) = path.strip_suffix('*') {
            return Self::wildcard(base);
        }
        if ARCHIVE_SUFFIXES.iter().any(|s| ends_with_ignore_case(path, s)) {
            return Entry::Zip(absolutize(path));
        }
        Entry::Dir(absolutize(path))
    }

    pub fn composite(path_list: &str) -> Self {
        let children = path_list
            .split(PATH_LIST_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(Entry::new)
            .collect();
        Entry::Composite(children)
    }

    /// Expands `base` one level deep. Subdirectories are skipped, not searched.
    pub fn wildcard(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let base = if base.as_os_str().is_empty() {
            Path::new(".")
        } else {
            base
        };
        let base = absolutize(base);
        let archives = scan_archives(&base);
        Entry::Wildcard { base, archives }
    }

    /// Looks up `class_file` (slash separated, with `.class`). Unreadable
    /// locations count as misses.
    pub fn read_class(&self, class_file: &str) -> Option<Located<'_>> {
        match self {
            Entry::Dir(dir) => {
                let file = dir.join(class_file);
                match std::fs::read(&file) {
                    Ok(data) => Some(Located { data, entry: self }),
                    Err(err) => {
                        debug!(path = %file.display(), %err, "class file not readable");
                        None
                    }
                }
            }
            Entry::Zip(jar) => match read_archive_entry(jar, class_file) {
                Ok(Some(data)) => Some(Located { data, entry: self }),
                Ok(None) => None,
                Err(err) => {
                    debug!(jar = %jar.display(), err = %format!("{err:#}"), "archive not readable");
                    None
                }
            },
            Entry::Composite(children) | Entry::Wildcard { archives: children, .. } => children
                .iter()
                .find_map(|child| child.read_class(class_file)),
        }
    }

    /// Leaf entries in search order.
    pub fn leaves(&self) -> Vec<&Entry> {
        match self {
            Entry::Dir(_) | Entry::Zip(_) => vec![self],
            Entry::Composite(children) | Entry::Wildcard { archives: children, .. } => {
                children.iter().flat_map(Entry::leaves).collect()
            }
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Dir(path) | Entry::Zip(path) => write!(f, "{}", path.display()),
            Entry::Composite(children) | Entry::Wildcard { archives: children, .. } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{PATH_LIST_SEPARATOR}")?;
                    }
                    write!(f, "{child}")?;
                }
                Ok(())
            }
        }
    }
}

fn read_archive_entry(jar_path: &Path, class_file: &str) -> Result<Option<Vec<u8>>> {
    let file = File::open(jar_path)
        .with_context(|| format!("Failed to open archive: {}", jar_path.display()))?;
    // SAFETY: The file is opened read-only and outlives the mapping, which is
    // dropped before this function returns.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap archive: {}", jar_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip structure: {}", jar_path.display()))?;

    // First entry with the exact name wins, even if the archive repeats it.
    let Some(index) = (0..archive.len()).find(|&i| match archive.by_index_raw(i) {
        Ok(entry) => entry.name() == class_file,
        Err(err) => {
            debug!(jar = %jar_path.display(), index = i, %err, "skipping unreadable zip entry");
            false
        }
    }) else {
        return Ok(None);
    };

    let mut entry = archive
        .by_index(index)
        .with_context(|| format!("Failed to open {class_file} in {}", jar_path.display()))?;
    // The declared size comes from the archive and is not trusted for allocation.
    let mut data = Vec::new();
    entry
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to inflate {class_file} in {}", jar_path.display()))?;
    Ok(Some(data))
}

fn scan_archives(base: &Path) -> Vec<Entry> {
    let walker = WalkBuilder::new(base)
        .max_depth(Some(1))
        .standard_filters(false)
        .build();

    let mut archives = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                warn!(base = %base.display(), %err, "failed to scan wildcard directory");
                continue;
            }
        };
        if entry.depth() == 0 || entry.file_type().is_some_and(|t| t.is_dir()) {
            continue;
        }
        let is_jar = entry
            .file_name()
            .to_str()
            .is_some_and(|name| ends_with_ignore_case(name, WILDCARD_SUFFIX));
        if is_jar {
            archives.push(Entry::Zip(entry.into_path()));
        }
    }
    archives
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn absolutize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
