//! # Directory-Scoped File Operations
//!
//! [`Layer`] wraps one directory and exposes whole-file, suffix, prefix,
//! multi-range and in-place access to the flat files inside it. Failures
//! wrap the OS error with a `(file=[filename=…, path=…])` descriptor so a
//! caller three layers up still sees which file misbehaved.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use eyre::{ensure, Result, WrapErr};

/// A `[from, to)` byte range for targeted reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partial {
    pub from: u64,
    pub to: u64,
}

impl Partial {
    pub fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }

    pub fn len(&self) -> u64 {
        self.to.saturating_sub(self.from)
    }

    pub fn is_empty(&self) -> bool {
        self.to <= self.from
    }
}

/// Entry predicate for [`Layer::list`]; filters combine with logical AND.
pub type EntryFilter = fn(&fs::DirEntry) -> Result<bool>;

/// Keeps regular files (and anything that is not a directory).
pub fn is_file(entry: &fs::DirEntry) -> Result<bool> {
    Ok(!entry.file_type()?.is_dir())
}

/// Keeps directories.
pub fn is_dir(entry: &fs::DirEntry) -> Result<bool> {
    Ok(entry.file_type()?.is_dir())
}

/// One directory scope. Every method is a single open/act/close cycle.
#[derive(Debug, Clone)]
pub struct Layer {
    path: PathBuf,
}

impl Layer {
    /// Opens a layer over `path`, creating the directory when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure!(
            !path.as_os_str().is_empty(),
            "cannot create a storage layer for an empty path"
        );

        if !path.exists() {
            fs::create_dir_all(&path).wrap_err_with(|| {
                format!("could not create storage layer [path={}]", path.display())
            })?;
        }

        Ok(Self { path })
    }

    /// Spawns a nested layer scope under this one.
    pub fn new_layer(&self, name: &str) -> Result<Layer> {
        validate_name(name)?;
        Layer::open(self.path.join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lists entry names passing every filter, sorted for determinism.
    pub fn list(&self, filters: &[EntryFilter]) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path)
            .wrap_err_with(|| format!("{} could not read path", self.descriptor("")))?;

        let mut matches = Vec::new();
        'entries: for entry in entries {
            let entry = entry
                .wrap_err_with(|| format!("{} could not read entry", self.descriptor("")))?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| eyre::eyre!("{} entry name is not UTF-8", self.descriptor("")))?;

            for filter in filters {
                let keep = filter(&entry).wrap_err_with(|| {
                    format!("{} filter failed on entry [name={}]", self.descriptor(""), name)
                })?;
                if !keep {
                    continue 'entries;
                }
            }
            matches.push(name);
        }

        matches.sort();
        Ok(matches)
    }

    /// Byte length of a file in this layer.
    pub fn file_size(&self, filename: &str) -> Result<u64> {
        let meta = fs::metadata(self.file_path(filename))
            .wrap_err_with(|| format!("{} could not read file info", self.descriptor(filename)))?;
        Ok(meta.len())
    }

    pub fn read_all(&self, filename: &str) -> Result<Vec<u8>> {
        fs::read(self.file_path(filename))
            .wrap_err_with(|| format!("{} could not read file", self.descriptor(filename)))
    }

    /// Reads everything from `offset` to the end of the file.
    pub fn read_after(&self, filename: &str, offset: u64) -> Result<Vec<u8>> {
        let mut file = self.open_readable(filename)?;
        file.seek(SeekFrom::Start(offset)).wrap_err_with(|| {
            format!(
                "{} could not skip file data to offset [offset={}]",
                self.descriptor(filename),
                offset
            )
        })?;

        let mut res = Vec::new();
        file.read_to_end(&mut res).wrap_err_with(|| {
            format!(
                "{} could not read file data from offset [offset={}]",
                self.descriptor(filename),
                offset
            )
        })?;
        Ok(res)
    }

    /// Reads the first `offset` bytes of the file.
    pub fn read_before(&self, filename: &str, offset: u64) -> Result<Vec<u8>> {
        let mut file = self.open_readable(filename)?;
        let mut res = vec![0u8; offset as usize];
        file.read_exact(&mut res).wrap_err_with(|| {
            format!(
                "{} could not read data to offset [offset={}]",
                self.descriptor(filename),
                offset
            )
        })?;
        Ok(res)
    }

    /// Reads each `[from, to)` range in one open/close cycle.
    pub fn read_partials(&self, filename: &str, partials: &[Partial]) -> Result<Vec<Vec<u8>>> {
        let mut file = self.open_readable(filename)?;

        let mut res = Vec::with_capacity(partials.len());
        for partial in partials {
            ensure!(
                partial.to >= partial.from,
                "{} invalid partial [from={}, to={}]",
                self.descriptor(filename),
                partial.from,
                partial.to
            );

            let mut chunk = vec![0u8; partial.len() as usize];
            file.seek(SeekFrom::Start(partial.from)).wrap_err_with(|| {
                format!(
                    "{} could not seek to partial [from={}, to={}]",
                    self.descriptor(filename),
                    partial.from,
                    partial.to
                )
            })?;
            file.read_exact(&mut chunk).wrap_err_with(|| {
                format!(
                    "{} could not read file partial [from={}, to={}]",
                    self.descriptor(filename),
                    partial.from,
                    partial.to
                )
            })?;
            res.push(chunk);
        }

        Ok(res)
    }

    /// Writes the whole file, creating or truncating it.
    pub fn create_or_override(&self, filename: &str, data: &[u8]) -> Result<()> {
        fs::write(self.file_path(filename), data)
            .wrap_err_with(|| format!("{} could not write to file", self.descriptor(filename)))
    }

    /// Appends to an existing file; the file must already exist.
    pub fn append(&self, filename: &str, data: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.file_path(filename))
            .wrap_err_with(|| format!("{} could not open file", self.descriptor(filename)))?;

        file.write_all(data)
            .wrap_err_with(|| format!("{} could not write to file", self.descriptor(filename)))
    }

    /// Overwrites `data.len()` bytes in place at `offset`; no resize.
    pub fn write_at(&self, filename: &str, offset: u64, data: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .open(self.file_path(filename))
            .wrap_err_with(|| format!("{} could not open file", self.descriptor(filename)))?;

        file.seek(SeekFrom::Start(offset)).wrap_err_with(|| {
            format!(
                "{} could not seek to offset [offset={}]",
                self.descriptor(filename),
                offset
            )
        })?;
        file.write_all(data).wrap_err_with(|| {
            format!(
                "{} could not write to file at offset [offset={}]",
                self.descriptor(filename),
                offset
            )
        })
    }

    /// Replaces the `[from, to)` range with `data`, resizing the file.
    ///
    /// The prefix, replacement and suffix are assembled in memory and the
    /// final overwrite happens as a single write call.
    pub fn replace(&self, filename: &str, partial: &Partial, data: &[u8]) -> Result<()> {
        ensure!(
            partial.to >= partial.from,
            "{} invalid partial [from={}, to={}]",
            self.descriptor(filename),
            partial.from,
            partial.to
        );

        let mut file = self.open_readable(filename)?;

        let mut buffer = vec![0u8; partial.from as usize];
        file.read_exact(&mut buffer).wrap_err_with(|| {
            format!(
                "{} could not read data to offset [offset={}]",
                self.descriptor(filename),
                partial.from
            )
        })?;
        buffer.extend(data);

        file.seek(SeekFrom::Start(partial.to)).wrap_err_with(|| {
            format!(
                "{} could not skip data until offset [offset={}]",
                self.descriptor(filename),
                partial.to
            )
        })?;
        file.read_to_end(&mut buffer).wrap_err_with(|| {
            format!(
                "{} could not read data after offset [offset={}]",
                self.descriptor(filename),
                partial.to
            )
        })?;
        drop(file);

        fs::write(self.file_path(filename), &buffer)
            .wrap_err_with(|| format!("{} could not write to file", self.descriptor(filename)))
    }

    pub fn delete(&self, filename: &str) -> Result<()> {
        fs::remove_file(self.file_path(filename))
            .wrap_err_with(|| format!("{} could not delete file", self.descriptor(filename)))
    }

    fn open_readable(&self, filename: &str) -> Result<File> {
        File::open(self.file_path(filename))
            .wrap_err_with(|| format!("{} could not open file", self.descriptor(filename)))
    }

    fn file_path(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }

    fn descriptor(&self, filename: &str) -> String {
        if filename.is_empty() {
            return format!("(file=[path={}])", self.path.display());
        }
        format!("(file=[filename={}, path={}])", filename, self.path.display())
    }
}

fn validate_name(name: &str) -> Result<()> {
    ensure!(!name.is_empty(), "layer name cannot be empty");
    ensure!(
        !name.contains('/') && !name.contains('\\'),
        "layer name cannot contain path separators"
    );
    ensure!(
        !name.contains(".."),
        "layer name cannot contain parent directory references"
    );
    ensure!(
        name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-'),
        "layer name can only contain alphanumeric characters, underscores, and hyphens"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_the_directory_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fresh");

        let layer = Layer::open(&path).unwrap();
        assert!(path.is_dir());
        assert_eq!(layer.path(), path);

        // Idempotent on an existing directory.
        Layer::open(&path).unwrap();
    }

    #[test]
    fn open_rejects_an_empty_path() {
        let err = Layer::open("").unwrap_err();
        assert!(err.to_string().contains("empty path"));
    }

    #[test]
    fn new_layer_nests_under_the_parent() {
        let dir = tempdir().unwrap();
        let root = Layer::open(dir.path()).unwrap();

        let child = root.new_layer("app").unwrap();
        assert_eq!(child.path(), dir.path().join("app"));

        let grandchild = child.new_layer("public").unwrap();
        assert!(grandchild.path().is_dir());
    }

    #[test]
    fn new_layer_validates_the_name() {
        let dir = tempdir().unwrap();
        let root = Layer::open(dir.path()).unwrap();

        assert!(root.new_layer("").is_err());
        assert!(root.new_layer("a/b").is_err());
        assert!(root.new_layer("..").is_err());
        assert!(root.new_layer("with space").is_err());
        assert!(root.new_layer("ok_name-1").is_ok());
    }

    #[test]
    fn create_or_override_then_read_all_round_trips() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"hello").unwrap();
        assert_eq!(layer.read_all("f.bin").unwrap(), b"hello");

        layer.create_or_override("f.bin", b"short").unwrap();
        assert_eq!(layer.read_all("f.bin").unwrap(), b"short");
    }

    #[test]
    fn append_requires_an_existing_file() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        let err = layer.append("missing.bin", b"x").unwrap_err();
        assert!(err.to_string().contains("(file=[filename=missing.bin"));
    }

    #[test]
    fn append_extends_the_file() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"ab").unwrap();
        layer.append("f.bin", b"cd").unwrap();
        layer.append("f.bin", b"ef").unwrap();
        assert_eq!(layer.read_all("f.bin").unwrap(), b"abcdef");
    }

    #[test]
    fn write_at_overwrites_in_place_without_resizing() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"aaaaaa").unwrap();
        layer.write_at("f.bin", 2, b"XX").unwrap();
        assert_eq!(layer.read_all("f.bin").unwrap(), b"aaXXaa");
        assert_eq!(layer.file_size("f.bin").unwrap(), 6);
    }

    #[test]
    fn read_after_returns_the_suffix() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"0123456789").unwrap();
        assert_eq!(layer.read_after("f.bin", 6).unwrap(), b"6789");
        assert_eq!(layer.read_after("f.bin", 10).unwrap(), b"");
    }

    #[test]
    fn read_before_returns_the_prefix() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"0123456789").unwrap();
        assert_eq!(layer.read_before("f.bin", 4).unwrap(), b"0123");
    }

    #[test]
    fn read_partials_serves_multiple_ranges_in_one_call() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"0123456789").unwrap();
        let chunks = layer
            .read_partials(
                "f.bin",
                &[Partial::new(0, 3), Partial::new(8, 10), Partial::new(4, 4)],
            )
            .unwrap();
        assert_eq!(chunks, vec![b"012".to_vec(), b"89".to_vec(), Vec::new()]);
    }

    #[test]
    fn read_partials_rejects_an_inverted_range() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"0123").unwrap();
        let err = layer.read_partials("f.bin", &[Partial::new(3, 1)]).unwrap_err();
        assert!(err.to_string().contains("invalid partial"));
    }

    #[test]
    fn read_partials_fails_past_the_end_of_file() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"0123").unwrap();
        let err = layer.read_partials("f.bin", &[Partial::new(2, 8)]).unwrap_err();
        assert!(err.to_string().contains("could not read file partial"));
    }

    #[test]
    fn replace_resizes_the_file() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"0123456789").unwrap();

        // Grow: replace 2 bytes with 4.
        layer.replace("f.bin", &Partial::new(2, 4), b"WXYZ").unwrap();
        assert_eq!(layer.read_all("f.bin").unwrap(), b"01WXYZ456789");

        // Shrink: replace 4 bytes with nothing.
        layer.replace("f.bin", &Partial::new(2, 6), b"").unwrap();
        assert_eq!(layer.read_all("f.bin").unwrap(), b"01456789");
    }

    #[test]
    fn delete_removes_the_file() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.create_or_override("f.bin", b"x").unwrap();
        layer.delete("f.bin").unwrap();
        assert!(layer.read_all("f.bin").is_err());
        assert!(layer.delete("f.bin").is_err());
    }

    #[test]
    fn list_applies_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        layer.new_layer("zeta").unwrap();
        layer.new_layer("alpha").unwrap();
        layer.create_or_override("file.bin", b"").unwrap();

        assert_eq!(layer.list(&[is_dir]).unwrap(), vec!["alpha", "zeta"]);
        assert_eq!(layer.list(&[is_file]).unwrap(), vec!["file.bin"]);
        assert_eq!(
            layer.list(&[]).unwrap(),
            vec!["alpha", "file.bin", "zeta"]
        );
        assert!(layer.list(&[is_dir, is_file]).unwrap().is_empty());
    }

    #[test]
    fn errors_carry_the_file_descriptor() {
        let dir = tempdir().unwrap();
        let layer = Layer::open(dir.path()).unwrap();

        let err = layer.read_all("ghost.bin").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(file=[filename=ghost.bin, path="));
        assert!(msg.contains("could not read file"));
    }
}
