//! Mass memory (`:MMEMory`): files and directories on the instrument's drive.
//!
//! `:MMEM:DATA` and `:MMEM:DATA?` move whole files as definite-length blocks;
//! the catalog reply is parsed into [`Catalog`].

use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;

use super::subsystem;
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::{AwgError, AwgResult};
use crate::session::Session;
use crate::types::quoted;
use crate::validation::is_valid_path;

/// Kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// One entry of a `:MMEM:CAT?` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// File or directory name, without brackets
    pub name: String,
    /// File or directory
    pub kind: EntryKind,
    /// Size in bytes; `None` for directories
    pub size: Option<u64>,
}

/// Parsed `:MMEM:CAT?` reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    /// Bytes in use on the drive
    pub used_bytes: u64,
    /// Bytes still available
    pub free_bytes: u64,
    /// Directory contents in instrument order
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Entries that are files.
    pub fn files(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::File)
    }

    /// Entries that are directories.
    pub fn directories(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::Directory)
    }
}

impl FromStr for Catalog {
    type Err = AwgError;

    /// Parse `<used>,<free>{,"<name>,<type>,<size>"}`. Directory names are
    /// wrapped in brackets (`[name]`) or carry the type `DIR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || AwgError::unexpected(":MMEM:CAT?", s);
        // Empty fields are significant here: directories report a blank type.
        let parts: Vec<&str> = s
            .trim()
            .split(',')
            .map(|f| f.trim().trim_matches('"').trim())
            .collect();
        let [used, free, rest @ ..] = parts.as_slice() else {
            return Err(bad());
        };

        let entries = rest
            .chunks(3)
            .map(|chunk| {
                let name = chunk[0];
                let kind = chunk.get(1).copied().unwrap_or_default();
                let bracketed = name.len() >= 2 && name.starts_with('[') && name.ends_with(']');
                if bracketed || kind.eq_ignore_ascii_case("DIR") {
                    Ok(CatalogEntry {
                        name: name.trim_start_matches('[').trim_end_matches(']').to_string(),
                        kind: EntryKind::Directory,
                        size: None,
                    })
                } else {
                    let size = chunk.get(2).ok_or_else(bad)?.parse().map_err(|_| bad())?;
                    Ok(CatalogEntry {
                        name: name.to_string(),
                        kind: EntryKind::File,
                        size: Some(size),
                    })
                }
            })
            .collect::<AwgResult<Vec<_>>>()?;

        Ok(Catalog {
            used_bytes: used.parse().map_err(|_| bad())?,
            free_bytes: free.parse().map_err(|_| bad())?,
            entries,
        })
    }
}

subsystem! {
    /// `:MMEM` subsystem.
    MassMemory
}

impl<S: Session> MassMemory<'_, S> {
    /// `:MMEM:CAT? ["<directory>"]`: list `directory`, or the current
    /// default directory when `None`.
    pub fn catalog(&mut self, directory: Option<&str>) -> AwgResult<Timed<Catalog>> {
        let command = match directory {
            Some(dir) => {
                is_valid_path(dir).rejected()?;
                format!(":MMEM:CAT? {}", quoted(dir))
            }
            None => ":MMEM:CAT?".to_string(),
        };
        self.d.query(&command)?.try_map(|reply| reply.parse())
    }

    /// `:MMEM:CDIR "<path>"`: change the default directory.
    pub fn set_directory(&mut self, path: &str) -> AwgResult<SetOutcome> {
        is_valid_path(path).rejected()?;
        self.d.set_value(":MMEM:CDIR", quoted(path))
    }

    /// `:MMEM:CDIR`: reset the default directory to the instrument default.
    pub fn reset_directory(&mut self) -> AwgResult<SetOutcome> {
        self.d.set(":MMEM:CDIR", ":MMEM:CDIR?")
    }

    /// `:MMEM:CDIR?`
    pub fn directory(&mut self) -> AwgResult<Timed<String>> {
        Ok(self
            .d
            .query(":MMEM:CDIR?")?
            .map(|reply| reply.trim_matches('"').to_string()))
    }

    /// `:MMEM:COPY "<src>","<dest>"`
    pub fn copy(&mut self, source: &str, destination: &str) -> AwgResult<Duration> {
        is_valid_path(source).rejected()?;
        is_valid_path(destination).rejected()?;
        let command = format!(":MMEM:COPY {},{}", quoted(source), quoted(destination));
        self.d.write(&command, "File copied")
    }

    /// `:MMEM:DEL "<file>"`
    pub fn delete(&mut self, path: &str) -> AwgResult<Duration> {
        is_valid_path(path).rejected()?;
        self.d.write(&format!(":MMEM:DEL {}", quoted(path)), "File deleted")
    }

    /// `:MMEM:DATA "<file>",<block>`: write `data` to a file.
    pub fn write_file(&mut self, path: &str, data: &[u8]) -> AwgResult<Duration> {
        is_valid_path(path).rejected()?;
        self.d
            .write_block(&format!(":MMEM:DATA {},", quoted(path)), data)
    }

    /// `:MMEM:DATA? "<file>"`: read a whole file.
    pub fn read_file(&mut self, path: &str) -> AwgResult<Timed<Bytes>> {
        is_valid_path(path).rejected()?;
        self.d.query_block(&format!(":MMEM:DATA? {}", quoted(path)))
    }

    /// `:MMEM:MDIR "<dir>"`
    pub fn make_directory(&mut self, path: &str) -> AwgResult<Duration> {
        is_valid_path(path).rejected()?;
        self.d
            .write(&format!(":MMEM:MDIR {}", quoted(path)), "Directory created")
    }

    /// `:MMEM:MOVE "<src>","<dest>"`
    pub fn rename(&mut self, source: &str, destination: &str) -> AwgResult<Duration> {
        is_valid_path(source).rejected()?;
        is_valid_path(destination).rejected()?;
        let command = format!(":MMEM:MOVE {},{}", quoted(source), quoted(destination));
        self.d.write(&command, "Moved")
    }

    /// `:MMEM:RDIR "<dir>"`
    pub fn remove_directory(&mut self, path: &str) -> AwgResult<Duration> {
        is_valid_path(path).rejected()?;
        self.d
            .write(&format!(":MMEM:RDIR {}", quoted(path)), "Directory removed")
    }

    /// `:MMEM:LOAD:CST "<file>"`: restore an instrument state file.
    pub fn load_state(&mut self, path: &str) -> AwgResult<Duration> {
        is_valid_path(path).rejected()?;
        self.d
            .write(&format!(":MMEM:LOAD:CST {}", quoted(path)), "State loaded")
    }

    /// `:MMEM:STOR:CST "<file>"`: save the instrument state.
    pub fn store_state(&mut self, path: &str) -> AwgResult<Duration> {
        is_valid_path(path).rejected()?;
        self.d
            .write(&format!(":MMEM:STOR:CST {}", quoted(path)), "State stored")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MockSession;
    use crate::subsystems::mock_dispatcher;

    #[test]
    fn catalog_parses_files_and_directories() {
        let cat: Catalog =
            "1024,2048,\"a.bin,BIN,512\",\"[waves],,0\",\"state.cst,CST,12\",\"logs,DIR,0\""
                .parse()
                .unwrap();
        assert_eq!(cat.used_bytes, 1024);
        assert_eq!(cat.free_bytes, 2048);
        assert_eq!(cat.entries.len(), 4);
        assert_eq!(cat.files().count(), 2);
        let dirs: Vec<&str> = cat.directories().map(|e| e.name.as_str()).collect();
        assert_eq!(dirs, vec!["waves", "logs"]);
        assert_eq!(cat.entries[0].size, Some(512));
    }

    #[test]
    fn empty_directory_catalog() {
        let cat: Catalog = "0,1000".parse().unwrap();
        assert!(cat.entries.is_empty());
        assert!("garbage".parse::<Catalog>().is_err());
        assert!("1,2,\"a.bin,BIN,big\"".parse::<Catalog>().is_err());
    }

    #[test]
    fn paths_are_quoted() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock);
        let mut mem = MassMemory::new(&mut d);
        mem.copy("C:\\a.bin", "C:\\b.bin").unwrap();
        mem.delete("C:\\a.bin").unwrap();
        assert_eq!(
            mock.writes(),
            vec![
                ":MMEM:COPY \"C:\\a.bin\",\"C:\\b.bin\"",
                ":MMEM:DEL \"C:\\a.bin\""
            ]
        );
    }

    #[test]
    fn empty_path_sends_nothing() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock);
        let mut mem = MassMemory::new(&mut d);
        assert!(mem.write_file("", b"x").is_err());
        assert!(mem.read_file("").is_err());
        assert_eq!(mock.transmissions(), 0);
    }

    #[test]
    fn file_round_trip_uses_blocks() {
        let mock = MockSession::new();
        mock.push_raw_reply(b"#13abc\n".to_vec());
        let mut d = mock_dispatcher(&mock);
        let mut mem = MassMemory::new(&mut d);

        mem.write_file("x.bin", b"abc").unwrap();
        assert_eq!(mock.raw_writes(), vec![b":MMEM:DATA \"x.bin\",#13abc\n".to_vec()]);
        assert_eq!(&mem.read_file("x.bin").unwrap().value[..], b"abc");
        assert_eq!(mock.writes(), vec![":MMEM:DATA? \"x.bin\""]);
    }
}
