// Copyright 2015-2020 Parity Technologies (UK) Ltd.
// This file is part of Parity.

// Parity is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity.  If not, see <http://www.gnu.org/licenses/>.

// Game store (C-G), spec.md §4.2.
//
// Append-only blob log: 10-byte magic, then a stream of
// (length-prefix, blob) records. The record's identifier is the byte
// offset of its length prefix. Reads are served from a long-lived
// memory-mapped view (spec.md §9 redesign note: "a long-lived memory-mapped
// view is a clean optimization" over the source's per-call reopen).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{Error, Result};
use crate::format::GAMES_MAGIC;
use crate::length_prefix::{read_length, write_length};

#[cfg(target_os = "macos")]
fn disable_read_ahead(file: &std::fs::File) -> Result<()> {
	use std::os::unix::io::AsRawFd;
	if unsafe { libc::fcntl(file.as_raw_fd(), libc::F_RDAHEAD, 0) } != 0 {
		Err(Error::Io(std::io::Error::last_os_error()))
	} else {
		Ok(())
	}
}

#[cfg(not(target_os = "macos"))]
fn disable_read_ahead(_file: &std::fs::File) -> Result<()> {
	Ok(())
}

pub struct GameStore {
	path: PathBuf,
}

impl GameStore {
	pub fn new(base: &Path) -> GameStore {
		let mut path = base.as_os_str().to_owned();
		path.push(".dcg");
		GameStore { path: PathBuf::from(path) }
	}

	/// §4.5 phase 4 step 3: seek to EOF, write length-prefix + blob, return
	/// the offset of the length prefix.
	pub fn append(&self, blob: &[u8]) -> Result<u64> {
		let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
		let mut position = file.metadata()?.len();
		if position == 0 {
			file.write_all(&GAMES_MAGIC)?;
			position = GAMES_MAGIC.len() as u64;
		}
		let game_offset = position;
		write_length(&mut file, blob.len() as u32)?;
		file.write_all(blob)?;
		log::trace!(target: "scdb", "Appended game of {} bytes at offset {}", blob.len(), game_offset);
		Ok(game_offset)
	}

	/// §4.6 step 3: seek to `offset`, decode the length prefix, read that
	/// many bytes of blob.
	pub fn read_at(&self, offset: u64) -> Result<Vec<u8>> {
		let file = std::fs::File::open(&self.path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				Error::FileMissing(self.path.clone())
			} else {
				Error::Io(e)
			}
		})?;
		disable_read_ahead(&file)?;
		let mmap = unsafe { Mmap::map(&file)? };

		let offset = offset as usize;
		if offset >= mmap.len() {
			return Err(Error::Corruption(format!("game offset {} beyond end of file", offset)));
		}
		let mut cursor = &mmap[offset..];
		let len = read_length(&mut cursor)? as usize;

		if cursor.len() < len {
			return Err(Error::Truncated { file: "games", expected: len, got: cursor.len() });
		}
		Ok(cursor[..len].to_vec())
	}
}
