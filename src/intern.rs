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

// Name table (C-N) and site table (C-S), spec.md §4.1.
//
// Structurally identical; they differ only in magic and filename suffix,
// which is why they share one implementation parameterized over `InternKind`
// instead of being hand-duplicated (the bug in database.cpp where
// `importPgnAppendSites` stamped the names magic onto the sites file is the
// direct consequence of that duplication — making the magic part of the type
// instead of a copy-pasted literal removes the whole bug class).

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::{INTERN_RECORD_LEN, MAGIC_LEN};

pub trait InternKind {
	const MAGIC: [u8; MAGIC_LEN];
	const FILE_SUFFIX: &'static str;
	const LABEL: &'static str;
}

pub struct NameKind;
impl InternKind for NameKind {
	const MAGIC: [u8; MAGIC_LEN] = crate::format::NAMES_MAGIC;
	const FILE_SUFFIX: &'static str = "dcn";
	const LABEL: &'static str = "names";
}

pub struct SiteKind;
impl InternKind for SiteKind {
	const MAGIC: [u8; MAGIC_LEN] = crate::format::SITES_MAGIC;
	const FILE_SUFFIX: &'static str = "dcs";
	const LABEL: &'static str = "sites";
}

/// What a batch lookup found for a candidate string before an import appends
/// it: either it is already on disk at a known offset, or it is new to this
/// batch and waiting for a slot (spec.md §9 redesign note: an explicit sum
/// type in place of the 0 / 0xFFFFFFFF sentinel pair the source used).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InternRef {
	Pending,
	Persisted(u32),
}

impl InternRef {
	pub fn offset(self) -> Option<u32> {
		match self {
			InternRef::Pending => None,
			InternRef::Persisted(o) => Some(o),
		}
	}
}

pub struct InternTable<K: InternKind> {
	path: PathBuf,
	by_offset: HashMap<u32, String>,
	by_string: HashMap<String, u32>,
	_kind: PhantomData<K>,
}

/// Truncate `s` to at most `max` bytes without splitting a UTF-8 code point
/// (spec.md §9: the source truncated by raw byte count, producing invalid
/// UTF-8 when a multi-byte character straddled the cut).
fn truncate_utf8(s: &str, max: usize) -> &str {
	if s.len() <= max {
		return s;
	}
	let mut end = max;
	while end > 0 && !s.is_char_boundary(end) {
		end -= 1;
	}
	&s[..end]
}

fn encode_record(s: &str) -> [u8; INTERN_RECORD_LEN] {
	let truncated = truncate_utf8(s, INTERN_RECORD_LEN);
	let mut buf = [0x20u8; INTERN_RECORD_LEN];
	buf[..truncated.len()].copy_from_slice(truncated.as_bytes());
	buf
}

impl<K: InternKind> InternTable<K> {
	fn file_path(base: &Path) -> PathBuf {
		let mut path = base.as_os_str().to_owned();
		path.push(".");
		path.push(K::FILE_SUFFIX);
		PathBuf::from(path)
	}

	/// Construct a handle without touching disk (spec.md §6: `open` does not
	/// touch disk).
	pub fn new(base: &Path) -> InternTable<K> {
		InternTable {
			path: Self::file_path(base),
			by_offset: HashMap::new(),
			by_string: HashMap::new(),
			_kind: PhantomData,
		}
	}

	pub fn len(&self) -> usize {
		self.by_offset.len()
	}

	pub fn lookup(&self, offset: u32) -> Option<&str> {
		self.by_offset.get(&offset).map(|s| s.as_str())
	}

	pub fn find(&self, s: &str) -> InternRef {
		match self.by_string.get(s) {
			Some(&offset) => InternRef::Persisted(offset),
			None => InternRef::Pending,
		}
	}

	/// §4.1 `load_names`/`load_sites`: verify the magic, then read 36-byte
	/// records sequentially into the reverse map.
	pub fn load(&mut self) -> Result<()> {
		self.by_offset.clear();
		self.by_string.clear();

		let mut file = std::fs::File::open(&self.path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				Error::FileMissing(self.path.clone())
			} else {
				Error::Io(e)
			}
		})?;

		let mut magic = [0u8; MAGIC_LEN];
		file.read_exact(&mut magic).map_err(Error::Io)?;
		if magic != K::MAGIC {
			return Err(Error::BadMagic { file: K::LABEL, expected: K::MAGIC, found: magic.to_vec() });
		}

		let mut position = MAGIC_LEN as u64;
		loop {
			let mut record = [0u8; INTERN_RECORD_LEN];
			let read = read_up_to(&mut file, &mut record)?;
			if read == 0 {
				break;
			}
			if read != INTERN_RECORD_LEN {
				return Err(Error::Truncated { file: K::LABEL, expected: INTERN_RECORD_LEN, got: read });
			}
			let raw = String::from_utf8_lossy(&record);
			let trimmed = raw.trim_end_matches(' ').to_string();
			self.by_offset.insert(position as u32, trimmed.clone());
			self.by_string.insert(trimmed, position as u32);
			position += INTERN_RECORD_LEN as u64;
		}
		log::debug!(target: "scdb", "Loaded {} table with {} entries", K::LABEL, self.by_offset.len());
		Ok(())
	}

	/// §4.1 `append_names`/`append_sites`: append every pending string in
	/// `batch`, turning it into `Persisted(offset)` in place.
	pub fn append_batch(&mut self, batch: &mut HashMap<String, InternRef>) -> Result<()> {
		let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
		let mut position = file.metadata()?.len();
		if position == 0 {
			file.write_all(&K::MAGIC)?;
			position = MAGIC_LEN as u64;
		}

		for (s, slot) in batch.iter_mut() {
			if let InternRef::Persisted(_) = slot {
				continue;
			}
			let record = encode_record(s);
			file.write_all(&record)?;
			let offset = position as u32;
			self.by_offset.insert(offset, s.clone());
			self.by_string.insert(s.clone(), offset);
			*slot = InternRef::Persisted(offset);
			position += INTERN_RECORD_LEN as u64;
		}
		log::trace!(target: "scdb", "Appended batch to {} table, now {} entries", K::LABEL, self.by_offset.len());
		Ok(())
	}
}

/// Like `Read::read_exact` but returns the number of bytes actually read
/// instead of erroring when the stream ends cleanly before the buffer is
/// full, so the caller can distinguish "no more records" from "truncated
/// record".
fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<usize> {
	let mut total = 0;
	while total < buf.len() {
		match r.read(&mut buf[total..]) {
			Ok(0) => break,
			Ok(n) => total += n,
			Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(Error::Io(e)),
		}
	}
	Ok(total)
}
