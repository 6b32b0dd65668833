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

// Index (C-I), spec.md §3, §4.3.
//
// Fixed 35-byte big-endian entries, stored contiguously after the 10-byte
// magic at `10 + 35*k`; ordinal `k` is the entry's position in file order.
// Append-only; soft delete via the status byte.

use std::convert::TryInto;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::{INDEX_ENTRY_LEN, INDEX_MAGIC, MAGIC_LEN};

const STATUS_LIVE: u8 = 0x00;
const STATUS_DELETED: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
	Unknown,
	WhiteWins,
	BlackWins,
	Draw,
}

impl GameResult {
	fn to_u8(self) -> u8 {
		match self {
			GameResult::Unknown => 0,
			GameResult::WhiteWins => 1,
			GameResult::BlackWins => 2,
			GameResult::Draw => 3,
		}
	}

	fn from_u8(b: u8) -> GameResult {
		match b {
			1 => GameResult::WhiteWins,
			2 => GameResult::BlackWins,
			3 => GameResult::Draw,
			_ => GameResult::Unknown,
		}
	}

	pub fn from_pgn_str(s: &str) -> GameResult {
		match s {
			"1-0" => GameResult::WhiteWins,
			"0-1" => GameResult::BlackWins,
			"1/2-1/2" => GameResult::Draw,
			_ => GameResult::Unknown,
		}
	}

	pub fn to_pgn_str(self) -> &'static str {
		match self {
			GameResult::Unknown => "*",
			GameResult::WhiteWins => "1-0",
			GameResult::BlackWins => "0-1",
			GameResult::Draw => "1/2-1/2",
		}
	}
}

/// A 3-byte ASCII ECO code, or `None` for "absent" (spec.md §3: `0x000000`
/// means absent). Read back as an exact 3 bytes — the source allocated a
/// 4-byte buffer for a 3-byte read and leaked the uninitialized 4th byte
/// into the header string (spec.md §9 bug 6); this type makes that slot
/// structurally impossible to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcoCode(pub [u8; 3]);

impl EcoCode {
	pub fn parse(s: &str) -> Option<EcoCode> {
		let bytes = s.as_bytes();
		if bytes.len() < 3 {
			return None;
		}
		let mut out = [0u8; 3];
		out.copy_from_slice(&bytes[..3]);
		Some(EcoCode(out))
	}

	pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
	pub deleted: bool,
	pub game_offset: u64,
	pub white_offset: u32,
	pub black_offset: u32,
	pub round: Option<u16>,
	pub site_offset: u32,
	pub elo_white: Option<u16>,
	pub elo_black: Option<u16>,
	pub result: GameResult,
	pub eco: Option<EcoCode>,
	pub year: Option<u16>,
	pub month: Option<u8>,
	pub day: Option<u8>,
}

impl IndexEntry {
	pub fn to_bytes(&self) -> [u8; INDEX_ENTRY_LEN] {
		let mut buf = [0u8; INDEX_ENTRY_LEN];
		let mut at = 0;
		let mut put = |bytes: &[u8]| {
			buf[at..at + bytes.len()].copy_from_slice(bytes);
			at += bytes.len();
		};
		put(&[if self.deleted { STATUS_DELETED } else { STATUS_LIVE }]);
		put(&self.game_offset.to_be_bytes());
		put(&self.white_offset.to_be_bytes());
		put(&self.black_offset.to_be_bytes());
		put(&self.round.unwrap_or(0).to_be_bytes());
		put(&self.site_offset.to_be_bytes());
		put(&self.elo_white.unwrap_or(0).to_be_bytes());
		put(&self.elo_black.unwrap_or(0).to_be_bytes());
		put(&[self.result.to_u8()]);
		put(&self.eco.map(|e| e.0).unwrap_or([0, 0, 0]));
		put(&self.year.unwrap_or(0).to_be_bytes());
		put(&[self.month.unwrap_or(0)]);
		put(&[self.day.unwrap_or(0)]);
		debug_assert_eq!(at, INDEX_ENTRY_LEN);
		buf
	}

	pub fn from_bytes(buf: &[u8; INDEX_ENTRY_LEN]) -> IndexEntry {
		let status = buf[0];
		let game_offset = u64::from_be_bytes(buf[1..9].try_into().unwrap());
		let white_offset = u32::from_be_bytes(buf[9..13].try_into().unwrap());
		let black_offset = u32::from_be_bytes(buf[13..17].try_into().unwrap());
		let round = u16::from_be_bytes(buf[17..19].try_into().unwrap());
		let site_offset = u32::from_be_bytes(buf[19..23].try_into().unwrap());
		let elo_white = u16::from_be_bytes(buf[23..25].try_into().unwrap());
		let elo_black = u16::from_be_bytes(buf[25..27].try_into().unwrap());
		let result = buf[27];
		let eco = [buf[28], buf[29], buf[30]];
		let year = u16::from_be_bytes(buf[31..33].try_into().unwrap());
		let month = buf[33];
		let day = buf[34];

		IndexEntry {
			deleted: status == STATUS_DELETED,
			game_offset,
			white_offset,
			black_offset,
			round: non_zero(round),
			site_offset,
			elo_white: non_zero(elo_white),
			elo_black: non_zero(elo_black),
			result: GameResult::from_u8(result),
			eco: if eco == [0, 0, 0] { None } else { Some(EcoCode(eco)) },
			year: non_zero(year),
			month: non_zero(month),
			day: non_zero(day),
		}
	}
}

fn non_zero<T: PartialEq + Default>(v: T) -> Option<T> {
	if v == T::default() {
		None
	} else {
		Some(v)
	}
}

pub struct IndexTable {
	path: PathBuf,
	entries: Vec<IndexEntry>,
}

impl IndexTable {
	pub fn new(base: &Path) -> IndexTable {
		let mut path = base.as_os_str().to_owned();
		path.push(".dci");
		IndexTable { path: PathBuf::from(path), entries: Vec::new() }
	}

	pub fn count(&self) -> usize {
		self.entries.len()
	}

	pub fn get(&self, k: usize) -> Option<&IndexEntry> {
		self.entries.get(k)
	}

	/// §4.3 load: verify magic, then read 35-byte records sequentially.
	pub fn load(&mut self) -> Result<()> {
		self.entries.clear();

		let mut file = std::fs::File::open(&self.path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				Error::FileMissing(self.path.clone())
			} else {
				Error::Io(e)
			}
		})?;

		let mut magic = [0u8; MAGIC_LEN];
		file.read_exact(&mut magic).map_err(Error::Io)?;
		if magic != INDEX_MAGIC {
			return Err(Error::BadMagic { file: "index", expected: INDEX_MAGIC, found: magic.to_vec() });
		}

		loop {
			let mut record = [0u8; INDEX_ENTRY_LEN];
			let read = read_up_to(&mut file, &mut record)?;
			if read == 0 {
				break;
			}
			if read != INDEX_ENTRY_LEN {
				return Err(Error::Truncated { file: "index", expected: INDEX_ENTRY_LEN, got: read });
			}
			self.entries.push(IndexEntry::from_bytes(&record));
		}
		log::debug!(target: "scdb", "Loaded index with {} entries", self.entries.len());
		Ok(())
	}

	/// §4.5 phase 4 step 5: append one entry, asserting it is exactly 35
	/// bytes, and keep the in-memory ordered sequence in sync.
	pub fn append(&mut self, entry: IndexEntry) -> Result<()> {
		let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
		if file.metadata()?.len() == 0 {
			file.write_all(&INDEX_MAGIC)?;
		}
		let bytes = entry.to_bytes();
		assert_eq!(bytes.len(), INDEX_ENTRY_LEN);
		file.write_all(&bytes)?;
		self.entries.push(entry);
		Ok(())
	}
}

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
