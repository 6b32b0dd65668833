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

//! Compact, file-backed storage for chess games imported from PGN.
//!
//! A database lives at a filename base `B` and is backed by four files:
//! `B.dcn` (interned player names), `B.dcs` (interned site strings),
//! `B.dci` (the fixed-width index) and `B.dcg` (the append-only game blob
//! log). See `index.rs`/`intern.rs`/`game_store.rs` for the exact layouts.

pub mod blob_codec;
pub mod error;
pub mod external;
pub mod format;
pub mod game;
mod game_store;
mod import;
mod index;
mod intern;
mod length_prefix;
pub mod pgn_text;
mod reader;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};
pub use external::{GameDecoder, GameEncoder, PgnSource};
pub use game::{Game, HeaderOffset, Headers};
pub use import::ImportOutcome;

use game_store::GameStore;
use index::IndexTable;
use intern::{InternTable, NameKind, SiteKind};

/// A handle to a chess game database rooted at filename base `B`
/// (spec.md §6: `open` constructs the handle and touches no disk).
pub struct Database {
	base: PathBuf,
	names: InternTable<NameKind>,
	sites: InternTable<SiteKind>,
	index: IndexTable,
	games: GameStore,
}

impl Database {
	/// Constructs a handle for the four files derived from `base`. Does not
	/// open or read anything; call `load_names`/`load_sites`/`load_index`
	/// (or `import_pgn_and_save` into an empty base) afterwards.
	pub fn open(base: impl AsRef<Path>) -> Database {
		let base = base.as_ref().to_path_buf();
		Database {
			names: InternTable::new(&base),
			sites: InternTable::new(&base),
			index: IndexTable::new(&base),
			games: GameStore::new(&base),
			base,
		}
	}

	pub fn base_path(&self) -> &Path {
		&self.base
	}

	/// §4.1 load: populate the in-memory name table from `B.dcn`.
	pub fn load_names(&mut self) -> Result<()> {
		self.names.load()
	}

	/// §4.1 load: populate the in-memory site table from `B.dcs`.
	pub fn load_sites(&mut self) -> Result<()> {
		self.sites.load()
	}

	/// §4.3 load: populate the in-memory index from `B.dci`.
	pub fn load_index(&mut self) -> Result<()> {
		self.index.load()
	}

	/// Runs all three loads, tolerating a fully empty (never-imported-into)
	/// base: a missing file on a brand-new base is not an error here, since
	/// `import_pgn_and_save` creates all four files on first write.
	pub fn load_existing(&mut self) -> Result<()> {
		match self.load_names() {
			Ok(()) | Err(Error::FileMissing(_)) => {}
			Err(e) => return Err(e),
		}
		match self.load_sites() {
			Ok(()) | Err(Error::FileMissing(_)) => {}
			Err(e) => return Err(e),
		}
		match self.load_index() {
			Ok(()) | Err(Error::FileMissing(_)) => {}
			Err(e) => return Err(e),
		}
		Ok(())
	}

	/// §4.5: the full four-phase import of `pgn_path` into this database.
	pub fn import_pgn_and_save(
		&mut self,
		pgn_path: impl AsRef<Path>,
		source: &dyn PgnSource,
		encoder: &dyn GameEncoder,
	) -> Result<ImportOutcome> {
		import::import_pgn_and_save(
			pgn_path.as_ref(),
			source,
			encoder,
			&mut self.names,
			&mut self.sites,
			&self.games,
			&mut self.index,
		)
	}

	/// §4.3 `count()`: the number of loaded index entries, including
	/// soft-deleted ones.
	pub fn count_games(&self) -> usize {
		self.index.count()
	}

	/// §4.6 `get_game(k)`. `Ok(None)` for `k >= count_games()`.
	pub fn get_game_at(&self, k: usize, decoder: &dyn GameDecoder) -> Result<Option<Game>> {
		reader::get_game_at(k, &self.index, &self.names, &self.sites, &self.games, decoder)
	}

	/// Whether index entry `k` carries the soft-delete status byte
	/// (spec.md §9 open question 5).
	pub fn is_deleted(&self, k: usize) -> Option<bool> {
		self.index.get(k).map(|e| e.deleted)
	}
}
