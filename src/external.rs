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

// Inbound dependency surface (spec.md §6): the PGN reader, the game
// encoder/decoder, and the encoding detector are all external collaborators
// with narrow interfaces — spec.md §1 keeps them explicitly out of scope.
// These traits are the narrow interfaces; `pgn_text.rs`/`blob_codec.rs` hold
// one small reference implementation of each, used only by this crate's own
// tests.

use std::path::Path;

use crate::error::Result;
use crate::game::{Game, HeaderOffset};

pub trait PgnSource {
	/// Returns a text-encoding tag for `path` (e.g. `"utf-8"`, `"latin-1"`).
	fn detect_encoding(&self, path: &Path) -> Result<String>;

	/// A lazy sequence of `(byte_offset, headers)` pairs, one per game,
	/// header-only (no move tree).
	fn headers<'a>(
		&'a self,
		path: &'a Path,
		encoding: &'a str,
	) -> Result<Box<dyn Iterator<Item = Result<HeaderOffset>> + 'a>>;

	/// Reconstructs a full `Game` (headers + move tree) starting at the
	/// given byte offset.
	fn read_game_from_file(&self, path: &Path, encoding: &str, offset: u64) -> Result<Game>;
}

pub trait GameEncoder {
	/// Converts a `Game` to an opaque "DCG blob" (spec.md §1).
	fn encode_game(&self, game: &Game) -> Result<Vec<u8>>;
}

pub trait GameDecoder {
	/// Populates `game`'s move tree from an opaque DCG blob. `game` arrives
	/// with its headers already filled in by the storage layer (spec.md
	/// §4.6 step 3: "hand blob to the decoder along with the partially
	/// populated game").
	fn decode_game(&self, game: &mut Game, blob: &[u8]) -> Result<()>;
}
