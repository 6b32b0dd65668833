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

// The game/move model is explicitly out of scope (spec.md §1): the storage
// layer only ever holds `Game` values at arm's length, passing them to/from
// the external encoder, decoder and PGN reader. This is the narrow shared
// data carrier those three collaborators agree on.

use std::collections::BTreeMap;

pub type Headers = BTreeMap<String, String>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game {
	pub headers: Headers,
	/// Opaque to the storage layer; the move-tree model itself is out of
	/// scope (spec.md §1). Represented as a flat list of move tokens, which
	/// is enough for the reference encoder/decoder in `blob_codec.rs` to
	/// round-trip through a DCG blob.
	pub moves: Vec<String>,
}

/// A PGN reader's lazy sequence yields these: the byte offset of a game's
/// first header tag, plus that game's header map (spec.md §6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderOffset {
	pub offset: u64,
	pub headers: Headers,
}
