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

// Reference `GameEncoder`/`GameDecoder` pair (see SPEC_FULL.md §A.5): the
// storage layer treats whatever these produce as an opaque "DCG blob"
// (spec.md §1), so the wire format here is this crate's own invention, not
// a port of anything — it exists only so the import/reader round trip has
// something concrete to carry. Reuses the length-prefix codec from
// `length_prefix.rs` to frame each move, the same way the storage layer
// frames each game.

use crate::error::Result;
use crate::external::{GameDecoder, GameEncoder};
use crate::game::Game;
use crate::length_prefix::{read_length, write_length};

pub struct SimpleBlobCodec;

impl GameEncoder for SimpleBlobCodec {
	fn encode_game(&self, game: &Game) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		write_length(&mut out, game.moves.len() as u32)?;
		for mv in &game.moves {
			let bytes = mv.as_bytes();
			write_length(&mut out, bytes.len() as u32)?;
			out.extend_from_slice(bytes);
		}
		Ok(out)
	}
}

impl GameDecoder for SimpleBlobCodec {
	fn decode_game(&self, game: &mut Game, blob: &[u8]) -> Result<()> {
		let mut cursor = blob;
		let count = read_length(&mut cursor)?;
		let mut moves = Vec::with_capacity(count as usize);
		for _ in 0..count {
			let len = read_length(&mut cursor)? as usize;
			let (mv, rest) = cursor.split_at(len);
			moves.push(String::from_utf8_lossy(mv).into_owned());
			cursor = rest;
		}
		game.moves = moves;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::game::Headers;

	#[test]
	fn round_trips_move_list() {
		let codec = SimpleBlobCodec;
		let game = Game {
			headers: Headers::new(),
			moves: vec!["e4".to_string(), "e5".to_string(), "Nf3".to_string()],
		};
		let blob = codec.encode_game(&game).unwrap();

		let mut decoded = Game { headers: Headers::new(), moves: Vec::new() };
		codec.decode_game(&mut decoded, &blob).unwrap();
		assert_eq!(decoded.moves, game.moves);
	}

	#[test]
	fn empty_move_list_round_trips() {
		let codec = SimpleBlobCodec;
		let game = Game { headers: Headers::new(), moves: Vec::new() };
		let blob = codec.encode_game(&game).unwrap();
		let mut decoded = Game { headers: Headers::new(), moves: vec!["stale".to_string()] };
		codec.decode_game(&mut decoded, &blob).unwrap();
		assert!(decoded.moves.is_empty());
	}
}
