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

// Reader (C-R), spec.md §4.6.
//
// Random-access retrieval by ordinal: reconstruct headers from the intern
// tables and the index entry, read the blob, hand both to the decoder.
// Ported from `database.cpp::getGameAt`.

use crate::error::Result;
use crate::external::GameDecoder;
use crate::format::NO_OFFSET;
use crate::game::Game;
use crate::game_store::GameStore;
use crate::index::{IndexEntry, IndexTable};
use crate::intern::{InternTable, NameKind, SiteKind};

/// §4.6 step 2: compose `"YYYY.MM.DD"`, substituting `????`/`??` for any
/// field the index entry left as "unknown".
fn format_date(entry: &IndexEntry) -> String {
	let year = entry.year.map(|y| format!("{:04}", y)).unwrap_or_else(|| "????".to_string());
	let month = entry.month.map(|m| format!("{:02}", m)).unwrap_or_else(|| "??".to_string());
	let day = entry.day.map(|d| format!("{:02}", d)).unwrap_or_else(|| "??".to_string());
	format!("{}.{}.{}", year, month, day)
}

fn format_round(entry: &IndexEntry) -> String {
	entry.round.map(|r| r.to_string()).unwrap_or_else(|| "?".to_string())
}

/// §4.6: materialize the `k`-th game. Returns `Ok(None)` for `k >= count()`
/// (spec.md §7: `IndexOutOfRange` is not an error). A deleted entry is
/// returned anyway — see DESIGN.md's decision for spec.md §9 open question 5;
/// callers wanting to skip tombstones should check `Database::is_deleted`.
pub fn get_game_at(
	k: usize,
	index: &IndexTable,
	names: &InternTable<NameKind>,
	sites: &InternTable<SiteKind>,
	games: &GameStore,
	decoder: &dyn GameDecoder,
) -> Result<Option<Game>> {
	let entry = match index.get(k) {
		Some(e) => e,
		None => return Ok(None),
	};

	let mut headers = crate::game::Headers::new();
	if entry.white_offset != NO_OFFSET {
		if let Some(name) = names.lookup(entry.white_offset) {
			headers.insert("White".to_string(), name.to_string());
		}
	}
	if entry.black_offset != NO_OFFSET {
		if let Some(name) = names.lookup(entry.black_offset) {
			headers.insert("Black".to_string(), name.to_string());
		}
	}
	if entry.site_offset != NO_OFFSET {
		if let Some(site) = sites.lookup(entry.site_offset) {
			headers.insert("Site".to_string(), site.to_string());
		}
	}
	headers.insert("Date".to_string(), format_date(entry));
	headers.insert("Round".to_string(), format_round(entry));
	headers.insert("Result".to_string(), entry.result.to_pgn_str().to_string());
	headers.insert("ECO".to_string(), entry.eco.map(|e| e.as_str().into_owned()).unwrap_or_default());

	let blob = games.read_at(entry.game_offset)?;
	let mut game = Game { headers, moves: Vec::new() };
	decoder.decode_game(&mut game, &blob)?;

	log::trace!(target: "scdb", "Read game {} at offset {}", k, entry.game_offset);
	Ok(Some(game))
}
