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

// Import pipeline (C-IMP), spec.md §4.5.
//
// Four phases: scan headers for intern candidates, append sites, append
// names, then re-walk headers to append games and index entries. Ported from
// `database.cpp::importPgnAppendNames`/`importPgnAppendSites`/`importPgn`,
// with the header-name and date-predicate bugs documented in spec.md §9
// fixed rather than replicated (see DESIGN.md).

use std::collections::HashMap;
use std::io::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::external::{GameEncoder, PgnSource};
use crate::game::Headers;
use crate::game_store::GameStore;
use crate::index::{EcoCode, GameResult, IndexEntry, IndexTable};
use crate::intern::{InternRef, InternTable, NameKind, SiteKind};

const PROGRESS_EVERY: usize = 100;

pub struct ImportOutcome {
	pub games_imported: usize,
}

/// §4.5: run all four phases against an already-open set of tables.
pub fn import_pgn_and_save(
	pgn_path: &Path,
	source: &dyn PgnSource,
	encoder: &dyn GameEncoder,
	names: &mut InternTable<NameKind>,
	sites: &mut InternTable<SiteKind>,
	games: &GameStore,
	index: &mut IndexTable,
) -> Result<ImportOutcome> {
	log::info!(target: "scdb", "Importing {}", pgn_path.display());
	let encoding = source.detect_encoding(pgn_path)?;

	// Phase 1: collect every header map up front; build the forward maps for
	// names and sites against the tables already loaded from disk.
	let mut header_offsets = Vec::new();
	let mut names_batch: HashMap<String, InternRef> = HashMap::new();
	let mut sites_batch: HashMap<String, InternRef> = HashMap::new();

	let mut scanned = 0usize;
	for item in source.headers(pgn_path, &encoding)? {
		let header_offset = item?;
		for key in ["White", "Black"] {
			if let Some(value) = header_offset.headers.get(key) {
				names_batch.entry(value.clone()).or_insert_with(|| names.find(value));
			}
		}
		if let Some(value) = header_offset.headers.get("Site") {
			sites_batch.entry(value.clone()).or_insert_with(|| sites.find(value));
		}
		scanned += 1;
		if scanned % PROGRESS_EVERY == 0 {
			print!("\rscanning at {}", scanned);
			std::io::stdout().flush().ok();
		}
		header_offsets.push(header_offset);
	}
	println!();

	// Phase 2 + 3: persist the pending strings, turning every batch entry
	// into `InternRef::Persisted`.
	sites.append_batch(&mut sites_batch)?;
	names.append_batch(&mut names_batch)?;

	// Phase 4: re-walk the same header maps, this time appending a game
	// blob and an index entry for each.
	let total = header_offsets.len();
	for (i, header_offset) in header_offsets.into_iter().enumerate() {
		let game = source.read_game_from_file(pgn_path, &encoding, header_offset.offset)?;
		let blob = encoder.encode_game(&game)?;
		let game_offset = games.append(&blob)?;

		let entry = build_index_entry(&header_offset.headers, &names_batch, &sites_batch, game_offset);
		index.append(entry)?;

		if (i + 1) % PROGRESS_EVERY == 0 {
			print!("\rsaving games: {}/{}", i + 1, total);
			std::io::stdout().flush().ok();
		}
	}
	println!();

	log::info!(target: "scdb", "Imported {} games from {}", total, pgn_path.display());
	Ok(ImportOutcome { games_imported: total })
}

fn build_index_entry(
	headers: &Headers,
	names_batch: &HashMap<String, InternRef>,
	sites_batch: &HashMap<String, InternRef>,
	game_offset: u64,
) -> IndexEntry {
	let white_offset = headers
		.get("White")
		.and_then(|v| names_batch.get(v))
		.and_then(|r| r.offset())
		.unwrap_or(crate::format::NO_OFFSET);
	let black_offset = headers
		.get("Black")
		.and_then(|v| names_batch.get(v))
		.and_then(|r| r.offset())
		.unwrap_or(crate::format::NO_OFFSET);
	let site_offset = headers
		.get("Site")
		.and_then(|v| sites_batch.get(v))
		.and_then(|r| r.offset())
		.unwrap_or(crate::format::NO_OFFSET);

	let round = headers.get("Round").and_then(|v| v.parse::<u16>().ok());
	let elo_white = headers.get("WhiteElo").and_then(|v| v.parse::<u16>().ok());
	let elo_black = headers.get("BlackElo").and_then(|v| v.parse::<u16>().ok());
	let result = headers.get("Result").map(|v| GameResult::from_pgn_str(v)).unwrap_or(GameResult::Unknown);
	let eco = headers.get("ECO").and_then(|v| EcoCode::parse(v));
	let (year, month, day) = headers.get("Date").map(|v| parse_date(v)).unwrap_or((None, None, None));

	IndexEntry {
		deleted: false,
		game_offset,
		white_offset,
		black_offset,
		round,
		site_offset,
		elo_white,
		elo_black,
		result,
		eco,
		year,
		month,
		day,
	}
}

/// Parses a PGN `Date` tag of the form `YYYY.MM.DD` (segments may be `??`).
/// spec.md §9 bug 1: the source's validity checks test the year variable for
/// all three fields; here month and day are checked against their own
/// bounds. Segment *length*, not just numeric range, gates each field
/// (`database.cpp:523-536`): year only parses from a 4-digit first segment,
/// month only from a 2-digit second segment and only once year parsed, day
/// only from a 2-digit third segment and only once month parsed.
fn parse_date(s: &str) -> (Option<u16>, Option<u8>, Option<u8>) {
	let mut parts = s.splitn(3, '.');
	let year_part = parts.next().unwrap_or("");
	let year = (year_part.len() == 4)
		.then(|| year_part.parse::<u16>().ok())
		.flatten()
		.filter(|&y| y > 0 && y < 2100);
	if year.is_none() {
		return (None, None, None);
	}

	let month_part = parts.next().unwrap_or("");
	let month = (month_part.len() == 2)
		.then(|| month_part.parse::<u8>().ok())
		.flatten()
		.filter(|&m| (1..=12).contains(&m));
	if month.is_none() {
		return (year, None, None);
	}

	let day_part = parts.next().unwrap_or("");
	let day = (day_part.len() == 2)
		.then(|| day_part.parse::<u8>().ok())
		.flatten()
		.filter(|&d| (1..=31).contains(&d));

	(year, month, day)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parse_date_accepts_full_date() {
		assert_eq!(parse_date("1985.09.03"), (Some(1985), Some(9), Some(3)));
	}

	#[test]
	fn parse_date_rejects_placeholders() {
		assert_eq!(parse_date("1985.??.??"), (Some(1985), None, None));
		assert_eq!(parse_date("????.??.??"), (None, None, None));
	}

	#[test]
	fn parse_date_rejects_out_of_range_month_and_day() {
		// An invalid month also blanks the day: day parsing is gated on a
		// valid month having parsed first (`database.cpp:523-536`).
		assert_eq!(parse_date("1985.13.03"), (Some(1985), None, None));
		assert_eq!(parse_date("1985.09.32"), (Some(1985), Some(9), None));
	}

	#[test]
	fn parse_date_requires_exact_segment_lengths() {
		// 3-digit year: spec.md §4.5 requires a 4-digit first segment, so
		// month/day never get a chance to parse even though they're valid.
		assert_eq!(parse_date("198.9.3"), (None, None, None));
		// Missing year segment: month/day are gated on it regardless of
		// their own validity.
		assert_eq!(parse_date(".09.03"), (None, None, None));
		// 1-digit month despite being in range: length check rejects it.
		assert_eq!(parse_date("1985.9.03"), (Some(1985), None, None));
	}
}
