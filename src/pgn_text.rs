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

// Reference `PgnSource` implementation (spec.md §A.5 of SPEC_FULL.md): a
// small tag-pair + movetext PGN reader, just capable enough to drive this
// crate's own import tests. Not the focus of the crate — the real reader is
// an external collaborator spec.md explicitly keeps out of scope.
//
// Shape borrowed from the retrieval pack's PGN/chess-database examples
// (`other_examples` SCID index parsing, the w3g `game_header.rs` record
// style) rather than from the teacher, which has no text-format parsing.

use std::path::Path;

use crate::error::{Error, Result};
use crate::external::PgnSource;
use crate::game::{Game, HeaderOffset, Headers};

pub struct TextPgnSource;

fn game_start_offsets(content: &str) -> Vec<usize> {
	let mut starts = Vec::new();
	let mut in_tag_block = false;
	let mut pos = 0usize;
	for line in content.split_inclusive('\n') {
		let trimmed = line.trim();
		if trimmed.starts_with('[') {
			if !in_tag_block {
				starts.push(pos);
				in_tag_block = true;
			}
		} else {
			in_tag_block = false;
		}
		pos += line.len();
	}
	starts
}

fn parse_tag_line(line: &str) -> Option<(String, String)> {
	let line = line.trim();
	let line = line.strip_prefix('[')?;
	let line = line.strip_suffix(']')?;
	let space = line.find(' ')?;
	let (key, rest) = line.split_at(space);
	let rest = rest.trim();
	let value = rest.strip_prefix('"')?.strip_suffix('"')?;
	Some((key.to_string(), value.to_string()))
}

fn parse_headers(block: &str) -> Headers {
	let mut headers = Headers::new();
	for line in block.lines() {
		if let Some((k, v)) = parse_tag_line(line) {
			headers.insert(k, v);
		} else if !line.trim().is_empty() && !line.trim_start().starts_with('[') {
			break;
		}
	}
	headers
}

fn parse_moves(block: &str) -> Vec<String> {
	let mut in_tags = true;
	let mut movetext = String::new();
	for line in block.lines() {
		if in_tags {
			if line.trim().starts_with('[') || line.trim().is_empty() {
				continue;
			}
			in_tags = false;
		}
		movetext.push_str(line);
		movetext.push(' ');
	}
	movetext
		.split_whitespace()
		.filter(|tok| {
			let stripped = tok.trim_end_matches('.');
			let is_move_number = !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit());
			let is_result = matches!(*tok, "1-0" | "0-1" | "1/2-1/2" | "*");
			!is_move_number && !is_result
		})
		.map(|s| s.to_string())
		.collect()
}

impl PgnSource for TextPgnSource {
	fn detect_encoding(&self, _path: &Path) -> Result<String> {
		Ok("utf-8".to_string())
	}

	fn headers<'a>(
		&'a self,
		path: &'a Path,
		_encoding: &'a str,
	) -> Result<Box<dyn Iterator<Item = Result<HeaderOffset>> + 'a>> {
		let content = std::fs::read_to_string(path)?;
		let starts = game_start_offsets(&content);
		let results: Vec<Result<HeaderOffset>> = starts
			.into_iter()
			.map(|start| {
				let block = &content[start..];
				let end = game_start_offsets(block).get(1).copied().unwrap_or(block.len());
				let headers = parse_headers(&block[..end]);
				Ok(HeaderOffset { offset: start as u64, headers })
			})
			.collect();
		Ok(Box::new(results.into_iter()))
	}

	fn read_game_from_file(&self, path: &Path, _encoding: &str, offset: u64) -> Result<Game> {
		let content = std::fs::read_to_string(path)?;
		let offset = offset as usize;
		if offset > content.len() {
			return Err(Error::Corruption(format!("header offset {} beyond end of file", offset)));
		}
		let block = &content[offset..];
		let end = game_start_offsets(block).get(1).copied().unwrap_or(block.len());
		let block = &block[..end];
		Ok(Game { headers: parse_headers(block), moves: parse_moves(block) })
	}
}
