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

// On-disk layout constants shared across the four files (spec.md §3).
//
// Every file begins with a 10-byte ASCII magic tag. Name/site records are a
// fixed 36 bytes. Index entries are a fixed 35 bytes, big-endian. Game
// records are a length-prefixed blob (see `length_prefix.rs`).

pub const MAGIC_LEN: usize = 10;

pub const NAMES_MAGIC: [u8; MAGIC_LEN] = *b"SimpleCDbn";
pub const SITES_MAGIC: [u8; MAGIC_LEN] = *b"SimpleCDbs";
pub const INDEX_MAGIC: [u8; MAGIC_LEN] = *b"SimpleCDbi";
pub const GAMES_MAGIC: [u8; MAGIC_LEN] = *b"SimpleCDbg";

/// Fixed width of a name/site intern record (§4.1).
pub const INTERN_RECORD_LEN: usize = 36;

/// Fixed width of an index entry (§3).
pub const INDEX_ENTRY_LEN: usize = 35;

/// Sentinel marking "no such record" for 32-bit intern offsets (§3).
pub const NO_OFFSET: u32 = 0xFFFF_FFFF;
