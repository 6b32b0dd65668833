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

use std::{fmt, io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	Io(io::Error),
	FileMissing(PathBuf),
	BadMagic { file: &'static str, expected: [u8; 10], found: Vec<u8> },
	Truncated { file: &'static str, expected: usize, got: usize },
	IllegalLengthByte(u8),
	Corruption(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::Io(e) => write!(f, "IO error: {}", e),
			Error::FileMissing(path) => write!(f, "required file missing: {}", path.display()),
			Error::BadMagic { file, expected, found } => write!(
				f,
				"bad magic in {}: expected {}, found {}",
				file,
				hex::encode(expected),
				hex::encode(found),
			),
			Error::Truncated { file, expected, got } => write!(
				f,
				"truncated record in {}: expected {} bytes, got {}",
				file, expected, got,
			),
			Error::IllegalLengthByte(b) => write!(f, "illegal length prefix byte: 0x{:02x}", b),
			Error::Corruption(msg) => write!(f, "corruption: {}", msg),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::Io(e)
	}
}
