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

// Self-describing 1-5 byte length prefix, big-endian (spec.md §4.4).
//
// [0x00..0x7E]            -> b0
// 0x81 [b1]                -> b1
// 0x82 [u16 BE]             -> u16
// 0x83 [b2][u16 BE]         -> (b2 << 16) | u16
// 0x84 [u32 BE]             -> u32
// anything else             -> IllegalLengthByte
//
// Ported from `database.cpp::decodeLength`; the encoder always picks the
// shortest legal form.

use std::io::{Read, Write};

use crate::error::{Error, Result};

const SHORT_MAX: u32 = 0x7E;
const FORM_U8: u8 = 0x81;
const FORM_U16: u8 = 0x82;
const FORM_U24: u8 = 0x83;
const FORM_U32: u8 = 0x84;

pub fn write_length<W: Write>(w: &mut W, n: u32) -> Result<()> {
	if n <= SHORT_MAX {
		w.write_all(&[n as u8])?;
	} else if n <= u8::MAX as u32 {
		w.write_all(&[FORM_U8, n as u8])?;
	} else if n <= u16::MAX as u32 {
		w.write_all(&[FORM_U16])?;
		w.write_all(&(n as u16).to_be_bytes())?;
	} else if n <= 0x00FF_FFFF {
		w.write_all(&[FORM_U24, (n >> 16) as u8])?;
		w.write_all(&((n & 0xFFFF) as u16).to_be_bytes())?;
	} else {
		w.write_all(&[FORM_U32])?;
		w.write_all(&n.to_be_bytes())?;
	}
	Ok(())
}

pub fn encode_length(n: u32) -> Vec<u8> {
	let mut buf = Vec::with_capacity(5);
	write_length(&mut buf, n).expect("Vec<u8> writes never fail");
	buf
}

pub fn read_length<R: Read>(r: &mut R) -> Result<u32> {
	let mut b0 = [0u8; 1];
	r.read_exact(&mut b0)?;
	let b0 = b0[0];
	match b0 {
		0x00..=0x7E => Ok(b0 as u32),
		FORM_U8 => {
			let mut b = [0u8; 1];
			r.read_exact(&mut b)?;
			Ok(b[0] as u32)
		}
		FORM_U16 => {
			let mut b = [0u8; 2];
			r.read_exact(&mut b)?;
			Ok(u16::from_be_bytes(b) as u32)
		}
		FORM_U24 => {
			let mut hi = [0u8; 1];
			r.read_exact(&mut hi)?;
			let mut lo = [0u8; 2];
			r.read_exact(&mut lo)?;
			Ok(((hi[0] as u32) << 16) | u16::from_be_bytes(lo) as u32)
		}
		FORM_U32 => {
			let mut b = [0u8; 4];
			r.read_exact(&mut b)?;
			Ok(u32::from_be_bytes(b))
		}
		other => Err(Error::IllegalLengthByte(other)),
	}
}

pub fn decode_length(buf: &[u8]) -> Result<u32> {
	let mut cursor = buf;
	read_length(&mut cursor)
}

#[cfg(test)]
mod test {
	use super::*;

	fn round_trip(n: u32) {
		let encoded = encode_length(n);
		let decoded = decode_length(&encoded).unwrap();
		assert_eq!(decoded, n, "round trip failed for {}", n);
	}

	#[test]
	fn boundary_values() {
		for n in [0, 126, 127, 255, 256, 65535, 65536, 16777215, 16777216] {
			round_trip(n);
		}
	}

	#[test]
	fn shortest_form_is_chosen() {
		assert_eq!(encode_length(0).len(), 1);
		assert_eq!(encode_length(126).len(), 1);
		assert_eq!(encode_length(127).len(), 2);
		assert_eq!(encode_length(255).len(), 2);
		assert_eq!(encode_length(256).len(), 3);
		assert_eq!(encode_length(65535).len(), 3);
		assert_eq!(encode_length(65536).len(), 4);
		assert_eq!(encode_length(0x00FF_FFFF).len(), 4);
		assert_eq!(encode_length(0x0100_0000).len(), 5);
		assert_eq!(encode_length(u32::MAX).len(), 5);
	}

	#[test]
	fn illegal_bytes_are_rejected() {
		for b in [0x7Fu8, 0x80, 0x85, 0xFF] {
			match decode_length(&[b, 0, 0, 0, 0]) {
				Err(Error::IllegalLengthByte(found)) => assert_eq!(found, b),
				other => panic!("expected IllegalLengthByte, got {:?}", other),
			}
		}
	}

	#[test]
	fn random_round_trip() {
		use rand::RngCore;
		let mut rng = rand::thread_rng();
		for _ in 0..256 {
			round_trip(rng.next_u32());
		}
	}
}
