// Copyright 2025 Irreducible Inc.

//! Little-endian packing between bit vectors and byte vectors.

/// Expands bytes into bits, least significant bit of each byte first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
	bytes
		.iter()
		.flat_map(|&byte| (0..8).map(move |i| (byte >> i) & 1 == 1))
		.collect()
}

/// Packs bits into bytes, least significant bit first.
///
/// A trailing partial chunk is padded with zero bits.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
	bits.chunks(8)
		.map(|chunk| {
			chunk
				.iter()
				.enumerate()
				.fold(0u8, |byte, (i, &bit)| byte | ((bit as u8) << i))
		})
		.collect()
}
