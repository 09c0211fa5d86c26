// Copyright 2024-2025 Irreducible Inc.

use ark_ff::{BigInt, Fp, FpConfig, PrimeField};
use bytes::{Buf, BufMut};
use thiserror::Error;

/// Serialize data into a byte buffer in a canonical, deterministic layout.
pub trait SerializeBytes {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError>;
}

/// Deserialize data previously written by [`SerializeBytes`].
pub trait DeserializeBytes {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
	#[error("Write buffer is full")]
	WriteBufferFull,
	#[error("Not enough data in read buffer to deserialize")]
	NotEnoughBytes,
	#[error("Unknown enum variant index {name}::{index}")]
	UnknownEnumVariant { name: &'static str, index: u8 },
	#[error("FromUtf8Error: {0}")]
	FromUtf8Error(#[from] std::string::FromUtf8Error),
	#[error("Invalid construction of {name}")]
	InvalidConstruction { name: &'static str },
	#[error("usize {size} is too large to serialize (max is {max})", max = u32::MAX)]
	UsizeTooLarge { size: usize },
	#[error("Invalid version byte for {name}: expected {expected}, got {actual}")]
	VersionMismatch {
		name: &'static str,
		expected: u8,
		actual: u8,
	},
	#[error("{remaining} input bytes left over after deserialization")]
	TrailingBytes { remaining: usize },
	#[error("Compact integer starts with invalid code {code:#04x}")]
	InvalidIntegerCode { code: u8 },
	#[error("{name} out of range, got {value}")]
	IntegerOutOfRange { name: &'static str, value: i64 },
}

impl<T: SerializeBytes + ?Sized> SerializeBytes for &T {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		(**self).serialize(write_buf)
	}
}

impl SerializeBytes for usize {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		let value: u32 = (*self)
			.try_into()
			.map_err(|_| SerializationError::UsizeTooLarge { size: *self })?;
		SerializeBytes::serialize(&value, &mut write_buf)
	}
}

impl DeserializeBytes for usize {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized,
	{
		let value: u32 = DeserializeBytes::deserialize(&mut read_buf)?;
		Ok(value as Self)
	}
}

macro_rules! impl_le_int_serialization {
	($ty:ty, $put:ident, $get:ident) => {
		impl SerializeBytes for $ty {
			fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
				assert_enough_space_for(&write_buf, std::mem::size_of::<Self>())?;
				write_buf.$put(*self);
				Ok(())
			}
		}

		impl DeserializeBytes for $ty {
			fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError>
			where
				Self: Sized,
			{
				assert_enough_data_for(&read_buf, std::mem::size_of::<Self>())?;
				Ok(read_buf.$get())
			}
		}
	};
}

impl_le_int_serialization!(u64, put_u64_le, get_u64_le);
impl_le_int_serialization!(u32, put_u32_le, get_u32_le);
impl_le_int_serialization!(u16, put_u16_le, get_u16_le);
impl_le_int_serialization!(u8, put_u8, get_u8);

impl SerializeBytes for bool {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		u8::serialize(&(*self as u8), write_buf)
	}
}

impl DeserializeBytes for bool {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized,
	{
		Ok(u8::deserialize(read_buf)? != 0)
	}
}

impl SerializeBytes for &str {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		let bytes = self.as_bytes();
		SerializeBytes::serialize(&bytes.len(), &mut write_buf)?;
		assert_enough_space_for(&write_buf, bytes.len())?;
		write_buf.put_slice(bytes);
		Ok(())
	}
}

impl SerializeBytes for String {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		SerializeBytes::serialize(&self.as_str(), &mut write_buf)
	}
}

impl DeserializeBytes for String {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized,
	{
		let len = DeserializeBytes::deserialize(&mut read_buf)?;
		assert_enough_data_for(&read_buf, len)?;
		Ok(Self::from_utf8(read_buf.copy_to_bytes(len).to_vec())?)
	}
}

impl<T: SerializeBytes> SerializeBytes for [T] {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		SerializeBytes::serialize(&self.len(), &mut write_buf)?;
		self.iter()
			.try_for_each(|item| SerializeBytes::serialize(item, &mut write_buf))
	}
}

impl<T: SerializeBytes> SerializeBytes for Vec<T> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		SerializeBytes::serialize(self.as_slice(), &mut write_buf)
	}
}

impl<T: DeserializeBytes> DeserializeBytes for Vec<T> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized,
	{
		let len: usize = DeserializeBytes::deserialize(&mut read_buf)?;
		(0..len)
			.map(|_| DeserializeBytes::deserialize(&mut read_buf))
			.collect()
	}
}

impl<T: SerializeBytes> SerializeBytes for Option<T> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		match self {
			Some(value) => {
				SerializeBytes::serialize(&true, &mut write_buf)?;
				SerializeBytes::serialize(value, &mut write_buf)?;
			}
			None => {
				SerializeBytes::serialize(&false, write_buf)?;
			}
		}
		Ok(())
	}
}

impl<T: DeserializeBytes> DeserializeBytes for Option<T> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized,
	{
		Ok(match bool::deserialize(&mut read_buf)? {
			true => Some(T::deserialize(&mut read_buf)?),
			false => None,
		})
	}
}

macro_rules! impl_tuple_serialization {
	($($name:ident),+) => {
		impl<$($name: SerializeBytes),+> SerializeBytes for ($($name,)+) {
			#[allow(non_snake_case)]
			fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
				let ($($name,)+) = self;
				$(SerializeBytes::serialize($name, &mut write_buf)?;)+
				Ok(())
			}
		}

		impl<$($name: DeserializeBytes),+> DeserializeBytes for ($($name,)+) {
			fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
				Ok(($($name::deserialize(&mut read_buf)?,)+))
			}
		}
	};
}

impl_tuple_serialization!(A, B);
impl_tuple_serialization!(A, B, C);
impl_tuple_serialization!(A, B, C, D);

impl<T: SerializeBytes, const N: usize> SerializeBytes for [T; N] {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		for val in self {
			val.serialize(&mut write_buf)?;
		}
		Ok(())
	}
}

impl<T: DeserializeBytes, const N: usize> DeserializeBytes for [T; N] {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized,
	{
		array_util::try_from_fn(|_| T::deserialize(&mut read_buf))
	}
}

/// Prime field elements are written as their canonical little-endian integer representative,
/// `8 * N` bytes wide.
impl<P: FpConfig<N>, const N: usize> SerializeBytes for Fp<P, N> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		assert_enough_space_for(&write_buf, N * 8)?;
		for limb in self.into_bigint().0 {
			write_buf.put_u64_le(limb);
		}
		Ok(())
	}
}

impl<P: FpConfig<N>, const N: usize> DeserializeBytes for Fp<P, N> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		assert_enough_data_for(&read_buf, N * 8)?;
		let mut limbs = [0u64; N];
		for limb in &mut limbs {
			*limb = read_buf.get_u64_le();
		}
		// Non-canonical representatives (>= modulus) are rejected.
		Self::from_bigint(BigInt(limbs)).ok_or(SerializationError::InvalidConstruction { name: "Fp" })
	}
}

/// Writes the index of `value` in the fixed `variants` table as a single tag byte.
///
/// The order of `variants` is part of the wire format.
pub fn serialize_tag<T: PartialEq>(
	value: &T,
	variants: &[T],
	name: &'static str,
	write_buf: impl BufMut,
) -> Result<(), SerializationError> {
	let index = variants
		.iter()
		.position(|variant| variant == value)
		.and_then(|index| u8::try_from(index).ok())
		.ok_or(SerializationError::InvalidConstruction { name })?;
	index.serialize(write_buf)
}

/// Reads a single tag byte and resolves it against the fixed `variants` table.
pub fn deserialize_tag<T: Copy>(
	read_buf: impl Buf,
	variants: &[T],
	name: &'static str,
) -> Result<T, SerializationError> {
	let index = u8::deserialize(read_buf)?;
	variants
		.get(index as usize)
		.copied()
		.ok_or(SerializationError::UnknownEnumVariant { name, index })
}

/// Writes `value` prefixed with a single version byte.
pub fn serialize_versioned<T: SerializeBytes + ?Sized>(
	version: u8,
	value: &T,
	mut write_buf: impl BufMut,
) -> Result<(), SerializationError> {
	version.serialize(&mut write_buf)?;
	value.serialize(write_buf)
}

/// Reads a version byte, checks it against `version` and then reads the value.
pub fn deserialize_versioned<T: DeserializeBytes>(
	version: u8,
	name: &'static str,
	mut read_buf: impl Buf,
) -> Result<T, SerializationError> {
	let actual = u8::deserialize(&mut read_buf)?;
	if actual != version {
		return Err(SerializationError::VersionMismatch {
			name,
			expected: version,
			actual,
		});
	}
	T::deserialize(read_buf)
}

/// Serializes `value` into a freshly allocated byte vector.
pub fn serialize_to_vec<T: SerializeBytes + ?Sized>(value: &T) -> Result<Vec<u8>, SerializationError> {
	let mut buf = Vec::new();
	value.serialize(&mut buf)?;
	Ok(buf)
}

/// Deserializes a value that must consume the whole input.
pub fn deserialize_exact<T: DeserializeBytes>(bytes: &[u8]) -> Result<T, SerializationError> {
	let mut read_buf = bytes;
	let value = T::deserialize(&mut read_buf)?;
	if !read_buf.is_empty() {
		return Err(SerializationError::TrailingBytes {
			remaining: read_buf.len(),
		});
	}
	Ok(value)
}

/// Implements [`SerializeBytes`] and [`DeserializeBytes`] for a struct by encoding the listed
/// fields in the listed order.
///
/// The field order is the wire format; it does not need to match declaration order.
#[macro_export]
macro_rules! impl_record_serialization {
	($ty:ident { $($field:ident),+ $(,)? }) => {
		impl $crate::serialization::SerializeBytes for $ty {
			fn serialize(
				&self,
				mut write_buf: impl $crate::bytes::BufMut,
			) -> Result<(), $crate::serialization::SerializationError> {
				$($crate::serialization::SerializeBytes::serialize(&self.$field, &mut write_buf)?;)+
				Ok(())
			}
		}

		impl $crate::serialization::DeserializeBytes for $ty {
			fn deserialize(
				mut read_buf: impl $crate::bytes::Buf,
			) -> Result<Self, $crate::serialization::SerializationError> {
				$(let $field = $crate::serialization::DeserializeBytes::deserialize(&mut read_buf)?;)+
				Ok(Self { $($field),+ })
			}
		}
	};
}

const CODE_NEG_INT8: u8 = 0xff;
const CODE_INT16: u8 = 0xfe;
const CODE_INT32: u8 = 0xfd;
const CODE_INT64: u8 = 0xfc;

/// Variable-length integer encoding compatible with OCaml's `bin_prot`.
///
/// Values in `0..0x80` take a single byte, everything else gets a one byte size code followed by
/// 1, 2, 4 or 8 little-endian bytes.
fn write_compact_int(n: i64, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
	let (code, size) = match n {
		0..0x80 => (None, 1),
		0x80..0x8000 => (Some(CODE_INT16), 2),
		0x8000..0x8000_0000 => (Some(CODE_INT32), 4),
		-0x80..0 => (Some(CODE_NEG_INT8), 1),
		-0x8000..-0x80 => (Some(CODE_INT16), 2),
		-0x8000_0000..-0x8000 => (Some(CODE_INT32), 4),
		_ => (Some(CODE_INT64), 8),
	};
	if let Some(code) = code {
		code.serialize(&mut write_buf)?;
	}
	assert_enough_space_for(&write_buf, size)?;
	write_buf.put_slice(&n.to_le_bytes()[..size]);
	Ok(())
}

fn read_compact_int(mut read_buf: impl Buf) -> Result<i64, SerializationError> {
	let code = u8::deserialize(&mut read_buf)?;
	if code < 0x80 {
		return Ok(code as i64);
	}
	let size = match code {
		CODE_NEG_INT8 => 1,
		CODE_INT16 => 2,
		CODE_INT32 => 4,
		CODE_INT64 => 8,
		_ => return Err(SerializationError::InvalidIntegerCode { code }),
	};
	assert_enough_data_for(&read_buf, size)?;
	let mut raw = [0u8; 8];
	read_buf.copy_to_slice(&mut raw[..size]);
	// Sign-extend from the highest bit of the last byte read.
	if raw[size - 1] & 0x80 != 0 {
		raw[size..].fill(0xff);
	}
	Ok(i64::from_le_bytes(raw))
}

/// A signed 32-bit integer in compact `bin_prot` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinInt32(pub i32);

/// A signed 64-bit integer in compact `bin_prot` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinInt64(pub i64);

/// An unsigned 32-bit integer, mapped onto the signed range and written compactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinUint32(pub u32);

/// An unsigned 64-bit integer, mapped onto the signed range and written compactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinUint64(pub u64);

impl SerializeBytes for BinInt32 {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		write_compact_int(self.0 as i64, write_buf)
	}
}

impl DeserializeBytes for BinInt32 {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		let value = read_compact_int(read_buf)?;
		i32::try_from(value).map(BinInt32).map_err(|_| SerializationError::IntegerOutOfRange {
			name: "int32",
			value,
		})
	}
}

impl SerializeBytes for BinInt64 {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		write_compact_int(self.0, write_buf)
	}
}

impl DeserializeBytes for BinInt64 {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		read_compact_int(read_buf).map(BinInt64)
	}
}

impl SerializeBytes for BinUint32 {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		BinInt32(self.0 as i32).serialize(write_buf)
	}
}

impl DeserializeBytes for BinUint32 {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		BinInt32::deserialize(read_buf).map(|BinInt32(value)| BinUint32(value as u32))
	}
}

impl SerializeBytes for BinUint64 {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		write_compact_int(self.0 as i64, write_buf)
	}
}

impl DeserializeBytes for BinUint64 {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		read_compact_int(read_buf).map(|value| BinUint64(value as u64))
	}
}

#[inline]
pub fn assert_enough_space_for(
	write_buf: &impl BufMut,
	size: usize,
) -> Result<(), SerializationError> {
	if write_buf.remaining_mut() < size {
		return Err(SerializationError::WriteBufferFull);
	}
	Ok(())
}

#[inline]
pub fn assert_enough_data_for(read_buf: &impl Buf, size: usize) -> Result<(), SerializationError> {
	if read_buf.remaining() < size {
		return Err(SerializationError::NotEnoughBytes);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use ark_bn254::Fr;
	use ark_ff::{AdditiveGroup, Field};
	use proptest::prelude::*;
	use rand::{Rng, SeedableRng, rngs::StdRng};

	use super::*;

	#[derive(Debug, Clone, PartialEq)]
	struct Point {
		x: u32,
		y: u64,
		label: String,
	}

	// Serialized as y, x, label on purpose.
	impl_record_serialization!(Point { y, x, label });

	#[derive(Debug, Clone, Copy, PartialEq)]
	enum Color {
		Red,
		Green,
		Blue,
	}

	const COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

	#[test]
	fn test_field_element_serialize_deserialize() {
		let mut rng = StdRng::seed_from_u64(0);
		let value = Fr::from_le_bytes_mod_order(&rng.random::<[u8; 32]>());

		let buf = serialize_to_vec(&value).unwrap();
		assert_eq!(buf.len(), 32);

		let value_deserialized = deserialize_exact::<Fr>(&buf).unwrap();
		assert_eq!(value_deserialized, value);
	}

	#[test]
	fn test_field_element_rejects_non_canonical() {
		let buf = [0xffu8; 32];
		assert_eq!(
			deserialize_exact::<Fr>(&buf),
			Err(SerializationError::InvalidConstruction { name: "Fp" })
		);
	}

	#[test]
	fn test_field_element_little_endian() {
		let buf = serialize_to_vec(&Fr::ONE).unwrap();
		assert_eq!(buf[0], 1);
		assert!(buf[1..].iter().all(|&b| b == 0));
	}

	#[test]
	fn test_record_uses_key_order() {
		let point = Point {
			x: 1,
			y: 2,
			label: "p".to_string(),
		};
		let buf = serialize_to_vec(&point).unwrap();
		assert_eq!(&buf[..8], &2u64.to_le_bytes());
		assert_eq!(&buf[8..12], &1u32.to_le_bytes());
		assert_eq!(deserialize_exact::<Point>(&buf).unwrap(), point);
	}

	#[test]
	fn test_tagged_enum() {
		let mut buf = Vec::new();
		serialize_tag(&Color::Blue, &COLORS, "Color", &mut buf).unwrap();
		assert_eq!(buf, vec![2]);
		assert_eq!(deserialize_tag(buf.as_slice(), &COLORS, "Color").unwrap(), Color::Blue);

		let err = deserialize_tag([7u8].as_slice(), &COLORS, "Color").unwrap_err();
		assert_eq!(
			err,
			SerializationError::UnknownEnumVariant {
				name: "Color",
				index: 7
			}
		);
	}

	#[test]
	fn test_versioned() {
		let mut buf = Vec::new();
		serialize_versioned(3, &42u32, &mut buf).unwrap();
		assert_eq!(buf[0], 3);
		assert_eq!(deserialize_versioned::<u32>(3, "u32", buf.as_slice()).unwrap(), 42);
		assert_eq!(
			deserialize_versioned::<u32>(4, "u32", buf.as_slice()),
			Err(SerializationError::VersionMismatch {
				name: "u32",
				expected: 4,
				actual: 3
			})
		);
	}

	#[test]
	fn test_trailing_bytes_rejected() {
		let mut buf = serialize_to_vec(&7u16).unwrap();
		buf.push(0);
		assert_eq!(
			deserialize_exact::<u16>(&buf),
			Err(SerializationError::TrailingBytes { remaining: 1 })
		);
	}

	#[test]
	fn test_not_enough_bytes() {
		assert_eq!(deserialize_exact::<u64>(&[1, 2, 3]), Err(SerializationError::NotEnoughBytes));
	}

	#[test]
	fn test_compact_int_layout() {
		assert_eq!(serialize_to_vec(&BinInt64(0x7f)).unwrap(), vec![0x7f]);
		assert_eq!(serialize_to_vec(&BinInt64(0x80)).unwrap(), vec![CODE_INT16, 0x80, 0x00]);
		assert_eq!(serialize_to_vec(&BinInt64(-1)).unwrap(), vec![CODE_NEG_INT8, 0xff]);
		assert_eq!(serialize_to_vec(&BinInt64(-0x81)).unwrap(), vec![CODE_INT16, 0x7f, 0xff]);
		assert_eq!(serialize_to_vec(&BinUint32(u32::MAX)).unwrap(), vec![CODE_NEG_INT8, 0xff]);
	}

	#[test]
	fn test_compact_int32_out_of_range() {
		let buf = serialize_to_vec(&BinInt64(i64::MAX)).unwrap();
		assert!(matches!(
			deserialize_exact::<BinInt32>(&buf),
			Err(SerializationError::IntegerOutOfRange { .. })
		));
	}

	#[test]
	fn test_option_and_tuple() {
		let value = (Some(5u8), None::<u32>, "abc".to_string());
		let buf = serialize_to_vec(&value).unwrap();
		assert_eq!(deserialize_exact::<(Option<u8>, Option<u32>, String)>(&buf).unwrap(), value);
	}

	proptest! {
		#[test]
		fn prop_compact_int64_round_trip(n in any::<i64>()) {
			let buf = serialize_to_vec(&BinInt64(n)).unwrap();
			prop_assert_eq!(deserialize_exact::<BinInt64>(&buf).unwrap(), BinInt64(n));
		}

		#[test]
		fn prop_compact_uint64_round_trip(n in any::<u64>()) {
			let buf = serialize_to_vec(&BinUint64(n)).unwrap();
			prop_assert_eq!(deserialize_exact::<BinUint64>(&buf).unwrap(), BinUint64(n));
		}

		#[test]
		fn prop_vec_round_trip(values in proptest::collection::vec(any::<u32>(), 0..32)) {
			let buf = serialize_to_vec(&values).unwrap();
			prop_assert_eq!(deserialize_exact::<Vec<u32>>(&buf).unwrap(), values);
		}
	}

	#[test]
	fn test_field_element_array() {
		let values = [Fr::ONE, Fr::ZERO, -Fr::ONE];
		let buf = serialize_to_vec(&values).unwrap();
		assert_eq!(buf.len(), 96);
		assert_eq!(deserialize_exact::<[Fr; 3]>(&buf).unwrap(), values);
	}
}
