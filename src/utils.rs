use bytes_parser::BytesParser;

use crate::errors::{
    Field,
    GroupMetadataError::{self, ByteParsingError, MalformedCount, MalformedLength, TruncatedInput},
};

/// Fails with [`GroupMetadataError::TruncatedInput`] if fewer than `needed` bytes are left in `parser`.
pub(crate) fn ensure_remaining(parser: &BytesParser, field: Field, needed: usize) -> Result<(), GroupMetadataError> {
    let remaining = parser.parseable();
    if remaining < needed {
        return Err(TruncatedInput {
            field,
            needed,
            remaining,
        });
    }

    Ok(())
}

/// Adapter for [`BytesParser::parse_i16`].
///
/// # Arguments
///
/// * `parser` - A [`BytesParser`] with its internal cursor pointing
///     at the beginning of the [`i16`] we want to parse.
/// * `field` - The [`Field`] reported if there are not enough bytes.
pub(crate) fn parse_i16(parser: &mut BytesParser, field: Field) -> Result<i16, GroupMetadataError> {
    ensure_remaining(parser, field, 2)?;
    parser.parse_i16().map_err(ByteParsingError)
}

/// Adapter for [`BytesParser::parse_i32`].
///
/// # Arguments
///
/// * `parser` - A [`BytesParser`] with its internal cursor pointing
///     at the beginning of the [`i32`] we want to parse.
/// * `field` - The [`Field`] reported if there are not enough bytes.
pub(crate) fn parse_i32(parser: &mut BytesParser, field: Field) -> Result<i32, GroupMetadataError> {
    ensure_remaining(parser, field, 4)?;
    parser.parse_i32().map_err(ByteParsingError)
}

/// A [`String`] parser, tailor-made for `__consumer_offsets` messages.
///
/// Strings are an `i16` length, followed by that many bytes. Only the byte count is validated:
/// invalid UTF-8 sequences are replaced, not rejected.
///
/// Returns [`GroupMetadataError::MalformedLength`] if the parsed `i16` contains a negative value.
///
/// # Arguments
///
/// * `parser` - A [`BytesParser`] with its internal cursor pointing
///     at the beginning of the [`&str`] we want to parse.
/// * `field` - The [`Field`] this string is decoded into.
pub(crate) fn parse_str(parser: &mut BytesParser, field: Field) -> Result<String, GroupMetadataError> {
    let strlen = parse_i16(parser, field)?;
    if strlen < 0 {
        return Err(MalformedLength {
            field,
            length: strlen.into(),
        });
    }
    if strlen == 0 {
        return Ok(String::default());
    }

    let strlen = strlen as usize;
    ensure_remaining(parser, field, strlen)?;
    let bytes = parser.parse_slice(strlen).map_err(ByteParsingError)?;

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Parses the `i32` count of an array, whose elements take at least `min_element_size` bytes each.
///
/// A negative count is a [`GroupMetadataError::MalformedCount`]; a count that can't possibly fit
/// in the bytes left is a [`GroupMetadataError::TruncatedInput`].
pub(crate) fn parse_count(
    parser: &mut BytesParser,
    field: Field,
    min_element_size: usize,
) -> Result<usize, GroupMetadataError> {
    let count = parse_i32(parser, field)?;
    if count < 0 {
        return Err(MalformedCount { field, count });
    }

    let count = count as usize;
    ensure_remaining(parser, field, count.saturating_mul(min_element_size))?;

    Ok(count)
}

/// Parses the `i32` length of an opaque bytes region.
///
/// `-1` is how Kafka encodes _null_ bytes, and it's handled as an empty region.
pub(crate) fn parse_bytes_len(parser: &mut BytesParser, field: Field) -> Result<usize, GroupMetadataError> {
    match parse_i32(parser, field)? {
        -1 => Ok(0),
        length if length < 0 => Err(MalformedLength { field, length }),
        length => Ok(length as usize),
    }
}

/// Moves the cursor of `parser` past `len` bytes, without interpreting them.
pub(crate) fn skip_bytes(parser: &mut BytesParser, field: Field, len: usize) -> Result<(), GroupMetadataError> {
    if len == 0 {
        return Ok(());
    }

    ensure_remaining(parser, field, len)?;
    parser.parse_slice(len).map(|_| ()).map_err(ByteParsingError)
}

/// Carves the next `len` bytes of `parser` into a parser of their own.
///
/// The cursor of `parser` moves past the carved region.
pub(crate) fn carve_bytes<'p>(
    parser: &'p mut BytesParser<'_>,
    field: Field,
    len: usize,
) -> Result<BytesParser<'p>, GroupMetadataError> {
    ensure_remaining(parser, field, len)?;
    parser.from_slice(len).map_err(ByteParsingError)
}

/// Used in unit tests to verify type is Thread Safe and Async/Await Safe.
///
/// It enforces that the given type implements the following standard traits:
///
/// * `std::marker::Sized`: type has a constant size known at compile time
/// * `std::marker::Send`: type is safe to send to another thread
/// * `std::marker::Sync`: type is Sync if it is safe to share between threads;
///   type can be Sync if and only if a reference to it is Send
/// * `std::marker::Unpin`: type can be safely moved after pinning
#[cfg(test)]
pub(crate) fn is_thread_safe<T: Sized + Send + Sync + Unpin>() {}

#[cfg(test)]
mod tests {
    use bytes_parser::BytesParser;
    use rstest::rstest;

    use super::*;

    #[test]
    fn parses_big_endian_integers() {
        let bytes = [0xFF, 0xFE, 0x00, 0x00, 0x75, 0x30];
        let mut parser = BytesParser::from(&bytes[..]);

        assert_eq!(parse_i16(&mut parser, Field::KeyVersion), Ok(-2));
        assert_eq!(parse_i32(&mut parser, Field::SessionTimeout), Ok(30000));
        assert_eq!(parser.parseable(), 0);
    }

    #[rstest]
    #[case(&[], 2, 0)]
    #[case(&[0x00], 2, 1)]
    fn truncated_i16(#[case] bytes: &[u8], #[case] needed: usize, #[case] remaining: usize) {
        let mut parser = BytesParser::from(bytes);

        assert_eq!(
            parse_i16(&mut parser, Field::ConsumerProtocolVersion),
            Err(TruncatedInput {
                field: Field::ConsumerProtocolVersion,
                needed,
                remaining,
            })
        );
    }

    #[test]
    fn parses_strings() {
        let bytes = [0x00, 0x02, b'g', b'1', 0x00, 0x00, 0xAA];
        let mut parser = BytesParser::from(&bytes[..]);

        assert_eq!(parse_str(&mut parser, Field::Group).as_deref(), Ok("g1"));
        assert_eq!(parse_str(&mut parser, Field::Leader).as_deref(), Ok(""));
        assert_eq!(parser.parseable(), 1);
    }

    #[test]
    fn string_shorter_than_declared() {
        let bytes = [0x00, 0x05, b'a', b'b'];
        let mut parser = BytesParser::from(&bytes[..]);

        assert_eq!(
            parse_str(&mut parser, Field::ClientHost),
            Err(TruncatedInput {
                field: Field::ClientHost,
                needed: 5,
                remaining: 2,
            })
        );
    }

    #[test]
    fn negative_string_length() {
        let bytes = [0xFF, 0xFF, b'a'];
        let mut parser = BytesParser::from(&bytes[..]);

        assert_eq!(
            parse_str(&mut parser, Field::Leader),
            Err(MalformedLength {
                field: Field::Leader,
                length: -1,
            })
        );
    }

    #[rstest]
    #[case(&[0xFF, 0xFF, 0xFF, 0xFF], Ok(0))]
    #[case(&[0x00, 0x00, 0x00, 0x03], Ok(3))]
    #[case(&[0xFF, 0xFF, 0xFF, 0xFE], Err(MalformedLength { field: Field::UserBytes, length: -2 }))]
    fn bytes_lengths(#[case] bytes: &[u8], #[case] expected: Result<usize, GroupMetadataError>) {
        let mut parser = BytesParser::from(bytes);

        assert_eq!(parse_bytes_len(&mut parser, Field::UserBytes), expected);
    }

    #[rstest]
    #[case(&[0x00, 0x00, 0x00, 0x00], Ok(0))]
    #[case(&[0x00, 0x00, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD], Ok(1))]
    #[case(&[0xFF, 0xFF, 0xFF, 0xFF], Err(MalformedCount { field: Field::MemberCount, count: -1 }))]
    #[case(&[0x7F, 0xFF, 0xFF, 0xFF, 0x00], Err(TruncatedInput { field: Field::MemberCount, needed: 0x7FFF_FFFF * 4, remaining: 1 }))]
    fn counts(#[case] bytes: &[u8], #[case] expected: Result<usize, GroupMetadataError>) {
        let mut parser = BytesParser::from(bytes);

        assert_eq!(parse_count(&mut parser, Field::MemberCount, 4), expected);
    }

    #[test]
    fn skips_exactly_the_declared_bytes() {
        let bytes = [0xDE, 0xAD, 0xBE, 0x00, 0x07];
        let mut parser = BytesParser::from(&bytes[..]);

        skip_bytes(&mut parser, Field::SubscriptionBytes, 0).unwrap();
        skip_bytes(&mut parser, Field::SubscriptionBytes, 3).unwrap();
        assert_eq!(parse_i16(&mut parser, Field::SessionTimeout), Ok(7));
    }

    #[test]
    fn skip_past_the_end() {
        let bytes = [0xDE, 0xAD];
        let mut parser = BytesParser::from(&bytes[..]);

        assert_eq!(
            skip_bytes(&mut parser, Field::UserBytes, 3),
            Err(TruncatedInput {
                field: Field::UserBytes,
                needed: 3,
                remaining: 2,
            })
        );
    }

    #[test]
    fn carved_region_is_isolated() {
        let bytes = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let mut parser = BytesParser::from(&bytes[..]);

        {
            let mut region = carve_bytes(&mut parser, Field::AssignmentBytes, 4).unwrap();
            assert_eq!(parse_i16(&mut region, Field::ConsumerProtocolVersion), Ok(1));
            assert_eq!(parse_i16(&mut region, Field::ConsumerProtocolVersion), Ok(2));
            assert!(parse_i16(&mut region, Field::ConsumerProtocolVersion).is_err());
        }

        assert_eq!(parse_i16(&mut parser, Field::SessionTimeout), Ok(3));
    }
}
