use crate::common::constants::{FIELD_END_MARKER, KEY_DELIMITER};
use crate::common::errors::TermIndexError;
use crate::core::Term;
use crate::RowKey;

/// Maps `(index, field, text)` onto store row keys and back.
pub trait KeyCodec: Send + Sync {
    /// Row key of one term inside an index.
    fn encode_key(&self, index_name: &str, term: &Term) -> crate::Result<RowKey>;

    /// Key sorting after every term key of `field` and before the next field.
    fn encode_field_boundary_key(&self, index_name: &str, field: &str) -> crate::Result<RowKey>;

    /// Recover the term of a row key, dropping the index prefix.
    fn decode_key(&self, key: &[u8]) -> crate::Result<Term>;
}

/// `index 0x00 field 0x00 text`, all UTF-8.
///
/// The field boundary key ends in `0xFF`, a byte UTF-8 never produces, so it
/// closes the field's range without colliding with any term.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedKeyCodec;

impl DelimitedKeyCodec {
    fn check_name(kind: &str, name: &str) -> crate::Result<()> {
        if name.as_bytes().contains(&KEY_DELIMITER) {
            return Err(TermIndexError::InvalidArgument(format!("{} name '{}' contains the key delimiter", kind, name.escape_debug())));
        }
        Ok(())
    }

    fn field_prefix(index_name: &str, field: &str) -> crate::Result<RowKey> {
        Self::check_name("index", index_name)?;
        Self::check_name("field", field)?;
        let mut key = Vec::with_capacity(index_name.len() + field.len() + 2);
        key.extend_from_slice(index_name.as_bytes());
        key.push(KEY_DELIMITER);
        key.extend_from_slice(field.as_bytes());
        key.push(KEY_DELIMITER);
        Ok(key)
    }
}

impl KeyCodec for DelimitedKeyCodec {
    fn encode_key(&self, index_name: &str, term: &Term) -> crate::Result<RowKey> {
        let mut key = Self::field_prefix(index_name, term.field())?;
        key.extend_from_slice(term.text().as_bytes());
        Ok(key)
    }

    fn encode_field_boundary_key(&self, index_name: &str, field: &str) -> crate::Result<RowKey> {
        let mut key = Self::field_prefix(index_name, field)?;
        key.push(FIELD_END_MARKER);
        Ok(key)
    }

    fn decode_key(&self, key: &[u8]) -> crate::Result<Term> {
        let mut parts = key.splitn(3, |b| *b == KEY_DELIMITER);
        let (Some(_index), Some(field), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TermIndexError::KeyCodec(format!("row key {:?} has no field delimiter", String::from_utf8_lossy(key))));
        };
        let field = std::str::from_utf8(field).map_err(|e| TermIndexError::KeyCodec(format!("field is not utf-8: {}", e)))?;
        let text = std::str::from_utf8(text).map_err(|e| TermIndexError::KeyCodec(format!("term text is not utf-8: {}", e)))?;
        Ok(Term::new(field, text))
    }
}

#[cfg(test)]
mod tests {
    use super::{DelimitedKeyCodec, KeyCodec};
    use crate::core::Term;

    #[test]
    fn test_encode_decode() {
        let codec = DelimitedKeyCodec;
        let term = Term::new("body", "wiki");
        let key = codec.encode_key("wikipedia", &term).expect("encode");
        assert_eq!(key, b"wikipedia\0body\0wiki".to_vec());
        assert_eq!(codec.decode_key(&key).expect("decode"), term);

        // Text may itself contain the delimiter byte.
        let odd = Term::new("body", "a\0b");
        let key = codec.encode_key("idx", &odd).expect("encode");
        assert_eq!(codec.decode_key(&key).expect("decode"), odd);
    }

    #[test]
    fn test_boundary_key_closes_field() {
        let codec = DelimitedKeyCodec;
        let boundary = codec.encode_field_boundary_key("idx", "body").expect("boundary");
        for text in ["", "apple", "\u{10FFFF}\u{10FFFF}", "zzzz"] {
            let key = codec.encode_key("idx", &Term::new("body", text)).expect("encode");
            assert!(key < boundary, "{:?} should sort before the boundary", text);
        }
        let next_field = codec.encode_key("idx", &Term::new("bodz", "")).expect("encode");
        assert!(boundary < next_field);
    }

    #[test]
    fn test_key_order_matches_term_order() {
        let codec = DelimitedKeyCodec;
        let mut terms = vec![Term::new("title", "a"), Term::new("body", "b"), Term::new("body", "ab"), Term::new("bod", "z")];
        let mut keys: Vec<Vec<u8>> = terms.iter().map(|t| codec.encode_key("idx", t).expect("encode")).collect();
        terms.sort();
        keys.sort();
        let decoded: Vec<Term> = keys.iter().map(|k| codec.decode_key(k).expect("decode")).collect();
        assert_eq!(decoded, terms);
    }

    #[test]
    fn test_rejects_delimiter_in_names() {
        let codec = DelimitedKeyCodec;
        assert!(codec.encode_key("idx", &Term::new("bo\0dy", "x")).is_err());
        assert!(codec.encode_field_boundary_key("i\0dx", "body").is_err());
        assert!(codec.decode_key(b"no-delimiter").is_err());
    }
}
