mod delimited_key_codec;

pub use delimited_key_codec::{DelimitedKeyCodec, KeyCodec};
