/// Reader-local document number, assigned in first-observed order.
pub type DocId = u32;

/// Raw store row key.
pub type RowKey = Vec<u8>;
