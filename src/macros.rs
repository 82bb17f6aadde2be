/// Builds a [`Row`](crate::core::Row) from a key and `document => payload` columns.
///
/// ```
/// use range_term_index::store_row;
///
/// let row = store_row!(b"wiki\0body\0apple".to_vec(); "doc-1" => "3,7", "doc-2" => "1");
/// assert_eq!(row.columns.len(), 2);
/// let tombstone = store_row!(b"wiki\0body\0pear".to_vec());
/// assert!(tombstone.is_tombstone());
/// ```
#[macro_export]
macro_rules! store_row(
    ($key:expr) => {
        {
            $crate::core::Row::new($key, vec![])
        }
    };
    ($key:expr; $($document:expr => $payload:expr),*) => {
        {
            let mut columns = vec![];
            $(
                columns.push($crate::core::Column::new($document, $payload));
            )*
            $crate::core::Row::new($key, columns)
        }
    };
    // if there is a trailing comma retry with the trailing comma stripped.
    ($key:expr; $($document:expr => $payload:expr),+ ,) => {
        $crate::store_row!( $key; $( $document => $payload ), *)
    };
);
