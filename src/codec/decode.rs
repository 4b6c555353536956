use std::collections::HashMap;
use std::sync::LazyLock;

use crate::catalog::WireColumnType;
use crate::error::SqlAdapterError;
use crate::types::RowValues;

/// Per-type hook the remote client runs on a raw cell before building the row.
pub type ColumnDecoder = fn(&str) -> Result<RowValues, SqlAdapterError>;

/// Decoders keyed by wire type. Types without an entry pass through untouched.
#[derive(Debug, Clone, Default)]
pub struct DecoderMap {
    decoders: HashMap<WireColumnType, ColumnDecoder>,
}

static BINARY_DECODERS: LazyLock<DecoderMap> = LazyLock::new(|| {
    let mut map = DecoderMap::default();
    for ty in WireColumnType::ALL.into_iter().filter(|ty| ty.is_binary()) {
        map.register(ty, decode_binary);
    }
    map
});

impl DecoderMap {
    /// The decoders the adapter sends with every statement: hex text to bytes for
    /// `BINARY`, `VARBINARY`, the blob sizes and `BIT`.
    #[must_use]
    pub fn binary() -> &'static DecoderMap {
        &BINARY_DECODERS
    }

    pub fn register(&mut self, ty: WireColumnType, decoder: ColumnDecoder) {
        self.decoders.insert(ty, decoder);
    }

    #[must_use]
    pub fn get(&self, ty: WireColumnType) -> Option<ColumnDecoder> {
        self.decoders.get(&ty).copied()
    }

    /// Run the decoder registered for `ty`, or `None` when the type has none.
    #[must_use]
    pub fn decode(&self, ty: WireColumnType, raw: &str) -> Option<Result<RowValues, SqlAdapterError>> {
        self.get(ty).map(|decoder| decoder(raw))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

fn decode_binary(raw: &str) -> Result<RowValues, SqlAdapterError> {
    hex_to_bytes(raw).map(RowValues::Blob)
}

/// Decode hex text, two characters per byte.
///
/// Odd-length input is rejected rather than dropping the trailing nibble.
///
/// # Errors
/// Returns `SqlAdapterError::DecodeError` for odd-length input or non-hex characters.
pub fn hex_to_bytes(raw: &str) -> Result<Vec<u8>, SqlAdapterError> {
    hex::decode(raw).map_err(|e| {
        SqlAdapterError::DecodeError(format!("invalid hex value (length {}): {e}", raw.len()))
    })
}
