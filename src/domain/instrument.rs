use serde::{Deserialize, Serialize};

/// A symbol on a named data connection, e.g. `$UVOL` on `dxFeed`.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct InstrumentId {
    pub symbol: String,
    pub connection: String,
}

impl InstrumentId {
    pub fn new(symbol: impl Into<String>, connection: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            connection: connection.into(),
        }
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.connection)
    }
}

/// A resolved instrument, handed out by a market-data provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolHandle {
    pub id: InstrumentId,
    /// Provider-side key of the resolved instrument
    pub key: usize,
}
