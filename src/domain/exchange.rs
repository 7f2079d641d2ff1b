use serde::{Deserialize, Serialize};

use crate::config::BREADTH;
use crate::config::breadth::ExchangeSymbols;

/// An exchange whose breadth is tracked through an up/down volume index pair.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter,
)]
pub enum Exchange {
    Nyse,
    Nasdaq,
}

impl Exchange {
    pub fn label(&self) -> &'static str {
        match self {
            Exchange::Nyse => "NYSE",
            Exchange::Nasdaq => "NASDAQ",
        }
    }

    pub fn symbols(&self) -> &'static ExchangeSymbols {
        match self {
            Exchange::Nyse => &BREADTH.nyse,
            Exchange::Nasdaq => &BREADTH.nasdaq,
        }
    }

    pub fn up_symbol(&self) -> &'static str {
        self.symbols().up
    }

    pub fn down_symbol(&self) -> &'static str {
        self.symbols().down
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_exchange_has_distinct_symbols() {
        let mut seen = Vec::new();
        for exchange in Exchange::iter() {
            assert_ne!(exchange.up_symbol(), exchange.down_symbol());
            seen.push(exchange.up_symbol());
            seen.push(exchange.down_symbol());
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn nyse_uses_uvol_dvol() {
        assert_eq!(Exchange::Nyse.up_symbol(), "$UVOL");
        assert_eq!(Exchange::Nyse.down_symbol(), "$DVOL");
        assert_eq!(Exchange::Nyse.to_string(), "NYSE");
    }
}
