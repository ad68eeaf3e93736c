//! Tracked market state.

use super::Coin;
use serde::{Deserialize, Serialize};

/// A chart reference in `EXCHANGE:PAIR|INTERVAL` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSymbol {
    pub exchange: String,
    pub pair: String,
    pub interval: String,
}

impl ChartSymbol {
    /// Parse `EXCHANGE:PAIR|INTERVAL`. The interval defaults to `1D`.
    pub fn parse(s: &str) -> Option<Self> {
        let (symbol, interval) = match s.split_once('|') {
            Some((symbol, interval)) => (symbol, interval),
            None => (s, "1D"),
        };
        let (exchange, pair) = symbol.split_once(':')?;
        if exchange.is_empty() || pair.is_empty() || interval.is_empty() {
            return None;
        }
        Some(Self {
            exchange: exchange.to_string(),
            pair: pair.to_string(),
            interval: interval.to_string(),
        })
    }

    /// Link to the interactive chart.
    pub fn chart_url(&self) -> String {
        format!(
            "https://www.tradingview.com/chart/?symbol={}:{}&interval={}",
            self.exchange, self.pair, self.interval
        )
    }
}

impl std::fmt::Display for ChartSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.exchange, self.pair)
    }
}

/// An asset shown on the markets view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedAsset {
    pub coin: Coin,
    pub chart: ChartSymbol,
}

/// State for the markets view.
#[derive(Debug)]
pub struct MarketState {
    pub assets: Vec<TrackedAsset>,
    /// Currently selected asset index.
    pub selected_index: Option<usize>,
}

impl Default for MarketState {
    fn default() -> Self {
        let charts = [
            (Coin::Bitcoin, "COINBASE:BTCUSD|1D"),
            (Coin::Ethereum, "FOREXCOM:ETHUSD|1D"),
            (Coin::Solana, "TRADENATION:SOLANA|1D"),
            (Coin::Xrp, "COINBASE:XRPUSD|1D"),
        ];

        let assets = charts
            .into_iter()
            .filter_map(|(coin, symbol)| {
                ChartSymbol::parse(symbol).map(|chart| TrackedAsset { coin, chart })
            })
            .collect();

        Self {
            assets,
            selected_index: Some(0),
        }
    }
}

impl MarketState {
    /// Get the currently selected asset.
    pub fn selected_asset(&self) -> Option<&TrackedAsset> {
        self.selected_index.and_then(|i| self.assets.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_chart_symbol() {
        let chart = ChartSymbol::parse("COINBASE:BTCUSD|1D").unwrap();
        assert_eq!(chart.exchange, "COINBASE");
        assert_eq!(chart.pair, "BTCUSD");
        assert_eq!(chart.interval, "1D");
        assert_eq!(chart.to_string(), "COINBASE:BTCUSD");
    }

    #[test]
    fn test_parse_defaults_interval() {
        let chart = ChartSymbol::parse("COINBASE:XRPUSD").unwrap();
        assert_eq!(chart.interval, "1D");
        assert!(ChartSymbol::parse("BTCUSD").is_none());
        assert!(ChartSymbol::parse(":BTCUSD").is_none());
    }

    #[test]
    fn test_default_tracks_every_coin() {
        let state = MarketState::default();
        let coins: Vec<Coin> = state.assets.iter().map(|a| a.coin).collect();
        assert_eq!(coins, Coin::ALL.to_vec());
    }
}
