//! Wallet balance models.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Balance for a single currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Currency unit, lowercase (e.g. `"btc"`).
    pub currency: String,
    pub balance: Decimal,
}

/// Per-currency balance store.
///
/// The swap form only ever reads from this; a currency without a wallet
/// reads as zero available.
#[derive(Debug, Clone, Default)]
pub struct Balances {
    by_currency: HashMap<String, Decimal>,
}

impl Balances {
    /// Creates an empty balance store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store with a full snapshot.
    pub fn replace(&mut self, snapshot: Vec<Balance>) {
        self.by_currency = snapshot
            .into_iter()
            .map(|b| (b.currency.to_lowercase(), b.balance))
            .collect();
    }

    /// Sets the balance for a single currency.
    pub fn set(&mut self, currency: &str, balance: Decimal) {
        self.by_currency.insert(currency.to_lowercase(), balance);
    }

    /// Returns the available balance for a currency, zero when unknown.
    pub fn available(&self, currency: &str) -> Decimal {
        self.by_currency
            .get(&currency.to_lowercase())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_wallet_reads_as_zero() {
        let balances = Balances::new();
        assert_eq!(balances.available("btc"), Decimal::ZERO);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut balances = Balances::new();
        balances.set("BTC", dec!(1.5));
        assert_eq!(balances.available("btc"), dec!(1.5));
        assert_eq!(balances.available("Btc"), dec!(1.5));
    }

    #[test]
    fn snapshot_replaces_previous_state() {
        let mut balances = Balances::new();
        balances.set("btc", dec!(1));
        balances.replace(vec![Balance {
            currency: "usd".to_string(),
            balance: dec!(1000),
        }]);
        assert_eq!(balances.available("btc"), Decimal::ZERO);
        assert_eq!(balances.available("usd"), dec!(1000));
    }
}
