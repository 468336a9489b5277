use serde::{Deserialize, Serialize};

/// Direction of a trade row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Non-trade cash events that feed the summary sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashCategory {
    InterestOnCash,
    LendingInterest,
    Deposit,
    Dividend,
    DividendManufacturedPayment,
    NewCardCost,
}

impl CashCategory {
    /// Summary order.
    pub const ALL: [CashCategory; 6] = [
        CashCategory::InterestOnCash,
        CashCategory::LendingInterest,
        CashCategory::Deposit,
        CashCategory::Dividend,
        CashCategory::DividendManufacturedPayment,
        CashCategory::NewCardCost,
    ];

    /// Action label exactly as the broker exports it.
    pub fn label(&self) -> &'static str {
        match self {
            CashCategory::InterestOnCash => "Interest on cash",
            CashCategory::LendingInterest => "Lending interest",
            CashCategory::Deposit => "Deposit",
            CashCategory::Dividend => "Dividend (Dividend)",
            CashCategory::DividendManufacturedPayment => "Dividend (Dividend manufactured payment)",
            CashCategory::NewCardCost => "New card cost",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// Classification of a raw action label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Trade(Side),
    Cash(CashCategory),
    Unrecognized,
}

impl Action {
    /// Cash labels match exactly; trade labels only need to contain
    /// "buy" or "sell" in any case.
    pub fn classify(label: &str) -> Self {
        if let Some(category) = CashCategory::from_label(label) {
            return Action::Cash(category);
        }
        let lower = label.to_lowercase();
        if lower.contains("buy") {
            Action::Trade(Side::Buy)
        } else if lower.contains("sell") {
            Action::Trade(Side::Sell)
        } else {
            Action::Unrecognized
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Action::Trade(side) => Some(*side),
            _ => None,
        }
    }
}

/// One row of the brokerage export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// 1-based data row number in the source file.
    pub row: usize,
    pub time: Option<String>,
    pub action: String,
    pub ticker: String,
    pub shares: f64,
    pub price_per_share: f64,
    pub total: f64,
    pub result: f64,
    pub currency_conversion_fee: f64,
}

impl TradeEvent {
    pub fn new(
        action: impl Into<String>,
        ticker: impl Into<String>,
        shares: f64,
        price_per_share: f64,
        total: f64,
    ) -> Self {
        Self {
            row: 0,
            time: None,
            action: action.into(),
            ticker: ticker.into(),
            shares,
            price_per_share,
            total,
            result: 0.0,
            currency_conversion_fee: 0.0,
        }
    }

    pub fn with_fee(mut self, currency_conversion_fee: f64) -> Self {
        self.currency_conversion_fee = currency_conversion_fee;
        self
    }

    pub fn with_result(mut self, result: f64) -> Self {
        self.result = result;
        self
    }

    pub fn kind(&self) -> Action {
        Action::classify(&self.action)
    }

    pub fn side(&self) -> Option<Side> {
        self.kind().side()
    }

    /// Label contains "buy" in any case.
    pub fn mentions_buy(&self) -> bool {
        self.action.to_lowercase().contains("buy")
    }
}
