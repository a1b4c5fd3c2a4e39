use serde::Deserialize;
use std::path::Path;

use crate::core::RiskError;

/// One prediction request: identity plus the financial ratios the
/// classifier consumes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanyInput {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "CompanyName", default)]
    pub company_name: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<f64>,
    #[serde(rename = "netProfitMargin", default)]
    pub net_profit_margin: Option<f64>,
    #[serde(rename = "returnOnAssets", default)]
    pub return_on_assets: Option<f64>,
    #[serde(rename = "debtRatio", default)]
    pub debt_ratio: Option<f64>,
    #[serde(rename = "freeCashFlowOperatingCashFlowRatio", default)]
    pub fcf_to_ocf_ratio: Option<f64>,
    #[serde(rename = "freeCashFlowPerShare", default)]
    pub fcf_per_share: Option<f64>,
    #[serde(rename = "operatingCashFlowSalesRatio", default)]
    pub ocf_to_sales_ratio: Option<f64>,
}

/// Numeric inputs in the column order used by the classifier artifact.
pub const NUMERIC_COLUMNS: [&str; 7] = [
    "Year",
    "netProfitMargin",
    "returnOnAssets",
    "debtRatio",
    "freeCashFlowOperatingCashFlowRatio",
    "freeCashFlowPerShare",
    "operatingCashFlowSalesRatio",
];

impl CompanyInput {
    /// Reads and validates a JSON request file.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Io`] if the file cannot be read, [`RiskError::Json`]
    /// if it is not a valid request, and [`RiskError::InvalidInput`] if the
    /// symbol is blank.
    pub fn from_path(path: &Path) -> Result<Self, RiskError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses and validates a JSON request.
    ///
    /// # Errors
    ///
    /// See [`from_path`](Self::from_path).
    pub fn from_json(raw: &str) -> Result<Self, RiskError> {
        let input: Self = serde_json::from_str(raw)?;
        if input.symbol.trim().is_empty() {
            return Err(RiskError::InvalidInput("Symbol must not be empty".into()));
        }
        Ok(input)
    }

    /// Name searched for in news headlines: the company name, or the sector
    /// when no name was supplied.
    #[must_use]
    pub fn search_name(&self) -> &str {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.sector)
    }

    /// Value of a numeric column; `None` when absent or not finite.
    #[must_use]
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let v = match column {
            "Year" => self.year,
            "netProfitMargin" => self.net_profit_margin,
            "returnOnAssets" => self.return_on_assets,
            "debtRatio" => self.debt_ratio,
            "freeCashFlowOperatingCashFlowRatio" => self.fcf_to_ocf_ratio,
            "freeCashFlowPerShare" => self.fcf_per_share,
            "operatingCashFlowSalesRatio" => self.ocf_to_sales_ratio,
            _ => None,
        };
        v.filter(|x| x.is_finite())
    }

    /// Value of a categorical column.
    #[must_use]
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "Symbol" => Some(&self.symbol),
            "Sector" => Some(&self.sector),
            "CompanyName" => self.company_name.as_deref(),
            _ => None,
        }
    }
}
