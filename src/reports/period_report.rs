//! Period analysis and overall stats reports

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::LedgerResult;
use crate::models::{AnalysisPeriod, Money, UserId};
use crate::services::{
    AnalysisService, BucketTotals, CurrencyNormalizer, PeriodAnalysis, PeriodTotals, RateTable,
};
use crate::storage::Storage;

/// Analysis of one look-back period
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub user_id: UserId,
    pub base_currency: String,
    #[serde(flatten)]
    pub analysis: PeriodAnalysis,
}

impl PeriodReport {
    pub fn generate(
        storage: &Storage,
        rates: &RateTable,
        user_id: &UserId,
        period: AnalysisPeriod,
        now: NaiveDateTime,
    ) -> LedgerResult<Self> {
        let service = AnalysisService::new(storage, CurrencyNormalizer::new(rates));
        Ok(Self {
            user_id: user_id.clone(),
            base_currency: rates.base().to_string(),
            analysis: service.analyze(user_id, period, now)?,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let analysis = &self.analysis;
        let breakdown = &analysis.breakdown;
        let totals = &breakdown.totals;
        let mut output = String::new();

        let since = analysis
            .since
            .map(|s| s.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "the beginning".to_string());
        output.push_str(&format!(
            "Analysis ({}): {} to {} ({})\n",
            analysis.period,
            since,
            analysis.until.format("%Y-%m-%d %H:%M"),
            self.base_currency
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Income:  {} ({} transactions)\n",
            totals.income.format_with_symbol(symbol),
            totals.income_count
        ));
        output.push_str(&format!(
            "Expense: {} ({} transactions)\n",
            totals.expense.format_with_symbol(symbol),
            totals.expense_count
        ));
        output.push_str(&format!(
            "Balance: {}\n",
            analysis.balance.format_with_symbol(symbol)
        ));
        output.push_str(&format!(
            "Average daily expense: {}\n",
            analysis.average_daily_expense.format_with_symbol(symbol)
        ));

        if totals.transaction_count() == 0 {
            output.push_str("\nNo transactions in this period.\n");
            return output;
        }

        section(&mut output, "By day", breakdown.days(), symbol);
        section(
            &mut output,
            "By payment method",
            breakdown
                .by_payment_method
                .iter()
                .map(|(name, totals)| (name.clone(), *totals)),
            symbol,
        );
        section(
            &mut output,
            "By category",
            breakdown
                .categories_by_expense()
                .into_iter()
                .map(|(name, totals)| (name.to_string(), totals)),
            symbol,
        );

        output
    }
}

fn section<I>(output: &mut String, title: &str, rows: I, symbol: &str)
where
    I: IntoIterator<Item = (String, BucketTotals)>,
{
    output.push_str(&format!("\n{}\n", title));
    output.push_str(&format!("{:<24} {:>12} {:>12}\n", "", "Income", "Expense"));
    output.push_str(&"-".repeat(50));
    output.push('\n');
    for (label, totals) in rows {
        output.push_str(&format!(
            "{:<24} {:>12} {:>12}\n",
            label,
            totals.income.format_with_symbol(symbol),
            totals.expense.format_with_symbol(symbol)
        ));
    }
}

/// All-time totals for a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub user_id: UserId,
    pub base_currency: String,
    pub total_income: Money,
    pub total_expense: Money,
    pub balance: Money,
    pub income_count: usize,
    pub expense_count: usize,
}

impl StatsReport {
    pub fn generate(storage: &Storage, rates: &RateTable, user_id: &UserId) -> LedgerResult<Self> {
        let service = AnalysisService::new(storage, CurrencyNormalizer::new(rates));
        let totals: PeriodTotals = service.overall_stats(user_id)?;

        Ok(Self {
            user_id: user_id.clone(),
            base_currency: rates.base().to_string(),
            total_income: totals.income.rounded(),
            total_expense: totals.expense.rounded(),
            balance: totals.balance()?.rounded(),
            income_count: totals.income_count,
            expense_count: totals.expense_count,
        })
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        format!(
            "Overall stats for {} ({})\n\
             Total income:  {} ({} transactions)\n\
             Total expense: {} ({} transactions)\n\
             Balance:       {}\n",
            self.user_id,
            self.base_currency,
            self.total_income.format_with_symbol(symbol),
            self.income_count,
            self.total_expense.format_with_symbol(symbol),
            self.expense_count,
            self.balance.format_with_symbol(symbol),
        )
    }
}
