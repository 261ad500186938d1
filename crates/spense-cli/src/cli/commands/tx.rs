//! Transaction and spending summary commands.

use anyhow::Result;
use spense_core::api::{ApiClient, NewTransaction};
use spense_core::session::SessionStore;

use super::require_login;

/// Submits a new transaction.
#[allow(clippy::too_many_arguments)]
pub async fn add(
    client: &ApiClient,
    store: &SessionStore,
    amount: f64,
    category_id: i64,
    note: String,
    date: Option<String>,
    vendor: Option<String>,
    income: bool,
) -> Result<()> {
    require_login(store)?;

    let transaction_type = if income { "income" } else { "expense" };
    let transaction = NewTransaction {
        amount,
        category_id,
        transaction_type: transaction_type.to_string(),
        note,
        date: date.unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        vendor,
    };

    let record = client.add_transaction(&transaction).await?;
    println!("Recorded {transaction_type} #{} (${:.2})", record.id, record.amount);
    Ok(())
}

/// Lists recent transactions.
pub async fn list(client: &ApiClient, store: &SessionStore, skip: i64, limit: i64) -> Result<()> {
    require_login(store)?;

    let transactions = client.get_transactions(skip, limit).await?;
    if transactions.is_empty() {
        println!("No transactions.");
        return Ok(());
    }

    for tx in transactions {
        println!(
            "#{:<6} {:>10.2}  {:<10} {}  {}",
            tx.id,
            tx.amount,
            tx.transaction_type.as_deref().unwrap_or("expense"),
            tx.date.as_deref().unwrap_or("-"),
            tx.note.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

/// Lists the available spending categories.
pub async fn categories(client: &ApiClient, store: &SessionStore) -> Result<()> {
    require_login(store)?;

    for category in client.get_categories().await? {
        println!(
            "#{:<4} {:<20} {}",
            category.id,
            category.name,
            category.color.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Prints the categorized spending summary.
pub async fn summary(client: &ApiClient, store: &SessionStore) -> Result<()> {
    require_login(store)?;

    let summary = client.get_spending_summary().await?;
    println!("Total spend: ${:.2}", summary.total_spend);

    for breakdown in summary.category_breakdown {
        println!(
            "  {:<20} ${:>10.2}  {:>5.1}%",
            breakdown.category_name, breakdown.total_amount, breakdown.percentage
        );
    }
    Ok(())
}
