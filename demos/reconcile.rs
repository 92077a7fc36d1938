//! Reconcile a small scraped import against two certified balances

use reconciliation_core::{ReconciliationConfig, ReconciliationRequest, ReconciliationService};
use tracing_subscriber::EnvFilter;

const PAYLOAD: &str = r#"{
    "movements": [
        { "id": 1, "date": "2025-03-01", "wording": "Dépôt espèces", "amount": 500 },
        { "id": 2, "date": "2025-03-05", "wording": "CARTE  Boulangerie", "amount": -12.4 },
        { "id": 2, "date": "2025-03-05", "wording": "carte boulangerie", "amount": -12.4 },
        { "id": 3, "date": "2025-04-02", "wording": "Abonnement téléphone", "amount": -19.99 }
    ],
    "balances": [
        { "date": "2025-02-28", "balance": 1500 },
        { "date": "2025-03-31", "balance": 1987.6 },
        { "date": "2025-04-30", "balance": 1967.61 }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ReconciliationConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    println!("🏦 Reconciliation Core - Statement check\n");

    let service = ReconciliationService::new(config);
    let request = ReconciliationRequest::from_json(PAYLOAD)?;
    let response = service.validate(&request)?;

    for reason in &response.reasons {
        println!(
            "  {} → {}: {}",
            reason.period.start_date, reason.period.end_date, reason.message
        );
        if let Some(summary) = &reason.summary {
            println!("    {summary}");
        }
    }

    println!("\nValid: {}", response.is_valid);
    println!("\n{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
