use super::ui;
use crate::core::domain::{Domain, DomainPatch, expiring_domains};
use crate::core::state::Tracker;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

#[derive(Debug, Clone, PartialEq)]
pub enum DomainsCommand {
    List,
    Expiring,
    Add {
        name: String,
        provider: String,
        expiry_date: NaiveDate,
        renewal_cost: String,
        auto_renewal: bool,
    },
    Edit {
        id: String,
        patch: DomainPatch,
    },
    Remove {
        id: String,
    },
}

pub fn display_domains(domains: &[&Domain], today: NaiveDate) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Domain"),
        ui::header_cell("Provider"),
        ui::header_cell("Expires"),
        ui::header_cell("Days left"),
        ui::header_cell("Status"),
        ui::header_cell("Renewal"),
        ui::header_cell("Auto"),
        ui::header_cell("Id"),
    ]);
    for domain in domains {
        let days_left = domain.days_left(today);
        let [days_cell, status_cell] = ui::expiry_cells(days_left, domain.status(today));
        table.add_row(vec![
            Cell::new(&domain.name),
            Cell::new(&domain.provider),
            Cell::new(domain.expiry_date.format("%Y-%m-%d")),
            days_cell,
            status_cell,
            Cell::new(&domain.renewal_cost),
            Cell::new(if domain.auto_renewal { "yes" } else { "no" }),
            Cell::new(ui::style_text(&domain.id, ui::StyleType::Subtle)),
        ]);
    }
    table.to_string()
}

pub async fn run(tracker: &mut Tracker, command: DomainsCommand, today: NaiveDate) -> Result<()> {
    match command {
        DomainsCommand::List => {
            let domains: Vec<&Domain> = tracker.domains().iter().collect();
            if domains.is_empty() {
                println!(
                    "{}",
                    ui::style_text("No domains yet.", ui::StyleType::Subtle)
                );
            } else {
                println!("{}", display_domains(&domains, today));
            }
        }
        DomainsCommand::Expiring => {
            let expiring = expiring_domains(tracker.domains(), today);
            if expiring.is_empty() {
                println!(
                    "{}",
                    ui::style_text(
                        "No domains expire in the next 30 days.",
                        ui::StyleType::Subtle
                    )
                );
            } else {
                println!(
                    "{}\n",
                    ui::style_text("Expiring soon", ui::StyleType::Title)
                );
                println!("{}", display_domains(&expiring, today));
            }
        }
        DomainsCommand::Add {
            name,
            provider,
            expiry_date,
            renewal_cost,
            auto_renewal,
        } => {
            let domain = Domain::new(&name, &provider, expiry_date, &renewal_cost, auto_renewal);
            tracker.add_domain(domain).await;
        }
        DomainsCommand::Edit { id, patch } => {
            if patch == DomainPatch::default() {
                anyhow::bail!("Nothing to change for {}", id);
            }
            if tracker.update_domain(&id, patch).await {
                println!("Updated {id}");
            }
        }
        DomainsCommand::Remove { id } => {
            tracker.remove_domain(&id).await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::store::RecordStores;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_domains_shows_status() {
        let today = date(2025, 3, 1);
        let soon = Domain::new("soon.dev", "Namecheap", date(2025, 3, 2), "12", true);
        let gone = Domain::new("gone.io", "", date(2025, 2, 24), "", false);
        let output = display_domains(&[&soon, &gone], today);

        assert!(output.contains("soon.dev"));
        assert!(output.contains("Critical"));
        assert!(output.contains("Expired"));
        assert!(output.contains("Cloudflare"));
        assert!(output.contains("-5"));
    }

    #[tokio::test]
    async fn test_add_edit_remove_domain() {
        let today = date(2025, 3, 1);
        let mut tracker = Tracker::new(RecordStores::in_memory(), Currency::Usd, 5);

        run(
            &mut tracker,
            DomainsCommand::Add {
                name: "example.com".to_string(),
                provider: "Porkbun".to_string(),
                expiry_date: date(2025, 3, 20),
                renewal_cost: "10.37".to_string(),
                auto_renewal: false,
            },
            today,
        )
        .await
        .unwrap();
        let id = tracker.domains()[0].id.clone();

        let empty_edit = run(
            &mut tracker,
            DomainsCommand::Edit {
                id: id.clone(),
                patch: DomainPatch::default(),
            },
            today,
        )
        .await;
        assert!(empty_edit.is_err());

        run(
            &mut tracker,
            DomainsCommand::Edit {
                id: id.clone(),
                patch: DomainPatch {
                    expiry_date: Some(date(2026, 3, 20)),
                    ..Default::default()
                },
            },
            today,
        )
        .await
        .unwrap();
        assert_eq!(tracker.domains()[0].expiry_date, date(2026, 3, 20));
        assert!(expiring_domains(tracker.domains(), today).is_empty());

        run(&mut tracker, DomainsCommand::Remove { id }, today)
            .await
            .unwrap();
        assert!(tracker.domains().is_empty());
    }
}
