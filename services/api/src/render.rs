use onboard_review::review::{display, ReviewReport};
use std::io::{self, Write};

pub(crate) fn render_review_report<W: Write>(
    out: &mut W,
    label: &str,
    report: &ReviewReport,
) -> io::Result<()> {
    let profile = &report.profile;

    writeln!(out, "Client review {label}")?;
    if report.is_fallback {
        writeln!(
            out,
            "NOTE: demo data shown, the review server could not be reached"
        )?;
    }
    writeln!(
        out,
        "Status: {} ({}) - {}",
        report.status_label, report.indicator.color, report.indicator.message
    )?;
    writeln!(out, "Recommendation: {}", report.recommendation)?;
    writeln!(
        out,
        "Decision: {}",
        report.decision.as_deref().unwrap_or("N/A")
    )?;

    writeln!(out, "\nScores")?;
    writeln!(out, "- Overall: {}/100", report.overall_score)?;
    writeln!(
        out,
        "- Identity: {}/100 ({}/{} checks passed)",
        report.identity_score,
        report.passed_checks(),
        report.identity_checks.len()
    )?;
    writeln!(out, "- Consistency: {}/100", report.consistency_score)?;
    writeln!(out, "- Risk level: {}", report.risk_label)?;

    writeln!(out, "\nProfile")?;
    let rows = [
        ("Full name", &profile.full_name),
        ("Nationality", &profile.nationality),
        ("Passport number", &profile.passport_number),
        ("Passport expires", &profile.passport_expiry_date),
        ("Date of birth", &profile.birth_date),
        ("Age", &profile.age),
        ("Gender", &profile.gender),
        ("Marital status", &profile.marital_status),
        ("Occupation", &profile.occupation),
        ("Email", &profile.email),
        ("Phone", &profile.phone),
        ("Address", &profile.address),
        ("City", &profile.city),
        ("Country", &profile.country),
        ("Politically exposed", &profile.politically_exposed),
        ("Risk profile", &profile.risk_profile),
        ("Investment experience", &profile.investment_experience),
        ("Mandate", &profile.mandate_type),
        ("Total wealth", &profile.total_wealth),
    ];
    for (name, value) in rows {
        writeln!(out, "- {name}: {}", display(value))?;
    }

    if let Some(financials) = &report.financials {
        writeln!(out, "\nFinancial details")?;
        if let Some(salary) = &financials.last_salary {
            writeln!(
                out,
                "- Last salary: {} {}",
                salary.amount,
                salary.currency.as_deref().unwrap_or("")
            )?;
        }
        if let Some(savings) = &financials.savings {
            writeln!(
                out,
                "- Savings: {} {}",
                savings.amount,
                savings.currency.as_deref().unwrap_or("")
            )?;
        }
        for holding in &financials.real_estate {
            let value = holding
                .value
                .as_ref()
                .map(|value| {
                    format!(
                        "{} {}",
                        value.amount,
                        value.currency.as_deref().unwrap_or("")
                    )
                })
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(
                out,
                "- {} in {}: {}",
                display(&holding.kind),
                display(&holding.location),
                value.trim_end()
            )?;
        }
        if let Some(total) = financials.real_estate_total() {
            writeln!(out, "- Real estate total: {total:.0}")?;
        }
    }

    writeln!(out, "\nIdentity checks")?;
    for check in &report.identity_checks {
        let mark = if check.passed { "pass" } else { "fail" };
        writeln!(out, "- [{mark}] {}", check.label)?;
    }

    if report.inconsistencies.is_empty() {
        writeln!(out, "\nInconsistencies: none")?;
    } else {
        writeln!(out, "\nInconsistencies")?;
        for inconsistency in &report.inconsistencies {
            writeln!(out, "- {inconsistency}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_review::review::{derive_report, fallback};

    fn rendered(report: &ReviewReport) -> String {
        let mut buffer = Vec::new();
        render_review_report(&mut buffer, "CL-2026-0001", report).expect("render succeeds");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn fallback_report_shows_demo_banner_and_mismatches() {
        let output = rendered(&derive_report(&fallback::primary()));

        assert!(output.starts_with("Client review CL-2026-0001\nNOTE: demo data"));
        assert!(output.contains("Status: Approved (green)"));
        assert!(output.contains("- Full name: Benjamin Paul Wagner"));
        assert!(output.contains("- [fail] Passport number matches account form"));
        assert!(output.contains("Passport number mismatch"));
    }

    #[test]
    fn financial_details_are_listed_when_present() {
        let output = rendered(&derive_report(&fallback::secondary()));

        assert!(output.contains("- Last salary: 112000 EUR"));
        assert!(output.contains("- Townhouse in Caen: 1970000 EUR"));
        assert!(output.contains("- Real estate total: 3170000"));
        assert!(output.contains("Inconsistencies: none"));
        assert!(output.contains("- Passport expires: N/A"));
    }
}
