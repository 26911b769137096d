use serde::Serialize;
use serde_json::Value;

use super::attributes::{Attribute, SourceField};
use super::record::ClientRecord;

pub const NOT_AVAILABLE: &str = "N/A";

/// Normalized client view; every field is the first known value across the
/// source documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientProfile {
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub surname: Option<String>,
    pub nationality: Option<String>,
    pub passport_number: Option<String>,
    pub passport_issue_date: Option<String>,
    pub passport_expiry_date: Option<String>,
    pub birth_date: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub occupation: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub politically_exposed: Option<String>,
    pub risk_profile: Option<String>,
    pub investment_experience: Option<String>,
    pub mandate_type: Option<String>,
    pub investment_horizon: Option<String>,
    pub total_wealth: Option<String>,
    pub estimated_income: Option<String>,
}

impl ClientProfile {
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            full_name: record.resolve(Attribute::FullName),
            first_name: record.resolve(Attribute::FirstName),
            middle_name: record.resolve(Attribute::MiddleName),
            surname: record.resolve(Attribute::Surname),
            nationality: record.resolve(Attribute::Nationality),
            passport_number: record.resolve(Attribute::PassportNumber),
            passport_issue_date: record.resolve(Attribute::PassportIssueDate),
            passport_expiry_date: record.resolve(Attribute::PassportExpiryDate),
            birth_date: record.resolve(Attribute::BirthDate),
            age: record.resolve(Attribute::Age),
            gender: record.resolve(Attribute::Gender),
            marital_status: record.resolve(Attribute::MaritalStatus),
            occupation: record.resolve(Attribute::Occupation),
            email: record.resolve(Attribute::Email),
            phone: record.resolve(Attribute::Phone),
            address: record
                .resolve(Attribute::Address)
                .or_else(|| street_address(record)),
            city: record.resolve(Attribute::City),
            country: record.resolve(Attribute::Country),
            politically_exposed: record.resolve(Attribute::PoliticallyExposed),
            risk_profile: record.resolve(Attribute::RiskProfile),
            investment_experience: record.resolve(Attribute::InvestmentExperience),
            mandate_type: record.resolve(Attribute::MandateType),
            investment_horizon: record.resolve(Attribute::InvestmentHorizon),
            total_wealth: record.resolve(Attribute::TotalWealth),
            estimated_income: record.resolve(Attribute::EstimatedIncome),
        }
    }

    /// Birth date when known, otherwise the stated age.
    pub fn birth_date_or_age(&self) -> Option<String> {
        self.birth_date
            .clone()
            .or_else(|| self.age.as_ref().map(|age| format!("{age} years")))
    }
}

/// Renders an optional field the way the review screen shows it.
pub fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn street_address(record: &ClientRecord) -> Option<String> {
    let street = record.resolve(Attribute::Street)?;
    let line = match record.resolve(Attribute::BuildingNumber) {
        Some(number) => format!("{street} {number}"),
        None => street,
    };

    Some(match record.resolve(Attribute::PostalCode) {
        Some(postal_code) => format!("{line}, {postal_code}"),
        None => line,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonetaryAmount {
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealEstateHolding {
    pub location: Option<String>,
    pub kind: Option<String>,
    pub value: Option<MonetaryAmount>,
}

/// Salary, savings and property pulled from the client description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_salary: Option<MonetaryAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<MonetaryAmount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub real_estate: Vec<RealEstateHolding>,
}

impl FinancialDetails {
    /// Reads the nested financial object; unreadable parts are dropped.
    pub fn from_record(record: &ClientRecord) -> Option<Self> {
        let details = record
            .get(SourceField::FinancialDetails.key())
            .and_then(|value| value.as_json())?
            .as_object()?;

        let last_salary = details.get("last_salary").and_then(|value| money(value, "amount"));
        let savings = details.get("savings").and_then(|value| money(value, "amount"));
        let real_estate: Vec<RealEstateHolding> = details
            .get("real_estate")
            .and_then(Value::as_array)
            .map(|holdings| {
                holdings
                    .iter()
                    .filter(|holding| holding.is_object())
                    .map(|holding| RealEstateHolding {
                        location: holding.get("location").and_then(scalar_text),
                        kind: holding.get("type").and_then(scalar_text),
                        value: money(holding, "value"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let parsed = Self {
            last_salary,
            savings,
            real_estate,
        };

        if parsed == Self::default() {
            None
        } else {
            Some(parsed)
        }
    }

    pub fn real_estate_total(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .real_estate
            .iter()
            .filter_map(|holding| holding.value.as_ref())
            .filter_map(|value| value.amount.replace([',', ' '], "").parse::<f64>().ok())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum())
        }
    }
}

fn money(object: &Value, amount_key: &str) -> Option<MonetaryAmount> {
    let amount = object.get(amount_key).and_then(scalar_text)?;
    Some(MonetaryAmount {
        amount,
        currency: object.get("currency").and_then(scalar_text),
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed == "null" {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
