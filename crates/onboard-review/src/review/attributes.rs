use serde::Serialize;

/// Semantic facts a review needs. The same fact can arrive from the client
/// description, the passport scan, the account form, or the profile form, so
/// each attribute carries its own ordered list of candidate keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    FullName,
    FirstName,
    MiddleName,
    Surname,
    Nationality,
    PassportNumber,
    Country,
    City,
    Street,
    BuildingNumber,
    PostalCode,
    Address,
    BirthDate,
    Age,
    Gender,
    MaritalStatus,
    Occupation,
    Email,
    Phone,
    PassportIssueDate,
    PassportExpiryDate,
    PoliticallyExposed,
    RiskProfile,
    InvestmentExperience,
    MandateType,
    InvestmentHorizon,
    TotalWealth,
    EstimatedIncome,
}

impl Attribute {
    pub const fn candidate_keys(self) -> &'static [&'static str] {
        match self {
            Self::FullName => &[
                "full_name_description.txt",
                "account_name_account.pdf",
                "name_account.pdf",
            ],
            Self::FirstName => &[
                "first_name_description.txt",
                "given_name_passport.png",
                "account_holder_name_account.pdf",
                "first_name_profile.docx",
            ],
            Self::MiddleName => &["middle_name_profile.docx"],
            Self::Surname => &[
                "surname_description.txt",
                "surname_passport.png",
                "account_holder_surname_account.pdf",
                "last_name_profile.docx",
            ],
            Self::Nationality => &[
                "nationality_description.txt",
                "nationality_profile.docx",
                "citizenship_passport.png",
            ],
            Self::PassportNumber => &[
                "passport_number_passport.png",
                "passport_number_account.pdf",
                "passport_no_profile.docx",
            ],
            Self::Country => &[
                "current_country_description.txt",
                "country_account.pdf",
                "country_of_domicile_profile.docx",
                "country_of_origin_description.txt",
            ],
            Self::City => &["current_city_description.txt", "city_account.pdf"],
            Self::Street => &["street_name_account.pdf"],
            Self::BuildingNumber => &["building_number_account.pdf"],
            Self::PostalCode => &["postal_code_account.pdf"],
            Self::Address => &["address_profile.docx", "address_description.txt"],
            Self::BirthDate => &[
                "birth_date_passport.png",
                "date_of_birth_profile.docx",
                "birth_date_description.txt",
            ],
            Self::Age => &["age_description.txt"],
            Self::Gender => &["gender_profile.docx", "sex_passport.png"],
            Self::MaritalStatus => &[
                "marital_status_description.txt",
                "marital status_profile.docx",
                "marital_status_profile.docx",
            ],
            Self::Occupation => &[
                "current_occupation_description.txt",
                "current employment and function_profile.docx",
                "current_employment_and_function_profile.docx",
            ],
            Self::Email => &[
                "email_account.pdf",
                "email_profile.docx",
                "email_description.txt",
            ],
            Self::Phone => &[
                "phone_number_account.pdf",
                "telephone_profile.docx",
                "phone_number_description.txt",
            ],
            Self::PassportIssueDate => &["issue_date_passport.png", "id_issue_date_profile.docx"],
            Self::PassportExpiryDate => &[
                "expiry_date_passport.png",
                "id_expiry_date_profile.docx",
            ],
            Self::PoliticallyExposed => &[
                "is the client or associated person a politically exposed person as defined in the client acceptance policy?_profile.docx",
                "politically_exposed_person_profile.docx",
                "pep_profile.docx",
            ],
            Self::RiskProfile => &[
                "investment risk profile_profile.docx",
                "investment_risk_profile_profile.docx",
                "investment_risk_profile_profile",
            ],
            Self::InvestmentExperience => &[
                "investment experience_profile.docx",
                "investment_experience_profile.docx",
                "investment_experience_profile",
            ],
            Self::MandateType => &[
                "type of mandate_profile.docx",
                "type_of_mandate_profile.docx",
                "type_of_mandate_profile",
            ],
            Self::InvestmentHorizon => &[
                "investment horizon_profile.docx",
                "investment_horizon_profile.docx",
            ],
            Self::TotalWealth => &[
                "total wealth estimated_profile.docx",
                "total_wealth_estimated_profile.docx",
            ],
            Self::EstimatedIncome => &[
                "estimated total income p.a._profile.docx",
                "estimated_total_income_profile.docx",
            ],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::FirstName => "First name",
            Self::MiddleName => "Middle name",
            Self::Surname => "Surname",
            Self::Nationality => "Nationality",
            Self::PassportNumber => "Passport number",
            Self::Country => "Country",
            Self::City => "City",
            Self::Street => "Street",
            Self::BuildingNumber => "Building number",
            Self::PostalCode => "Postal code",
            Self::Address => "Address",
            Self::BirthDate => "Date of birth",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::MaritalStatus => "Marital status",
            Self::Occupation => "Occupation",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::PassportIssueDate => "Passport issued",
            Self::PassportExpiryDate => "Passport expires",
            Self::PoliticallyExposed => "Politically exposed person",
            Self::RiskProfile => "Investment risk profile",
            Self::InvestmentExperience => "Investment experience",
            Self::MandateType => "Mandate type",
            Self::InvestmentHorizon => "Investment horizon",
            Self::TotalWealth => "Total wealth",
            Self::EstimatedIncome => "Estimated income p.a.",
        }
    }
}

/// A field pinned to one source document, used when documents are compared
/// against each other rather than resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField {
    PassportImagePassportNumber,
    AccountFormPassportNumber,
    ProfileFormPassportNumber,
    AccountFormEmail,
    ProfileFormEmail,
    PassportImageGivenName,
    PassportImageSurname,
    FinancialDetails,
}

impl SourceField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::PassportImagePassportNumber => "passport_number_passport.png",
            Self::AccountFormPassportNumber => "passport_number_account.pdf",
            Self::ProfileFormPassportNumber => "passport_no_profile.docx",
            Self::AccountFormEmail => "email_account.pdf",
            Self::ProfileFormEmail => "email_profile.docx",
            Self::PassportImageGivenName => "given_name_passport.png",
            Self::PassportImageSurname => "surname_passport.png",
            Self::FinancialDetails => "financial_details_description.txt",
        }
    }
}
