//! Static country reference tables: which bank fields a country's format
//! needs, and which currencies it settles in. Lookup data only, no behavior.

use serde::Serialize;
use std::collections::BTreeMap;

/// The bank detail fields meaningful for one country, with a display label.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BankFormat {
    pub fields: &'static [&'static str],
    pub label: &'static str,
}

const IBAN_COUNTRIES: &[&str] = &[
    "DE", "FR", "IT", "ES", "NL", "BE", "AT", "CH", "SE", "NO", "DK", "FI", "IE", "PT", "GR",
    "PL", "HU", "CZ", "SK", "HR", "SI", "EE", "LV", "LT", "LU", "MT", "CY", "BG", "RO", "LI",
    "GI",
];

/// Returns the bank-detail format for a country code (uppercased 2-letter).
/// Unknown countries fall back to a bare account number.
pub fn bank_format(country: &str) -> BankFormat {
    match country {
        "US" => BankFormat {
            fields: &["routing_number", "account_number"],
            label: "Routing + Account Number",
        },
        "GB" => BankFormat {
            fields: &["sort_code", "account_number"],
            label: "Sort Code + Account Number",
        },
        "AU" => BankFormat {
            fields: &["bsb_number", "account_number"],
            label: "BSB + Account Number",
        },
        "CA" => BankFormat {
            fields: &["transit_number", "institution_number", "account_number"],
            label: "Transit + Institution + Account",
        },
        "IN" => BankFormat {
            fields: &["ifsc", "account_number"],
            label: "IFSC + Account Number",
        },
        "JP" => BankFormat {
            fields: &["bank_code", "branch_code", "account_number"],
            label: "Bank Code + Branch + Account",
        },
        c if IBAN_COUNTRIES.contains(&c) => BankFormat {
            fields: &["iban"],
            label: "IBAN",
        },
        _ => BankFormat {
            fields: &["account_number"],
            label: "Account Number",
        },
    }
}

/// Currencies a country's recipients can be paid in, primary first.
/// Countries without platform payout rails are still listed; payouts to them
/// are recorded here and executed manually.
pub fn currencies(country: &str) -> &'static [&'static str] {
    match country {
        "US" => &["usd"],
        "GB" => &["gbp", "usd"],
        "AU" => &["aud"],
        "CA" => &["cad"],
        "JP" => &["jpy"],
        "SG" => &["sgd"],
        "HK" => &["hkd"],
        "IN" => &["inr"],
        "MX" => &["mxn"],
        "BR" => &["brl"],
        "ZA" => &["zar"],
        "NG" => &["ngn"],
        "GH" => &["ghs"],
        "KE" => &["kes"],
        "DE" | "FR" | "IT" | "ES" | "NL" | "BE" | "AT" | "PT" | "GR" | "IE" | "FI" | "SK"
        | "SI" | "EE" | "LV" | "LT" | "LU" | "MT" | "CY" | "HR" => &["eur"],
        "CH" | "LI" => &["chf", "eur"],
        "SE" => &["sek", "eur"],
        "NO" => &["nok", "eur"],
        "DK" => &["dkk", "eur"],
        "PL" => &["pln", "eur"],
        "HU" => &["huf", "eur"],
        "CZ" => &["czk", "eur"],
        "BG" => &["bgn", "eur"],
        "RO" => &["ron", "eur"],
        "GI" => &["gbp", "eur"],
        "MY" => &["myr"],
        "NZ" => &["nzd"],
        "TH" => &["thb"],
        "TT" => &["ttd"],
        "UY" => &["uyu"],
        "AE" => &["aed"],
        "SA" => &["sar"],
        "PK" => &["pkr"],
        "BD" => &["bdt"],
        "PH" => &["php"],
        "VN" => &["vnd"],
        "TR" => &["try"],
        "EG" => &["egp"],
        "MA" => &["mad"],
        "KR" => &["krw"],
        _ => &[],
    }
}

/// The country's primary settlement currency, if known.
pub fn primary_currency(country: &str) -> Option<&'static str> {
    currencies(country).first().copied()
}

/// All countries with a currency entry.
pub fn supported_countries() -> &'static [&'static str] {
    &[
        "US", "GB", "AU", "CA", "JP", "SG", "HK", "IN", "MX", "BR", "ZA", "NG", "GH", "KE",
        "DE", "FR", "IT", "ES", "NL", "BE", "AT", "PT", "GR", "IE", "FI", "SK", "SI", "EE",
        "LV", "LT", "LU", "MT", "CY", "CH", "SE", "NO", "DK", "PL", "HU", "CZ", "HR", "BG",
        "RO", "LI", "GI", "MY", "NZ", "TH", "TT", "UY", "AE", "SA", "PK", "BD", "PH", "VN",
        "TR", "EG", "MA", "KR",
    ]
}

/// The full reference dataset: every supported country with its currencies
/// and bank-detail format. This is what clients use to drive recipient forms.
#[derive(Debug, Serialize)]
pub struct SupportedData {
    pub countries: Vec<&'static str>,
    pub currencies: BTreeMap<&'static str, &'static [&'static str]>,
    pub bank_formats: BTreeMap<&'static str, BankFormat>,
}

pub fn supported_data() -> SupportedData {
    let countries: Vec<&'static str> = supported_countries().to_vec();
    SupportedData {
        currencies: countries.iter().map(|c| (*c, currencies(c))).collect(),
        bank_formats: countries.iter().map(|c| (*c, bank_format(c))).collect(),
        countries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_format_lookup() {
        assert_eq!(bank_format("US").fields, &["routing_number", "account_number"]);
        assert_eq!(bank_format("DE").fields, &["iban"]);
        assert_eq!(bank_format("DE").label, "IBAN");
        // Unknown country falls back to a bare account number
        assert_eq!(bank_format("ZZ").fields, &["account_number"]);
    }

    #[test]
    fn test_primary_currency() {
        assert_eq!(primary_currency("GB"), Some("gbp"));
        assert_eq!(primary_currency("FR"), Some("eur"));
        assert_eq!(primary_currency("ZZ"), None);
    }

    #[test]
    fn test_every_supported_country_has_a_currency() {
        for country in supported_countries() {
            assert!(
                primary_currency(country).is_some(),
                "no currency for {country}"
            );
        }
    }
}
