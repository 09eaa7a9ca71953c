use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

use crate::model::component::{AmountRule, PAY_COMPONENTS, PayComponent};
use crate::model::employee::{Designation, EmploymentType, OfficeLocation, allowed_values};
use crate::model::payslip::PayslipInput;
use crate::utils::period;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect("valid pattern"));
    };
}

pattern!(EMPLOYEE_ID_RE, r"^ATS0[0-9]{3}$");
pattern!(PERSON_NAME_RE, r"^[A-Za-z]+(?: [A-Za-z]+)*$");
pattern!(EMAIL_RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
pattern!(
    STRICT_EMAIL_RE,
    r"(?i)^[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.(?:com|in|org|co\.in)$"
);
pattern!(BANK_NAME_RE, r"^[A-Za-z ]+$");
pattern!(PAN_RE, r"^[A-Z]{5}[0-9]{4}[A-Z]$");
pattern!(ACCOUNT_NO_RE, r"^[0-9]{10,18}$");
pattern!(PF_NO_RE, r"^[A-Z0-9]{12,22}$");
pattern!(UAN_RE, r"^[0-9]{12}$");
pattern!(ESIC_RE, r"^[A-Z0-9]{10,17}$");

const REJECTED_EMPLOYEE_ID: &str = "ATS0000";
const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 255;

/// Largest amount a `DECIMAL(12,2)` column holds.
pub static MAX_AMOUNT: Lazy<Decimal> = Lazy::new(|| Decimal::new(999_999_999_999, 2));

#[derive(Debug, Clone, Copy)]
pub struct ValidationRules {
    /// Only accept emails on .com, .in, .org or .co.in domains
    pub strict_email_domains: bool,
    /// Reference date for "not in the future" checks
    pub today: NaiveDate,
}

/// Validates a create-payslip payload.
///
/// Every rule is evaluated and all failures are returned together, in field
/// order. Values of the wrong JSON type are reported, never panicked on.
pub fn validate_payslip(
    payload: &Value,
    rules: &ValidationRules,
) -> Result<PayslipInput, Vec<String>> {
    let Some(obj) = payload.as_object() else {
        return Err(vec!["Payload must be a JSON object".to_string()]);
    };

    let mut v = Checker {
        obj,
        errors: Vec::new(),
    };

    let employee_id = v.text("employee_id").and_then(|id| {
        if id == REJECTED_EMPLOYEE_ID || !EMPLOYEE_ID_RE.is_match(id) {
            v.fail("employee_id must be ATS0 followed by 3 digits (ATS0000 is not allowed)");
            None
        } else {
            Some(id.to_string())
        }
    });

    let employee_name = v.text("employee_name").and_then(|name| {
        if name.chars().count() > MAX_NAME_LEN {
            v.fail("employee_name must be at most 100 characters");
            None
        } else if name.chars().count() < MIN_NAME_LEN || !PERSON_NAME_RE.is_match(name) {
            v.fail("employee_name must be at least 3 characters of letters separated by single spaces");
            None
        } else {
            Some(name.to_string())
        }
    });

    let employee_email = v.text("employee_email").and_then(|email| {
        if email.len() > MAX_EMAIL_LEN {
            v.fail("employee_email must be at most 255 characters");
            return None;
        }
        let ok = if rules.strict_email_domains {
            STRICT_EMAIL_RE.is_match(email)
        } else {
            EMAIL_RE.is_match(email)
        };
        if ok {
            Some(email.to_lowercase())
        } else if rules.strict_email_domains {
            v.fail("employee_email must be a valid email on a .com, .in, .org or .co.in domain");
            None
        } else {
            v.fail("employee_email must be a valid email address");
            None
        }
    });

    let pay_period = v.text("month_year").and_then(|raw| {
        let parsed = period::parse_month_year(raw);
        if parsed.is_none() {
            v.fail("month_year must look like \"March 2025\" (full month name and 4-digit year)");
        }
        parsed
    });

    let designation = v.one_of::<Designation>("designation");
    let office_location = v.one_of::<OfficeLocation>("office_location");
    let employment_type = v.one_of::<EmploymentType>("employment_type");

    let date_of_joining = v.text("date_of_joining").and_then(|raw| match parse_date(raw) {
        None => {
            v.fail("date_of_joining must be a valid date (YYYY-MM-DD)");
            None
        }
        Some(d) if d > rules.today => {
            v.fail("date_of_joining cannot be in the future");
            None
        }
        Some(d) => Some(d),
    });

    let working_days = v.working_days();

    let bank_name = v.text("bank_name").and_then(|name| {
        if name.chars().count() > MAX_NAME_LEN {
            v.fail("bank_name must be at most 100 characters");
            None
        } else if BANK_NAME_RE.is_match(name) {
            Some(name.to_string())
        } else {
            v.fail("bank_name must contain only letters and spaces");
            None
        }
    });

    let pan_no = v.code("pan_no", &PAN_RE, "pan_no must be 5 letters, 4 digits and 1 letter (e.g. ABCDE1234F)");
    let bank_account_no = v.code("bank_account_no", &ACCOUNT_NO_RE, "bank_account_no must be 10 to 18 digits");
    let pf_no = v.code("pf_no", &PF_NO_RE, "pf_no must be 12 to 22 letters or digits");
    let uan_no = v.code("uan_no", &UAN_RE, "uan_no must be exactly 12 digits");
    let esic_no = v.code("esic_no", &ESIC_RE, "esic_no must be 10 to 17 letters or digits");

    let mut components = BTreeMap::new();
    for component in PAY_COMPONENTS {
        if let Some(amount) = v.amount(component) {
            components.insert(component.key.to_string(), amount);
        }
    }

    if !v.errors.is_empty() {
        return Err(v.errors);
    }

    // Every field reported an error above if it is None here.
    match (
        employee_id,
        employee_name,
        employee_email,
        pay_period,
        designation,
        office_location,
        employment_type,
        date_of_joining,
        working_days,
        bank_name,
        pan_no,
        bank_account_no,
        pf_no,
        uan_no,
        esic_no,
    ) {
        (
            Some(employee_id),
            Some(employee_name),
            Some(employee_email),
            Some(pay_period),
            Some(designation),
            Some(office_location),
            Some(employment_type),
            Some(date_of_joining),
            Some(working_days),
            Some(bank_name),
            Some(pan_no),
            Some(bank_account_no),
            Some(pf_no),
            Some(uan_no),
            Some(esic_no),
        ) => Ok(PayslipInput {
            employee_id,
            employee_name,
            employee_email,
            month_year: pay_period.label,
            period_start: pay_period.start,
            designation,
            office_location,
            employment_type,
            date_of_joining,
            working_days,
            bank_name,
            pan_no,
            bank_account_no,
            pf_no,
            uan_no,
            esic_no,
            components,
        }),
        _ => Err(vec!["Payload could not be validated".to_string()]),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

struct Checker<'a> {
    obj: &'a Map<String, Value>,
    errors: Vec<String>,
}

impl<'a> Checker<'a> {
    fn fail(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.obj.get(field).filter(|v| !v.is_null())
    }

    /// Required, non-blank string, trimmed.
    fn text(&mut self, field: &str) -> Option<&'a str> {
        match self.present(field) {
            None => {
                self.fail(format!("{field} is required"));
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.fail(format!("{field} is required"));
                None
            }
            Some(Value::String(s)) => Some(s.trim()),
            Some(_) => {
                self.fail(format!("{field} must be a string"));
                None
            }
        }
    }

    /// Upper-cased identifier checked against `re`.
    fn code(&mut self, field: &str, re: &Regex, message: &str) -> Option<String> {
        let value = self.text(field)?.to_uppercase();
        if re.is_match(&value) {
            Some(value)
        } else {
            self.fail(message);
            None
        }
    }

    fn one_of<E>(&mut self, field: &str) -> Option<E>
    where
        E: FromStr + IntoEnumIterator + std::fmt::Display,
    {
        let raw = self.text(field)?;
        match E::from_str(raw) {
            Ok(value) => Some(value),
            Err(_) => {
                self.fail(format!(
                    "{field} must be one of: {}",
                    allowed_values::<E>()
                ));
                None
            }
        }
    }

    fn working_days(&mut self) -> Option<u8> {
        const FIELD: &str = "working_days";
        let days = match self.present(FIELD) {
            None => {
                self.fail(format!("{FIELD} is required"));
                return None;
            }
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            Some(_) => None,
        };

        match days {
            Some(d @ 1..=31) => Some(d as u8),
            _ => {
                self.fail(format!("{FIELD} must be a whole number between 1 and 31"));
                None
            }
        }
    }

    fn amount(&mut self, component: &PayComponent) -> Option<Decimal> {
        let field = component.key;
        let required = component.rule == AmountRule::RequiredPositive;

        let value = match self.present(field) {
            None if required => {
                self.fail(format!("{field} is required"));
                return None;
            }
            None => return Some(Decimal::ZERO),
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) if s.trim().is_empty() && !required => {
                return Some(Decimal::ZERO);
            }
            Some(Value::String(s)) => parse_decimal(s.trim()),
            Some(_) => None,
        };

        let Some(value) = value else {
            self.fail(format!("{field} must be a number"));
            return None;
        };

        match component.rule {
            AmountRule::RequiredPositive if value <= Decimal::ZERO => {
                self.fail(format!("{field} must be greater than 0"));
                None
            }
            AmountRule::OptionalNonNegative if value < Decimal::ZERO => {
                self.fail(format!("{field} must be 0 or greater"));
                None
            }
            _ if value > *MAX_AMOUNT => {
                self.fail(format!("{field} must not exceed {}", *MAX_AMOUNT));
                None
            }
            _ => Some(value),
        }
    }
}
