use std::fmt::Display;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

// Input is matched case-insensitively; Display gives the stored label.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Designation {
    #[strum(serialize = "Software Engineer")]
    SoftwareEngineer,
    #[strum(serialize = "Senior Software Engineer")]
    SeniorSoftwareEngineer,
    #[strum(serialize = "Associate Software Engineer")]
    AssociateSoftwareEngineer,
    #[strum(serialize = "Team Lead")]
    TeamLead,
    #[strum(serialize = "Project Manager")]
    ProjectManager,
    #[strum(serialize = "QA Engineer")]
    QaEngineer,
    #[strum(serialize = "HR Executive")]
    HrExecutive,
    #[strum(serialize = "Business Analyst")]
    BusinessAnalyst,
    #[strum(serialize = "Intern")]
    Intern,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum OfficeLocation {
    Hyderabad,
    Bangalore,
    Chennai,
    Pune,
    Remote,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum EmploymentType {
    #[strum(serialize = "Full-Time")]
    FullTime,
    #[strum(serialize = "Part-Time")]
    PartTime,
    #[strum(serialize = "Contract")]
    Contract,
    #[strum(serialize = "Intern")]
    Intern,
}

/// Comma separated labels, used in validation messages.
pub fn allowed_values<E: IntoEnumIterator + Display>() -> String {
    E::iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
