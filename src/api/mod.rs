pub mod health;
pub mod payslip;
