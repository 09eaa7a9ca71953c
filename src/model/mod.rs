pub mod component;
pub mod employee;
pub mod payslip;
