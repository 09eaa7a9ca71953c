pub mod db_utils;
pub mod payslip_id;
pub mod period;
pub mod salary;
pub mod validator;
