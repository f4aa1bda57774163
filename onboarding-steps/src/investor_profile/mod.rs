//! Investor profile steps.

pub mod account_holder;
pub mod disclosures;
pub mod financial_profile;
pub mod secondary_holder;
pub mod signatures;
