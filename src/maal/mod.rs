pub mod business;
pub mod cash;
pub mod investments;
pub mod liabilities;
pub mod precious_metals;
pub mod real_estate;
