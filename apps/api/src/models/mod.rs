pub mod capability;
pub mod skills;
