pub mod ordering;
pub mod ports;
pub mod skill_list;
pub mod store;
