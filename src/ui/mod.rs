pub mod loadout;
pub mod panels;
pub mod plot;
pub mod search;
pub mod table;
