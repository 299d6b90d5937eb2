pub mod dashboard;
pub mod io;
pub mod keys;
