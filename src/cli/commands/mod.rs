pub mod check;
pub mod clean;
pub mod init;
pub mod prefs;
pub mod translate;

mod shared;
