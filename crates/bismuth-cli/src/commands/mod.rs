pub mod delete;
pub mod generate;
pub mod import;
pub mod projects;
pub mod review;
pub mod scan;
pub mod search;
pub mod summarize;
pub mod sync;
pub mod whoami;
