//! Domain services. Orchestrate repos, hashing and token issue; return `AppError`.

pub mod users;
