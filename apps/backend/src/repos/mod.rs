//! Repository layer: domain types in, domain types and `DomainError` out.

pub mod users;
