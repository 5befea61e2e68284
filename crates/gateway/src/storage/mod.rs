//! # アカウントストア
//!
//! `AccountsRepository` の実装。
//! 現在はMySQLのみをサポートする。

pub mod mysql;

pub use mysql::MySqlAccounts;
