//! CLI 명령어 구현 모듈.

pub mod context;
pub mod history;
pub mod migrate;
pub mod output;
pub mod reference;

pub use output::OutputFormat;
