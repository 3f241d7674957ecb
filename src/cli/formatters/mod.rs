//! Output formatters for command results

pub mod page;

pub use page::PageView;
