//! Store implementations.
//!
//! - `inmemory`: プロセス内のストア実装
//! - 将来的に: 外部のドキュメントストア（条件付き書き込みと購読をサポートするもの）

pub mod inmemory;

pub use inmemory::InMemoryStore;
