//! # class-loader
//!
//! Finds compiled Java classes on a classpath and decodes their class files.
//!
//! ## Architecture
//!
//! - **reader**: Big-endian cursor over class-file bytes
//! - **constant_pool**: Constant pool decoding and symbolic lookups
//! - **member**: Field and method tables
//! - **attribute**: Attribute tables (`Code`, `SourceFile`, ...)
//! - **classfile**: Class-file decoder and derived class/super/interface names
//! - **entry**: Directory, archive, composite and wildcard classpath entries
//! - **classpath**: Bootstrap → extension → user lookup
//! - **config**: JRE directory discovery and user classpath defaults
//! - **report**: Serializable summaries for command output

pub mod attribute;
pub mod classfile;
pub mod classpath;
pub mod cli;
pub mod config;
pub mod constant_pool;
pub mod entry;
pub mod error;
pub mod member;
pub mod reader;
pub mod report;
