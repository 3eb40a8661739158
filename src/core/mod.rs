//! Core XML parsing primitives
//!
//! Building blocks shared by the sniffer and the splitter's event reader:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: entity decoding with Cow (zero-copy when possible) and
//!   escaping for serialization
//! - Attributes: tag-body attribute and namespace-declaration parsing
//! - Namespace: stack-based prefix-to-URI resolution

pub mod attributes;
pub mod entities;
pub mod namespace;
pub mod scanner;
