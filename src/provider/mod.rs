//! # Provider Modules
//!
//! Provider-specific knowledge used during admission.
//!
//! Only Alibaba Cloud is owned by this webhook; bindings of other provider
//! types are passed through without inspection.

pub mod alicloud;
