//! Infer TypeScript-style interfaces from sample JSON documents.
//!
//! ```
//! use serde_json::json;
//! use json_iface::{infer, Codegen, RenderOptions};
//!
//! let schema = infer(&json!([
//!     {"_id": "a1", "status": "on", "tags": ["x"]},
//!     {"_id": "a2", "status": "off", "count": 2},
//! ]));
//! let mut cg = Codegen::new(RenderOptions::default());
//! cg.emit(&schema, "device");
//! assert_eq!(cg.into_string(), "interface IDevice {
//!   _id: ObjectId(string);
//!   count: number;
//!   status: 'on' | 'off';
//!   tags: string[];
//! }
//! ");
//! ```
pub mod cli;
pub mod codegen;
pub mod error;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod path_de;

pub use codegen::{render_body, Codegen, ColorChoice, RenderOptions, TerminalEnv};
pub use error::{Error, Result};
pub use inference::{infer, infer_from_values, ClassifyOptions, Inference};
pub use ir::{Descriptor, Schema, TypeTag};
