//! Kernel interface descriptor compiler.
//!
//! Turns a kernel's `A3_KERNEL(...)` port declaration and its configured
//! metadata into the descriptors handed to the template renderer:
//!
//! 1. [`parser`] extracts the ordered `(role, identifier)` list from source text.
//! 2. [`port`] classifies ports and fixes the canonical register and bank order.
//! 3. [`check`] cross-validates parsed counts against `artico3.toml`.
//! 4. [`descriptor`] assembles the per-kernel and per-project descriptors.

#![warn(missing_docs)]

pub mod check;
pub mod descriptor;
pub mod error;
pub mod interface;
pub mod parser;
pub mod port;

pub use check::{check_consistency, mem_positions_per_bank};
pub use descriptor::{KernelDescriptor, ProjectDescriptor};
pub use error::ParseError;
pub use interface::{compile_interface, KernelInterface};
pub use parser::{parse_port_declaration, PortDeclaration, KERNEL_MACRO};
pub use port::{classify, IndexedPort, ParsedPort, PortMap, PortRole};
