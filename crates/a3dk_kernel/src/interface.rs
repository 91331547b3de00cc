//! One-shot compilation of a kernel's interface from its source text.

use crate::check::{check_consistency, mem_positions_per_bank};
use crate::error::ParseError;
use crate::parser::{parse_port_declaration, PortDeclaration};
use crate::port::{classify, PortMap};
use a3dk_config::KernelConfig;
use a3dk_diagnostics::Diagnostic;

/// Everything recovered from a kernel's `A3_KERNEL` declaration.
#[derive(Clone, Debug)]
pub struct KernelInterface {
    /// The parsed declaration.
    pub declaration: PortDeclaration,
    /// Registers and memory banks in canonical order.
    pub ports: PortMap,
    /// Count mismatches against `artico3.toml`.
    pub warnings: Vec<Diagnostic>,
    /// 32-bit words per memory bank, from declared values.
    pub mem_positions: u64,
}

/// Parses, orders, and checks the interface of `kernel` declared in `source`.
pub fn compile_interface(
    kernel: &KernelConfig,
    source: &str,
) -> Result<KernelInterface, ParseError> {
    let declaration = parse_port_declaration(source)?;
    let ports = classify(&declaration.ports);
    let warnings = check_consistency(kernel, &ports);
    Ok(KernelInterface {
        declaration,
        ports,
        warnings,
        mem_positions: mem_positions_per_bank(kernel.membytes, kernel.membanks),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use a3dk_config::{HwSource, ResetPolarity};

    fn kernel(regs: u32, membanks: u32) -> KernelConfig {
        KernelConfig {
            name: "vadd".to_string(),
            hwsrc: HwSource::Hls,
            membytes: 4096,
            membanks,
            regs,
            rstpol: ResetPolarity::High,
        }
    }

    #[test]
    fn consistent_kernel() {
        let iface =
            compile_interface(&kernel(1, 2), "A3_KERNEL(a3in_t x, a3out_t y, a3reg_t r)").unwrap();
        assert!(iface.warnings.is_empty());
        assert_eq!(iface.ports.num_regs(), 1);
        assert_eq!(iface.ports.num_banks(), 2);
        assert_eq!(iface.mem_positions, 512);
    }

    #[test]
    fn mismatch_still_compiles() {
        let iface =
            compile_interface(&kernel(2, 2), "A3_KERNEL(a3in_t x, a3out_t y, a3reg_t r)").unwrap();
        assert_eq!(iface.warnings.len(), 1);
        assert_eq!(iface.ports.num_regs(), 1);
    }

    #[test]
    fn parse_failure_propagates() {
        let err = compile_interface(&kernel(0, 0), "int main() {}").unwrap_err();
        assert_eq!(err, ParseError::MacroNotFound);
    }
}
