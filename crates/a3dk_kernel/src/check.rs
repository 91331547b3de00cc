//! Cross-validation of parsed ports against declared kernel metadata.
//!
//! `artico3.toml` declares how many registers and memory banks a kernel has;
//! the `A3_KERNEL` declaration is the ground truth. Mismatches are warnings:
//! generation proceeds with the parsed counts and the runtime will fail if
//! the two are never reconciled.

use crate::port::PortMap;
use a3dk_config::KernelConfig;
use a3dk_diagnostics::{Diagnostic, DiagnosticCode};

/// Compares parsed register and bank counts with the declared ones.
///
/// Returns one warning per mismatching count, in `Regs`, `MemBanks` order.
pub fn check_consistency(kernel: &KernelConfig, ports: &PortMap) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();
    let checks = [
        (
            DiagnosticCode::REGS_MISMATCH,
            "Regs",
            "regs",
            ports.num_regs(),
            kernel.regs as usize,
        ),
        (
            DiagnosticCode::MEMBANKS_MISMATCH,
            "MemBanks",
            "membanks",
            ports.num_banks(),
            kernel.membanks as usize,
        ),
    ];
    for (code, what, key, parsed, declared) in checks {
        if parsed == declared {
            continue;
        }
        tracing::warn!(
            kernel = %kernel.name,
            parsed,
            declared,
            "inconsistent use of {what} and A3_KERNEL"
        );
        warnings.push(
            Diagnostic::warning(
                code,
                format!(
                    "inconsistent use of {what} (artico3.toml: {declared}) and A3_KERNEL \
                     (source: {parsed}), will generate run-time errors"
                ),
            )
            .with_kernel(&kernel.name)
            .with_note(format!("generation continues with the parsed count of {parsed}"))
            .with_help(format!("set `{key} = {parsed}` for kernel '{}'", kernel.name)),
        );
    }
    warnings
}

/// Number of 32-bit words per memory bank, from declared values.
///
/// `floor(membytes / membanks / 4)`; a kernel without banks has none.
pub fn mem_positions_per_bank(membytes: u64, membanks: u32) -> u64 {
    if membanks == 0 {
        return 0;
    }
    membytes / u64::from(membanks) / 4
}
