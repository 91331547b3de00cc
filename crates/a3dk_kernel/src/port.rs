//! Port roles and the canonical register/bank ordering.
//!
//! Memory ports are sorted by name within each role group and then laid out
//! as constant, input, bidirectional, output. Constants keep declaration
//! order. The generated DMA bank addressing depends on this order being
//! identical across regenerations, whatever order the source lists ports in.

use std::fmt;

/// The role a kernel port plays, selected by its type tag in `A3_KERNEL`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PortRole {
    /// Read-only memory bank, `a3const_t`.
    Const,
    /// Input memory bank, `a3in_t`.
    In,
    /// Output memory bank, `a3out_t`.
    Out,
    /// Bidirectional memory bank, `a3inout_t`.
    InOut,
    /// Configuration register, `a3reg_t`.
    Reg,
}

impl PortRole {
    /// Every role, in tag-table order.
    pub const ALL: [PortRole; 5] = [
        PortRole::Const,
        PortRole::In,
        PortRole::Out,
        PortRole::InOut,
        PortRole::Reg,
    ];

    /// The type tag that selects this role in kernel source.
    pub fn tag(self) -> &'static str {
        match self {
            PortRole::Const => "a3const_t",
            PortRole::In => "a3in_t",
            PortRole::Out => "a3out_t",
            PortRole::InOut => "a3inout_t",
            PortRole::Reg => "a3reg_t",
        }
    }

    /// Looks up a role by exact tag match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.tag() == tag)
    }

    /// Returns `true` for roles that occupy a memory bank.
    pub fn is_memory(self) -> bool {
        self != PortRole::Reg
    }
}

impl fmt::Display for PortRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A port as declared in source, before ordering.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParsedPort {
    /// The port's role.
    pub role: PortRole,
    /// The port identifier.
    pub name: String,
    /// Byte offset of the declaring argument in the kernel source.
    pub offset: usize,
}

/// A port with its final 0-based register or bank index.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IndexedPort {
    /// The port identifier.
    pub name: String,
    /// The port's role.
    pub role: PortRole,
    /// Register index or memory bank index.
    pub index: usize,
}

/// Ports split into registers and memory banks, each in canonical order.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PortMap {
    /// Registers sorted by name, indexed from 0.
    pub registers: Vec<IndexedPort>,
    /// Memory banks in C-I-IO-O order, indexed from 0.
    pub memory: Vec<IndexedPort>,
}

impl PortMap {
    /// Number of register ports.
    pub fn num_regs(&self) -> usize {
        self.registers.len()
    }

    /// Number of memory-bank ports.
    pub fn num_banks(&self) -> usize {
        self.memory.len()
    }
}

/// Buckets ports by role and assigns register and bank indices.
pub fn classify(ports: &[ParsedPort]) -> PortMap {
    let bucket = |role: PortRole| {
        ports
            .iter()
            .filter(move |p| p.role == role)
            .collect::<Vec<_>>()
    };
    let sorted = |role: PortRole| {
        let mut group = bucket(role);
        group.sort_by(|a, b| a.name.cmp(&b.name));
        group
    };

    let memory = bucket(PortRole::Const)
        .into_iter()
        .chain(sorted(PortRole::In))
        .chain(sorted(PortRole::InOut))
        .chain(sorted(PortRole::Out));

    PortMap {
        registers: index(sorted(PortRole::Reg)),
        memory: index(memory),
    }
}

fn index<'a>(ports: impl IntoIterator<Item = &'a ParsedPort>) -> Vec<IndexedPort> {
    ports
        .into_iter()
        .enumerate()
        .map(|(index, p)| IndexedPort {
            name: p.name.clone(),
            role: p.role,
            index,
        })
        .collect()
}
