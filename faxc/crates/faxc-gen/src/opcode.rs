//! Opcode set (§4.4), stable numeric encoding starting at 0x00. Ported
//! verbatim from the original bytecode generator's `OpCode` enum
//! (`amanda/bytec.py`).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Mostra = 0,
    LoadConst,
    OpAdd,
    OpMinus,
    OpMul,
    OpDiv,
    OpFloorDiv,
    OpModulo,
    OpInvert,
    DefGlobal,
    GetGlobal,
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// `DEF_GLOBAL`'s second argument: which initializer the VM should pick for
/// an uninitialized global of this type (§4.4).
pub fn type_code(ty: &faxc_util::Type) -> Option<u8> {
    use faxc_util::Type;
    match ty {
        Type::Int => Some(0),
        Type::Real => Some(1),
        Type::Bool => Some(2),
        Type::Texto => Some(3),
        _ => None,
    }
}
